use std::fmt;
use std::rc::Rc;

use smallvec::{SmallVec, smallvec};

use crate::inline::InlineMap;
use crate::operand::{Operand, Variable};
use crate::scope::{MetaClassTemplate, ScopeId};
use crate::subst::SubstMap;

/// A jump target name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label(Rc<str>);

impl Label {
    pub fn new(name: impl AsRef<str>) -> Self {
        Label(Rc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operation tags, one per instruction kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Copy,
    LineNum,
    DefineMetaClass,
    Label,
    Jump,
    Return,
}

/// A typed unit of IR execution: zero-or-one result binding plus an
/// ordered list of operand inputs.
///
/// Instructions are mutated in place by the substitution pass and cloned,
/// never mutated, by the inlining pass. The interpretation of each kind
/// lives in the runtime crate's exhaustive match.
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    /// result := src
    Copy { result: Variable, src: Operand },
    /// Marks the current source line. The owning scope keeps the number
    /// meaningful after inlining mixes several scopes into one sequence.
    LineNum { scope: ScopeId, line: u32 },
    /// result := run the template body on `object`'s singleton class.
    DefineMetaClass {
        result: Variable,
        object: Operand,
        template: Rc<MetaClassTemplate>,
    },
    /// Jump target marker.
    Label(Label),
    /// Unconditional transfer to a label in the same sequence.
    Jump(Label),
    /// Ends the enclosing body with the operand's value.
    Return(Operand),
}

impl Instr {
    pub fn op(&self) -> OpKind {
        match self {
            Instr::Copy { .. } => OpKind::Copy,
            Instr::LineNum { .. } => OpKind::LineNum,
            Instr::DefineMetaClass { .. } => OpKind::DefineMetaClass,
            Instr::Label(_) => OpKind::Label,
            Instr::Jump(_) => OpKind::Jump,
            Instr::Return(_) => OpKind::Return,
        }
    }

    /// The variable this instruction writes, if any.
    pub fn result(&self) -> Option<&Variable> {
        match self {
            Instr::Copy { result, .. } | Instr::DefineMetaClass { result, .. } => Some(result),
            Instr::LineNum { .. } | Instr::Label(_) | Instr::Jump(_) | Instr::Return(_) => None,
        }
    }

    /// Exactly the operands read at interpretation time, in order. The
    /// substitution and renaming passes see this instruction's data
    /// dependencies only through this list.
    pub fn operands(&self) -> SmallVec<[&Operand; 2]> {
        match self {
            Instr::Copy { src, .. } => smallvec![src],
            Instr::DefineMetaClass { object, .. } => smallvec![object],
            Instr::Return(src) => smallvec![src],
            Instr::LineNum { .. } | Instr::Label(_) | Instr::Jump(_) => SmallVec::new(),
        }
    }

    /// Rewrites operand references through the map, in place. Safe to call
    /// repeatedly.
    pub fn simplify_operands(&mut self, map: &SubstMap) {
        match self {
            Instr::Copy { src, .. } => src.simplify(map),
            Instr::DefineMetaClass { object, .. } => object.simplify(map),
            Instr::Return(src) => src.simplify(map),
            Instr::LineNum { .. } | Instr::Label(_) | Instr::Jump(_) => {}
        }
    }

    /// Produces the copy of this instruction used when the enclosing body
    /// is inlined into a caller. Never mutates `self` or the map.
    pub fn clone_for_inlining(&self, map: &InlineMap) -> Instr {
        match self {
            Instr::Copy { result, src } => Instr::Copy {
                result: map.rename(result),
                src: src.clone_for_inlining(map),
            },
            // No variable references; every inlined copy shares the payload.
            Instr::LineNum { .. } => self.clone(),
            Instr::DefineMetaClass {
                result,
                object,
                template,
            } => Instr::DefineMetaClass {
                result: map.rename(result),
                object: object.clone_for_inlining(map),
                template: Rc::clone(template),
            },
            Instr::Label(_) | Instr::Jump(_) => self.clone(),
            Instr::Return(src) => Instr::Return(src.clone_for_inlining(map)),
        }
    }

    /// Appends the variables read by this instruction's operands to `out`.
    pub fn collect_variables(&self, out: &mut Vec<Variable>) {
        for operand in self.operands() {
            operand.collect_variables(out);
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Copy { result, src } => write!(f, "{result} = copy({src})"),
            Instr::LineNum { scope, line } => write!(f, "line_num({line}) <{scope}>"),
            Instr::DefineMetaClass { result, object, .. } => {
                write!(f, "{result} = def_meta_class({object})")
            }
            Instr::Label(label) => write!(f, "{label}:"),
            Instr::Jump(label) => write!(f, "jump({label})"),
            Instr::Return(src) => write!(f, "return({src})"),
        }
    }
}
