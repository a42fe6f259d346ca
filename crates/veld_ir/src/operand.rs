use std::fmt;

use crate::inline::InlineMap;
use crate::pattern::PatternLit;
use crate::subst::SubstMap;

/// A named local-variable slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// A literal constant embedded in the IR.
#[derive(Clone, Debug, PartialEq)]
pub enum Const {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Sym(String),
}

/// An IR value reference consumed by an instruction.
///
/// Operands are read-mostly: the optimization pass may replace them in
/// place through [`Operand::simplify`], and the inlining pass clones them
/// through [`Operand::clone_for_inlining`] without touching the original.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Const(Const),
    Var(Variable),
    /// The receiver of the enclosing body.
    SelfRef,
    Pattern(Box<PatternLit>),
}

impl Operand {
    pub fn int(i: i64) -> Self {
        Operand::Const(Const::Int(i))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Operand::Const(Const::Str(s.into()))
    }

    pub fn sym(s: impl Into<String>) -> Self {
        Operand::Const(Const::Sym(s.into()))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Operand::Var(Variable::new(name))
    }

    /// Whether this operand denotes the same value on every retrieval.
    /// Stable for a given operand unless it is itself substituted.
    pub fn is_constant(&self) -> bool {
        match self {
            Operand::Const(_) => true,
            Operand::Var(_) | Operand::SelfRef => false,
            Operand::Pattern(p) => p.is_constant(),
        }
    }

    /// Rewrites this operand in place through the substitution map.
    /// Unmapped operands are left unchanged; applying the same map again
    /// is a no-op.
    pub fn simplify(&mut self, map: &SubstMap) {
        match self {
            Operand::Var(v) => {
                if let Some(replacement) = map.resolve(v) {
                    *self = replacement;
                }
            }
            Operand::Pattern(p) => p.source_mut().simplify(map),
            Operand::Const(_) | Operand::SelfRef => {}
        }
    }

    /// Produces the copy of this operand used when the enclosing body is
    /// inlined. Constant content may be shared with the original; variable
    /// references are renamed through the map. Never mutates `self` or the
    /// map.
    pub fn clone_for_inlining(&self, map: &InlineMap) -> Operand {
        match self {
            Operand::Var(v) => Operand::Var(map.rename(v)),
            Operand::Pattern(p) => Operand::Pattern(Box::new(p.clone_for_inlining(map))),
            Operand::Const(_) | Operand::SelfRef => self.clone(),
        }
    }

    /// Appends the variables read by this operand to `out`.
    pub fn collect_variables(&self, out: &mut Vec<Variable>) {
        match self {
            Operand::Var(v) => out.push(v.clone()),
            Operand::Pattern(p) => p.source().collect_variables(out),
            Operand::Const(_) | Operand::SelfRef => {}
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Const(Const::Nil) => f.write_str("nil"),
            Operand::Const(Const::Bool(b)) => write!(f, "{b}"),
            Operand::Const(Const::Int(i)) => write!(f, "{i}"),
            Operand::Const(Const::Float(x)) => write!(f, "{x}"),
            Operand::Const(Const::Str(s)) => write!(f, "\"{s}\""),
            Operand::Const(Const::Sym(s)) => write!(f, ":{s}"),
            Operand::Var(v) => write!(f, "{v}"),
            Operand::SelfRef => f.write_str("%self"),
            Operand::Pattern(p) => write!(f, "{p}"),
        }
    }
}
