//! The interpreter over IR instruction and operand kinds. Each kind's
//! semantics live in one exhaustive match, so adding a kind is a
//! compile-checked, total change.

use std::rc::Rc;

use veld_ir::{
    CompiledPattern, Const, Instr, Label, MetaClassTemplate, Operand, PatternLit, ScopeId,
};

use crate::core::classes::{Method, Visibility};
use crate::core::frame::Frame;
use crate::core::value::{FastHashMap, Value, fast_map_new};
use crate::errors::{RuntimeError, messages};
use crate::runtime::{Flow, Runtime, STRICT_SECURITY_LEVEL};

/// A closure handed to a body invocation. Threaded explicitly through the
/// interpretation signature, never pulled from ambient context.
#[derive(Debug)]
pub struct Block {
    pub scope: ScopeId,
    pub body: Rc<Vec<Instr>>,
}

/// Runs one instruction sequence to completion: walk forward, jump on a
/// transfer, finish on a return or at the end of the sequence. A sequence
/// that falls off the end yields nil.
pub fn run_seq(
    rt: &mut Runtime,
    frame: &mut Frame,
    seq: &[Instr],
    self_val: &Value,
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    #[cfg(test)]
    let trace_ir = std::env::var("VELD_TRACE_IR")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    #[cfg(not(test))]
    let trace_ir = false;

    let labels = label_index(seq);
    let mut ip: usize = 0;
    while ip < seq.len() {
        let instr = &seq[ip];
        if trace_ir {
            eprintln!("ir: {instr}");
        }
        match step(rt, frame, instr, self_val, block)? {
            Flow::Fall => ip += 1,
            Flow::Jump(label) => {
                ip = *labels
                    .get(&label)
                    .ok_or_else(|| RuntimeError::name(format!("undefined label {label}")))?;
            }
            Flow::Return(value) => return Ok(value),
        }
    }
    Ok(Value::Nil)
}

fn label_index(seq: &[Instr]) -> FastHashMap<Label, usize> {
    let mut map = fast_map_new();
    for (i, instr) in seq.iter().enumerate() {
        if let Instr::Label(label) = instr {
            map.insert(label.clone(), i);
        }
    }
    map
}

/// Interprets a single instruction: either a control-flow outcome for the
/// loop to act on, or a raised failure. No partial outcomes.
pub fn step(
    rt: &mut Runtime,
    frame: &mut Frame,
    instr: &Instr,
    self_val: &Value,
    block: Option<&Rc<Block>>,
) -> Result<Flow, RuntimeError> {
    match instr {
        Instr::Copy { result, src } => {
            let value = retrieve(rt, frame, src, self_val)?;
            frame.set(result, value);
            Ok(Flow::Fall)
        }
        Instr::LineNum { line, .. } => {
            frame.line = *line;
            Ok(Flow::Fall)
        }
        Instr::DefineMetaClass {
            result,
            object,
            template,
        } => {
            let target = retrieve(rt, frame, object, self_val)?;
            let value = define_meta_class(rt, &target, template, block)?;
            frame.set(result, value);
            Ok(Flow::Fall)
        }
        Instr::Label(_) => Ok(Flow::Fall),
        Instr::Jump(label) => Ok(Flow::Jump(label.clone())),
        Instr::Return(src) => {
            let value = retrieve(rt, frame, src, self_val)?;
            Ok(Flow::Return(value))
        }
    }
}

/// Materializes the singleton class for `target` and runs the template
/// body in it, returning the body's result.
fn define_meta_class(
    rt: &mut Runtime,
    target: &Value,
    template: &Rc<MetaClassTemplate>,
    block: Option<&Rc<Block>>,
) -> Result<Value, RuntimeError> {
    let Some(id) = target.obj_id() else {
        return Err(RuntimeError::type_error(format!(
            "no singleton class for {}",
            rt.class_name_of(target)
        )));
    };
    if rt.config.security_level >= STRICT_SECURITY_LEVEL && !rt.is_taint(id) {
        return Err(RuntimeError::security(messages::INSECURE_EXTEND));
    }

    let singleton = rt.singleton_class(id);
    rt.bind_scope(template.scope, singleton);
    let method = Method {
        name: template.name.clone(),
        visibility: Visibility::Public,
        defining_class: singleton,
        scope: template.scope,
        body: Rc::clone(&template.body),
    };
    rt.classes.add_method(singleton, method.clone());
    rt.invoke(&method, Value::Class(singleton), block)
}

/// Produces the runtime value an operand denotes.
pub fn retrieve(
    rt: &mut Runtime,
    frame: &Frame,
    operand: &Operand,
    self_val: &Value,
) -> Result<Value, RuntimeError> {
    match operand {
        Operand::Const(c) => Ok(const_value(rt, c)),
        Operand::Var(v) => frame
            .get(v)
            .cloned()
            .ok_or_else(|| RuntimeError::name(format!("undefined variable {v}"))),
        Operand::SelfRef => Ok(self_val.clone()),
        Operand::Pattern(p) => retrieve_pattern(rt, frame, p, self_val),
    }
}

fn const_value(rt: &mut Runtime, c: &Const) -> Value {
    match c {
        Const::Nil => Value::Nil,
        Const::Bool(b) => Value::Bool(*b),
        Const::Int(i) => Value::Int(*i),
        Const::Float(x) => Value::Float(*x),
        Const::Str(s) => rt.alloc_str(s.clone()),
        Const::Sym(s) => Value::sym(s),
    }
}

/// Pattern retrieval. Reuses the cached compiled form unless the operand's
/// invalidation rule says otherwise; a fresh compilation is marked as a
/// literal and becomes the new cache entry together with the encoding mode
/// it was compiled under.
fn retrieve_pattern(
    rt: &mut Runtime,
    frame: &Frame,
    pat: &PatternLit,
    self_val: &Value,
) -> Result<Value, RuntimeError> {
    let encoding = rt.config.encoding;
    if let Some(cached) = pat.cached(encoding) {
        return Ok(Value::Pattern(cached));
    }

    let source = retrieve(rt, frame, pat.source(), self_val)?;
    let text = rt.str_value(&source)?;
    let compiled = CompiledPattern::compile(&text, pat.opts(), encoding)
        .map_err(|e| RuntimeError::pattern(e.to_string()))?
        .into_literal();
    let compiled = Rc::new(compiled);
    pat.store(Rc::clone(&compiled), encoding);
    Ok(Value::Pattern(compiled))
}
