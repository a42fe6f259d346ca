use std::rc::Rc;

use veld_ir::{Instr, MetaClassTemplate, Operand, ScopeTable, Variable};
use veld_runtime::{
    Block, ErrorKind, Frame, Runtime, RuntimeConfig, STRICT_SECURITY_LEVEL, Value, run_seq,
};

fn body_template(scopes: &mut ScopeTable, body: Vec<Instr>) -> Rc<MetaClassTemplate> {
    Rc::new(MetaClassTemplate::new(
        "extension body",
        scopes.intern("extension"),
        body,
    ))
}

fn define_instr(object: Operand, template: &Rc<MetaClassTemplate>) -> Instr {
    Instr::DefineMetaClass {
        result: Variable::new("r"),
        object,
        template: Rc::clone(template),
    }
}

fn strict_config() -> RuntimeConfig {
    RuntimeConfig {
        security_level: STRICT_SECURITY_LEVEL,
        ..RuntimeConfig::default()
    }
}

#[test]
fn metaclass_on_an_integer_is_a_type_error_at_any_level() {
    for level in [0, STRICT_SECURITY_LEVEL] {
        let mut rt = Runtime::with_config(RuntimeConfig {
            security_level: level,
            ..RuntimeConfig::default()
        });
        let mut scopes = ScopeTable::new();
        let template = body_template(&mut scopes, vec![Instr::Return(Operand::int(42))]);
        let mut frame = Frame::new(scopes.intern("main"));

        let seq = [define_instr(Operand::int(5), &template)];
        let err = run_seq(&mut rt, &mut frame, &seq, &Value::Nil, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("Integer"), "message: {}", err.message);
    }
}

#[test]
fn metaclass_on_a_symbol_is_a_type_error() {
    let mut rt = Runtime::new();
    let mut scopes = ScopeTable::new();
    let template = body_template(&mut scopes, vec![Instr::Return(Operand::int(42))]);
    let mut frame = Frame::new(scopes.intern("main"));

    let seq = [define_instr(Operand::sym("tag"), &template)];
    let err = run_seq(&mut rt, &mut frame, &seq, &Value::Nil, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("Symbol"), "message: {}", err.message);
}

#[test]
fn strict_level_rejects_untainted_objects() {
    let mut rt = Runtime::with_config(strict_config());
    let mut scopes = ScopeTable::new();
    let template = body_template(&mut scopes, vec![Instr::Return(Operand::int(42))]);
    let mut frame = Frame::new(scopes.intern("main"));

    let object = rt.alloc_object();
    frame.set(&Variable::new("o"), Value::Obj(object));

    let seq = [define_instr(Operand::var("o"), &template)];
    let err = run_seq(&mut rt, &mut frame, &seq, &Value::Nil, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Security);
    // Nothing was half-done: the object still has no singleton class.
    assert!(rt.heap().get(object).singleton.is_none());
}

#[test]
fn strict_level_allows_tainted_objects() {
    let mut rt = Runtime::with_config(strict_config());
    let mut scopes = ScopeTable::new();
    let template = body_template(&mut scopes, vec![Instr::Return(Operand::int(42))]);
    let mut frame = Frame::new(scopes.intern("main"));

    let object = rt.alloc_object();
    rt.set_taint(object, true);
    frame.set(&Variable::new("o"), Value::Obj(object));

    // The caller's active block rides along into the body invocation.
    let block = Rc::new(Block {
        scope: scopes.intern("caller block"),
        body: Rc::new(Vec::new()),
    });
    let seq = [define_instr(Operand::var("o"), &template)];
    run_seq(&mut rt, &mut frame, &seq, &Value::Nil, Some(&block)).unwrap();
    assert_eq!(frame.get(&Variable::new("r")), Some(&Value::Int(42)));
}

#[test]
fn non_strict_level_allows_untainted_objects() {
    let mut rt = Runtime::new();
    let mut scopes = ScopeTable::new();
    let template = body_template(&mut scopes, vec![Instr::Return(Operand::int(42))]);
    let mut frame = Frame::new(scopes.intern("main"));

    let object = rt.alloc_object();
    frame.set(&Variable::new("o"), Value::Obj(object));

    let seq = [define_instr(Operand::var("o"), &template)];
    run_seq(&mut rt, &mut frame, &seq, &Value::Nil, None).unwrap();
    assert_eq!(frame.get(&Variable::new("r")), Some(&Value::Int(42)));
}

#[test]
fn singleton_class_is_created_once_and_carries_the_body_method() {
    let mut rt = Runtime::new();
    let mut scopes = ScopeTable::new();
    let template = body_template(&mut scopes, vec![Instr::Return(Operand::int(42))]);
    let mut frame = Frame::new(scopes.intern("main"));

    let object = rt.alloc_object();
    frame.set(&Variable::new("o"), Value::Obj(object));

    let seq = [define_instr(Operand::var("o"), &template)];
    run_seq(&mut rt, &mut frame, &seq, &Value::Nil, None).unwrap();
    let singleton = rt.heap().get(object).singleton.expect("singleton class");

    // A second execution reuses the same singleton class.
    run_seq(&mut rt, &mut frame, &seq, &Value::Nil, None).unwrap();
    assert_eq!(rt.heap().get(object).singleton, Some(singleton));

    let class = rt.classes().get(singleton);
    assert!(class.singleton);
    assert_eq!(class.name, "#<Class:Object>");
    assert_eq!(class.attached_to, Some(object));
    let method = class.methods.get("extension body").expect("bound method");
    assert_eq!(method.visibility, veld_runtime::Visibility::Public);
    assert_eq!(method.defining_class, singleton);

    // The base class is untouched; the extension is per object.
    assert!(rt.classes().get(rt.well_known().object).methods.is_empty());

    // The template scope is associated with the singleton for this
    // execution, without the template itself being written.
    assert_eq!(rt.scope_binding(template.scope), Some(singleton));
}

#[test]
fn metaclass_body_runs_with_the_singleton_as_receiver() {
    let mut rt = Runtime::new();
    let mut scopes = ScopeTable::new();
    let template = body_template(&mut scopes, vec![Instr::Return(Operand::SelfRef)]);
    let mut frame = Frame::new(scopes.intern("main"));

    let object = rt.alloc_object();
    frame.set(&Variable::new("o"), Value::Obj(object));

    let seq = [define_instr(Operand::var("o"), &template)];
    run_seq(&mut rt, &mut frame, &seq, &Value::Nil, None).unwrap();

    let singleton = rt.heap().get(object).singleton.expect("singleton class");
    assert_eq!(
        frame.get(&Variable::new("r")),
        Some(&Value::Class(singleton))
    );
}
