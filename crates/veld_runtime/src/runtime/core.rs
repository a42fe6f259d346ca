use std::rc::Rc;

use veld_ir::ScopeId;

use crate::core::classes::{ClassId, ClassTable, Method, WellKnown};
use crate::core::frame::Frame;
use crate::core::heap::{Heap, HeapObject, ObjData, ObjectId};
use crate::core::value::{FastHashMap, Value, fast_map_new};
use crate::errors::{RuntimeError, messages};
use crate::interp::{self, Block};

use super::config::RuntimeConfig;

/// The mutable runtime state threaded through interpretation: the object
/// heap, the class table, and host configuration.
pub struct Runtime {
    pub(crate) heap: Heap,
    pub(crate) classes: ClassTable,
    pub config: RuntimeConfig,
    pub(crate) well_known: WellKnown,
    /// Which class each template scope is currently bound to. Recorded per
    /// execution; the shared templates themselves are never written.
    scope_bindings: FastHashMap<ScopeId, ClassId>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut classes = ClassTable::new();
        let well_known = WellKnown::install(&mut classes);
        Self {
            heap: Heap::new(),
            classes,
            config,
            well_known,
            scope_bindings: fast_map_new(),
        }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn well_known(&self) -> &WellKnown {
        &self.well_known
    }

    pub fn alloc_object(&mut self) -> ObjectId {
        self.heap.alloc(HeapObject {
            class: self.well_known.object,
            taint: false,
            singleton: None,
            data: ObjData::Plain,
        })
    }

    pub fn alloc_str(&mut self, s: impl Into<String>) -> Value {
        Value::Str(self.heap.alloc(HeapObject {
            class: self.well_known.string,
            taint: false,
            singleton: None,
            data: ObjData::Str(s.into()),
        }))
    }

    pub fn set_taint(&mut self, id: ObjectId, taint: bool) {
        self.heap.get_mut(id).taint = taint;
    }

    pub fn is_taint(&self, id: ObjectId) -> bool {
        self.heap.get(id).taint
    }

    /// The class a value reports itself as, for dispatch and diagnostics.
    /// Heap objects report their base class, not their singleton.
    pub fn class_of(&self, value: &Value) -> ClassId {
        match value {
            Value::Nil => self.well_known.nil,
            Value::Bool(_) => self.well_known.boolean,
            Value::Int(_) => self.well_known.integer,
            Value::Float(_) => self.well_known.float,
            Value::Sym(_) => self.well_known.symbol,
            Value::Str(id) | Value::Obj(id) => self.heap.get(*id).class,
            Value::Class(_) => self.well_known.class,
            Value::Pattern(_) => self.well_known.pattern,
        }
    }

    pub fn class_name_of(&self, value: &Value) -> &str {
        &self.classes.get(self.class_of(value)).name
    }

    /// Gets or creates the singleton class attached to one object. The
    /// class is fully constructed before the object learns about it, so
    /// callers never observe a half-made singleton.
    pub fn singleton_class(&mut self, id: ObjectId) -> ClassId {
        if let Some(singleton) = self.heap.get(id).singleton {
            return singleton;
        }
        let base = self.heap.get(id).class;
        let name = format!("#<Class:{}>", self.classes.get(base).name);
        let singleton = self.classes.define_singleton(name, id);
        self.heap.get_mut(id).singleton = Some(singleton);
        singleton
    }

    /// Records which class a template scope is bound to for the current
    /// execution.
    pub fn bind_scope(&mut self, scope: ScopeId, class: ClassId) {
        self.scope_bindings.insert(scope, class);
    }

    pub fn scope_binding(&self, scope: ScopeId) -> Option<ClassId> {
        self.scope_bindings.get(&scope).copied()
    }

    /// Runs a method body in a fresh frame: the receiver as `self`, zero
    /// positional arguments, the caller's block passed through explicitly.
    pub fn invoke(
        &mut self,
        method: &Method,
        receiver: Value,
        block: Option<&Rc<Block>>,
    ) -> Result<Value, RuntimeError> {
        let mut frame = Frame::new(method.scope);
        interp::run_seq(self, &mut frame, &method.body, &receiver, block)
    }

    /// The string payload of a value, or a type error when it has none.
    pub fn str_value(&self, value: &Value) -> Result<String, RuntimeError> {
        if let Value::Str(id) = value {
            if let ObjData::Str(s) = &self.heap.get(*id).data {
                return Ok(s.clone());
            }
        }
        Err(RuntimeError::type_error(messages::NOT_A_STRING))
    }

    /// Renders a value for diagnostics and introspection.
    pub fn render_value(&self, value: &Value) -> String {
        match value {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Int(i) => {
                let mut buf = itoa::Buffer::new();
                buf.format(*i).to_string()
            }
            Value::Float(x) => {
                let mut buf = ryu::Buffer::new();
                buf.format(*x).to_string()
            }
            Value::Sym(s) => format!(":{s}"),
            Value::Str(id) => match &self.heap.get(*id).data {
                ObjData::Str(s) => s.clone(),
                _ => String::new(),
            },
            Value::Obj(id) => format!("#<{}>", self.classes.get(self.heap.get(*id).class).name),
            Value::Class(id) => self.classes.get(*id).name.clone(),
            Value::Pattern(p) => format!("/{}/", p.as_str()),
        }
    }
}
