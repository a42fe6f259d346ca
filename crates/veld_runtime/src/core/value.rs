use std::hash::Hash;
use std::rc::Rc;

use ahash::RandomState;
use hashbrown::HashMap;
use veld_ir::CompiledPattern;

use super::classes::ClassId;
use super::heap::ObjectId;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

/// A runtime value.
///
/// `Int` and `Sym` are immediates: they carry no heap identity and cannot
/// host per-object state. Heap values compare by identity; patterns by the
/// shared compiled object.
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Sym(Rc<str>),
    Str(ObjectId),
    Obj(ObjectId),
    Class(ClassId),
    Pattern(Rc<CompiledPattern>),
}

impl Value {
    pub fn sym(name: impl AsRef<str>) -> Self {
        Value::Sym(Rc::from(name.as_ref()))
    }

    /// The heap identity behind this value, when it has one.
    pub fn obj_id(&self) -> Option<ObjectId> {
        match self {
            Value::Str(id) | Value::Obj(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Obj(a), Value::Obj(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
