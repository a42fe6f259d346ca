use std::rc::Rc;

use ahash::RandomState;
use indexmap::IndexMap;
use veld_ir::{Instr, ScopeId};

use super::heap::ObjectId;
use super::value::fast_hasher;

/// Identifies a class in the class table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// An interpreted method: a shared IR body bound to its defining class.
#[derive(Clone, Debug)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    pub defining_class: ClassId,
    pub scope: ScopeId,
    pub body: Rc<Vec<Instr>>,
}

/// A class. Singleton classes are per-object type extensions attached to
/// exactly one object.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub singleton: bool,
    pub attached_to: Option<ObjectId>,
    /// Methods in definition order.
    pub methods: IndexMap<String, Method, RandomState>,
}

/// Well-known classes installed at startup.
#[derive(Clone, Copy, Debug)]
pub struct WellKnown {
    pub object: ClassId,
    pub nil: ClassId,
    pub boolean: ClassId,
    pub integer: ClassId,
    pub float: ClassId,
    pub symbol: ClassId,
    pub string: ClassId,
    pub pattern: ClassId,
    pub class: ClassId,
}

impl WellKnown {
    pub fn install(table: &mut ClassTable) -> Self {
        Self {
            object: table.define("Object"),
            nil: table.define("NilClass"),
            boolean: table.define("Boolean"),
            integer: table.define("Integer"),
            float: table.define("Float"),
            symbol: table.define("Symbol"),
            string: table.define("String"),
            pattern: table.define("Pattern"),
            class: table.define("Class"),
        }
    }
}

#[derive(Debug)]
pub struct ClassTable {
    classes: Vec<Class>,
    /// Named (non-singleton) classes in definition order.
    names: IndexMap<String, ClassId, RandomState>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            names: IndexMap::with_hasher(fast_hasher()),
        }
    }

    pub fn define(&mut self, name: &str) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(Class {
            name: name.to_string(),
            singleton: false,
            attached_to: None,
            methods: IndexMap::with_hasher(fast_hasher()),
        });
        self.names.insert(name.to_string(), id);
        id
    }

    /// Singleton classes are anonymous as far as the name index goes; they
    /// are reachable only through the object they are attached to.
    pub fn define_singleton(&mut self, name: String, attached_to: ObjectId) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(Class {
            name,
            singleton: true,
            attached_to: Some(attached_to),
            methods: IndexMap::with_hasher(fast_hasher()),
        });
        id
    }

    pub fn get(&self, id: ClassId) -> &Class {
        &self.classes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.0 as usize]
    }

    pub fn add_method(&mut self, class: ClassId, method: Method) {
        self.get_mut(class).methods.insert(method.name.clone(), method);
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).copied()
    }
}
