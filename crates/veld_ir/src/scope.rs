use std::fmt;
use std::rc::Rc;

use crate::instr::Instr;

/// Identifies a lexical scope produced by the lowering pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Interned scope names, owned by the lowering pass.
#[derive(Debug, Default)]
pub struct ScopeTable {
    names: Vec<String>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: impl Into<String>) -> ScopeId {
        let id = ScopeId(self.names.len() as u32);
        self.names.push(name.into());
        id
    }

    pub fn name(&self, id: ScopeId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }
}

/// The body of a per-object type extension block.
///
/// Shared read-only across every execution of the instruction that defines
/// the extension: the singleton class created at each execution is
/// distinct, the body is common. The class a given execution binds the
/// scope to is recorded by the runtime, never written back here.
#[derive(Debug, PartialEq)]
pub struct MetaClassTemplate {
    pub name: String,
    pub scope: ScopeId,
    pub body: Rc<Vec<Instr>>,
}

impl MetaClassTemplate {
    pub fn new(name: impl Into<String>, scope: ScopeId, body: Vec<Instr>) -> Self {
        Self {
            name: name.into(),
            scope,
            body: Rc::new(body),
        }
    }
}
