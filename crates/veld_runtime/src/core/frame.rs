use veld_ir::{ScopeId, Variable};

use super::value::{FastHashMap, Value, fast_map_new};

/// Per-invocation execution context: the variable store, the current
/// source line, and the owning scope.
#[derive(Debug)]
pub struct Frame {
    vars: FastHashMap<Variable, Value>,
    pub line: u32,
    pub scope: ScopeId,
}

impl Frame {
    pub fn new(scope: ScopeId) -> Self {
        Self {
            vars: fast_map_new(),
            line: 0,
            scope,
        }
    }

    pub fn get(&self, var: &Variable) -> Option<&Value> {
        self.vars.get(var)
    }

    pub fn set(&mut self, var: &Variable, value: Value) {
        self.vars.insert(var.clone(), value);
    }
}
