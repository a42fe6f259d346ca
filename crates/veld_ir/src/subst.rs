use std::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::instr::Instr;
use crate::operand::{Operand, Variable};

pub type FastHashMap<K, V> = HashMap<K, V, ahash::RandomState>;

pub fn fast_hasher() -> ahash::RandomState {
    ahash::RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

/// A substitution map built by the optimizer. Each entry records that a
/// variable has been proven equal to some other operand; values are
/// expected in already-simplified form.
#[derive(Debug, Default)]
pub struct SubstMap {
    entries: FastHashMap<Variable, Operand>,
}

impl SubstMap {
    pub fn new() -> Self {
        Self {
            entries: fast_map_new(),
        }
    }

    pub fn bind(&mut self, var: Variable, value: Operand) {
        self.entries.insert(var, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the replacement for a variable, following variable-to-
    /// variable chains to their fixpoint so that applying the map twice
    /// equals applying it once. A cyclic proof chain yields no
    /// replacement; the operand stays as it was.
    pub fn resolve(&self, var: &Variable) -> Option<Operand> {
        let mut current = self.entries.get(var)?;
        let mut seen: SmallVec<[&Variable; 4]> = SmallVec::new();
        seen.push(var);
        while let Operand::Var(v) = current {
            if seen.contains(&v) {
                return None;
            }
            match self.entries.get(v) {
                Some(next) => {
                    seen.push(v);
                    current = next;
                }
                None => break,
            }
        }
        Some(current.clone())
    }
}

/// Applies one substitution pass over a sequence. The fixpoint driver
/// around repeated passes belongs to the optimizer.
pub fn simplify_seq(seq: &mut [Instr], map: &SubstMap) {
    for instr in seq {
        instr.simplify_operands(map);
    }
}
