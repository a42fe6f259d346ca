use crate::instr::Instr;
use crate::operand::Variable;
use crate::subst::{FastHashMap, fast_map_new};

/// Variable renaming for one inlining site: original variable identity to
/// the fresh identity allocated in the caller. Built by the inliner,
/// consumed read-only; unmapped variables pass through unchanged.
#[derive(Debug, Default)]
pub struct InlineMap {
    renames: FastHashMap<Variable, Variable>,
}

impl InlineMap {
    pub fn new() -> Self {
        Self {
            renames: fast_map_new(),
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Variable, Variable)>) -> Self {
        let mut map = Self::new();
        for (from, to) in pairs {
            map.renames.insert(from, to);
        }
        map
    }

    pub fn rename(&self, var: &Variable) -> Variable {
        self.renames.get(var).cloned().unwrap_or_else(|| var.clone())
    }
}

/// Clones a callee instruction sequence for splicing into a caller. Label
/// freshening is the inliner's concern; only variables are renamed here.
pub fn clone_seq_for_inlining(seq: &[Instr], map: &InlineMap) -> Vec<Instr> {
    seq.iter().map(|instr| instr.clone_for_inlining(map)).collect()
}
