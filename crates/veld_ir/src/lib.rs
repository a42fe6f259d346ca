//! Veld IR: the instruction/operand layer consumed by the runtime.
//!
//!
mod inline;
mod instr;
mod operand;
mod pattern;
mod scope;
mod subst;

pub use inline::*;
pub use instr::*;
pub use operand::*;
pub use pattern::*;
pub use scope::*;
pub use subst::*;
