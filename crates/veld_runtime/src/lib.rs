//! Veld language runtime: the IR interpreter and its object model.

pub mod core;
pub mod errors;
pub mod interp;
mod runtime;

// Re-exports from core/
pub use core::classes::{Class, ClassId, ClassTable, Method, Visibility, WellKnown};
pub use core::frame::Frame;
pub use core::heap::{Heap, HeapObject, ObjData, ObjectId};
pub use core::value::{FastHashMap, Value, fast_map_new};

// Re-exports from other modules
pub use errors::{ErrorKind, RuntimeError};
pub use interp::{Block, retrieve, run_seq, step};
pub use runtime::{Flow, Runtime, RuntimeConfig, STRICT_SECURITY_LEVEL};
pub use veld_ir::{Encoding, Instr, Operand};
