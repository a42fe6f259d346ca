//! Core runtime data structures: values, heap, classes, frames.

pub mod classes;
pub mod frame;
pub mod heap;
pub mod value;

pub use classes::{Class, ClassId, ClassTable, Method, Visibility, WellKnown};
pub use frame::Frame;
pub use heap::{Heap, HeapObject, ObjData, ObjectId};
pub use value::{FastHashMap, Value, fast_hasher, fast_map_new};
