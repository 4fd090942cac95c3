pub mod store;
pub mod unlock;

pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use unlock::{GateState, UnlockGate};
