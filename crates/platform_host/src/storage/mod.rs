//! Storage-domain contracts and lightweight test adapters.

mod key_value;

pub use key_value::{KeyValueStore, MemoryKeyValueStore};
