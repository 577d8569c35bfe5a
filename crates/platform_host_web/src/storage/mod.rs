//! Browser key/value storage adapters.

pub mod local_storage;
