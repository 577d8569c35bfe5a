//! Browser network adapters.

pub mod web_fetch;
