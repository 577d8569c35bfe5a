//! wasm entry points for the offline notes app.
//!
//! The worker script calls [`start_service_worker`] to hand install/activate/fetch events to
//! [`offline_cache::CacheManager`]. Pages construct a [`NotesHandle`] to list, save and delete
//! notes and to read the persisted authentication session.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod notes;
mod requests;
#[cfg(target_arch = "wasm32")]
mod service_worker;

pub use notes::{NotesApp, NotesHandle};
pub use requests::{intercepted_request, worker_cache_config};
#[cfg(target_arch = "wasm32")]
pub use service_worker::start_service_worker;
