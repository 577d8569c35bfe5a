//! Local note collection for the offline notes app.
//!
//! [`NoteStore`] owns the JSON-encoded note array kept under one key of a
//! [`platform_host::KeyValueStore`] and notifies subscribers after every save or delete. The crate
//! also carries the editor-side pieces that feed it ([`NoteDraft`], [`ShareData`], display
//! escaping) and the persisted authentication flag ([`AuthGate`]).

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod auth;
pub mod display;
mod error;
mod note;
mod store;
mod subscription;

pub use auth::{AuthGate, AUTHENTICATED, AUTH_EXPIRY_KEY, AUTH_STATE_KEY, DEFAULT_SESSION_TTL_MS};
pub use display::{escape_html, linkify};
pub use error::{AuthError, NoteDraftError, NoteStoreError};
pub use note::{Note, NoteDraft, ShareData};
pub use store::{NoteStore, NOTES_STORAGE_KEY, NOTES_UPDATED_EVENT};
pub use subscription::{ChangeNotifier, NoteSubscription};
