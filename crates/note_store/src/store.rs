//! Note collection persisted as one JSON array under a single storage key.
//!
//! Every call reads the whole collection, changes it in memory and writes it back. Nothing is
//! locked: within one tab calls are serialized by the event loop, while writers in separate tabs
//! race and the last write wins.

use std::cmp::Reverse;

use leptos::logging;
use platform_host::KeyValueStore;
use serde::Deserialize;
use serde_json::Value;

use crate::{ChangeNotifier, Note, NoteStoreError, NoteSubscription};

/// Storage key holding the JSON-encoded note array.
pub const NOTES_STORAGE_KEY: &str = "notes";

/// Name of the DOM event broadcast after every save or delete.
pub const NOTES_UPDATED_EVENT: &str = "notes-updated";

/// Sole reader and writer of the persisted note collection.
#[derive(Debug)]
pub struct NoteStore<S> {
    storage: S,
    key: String,
    notifier: ChangeNotifier,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Creates a store over `storage` using [`NOTES_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, NOTES_STORAGE_KEY)
    }

    /// Creates a store over `storage` using a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            notifier: ChangeNotifier::default(),
        }
    }

    /// Returns the storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns every note, most recently created first.
    ///
    /// Ordering is computed on each call from `createdAt`; notes whose timestamp does not parse
    /// sort after the others, and ties fall back to the larger id. Missing, unreadable or
    /// malformed storage yields an empty list. Individual records that do not decode as notes
    /// are skipped.
    pub fn list_all(&self) -> Vec<Note> {
        let records = match self.read_records() {
            Ok(records) => records,
            Err(err) => {
                logging::warn!(
                    "note storage under `{}` unavailable, listing nothing: {err}",
                    self.key
                );
                return Vec::new();
            }
        };
        let mut notes = decode_notes(&self.key, &records);
        notes.sort_by_cached_key(|note| Reverse((note.created_at_ms(), note.id)));
        notes
    }

    /// Looks up one note by id.
    pub fn get(&self, id: i64) -> Option<Note> {
        self.list_all().into_iter().find(|note| note.id == id)
    }

    /// Appends `note`, persists the collection and notifies subscribers.
    ///
    /// The note is stored as given: title validation and id uniqueness are the caller's job.
    /// Stored records that do not decode as notes are written back untouched.
    ///
    /// # Errors
    ///
    /// Returns [`NoteStoreError`] when storage cannot be read or written, or when the stored
    /// value is not a JSON array (it is left in place). Subscribers are not notified in that case.
    pub fn save(&self, note: Note) -> Result<(), NoteStoreError> {
        let mut records = self.read_records()?;
        let record =
            serde_json::to_value(&note).map_err(|e| NoteStoreError::Encode(e.to_string()))?;
        records.push(record);
        self.persist(&records)?;
        self.notifier.notify();
        Ok(())
    }

    /// Removes every note with `id`, persists the collection and notifies subscribers.
    ///
    /// Deleting an unknown id leaves the collection unchanged and still notifies.
    ///
    /// # Errors
    ///
    /// Same as [`NoteStore::save`].
    pub fn delete(&self, id: i64) -> Result<(), NoteStoreError> {
        let mut records = self.read_records()?;
        records.retain(|record| record.get("id").and_then(Value::as_i64) != Some(id));
        self.persist(&records)?;
        self.notifier.notify();
        Ok(())
    }

    /// Registers a listener invoked after every successful save or delete.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> NoteSubscription {
        self.notifier.subscribe(listener)
    }

    /// Returns the notifier shared by this store's subscribers.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn read_records(&self) -> Result<Vec<Value>, NoteStoreError> {
        let Some(raw) = self
            .storage
            .get_item(&self.key)
            .map_err(NoteStoreError::Storage)?
        else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(Value::Null) => Ok(Vec::new()),
            Ok(_) => Err(NoteStoreError::Decode("expected a JSON array".to_string())),
            Err(err) => Err(NoteStoreError::Decode(err.to_string())),
        }
    }

    fn persist(&self, records: &[Value]) -> Result<(), NoteStoreError> {
        let raw =
            serde_json::to_string(records).map_err(|e| NoteStoreError::Encode(e.to_string()))?;
        self.storage
            .set_item(&self.key, &raw)
            .map_err(NoteStoreError::Storage)
    }
}

fn decode_notes(key: &str, records: &[Value]) -> Vec<Note> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match Note::deserialize(record) {
            Ok(note) => Some(note),
            Err(err) => {
                logging::warn!("skipping undecodable note #{index} under `{key}`: {err}");
                None
            }
        })
        .collect()
}
