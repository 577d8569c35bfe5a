//! Page-side notes API exported to JavaScript.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use leptos::logging;
use note_store::{
    AuthGate, Note, NoteDraft, NoteStore, NoteSubscription, NOTES_UPDATED_EVENT,
};
use platform_host::{unix_time_ms_now, KeyValueStore};
use platform_host_web::{dispatch_window_event, key_value_store, KeyValueStoreAdapter};
use wasm_bindgen::prelude::*;

/// Note store, auth gate and listener tokens sharing one key/value backend.
pub struct NotesApp<S> {
    store: NoteStore<S>,
    auth: AuthGate<S>,
    listeners: RefCell<BTreeMap<u64, NoteSubscription>>,
}

impl<S: KeyValueStore + Clone> NotesApp<S> {
    /// Creates an app over `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            store: NoteStore::new(storage.clone()),
            auth: AuthGate::new(storage),
            listeners: RefCell::new(BTreeMap::new()),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    /// Returns all notes, newest first, as a JSON array.
    pub fn list_json(&self) -> Result<String, String> {
        serde_json::to_string(&self.store.list_all()).map_err(|e| e.to_string())
    }

    /// Validates and saves a new note, returning it.
    pub fn save(&self, title: &str, content: &str) -> Result<Note, String> {
        let note = NoteDraft::new(title, content)
            .into_note()
            .map_err(|e| e.to_string())?;
        self.store.save(note.clone()).map_err(|e| e.to_string())?;
        Ok(note)
    }

    /// Deletes the note with `id`.
    pub fn delete(&self, id: i64) -> Result<(), String> {
        self.store.delete(id).map_err(|e| e.to_string())
    }

    /// Registers a change listener and returns its token.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> u64 {
        let subscription = self.store.subscribe(listener);
        let token = subscription.id();
        self.listeners.borrow_mut().insert(token, subscription);
        token
    }

    /// Removes the listener registered under `token`.
    pub fn unsubscribe(&self, token: u64) -> bool {
        let subscription = self.listeners.borrow_mut().remove(&token);
        subscription.is_some_and(NoteSubscription::unsubscribe)
    }

    /// Whether a live authentication session exists at `now_ms`.
    pub fn is_authenticated(&self, now_ms: u64) -> bool {
        self.auth.is_authenticated(now_ms)
    }

    /// Records a session valid for `ttl_ms` from `now_ms` and returns its expiry.
    pub fn mark_authenticated(&self, now_ms: u64, ttl_ms: u64) -> Result<String, String> {
        self.auth
            .mark_authenticated(now_ms, ttl_ms)
            .map_err(|e| e.to_string())
    }

    /// Clears the authentication session.
    pub fn sign_out(&self) -> Result<(), String> {
        self.auth.sign_out().map_err(|e| e.to_string())
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Converts a JavaScript number into an exact integer.
///
/// NaN, infinities, fractions and magnitudes beyond `Number.MAX_SAFE_INTEGER` are rejected
/// instead of being truncated.
fn js_integer(value: f64, what: &str) -> Result<i64, String> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER {
        return Err(format!("{what} must be a safe integer, got {value}"));
    }
    Ok(value as i64)
}

fn js_unsigned(value: f64, what: &str) -> Result<u64, String> {
    let value = js_integer(value, what)?;
    u64::try_from(value).map_err(|_| format!("{what} must not be negative, got {value}"))
}

/// JavaScript handle over the browser's `localStorage` notes.
///
/// Every save or delete also dispatches a `notes-updated` event on `window`.
#[wasm_bindgen]
pub struct NotesHandle {
    app: NotesApp<Rc<KeyValueStoreAdapter>>,
    _broadcast: NoteSubscription,
}

#[wasm_bindgen]
impl NotesHandle {
    /// Opens the notes stored in this browser.
    #[wasm_bindgen(constructor)]
    pub fn new() -> NotesHandle {
        let app = NotesApp::new(Rc::new(key_value_store()));
        let broadcast = app.store().subscribe(|| {
            if let Err(err) = dispatch_window_event(NOTES_UPDATED_EVENT) {
                logging::warn!("{NOTES_UPDATED_EVENT} broadcast failed: {err}");
            }
        });
        NotesHandle {
            app,
            _broadcast: broadcast,
        }
    }

    /// Returns all notes, newest first, as a JSON string.
    pub fn list(&self) -> Result<String, JsValue> {
        self.app.list_json().map_err(|e| JsValue::from_str(&e))
    }

    /// Saves a new note and returns it as a JSON string.
    pub fn save(&self, title: &str, content: &str) -> Result<String, JsValue> {
        let note = self.app.save(title, content).map_err(|e| JsValue::from_str(&e))?;
        serde_json::to_string(&note).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deletes the note with `id`.
    pub fn delete(&self, id: f64) -> Result<(), JsValue> {
        let id = js_integer(id, "note id").map_err(|e| JsValue::from_str(&e))?;
        self.app.delete(id).map_err(|e| JsValue::from_str(&e))
    }

    /// Calls `callback` after every change; returns a token for [`NotesHandle::unsubscribe`].
    pub fn subscribe(&self, callback: js_sys::Function) -> f64 {
        self.app.subscribe(move || {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                logging::warn!("notes listener threw: {err:?}");
            }
        }) as f64
    }

    /// Removes a listener added with [`NotesHandle::subscribe`].
    pub fn unsubscribe(&self, token: f64) -> Result<bool, JsValue> {
        let token = js_unsigned(token, "listener token").map_err(|e| JsValue::from_str(&e))?;
        Ok(self.app.unsubscribe(token))
    }

    /// Whether the persisted authentication session is still live.
    #[wasm_bindgen(js_name = isAuthenticated)]
    pub fn is_authenticated(&self) -> bool {
        self.app.is_authenticated(unix_time_ms_now())
    }

    /// Records a session valid for `ttl_ms` milliseconds and returns its ISO expiry.
    #[wasm_bindgen(js_name = markAuthenticated)]
    pub fn mark_authenticated(&self, ttl_ms: f64) -> Result<String, JsValue> {
        let ttl_ms = js_unsigned(ttl_ms, "session ttl").map_err(|e| JsValue::from_str(&e))?;
        self.app
            .mark_authenticated(unix_time_ms_now(), ttl_ms)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Clears the authentication session.
    #[wasm_bindgen(js_name = signOut)]
    pub fn sign_out(&self) -> Result<(), JsValue> {
        self.app.sign_out().map_err(|e| JsValue::from_str(&e))
    }
}

impl Default for NotesHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use note_store::{AUTH_EXPIRY_KEY, AUTH_STATE_KEY, NOTES_STORAGE_KEY};
    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn save_then_list_round_trips_through_storage() {
        let storage = MemoryKeyValueStore::default();
        let app = NotesApp::new(storage.clone());
        let saved = app.save("Groceries", "milk").expect("save");

        let listed: Vec<Note> =
            serde_json::from_str(&app.list_json().expect("list")).expect("decode");
        assert_eq!(listed, vec![saved.clone()]);
        assert!(storage
            .get_item(NOTES_STORAGE_KEY)
            .expect("read")
            .is_some_and(|raw| raw.contains("\"createdAt\"")));

        app.delete(saved.id).expect("delete");
        assert_eq!(app.list_json().expect("list"), "[]");
    }

    #[test]
    fn blank_title_is_rejected_before_storage() {
        let storage = MemoryKeyValueStore::default();
        let app = NotesApp::new(storage.clone());
        assert_eq!(
            app.save("  ", "body"),
            Err("note title must not be empty".to_string())
        );
        assert!(storage.is_empty());
    }

    #[test]
    fn tokens_unsubscribe_listeners() {
        let app = NotesApp::new(MemoryKeyValueStore::default());
        let hits = Rc::new(Cell::new(0));
        let token = {
            let hits = Rc::clone(&hits);
            app.subscribe(move || hits.set(hits.get() + 1))
        };

        app.save("a", "").expect("save");
        assert!(app.unsubscribe(token));
        assert!(!app.unsubscribe(token));
        app.save("b", "").expect("save");
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn js_numbers_must_be_exact_integers() {
        assert_eq!(js_integer(1_704_067_200_000.0, "note id"), Ok(1_704_067_200_000));
        assert_eq!(js_integer(-3.0, "note id"), Ok(-3));
        for bad in [f64::NAN, f64::INFINITY, 1.5, 1e300] {
            assert!(js_integer(bad, "note id").is_err(), "{bad} accepted");
        }
        assert_eq!(js_unsigned(7.0, "listener token"), Ok(7));
        assert_eq!(
            js_unsigned(-1.0, "listener token"),
            Err("listener token must not be negative, got -1".to_string())
        );
    }

    #[test]
    fn auth_session_shares_storage_with_notes() {
        let storage = MemoryKeyValueStore::default();
        let app = NotesApp::new(storage.clone());
        app.mark_authenticated(1_000, 500).expect("mark");
        assert!(app.is_authenticated(1_500));
        assert_eq!(
            storage.get_item(AUTH_STATE_KEY).expect("read").as_deref(),
            Some("authenticated")
        );

        app.sign_out().expect("sign out");
        assert_eq!(storage.get_item(AUTH_EXPIRY_KEY).expect("read"), None);
        assert!(!app.is_authenticated(1_500));
    }
}
