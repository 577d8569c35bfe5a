//! Persisted outcome of the platform authentication ceremony.

use leptos::logging;
use platform_host::{iso_timestamp_from_ms, parse_iso_timestamp_ms, unix_time_ms_now, KeyValueStore};

use crate::AuthError;

/// Storage key holding the authentication flag.
pub const AUTH_STATE_KEY: &str = "authState";
/// Storage key holding the ISO-8601 session expiry.
pub const AUTH_EXPIRY_KEY: &str = "authExpiry";
/// Flag value written after a successful ceremony.
pub const AUTHENTICATED: &str = "authenticated";
/// Session length used by callers that do not pick one (24 hours).
pub const DEFAULT_SESSION_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Reads and writes the authentication flag and its expiry.
#[derive(Debug, Clone)]
pub struct AuthGate<S> {
    storage: S,
}

impl<S: KeyValueStore> AuthGate<S> {
    /// Creates a gate over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns whether a live session exists at `now_ms`.
    ///
    /// A session past its expiry, or one whose expiry cannot be parsed, is cleared and reported as
    /// signed out. A flag written without an expiry stays valid.
    pub fn is_authenticated(&self, now_ms: u64) -> bool {
        let flag = match self.storage.get_item(AUTH_STATE_KEY) {
            Ok(flag) => flag,
            Err(err) => {
                logging::warn!("auth flag read failed: {err}");
                return false;
            }
        };
        if flag.as_deref() != Some(AUTHENTICATED) {
            return false;
        }

        let expiry = match self.storage.get_item(AUTH_EXPIRY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return true,
            Err(err) => {
                logging::warn!("auth expiry read failed: {err}");
                return false;
            }
        };
        let now = i64::try_from(now_ms).unwrap_or(i64::MAX);
        match parse_iso_timestamp_ms(&expiry) {
            Some(expires_at) if now <= expires_at => true,
            Some(_) => {
                logging::log!("authentication expired at {expiry}; clearing session");
                self.clear_quietly();
                false
            }
            None => {
                logging::warn!("unparsable auth expiry `{expiry}`; clearing session");
                self.clear_quietly();
                false
            }
        }
    }

    /// [`Self::is_authenticated`] against the current wall clock.
    pub fn is_authenticated_now(&self) -> bool {
        self.is_authenticated(unix_time_ms_now())
    }

    /// Returns the stored expiry in unix milliseconds, if any parses.
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.storage
            .get_item(AUTH_EXPIRY_KEY)
            .ok()
            .flatten()
            .and_then(|raw| parse_iso_timestamp_ms(&raw))
    }

    /// Records a successful ceremony valid for `ttl_ms` from `now_ms`.
    ///
    /// Returns the written expiry timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] when either key cannot be written.
    pub fn mark_authenticated(&self, now_ms: u64, ttl_ms: u64) -> Result<String, AuthError> {
        let expiry = iso_timestamp_from_ms(now_ms.saturating_add(ttl_ms));
        self.storage
            .set_item(AUTH_STATE_KEY, AUTHENTICATED)
            .map_err(AuthError::Storage)?;
        self.storage
            .set_item(AUTH_EXPIRY_KEY, &expiry)
            .map_err(AuthError::Storage)?;
        Ok(expiry)
    }

    /// Removes both session keys.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] when a key cannot be removed.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.storage
            .remove_item(AUTH_STATE_KEY)
            .map_err(AuthError::Storage)?;
        self.storage
            .remove_item(AUTH_EXPIRY_KEY)
            .map_err(AuthError::Storage)
    }

    fn clear_quietly(&self) {
        if let Err(err) = self.sign_out() {
            logging::warn!("failed to clear expired session: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    use super::*;

    const JAN_1_2024: u64 = 1_704_067_200_000;

    #[test]
    fn fresh_storage_is_signed_out() {
        let gate = AuthGate::new(MemoryKeyValueStore::default());
        assert!(!gate.is_authenticated(JAN_1_2024));
        assert_eq!(gate.expires_at_ms(), None);
    }

    #[test]
    fn session_is_live_until_expiry_inclusive() {
        let gate = AuthGate::new(MemoryKeyValueStore::default());
        let expiry = gate
            .mark_authenticated(JAN_1_2024, 60_000)
            .expect("mark");
        assert_eq!(expiry, "2024-01-01T00:01:00.000Z");
        assert_eq!(gate.expires_at_ms(), Some(1_704_067_260_000));

        assert!(gate.is_authenticated(JAN_1_2024));
        assert!(gate.is_authenticated(JAN_1_2024 + 60_000));
    }

    #[test]
    fn expired_session_clears_both_keys() {
        let storage = MemoryKeyValueStore::default();
        let gate = AuthGate::new(storage.clone());
        gate.mark_authenticated(JAN_1_2024, 1_000).expect("mark");

        assert!(!gate.is_authenticated(JAN_1_2024 + 1_001));
        assert_eq!(storage.get_item(AUTH_STATE_KEY).expect("read"), None);
        assert_eq!(storage.get_item(AUTH_EXPIRY_KEY).expect("read"), None);
        assert!(!gate.is_authenticated(JAN_1_2024));
    }

    #[test]
    fn unparsable_expiry_signs_out() {
        let storage = MemoryKeyValueStore::default();
        storage.set_item(AUTH_STATE_KEY, AUTHENTICATED).expect("seed");
        storage.set_item(AUTH_EXPIRY_KEY, "someday").expect("seed");
        let gate = AuthGate::new(storage.clone());

        assert!(!gate.is_authenticated(JAN_1_2024));
        assert!(storage.is_empty());
    }

    #[test]
    fn flag_without_expiry_is_honoured() {
        let storage = MemoryKeyValueStore::default();
        storage.set_item(AUTH_STATE_KEY, AUTHENTICATED).expect("seed");
        let gate = AuthGate::new(storage);
        assert!(gate.is_authenticated(u64::MAX));
    }

    #[test]
    fn other_flag_values_are_not_authenticated() {
        let storage = MemoryKeyValueStore::default();
        storage.set_item(AUTH_STATE_KEY, "pending").expect("seed");
        assert!(!AuthGate::new(storage).is_authenticated(JAN_1_2024));
    }

    #[test]
    fn sign_out_removes_session() {
        let storage = MemoryKeyValueStore::default();
        let gate = AuthGate::new(storage.clone());
        gate.mark_authenticated(JAN_1_2024, DEFAULT_SESSION_TTL_MS)
            .expect("mark");
        gate.sign_out().expect("sign out");
        assert!(storage.is_empty());
        assert!(!gate.is_authenticated(JAN_1_2024));
    }
}
