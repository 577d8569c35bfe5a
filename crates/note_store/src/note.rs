//! Note records, editor drafts and share payloads.

use platform_host::{iso_timestamp_from_ms, next_monotonic_timestamp_ms, parse_iso_timestamp_ms};
use serde::{Deserialize, Deserializer, Serialize};

use crate::NoteDraftError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A saved note. Notes are immutable once saved.
pub struct Note {
    /// Creation time in unix milliseconds, unique within the collection.
    pub id: i64,
    /// Non-empty title.
    pub title: String,
    /// Body text; absent or `null` in storage decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// ISO-8601 creation timestamp. Absent or `null` decodes as empty and sorts last.
    #[serde(rename = "createdAt", default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Note {
    /// Builds a note from explicit parts.
    pub fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            created_at: created_at.into(),
        }
    }

    /// Returns `created_at` in unix milliseconds, or `None` when it does not parse.
    pub fn created_at_ms(&self) -> Option<i64> {
        parse_iso_timestamp_ms(&self.created_at)
    }

    /// Builds the Web Share payload for this note.
    pub fn share_data(&self) -> ShareData {
        ShareData {
            title: self.title.clone(),
            text: self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Payload handed to `navigator.share`.
pub struct ShareData {
    /// Shared title.
    pub title: String,
    /// Shared body text.
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// In-progress note held by the editor before saving.
pub struct NoteDraft {
    /// Title as typed.
    pub title: String,
    /// Body as typed or dictated.
    pub content: String,
}

impl NoteDraft {
    /// Creates a draft.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Appends a speech-to-text transcript, separated from existing content by one space.
    pub fn append_transcript(&mut self, transcript: &str) {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return;
        }
        if !self.content.is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(transcript);
    }

    /// Checks that the draft can be saved.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDraftError::EmptyTitle`] when the trimmed title is empty.
    pub fn validate(&self) -> Result<(), NoteDraftError> {
        if self.title.trim().is_empty() {
            return Err(NoteDraftError::EmptyTitle);
        }
        Ok(())
    }

    /// Clears title and content after a successful save.
    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }

    /// Turns the draft into a note stamped with a fresh monotonic id and matching timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDraftError::EmptyTitle`] when the trimmed title is empty.
    pub fn into_note(self) -> Result<Note, NoteDraftError> {
        self.validate()?;
        Ok(self.stamp(next_monotonic_timestamp_ms()))
    }

    /// Turns the draft into a note created at `unix_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDraftError::EmptyTitle`] when the trimmed title is empty.
    pub fn into_note_at(self, unix_ms: u64) -> Result<Note, NoteDraftError> {
        self.validate()?;
        Ok(self.stamp(unix_ms))
    }

    fn stamp(self, unix_ms: u64) -> Note {
        Note {
            id: i64::try_from(unix_ms).unwrap_or(i64::MAX),
            title: self.title,
            content: self.content,
            created_at: iso_timestamp_from_ms(unix_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn note_json_uses_browser_field_names() {
        let note = Note::new(1, "A", "x", "2024-01-01T00:00:00Z");
        let raw = serde_json::to_string(&note).expect("serialize");
        assert_eq!(
            raw,
            r#"{"id":1,"title":"A","content":"x","createdAt":"2024-01-01T00:00:00Z"}"#
        );
    }

    #[test]
    fn absent_content_decodes_as_empty() {
        let note: Note =
            serde_json::from_str(r#"{"id":7,"title":"T","createdAt":"2024-01-01T00:00:00Z"}"#)
                .expect("decode");
        assert_eq!(note.content, "");
        assert_eq!(note.created_at_ms(), Some(1_704_067_200_000));
    }

    #[test]
    fn null_content_and_missing_timestamp_still_decode() {
        let note: Note =
            serde_json::from_str(r#"{"id":2,"title":"legacy","content":null}"#).expect("decode");
        assert_eq!(note, Note::new(2, "legacy", "", ""));
        assert_eq!(note.created_at_ms(), None);
    }

    #[test]
    fn draft_rejects_blank_title() {
        assert_eq!(
            NoteDraft::new("   ", "body").into_note(),
            Err(NoteDraftError::EmptyTitle)
        );
        assert_eq!(NoteDraft::default().validate(), Err(NoteDraftError::EmptyTitle));
    }

    #[test]
    fn draft_stamps_matching_id_and_timestamp() {
        let note = NoteDraft::new("Groceries", "milk")
            .into_note_at(1_704_067_200_000)
            .expect("note");
        assert_eq!(
            note,
            Note::new(1_704_067_200_000, "Groceries", "milk", "2024-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn consecutive_drafts_get_distinct_ids() {
        let first = NoteDraft::new("a", "").into_note().expect("first");
        let second = NoteDraft::new("b", "").into_note().expect("second");
        assert!(second.id > first.id);
    }

    #[test]
    fn transcripts_are_appended_with_single_space() {
        let mut draft = NoteDraft::new("Call", "");
        draft.append_transcript("  buy bread ");
        assert_eq!(draft.content, "buy bread");
        draft.append_transcript("and eggs");
        assert_eq!(draft.content, "buy bread and eggs");
        draft.append_transcript("   ");
        assert_eq!(draft.content, "buy bread and eggs");
        draft.clear();
        assert_eq!(draft, NoteDraft::default());
    }

    #[test]
    fn share_payload_maps_content_to_text() {
        let note = Note::new(3, "Trip", "pack charger", "2024-05-01T10:00:00Z");
        assert_eq!(
            note.share_data(),
            ShareData {
                title: "Trip".to_string(),
                text: "pack charger".to_string(),
            }
        );
    }
}
