//! Persistent debate history.
//!
//! A JSON file holding completed sessions with their rendered transcripts
//! and any personalized-feedback addendum. Append, list, and delete only;
//! entries are never updated in place apart from the feedback addendum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DebateError;
use crate::judging::PersonalizedFeedback;
use crate::session::DebateSession;

/// One saved debate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub session: DebateSession,
    pub saved_at: DateTime<Utc>,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalized_feedback: Option<PersonalizedFeedback>,
}

/// File-backed history store. Newest entries first.
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Open the store at the platform data directory.
    pub fn open_default() -> Result<Self, DebateError> {
        let base = dirs::data_dir()
            .ok_or_else(|| DebateError::Config("no data directory available".to_string()))?;
        Self::open(base.join("parli").join("history.json"))
    }

    /// Open a store at an explicit path. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DebateError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "history store opened");
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), DebateError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Save a finished session. Returns the new entry's id.
    pub fn save(
        &mut self,
        session: DebateSession,
        transcript: String,
        personalized_feedback: Option<PersonalizedFeedback>,
    ) -> Result<String, DebateError> {
        let entry = HistoryEntry {
            id: format!("history-{}", Uuid::new_v4()),
            session,
            saved_at: Utc::now(),
            transcript,
            personalized_feedback,
        };
        let id = entry.id.clone();
        self.entries.insert(0, entry);
        self.flush()?;
        info!(entry = %id, "debate saved to history");
        Ok(id)
    }

    /// Attach a coaching addendum to an existing entry. The entry's session
    /// and result stay untouched.
    pub fn attach_feedback(
        &mut self,
        id: &str,
        feedback: PersonalizedFeedback,
    ) -> Result<(), DebateError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DebateError::HistoryEntryNotFound(id.to_string()))?;
        entry.personalized_feedback = Some(feedback);
        self.flush()
    }

    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), DebateError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Err(DebateError::HistoryEntryNotFound(id.to_string()));
        }
        self.flush()
    }

    pub fn clear(&mut self) -> Result<(), DebateError> {
        self.entries.clear();
        self.flush()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, role_by_id, Side};
    use crate::participant::SkillLevel;
    use crate::transcript::full_transcript;

    fn finished_session() -> DebateSession {
        let mut session = DebateSession::new(
            catalog::motion_by_id("motion-6").unwrap().clone(),
            "You",
            Side::Government,
            role_by_id("pm").unwrap(),
            SkillLevel::Advanced,
        )
        .unwrap();
        session.submit_speech("Compulsory voting works.", 340).unwrap();
        while !session.is_complete() {
            session
                .record_ai_speech("A considered reply.".to_string(), 310)
                .unwrap();
        }
        session
    }

    #[test]
    fn test_round_trip_revives_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let session = finished_session();
        let original_created = session.created_at;
        let original_speech_times: Vec<_> =
            session.speeches().iter().map(|s| s.timestamp).collect();
        let original_contents: Vec<String> = session
            .speeches()
            .iter()
            .map(|s| s.content.clone())
            .collect();
        let transcript = full_transcript(&session);

        let mut store = HistoryStore::open(&path).unwrap();
        let id = store.save(session, transcript, None).unwrap();

        // Reopen from disk and compare datetimes as datetimes.
        let reopened = HistoryStore::open(&path).unwrap();
        let entry = reopened.get(&id).unwrap();
        assert_eq!(entry.session.created_at, original_created);
        let revived: Vec<_> = entry
            .session
            .speeches()
            .iter()
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(revived, original_speech_times);
        let contents: Vec<String> = entry
            .session
            .speeches()
            .iter()
            .map(|s| s.content.clone())
            .collect();
        assert_eq!(contents, original_contents);
    }

    #[test]
    fn test_newest_first_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().join("history.json")).unwrap();

        let first = store
            .save(finished_session(), "t1".to_string(), None)
            .unwrap();
        let second = store
            .save(finished_session(), "t2".to_string(), None)
            .unwrap();

        assert_eq!(store.list().len(), 2);
        assert_eq!(store.list()[0].id, second);

        store.delete(&first).unwrap();
        assert_eq!(store.list().len(), 1);
        assert!(store.get(&first).is_none());
        assert!(matches!(
            store.delete(&first).unwrap_err(),
            DebateError::HistoryEntryNotFound(_)
        ));
    }

    #[test]
    fn test_attach_feedback_addendum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut store = HistoryStore::open(&path).unwrap();
        let id = store
            .save(finished_session(), "transcript".to_string(), None)
            .unwrap();

        let mut feedback = PersonalizedFeedback::default();
        feedback
            .criteria
            .insert("argumentQuality".to_string(), "Lead with impacts".to_string());
        store.attach_feedback(&id, feedback).unwrap();

        let reopened = HistoryStore::open(&path).unwrap();
        let entry = reopened.get(&id).unwrap();
        let stored = entry.personalized_feedback.as_ref().unwrap();
        assert_eq!(stored.criteria["argumentQuality"], "Lead with impacts");
        // The session snapshot itself is untouched.
        assert_eq!(entry.session.speeches().len(), 8);
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.list().is_empty());
    }
}
