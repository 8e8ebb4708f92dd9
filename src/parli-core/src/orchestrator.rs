//! Debate orchestration.
//!
//! Composes the session state machine with the generation client and the
//! response parser: builds the prompt each turn demands, hands the model's
//! output through the matching validator profile, and applies the result to
//! the session. Failed calls never advance the turn or the phase; the same
//! action can simply be invoked again.

use rand::Rng;
use tracing::{info, warn};

use crate::catalog::{Motion, Role, Side};
use crate::client::GenerationClient;
use crate::error::DebateError;
use crate::history::HistoryStore;
use crate::judging::PersonalizedFeedback;
use crate::parser::{self, CasePrep};
use crate::participant::SkillLevel;
use crate::prompts;
use crate::session::{DebatePhase, DebateSession};
use crate::transcript;

/// Drives one debate session at a time against the generation client, and
/// hands finished sessions to the history store.
pub struct DebateOrchestrator {
    client: GenerationClient,
    history: HistoryStore,
    session: Option<DebateSession>,
}

impl DebateOrchestrator {
    pub fn new(client: GenerationClient, history: HistoryStore) -> Self {
        Self {
            client,
            history,
            session: None,
        }
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut GenerationClient {
        &mut self.client
    }

    pub fn session(&self) -> Option<&DebateSession> {
        self.session.as_ref()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    /// Start a new session, replacing any current one.
    pub fn create_session(
        &mut self,
        motion: Motion,
        human_name: &str,
        human_side: Side,
        human_role: &Role,
        ai_skill: SkillLevel,
    ) -> Result<&DebateSession, DebateError> {
        let session = DebateSession::new(motion, human_name, human_side, human_role, ai_skill)?;
        Ok(self.session.insert(session))
    }

    /// Discard the current session. Nothing is persisted; a caller wishing
    /// to keep history must have saved it already.
    pub fn reset_session(&mut self) {
        self.session = None;
    }

    fn session_mut(&mut self) -> Result<&mut DebateSession, DebateError> {
        self.session.as_mut().ok_or(DebateError::NoSession)
    }

    fn session_ref(&self) -> Result<&DebateSession, DebateError> {
        self.session.as_ref().ok_or(DebateError::NoSession)
    }

    /// Record the human's speech for the current turn.
    pub fn submit_speech(
        &mut self,
        content: impl Into<String>,
        time_used: u32,
    ) -> Result<(), DebateError> {
        self.session_mut()?.submit_speech(content, time_used)?;
        Ok(())
    }

    /// Generate a case preparation for one side of a motion. Independent of
    /// any session; typically run before the debate starts.
    pub async fn prepare_case(
        &self,
        motion: &Motion,
        side: Side,
        skill: SkillLevel,
    ) -> Result<CasePrep, DebateError> {
        let prompt = prompts::case_prep(motion, side, skill);
        let raw = self.client.generate(&prompt).await?;
        parser::parse_case_prep(&raw)
    }

    /// Generate and append the speech for the synthetic debater due to
    /// speak. On any failure the turn does not advance and the in-flight
    /// guard clears, so the call can be retried as-is.
    pub async fn generate_ai_speech(&mut self) -> Result<(), DebateError> {
        self.session_mut()?.begin_generation()?;

        let (prompt, time_limit, debater_name) = {
            let session = self.session_ref()?;
            // The guard guarantees an AI speaker is due.
            let role = session.current_speaker().ok_or(DebateError::NotAiTurn)?;
            let debater = session
                .participants
                .debater_for_role(&role.id)
                .ok_or(DebateError::NotAiTurn)?;
            (
                prompts::speech(&session.motion, session.speeches(), role, debater.skill),
                role.time_limit,
                debater.name.clone(),
            )
        };

        info!(debater = %debater_name, "generating speech");
        let outcome = match self.client.generate(&prompt).await {
            Ok(raw) => parser::parse_speech(&raw),
            Err(err) => Err(err),
        };

        let session = self.session_mut()?;
        session.finish_generation();
        match outcome {
            Ok(content) => {
                let time_used = synthesized_time_used(time_limit);
                session.record_ai_speech(content, time_used)?;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "speech generation failed, turn not advanced");
                Err(err)
            }
        }
    }

    /// Request adjudication for a finished debate. On success the result is
    /// attached to the session and the session completes; on failure the
    /// session recovers to the debating phase with the speech log intact.
    pub async fn complete_debate(&mut self) -> Result<(), DebateError> {
        self.session_mut()?.begin_adjudication()?;

        let prompt = {
            let session = self.session_ref()?;
            prompts::adjudication(&session.motion, session.speeches())
        };

        let outcome = match self.client.generate(&prompt).await {
            Ok(raw) => parser::parse_adjudication(&raw),
            Err(err) => Err(err),
        };

        let session = self.session_mut()?;
        match outcome {
            Ok(result) => {
                session.attach_result(result)?;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "adjudication failed, session recovered to debating");
                session.abort_adjudication()?;
                Err(err)
            }
        }
    }

    /// Persist the completed session with its rendered transcript. Returns
    /// the history entry id. Safe to retry; each attempt saves a fresh
    /// entry only on success.
    pub fn save_to_history(&mut self) -> Result<String, DebateError> {
        let session = self.session_ref()?;
        if session.phase() != DebatePhase::Completed {
            return Err(DebateError::WrongPhase {
                expected: DebatePhase::Completed,
                actual: session.phase(),
            });
        }
        let rendered = transcript::full_transcript(session);
        let snapshot = session.clone();
        self.history.save(snapshot, rendered, None)
    }

    /// Request the personalized coaching pass for a saved debate and store
    /// it as an addendum on the history entry. The original judging result
    /// is never touched. On parse failure the raised error retains the raw
    /// model text.
    pub async fn request_feedback(
        &mut self,
        entry_id: &str,
    ) -> Result<PersonalizedFeedback, DebateError> {
        let prompt = {
            let entry = self
                .history
                .get(entry_id)
                .ok_or_else(|| DebateError::HistoryEntryNotFound(entry_id.to_string()))?;
            let result = entry.session.result.as_ref();
            let narrative = result.map(|r| r.feedback.as_str()).unwrap_or_default();
            let human_scores = result.and_then(|r| {
                r.individual_scores
                    .get(entry.session.participants.human_speaker_id())
            });
            prompts::personalized_feedback(&entry.transcript, narrative, human_scores)
        };

        let raw = self.client.generate(&prompt).await?;
        let feedback = parser::parse_feedback(&raw)?;
        self.history.attach_feedback(entry_id, feedback.clone())?;
        Ok(feedback)
    }
}

/// A plausible time-used value for a generated speech, within the role's
/// limit.
fn synthesized_time_used(time_limit: u32) -> u32 {
    let floor = time_limit.saturating_sub(60);
    rand::thread_rng().gen_range(floor..=time_limit)
}
