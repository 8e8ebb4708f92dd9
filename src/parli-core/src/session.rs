//! Debate session state machine.
//!
//! Holds the ordered speech log and the session phase, and enforces the
//! turn-taking invariants: speeches append in strict role order, the
//! current speaker is always derived from the speech count (never stored),
//! and every operation either fully applies or fully aborts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::catalog::{self, Motion, Role, Side, SPEECH_COUNT};
use crate::error::DebateError;
use crate::judging::{Argument, DebateResult};
use crate::participant::{Participants, SkillLevel};

/// Session lifecycle. Monotonic except for the judging -> debating recovery
/// edge taken when an adjudication attempt fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebatePhase {
    /// Motion and role chosen, case prep may run.
    Preparing,
    Debating,
    Judging,
    Completed,
}

/// One delivered speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speech {
    pub id: String,
    pub speaker_id: String,
    pub role: Role,
    pub content: String,
    /// Seconds the speaker used.
    pub time_used: u32,
    pub timestamp: DateTime<Utc>,
    /// Reserved. Structured argument extraction from free text is not
    /// implemented; this list is always empty today.
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

/// A single debate from creation through adjudication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateSession {
    pub id: String,
    pub motion: Motion,
    pub participants: Participants,
    speeches: Vec<Speech>,
    phase: DebatePhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DebateResult>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    generation_in_flight: bool,
    #[serde(skip)]
    adjudication_in_flight: bool,
}

impl DebateSession {
    /// Create a session: the human takes `human_role`, every other role is
    /// filled by a synthetic debater at `ai_skill`. The session starts in
    /// the debating phase with the first role in sequence due to speak.
    pub fn new(
        motion: Motion,
        human_name: &str,
        human_side: Side,
        human_role: &Role,
        ai_skill: SkillLevel,
    ) -> Result<Self, DebateError> {
        let participants = Participants::assemble(human_name, human_side, human_role, ai_skill)?;
        let session = Self {
            id: format!("session-{}", Uuid::new_v4()),
            motion,
            participants,
            speeches: Vec::new(),
            phase: DebatePhase::Debating,
            result: None,
            created_at: Utc::now(),
            generation_in_flight: false,
            adjudication_in_flight: false,
        };
        info!(session = %session.id, motion = %session.motion.id, human_role = %human_role.id, "session created");
        Ok(session)
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn speeches(&self) -> &[Speech] {
        &self.speeches
    }

    /// The role due to speak: always the role at position `speeches.len()`
    /// in the fixed order, or `None` once all eight speeches exist. Derived
    /// on every read, never stored.
    pub fn current_speaker(&self) -> Option<&'static Role> {
        catalog::role_at(self.speeches.len())
    }

    /// Whether the role due to speak is the human's.
    pub fn is_human_turn(&self) -> bool {
        self.current_speaker()
            .is_some_and(|role| self.participants.is_human_role(&role.id))
    }

    pub fn is_complete(&self) -> bool {
        self.speeches.len() == SPEECH_COUNT
    }

    fn require_phase(&self, expected: DebatePhase) -> Result<(), DebateError> {
        if self.phase != expected {
            return Err(DebateError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Record the human's speech for the current turn and advance.
    ///
    /// An empty string is an accepted skip: the turn still advances with a
    /// zero-content speech, so a human can forfeit without blocking the
    /// flow. Appending the eighth speech moves the session to judging.
    pub fn submit_speech(
        &mut self,
        content: impl Into<String>,
        time_used: u32,
    ) -> Result<&Speech, DebateError> {
        self.require_phase(DebatePhase::Debating)?;
        let role = self.current_speaker().ok_or(DebateError::NotHumanTurn)?;
        if !self.participants.is_human_role(&role.id) {
            return Err(DebateError::NotHumanTurn);
        }

        let speech = Speech {
            id: format!("speech-{}", Uuid::new_v4()),
            speaker_id: self.participants.human_speaker_id().to_string(),
            role: role.clone(),
            content: content.into(),
            time_used: time_used.min(role.time_limit),
            timestamp: Utc::now(),
            arguments: Vec::new(),
        };
        Ok(self.append(speech))
    }

    /// Record a generated speech for the synthetic debater due to speak.
    /// Same append semantics as [`submit_speech`](Self::submit_speech).
    pub(crate) fn record_ai_speech(
        &mut self,
        content: String,
        time_used: u32,
    ) -> Result<&Speech, DebateError> {
        self.require_phase(DebatePhase::Debating)?;
        let role = self.current_speaker().ok_or(DebateError::NotAiTurn)?;
        let debater = self
            .participants
            .debater_for_role(&role.id)
            .ok_or(DebateError::NotAiTurn)?;

        let speech = Speech {
            id: format!("speech-{}", Uuid::new_v4()),
            speaker_id: debater.id.clone(),
            role: role.clone(),
            content,
            time_used: time_used.min(role.time_limit),
            timestamp: Utc::now(),
            arguments: Vec::new(),
        };
        Ok(self.append(speech))
    }

    fn append(&mut self, speech: Speech) -> &Speech {
        debug_assert_eq!(speech.role.order as usize, self.speeches.len() + 1);
        self.speeches.push(speech);
        if self.is_complete() {
            info!(session = %self.id, "all speeches recorded, moving to judging");
            self.phase = DebatePhase::Judging;
        }
        // Just pushed, the log cannot be empty.
        &self.speeches[self.speeches.len() - 1]
    }

    /// Take the speech-generation guard. At most one generation may be in
    /// flight per session; a concurrent duplicate is rejected before any
    /// network call. The guard stays held until
    /// [`finish_generation`](Self::finish_generation).
    pub fn begin_generation(&mut self) -> Result<(), DebateError> {
        self.require_phase(DebatePhase::Debating)?;
        let role = self.current_speaker().ok_or(DebateError::NotAiTurn)?;
        if self.participants.is_human_role(&role.id) {
            return Err(DebateError::NotAiTurn);
        }
        if self.generation_in_flight {
            return Err(DebateError::GenerationInFlight);
        }
        self.generation_in_flight = true;
        Ok(())
    }

    /// Release the speech-generation guard. Called on success and failure
    /// alike; a failed generation leaves the turn unadvanced and retryable.
    pub fn finish_generation(&mut self) {
        self.generation_in_flight = false;
    }

    pub fn generation_in_flight(&self) -> bool {
        self.generation_in_flight
    }

    /// Enter the judging phase and take the adjudication guard. Requires
    /// all eight speeches; callable from debating (first attempt) or
    /// judging (retry after the recovery edge).
    pub fn begin_adjudication(&mut self) -> Result<(), DebateError> {
        if !self.is_complete() {
            return Err(DebateError::DebateUnfinished {
                expected: SPEECH_COUNT,
                actual: self.speeches.len(),
            });
        }
        match self.phase {
            DebatePhase::Debating | DebatePhase::Judging => {}
            actual => {
                return Err(DebateError::WrongPhase {
                    expected: DebatePhase::Judging,
                    actual,
                });
            }
        }
        if self.adjudication_in_flight {
            return Err(DebateError::AdjudicationInFlight);
        }
        self.adjudication_in_flight = true;
        self.phase = DebatePhase::Judging;
        Ok(())
    }

    /// Attach the judging result and complete the session. Valid only while
    /// the adjudication taken by [`begin_adjudication`](Self::begin_adjudication)
    /// is in flight; the result is immutable from here on.
    pub fn attach_result(&mut self, result: DebateResult) -> Result<(), DebateError> {
        self.require_phase(DebatePhase::Judging)?;
        if !self.adjudication_in_flight {
            return Err(DebateError::AdjudicationNotStarted);
        }
        self.result = Some(result);
        self.phase = DebatePhase::Completed;
        self.adjudication_in_flight = false;
        info!(session = %self.id, "adjudication attached, session completed");
        Ok(())
    }

    /// Recovery edge: a failed adjudication returns the session to the
    /// debating phase with the speech log intact so completion can be
    /// retried. Valid only while an adjudication is in flight.
    pub fn abort_adjudication(&mut self) -> Result<(), DebateError> {
        if !self.adjudication_in_flight {
            return Err(DebateError::AdjudicationNotStarted);
        }
        self.adjudication_in_flight = false;
        self.phase = DebatePhase::Debating;
        Ok(())
    }

    pub fn adjudication_in_flight(&self) -> bool {
        self.adjudication_in_flight
    }
}
