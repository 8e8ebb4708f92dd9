//! Parli Core Library
//!
//! Provides the debate session state machine, AI speech generation and
//! adjudication via a hosted text-generation endpoint, defensive response
//! parsing, and debate history persistence.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod judging;
pub mod orchestrator;
pub mod parser;
pub mod participant;
pub mod prompts;
pub mod session;
pub mod transcript;
pub mod voice;

pub use catalog::{Difficulty, Motion, Role, Side};
pub use client::{ApiConfig, GenerationClient, DEFAULT_MODEL};
pub use config::Config;
pub use error::{ApiErrorKind, DebateError};
pub use history::{HistoryEntry, HistoryStore};
pub use judging::{DebateResult, JudgingCriteria, PersonalizedFeedback, JUDGING_CRITERIA};
pub use orchestrator::DebateOrchestrator;
pub use parser::CasePrep;
pub use participant::{AiDebater, HumanParticipant, Participants, SkillLevel};
pub use session::{DebatePhase, DebateSession, Speech};
pub use transcript::full_transcript;
pub use voice::{NullVoice, VoiceEvent, VoiceIo};
