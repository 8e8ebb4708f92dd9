//! Debate participants.
//!
//! One human speaker plus seven synthetic debaters, bound one-to-one to the
//! fixed role list. Persona text is prompt flavoring only.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{self, Role, Side};
use crate::error::DebateError;

/// Skill tier for synthetic debaters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

/// The human participant and their chosen position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanParticipant {
    pub name: String,
    pub role: Role,
    pub side: Side,
}

/// A synthetic debater filling one non-human role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDebater {
    pub id: String,
    pub name: String,
    pub skill: SkillLevel,
    pub role: Role,
    pub persona: String,
}

impl AiDebater {
    /// Assign a debater to a role, picking a persona for the skill tier.
    pub fn assigned(skill: SkillLevel, role: Role) -> Self {
        let bank = persona_bank(skill);
        let (name, persona) = bank
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(bank[0]);
        Self {
            id: format!("ai-{}-{}", role.id, Uuid::new_v4()),
            name: name.to_string(),
            skill,
            role,
            persona: persona.to_string(),
        }
    }
}

/// The full participant set for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participants {
    pub human: HumanParticipant,
    pub ai: Vec<AiDebater>,
}

impl Participants {
    /// Build the participant set: the human takes `human_role`, every other
    /// role gets a synthetic debater at the requested skill tier. Fails when
    /// the requested side does not match the role's bench.
    pub fn assemble(
        human_name: impl Into<String>,
        human_side: Side,
        human_role: &Role,
        ai_skill: SkillLevel,
    ) -> Result<Self, DebateError> {
        if human_role.side != human_side {
            return Err(DebateError::SideMismatch {
                role: human_role.id.clone(),
                role_side: human_role.side.to_string(),
                requested: human_side.to_string(),
            });
        }

        let ai = catalog::roles()
            .iter()
            .filter(|r| r.id != human_role.id)
            .map(|r| AiDebater::assigned(ai_skill, r.clone()))
            .collect();

        Ok(Self {
            human: HumanParticipant {
                name: human_name.into(),
                role: human_role.clone(),
                side: human_side,
            },
            ai,
        })
    }

    /// The debater holding the given role, if the role is not the human's.
    pub fn debater_for_role(&self, role_id: &str) -> Option<&AiDebater> {
        self.ai.iter().find(|d| d.role.id == role_id)
    }

    pub fn is_human_role(&self, role_id: &str) -> bool {
        self.human.role.id == role_id
    }

    /// Speaker id the human's speeches carry. The original recordings key
    /// human speeches by role id rather than a separate participant id.
    pub fn human_speaker_id(&self) -> &str {
        &self.human.role.id
    }

    /// Display name for a speaker id, for transcripts.
    pub fn speaker_name(&self, speaker_id: &str) -> &str {
        if speaker_id == self.human_speaker_id() {
            &self.human.name
        } else {
            self.ai
                .iter()
                .find(|d| d.id == speaker_id)
                .map(|d| d.name.as_str())
                .unwrap_or("Unknown")
        }
    }
}

/// Named personas per skill tier, ported from the original roster.
fn persona_bank(skill: SkillLevel) -> &'static [(&'static str, &'static str)] {
    match skill {
        SkillLevel::Beginner => &[
            (
                "Alex Chen",
                "Enthusiastic, earnest, and highly supportive of teammates. Known for a warm, \
                 approachable style and for making complex ideas accessible, though sometimes \
                 oversimplifies and can be thrown off by aggressive opposition. Values clarity \
                 and kindness over confrontation, often reaching for relatable analogies.",
            ),
            (
                "Jordan Smith",
                "Methodical, patient, and highly structured. A stickler for debate rules and \
                 frameworks who spends extra time on definitions and setup. Polite to a fault, \
                 sometimes missing chances for strong rebuttal, and uncomfortable with \
                 ambiguity or rapid topic shifts.",
            ),
        ],
        SkillLevel::Intermediate => &[
            (
                "Morgan Davis",
                "Confident, analytical, and fond of strategic risk-taking. Quick to spot hidden \
                 assumptions and to pivot arguments, enjoys statistics and real-world examples \
                 but occasionally gets lost in the weeds. Assertive without being aggressive.",
            ),
            (
                "Casey Johnson",
                "Sharp, quick-witted, and a master of rhetorical flourish. Thrives in \
                 high-pressure moments and challenges opponents directly with clever turns of \
                 phrase, though sometimes prioritizes style over substance. Enjoys exposing \
                 contradictions and is not afraid to be provocative.",
            ),
        ],
        SkillLevel::Advanced => &[
            (
                "Dr. River Thompson",
                "A philosopher at heart who weaves together complex frameworks, ethical \
                 theories, and historical analogies. Speeches are dense with references and \
                 layered logic. Calm under pressure, preferring to win by out-framing rather \
                 than out-shouting, at the cost of occasionally losing lay audiences.",
            ),
            (
                "Prof. Sage Williams",
                "A legendary debater known for devastating rebuttals and crystalline logic. \
                 Relentless in exposing flaws and inconsistencies, with surgical precision in \
                 cross-examination. Values intellectual honesty and will concede minor points \
                 to win the bigger picture. Cool, analytical, occasionally ruthless.",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::role_by_id;

    #[test]
    fn test_assemble_covers_all_roles_exactly_once() {
        let pm = role_by_id("pm").unwrap();
        let participants =
            Participants::assemble("You", Side::Government, pm, SkillLevel::Intermediate).unwrap();

        assert_eq!(participants.ai.len(), 7);
        assert!(participants.ai.iter().all(|d| d.role.id != "pm"));

        let mut covered: Vec<&str> = participants.ai.iter().map(|d| d.role.id.as_str()).collect();
        covered.push(participants.human.role.id.as_str());
        covered.sort_unstable();
        covered.dedup();
        assert_eq!(covered.len(), 8);
    }

    #[test]
    fn test_assemble_rejects_side_mismatch() {
        let lo = role_by_id("lo").unwrap();
        let err = Participants::assemble("You", Side::Government, lo, SkillLevel::Beginner)
            .unwrap_err();
        assert!(matches!(err, DebateError::SideMismatch { .. }));
    }

    #[test]
    fn test_debater_lookup_and_names() {
        let ow = role_by_id("ow").unwrap();
        let participants =
            Participants::assemble("You", Side::Opposition, ow, SkillLevel::Advanced).unwrap();

        assert!(participants.is_human_role("ow"));
        assert!(participants.debater_for_role("ow").is_none());

        let pm_debater = participants.debater_for_role("pm").unwrap();
        assert_eq!(participants.speaker_name(&pm_debater.id), pm_debater.name);
        assert_eq!(participants.speaker_name("ow"), "You");
        assert_eq!(participants.speaker_name("nobody"), "Unknown");
    }

    #[test]
    fn test_assigned_debater_matches_skill() {
        let gw = role_by_id("gw").unwrap();
        let debater = AiDebater::assigned(SkillLevel::Beginner, gw.clone());
        assert_eq!(debater.skill, SkillLevel::Beginner);
        assert!(debater.id.starts_with("ai-gw-"));
        assert!(!debater.persona.is_empty());
    }
}
