//! Adjudication result data model.
//!
//! These types mirror the JSON schema the adjudication prompt demands. The
//! validator checks the load-bearing fields; everything else is tolerant of
//! absence via serde defaults, since model output is unreliable in shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Side;

/// The eight fixed judging criteria, in the order the prompt lists them.
pub const JUDGING_CRITERIA: [&str; 8] = [
    "Argument quality",
    "Logical coherence",
    "Rhetorical techniques",
    "Persuasiveness",
    "Response to opposition arguments",
    "Structure and time management",
    "Delivery and presentation",
    "Evidence credibility",
];

/// A single structured argument, as claimed by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Argument {
    pub id: String,
    pub claim: String,
    pub reasoning: String,
    pub evidence: String,
    pub impact: String,
    pub weight: f64,
}

/// Who took a clash. Unlike the debate winner, a clash may be a tie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClashWinner {
    Government,
    Opposition,
    #[default]
    Tie,
}

/// A point of direct disagreement between the benches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Clash {
    pub id: String,
    pub topic: String,
    pub government_argument: Argument,
    pub opposition_argument: Argument,
    /// Importance of this clash to the overall result.
    pub weight: f64,
    pub winner: ClashWinner,
    pub reasoning: String,
}

/// Per-speaker scores across the eight criteria, each 0-10.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JudgingCriteria {
    pub argument_quality: f64,
    pub logical_coherence: f64,
    pub rhetorical_techniques: f64,
    pub persuasiveness: f64,
    pub response_to_opposition: f64,
    pub structure_and_time: f64,
    pub delivery_and_presentation: f64,
    pub evidence_credibility: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument_quality_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_coherence_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rhetorical_techniques_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persuasiveness_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_to_opposition_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_and_time_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_and_presentation_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_credibility_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl JudgingCriteria {
    /// Scores in the canonical criteria order.
    pub fn scores(&self) -> [f64; 8] {
        [
            self.argument_quality,
            self.logical_coherence,
            self.rhetorical_techniques,
            self.persuasiveness,
            self.response_to_opposition,
            self.structure_and_time,
            self.delivery_and_presentation,
            self.evidence_credibility,
        ]
    }

    pub fn average(&self) -> f64 {
        self.scores().iter().sum::<f64>() / 8.0
    }
}

/// Aggregate score per bench.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SideScores {
    pub government: f64,
    pub opposition: f64,
}

/// One entry of the model's optional speaker ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankEntry {
    pub speaker_id: String,
    pub role: String,
    pub score: f64,
}

/// The externally produced judging result. Attached to a session once,
/// never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateResult {
    pub winner: Side,
    pub score: SideScores,
    #[serde(default)]
    pub clashes: Vec<Clash>,
    #[serde(default)]
    pub individual_scores: BTreeMap<String, JudgingCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranklist: Option<Vec<RankEntry>>,
    pub feedback: String,
    #[serde(default)]
    pub key_moments: Vec<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
}

/// The supplementary coaching pass. Lenient by design: only the criteria
/// map is required, everything else defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalizedFeedback {
    pub criteria: BTreeMap<String, String>,
    pub summary: String,
    pub argument_mapping: String,
    pub fallacy_detection: String,
    pub rhetorical_device_recognition: String,
    pub sentiment_and_engagement_analysis: String,
    pub comparative_clash_analysis: String,
    pub role_skill_adapted_feedback: String,
    pub rubric_transparency: String,
    pub key_moments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_average() {
        let scores = JudgingCriteria {
            argument_quality: 8.0,
            logical_coherence: 8.0,
            rhetorical_techniques: 6.0,
            persuasiveness: 6.0,
            response_to_opposition: 7.0,
            structure_and_time: 7.0,
            delivery_and_presentation: 7.0,
            evidence_credibility: 7.0,
            ..Default::default()
        };
        assert!((scores.average() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clash_tolerates_sparse_json() {
        let clash: Clash = serde_json::from_str(r#"{"topic": "Economic impact"}"#).unwrap();
        assert_eq!(clash.topic, "Economic impact");
        assert_eq!(clash.winner, ClashWinner::Tie);
        assert_eq!(clash.weight, 0.0);
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = DebateResult {
            winner: Side::Government,
            score: SideScores {
                government: 82.5,
                opposition: 76.8,
            },
            clashes: vec![],
            individual_scores: BTreeMap::new(),
            ranklist: None,
            feedback: "A close debate.".to_string(),
            key_moments: vec!["The PM's framing held".to_string()],
            improvement_areas: vec![],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"winner\":\"government\""));
        assert!(json.contains("\"keyMoments\""));
        let back: DebateResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.winner, Side::Government);
        assert_eq!(back.score.opposition, 76.8);
    }
}
