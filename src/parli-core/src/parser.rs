//! Defensive parsing of model output.
//!
//! Generated text arrives with formatting noise: code fences, leading prose,
//! trailing commentary. The extractors here tolerate all of that while still
//! rejecting structurally incomplete payloads outright, because downstream
//! rendering assumes the required fields exist. Every failure keeps the raw
//! text for diagnostics.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::DebateError;
use crate::judging::{Argument, DebateResult, PersonalizedFeedback};

/// A generated case preparation for one side of a motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasePrep {
    pub main_arguments: Vec<Argument>,
    pub rebuttals: Vec<String>,
    pub evidence: Vec<String>,
    pub strategy: String,
}

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[a-zA-Z]*[ \t]*\r?\n?").unwrap());
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n?```\s*$").unwrap());

/// Locate the JSON object inside raw model output.
///
/// Trims, strips a wrapping code fence if present, then slices from the
/// first `{` to the last `}` to shed any surrounding prose.
pub fn extract_json(raw: &str) -> Result<&str, DebateError> {
    let mut text = raw.trim();
    if text.starts_with("```") {
        if let Some(fence) = FENCE_OPEN.find(text) {
            text = &text[fence.end()..];
        }
        if let Some(fence) = FENCE_CLOSE.find(text) {
            text = &text[..fence.start()];
        }
    }
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(DebateError::Unparsable {
            raw: raw.to_string(),
        }),
    }
}

fn parse_value(raw: &str) -> Result<Value, DebateError> {
    let json = extract_json(raw)?;
    serde_json::from_str(json).map_err(|source| DebateError::InvalidJson {
        source,
        raw: raw.to_string(),
    })
}

fn missing(field: impl Into<String>, raw: &str) -> DebateError {
    DebateError::MissingField {
        field: field.into(),
        raw: raw.to_string(),
    }
}

fn require_array<'a>(value: &'a Value, field: &str, raw: &str) -> Result<&'a [Value], DebateError> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| missing(field, raw))
}

fn require_non_empty_string(value: &Value, field: &str, raw: &str) -> Result<(), DebateError> {
    match value.get(field).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(missing(field, raw)),
    }
}

/// Parse and validate a case-preparation response (strict).
pub fn parse_case_prep(raw: &str) -> Result<CasePrep, DebateError> {
    let value = parse_value(raw)?;

    let arguments = require_array(&value, "mainArguments", raw)?;
    if arguments.is_empty() {
        return Err(missing("mainArguments", raw));
    }
    for (i, argument) in arguments.iter().enumerate() {
        for field in ["claim", "reasoning", "evidence", "impact"] {
            if argument.get(field).and_then(Value::as_str).is_none() {
                return Err(missing(format!("mainArguments[{i}].{field}"), raw));
            }
        }
        if argument.get("weight").and_then(Value::as_f64).is_none() {
            return Err(missing(format!("mainArguments[{i}].weight"), raw));
        }
    }

    if require_array(&value, "rebuttals", raw)?.is_empty() {
        return Err(missing("rebuttals", raw));
    }
    if require_array(&value, "evidence", raw)?.is_empty() {
        return Err(missing("evidence", raw));
    }
    require_non_empty_string(&value, "strategy", raw)?;

    serde_json::from_value(value).map_err(|source| DebateError::InvalidJson {
        source,
        raw: raw.to_string(),
    })
}

/// A speech response is plain prose, returned as-is after trimming.
pub fn parse_speech(raw: &str) -> Result<String, DebateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DebateError::EmptyGeneration);
    }
    Ok(trimmed.to_string())
}

/// Parse and validate an adjudication response (strict).
pub fn parse_adjudication(raw: &str) -> Result<DebateResult, DebateError> {
    let value = parse_value(raw)?;

    match value.get("winner").and_then(Value::as_str) {
        Some("government") | Some("opposition") => {}
        _ => return Err(missing("winner", raw)),
    }

    let score = value.get("score").ok_or_else(|| missing("score", raw))?;
    if score.get("government").and_then(Value::as_f64).is_none() {
        return Err(missing("score.government", raw));
    }
    if score.get("opposition").and_then(Value::as_f64).is_none() {
        return Err(missing("score.opposition", raw));
    }

    require_array(&value, "clashes", raw)?;
    require_non_empty_string(&value, "feedback", raw)?;

    serde_json::from_value(value).map_err(|source| DebateError::InvalidJson {
        source,
        raw: raw.to_string(),
    })
}

/// Parse a personalized-feedback response (lenient).
///
/// Only the per-criterion map is required. Non-string entries are dropped,
/// every other field falls back to an empty string.
pub fn parse_feedback(raw: &str) -> Result<PersonalizedFeedback, DebateError> {
    let value = parse_value(raw)?;

    let criteria: BTreeMap<String, String> = value
        .get("criteria")
        .and_then(Value::as_object)
        .map(|object| {
            object
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default();
    if criteria.is_empty() {
        return Err(missing("criteria", raw));
    }

    let text = |field: &str| -> String {
        value
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(PersonalizedFeedback {
        criteria,
        summary: text("summary"),
        argument_mapping: text("argumentMapping"),
        fallacy_detection: text("fallacyDetection"),
        rhetorical_device_recognition: text("rhetoricalDeviceRecognition"),
        sentiment_and_engagement_analysis: text("sentimentAndEngagementAnalysis"),
        comparative_clash_analysis: text("comparativeClashAnalysis"),
        role_skill_adapted_feedback: text("roleSkillAdaptedFeedback"),
        rubric_transparency: text("rubricTransparency"),
        key_moments: text("keyMoments"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Side;

    const ADJUDICATION: &str = r#"{
        "winner": "government",
        "score": {"government": 82.5, "opposition": 76.8},
        "clashes": [
            {
                "id": "clash1",
                "topic": "Economic impact",
                "governmentArgument": {"id": "g1", "claim": "Growth", "reasoning": "r", "evidence": "e", "impact": "i", "weight": 8.0},
                "oppositionArgument": {"id": "o1", "claim": "Cost", "reasoning": "r", "evidence": "e", "impact": "i", "weight": 7.0},
                "weight": 9.0,
                "winner": "government",
                "reasoning": "Stronger evidence"
            }
        ],
        "individualScores": {
            "pm": {"argumentQuality": 8.0, "logicalCoherence": 7.5, "feedback": "Solid opening"}
        },
        "feedback": "A well-matched debate.",
        "keyMoments": ["The definitional challenge in speech two"],
        "improvementAreas": ["Engage the strongest counterargument earlier"]
    }"#;

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json(r#"{"a": 1}"#).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_json_fenced_with_prose() {
        let raw = "Here is the result you asked for:\n```json\n{\"a\": 1}\n```\nLet me know if you need more.";
        assert_eq!(extract_json(raw).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_json_prose_both_sides() {
        let raw = "Sure! The verdict: {\"winner\": \"government\"} Hope that helps.";
        assert_eq!(extract_json(raw).unwrap(), r#"{"winner": "government"}"#);
    }

    #[test]
    fn test_extract_json_no_payload() {
        let err = extract_json("I could not produce a verdict.").unwrap_err();
        assert!(matches!(err, DebateError::Unparsable { .. }));
    }

    #[test]
    fn test_parse_adjudication_full() {
        let result = parse_adjudication(ADJUDICATION).unwrap();
        assert_eq!(result.winner, Side::Government);
        assert_eq!(result.clashes.len(), 1);
        assert_eq!(result.clashes[0].government_argument.claim, "Growth");
        assert_eq!(
            result.individual_scores.get("pm").unwrap().argument_quality,
            8.0
        );
        assert!(result.ranklist.is_none());
    }

    #[test]
    fn test_parse_adjudication_fenced() {
        let fenced = format!("```json\n{ADJUDICATION}\n```");
        let result = parse_adjudication(&fenced).unwrap();
        assert_eq!(result.score.government, 82.5);
    }

    #[test]
    fn test_parse_adjudication_missing_winner() {
        let raw = r#"{"score": {"government": 80, "opposition": 75}, "clashes": [], "feedback": "ok"}"#;
        let err = parse_adjudication(raw).unwrap_err();
        match err {
            DebateError::MissingField { field, raw: kept } => {
                assert_eq!(field, "winner");
                assert!(kept.contains("opposition"));
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_adjudication_invalid_winner_label() {
        let raw = r#"{"winner": "draw", "score": {"government": 1, "opposition": 1}, "clashes": [], "feedback": "ok"}"#;
        assert!(matches!(
            parse_adjudication(raw).unwrap_err(),
            DebateError::MissingField { field, .. } if field == "winner"
        ));
    }

    #[test]
    fn test_parse_adjudication_non_numeric_score() {
        let raw = r#"{"winner": "government", "score": {"government": "high", "opposition": 75}, "clashes": [], "feedback": "ok"}"#;
        assert!(matches!(
            parse_adjudication(raw).unwrap_err(),
            DebateError::MissingField { field, .. } if field == "score.government"
        ));
    }

    #[test]
    fn test_parse_case_prep() {
        let raw = r#"{
            "mainArguments": [
                {"id": "arg1", "claim": "c", "reasoning": "r", "evidence": "e", "impact": "i", "weight": 8.5}
            ],
            "rebuttals": ["They will say cost is prohibitive"],
            "evidence": ["A 2023 meta-analysis"],
            "strategy": "Frame the debate around wellbeing"
        }"#;
        let prep = parse_case_prep(raw).unwrap();
        assert_eq!(prep.main_arguments.len(), 1);
        assert_eq!(prep.main_arguments[0].weight, 8.5);
        assert_eq!(prep.rebuttals.len(), 1);
    }

    #[test]
    fn test_parse_case_prep_missing_argument_field() {
        let raw = r#"{
            "mainArguments": [{"id": "arg1", "claim": "c", "reasoning": "r", "evidence": "e", "weight": 1.0}],
            "rebuttals": ["x"], "evidence": ["y"], "strategy": "z"
        }"#;
        assert!(matches!(
            parse_case_prep(raw).unwrap_err(),
            DebateError::MissingField { field, .. } if field == "mainArguments[0].impact"
        ));
    }

    #[test]
    fn test_parse_case_prep_empty_arguments() {
        let raw = r#"{"mainArguments": [], "rebuttals": ["x"], "evidence": ["y"], "strategy": "z"}"#;
        assert!(matches!(
            parse_case_prep(raw).unwrap_err(),
            DebateError::MissingField { field, .. } if field == "mainArguments"
        ));
    }

    #[test]
    fn test_parse_speech_passthrough() {
        let content = parse_speech("  Honourable members, the motion stands.  ").unwrap();
        assert_eq!(content, "Honourable members, the motion stands.");
        assert!(matches!(
            parse_speech("   ").unwrap_err(),
            DebateError::EmptyGeneration
        ));
    }

    #[test]
    fn test_parse_feedback_lenient_defaults() {
        let raw = r#"{"criteria": {"argumentQuality": "Lead with your strongest point"}}"#;
        let feedback = parse_feedback(raw).unwrap();
        assert_eq!(feedback.criteria.len(), 1);
        assert!(feedback.summary.is_empty());
        assert!(feedback.fallacy_detection.is_empty());
    }

    #[test]
    fn test_parse_feedback_requires_criteria() {
        let raw = r#"{"summary": "Good debate overall"}"#;
        assert!(matches!(
            parse_feedback(raw).unwrap_err(),
            DebateError::MissingField { field, .. } if field == "criteria"
        ));
    }

    #[test]
    fn test_parse_feedback_drops_non_string_entries() {
        let raw = r#"{"criteria": {"argumentQuality": "ok", "persuasiveness": 7}}"#;
        let feedback = parse_feedback(raw).unwrap();
        assert_eq!(feedback.criteria.len(), 1);
        assert!(feedback.criteria.contains_key("argumentQuality"));
    }
}
