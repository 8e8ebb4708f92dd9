//! Plain-text transcript rendering.
//!
//! Deterministic given identical session data: every timestamp comes from
//! the session itself, never from the clock.

use std::fmt::Write;

use crate::session::DebateSession;

fn mmss(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Render a full human-readable transcript: header, speeches in order, and
/// a results footer when an adjudication exists.
pub fn full_transcript(session: &DebateSession) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "DEBATE TRANSCRIPT");
    let _ = writeln!(out, "Motion: {}", session.motion.motion);
    let _ = writeln!(out, "Date: {}", session.created_at.format("%Y-%m-%d"));
    let _ = writeln!(out, "Time: {} UTC", session.created_at.format("%H:%M:%S"));
    let _ = writeln!(out, "Category: {}", session.motion.category);
    let _ = writeln!(out, "Difficulty: {}", session.motion.difficulty);
    let _ = writeln!(out);
    let _ = writeln!(out, "Participants:");
    let human = &session.participants.human;
    let _ = writeln!(
        out,
        "- Human: {} ({} - {})",
        human.name, human.role.name, human.side
    );
    for debater in &session.participants.ai {
        let _ = writeln!(
            out,
            "- AI: {} ({} - {})",
            debater.name, debater.role.name, debater.role.side
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out);

    for (index, speech) in session.speeches().iter().enumerate() {
        let speaker = session.participants.speaker_name(&speech.speaker_id);
        let remaining = speech.role.time_limit.saturating_sub(speech.time_used);
        let _ = writeln!(
            out,
            "SPEECH {}: {} ({})",
            index + 1,
            speech.role.name,
            speech.role.side
        );
        let _ = writeln!(out, "Speaker: {speaker}");
        let _ = writeln!(out, "Time Used: {}", mmss(speech.time_used));
        let _ = writeln!(out, "Time Remaining: {}", mmss(remaining));
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", speech.content);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "-".repeat(30));
        let _ = writeln!(out);
    }

    if let Some(result) = &session.result {
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out);
        let _ = writeln!(out, "DEBATE RESULTS");
        let _ = writeln!(out, "Winner: {}", result.winner);
        let _ = writeln!(out, "Final Scores:");
        let _ = writeln!(out, "- Government: {:.1}", result.score.government);
        let _ = writeln!(out, "- Opposition: {:.1}", result.score.opposition);
        let _ = writeln!(out);
        let _ = writeln!(out, "Feedback: {}", result.feedback);
        if !result.key_moments.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Key Moments:");
            for moment in &result.key_moments {
                let _ = writeln!(out, "- {moment}");
            }
        }
        if !result.improvement_areas.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Areas for Improvement:");
            for area in &result.improvement_areas {
                let _ = writeln!(out, "- {area}");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, role_by_id, Side};
    use crate::judging::{DebateResult, SideScores};
    use crate::participant::SkillLevel;
    use crate::session::DebateSession;
    use std::collections::BTreeMap;

    fn completed_session() -> DebateSession {
        let mut session = DebateSession::new(
            catalog::motion_by_id("motion-8").unwrap().clone(),
            "You",
            Side::Government,
            role_by_id("pm").unwrap(),
            SkillLevel::Intermediate,
        )
        .unwrap();
        session.submit_speech("The government case.", 330).unwrap();
        while !session.is_complete() {
            session
                .record_ai_speech("A generated speech.".to_string(), 300)
                .unwrap();
        }
        session.begin_adjudication().unwrap();
        session
            .attach_result(DebateResult {
                winner: Side::Opposition,
                score: SideScores {
                    government: 74.2,
                    opposition: 78.9,
                },
                clashes: Vec::new(),
                individual_scores: BTreeMap::new(),
                ranklist: None,
                feedback: "Opposition held the central clash.".to_string(),
                key_moments: vec!["The whip speech consolidation".to_string()],
                improvement_areas: vec!["Weigh impacts explicitly".to_string()],
            })
            .unwrap();
        session
    }

    #[test]
    fn test_mmss_formatting() {
        assert_eq!(mmss(0), "0:00");
        assert_eq!(mmss(61), "1:01");
        assert_eq!(mmss(360), "6:00");
    }

    #[test]
    fn test_transcript_is_deterministic() {
        let session = completed_session();
        assert_eq!(full_transcript(&session), full_transcript(&session));
    }

    #[test]
    fn test_transcript_sections() {
        let session = completed_session();
        let text = full_transcript(&session);

        assert!(text.starts_with("DEBATE TRANSCRIPT"));
        assert!(text.contains("Motion: This House would ban homework in primary schools"));
        assert!(text.contains("- Human: You (Prime Minister - government)"));
        assert!(text.contains("SPEECH 1: Prime Minister (government)"));
        assert!(text.contains("SPEECH 8: Opposition Reply (opposition)"));
        assert!(text.contains("Time Used: 5:30"));
        assert!(text.contains("Time Remaining: 0:30"));
        assert!(text.contains("Winner: opposition"));
        assert!(text.contains("- Opposition: 78.9"));
        assert!(text.contains("Key Moments:"));
    }

    #[test]
    fn test_no_footer_without_result() {
        let mut session = DebateSession::new(
            catalog::motion_by_id("motion-5").unwrap().clone(),
            "You",
            Side::Opposition,
            role_by_id("lo").unwrap(),
            SkillLevel::Beginner,
        )
        .unwrap();
        session
            .record_ai_speech("Opening speech.".to_string(), 200)
            .unwrap();
        let text = full_transcript(&session);
        assert!(!text.contains("DEBATE RESULTS"));
        assert!(text.contains("SPEECH 1"));
    }
}
