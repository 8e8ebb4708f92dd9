//! Prompt construction for the four request kinds.
//!
//! Only the structural contract matters to the rest of the system: the JSON
//! schemas demanded here are exactly what the parser validates. Wording is
//! ported from the original coaching material.

use crate::catalog::{Motion, Role, Side};
use crate::judging::{JudgingCriteria, JUDGING_CRITERIA};
use crate::participant::SkillLevel;
use crate::session::Speech;

/// A system instruction plus the user-facing prompt body.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub body: String,
}

/// Truncate on a char boundary, appending an ellipsis when cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

fn skill_guidance(skill: SkillLevel) -> &'static str {
    match skill {
        SkillLevel::Beginner => {
            "Use simple, clear language. Focus on basic arguments with straightforward \
             reasoning. May have some minor logical gaps but should be generally coherent. \
             Keep structure simple and easy to follow. Quote sources in a general way \
             (e.g., \"According to a news article...\")."
        }
        SkillLevel::Intermediate => {
            "Use more sophisticated arguments with good logical structure. Employ some \
             rhetorical techniques and show good understanding of debate strategy. Arguments \
             should be well-reasoned with solid evidence. Quote named sources or \
             organizations (e.g., \"A 2021 Pew Research study found...\")."
        }
        SkillLevel::Advanced => {
            "Deploy complex rhetorical techniques, sophisticated philosophical arguments, and \
             exceptional logical coherence. Use advanced debate theory and strategic \
             thinking. Arguments should be nuanced and highly persuasive. Quote highly \
             credible, specific sources (e.g., \"A 2023 meta-analysis in The Lancet \
             concluded...\")."
        }
    }
}

fn source_guidance(skill: SkillLevel) -> &'static str {
    match skill {
        SkillLevel::Beginner => "General references.",
        SkillLevel::Intermediate => "Named studies or organizations.",
        SkillLevel::Advanced => "Highly credible, specific sources with year and publication.",
    }
}

fn role_guidance(role: &Role) -> &str {
    match role.id.as_str() {
        "pm" => {
            "As Prime Minister, you must define the motion, set up the government case, and \
             present the first substantive arguments. Establish the framework for the debate."
        }
        "lo" => {
            "As Leader of Opposition, you must respond to the government's definition and \
             case, then present the opposition's counter-case with strong arguments."
        }
        "dpm" => {
            "As Deputy Prime Minister, you must extend the government case with new arguments \
             and respond to opposition points raised so far. Build upon your teammate's \
             arguments."
        }
        "do" => {
            "As Deputy Opposition, you must extend the opposition case and provide strong \
             rebuttals to government arguments. Build upon your teammate's arguments."
        }
        "gw" => {
            "As Government Whip, you must summarize the government case, respond to all \
             opposition arguments, and provide final substantive points. Reference and \
             extend your team's arguments."
        }
        "ow" => {
            "As Opposition Whip, you must summarize the opposition case and provide \
             comprehensive rebuttals to government arguments. Reference and extend your \
             team's arguments."
        }
        "gr" => {
            "As Government Reply, you must summarize why government wins. No new arguments \
             allowed, only summarize the existing case and explain why you've won key \
             clashes. Reference your team's arguments."
        }
        "or" => {
            "As Opposition Reply, you must summarize why opposition wins. No new arguments \
             allowed, only summarize the existing case and explain why you've won key \
             clashes. Reference your team's arguments."
        }
        _ => &role.description,
    }
}

/// Build the case-preparation request.
pub fn case_prep(motion: &Motion, side: Side, skill: SkillLevel) -> Prompt {
    let system = "You are an expert debate coach with 20+ years of experience helping prepare \
cases for formal debates. You understand debate theory, argumentation structure, and \
strategic thinking.

Your task is to generate a comprehensive case preparation that includes:
1. 3-4 main arguments with clear claim, reasoning, evidence, and impact
2. 3-5 potential rebuttals to likely opposition arguments
3. Key evidence points that support the case
4. Overall strategic approach for the debate

CRITICAL: You must respond with ONLY valid JSON in the exact format specified. Do not \
include any other text, explanations, or formatting."
        .to_string();

    let burden = match side {
        Side::Government => "prove the motion is correct and should be implemented",
        Side::Opposition => "prove the motion is wrong and should not be implemented",
    };

    let body = format!(
        r#"Motion: "{motion}"
Side: {side}
Skill Level: {skill}

Generate a comprehensive case preparation. Consider the motion carefully and provide strategic arguments appropriate for the {side} side.

For {side}, you need to {burden}.

Return as JSON with this exact structure:
{{
  "mainArguments": [
    {{
      "id": "arg1",
      "claim": "Clear, specific claim statement",
      "reasoning": "Logical reasoning explaining why this claim is true",
      "evidence": "Specific evidence, examples, or data supporting this claim",
      "impact": "Why this argument matters and its significance to the debate",
      "weight": 8.5
    }}
  ],
  "rebuttals": [
    "Specific rebuttal to likely opposition argument 1",
    "Specific rebuttal to likely opposition argument 2"
  ],
  "evidence": [
    "Key evidence point 1 with specific details",
    "Key evidence point 2 with specific details"
  ],
  "strategy": "Detailed overall strategic approach for winning this debate"
}}"#,
        motion = motion.motion,
    );

    Prompt { system, body }
}

/// Build the speech-generation request for the role about to speak.
pub fn speech(
    motion: &Motion,
    prior_speeches: &[Speech],
    current_role: &Role,
    skill: SkillLevel,
) -> Prompt {
    let previous_summary = match prior_speeches.last() {
        Some(speech) => format!(
            "Previous Speech ({}, {}):\n{}",
            speech.role.name,
            speech.role.side,
            excerpt(&speech.content, 400)
        ),
        None => "No previous speeches yet.".to_string(),
    };

    let team_speeches: Vec<&Speech> = prior_speeches
        .iter()
        .filter(|s| s.role.side == current_role.side)
        .collect();
    let team_summary = if team_speeches.is_empty() {
        "No team arguments yet.".to_string()
    } else {
        team_speeches
            .iter()
            .map(|s| format!("- {}: {}", s.role.name, excerpt(&s.content, 200)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let position = match current_role.side {
        Side::Government => "SUPPORTING",
        Side::Opposition => "OPPOSING",
    };

    let body = format!(
        r#"Motion: "{motion}"
Your Role: {role_name} ({side} side)
Your Position: You are {position} this motion
Context: {context}

{previous_summary}

Your Team's Previous Arguments:
{team_summary}

Instructions:
- If your role is not a Reply speech, balance between supporting your teammate's arguments and introducing at least one new substantive point or perspective. Do not simply repeat or rephrase your teammate's arguments.
- If your role is a Reply speech, do not introduce new arguments. Only summarize and conclude your team's case, explain why your side wins, and address key clashes.
- Directly rebut the main points from the previous speech, referencing them specifically.
- If the previous speech contains absurd, irrelevant, or off-topic remarks, and you are on the opposing team, explicitly and smartly call out the irrelevance or absurdity. If you are on the same team as that speaker, ignore such remarks and do not reference them.
- Build upon your teammate's arguments, extending them with new evidence or analysis, but always add something new unless you are a Reply speaker.
- Quote sources appropriate to your skill level: {sources}
- Adapt your rhetorical style to the flow of the debate.
- Maintain logical progression and refer back to earlier arguments as needed.
- {guidance}
- Keep your speech between 600-900 words.
- Use formal debate language, clear argumentation, and respond appropriately to previous speakers while advancing your side's case.
"#,
        motion = motion.motion,
        role_name = current_role.name,
        side = current_role.side,
        context = motion.context,
        sources = source_guidance(skill),
        guidance = role_guidance(current_role),
    );

    let system = format!(
        r#"You are an AI debater participating in a formal parliamentary debate. You must generate a speech that is:

1. Appropriate for your role: {guidance}
2. At {skill} level: {style}
3. Contextually aware of previous speeches
4. Structured with clear signposting
5. Between 4-6 minutes when spoken (600-900 words)
6. Maintains your side's position throughout
7. For all roles except Reply speeches, you must introduce at least one new substantive point in addition to supporting your team. For Reply speeches, only summarize and conclude.

Use formal debate language, clear argumentation, and respond appropriately to previous speakers while advancing your side's case."#,
        guidance = role_guidance(current_role),
        style = skill_guidance(skill),
    );

    Prompt { system, body }
}

/// Build the adjudication request over the complete speech list.
pub fn adjudication(motion: &Motion, speeches: &[Speech]) -> Prompt {
    let system = r#"You are an expert debate adjudicator with 15+ years of experience judging parliamentary debates at the highest levels.

Your task is to evaluate this debate using rigorous mathematical analysis and a transparent, honest, and fair scoring system. Score each criterion 0-10, where 10 is flawless, 7 is solid with minor flaws, 5 is average, 3 is weak, and 1 shows no real effort.

For each score, provide a 1-2 sentence justification referencing specific arguments or moments from the transcript. If a score is much higher or lower than others, explain why. Directly compare government and opposition for each criterion. Normalize scores: the average should be 6-7 unless the debate is truly exceptional. Be honest and critical, do not inflate scores. If a speaker is off-topic or makes absurd claims, penalize accordingly.

CRITICAL: You must respond with ONLY valid JSON in the exact format specified."#
        .to_string();

    let speeches_text = speeches
        .iter()
        .map(|speech| {
            format!(
                "SPEECH - {} ({} side):\n{}\n\n---",
                speech.role.name, speech.role.side, speech.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let criteria_list = JUDGING_CRITERIA
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"Motion: "{motion}"

DEBATE SPEECHES:
{speeches_text}

Analyze this debate and provide comprehensive judging against these criteria:
{criteria_list}

Use mathematical clash analysis to determine the winner. Each clash should be weighted by importance and won or lost based on argument strength. Key individual score maps must be keyed by the speaker ids given above each speech.

Return results as JSON with this exact structure:
{{
  "winner": "government",
  "score": {{
    "government": 82.5,
    "opposition": 76.8
  }},
  "clashes": [
    {{
      "id": "clash1",
      "topic": "Economic Impact Analysis",
      "governmentArgument": {{
        "id": "gov_arg1",
        "claim": "Government's main claim on this clash",
        "reasoning": "Government's reasoning",
        "evidence": "Government's evidence",
        "impact": "Government's impact claim",
        "weight": 8.5
      }},
      "oppositionArgument": {{
        "id": "opp_arg1",
        "claim": "Opposition's counter-claim",
        "reasoning": "Opposition's reasoning",
        "evidence": "Opposition's evidence",
        "impact": "Opposition's impact claim",
        "weight": 7.2
      }},
      "weight": 9.0,
      "winner": "government",
      "reasoning": "Why this clash fell the way it did"
    }}
  ],
  "individualScores": {{
    "speakerId": {{
      "argumentQuality": 8.5,
      "argumentQualityJustification": "...",
      "logicalCoherence": 8.0,
      "logicalCoherenceJustification": "...",
      "rhetoricalTechniques": 7.5,
      "rhetoricalTechniquesJustification": "...",
      "persuasiveness": 7.5,
      "persuasivenessJustification": "...",
      "responseToOpposition": 8.0,
      "responseToOppositionJustification": "...",
      "structureAndTime": 9.0,
      "structureAndTimeJustification": "...",
      "deliveryAndPresentation": 8.5,
      "deliveryAndPresentationJustification": "...",
      "evidenceCredibility": 8.0,
      "evidenceCredibilityJustification": "...",
      "feedback": "Detailed, constructive feedback for this speaker."
    }}
  }},
  "ranklist": [
    {{ "speakerId": "...", "role": "Prime Minister", "score": 8.2 }}
  ],
  "feedback": "Comprehensive feedback on the debate in the style of an experienced adjudicator",
  "keyMoments": ["Key moment 1 that influenced the debate", "Key moment 2"],
  "improvementAreas": ["Specific area for improvement 1", "Specific area for improvement 2"]
}}"#,
        motion = motion.motion,
    );

    Prompt { system, body }
}

/// Build the personalized coaching request for the human participant.
pub fn personalized_feedback(
    transcript: &str,
    judge_narrative: &str,
    human_scores: Option<&JudgingCriteria>,
) -> Prompt {
    let system = "You are an expert debate coach. Respond with ONLY valid JSON in the exact \
format specified."
        .to_string();

    let scores_text = match human_scores {
        Some(scores) => JUDGING_CRITERIA
            .iter()
            .zip(scores.scores())
            .map(|(label, score)| format!("- {label}: {score:.1}"))
            .collect::<Vec<_>>()
            .join("\n"),
        None => "- No per-criterion scores available.".to_string(),
    };

    let body = format!(
        r#"Here is the full debate transcript:

"""
{transcript}
"""

Here is the AI judge's analysis of the debate:

"""
{judge_narrative}
"""

Here are the user's scores (out of 10) for each criterion:
{scores_text}

Based on the transcript, the judge's analysis, and the scores, give the user 2-3 specific, actionable suggestions for improvement for each criterion, referencing their actual performance.

Then provide a summary paragraph on how the user can improve overall as a debater.

Additionally, provide the following fields:
- argumentMapping: A brief mapping of the main arguments and counterarguments presented by the user and their opponents.
- fallacyDetection: Identify any logical fallacies present in the user's arguments, if any.
- rhetoricalDeviceRecognition: List and briefly describe any rhetorical devices used by the user.
- sentimentAndEngagementAnalysis: Analyze the sentiment and engagement level of the user's speeches.
- comparativeClashAnalysis: Compare how the user handled direct clashes with the opposing bench.
- roleSkillAdaptedFeedback: Give feedback tailored to the user's debate role and skill level, with examples.
- rubricTransparency: Briefly explain how the feedback aligns with the scoring rubric.
- keyMoments: Highlight 2-3 key moments from the debate that most influenced the outcome.

If you cannot provide a field, return an empty string for that field. Return your answer as JSON in this format:
{{
  "criteria": {{
    "argumentQuality": "...",
    "rhetoricalTechniques": "...",
    "responseToOpposition": "...",
    "structureAndTime": "...",
    "deliveryAndPresentation": "..."
  }},
  "summary": "...",
  "argumentMapping": "...",
  "fallacyDetection": "...",
  "rhetoricalDeviceRecognition": "...",
  "sentimentAndEngagementAnalysis": "...",
  "comparativeClashAnalysis": "...",
  "roleSkillAdaptedFeedback": "...",
  "rubricTransparency": "...",
  "keyMoments": "..."
}}"#,
    );

    Prompt { system, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{motion_by_id, role_by_id};
    use crate::session::Speech;
    use chrono::Utc;

    fn speech_for(role_id: &str, content: &str) -> Speech {
        Speech {
            id: "s1".to_string(),
            speaker_id: "x".to_string(),
            role: role_by_id(role_id).unwrap().clone(),
            content: content.to_string(),
            time_used: 300,
            timestamp: Utc::now(),
            arguments: Vec::new(),
        }
    }

    #[test]
    fn test_excerpt_char_safe() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        // Multi-byte chars must not split.
        assert_eq!(excerpt("ééééé", 2), "éé...");
    }

    #[test]
    fn test_case_prep_demands_schema_fields() {
        let motion = motion_by_id("motion-8").unwrap();
        let prompt = case_prep(motion, Side::Government, SkillLevel::Beginner);
        for field in ["mainArguments", "rebuttals", "evidence", "strategy", "weight"] {
            assert!(prompt.body.contains(field), "missing {field}");
        }
        assert!(prompt.body.contains(&motion.motion));
    }

    #[test]
    fn test_speech_prompt_orders_context() {
        let motion = motion_by_id("motion-8").unwrap();
        let prior = vec![speech_for("pm", "The government case."), speech_for("lo", "The opposition case.")];
        let dpm = role_by_id("dpm").unwrap();
        let prompt = speech(motion, &prior, dpm, SkillLevel::Intermediate);

        assert!(prompt.body.contains("Leader of Opposition"));
        assert!(prompt.body.contains("- Prime Minister: The government case."));
        assert!(prompt.body.contains("Deputy Prime Minister"));
        assert!(prompt.system.contains("intermediate level"));
    }

    #[test]
    fn test_speech_prompt_without_history() {
        let motion = motion_by_id("motion-1").unwrap();
        let pm = role_by_id("pm").unwrap();
        let prompt = speech(motion, &[], pm, SkillLevel::Advanced);
        assert!(prompt.body.contains("No previous speeches yet."));
        assert!(prompt.body.contains("No team arguments yet."));
    }

    #[test]
    fn test_adjudication_lists_all_speeches_and_criteria() {
        let motion = motion_by_id("motion-5").unwrap();
        let speeches: Vec<Speech> = ["pm", "lo"]
            .iter()
            .map(|id| speech_for(id, "content"))
            .collect();
        let prompt = adjudication(motion, &speeches);
        assert!(prompt.body.contains("SPEECH - Prime Minister (government side)"));
        assert!(prompt.body.contains("SPEECH - Leader of Opposition (opposition side)"));
        for criterion in JUDGING_CRITERIA {
            assert!(prompt.body.contains(criterion));
        }
        assert!(prompt.body.contains("\"winner\""));
    }

    #[test]
    fn test_feedback_prompt_includes_scores() {
        let scores = JudgingCriteria {
            argument_quality: 8.0,
            ..Default::default()
        };
        let prompt = personalized_feedback("TRANSCRIPT", "NARRATIVE", Some(&scores));
        assert!(prompt.body.contains("TRANSCRIPT"));
        assert!(prompt.body.contains("NARRATIVE"));
        assert!(prompt.body.contains("- Argument quality: 8.0"));
        assert!(prompt.body.contains("\"criteria\""));
    }
}
