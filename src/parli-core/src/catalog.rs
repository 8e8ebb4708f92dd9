//! Static motion and role catalog.
//!
//! The eight British Parliamentary speaking roles form a fixed total order
//! that is the authoritative turn sequence for every session. Accessors are
//! pure and always return the list in the same order.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

/// Which bench a role or speaker argues for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Government,
    Opposition,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Government => Side::Opposition,
            Side::Opposition => Side::Government,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Government => "government",
            Side::Opposition => "opposition",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Difficulty tier of a motion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

/// A debate motion, immutable once selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Motion {
    pub id: String,
    pub motion: String,
    pub context: String,
    pub difficulty: Difficulty,
    pub category: String,
}

impl Motion {
    /// Create an ad-hoc motion supplied by the user.
    pub fn custom(
        motion: impl Into<String>,
        context: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id: format!("motion-{}", Uuid::new_v4()),
            motion: motion.into(),
            context: context.into(),
            difficulty,
            category: "Custom".to_string(),
        }
    }
}

/// One of the eight fixed speaking positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub side: Side,
    /// Position in the turn sequence, 1-based and strictly increasing.
    pub order: u8,
    /// Speaking time limit in seconds.
    pub time_limit: u32,
    pub description: String,
}

/// Number of speeches in a full debate.
pub const SPEECH_COUNT: usize = 8;

fn role(
    id: &str,
    name: &str,
    side: Side,
    order: u8,
    time_limit: u32,
    description: &str,
) -> Role {
    Role {
        id: id.to_string(),
        name: name.to_string(),
        side,
        order,
        time_limit,
        description: description.to_string(),
    }
}

static ROLES: LazyLock<[Role; SPEECH_COUNT]> = LazyLock::new(|| {
    [
        role(
            "pm",
            "Prime Minister",
            Side::Government,
            1,
            360,
            "Opens the debate for the government, defines the motion and presents the government case",
        ),
        role(
            "lo",
            "Leader of Opposition",
            Side::Opposition,
            2,
            360,
            "Responds to government case and presents the opposition case",
        ),
        role(
            "dpm",
            "Deputy Prime Minister",
            Side::Government,
            3,
            360,
            "Extends government case and responds to opposition arguments",
        ),
        role(
            "do",
            "Deputy Opposition",
            Side::Opposition,
            4,
            360,
            "Extends opposition case and responds to government arguments",
        ),
        role(
            "gw",
            "Government Whip",
            Side::Government,
            5,
            360,
            "Summarizes government case and responds to opposition",
        ),
        role(
            "ow",
            "Opposition Whip",
            Side::Opposition,
            6,
            360,
            "Summarizes opposition case and responds to government",
        ),
        role(
            "gr",
            "Government Reply",
            Side::Government,
            7,
            240,
            "Final government summary, no new arguments allowed",
        ),
        role(
            "or",
            "Opposition Reply",
            Side::Opposition,
            8,
            240,
            "Final opposition summary, no new arguments allowed",
        ),
    ]
});

/// All eight roles in turn order.
pub fn roles() -> &'static [Role] {
    &*ROLES
}

/// Look up a role by identifier.
pub fn role_by_id(id: &str) -> Option<&'static Role> {
    ROLES.iter().find(|r| r.id == id)
}

/// The role speaking at the given zero-based position, if any.
pub fn role_at(position: usize) -> Option<&'static Role> {
    ROLES.get(position)
}

/// All roles on one bench, still in turn order.
pub fn roles_for_side(side: Side) -> Vec<&'static Role> {
    ROLES.iter().filter(|r| r.side == side).collect()
}

static MOTIONS: LazyLock<Vec<Motion>> = LazyLock::new(|| {
    let m = |id: &str, motion: &str, context: &str, difficulty, category: &str| Motion {
        id: id.to_string(),
        motion: motion.to_string(),
        context: context.to_string(),
        difficulty,
        category: category.to_string(),
    };
    vec![
        m(
            "motion-1",
            "This House believes that social media platforms should be held legally responsible for the mental health impacts of their algorithms",
            "Growing concerns about social media's impact on mental health, particularly among young people, have led to calls for greater platform accountability.",
            Difficulty::Intermediate,
            "Technology & Society",
        ),
        m(
            "motion-2",
            "This House would ban private ownership of assault weapons",
            "Ongoing debates about gun control measures and public safety in various countries with different constitutional frameworks.",
            Difficulty::Advanced,
            "Policy & Law",
        ),
        m(
            "motion-3",
            "This House believes that schools should not teach subjects that some parents find objectionable",
            "Tensions between parental rights, educational standards, and societal values in curriculum decisions.",
            Difficulty::Intermediate,
            "Education",
        ),
        m(
            "motion-4",
            "This House would implement a universal basic income",
            "Economic discussions about automation, job displacement, and alternative approaches to social welfare.",
            Difficulty::Advanced,
            "Economics",
        ),
        m(
            "motion-5",
            "This House believes that zoos should be abolished",
            "Ethical considerations about animal welfare, conservation efforts, and educational value of zoological institutions.",
            Difficulty::Beginner,
            "Ethics & Environment",
        ),
        m(
            "motion-6",
            "This House would require all citizens to vote",
            "Democratic participation and the balance between civic duty and individual freedom in electoral systems.",
            Difficulty::Intermediate,
            "Democracy & Governance",
        ),
        m(
            "motion-7",
            "This House believes that artificial intelligence will do more harm than good",
            "Rapid development of AI technology and its potential impacts on employment, privacy, and human autonomy.",
            Difficulty::Advanced,
            "Technology & Future",
        ),
        m(
            "motion-8",
            "This House would ban homework in primary schools",
            "Educational research on the effectiveness of homework and its impact on children's wellbeing and family time.",
            Difficulty::Beginner,
            "Education",
        ),
    ]
});

/// The built-in motion database.
pub fn sample_motions() -> &'static [Motion] {
    &MOTIONS
}

/// Look up a built-in motion by identifier.
pub fn motion_by_id(id: &str) -> Option<&'static Motion> {
    MOTIONS.iter().find(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_order_is_one_through_eight() {
        let orders: Vec<u8> = roles().iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_role_order_stable_across_calls() {
        let first: Vec<&str> = roles().iter().map(|r| r.id.as_str()).collect();
        let second: Vec<&str> = roles().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["pm", "lo", "dpm", "do", "gw", "ow", "gr", "or"]);
    }

    #[test]
    fn test_sides_alternate_in_pairs() {
        for pair in roles().chunks(2) {
            assert_eq!(pair[0].side, Side::Government);
            assert_eq!(pair[1].side, Side::Opposition);
        }
    }

    #[test]
    fn test_both_benches_non_empty() {
        assert_eq!(roles_for_side(Side::Government).len(), 4);
        assert_eq!(roles_for_side(Side::Opposition).len(), 4);
    }

    #[test]
    fn test_role_ids_unique() {
        let mut ids: Vec<&str> = roles().iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SPEECH_COUNT);
    }

    #[test]
    fn test_reply_speeches_are_shorter() {
        assert_eq!(role_by_id("gr").unwrap().time_limit, 240);
        assert_eq!(role_by_id("or").unwrap().time_limit, 240);
        assert_eq!(role_by_id("pm").unwrap().time_limit, 360);
    }

    #[test]
    fn test_custom_motion() {
        let motion = Motion::custom("This House would do a thing", "Some context", Difficulty::Beginner);
        assert_eq!(motion.category, "Custom");
        assert!(motion.id.starts_with("motion-"));
    }

    #[test]
    fn test_motion_lookup() {
        let m = motion_by_id("motion-8").unwrap();
        assert!(m.motion.contains("homework"));
        assert_eq!(m.difficulty, Difficulty::Beginner);
    }
}
