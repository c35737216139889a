use serde::Serialize;

use crate::learning::Difficulty;

pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct TopicSuggestion {
    pub topic: String,
    pub difficulty: Difficulty,
    pub reason: String,
}

struct FollowUp {
    studied: &'static str,
    /// Already covered when any title mentions this.
    covered: &'static str,
    topic: &'static str,
    difficulty: Difficulty,
    reason: &'static str,
}

static FOLLOW_UPS: &[FollowUp] = &[
    FollowUp {
        studied: "python",
        covered: "web",
        topic: "Web Development with Python",
        difficulty: Difficulty::Medium,
        reason: "Build on your Python knowledge",
    },
    FollowUp {
        studied: "javascript",
        covered: "react",
        topic: "React.js Fundamentals",
        difficulty: Difficulty::Medium,
        reason: "Advance your JavaScript skills",
    },
];

static STARTERS: &[(&str, &str)] = &[
    ("Introduction to Programming", "Perfect starting point"),
    ("Python Basics", "Popular and beginner-friendly"),
];

/// Suggests what to learn next from the titles of the modules a learner has.
///
/// Learners without modules get the starter topics.
pub fn next_topics<S: AsRef<str>>(titles: &[S]) -> Vec<TopicSuggestion> {
    if titles.is_empty() {
        return STARTERS
            .iter()
            .map(|(topic, reason)| TopicSuggestion {
                topic: topic.to_string(),
                difficulty: Difficulty::Easy,
                reason: reason.to_string(),
            })
            .collect();
    }

    let titles: Vec<String> = titles.iter().map(|t| t.as_ref().to_lowercase()).collect();
    let mentions = |word: &str| titles.iter().any(|t| t.contains(word));

    FOLLOW_UPS
        .iter()
        .filter(|f| mentions(f.studied) && !mentions(f.covered))
        .take(MAX_SUGGESTIONS)
        .map(|f| TopicSuggestion {
            topic: f.topic.to_string(),
            difficulty: f.difficulty,
            reason: f.reason.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn topics(titles: &[&str]) -> Vec<String> {
        next_topics(titles).into_iter().map(|s| s.topic).collect()
    }

    #[test]
    fn newcomers_get_starters() {
        let suggestions = next_topics::<&str>(&[]);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|s| s.difficulty == Difficulty::Easy));
        assert_eq!(suggestions[0].topic, "Introduction to Programming");
    }

    #[test]
    fn follow_ups_depend_on_titles() {
        assert_eq!(topics(&["Python Lists"]), ["Web Development with Python"]);
        assert_eq!(topics(&["JavaScript Closures"]), ["React.js Fundamentals"]);
        assert_eq!(
            topics(&["python basics", "Intro to JAVASCRIPT"]),
            ["Web Development with Python", "React.js Fundamentals"]
        );
    }

    #[test]
    fn covered_topics_are_skipped() {
        assert!(topics(&["Python Lists", "Python for the Web"]).is_empty());
        assert!(topics(&["JavaScript", "React Hooks"]).is_empty());
        assert!(topics(&["Medieval History"]).is_empty());
    }
}
