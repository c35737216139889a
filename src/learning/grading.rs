use std::collections::HashMap;

use serde::Serialize;

use crate::learning::QuizQuestion;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GradingError {
    #[error("this module has no quiz questions")]
    NoQuestions,
    #[error("`{key}` is not a question index (expected 0..{total})")]
    UnknownQuestion { key: String, total: usize },
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct QuestionFeedback {
    pub question_id: String,
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct QuizOutcome {
    /// Percentage of correct answers, within `0.0..=100.0`.
    pub score: f64,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub feedback: Vec<QuestionFeedback>,
}

/// Grades `answers` (question index → chosen answer) against the stored questions.
///
/// Keys are plain decimal indices (`"0"`, `"1"`, ...); anything else is rejected.
///
/// An answer is correct only if it equals the stored correct answer exactly;
/// unanswered questions count as wrong.
pub fn grade(
    questions: &[QuizQuestion],
    answers: &HashMap<String, String>,
) -> Result<QuizOutcome, GradingError> {
    let total = questions.len();
    if total == 0 {
        return Err(GradingError::NoQuestions);
    }

    // only canonical keys, so no two keys can name the same question
    let mut by_index: HashMap<usize, &str> = HashMap::with_capacity(answers.len());
    for (key, answer) in answers {
        let index = key
            .parse::<usize>()
            .ok()
            .filter(|i| *i < total && i.to_string() == *key)
            .ok_or_else(|| GradingError::UnknownQuestion {
                key: key.clone(),
                total,
            })?;
        by_index.insert(index, answer.as_str());
    }

    let feedback: Vec<QuestionFeedback> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let user_answer = by_index.get(&i).copied();
            QuestionFeedback {
                question_id: i.to_string(),
                question: q.question.clone(),
                user_answer: user_answer.map(str::to_string),
                correct_answer: q.correct_answer.clone(),
                is_correct: user_answer == Some(q.correct_answer.as_str()),
                explanation: q.explanation.clone(),
            }
        })
        .collect();

    let correct = feedback.iter().filter(|f| f.is_correct).count();
    let score = (correct as f64 / total as f64 * 10_000.0).round() / 100.0;

    Ok(QuizOutcome {
        score,
        correct_answers: correct,
        total_questions: total,
        feedback,
    })
}

/// What the learner should do after scoring `score` on a module.
pub fn next_steps(score: f64) -> (&'static str, bool) {
    if score >= 80.0 {
        ("Great job! You're ready to move on to the next topic.", false)
    } else if score >= 50.0 {
        (
            "You're getting there! Try some practice exercises before moving on.",
            false,
        )
    } else {
        (
            "It looks like you need more practice with this topic. Try reviewing the material again.",
            true,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::learning::QuestionType;

    fn questions() -> Vec<QuizQuestion> {
        ["Stack", "Queue", "true"]
            .iter()
            .enumerate()
            .map(|(i, answer)| QuizQuestion {
                question: format!("Question {i}"),
                question_type: QuestionType::MultipleChoice,
                options: vec![],
                correct_answer: answer.to_string(),
                explanation: format!("Because {answer}"),
            })
            .collect()
    }

    fn answers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn all_correct_scores_hundred() {
        let outcome = grade(
            &questions(),
            &answers(&[("0", "Stack"), ("1", "Queue"), ("2", "true")]),
        )
        .unwrap();
        assert_eq!(outcome.score, 100.0);
        assert_eq!(outcome.correct_answers, 3);
        assert!(outcome.feedback.iter().all(|f| f.is_correct));
    }

    #[test]
    fn all_wrong_scores_zero() {
        let outcome = grade(
            &questions(),
            &answers(&[("0", "Queue"), ("1", "Stack"), ("2", "false")]),
        )
        .unwrap();
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.correct_answers, 0);
    }

    #[test]
    fn match_is_exact() {
        let outcome = grade(&questions(), &answers(&[("0", "stack"), ("1", "Queue ")])).unwrap();
        assert_eq!(outcome.correct_answers, 0);
    }

    #[test]
    fn missing_answers_count_as_wrong() {
        let outcome = grade(&questions(), &answers(&[("1", "Queue")])).unwrap();
        assert_eq!(outcome.correct_answers, 1);
        assert_eq!(outcome.total_questions, 3);
        assert_eq!(outcome.score, 33.33);
        assert_eq!(outcome.feedback[0].user_answer, None);
        assert_eq!(outcome.feedback[1].explanation, "Because Queue");
    }

    #[test]
    fn empty_submission_is_valid() {
        let outcome = grade(&questions(), &HashMap::new()).unwrap();
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = grade(&questions(), &answers(&[("3", "x")])).unwrap_err();
        assert_eq!(
            err,
            GradingError::UnknownQuestion {
                key: "3".to_string(),
                total: 3
            }
        );
        assert!(grade(&questions(), &answers(&[("first", "x")])).is_err());
        assert!(grade(&questions(), &answers(&[("-1", "x")])).is_err());
    }

    #[test]
    fn keys_must_be_canonical_indices() {
        for key in [" 0", "0 ", "00", "+0", "01"] {
            assert_eq!(
                grade(&questions(), &answers(&[(key, "Stack")])).unwrap_err(),
                GradingError::UnknownQuestion {
                    key: key.to_string(),
                    total: 3
                },
                "{key:?}"
            );
        }

        // the same question spelled twice can not race
        let err = grade(&questions(), &answers(&[("0", "Stack"), (" 0", "Queue")])).unwrap_err();
        assert!(matches!(err, GradingError::UnknownQuestion { key, .. } if key == " 0"));
    }

    #[test]
    fn no_questions_is_an_error() {
        assert_eq!(
            grade(&[], &HashMap::new()).unwrap_err(),
            GradingError::NoQuestions
        );
    }

    #[test]
    fn score_stays_in_range() {
        let qs = questions();
        for mask in 0..8u8 {
            let mut map = HashMap::new();
            for (i, q) in qs.iter().enumerate() {
                let answer = if mask & (1 << i) != 0 {
                    q.correct_answer.clone()
                } else {
                    "nope".to_string()
                };
                map.insert(i.to_string(), answer);
            }
            let outcome = grade(&qs, &map).unwrap();
            assert!((0.0..=100.0).contains(&outcome.score));
            assert_eq!(outcome.correct_answers, mask.count_ones() as usize);
        }
    }

    #[test]
    fn next_steps_follow_thresholds() {
        assert!(!next_steps(100.0).1);
        assert!(next_steps(80.0).0.contains("next topic"));
        assert!(next_steps(50.0).0.contains("practice exercises"));
        assert!(next_steps(49.99).1);
    }
}
