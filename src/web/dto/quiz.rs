use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::learning::{QuestionFeedback, QuizOutcome, next_steps};

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct QuizSubmission {
    /// Question index (`"0"`, `"1"`, ..) to the chosen answer.
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuizResult {
    pub score: f64,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub feedback: Vec<QuestionFeedback>,
    pub next_steps: String,
    /// Set when the module itself should be reviewed.
    pub recommended_module_id: Option<Uuid>,
}

impl QuizResult {
    pub fn new(module_id: Uuid, outcome: QuizOutcome) -> Self {
        let (advice, review) = next_steps(outcome.score);
        Self {
            score: outcome.score,
            correct_answers: outcome.correct_answers,
            total_questions: outcome.total_questions,
            feedback: outcome.feedback,
            next_steps: advice.to_string(),
            recommended_module_id: review.then_some(module_id),
        }
    }
}
