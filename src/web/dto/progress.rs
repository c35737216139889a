use serde::Serialize;

use crate::model::entity::ModuleProgressRow;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProgressSummary {
    pub email: String,
    pub total_modules: i64,
    pub quizzes_taken: i64,
    pub average_score: Option<f64>,
    pub best_score: Option<f64>,
    /// Most recent modules first.
    pub modules: Vec<ModuleProgressRow>,
}
