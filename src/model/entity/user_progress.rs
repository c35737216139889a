use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::{
    model::{
        ModelManager, ResourceType,
        error::DatabaseResult,
        repo::ResourceTyped,
    },
    web::AuthenticatedUser,
};

/// Aggregate quiz figures of one user.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ProgressStats {
    pub quizzes_taken: i64,
    pub average_score: Option<f64>,
    pub best_score: Option<f64>,
}

/// Latest quiz result of one user on one module.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserProgress {
    id: Uuid,
    user_id: Uuid,
    module_id: Uuid,
    quiz_score: Option<f64>,
    quiz_completed_at: Option<DateTime<Utc>>,
    attempts: i32,
}

/// One of the actor's modules with whatever progress exists on it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ModuleProgressRow {
    pub module_id: Uuid,
    pub title: String,
    pub quiz_score: Option<f64>,
    pub attempts: i32,
    pub quiz_completed_at: Option<DateTime<Utc>>,
}

impl ResourceTyped for UserProgress {
    fn get_resource_type() -> ResourceType {
        ResourceType::UserProgress
    }
}

impl UserProgress {
    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn quiz_score(&self) -> Option<f64> {
        self.quiz_score
    }

    pub fn attempts(&self) -> i32 {
        self.attempts
    }

    /// Stores `score` as the actor's latest result on `module_id`.
    pub async fn record_quiz(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        module_id: Uuid,
        score: f64,
    ) -> DatabaseResult<Self> {
        let progress = sqlx::query_as(
            "INSERT INTO user_progress (id, user_id, module_id, quiz_score, quiz_completed_at, attempts)
             VALUES ($1, $2, $3, $4, now(), 1)
             ON CONFLICT (user_id, module_id) DO UPDATE
             SET quiz_score = EXCLUDED.quiz_score,
                 quiz_completed_at = EXCLUDED.quiz_completed_at,
                 attempts = user_progress.attempts + 1
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(actor.user_id())
        .bind(module_id)
        .bind(score)
        .fetch_one(mm.executor())
        .await?;

        Ok(progress)
    }

    pub async fn stats(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<ProgressStats> {
        let stats = sqlx::query_as(
            "SELECT COUNT(quiz_score) AS quizzes_taken,
                    ROUND(AVG(quiz_score)::numeric, 2)::double precision AS average_score,
                    MAX(quiz_score) AS best_score
             FROM user_progress
             WHERE user_id = $1",
        )
        .bind(actor.user_id())
        .fetch_one(mm.executor())
        .await?;

        Ok(stats)
    }

    /// The actor's modules, newest first, joined with their progress.
    pub async fn by_module(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        limit: i64,
    ) -> DatabaseResult<Vec<ModuleProgressRow>> {
        let rows = sqlx::query_as(
            "SELECT m.id AS module_id,
                    m.title,
                    p.quiz_score,
                    COALESCE(p.attempts, 0) AS attempts,
                    p.quiz_completed_at
             FROM learning_modules m
             LEFT JOIN user_progress p ON p.module_id = m.id AND p.user_id = m.user_id
             WHERE m.user_id = $1
             ORDER BY m.created_at DESC, m.id
             LIMIT $2",
        )
        .bind(actor.user_id())
        .bind(limit)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
