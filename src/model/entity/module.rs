use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use uuid::Uuid;

use crate::{
    learning::{Difficulty, GeneratedModule, QuizQuestion, VideoLink},
    model::{
        ModelManager, ResourceType,
        access::HasOwner,
        error::DatabaseResult,
        repo::{CrudRepository, ResourceTyped},
    },
    web::AuthenticatedUser,
};

/// A generated learning module, owned by the user who asked for it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct LearningModule {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    content: String,
    #[schema(value_type = Difficulty)]
    difficulty: String,
    duration_minutes: i32,
    #[schema(value_type = Vec<QuizQuestion>)]
    quiz_questions: Json<Vec<QuizQuestion>>,
    #[schema(value_type = Vec<VideoLink>)]
    video_links: Json<Vec<VideoLink>>,
    assignment_latex: Option<String>,
    #[schema(value_type = Vec<String>)]
    prerequisites: Json<Vec<String>>,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ModuleCreate {
    pub difficulty: Difficulty,
    pub duration_minutes: i32,
    pub generated: GeneratedModule,
}

impl ResourceTyped for LearningModule {
    fn get_resource_type() -> ResourceType {
        ResourceType::Module
    }
}

impl LearningModule {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Rows written before the vocabulary settled may hold aliases; anything
    /// unreadable reads as the default.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.parse().unwrap_or_default()
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn quiz_questions(&self) -> &[QuizQuestion] {
        &self.quiz_questions
    }

    pub fn video_links(&self) -> &[VideoLink] {
        &self.video_links
    }

    /// `None` when the module has no usable assignment text.
    pub fn assignment_latex(&self) -> Option<&str> {
        self.assignment_latex
            .as_deref()
            .filter(|a| !a.trim().is_empty())
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// File-name friendly version of the title.
    pub fn slug(&self) -> String {
        let slug: String = self
            .title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let slug = slug
            .split('_')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        if slug.is_empty() { String::from("module") } else { slug }
    }
}

impl LearningModule {
    /// Titles of all of the actor's modules, newest first.
    pub async fn titles(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<Vec<String>> {
        let titles = sqlx::query_scalar(
            "SELECT title FROM learning_modules WHERE user_id = $1 ORDER BY created_at DESC, id",
        )
        .bind(actor.user_id())
        .fetch_all(mm.executor())
        .await?;
        Ok(titles)
    }
}

#[async_trait]
impl CrudRepository<LearningModule, ModuleCreate, Uuid> for LearningModule {
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: ModuleCreate,
    ) -> DatabaseResult<Self> {
        let ModuleCreate {
            difficulty,
            duration_minutes,
            generated,
        } = data;

        let created = sqlx::query_as(
            "INSERT INTO learning_modules
                (id, user_id, title, description, content, difficulty, duration_minutes,
                 quiz_questions, video_links, assignment_latex, prerequisites)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(actor.user_id())
        .bind(&generated.title)
        .bind(&generated.description)
        .bind(&generated.content)
        .bind(difficulty.as_str())
        .bind(duration_minutes)
        .bind(Json(&generated.quiz.questions))
        .bind(Json(&generated.video_links))
        .bind(&generated.assignment_latex)
        .bind(Json(&generated.prerequisites))
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM learning_modules WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let found = sqlx::query_as("SELECT * FROM learning_modules WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(found)
    }

    /// Only ever the actor's own modules.
    async fn list(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM learning_modules
             WHERE user_id = $1
             ORDER BY created_at DESC, id
             LIMIT $2 OFFSET $3",
        )
        .bind(actor.user_id())
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM learning_modules WHERE user_id = $1")
                .bind(actor.user_id())
                .fetch_one(mm.executor())
                .await?;

        Ok(result)
    }
}

#[async_trait]
impl HasOwner for LearningModule {
    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Uuid> {
        Ok(self.user_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn module(title: &str) -> LearningModule {
        LearningModule {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            content: String::new(),
            difficulty: String::from("Beginner"),
            duration_minutes: 30,
            quiz_questions: Json(vec![]),
            video_links: Json(vec![]),
            assignment_latex: Some(String::from("  ")),
            prerequisites: Json(vec![]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn slug_is_file_name_safe() {
        assert_eq!(module("Introduction to Python Lists!").slug(), "introduction_to_python_lists");
        assert_eq!(module("C++ & Rust").slug(), "c_rust");
        assert_eq!(module("???").slug(), "module");
    }

    #[test]
    fn stored_values_are_read_leniently() {
        let m = module("T");
        assert_eq!(m.difficulty(), Difficulty::Easy);
        assert_eq!(m.assignment_latex(), None);
    }
}
