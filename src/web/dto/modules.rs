use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{learning::Difficulty, web::extract::not_blank};

pub const DEFAULT_DURATION_MINUTES: i32 = 30;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct GenerateModuleBody {
    /// What the module should teach. `topic` is accepted as well.
    #[serde(alias = "topic")]
    #[validate(length(max = 500), custom(function = "not_blank"))]
    pub prompt: String,
    /// Defaults to `medium`.
    pub difficulty: Option<Difficulty>,
    /// Minutes, defaults to 30.
    #[validate(range(min = 5, max = 480))]
    pub duration: Option<i32>,
    #[validate(length(max = 2000))]
    pub background_knowledge: Option<String>,
}

impl GenerateModuleBody {
    pub fn duration_minutes(&self) -> i32 {
        self.duration.unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    pub fn background(&self) -> Option<String> {
        self.background_knowledge
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize, Validate, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1..=100, defaults to 20.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LatexResponse {
    pub latex: String,
}

#[cfg(test)]
mod test {
    use validator::Validate;

    use super::*;

    fn body(raw: serde_json::Value) -> GenerateModuleBody {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn defaults_and_aliases() {
        let b = body(serde_json::json!({"topic": "Python Lists", "difficulty": "Beginner"}));
        assert!(b.validate().is_ok());
        assert_eq!(b.prompt, "Python Lists");
        assert_eq!(b.difficulty, Some(Difficulty::Easy));
        assert_eq!(b.duration_minutes(), 30);
        assert_eq!(b.background(), None);
    }

    #[test]
    fn invalid_bodies_fail_validation() {
        assert!(body(serde_json::json!({"prompt": "   "})).validate().is_err());
        assert!(body(serde_json::json!({"prompt": "x", "duration": 2})).validate().is_err());
        assert!(body(serde_json::json!({"prompt": "x", "duration": 481})).validate().is_err());
        assert!(body(serde_json::json!({"prompt": "x".repeat(501)})).validate().is_err());
        assert!(serde_json::from_value::<GenerateModuleBody>(
            serde_json::json!({"prompt": "x", "difficulty": "expert"})
        )
        .is_err());
    }

    #[test]
    fn list_query_is_clamped() {
        let q = ListQuery { limit: Some(1000), offset: Some(-3) };
        assert_eq!((q.limit(), q.offset()), (100, 0));
        let q = ListQuery { limit: None, offset: None };
        assert_eq!((q.limit(), q.offset()), (20, 0));
    }
}
