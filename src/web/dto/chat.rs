use serde::Deserialize;
use validator::Validate;

use crate::web::extract::not_blank;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct ChatBody {
    #[validate(length(max = 4000), custom(function = "not_blank"))]
    pub message: String,
    /// Id of the module the learner is looking at, if any.
    pub current_module: Option<String>,
}
