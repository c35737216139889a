//! Content providers: whatever writes modules and answers chat messages.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config,
    learning::{Difficulty, GeneratedModule},
};

mod error;
pub use error::{ProviderError, ProviderResult};

mod gemini;
pub use gemini::GeminiProvider;

mod offline;
pub use offline::OfflineProvider;

pub mod parse;
pub mod videos;

/// A module the learner already worked through.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub title: String,
    pub score: Option<f64>,
}

/// Everything a provider gets to write one module.
#[derive(Debug, Clone)]
pub struct ModuleBrief {
    pub prompt: String,
    pub difficulty: Difficulty,
    pub duration_minutes: i32,
    pub background: Option<String>,
    pub history: Vec<HistoryEntry>,
}

/// The module a chat message is asked about.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ChatBrief {
    pub message: String,
    pub current_module: Option<ModuleContext>,
    /// Titles of the learner's modules, newest first.
    pub known_modules: Vec<String>,
}

impl ChatBrief {
    pub fn has_context(&self) -> bool {
        self.current_module.is_some() || !self.known_modules.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub learning_insights: Vec<String>,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub context_used: bool,
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Writes a complete module. The result is already normalized and carries
    /// its video recommendations.
    async fn generate_module(&self, brief: &ModuleBrief) -> ProviderResult<GeneratedModule>;

    async fn chat(&self, brief: &ChatBrief) -> ProviderResult<ChatReply>;
}

/// Builds the provider named in the config. Gemini without an API key falls
/// back to the offline provider.
pub fn from_config(config: &config::Provider) -> ProviderResult<Arc<dyn ContentProvider>> {
    match (config.kind(), config.api_key()) {
        (config::ProviderKind::Gemini, Some(key)) => Ok(Arc::new(GeminiProvider::new(
            key,
            config.model(),
            config.base_url(),
            config.timeout_secs(),
        )?)),
        (config::ProviderKind::Gemini, None) => {
            tracing::warn!("No Gemini API key configured, using offline content provider.");
            Ok(Arc::new(OfflineProvider))
        }
        (config::ProviderKind::Offline, _) => Ok(Arc::new(OfflineProvider)),
    }
}
