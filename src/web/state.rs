use std::{sync::Arc, time::Instant};

use crate::{model::ModelManager, provider::ContentProvider};

/// Token signing settings, read once from the config.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    jwt_secret: Arc<str>,
    token_ttl_minutes: i64,
}

impl AuthSettings {
    pub fn new(jwt_secret: &str, token_ttl_minutes: i64) -> Self {
        Self {
            jwt_secret: Arc::from(jwt_secret),
            token_ttl_minutes,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn token_ttl_minutes(&self) -> i64 {
        self.token_ttl_minutes
    }
}

#[derive(Clone)]
pub struct AppState {
    mm: ModelManager,
    provider: Arc<dyn ContentProvider>,
    auth: AuthSettings,
    started_at: Instant,
}

impl AppState {
    pub fn new(mm: ModelManager, provider: Arc<dyn ContentProvider>, auth: AuthSettings) -> Self {
        Self {
            mm,
            provider,
            auth,
            started_at: Instant::now(),
        }
    }

    pub fn pool(&self) -> &ModelManager {
        &self.mm
    }

    pub fn provider(&self) -> &dyn ContentProvider {
        self.provider.as_ref()
    }

    pub fn auth(&self) -> &AuthSettings {
        &self.auth
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("mm", &self.mm)
            .field("provider", &self.provider.name())
            .field("auth", &self.auth)
            .finish()
    }
}
