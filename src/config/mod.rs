use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{CONFIG_PATH_ENV, find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
    #[serde(default)]
    provider: Provider,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    #[serde(default)]
    docs: bool,
    #[serde(default = "default_token_ttl")]
    token_ttl_minutes: i64,
    #[serde(default)]
    cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Offline,
}

#[derive(Debug, Deserialize)]
pub struct Provider {
    #[serde(default = "default_provider_kind")]
    kind: ProviderKind,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default)]
    api_key: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
}

/// One year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 366 * 24 * 60;

fn default_token_ttl() -> i64 {
    24 * 60
}

fn default_provider_kind() -> ProviderKind {
    ProviderKind::Offline
}

fn default_model() -> String {
    String::from("gemini-1.5-flash")
}

fn default_base_url() -> String {
    String::from("https://generativelanguage.googleapis.com")
}

fn default_timeout() -> u64 {
    120
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            model: default_model(),
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    let mut config: Self = toml::from_slice(&bytes)?;
                    config.apply_env();
                    config.validate()?;
                    Ok(config)
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        crate::error::log_error(&e);
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.app.token_ttl_minutes) {
            return Err(ConfigError::Invalid(format!(
                "app.token_ttl_minutes must be within 1..={MAX_TOKEN_TTL_MINUTES}, got {}",
                self.app.token_ttl_minutes
            )));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(String::from(
                "provider.timeout_secs must be positive",
            )));
        }
        Ok(())
    }

    /// Secrets may come from the environment (or `.env`) instead of the file.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.provider.api_key = key;
            }
        }
        if let Ok(uri) = std::env::var("DATABASE_URL") {
            if !uri.trim().is_empty() {
                self.app.database_uri = uri;
            }
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.trim().is_empty() {
                self.app.jwt = secret;
            }
        }
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn token_ttl_minutes(&self) -> i64 {
        self.token_ttl_minutes
    }

    #[inline]
    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }
}

impl Provider {
    #[inline]
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// `None` when the key is unset or left as an empty placeholder.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        if key.is_empty() { None } else { Some(key) }
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn config_test() {
        let config = Config::get_or_init(true).await;
        assert_eq!(config.host().bindto(), "127.0.0.1:5000"); // defaults
        assert!(config.app().token_ttl_minutes() > 0);
    }

    #[test]
    fn provider_section_is_optional() {
        let raw = r#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/gyanforge"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.provider().kind(), ProviderKind::Offline);
        assert_eq!(config.provider().api_key(), None);
        assert_eq!(config.provider().timeout_secs(), 120);
        assert_eq!(config.app().token_ttl_minutes(), 1440);
        assert!(!config.app().docs());
    }

    #[test]
    fn provider_section_parses_gemini() {
        let raw = r#"
            [host]
            bindto = "0.0.0.0:8080"

            [app]
            jwt = "secret"
            database_uri = "postgres://localhost/gyanforge"
            cors_origins = ["http://localhost:3000"]

            [provider]
            kind = "gemini"
            model = "gemini-1.5-pro"
            api_key = "  "
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.provider().kind(), ProviderKind::Gemini);
        assert_eq!(config.provider().model(), "gemini-1.5-pro");
        assert_eq!(config.provider().api_key(), None);
        assert_eq!(config.app().cors_origins(), ["http://localhost:3000".to_string()]);
    }

    #[test]
    fn token_lifetime_is_bounded() {
        let config = |ttl: i64| -> Config {
            toml::from_str(&format!(
                r#"
                [host]
                bindto = "0.0.0.0:8080"

                [app]
                jwt = "secret"
                database_uri = "postgres://localhost/gyanforge"
                token_ttl_minutes = {ttl}
                "#
            ))
            .unwrap()
        };

        assert!(config(60).validate().is_ok());
        assert!(config(MAX_TOKEN_TTL_MINUTES).validate().is_ok());
        for ttl in [0, -5, MAX_TOKEN_TTL_MINUTES + 1, i64::MAX] {
            assert!(matches!(config(ttl).validate(), Err(ConfigError::Invalid(_))), "{ttl}");
        }
    }
}
