use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Everything the CLI reads from `config/` and the environment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// SAFER endpoints and HTTP settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_snapshot_url")]
    pub snapshot_url: String,

    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Batch lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_snapshot_url() -> String {
    "https://safer.fmcsa.dot.gov/query.asp".to_string()
}
fn default_search_url() -> String {
    "https://safer.fmcsa.dot.gov/keywordx.asp".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/92.0.4515.131 Mobile Safari/537.36"
        .to_string()
}
fn default_concurrency() -> usize {
    4
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            snapshot_url: default_snapshot_url(),
            search_url: default_search_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// `config/default.toml`, then `config/local.toml`, then environment overrides
    /// (`SAFER__CLIENT__SNAPSHOT_URL`, `SAFER__PIPELINE__CONCURRENCY`, …).
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("SAFER").separator("__"))
            .build()
            .context("Failed to read configuration")?;

        cfg.try_deserialize().context("Invalid configuration")
    }
}
