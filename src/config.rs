use crate::search::Bm25Params;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// File the configuration was read from; `None` means built-in defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// BM25 parameters and default retrieval depth
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_k1")]
    pub k1: f64,
    #[serde(default = "default_b")]
    pub b: f64,
    #[serde(default = "default_k")]
    pub default_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k1: default_k1(),
            b: default_b(),
            default_k: default_k(),
        }
    }
}

/// Evaluation sweep settings
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    #[serde(default = "default_max_k")]
    pub max_k: usize,
    #[serde(default = "default_faithfulness_threshold")]
    pub faithfulness_threshold: f64,
    /// Documents used as context when generating a candidate answer
    #[serde(default = "default_candidate_k")]
    pub candidate_k: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_k: default_max_k(),
            faithfulness_threshold: default_faithfulness_threshold(),
            candidate_k: default_candidate_k(),
        }
    }
}

/// Optional chat-completions answerer
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_enabled")]
    pub enabled: bool,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_llm_enabled(),
            model: default_llm_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Report locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_leaderboard")]
    pub leaderboard: PathBuf,
    #[serde(default = "default_readme")]
    pub readme: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            leaderboard: default_leaderboard(),
            readme: default_readme(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_k1() -> f64 {
    1.5
}

fn default_b() -> f64 {
    0.75
}

fn default_k() -> usize {
    3
}

fn default_max_k() -> usize {
    3
}

fn default_faithfulness_threshold() -> f64 {
    0.6
}

fn default_candidate_k() -> usize {
    1
}

fn default_llm_enabled() -> bool {
    true
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    128
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_leaderboard() -> PathBuf {
    PathBuf::from("leaderboard.md")
}

fn default_readme() -> PathBuf {
    PathBuf::from("README.md")
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Resolution order:
    /// 1. Path in PUBMEDRAG_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory, if present
    /// 3. Built-in defaults
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config = match std::env::var("PUBMEDRAG_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let local = PathBuf::from("config.toml");
                if local.is_file() {
                    Self::from_file(&local)?
                } else {
                    Config::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without validation
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Initialize `env_logger` with `general.log_level` as the default filter
    /// (RUST_LOG still wins), then report where the configuration came from.
    pub fn init_logger(&self) {
        env_logger::Builder::from_env(
            env_logger::Env::default().filter_or("RUST_LOG", self.general.log_level.as_str()),
        )
        .init();

        match &self.source {
            Some(path) => log::debug!("Loaded configuration from {}", path.display()),
            None => log::debug!("No config.toml found, using defaults"),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.retrieval.k1 > 0.0) {
            anyhow::bail!("retrieval.k1 must be greater than 0");
        }

        if !(0.0..=1.0).contains(&self.retrieval.b) {
            anyhow::bail!("retrieval.b must be between 0.0 and 1.0");
        }

        if self.retrieval.default_k == 0 {
            anyhow::bail!("retrieval.default_k must be greater than 0");
        }

        if self.eval.max_k == 0 {
            anyhow::bail!("eval.max_k must be greater than 0");
        }

        if self.eval.candidate_k == 0 {
            anyhow::bail!("eval.candidate_k must be greater than 0");
        }

        if !(0.0..=1.0).contains(&self.eval.faithfulness_threshold) {
            anyhow::bail!("eval.faithfulness_threshold must be between 0.0 and 1.0");
        }

        Ok(())
    }

    /// BM25 parameters for the ranking engine
    pub fn bm25_params(&self) -> Bm25Params {
        Bm25Params {
            k1: self.retrieval.k1,
            b: self.retrieval.b,
        }
    }
}
