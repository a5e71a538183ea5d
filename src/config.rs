use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_OUTPUT_DIR: &str = "./generated_images";

/// Configuration for the Hugging Face inference client.
#[derive(Debug, Clone)]
pub struct HfConfig {
    pub api_token: Option<String>,
    pub api_base: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl Default for HfConfig {
    fn default() -> Self {
        HfConfig {
            api_token: None,
            api_base: None,
            output_dir: None,
        }
    }
}

impl HfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_token = env::var("HF_API_TOKEN").ok();
        let api_base = env::var("HF_API_BASE").ok();
        let output_dir = env::var("HF_OUTPUT_DIR").ok().map(PathBuf::from);

        HfConfig {
            api_token,
            api_base,
            output_dir,
        }
    }

    pub fn with_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

/// Fails closed: a missing or whitespace-only token is invalid.
pub fn validate_api_token(api_token: Option<&str>) -> bool {
    match api_token {
        Some(token) => !token.trim().is_empty(),
        None => false,
    }
}
