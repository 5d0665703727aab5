use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILENAME: &str = "relay-translator.toml";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TRANSLATION_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_STT_MODEL: &str = "openai/whisper-large-v3";
pub const DEFAULT_STORAGE_FILE: &str = "users.json";

pub const AVAILABLE_TRANSLATION_MODELS: &[&str] = &[
    "anthropic/claude-3.5-sonnet",
    "openai/gpt-4o",
    "openai/gpt-4o-mini",
    "google/gemini-pro-1.5",
    "meta-llama/llama-3.1-70b-instruct",
];

pub const AVAILABLE_STT_MODELS: &[&str] = &["openai/whisper-large-v3", "openai/whisper-1"];

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub models: ModelsSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub trace: TraceSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ApiSection {
    /// OpenRouter API key. The OPENROUTER_API_KEY env var takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ModelsSection {
    #[serde(default)]
    pub translation_model: Option<String>,
    #[serde(default)]
    pub stt_model: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct StorageSection {
    #[serde(default)]
    pub users_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TraceSection {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Fully resolved runtime settings, after env overrides and defaults.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub api_key: String,
    pub base_url: String,
    pub translation_model: String,
    pub stt_model: String,
    pub users_file: PathBuf,
    pub trace_dir: PathBuf,
    pub trace_enabled: bool,
}

pub fn find_default_config(workdir: &Path) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, DEFAULT_CONFIG_FILENAME, 8) {
            return Some(p);
        }
    }
    find_file_upwards(workdir, DEFAULT_CONFIG_FILENAME, 8)
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text).context("parse config toml")?;
    Ok(cfg)
}

pub fn resolve_config(cfg: &AppConfig) -> anyhow::Result<ResolvedConfig> {
    let api_key = std::env::var("OPENROUTER_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| cfg.api.api_key.clone())
        .ok_or_else(|| {
            anyhow!("no API key: set OPENROUTER_API_KEY or api.api_key in the config")
        })?;

    Ok(ResolvedConfig {
        api_key,
        base_url: cfg
            .api
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        translation_model: cfg
            .models
            .translation_model
            .clone()
            .unwrap_or_else(|| DEFAULT_TRANSLATION_MODEL.to_string()),
        stt_model: cfg
            .models
            .stt_model
            .clone()
            .unwrap_or_else(|| DEFAULT_STT_MODEL.to_string()),
        users_file: cfg
            .storage
            .users_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_FILE)),
        trace_dir: cfg
            .trace
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("trace")),
        trace_enabled: cfg.trace.enabled.unwrap_or(false),
    })
}

/// Write a commented default config, refusing to overwrite unless forced.
pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILENAME);
    if path.exists() && !force {
        return Err(anyhow!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        ));
    }
    std::fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;
    std::fs::write(&path, DEFAULT_CONFIG_TEXT)
        .with_context(|| format!("write config: {}", path.display()))?;
    Ok(path)
}

fn find_file_upwards(start: &Path, filename: &str, max_depth: usize) -> Option<PathBuf> {
    let mut dir = Some(start.to_path_buf());
    for _ in 0..max_depth {
        let d = dir?;
        let cand = d.join(filename);
        if cand.is_file() {
            return Some(cand);
        }
        dir = d.parent().map(Path::to_path_buf);
    }
    None
}

const DEFAULT_CONFIG_TEXT: &str = r#"# relay-translator configuration

[api]
# api_key = "sk-or-..."            # or set OPENROUTER_API_KEY
# base_url = "https://openrouter.ai/api/v1"

[models]
# translation_model = "anthropic/claude-3.5-sonnet"
# stt_model = "openai/whisper-large-v3"

[storage]
# users_file = "users.json"

[trace]
# dir = "trace"
# enabled = false
"#;
