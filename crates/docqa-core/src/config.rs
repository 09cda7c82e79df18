//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_ENGINE__RETRIEVAL__GLOBAL_TOP_K`).
//! Sections that are absent fall back to their defaults.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::data_processor::ChunkingConfig;

/// Which chunks a vocabulary (and its IDF) is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyScope {
    /// One vocabulary per document; scores from different documents are
    /// merged as-is.
    #[default]
    PerDocument,
    /// One vocabulary over every supplied chunk, so scores share a scale.
    Corpus,
}

/// How query vectors are weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryWeighting {
    /// Raw term frequency, no IDF factor.
    #[default]
    TermFrequency,
    /// Term frequency times the chunk corpus IDF.
    TfIdf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub per_doc_top_k: usize,
    pub global_top_k: usize,
    /// Scores at or below this value are dropped.
    pub relevance_floor: f64,
    /// Upper bound for the confidence percentage.
    pub confidence_cap: f64,
    pub vocabulary_scope: VocabularyScope,
    pub query_weighting: QueryWeighting,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            per_doc_top_k: 3,
            global_top_k: 5,
            relevance_floor: 0.05,
            confidence_cap: 95.0,
            vocabulary_scope: VocabularyScope::PerDocument,
            query_weighting: QueryWeighting::TermFrequency,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        self.chunking.step()?;
        if !(0.0..=100.0).contains(&self.retrieval.confidence_cap) {
            return Err(crate::error::Error::InvalidConfiguration(format!(
                "confidence_cap must be within 0..=100, got {}",
                self.retrieval.confidence_cap
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory scanned for `.txt` documents.
    pub docs_dir: String,
    /// JSON-lines file of persisted chunk records.
    pub records_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { docs_dir: "data/docs".to_string(), records_path: "data/chunks.jsonl".to_string() }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    /// Wrap an already-assembled figment; no files or env are read.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like [`Config::get`], but an absent key yields `T::default()`.
    pub fn get_or_default<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.contains(key) { self.get(key) } else { Ok(T::default()) }
    }

    /// The validated `[engine]` section.
    pub fn engine(&self) -> anyhow::Result<EngineConfig> {
        let engine: EngineConfig = self.get_or_default("engine")?;
        engine.validate()?;
        Ok(engine)
    }

    pub fn data(&self) -> anyhow::Result<DataConfig> {
        self.get_or_default("data")
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        self.engine()?;
        match env {
            "prod" | "production" => {
                if !self.figment.contains("data.docs_dir") {
                    tracing::warn!("data.docs_dir not set for {}; using default", env);
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            other => tracing::debug!("unknown RUST_ENV '{}', only config.toml and APP_* applied", other),
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against `base` after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
