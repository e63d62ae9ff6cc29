use crate::errors::ThemisError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemisConfig {
    pub version: u32,
    /// Rows buffered by a checkpoint before it is appended to disk.
    pub checkpoint_frequency: usize,
    /// Judgment score at or above which an answer counts as correct.
    pub judgment_threshold: f64,
    pub seed: Option<u64>,
    /// Unset means backend calls are never timed out.
    pub request_timeout_seconds: Option<u64>,
    pub solr: SolrSettings,
    pub log_level: String,
}

impl Default for ThemisConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            checkpoint_frequency: 100,
            judgment_threshold: crate::thresholds::DEFAULT_JUDGMENT_THRESHOLD,
            seed: None,
            request_timeout_seconds: None,
            solr: SolrSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolrSettings {
    pub answer_field: String,
    pub id_field: String,
    pub rows: u32,
}

impl Default for SolrSettings {
    fn default() -> Self {
        Self {
            answer_field: "text".to_string(),
            id_field: "id".to_string(),
            rows: 1,
        }
    }
}

/// Loads `path`, or returns defaults when it does not exist. Unknown keys are
/// an error in strict mode and a warning otherwise.
pub fn load_config(path: &Path, strict: bool) -> Result<ThemisConfig, ThemisError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(file = %path.display(), "no config file, using defaults");
            return Ok(ThemisConfig::default());
        }
        Err(e) => {
            return Err(ThemisError::Config(format!(
                "failed to read config {}: {}",
                path.display(),
                e
            )))
        }
    };
    parse_config(&raw, strict)
        .map_err(|e| ThemisError::Config(format!("{} (file: {})", e, path.display())))
}

pub fn parse_config(raw: &str, strict: bool) -> Result<ThemisConfig, String> {
    let mut ignored_keys = HashSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(raw);
    let cfg: ThemisConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.insert(path.to_string());
    })
    .map_err(|e| format!("failed to parse YAML: {}", e))?;

    let meaningful: Vec<_> = ignored_keys
        .iter()
        .filter(|k| !k.starts_with('_') && !k.starts_with("x-"))
        .collect();
    if !meaningful.is_empty() {
        if strict {
            return Err(format!("unknown config fields: {:?}", meaningful));
        }
        tracing::warn!(fields = ?meaningful, "ignored unknown config fields");
    }

    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        ));
    }
    Ok(cfg)
}

impl ThemisConfig {
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("THEMIS_LOG") {
            self.log_level = v;
        }
        if let Ok(v) = env::var("THEMIS_CHECKPOINT_FREQUENCY") {
            if let Ok(n) = v.parse() {
                self.checkpoint_frequency = n;
            }
        }
        if let Ok(v) = env::var("THEMIS_JUDGMENT_THRESHOLD") {
            if let Ok(n) = v.parse() {
                self.judgment_threshold = n;
            }
        }
        self
    }

    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.request_timeout_seconds
            .map(std::time::Duration::from_secs)
    }
}
