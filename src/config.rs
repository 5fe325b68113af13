use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum |percent change| for a comparison to produce an insight (inclusive).
pub const DEFAULT_INSIGHT_THRESHOLD_PCT: f64 = 5.0;
pub const DEFAULT_HANDLING_RATE_TARGET: f64 = 85.0;
pub const DEFAULT_CSAT_TARGET: f64 = 4.0;
pub const DEFAULT_FINALIZATION_RATE_TARGET: f64 = 95.0;
pub const DEFAULT_CONVERSION_RATE_TARGET: f64 = 12.0;
/// Lower is better.
pub const DEFAULT_OUT_OF_QUEUE_RATE_LIMIT: f64 = 30.0;
pub const DEFAULT_TIRE_METRIC_TARGET: f64 = 4.0;
/// Lower is better.
pub const DEFAULT_NO_ANSWER_RATE_LIMIT: f64 = 15.0;
pub const DEFAULT_AGENT_CSAT_TARGET: f64 = 4.0;
pub const DEFAULT_AGENT_PERFORMANCE_GOOD: f64 = 80.0;
pub const DEFAULT_AGENT_PERFORMANCE_FAIR: f64 = 60.0;
pub const DEFAULT_MODEL_CONVERSION_TARGET: f64 = 15.0;
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_DATA_DIR: &str = "data";

/// Where the four dashboard JSON resources live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataSource {
    #[serde(rename_all = "camelCase")]
    Directory { path: PathBuf },
    #[serde(rename_all = "camelCase")]
    Http { base_url: String },
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Directory {
            path: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub insight_threshold_pct: f64,
    pub handling_rate_target: f64,
    pub csat_target: f64,
    pub finalization_rate_target: f64,
    pub conversion_rate_target: f64,
    pub out_of_queue_rate_limit: f64,
    pub tire_metric_target: f64,
    pub no_answer_rate_limit: f64,
    pub agent_csat_target: f64,
    pub agent_performance_good: f64,
    pub agent_performance_fair: f64,
    pub model_conversion_target: f64,
    pub load_timeout_secs: u64,
    pub max_upload_bytes: u64,
    pub data_source: DataSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            insight_threshold_pct: DEFAULT_INSIGHT_THRESHOLD_PCT,
            handling_rate_target: DEFAULT_HANDLING_RATE_TARGET,
            csat_target: DEFAULT_CSAT_TARGET,
            finalization_rate_target: DEFAULT_FINALIZATION_RATE_TARGET,
            conversion_rate_target: DEFAULT_CONVERSION_RATE_TARGET,
            out_of_queue_rate_limit: DEFAULT_OUT_OF_QUEUE_RATE_LIMIT,
            tire_metric_target: DEFAULT_TIRE_METRIC_TARGET,
            no_answer_rate_limit: DEFAULT_NO_ANSWER_RATE_LIMIT,
            agent_csat_target: DEFAULT_AGENT_CSAT_TARGET,
            agent_performance_good: DEFAULT_AGENT_PERFORMANCE_GOOD,
            agent_performance_fair: DEFAULT_AGENT_PERFORMANCE_FAIR,
            model_conversion_target: DEFAULT_MODEL_CONVERSION_TARGET,
            load_timeout_secs: DEFAULT_LOAD_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            data_source: DataSource::default(),
        }
    }
}

/// Reads a JSON config file. Keys absent from the file keep their defaults;
/// a missing file yields the full default config.
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&raw)?;
    Ok(config)
}

/// Builds a config from string key/value pairs.
/// Unknown keys are ignored and unparsable values keep the default.
pub fn config_from_pairs<I, K, V>(pairs: I) -> AppConfig
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut config = AppConfig::default();
    apply_pairs(&mut config, pairs);
    config
}

/// Overwrites the keys present in `pairs`, leaving the rest of `config` as is.
pub fn apply_pairs<I, K, V>(config: &mut AppConfig, pairs: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (key, value) in pairs {
        apply_pair(config, key.as_ref(), value.as_ref());
    }
}

fn apply_pair(config: &mut AppConfig, key: &str, value: &str) {
    let value = value.trim();
    match key {
        "insight_threshold_pct" => {
            config.insight_threshold_pct = value.parse().unwrap_or(DEFAULT_INSIGHT_THRESHOLD_PCT)
        }
        "handling_rate_target" => {
            config.handling_rate_target = value.parse().unwrap_or(DEFAULT_HANDLING_RATE_TARGET)
        }
        "csat_target" => config.csat_target = value.parse().unwrap_or(DEFAULT_CSAT_TARGET),
        "finalization_rate_target" => {
            config.finalization_rate_target =
                value.parse().unwrap_or(DEFAULT_FINALIZATION_RATE_TARGET)
        }
        "conversion_rate_target" => {
            config.conversion_rate_target = value.parse().unwrap_or(DEFAULT_CONVERSION_RATE_TARGET)
        }
        "out_of_queue_rate_limit" => {
            config.out_of_queue_rate_limit =
                value.parse().unwrap_or(DEFAULT_OUT_OF_QUEUE_RATE_LIMIT)
        }
        "tire_metric_target" => {
            config.tire_metric_target = value.parse().unwrap_or(DEFAULT_TIRE_METRIC_TARGET)
        }
        "no_answer_rate_limit" => {
            config.no_answer_rate_limit = value.parse().unwrap_or(DEFAULT_NO_ANSWER_RATE_LIMIT)
        }
        "agent_csat_target" => {
            config.agent_csat_target = value.parse().unwrap_or(DEFAULT_AGENT_CSAT_TARGET)
        }
        "agent_performance_good" => {
            config.agent_performance_good = value.parse().unwrap_or(DEFAULT_AGENT_PERFORMANCE_GOOD)
        }
        "agent_performance_fair" => {
            config.agent_performance_fair = value.parse().unwrap_or(DEFAULT_AGENT_PERFORMANCE_FAIR)
        }
        "model_conversion_target" => {
            config.model_conversion_target =
                value.parse().unwrap_or(DEFAULT_MODEL_CONVERSION_TARGET)
        }
        "load_timeout_secs" => {
            config.load_timeout_secs = value.parse().unwrap_or(DEFAULT_LOAD_TIMEOUT_SECS)
        }
        "max_upload_bytes" => {
            config.max_upload_bytes = value.parse().unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
        }
        "data_source" => {
            if let Ok(source) = serde_json::from_str(value) {
                config.data_source = source;
            }
        }
        _ => {}
    }
}

/// Inverse of [`config_from_pairs`].
pub fn config_to_pairs(config: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        ("insight_threshold_pct", config.insight_threshold_pct.to_string()),
        ("handling_rate_target", config.handling_rate_target.to_string()),
        ("csat_target", config.csat_target.to_string()),
        (
            "finalization_rate_target",
            config.finalization_rate_target.to_string(),
        ),
        (
            "conversion_rate_target",
            config.conversion_rate_target.to_string(),
        ),
        (
            "out_of_queue_rate_limit",
            config.out_of_queue_rate_limit.to_string(),
        ),
        ("tire_metric_target", config.tire_metric_target.to_string()),
        ("no_answer_rate_limit", config.no_answer_rate_limit.to_string()),
        ("agent_csat_target", config.agent_csat_target.to_string()),
        (
            "agent_performance_good",
            config.agent_performance_good.to_string(),
        ),
        (
            "agent_performance_fair",
            config.agent_performance_fair.to_string(),
        ),
        (
            "model_conversion_target",
            config.model_conversion_target.to_string(),
        ),
        ("load_timeout_secs", config.load_timeout_secs.to_string()),
        ("max_upload_bytes", config.max_upload_bytes.to_string()),
        (
            "data_source",
            serde_json::to_string(&config.data_source).unwrap_or_default(),
        ),
    ]
}
