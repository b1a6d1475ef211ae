use crate::policy::PolicyConfig;
use crate::ranking::metrics::{ACTIVITY_SCORE, ENTRANTS};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let allow_high_intensity = match env::var("RANK_ALLOW_HIGH_INTENSITY") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidFlag {
                var: "RANK_ALLOW_HIGH_INTENSITY",
                value: raw,
            })?,
            Err(_) => false,
        };

        let policy = PolicyConfig::new(allow_high_intensity)
            .deny(parse_list(&env::var("RANK_DENIED_OPERATIONS").unwrap_or_default()))
            .allow(parse_list(&env::var("RANK_ALLOWED_OPERATIONS").unwrap_or_default()));

        let profile_path = env::var("RANK_PROFILE_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let sample_size_metric = metric_name("RANK_SAMPLE_SIZE_METRIC", ENTRANTS)?;
        let activity_metric = metric_name("RANK_ACTIVITY_METRIC", ACTIVITY_SCORE)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            ranking: RankingConfig {
                policy,
                profile_path,
                sample_size_metric,
                activity_metric,
            },
        })
    }
}

/// Ranking engine and policy guard settings.
#[derive(Debug, Clone)]
pub struct RankingConfig {
    pub policy: PolicyConfig,
    /// JSON profile table replacing the built-in weights.
    pub profile_path: Option<PathBuf>,
    pub sample_size_metric: String,
    pub activity_metric: String,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            profile_path: None,
            sample_size_metric: ENTRANTS.to_string(),
            activity_metric: ACTIVITY_SCORE.to_string(),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn metric_name(var: &'static str, default: &str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(raw) if raw.trim().is_empty() => Err(ConfigError::EmptyMetric { var }),
        Ok(raw) => Ok(raw.trim().to_string()),
        Err(_) => Ok(default.to_string()),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFlag { var: &'static str, value: String },
    EmptyMetric { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFlag { var, value } => {
                write!(f, "{var} must be a boolean (true/false), got '{value}'")
            }
            ConfigError::EmptyMetric { var } => write!(f, "{var} must name a metric"),
        }
    }
}

impl std::error::Error for ConfigError {}
