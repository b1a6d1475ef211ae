//! Intensity policy: which analytics backend operations a query may use.

mod operations;
mod request;

pub use operations::{
    lookup as lookup_operation, IntensityClass, OperationSpec, HEALTH, HEAVY_SET_ANALYSIS,
    OPERATIONS, PRECOMPUTED, PRECOMPUTED_SERIES, TOURNAMENT_LOOKUP, TOURNAMENT_PLAYER_ANALYTICS,
    TOURNAMENT_SEARCH,
};
pub use request::{tournament_resolution_guidance, AnalyticsRequestDetector};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Startup policy settings. Operation names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub allow_high_intensity: bool,
    /// Always denied, even when high intensity is enabled.
    #[serde(default)]
    pub denied_operations: BTreeSet<String>,
    /// High-intensity operations permitted even while the global flag is off.
    #[serde(default)]
    pub allowed_operations: BTreeSet<String>,
}

impl PolicyConfig {
    pub fn new(allow_high_intensity: bool) -> Self {
        Self {
            allow_high_intensity,
            ..Self::default()
        }
    }

    pub fn deny<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.denied_operations
            .extend(operations.into_iter().map(|name| normalize(name.as_ref())));
        self
    }

    pub fn allow<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_operations
            .extend(operations.into_iter().map(|name| normalize(name.as_ref())));
        self
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

fn normalize_all(names: &BTreeSet<String>) -> BTreeSet<String> {
    names.iter().map(|name| normalize(name)).collect()
}

/// Why a high-intensity operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// High-intensity operations are switched off for this deployment.
    HighIntensityDisabled,
    /// The operation is on the configured deny list.
    ExplicitlyDenied,
    /// The user's request did not explicitly ask for analytics.
    NotRequested,
}

impl DenialReason {
    pub const fn summary(self) -> &'static str {
        match self {
            Self::HighIntensityDisabled => "high-intensity operations are disabled",
            Self::ExplicitlyDenied => "operation is explicitly denied by policy",
            Self::NotRequested => "user did not explicitly ask for player analytics",
        }
    }
}

/// A refused operation, with a low-intensity alternative when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("policy blocked {intensity}-intensity operation '{operation}': {}{}", .reason.summary(), fallback_hint(.fallback))]
pub struct PolicyDenial {
    pub operation: String,
    pub intensity: IntensityClass,
    pub reason: DenialReason,
    pub fallback: Option<&'static str>,
}

fn fallback_hint(fallback: &Option<&'static str>) -> String {
    match fallback {
        Some(name) => format!("; use low-intensity '{name}' instead"),
        None => String::new(),
    }
}

/// Outcome of a single policy decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Authorization {
    Allowed {
        operation: String,
        intensity: IntensityClass,
    },
    Denied(PolicyDenial),
}

impl Authorization {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Authorization::Allowed { .. })
    }

    pub fn into_result(self) -> Result<IntensityClass, PolicyDenial> {
        match self {
            Authorization::Allowed { intensity, .. } => Ok(intensity),
            Authorization::Denied(denial) => Err(denial),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Authorization::Allowed {
                operation,
                intensity,
            } => format!("allowed {intensity}-intensity operation '{operation}'"),
            Authorization::Denied(denial) => denial.to_string(),
        }
    }
}

/// Pure decision function over static configuration and the operation table.
#[derive(Debug, Clone, Default)]
pub struct IntensityPolicyGuard {
    config: PolicyConfig,
    detector: AnalyticsRequestDetector,
}

impl IntensityPolicyGuard {
    pub fn new(config: PolicyConfig) -> Self {
        let config = PolicyConfig {
            allow_high_intensity: config.allow_high_intensity,
            denied_operations: normalize_all(&config.denied_operations),
            allowed_operations: normalize_all(&config.allowed_operations),
        };
        Self {
            config,
            detector: AnalyticsRequestDetector,
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Unknown operations are treated as high intensity.
    pub fn classify(&self, operation: &str) -> IntensityClass {
        lookup_operation(operation)
            .map(|spec| spec.intensity)
            .unwrap_or(IntensityClass::High)
    }

    pub fn authorize(&self, operation: &str) -> Authorization {
        let spec = lookup_operation(operation);
        let intensity = spec
            .map(|spec| spec.intensity)
            .unwrap_or(IntensityClass::High);
        let name = spec
            .map(|spec| spec.name.to_string())
            .unwrap_or_else(|| operation.trim().to_string());
        let key = normalize(operation);

        let reason = match intensity {
            IntensityClass::Low => None,
            IntensityClass::High if self.config.denied_operations.contains(&key) => {
                Some(DenialReason::ExplicitlyDenied)
            }
            IntensityClass::High
                if self.config.allow_high_intensity
                    || self.config.allowed_operations.contains(&key) =>
            {
                None
            }
            IntensityClass::High => Some(DenialReason::HighIntensityDisabled),
        };

        match reason {
            None => {
                debug!(operation = %name, %intensity, "operation authorized");
                Authorization::Allowed {
                    operation: name,
                    intensity,
                }
            }
            Some(reason) => {
                warn!(operation = %name, reason = reason.summary(), "operation denied");
                Authorization::Denied(PolicyDenial {
                    operation: name,
                    intensity,
                    reason,
                    fallback: spec.and_then(|spec| spec.fallback),
                })
            }
        }
    }

    /// Like [`authorize`](Self::authorize), but high-intensity operations additionally
    /// require the user's request to explicitly ask for analytics.
    pub fn authorize_for_request(&self, operation: &str, user_request: &str) -> Authorization {
        match self.authorize(operation) {
            Authorization::Allowed {
                operation,
                intensity: IntensityClass::High,
            } if !self.detector.requests_analytics(user_request) => {
                warn!(%operation, "high-intensity operation not requested by user");
                Authorization::Denied(PolicyDenial {
                    fallback: lookup_operation(&operation).and_then(|spec| spec.fallback),
                    operation,
                    intensity: IntensityClass::High,
                    reason: DenialReason::NotRequested,
                })
            }
            decision => decision,
        }
    }
}
