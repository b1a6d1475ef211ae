use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metric names produced by the precomputed statewide analytics rows.
pub mod metrics {
    pub const WEIGHTED_WIN_RATE: &str = "weighted_win_rate";
    pub const OPPONENT_STRENGTH: &str = "opponent_strength";
    pub const ACTIVITY_SCORE: &str = "activity_score";
    pub const UPSET_RATE: &str = "upset_rate";
    pub const AVG_SEED_DELTA: &str = "avg_seed_delta";
    pub const AVG_EVENT_ENTRANTS: &str = "avg_event_entrants";
    pub const LARGE_EVENT_SHARE: &str = "large_event_share";
    pub const ENTRANTS: &str = "entrants";
}

/// A ranked participant: identifier, raw metric record, and passthrough display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default, alias = "displayFields")]
    pub display_fields: BTreeMap<String, String>,
    /// `null` values are dropped on the way in and read as missing.
    #[serde(default, deserialize_with = "present_metrics")]
    pub metrics: BTreeMap<String, f64>,
}

fn present_metrics<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(metric, value)| value.map(|value| (metric, value)))
        .collect())
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_fields: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, metric: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(metric.into(), value);
        self
    }

    pub fn with_display(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.display_fields.insert(field.into(), value.into());
        self
    }

    /// Finite raw value for `metric`; NaN and infinities read as missing.
    pub fn metric(&self, metric: &str) -> Option<f64> {
        self.metrics
            .get(metric)
            .copied()
            .filter(|value| value.is_finite())
    }
}

/// Whether a lower or a higher raw value is the better one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Lower raw value is better.
    Asc,
    /// Higher raw value is better.
    Desc,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Desc
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metric's share of an entity's composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricContribution {
    pub metric: String,
    /// `None` when the entity lacked the metric and the population mean was used.
    pub raw_value: Option<f64>,
    pub normalized_value: f64,
    pub weighted_contribution: f64,
}

impl MetricContribution {
    pub fn substituted(&self) -> bool {
        self.raw_value.is_none()
    }
}

/// Entity with its composite score and per-metric breakdown, in profile order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub entity: Entity,
    pub score: f64,
    pub breakdown: Vec<MetricContribution>,
}

impl ScoredEntity {
    pub fn id(&self) -> &str {
        &self.entity.id
    }
}
