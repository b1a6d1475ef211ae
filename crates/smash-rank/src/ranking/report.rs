use super::domain::metrics::AVG_SEED_DELTA;
use super::profiles::{MetricWeight, RankingIntent, RankingProfile};
use super::shaper::RankedEntry;
use serde::Serialize;

pub const MISSING_METRIC_HANDLING: &str = "population_mean";
pub const NORMALIZATION: &str = "min_max";

/// Fixed explanation of the signed seed delta metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedDeltaSemantics {
    pub metric: &'static str,
    pub negative: &'static str,
    pub positive: &'static str,
    pub zero: &'static str,
}

impl Default for SeedDeltaSemantics {
    fn default() -> Self {
        Self {
            metric: AVG_SEED_DELTA,
            negative: "outperformed_seed (good)",
            positive: "underperformed_seed (bad)",
            zero: "met_seed",
        }
    }
}

/// How a leaderboard was produced, for user-facing transparency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDescription {
    pub intent: RankingIntent,
    pub intent_label: String,
    pub description: String,
    pub weights: Vec<MetricWeight>,
    pub normalization: &'static str,
    pub missing_metric_handling: &'static str,
    pub tie_break_order: Vec<String>,
    pub seed_delta_semantics: SeedDeltaSemantics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduction_note: Option<String>,
}

impl MethodDescription {
    pub fn new(
        profile: &RankingProfile,
        tie_break_order: Vec<String>,
        reduction_note: Option<String>,
    ) -> Self {
        Self {
            intent: profile.intent,
            intent_label: profile.label.clone(),
            description: profile.description.clone(),
            weights: profile.weights.clone(),
            normalization: NORMALIZATION,
            missing_metric_handling: MISSING_METRIC_HANDLING,
            tie_break_order,
            seed_delta_semantics: SeedDeltaSemantics::default(),
            reduction_note,
        }
    }

    /// One-line summary, e.g. `Most Clutch Players (clutch): upset_rate 0.40 desc, ...`.
    pub fn summary(&self) -> String {
        let weights: Vec<String> = self
            .weights
            .iter()
            .map(|weight| format!("{} {:.2} {}", weight.metric, weight.weight, weight.direction))
            .collect();

        let mut summary = format!(
            "{} ({}): {}; min-max normalized per query, missing metrics use the population mean, ties broken by {}",
            self.intent_label,
            self.intent,
            weights.join(", "),
            self.tie_break_order.join(" then ")
        );
        if let Some(note) = &self.reduction_note {
            summary.push_str(". ");
            summary.push_str(note);
        }
        summary
    }
}

/// Complete, explained leaderboard for one ranking call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingOutcome {
    pub method: MethodDescription,
    pub count_original: usize,
    pub count_considered: usize,
    pub count_eligible: usize,
    pub entries: Vec<RankedEntry>,
}

impl RankingOutcome {
    pub fn method_summary(&self) -> String {
        self.method.summary()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.id.as_str()).collect()
    }
}
