use super::domain::metrics::{AVG_SEED_DELTA, ENTRANTS};
use super::domain::{MetricContribution, ScoredEntity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of leading profile metrics summarized in the "why" lines.
const WHY_METRIC_LIMIT: usize = 3;

/// Caller-facing result size controls. `None` means unbounded / no minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankParams {
    pub top_n: Option<usize>,
    pub min_sample_size: Option<u32>,
}

/// One row of the final leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub id: String,
    pub display_fields: BTreeMap<String, String>,
    pub score: f64,
    pub breakdown: Vec<MetricContribution>,
    pub why: Vec<String>,
    pub explanation: String,
}

/// Shaped leaderboard plus how many entities the sample filter removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRanking {
    pub entries: Vec<RankedEntry>,
    pub count_eligible: usize,
}

/// Applies the minimum-sample filter, truncates to top-N, and attaches explanations.
#[derive(Debug, Clone)]
pub struct TopNShaper {
    sample_metric: String,
}

impl TopNShaper {
    pub fn new(sample_metric: impl Into<String>) -> Self {
        Self {
            sample_metric: sample_metric.into(),
        }
    }

    pub fn sample_metric(&self) -> &str {
        &self.sample_metric
    }

    pub fn shape(
        &self,
        scored: Vec<ScoredEntity>,
        top_n: Option<usize>,
        min_sample_size: Option<u32>,
    ) -> Vec<RankedEntry> {
        let params = RankParams {
            top_n,
            min_sample_size,
        };
        self.shape_with_counts(scored, params).entries
    }

    /// Filter first, then truncate, so a short list only happens when the eligible pool is short.
    pub fn shape_with_counts(
        &self,
        scored: Vec<ScoredEntity>,
        params: RankParams,
    ) -> ShapedRanking {
        let eligible: Vec<ScoredEntity> = scored
            .into_iter()
            .filter(|candidate| self.meets_sample_size(candidate, params.min_sample_size))
            .collect();
        let count_eligible = eligible.len();

        let limit = match params.top_n {
            Some(limit) if limit > 0 => limit,
            _ => count_eligible,
        };

        let entries = eligible
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, candidate)| ranked_entry(idx + 1, candidate))
            .collect();

        ShapedRanking {
            entries,
            count_eligible,
        }
    }

    fn meets_sample_size(&self, candidate: &ScoredEntity, min_sample_size: Option<u32>) -> bool {
        match min_sample_size {
            None | Some(0) => true,
            Some(minimum) => candidate
                .entity
                .metric(&self.sample_metric)
                .map(|sample| sample >= f64::from(minimum))
                .unwrap_or(false),
        }
    }
}

impl Default for TopNShaper {
    fn default() -> Self {
        Self::new(ENTRANTS)
    }
}

fn ranked_entry(rank: usize, candidate: ScoredEntity) -> RankedEntry {
    let why = reason_lines(&candidate.breakdown);
    let explanation = breakdown_text(candidate.score, &candidate.breakdown);
    let ScoredEntity {
        entity,
        score,
        breakdown,
    } = candidate;

    RankedEntry {
        rank,
        id: entity.id,
        display_fields: entity.display_fields,
        score,
        breakdown,
        why,
        explanation,
    }
}

/// Human label for the signed seed delta. Negative means the player placed better than seeded.
pub fn seed_delta_label(value: Option<f64>) -> &'static str {
    match value {
        None => "unknown",
        Some(delta) if delta < 0.0 => "outperformed_seed",
        Some(delta) if delta > 0.0 => "underperformed_seed",
        Some(_) => "met_seed",
    }
}

fn reason_lines(breakdown: &[MetricContribution]) -> Vec<String> {
    let mut reasons: Vec<String> = breakdown
        .iter()
        .take(WHY_METRIC_LIMIT)
        .map(|contribution| match contribution.raw_value {
            None => format!("{}=population mean (missing)", contribution.metric),
            Some(value) if contribution.metric == AVG_SEED_DELTA => format!(
                "{}={:.3} ({}; negative is good, positive is bad)",
                contribution.metric,
                value,
                seed_delta_label(Some(value))
            ),
            Some(value) => format!("{}={:.3}", contribution.metric, value),
        })
        .collect();

    if reasons.is_empty() {
        reasons.push("ranked with neutral handling for missing metrics".to_string());
    }
    reasons
}

fn breakdown_text(score: f64, breakdown: &[MetricContribution]) -> String {
    if breakdown.is_empty() {
        return format!("score {score:.3}");
    }

    let parts: Vec<String> = breakdown
        .iter()
        .map(|contribution| {
            let raw = match contribution.raw_value {
                Some(value) => format!("{value:.3}"),
                None => "mean".to_string(),
            };
            format!(
                "{} {:.3} (raw {}, norm {:.3})",
                contribution.metric,
                contribution.weighted_contribution,
                raw,
                contribution.normalized_value
            )
        })
        .collect();

    format!("score {score:.3} = {}", parts.join(" + "))
}
