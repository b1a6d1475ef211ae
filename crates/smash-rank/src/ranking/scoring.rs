use super::domain::metrics::ACTIVITY_SCORE;
use super::domain::{Entity, MetricContribution, ScoredEntity};
use super::normalizer::MetricNormalizer;
use super::profiles::RankingProfile;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Scores closer than this are ties and fall through to the tie-break chain.
pub const SCORE_EPSILON: f64 = 1e-9;
pub const DEFAULT_OVERSIZE_THRESHOLD: usize = 5_000;
pub const DEFAULT_MAX_CANDIDATES: usize = 500;

/// Tuning knobs for the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Sample-size style metric used as the first tie-breaker when the profile ranks on it.
    pub activity_metric: String,
    /// Populations larger than this are pre-reduced before normalization.
    pub oversize_threshold: usize,
    pub max_candidates: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            activity_metric: ACTIVITY_SCORE.to_string(),
            oversize_threshold: DEFAULT_OVERSIZE_THRESHOLD,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

/// Scored population plus bookkeeping for the method description.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRun {
    pub scored: Vec<ScoredEntity>,
    pub count_original: usize,
    pub reduction_note: Option<String>,
}

/// Weighted multi-metric scorer with a deterministic total order.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score and sort `entities` best-first under `profile`.
    pub fn score(&self, entities: &[Entity], profile: &RankingProfile) -> Vec<ScoredEntity> {
        self.score_population(entities, profile).scored
    }

    pub fn score_population(&self, entities: &[Entity], profile: &RankingProfile) -> ScoringRun {
        let count_original = entities.len();
        let (candidates, reduction_note) = self.reduce_oversized_pool(entities);

        let normalizers: Vec<MetricNormalizer> = profile
            .weights
            .iter()
            .map(|weight| {
                MetricNormalizer::fit(
                    candidates.iter().map(|entity| entity.metric(&weight.metric)),
                    weight.direction,
                )
            })
            .collect();

        let mut scored: Vec<ScoredEntity> = candidates
            .iter()
            .map(|entity| {
                let breakdown: Vec<MetricContribution> = profile
                    .weights
                    .iter()
                    .zip(&normalizers)
                    .map(|(weight, normalizer)| {
                        let raw_value = entity.metric(&weight.metric);
                        let normalized_value = normalizer.normalize(raw_value);
                        MetricContribution {
                            metric: weight.metric.clone(),
                            raw_value,
                            normalized_value,
                            weighted_contribution: normalized_value * weight.weight,
                        }
                    })
                    .collect();
                let score = breakdown
                    .iter()
                    .map(|contribution| contribution.weighted_contribution)
                    .sum();

                ScoredEntity {
                    entity: (*entity).clone(),
                    score,
                    breakdown,
                }
            })
            .collect();

        let tiebreak = self.tiebreak_metric(profile);
        scored.sort_by(|a, b| compare_ranked(a, b, tiebreak));

        debug!(
            intent = %profile.intent,
            count_original,
            count_considered = scored.len(),
            "scored population"
        );

        ScoringRun {
            scored,
            count_original,
            reduction_note,
        }
    }

    /// Activity metric used for tie-breaking, when the profile actually ranks on it.
    pub fn tiebreak_metric<'p>(&self, profile: &'p RankingProfile) -> Option<&'p str> {
        profile
            .weights
            .iter()
            .find(|weight| weight.metric == self.config.activity_metric)
            .map(|weight| weight.metric.as_str())
    }

    /// Tie-break order reported back to callers.
    pub fn tiebreak_order(&self, profile: &RankingProfile) -> Vec<String> {
        let mut order = Vec::with_capacity(2);
        if let Some(metric) = self.tiebreak_metric(profile) {
            order.push(format!("{metric} desc"));
        }
        order.push("id asc".to_string());
        order
    }

    fn reduce_oversized_pool<'e>(
        &self,
        entities: &'e [Entity],
    ) -> (Vec<&'e Entity>, Option<String>) {
        let mut candidates: Vec<&Entity> = entities.iter().collect();
        if entities.len() <= self.config.oversize_threshold {
            return (candidates, None);
        }

        let activity = self.config.activity_metric.as_str();
        candidates.sort_by(|a, b| {
            let left = a.metric(activity).unwrap_or(f64::NEG_INFINITY);
            let right = b.metric(activity).unwrap_or(f64::NEG_INFINITY);
            right.total_cmp(&left).then_with(|| a.id.cmp(&b.id))
        });
        candidates.truncate(self.config.max_candidates);

        let note = format!(
            "Candidate pool reduced from {} to {} by {} for deterministic scoring stability.",
            entities.len(),
            candidates.len(),
            activity
        );
        debug!(%note, "reduced oversized candidate pool");
        (candidates, Some(note))
    }
}

/// Scores bucketed at `SCORE_EPSILON` granularity so near-equal scores compare equal
/// while the comparison stays transitive. Buckets stay in `f64` so large scores never
/// saturate into a shared bucket; `+ 0.0` folds `-0.0` into `0.0` for `total_cmp`.
fn score_bucket(score: f64) -> f64 {
    (score / SCORE_EPSILON).round() + 0.0
}

fn compare_ranked(a: &ScoredEntity, b: &ScoredEntity, tiebreak: Option<&str>) -> Ordering {
    score_bucket(b.score)
        .total_cmp(&score_bucket(a.score))
        .then_with(|| match tiebreak {
            Some(metric) => {
                let left = a.entity.metric(metric).unwrap_or(f64::NEG_INFINITY);
                let right = b.entity.metric(metric).unwrap_or(f64::NEG_INFINITY);
                right.total_cmp(&left)
            }
            None => Ordering::Equal,
        })
        .then_with(|| a.entity.id.cmp(&b.entity.id))
}
