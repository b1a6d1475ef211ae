//! Deterministic intent-based ranking: normalization, weighted scoring, top-N shaping.

pub mod domain;
mod normalizer;
pub mod profiles;
mod report;
mod scoring;
mod shaper;

#[cfg(test)]
mod tests;

pub use domain::{metrics, Direction, Entity, MetricContribution, ScoredEntity};
pub use normalizer::{normalize_population, MetricBounds, MetricNormalizer, NEUTRAL_SCORE};
pub use profiles::{
    MetricWeight, ProfileError, ProfileTable, RankingIntent, RankingProfile,
    RankingProfileRegistry, UnknownIntent,
};
pub use report::{MethodDescription, RankingOutcome, SeedDeltaSemantics};
pub use scoring::{ScoringConfig, ScoringEngine, ScoringRun, SCORE_EPSILON};
pub use shaper::{seed_delta_label, RankParams, RankedEntry, ShapedRanking, TopNShaper};

use tracing::info;

/// Scoring engine and shaper composed into one stateless ranking call.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    scoring: ScoringEngine,
    shaper: TopNShaper,
}

impl RankingEngine {
    pub fn new(scoring: ScoringEngine, shaper: TopNShaper) -> Self {
        Self { scoring, shaper }
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn shaper(&self) -> &TopNShaper {
        &self.shaper
    }

    pub fn rank(
        &self,
        entities: &[Entity],
        profile: &RankingProfile,
        params: RankParams,
    ) -> RankingOutcome {
        let ScoringRun {
            scored,
            count_original,
            reduction_note,
        } = self.scoring.score_population(entities, profile);
        let count_considered = scored.len();

        let ShapedRanking {
            entries,
            count_eligible,
        } = self.shaper.shape_with_counts(scored, params);

        info!(
            intent = %profile.intent,
            count_original,
            count_considered,
            count_eligible,
            returned = entries.len(),
            "ranking complete"
        );

        RankingOutcome {
            method: MethodDescription::new(
                profile,
                self.scoring.tiebreak_order(profile),
                reduction_note,
            ),
            count_original,
            count_considered,
            count_eligible,
            entries,
        }
    }
}
