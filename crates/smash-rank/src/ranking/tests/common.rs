use crate::ranking::domain::metrics::{ACTIVITY_SCORE, AVG_SEED_DELTA, ENTRANTS, UPSET_RATE};
use crate::ranking::{
    Direction, Entity, MetricWeight, RankingIntent, RankingProfile, ScoringEngine, TopNShaper,
};

pub(super) fn wins_profile() -> RankingProfile {
    RankingProfile::new(
        RankingIntent::Strongest,
        vec![MetricWeight::new("wins", 1.0, Direction::Desc)],
    )
    .expect("valid profile")
}

pub(super) fn two_metric_profile(wins_weight: f64, losses_weight: f64) -> RankingProfile {
    RankingProfile::new(
        RankingIntent::Consistent,
        vec![
            MetricWeight::new("wins", wins_weight, Direction::Desc),
            MetricWeight::new("losses", losses_weight, Direction::Asc),
        ],
    )
    .expect("valid profile")
}

pub(super) fn entity(id: &str, metrics: &[(&str, f64)]) -> Entity {
    metrics
        .iter()
        .fold(Entity::new(id), |entity, (metric, value)| {
            entity.with_metric(*metric, *value)
        })
}

pub(super) fn player(
    id: &str,
    upset_rate: f64,
    seed_delta: f64,
    activity: f64,
    entrants: f64,
) -> Entity {
    entity(
        id,
        &[
            (UPSET_RATE, upset_rate),
            (AVG_SEED_DELTA, seed_delta),
            (ACTIVITY_SCORE, activity),
            (ENTRANTS, entrants),
        ],
    )
    .with_display("gamer_tag", id.to_uppercase())
    .with_display("state", "GA")
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::default()
}

pub(super) fn shaper() -> TopNShaper {
    TopNShaper::default()
}

pub(super) fn ids(scored: &[crate::ranking::ScoredEntity]) -> Vec<&str> {
    scored.iter().map(|entry| entry.id()).collect()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
