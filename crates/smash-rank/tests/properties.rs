use proptest::prelude::*;
use smash_rank::ranking::{
    Direction, Entity, MetricWeight, RankingIntent, RankingProfile, ScoringEngine, TopNShaper,
};
use std::collections::BTreeSet;

const METRICS: [&str; 3] = ["wins", "losses", "entrants"];

fn profile(weights: [f64; 3]) -> RankingProfile {
    RankingProfile::new(
        RankingIntent::Consistent,
        vec![
            MetricWeight::new(METRICS[0], weights[0], Direction::Desc),
            MetricWeight::new(METRICS[1], weights[1], Direction::Asc),
            MetricWeight::new(METRICS[2], weights[2], Direction::Desc),
        ],
    )
    .expect("valid profile")
}

/// Small integer-valued metrics so ties and missing values show up often.
fn population() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::vec(
        prop::collection::vec(prop::option::of(0u8..6), METRICS.len()),
        0..24,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, values)| {
                let mut entity = Entity::new(format!("p{idx:02}"));
                for (metric, value) in METRICS.iter().zip(values) {
                    if let Some(value) = value {
                        entity = entity.with_metric(*metric, f64::from(value));
                    }
                }
                entity
            })
            .collect()
    })
}

fn weights() -> impl Strategy<Value = [f64; 3]> {
    [0.0f64..2.0, 0.0f64..2.0, 0.0f64..2.0]
}

proptest! {
    #[test]
    fn scoring_is_deterministic_and_order_independent(
        entities in population(),
        weights in weights(),
    ) {
        let engine = ScoringEngine::default();
        let profile = profile(weights);

        let first = engine.score(&entities, &profile);
        let second = engine.score(&entities, &profile);
        prop_assert_eq!(&first, &second);

        let mut reversed = entities.clone();
        reversed.reverse();
        let from_reversed = engine.score(&reversed, &profile);
        let ids: Vec<&str> = first.iter().map(|entry| entry.id()).collect();
        let reversed_ids: Vec<&str> = from_reversed.iter().map(|entry| entry.id()).collect();
        prop_assert_eq!(ids, reversed_ids);

        for pair in first.windows(2) {
            prop_assert!(pair[0].score + 1e-6 >= pair[1].score);
        }
    }

    #[test]
    fn shaping_full_population_returns_every_entity_once(
        entities in population(),
        weights in weights(),
    ) {
        let scored = ScoringEngine::default().score(&entities, &profile(weights));
        let shaped = TopNShaper::default().shape(scored, Some(entities.len()), None);

        prop_assert_eq!(shaped.len(), entities.len());
        let returned: BTreeSet<&str> = shaped.iter().map(|entry| entry.id.as_str()).collect();
        prop_assert_eq!(returned.len(), entities.len());
        for (idx, entry) in shaped.iter().enumerate() {
            prop_assert_eq!(entry.rank, idx + 1);
        }
    }

    #[test]
    fn sample_filter_never_drops_eligible_entities_inside_top_n(
        entities in population(),
        weights in weights(),
        top_n in 1usize..8,
        minimum in 1u32..5,
    ) {
        let scored = ScoringEngine::default().score(&entities, &profile(weights));
        let eligible = entities
            .iter()
            .filter(|entity| {
                entity
                    .metric("entrants")
                    .is_some_and(|value| value >= f64::from(minimum))
            })
            .count();

        let shaped = TopNShaper::default().shape(scored, Some(top_n), Some(minimum));

        prop_assert_eq!(shaped.len(), eligible.min(top_n));
        for entry in &shaped {
            let entrants = entry
                .breakdown
                .iter()
                .find(|contribution| contribution.metric == "entrants")
                .and_then(|contribution| contribution.raw_value);
            prop_assert!(entrants.is_some_and(|value| value >= f64::from(minimum)));
        }
    }

    #[test]
    fn raising_a_weight_never_lets_a_weaker_value_overtake(
        entities in population(),
        weights in weights(),
        metric_idx in 0usize..3,
        bump in 0.1f64..3.0,
    ) {
        let engine = ScoringEngine::default();
        let before = engine.score(&entities, &profile(weights));

        let mut raised = weights;
        raised[metric_idx] += bump;
        let after = engine.score(&entities, &profile(raised));

        let position = |scored: &[smash_rank::ranking::ScoredEntity], id: &str| {
            scored.iter().position(|entry| entry.id() == id)
        };
        let normalized = |id: &str| {
            before
                .iter()
                .find(|entry| entry.id() == id)
                .map(|entry| entry.breakdown[metric_idx].normalized_value)
        };

        for (i, leader) in before.iter().enumerate() {
            for trailer in &before[i + 1..] {
                let (Some(lead_value), Some(trail_value)) =
                    (normalized(leader.id()), normalized(trailer.id()))
                else {
                    continue;
                };
                // Only strictly separated scores; near-ties may legitimately reorder by id.
                if lead_value >= trail_value && leader.score - trailer.score > 1e-6 {
                    prop_assert!(
                        position(&after, leader.id()) < position(&after, trailer.id()),
                        "{} fell behind {}",
                        leader.id(),
                        trailer.id()
                    );
                }
            }
        }
    }
}
