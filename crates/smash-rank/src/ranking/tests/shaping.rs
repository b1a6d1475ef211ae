use super::common::*;
use crate::ranking::domain::metrics::ENTRANTS;
use crate::ranking::{RankParams, RankingEngine, RankingIntent, RankingProfileRegistry};
use std::collections::BTreeSet;

#[test]
fn minimum_sample_size_filters_before_truncation() {
    let entities = vec![
        entity("A", &[("wins", 9.0), (ENTRANTS, 2.0)]),
        entity("B", &[("wins", 1.0), (ENTRANTS, 5.0)]),
        entity("C", &[("wins", 5.0), (ENTRANTS, 1.0)]),
    ];
    let scored = engine().score(&entities, &wins_profile());

    for top_n in [None, Some(0), Some(1), Some(5)] {
        let shaped = shaper().shape(scored.clone(), top_n, Some(3));
        let shaped_ids: Vec<&str> = shaped.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(shaped_ids, vec!["B"], "top_n {top_n:?}");
        assert_eq!(shaped[0].rank, 1);
    }
}

#[test]
fn filtered_entities_do_not_shrink_requested_top_n() {
    let entities = vec![
        entity("p1", &[("wins", 10.0), (ENTRANTS, 1.0)]),
        entity("p2", &[("wins", 9.0), (ENTRANTS, 40.0)]),
        entity("p3", &[("wins", 8.0), (ENTRANTS, 2.0)]),
        entity("p4", &[("wins", 7.0), (ENTRANTS, 33.0)]),
        entity("p5", &[("wins", 6.0), (ENTRANTS, 32.0)]),
        entity("p6", &[("wins", 5.0)]),
    ];
    let scored = engine().score(&entities, &wins_profile());

    let shaped = shaper().shape(scored, Some(3), Some(32));

    let shaped_ids: Vec<&str> = shaped.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(shaped_ids, vec!["p2", "p4", "p5"]);
    let ranks: Vec<usize> = shaped.iter().map(|entry| entry.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn non_positive_top_n_returns_everything() {
    let entities: Vec<_> = (0..7)
        .map(|idx| entity(&format!("e{idx}"), &[("wins", idx as f64)]))
        .collect();
    let scored = engine().score(&entities, &wins_profile());

    assert_eq!(shaper().shape(scored.clone(), None, None).len(), 7);
    assert_eq!(shaper().shape(scored.clone(), Some(0), None).len(), 7);
    assert_eq!(shaper().shape(scored, Some(3), Some(0)).len(), 3);
}

#[test]
fn top_n_equal_to_population_returns_each_entity_once() {
    let registry = RankingProfileRegistry::builtin();
    let profile = registry.profile_for(RankingIntent::Underrated);
    let entities = vec![
        player("ash", 0.3, -2.0, 5.0, 10.0),
        player("birch", 0.1, 0.0, 2.0, 10.0),
        player("cedar", 0.2, 1.0, 9.0, 10.0),
        player("dogwood", 0.2, 1.0, 9.0, 10.0),
    ];

    let shaped = shaper().shape(
        engine().score(&entities, profile),
        Some(entities.len()),
        None,
    );

    let returned: BTreeSet<&str> = shaped.iter().map(|entry| entry.id.as_str()).collect();
    let expected: BTreeSet<&str> = entities.iter().map(|entity| entity.id.as_str()).collect();
    assert_eq!(shaped.len(), entities.len());
    assert_eq!(returned, expected);
}

#[test]
fn entries_carry_display_fields_and_explanations() {
    let registry = RankingProfileRegistry::builtin();
    let profile = registry.profile_for(RankingIntent::Underrated);
    let entities = vec![
        player("ash", 0.3, -2.0, 5.0, 10.0),
        player("birch", 0.1, 0.5, 2.0, 10.0),
    ];

    let shaped = shaper().shape(engine().score(&entities, profile), Some(1), None);

    let top = &shaped[0];
    assert_eq!(top.id, "ash");
    assert_eq!(top.display_fields.get("gamer_tag").map(String::as_str), Some("ASH"));
    assert_eq!(
        top.why[0],
        "avg_seed_delta=-2.000 (outperformed_seed; negative is good, positive is bad)"
    );
    assert!(top.explanation.starts_with("score 1.000 = avg_seed_delta 0.700"));
}

#[test]
fn ranking_engine_reports_counts_and_method() {
    let registry = RankingProfileRegistry::builtin();
    let profile = registry.profile_for(RankingIntent::Underrated);
    let entities = vec![
        player("ash", 0.3, -2.0, 5.0, 40.0),
        player("birch", 0.1, 0.5, 2.0, 3.0),
        player("cedar", 0.2, 1.0, 9.0, 64.0),
    ];

    let outcome = RankingEngine::default().rank(
        &entities,
        profile,
        RankParams {
            top_n: Some(1),
            min_sample_size: Some(32),
        },
    );

    assert_eq!(outcome.count_original, 3);
    assert_eq!(outcome.count_considered, 3);
    assert_eq!(outcome.count_eligible, 2);
    assert_eq!(outcome.ids(), vec!["ash"]);
    assert_eq!(outcome.method.intent, RankingIntent::Underrated);
    assert_eq!(outcome.method.missing_metric_handling, "population_mean");
    assert_eq!(
        outcome.method.tie_break_order,
        vec!["activity_score desc".to_string(), "id asc".to_string()]
    );
    let summary = outcome.method_summary();
    assert!(summary.starts_with("Most Underrated Players (underrated): avg_seed_delta 0.70 asc"));
}

#[test]
fn empty_population_shapes_to_empty_outcome() {
    let registry = RankingProfileRegistry::builtin();
    let outcome = RankingEngine::default().rank(
        &[],
        registry.profile_for(RankingIntent::Strongest),
        RankParams::default(),
    );

    assert!(outcome.entries.is_empty());
    assert_eq!(outcome.count_original, 0);
    assert!(outcome.method.reduction_note.is_none());
}
