use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use smash_rank::config::RankingConfig;
use smash_rank::policy::{DenialReason, PolicyConfig, HEAVY_SET_ANALYSIS, PRECOMPUTED};
use smash_rank::query::{QueryRejection, ResolvedQuery};
use smash_rank::ranking::{Direction, Entity, MetricWeight, RankingIntent};
use smash_rank::records::{
    EntitySource, InMemoryEntitySource, RecordFormat, RecordImporter, SourceError,
};
use smash_rank::{
    Authorization, IntensityPolicyGuard, RankRequest, RankingEngine, RankingProfile,
    RankingService, RankingServiceError,
};

fn fixture_entities() -> Vec<Entity> {
    let data = include_bytes!("fixtures/ga_precomputed.json");
    RecordImporter::from_reader(&data[..], RecordFormat::Json).expect("fixture parses")
}

fn service_with(policy: PolicyConfig) -> RankingService<InMemoryEntitySource> {
    let config = RankingConfig {
        policy,
        ..RankingConfig::default()
    };
    let source = Arc::new(InMemoryEntitySource::new(fixture_entities()));
    RankingService::from_config(&config, source).expect("service builds")
}

fn tags(report: &smash_rank::RankingReport) -> Vec<&str> {
    report
        .outcome
        .entries
        .iter()
        .map(|entry| {
            entry
                .display_fields
                .get("gamer_tag")
                .map(String::as_str)
                .unwrap_or("?")
        })
        .collect()
}

#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

impl EntitySource for CountingSource {
    fn fetch(&self, _query: &ResolvedQuery<'_>) -> Result<Vec<Entity>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

#[test]
fn clutch_ranking_filters_state_and_sample_size() {
    let service = service_with(PolicyConfig::default());
    let request = RankRequest {
        top_n: Some(3),
        min_sample_size: Some(10),
        state: Some("ga".to_string()),
        ..RankRequest::new("clutch")
    };

    let report = service.rank(&request).expect("ranking succeeds");

    assert_eq!(tags(&report), vec!["Riddle", "Kola", "Jake"]);
    assert_eq!(report.outcome.count_original, 5);
    assert_eq!(report.outcome.count_eligible, 3);
    assert_eq!(report.query.intent, RankingIntent::Clutch);
    assert_eq!(report.query.operation, PRECOMPUTED);
    assert!(report.method_summary.starts_with("Most Clutch Players (clutch)"));
    let ranks: Vec<usize> = report.outcome.entries.iter().map(|entry| entry.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn missing_opponent_strength_is_explained_not_fatal() {
    let service = service_with(PolicyConfig::default());
    let request = RankRequest {
        state: Some("GA".to_string()),
        ..RankRequest::new("strongest")
    };

    let report = service.rank(&request).expect("ranking succeeds");

    let jake = report
        .outcome
        .entries
        .iter()
        .find(|entry| entry.id == "1005")
        .expect("entity with missing metric still ranked");
    assert!(jake.breakdown[1].substituted());
    assert_eq!(jake.why[1], "opponent_strength=population mean (missing)");
    assert_eq!(report.outcome.entries.len(), 5);
}

#[test]
fn report_serializes_method_and_breakdown() {
    let service = service_with(PolicyConfig::default());
    let report = service
        .rank(&RankRequest {
            top_n: Some(1),
            ..RankRequest::new("activity_monsters")
        })
        .expect("ranking succeeds");

    let json = serde_json::to_value(&report).expect("serializes");

    assert_eq!(json["query"]["intent"], "activity_monsters");
    assert_eq!(json["query"]["source"]["kind"], "statewide");
    assert_eq!(json["method"]["missing_metric_handling"], "population_mean");
    assert_eq!(json["method"]["weights"][0]["direction"], "desc");
    assert_eq!(json["entries"].as_array().map(Vec::len), Some(1));
    assert!(json["entries"][0]["breakdown"][0]["weighted_contribution"].is_number());
}

#[test]
fn unknown_intent_is_recoverable_and_lists_options() {
    let service = service_with(PolicyConfig::default());

    match service.rank(&RankRequest::new("goated")) {
        Err(RankingServiceError::Query(QueryRejection::UnknownIntent(err))) => {
            assert!(err.to_string().contains("strongest, clutch, underrated"));
        }
        other => panic!("expected unknown intent, got {other:?}"),
    }
}

#[test]
fn denied_source_is_never_fetched() {
    let source = Arc::new(CountingSource::default());
    let service = RankingService::from_config(&RankingConfig::default(), source.clone())
        .expect("service builds");
    let request = RankRequest {
        tournament_slug: Some("tournament/genesis-10".to_string()),
        ..RankRequest::new("upset_heavy")
    };

    match service.rank(&request) {
        Err(RankingServiceError::Query(QueryRejection::PolicyDenied(denial))) => {
            assert_eq!(denial.reason, DenialReason::HighIntensityDisabled);
        }
        other => panic!("expected policy denial, got {other:?}"),
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);

    service
        .rank(&RankRequest::new("upset_heavy"))
        .expect("statewide fallback allowed");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn heavy_set_analysis_depends_on_policy_configuration() {
    let disabled = service_with(PolicyConfig::new(false));
    assert!(matches!(
        disabled.authorize(HEAVY_SET_ANALYSIS, None),
        Authorization::Denied(_)
    ));

    let enabled = service_with(PolicyConfig::new(true));
    assert!(enabled.authorize(HEAVY_SET_ANALYSIS, None).is_allowed());

    let deny_listed = service_with(PolicyConfig::new(true).deny([HEAVY_SET_ANALYSIS]));
    match deny_listed.authorize(HEAVY_SET_ANALYSIS, None) {
        Authorization::Denied(denial) => assert_eq!(denial.reason, DenialReason::ExplicitlyDenied),
        other => panic!("expected explicit denial, got {other:?}"),
    }
}

#[test]
fn shared_components_rank_independent_populations_concurrently() {
    let guard = Arc::new(IntensityPolicyGuard::default());
    let engine = Arc::new(RankingEngine::default());
    let profile = Arc::new(
        RankingProfile::new(
            RankingIntent::Strongest,
            vec![MetricWeight::new("wins", 1.0, Direction::Desc)],
        )
        .expect("valid profile"),
    );

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            let profile = Arc::clone(&profile);
            let guard = Arc::clone(&guard);
            std::thread::spawn(move || {
                assert!(guard.authorize(PRECOMPUTED).is_allowed());
                let entities: Vec<Entity> = (0..20)
                    .map(|idx| {
                        Entity::new(format!("w{worker}-{idx:02}")).with_metric("wins", idx as f64)
                    })
                    .collect();
                let outcome = engine.rank(&entities, &profile, Default::default());
                outcome.entries[0].id.clone()
            })
        })
        .collect();

    for (worker, handle) in handles.into_iter().enumerate() {
        let top = handle.join().expect("worker finished");
        assert_eq!(top, format!("w{worker}-19"));
    }
}
