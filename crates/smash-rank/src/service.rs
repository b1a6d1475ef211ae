use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::RankingConfig;
use crate::policy::{Authorization, IntensityClass, IntensityPolicyGuard};
use crate::query::{DataSource, QueryRejection, QueryResolver, QueryWindow, RankRequest};
use crate::ranking::{
    ProfileError, RankingEngine, RankingIntent, RankingOutcome, RankingProfileRegistry,
    ScoringConfig, ScoringEngine, TopNShaper,
};
use crate::records::{EntitySource, SourceError};

/// Service composing the resolver, policy guard, fetch collaborator, and ranking engine.
pub struct RankingService<S> {
    registry: Arc<RankingProfileRegistry>,
    guard: Arc<IntensityPolicyGuard>,
    engine: Arc<RankingEngine>,
    source: Arc<S>,
}

impl<S> RankingService<S>
where
    S: EntitySource + 'static,
{
    pub fn new(
        registry: Arc<RankingProfileRegistry>,
        guard: Arc<IntensityPolicyGuard>,
        engine: Arc<RankingEngine>,
        source: Arc<S>,
    ) -> Self {
        Self {
            registry,
            guard,
            engine,
            source,
        }
    }

    /// Build every shared component once from startup configuration.
    pub fn from_config(config: &RankingConfig, source: Arc<S>) -> Result<Self, ProfileError> {
        let registry = match &config.profile_path {
            Some(path) => RankingProfileRegistry::from_path(path)?,
            None => RankingProfileRegistry::builtin(),
        };
        let guard = IntensityPolicyGuard::new(config.policy.clone());
        let engine = RankingEngine::new(
            ScoringEngine::new(ScoringConfig {
                activity_metric: config.activity_metric.clone(),
                ..ScoringConfig::default()
            }),
            TopNShaper::new(config.sample_size_metric.clone()),
        );

        Ok(Self::new(
            Arc::new(registry),
            Arc::new(guard),
            Arc::new(engine),
            source,
        ))
    }

    pub fn registry(&self) -> &RankingProfileRegistry {
        &self.registry
    }

    pub fn guard(&self) -> &IntensityPolicyGuard {
        &self.guard
    }

    pub fn resolver(&self) -> QueryResolver<'_> {
        QueryResolver::new(&self.registry, &self.guard)
    }

    /// Resolve, authorize, fetch, then rank. Rejections happen before any scoring work.
    pub fn rank(&self, request: &RankRequest) -> Result<RankingReport, RankingServiceError> {
        let resolved = self.resolver().resolve(request)?;
        let entities = self.source.fetch(&resolved)?;
        let outcome = self.engine.rank(&entities, resolved.profile, resolved.params);

        info!(
            intent = %resolved.intent(),
            fetched = entities.len(),
            returned = outcome.entries.len(),
            "ranking request served"
        );

        Ok(RankingReport {
            query: QuerySummary {
                intent: resolved.intent(),
                top_n: resolved.params.top_n,
                min_sample_size: resolved.params.min_sample_size,
                window: resolved.window,
                source: resolved.source,
                operation: resolved.operation,
                intensity: resolved.intensity,
            },
            method_summary: outcome.method_summary(),
            outcome,
        })
    }

    pub fn authorize(&self, operation: &str, user_request: Option<&str>) -> Authorization {
        match user_request {
            Some(request) => self.guard.authorize_for_request(operation, request),
            None => self.guard.authorize(operation),
        }
    }
}

/// Echo of the validated query, returned alongside the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySummary {
    pub intent: RankingIntent,
    pub top_n: Option<usize>,
    pub min_sample_size: Option<u32>,
    pub window: QueryWindow,
    pub source: DataSource,
    pub operation: &'static str,
    pub intensity: IntensityClass,
}

/// Ranked, explained result for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    pub query: QuerySummary,
    pub method_summary: String,
    #[serde(flatten)]
    pub outcome: RankingOutcome,
}

/// Error raised by the ranking service.
#[derive(Debug, thiserror::Error)]
pub enum RankingServiceError {
    #[error(transparent)]
    Query(#[from] QueryRejection),
    #[error(transparent)]
    Source(#[from] SourceError),
}
