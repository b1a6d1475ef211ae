//! Request validation: intent name and filters in, resolved profile and parameters out.

use crate::policy::{
    IntensityClass, IntensityPolicyGuard, PolicyDenial, PRECOMPUTED, TOURNAMENT_PLAYER_ANALYTICS,
};
use crate::ranking::{
    RankParams, RankingIntent, RankingProfile, RankingProfileRegistry, UnknownIntent,
};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_MONTHS_BACK: u32 = 3;
pub const MAX_MONTHS_BACK: u32 = 24;

/// Raw, caller-supplied ranking request as it arrives from a tool or CLI layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRequest {
    pub intent: String,
    #[serde(default)]
    pub top_n: Option<i64>,
    #[serde(default)]
    pub min_sample_size: Option<i64>,
    #[serde(default)]
    pub months_back: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub tournament_slug: Option<String>,
    /// Free text of the end user's ask; gates tournament analytics when present.
    #[serde(default)]
    pub user_request: Option<String>,
}

impl RankRequest {
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            ..Self::default()
        }
    }
}

/// Rolling time window the metrics were computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryWindow {
    pub months_back: u32,
}

impl QueryWindow {
    pub fn start_date(&self, reference: NaiveDate) -> Option<NaiveDate> {
        reference.checked_sub_months(Months::new(self.months_back))
    }
}

/// Where the metric records for a query come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Statewide { state: Option<String> },
    Tournament { slug: String },
}

impl DataSource {
    /// Backend operation needed to fetch this source.
    pub fn operation(&self) -> &'static str {
        match self {
            DataSource::Statewide { .. } => PRECOMPUTED,
            DataSource::Tournament { .. } => TOURNAMENT_PLAYER_ANALYTICS,
        }
    }
}

/// Validated request, ready for the fetch collaborator and the ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuery<'r> {
    pub profile: &'r RankingProfile,
    pub params: RankParams,
    pub window: QueryWindow,
    pub source: DataSource,
    pub operation: &'static str,
    pub intensity: IntensityClass,
}

impl ResolvedQuery<'_> {
    pub fn intent(&self) -> RankingIntent {
        self.profile.intent
    }
}

/// Typed rejection raised before any scoring work begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryRejection {
    #[error(transparent)]
    UnknownIntent(#[from] UnknownIntent),
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error(transparent)]
    PolicyDenied(#[from] PolicyDenial),
}

/// Maps caller input onto a registry profile and authorizes the implied fetch.
#[derive(Debug, Clone, Copy)]
pub struct QueryResolver<'a> {
    registry: &'a RankingProfileRegistry,
    guard: &'a IntensityPolicyGuard,
}

impl<'a> QueryResolver<'a> {
    pub fn new(registry: &'a RankingProfileRegistry, guard: &'a IntensityPolicyGuard) -> Self {
        Self { registry, guard }
    }

    pub fn resolve(&self, request: &RankRequest) -> Result<ResolvedQuery<'a>, QueryRejection> {
        let profile = self.registry.profile_named(&request.intent)?;

        let params = RankParams {
            top_n: request.top_n.and_then(positive).map(clamp_to_usize),
            min_sample_size: request
                .min_sample_size
                .and_then(positive)
                .map(|value| u32::try_from(value).unwrap_or(u32::MAX)),
        };
        let window = QueryWindow {
            months_back: validate_months_back(request.months_back)?,
        };
        let source = match non_empty(request.tournament_slug.as_deref()) {
            Some(slug) => DataSource::Tournament {
                slug: slug.to_string(),
            },
            None => DataSource::Statewide {
                state: validate_state(request.state.as_deref())?,
            },
        };

        let operation = source.operation();
        let decision = match non_empty(request.user_request.as_deref()) {
            Some(user_request) => self.guard.authorize_for_request(operation, user_request),
            None => self.guard.authorize(operation),
        };
        let intensity = decision.into_result()?;

        debug!(intent = %profile.intent, ?params, ?source, "query resolved");
        info!(intent = %profile.intent, operation, %intensity, "ranking query authorized");

        Ok(ResolvedQuery {
            profile,
            params,
            window,
            source,
            operation,
            intensity,
        })
    }
}

fn positive(value: i64) -> Option<i64> {
    (value > 0).then_some(value)
}

fn clamp_to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn validate_months_back(value: Option<i64>) -> Result<u32, QueryRejection> {
    match value {
        None => Ok(DEFAULT_MONTHS_BACK),
        Some(months) if (1..=i64::from(MAX_MONTHS_BACK)).contains(&months) => Ok(months as u32),
        Some(months) => Err(QueryRejection::InvalidParameter {
            name: "months_back",
            reason: format!("expected 1..={MAX_MONTHS_BACK}, got {months}"),
        }),
    }
}

fn validate_state(value: Option<&str>) -> Result<Option<String>, QueryRejection> {
    let Some(state) = non_empty(value) else {
        return Ok(None);
    };

    if state.len() == 2 && state.chars().all(|ch| ch.is_ascii_alphabetic()) {
        Ok(Some(state.to_ascii_uppercase()))
    } else {
        Err(QueryRejection::InvalidParameter {
            name: "state",
            reason: format!("expected a two-letter state code, got '{state}'"),
        })
    }
}
