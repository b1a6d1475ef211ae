//! Deterministic, explainable player leaderboards by ranking intent, plus the
//! intensity policy that decides which analytics sources a query may touch.

pub mod config;
pub mod error;
pub mod policy;
pub mod query;
pub mod ranking;
pub mod records;
pub mod service;
pub mod telemetry;

pub use policy::{Authorization, IntensityClass, IntensityPolicyGuard, PolicyConfig};
pub use query::{QueryRejection, QueryResolver, RankRequest, ResolvedQuery};
pub use ranking::{
    Entity, RankParams, RankingEngine, RankingIntent, RankingOutcome, RankingProfile,
    RankingProfileRegistry,
};
pub use service::{RankingReport, RankingService, RankingServiceError};
