use serde::{Deserialize, Serialize};
use std::fmt;

pub const HEALTH: &str = "health";
pub const PRECOMPUTED: &str = "precomputed";
pub const PRECOMPUTED_SERIES: &str = "precomputedSeries";
pub const TOURNAMENT_SEARCH: &str = "tournamentSearch";
pub const TOURNAMENT_LOOKUP: &str = "tournamentLookup";
pub const TOURNAMENT_PLAYER_ANALYTICS: &str = "tournamentPlayerAnalytics";
pub const HEAVY_SET_ANALYSIS: &str = "heavySetAnalysis";

/// Coarse computational cost of a data-source operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityClass {
    Low,
    High,
}

impl IntensityClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl fmt::Display for IntensityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static description of one analytics backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationSpec {
    pub name: &'static str,
    pub intensity: IntensityClass,
    pub description: &'static str,
    /// Low-intensity operation callers should degrade to when this one is denied.
    pub fallback: Option<&'static str>,
}

pub const OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name: HEALTH,
        intensity: IntensityClass::Low,
        description: "Backend liveness probe.",
        fallback: None,
    },
    OperationSpec {
        name: PRECOMPUTED,
        intensity: IntensityClass::Low,
        description: "Cached statewide player metrics over a months-back window.",
        fallback: None,
    },
    OperationSpec {
        name: PRECOMPUTED_SERIES,
        intensity: IntensityClass::Low,
        description: "Cached rankings for a tournament series name.",
        fallback: None,
    },
    OperationSpec {
        name: TOURNAMENT_SEARCH,
        intensity: IntensityClass::Low,
        description: "Find tournaments by name substring.",
        fallback: None,
    },
    OperationSpec {
        name: TOURNAMENT_LOOKUP,
        intensity: IntensityClass::Low,
        description: "Tournament metadata by exact slug.",
        fallback: None,
    },
    OperationSpec {
        name: TOURNAMENT_PLAYER_ANALYTICS,
        intensity: IntensityClass::High,
        description: "Per-player analytics computed live for one tournament slug.",
        fallback: Some(TOURNAMENT_LOOKUP),
    },
    OperationSpec {
        name: HEAVY_SET_ANALYSIS,
        intensity: IntensityClass::High,
        description: "Set-level analysis recomputed across the full match history.",
        fallback: Some(PRECOMPUTED),
    },
];

/// Case-insensitive lookup in the static operation table.
pub fn lookup(name: &str) -> Option<&'static OperationSpec> {
    let name = name.trim();
    OPERATIONS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}
