use super::domain::metrics::{
    ACTIVITY_SCORE, AVG_EVENT_ENTRANTS, AVG_SEED_DELTA, LARGE_EVENT_SHARE, OPPONENT_STRENGTH,
    UPSET_RATE, WEIGHTED_WIN_RATE,
};
use super::domain::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Named ranking goal. The set is closed; free-form strings only exist at the query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingIntent {
    Strongest,
    Clutch,
    Underrated,
    Overrated,
    Consistent,
    UpsetHeavy,
    ActivityMonsters,
}

impl RankingIntent {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Strongest,
            Self::Clutch,
            Self::Underrated,
            Self::Overrated,
            Self::Consistent,
            Self::UpsetHeavy,
            Self::ActivityMonsters,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strongest => "strongest",
            Self::Clutch => "clutch",
            Self::Underrated => "underrated",
            Self::Overrated => "overrated",
            Self::Consistent => "consistent",
            Self::UpsetHeavy => "upset_heavy",
            Self::ActivityMonsters => "activity_monsters",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strongest => "Strongest Players",
            Self::Clutch => "Most Clutch Players",
            Self::Underrated => "Most Underrated Players",
            Self::Overrated => "Most Overrated Players",
            Self::Consistent => "Most Consistent Players",
            Self::UpsetHeavy => "Most Upset-Heavy Players",
            Self::ActivityMonsters => "Most Active Players",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Strongest => "Overall strongest by weighted win rate and opponent strength.",
            Self::Clutch => "Outperform seed and convert upsets against strong opponents.",
            Self::Underrated => "Players who consistently outperform seed expectations.",
            Self::Overrated => "Players who underperform seed expectations.",
            Self::Consistent => "Stable performance and reliability across events.",
            Self::UpsetHeavy => "Players most associated with upset-driven results.",
            Self::ActivityMonsters => "High activity and strong event-volume participation.",
        }
    }

    pub fn supported() -> Vec<&'static str> {
        Self::ordered().into_iter().map(Self::as_str).collect()
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RankingIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingIntent {
    type Err = UnknownIntent;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ordered()
            .into_iter()
            .find(|intent| intent.as_str() == normalized)
            .ok_or_else(|| UnknownIntent {
                requested: value.to_string(),
                supported: Self::supported(),
            })
    }
}

/// Caller asked for an intent the registry does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intent '{requested}'; did you mean one of: {}", .supported.join(", "))]
pub struct UnknownIntent {
    pub requested: String,
    pub supported: Vec<&'static str>,
}

/// A single weighted, directed metric inside a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricWeight {
    pub metric: String,
    pub weight: f64,
    #[serde(default)]
    pub direction: Direction,
}

impl MetricWeight {
    pub fn new(metric: impl Into<String>, weight: f64, direction: Direction) -> Self {
        Self {
            metric: metric.into(),
            weight,
            direction,
        }
    }
}

/// Ordered weight table for one intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingProfile {
    pub intent: RankingIntent,
    pub label: String,
    pub description: String,
    pub weights: Vec<MetricWeight>,
}

impl RankingProfile {
    /// Build a validated profile using the intent's stock label and description.
    pub fn new(intent: RankingIntent, weights: Vec<MetricWeight>) -> Result<Self, ProfileError> {
        let profile = Self {
            intent,
            label: intent.label().to_string(),
            description: intent.description().to_string(),
            weights,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.weights.is_empty() {
            return Err(ProfileError::EmptyProfile {
                intent: self.intent,
            });
        }

        let mut seen = HashSet::new();
        for weight in &self.weights {
            if !weight.weight.is_finite() || weight.weight < 0.0 {
                return Err(ProfileError::InvalidWeight {
                    intent: self.intent,
                    metric: weight.metric.clone(),
                    weight: weight.weight,
                });
            }
            if !seen.insert(weight.metric.as_str()) {
                return Err(ProfileError::DuplicateMetric {
                    intent: self.intent,
                    metric: weight.metric.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.weights.iter().any(|weight| weight.metric == metric)
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|weight| weight.weight).sum()
    }
}

/// On-disk profile table: intent name to its ordered weights.
pub type ProfileTable = BTreeMap<String, Vec<MetricWeight>>;

/// Configuration faults detected while loading the profile table. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile '{intent}' lists metric '{metric}' more than once")]
    DuplicateMetric {
        intent: RankingIntent,
        metric: String,
    },
    #[error("profile '{intent}' has invalid weight {weight} for metric '{metric}'")]
    InvalidWeight {
        intent: RankingIntent,
        metric: String,
        weight: f64,
    },
    #[error("profile '{intent}' has no metrics")]
    EmptyProfile { intent: RankingIntent },
    #[error("profile table defines intent '{intent}' more than once")]
    DuplicateIntent { intent: RankingIntent },
    #[error("profile table is missing required intent '{intent}'")]
    MissingIntent { intent: RankingIntent },
    #[error("profile table contains unsupported key: {0}")]
    UnknownIntent(#[from] UnknownIntent),
    #[error("failed to read profile table {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid profile table JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable intent-to-profile lookup, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct RankingProfileRegistry {
    profiles: Vec<RankingProfile>,
}

impl RankingProfileRegistry {
    /// Stock weights for the seven supported intents.
    pub fn builtin() -> Self {
        use Direction::{Asc, Desc};

        let table: [(RankingIntent, &[(&str, f64, Direction)]); 7] = [
            (
                RankingIntent::Strongest,
                &[
                    (WEIGHTED_WIN_RATE, 0.55, Desc),
                    (OPPONENT_STRENGTH, 0.40, Desc),
                    (ACTIVITY_SCORE, 0.05, Desc),
                ],
            ),
            (
                RankingIntent::Clutch,
                &[
                    (UPSET_RATE, 0.40, Desc),
                    (AVG_SEED_DELTA, 0.35, Asc),
                    (OPPONENT_STRENGTH, 0.15, Desc),
                    (WEIGHTED_WIN_RATE, 0.10, Desc),
                ],
            ),
            (
                RankingIntent::Underrated,
                &[
                    (AVG_SEED_DELTA, 0.70, Asc),
                    (UPSET_RATE, 0.20, Desc),
                    (ACTIVITY_SCORE, 0.10, Desc),
                ],
            ),
            (
                RankingIntent::Overrated,
                &[
                    (AVG_SEED_DELTA, 0.75, Desc),
                    (UPSET_RATE, 0.15, Asc),
                    (ACTIVITY_SCORE, 0.10, Desc),
                ],
            ),
            (
                RankingIntent::Consistent,
                &[
                    (WEIGHTED_WIN_RATE, 0.45, Desc),
                    (AVG_SEED_DELTA, 0.30, Asc),
                    (ACTIVITY_SCORE, 0.25, Desc),
                ],
            ),
            (
                RankingIntent::UpsetHeavy,
                &[
                    (UPSET_RATE, 0.70, Desc),
                    (AVG_SEED_DELTA, 0.20, Asc),
                    (ACTIVITY_SCORE, 0.10, Desc),
                ],
            ),
            (
                RankingIntent::ActivityMonsters,
                &[
                    (ACTIVITY_SCORE, 0.55, Desc),
                    (AVG_EVENT_ENTRANTS, 0.20, Desc),
                    (LARGE_EVENT_SHARE, 0.15, Desc),
                    (WEIGHTED_WIN_RATE, 0.10, Desc),
                ],
            ),
        ];

        let profiles = table
            .into_iter()
            .map(|(intent, weights)| RankingProfile {
                intent,
                label: intent.label().to_string(),
                description: intent.description().to_string(),
                weights: weights
                    .iter()
                    .map(|(metric, weight, direction)| {
                        MetricWeight::new(*metric, *weight, *direction)
                    })
                    .collect(),
            })
            .collect();

        Self { profiles }
    }

    /// Validate a full table. Every known intent must be present exactly once.
    pub fn from_table(table: ProfileTable) -> Result<Self, ProfileError> {
        let mut slots: Vec<Option<RankingProfile>> = vec![None; RankingIntent::ordered().len()];

        for (name, weights) in table {
            let intent: RankingIntent = name.parse()?;
            let slot = &mut slots[intent.index()];
            if slot.is_some() {
                return Err(ProfileError::DuplicateIntent { intent });
            }
            *slot = Some(RankingProfile::new(intent, weights)?);
        }

        let profiles = RankingIntent::ordered()
            .into_iter()
            .zip(slots)
            .map(|(intent, slot)| slot.ok_or(ProfileError::MissingIntent { intent }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { profiles })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProfileError> {
        let table: ProfileTable = serde_json::from_reader(reader)?;
        Self::from_table(table)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn profile_for(&self, intent: RankingIntent) -> &RankingProfile {
        &self.profiles[intent.index()]
    }

    /// String-keyed lookup used at the request boundary.
    pub fn profile_named(&self, name: &str) -> Result<&RankingProfile, UnknownIntent> {
        let intent: RankingIntent = name.parse()?;
        Ok(self.profile_for(intent))
    }

    pub fn list_intents(&self) -> Vec<&'static str> {
        self.profiles
            .iter()
            .map(|profile| profile.intent.as_str())
            .collect()
    }

    pub fn profiles(&self) -> &[RankingProfile] {
        &self.profiles
    }
}

impl Default for RankingProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
