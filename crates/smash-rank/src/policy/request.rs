use regex::Regex;
use std::sync::LazyLock;

static ANALYTICS_REQUEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(stats?|analytics|performance|performed|who\s+did\s+best|player\s+metrics?)\b",
    )
    .expect("analytics request pattern compiles")
});

/// Detects whether a user's own words explicitly ask for player statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsRequestDetector;

impl AnalyticsRequestDetector {
    pub fn requests_analytics(&self, user_request: &str) -> bool {
        ANALYTICS_REQUEST_RE.is_match(user_request)
    }
}

/// Guidance for the caller when a tournament name did not resolve to exactly one match.
pub fn tournament_resolution_guidance(match_count: usize) -> Option<&'static str> {
    match match_count {
        0 => Some("No tournaments matched. Ask the user for a different tournament name."),
        1 => None,
        _ => Some("Multiple tournaments matched. Ask the user which exact tournament they mean."),
    }
}
