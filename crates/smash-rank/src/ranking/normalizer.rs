use super::domain::Direction;
use serde::Serialize;

/// Value every entity receives when a metric has no spread across the population.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Population statistics for one metric, computed from the values that are present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricBounds {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub present: usize,
}

impl MetricBounds {
    fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut present = 0usize;

        for value in values.into_iter().filter(|value| value.is_finite()) {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            present += 1;
        }

        (present > 0).then(|| Self {
            min,
            max,
            mean: sum / present as f64,
            present,
        })
    }

    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

/// Min-max scaler fitted to one metric over the current query's population.
///
/// Output is always "higher is better": ascending metrics are complemented here so
/// the scoring engine never needs to know about direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricNormalizer {
    bounds: Option<MetricBounds>,
    direction: Direction,
}

impl MetricNormalizer {
    /// Fit against the population; `None` entries are entities missing the metric.
    pub fn fit<I>(values: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let bounds = MetricBounds::from_values(values.into_iter().flatten());
        Self { bounds, direction }
    }

    pub fn bounds(&self) -> Option<&MetricBounds> {
        self.bounds.as_ref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Raw value with the population mean standing in for a missing one.
    pub fn effective_value(&self, raw: Option<f64>) -> Option<f64> {
        raw.filter(|value| value.is_finite())
            .or_else(|| self.bounds.map(|bounds| bounds.mean))
    }

    pub fn normalize(&self, raw: Option<f64>) -> f64 {
        let Some(bounds) = self.bounds else {
            return NEUTRAL_SCORE;
        };

        let spread = bounds.spread();
        if spread <= 0.0 {
            return NEUTRAL_SCORE;
        }

        let value = self.effective_value(raw).unwrap_or(bounds.mean);
        let scaled = ((value - bounds.min) / spread).clamp(0.0, 1.0);

        match self.direction {
            Direction::Asc => 1.0 - scaled,
            Direction::Desc => scaled,
        }
    }
}

/// Convenience for normalizing a whole column in one call.
pub fn normalize_population(values: &[Option<f64>], direction: Direction) -> Vec<f64> {
    let normalizer = MetricNormalizer::fit(values.iter().copied(), direction);
    values.iter().map(|value| normalizer.normalize(*value)).collect()
}
