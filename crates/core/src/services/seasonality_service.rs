use crate::config::SeasonalityConfig;
use crate::models::insight::{Seasonality, SeasonalityPattern};

/// Classifies a monthly series as stable / moderately seasonal / highly
/// seasonal from the spread of its month-over-month percentage changes.
pub struct SeasonalityService {
    config: SeasonalityConfig,
}

impl SeasonalityService {
    pub fn new(config: SeasonalityConfig) -> Self {
        Self { config }
    }

    /// Detect seasonality in a chronological, gap-filled series.
    ///
    /// Fewer periods than the configured minimum yields the
    /// `InsufficientData` sentinel with strength 0 (a degraded result, not
    /// an error). Strength is `min(sqrt(variance) / |mean change|, 1)`; when
    /// the mean change is 0 the raw `sqrt(variance)` is used, capped at 1.
    pub fn detect(&self, values: &[f64]) -> Seasonality {
        if values.len() < self.config.min_periods {
            return Seasonality::insufficient_data();
        }

        // Month-over-month percentage changes. Zero predecessors are skipped
        // rather than producing an infinite change.
        let mut changes = Vec::with_capacity(values.len() - 1);
        for pair in values.windows(2) {
            if pair[0] != 0.0 {
                changes.push((pair[1] - pair[0]) / pair[0]);
            }
        }
        if changes.is_empty() {
            return Seasonality {
                pattern: SeasonalityPattern::Stable,
                strength: 0.0,
            };
        }

        let mean = changes.iter().sum::<f64>() / changes.len() as f64;
        let variance = changes
            .iter()
            .map(|c| (c - mean) * (c - mean))
            .sum::<f64>()
            / changes.len() as f64;

        let strength = if mean == 0.0 {
            variance.sqrt().min(1.0)
        } else {
            (variance.sqrt() / mean.abs()).min(1.0)
        };

        let pattern = if strength < self.config.stable_below {
            SeasonalityPattern::Stable
        } else if strength < self.config.moderate_below {
            SeasonalityPattern::ModerateSeasonal
        } else {
            SeasonalityPattern::HighlySeasonal
        };

        Seasonality { pattern, strength }
    }
}

impl Default for SeasonalityService {
    fn default() -> Self {
        Self::new(SeasonalityConfig::default())
    }
}
