use std::collections::HashMap;

use log::debug;

use crate::config::ForecastConfig;
use crate::models::insight::{CategoryForecast, ForecastResult, Seasonality, Trend};
use crate::models::series::{AggregatedSeries, CategorySeries};

/// Exponential smoothing + least-squares regression over an aggregated
/// series, producing multi-horizon spending projections.
///
/// This is classical statistics, not machine learning: a smoothed series for
/// display stability and a straight-line fit whose slope (clamped) acts as a
/// per-period growth rate. Deterministic: identical input yields identical
/// output, with no state carried between calls.
pub struct ForecastService {
    config: ForecastConfig,
}

/// A fitted series: the projection basis plus the clamped growth rate.
///
/// `projected(k) = basis * (1 + growth_rate)^k`. On degraded inputs (fewer
/// points than the regression minimum, or a zero mean) the basis is the
/// arithmetic mean, the growth rate is 0, and confidence is exactly the
/// configured fallback so callers can distinguish the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesFit {
    /// Projection basis: the last observed value, or the mean on fallback
    pub basis: f64,

    /// Clamped per-period growth rate
    pub growth_rate: f64,

    /// Raw regression slope (unclamped), used for the trend label
    pub slope: f64,

    pub confidence: f64,
    pub trend: Trend,
}

impl SeriesFit {
    /// Projection `k` periods out.
    pub fn projected(&self, k: u32) -> f64 {
        self.basis * (1.0 + self.growth_rate).powi(k as i32)
    }
}

impl ForecastService {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Exponentially smooth a series with the configured alpha.
    /// `s[0] = v[0]`, `s[i] = alpha * v[i] + (1 - alpha) * s[i-1]`.
    /// Used for display stability, not for the forecast value itself.
    pub fn smooth(&self, values: &[f64]) -> Vec<f64> {
        let alpha = self.config.smoothing_alpha;
        let mut smoothed = Vec::with_capacity(values.len());
        for (i, v) in values.iter().enumerate() {
            if i == 0 {
                smoothed.push(*v);
            } else {
                smoothed.push(alpha * v + (1.0 - alpha) * smoothed[i - 1]);
            }
        }
        smoothed
    }

    /// Least-squares fit of `values` against index 0..n-1.
    /// Returns (slope, intercept); (0, 0) for an empty slice.
    pub fn linear_regression(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        if values.is_empty() {
            return (0.0, 0.0);
        }
        let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
        let sum_y: f64 = values.iter().sum();
        let sum_xy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
        let sum_xx: f64 = (0..values.len()).map(|i| (i as f64) * (i as f64)).sum();

        let denom = n * sum_xx - sum_x * sum_x;
        if denom == 0.0 {
            return (0.0, sum_y / n);
        }
        let slope = (n * sum_xy - sum_x * sum_y) / denom;
        let intercept = (sum_y - slope * sum_x) / n;
        (slope, intercept)
    }

    /// Fit a chronological, gap-filled sequence.
    ///
    /// `growth_clamp` bounds the growth rate to keep noisy short series from
    /// extrapolating to absurd values; category series get a wider band than
    /// the aggregate.
    pub fn fit(&self, values: &[f64], growth_clamp: (f64, f64)) -> SeriesFit {
        let n = values.len();
        let mean = if n == 0 {
            0.0
        } else {
            values.iter().sum::<f64>() / n as f64
        };

        // Too little data for a regression: fall back to the mean.
        if n == 0 || n < self.config.min_points {
            return SeriesFit {
                basis: mean,
                growth_rate: 0.0,
                slope: 0.0,
                confidence: self.config.fallback_confidence,
                trend: Trend::Stable,
            };
        }

        let (slope, _intercept) = Self::linear_regression(values);
        let growth_rate = slope.clamp(growth_clamp.0, growth_clamp.1);
        let trend = if slope > self.config.trend_threshold {
            Trend::Increasing
        } else if slope < -self.config.trend_threshold {
            Trend::Decreasing
        } else {
            Trend::Stable
        };

        if mean == 0.0 {
            // All-zero series: forecast the mean at the fallback confidence.
            return SeriesFit {
                basis: mean,
                growth_rate: 0.0,
                slope,
                confidence: self.config.fallback_confidence,
                trend,
            };
        }

        let variance =
            values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
        let std_dev = variance.sqrt();
        let confidence = (1.0 - std_dev / mean)
            .min(1.0)
            .max(self.config.min_confidence);

        SeriesFit {
            basis: values[n - 1],
            growth_rate,
            slope,
            confidence,
            trend,
        }
    }

    /// Full spending forecast over an aggregated expense series, with
    /// per-category projections and the seasonality verdict attached.
    pub fn forecast(
        &self,
        series: &AggregatedSeries,
        categories: &HashMap<String, CategorySeries>,
        seasonality: Seasonality,
    ) -> ForecastResult {
        let values = series.expense_values();
        debug!("Forecasting over {} periods", values.len());

        let fit = self.fit(&values, self.config.aggregate_growth_clamp);

        let mut per_category = HashMap::new();
        for (name, cat_series) in categories {
            let cat_values = cat_series.values();
            let cat_fit = self.fit(&cat_values, self.config.category_growth_clamp);
            let cat_mean = if cat_values.is_empty() {
                0.0
            } else {
                cat_values.iter().sum::<f64>() / cat_values.len() as f64
            };
            let volatility = if cat_mean == 0.0 {
                0.0
            } else {
                let var = cat_values
                    .iter()
                    .map(|v| (v - cat_mean) * (v - cat_mean))
                    .sum::<f64>()
                    / cat_values.len() as f64;
                var.sqrt() / cat_mean
            };
            per_category.insert(
                name.clone(),
                CategoryForecast {
                    current: cat_values.last().copied().unwrap_or(0.0),
                    projected: cat_fit.projected(1),
                    confidence: cat_fit.confidence,
                    volatility,
                },
            );
        }

        ForecastResult {
            next_period: fit.projected(1),
            three_period: fit.projected(3),
            six_period: fit.projected(6),
            confidence: fit.confidence,
            trend: fit.trend,
            seasonality,
            per_category,
        }
    }
}

impl Default for ForecastService {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}
