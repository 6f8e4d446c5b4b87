use crate::config::AnomalyConfig;
use crate::models::insight::Anomaly;

/// Flags points that deviate from a trailing local average by more than a
/// threshold multiple of the local standard deviation.
///
/// An absolute floor is applied on top of the deviation test so that
/// near-zero series (where any movement is many "sigmas") don't drown the
/// dashboard in noise.
pub struct AnomalyService {
    config: AnomalyConfig,
}

impl AnomalyService {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    /// Scan a chronological sequence (e.g., daily spend totals).
    ///
    /// Sequences shorter than the configured minimum yield no anomalies —
    /// not an error. Each index from the window size onward is compared
    /// against the mean and standard deviation of the points immediately
    /// before it.
    pub fn detect(&self, values: &[f64]) -> Vec<Anomaly> {
        if values.len() < self.config.min_points {
            return Vec::new();
        }

        let window = self.config.window;
        let mut anomalies = Vec::new();

        for i in window..values.len() {
            let trailing = &values[i - window..i];
            let mean = trailing.iter().sum::<f64>() / trailing.len() as f64;
            let variance = trailing
                .iter()
                .map(|v| (v - mean) * (v - mean))
                .sum::<f64>()
                / trailing.len() as f64;
            let std_dev = variance.sqrt();

            let value = values[i];
            let deviates = (value - mean).abs() > self.config.deviation_multiplier * std_dev;
            let above_floor = value > mean + self.config.absolute_floor;

            if deviates && above_floor {
                let deviation_percent = if mean == 0.0 {
                    0.0
                } else {
                    (value - mean) / mean * 100.0
                };
                anomalies.push(Anomaly {
                    index: i,
                    value,
                    expected: mean,
                    deviation_percent,
                });
            }
        }

        anomalies
    }
}

impl Default for AnomalyService {
    fn default() -> Self {
        Self::new(AnomalyConfig::default())
    }
}
