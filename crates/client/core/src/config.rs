//! Prediction tuning.
use std::env;

use serde::Deserialize;

/// Thresholds for reconciling predicted state with snapshots.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Predicted positions further than this from the server's are snapped.
    pub rubberband_threshold: f32,
    /// An approach point closer than this to the previous one is not resent.
    pub approach_tolerance: f32,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            rubberband_threshold: 1.5,
            approach_tolerance: 0.25,
        }
    }
}

impl PredictionConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `REALM_RUBBERBAND_THRESHOLD`
    /// - `REALM_APPROACH_TOLERANCE`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(threshold) = read_env::<f32>("REALM_RUBBERBAND_THRESHOLD")
            && threshold.is_finite()
        {
            config.rubberband_threshold = threshold.max(0.0);
        }

        if let Some(tolerance) = read_env::<f32>("REALM_APPROACH_TOLERANCE")
            && tolerance.is_finite()
        {
            config.approach_tolerance = tolerance.max(0.0);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
