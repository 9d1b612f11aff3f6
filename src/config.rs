//! Assembler configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AssemblyError, Result};
use crate::time::Duration;

/// Configuration consumed at assembler construction time.
///
/// # Example
///
/// ```
/// use scan_assembly::AssemblerConfig;
///
/// let config: AssemblerConfig =
///     serde_json::from_str(r#"{ "target_frame": "map" }"#).unwrap();
/// assert_eq!(config.pose_samples, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Frame assembled points are expressed in.
    pub target_frame: String,

    /// When set, overrides the frame carried by each scan.
    #[serde(default)]
    pub sensor_frame_override: Option<String>,

    /// Multiplier applied to each scan's `range_min` to form the lower
    /// cutoff. 1.0 keeps the sensor's own limit; 0.0 disables the cutoff.
    /// Comparisons against the cutoffs are strict.
    #[serde(default = "defaults::range_cutoff")]
    pub min_range_cutoff: f32,

    /// Multiplier applied to each scan's `range_max` to form the upper
    /// cutoff.
    #[serde(default = "defaults::range_cutoff")]
    pub max_range_cutoff: f32,

    /// Number of poses sampled across a scan's acquisition window for
    /// motion compensation. Values below 2 disable interpolation and use a
    /// single mid-scan pose.
    #[serde(default = "defaults::pose_samples")]
    pub pose_samples: usize,

    /// Upper bound on each blocking transform lookup.
    #[serde(default = "defaults::lookup_timeout")]
    pub lookup_timeout: Duration,

    /// Whether points with non-finite coordinates are discarded.
    #[serde(default = "defaults::discard_non_finite")]
    pub discard_non_finite: bool,

    /// Optional tolerance (radians) for detecting angular-parameter drift
    /// in the projection table. `None` keeps the historical policy of
    /// rebuilding on point-count changes only.
    #[serde(default)]
    pub angle_tolerance: Option<f32>,
}

mod defaults {
    use crate::time::Duration;

    pub(super) fn range_cutoff() -> f32 {
        1.0
    }

    pub(super) fn pose_samples() -> usize {
        4
    }

    pub(super) fn lookup_timeout() -> Duration {
        Duration::from_millis(100)
    }

    pub(super) fn discard_non_finite() -> bool {
        true
    }
}

impl AssemblerConfig {
    /// Creates a configuration with defaults for everything but the target
    /// frame.
    #[must_use]
    pub fn new(target_frame: impl Into<String>) -> Self {
        Self {
            target_frame: target_frame.into(),
            sensor_frame_override: None,
            min_range_cutoff: defaults::range_cutoff(),
            max_range_cutoff: defaults::range_cutoff(),
            pose_samples: defaults::pose_samples(),
            lookup_timeout: defaults::lookup_timeout(),
            discard_non_finite: defaults::discard_non_finite(),
            angle_tolerance: None,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidConfig`] when the target frame is
    /// empty or a cutoff multiplier is negative or non-finite.
    pub fn validate(&self) -> Result<()> {
        if self.target_frame.is_empty() {
            return Err(AssemblyError::invalid_config("target frame must not be empty"));
        }
        if !self.min_range_cutoff.is_finite() || self.min_range_cutoff < 0.0 {
            return Err(AssemblyError::invalid_config(
                "min range cutoff multiplier must be finite and non-negative",
            ));
        }
        if !self.max_range_cutoff.is_finite() || self.max_range_cutoff < 0.0 {
            return Err(AssemblyError::invalid_config(
                "max range cutoff multiplier must be finite and non-negative",
            ));
        }
        if let Some(tolerance) = self.angle_tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(AssemblyError::invalid_config(
                    "angle tolerance must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_minimal_json() {
        let config: AssemblerConfig = serde_json::from_str(r#"{ "target_frame": "map" }"#).unwrap();

        assert_eq!(config.target_frame, "map");
        assert_eq!(config.sensor_frame_override, None);
        assert_eq!(config.min_range_cutoff, 1.0);
        assert_eq!(config.max_range_cutoff, 1.0);
        assert_eq!(config.pose_samples, 4);
        assert_eq!(config.lookup_timeout, Duration::from_millis(100));
        assert!(config.discard_non_finite);
        assert_eq!(config.angle_tolerance, None);
    }

    #[test]
    fn new_matches_serde_defaults() {
        let from_json: AssemblerConfig =
            serde_json::from_str(r#"{ "target_frame": "map" }"#).unwrap();
        assert_eq!(AssemblerConfig::new("map"), from_json);
    }

    #[test]
    fn validate_rejects_empty_target_frame() {
        assert!(AssemblerConfig::new("").validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_cutoffs() {
        let mut config = AssemblerConfig::new("map");
        config.min_range_cutoff = -0.5;
        assert!(config.validate().is_err());

        let mut config = AssemblerConfig::new("map");
        config.max_range_cutoff = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_angle_tolerance() {
        let mut config = AssemblerConfig::new("map");
        config.angle_tolerance = Some(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_zero_cutoffs_and_single_sample() {
        let mut config = AssemblerConfig::new("map");
        config.min_range_cutoff = 0.0;
        config.max_range_cutoff = 0.0;
        config.pose_samples = 1;
        assert!(config.validate().is_ok());
    }
}
