//! Laser scan input type.

use serde::{Deserialize, Serialize};

use crate::error::{AssemblyError, Result};
use crate::time::{Duration, Timestamp};

/// One sweep of range measurements at fixed angular spacing.
///
/// The measurement at index `i` was taken at angle
/// `angle_min + i * angle_increment` and at time
/// `stamp + i * time_increment`. The scan is immutable for the duration of
/// one integration call; the assembler only reads it.
///
/// # Example
///
/// ```
/// use scan_assembly::{LaserScan, Timestamp};
///
/// let scan = LaserScan::new(Timestamp::zero(), "laser", -0.1, 0.1, vec![1.0, 2.0, 3.0])
///     .with_range_window(0.1, 10.0);
///
/// assert_eq!(scan.len(), 3);
/// assert!((scan.angle_at(1) - 0.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Acquisition time of the first measurement.
    pub stamp: Timestamp,

    /// Frame the measurements are expressed in.
    pub frame: String,

    /// Angle of the first measurement in radians.
    pub angle_min: f32,

    /// Angular distance between consecutive measurements in radians.
    pub angle_increment: f32,

    /// Time between consecutive measurements.
    ///
    /// Zero for sensors that report all measurements at one instant; motion
    /// compensation is only meaningful when this is non-zero.
    #[serde(default)]
    pub time_increment: Duration,

    /// Minimum valid range in meters.
    pub range_min: f32,

    /// Maximum valid range in meters.
    pub range_max: f32,

    /// Range measurements in meters.
    pub ranges: Vec<f32>,

    /// Per-measurement intensity values; empty when the sensor reports none,
    /// otherwise the same length as `ranges`.
    #[serde(default)]
    pub intensities: Vec<f32>,
}

impl LaserScan {
    /// Creates a scan with an open range window and no timing information.
    #[must_use]
    pub fn new(
        stamp: Timestamp,
        frame: impl Into<String>,
        angle_min: f32,
        angle_increment: f32,
        ranges: Vec<f32>,
    ) -> Self {
        Self {
            stamp,
            frame: frame.into(),
            angle_min,
            angle_increment,
            time_increment: Duration::zero(),
            range_min: 0.0,
            range_max: f32::INFINITY,
            ranges,
            intensities: Vec::new(),
        }
    }

    /// Sets the valid range window.
    #[must_use]
    pub fn with_range_window(mut self, range_min: f32, range_max: f32) -> Self {
        self.range_min = range_min;
        self.range_max = range_max;
        self
    }

    /// Sets the time between consecutive measurements.
    #[must_use]
    pub fn with_time_increment(mut self, time_increment: Duration) -> Self {
        self.time_increment = time_increment;
        self
    }

    /// Sets per-measurement intensities.
    #[must_use]
    pub fn with_intensities(mut self, intensities: Vec<f32>) -> Self {
        self.intensities = intensities;
        self
    }

    /// Number of range measurements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Checks if the scan is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns the angle for a given measurement index.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn angle_at(&self, index: usize) -> f32 {
        (index as f32).mul_add(self.angle_increment, self.angle_min)
    }

    /// Returns the intensity for a given measurement index.
    ///
    /// Defaults to 0.0 when the scan carries no intensity for this index.
    #[must_use]
    pub fn intensity_at(&self, index: usize) -> f32 {
        self.intensities.get(index).copied().unwrap_or(0.0)
    }

    /// Returns the time span over which the scan was acquired.
    ///
    /// This is `(N - 1) * time_increment`; a single-measurement scan has a
    /// zero-length window.
    #[must_use]
    pub fn acquisition_duration(&self) -> Duration {
        let steps = self.ranges.len().saturating_sub(1) as u64;
        self.time_increment
            .checked_mul(steps)
            .unwrap_or(Duration::zero())
    }

    /// Returns the instant halfway through the acquisition window.
    ///
    /// Equals `stamp` when the scan carries no timing information.
    #[must_use]
    pub fn middle_time(&self) -> Timestamp {
        if self.time_increment.is_zero() {
            return self.stamp;
        }
        self.stamp
            .checked_add(self.acquisition_duration().halved())
            .unwrap_or(self.stamp)
    }

    /// Validates internal consistency of the scan data.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidScan`] when the scan is empty, when
    /// the intensity vector length does not match the ranges, or when the
    /// range window is malformed.
    pub fn validate(&self) -> Result<()> {
        if self.ranges.is_empty() {
            return Err(AssemblyError::invalid_scan("scan has no measurements"));
        }
        if !self.intensities.is_empty() && self.intensities.len() != self.ranges.len() {
            return Err(AssemblyError::invalid_scan(
                "intensities and ranges length mismatch",
            ));
        }
        if self.range_min < 0.0 {
            return Err(AssemblyError::invalid_scan("range_min must be non-negative"));
        }
        if self.range_max <= self.range_min {
            return Err(AssemblyError::invalid_scan(
                "range_max must be greater than range_min",
            ));
        }
        Ok(())
    }
}
