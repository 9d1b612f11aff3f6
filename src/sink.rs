//! Point sinks: where assembled points go.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Receiver for the points of one integrated scan.
///
/// The assembler drives the lifecycle: one `begin_scan`, zero or more
/// `accept_point` calls, one `end_scan`. Sink operations are infallible
/// from the assembler's perspective; concrete cloud containers implement
/// this trait.
pub trait PointSink {
    /// Announces an upcoming scan with at most `expected_points` points.
    fn begin_scan(&mut self, expected_points: usize);

    /// Accepts one point in the target frame.
    fn accept_point(&mut self, position: Vec3, intensity: f32);

    /// Marks the end of the current scan's points.
    fn end_scan(&mut self);
}

/// A single assembled point in the target frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CloudPoint {
    /// Position in meters: `[x, y, z]`.
    pub position: [f32; 3],

    /// Intensity of the originating range measurement (0.0 when the scan
    /// carried none).
    pub intensity: f32,
}

impl CloudPoint {
    /// Creates a point.
    #[must_use]
    pub const fn new(position: [f32; 3], intensity: f32) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Returns the position as a vector.
    #[must_use]
    pub const fn position_vec(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// A growable point cloud accumulating one or more integrated scans.
///
/// The reference [`PointSink`] implementation; callers with their own
/// containers (or wire formats) implement the trait directly instead.
///
/// # Example
///
/// ```
/// use scan_assembly::{CloudPoint, PointCloud, PointSink};
/// use glam::Vec3;
///
/// let mut cloud = PointCloud::new();
/// cloud.begin_scan(2);
/// cloud.accept_point(Vec3::new(1.0, 0.0, 0.0), 0.5);
/// cloud.end_scan();
///
/// assert_eq!(cloud.len(), 1);
/// assert_eq!(cloud.completed_scans(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    points: Vec<CloudPoint>,
    completed_scans: usize,
}

impl PointCloud {
    /// Creates an empty cloud.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accumulated points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Checks if the cloud is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of scans fully integrated into this cloud.
    #[must_use]
    pub const fn completed_scans(&self) -> usize {
        self.completed_scans
    }

    /// Returns the accumulated points.
    #[must_use]
    pub fn points(&self) -> &[CloudPoint] {
        &self.points
    }

    /// Clears the cloud for reuse.
    pub fn clear(&mut self) {
        self.points.clear();
        self.completed_scans = 0;
    }
}

impl PointSink for PointCloud {
    fn begin_scan(&mut self, expected_points: usize) {
        self.points.reserve(expected_points);
    }

    fn accept_point(&mut self, position: Vec3, intensity: f32) {
        self.points.push(CloudPoint::new(position.to_array(), intensity));
    }

    fn end_scan(&mut self) {
        self.completed_scans += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_accumulates_across_scans() {
        let mut cloud = PointCloud::new();

        cloud.begin_scan(2);
        cloud.accept_point(Vec3::new(1.0, 0.0, 0.0), 0.1);
        cloud.accept_point(Vec3::new(0.0, 1.0, 0.0), 0.2);
        cloud.end_scan();

        cloud.begin_scan(1);
        cloud.accept_point(Vec3::new(0.0, 0.0, 1.0), 0.3);
        cloud.end_scan();

        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.completed_scans(), 2);
        assert!((cloud.points()[2].intensity - 0.3).abs() < 1e-6);
    }

    #[test]
    fn cloud_clear_resets() {
        let mut cloud = PointCloud::new();
        cloud.begin_scan(1);
        cloud.accept_point(Vec3::ZERO, 0.0);
        cloud.end_scan();

        cloud.clear();
        assert!(cloud.is_empty());
        assert_eq!(cloud.completed_scans(), 0);
    }

    #[test]
    fn point_position_vec() {
        let point = CloudPoint::new([1.0, 2.0, 3.0], 0.0);
        assert!((point.position_vec() - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn cloud_serialization_roundtrip() {
        let mut cloud = PointCloud::new();
        cloud.begin_scan(1);
        cloud.accept_point(Vec3::new(1.0, 2.0, 3.0), 0.5);
        cloud.end_scan();

        let json = serde_json::to_string(&cloud).ok();
        assert!(json.is_some());
        let parsed: Result<PointCloud, _> = serde_json::from_str(&json.unwrap_or_default());
        assert_eq!(parsed.ok(), Some(cloud));
    }
}
