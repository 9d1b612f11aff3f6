//! Cached polar-to-Cartesian projection table.

use glam::Vec2;
use tracing::debug;

use crate::scan::LaserScan;

/// Per-angle unit direction table for projecting range measurements.
///
/// Column `i` holds `(cos, sin)` of the scan's `i`-th measurement angle, so
/// the sensor-local point is `range * column`. The table is rebuilt lazily
/// when the scan geometry changes, which for a fixed-rate sensor means the
/// trigonometry runs once and every subsequent scan reuses it.
///
/// # Example
///
/// ```
/// use scan_assembly::{LaserScan, ProjectionCache, Timestamp};
///
/// let scan = LaserScan::new(Timestamp::zero(), "laser", 0.0, 0.1, vec![1.0; 4]);
/// let mut cache = ProjectionCache::new();
///
/// assert!(cache.ensure(&scan));
/// assert!(!cache.ensure(&scan));
/// assert_eq!(cache.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectionCache {
    /// Per-index (cos, sin) of the measurement angle.
    directions: Vec<Vec2>,

    /// Angular parameters the table was built for.
    angle_min: f32,
    angle_increment: f32,

    /// When set, the table also rebuilds if the angular parameters drift by
    /// more than this tolerance. When unset, only a point-count change
    /// triggers a rebuild (the historical policy; see `AssemblerConfig`).
    angle_tolerance: Option<f32>,

    /// Number of rebuilds performed, for observability.
    rebuilds: u64,
}

impl ProjectionCache {
    /// Creates a cache that rebuilds on point-count changes only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache that additionally rebuilds when `angle_min` or
    /// `angle_increment` moves by more than `tolerance` radians.
    #[must_use]
    pub fn with_angle_tolerance(tolerance: f32) -> Self {
        Self {
            angle_tolerance: Some(tolerance),
            ..Self::default()
        }
    }

    /// Makes the table match the scan's geometry, rebuilding if necessary.
    ///
    /// Returns `true` if the table was rebuilt. O(N) on rebuild, O(1) when
    /// the geometry is unchanged. Never fails.
    pub fn ensure(&mut self, scan: &LaserScan) -> bool {
        if !self.needs_rebuild(scan) {
            return false;
        }

        debug!(
            points = scan.len(),
            angle_min = scan.angle_min,
            angle_increment = scan.angle_increment,
            "rebuilding projection table"
        );

        self.directions.clear();
        self.directions.reserve(scan.len());
        for index in 0..scan.len() {
            let (sin, cos) = scan.angle_at(index).sin_cos();
            self.directions.push(Vec2::new(cos, sin));
        }
        self.angle_min = scan.angle_min;
        self.angle_increment = scan.angle_increment;
        self.rebuilds += 1;
        true
    }

    fn needs_rebuild(&self, scan: &LaserScan) -> bool {
        if self.directions.len() != scan.len() {
            return true;
        }
        match self.angle_tolerance {
            Some(tolerance) => {
                (self.angle_min - scan.angle_min).abs() > tolerance
                    || (self.angle_increment - scan.angle_increment).abs() > tolerance
            }
            None => false,
        }
    }

    /// Returns the unit direction for a measurement index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds for the current table; callers
    /// must `ensure` against the scan they index with.
    #[must_use]
    pub fn direction(&self, index: usize) -> Vec2 {
        self.directions[index]
    }

    /// Number of columns in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Checks if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Number of rebuilds performed since construction.
    #[must_use]
    pub const fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;

    fn scan(angle_min: f32, angle_increment: f32, n: usize) -> LaserScan {
        LaserScan::new(Timestamp::zero(), "laser", angle_min, angle_increment, vec![1.0; n])
    }

    #[test]
    fn builds_cos_sin_columns() {
        let mut cache = ProjectionCache::new();
        assert!(cache.ensure(&scan(-0.1, 0.1, 3)));

        let expected = [(-0.1f32), 0.0, 0.1];
        for (index, angle) in expected.iter().enumerate() {
            let dir = cache.direction(index);
            assert!((dir.x - angle.cos()).abs() < 1e-6);
            assert!((dir.y - angle.sin()).abs() < 1e-6);
        }
    }

    #[test]
    fn ensure_is_idempotent() {
        let mut cache = ProjectionCache::new();
        let scan = scan(0.0, 0.01, 360);

        assert!(cache.ensure(&scan));
        assert!(!cache.ensure(&scan));
        assert!(!cache.ensure(&scan));
        assert_eq!(cache.rebuild_count(), 1);
    }

    #[test]
    fn rebuilds_on_point_count_change() {
        let mut cache = ProjectionCache::new();
        cache.ensure(&scan(0.0, 0.01, 360));
        assert!(cache.ensure(&scan(0.0, 0.01, 180)));
        assert_eq!(cache.rebuild_count(), 2);
        assert_eq!(cache.len(), 180);
    }

    #[test]
    fn ignores_angle_change_by_default() {
        // Point-count-only policy: a changed angle_min with the same count
        // leaves the stale table in place.
        let mut cache = ProjectionCache::new();
        cache.ensure(&scan(0.0, 0.01, 90));
        assert!(!cache.ensure(&scan(1.0, 0.01, 90)));
        assert_eq!(cache.rebuild_count(), 1);
    }

    #[test]
    fn rebuilds_on_angle_change_with_tolerance() {
        let mut cache = ProjectionCache::with_angle_tolerance(1e-4);
        cache.ensure(&scan(0.0, 0.01, 90));

        // Within tolerance: no rebuild.
        assert!(!cache.ensure(&scan(5e-5, 0.01, 90)));

        // Beyond tolerance: rebuild.
        assert!(cache.ensure(&scan(0.5, 0.01, 90)));
        assert_eq!(cache.rebuild_count(), 2);
    }

    #[test]
    fn empty_scan_yields_empty_table() {
        let mut cache = ProjectionCache::new();
        assert!(!cache.ensure(&scan(0.0, 0.01, 0)));
        assert!(cache.is_empty());
    }
}
