//! Motion-compensated scan integration.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::AssemblerConfig;
use crate::error::{AssemblyError, Result};
use crate::projection::ProjectionCache;
use crate::provider::TransformProvider;
use crate::resolver::TransformResolver;
use crate::scan::LaserScan;
use crate::sink::PointSink;
use crate::time::{Duration, Timestamp};
use crate::transform::RigidTransform;

/// Monotone counts of assembly activity.
///
/// Incremented by the assembler; reset by the surrounding cloud management
/// through [`ScanAssembler::begin_new_cloud`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssemblyCounters {
    /// Clouds started so far.
    pub clouds_created: u64,
    /// Scans integrated into the current cloud.
    pub scans_in_cloud: u64,
    /// Points accumulated into the current cloud.
    pub points_in_cloud: u64,
}

/// Assembles laser scans into a motion-compensated point cloud.
///
/// For each scan the assembler resolves the sensor pose at a bounded number
/// of instants across the acquisition window, interpolates between them per
/// point (linear translation, shortest-arc slerp rotation), projects each
/// in-range measurement through the cached cosine/sine table, transforms it
/// into the target frame, and emits it to a [`PointSink`].
///
/// One assembler instance serves one logical stream of scans; it is not
/// meant to be driven concurrently.
///
/// # Example
///
/// ```
/// use scan_assembly::{
///     AssemblerConfig, Duration, LaserScan, PointCloud, RigidTransform, ScanAssembler,
///     Timestamp,
/// };
///
/// // A provider that always reports an identity pose.
/// let provider =
///     |_: &str, _: &str, _: Timestamp, _: Duration| Some(RigidTransform::identity());
///
/// let mut assembler = ScanAssembler::new(AssemblerConfig::new("map"), provider).unwrap();
/// let scan = LaserScan::new(Timestamp::zero(), "laser", 0.0, 0.1, vec![2.0])
///     .with_range_window(0.1, 10.0);
///
/// let mut cloud = PointCloud::new();
/// assembler.integrate(&scan, &mut cloud).unwrap();
/// assert_eq!(cloud.len(), 1);
/// ```
pub struct ScanAssembler<P> {
    config: AssemblerConfig,
    resolver: TransformResolver<P>,
    projection: ProjectionCache,
    counters: AssemblyCounters,
}

impl<P: TransformProvider> ScanAssembler<P> {
    /// Creates an assembler from a validated configuration and a transform
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidConfig`] when the configuration is
    /// rejected by [`AssemblerConfig::validate`].
    pub fn new(config: AssemblerConfig, provider: P) -> Result<Self> {
        config.validate()?;
        let projection = match config.angle_tolerance {
            Some(tolerance) => ProjectionCache::with_angle_tolerance(tolerance),
            None => ProjectionCache::new(),
        };
        Ok(Self {
            config,
            resolver: TransformResolver::new(provider),
            projection,
            counters: AssemblyCounters::default(),
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Returns the current counters.
    #[must_use]
    pub const fn counters(&self) -> AssemblyCounters {
        self.counters
    }

    /// Configures the resolver's recovery frame and seed transform.
    pub fn set_recovery_frame(&mut self, frame: impl Into<String>, to_target: RigidTransform) {
        self.resolver.set_recovery_frame(frame, to_target);
    }

    /// Marks the start of a new output cloud: bumps the cloud count and
    /// zeroes the per-cloud scan and point counts.
    pub fn begin_new_cloud(&mut self) {
        self.counters.clouds_created += 1;
        self.counters.scans_in_cloud = 0;
        self.counters.points_in_cloud = 0;
    }

    /// Integrates one scan into the sink.
    ///
    /// On success the sink has seen exactly one `begin_scan`/`end_scan`
    /// pair with every surviving point in between.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidScan`] for inconsistent scan data and
    /// [`AssemblyError::TransformUnavailable`] when the initial sensor pose
    /// cannot be resolved — in both cases the scan is dropped entirely and
    /// the sink is untouched. Later pose-sample failures are non-fatal: the
    /// last known pose is held until a further resolution attempt (bounded
    /// by the configured sample budget) succeeds.
    pub fn integrate<S: PointSink>(&mut self, scan: &LaserScan, sink: &mut S) -> Result<()> {
        scan.validate()?;

        let target_frame = self.config.target_frame.clone();
        let source_frame = self
            .config
            .sensor_frame_override
            .clone()
            .unwrap_or_else(|| scan.frame.clone());
        let timeout = self.config.lookup_timeout;
        let budget = self.config.pose_samples;

        let scan_duration = scan.acquisition_duration();
        let interpolating = budget >= 2 && !scan.time_increment.is_zero();

        // With interpolation the first pose anchors the start of the window;
        // without it a single mid-scan pose stands in for the whole sweep.
        let initial_time = if interpolating {
            scan.stamp
        } else {
            scan.middle_time()
        };
        let initial = self
            .resolver
            .resolve(&target_frame, &source_frame, initial_time, timeout)
            .ok_or_else(|| {
                AssemblyError::transform_unavailable(&source_frame, &target_frame, initial_time)
            })?;

        self.projection.ensure(scan);
        let min_cutoff = scan.range_min * self.config.min_range_cutoff;
        let max_cutoff = scan.range_max * self.config.max_range_cutoff;

        // Time between consecutive pose queries across the window.
        #[allow(clippy::cast_precision_loss)]
        let slice = if interpolating {
            Duration::from_secs_f64(scan_duration.as_secs_f64() / (budget - 1) as f64)
        } else {
            scan_duration
        };

        let mut past_time = scan.stamp;
        let mut past = initial.transform;
        let mut future = RigidTransform::identity();
        let mut future_index: usize = 1;
        let mut future_time = past_time.checked_add(slice).unwrap_or(past_time);
        let mut future_valid = false;

        if interpolating {
            if let Some(found) = self.search_future_pose(
                &target_frame,
                &source_frame,
                timeout,
                budget,
                slice,
                &mut future_index,
                &mut future_time,
            ) {
                future = found;
                future_valid = true;
            }
        }

        sink.begin_scan(scan.len());

        let mut cursor = scan.stamp;
        let mut pose = initial.transform;

        for index in 0..scan.len() {
            let range = scan.ranges[index];
            if range > min_cutoff && range < max_cutoff {
                let direction = self.projection.direction(index);
                let local = Vec3::new(range * direction.x, range * direction.y, 0.0);

                if future_valid {
                    let ratio = interpolation_ratio(past_time, cursor, slice);
                    pose = past.interpolate(&future, ratio);
                }

                let point = pose.apply_point(local);
                if !self.config.discard_non_finite || point.is_finite() {
                    sink.accept_point(point, scan.intensity_at(index));
                    self.counters.points_in_cloud += 1;
                }
            }

            if future_valid {
                cursor = cursor.checked_add(scan.time_increment).unwrap_or(cursor);
                if cursor > future_time {
                    // The cursor passed the future pose: it becomes the past,
                    // and the next one is searched for within the budget.
                    past_time = future_time;
                    past = future;
                    pose = past;

                    future_time = past_time.checked_add(slice).unwrap_or(past_time);
                    future_index += 1;
                    future_valid = false;
                    if let Some(found) = self.search_future_pose(
                        &target_frame,
                        &source_frame,
                        timeout,
                        budget,
                        slice,
                        &mut future_index,
                        &mut future_time,
                    ) {
                        future = found;
                        future_valid = true;
                    }
                }
            }
        }

        sink.end_scan();
        self.counters.scans_in_cloud += 1;
        Ok(())
    }

    /// Walks the pose-query ladder forward until a lookup succeeds or the
    /// sample budget is exhausted.
    #[allow(clippy::too_many_arguments)]
    fn search_future_pose(
        &mut self,
        target_frame: &str,
        source_frame: &str,
        timeout: Duration,
        budget: usize,
        slice: Duration,
        index: &mut usize,
        time: &mut Timestamp,
    ) -> Option<RigidTransform> {
        while *index < budget {
            if let Some(pose) = self
                .resolver
                .resolve(target_frame, source_frame, *time, timeout)
            {
                return Some(pose.transform);
            }
            *index += 1;
            *time = time.checked_add(slice).unwrap_or(*time);
        }
        None
    }
}

/// Position of `current` within the `[past, past + slice]` interval, as a
/// factor in `[0, 1]`. A zero-length interval yields 0.
#[allow(clippy::cast_possible_truncation)]
fn interpolation_ratio(past: Timestamp, current: Timestamp, slice: Duration) -> f32 {
    if slice.is_zero() {
        return 0.0;
    }
    (current.abs_diff(past).as_secs_f64() / slice.as_secs_f64()) as f32
}
