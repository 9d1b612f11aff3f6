//! Transform lookup capability consumed by the resolver.

use crate::time::{Duration, Timestamp};
use crate::transform::RigidTransform;

/// Source of frame-to-frame transforms at given instants.
///
/// The primary implementation is a live transform-tree client; tests plug in
/// fakes. Implementations must tolerate repeated queries at the same or
/// nearby times.
///
/// A lookup blocks for at most `timeout`; a lookup that times out returns
/// `None` just like one that finds nothing — the two are deliberately
/// indistinguishable to callers.
pub trait TransformProvider {
    /// Resolves the transform that maps points in `source_frame` into
    /// `target_frame` at `time`.
    fn lookup(
        &mut self,
        target_frame: &str,
        source_frame: &str,
        time: Timestamp,
        timeout: Duration,
    ) -> Option<RigidTransform>;
}

impl<F> TransformProvider for F
where
    F: FnMut(&str, &str, Timestamp, Duration) -> Option<RigidTransform>,
{
    fn lookup(
        &mut self,
        target_frame: &str,
        source_frame: &str,
        time: Timestamp,
        timeout: Duration,
    ) -> Option<RigidTransform> {
        self(target_frame, source_frame, time, timeout)
    }
}
