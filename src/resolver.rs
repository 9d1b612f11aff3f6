//! Transform resolution with a recovery-frame fallback.

use tracing::warn;

use crate::provider::TransformProvider;
use crate::time::{Duration, Timestamp};
use crate::transform::{PoseSample, RigidTransform};

/// Cached recovery path: an intermediate frame plus the last known transform
/// from it to the target frame.
#[derive(Debug, Clone)]
struct RecoveryFrame {
    frame: String,
    to_target: RigidTransform,
}

/// Resolves sensor poses, falling back through a recovery frame when the
/// direct transform is unavailable.
///
/// The fallback composes `recovery_to_target ∘ source_to_recovery`. The
/// recovery→target leg is cached: when a refresh at the query time fails,
/// the previously cached value is used — trading currency for availability,
/// since a slightly stale recovery transform beats dropping the scan.
pub struct TransformResolver<P> {
    provider: P,
    recovery: Option<RecoveryFrame>,
}

impl<P: TransformProvider> TransformResolver<P> {
    /// Creates a resolver with no recovery path configured.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            recovery: None,
        }
    }

    /// Configures the recovery frame and seeds its transform to the target.
    ///
    /// The seed is used until a fresher recovery→target transform can be
    /// looked up.
    pub fn set_recovery_frame(&mut self, frame: impl Into<String>, to_target: RigidTransform) {
        self.recovery = Some(RecoveryFrame {
            frame: frame.into(),
            to_target,
        });
    }

    /// Removes the recovery path; direct lookups only.
    pub fn clear_recovery_frame(&mut self) {
        self.recovery = None;
    }

    /// Resolves the sensor pose in the target frame at `time`.
    ///
    /// Tries the direct `source_frame` → `target_frame` lookup first, then
    /// the recovery path if one is configured. Returns `None` when neither
    /// succeeds; failure is never fatal to the caller.
    pub fn resolve(
        &mut self,
        target_frame: &str,
        source_frame: &str,
        time: Timestamp,
        timeout: Duration,
    ) -> Option<PoseSample> {
        let Self { provider, recovery } = self;

        if let Some(direct) = provider.lookup(target_frame, source_frame, time, timeout) {
            return Some(PoseSample::new(direct, time));
        }

        let Some(recovery) = recovery.as_mut() else {
            warn!(
                source = source_frame,
                target = target_frame,
                time_secs = time.as_secs_f64(),
                timeout_secs = timeout.as_secs_f64(),
                "transform unavailable and no recovery frame configured"
            );
            return None;
        };

        // Refresh the cached recovery->target leg; keep the stale value when
        // the refresh fails.
        if let Some(fresh) = provider.lookup(target_frame, &recovery.frame, time, timeout) {
            recovery.to_target = fresh;
        }

        let Some(source_to_recovery) =
            provider.lookup(&recovery.frame, source_frame, time, timeout)
        else {
            warn!(
                source = source_frame,
                recovery = recovery.frame.as_str(),
                time_secs = time.as_secs_f64(),
                "transform to recovery frame unavailable"
            );
            return None;
        };

        warn!(
            source = source_frame,
            target = target_frame,
            recovery = recovery.frame.as_str(),
            "recovering transform through intermediate frame"
        );

        Some(PoseSample::new(
            recovery.to_target.compose(&source_to_recovery),
            time,
        ))
    }
}
