//! Error types for scan assembly.

use thiserror::Error;

use crate::time::Timestamp;

/// Errors that can occur while assembling scans into a point cloud.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// No transform between the sensor and target frames could be resolved
    /// for the instant a scan integration needs to start from.
    ///
    /// Lookups that time out surface identically to lookups that find
    /// nothing; callers cannot distinguish the two.
    #[error(
        "no transform from `{source_frame}` to `{target_frame}` at {time_secs:.3}s"
    )]
    TransformUnavailable {
        /// Frame the scan points are expressed in.
        source_frame: String,
        /// Frame the points should be transformed into.
        target_frame: String,
        /// Query time in seconds.
        time_secs: f64,
    },

    /// Scan data is internally inconsistent (e.g., mismatched vector lengths).
    #[error("invalid scan: {0}")]
    InvalidScan(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AssemblyError {
    /// Creates a transform unavailable error.
    #[must_use]
    pub fn transform_unavailable(
        source_frame: impl Into<String>,
        target_frame: impl Into<String>,
        time: Timestamp,
    ) -> Self {
        Self::TransformUnavailable {
            source_frame: source_frame.into(),
            target_frame: target_frame.into(),
            time_secs: time.as_secs_f64(),
        }
    }

    /// Creates an invalid scan error.
    #[must_use]
    pub fn invalid_scan(reason: impl Into<String>) -> Self {
        Self::InvalidScan(reason.into())
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Result type for scan assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;
