//! Motion-compensated assembly of laser scans into point clouds.
//!
//! A 2D laser scanner acquires its measurements sequentially, so a scan
//! taken from a moving platform is smeared: each range was measured from a
//! slightly different pose. This crate undoes that smear by resolving the
//! sensor pose at several instants across the acquisition window and
//! interpolating per point before projecting into a fixed target frame.
//!
//! # Scan Integration
//!
//! - [`ScanAssembler`] - Integrates scans into a sink, pose-interpolated
//! - [`AssemblerConfig`] - Range cutoffs, pose sample budget, timeouts
//! - [`LaserScan`] - One sweep of range measurements
//! - [`ProjectionCache`] - Cached per-angle cosine/sine projection table
//!
//! # Transforms
//!
//! - [`RigidTransform`] - Rigid body transform (rotation + translation)
//! - [`TransformProvider`] - Lookup capability, implemented by closures too
//! - [`TransformResolver`] - Lookup with a recovery-frame fallback
//!
//! # Output
//!
//! - [`PointSink`] - Receiver for assembled points
//! - [`PointCloud`] - Growable sink accumulating scans
//!
//! # Example
//!
//! ```
//! use scan_assembly::{
//!     AssemblerConfig, Duration, LaserScan, PointCloud, RigidTransform, ScanAssembler,
//!     Timestamp,
//! };
//!
//! // A provider that always reports an identity pose.
//! let provider =
//!     |_: &str, _: &str, _: Timestamp, _: Duration| Some(RigidTransform::identity());
//!
//! let mut assembler = ScanAssembler::new(AssemblerConfig::new("map"), provider).unwrap();
//!
//! let scan = LaserScan::new(Timestamp::zero(), "laser", -0.1, 0.1, vec![1.0, 2.0, 3.0])
//!     .with_range_window(0.1, 10.0);
//!
//! let mut cloud = PointCloud::new();
//! assembler.integrate(&scan, &mut cloud).unwrap();
//! assert_eq!(cloud.len(), 3);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod assembler;
mod config;
mod error;
mod projection;
mod provider;
mod resolver;
mod scan;
mod sink;
mod time;
mod transform;

// Re-export assembly types
pub use assembler::{AssemblyCounters, ScanAssembler};
pub use config::AssemblerConfig;
pub use projection::ProjectionCache;
pub use scan::LaserScan;

// Re-export transform types
pub use provider::TransformProvider;
pub use resolver::TransformResolver;
pub use transform::{PoseSample, RigidTransform};

// Re-export output types
pub use sink::{CloudPoint, PointCloud, PointSink};

// Re-export time and error types
pub use error::{AssemblyError, Result};
pub use time::{Duration, Timestamp};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        AssemblerConfig, AssemblyCounters, AssemblyError, CloudPoint, Duration, LaserScan,
        PointCloud, PointSink, PoseSample, ProjectionCache, RigidTransform, ScanAssembler,
        Timestamp, TransformProvider, TransformResolver,
    };
}
