//! Rigid transforms between sensor and target frames.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A 3D rigid body transform (rotation + translation).
///
/// Applied as `p' = R * p + t`. Represents the pose of the sensor frame
/// expressed in the target frame at some instant.
///
/// # Example
///
/// ```
/// use scan_assembly::RigidTransform;
/// use glam::Vec3;
///
/// let t = RigidTransform::from_translation(Vec3::new(10.0, 0.0, 0.0));
/// let result = t.apply_point(Vec3::ZERO);
/// assert!((result.x - 10.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Rotation component (unit quaternion).
    #[serde(with = "quat_serde")]
    pub rotation: Quat,

    /// Translation component in meters.
    #[serde(with = "vec3_serde")]
    pub translation: Vec3,
}

mod quat_serde {
    use glam::Quat;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct QuatData {
        x: f32,
        y: f32,
        z: f32,
        w: f32,
    }

    pub fn serialize<S: Serializer>(q: &Quat, s: S) -> std::result::Result<S::Ok, S::Error> {
        QuatData {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Quat, D::Error> {
        let data = QuatData::deserialize(d)?;
        Ok(Quat::from_xyzw(data.x, data.y, data.z, data.w))
    }
}

mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec3, s: S) -> std::result::Result<S::Ok, S::Error> {
        Vec3Data {
            x: v.x,
            y: v.y,
            z: v.z,
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec3, D::Error> {
        let data = Vec3Data::deserialize(d)?;
        Ok(Vec3::new(data.x, data.y, data.z))
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// Creates an identity transform (no rotation or translation).
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
        }
    }

    /// Creates a transform from rotation and translation.
    #[must_use]
    pub const fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Creates a transform with only translation.
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation,
        }
    }

    /// Creates a transform with only rotation.
    #[must_use]
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            translation: Vec3::ZERO,
        }
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn apply_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    /// Returns the inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            rotation: inv_rotation,
            translation: inv_rotation * (-self.translation),
        }
    }

    /// Composes this transform with another (self ∘ other).
    ///
    /// The result applies `other` first, then `self`. This is the
    /// composition the recovery path uses:
    /// `recovery_to_target.compose(&source_to_recovery)`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// Interpolates between two transforms.
    ///
    /// Translation is interpolated linearly; rotation uses shortest-arc
    /// spherical linear interpolation. `t = 0` yields `self`, `t = 1`
    /// yields `other`.
    #[must_use]
    pub fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            rotation: self.rotation.slerp(other.rotation, t),
            translation: self.translation.lerp(other.translation, t),
        }
    }

    /// Checks that all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.translation.is_finite()
    }
}

/// A rigid transform tagged with the instant it was resolved for.
///
/// Transient: created per resolution call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    /// The resolved sensor pose in the target frame.
    pub transform: RigidTransform,
    /// The instant the pose represents.
    pub time: Timestamp,
}

impl PoseSample {
    /// Creates a pose sample.
    #[must_use]
    pub const fn new(transform: RigidTransform, time: Timestamp) -> Self {
        Self { transform, time }
    }
}
