//! Pose and point types for 3D localization.

use serde::{Deserialize, Serialize};

use crate::core::math::{
    self, mat_apply, mat_mul, mat_transpose, rotation_from_rpy, rpy_from_rotation,
};

/// A 3D point in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
    /// Z coordinate in meters
    pub z: f32,
}

impl Point3D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point3D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point3D) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

impl Default for Point3D {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

/// Vehicle pose in 3D space.
///
/// Position (x, y, z) in meters and orientation as roll/pitch/yaw in
/// radians (ZYX convention), each normalized to [-π, π].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose3D {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Z position in meters
    pub z: f32,
    /// Roll about X in radians
    pub roll: f32,
    /// Pitch about Y in radians
    pub pitch: f32,
    /// Yaw about Z in radians
    pub yaw: f32,
}

impl Pose3D {
    /// Create a new pose with all angles normalized to [-π, π].
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, roll: f32, pitch: f32, yaw: f32) -> Self {
        Self {
            x,
            y,
            z,
            roll: math::normalize_angle(roll),
            pitch: math::normalize_angle(pitch),
            yaw: math::normalize_angle(yaw),
        }
    }

    /// Identity pose at the origin.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// Position component.
    #[inline]
    pub fn position(&self) -> Point3D {
        Point3D::new(self.x, self.y, self.z)
    }

    /// Euclidean norm of the translation component.
    #[inline]
    pub fn translation_norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Compose two poses: `self ∘ other`.
    ///
    /// Applies `other` in the frame defined by `self`.
    pub fn compose(&self, other: &Pose3D) -> Pose3D {
        let r_self = rotation_from_rpy(self.roll, self.pitch, self.yaw);
        let r_other = rotation_from_rpy(other.roll, other.pitch, other.yaw);

        let t = mat_apply(&r_self, [other.x, other.y, other.z]);
        let (roll, pitch, yaw) = rpy_from_rotation(&mat_mul(&r_self, &r_other));

        Pose3D::new(
            self.x + t[0],
            self.y + t[1],
            self.z + t[2],
            roll,
            pitch,
            yaw,
        )
    }

    /// Inverse of this pose: the transform that undoes it.
    pub fn inverse(&self) -> Pose3D {
        let r = rotation_from_rpy(self.roll, self.pitch, self.yaw);
        let rt = mat_transpose(&r);
        let t = mat_apply(&rt, [self.x, self.y, self.z]);
        let (roll, pitch, yaw) = rpy_from_rotation(&rt);
        Pose3D::new(-t[0], -t[1], -t[2], roll, pitch, yaw)
    }

    /// Relative transform from `self` to `other`: `self⁻¹ ∘ other`.
    ///
    /// This is what the motion gate measures between the last localized
    /// pose and the current odometry pose.
    #[inline]
    pub fn relative_to(&self, other: &Pose3D) -> Pose3D {
        self.inverse().compose(other)
    }

    /// Transform a point from this pose's local frame to the parent frame.
    pub fn transform_point(&self, point: &Point3D) -> Point3D {
        let r = rotation_from_rpy(self.roll, self.pitch, self.yaw);
        let v = mat_apply(&r, [point.x, point.y, point.z]);
        Point3D::new(self.x + v[0], self.y + v[1], self.z + v[2])
    }
}

impl Default for Pose3D {
    fn default() -> Self {
        Self::identity()
    }
}
