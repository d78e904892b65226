//! Mathematical primitives for 3D pose arithmetic.
//!
//! Angle normalization plus hand-rolled roll/pitch/yaw rotation matrices.
//! Rotations use the ZYX (yaw-pitch-roll) convention throughout.

use std::f32::consts::PI;

/// A 3x3 rotation matrix, row-major.
pub type Mat3 = [[f32; 3]; 3];

/// Normalize angle to [-π, π].
///
/// # Example
/// ```
/// use garuda_loc::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Shortest angular difference from angle `a` to angle `b`.
///
/// Returns the signed angle you need to add to `a` to reach `b`,
/// taking the shortest path around the circle.
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}

/// Build a rotation matrix from roll, pitch, yaw (ZYX convention).
///
/// `R = Rz(yaw) · Ry(pitch) · Rx(roll)`
pub fn rotation_from_rpy(roll: f32, pitch: f32, yaw: f32) -> Mat3 {
    let (sr, cr) = roll.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();

    [
        [cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr],
        [sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr],
        [-sp, cp * sr, cp * cr],
    ]
}

/// Extract roll, pitch, yaw from a rotation matrix (ZYX convention).
///
/// Near the pitch singularity (|pitch| = π/2) roll is folded into yaw.
pub fn rpy_from_rotation(m: &Mat3) -> (f32, f32, f32) {
    let sp = -m[2][0];
    if sp.abs() > 0.9999 {
        // Gimbal lock: only roll+yaw is observable, report it as yaw.
        let pitch = if sp > 0.0 { PI / 2.0 } else { -PI / 2.0 };
        let yaw = (-m[0][1]).atan2(m[1][1]);
        (0.0, pitch, yaw)
    } else {
        let pitch = sp.asin();
        let roll = m[2][1].atan2(m[2][2]);
        let yaw = m[1][0].atan2(m[0][0]);
        (roll, pitch, yaw)
    }
}

/// Multiply two rotation matrices: `a · b`.
pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0f32; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Transpose of a rotation matrix (its inverse, for orthonormal matrices).
pub fn mat_transpose(m: &Mat3) -> Mat3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Apply a rotation matrix to a vector.
#[inline]
pub fn mat_apply(m: &Mat3, v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_zero() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn test_normalize_angle_wrap() {
        assert_relative_eq!(normalize_angle(2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(-2.5 * PI), -0.5 * PI, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_diff_short_path() {
        let diff = angle_diff(PI - 0.1, -PI + 0.1);
        assert_relative_eq!(diff, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_identity() {
        let m = rotation_from_rpy(0.0, 0.0, 0.0);
        assert_relative_eq!(m[0][0], 1.0);
        assert_relative_eq!(m[1][1], 1.0);
        assert_relative_eq!(m[2][2], 1.0);
        assert_relative_eq!(m[0][1], 0.0);
    }

    #[test]
    fn test_rotation_yaw_only() {
        let m = rotation_from_rpy(0.0, 0.0, PI / 2.0);
        let v = mat_apply(&m, [1.0, 0.0, 0.0]);
        assert_relative_eq!(v[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(v[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(v[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rpy_roundtrip() {
        let cases = [
            (0.1, -0.2, 0.3),
            (0.0, 0.0, 2.5),
            (-1.0, 0.4, -2.0),
            (0.5, -1.2, 0.0),
        ];
        for (roll, pitch, yaw) in cases {
            let m = rotation_from_rpy(roll, pitch, yaw);
            let (r, p, y) = rpy_from_rotation(&m);
            assert_relative_eq!(r, roll, epsilon = 1e-5);
            assert_relative_eq!(p, pitch, epsilon = 1e-5);
            assert_relative_eq!(y, yaw, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_transpose_is_inverse() {
        let m = rotation_from_rpy(0.3, -0.5, 1.1);
        let mt = mat_transpose(&m);
        let id = mat_mul(&m, &mt);
        for (i, row) in id.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(cell, expected, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_mat_mul_composes_rotations() {
        let a = rotation_from_rpy(0.0, 0.0, 0.5);
        let b = rotation_from_rpy(0.0, 0.0, 0.25);
        let c = mat_mul(&a, &b);
        let (_, _, yaw) = rpy_from_rotation(&c);
        assert_relative_eq!(yaw, 0.75, epsilon = 1e-5);
    }
}
