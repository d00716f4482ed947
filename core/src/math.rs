//! Math type aliases and helper functions.
//!
//! All rendering math is `f32` and backed by `nalgebra`. Matrices follow the
//! OpenGL clip-space convention (depth range [-1, 1]).

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Build a right-handed perspective projection with depth range [-1, 1].
pub fn perspective_gl(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    let f = 1.0 / (yfov / 2.0).tan();
    let nf = 1.0 / (znear - zfar);
    #[rustfmt::skip]
    let result = Mat4::new(
        f / aspect, 0.0, 0.0,                 0.0,
        0.0,        f,   0.0,                 0.0,
        0.0,        0.0, (zfar + znear) * nf, 2.0 * zfar * znear * nf,
        0.0,        0.0, -1.0,                0.0,
    );
    result
}

/// Translation matrix.
pub fn translation(offset: &Vec3) -> Mat4 {
    Mat4::new_translation(offset)
}

/// Rotation about the Y axis.
pub fn rotation_y(angle: f32) -> Mat4 {
    Mat4::from_axis_angle(&Vec3::y_axis(), angle)
}

/// Non-uniform scale matrix.
pub fn scaling(scale: &Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(scale)
}

/// Inverse-transpose of a model matrix, used to transform normals.
///
/// Falls back to the identity for singular matrices.
pub fn normal_matrix(model: &Mat4) -> Mat4 {
    model
        .try_inverse()
        .map(|inv| inv.transpose())
        .unwrap_or_else(Mat4::identity)
}

/// Column-major `[f32; 16]` view of a matrix, as uploaded to the GPU.
pub fn mat4_to_cols(m: &Mat4) -> [f32; 16] {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_matrix_uniform_scale_is_scaled_identity() {
        let m = scaling(&Vec3::new(2.0, 2.0, 2.0));
        let n = normal_matrix(&m);
        assert!((n[(0, 0)] - 0.5).abs() < 1e-6);
        assert!((n[(1, 1)] - 0.5).abs() < 1e-6);
        assert!((n[(2, 2)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_singular_falls_back_to_identity() {
        let n = normal_matrix(&Mat4::zeros());
        assert_eq!(n, Mat4::identity());
    }

    #[test]
    fn test_mat4_to_cols_is_column_major() {
        let m = translation(&Vec3::new(1.0, 2.0, 3.0));
        let cols = mat4_to_cols(&m);
        assert_eq!(&cols[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(cols[15], 1.0);
    }

    #[test]
    fn test_perspective_maps_near_plane_to_minus_one() {
        let p = perspective_gl(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 10.0);
        let clip = p * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert!((clip.z / clip.w + 1.0).abs() < 1e-5);
    }
}
