/// 4x4 matrix math in the legacy GL layout.
///
/// Matrices are flat `[f32; 16]` arrays in column-major order, the same
/// layout `glLoadMatrixf` takes and the uniform buffer expects, so they can
/// be uploaded without conversion.
pub type Mat4 = [f32; 16];

/// Create an identity 4x4 matrix.
pub fn identity() -> Mat4 {
    [
        1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ]
}

/// `a * b` with column vectors, i.e. `b` is applied first.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0f32; 16];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0f32;
            for k in 0..4 {
                sum += a[k * 4 + row] * b[col * 4 + k];
            }
            out[col * 4 + row] = sum;
        }
    }
    out
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    let mut m = identity();
    m[12] = x;
    m[13] = y;
    m[14] = z;
    m
}

pub fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
    let mut m = identity();
    m[0] = x;
    m[5] = y;
    m[10] = z;
    m
}

/// Rotation of `angle_deg` degrees about `(x, y, z)`.
///
/// The axis is normalized unless it is (nearly) zero length, in which case
/// it is used as given.
pub fn rotation(angle_deg: f32, x: f32, y: f32, z: f32) -> Mat4 {
    let rad = angle_deg.to_radians();
    let (s, c) = rad.sin_cos();
    let len = (x * x + y * y + z * z).sqrt();
    let (x, y, z) = if len > 1e-6 {
        (x / len, y / len, z / len)
    } else {
        (x, y, z)
    };
    let t = 1.0 - c;
    [
        // Column 0
        x * x * t + c,
        y * x * t + z * s,
        z * x * t - y * s,
        0.0,
        // Column 1
        x * y * t - z * s,
        y * y * t + c,
        z * y * t + x * s,
        0.0,
        // Column 2
        x * z * t + y * s,
        y * z * t - x * s,
        z * z * t + c,
        0.0,
        // Column 3
        0.0,
        0.0,
        0.0,
        1.0,
    ]
}

/// `glOrtho` matrix.
pub fn ortho(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Mat4 {
    let mut m = identity();
    m[0] = 2.0 / (r - l);
    m[5] = 2.0 / (t - b);
    m[10] = -2.0 / (f - n);
    m[12] = -(r + l) / (r - l);
    m[13] = -(t + b) / (t - b);
    m[14] = -(f + n) / (f - n);
    m
}

/// `glFrustum` matrix.
pub fn frustum(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Mat4 {
    let mut m = [0.0f32; 16];
    m[0] = 2.0 * n / (r - l);
    m[5] = 2.0 * n / (t - b);
    m[8] = (r + l) / (r - l);
    m[9] = (t + b) / (t - b);
    m[10] = -(f + n) / (f - n);
    m[11] = -1.0;
    m[14] = -2.0 * f * n / (f - n);
    m
}

/// Upper-left 3x3 of the model-view, one column per entry.
///
/// Only correct under uniform scale; this is not an inverse-transpose.
pub fn normal_matrix(mv: &Mat4) -> [[f32; 3]; 3] {
    [
        [mv[0], mv[1], mv[2]],
        [mv[4], mv[5], mv[6]],
        [mv[8], mv[9], mv[10]],
    ]
}

/// Transform a homogeneous point.
pub fn transform_point(m: &Mat4, p: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[row] * p[0] + m[4 + row] * p[1] + m[8 + row] * p[2] + m[12 + row] * p[3];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_eq(a: &Mat4, b: &Mat4) {
        for i in 0..16 {
            assert!((a[i] - b[i]).abs() < 1e-5, "element {i}: {} != {}", a[i], b[i]);
        }
    }

    #[test]
    fn multiply_by_identity_is_noop() {
        let t = translation(1.0, 2.0, 3.0);
        assert_mat_eq(&multiply(&t, &identity()), &t);
        assert_mat_eq(&multiply(&identity(), &t), &t);
    }

    #[test]
    fn rotation_quarter_turn_about_z() {
        let r = rotation(90.0, 0.0, 0.0, 1.0);
        let p = transform_point(&r, [1.0, 0.0, 0.0, 1.0]);
        assert!((p[0]).abs() < 1e-6);
        assert!((p[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_axis_is_normalized() {
        let a = rotation(30.0, 0.0, 0.0, 5.0);
        let b = rotation(30.0, 0.0, 0.0, 1.0);
        assert_mat_eq(&a, &b);
    }

    #[test]
    fn zero_axis_rotation_does_not_produce_nan() {
        let r = rotation(45.0, 0.0, 0.0, 0.0);
        assert!(r.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn frustum_maps_near_plane_to_minus_one() {
        let m = frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0);
        let clip = transform_point(&m, [0.0, 0.0, -1.0, 1.0]);
        assert!((clip[2] / clip[3] + 1.0).abs() < 1e-5);
        let clip = transform_point(&m, [0.0, 0.0, -10.0, 1.0]);
        assert!((clip[2] / clip[3] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn normal_matrix_takes_upper_left_block() {
        let m = scaling(2.0, 2.0, 2.0);
        let n = normal_matrix(&m);
        assert_eq!(n[0], [2.0, 0.0, 0.0]);
        assert_eq!(n[2], [0.0, 0.0, 2.0]);
    }
}
