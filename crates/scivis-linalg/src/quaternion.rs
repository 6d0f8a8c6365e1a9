//! Unit quaternions stored as `[w, x, y, z]`.

use crate::error::LinalgError;
use crate::jacobi::jacobi_n;

/// Convert a quaternion into a 3x3 rotation matrix.
///
/// The quaternion does not need to be normalized.
pub fn quaternion_to_matrix3x3(quat: &[f64; 4], a: &mut [[f64; 3]; 3]) {
    let [w, x, y, z] = *quat;

    let ww = w * w;
    let wx = w * x;
    let wy = w * y;
    let wz = w * z;

    let xx = x * x;
    let yy = y * y;
    let zz = z * z;

    let xy = x * y;
    let xz = x * z;
    let yz = y * z;

    let rr = xx + yy + zz;
    // normalization factor for non-unit input
    let mut f = 1.0 / (ww + rr);
    let s = (ww - rr) * f;
    f *= 2.0;

    a[0][0] = xx * f + s;
    a[1][0] = (xy + wz) * f;
    a[2][0] = (xz - wy) * f;

    a[0][1] = (xy - wz) * f;
    a[1][1] = yy * f + s;
    a[2][1] = (yz + wx) * f;

    a[0][2] = (xz + wy) * f;
    a[1][2] = (yz - wx) * f;
    a[2][2] = zz * f + s;
}

/// Extract the quaternion of the rotation closest to `a`.
///
/// The result is the dominant eigenvector of the symmetric 4x4 matrix built from `a`
/// (Horn's method), so any near-orthonormal input gives a well-defined rotation.
/// `q` and `-q` describe the same rotation; the sign follows the eigenvector
/// convention of [`jacobi_n`].
pub fn matrix3x3_to_quaternion(a: &[[f64; 3]; 3], quat: &mut [f64; 4]) -> Result<(), LinalgError> {
    let mut n = [0.0; 16];

    // on-diagonal elements
    n[0] = a[0][0] + a[1][1] + a[2][2];
    n[5] = a[0][0] - a[1][1] - a[2][2];
    n[10] = -a[0][0] + a[1][1] - a[2][2];
    n[15] = -a[0][0] - a[1][1] + a[2][2];

    // off-diagonal elements
    n[1] = a[2][1] - a[1][2];
    n[2] = a[0][2] - a[2][0];
    n[3] = a[1][0] - a[0][1];
    n[6] = a[1][0] + a[0][1];
    n[7] = a[0][2] + a[2][0];
    n[11] = a[2][1] + a[1][2];
    n[4] = n[1];
    n[8] = n[2];
    n[12] = n[3];
    n[9] = n[6];
    n[13] = n[7];
    n[14] = n[11];

    let mut eigenvalues = [0.0; 4];
    let mut eigenvectors = [0.0; 16];
    jacobi_n(&mut n, 4, &mut eigenvalues, &mut eigenvectors)?;

    // the eigenvector of the largest eigenvalue
    for (i, q) in quat.iter_mut().enumerate() {
        *q = eigenvectors[i * 4];
    }
    Ok(())
}

/// Hamilton product `q = q1 * q2`.
pub fn multiply_quaternion(q1: &[f64; 4], q2: &[f64; 4], q: &mut [f64; 4]) {
    let ww = q1[0] * q2[0];
    let wx = q1[0] * q2[1];
    let wy = q1[0] * q2[2];
    let wz = q1[0] * q2[3];

    let xw = q1[1] * q2[0];
    let xx = q1[1] * q2[1];
    let xy = q1[1] * q2[2];
    let xz = q1[1] * q2[3];

    let yw = q1[2] * q2[0];
    let yx = q1[2] * q2[1];
    let yy = q1[2] * q2[2];
    let yz = q1[2] * q2[3];

    let zw = q1[3] * q2[0];
    let zx = q1[3] * q2[1];
    let zy = q1[3] * q2[2];
    let zz = q1[3] * q2[3];

    q[0] = ww - xx - yy - zz;
    q[1] = wx + xw + yz - zy;
    q[2] = wy - xz + yw + zx;
    q[3] = wz + xy - yx + zw;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quaternion_matrix_round_trip() -> Result<(), LinalgError> {
        // 90 degrees about z
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let q = [h, 0.0, 0.0, h];
        let mut m = [[0.0; 3]; 3];
        quaternion_to_matrix3x3(&q, &mut m);

        let expected = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(m[i][j], expected[i][j], epsilon = 1e-12);
            }
        }

        let mut back = [0.0; 4];
        matrix3x3_to_quaternion(&m, &mut back)?;
        let sign = if back[0] * q[0] < 0.0 { -1.0 } else { 1.0 };
        for i in 0..4 {
            assert_relative_eq!(sign * back[i], q[i], epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_identity_quaternion() -> Result<(), LinalgError> {
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let mut q = [0.0; 4];
        matrix3x3_to_quaternion(&identity, &mut q)?;
        assert_relative_eq!(q[0].abs(), 1.0, epsilon = 1e-12);
        for v in &q[1..] {
            assert_relative_eq!(*v, 0.0, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_multiply_quaternion() {
        // i * j = k
        let mut q = [0.0; 4];
        multiply_quaternion(&[0.0, 1.0, 0.0, 0.0], &[0.0, 0.0, 1.0, 0.0], &mut q);
        assert_eq!(q, [0.0, 0.0, 0.0, 1.0]);
    }
}
