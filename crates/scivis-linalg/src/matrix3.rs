use crate::error::LinalgError;

/// Determinant of the 2x2 matrix `[[a, b], [c, d]]`.
pub fn determinant2x2(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * d - b * c
}

/// Determinant of a 3x3 matrix.
pub fn determinant3x3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * m[1][1] * m[2][2] + m[1][0] * m[2][1] * m[0][2] + m[2][0] * m[0][1] * m[1][2]
        - m[0][0] * m[2][1] * m[1][2]
        - m[1][0] * m[0][1] * m[2][2]
        - m[2][0] * m[1][1] * m[0][2]
}

/// Write the 3x3 identity into `out`.
pub fn identity3x3(out: &mut [[f64; 3]; 3]) {
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = if i == j { 1.0 } else { 0.0 };
        }
    }
}

/// Check whether every entry of `m` is within `eps` of the identity.
pub fn is_identity3x3(m: &[[f64; 3]; 3], eps: f64) -> bool {
    m.iter().enumerate().all(|(i, row)| {
        row.iter()
            .enumerate()
            .all(|(j, v)| (v - if i == j { 1.0 } else { 0.0 }).abs() <= eps)
    })
}

/// Transpose a 3x3 matrix into `out`.
pub fn transpose3x3(m: &[[f64; 3]; 3], out: &mut [[f64; 3]; 3]) {
    for i in 0..3 {
        for j in 0..3 {
            out[j][i] = m[i][j];
        }
    }
}

/// Multiply two 3x3 matrices, `out = a * b`.
///
/// Example:
///
/// ```
/// use scivis_linalg::matrix3::multiply3x3_mat3;
///
/// let a = [[1.0, 2.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let b = [[1.0, 0.0, 0.0], [3.0, 1.0, 0.0], [0.0, 0.0, 2.0]];
/// let mut m = [[0.0; 3]; 3];
/// multiply3x3_mat3(&a, &b, &mut m);
/// assert_eq!(m, [[7.0, 2.0, 0.0], [3.0, 1.0, 0.0], [0.0, 0.0, 2.0]]);
/// ```
pub fn multiply3x3_mat3(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3], out: &mut [[f64; 3]; 3]) {
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
}

/// Multiply a 3x3 matrix by a column vector, `out = m * v`.
pub fn multiply3x3_vect3(m: &[[f64; 3]; 3], v: &[f64; 3], out: &mut [f64; 3]) {
    for (i, o) in out.iter_mut().enumerate() {
        *o = m[i][0] * v[0] + m[i][1] * v[1] + m[i][2] * v[2];
    }
}

/// Invert a 3x3 matrix through its adjugate.
///
/// No singularity guard is applied: a singular input produces infinite or NaN
/// entries in `out`.
pub fn invert3x3(m: &[[f64; 3]; 3], out: &mut [[f64; 3]; 3]) {
    let [a1, b1, c1] = m[0];
    let [a2, b2, c2] = m[1];
    let [a3, b3, c3] = m[2];

    let d1 = b2 * c3 - b3 * c2;
    let d2 = b3 * c1 - b1 * c3;
    let d3 = b1 * c2 - b2 * c1;

    let e1 = a3 * c2 - a2 * c3;
    let e2 = a1 * c3 - a3 * c1;
    let e3 = a2 * c1 - a1 * c2;

    let f1 = a2 * b3 - a3 * b2;
    let f2 = a3 * b1 - a1 * b3;
    let f3 = a1 * b2 - a2 * b1;

    let det = a1 * d1 + b1 * e1 + c1 * f1;

    *out = [
        [d1 / det, d2 / det, d3 / det],
        [e1 / det, e2 / det, e3 / det],
        [f1 / det, f2 / det, f3 / det],
    ];
}

/// Solve `A x = y` for a 3x3 system using the adjugate.
///
/// Returns [`LinalgError::SingularMatrix`] when the determinant is exactly zero.
pub fn linear_solve3x3(
    a: &[[f64; 3]; 3],
    y: &[f64; 3],
    x: &mut [f64; 3],
) -> Result<(), LinalgError> {
    let [a1, b1, c1] = a[0];
    let [a2, b2, c2] = a[1];
    let [a3, b3, c3] = a[2];

    // cofactors
    let d1 = determinant2x2(b2, b3, c2, c3);
    let d2 = -determinant2x2(a2, a3, c2, c3);
    let d3 = determinant2x2(a2, a3, b2, b3);
    let e1 = -determinant2x2(b1, b3, c1, c3);
    let e2 = determinant2x2(a1, a3, c1, c3);
    let e3 = -determinant2x2(a1, a3, b1, b3);
    let f1 = determinant2x2(b1, b2, c1, c2);
    let f2 = -determinant2x2(a1, a2, c1, c2);
    let f3 = determinant2x2(a1, a2, b1, b2);

    let det = a1 * d1 + b1 * d2 + c1 * d3;
    if det == 0.0 {
        return Err(LinalgError::SingularMatrix);
    }

    let v1 = d1 * y[0] + e1 * y[1] + f1 * y[2];
    let v2 = d2 * y[0] + e2 * y[1] + f2 * y[2];
    let v3 = d3 * y[0] + e3 * y[1] + f3 * y[2];

    x[0] = v1 / det;
    x[1] = v2 / det;
    x[2] = v3 / det;
    Ok(())
}

/// LU-factor a 3x3 matrix in place with implicit row scaling and partial pivoting.
///
/// The row interchanges are recorded in `index`, to be replayed by [`lu_solve3x3`].
/// A singular matrix is not detected and leads to non-finite factors.
pub fn lu_factor3x3(a: &mut [[f64; 3]; 3], index: &mut [usize; 3]) {
    let mut scale = [0.0; 3];
    for (s, row) in scale.iter_mut().zip(a.iter()) {
        let largest = row.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        *s = 1.0 / largest;
    }

    // first column
    let mut largest = scale[0] * a[0][0].abs();
    let mut max_i = 0;
    let tmp = scale[1] * a[1][0].abs();
    if tmp >= largest {
        largest = tmp;
        max_i = 1;
    }
    if scale[2] * a[2][0].abs() >= largest {
        max_i = 2;
    }
    if max_i != 0 {
        a.swap(max_i, 0);
        scale[max_i] = scale[0];
    }
    index[0] = max_i;

    a[1][0] /= a[0][0];
    a[2][0] /= a[0][0];

    // second column
    a[1][1] -= a[1][0] * a[0][1];
    a[2][1] -= a[2][0] * a[0][1];
    let largest = scale[1] * a[1][1].abs();
    let mut max_i = 1;
    if scale[2] * a[2][1].abs() >= largest {
        max_i = 2;
        a.swap(1, 2);
        scale[2] = scale[1];
    }
    index[1] = max_i;
    a[2][1] /= a[1][1];

    // third column
    a[1][2] -= a[1][0] * a[0][2];
    a[2][2] -= a[2][0] * a[0][2] + a[2][1] * a[1][2];
    index[2] = 2;
}

/// Solve `A x = b` in place given the factors computed by [`lu_factor3x3`].
///
/// On entry `x` holds the right-hand side, on exit the solution.
pub fn lu_solve3x3(a: &[[f64; 3]; 3], index: &[usize; 3], x: &mut [f64; 3]) {
    // forward substitution
    let sum = x[index[0]];
    x[index[0]] = x[0];
    x[0] = sum;

    let sum = x[index[1]];
    x[index[1]] = x[1];
    x[1] = sum - a[1][0] * x[0];

    let sum = x[index[2]];
    x[index[2]] = x[2];
    x[2] = sum - a[2][0] * x[0] - a[2][1] * x[1];

    // back substitution
    x[2] /= a[2][2];
    x[1] = (x[1] - a[1][2] * x[2]) / a[1][1];
    x[0] = (x[0] - a[0][1] * x[1] - a[0][2] * x[2]) / a[0][0];
}
