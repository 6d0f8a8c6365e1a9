use crate::error::LinalgError;
use crate::matrix3::{determinant3x3, identity3x3, multiply3x3_mat3, transpose3x3};
use crate::quaternion::{matrix3x3_to_quaternion, quaternion_to_matrix3x3};
use crate::jacobi::jacobi;
use crate::vector::{cross, normalize};

fn negate(m: &mut [[f64; 3]; 3]) {
    m.iter_mut().flatten().for_each(|v| *v = -*v);
}

fn transpose_in_place(m: &mut [[f64; 3]; 3]) {
    let copy = *m;
    transpose3x3(&copy, m);
}

/// Replace `a` by the nearest orthogonal matrix, written into `out`.
///
/// The rows are first pivoted for accuracy and any reflection is factored out,
/// so the rotation part can go through a quaternion. The reflection and the
/// pivoting are then restored, which makes `out` orthogonal with the same
/// determinant sign as `a`.
pub fn orthogonalize3x3(a: &[[f64; 3]; 3], out: &mut [[f64; 3]; 3]) -> Result<(), LinalgError> {
    let mut b = *a;

    // implicit scaling of each row
    let mut scale = [1.0; 3];
    for (s, row) in scale.iter_mut().zip(b.iter()) {
        let largest = row[0].abs().max(row[1].abs()).max(row[2].abs());
        if largest != 0.0 {
            *s /= largest;
        }
    }

    let mut index = [0, 1, 2];

    // first column
    let x1 = b[0][0].abs() * scale[0];
    let x2 = b[1][0].abs() * scale[1];
    let x3 = b[2][0].abs() * scale[2];
    let mut largest = x1;
    if x2 >= largest {
        largest = x2;
        index[0] = 1;
    }
    if x3 >= largest {
        index[0] = 2;
    }
    if index[0] != 0 {
        b.swap(index[0], 0);
        scale[index[0]] = scale[0];
    }

    // second column
    let y2 = b[1][1].abs() * scale[1];
    let y3 = b[2][1].abs() * scale[2];
    if y3 >= y2 {
        index[1] = 2;
        b.swap(2, 1);
    }

    // a quaternion cannot carry a reflection
    let flip = determinant3x3(&b) < 0.0;
    if flip {
        negate(&mut b);
    }

    let mut quat = [0.0; 4];
    matrix3x3_to_quaternion(&b, &mut quat)?;
    quaternion_to_matrix3x3(&quat, &mut b);

    if flip {
        negate(&mut b);
    }

    // undo the pivoting
    if index[1] != 1 {
        b.swap(index[1], 1);
    }
    if index[0] != 0 {
        b.swap(index[0], 0);
    }

    *out = b;
    Ok(())
}

/// Diagonalize a symmetric 3x3 matrix, `a = v * diag(w) * v^T`.
///
/// The eigenvectors, stored as the columns of `v`, are ordered and signed so that
/// they line up with the x, y and z axes as closely as possible and `v` is a proper
/// rotation. Eigenvalues follow their eigenvectors and are therefore not sorted.
///
/// Repeated eigenvalues are resolved deterministically: a multiple of the identity
/// yields the identity basis, and a pair of equal eigenvalues keeps the distinct
/// eigenvector and completes the frame from the coordinate axis nearest to it.
pub fn diagonalize3x3(
    a: &[[f64; 3]; 3],
    w: &mut [f64; 3],
    v: &mut [[f64; 3]; 3],
) -> Result<(), LinalgError> {
    let mut c = *a;
    jacobi(&mut c, w, v)?;

    if w[0] == w[1] && w[0] == w[2] {
        identity3x3(v);
        return Ok(());
    }

    // work on rows, it makes it easier to sort the eigenvectors
    transpose_in_place(v);

    for i in 0..3 {
        if w[(i + 1) % 3] != w[(i + 2) % 3] {
            continue;
        }

        // largest component of the independent eigenvector
        let mut max_val = v[i][0].abs();
        let mut max_i = 0;
        for j in 1..3 {
            let tmp = v[i][j].abs();
            if max_val < tmp {
                max_val = tmp;
                max_i = j;
            }
        }

        if max_i != i {
            w.swap(max_i, i);
            v.swap(i, max_i);
        }

        if v[max_i][max_i] < 0.0 {
            v[max_i].iter_mut().for_each(|x| *x = -*x);
        }

        // re-orthogonalize the other two eigenvectors
        let j = (max_i + 1) % 3;
        let k = (max_i + 2) % 3;

        v[j] = [0.0; 3];
        v[j][j] = 1.0;
        let mut vk = [0.0; 3];
        cross(&v[max_i], &v[j], &mut vk);
        normalize(&mut vk);
        v[k] = vk;
        let mut vj = [0.0; 3];
        cross(&v[k], &v[max_i], &mut vj);
        v[j] = vj;

        transpose_in_place(v);
        return Ok(());
    }

    // distinct eigenvalues: the vector with the largest x component goes first
    let mut max_val = v[0][0].abs();
    let mut max_i = 0;
    for i in 1..3 {
        let tmp = v[i][0].abs();
        if max_val < tmp {
            max_val = tmp;
            max_i = i;
        }
    }
    if max_i != 0 {
        w.swap(max_i, 0);
        v.swap(max_i, 0);
    }

    // same for the y component
    if v[1][1].abs() < v[2][1].abs() {
        w.swap(2, 1);
        v.swap(2, 1);
    }

    for i in 0..2 {
        if v[i][i] < 0.0 {
            v[i].iter_mut().for_each(|x| *x = -*x);
        }
    }

    // keep a right-handed frame
    if determinant3x3(v) < 0.0 {
        v[2].iter_mut().for_each(|x| *x = -*x);
    }

    transpose_in_place(v);
    Ok(())
}

/// Singular value decomposition of a 3x3 matrix, `a = u * diag(w) * vt`.
///
/// `u` and `vt` are orthogonal and the singular values in `w` are non-negative.
/// A reflection in `a` is carried by `u`, so `vt` is always a proper rotation.
///
/// Example:
///
/// ```
/// use scivis_linalg::svd::singular_value_decomposition3x3;
///
/// let a = [[2.0, 0.0, 0.0], [0.0, -3.0, 0.0], [0.0, 0.0, 1.0]];
/// let mut u = [[0.0; 3]; 3];
/// let mut w = [0.0; 3];
/// let mut vt = [[0.0; 3]; 3];
/// singular_value_decomposition3x3(&a, &mut u, &mut w, &mut vt).unwrap();
/// assert!(w.iter().all(|s| *s >= 0.0));
/// ```
pub fn singular_value_decomposition3x3(
    a: &[[f64; 3]; 3],
    u: &mut [[f64; 3]; 3],
    w: &mut [f64; 3],
    vt: &mut [[f64; 3]; 3],
) -> Result<(), LinalgError> {
    let mut b = *a;

    // factor out a reflection so that b has a positive determinant
    let flip = determinant3x3(&b) < 0.0;
    if flip {
        negate(&mut b);
    }

    // b = q * h with q orthogonal and h = b^T q symmetric
    let mut q = [[0.0; 3]; 3];
    orthogonalize3x3(&b, &mut q)?;
    let mut bt = [[0.0; 3]; 3];
    transpose3x3(&b, &mut bt);
    let mut h = [[0.0; 3]; 3];
    multiply3x3_mat3(&bt, &q, &mut h);

    // h = v * diag(w) * v^T
    let mut v = [[0.0; 3]; 3];
    diagonalize3x3(&h, w, &mut v)?;
    multiply3x3_mat3(&q, &v, u);
    transpose3x3(&v, vt);

    if flip {
        negate(u);
    }

    // rounding can leave a vanishing singular value slightly negative
    for i in 0..3 {
        if w[i] < 0.0 {
            w[i] = -w[i];
            for row in u.iter_mut() {
                row[i] = -row[i];
            }
        }
    }

    Ok(())
}

/// Result of [`svd3`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svd3 {
    u: [[f64; 3]; 3],
    w: [f64; 3],
    vt: [[f64; 3]; 3],
}

impl Svd3 {
    /// Left singular vectors, as columns.
    #[inline]
    pub fn u(&self) -> &[[f64; 3]; 3] {
        &self.u
    }

    /// Singular values.
    #[inline]
    pub fn w(&self) -> &[f64; 3] {
        &self.w
    }

    /// Transposed right singular vectors.
    #[inline]
    pub fn vt(&self) -> &[[f64; 3]; 3] {
        &self.vt
    }
}

/// Convenience wrapper around [`singular_value_decomposition3x3`].
pub fn svd3(a: &[[f64; 3]; 3]) -> Result<Svd3, LinalgError> {
    let mut res = Svd3 {
        u: [[0.0; 3]; 3],
        w: [0.0; 3],
        vt: [[0.0; 3]; 3],
    };
    singular_value_decomposition3x3(a, &mut res.u, &mut res.w, &mut res.vt)?;
    Ok(res)
}
