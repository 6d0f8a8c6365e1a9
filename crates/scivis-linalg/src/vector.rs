use crate::error::LinalgError;

/// Add two 3-vectors, `out = a + b`.
pub fn add(a: &[f64; 3], b: &[f64; 3], out: &mut [f64; 3]) {
    out[0] = a[0] + b[0];
    out[1] = a[1] + b[1];
    out[2] = a[2] + b[2];
}

/// Subtract two 3-vectors, `out = a - b`.
pub fn subtract(a: &[f64; 3], b: &[f64; 3], out: &mut [f64; 3]) {
    out[0] = a[0] - b[0];
    out[1] = a[1] - b[1];
    out[2] = a[2] - b[2];
}

/// Scale a 3-vector in place.
pub fn multiply_scalar(vec: &mut [f64; 3], scalar: f64) {
    vec.iter_mut().for_each(|v| *v *= scalar);
}

/// Scale a 2-vector in place.
pub fn multiply_scalar2d(vec: &mut [f64; 2], scalar: f64) {
    vec.iter_mut().for_each(|v| *v *= scalar);
}

/// Compute `out = a + b * scalar` for 3-vectors.
pub fn multiply_accumulate(a: &[f64; 3], b: &[f64; 3], scalar: f64, out: &mut [f64; 3]) {
    for i in 0..3 {
        out[i] = a[i] + b[i] * scalar;
    }
}

/// Compute `out = a + b * scalar` for 2-vectors.
pub fn multiply_accumulate2d(a: &[f64; 2], b: &[f64; 2], scalar: f64, out: &mut [f64; 2]) {
    out[0] = a[0] + b[0] * scalar;
    out[1] = a[1] + b[1] * scalar;
}

/// Dot product of two 3-vectors.
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Dot product of two 2-vectors.
pub fn dot2d(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

/// Cross product of two 3-vectors, `out = a x b`.
///
/// Every input component is read before `out` is written, so callers wishing to
/// overwrite an input can pass a copy of it.
pub fn cross(a: &[f64; 3], b: &[f64; 3], out: &mut [f64; 3]) {
    let zx = a[1] * b[2] - a[2] * b[1];
    let zy = a[2] * b[0] - a[0] * b[2];
    let zz = a[0] * b[1] - a[1] * b[0];
    out[0] = zx;
    out[1] = zy;
    out[2] = zz;
}

/// Euclidean norm of a vector of any dimension.
pub fn norm(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Euclidean norm of a 2-vector.
pub fn norm2d(x: &[f64; 2]) -> f64 {
    (x[0] * x[0] + x[1] * x[1]).sqrt()
}

/// Normalize a 3-vector in place and return its original norm.
///
/// A zero vector is left untouched and `0.0` is returned.
///
/// Example:
///
/// ```
/// use scivis_linalg::vector::normalize;
///
/// let mut v = [3.0, 0.0, 4.0];
/// assert_eq!(normalize(&mut v), 5.0);
/// assert_eq!(v, [0.6, 0.0, 0.8]);
/// ```
pub fn normalize(x: &mut [f64; 3]) -> f64 {
    let den = norm(x);
    if den != 0.0 {
        x.iter_mut().for_each(|v| *v /= den);
    }
    den
}

/// Normalize a 2-vector in place and return its original norm.
///
/// A zero vector is left untouched and `0.0` is returned.
pub fn normalize2d(x: &mut [f64; 2]) -> f64 {
    let den = norm2d(x);
    if den != 0.0 {
        x[0] /= den;
        x[1] /= den;
    }
    den
}

/// Squared distance between two points.
pub fn distance2_between_points(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// Unsigned angle in radians between two 3-vectors, in `[0, pi]`.
///
/// Evaluated as `atan2(|a x b|, a . b)`, which stays exact for parallel and
/// anti-parallel vectors where the arc cosine form loses precision.
pub fn angle_between_vectors(v1: &[f64; 3], v2: &[f64; 3]) -> f64 {
    let mut c = [0.0; 3];
    cross(v1, v2, &mut c);
    norm(&c).atan2(dot(v1, v2))
}

/// Signed angle in radians between two 3-vectors around the axis `normal`.
///
/// Both vectors are first projected onto the plane orthogonal to `normal`.
/// The angle is negative when the projected `v1 x v2` points away from
/// `normal`, and `0.0` when `normal` or either projection vanishes.
pub fn signed_angle_between_vectors(v1: &[f64; 3], v2: &[f64; 3], normal: &[f64; 3]) -> f64 {
    let mut axis = *normal;
    if normalize(&mut axis) == 0.0 {
        return 0.0;
    }

    let onto_plane = |v: &[f64; 3]| {
        let d = dot(v, &axis);
        [v[0] - d * axis[0], v[1] - d * axis[1], v[2] - d * axis[2]]
    };
    let p1 = onto_plane(v1);
    let p2 = onto_plane(v2);
    if norm(&p1) == 0.0 || norm(&p2) == 0.0 {
        return 0.0;
    }

    let mut c = [0.0; 3];
    cross(&p1, &p2, &mut c);
    let angle = norm(&c).atan2(dot(&p1, &p2));
    if dot(&c, &axis) >= 0.0 {
        angle
    } else {
        -angle
    }
}

/// Outer product of two 3-vectors, `out[i][j] = a[i] * b[j]`.
pub fn outer(a: &[f64; 3], b: &[f64; 3], out: &mut [[f64; 3]; 3]) {
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = a[i] * b[j];
        }
    }
}

/// Outer product of two 2-vectors.
pub fn outer2d(a: &[f64; 2], b: &[f64; 2], out: &mut [[f64; 2]; 2]) {
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = a[i] * b[j];
        }
    }
}

/// Project `a` onto `b`, writing the projection into `projection`.
///
/// When `b` has zero length the projection is zero-filled and an error is returned.
pub fn project_vector(
    a: &[f64; 3],
    b: &[f64; 3],
    projection: &mut [f64; 3],
) -> Result<(), LinalgError> {
    let b_squared = dot(b, b);
    if b_squared == 0.0 {
        *projection = [0.0; 3];
        return Err(LinalgError::ZeroVector);
    }
    let scale = dot(a, b) / b_squared;
    *projection = *b;
    multiply_scalar(projection, scale);
    Ok(())
}

/// Project the 2-vector `a` onto `b`.
///
/// When `b` has zero length the projection is zero-filled and an error is returned.
pub fn project_vector2d(
    a: &[f64; 2],
    b: &[f64; 2],
    projection: &mut [f64; 2],
) -> Result<(), LinalgError> {
    let b_squared = dot2d(b, b);
    if b_squared == 0.0 {
        *projection = [0.0; 2];
        return Err(LinalgError::ZeroVector);
    }
    let scale = dot2d(a, b) / b_squared;
    *projection = *b;
    multiply_scalar2d(projection, scale);
    Ok(())
}

/// Compute two unit vectors `y` and `z` such that `x`, `y`, `z` form a right-handed
/// orthogonal frame, with `y` and `z` rotated by `theta` around `x`.
///
/// PRECONDITION: `x` is not the zero vector.
pub fn perpendiculars(x: &[f64; 3], y: &mut [f64; 3], z: &mut [f64; 3], theta: f64) {
    let x2 = x[0] * x[0];
    let y2 = x[1] * x[1];
    let z2 = x[2] * x[2];
    let r = (x2 + y2 + z2).sqrt();

    // permute the axes so the largest component is never a divisor
    let (dx, dy, dz) = if x2 > y2 && x2 > z2 {
        (0, 1, 2)
    } else if y2 > z2 {
        (1, 2, 0)
    } else {
        (2, 0, 1)
    };

    let a = x[dx] / r;
    let b = x[dy] / r;
    let c = x[dz] / r;
    let tmp = (a * a + c * c).sqrt();

    if theta != 0.0 {
        let (sintheta, costheta) = theta.sin_cos();

        y[dx] = (c * costheta - a * b * sintheta) / tmp;
        y[dy] = sintheta * tmp;
        y[dz] = (-(a * costheta) - b * c * sintheta) / tmp;

        z[dx] = (-(c * sintheta) - a * b * costheta) / tmp;
        z[dy] = costheta * tmp;
        z[dz] = (a * sintheta - b * c * costheta) / tmp;
    } else {
        y[dx] = c / tmp;
        y[dy] = 0.0;
        y[dz] = -a / tmp;

        z[dx] = (-a * b) / tmp;
        z[dy] = tmp;
        z[dz] = (-b * c) / tmp;
    }
}

/// Value of the normal distribution `N(mean, variance)` at `position`.
pub fn gaussian_amplitude(mean: f64, variance: f64, position: f64) -> f64 {
    let distance_from_mean = (mean - position).abs();
    (1.0 / (2.0 * std::f64::consts::PI * variance).sqrt())
        * (-(distance_from_mean.powi(2)) / (2.0 * variance)).exp()
}

/// Unnormalized Gaussian weight, `1.0` at the mean.
pub fn gaussian_weight(mean: f64, variance: f64, position: f64) -> f64 {
    let distance_from_mean = (mean - position).abs();
    (-(distance_from_mean.powi(2)) / (2.0 * variance)).exp()
}

/// Circle through three points.
///
/// Writes the circle center into `center` and returns its radius.
/// Collinear points have no finite circle and yield [`LinalgError::CollinearPoints`].
pub fn solve_3_point_circle(
    p1: &[f64; 3],
    p2: &[f64; 3],
    p3: &[f64; 3],
    center: &mut [f64; 3],
) -> Result<f64, LinalgError> {
    let mut v21 = [0.0; 3];
    let mut v32 = [0.0; 3];
    let mut v13 = [0.0; 3];
    let mut v12 = [0.0; 3];
    let mut v23 = [0.0; 3];
    let mut v31 = [0.0; 3];
    subtract(p1, p2, &mut v21);
    subtract(p2, p3, &mut v32);
    subtract(p3, p1, &mut v13);
    subtract(p2, p1, &mut v12);
    subtract(p3, p2, &mut v23);
    subtract(p1, p3, &mut v31);

    let norm12 = norm(&v12);
    let norm23 = norm(&v23);
    let norm13 = norm(&v13);

    let mut cross_v21_v32 = [0.0; 3];
    cross(&v21, &v32, &mut cross_v21_v32);
    let norm_cross = norm(&cross_v21_v32);
    if norm_cross == 0.0 {
        return Err(LinalgError::CollinearPoints);
    }

    let radius = (norm12 * norm23 * norm13) / (2.0 * norm_cross);

    let norm_cross22 = 2.0 * norm_cross * norm_cross;
    let alpha = (norm23 * norm23 * dot(&v21, &v31)) / norm_cross22;
    let beta = (norm13 * norm13 * dot(&v12, &v32)) / norm_cross22;
    let gamma = (norm12 * norm12 * dot(&v13, &v23)) / norm_cross22;

    for i in 0..3 {
        center[i] = alpha * p1[i] + beta * p2[i] + gamma * p3[i];
    }

    Ok(radius)
}
