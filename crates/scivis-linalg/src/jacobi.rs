use crate::error::{check_len, LinalgError};

/// Upper bound on the number of Jacobi sweeps.
pub const MAX_ROTATIONS: usize = 20;

#[inline]
#[allow(clippy::too_many_arguments)]
fn rotate(m: &mut [f64], n: usize, i: usize, j: usize, k: usize, l: usize, s: f64, tau: f64) {
    let g = m[i * n + j];
    let h = m[k * n + l];
    m[i * n + j] = g - s * (h + g * tau);
    m[k * n + l] = h + s * (g - h * tau);
}

/// Eigen-decomposition of the real symmetric `n x n` matrix `a` by cyclic Jacobi
/// rotations.
///
/// # Arguments
///
/// * `a` - The symmetric matrix, row-major. Its upper triangle is destroyed.
/// * `n` - The matrix size.
/// * `w` - Receives the `n` eigenvalues, sorted in decreasing order.
/// * `v` - Receives the eigenvectors as the columns of an `n x n` row-major matrix,
///   permuted consistently with `w`.
///
/// Each eigenvector is normalized and its sign chosen so that at least half of its
/// components are non-negative.
///
/// Example:
///
/// ```
/// use scivis_linalg::jacobi::jacobi_n;
///
/// let mut a = [2.0, 1.0, 1.0, 2.0];
/// let mut w = [0.0; 2];
/// let mut v = [0.0; 4];
/// jacobi_n(&mut a, 2, &mut w, &mut v).unwrap();
/// assert!((w[0] - 3.0).abs() < 1e-12 && (w[1] - 1.0).abs() < 1e-12);
/// ```
pub fn jacobi_n(a: &mut [f64], n: usize, w: &mut [f64], v: &mut [f64]) -> Result<(), LinalgError> {
    check_len("a", a.len(), n * n)?;
    check_len("w", w.len(), n)?;
    check_len("v", v.len(), n * n)?;

    for ip in 0..n {
        for iq in 0..n {
            v[ip * n + iq] = if ip == iq { 1.0 } else { 0.0 };
        }
    }

    let mut b: Vec<f64> = (0..n).map(|ip| a[ip * n + ip]).collect();
    let mut z = vec![0.0; n];
    w.copy_from_slice(&b);

    let mut converged = false;
    for sweep in 0..MAX_ROTATIONS {
        let mut sm = 0.0;
        for ip in 0..n.saturating_sub(1) {
            for iq in (ip + 1)..n {
                sm += a[ip * n + iq].abs();
            }
        }
        if sm == 0.0 {
            converged = true;
            break;
        }

        let tresh = if sweep < 3 {
            0.2 * sm / (n * n) as f64
        } else {
            0.0
        };

        for ip in 0..n.saturating_sub(1) {
            for iq in (ip + 1)..n {
                let apq = a[ip * n + iq];
                let g = 100.0 * apq.abs();

                // after four sweeps, skip rotations of negligible elements
                if sweep > 3 && w[ip].abs() + g == w[ip].abs() && w[iq].abs() + g == w[iq].abs()
                {
                    a[ip * n + iq] = 0.0;
                } else if apq.abs() > tresh {
                    let h = w[iq] - w[ip];
                    let t = if h.abs() + g == h.abs() {
                        apq / h
                    } else {
                        let theta = 0.5 * h / apq;
                        let t = 1.0 / (theta.abs() + (1.0 + theta * theta).sqrt());
                        if theta < 0.0 {
                            -t
                        } else {
                            t
                        }
                    };
                    let c = 1.0 / (1.0 + t * t).sqrt();
                    let s = t * c;
                    let tau = s / (1.0 + c);
                    let h = t * apq;
                    z[ip] -= h;
                    z[iq] += h;
                    w[ip] -= h;
                    w[iq] += h;
                    a[ip * n + iq] = 0.0;

                    for j in 0..ip {
                        rotate(a, n, j, ip, j, iq, s, tau);
                    }
                    for j in (ip + 1)..iq {
                        rotate(a, n, ip, j, j, iq, s, tau);
                    }
                    for j in (iq + 1)..n {
                        rotate(a, n, ip, j, iq, j, s, tau);
                    }
                    for j in 0..n {
                        rotate(v, n, j, ip, j, iq, s, tau);
                    }
                }
            }
        }

        for ip in 0..n {
            b[ip] += z[ip];
            w[ip] = b[ip];
            z[ip] = 0.0;
        }
    }

    if !converged {
        log::warn!("Jacobi: error extracting eigenfunctions after {MAX_ROTATIONS} sweeps");
        return Err(LinalgError::NoConvergence {
            sweeps: MAX_ROTATIONS,
        });
    }

    // selection sort by decreasing eigenvalue, carrying the columns along
    for j in 0..n.saturating_sub(1) {
        let mut k = j;
        let mut tmp = w[k];
        for (i, wi) in w.iter().enumerate().skip(j + 1) {
            if *wi >= tmp {
                k = i;
                tmp = *wi;
            }
        }
        if k != j {
            w[k] = w[j];
            w[j] = tmp;
            for i in 0..n {
                v.swap(i * n + j, i * n + k);
            }
        }
    }

    // pick the "most positive" of the two opposite eigenvectors
    let ceil_half_n = n.div_ceil(2);
    for j in 0..n {
        let num_pos = (0..n).filter(|i| v[i * n + j] >= 0.0).count();
        if num_pos < ceil_half_n {
            for i in 0..n {
                v[i * n + j] *= -1.0;
            }
        }
    }

    Ok(())
}

/// Eigen-decomposition of a symmetric 3x3 matrix; see [`jacobi_n`].
///
/// Eigenvalues are returned in decreasing order and the eigenvectors are the
/// columns of `v`. The upper triangle of `a` is destroyed.
pub fn jacobi(
    a: &mut [[f64; 3]; 3],
    w: &mut [f64; 3],
    v: &mut [[f64; 3]; 3],
) -> Result<(), LinalgError> {
    let mut a_flat = [0.0; 9];
    let mut v_flat = [0.0; 9];
    for (i, row) in a.iter().enumerate() {
        a_flat[i * 3..i * 3 + 3].copy_from_slice(row);
    }

    let result = jacobi_n(&mut a_flat, 3, w, &mut v_flat);

    for i in 0..3 {
        a[i].copy_from_slice(&a_flat[i * 3..i * 3 + 3]);
        v[i].copy_from_slice(&v_flat[i * 3..i * 3 + 3]);
    }
    result
}
