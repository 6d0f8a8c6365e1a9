//! Linear least-squares fitting of `y = M x` from samples.
//!
//! Samples are passed transposed: `xt` is a `num_samples x x_order` row-major
//! matrix holding one input vector per row, and `yt` a `num_samples x y_order`
//! matrix holding the matching outputs. The fitted map is returned transposed
//! as well, `mt` being `x_order x y_order`.

use crate::error::{check_len, LinalgError};
use crate::jacobi::jacobi_n;
use crate::matrix::{invert_matrix, SMALL_NUMBER};

fn check_samples(num_samples: usize, order: usize) -> Result<(), LinalgError> {
    if num_samples < order {
        log::warn!("Insufficient number of samples ({num_samples} < {order}): underdetermined");
        return Err(LinalgError::Underdetermined {
            samples: num_samples,
            order,
        });
    }
    Ok(())
}

/// Accumulate the symmetric `x_order x x_order` matrix `X X^T`.
fn gram_matrix(num_samples: usize, xt: &[f64], x_order: usize) -> Vec<f64> {
    let mut xxt = vec![0.0; x_order * x_order];
    for sample in xt.chunks_exact(x_order).take(num_samples) {
        for i in 0..x_order {
            for j in i..x_order {
                xxt[i * x_order + j] += sample[i] * sample[j];
            }
        }
    }
    for i in 0..x_order {
        for j in 0..i {
            xxt[i * x_order + j] = xxt[j * x_order + i];
        }
    }
    xxt
}

/// Solve the homogeneous problem `min |M x|` subject to `|M| = 1`.
///
/// The solution is the eigenvector of `X X^T` with the smallest eigenvalue, written
/// into `mt` (`x_order` elements). Eigenvalues are ordered by [`jacobi_n`], so when
/// several eigenvalues tie for smallest, the eigenvector in the last column wins.
pub fn solve_homogeneous_least_squares(
    num_samples: usize,
    xt: &[f64],
    x_order: usize,
    mt: &mut [f64],
) -> Result<(), LinalgError> {
    check_samples(num_samples, x_order)?;
    check_len("xt", xt.len(), num_samples * x_order)?;
    check_len("mt", mt.len(), x_order)?;

    let mut xxt = gram_matrix(num_samples, xt, x_order);
    let mut eigenvalues = vec![0.0; x_order];
    let mut eigenvectors = vec![0.0; x_order * x_order];
    jacobi_n(&mut xxt, x_order, &mut eigenvalues, &mut eigenvectors)?;

    for (i, m) in mt.iter_mut().enumerate() {
        *m = eigenvectors[i * x_order + x_order - 1];
    }
    Ok(())
}

/// Fit `y = M x` in the least-squares sense through the pseudo-inverse
/// `M^T = (X X^T)^-1 X Y^T`.
///
/// With `check_homogeneous` set, every output column whose samples are all zero is
/// treated as a homogeneous system and its column of `mt` is taken from
/// [`solve_homogeneous_least_squares`]. A single homogeneous output is delegated
/// entirely to that solver.
///
/// Example:
///
/// ```
/// use scivis_linalg::least_squares::solve_least_squares;
///
/// // y = 2 x + 1, with a constant 1 appended to every input sample
/// let xt = [0.0, 1.0, 1.0, 1.0, 2.0, 1.0];
/// let yt = [1.0, 3.0, 5.0];
/// let mut mt = [0.0; 2];
/// solve_least_squares(3, &xt, 2, &yt, 1, &mut mt, true).unwrap();
/// assert!((mt[0] - 2.0).abs() < 1e-12 && (mt[1] - 1.0).abs() < 1e-12);
/// ```
pub fn solve_least_squares(
    num_samples: usize,
    xt: &[f64],
    x_order: usize,
    yt: &[f64],
    y_order: usize,
    mt: &mut [f64],
    check_homogeneous: bool,
) -> Result<(), LinalgError> {
    check_samples(num_samples, x_order)?;
    check_samples(num_samples, y_order)?;
    check_len("xt", xt.len(), num_samples * x_order)?;
    check_len("yt", yt.len(), num_samples * y_order)?;
    check_len("mt", mt.len(), x_order * y_order)?;

    let mut homogeneous = vec![false; y_order];
    if check_homogeneous {
        homogeneous.iter_mut().for_each(|h| *h = true);
        for sample in yt.chunks_exact(y_order) {
            for (h, y) in homogeneous.iter_mut().zip(sample) {
                if y.abs() > SMALL_NUMBER {
                    *h = false;
                }
            }
        }

        if y_order == 1 && homogeneous[0] {
            log::warn!("Detected homogeneous system (Y=0), solving the homogeneous problem");
            return solve_homogeneous_least_squares(num_samples, xt, x_order, mt);
        }
    }

    let homogeneous_solution = if homogeneous.iter().any(|h| *h) {
        let mut hmt = vec![0.0; x_order];
        let res = solve_homogeneous_least_squares(num_samples, xt, x_order, &mut hmt);
        Some((hmt, res))
    } else {
        None
    };

    let xxt = gram_matrix(num_samples, xt, x_order);
    let mut xyt = vec![0.0; x_order * y_order];
    for (xs, ys) in xt
        .chunks_exact(x_order)
        .zip(yt.chunks_exact(y_order))
        .take(num_samples)
    {
        for i in 0..x_order {
            for j in 0..y_order {
                xyt[i * y_order + j] += xs[i] * ys[j];
            }
        }
    }

    let mut xxt_inv = vec![0.0; x_order * x_order];
    invert_matrix(&xxt, &mut xxt_inv, x_order)?;

    for i in 0..x_order {
        for j in 0..y_order {
            mt[i * y_order + j] = (0..x_order)
                .map(|k| xxt_inv[i * x_order + k] * xyt[k * y_order + j])
                .sum();
        }
    }

    if let Some((hmt, res)) = homogeneous_solution {
        for (j, _) in homogeneous.iter().enumerate().filter(|(_, h)| **h) {
            for i in 0..x_order {
                mt[i * y_order + j] = hmt[i];
            }
        }
        res?;
    }

    Ok(())
}
