//! Dense N x N and rectangular matrices stored as flat row-major slices.

use crate::error::{check_len, LinalgError};
use crate::matrix3::determinant2x2;

/// Pivots with a magnitude at or below this value are treated as zero.
pub const SMALL_NUMBER: f64 = 1.0e-12;

/// Multiply the `rows_a x cols_a` matrix `a` by the `rows_b x cols_b` matrix `b`.
///
/// `out` must hold `rows_a * cols_b` elements.
pub fn multiply_matrix(
    a: &[f64],
    b: &[f64],
    rows_a: usize,
    cols_a: usize,
    rows_b: usize,
    cols_b: usize,
    out: &mut [f64],
) -> Result<(), LinalgError> {
    if cols_a != rows_b {
        return Err(LinalgError::DimensionMismatch(cols_a, rows_b));
    }
    check_len("a", a.len(), rows_a * cols_a)?;
    check_len("b", b.len(), rows_b * cols_b)?;
    check_len("out", out.len(), rows_a * cols_b)?;

    for i in 0..rows_a {
        for j in 0..cols_b {
            out[i * cols_b + j] = (0..cols_a)
                .map(|k| a[i * cols_a + k] * b[k * cols_b + j])
                .sum();
        }
    }
    Ok(())
}

/// LU-factor the `size x size` matrix `a` in place using Crout's method with
/// implicit row scaling and partial pivoting.
///
/// The row permutation is written to `index`. Fails when a row is entirely zero
/// or a pivot falls below [`SMALL_NUMBER`].
pub fn lu_factor_linear_system(
    a: &mut [f64],
    index: &mut [usize],
    size: usize,
) -> Result<(), LinalgError> {
    check_len("a", a.len(), size * size)?;
    check_len("index", index.len(), size)?;

    let mut scale = vec![0.0; size];
    for (i, s) in scale.iter_mut().enumerate() {
        let largest = a[i * size..(i + 1) * size]
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        if largest == 0.0 {
            log::warn!("Unable to factor linear system: row {i} is zero");
            return Err(LinalgError::SingularMatrix);
        }
        *s = 1.0 / largest;
    }

    let mut max_i = 0;
    for j in 0..size {
        for i in 0..j {
            let mut sum = a[i * size + j];
            for k in 0..i {
                sum -= a[i * size + k] * a[k * size + j];
            }
            a[i * size + j] = sum;
        }

        // search for the largest scaled pivot
        let mut largest = 0.0;
        for i in j..size {
            let mut sum = a[i * size + j];
            for k in 0..j {
                sum -= a[i * size + k] * a[k * size + j];
            }
            a[i * size + j] = sum;

            let candidate = scale[i] * sum.abs();
            if candidate >= largest {
                largest = candidate;
                max_i = i;
            }
        }

        if j != max_i {
            for k in 0..size {
                a.swap(max_i * size + k, j * size + k);
            }
            scale[max_i] = scale[j];
        }

        index[j] = max_i;

        if a[j * size + j].abs() <= SMALL_NUMBER {
            log::warn!("Unable to factor linear system: pivot {j} vanishes");
            return Err(LinalgError::SingularMatrix);
        }

        if j != size - 1 {
            let inv_pivot = 1.0 / a[j * size + j];
            for i in (j + 1)..size {
                a[i * size + j] *= inv_pivot;
            }
        }
    }

    Ok(())
}

/// Solve `A x = b` in place given the factors from [`lu_factor_linear_system`].
///
/// On entry `x` holds `b`, on exit the solution.
pub fn lu_solve_linear_system(
    a: &[f64],
    index: &[usize],
    x: &mut [f64],
    size: usize,
) -> Result<(), LinalgError> {
    check_len("a", a.len(), size * size)?;
    check_len("index", index.len(), size)?;
    check_len("x", x.len(), size)?;

    // forward substitution, skipping the leading zeros of the right-hand side
    let mut first_nonzero: Option<usize> = None;
    for i in 0..size {
        let idx = index[i];
        let mut sum = x[idx];
        x[idx] = x[i];
        match first_nonzero {
            Some(ii) => {
                for j in ii..i {
                    sum -= a[i * size + j] * x[j];
                }
            }
            None if sum != 0.0 => first_nonzero = Some(i),
            None => {}
        }
        x[i] = sum;
    }

    // back substitution
    for i in (0..size).rev() {
        let mut sum = x[i];
        for j in (i + 1)..size {
            sum -= a[i * size + j] * x[j];
        }
        x[i] = sum / a[i * size + i];
    }

    Ok(())
}

/// Solve the `size x size` system `A x = b` in one shot.
///
/// Sizes 1 and 2 use closed forms and report an exactly singular matrix
/// explicitly; larger systems are LU-factored, which overwrites `a`.
/// On entry `x` holds `b`, on exit the solution.
///
/// Example:
///
/// ```
/// use scivis_linalg::matrix::solve_linear_system;
///
/// let mut a = [2.0, 0.0, 0.0, 4.0];
/// let mut x = [2.0, 2.0];
/// solve_linear_system(&mut a, &mut x, 2).unwrap();
/// assert_eq!(x, [1.0, 0.5]);
/// ```
pub fn solve_linear_system(a: &mut [f64], x: &mut [f64], size: usize) -> Result<(), LinalgError> {
    check_len("a", a.len(), size * size)?;
    check_len("x", x.len(), size)?;

    match size {
        0 => Ok(()),
        1 => {
            if a[0] == 0.0 {
                return Err(LinalgError::SingularMatrix);
            }
            x[0] /= a[0];
            Ok(())
        }
        2 => {
            let det = determinant2x2(a[0], a[1], a[2], a[3]);
            if det == 0.0 {
                return Err(LinalgError::SingularMatrix);
            }
            let y0 = (a[3] * x[0] - a[1] * x[1]) / det;
            let y1 = (-(a[2] * x[0]) + a[0] * x[1]) / det;
            x[0] = y0;
            x[1] = y1;
            Ok(())
        }
        _ => {
            let mut index = vec![0; size];
            lu_factor_linear_system(a, &mut index, size)?;
            lu_solve_linear_system(a, &index, x, size)
        }
    }
}

/// Invert the `size x size` matrix `a` into `ai` by Gauss-Jordan elimination
/// with partial pivoting.
///
/// `a` is left untouched. Fails when the matrix is singular within [`SMALL_NUMBER`].
pub fn invert_matrix(a: &[f64], ai: &mut [f64], size: usize) -> Result<(), LinalgError> {
    check_len("a", a.len(), size * size)?;
    check_len("ai", ai.len(), size * size)?;

    let mut work = a.to_vec();
    for (i, v) in ai.iter_mut().enumerate() {
        *v = if i / size == i % size { 1.0 } else { 0.0 };
    }

    for col in 0..size {
        // pick the row with the largest magnitude in this column
        let mut pivot_row = col;
        let mut largest = work[col * size + col].abs();
        for row in (col + 1)..size {
            let candidate = work[row * size + col].abs();
            if candidate > largest {
                largest = candidate;
                pivot_row = row;
            }
        }

        if largest <= SMALL_NUMBER {
            return Err(LinalgError::SingularMatrix);
        }

        if pivot_row != col {
            for k in 0..size {
                work.swap(pivot_row * size + k, col * size + k);
                ai.swap(pivot_row * size + k, col * size + k);
            }
        }

        let inv_pivot = 1.0 / work[col * size + col];
        for k in 0..size {
            work[col * size + k] *= inv_pivot;
            ai[col * size + k] *= inv_pivot;
        }

        for row in 0..size {
            if row == col {
                continue;
            }
            let factor = work[row * size + col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..size {
                work[row * size + k] -= factor * work[col * size + k];
                ai[row * size + k] -= factor * ai[col * size + k];
            }
        }
    }

    Ok(())
}

/// Rough condition estimate of a square matrix: the largest magnitude of the
/// upper triangle divided by the smallest magnitude on the diagonal.
///
/// A zero on the diagonal yields [`LinalgError::SingularMatrix`].
pub fn estimate_matrix_condition(a: &[f64], size: usize) -> Result<f64, LinalgError> {
    check_len("a", a.len(), size * size)?;

    let mut max = 0.0f64;
    for i in 0..size {
        for j in i..size {
            max = max.max(a[i * size + j].abs());
        }
    }

    let min = (0..size)
        .map(|i| a[i * size + i].abs())
        .fold(f64::MAX, f64::min);

    if min == 0.0 {
        return Err(LinalgError::SingularMatrix);
    }
    Ok(max / min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_system(rng: &mut StdRng, size: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        // diagonally dominant keeps the systems well conditioned
        let mut a: Vec<f64> = (0..size * size)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect();
        for i in 0..size {
            a[i * size + i] += size as f64;
        }
        let x: Vec<f64> = (0..size).map(|_| rng.random_range(-10.0..10.0)).collect();
        let mut b = vec![0.0; size];
        multiply_matrix(&a, &x, size, size, size, 1, &mut b).unwrap();
        (a, x, b)
    }

    #[test]
    fn test_solve_linear_system_random() -> Result<(), LinalgError> {
        let mut rng = StdRng::seed_from_u64(7);
        for size in 1..12 {
            let (mut a, x_true, mut x) = random_system(&mut rng, size);
            solve_linear_system(&mut a, &mut x, size)?;
            for (x, x_true) in x.iter().zip(x_true.iter()) {
                assert_relative_eq!(x, x_true, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_solve_linear_system_zero_matrix() {
        let mut a1 = [0.0];
        let mut x1 = [1.0];
        assert_eq!(
            solve_linear_system(&mut a1, &mut x1, 1),
            Err(LinalgError::SingularMatrix)
        );
        assert_eq!(x1, [1.0]);

        let mut a2 = [0.0; 4];
        let mut x2 = [1.0, 2.0];
        assert_eq!(
            solve_linear_system(&mut a2, &mut x2, 2),
            Err(LinalgError::SingularMatrix)
        );
        assert_eq!(x2, [1.0, 2.0]);

        let mut a3 = [0.0; 9];
        let mut x3 = [1.0, 2.0, 3.0];
        assert_eq!(
            solve_linear_system(&mut a3, &mut x3, 3),
            Err(LinalgError::SingularMatrix)
        );
    }

    #[test]
    fn test_lu_factor_and_solve() -> Result<(), LinalgError> {
        // needs a row swap on the first column
        let a = [0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0];
        let x_true = [1.0, -1.0, 2.0];
        let mut b = [0.0; 3];
        multiply_matrix(&a, &x_true, 3, 3, 3, 1, &mut b)?;

        let mut lu = a;
        let mut index = [0; 3];
        lu_factor_linear_system(&mut lu, &mut index, 3)?;
        lu_solve_linear_system(&lu, &index, &mut b, 3)?;
        for i in 0..3 {
            assert_relative_eq!(b[i], x_true[i], epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_invert_matrix() -> Result<(), LinalgError> {
        let mut rng = StdRng::seed_from_u64(11);
        for size in [1, 2, 3, 4, 7, 15] {
            let (a, _, _) = random_system(&mut rng, size);
            let original = a.clone();
            let mut ai = vec![0.0; size * size];
            invert_matrix(&a, &mut ai, size)?;
            assert_eq!(a, original);

            let mut prod = vec![0.0; size * size];
            multiply_matrix(&a, &ai, size, size, size, size, &mut prod)?;
            for i in 0..size {
                for j in 0..size {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_relative_eq!(prod[i * size + j], expected, epsilon = 1e-10);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_invert_matrix_singular() {
        let a = [1.0, 2.0, 2.0, 4.0];
        let mut ai = [0.0; 4];
        assert_eq!(invert_matrix(&a, &mut ai, 2), Err(LinalgError::SingularMatrix));
    }

    #[test]
    fn test_buffer_length_is_checked() {
        let mut a = [1.0, 2.0, 3.0];
        let mut x = [1.0, 1.0];
        assert_eq!(
            solve_linear_system(&mut a, &mut x, 2),
            Err(LinalgError::BufferLength {
                name: "a",
                expected: 4,
                actual: 3
            })
        );
        let mut out = [0.0; 4];
        assert_eq!(
            multiply_matrix(&[1.0; 6], &[1.0; 6], 2, 3, 2, 3, &mut out),
            Err(LinalgError::DimensionMismatch(3, 2))
        );
    }

    #[test]
    fn test_estimate_matrix_condition() {
        let a = [4.0, 8.0, 0.0, 2.0];
        assert_eq!(estimate_matrix_condition(&a, 2), Ok(4.0));
        let b = [1.0, 1.0, 1.0, 0.0];
        assert_eq!(
            estimate_matrix_condition(&b, 2),
            Err(LinalgError::SingularMatrix)
        );
    }
}
