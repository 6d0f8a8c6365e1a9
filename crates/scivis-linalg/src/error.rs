/// Errors reported by the linear algebra kernel.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LinalgError {
    /// The matrix is singular, or too close to singular to be factored.
    #[error("Matrix is singular")]
    SingularMatrix,

    /// A vector of zero length was used where a direction is required.
    #[error("Vector has zero length")]
    ZeroVector,

    /// Fewer samples than unknowns were provided to a least-squares fit.
    #[error("Insufficient number of samples ({samples}) for order {order}: underdetermined")]
    Underdetermined {
        /// Number of samples provided.
        samples: usize,
        /// Order of the input or output that exceeded the sample count.
        order: usize,
    },

    /// The Jacobi iteration did not converge.
    #[error("Jacobi iteration did not converge after {sweeps} sweeps")]
    NoConvergence {
        /// Number of sweeps performed.
        sweeps: usize,
    },

    /// A flat buffer does not have the length implied by the given sizes.
    #[error("Buffer `{name}` has length {actual}, expected {expected}")]
    BufferLength {
        /// Name of the offending argument.
        name: &'static str,
        /// Expected number of elements.
        expected: usize,
        /// Actual number of elements.
        actual: usize,
    },

    /// The inner dimensions of a matrix product do not agree.
    #[error("Matrix dimensions do not agree: {0} columns vs {1} rows")]
    DimensionMismatch(usize, usize),

    /// Three points on a line have no circumscribed circle.
    #[error("Points are collinear")]
    CollinearPoints,

    /// A color string could not be parsed.
    #[error("Invalid hex color `{0}`")]
    InvalidHexColor(String),
}

pub(crate) fn check_len(
    name: &'static str,
    buf_len: usize,
    expected: usize,
) -> Result<(), LinalgError> {
    if buf_len != expected {
        return Err(LinalgError::BufferLength {
            name,
            expected,
            actual: buf_len,
        });
    }
    Ok(())
}
