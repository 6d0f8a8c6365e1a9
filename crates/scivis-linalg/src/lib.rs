#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Axis-aligned bounds and extents helpers.
pub mod bounds;

/// Color space conversions.
pub mod color;

/// Error types for the linear algebra kernel.
pub mod error;

/// Jacobi eigenvalue iteration for symmetric matrices.
pub mod jacobi;

/// Linear and homogeneous least squares fitting.
pub mod least_squares;

/// LU factorization, inversion and products of general square matrices.
pub mod matrix;

/// Fixed size 3x3 matrix operations.
pub mod matrix3;

/// Conversions between rotation matrices and quaternions.
pub mod quaternion;

/// Seeded random number sequences.
pub mod random;

/// Scalar helpers: rounding, comparisons, combinatorics and clamping.
pub mod scalar;

/// Orthogonalization, diagonalization and singular value decomposition of 3x3 matrices.
pub mod svd;

/// 2D and 3D vector operations.
pub mod vector;

pub use error::LinalgError;
