//! Error types for the vertex algebra kernel.

use thiserror::Error;

/// Kernel error types.
///
/// Every kernel call either fully succeeds or fails with one of these
/// variants; elements are immutable values, so a failed call has no
/// side effect.
#[derive(Error, Debug)]
pub enum VoaError {
    /// An operation that requires a conformal weight was given an
    /// element mixing monomials of different weights.
    #[error("element is not homogeneous: {0}")]
    NotHomogeneous(String),

    /// A grading-dependent query was made on an algebra constructed
    /// without conformal weights.
    #[error("the algebra is not conformally graded")]
    NotGraded,

    /// `T` was asked for a negative derivative order.
    #[error("derivative order must be non-negative, got {0}")]
    NegativeDerivativeOrder(i64),

    /// A monomial index violates the basis constraints (unsorted parts,
    /// zero parts, repeated parts in an odd generator slot, or a wrong
    /// slot count).
    #[error("malformed monomial index: {0}")]
    MalformedIndex(String),

    /// A structure constant or central parameter refers to a generator
    /// that was never declared.
    #[error("unknown generator `{0}`")]
    UnknownGenerator(String),

    /// A central parameter was supplied for a non-central generator.
    #[error("generator `{0}` is not central")]
    NotCentral(String),

    /// A generator was declared with a non-positive conformal weight.
    #[error("generator `{0}` must have positive conformal weight")]
    InvalidWeight(String),

    /// Two generators were declared with the same name.
    #[error("duplicate generator name `{0}`")]
    DuplicateGenerator(String),
}

/// Result type alias for kernel operations.
pub type Result<T> = std::result::Result<T, VoaError>;
