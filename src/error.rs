//! Error types for field, matrix and codec operations.

/// Errors that can occur in matrix arithmetic or erasure coding.
#[derive(Debug, thiserror::Error)]
pub enum MdsError {
    /// Operand shapes do not agree. Vector operands are reported as
    /// `(len, 1)` columns or `(1, len)` rows.
    #[error("dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        /// Operation that rejected the operands.
        op: &'static str,
        /// Shape of the left operand as (rows, cols).
        lhs: (usize, usize),
        /// Shape of the right operand as (rows, cols).
        rhs: (usize, usize),
    },

    /// An erasure location is outside the stripe, or listed twice.
    #[error("invalid erasure location {location} for stripe of {stripe_size} blocks")]
    InvalidLocation {
        /// The offending block index.
        location: usize,
        /// Number of blocks in a stripe.
        stripe_size: usize,
    },

    /// More blocks were erased than the parity can rebuild.
    #[error("cannot recover {erasures} erasures with {parity_size} parity blocks")]
    UnrecoverableErasures {
        /// Number of erased blocks requested.
        erasures: usize,
        /// Number of parity blocks in the code.
        parity_size: usize,
    },

    /// A decode branch has no recovery formula. Every branch of the
    /// shipped code is implemented, so this is never constructed at
    /// runtime; it exists so a missing branch can never silently no-op.
    #[error("no recovery algorithm for the requested erasure pattern")]
    IncompleteAlgorithm,

    /// A coefficient matrix turned out to be singular during a solve.
    #[error("singular matrix")]
    Singular,

    /// The requested code shape is not the one this crate implements.
    #[error("unsupported code: stripe_size={stripe_size}, parity_size={parity_size}")]
    UnsupportedCode {
        /// Requested total blocks per stripe.
        stripe_size: usize,
        /// Requested parity blocks per stripe.
        parity_size: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MdsError>;
