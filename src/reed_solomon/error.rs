//! Error types for Reed-Solomon encode/decode operations

use thiserror::Error;

/// Result type for Reed-Solomon operations
pub type RsResult<T> = Result<T, RsError>;

/// Errors that can occur during Reed-Solomon operations
///
/// Input-validation errors are reported before any computation starts.
/// `DivideByZero`, `SingularMatrix` and `DimensionMismatch` only surface when
/// a coefficient matrix was built incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsError {
    /// Shard counts outside `1 <= data`, `data + parity <= 256`
    #[error("Invalid shard counts: {data_shards} data + {parity_shards} parity (need 1..=256 total with at least one data shard)")]
    InvalidShardCount {
        data_shards: usize,
        parity_shards: usize,
    },

    /// Nothing to encode or decode
    #[error("Input data is empty")]
    EmptyInput,

    /// Fewer shards supplied than data shards
    #[error("Not enough shards: got {available}, need {required}")]
    InsufficientShards { available: usize, required: usize },

    /// Shard index beyond the total shard count
    #[error("Shard index {index} out of range (total shards {total})")]
    IndexOutOfRange { index: usize, total: usize },

    /// Same shard index supplied twice
    #[error("Duplicate shard index {0}")]
    DuplicateIndex(usize),

    /// Shards in one operation do not share a length
    #[error("Shard size mismatch: expected {expected} bytes, found {found}")]
    ShardSizeMismatch { expected: usize, found: usize },

    /// Number of shards and number of indices differ
    #[error("Got {shards} shards but {indices} indices")]
    IndexCountMismatch { shards: usize, indices: usize },

    /// A shard list must hold exactly one entry per expected position
    #[error("Wrong number of shards: expected exactly {expected}, got {found}")]
    ShardCountMismatch { expected: usize, found: usize },

    /// Zero has no multiplicative inverse
    #[error("Division by zero in Galois field")]
    DivideByZero,

    /// No nonzero pivot left during elimination
    #[error("Matrix is singular")]
    SingularMatrix,

    /// Operand shapes are incompatible
    #[error("Matrix dimension mismatch: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Output buffer could not be allocated
    #[error("Failed to allocate {0} bytes")]
    AllocationFailure(usize),
}

impl RsError {
    /// Stable status code reported across the C boundary
    pub fn status_code(&self) -> i32 {
        match self {
            RsError::InvalidShardCount { .. } => -1,
            RsError::EmptyInput => -2,
            RsError::InsufficientShards { .. } => -3,
            RsError::IndexOutOfRange { .. } => -4,
            RsError::DuplicateIndex(_) => -5,
            RsError::ShardSizeMismatch { .. } => -6,
            RsError::DivideByZero => -7,
            RsError::SingularMatrix => -8,
            RsError::DimensionMismatch { .. } => -9,
            RsError::AllocationFailure(_) => -10,
            RsError::IndexCountMismatch { .. } => -11,
            RsError::ShardCountMismatch { .. } => -14,
        }
    }

    /// True for errors that indicate a matrix construction defect rather
    /// than bad caller input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            RsError::DivideByZero | RsError::SingularMatrix | RsError::DimensionMismatch { .. }
        )
    }
}
