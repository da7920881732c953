use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    /// A benchmark invariant was violated by the supplied parameters.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// The run digest did not match the expected value.
    #[error("Run digest mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
