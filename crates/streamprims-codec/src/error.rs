use streamprims_io::{Status, StreamError};

/// Errors that can occur during whole-stream transfers.
#[derive(Debug, thiserror::Error)]
pub enum BulkError {
    /// The load buffer could not be allocated or grown.
    #[error("out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    /// The stream reports a size that cannot be held in memory.
    #[error("stream too large to load ({0} bytes)")]
    TooLarge(u64),

    /// A write stopped short with a terminal status.
    #[error("write stopped after {written} of {total} bytes (status: {status})")]
    WriteFailed {
        written: usize,
        total: usize,
        status: Status,
    },

    /// Opening or closing the underlying stream failed.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),
}

pub type Result<T> = std::result::Result<T, BulkError>;
