use std::path::PathBuf;

/// Errors reported by stream backends and the stream handle.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// A required argument was null or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The active backend does not implement the requested operation.
    #[error("operation not supported by this stream")]
    Unsupported,

    /// A write was attempted on a stream without write capability.
    #[error("stream is read-only")]
    ReadOnly,

    /// A read was attempted on a stream without read capability.
    #[error("stream is write-only")]
    WriteOnly,

    /// The backend would block; the operation may be retried.
    #[error("stream not ready")]
    NotReady,

    /// The seek reference point is not one of start/current/end.
    #[error("unknown whence")]
    UnknownWhence,

    /// The seek offset cannot be represented by the platform seek primitive.
    #[error("seek offset out of range")]
    SeekOutOfRange,

    /// Growing an in-memory buffer failed.
    #[error("out of memory growing buffer to {0} bytes")]
    OutOfMemory(usize),

    /// The opened path is neither a regular file nor a pipe.
    #[error("{} is not a regular file or pipe", .0.display())]
    NotRegularFile(PathBuf),

    /// Opening a path failed.
    #[error("couldn't open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An OS-level I/O call failed.
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

impl StreamError {
    /// Wrap the calling thread's current `errno` with a short context string.
    pub(crate) fn last_os(context: &'static str) -> Self {
        Self::Io {
            context,
            source: std::io::Error::last_os_error(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
