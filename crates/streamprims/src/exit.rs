use std::fmt;
use std::io;

use streamprims_codec::BulkError;
use streamprims_io::StreamError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const NOT_FOUND: i32 = 2;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: &io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn stream_error(context: &str, err: StreamError) -> CliError {
    match &err {
        StreamError::Open { source, .. } => {
            CliError::new(io_error(context, source).code, format!("{context}: {err}"))
        }
        StreamError::Io { source, .. } => io_error(context, source),
        StreamError::InvalidArgument(_)
        | StreamError::UnknownWhence
        | StreamError::SeekOutOfRange => CliError::new(USAGE, format!("{context}: {err}")),
        StreamError::NotRegularFile(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        StreamError::NotReady => CliError::new(TIMEOUT, format!("{context}: {err}")),
        StreamError::OutOfMemory(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
        StreamError::Unsupported | StreamError::ReadOnly | StreamError::WriteOnly => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

pub fn bulk_error(context: &str, err: BulkError) -> CliError {
    match err {
        BulkError::Stream(err) => stream_error(context, err),
        BulkError::TooLarge(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        BulkError::OutOfMemory(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
        BulkError::WriteFailed { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use streamprims_io::Status;

    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = StreamError::Open {
            path: PathBuf::from("/nope"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let cli = stream_error("open failed", err);
        assert_eq!(cli.code, NOT_FOUND);
        assert!(cli.message.starts_with("open failed: couldn't open /nope"));
    }

    #[test]
    fn bulk_errors_unwrap_stream_errors() {
        let cli = bulk_error("load failed", BulkError::Stream(StreamError::UnknownWhence));
        assert_eq!(cli.code, USAGE);

        let cli = bulk_error(
            "save failed",
            BulkError::WriteFailed {
                written: 1,
                total: 2,
                status: Status::Error,
            },
        );
        assert_eq!(cli.code, FAILURE);
        assert!(cli.message.contains("1 of 2"));
    }
}
