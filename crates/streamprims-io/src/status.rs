/// Outcome of the most recent read, write or flush on a stream.
///
/// Callers consult this after a short or zero-length result: a zero-byte read
/// alone does not distinguish end-of-file from an error or a would-block.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Status {
    /// Everything is ready (no errors and not at end of stream).
    #[default]
    Ready = 0,
    /// A backend fault occurred; see [`IoStream::last_error`](crate::IoStream::last_error).
    Error = 1,
    /// End of stream reached.
    Eof = 2,
    /// Non-blocking I/O, the request would have blocked.
    NotReady = 3,
    /// Tried to write a read-only stream.
    ReadOnly = 4,
    /// Tried to read a write-only stream.
    WriteOnly = 5,
}

impl Status {
    /// Terminal statuses end a bulk transfer; `Ready` and `NotReady` do not.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Ready | Status::NotReady)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ready => "ready",
            Status::Error => "error",
            Status::Eof => "eof",
            Status::NotReady => "not-ready",
            Status::ReadOnly => "read-only",
            Status::WriteOnly => "write-only",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ready() {
        assert_eq!(Status::default(), Status::Ready);
    }

    #[test]
    fn terminal_classification() {
        assert!(!Status::Ready.is_terminal());
        assert!(!Status::NotReady.is_terminal());
        assert!(Status::Eof.is_terminal());
        assert!(Status::Error.is_terminal());
        assert!(Status::ReadOnly.is_terminal());
        assert!(Status::WriteOnly.is_terminal());
    }
}
