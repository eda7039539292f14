use crate::error::{Result, StreamError};

/// Seek reference point.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Seek from the beginning of the stream.
    Set = 0,
    /// Seek relative to the current position.
    Cur = 1,
    /// Seek relative to the end of the stream.
    End = 2,
}

impl TryFrom<i32> for Whence {
    type Error = StreamError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Whence::Set),
            1 => Ok(Whence::Cur),
            2 => Ok(Whence::End),
            _ => Err(StreamError::UnknownWhence),
        }
    }
}

/// The subset of `{size, seek, read, write, flush, close}` a backend implements.
///
/// The stream handle checks these flags before dispatching, so a backend only
/// overrides the trait methods it advertises here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub size: bool,
    pub seek: bool,
    pub read: bool,
    pub write: bool,
    pub flush: bool,
    pub close: bool,
}

impl Capabilities {
    /// Seek/read/write/flush/close; size is emulated by seeking.
    pub const DESCRIPTOR: Self = Self {
        size: false,
        seek: true,
        read: true,
        write: true,
        flush: true,
        close: true,
    };

    pub const MEMORY: Self = Self {
        size: true,
        seek: true,
        read: true,
        write: true,
        flush: false,
        close: false,
    };

    pub const MEMORY_READ_ONLY: Self = Self {
        write: false,
        ..Self::MEMORY
    };

    pub const MEMORY_WRITE_ONLY: Self = Self {
        read: false,
        ..Self::MEMORY
    };
}

/// Metadata snapshot recomputed from the backend each time it is requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    /// Short backend name, e.g. `"fd"` or `"dynamic-memory"`.
    pub kind: &'static str,
    /// Underlying descriptor number for descriptor and stdio backends.
    pub fd: Option<i32>,
    /// Whether the descriptor refers to a regular file.
    pub regular_file: Option<bool>,
    /// Whether closing the stream closes the native resource.
    pub autoclose: Option<bool>,
    /// Logical length of a memory backend.
    pub memory_len: Option<usize>,
    /// Growth granularity of a dynamic memory backend.
    pub chunk_size: Option<usize>,
}

/// A concrete resource plugged into an [`IoStream`](crate::IoStream).
///
/// Default method bodies report [`StreamError::Unsupported`]; they are only
/// reached if a backend advertises a capability it does not override.
pub trait Backend: Send {
    fn capabilities(&self) -> Capabilities;

    fn properties(&self) -> Properties;

    /// Total byte length of the stream.
    fn size(&mut self) -> Result<u64> {
        Err(StreamError::Unsupported)
    }

    /// Move the cursor and return the new absolute position.
    fn seek(&mut self, _offset: i64, _whence: Whence) -> Result<u64> {
        Err(StreamError::Unsupported)
    }

    /// Read up to `buf.len()` bytes.
    ///
    /// `Ok(0)` means end of stream. `Err(StreamError::NotReady)` means the
    /// call would block and nothing was consumed.
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(StreamError::Unsupported)
    }

    /// Write up to `buf.len()` bytes; same `NotReady` convention as [`read`](Self::read).
    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(StreamError::Unsupported)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the native resource. Called at most once, by `IoStream::close`.
    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    /// Current logical contents, for memory-backed streams.
    fn memory(&self) -> Option<&[u8]> {
        None
    }

    /// Change the growth granularity. Returns `false` if the backend does not grow.
    fn set_chunk_size(&mut self, _chunk_size: usize) -> bool {
        false
    }
}
