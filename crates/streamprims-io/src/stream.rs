use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::dynamic::DynamicMemBackend;
use crate::error::{Result, StreamError};
use crate::mem::{ConstMemBackend, MemBackend};
use crate::status::Status;
use crate::traits::{Backend, Properties, Whence};

/// A binary stream over any [`Backend`].
///
/// Every read, write and flush resets [`status`](Self::status) to `Ready` and
/// then sets it to the most specific outcome. Count-returning calls record the
/// backend's error in [`last_error`](Self::last_error); the other calls return it.
pub struct IoStream<'a> {
    backend: Box<dyn Backend + 'a>,
    status: Status,
    last_error: Option<StreamError>,
}

impl<'a> IoStream<'a> {
    /// Wrap a backend. The stream owns it until [`close`](Self::close).
    pub fn new(backend: impl Backend + 'a) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn Backend + 'a>) -> Self {
        Self {
            backend,
            status: Status::Ready,
            last_error: None,
        }
    }

    /// Read/write stream over a caller-owned memory region.
    pub fn from_mem(mem: &'a mut [u8]) -> Result<Self> {
        MemBackend::new(mem).map(Self::new)
    }

    /// Read-only stream over a caller-owned memory region.
    pub fn from_const_mem(mem: &'a [u8]) -> Result<Self> {
        ConstMemBackend::new(mem).map(Self::new)
    }

    /// Empty, growable in-memory stream.
    pub fn from_dynamic_mem() -> Self {
        Self::new(DynamicMemBackend::new())
    }

    /// Open a file with an `fopen` mode string.
    #[cfg(unix)]
    pub fn from_file(path: impl AsRef<std::path::Path>, mode: &str) -> Result<Self> {
        crate::stdio::StdioBackend::open(path, mode).map(Self::new)
    }

    /// Stream over a descriptor the stream takes ownership of.
    #[cfg(unix)]
    pub fn from_fd(fd: std::os::fd::OwnedFd) -> Self {
        Self::new(crate::fd::FdBackend::from_owned(fd))
    }

    /// Status left by the most recent read, write or flush.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Error recorded by the most recent read or write, if any.
    pub fn last_error(&self) -> Option<&StreamError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<StreamError> {
        self.last_error.take()
    }

    pub fn properties(&self) -> Properties {
        self.backend.properties()
    }

    /// Current logical contents of a memory-backed stream.
    ///
    /// For a dynamic stream this always reflects the latest reallocation.
    pub fn memory(&self) -> Option<&[u8]> {
        self.backend.memory()
    }

    /// Change the growth granularity of a dynamic memory stream.
    pub fn set_chunk_size(&mut self, chunk_size: usize) -> bool {
        self.backend.set_chunk_size(chunk_size)
    }

    /// Total size in bytes.
    ///
    /// Backends without a native size are measured by seeking to the end and
    /// back to the saved position.
    pub fn size(&mut self) -> Result<u64> {
        if self.backend.capabilities().size {
            return self.backend.size();
        }
        let pos = self.seek(0, Whence::Cur)?;
        let size = self.seek(0, Whence::End)?;
        self.seek(pos as i64, Whence::Set)?;
        Ok(size)
    }

    /// Move the cursor and return the new absolute position.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        if !self.backend.capabilities().seek {
            return Err(StreamError::Unsupported);
        }
        self.backend.seek(offset, whence)
    }

    /// Current position; a no-op seek.
    pub fn tell(&mut self) -> Result<u64> {
        self.seek(0, Whence::Cur)
    }

    /// Read up to `buf.len()` bytes.
    ///
    /// A return of 0 is classified in [`status`](Self::status): `Eof`, `Error`,
    /// `NotReady`, or `WriteOnly` if the stream cannot be read at all.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        if !self.backend.capabilities().read {
            self.status = Status::WriteOnly;
            self.last_error = Some(StreamError::WriteOnly);
            return 0;
        }
        self.status = Status::Ready;
        self.last_error = None;
        if buf.is_empty() {
            return 0;
        }

        match self.backend.read(buf) {
            Ok(0) => {
                self.status = Status::Eof;
                0
            }
            Ok(n) => n,
            Err(err) => self.fail(err),
        }
    }

    /// Write up to `buf.len()` bytes.
    ///
    /// Writes have no end-of-file: a zero-byte result while the backend still
    /// reports ready is classified as `Error`.
    pub fn write(&mut self, buf: &[u8]) -> usize {
        if !self.backend.capabilities().write {
            self.status = Status::ReadOnly;
            self.last_error = Some(StreamError::ReadOnly);
            return 0;
        }
        self.status = Status::Ready;
        self.last_error = None;
        if buf.is_empty() {
            return 0;
        }

        match self.backend.write(buf) {
            Ok(0) => {
                self.status = Status::Error;
                0
            }
            Ok(n) => n,
            Err(err) => self.fail(err),
        }
    }

    /// Flush buffered data to the device. A no-op for backends without flush.
    pub fn flush(&mut self) -> Result<()> {
        self.status = Status::Ready;
        self.last_error = None;
        if !self.backend.capabilities().flush {
            return Ok(());
        }
        self.backend.flush().inspect_err(|err| {
            self.status = match err {
                StreamError::NotReady => Status::NotReady,
                _ => Status::Error,
            };
        })
    }

    /// Close the stream, releasing the backend and its resource.
    pub fn close(self) -> Result<()> {
        if self.backend.capabilities().close {
            self.backend.close()
        } else {
            Ok(())
        }
    }

    fn fail(&mut self, err: StreamError) -> usize {
        match err {
            StreamError::NotReady => self.status = Status::NotReady,
            err => {
                self.status = Status::Error;
                self.last_error = Some(err);
            }
        }
        0
    }

    fn status_error(&mut self) -> std::io::Error {
        match self.status {
            Status::NotReady => ErrorKind::WouldBlock.into(),
            Status::ReadOnly | Status::WriteOnly => std::io::Error::new(
                ErrorKind::Unsupported,
                format!("stream is {}", self.status),
            ),
            _ => match self.last_error.take() {
                Some(StreamError::Io { source, .. }) => source,
                Some(err) => std::io::Error::other(err),
                None => std::io::Error::other("stream error"),
            },
        }
    }
}

impl std::fmt::Debug for IoStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoStream")
            .field("kind", &self.backend.properties().kind)
            .field("status", &self.status)
            .finish()
    }
}

impl Read for IoStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = IoStream::read(self, buf);
        if n > 0 || buf.is_empty() || self.status == Status::Eof {
            return Ok(n);
        }
        Err(self.status_error())
    }
}

impl Write for IoStream<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = IoStream::write(self, buf);
        if n > 0 || buf.is_empty() {
            return Ok(n);
        }
        if self.status == Status::Error && self.last_error.is_none() {
            return Err(ErrorKind::WriteZero.into());
        }
        Err(self.status_error())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        IoStream::flush(self).map_err(|err| match err {
            StreamError::NotReady => ErrorKind::WouldBlock.into(),
            StreamError::Io { source, .. } => source,
            other => std::io::Error::other(other),
        })
    }
}

impl Seek for IoStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(n) => (
                i64::try_from(n).map_err(|_| std::io::Error::from(ErrorKind::InvalidInput))?,
                Whence::Set,
            ),
            SeekFrom::Current(n) => (n, Whence::Cur),
            SeekFrom::End(n) => (n, Whence::End),
        };
        IoStream::seek(self, offset, whence).map_err(|err| match err {
            StreamError::Io { source, .. } => source,
            StreamError::Unsupported => ErrorKind::Unsupported.into(),
            other => std::io::Error::other(other),
        })
    }
}
