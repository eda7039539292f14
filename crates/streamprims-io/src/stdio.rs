use std::ffi::CString;
use std::io::ErrorKind;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr::NonNull;

use tracing::debug;

use crate::error::{Result, StreamError};
use crate::sys;
use crate::traits::{Backend, Capabilities, Properties, Whence};

/// Backend over a C `FILE*` buffered stream.
pub struct StdioBackend {
    fp: NonNull<libc::FILE>,
    autoclose: bool,
    regular_file: bool,
}

// SAFETY: the backend is the sole user of `fp`, and stdio streams carry their own
// internal lock, so moving the handle to another thread is sound.
unsafe impl Send for StdioBackend {}

impl StdioBackend {
    /// Wrap an already-open `FILE*`.
    ///
    /// # Safety
    /// `fp` must be a valid open stream for the lifetime of the backend. With
    /// `autoclose`, the backend takes ownership and calls `fclose` on it.
    pub unsafe fn from_raw(fp: NonNull<libc::FILE>, autoclose: bool) -> Self {
        // SAFETY: the caller guarantees `fp` is a valid open stream.
        let fd = unsafe { libc::fileno(fp.as_ptr()) };
        let regular_file = sys::is_regular_file(fd);
        debug!(fd, autoclose, regular_file, "wrapping stdio stream");
        Self {
            fp,
            autoclose,
            regular_file,
        }
    }

    /// Open `path` with an `fopen` mode string such as `"rb"` or `"wb"`.
    ///
    /// Only regular files and pipes are accepted. The returned backend closes
    /// the file when the stream is closed.
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(StreamError::InvalidArgument("file"));
        }
        if mode.is_empty() {
            return Err(StreamError::InvalidArgument("mode"));
        }
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| StreamError::InvalidArgument("file"))?;
        let c_mode = CString::new(mode).map_err(|_| StreamError::InvalidArgument("mode"))?;

        // SAFETY: both arguments are valid NUL-terminated strings.
        let raw = unsafe { libc::fopen(c_path.as_ptr(), c_mode.as_ptr()) };
        let Some(fp) = NonNull::new(raw) else {
            return Err(StreamError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::last_os_error(),
            });
        };

        // SAFETY: `fp` was just returned by fopen.
        let fd = unsafe { libc::fileno(fp.as_ptr()) };
        if !sys::is_regular_file_or_pipe(fd) {
            // SAFETY: we own `fp` and nothing else references it.
            unsafe {
                libc::fclose(fp.as_ptr());
            }
            return Err(StreamError::NotRegularFile(path.to_path_buf()));
        }

        debug!(?path, mode, "opened file");
        // SAFETY: `fp` is open and exclusively owned; autoclose transfers ownership.
        Ok(unsafe { Self::from_raw(fp, true) })
    }

    pub fn raw_fd(&self) -> i32 {
        // SAFETY: `fp` is valid for the lifetime of the backend.
        unsafe { libc::fileno(self.fp.as_ptr()) }
    }

    pub fn is_regular_file(&self) -> bool {
        self.regular_file
    }

    fn has_error(&self) -> bool {
        // SAFETY: `fp` is valid for the lifetime of the backend.
        unsafe { libc::ferror(self.fp.as_ptr()) != 0 }
    }

    fn clear_error(&mut self) {
        // SAFETY: `fp` is valid for the lifetime of the backend.
        unsafe { libc::clearerr(self.fp.as_ptr()) }
    }

    /// Classify a zero-length transfer after the stream's error indicator was checked.
    fn transfer_error(&mut self, context: &'static str) -> StreamError {
        let err = std::io::Error::last_os_error();
        if err.kind() == ErrorKind::WouldBlock {
            self.clear_error();
            StreamError::NotReady
        } else {
            StreamError::Io {
                context,
                source: err,
            }
        }
    }
}

impl std::fmt::Debug for StdioBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdioBackend")
            .field("fd", &self.raw_fd())
            .field("autoclose", &self.autoclose)
            .field("regular_file", &self.regular_file)
            .finish()
    }
}

impl Backend for StdioBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESCRIPTOR
    }

    fn properties(&self) -> Properties {
        Properties {
            kind: "stdio",
            fd: Some(self.raw_fd()),
            regular_file: Some(self.regular_file),
            autoclose: Some(self.autoclose),
            ..Properties::default()
        }
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let offset = libc::off_t::try_from(offset).map_err(|_| StreamError::SeekOutOfRange)?;

        // A tell does not need the (possibly costly) fseek call.
        let is_noop = whence == Whence::Cur && offset == 0;
        if !is_noop {
            // SAFETY: `fp` is valid for the lifetime of the backend.
            let rc = unsafe { libc::fseeko(self.fp.as_ptr(), offset, sys::raw_whence(whence)) };
            if rc != 0 {
                return Err(StreamError::last_os("error seeking in datastream"));
            }
        }

        // SAFETY: `fp` is valid for the lifetime of the backend.
        let pos = unsafe { libc::ftello(self.fp.as_ptr()) };
        if pos < 0 {
            return Err(StreamError::last_os("couldn't get stream offset"));
        }
        Ok(pos as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        // SAFETY: `buf` is valid for `buf.len()` writable bytes and `fp` is open.
        let n = unsafe { libc::fread(buf.as_mut_ptr().cast(), 1, buf.len(), self.fp.as_ptr()) };
        if n == 0 && self.has_error() {
            return Err(self.transfer_error("error reading from datastream"));
        }
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        // SAFETY: `buf` is valid for `buf.len()` readable bytes and `fp` is open.
        let n = unsafe { libc::fwrite(buf.as_ptr().cast(), 1, buf.len(), self.fp.as_ptr()) };
        if n == 0 && self.has_error() {
            return Err(self.transfer_error("error writing to datastream"));
        }
        Ok(n)
    }

    fn flush(&mut self) -> Result<()> {
        // SAFETY: `fp` is valid for the lifetime of the backend.
        if unsafe { libc::fflush(self.fp.as_ptr()) } != 0 {
            return Err(self.transfer_error("error flushing datastream"));
        }
        sys::data_sync(self.raw_fd()).map_err(|source| StreamError::Io {
            context: "error flushing datastream",
            source,
        })
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        let autoclose = std::mem::replace(&mut self.autoclose, false);
        debug!(fd = self.raw_fd(), autoclose, "closing stdio stream");
        // SAFETY: with autoclose we own `fp`; the flag was cleared so `Drop` skips it.
        if autoclose && unsafe { libc::fclose(self.fp.as_ptr()) } != 0 {
            return Err(StreamError::last_os("error closing datastream"));
        }
        Ok(())
    }
}

impl Drop for StdioBackend {
    fn drop(&mut self) {
        if self.autoclose {
            // SAFETY: the backend owns `fp` and close() was never called.
            unsafe {
                libc::fclose(self.fp.as_ptr());
            }
        }
    }
}
