use std::io::ErrorKind;
use std::os::fd::{IntoRawFd, OwnedFd, RawFd};

use tracing::debug;

use crate::error::{Result, StreamError};
use crate::sys;
use crate::traits::{Backend, Capabilities, Properties, Whence};

/// Backend over a raw OS file descriptor.
///
/// Read and write retry on `EINTR` and surface `EAGAIN` as
/// [`StreamError::NotReady`] so non-blocking descriptors can be polled.
/// There is no native size call; the stream handle emulates it by seeking.
#[derive(Debug)]
pub struct FdBackend {
    fd: RawFd,
    autoclose: bool,
    regular_file: bool,
}

impl FdBackend {
    /// Wrap a raw descriptor.
    ///
    /// # Safety
    /// `fd` must be an open descriptor that stays valid for the lifetime of the
    /// backend. With `autoclose`, the backend takes ownership and closes it;
    /// nothing else may close it afterwards.
    pub unsafe fn from_raw_fd(fd: RawFd, autoclose: bool) -> Self {
        let regular_file = sys::is_regular_file(fd);
        debug!(fd, autoclose, regular_file, "wrapping file descriptor");
        Self {
            fd,
            autoclose,
            regular_file,
        }
    }

    /// Take ownership of a descriptor; it is closed when the stream closes.
    pub fn from_owned(fd: OwnedFd) -> Self {
        let raw = fd.into_raw_fd();
        // SAFETY: `raw` came from an `OwnedFd`, so it is open and now exclusively ours.
        unsafe { Self::from_raw_fd(raw, true) }
    }

    pub fn raw_fd(&self) -> RawFd {
        self.fd
    }

    pub fn is_regular_file(&self) -> bool {
        self.regular_file
    }
}

impl From<std::fs::File> for FdBackend {
    fn from(file: std::fs::File) -> Self {
        Self::from_owned(OwnedFd::from(file))
    }
}

impl Backend for FdBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities::DESCRIPTOR
    }

    fn properties(&self) -> Properties {
        Properties {
            kind: "fd",
            fd: Some(self.fd),
            regular_file: Some(self.regular_file),
            autoclose: Some(self.autoclose),
            ..Properties::default()
        }
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let offset = libc::off_t::try_from(offset).map_err(|_| StreamError::SeekOutOfRange)?;
        // SAFETY: `self.fd` is an open descriptor for the lifetime of the backend.
        let pos = unsafe { libc::lseek(self.fd, offset, sys::raw_whence(whence)) };
        if pos < 0 {
            return Err(StreamError::last_os("couldn't get stream offset"));
        }
        Ok(pos as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            // SAFETY: `buf` is valid for `buf.len()` writable bytes.
            let n = unsafe { libc::read(self.fd, buf.as_mut_ptr().cast(), buf.len()) };
            if n >= 0 {
                return Ok(n as usize);
            }
            let err = std::io::Error::last_os_error();
            match err.kind() {
                ErrorKind::Interrupted => continue,
                ErrorKind::WouldBlock => return Err(StreamError::NotReady),
                _ => {
                    return Err(StreamError::Io {
                        context: "error reading from datastream",
                        source: err,
                    })
                }
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        loop {
            // SAFETY: `buf` is valid for `buf.len()` readable bytes.
            let n = unsafe { libc::write(self.fd, buf.as_ptr().cast(), buf.len()) };
            if n >= 0 {
                return Ok(n as usize);
            }
            let err = std::io::Error::last_os_error();
            match err.kind() {
                ErrorKind::Interrupted => continue,
                ErrorKind::WouldBlock => return Err(StreamError::NotReady),
                _ => {
                    return Err(StreamError::Io {
                        context: "error writing to datastream",
                        source: err,
                    })
                }
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        sys::data_sync(self.fd).map_err(|source| StreamError::Io {
            context: "error flushing datastream",
            source,
        })
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        let autoclose = std::mem::replace(&mut self.autoclose, false);
        debug!(fd = self.fd, autoclose, "closing file descriptor stream");
        // SAFETY: with autoclose we own the descriptor, and the flag was cleared so
        // `Drop` will not close it a second time.
        if autoclose && unsafe { libc::close(self.fd) } < 0 {
            return Err(StreamError::last_os("error closing datastream"));
        }
        Ok(())
    }
}

impl Drop for FdBackend {
    fn drop(&mut self) {
        if self.autoclose {
            // SAFETY: the backend owns the descriptor and close() was never called.
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}
