use tracing::debug;

use crate::error::{Result, StreamError};
use crate::traits::{Backend, Capabilities, Properties, Whence};

/// Compute a seek target relative to `[0, stop]` and clamp it into that range.
///
/// Memory streams never fail a seek: out-of-range targets land on the nearest end.
pub(crate) fn clamp_seek(here: usize, stop: usize, offset: i64, whence: Whence) -> usize {
    let origin = match whence {
        Whence::Set => 0i128,
        Whence::Cur => here as i128,
        Whence::End => stop as i128,
    };
    (origin + offset as i128).clamp(0, stop as i128) as usize
}

/// Copy out of `src[*here..stop]`, advancing `here`.
pub(crate) fn read_at(src: &[u8], here: &mut usize, stop: usize, buf: &mut [u8]) -> usize {
    let n = buf.len().min(stop - *here);
    buf[..n].copy_from_slice(&src[*here..*here + n]);
    *here += n;
    n
}

/// Copy into `dst[*here..stop]`, advancing `here`.
pub(crate) fn write_at(dst: &mut [u8], here: &mut usize, stop: usize, buf: &[u8]) -> usize {
    let n = buf.len().min(stop - *here);
    dst[*here..*here + n].copy_from_slice(&buf[..n]);
    *here += n;
    n
}

/// Backend over a caller-owned mutable memory region.
///
/// Reads and writes are bounded to the region; the region is never grown and
/// never freed by the stream.
#[derive(Debug)]
pub struct MemBackend<'a> {
    mem: &'a mut [u8],
    here: usize,
    readable: bool,
}

impl<'a> MemBackend<'a> {
    /// Read/write stream over `mem`. Fails on an empty region.
    pub fn new(mem: &'a mut [u8]) -> Result<Self> {
        if mem.is_empty() {
            return Err(StreamError::InvalidArgument("size"));
        }
        debug!(len = mem.len(), "wrapping memory region");
        Ok(Self {
            mem,
            here: 0,
            readable: true,
        })
    }

    /// Like [`new`](Self::new), without the read capability.
    pub fn write_only(mem: &'a mut [u8]) -> Result<Self> {
        let mut backend = Self::new(mem)?;
        backend.readable = false;
        Ok(backend)
    }
}

impl Backend for MemBackend<'_> {
    fn capabilities(&self) -> Capabilities {
        if self.readable {
            Capabilities::MEMORY
        } else {
            Capabilities::MEMORY_WRITE_ONLY
        }
    }

    fn properties(&self) -> Properties {
        Properties {
            kind: "memory",
            memory_len: Some(self.mem.len()),
            ..Properties::default()
        }
    }

    fn size(&mut self) -> Result<u64> {
        Ok(self.mem.len() as u64)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.here = clamp_seek(self.here, self.mem.len(), offset, whence);
        Ok(self.here as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stop = self.mem.len();
        Ok(read_at(&*self.mem, &mut self.here, stop, buf))
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let stop = self.mem.len();
        Ok(write_at(&mut *self.mem, &mut self.here, stop, buf))
    }

    fn memory(&self) -> Option<&[u8]> {
        Some(&*self.mem)
    }
}

/// Backend over a caller-owned immutable memory region. Has no write capability.
#[derive(Debug)]
pub struct ConstMemBackend<'a> {
    mem: &'a [u8],
    here: usize,
}

impl<'a> ConstMemBackend<'a> {
    /// Read-only stream over `mem`. Fails on an empty region.
    pub fn new(mem: &'a [u8]) -> Result<Self> {
        if mem.is_empty() {
            return Err(StreamError::InvalidArgument("size"));
        }
        debug!(len = mem.len(), "wrapping read-only memory region");
        Ok(Self { mem, here: 0 })
    }
}

impl Backend for ConstMemBackend<'_> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::MEMORY_READ_ONLY
    }

    fn properties(&self) -> Properties {
        Properties {
            kind: "const-memory",
            memory_len: Some(self.mem.len()),
            ..Properties::default()
        }
    }

    fn size(&mut self) -> Result<u64> {
        Ok(self.mem.len() as u64)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.here = clamp_seek(self.here, self.mem.len(), offset, whence);
        Ok(self.here as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(read_at(self.mem, &mut self.here, self.mem.len(), buf))
    }

    fn memory(&self) -> Option<&[u8]> {
        Some(self.mem)
    }
}
