use tracing::{debug, trace};

use crate::error::{Result, StreamError};
use crate::mem::{clamp_seek, read_at, write_at};
use crate::traits::{Backend, Capabilities, Properties, Whence};

/// Default growth granularity for dynamic memory streams.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Growable in-memory stream that owns its buffer.
///
/// `buf.len()` is the allocated end; `stop` is the logical end of content and
/// `here` the cursor, with `here <= stop <= buf.len()` at all times. Growth
/// always reserves one byte beyond the content so a terminator fits.
#[derive(Debug)]
pub struct DynamicMemBackend {
    buf: Vec<u8>,
    here: usize,
    stop: usize,
    chunk_size: usize,
}

impl DynamicMemBackend {
    /// Empty stream; nothing is allocated until the first write.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Empty stream growing in multiples of `chunk_size` (0 means the default).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        debug!(chunk_size, "creating dynamic memory stream");
        Self {
            buf: Vec::new(),
            here: 0,
            stop: 0,
            chunk_size,
        }
    }

    /// Bytes currently allocated, including the slack past the content.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn effective_chunk_size(&self) -> usize {
        if self.chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            self.chunk_size
        }
    }

    /// Allocation length that fits `len` more bytes plus a terminator past the
    /// content, rounded up to a whole number of chunks.
    fn grown_len(&self, len: usize) -> Result<usize> {
        let chunk = self.effective_chunk_size();
        self.stop
            .checked_add(len)
            .and_then(|n| n.checked_add(1))
            .and_then(|n| n.div_ceil(chunk).checked_mul(chunk))
            .ok_or(StreamError::OutOfMemory(usize::MAX))
    }

    /// Reallocate so that `len` more bytes plus a terminator fit past the content.
    ///
    /// On failure the buffer, content and cursor are left untouched.
    fn grow(&mut self, len: usize) -> Result<()> {
        let length = self.grown_len(len)?;

        self.buf
            .try_reserve_exact(length - self.buf.len())
            .map_err(|_| StreamError::OutOfMemory(length))?;
        self.buf.resize(length, 0);

        trace!(
            content = self.stop,
            requested = len,
            allocated = length,
            "grew dynamic memory stream"
        );
        Ok(())
    }
}

impl Default for DynamicMemBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for DynamicMemBackend {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            close: true,
            ..Capabilities::MEMORY
        }
    }

    fn properties(&self) -> Properties {
        Properties {
            kind: "dynamic-memory",
            memory_len: Some(self.stop),
            chunk_size: Some(self.effective_chunk_size()),
            ..Properties::default()
        }
    }

    fn size(&mut self) -> Result<u64> {
        Ok(self.stop as u64)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.here = clamp_seek(self.here, self.stop, offset, whence);
        Ok(self.here as u64)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(read_at(&self.buf, &mut self.here, self.stop, buf))
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let len = buf.len();
        if len > self.stop - self.here {
            if len > self.buf.len() - self.here {
                self.grow(len)?;
            }
            self.stop = self.here + len;
        }
        let n = write_at(&mut self.buf, &mut self.here, self.stop, buf);
        debug_assert!(self.here <= self.stop && self.stop <= self.buf.len());
        Ok(n)
    }

    fn close(self: Box<Self>) -> Result<()> {
        debug!(
            len = self.stop,
            allocated = self.buf.len(),
            "releasing dynamic memory stream"
        );
        Ok(())
    }

    fn memory(&self) -> Option<&[u8]> {
        Some(&self.buf[..self.stop])
    }

    fn set_chunk_size(&mut self, chunk_size: usize) -> bool {
        self.chunk_size = chunk_size;
        true
    }
}
