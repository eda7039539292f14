use std::time::Duration;

use bytes::Bytes;
use streamprims_io::{IoStream, Status};
use tracing::{trace, warn};

use crate::error::{BulkError, Result};

/// Initial allocation and growth step when a stream's size is unknown.
pub const DEFAULT_LOAD_CHUNK_SIZE: usize = 1024;

/// Configuration for whole-stream transfers.
#[derive(Debug, Clone)]
pub struct BulkConfig {
    /// Growth step for streams that cannot report their size. Default: 1 KiB.
    pub chunk_size: usize,
    /// Pause before retrying a transfer that reported `NotReady`. Default: 1 ms.
    pub retry_delay: Duration,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_LOAD_CHUNK_SIZE,
            retry_delay: Duration::from_millis(1),
        }
    }
}

/// Contents of a fully loaded stream.
///
/// The buffer always holds one extra zero byte past [`len`](Self::len) so it
/// can be handed to code expecting NUL-terminated data.
#[derive(Debug, Clone)]
pub struct LoadedData {
    buf: Vec<u8>,
    len: usize,
    status: Status,
}

impl LoadedData {
    /// Number of bytes loaded, excluding the terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The loaded bytes followed by the zero terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }

    /// Stream status when loading stopped: `Eof` or `Ready` for a complete
    /// load, `Error` if the stream failed part-way.
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn into_bytes(mut self) -> Bytes {
        self.buf.truncate(self.len);
        Bytes::from(self.buf)
    }

    /// Loaded bytes plus terminator, as an exactly-sized vector.
    pub fn into_vec_with_nul(mut self) -> Vec<u8> {
        self.buf.truncate(self.len + 1);
        self.buf.shrink_to_fit();
        self.buf
    }
}

impl AsRef<[u8]> for LoadedData {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Read a stream to its end with the default configuration.
pub fn load_all(stream: &mut IoStream<'_>) -> Result<LoadedData> {
    load_all_with_config(stream, &BulkConfig::default())
}

/// Read a stream to its end.
///
/// Uses the stream's size when available; otherwise the buffer starts at one
/// chunk and grows by a chunk whenever the next read could overflow it.
/// `NotReady` is waited out; any other stop is final, and whatever was read
/// so far is returned with the stream status recorded in [`LoadedData::status`].
pub fn load_all_with_config(stream: &mut IoStream<'_>, config: &BulkConfig) -> Result<LoadedData> {
    let chunk = config.chunk_size.max(1);
    let (mut size, loading_chunks) = match stream.size() {
        Ok(size) => (
            usize::try_from(size).map_err(|_| BulkError::TooLarge(size))?,
            false,
        ),
        Err(err) => {
            trace!(%err, "stream size unavailable; loading in chunks");
            (chunk, true)
        }
    };
    if size >= usize::MAX - 1 {
        return Err(BulkError::TooLarge(size as u64));
    }

    let mut data = Vec::new();
    grow_to(&mut data, size + 1)?;

    let mut total = 0usize;
    loop {
        if loading_chunks && total + chunk > size {
            size = total + chunk;
            if size >= usize::MAX - 1 {
                return Err(BulkError::TooLarge(size as u64));
            }
            grow_to(&mut data, size + 1)?;
        }

        let n = stream.read(&mut data[total..size]);
        if n > 0 {
            total += n;
            continue;
        }
        if stream.status() == Status::NotReady {
            trace!(total, "stream not ready; retrying load");
            std::thread::sleep(config.retry_delay);
            continue;
        }
        break;
    }

    data.truncate(total + 1);
    data[total] = 0;
    Ok(LoadedData {
        buf: data,
        len: total,
        status: stream.status(),
    })
}

/// [`load_all`], then close the stream whether or not loading succeeded.
pub fn load_all_then_close(mut stream: IoStream<'_>) -> Result<LoadedData> {
    let result = load_all(&mut stream);
    close_quietly(stream);
    result
}

/// Write all of `data` with the default configuration.
pub fn save_all(stream: &mut IoStream<'_>, data: &[u8]) -> Result<()> {
    save_all_with_config(stream, data, &BulkConfig::default())
}

/// Write all of `data`, resuming from the unwritten tail after short writes.
///
/// An empty buffer succeeds without touching the stream.
pub fn save_all_with_config(
    stream: &mut IoStream<'_>,
    data: &[u8],
    config: &BulkConfig,
) -> Result<()> {
    let mut written = 0usize;
    while written < data.len() {
        let n = stream.write(&data[written..]);
        if n > 0 {
            written += n;
            continue;
        }
        if stream.status() == Status::NotReady {
            trace!(written, "stream not ready; retrying save");
            std::thread::sleep(config.retry_delay);
            continue;
        }
        if let Some(err) = stream.last_error() {
            trace!(%err, written, "save stopped");
        }
        return Err(BulkError::WriteFailed {
            written,
            total: data.len(),
            status: stream.status(),
        });
    }
    Ok(())
}

/// [`save_all`], then close the stream whether or not saving succeeded.
pub fn save_all_then_close(mut stream: IoStream<'_>, data: &[u8]) -> Result<()> {
    let result = save_all(&mut stream, data);
    close_quietly(stream);
    result
}

/// Load a whole file opened in `"rb"` mode.
#[cfg(unix)]
pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<LoadedData> {
    let stream = IoStream::from_file(path, "rb")?;
    load_all_then_close(stream)
}

/// Replace a file's contents with `data`, opening it in `"wb"` mode.
#[cfg(unix)]
pub fn save_file(path: impl AsRef<std::path::Path>, data: &[u8]) -> Result<()> {
    let stream = IoStream::from_file(path, "wb")?;
    save_all_then_close(stream, data)
}

fn grow_to(data: &mut Vec<u8>, len: usize) -> Result<()> {
    data.try_reserve_exact(len.saturating_sub(data.len()))
        .map_err(|_| BulkError::OutOfMemory(len))?;
    data.resize(len, 0);
    Ok(())
}

fn close_quietly(stream: IoStream<'_>) {
    if let Err(err) = stream.close() {
        warn!(%err, "failed to close stream after bulk transfer");
    }
}
