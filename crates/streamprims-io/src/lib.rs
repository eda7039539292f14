//! Backend-polymorphic binary I/O streams.
//!
//! One handle type, [`IoStream`], fronts interchangeable backends:
//! - [`FdBackend`]: a raw OS file descriptor (Unix)
//! - [`StdioBackend`]: a buffered C `FILE*` (Unix)
//! - [`MemBackend`] / [`ConstMemBackend`]: a fixed caller-owned region
//! - [`DynamicMemBackend`]: a growable buffer owned by the stream
//!
//! This is the lowest layer of streamprims. The endian codecs and bulk
//! helpers in `streamprims-codec` are built on the handle API exported here.

pub mod dynamic;
pub mod error;
pub mod mem;
pub mod status;
pub mod stream;
pub mod traits;

#[cfg(unix)]
pub mod fd;
#[cfg(unix)]
pub mod stdio;
#[cfg(unix)]
mod sys;

pub use dynamic::{DynamicMemBackend, DEFAULT_CHUNK_SIZE};
pub use error::{Result, StreamError};
pub use mem::{ConstMemBackend, MemBackend};
pub use status::Status;
pub use stream::IoStream;
pub use traits::{Backend, Capabilities, Properties, Whence};

#[cfg(unix)]
pub use fd::FdBackend;
#[cfg(unix)]
pub use stdio::StdioBackend;
