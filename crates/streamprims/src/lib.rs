//! Backend-polymorphic binary I/O streams.
//!
//! streamprims puts file descriptors, C `FILE*` handles, caller-owned memory
//! and growable buffers behind one stream handle, with fixed-width endian
//! codecs and whole-stream load/save helpers on top.
//!
//! # Crate Structure
//!
//! - [`io`]: the stream handle, status model and backends
//! - [`codec`]: endian integer codecs and bulk transfer
//!
//! ```
//! use streamprims::codec::{load_all, EndianExt};
//! use streamprims::io::{IoStream, Whence};
//!
//! let mut stream = IoStream::from_dynamic_mem();
//! assert!(stream.write_u32_be(0xCAFE_F00D));
//! stream.seek(0, Whence::Set).unwrap();
//! let loaded = load_all(&mut stream).unwrap();
//! assert_eq!(loaded.as_bytes(), &[0xCA, 0xFE, 0xF0, 0x0D]);
//! ```

/// Re-export stream handle and backend types.
pub mod io {
    pub use streamprims_io::*;
}

/// Re-export endian and bulk helpers.
pub mod codec {
    pub use streamprims_codec::*;
}

pub use streamprims_codec::{BulkConfig, EndianExt, LoadedData};
pub use streamprims_io::{IoStream, Status, Whence};
