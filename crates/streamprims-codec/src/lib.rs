//! Scalar codecs and bulk transfer over streamprims streams.
//!
//! - [`endian`]: fixed-width little/big-endian integer reads and writes
//! - [`bulk`]: load an entire stream into memory, or write a buffer out in full
//!
//! Both layers are stateless and use only the public [`IoStream`] API.
//!
//! [`IoStream`]: streamprims_io::IoStream

pub mod bulk;
pub mod endian;
pub mod error;

pub use bulk::{
    load_all, load_all_then_close, load_all_with_config, save_all, save_all_then_close,
    save_all_with_config, BulkConfig, LoadedData, DEFAULT_LOAD_CHUNK_SIZE,
};
#[cfg(unix)]
pub use bulk::{load_file, save_file};
pub use endian::EndianExt;
pub use error::{BulkError, Result};
