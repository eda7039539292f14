//! streamprims-ffi: C-ABI exports for streamprims streams.
//!
//! Every export validates its handle, runs inside a panic boundary, and
//! leaves a human-readable message in a thread-local sink on failure
//! (read it with [`sio_last_error`]).

mod args;
mod bulk;
mod endian;
mod error;
mod stream;
mod types;

use std::panic::AssertUnwindSafe;

pub use bulk::{sio_free_data, sio_load_file_io, sio_save_file_io};
pub use endian::*;
pub use stream::{
    sio_close, sio_flush, sio_from_const_mem, sio_from_dynamic_mem, sio_from_mem, sio_get_memory,
    sio_get_size, sio_get_status, sio_read, sio_seek, sio_set_chunk_size, sio_tell, sio_write,
};
#[cfg(unix)]
pub use stream::{sio_from_fd, sio_from_file, sio_from_fp};
pub use types::{
    SioStatus, SioStreamHandle, SIO_SEEK_CUR, SIO_SEEK_END, SIO_SEEK_SET, SIO_STATUS_EOF,
    SIO_STATUS_ERROR, SIO_STATUS_NOT_READY, SIO_STATUS_READONLY, SIO_STATUS_READY,
    SIO_STATUS_WRITEONLY,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Message describing the most recent failure on this thread; empty if none.
#[no_mangle]
pub extern "C" fn sio_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

#[no_mangle]
pub extern "C" fn sio_clear_error() {
    ffi_boundary((), error::clear_error_state);
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_void, CStr, CString};

    use super::*;

    fn last_error() -> String {
        let ptr = sio_last_error();
        assert!(!ptr.is_null());
        // SAFETY: sio_last_error returns a pointer to a thread-local CString.
        unsafe { CStr::from_ptr(ptr).to_str().unwrap().to_owned() }
    }

    #[test]
    fn last_error_starts_empty_and_clears() {
        sio_clear_error();
        assert!(last_error().is_empty());
        // SAFETY: Null handles are rejected before any dereference.
        assert_eq!(unsafe { sio_tell(std::ptr::null_mut()) }, -1);
        assert!(!last_error().is_empty());
        sio_clear_error();
        assert!(last_error().is_empty());
    }

    #[test]
    fn null_handles_are_invalid_arguments() {
        let null = std::ptr::null_mut();
        let mut byte = 0u8;
        let mut value = 7u32;
        // SAFETY: Null handles are rejected before any dereference.
        unsafe {
            assert_eq!(sio_get_status(null), SIO_STATUS_ERROR);
            assert_eq!(sio_get_size(null), -1);
            assert_eq!(sio_seek(null, 0, SIO_SEEK_SET), -1);
            assert_eq!(sio_read(null, (&mut byte as *mut u8).cast(), 1), 0);
            assert_eq!(sio_write(null, (&byte as *const u8).cast(), 1), 0);
            assert!(!sio_flush(null));
            assert!(!sio_set_chunk_size(null, 16));
            assert!(!sio_read_u32_le(null, &mut value));
            assert_eq!(value, 0);
            assert!(!sio_write_u16_be(null, 1));
            assert!(!sio_close(null));
        }
        assert!(last_error().contains("invalid argument"));
    }

    #[test]
    fn memory_constructors_reject_null_and_empty_regions() {
        let mut region = [0u8; 4];
        // SAFETY: Invalid arguments are rejected before the region is used.
        unsafe {
            assert!(sio_from_mem(std::ptr::null_mut(), 4).is_null());
            assert!(last_error().contains("mem"));
            assert!(sio_from_mem(region.as_mut_ptr().cast(), 0).is_null());
            assert!(last_error().contains("size"));
            assert!(sio_from_const_mem(std::ptr::null(), 4).is_null());
            assert!(sio_from_const_mem(region.as_ptr().cast(), 0).is_null());
        }
    }

    #[test]
    fn dynamic_stream_round_trip() {
        let stream = sio_from_dynamic_mem();
        assert!(!stream.is_null());
        let text = b"hello, stream";

        // SAFETY: `stream` is live until sio_close and buffers are sized correctly.
        unsafe {
            assert_eq!(sio_write(stream, text.as_ptr().cast(), text.len()), text.len());
            assert!(sio_write_u32_be(stream, 0x0102_0304));
            assert_eq!(sio_get_size(stream), 17);

            let mut len = 0usize;
            let memory = sio_get_memory(stream, &mut len);
            assert_eq!(len, 17);
            let contents = std::slice::from_raw_parts(memory, len);
            assert_eq!(&contents[..13], text);
            assert_eq!(&contents[13..], &[1, 2, 3, 4]);

            assert_eq!(sio_seek(stream, 0, SIO_SEEK_SET), 0);
            let mut out = [0u8; 13];
            assert_eq!(sio_read(stream, out.as_mut_ptr().cast(), out.len()), 13);
            assert_eq!(&out, text);
            let mut value = 0u32;
            assert!(sio_read_u32_be(stream, &mut value));
            assert_eq!(value, 0x0102_0304);

            assert_eq!(sio_read(stream, out.as_mut_ptr().cast(), 1), 0);
            assert_eq!(sio_get_status(stream), SIO_STATUS_EOF);
            assert!(sio_close(stream));
        }
    }

    #[test]
    fn unknown_whence_is_reported() {
        let stream = sio_from_dynamic_mem();
        // SAFETY: `stream` is live until sio_close.
        unsafe {
            assert_eq!(sio_seek(stream, 0, 42), -1);
            assert_eq!(last_error(), "unknown whence");
            assert_eq!(sio_seek(stream, 0, SIO_SEEK_END), 0);
            assert!(sio_close(stream));
        }
    }

    #[test]
    fn const_memory_is_read_only() {
        let data = [1u8, 2, 3];
        // SAFETY: `data` outlives the stream, which is closed before return.
        unsafe {
            let stream = sio_from_const_mem(data.as_ptr().cast(), data.len());
            assert!(!stream.is_null());
            assert!(!sio_write_u8(stream, 9));
            assert_eq!(sio_get_status(stream), SIO_STATUS_READONLY);
            assert_eq!(last_error(), "stream is read-only");

            let mut value = 0u16;
            assert!(sio_read_u16_le(stream, &mut value));
            assert_eq!(value, 0x0201);
            let mut len = 0usize;
            let memory = sio_get_memory(stream, &mut len);
            assert!(!memory.is_null());
            assert_eq!(len, 3);
            assert_eq!(std::slice::from_raw_parts(memory, len), &data);
            assert!(!sio_set_chunk_size(stream, 8));
            assert!(sio_close(stream));
        }
    }

    #[test]
    fn fixed_memory_clamps_writes() {
        let mut region = [0u8; 4];
        // SAFETY: `region` outlives the stream, which is closed before return.
        unsafe {
            let stream = sio_from_mem(region.as_mut_ptr().cast(), region.len());
            let data = b"abcdef";
            assert_eq!(sio_write(stream, data.as_ptr().cast(), data.len()), 4);
            assert_eq!(sio_tell(stream), 4);
            assert!(sio_close(stream));
        }
        assert_eq!(&region, b"abcd");
    }

    #[test]
    fn load_file_io_returns_terminated_buffer() {
        let stream = sio_from_dynamic_mem();
        let text = b"payload";
        // SAFETY: `stream` is consumed by the closeio load; the buffer is freed once.
        unsafe {
            sio_write(stream, text.as_ptr().cast(), text.len());
            sio_seek(stream, 0, SIO_SEEK_SET);

            let mut size = usize::MAX;
            let data = sio_load_file_io(stream, &mut size, true);
            assert!(!data.is_null());
            assert_eq!(size, text.len());
            let bytes = std::slice::from_raw_parts(data as *const u8, size + 1);
            assert_eq!(&bytes[..size], text);
            assert_eq!(bytes[size], 0);
            sio_free_data(data, size);
        }
    }

    #[test]
    fn load_file_io_rejects_null_source() {
        let mut size = 99usize;
        // SAFETY: Null handles are rejected before any dereference.
        let data = unsafe { sio_load_file_io(std::ptr::null_mut(), &mut size, true) };
        assert!(data.is_null());
        assert_eq!(size, 0);
        assert!(last_error().contains("src"));
    }

    #[test]
    fn save_file_io_writes_everything() {
        let stream = sio_from_dynamic_mem();
        let text = vec![b'x'; 5000];
        // SAFETY: `stream` is live until sio_close.
        unsafe {
            assert!(sio_save_file_io(stream, text.as_ptr().cast(), text.len(), false));
            assert_eq!(sio_get_size(stream), 5000);
            assert!(sio_save_file_io(stream, std::ptr::null::<c_void>(), 0, true));
        }
    }

    #[test]
    fn save_file_io_reports_short_region() {
        let mut region = [0u8; 2];
        // SAFETY: `region` outlives the stream, which is closed by the call.
        unsafe {
            let stream = sio_from_mem(region.as_mut_ptr().cast(), region.len());
            let text = b"abc";
            assert!(!sio_save_file_io(stream, text.as_ptr().cast(), text.len(), true));
        }
        assert!(last_error().contains("2 of 3"));
    }

    #[cfg(unix)]
    #[test]
    fn file_stream_round_trip() {
        let path = std::env::temp_dir().join(format!("streamprims-ffi-{}", std::process::id()));
        let c_path = CString::new(path.to_str().unwrap()).unwrap();
        let text = b"on disk";

        // SAFETY: C strings and buffers are valid for the duration of each call.
        unsafe {
            let writer = sio_from_file(c_path.as_ptr(), c"wb".as_ptr());
            assert!(!writer.is_null());
            assert_eq!(sio_write(writer, text.as_ptr().cast(), text.len()), text.len());
            assert!(sio_flush(writer));
            assert!(sio_close(writer));

            let reader = sio_from_file(c_path.as_ptr(), c"rb".as_ptr());
            assert_eq!(sio_get_size(reader), text.len() as i64);
            let mut size = 0usize;
            let data = sio_load_file_io(reader, &mut size, true);
            assert_eq!(std::slice::from_raw_parts(data as *const u8, size), text);
            sio_free_data(data, size);

            assert!(sio_from_file(std::ptr::null(), c"rb".as_ptr()).is_null());
            assert!(last_error().contains("file"));
            assert!(sio_from_file(c_path.as_ptr(), std::ptr::null()).is_null());
            assert!(last_error().contains("mode"));
        }
        std::fs::remove_file(path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn descriptor_stream_without_autoclose() {
        let mut fds = [0; 2];
        // SAFETY: `fds` has room for the two descriptors pipe(2) returns.
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);

        // SAFETY: Descriptors stay open for the lifetime of both streams.
        unsafe {
            let writer = sio_from_fd(fds[1], false);
            let reader = sio_from_fd(fds[0], true);
            assert!(sio_write_u16_le(writer, 0xBEEF));
            assert!(sio_close(writer));
            assert_eq!(libc::close(fds[1]), 0);

            let mut value = 0u16;
            assert!(sio_read_u16_le(reader, &mut value));
            assert_eq!(value, 0xBEEF);
            assert_eq!(sio_get_size(reader), -1);
            assert!(sio_get_memory(reader, std::ptr::null_mut()).is_null());
            assert!(sio_close(reader));

            assert!(sio_from_fd(-1, false).is_null());
            assert!(sio_from_fp(std::ptr::null_mut(), false).is_null());
        }
    }
}
