use std::ffi::c_void;
use std::os::raw::{c_char, c_int};

use streamprims_io::{IoStream, StreamError, Whence};

use crate::args;
use crate::error;
use crate::types::{take_stream, with_stream_mut, SioStatus, SioStreamHandle, StreamHandle};

fn position_or_error(result: streamprims_io::Result<u64>) -> i64 {
    match result.and_then(|pos| i64::try_from(pos).map_err(|_| StreamError::SeekOutOfRange)) {
        Ok(pos) => pos,
        Err(err) => {
            error::set_stream_error(&err);
            -1
        }
    }
}

/// Wrap an OS file descriptor.
///
/// # Safety
/// `fd` must be an open descriptor. With `autoclose` the returned stream
/// takes ownership and closes it; otherwise it must outlive the stream.
#[cfg(unix)]
#[no_mangle]
pub unsafe extern "C" fn sio_from_fd(fd: c_int, autoclose: bool) -> SioStreamHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();
        if fd < 0 {
            error::set_invalid_argument("fd");
            return std::ptr::null_mut();
        }

        // SAFETY: Descriptor validity and ownership are guaranteed by the caller.
        let backend = unsafe { streamprims_io::FdBackend::from_raw_fd(fd, autoclose) };
        StreamHandle::into_raw(IoStream::new(backend))
    })
}

/// Wrap a C `FILE*`.
///
/// # Safety
/// `fp` must be null or an open `FILE*`. With `autoclose` the returned stream
/// takes ownership and `fclose`s it; otherwise it must outlive the stream.
#[cfg(unix)]
#[no_mangle]
pub unsafe extern "C" fn sio_from_fp(fp: *mut libc::FILE, autoclose: bool) -> SioStreamHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();
        let Some(fp) = std::ptr::NonNull::new(fp) else {
            error::set_invalid_argument("fp");
            return std::ptr::null_mut();
        };

        // SAFETY: `fp` validity and ownership are guaranteed by the caller.
        let backend = unsafe { streamprims_io::StdioBackend::from_raw(fp, autoclose) };
        StreamHandle::into_raw(IoStream::new(backend))
    })
}

/// Open `file` with a `fopen`-style `mode`.
///
/// # Safety
/// `file` and `mode` must be null or valid NUL-terminated C strings.
#[cfg(unix)]
#[no_mangle]
pub unsafe extern "C" fn sio_from_file(
    file: *const c_char,
    mode: *const c_char,
) -> SioStreamHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();
        // SAFETY: Pointer validity is guaranteed by the caller.
        let Some(file) = (unsafe { args::required_str_arg(file, "file") }) else {
            return std::ptr::null_mut();
        };
        // SAFETY: Pointer validity is guaranteed by the caller.
        let Some(mode) = (unsafe { args::required_str_arg(mode, "mode") }) else {
            return std::ptr::null_mut();
        };

        match IoStream::from_file(file, mode) {
            Ok(stream) => StreamHandle::into_raw(stream),
            Err(err) => {
                error::set_stream_error(&err);
                std::ptr::null_mut()
            }
        }
    })
}

/// Use `size` bytes at `mem` as a read/write stream.
///
/// # Safety
/// `mem` must be writable for `size` bytes until the stream is closed, and
/// must not be accessed through other paths meanwhile.
#[no_mangle]
pub unsafe extern "C" fn sio_from_mem(mem: *mut c_void, size: usize) -> SioStreamHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();
        if mem.is_null() {
            error::set_invalid_argument("mem");
            return std::ptr::null_mut();
        }
        if size == 0 {
            error::set_invalid_argument("size");
            return std::ptr::null_mut();
        }
        // SAFETY: The caller lends the region for the lifetime of the handle.
        let Some(region) = (unsafe { args::bytes_arg_mut(mem, size, "mem") }) else {
            return std::ptr::null_mut();
        };

        match IoStream::from_mem(region) {
            Ok(stream) => StreamHandle::into_raw(stream),
            Err(err) => {
                error::set_stream_error(&err);
                std::ptr::null_mut()
            }
        }
    })
}

/// Use `size` bytes at `mem` as a read-only stream.
///
/// # Safety
/// `mem` must be readable for `size` bytes until the stream is closed.
#[no_mangle]
pub unsafe extern "C" fn sio_from_const_mem(mem: *const c_void, size: usize) -> SioStreamHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();
        if mem.is_null() {
            error::set_invalid_argument("mem");
            return std::ptr::null_mut();
        }
        if size == 0 {
            error::set_invalid_argument("size");
            return std::ptr::null_mut();
        }
        // SAFETY: The caller lends the region for the lifetime of the handle.
        let Some(region) = (unsafe { args::bytes_arg(mem, size, "mem") }) else {
            return std::ptr::null_mut();
        };

        match IoStream::from_const_mem(region) {
            Ok(stream) => StreamHandle::into_raw(stream),
            Err(err) => {
                error::set_stream_error(&err);
                std::ptr::null_mut()
            }
        }
    })
}

#[no_mangle]
pub extern "C" fn sio_from_dynamic_mem() -> SioStreamHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();
        StreamHandle::into_raw(IoStream::from_dynamic_mem())
    })
}

/// Close the stream and free the handle. The handle is invalid afterwards,
/// even when this reports failure.
///
/// # Safety
/// `stream` must be null or a live handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn sio_close(stream: SioStreamHandle) -> bool {
    crate::ffi_boundary(false, || {
        error::clear_error_state();
        if stream.is_null() {
            error::set_invalid_argument("stream");
            return false;
        }

        // SAFETY: Pointer validity is guaranteed by the caller.
        let stream = unsafe { take_stream(stream) };
        match stream.close() {
            Ok(()) => true,
            Err(err) => {
                error::set_stream_error(&err);
                false
            }
        }
    })
}

/// # Safety
/// `stream` must be null or a live handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn sio_get_status(stream: SioStreamHandle) -> SioStatus {
    crate::ffi_boundary(SioStatus::Error, || {
        with_stream_mut(stream, SioStatus::Error, |h| h.stream.status())
    })
}

/// Total size in bytes, or -1 if it cannot be determined.
///
/// # Safety
/// `stream` must be null or a live handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn sio_get_size(stream: SioStreamHandle) -> i64 {
    crate::ffi_boundary(-1, || {
        error::clear_error_state();
        with_stream_mut(stream, -1, |h| position_or_error(h.stream.size()))
    })
}

/// Move the cursor; returns the new position or -1.
///
/// # Safety
/// `stream` must be null or a live handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn sio_seek(stream: SioStreamHandle, offset: i64, whence: c_int) -> i64 {
    crate::ffi_boundary(-1, || {
        error::clear_error_state();
        with_stream_mut(stream, -1, |h| {
            let result = Whence::try_from(whence).and_then(|whence| h.stream.seek(offset, whence));
            position_or_error(result)
        })
    })
}

/// # Safety
/// `stream` must be null or a live handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn sio_tell(stream: SioStreamHandle) -> i64 {
    crate::ffi_boundary(-1, || {
        error::clear_error_state();
        with_stream_mut(stream, -1, |h| position_or_error(h.stream.tell()))
    })
}

/// Read up to `size` bytes into `ptr`. On a short count, `sio_get_status`
/// tells end-of-file from not-ready and error.
///
/// # Safety
/// `stream` must be null or a live handle; `ptr` must be writable for `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn sio_read(stream: SioStreamHandle, ptr: *mut c_void, size: usize) -> usize {
    crate::ffi_boundary(0, || {
        error::clear_error_state();
        with_stream_mut(stream, 0, |h| {
            // SAFETY: Pointer validity is guaranteed by the caller.
            let Some(buf) = (unsafe { args::bytes_arg_mut(ptr, size, "ptr") }) else {
                return 0;
            };
            let n = h.stream.read(buf);
            h.publish_error();
            n
        })
    })
}

/// Write up to `size` bytes from `ptr`.
///
/// # Safety
/// `stream` must be null or a live handle; `ptr` must be readable for `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn sio_write(
    stream: SioStreamHandle,
    ptr: *const c_void,
    size: usize,
) -> usize {
    crate::ffi_boundary(0, || {
        error::clear_error_state();
        with_stream_mut(stream, 0, |h| {
            // SAFETY: Pointer validity is guaranteed by the caller.
            let Some(buf) = (unsafe { args::bytes_arg(ptr, size, "ptr") }) else {
                return 0;
            };
            let n = h.stream.write(buf);
            h.publish_error();
            n
        })
    })
}

/// # Safety
/// `stream` must be null or a live handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn sio_flush(stream: SioStreamHandle) -> bool {
    crate::ffi_boundary(false, || {
        error::clear_error_state();
        with_stream_mut(stream, false, |h| match h.stream.flush() {
            Ok(()) => true,
            Err(err) => {
                error::set_stream_error(&err);
                false
            }
        })
    })
}

/// Borrow the contents of a memory-backed stream.
///
/// The pointer is valid until the next write, chunk-size change or close.
/// Returns null for other backends.
///
/// # Safety
/// `stream` must be null or a live handle; `len` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn sio_get_memory(stream: SioStreamHandle, len: *mut usize) -> *const u8 {
    crate::ffi_boundary(std::ptr::null(), || {
        error::clear_error_state();
        if !len.is_null() {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe { *len = 0 };
        }
        with_stream_mut(stream, std::ptr::null(), |h| match h.stream.memory() {
            Some(memory) => {
                if !len.is_null() {
                    // SAFETY: Pointer validity is guaranteed by the caller.
                    unsafe { *len = memory.len() };
                }
                memory.as_ptr()
            }
            None => {
                error::set_stream_error(&StreamError::Unsupported);
                std::ptr::null()
            }
        })
    })
}

/// Set the growth granularity of a dynamic memory stream. 0 restores the default.
///
/// # Safety
/// `stream` must be null or a live handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn sio_set_chunk_size(stream: SioStreamHandle, chunk_size: usize) -> bool {
    crate::ffi_boundary(false, || {
        error::clear_error_state();
        with_stream_mut(stream, false, |h| {
            let applied = h.stream.set_chunk_size(chunk_size);
            if !applied {
                error::set_stream_error(&StreamError::Unsupported);
            }
            applied
        })
    })
}
