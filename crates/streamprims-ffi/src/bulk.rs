use std::ffi::c_void;

use streamprims_codec::{load_all, load_all_then_close, save_all, save_all_then_close, BulkError};
use streamprims_io::StreamError;

use crate::args;
use crate::error;
use crate::types::{take_stream, with_stream_mut, SioStreamHandle};

/// Load the rest of the stream into a new buffer.
///
/// The buffer holds `*datasize` bytes followed by a zero terminator and must
/// be released with [`sio_free_data`]. With `closeio` the stream is closed and
/// the handle freed whether or not loading succeeds.
///
/// # Safety
/// `stream` must be null or a live handle; `datasize` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn sio_load_file_io(
    stream: SioStreamHandle,
    datasize: *mut usize,
    closeio: bool,
) -> *mut c_void {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();
        if !datasize.is_null() {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe { *datasize = 0 };
        }
        if stream.is_null() {
            error::set_invalid_argument("src");
            return std::ptr::null_mut();
        }

        let loaded = if closeio {
            // SAFETY: Pointer validity is guaranteed by the caller; the handle
            // is consumed here.
            load_all_then_close(unsafe { take_stream(stream) })
        } else {
            let missing = Err(BulkError::from(StreamError::InvalidArgument("src")));
            with_stream_mut(stream, missing, |h| {
                let loaded = load_all(&mut h.stream);
                h.publish_error();
                loaded
            })
        };

        match loaded {
            Ok(data) => {
                if !datasize.is_null() {
                    // SAFETY: Pointer validity is guaranteed by the caller.
                    unsafe { *datasize = data.len() };
                }
                Box::into_raw(data.into_vec_with_nul().into_boxed_slice()) as *mut u8 as *mut c_void
            }
            Err(err) => {
                error::set_bulk_error(&err);
                std::ptr::null_mut()
            }
        }
    })
}

/// Release a buffer returned by [`sio_load_file_io`].
///
/// # Safety
/// `data` must be null or a pointer from `sio_load_file_io` whose reported
/// size was `datasize`; it must not be freed twice.
#[no_mangle]
pub unsafe extern "C" fn sio_free_data(data: *mut c_void, datasize: usize) {
    crate::ffi_boundary((), || {
        if data.is_null() {
            return;
        }
        let slice = std::ptr::slice_from_raw_parts_mut(data as *mut u8, datasize + 1);
        // SAFETY: The buffer was allocated by `sio_load_file_io` as a boxed
        // slice of `datasize + 1` bytes.
        unsafe { drop(Box::from_raw(slice)) };
    });
}

/// Write all `datasize` bytes of `data`, retrying while the stream is not ready.
///
/// With `closeio` the stream is closed and the handle freed in every case.
///
/// # Safety
/// `stream` must be null or a live handle; `data` must be readable for
/// `datasize` bytes.
#[no_mangle]
pub unsafe extern "C" fn sio_save_file_io(
    stream: SioStreamHandle,
    data: *const c_void,
    datasize: usize,
    closeio: bool,
) -> bool {
    crate::ffi_boundary(false, || {
        error::clear_error_state();
        if stream.is_null() {
            error::set_invalid_argument("src");
            return false;
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let bytes = unsafe { args::bytes_arg(data, datasize, "data") };

        let result = match (bytes, closeio) {
            (Some(bytes), true) => {
                // SAFETY: Pointer validity is guaranteed by the caller; the
                // handle is consumed here.
                save_all_then_close(unsafe { take_stream(stream) }, bytes)
            }
            (Some(bytes), false) => with_stream_mut(stream, Ok(()), |h| {
                let result = save_all(&mut h.stream, bytes);
                h.publish_error();
                result
            }),
            (None, true) => {
                // SAFETY: As above; the stream is still closed on bad input.
                let _ = unsafe { take_stream(stream) }.close();
                return false;
            }
            (None, false) => return false,
        };

        match result {
            Ok(()) => true,
            Err(err) => {
                error::set_bulk_error(&err);
                false
            }
        }
    })
}
