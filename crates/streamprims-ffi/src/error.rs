use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use streamprims_codec::BulkError;
use streamprims_io::StreamError;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| *state.borrow_mut() = CString::default());
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let sanitized = message.into().replace('\0', "?");
    let text = CString::new(sanitized).unwrap_or_default();
    LAST_ERROR.with(|state| *state.borrow_mut() = text);
}

/// Record that the parameter called `name` was null or otherwise unusable.
pub(crate) fn set_invalid_argument(name: &'static str) {
    set_stream_error(&StreamError::InvalidArgument(name));
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn set_stream_error(err: &StreamError) {
    set_error_message(err.to_string());
}

pub(crate) fn set_bulk_error(err: &BulkError) {
    set_error_message(err.to_string());
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}
