use std::ffi::{c_void, CStr};
use std::os::raw::c_char;

use crate::error;

/// Convert a required C string argument into UTF-8 `&str`.
///
/// # Safety
/// `value` must be null or point to a valid NUL-terminated C string.
pub(crate) unsafe fn required_str_arg<'a>(
    value: *const c_char,
    name: &'static str,
) -> Option<&'a str> {
    if value.is_null() {
        error::set_invalid_argument(name);
        return None;
    }

    let as_cstr = {
        // SAFETY: The caller guarantees `value` points to a valid NUL-terminated C string.
        unsafe { CStr::from_ptr(value) }
    };

    match as_cstr.to_str() {
        Ok(v) if !v.is_empty() => Some(v),
        _ => {
            error::set_invalid_argument(name);
            None
        }
    }
}

/// Convert an optional byte pointer + length into a slice.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes for `'a`.
pub(crate) unsafe fn bytes_arg<'a>(
    data: *const c_void,
    len: usize,
    name: &'static str,
) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        error::set_invalid_argument(name);
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for `'a`.
    Some(unsafe { std::slice::from_raw_parts(data.cast::<u8>(), len) })
}

/// Mutable counterpart of [`bytes_arg`].
///
/// # Safety
/// If `len > 0`, `data` must be non-null and writable for `len` bytes for `'a`,
/// with no other live references to that memory.
pub(crate) unsafe fn bytes_arg_mut<'a>(
    data: *mut c_void,
    len: usize,
    name: &'static str,
) -> Option<&'a mut [u8]> {
    if len == 0 {
        return Some(&mut []);
    }
    if data.is_null() {
        error::set_invalid_argument(name);
        return None;
    }

    // SAFETY: Pointer and length are validated above and exclusively lent for `'a`.
    Some(unsafe { std::slice::from_raw_parts_mut(data.cast::<u8>(), len) })
}
