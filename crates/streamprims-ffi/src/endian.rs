use streamprims_codec::EndianExt;

use crate::error;
use crate::types::{with_stream_mut, SioStreamHandle};

macro_rules! endian_exports {
    ($($read_fn:ident, $write_fn:ident, $read:ident, $write:ident, $ty:ty;)*) => {
        $(
            /// Decode one value into `*value`; on a short read `*value` is 0.
            ///
            /// # Safety
            /// `stream` must be null or a live handle; `value` must be null or writable.
            #[no_mangle]
            pub unsafe extern "C" fn $read_fn(stream: SioStreamHandle, value: *mut $ty) -> bool {
                crate::ffi_boundary(false, || {
                    error::clear_error_state();
                    let decoded = with_stream_mut(stream, None, |h| {
                        let decoded = h.stream.$read();
                        h.publish_error();
                        decoded
                    });
                    if !value.is_null() {
                        // SAFETY: Pointer validity is guaranteed by the caller.
                        unsafe { *value = decoded.unwrap_or(0) };
                    }
                    decoded.is_some()
                })
            }

            /// # Safety
            /// `stream` must be null or a live handle returned by this library.
            #[no_mangle]
            pub unsafe extern "C" fn $write_fn(stream: SioStreamHandle, value: $ty) -> bool {
                crate::ffi_boundary(false, || {
                    error::clear_error_state();
                    with_stream_mut(stream, false, |h| {
                        let ok = h.stream.$write(value);
                        h.publish_error();
                        ok
                    })
                })
            }
        )*
    };
}

endian_exports! {
    sio_read_u8, sio_write_u8, read_u8, write_u8, u8;
    sio_read_s8, sio_write_s8, read_s8, write_s8, i8;
    sio_read_u16_le, sio_write_u16_le, read_u16_le, write_u16_le, u16;
    sio_read_s16_le, sio_write_s16_le, read_s16_le, write_s16_le, i16;
    sio_read_u16_be, sio_write_u16_be, read_u16_be, write_u16_be, u16;
    sio_read_s16_be, sio_write_s16_be, read_s16_be, write_s16_be, i16;
    sio_read_u32_le, sio_write_u32_le, read_u32_le, write_u32_le, u32;
    sio_read_s32_le, sio_write_s32_le, read_s32_le, write_s32_le, i32;
    sio_read_u32_be, sio_write_u32_be, read_u32_be, write_u32_be, u32;
    sio_read_s32_be, sio_write_s32_be, read_s32_be, write_s32_be, i32;
    sio_read_u64_le, sio_write_u64_le, read_u64_le, write_u64_le, u64;
    sio_read_s64_le, sio_write_s64_le, read_s64_le, write_s64_le, i64;
    sio_read_u64_be, sio_write_u64_be, read_u64_be, write_u64_be, u64;
    sio_read_s64_be, sio_write_s64_be, read_s64_be, write_s64_be, i64;
}
