use std::ffi::c_void;

use streamprims_io::IoStream;

pub use streamprims_io::Status as SioStatus;

/// Opaque stream handle handed across the C ABI.
pub type SioStreamHandle = *mut c_void;

pub const SIO_SEEK_SET: i32 = 0;
pub const SIO_SEEK_CUR: i32 = 1;
pub const SIO_SEEK_END: i32 = 2;

pub const SIO_STATUS_READY: SioStatus = SioStatus::Ready;
pub const SIO_STATUS_ERROR: SioStatus = SioStatus::Error;
pub const SIO_STATUS_EOF: SioStatus = SioStatus::Eof;
pub const SIO_STATUS_NOT_READY: SioStatus = SioStatus::NotReady;
pub const SIO_STATUS_READONLY: SioStatus = SioStatus::ReadOnly;
pub const SIO_STATUS_WRITEONLY: SioStatus = SioStatus::WriteOnly;

pub(crate) struct StreamHandle {
    pub(crate) stream: IoStream<'static>,
}

impl StreamHandle {
    pub(crate) fn into_raw(stream: IoStream<'static>) -> SioStreamHandle {
        Box::into_raw(Box::new(StreamHandle { stream })) as SioStreamHandle
    }

    /// Copy the stream's recorded failure, if any, into the thread-local sink.
    pub(crate) fn publish_error(&self) {
        if let Some(err) = self.stream.last_error() {
            crate::error::set_stream_error(err);
        }
    }
}

pub(crate) fn with_stream_mut<T>(
    handle: SioStreamHandle,
    on_error: T,
    f: impl FnOnce(&mut StreamHandle) -> T,
) -> T {
    if handle.is_null() {
        crate::error::set_invalid_argument("stream");
        return on_error;
    }

    let stream_handle = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *(handle as *mut StreamHandle) }
    };

    f(stream_handle)
}

/// Reclaim ownership of a handle produced by [`StreamHandle::into_raw`].
///
/// # Safety
/// `handle` must be non-null, come from this library, and not be used again.
pub(crate) unsafe fn take_stream(handle: SioStreamHandle) -> IoStream<'static> {
    // SAFETY: The caller guarantees the handle is live and uniquely owned.
    let boxed = unsafe { Box::from_raw(handle as *mut StreamHandle) };
    boxed.stream
}
