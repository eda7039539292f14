//! Thin libc helpers shared by the descriptor and stdio backends.

use std::io::ErrorKind;
use std::mem::MaybeUninit;
use std::os::fd::RawFd;

/// Flush file data to the device with the platform's data-sync primitive.
///
/// Retries on `EINTR`.
pub(crate) fn data_sync(fd: RawFd) -> std::io::Result<()> {
    loop {
        let rc = sync_once(fd);
        if rc == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

// Apple's fdatasync symbol is an incompatible system call; F_FULLFSYNC is the equivalent.
#[cfg(any(target_os = "macos", target_os = "ios"))]
fn sync_once(fd: RawFd) -> libc::c_int {
    // SAFETY: `fd` is an open descriptor owned or borrowed by the calling backend.
    unsafe { libc::fcntl(fd, libc::F_FULLFSYNC) }
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd"
))]
fn sync_once(fd: RawFd) -> libc::c_int {
    // SAFETY: `fd` is an open descriptor owned or borrowed by the calling backend.
    unsafe { libc::fdatasync(fd) }
}

#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd"
)))]
fn sync_once(fd: RawFd) -> libc::c_int {
    // SAFETY: `fd` is an open descriptor owned or borrowed by the calling backend.
    unsafe { libc::fsync(fd) }
}

fn file_mode(fd: RawFd) -> Option<libc::mode_t> {
    let mut st = MaybeUninit::<libc::stat>::uninit();
    // SAFETY: `st` is a valid writable out-pointer for a `struct stat`.
    let rc = unsafe { libc::fstat(fd, st.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: fstat succeeded and initialized the buffer.
    Some(unsafe { st.assume_init() }.st_mode)
}

pub(crate) fn is_regular_file(fd: RawFd) -> bool {
    file_mode(fd).is_some_and(|mode| mode & libc::S_IFMT == libc::S_IFREG)
}

pub(crate) fn is_regular_file_or_pipe(fd: RawFd) -> bool {
    file_mode(fd).is_some_and(|mode| {
        let fmt = mode & libc::S_IFMT;
        fmt == libc::S_IFREG || fmt == libc::S_IFIFO
    })
}

pub(crate) fn raw_whence(whence: crate::Whence) -> libc::c_int {
    match whence {
        crate::Whence::Set => libc::SEEK_SET,
        crate::Whence::Cur => libc::SEEK_CUR,
        crate::Whence::End => libc::SEEK_END,
    }
}
