//! Named pipe helpers for the analyzer's output stream.
//!
//! The read end is opened non-blocking so the tick loop never stalls on a
//! silent analyzer. Reads report would-block as a regular outcome instead
//! of an error, keeping the caller's loop flat.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Result of a single non-blocking read.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n` bytes were read into the buffer.
    Data(usize),
    /// No data available right now.
    WouldBlock,
    /// The write end was closed.
    Closed,
}

fn to_cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))
}

/// Create a fresh fifo at `path`, replacing whatever is left there from a
/// previous run.
pub(crate) fn create(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    let c_path = to_cstring(path)?;
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) };
    if rc == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::EEXIST) {
        tracing::info!(path = %path.display(), "reusing existing fifo");
        return Ok(());
    }
    Err(err)
}

/// Open the read end without blocking on a missing writer.
pub(crate) fn open_read_nonblocking(path: &Path) -> io::Result<OwnedFd> {
    let c_path = to_cstring(path)?;
    let fd = unsafe {
        libc::open(
            c_path.as_ptr(),
            libc::O_RDONLY | libc::O_NONBLOCK | libc::O_CLOEXEC,
        )
    };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Open the write end for handing to the analyzer process.
///
/// Only valid once a reader exists, otherwise the open blocks.
pub(crate) fn open_write(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).open(path)
}

/// Read at most `buf.len()` bytes from the non-blocking fifo.
pub fn read_some(fd: &OwnedFd, buf: &mut [u8]) -> io::Result<ReadOutcome> {
    loop {
        let rc = unsafe {
            libc::read(fd.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len())
        };
        if rc > 0 {
            return Ok(ReadOutcome::Data(rc as usize));
        }
        if rc == 0 {
            return Ok(ReadOutcome::Closed);
        }
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EAGAIN) => return Ok(ReadOutcome::WouldBlock),
            Some(libc::EINTR) => continue,
            _ => return Err(err),
        }
    }
}
