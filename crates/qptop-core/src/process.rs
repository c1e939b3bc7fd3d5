//! OS process table access for the refresh trigger.
//!
//! Kept behind [`ProcessControl`] so the trigger can be exercised without
//! signalling real processes.
#![allow(unsafe_code)]

use std::io;

/// The three operations the refresh trigger needs from the OS.
pub trait ProcessControl {
    /// Whether `pid` currently exists in the process table.
    fn is_running(&self, pid: i32) -> bool;

    /// Ask `pid` to rewrite its snapshot (SIGUSR1).
    fn signal_refresh(&self, pid: i32) -> io::Result<()>;

    /// Flush dirty file data to storage.
    fn sync_storage(&self);
}

/// [`ProcessControl`] backed by the host OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcess;

#[cfg(unix)]
impl ProcessControl for SystemProcess {
    fn is_running(&self, pid: i32) -> bool {
        if cfg!(target_os = "linux") {
            return std::path::Path::new(&format!("/proc/{pid}")).exists();
        }
        // SAFETY: signal 0 performs only the existence and permission check;
        // no signal is delivered and no memory is touched.
        let rc = unsafe { libc::kill(pid, 0) };
        rc == 0 || io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
    }

    fn signal_refresh(&self, pid: i32) -> io::Result<()> {
        // SAFETY: kill(2) has no memory-safety preconditions. Callers only
        // pass positive pids, so process groups are never addressed.
        let rc = unsafe { libc::kill(pid, libc::SIGUSR1) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn sync_storage(&self) {
        // SAFETY: sync(2) takes no arguments and cannot fail.
        unsafe { libc::sync() };
    }
}

#[cfg(not(unix))]
impl ProcessControl for SystemProcess {
    fn is_running(&self, _pid: i32) -> bool {
        false
    }

    fn signal_refresh(&self, _pid: i32) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "refresh signals require a unix host",
        ))
    }

    fn sync_storage(&self) {}
}
