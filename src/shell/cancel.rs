//! Process-group cleanup for captured commands.
//!
//! Captured (non-interactive) children run in their own process group so a
//! timeout can kill the whole tree, including anything they spawned. Because
//! such a group no longer receives the terminal's Ctrl+C, a SIGINT handler
//! forwards the kill to the group that is currently running before the tool
//! itself exits.

#[cfg(unix)]
use std::sync::atomic::{AtomicI32, Ordering};

#[cfg(unix)]
static ACTIVE_GROUP: AtomicI32 = AtomicI32::new(0);

/// Install the SIGINT handler. Safe to call more than once.
#[cfg(unix)]
pub fn install_interrupt_handler() {
    let handler = on_interrupt as extern "C" fn(libc::c_int);
    // SAFETY: the handler only calls async-signal-safe functions.
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
pub fn install_interrupt_handler() {}

#[cfg(unix)]
extern "C" fn on_interrupt(signal: libc::c_int) {
    let pgid = ACTIVE_GROUP.load(Ordering::SeqCst);
    // SAFETY: killpg, signal and raise are async-signal-safe.
    unsafe {
        if pgid > 0 {
            libc::killpg(pgid, libc::SIGKILL);
        }
        libc::signal(signal, libc::SIG_DFL);
        libc::raise(signal);
    }
}

/// Kill every process in a group.
#[cfg(unix)]
pub fn kill_group(pgid: u32) {
    // SAFETY: plain syscall; ESRCH for an empty group is ignored.
    unsafe {
        libc::killpg(pgid as libc::pid_t, libc::SIGKILL);
    }
}

/// Tracks the process group of the captured command currently running.
///
/// Dropping an armed guard kills the group, so an early return or panic
/// never leaves the child tree behind.
#[derive(Debug)]
pub struct GroupGuard {
    pgid: u32,
    armed: bool,
}

impl GroupGuard {
    /// Register `pgid` as the active group.
    pub fn register(pgid: u32) -> Self {
        #[cfg(unix)]
        ACTIVE_GROUP.store(pgid as i32, Ordering::SeqCst);
        Self { pgid, armed: true }
    }

    /// The registered process group id.
    pub fn pgid(&self) -> u32 {
        self.pgid
    }

    /// The child exited normally; leave the group alone on drop.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Kill the group now. Dropping the guard afterwards does nothing.
    pub fn kill(&mut self) {
        #[cfg(unix)]
        kill_group(self.pgid);
        self.disarm();
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            ACTIVE_GROUP.store(0, Ordering::SeqCst);
            if self.armed {
                kill_group(self.pgid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_guard_keeps_pgid() {
        let mut guard = GroupGuard::register(4_194_000);
        guard.disarm();
        assert_eq!(guard.pgid(), 4_194_000);
        assert!(!guard.armed);
    }

    #[cfg(unix)]
    #[test]
    fn kill_ends_group_and_disarms() {
        use std::os::unix::process::{CommandExt, ExitStatusExt};

        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .process_group(0)
            .spawn()
            .unwrap();
        let mut guard = GroupGuard::register(child.id());
        guard.kill();
        assert!(!guard.armed);
        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(libc::SIGKILL));
    }
}
