//! Relative worker priorities
//!
//! The ingress worker must never be starved by actuation work, so each worker
//! thread sets its own nice value on start. Linux applies nice per thread id;
//! other targets run both workers at the default priority.

use std::io;
use std::thread::{self, JoinHandle};

/// Apply a nice value to the calling thread only
#[cfg(target_os = "linux")]
pub fn set_current_thread_nice(nice: i32) -> io::Result<()> {
    let tid = unsafe { libc::syscall(libc::SYS_gettid) } as libc::id_t;
    let ret = unsafe { libc::setpriority(libc::PRIO_PROCESS, tid, nice) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn set_current_thread_nice(_nice: i32) -> io::Result<()> {
    Ok(())
}

#[cfg(target_os = "linux")]
pub fn current_thread_nice() -> i32 {
    let tid = unsafe { libc::syscall(libc::SYS_gettid) } as libc::id_t;
    unsafe { libc::getpriority(libc::PRIO_PROCESS, tid) }
}

/// Spawn a named worker thread running at `nice`
///
/// A failure to change priority is logged and the worker still runs.
pub fn spawn_worker<F, T>(name: &str, nice: i32, f: F) -> io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let thread_name = name.to_string();
    thread::Builder::new().name(thread_name.clone()).spawn(move || {
        match set_current_thread_nice(nice) {
            Ok(()) => log::debug!("{} thread running at nice {}", thread_name, nice),
            Err(e) => log::warn!("{}: could not set nice {}: {}", thread_name, nice, e),
        }
        f()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_worker_named() {
        let handle = spawn_worker("probe", 3, || {
            thread::current().name().map(|n| n.to_string())
        })
        .unwrap();
        assert_eq!(handle.join().unwrap().as_deref(), Some("probe"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_nice_is_per_thread() {
        let before = current_thread_nice();
        let worker_nice = spawn_worker("lowered", 7, current_thread_nice)
            .unwrap()
            .join()
            .unwrap();
        //unprivileged runs cannot go below the inherited value
        assert!(worker_nice == 7 || worker_nice == before);
        assert_eq!(current_thread_nice(), before);
    }
}
