//! Host signal plumbing.  Handlers only store the signal number; the
//! interpreter observes the pending signal at every dispatch and raises
//! *caught-signal* from there, so no interpreter state is touched from
//! an async context.

#[cfg(unix)]
mod unix {
    use crate::runtime::error::ErrKind;
    use lazy_static::lazy_static;
    use libc::{
        SIGBUS, SIGFPE, SIGHUP, SIGINT, SIGQUIT, SIGSEGV, c_int, sighandler_t, signal,
    };
    use std::sync::atomic::{AtomicI64, Ordering};

    lazy_static! {
        /// The most recently delivered recoverable signal, or 0.
        static ref PENDING_SIGNAL: AtomicI64 = AtomicI64::new(0);
    }

    /// Handler for recoverable signals: record the number and return.
    extern "C" fn on_signal(signal_number: c_int) {
        PENDING_SIGNAL.store(signal_number as i64, Ordering::SeqCst);
    }

    /// Handler for SIGSEGV, which is not recoverable.  Only
    /// async-signal-safe calls are allowed here; the note is written
    /// straight to stderr and the process exits with the
    /// caught-signal code.
    extern "C" fn on_fatal(_signal_number: c_int) {
        let note = b"\n-- segmentation fault, giving up\n";

        unsafe {
            let _ = libc::write(2, note.as_ptr() as *const libc::c_void, note.len());
            libc::_exit(ErrKind::CaughtSignal.code() as c_int);
        }
    }

    /// Install (or re-install, on warm reset) the handlers.  A signal
    /// that cannot be installed keeps its default disposition.
    pub fn install() {
        let recoverable_handler = on_signal as extern "C" fn(c_int) as sighandler_t;
        let fatal_handler = on_fatal as extern "C" fn(c_int) as sighandler_t;

        unsafe {
            for recoverable in [SIGINT, SIGQUIT, SIGHUP, SIGBUS, SIGFPE] {
                let _ = signal(recoverable, recoverable_handler);
            }

            let _ = signal(SIGSEGV, fatal_handler);
        }
    }

    /// Take the pending signal, if any, clearing it.
    pub fn take_pending() -> Option<i32> {
        match PENDING_SIGNAL.swap(0, Ordering::SeqCst) {
            0 => None,
            signal_number => Some(signal_number as i32),
        }
    }

    /// A printable name for the signal, used as the error's thrower.
    pub fn name(signal_number: i32) -> &'static str {
        match signal_number {
            SIGINT => "SIGINT",
            SIGQUIT => "SIGQUIT",
            SIGHUP => "SIGHUP",
            SIGBUS => "SIGBUS",
            SIGFPE => "SIGFPE",
            SIGSEGV => "SIGSEGV",
            _ => "signal",
        }
    }
}

#[cfg(unix)]
pub use unix::{install, name, take_pending};

#[cfg(not(unix))]
mod fallback {
    pub fn install() {}

    pub fn take_pending() -> Option<i32> {
        None
    }

    pub fn name(_signal_number: i32) -> &'static str {
        "signal"
    }
}

#[cfg(not(unix))]
pub use fallback::{install, name, take_pending};
