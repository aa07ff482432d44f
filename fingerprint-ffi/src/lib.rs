//! Native shims for the Befunge-98 NCRS and REXP fingerprints
//!
//! Two independent adapters behind a flat C ABI:
//! - `terminal` / `ffi::ncrs`: curses, with every call reduced to a 1/0 status
//! - `posix_regex` / `ffi::rexp`: `regcomp`/`regexec` with portable flags,
//!   error codes and match offsets
//!
//! Neither adapter renders, matches or interprets anything itself; the work is
//! done by the platform's curses and libc.

/// 辅助宏：在 FFI 边界捕获 panic
macro_rules! catch_panic {
    ($default:expr, $body:expr) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(result) => result,
            Err(e) => {
                $crate::shim_log_error!("ffi", "caught panic at the boundary: {:?}", e);
                $default
            }
        }
    };
}

pub mod ffi;
pub mod posix_regex;
pub mod terminal;

pub use ffi::*;
pub use posix_regex::{CompileFlags, ExecFlags, MatchSet, MatchSpan, PosixRegex, RegexError};
pub use terminal::{TerminalError, TerminalOptions, TerminalSession};
