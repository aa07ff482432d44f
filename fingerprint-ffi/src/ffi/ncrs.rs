//! NCRS FFI - curses 终端
//!
//! Every function returns 1 on success and 0 on failure, except
//! `ncrs_get_char`, which returns the key code (or `ERR`). Failure causes are
//! only reported through the log bridge.
//!
//! All calls go through one process-wide session lock. `ncrs_get_char` blocks
//! while holding it, so other NCRS calls from other threads wait for the key.

use super::{FAILURE, SUCCESS};
use crate::terminal::{self, Ncurses, TerminalOptions, TerminalSession, ERR};
use parking_lot::Mutex;
use std::ffi::{c_char, c_int, CStr, CString};

static SESSION: Mutex<Option<TerminalSession<Ncurses>>> = Mutex::new(None);

/// Terminal configuration (C-compatible)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfig {
    /// terminfo name, NULL = `$TERM`
    pub term: *const c_char,
    /// Output descriptor checked by the probe phase
    pub fd: c_int,
    /// curses shared library path, NULL = search the usual names
    pub library: *const c_char,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            term: std::ptr::null(),
            fd: libc::STDOUT_FILENO,
            library: std::ptr::null(),
        }
    }
}

impl TerminalConfig {
    /// Copy the C strings out
    ///
    /// # Safety
    /// Non-null `term` / `library` must point to NUL-terminated strings.
    unsafe fn to_options(self) -> TerminalOptions {
        let copy = |p: *const c_char| (!p.is_null()).then(|| CStr::from_ptr(p).to_owned());
        TerminalOptions {
            term: copy(self.term),
            fd: self.fd,
            library: copy(self.library),
        }
    }
}

fn status(op: &str, result: terminal::Result<()>) -> u8 {
    match result {
        Ok(()) => SUCCESS,
        Err(e) => {
            crate::shim_log_debug!(op, "{}", e);
            FAILURE
        }
    }
}

/// Run `f` on the loaded session; 0 if initialize never loaded curses
fn with_session<F>(op: &str, f: F) -> u8
where
    F: FnOnce(&mut TerminalSession<Ncurses>) -> terminal::Result<()>,
{
    let mut guard = SESSION.lock();
    match guard.as_mut() {
        Some(session) => status(op, f(session)),
        None => status(op, Err(terminal::TerminalError::NotInitialized)),
    }
}

fn initialize_with(options: TerminalOptions) -> u8 {
    let mut guard = SESSION.lock();

    if guard.is_none() {
        match TerminalSession::open(&options) {
            Ok(session) => *guard = Some(session),
            Err(e) => {
                crate::shim_log_warn!("ncrs.load", "{}", e);
                return FAILURE;
            }
        }
    }

    let Some(session) = guard.as_mut() else {
        return FAILURE;
    };
    match session.initialize(&options) {
        Ok(()) => SUCCESS,
        Err(e) => {
            crate::shim_log_warn!("ncrs.initialize", "{}", e);
            FAILURE
        }
    }
}

/// Default configuration: `$TERM`, stdout, library search
#[no_mangle]
pub extern "C" fn ncrs_default_config() -> TerminalConfig {
    TerminalConfig::default()
}

#[no_mangle]
pub extern "C" fn ncrs_beep() -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.beep", |s| s.beep()))
}

/// Bring up the screen with the default configuration
///
/// Probes the terminal with `setupterm` before `initscr`, so an unusable
/// terminal yields 0 instead of terminating the process.
#[no_mangle]
pub extern "C" fn ncrs_initialize() -> u8 {
    catch_panic!(FAILURE, initialize_with(TerminalOptions::default()))
}

/// Bring up the screen with an explicit configuration
///
/// # Safety
/// Non-null strings in `config` must be NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn ncrs_initialize_with_config(config: TerminalConfig) -> u8 {
    catch_panic!(FAILURE, initialize_with(config.to_options()))
}

#[no_mangle]
pub extern "C" fn ncrs_shutdown() -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.shutdown", |s| s.shutdown()))
}

/// Nonzero `on` = raw (cbreak) input, zero = cooked
///
/// The C `ccbi_cbreak(on)` shim used the opposite polarity (`on` called
/// `nocbreak()`); hosts ported from it must flip the argument.
#[no_mangle]
pub extern "C" fn ncrs_set_raw_mode(on: c_int) -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.set_raw_mode", |s| s.set_raw_mode(on != 0)))
}

#[no_mangle]
pub extern "C" fn ncrs_set_echo(on: c_int) -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.set_echo", |s| s.set_echo(on != 0)))
}

#[no_mangle]
pub extern "C" fn ncrs_set_keypad(on: c_int) -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.set_keypad", |s| s.set_keypad(on != 0)))
}

#[no_mangle]
pub extern "C" fn ncrs_move(y: c_int, x: c_int) -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.move", |s| s.move_cursor(y, x)))
}

#[no_mangle]
pub extern "C" fn ncrs_refresh() -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.refresh", |s| s.refresh()))
}

/// Blocking key read; special keys keep their curses codes, `ERR` (-1) on failure
///
/// `getch` runs under the process-wide session lock. While it waits for a
/// key, every other `ncrs_*` call from any thread (output, refresh, shutdown)
/// blocks too, with no timeout. Hosts that draw from another thread must not
/// sit in `ncrs_get_char`.
#[no_mangle]
pub extern "C" fn ncrs_get_char() -> c_int {
    catch_panic!(ERR, {
        let mut guard = SESSION.lock();
        guard.as_mut().map_or(ERR, |s| s.get_char())
    })
}

#[no_mangle]
pub extern "C" fn ncrs_unget_char(ch: c_int) -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.unget_char", |s| s.push_back_char(ch)))
}

#[no_mangle]
pub extern "C" fn ncrs_put_char(ch: u32) -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.put_char", |s| s.put_char(ch)))
}

/// # Safety
/// `s` must be NULL or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ncrs_put_string(s: *const c_char) -> u8 {
    if s.is_null() {
        return FAILURE;
    }
    let s: CString = CStr::from_ptr(s).to_owned();
    catch_panic!(FAILURE, with_session("ncrs.put_string", |session| session.put_str(&s)))
}

#[no_mangle]
pub extern "C" fn ncrs_erase() -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.erase", |s| s.erase_all()))
}

#[no_mangle]
pub extern "C" fn ncrs_clear_to_bottom() -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.clear_to_bottom", |s| s.erase_to_bottom()))
}

#[no_mangle]
pub extern "C" fn ncrs_clear_to_eol() -> u8 {
    catch_panic!(FAILURE, with_session("ncrs.clear_to_eol", |s| s.erase_to_end_of_line()))
}
