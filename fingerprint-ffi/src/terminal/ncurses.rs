//! curses 动态绑定
//!
//! The library is opened with `dlopen` at initialize time rather than linked,
//! so a host without curses gets a failed initialize instead of a failed load.
//! Every entry point is resolved as a real function symbol; the ones that may be
//! macros in `<curses.h>` (`echo`, `ungetch`, `move`, ...) are exported as
//! functions by ncurses as well.

use super::backend::{Chtype, CursesBackend, Window};
use super::error::{Result, TerminalError};
use std::ffi::{c_char, c_int, c_void, CStr};

/// Tried in order when no library path is configured
const DEFAULT_LIBRARIES: &[&CStr] = &[
    c"libncursesw.so.6",
    c"libncurses.so.6",
    c"libncursesw.so.5",
    c"libncurses.so.5",
    c"libncursesw.so",
    c"libncurses.so",
    c"libncurses.dylib",
    c"libcurses.so",
];

type StatusFn = unsafe extern "C" fn() -> c_int;

struct Api {
    setupterm: unsafe extern "C" fn(*const c_char, c_int, *mut c_int) -> c_int,
    initscr: unsafe extern "C" fn() -> Window,
    endwin: StatusFn,
    beep: StatusFn,
    cbreak: StatusFn,
    nocbreak: StatusFn,
    echo: StatusFn,
    noecho: StatusFn,
    keypad: unsafe extern "C" fn(Window, bool) -> c_int,
    move_to: unsafe extern "C" fn(c_int, c_int) -> c_int,
    refresh: StatusFn,
    getch: StatusFn,
    ungetch: unsafe extern "C" fn(c_int) -> c_int,
    addch: unsafe extern "C" fn(Chtype) -> c_int,
    addstr: unsafe extern "C" fn(*const c_char) -> c_int,
    erase: StatusFn,
    clrtobot: StatusFn,
    clrtoeol: StatusFn,
}

/// A dlopen'ed curses library
///
/// Never dlclose'd: curses keeps process-wide state and may have registered
/// exit handlers.
pub struct Ncurses {
    api: Api,
    _handle: *mut c_void,
}

// curses calls are serialized by the session lock that owns this value.
unsafe impl Send for Ncurses {}

impl Ncurses {
    /// Open `library`, or the first loadable default, and resolve all symbols
    pub fn load(library: Option<&CStr>) -> Result<Self> {
        let handle = match library {
            Some(path) => open(path),
            None => DEFAULT_LIBRARIES.iter().find_map(|path| open(path)),
        };
        let handle = handle.ok_or_else(|| {
            TerminalError::LibraryUnavailable(match library {
                Some(path) => format!("{} ({})", path.to_string_lossy(), dl_error()),
                None => format!("no default candidate loaded ({})", dl_error()),
            })
        })?;

        let api = unsafe { Api::resolve(handle)? };
        crate::shim_log_debug!("ncrs.load", "curses library loaded");
        Ok(Self { api, _handle: handle })
    }
}

fn open(path: &CStr) -> Option<*mut c_void> {
    let handle = unsafe { libc::dlopen(path.as_ptr(), libc::RTLD_NOW | libc::RTLD_GLOBAL) };
    (!handle.is_null()).then_some(handle)
}

fn dl_error() -> String {
    let msg = unsafe { libc::dlerror() };
    if msg.is_null() {
        "unknown dlopen error".to_string()
    } else {
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }
}

/// # Safety
/// `T` must be a function pointer type matching the C signature of `name`.
unsafe fn symbol<T: Copy>(handle: *mut c_void, name: &CStr) -> Result<T> {
    let ptr = libc::dlsym(handle, name.as_ptr());
    if ptr.is_null() {
        return Err(TerminalError::MissingSymbol(name.to_string_lossy().into_owned()));
    }
    Ok(std::mem::transmute_copy::<*mut c_void, T>(&ptr))
}

impl Api {
    unsafe fn resolve(handle: *mut c_void) -> Result<Self> {
        Ok(Self {
            setupterm: symbol(handle, c"setupterm")?,
            initscr: symbol(handle, c"initscr")?,
            endwin: symbol(handle, c"endwin")?,
            beep: symbol(handle, c"beep")?,
            cbreak: symbol(handle, c"cbreak")?,
            nocbreak: symbol(handle, c"nocbreak")?,
            echo: symbol(handle, c"echo")?,
            noecho: symbol(handle, c"noecho")?,
            keypad: symbol(handle, c"keypad")?,
            move_to: symbol(handle, c"move")?,
            refresh: symbol(handle, c"refresh")?,
            getch: symbol(handle, c"getch")?,
            ungetch: symbol(handle, c"ungetch")?,
            addch: symbol(handle, c"addch")?,
            addstr: symbol(handle, c"addstr")?,
            erase: symbol(handle, c"erase")?,
            clrtobot: symbol(handle, c"clrtobot")?,
            clrtoeol: symbol(handle, c"clrtoeol")?,
        })
    }
}

impl CursesBackend for Ncurses {
    fn setupterm(&mut self, term: Option<&CStr>, fd: c_int, err: &mut c_int) -> c_int {
        let term = term.map_or(std::ptr::null(), CStr::as_ptr);
        unsafe { (self.api.setupterm)(term, fd, err) }
    }

    fn initscr(&mut self) -> Window {
        unsafe { (self.api.initscr)() }
    }

    fn endwin(&mut self) -> c_int {
        unsafe { (self.api.endwin)() }
    }

    fn beep(&mut self) -> c_int {
        unsafe { (self.api.beep)() }
    }

    fn cbreak(&mut self) -> c_int {
        unsafe { (self.api.cbreak)() }
    }

    fn nocbreak(&mut self) -> c_int {
        unsafe { (self.api.nocbreak)() }
    }

    fn echo(&mut self) -> c_int {
        unsafe { (self.api.echo)() }
    }

    fn noecho(&mut self) -> c_int {
        unsafe { (self.api.noecho)() }
    }

    fn keypad(&mut self, win: Window, on: bool) -> c_int {
        unsafe { (self.api.keypad)(win, on) }
    }

    fn move_to(&mut self, y: c_int, x: c_int) -> c_int {
        unsafe { (self.api.move_to)(y, x) }
    }

    fn refresh(&mut self) -> c_int {
        unsafe { (self.api.refresh)() }
    }

    fn getch(&mut self) -> c_int {
        unsafe { (self.api.getch)() }
    }

    fn ungetch(&mut self, ch: c_int) -> c_int {
        unsafe { (self.api.ungetch)(ch) }
    }

    fn addch(&mut self, ch: Chtype) -> c_int {
        unsafe { (self.api.addch)(ch) }
    }

    fn addstr(&mut self, s: &CStr) -> c_int {
        unsafe { (self.api.addstr)(s.as_ptr()) }
    }

    fn erase(&mut self) -> c_int {
        unsafe { (self.api.erase)() }
    }

    fn clrtobot(&mut self) -> c_int {
        unsafe { (self.api.clrtobot)() }
    }

    fn clrtoeol(&mut self) -> c_int {
        unsafe { (self.api.clrtoeol)() }
    }
}
