//! The curses entry points the terminal adapter drives
//!
//! Methods mirror the C functions one to one and return the raw curses status,
//! so ERR handling stays in one place (`TerminalSession`).

use std::ffi::{c_int, c_uint, c_void, CStr};

/// curses failure status
pub const ERR: c_int = -1;

/// curses success status
pub const OK: c_int = 0;

/// `WINDOW*`
pub type Window = *mut c_void;

/// `chtype`: a character plus attribute bits
pub type Chtype = c_uint;

pub trait CursesBackend {
    fn setupterm(&mut self, term: Option<&CStr>, fd: c_int, err: &mut c_int) -> c_int;
    fn initscr(&mut self) -> Window;
    fn endwin(&mut self) -> c_int;
    fn beep(&mut self) -> c_int;
    fn cbreak(&mut self) -> c_int;
    fn nocbreak(&mut self) -> c_int;
    fn echo(&mut self) -> c_int;
    fn noecho(&mut self) -> c_int;
    fn keypad(&mut self, win: Window, on: bool) -> c_int;
    fn move_to(&mut self, y: c_int, x: c_int) -> c_int;
    fn refresh(&mut self) -> c_int;
    fn getch(&mut self) -> c_int;
    fn ungetch(&mut self, ch: c_int) -> c_int;
    fn addch(&mut self, ch: Chtype) -> c_int;
    fn addstr(&mut self, s: &CStr) -> c_int;
    fn erase(&mut self) -> c_int;
    fn clrtobot(&mut self) -> c_int;
    fn clrtoeol(&mut self) -> c_int;
}
