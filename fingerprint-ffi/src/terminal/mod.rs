//! curses terminal adapter
//!
//! `TerminalSession` turns the curses call set into `Result`s and enforces the
//! initialization protocol:
//!
//! 1. **probe** - `setupterm` on the configured terminal. Unlike `initscr`,
//!    it reports failure instead of exiting the process.
//! 2. **commit** - `initscr`, checked for a null screen.
//!
//! Screen calls made before the commit phase fail without reaching curses.

pub mod backend;
pub mod error;
pub mod ncurses;

pub use backend::{Chtype, CursesBackend, Window, ERR, OK};
pub use error::{Result, TerminalError};
pub use ncurses::Ncurses;

use std::ffi::{c_int, CStr, CString};

/// Where and how to bring up the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalOptions {
    /// terminfo name; `None` uses `$TERM`
    pub term: Option<CString>,
    /// Output descriptor probed by `setupterm`
    pub fd: c_int,
    /// curses shared library; `None` searches the usual names
    pub library: Option<CString>,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            term: None,
            fd: libc::STDOUT_FILENO,
            library: None,
        }
    }
}

/// Initialization progress of the curses screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing done yet
    Idle,
    /// `setupterm` succeeded, `initscr` not yet called
    Probed,
    /// Screen is up
    Active,
    /// `endwin` was called; the next initialize resumes with `refresh`
    Suspended,
}

/// The process's curses screen, driven through a `CursesBackend`
pub struct TerminalSession<B> {
    backend: B,
    phase: Phase,
    screen: Window,
}

// The screen pointer is only dereferenced by curses, under the owner's lock.
unsafe impl<B: Send> Send for TerminalSession<B> {}

fn check(rc: c_int, call: &'static str) -> Result<()> {
    if rc == ERR {
        Err(TerminalError::CallFailed(call))
    } else {
        Ok(())
    }
}

impl<B: CursesBackend> TerminalSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            phase: Phase::Idle,
            screen: std::ptr::null_mut(),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Phase one: check the terminal without committing to a screen
    pub fn probe(&mut self, options: &TerminalOptions) -> Result<()> {
        let mut err: c_int = 0;
        let rc = self.backend.setupterm(options.term.as_deref(), options.fd, &mut err);
        if rc == ERR {
            return Err(TerminalError::SetupTerm { err });
        }
        self.phase = Phase::Probed;
        Ok(())
    }

    /// Phase two: create the screen
    pub fn commit(&mut self) -> Result<()> {
        if self.phase != Phase::Probed {
            return Err(TerminalError::NotInitialized);
        }
        let screen = self.backend.initscr();
        if screen.is_null() {
            self.phase = Phase::Idle;
            return Err(TerminalError::ScreenInit);
        }
        self.screen = screen;
        self.phase = Phase::Active;
        Ok(())
    }

    /// Probe then commit; resumes a suspended screen; no-op when already active
    pub fn initialize(&mut self, options: &TerminalOptions) -> Result<()> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::Suspended => {
                // curses restores the screen on the first refresh after endwin.
                check(self.backend.refresh(), "refresh")?;
                self.phase = Phase::Active;
                Ok(())
            }
            Phase::Idle | Phase::Probed => {
                self.probe(options)?;
                self.commit()
            }
        }
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.endwin(), "endwin")?;
        self.phase = Phase::Suspended;
        Ok(())
    }

    pub fn beep(&mut self) -> Result<()> {
        check(self.backend.beep(), "beep")
    }

    /// `on` = character-at-a-time input (cbreak), off = line-buffered
    pub fn set_raw_mode(&mut self, on: bool) -> Result<()> {
        self.ensure_active()?;
        if on {
            check(self.backend.cbreak(), "cbreak")
        } else {
            check(self.backend.nocbreak(), "nocbreak")
        }
    }

    pub fn set_echo(&mut self, on: bool) -> Result<()> {
        self.ensure_active()?;
        if on {
            check(self.backend.echo(), "echo")
        } else {
            check(self.backend.noecho(), "noecho")
        }
    }

    pub fn set_keypad(&mut self, on: bool) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.keypad(self.screen, on), "keypad")
    }

    pub fn move_cursor(&mut self, y: c_int, x: c_int) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.move_to(y, x), "move")
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.refresh(), "refresh")
    }

    /// Next key code, blocking; `ERR` when the screen is not up
    pub fn get_char(&mut self) -> c_int {
        if !self.is_active() {
            return ERR;
        }
        self.backend.getch()
    }

    pub fn push_back_char(&mut self, ch: c_int) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.ungetch(ch), "ungetch")
    }

    pub fn put_char(&mut self, ch: Chtype) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.addch(ch), "addch")
    }

    pub fn put_str(&mut self, s: &CStr) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.addstr(s), "addstr")
    }

    /// `put_str` for Rust strings
    pub fn put_string(&mut self, s: &str) -> Result<()> {
        let s = CString::new(s).map_err(|_| TerminalError::InteriorNul)?;
        self.put_str(&s)
    }

    pub fn erase_all(&mut self) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.erase(), "erase")
    }

    pub fn erase_to_bottom(&mut self) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.clrtobot(), "clrtobot")
    }

    pub fn erase_to_end_of_line(&mut self) -> Result<()> {
        self.ensure_active()?;
        check(self.backend.clrtoeol(), "clrtoeol")
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(TerminalError::NotInitialized)
        }
    }
}

impl TerminalSession<Ncurses> {
    /// Load the configured curses library and wrap it in an idle session
    pub fn open(options: &TerminalOptions) -> Result<Self> {
        Ncurses::load(options.library.as_deref()).map(Self::new)
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockCurses;
    use super::*;

    fn active_session() -> TerminalSession<MockCurses> {
        let mut session = TerminalSession::new(MockCurses::new());
        session.initialize(&TerminalOptions::default()).unwrap();
        session
    }

    #[test]
    fn test_initialize_probes_then_commits() {
        let session = active_session();
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.backend().calls, vec!["setupterm", "initscr"]);
    }

    #[test]
    fn test_probe_failure_skips_initscr() {
        let mut backend = MockCurses::new();
        backend.setupterm_err = Some(0);
        let mut session = TerminalSession::new(backend);

        let err = session.initialize(&TerminalOptions::default()).unwrap_err();
        assert_eq!(err, TerminalError::SetupTerm { err: 0 });
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.backend().called("initscr"));
    }

    #[test]
    fn test_null_screen_is_failure() {
        let mut backend = MockCurses::new();
        backend.screen_fails = true;
        let mut session = TerminalSession::new(backend);

        assert_eq!(
            session.initialize(&TerminalOptions::default()),
            Err(TerminalError::ScreenInit)
        );
        assert!(!session.is_active());
        assert_eq!(session.refresh(), Err(TerminalError::NotInitialized));
    }

    #[test]
    fn test_commit_requires_probe() {
        let mut session = TerminalSession::new(MockCurses::new());
        assert_eq!(session.commit(), Err(TerminalError::NotInitialized));
        assert!(!session.backend().called("initscr"));
    }

    #[test]
    fn test_term_name_passed_to_probe() {
        let mut session = TerminalSession::new(MockCurses::new());
        let options = TerminalOptions {
            term: Some(CString::new("vt100").unwrap()),
            ..Default::default()
        };
        session.probe(&options).unwrap();
        assert_eq!(session.backend().last_term.as_deref(), Some("vt100"));
        assert_eq!(session.phase(), Phase::Probed);
    }

    #[test]
    fn test_calls_before_initialize_fail() {
        let mut session = TerminalSession::new(MockCurses::new());
        assert_eq!(session.set_echo(false), Err(TerminalError::NotInitialized));
        assert_eq!(session.put_char('a' as Chtype), Err(TerminalError::NotInitialized));
        assert_eq!(session.get_char(), ERR);
        assert!(session.backend().calls.is_empty());
    }

    #[test]
    fn test_get_char_after_push_back() {
        let mut session = active_session();
        session.backend.input.push_back('z' as c_int);

        session.push_back_char('q' as c_int).unwrap();
        assert_eq!(session.get_char(), 'q' as c_int);
        assert_eq!(session.get_char(), 'z' as c_int);
    }

    #[test]
    fn test_put_char_then_refresh() {
        let mut session = active_session();
        assert!(session.put_char('A' as Chtype).is_ok());
        assert!(session.refresh().is_ok());
        assert_eq!(session.backend().output, "A");
    }

    #[test]
    fn test_put_string() {
        let mut session = active_session();
        session.put_string("hello").unwrap();
        assert_eq!(session.backend().output, "hello");
        assert_eq!(session.put_string("a\0b"), Err(TerminalError::InteriorNul));
    }

    #[test]
    fn test_mode_toggles() {
        let mut session = active_session();

        session.set_raw_mode(true).unwrap();
        assert!(session.backend().raw);
        session.set_raw_mode(false).unwrap();
        assert!(!session.backend().raw);

        session.set_echo(false).unwrap();
        assert!(!session.backend().echo);

        session.set_keypad(true).unwrap();
        assert!(session.backend().keypad);
    }

    #[test]
    fn test_raw_mode_on_selects_cbreak() {
        let mut session = active_session();

        session.set_raw_mode(true).unwrap();
        session.set_raw_mode(false).unwrap();
        assert_eq!(session.backend().calls[2..], ["cbreak", "nocbreak"]);
    }

    #[test]
    fn test_move_out_of_range_fails() {
        let mut session = active_session();
        session.move_cursor(3, 4).unwrap();
        assert_eq!(session.backend().cursor, (3, 4));
        assert_eq!(session.move_cursor(100, 0), Err(TerminalError::CallFailed("move")));
    }

    #[test]
    fn test_erase_variants() {
        let mut session = active_session();
        session.put_string("text").unwrap();
        session.erase_to_end_of_line().unwrap();
        session.erase_to_bottom().unwrap();
        session.erase_all().unwrap();
        assert!(session.backend().output.is_empty());
        assert!(session.backend().called("clrtoeol"));
        assert!(session.backend().called("clrtobot"));
    }

    #[test]
    fn test_shutdown_then_resume() {
        let mut session = active_session();
        session.shutdown().unwrap();
        assert_eq!(session.phase(), Phase::Suspended);
        assert_eq!(session.refresh(), Err(TerminalError::NotInitialized));

        session.initialize(&TerminalOptions::default()).unwrap();
        assert!(session.is_active());
        // Resume must not create a second screen.
        let initscr_calls = session.backend().calls.iter().filter(|c| **c == "initscr").count();
        assert_eq!(initscr_calls, 1);
    }

    #[test]
    fn test_shutdown_requires_active() {
        let mut session = TerminalSession::new(MockCurses::new());
        assert_eq!(session.shutdown(), Err(TerminalError::NotInitialized));
    }

    #[test]
    fn test_initialize_twice_is_noop() {
        let mut session = active_session();
        session.initialize(&TerminalOptions::default()).unwrap();
        assert_eq!(session.backend().calls, vec!["setupterm", "initscr"]);
    }

    #[test]
    fn test_beep_passes_through() {
        let mut session = TerminalSession::new(MockCurses::new());
        assert!(session.beep().is_ok());
        assert!(session.backend().called("beep"));
    }
}
