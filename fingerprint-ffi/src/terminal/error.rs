//! Error types for terminal operations.

use std::ffi::c_int;
use thiserror::Error;

/// Why a terminal call failed. The host only ever sees 0; this is for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerminalError {
    /// No curses shared library could be opened.
    #[error("curses library unavailable: {0}")]
    LibraryUnavailable(String),

    /// The library was opened but lacks a required entry point.
    #[error("curses library has no symbol '{0}'")]
    MissingSymbol(String),

    /// `setupterm` rejected the terminal (`err`: 1 hardcopy, 0 unknown, -1 no terminfo).
    #[error("setupterm failed (err = {err})")]
    SetupTerm { err: c_int },

    /// `initscr` returned a null screen.
    #[error("initscr returned no screen")]
    ScreenInit,

    /// Screen operation before a successful initialize.
    #[error("terminal not initialized")]
    NotInitialized,

    /// A string argument holds an interior NUL byte.
    #[error("string contains a NUL byte")]
    InteriorNul,

    /// A curses call returned ERR.
    #[error("{0} returned ERR")]
    CallFailed(&'static str),
}

/// Result type alias for terminal operations.
pub type Result<T> = std::result::Result<T, TerminalError>;
