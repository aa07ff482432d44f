//! Portable regex flag sets
//!
//! The host passes fixed bit values; the native `REG_*` values differ between
//! libc implementations, so they are only looked up here.

use bitflags::bitflags;
use std::ffi::c_int;

bitflags! {
    /// Flags accepted by `compile`
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompileFlags: u8 {
        /// POSIX extended syntax instead of basic
        const EXTENDED = 1;
        /// Case-insensitive matching
        const CASE_INSENSITIVE = 2;
        /// Report only match/no-match, no offsets
        const NO_SUBGROUPS = 4;
        /// `.` and bracket negations stop at newlines, `^`/`$` match at them
        const NEWLINE_SENSITIVE = 8;
    }
}

bitflags! {
    /// Flags accepted by `execute`
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExecFlags: u8 {
        /// The subject start is not the beginning of a line
        const NOT_BOL = 1;
        /// The subject end is not the end of a line
        const NOT_EOL = 2;
    }
}

impl CompileFlags {
    /// Flags from the raw host byte, dropping unknown bits
    pub fn from_host(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Native `cflags` for `regcomp`
    pub fn to_native(self) -> c_int {
        let mut flags = 0;
        if self.contains(Self::EXTENDED) {
            flags |= libc::REG_EXTENDED;
        }
        if self.contains(Self::CASE_INSENSITIVE) {
            flags |= libc::REG_ICASE;
        }
        if self.contains(Self::NO_SUBGROUPS) {
            flags |= libc::REG_NOSUB;
        }
        if self.contains(Self::NEWLINE_SENSITIVE) {
            flags |= libc::REG_NEWLINE;
        }
        flags
    }
}

impl ExecFlags {
    /// Flags from the raw host byte, dropping unknown bits
    pub fn from_host(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Native `eflags` for `regexec`
    pub fn to_native(self) -> c_int {
        let mut flags = 0;
        if self.contains(Self::NOT_BOL) {
            flags |= libc::REG_NOTBOL;
        }
        if self.contains(Self::NOT_EOL) {
            flags |= libc::REG_NOTEOL;
        }
        flags
    }
}
