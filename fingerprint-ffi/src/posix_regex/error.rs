//! Portable regex compile errors

use std::ffi::{c_int, CStr};
use thiserror::Error;

/// Code reported for a successful compile
pub const COMPILE_OK: i32 = 0;

/// Code reported when the native library returns something POSIX does not define
pub const COMPILE_UNRECOGNIZED: i32 = -1;

/// Compile failures with host-independent numbering
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexError {
    #[error("malformed repetition count")]
    BadRepetitionCount,

    #[error("invalid pattern")]
    BadPattern,

    #[error("invalid use of repetition operator")]
    BadRepetition,

    #[error("unmatched brace")]
    UnmatchedBrace,

    #[error("unmatched bracket")]
    UnmatchedBracket,

    #[error("invalid collating element")]
    InvalidCollation,

    #[error("invalid character class")]
    InvalidClass,

    #[error("unexpected end of pattern")]
    UnexpectedEnd,

    #[error("trailing backslash")]
    TrailingEscape,

    #[error("unmatched parenthesis")]
    UnmatchedParen,

    #[error("invalid range endpoint")]
    InvalidRange,

    #[error("compiled pattern too large")]
    PatternTooLarge,

    #[error("out of memory")]
    OutOfMemory,

    #[error("invalid back-reference")]
    InvalidBackReference,

    /// Pattern contains an interior NUL byte and cannot reach `regcomp`
    #[error("pattern contains a NUL byte")]
    InteriorNul,

    /// The native library returned a code outside the POSIX set
    #[error("unrecognized native regcomp error {0}")]
    Unrecognized(c_int),
}

pub type Result<T> = std::result::Result<T, RegexError>;

impl RegexError {
    /// Map a nonzero `regcomp` return value
    pub fn from_native(code: c_int) -> Self {
        match code {
            libc::REG_BADBR => Self::BadRepetitionCount,
            libc::REG_BADPAT => Self::BadPattern,
            libc::REG_BADRPT => Self::BadRepetition,
            libc::REG_EBRACE => Self::UnmatchedBrace,
            libc::REG_EBRACK => Self::UnmatchedBracket,
            libc::REG_ECOLLATE => Self::InvalidCollation,
            libc::REG_ECTYPE => Self::InvalidClass,
            libc::REG_EEND => Self::UnexpectedEnd,
            libc::REG_EESCAPE => Self::TrailingEscape,
            libc::REG_EPAREN => Self::UnmatchedParen,
            libc::REG_ERANGE => Self::InvalidRange,
            libc::REG_ESIZE => Self::PatternTooLarge,
            libc::REG_ESPACE => Self::OutOfMemory,
            libc::REG_ESUBREG => Self::InvalidBackReference,
            other => Self::Unrecognized(other),
        }
    }

    /// Map a `regcomp` failure for `pattern`
    ///
    /// glibc reports a bracket expression cut off by the end of the pattern
    /// (`"["`, `"[^"`, `"a["`) as `REG_BADPAT`; it is reported here as
    /// `UnmatchedBracket`, as the other libcs do.
    pub fn from_compile(code: c_int, pattern: &CStr) -> Self {
        match Self::from_native(code) {
            Self::BadPattern if has_unclosed_bracket(pattern.to_bytes()) => Self::UnmatchedBracket,
            err => err,
        }
    }

    /// Portable code handed to the host
    ///
    /// A NUL inside the pattern is reported as an invalid pattern, the same
    /// code the host would see from a C caller whose string ended early.
    pub fn code(&self) -> i32 {
        match self {
            Self::BadRepetitionCount => 1,
            Self::BadPattern | Self::InteriorNul => 2,
            Self::BadRepetition => 3,
            Self::UnmatchedBrace => 4,
            Self::UnmatchedBracket => 5,
            Self::InvalidCollation => 6,
            Self::InvalidClass => 7,
            Self::UnexpectedEnd => 8,
            Self::TrailingEscape => 9,
            Self::UnmatchedParen => 10,
            Self::InvalidRange => 11,
            Self::PatternTooLarge => 12,
            Self::OutOfMemory => 13,
            Self::InvalidBackReference => 14,
            Self::Unrecognized(_) => COMPILE_UNRECOGNIZED,
        }
    }
}

/// Collapse a compile result into the host's status code
pub fn status_code(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => COMPILE_OK,
        Err(e) => e.code(),
    }
}

/// Whether some `[` in `pattern` opens a bracket expression that never closes
///
/// Outside brackets `\` escapes the next byte. Inside, a leading `]` (or `^]`)
/// is literal and `[:class:]`, `[.coll.]`, `[=equiv=]` are skipped whole.
pub(crate) fn has_unclosed_bracket(pattern: &[u8]) -> bool {
    let mut i = 0;
    while i < pattern.len() {
        match pattern[i] {
            b'\\' => i += 2,
            b'[' => match bracket_end(pattern, i) {
                Some(close) => i = close + 1,
                None => return true,
            },
            _ => i += 1,
        }
    }
    false
}

/// Index of the `]` closing the bracket expression opened at `open`
fn bracket_end(pattern: &[u8], open: usize) -> Option<usize> {
    let mut i = open + 1;
    if pattern.get(i) == Some(&b'^') {
        i += 1;
    }
    if pattern.get(i) == Some(&b']') {
        i += 1;
    }
    while i < pattern.len() {
        match (pattern[i], pattern.get(i + 1)) {
            (b']', _) => return Some(i),
            (b'[', Some(&(delim @ (b':' | b'.' | b'=')))) => {
                let inner = &pattern[i + 2..];
                let len = inner.windows(2).position(|w| w[0] == delim && w[1] == b']')?;
                i += 2 + len + 2;
            }
            _ => i += 1,
        }
    }
    None
}
