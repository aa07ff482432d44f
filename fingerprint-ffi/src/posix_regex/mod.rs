//! POSIX regex adapter
//!
//! Owns one compiled `regex_t` and the match buffer it reports into.
//! Platform differences (flag values, error numbering, `regoff_t` width) are
//! translated in the submodules; this type only sequences the libc calls.
//!
//! ```ignore
//! let mut re = PosixRegex::new();
//! re.recompile_str("a(b)(c)", CompileFlags::EXTENDED)?;
//! let set = re.execute_str("xabcx", ExecFlags::empty()).unwrap();
//! assert_eq!(set.group(1), Some(2..3));
//! ```

pub mod error;
pub mod flags;
pub mod matches;

pub use error::{status_code, RegexError, Result, COMPILE_OK, COMPILE_UNRECOGNIZED};
pub use flags::{CompileFlags, ExecFlags};
pub use matches::{MatchSet, MatchSpan, MATCH_COUNT};

use matches::MatchBuffer;
use std::ffi::{CStr, CString};

/// A compiled-pattern slot plus its reusable match buffer
///
/// Compiling again frees the previous pattern first, so at most one native
/// pattern is alive per instance. The `MatchSet` returned by `execute` is
/// overwritten by the next call.
pub struct PosixRegex {
    compiled: Option<Box<libc::regex_t>>,
    flags: CompileFlags,
    matches: Box<MatchBuffer>,
}

// The regex_t and its libc-owned allocations belong to this instance only.
unsafe impl Send for PosixRegex {}

impl Default for PosixRegex {
    fn default() -> Self {
        Self::new()
    }
}

impl PosixRegex {
    /// Empty slot; `execute` reports no match until a compile succeeds
    pub fn new() -> Self {
        Self {
            compiled: None,
            flags: CompileFlags::empty(),
            matches: MatchBuffer::boxed(),
        }
    }

    /// Build and compile in one step
    pub fn compile(pattern: &str, flags: CompileFlags) -> Result<Self> {
        let mut regex = Self::new();
        regex.recompile_str(pattern, flags)?;
        Ok(regex)
    }

    /// Compile into this slot, replacing whatever was there
    ///
    /// On failure the slot is left empty.
    pub fn recompile(&mut self, pattern: &CStr, flags: CompileFlags) -> Result<()> {
        self.release();

        // SAFETY: regex_t is plain data; all-zero is a valid "not yet compiled" value.
        let mut native: Box<libc::regex_t> = Box::new(unsafe { std::mem::zeroed() });
        let rc = unsafe { libc::regcomp(&mut *native, pattern.as_ptr(), flags.to_native()) };
        if rc != 0 {
            let err = RegexError::from_compile(rc, pattern);
            crate::shim_log_debug!("rexp.compile", "{:?}: {} (native {})", pattern, err, rc);
            return Err(err);
        }

        self.compiled = Some(native);
        self.flags = flags;
        Ok(())
    }

    pub fn recompile_str(&mut self, pattern: &str, flags: CompileFlags) -> Result<()> {
        let pattern = CString::new(pattern).map_err(|_| {
            self.release();
            RegexError::InteriorNul
        })?;
        self.recompile(&pattern, flags)
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Flags of the current compilation
    #[inline]
    pub fn flags(&self) -> CompileFlags {
        self.flags
    }

    /// Match `subject` against the compiled pattern
    ///
    /// Returns `None` on no match or when nothing is compiled. When the
    /// pattern was compiled with `NO_SUBGROUPS` every span is the unmatched
    /// sentinel.
    pub fn execute(&mut self, subject: &CStr, flags: ExecFlags) -> Option<&MatchSet> {
        let regex = self.compiled.as_deref()?;

        let rc = unsafe {
            libc::regexec(
                regex,
                subject.as_ptr(),
                MATCH_COUNT,
                self.matches.native_mut_ptr(),
                flags.to_native(),
            )
        };
        if rc != 0 {
            if rc != libc::REG_NOMATCH {
                crate::shim_log_debug!("rexp.execute", "regexec returned {}", rc);
            }
            return None;
        }

        if self.flags.contains(CompileFlags::NO_SUBGROUPS) {
            self.matches.fill_unmatched();
        } else {
            // SAFETY: regexec succeeded and wrote all MATCH_COUNT entries.
            unsafe { self.matches.normalize() };
        }
        Some(self.matches.as_set())
    }

    /// `execute` for Rust strings; a subject with a NUL byte never matches
    pub fn execute_str(&mut self, subject: &str, flags: ExecFlags) -> Option<&MatchSet> {
        let subject = CString::new(subject).ok()?;
        self.execute(&subject, flags)
    }

    /// Free the compiled pattern; no-op on an empty slot
    pub fn release(&mut self) {
        if let Some(mut native) = self.compiled.take() {
            unsafe { libc::regfree(&mut *native) };
        }
        self.flags = CompileFlags::empty();
    }
}

impl Drop for PosixRegex {
    fn drop(&mut self) {
        self.release();
    }
}
