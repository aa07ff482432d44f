//! REXP FFI - POSIX 正则
//!
//! Two ways in:
//! - `rexp_compile` / `rexp_execute` / `rexp_free` act on one process-wide
//!   default slot
//! - `rexp_create` returns an owned handle with its own pattern and match
//!   buffer; handles are independent and may live on different threads
//!
//! `execute` returns a pointer to `MATCH_COUNT` consecutive `MatchSpan`s, or
//! NULL on no match. The pointer stays valid until the next execute, compile,
//! free or destroy on the same slot.

use crate::posix_regex::{
    status_code, CompileFlags, ExecFlags, MatchSpan, PosixRegex, RegexError, COMPILE_UNRECOGNIZED,
    MATCH_COUNT,
};
use parking_lot::Mutex;
use std::ffi::{c_char, CStr};
use std::ptr;

static DEFAULT_SLOT: Mutex<Option<PosixRegex>> = Mutex::new(None);

/// RegexHandle 句柄（不透明指针）
#[repr(C)]
pub struct RegexHandle {
    _private: [u8; 0],
}

/// # Safety
/// `pattern` must be NULL or a NUL-terminated string.
unsafe fn compile_into(regex: &mut PosixRegex, pattern: *const c_char, flags: u8) -> i32 {
    if pattern.is_null() {
        regex.release();
        return RegexError::BadPattern.code();
    }
    let pattern = CStr::from_ptr(pattern);
    status_code(&regex.recompile(pattern, CompileFlags::from_host(flags)))
}

/// # Safety
/// `subject` must be NULL or a NUL-terminated string.
unsafe fn execute_on(regex: &mut PosixRegex, subject: *const c_char, flags: u8) -> *const MatchSpan {
    if subject.is_null() {
        return ptr::null();
    }
    let subject = CStr::from_ptr(subject);
    regex
        .execute(subject, ExecFlags::from_host(flags))
        .map_or(ptr::null(), |set| set.as_ptr())
}

// ============================================================================
// Default slot
// ============================================================================

/// Compile into the default slot
///
/// Returns 0 on success, 1..=14 for the portable POSIX errors, -1 for a
/// native code outside POSIX. The previous pattern is freed first.
///
/// # Safety
/// `pattern` must be NULL or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn rexp_compile(pattern: *const c_char, flags: u8) -> i32 {
    catch_panic!(COMPILE_UNRECOGNIZED, {
        let mut slot = DEFAULT_SLOT.lock();
        let regex = slot.get_or_insert_with(PosixRegex::new);
        compile_into(regex, pattern, flags)
    })
}

/// Match against the default slot
///
/// # Safety
/// `subject` must be NULL or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn rexp_execute(subject: *const c_char, flags: u8) -> *const MatchSpan {
    catch_panic!(ptr::null(), {
        let mut slot = DEFAULT_SLOT.lock();
        match slot.as_mut() {
            // The match buffer is boxed inside the static slot, so the pointer
            // outlives the guard.
            Some(regex) => execute_on(regex, subject, flags),
            None => ptr::null(),
        }
    })
}

/// Free the default slot's pattern; safe to call repeatedly
#[no_mangle]
pub extern "C" fn rexp_free() {
    catch_panic!((), {
        if let Some(regex) = DEFAULT_SLOT.lock().as_mut() {
            regex.release();
        }
    })
}

/// Number of spans behind every non-NULL execute result
#[no_mangle]
pub extern "C" fn rexp_match_count() -> u32 {
    MATCH_COUNT as u32
}

// ============================================================================
// Owned handles
// ============================================================================

#[no_mangle]
pub extern "C" fn rexp_create() -> *mut RegexHandle {
    catch_panic!(ptr::null_mut(), {
        Box::into_raw(Box::new(PosixRegex::new())) as *mut RegexHandle
    })
}

/// Free the handle and its pattern
///
/// # Safety
/// `handle` must come from `rexp_create` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn rexp_destroy(handle: *mut RegexHandle) {
    if handle.is_null() {
        return;
    }
    let _ = Box::from_raw(handle as *mut PosixRegex);
}

/// # Safety
/// `handle` from `rexp_create`; `pattern` NULL or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn rexp_handle_compile(
    handle: *mut RegexHandle,
    pattern: *const c_char,
    flags: u8,
) -> i32 {
    if handle.is_null() {
        return RegexError::BadPattern.code();
    }
    let regex = &mut *(handle as *mut PosixRegex);
    catch_panic!(COMPILE_UNRECOGNIZED, compile_into(regex, pattern, flags))
}

/// # Safety
/// `handle` from `rexp_create`; `subject` NULL or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn rexp_handle_execute(
    handle: *mut RegexHandle,
    subject: *const c_char,
    flags: u8,
) -> *const MatchSpan {
    if handle.is_null() {
        return ptr::null();
    }
    let regex = &mut *(handle as *mut PosixRegex);
    catch_panic!(ptr::null(), execute_on(regex, subject, flags))
}

/// # Safety
/// `handle` must be NULL or come from `rexp_create`.
#[no_mangle]
pub unsafe extern "C" fn rexp_handle_release(handle: *mut RegexHandle) {
    if handle.is_null() {
        return;
    }
    let regex = &mut *(handle as *mut PosixRegex);
    regex.release();
}
