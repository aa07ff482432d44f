//! 日志桥接 FFI 模块
//!
//! Every record carries the shim operation that produced it (`"rexp.compile"`,
//! `"ncrs.probe"`, ...) next to the message text. The host either registers a
//! callback that receives both, or lets records fall through to `tracing`,
//! where the operation becomes the `op` field.
//!
//! ```ignore
//! shim_log_warn!("ncrs.probe", "setupterm failed: {}", err);
//! ```

use std::ffi::{c_char, CString};
use std::fmt;
use std::sync::atomic::{AtomicPtr, AtomicU8, Ordering};

/// Log level as seen by the host
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShimLogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

/// Host log callback
///
/// `op` names the shim operation, `message` is the text; both are UTF-8 C
/// strings valid only for the duration of the call. Invoked on whichever
/// thread made the shim call.
pub type LogCallback =
    extern "C" fn(level: ShimLogLevel, op: *const c_char, message: *const c_char);

static LOG_CALLBACK: AtomicPtr<()> = AtomicPtr::new(std::ptr::null_mut());
static MIN_LEVEL: AtomicU8 = AtomicU8::new(ShimLogLevel::Debug as u8);

/// 设置日志回调
#[no_mangle]
pub extern "C" fn fingerprint_set_log_callback(callback: LogCallback) {
    LOG_CALLBACK.store(callback as *mut (), Ordering::Release);
}

/// 清除日志回调
#[no_mangle]
pub extern "C" fn fingerprint_clear_log_callback() {
    LOG_CALLBACK.store(std::ptr::null_mut(), Ordering::Release);
}

/// Drop records below `level`; applies to the callback and to `tracing`
#[no_mangle]
pub extern "C" fn fingerprint_set_log_level(level: ShimLogLevel) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
pub fn log_enabled(level: ShimLogLevel) -> bool {
    level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
}

/// Deliver one record; formatting happens only if the level passes the filter
pub fn log_message(level: ShimLogLevel, op: &str, message: fmt::Arguments<'_>) {
    if !log_enabled(level) {
        return;
    }

    let callback = LOG_CALLBACK.load(Ordering::Acquire);
    if !callback.is_null() {
        if let (Ok(op_c), Ok(text_c)) = (CString::new(op), CString::new(message.to_string())) {
            let callback: LogCallback = unsafe { std::mem::transmute(callback) };
            callback(level, op_c.as_ptr(), text_c.as_ptr());
            return;
        }
    }

    match level {
        ShimLogLevel::Debug => tracing::debug!(op, "{}", message),
        ShimLogLevel::Info => tracing::info!(op, "{}", message),
        ShimLogLevel::Warn => tracing::warn!(op, "{}", message),
        ShimLogLevel::Error => tracing::error!(op, "{}", message),
    }
}

#[macro_export]
#[doc(hidden)]
macro_rules! shim_log {
    ($level:ident, $op:expr, $($arg:tt)+) => {
        $crate::ffi::logging::log_message(
            $crate::ffi::logging::ShimLogLevel::$level,
            $op,
            format_args!($($arg)+),
        )
    };
}

#[macro_export]
macro_rules! shim_log_debug {
    ($op:expr, $($arg:tt)+) => { $crate::shim_log!(Debug, $op, $($arg)+) };
}

#[macro_export]
macro_rules! shim_log_info {
    ($op:expr, $($arg:tt)+) => { $crate::shim_log!(Info, $op, $($arg)+) };
}

#[macro_export]
macro_rules! shim_log_warn {
    ($op:expr, $($arg:tt)+) => { $crate::shim_log!(Warn, $op, $($arg)+) };
}

#[macro_export]
macro_rules! shim_log_error {
    ($op:expr, $($arg:tt)+) => { $crate::shim_log!(Error, $op, $($arg)+) };
}
