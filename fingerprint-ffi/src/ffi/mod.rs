//! FFI 模块 - C ABI 导出
//!
//! - ncrs: curses terminal adapter
//! - rexp: POSIX regex adapter
//! - logging: log bridge to the host

pub mod logging;
pub mod ncrs;
pub mod rexp;

pub use logging::*;
pub use ncrs::*;
pub use rexp::*;

/// Boolean status handed to the host
pub(crate) const SUCCESS: u8 = 1;
pub(crate) const FAILURE: u8 = 0;
