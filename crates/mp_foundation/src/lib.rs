// crates/mp_foundation/src/lib.rs

//! mptrack Foundation Layer
//!
//! 基础层，提供命令行统一使用的应用层错误和校验宏。
//!
//! # 模块概览
//!
//! - [`error`]: 应用层错误 `MpError` 及其退出码
//! - `ensure!` / `require!`: 条件校验宏，各层用自己的错误类型配合使用
//!
//! # 示例
//!
//! ```
//! use mp_foundation::{ensure, MpError, MpResult};
//!
//! fn check_steps(max_steps: usize) -> MpResult<usize> {
//!     ensure!(max_steps > 0, MpError::config("max_steps 必须为正整数"));
//!     Ok(max_steps)
//! }
//!
//! assert!(check_steps(10).is_ok());
//! assert!(check_steps(0).is_err());
//! ```

#![warn(clippy::all)]

pub mod error;

// 重导出常用类型
pub use error::{MpError, MpResult, EXIT_FAILURE};

/// 条件不满足时提前返回错误
///
/// `ensure!(cond, err)` 等价于 `if !cond { return Err(err.into()); }`
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

/// 解包 `Option`，为 `None` 时提前返回错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr $(,)?) => {
        match $opt {
            Some(value) => value,
            None => return Err($err.into()),
        }
    };
}
