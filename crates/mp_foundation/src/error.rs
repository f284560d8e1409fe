// crates/mp_foundation/src/error.rs

//! 应用层错误
//!
//! 网格、追踪、配置、IO 各层保留自己的错误枚举，跨层交给命令行时统一转换为
//! [`MpError`]。`MpError` 只区分调用方需要区分的失败类别，并给出进程退出码。
//!
//! ```
//! use mp_foundation::error::{MpError, MpResult};
//!
//! fn open_case() -> MpResult<()> {
//!     Err(MpError::file_not_found("case/snapshot.json"))
//! }
//!
//! let err = open_case().unwrap_err();
//! assert_eq!(err.exit_code(), 66);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type MpResult<T> = Result<T, MpError>;

/// 未归类错误的退出码
pub const EXIT_FAILURE: u8 = 1;

/// mptrack 应用层错误
#[derive(Error, Debug)]
pub enum MpError {
    /// 输入文件不存在
    #[error("文件不存在: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// 文件读写失败
    #[error("读写失败: {context}")]
    Io {
        context: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// 文件内容无法解析
    #[error("解析失败: {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    /// 网格或流场数据不一致
    #[error("算例数据无效: {message}")]
    InvalidCase { message: String },

    /// 追踪配置无效
    #[error("配置无效: {message}")]
    Config { message: String },

    /// patch 名称在网格中不存在
    #[error("patch 不存在: {name}")]
    PatchNotFound { name: String },

    /// 程序内部不变量被破坏
    #[error("内部错误: {message}")]
    Internal { message: String },
}

impl MpError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn io(context: impl Into<String>, source: Option<std::io::Error>) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn invalid_case(message: impl Into<String>) -> Self {
        Self::InvalidCase {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn patch_not_found(name: impl Into<String>) -> Self {
        Self::PatchNotFound { name: name.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 进程退出码（取值参照 BSD sysexits）
    ///
    /// | 类别 | 退出码 |
    /// |------|--------|
    /// | 数据无法解析或不一致 | 65 |
    /// | 输入文件不存在 | 66 |
    /// | 内部错误 | 70 |
    /// | 读写失败 | 74 |
    /// | 配置无效、patch 不存在 | 78 |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Parse { .. } | Self::InvalidCase { .. } => 65,
            Self::FileNotFound { .. } => 66,
            Self::Internal { .. } => 70,
            Self::Io { .. } => 74,
            Self::Config { .. } | Self::PatchNotFound { .. } => 78,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ensure, require};

    #[test]
    fn test_display_names_offending_item() {
        let err = MpError::patch_not_found("outlet_2");
        assert!(err.to_string().contains("outlet_2"));

        let err = MpError::file_not_found("case/snapshot.json");
        assert!(err.to_string().contains("snapshot.json"));
    }

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let io = MpError::io("写出汇总表", Some(std::io::Error::other("disk full")));
        assert_eq!(io.exit_code(), 74);
        assert_eq!(MpError::file_not_found("a").exit_code(), 66);
        assert_eq!(MpError::parse("a", "eof").exit_code(), 65);
        assert_eq!(MpError::invalid_case("U 长度").exit_code(), 65);
        assert_eq!(MpError::config("max_steps").exit_code(), 78);
        assert_eq!(MpError::patch_not_found("inlet").exit_code(), 78);
        assert_eq!(MpError::internal("bug").exit_code(), 70);
        assert_ne!(MpError::internal("bug").exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let err = MpError::io("读取配置", Some(std::io::Error::other("denied")));
        assert!(err.source().is_some());
        assert!(MpError::io("读取配置", None).source().is_none());
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: i32) -> MpResult<()> {
            ensure!(value > 0, MpError::config("value must be positive"));
            Ok(())
        }

        assert!(check(1).is_ok());
        assert!(check(-1).is_err());
    }

    #[test]
    fn test_require_macro() {
        fn get_value(opt: Option<i32>) -> MpResult<i32> {
            let v = require!(opt, MpError::patch_not_found("value"));
            Ok(v)
        }

        assert_eq!(get_value(Some(42)).unwrap(), 42);
        assert!(get_value(None).is_err());
    }
}
