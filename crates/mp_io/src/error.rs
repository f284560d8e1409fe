// crates/mp_io/src/error.rs
//! IO 错误类型定义
//!
//! 提供 IO 模块的统一错误枚举，支持通过 thiserror 自动转换底层错误。
//! 交给命令行时转换为 `MpError`，缺失文件单独归类。

use std::path::{Path, PathBuf};

use mp_foundation::MpError;
use mp_mesh::MeshError;
use thiserror::Error;

/// IO 模块结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 文件读写失败
    #[error("文件操作失败: {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 解析错误
    #[error("文件解析错误: {file} - {message}")]
    ParseError { file: String, message: String },

    /// 导出失败
    #[error("导出失败: {}: {message}", path.display())]
    Export { path: PathBuf, message: String },

    /// 网格/场数据错误
    #[error("网格数据错误: {0}")]
    Mesh(#[from] MeshError),
}

impl IoError {
    /// 包装带路径的 IO 错误
    pub fn file(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// 创建解析错误
    pub fn parse(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.as_ref().display().to_string(),
            message: message.into(),
        }
    }
}

impl From<IoError> for MpError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::File { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                MpError::file_not_found(path)
            }
            IoError::File { path, source } => {
                MpError::io(path.display().to_string(), Some(source))
            }
            IoError::ParseError { file, message } => MpError::parse(file, message),
            IoError::Export { path, message } => {
                MpError::io(format!("导出失败 [{}]: {message}", path.display()), None)
            }
            IoError::Mesh(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_names_path() {
        let err = IoError::file(
            "case/snapshot.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("case/snapshot.json"));

        let mp: MpError = err.into();
        assert!(matches!(mp, MpError::FileNotFound { .. }));
    }

    #[test]
    fn test_mesh_error_conversion() {
        let err: IoError = MeshError::size_mismatch("U", 4, 3).into();
        let mp: MpError = err.into();
        assert!(matches!(mp, MpError::InvalidCase { .. }));
    }
}
