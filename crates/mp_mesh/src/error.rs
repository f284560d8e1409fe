// crates/mp_mesh/src/error.rs

//! 网格处理错误类型
//!
//! 包含网格拓扑、几何、场数据等错误定义。
//! 所有错误可转换为 `mp_foundation::MpError` 向上传播。

use mp_foundation::MpError;
use thiserror::Error;

/// 网格模块结果类型
pub type MeshResult<T> = Result<T, MeshError>;

/// 网格错误枚举
#[derive(Error, Debug)]
pub enum MeshError {
    /// 拓扑错误
    #[error("拓扑错误: {operation} 失败, {details}")]
    InvalidTopology {
        operation: &'static str,
        details: String,
    },

    /// 数组长度不匹配
    #[error("数组长度不匹配: {name} 期望 {expected}, 实际 {actual}")]
    SizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// 退化单元（体积非正）
    #[error("退化单元: 单元 {cell_id} 体积 {volume:.3e}")]
    DegenerateCell { cell_id: usize, volume: f64 },

    /// 退化面（顶点不足或面积为零）
    #[error("退化面: 面 {face_id}, {message}")]
    DegenerateFace { face_id: usize, message: String },
}

/// 网格错误在应用层均视为算例数据无效
impl From<MeshError> for MpError {
    fn from(err: MeshError) -> Self {
        MpError::invalid_case(err.to_string())
    }
}

/// 便捷构造函数
impl MeshError {
    pub fn invalid_topology(operation: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidTopology {
            operation,
            details: details.into(),
        }
    }

    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    pub fn degenerate_cell(cell_id: usize, volume: f64) -> Self {
        Self::DegenerateCell { cell_id, volume }
    }

    pub fn degenerate_face(face_id: usize, message: impl Into<String>) -> Self {
        Self::DegenerateFace {
            face_id,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_to_foundation() {
        let mesh_err = MeshError::invalid_topology("from_parts", "owner 越界");
        let foundation_err: MpError = mesh_err.into();
        assert!(foundation_err.to_string().contains("owner 越界"));
        assert!(matches!(foundation_err, MpError::InvalidCase { .. }));
    }

    #[test]
    fn test_size_mismatch_keeps_field_name() {
        let err: MpError = MeshError::size_mismatch("phi", 12, 11).into();
        assert!(err.to_string().contains("phi"));
        assert_eq!(err.exit_code(), 65);
    }
}
