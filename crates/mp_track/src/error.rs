// crates/mp_track/src/error.rs

//! 追踪错误类型
//!
//! 会话级错误（配置、patch 不存在）直接中止会话；
//! 粒子级错误（速度停滞、种子在网格外）在追踪器内部恢复为粒子终止状态。

use glam::DVec3;
use mp_foundation::MpError;
use mp_mesh::CellId;
use thiserror::Error;

/// 追踪结果类型
pub type TrackResult<T> = Result<T, TrackError>;

/// 追踪错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// 配置错误（会话开始前）
    #[error("配置错误: {message}")]
    Configuration {
        /// 错误描述
        message: String,
    },

    /// patch 不存在
    #[error("patch 不存在: {patch}")]
    PatchNotFound {
        /// patch 名称
        patch: String,
    },

    /// 速度为零，粒子无法前进
    #[error("单元 {cell} 速度停滞: |U| = {speed:e}")]
    Stagnation {
        /// 单元
        cell: CellId,
        /// 速度大小
        speed: f64,
    },

    /// 单元体积无效，无法计算时间步
    #[error("单元 {cell} 体积无效: {volume:e}")]
    InvalidVolume {
        /// 单元
        cell: CellId,
        /// 体积
        volume: f64,
    },

    /// 种子点不在网格内
    #[error("种子点 {position} 不在网格内")]
    OutOfDomainOnSeed {
        /// 种子坐标
        position: DVec3,
    },
}

impl TrackError {
    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// 创建 patch 不存在错误
    pub fn patch_not_found(patch: impl Into<String>) -> Self {
        Self::PatchNotFound {
            patch: patch.into(),
        }
    }

    /// 是否为会话级致命错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::PatchNotFound { .. })
    }
}

impl From<TrackError> for MpError {
    fn from(err: TrackError) -> Self {
        match err {
            TrackError::Configuration { message } => MpError::config(message),
            TrackError::PatchNotFound { patch } => MpError::patch_not_found(patch),
            // 粒子级错误在追踪器内部恢复，逃逸到会话外说明状态机有缺陷
            other => MpError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(TrackError::configuration("bad").is_fatal());
        assert!(TrackError::patch_not_found("outlet").is_fatal());
        assert!(!TrackError::Stagnation {
            cell: CellId::new(0),
            speed: 0.0
        }
        .is_fatal());
        assert!(!TrackError::OutOfDomainOnSeed {
            position: DVec3::ZERO
        }
        .is_fatal());
    }

    #[test]
    fn test_display_names_offending_value() {
        let err = TrackError::patch_not_found("outlet_2");
        assert!(err.to_string().contains("outlet_2"));

        let mp: MpError = err.into();
        assert!(matches!(mp, MpError::PatchNotFound { ref name } if name == "outlet_2"));

        let mp: MpError = TrackError::Stagnation {
            cell: CellId::new(3),
            speed: 0.0,
        }
        .into();
        assert!(matches!(mp, MpError::Internal { .. }));
    }
}
