// crates/mp_config/src/error.rs

//! 配置层错误类型

use mp_foundation::MpError;
use mp_track::TrackError;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 缺失配置
    #[error("缺失配置: {0}")]
    Missing(String),

    /// 未知的种子方法
    #[error("未知的种子方法 '{0}'，可选: points, patch, backTrack")]
    UnknownMethod(String),
}

impl ConfigError {
    /// 创建无效值错误
    pub fn invalid(key: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for TrackError {
    fn from(err: ConfigError) -> Self {
        TrackError::configuration(err.to_string())
    }
}

impl From<ConfigError> for MpError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => MpError::io("读写配置文件失败", Some(e)),
            other => MpError::config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("max_steps", 0, "必须为正");
        assert!(err.to_string().contains("max_steps"));

        let err = ConfigError::UnknownMethod("advance".into());
        assert!(err.to_string().contains("advance"));
    }

    #[test]
    fn test_into_foundation_error() {
        let err: MpError = ConfigError::invalid("max_steps", 0, "必须为正").into();
        assert!(matches!(err, MpError::Config { .. }));
        assert!(err.to_string().contains("max_steps"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MpError = ConfigError::Io(io).into();
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn test_into_track_error() {
        let err: TrackError = ConfigError::Missing("method".into()).into();
        assert!(matches!(err, TrackError::Configuration { .. }));
        assert!(err.is_fatal());
    }
}
