// crates/mp_track/src/step.rs

//! 步长策略
//!
//! 时间步由单元特征长度和速度大小决定：
//!
//! ```text
//! dt = 0.5 * cbrt(V) / |U|
//! ```
//!
//! 即每步约前进半个单元尺度。位移为 `U * dt`，反向追踪时取反。

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use mp_mesh::CellId;
use serde::{Deserialize, Serialize};

use crate::error::{TrackError, TrackResult};

/// 单元尺度系数
pub const STEP_FRACTION: f64 = 0.5;

/// 追踪方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// 沿速度方向
    #[default]
    Forward,
    /// 逆速度方向
    Backward,
}

impl Direction {
    /// 位移符号
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

/// 与配置文件中的拼写一致，只接受小写
impl FromStr for Direction {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            other => Err(TrackError::configuration(format!(
                "未知追踪方向 '{}'，可选: forward, backward",
                other
            ))),
        }
    }
}

/// 单元内的局部时间步
///
/// 速度为零或非有限时返回 [`TrackError::Stagnation`]，
/// 体积非正或非有限时返回 [`TrackError::InvalidVolume`]。
pub fn local_time_step(cell: CellId, volume: f64, velocity: DVec3) -> TrackResult<f64> {
    let speed = velocity.length();
    if speed <= 0.0 || !speed.is_finite() {
        return Err(TrackError::Stagnation { cell, speed });
    }
    if volume <= 0.0 || !volume.is_finite() {
        return Err(TrackError::InvalidVolume { cell, volume });
    }
    Ok(STEP_FRACTION * volume.cbrt() / speed)
}

/// 单步位移
#[inline]
pub fn displacement(velocity: DVec3, dt: f64, direction: Direction) -> DVec3 {
    velocity * (dt * direction.sign())
}
