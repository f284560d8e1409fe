// crates/mp_track/src/particle.rs

//! 粒子状态
//!
//! 粒子在种子点创建，轨迹首点为种子，年龄和距离为零，状态为 `Active`。
//! 只有追踪器的步进循环会修改粒子；终止后状态只写入一次，之后不再步进。

use std::fmt;

use glam::DVec3;
use mp_mesh::CellId;
use serde::{Deserialize, Serialize};

// ============================================================
// 终止状态
// ============================================================

/// 粒子状态
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleStatus {
    /// 追踪中
    #[default]
    Active,
    /// 达到最大步数被强制终止
    Killed,
    /// 从指定出口 patch 离开网格
    ExitedOutlet(String),
    /// 停在计算域内（撞壁、停滞或种子在网格外）
    StoppedInternal,
}

impl ParticleStatus {
    /// 是否已终止
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    /// 是否被强制终止
    #[inline]
    pub fn is_killed(&self) -> bool {
        matches!(self, Self::Killed)
    }

    /// 是否从出口离开
    #[inline]
    pub fn has_exited(&self) -> bool {
        matches!(self, Self::ExitedOutlet(_))
    }

    /// 出口 patch 名称
    pub fn outlet_name(&self) -> Option<&str> {
        match self {
            Self::ExitedOutlet(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ParticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Killed => write!(f, "killed"),
            Self::ExitedOutlet(name) => write!(f, "exited via '{}'", name),
            Self::StoppedInternal => write!(f, "stopped"),
        }
    }
}

/// 停在域内的原因（仅诊断用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// 离开网格但最后单元不属于任何出口
    WallHit,
    /// 遇到零速度或无法计算时间步
    Stagnation,
    /// 种子点不在网格内
    SeedOutsideDomain,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::WallHit => "wall hit",
            Self::Stagnation => "stagnation",
            Self::SeedOutsideDomain => "seed outside domain",
        };
        f.write_str(s)
    }
}

// ============================================================
// 粒子
// ============================================================

/// 无质量粒子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// 粒子编号（从 1 开始）
    pub id: usize,
    position: DVec3,
    age: f64,
    distance: f64,
    trajectory: Vec<DVec3>,
    status: ParticleStatus,
    stop_reason: Option<StopReason>,
    last_cell: Option<CellId>,
}

impl Particle {
    /// 在种子点创建粒子
    pub fn new(id: usize, seed: DVec3) -> Self {
        Self {
            id,
            position: seed,
            age: 0.0,
            distance: 0.0,
            trajectory: vec![seed],
            status: ParticleStatus::Active,
            stop_reason: None,
            last_cell: None,
        }
    }

    /// 当前位置
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// 种子点
    #[inline]
    pub fn seed(&self) -> DVec3 {
        self.trajectory[0]
    }

    /// 累计时间
    #[inline]
    pub fn age(&self) -> f64 {
        self.age
    }

    /// 累计行程
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// 轨迹点（首点为种子）
    #[inline]
    pub fn trajectory(&self) -> &[DVec3] {
        &self.trajectory
    }

    /// 已积分步数
    #[inline]
    pub fn steps(&self) -> usize {
        self.trajectory.len() - 1
    }

    /// 状态
    #[inline]
    pub fn status(&self) -> &ParticleStatus {
        &self.status
    }

    /// 停在域内的原因
    #[inline]
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// 最后一次成功定位的单元
    #[inline]
    pub fn last_cell(&self) -> Option<CellId> {
        self.last_cell
    }

    /// 是否仍在追踪
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub(crate) fn set_last_cell(&mut self, cell: CellId) {
        self.last_cell = Some(cell);
    }

    /// 前进一步
    pub(crate) fn advance(&mut self, displacement: DVec3, dt: f64) {
        debug_assert!(self.is_active(), "粒子 {} 已终止", self.id);
        self.position += displacement;
        self.trajectory.push(self.position);
        self.distance += displacement.length();
        self.age += dt;
    }

    /// 写入终止状态
    pub(crate) fn finish(&mut self, status: ParticleStatus, reason: Option<StopReason>) {
        debug_assert!(self.is_active(), "粒子 {} 重复终止", self.id);
        debug_assert!(status.is_terminal());
        self.status = status;
        self.stop_reason = reason;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_particle() {
        let p = Particle::new(1, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.trajectory(), &[DVec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(p.steps(), 0);
        assert_eq!(p.age(), 0.0);
        assert_eq!(p.distance(), 0.0);
        assert!(p.is_active());
        assert!(p.last_cell().is_none());
    }

    #[test]
    fn test_advance_accumulates() {
        let mut p = Particle::new(1, DVec3::ZERO);
        p.advance(DVec3::new(3.0, 4.0, 0.0), 0.5);
        p.advance(DVec3::new(0.0, 0.0, 1.0), 0.25);

        assert_eq!(p.steps(), 2);
        assert_eq!(p.position(), DVec3::new(3.0, 4.0, 1.0));
        assert!((p.distance() - 6.0).abs() < 1e-12);
        assert!((p.age() - 0.75).abs() < 1e-12);
        assert_eq!(p.seed(), DVec3::ZERO);
    }

    #[test]
    fn test_finish() {
        let mut p = Particle::new(7, DVec3::ZERO);
        p.finish(ParticleStatus::ExitedOutlet("outlet".into()), None);
        assert!(!p.is_active());
        assert!(p.status().has_exited());
        assert_eq!(p.status().outlet_name(), Some("outlet"));
        assert!(!p.status().is_killed());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ParticleStatus::Killed.to_string(), "killed");
        assert_eq!(
            ParticleStatus::ExitedOutlet("out".into()).to_string(),
            "exited via 'out'"
        );
        assert_eq!(StopReason::WallHit.to_string(), "wall hit");
    }
}
