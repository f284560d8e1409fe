// crates/mp_track/src/seed.rs

//! 种子策略
//!
//! 三种生成初始粒子位置的方式：
//! - [`SeedStrategy::Points`]: 显式坐标列表
//! - [`SeedStrategy::Patch`]: patch 面单元质心，方向给定
//! - [`SeedStrategy::PatchAuto`]: patch 面单元质心，按净通量符号判断方向
//!
//! patch 种子按面顺序逐面生成，同一单元有多个面在 patch 上时会重复出现。

use glam::DVec3;
use mp_foundation::ensure;
use mp_mesh::{FlowOracle, FluxSign, PatchEntry};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{TrackError, TrackResult};
use crate::step::Direction;

/// 由 patch 净通量符号判断追踪方向
///
/// 净流入（入口）正向追踪；净流出或零通量视为出口，反向追踪。
#[inline]
pub fn detect_direction(sign: FluxSign) -> Direction {
    match sign {
        FluxSign::Negative => Direction::Forward,
        FluxSign::Zero | FluxSign::Positive => Direction::Backward,
    }
}

/// 种子策略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SeedStrategy {
    /// 显式坐标列表
    Points {
        /// 种子坐标
        positions: Vec<DVec3>,
        /// 追踪方向
        direction: Direction,
    },
    /// patch 单元质心，方向给定
    Patch {
        /// patch 名称
        patch: String,
        /// 追踪方向
        direction: Direction,
    },
    /// patch 单元质心，方向由净通量判断
    PatchAuto {
        /// patch 名称
        patch: String,
    },
}

/// 种子来源
#[derive(Debug, Clone, PartialEq)]
pub enum SeedSource {
    /// 显式坐标
    Explicit,
    /// patch 单元质心
    Patch {
        /// patch 名称
        name: String,
        /// 自动判断方向时的净通量符号
        detected: Option<FluxSign>,
    },
}

/// 解析后的种子计划
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    /// 种子点（顺序即粒子编号顺序）
    pub points: Vec<DVec3>,
    /// 追踪方向
    pub direction: Direction,
    /// 来源
    pub source: SeedSource,
}

impl SeedPlan {
    /// 种子数量
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 是否没有种子
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 源 patch 名称
    pub fn source_patch(&self) -> Option<&str> {
        match &self.source {
            SeedSource::Patch { name, .. } => Some(name),
            SeedSource::Explicit => None,
        }
    }

    /// 种子集是否来自出口（反向追踪的 patch 种子）
    pub fn is_outlet_sourced(&self) -> bool {
        matches!(self.source, SeedSource::Patch { .. }) && self.direction == Direction::Backward
    }
}

impl SeedStrategy {
    /// 显式坐标，正向追踪
    pub fn points(positions: Vec<DVec3>) -> Self {
        Self::Points {
            positions,
            direction: Direction::Forward,
        }
    }

    /// 引用的 patch 名称
    pub fn patch_name(&self) -> Option<&str> {
        match self {
            Self::Points { .. } => None,
            Self::Patch { patch, .. } | Self::PatchAuto { patch } => Some(patch),
        }
    }

    /// 解析为种子计划
    ///
    /// # 错误
    ///
    /// - 坐标列表为空或含非有限值: [`TrackError::Configuration`]
    /// - patch 不存在: [`TrackError::PatchNotFound`]
    pub fn resolve<O: FlowOracle + ?Sized>(&self, oracle: &O) -> TrackResult<SeedPlan> {
        let plan = match self {
            Self::Points {
                positions,
                direction,
            } => {
                ensure!(
                    !positions.is_empty(),
                    TrackError::configuration("种子坐标列表为空")
                );
                if let Some((i, p)) = positions.iter().enumerate().find(|(_, p)| !p.is_finite()) {
                    return Err(TrackError::configuration(format!(
                        "第 {} 个种子坐标无效: {}",
                        i + 1,
                        p
                    )));
                }
                SeedPlan {
                    points: positions.clone(),
                    direction: *direction,
                    source: SeedSource::Explicit,
                }
            }
            Self::Patch { patch, direction } => {
                let entry = Self::lookup(oracle, patch)?;
                SeedPlan {
                    points: Self::centroids(oracle, &entry),
                    direction: *direction,
                    source: SeedSource::Patch {
                        name: entry.name,
                        detected: None,
                    },
                }
            }
            Self::PatchAuto { patch } => {
                let entry = Self::lookup(oracle, patch)?;
                let sign = oracle.net_flux_sign(&entry);
                let direction = detect_direction(sign);
                info!(
                    "patch '{}' 净通量 {:?} ({})，{} 追踪",
                    entry.name,
                    sign,
                    sign.flow(),
                    direction
                );
                SeedPlan {
                    points: Self::centroids(oracle, &entry),
                    direction,
                    source: SeedSource::Patch {
                        name: entry.name,
                        detected: Some(sign),
                    },
                }
            }
        };

        if plan.is_empty() {
            warn!("种子计划为空，不会追踪任何粒子");
        }
        Ok(plan)
    }

    fn lookup<O: FlowOracle + ?Sized>(oracle: &O, name: &str) -> TrackResult<PatchEntry> {
        oracle
            .resolve_patch(name)
            .ok_or_else(|| TrackError::patch_not_found(name))
    }

    fn centroids<O: FlowOracle + ?Sized>(oracle: &O, entry: &PatchEntry) -> Vec<DVec3> {
        entry
            .face_cells
            .iter()
            .map(|&cell| oracle.cell_centroid(cell))
            .collect()
    }
}
