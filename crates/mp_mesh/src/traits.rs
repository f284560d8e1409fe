// crates/mp_mesh/src/traits.rs

//! 流场查询接口（FlowOracle）
//!
//! 定义粒子追踪核心所需的最小网格/流场访问契约。
//! 追踪层只通过此 trait 访问网格，不依赖 [`FlowField`](crate::FlowField) 的具体实现。
//!
//! # 符号约定
//!
//! - 面通量 `phi` 以边界面外法向为正（流出为正）
//! - patch 净通量 < 0 为入流，> 0 为出流
//!
//! # 线程安全
//!
//! 所有实现必须满足 `Send + Sync`，流场在一次追踪会话中只读，
//! 可在 Rayon 并行迭代器中共享。

use std::collections::HashSet;
use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

// =========================================================================
// 单元标识
// =========================================================================

/// 单元标识
///
/// 由 [`FlowOracle::locate_cell`] 解析得到，点在网格外时返回 `None`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(usize);

impl CellId {
    /// 从原始索引创建
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// 原始索引
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================================
// 通量符号
// =========================================================================

/// patch 净通量符号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluxSign {
    /// 净流入
    Negative,
    /// 净通量为零
    Zero,
    /// 净流出
    Positive,
}

impl FluxSign {
    /// 由净通量值判断符号（精确比较零）
    pub fn from_flux(net_flux: f64) -> Self {
        if net_flux > 0.0 {
            Self::Positive
        } else if net_flux < 0.0 {
            Self::Negative
        } else {
            Self::Zero
        }
    }

    /// 对应的 patch 流向
    pub fn flow(self) -> PatchFlow {
        match self {
            Self::Negative => PatchFlow::Inflow,
            Self::Positive => PatchFlow::Outflow,
            Self::Zero => PatchFlow::Unknown,
        }
    }
}

/// patch 流向分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchFlow {
    /// 入流边界
    Inflow,
    /// 出流边界
    Outflow,
    /// 无净通量
    Unknown,
}

impl fmt::Display for PatchFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inflow => "Inflow",
            Self::Outflow => "Outflow",
            Self::Unknown => "Unknown",
        };
        f.pad(s)
    }
}

// =========================================================================
// patch 条目
// =========================================================================

/// 边界 patch 条目
///
/// `face_cells` 按面顺序列出每个边界面的 owner 单元，
/// 一个单元有多个面在该 patch 上时会重复出现。
#[derive(Debug, Clone, PartialEq)]
pub struct PatchEntry {
    /// patch 名称
    pub name: String,
    /// patch 在网格中的序号（注册顺序）
    pub index: usize,
    /// 各边界面的 owner 单元
    pub face_cells: Vec<CellId>,
}

impl PatchEntry {
    /// 去重后的 owner 单元集合
    pub fn owning_cells(&self) -> HashSet<CellId> {
        self.face_cells.iter().copied().collect()
    }

    /// 边界面数量
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.face_cells.len()
    }
}

// =========================================================================
// FlowOracle
// =========================================================================

/// 网格/流场查询接口（只读）
///
/// 速度按单元分片常数，追踪核心不做单元内插值。
pub trait FlowOracle: Send + Sync {
    /// 定位点所在单元，点在网格外返回 `None`
    fn locate_cell(&self, point: DVec3) -> Option<CellId>;

    /// 单元速度
    fn velocity_at(&self, cell: CellId) -> DVec3;

    /// 单元体积（> 0）
    fn volume_of(&self, cell: CellId) -> f64;

    /// 单元质心
    fn cell_centroid(&self, cell: CellId) -> DVec3;

    /// 按名称解析 patch
    fn resolve_patch(&self, name: &str) -> Option<PatchEntry>;

    /// 全部 patch（注册顺序）
    fn all_patches(&self) -> Vec<PatchEntry>;

    /// patch 净通量符号（外法向为正）
    fn net_flux_sign(&self, patch: &PatchEntry) -> FluxSign;
}
