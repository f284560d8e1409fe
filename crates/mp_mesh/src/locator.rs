// crates/mp_mesh/src/locator.rs

//! 网格点定位器
//!
//! 先用 R-Tree 包围盒筛选候选单元，再判断点是否在候选单元内：
//!
//! 1. 面平面判断：点位于每个面外法向平面之后即在单元内，对凸单元充分必要
//! 2. 四面体分解：以单元中心、面中心和面的每条边构成四面体，点落在任一四面体内即在单元内，
//!    覆盖相对单元中心星形的非凸单元
//!
//! 点恰好落在两个单元的公共面上时，返回索引较小的单元。

use glam::DVec3;

use crate::geometry::VSMALL;
use crate::polymesh::PolyMesh;
use crate::spatial_index::CellSpatialIndex;

// ============================================================
// 容差配置
// ============================================================

/// 定位容差配置
///
/// 容差相对于候选单元的特征长度 `cbrt(V)`。
#[derive(Debug, Clone, Copy)]
pub struct LocateTolerance {
    /// 内部点判断的相对容差（面平面判断乘以 `cbrt(V)`，四面体判断直接作用于重心坐标）
    ///
    /// 默认值: 1e-10
    pub inside_tol: f64,

    /// 包围盒相对外扩量
    ///
    /// 默认值: 1e-8
    pub envelope_pad: f64,
}

impl Default for LocateTolerance {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl LocateTolerance {
    /// 标准容差（默认设置）
    pub const STANDARD: Self = Self {
        inside_tol: 1e-10,
        envelope_pad: 1e-8,
    };
}

/// 网格定位器
///
/// 持有网格的包围盒索引，查询本身只读，可跨线程共享。
#[derive(Debug)]
pub struct MeshLocator {
    index: CellSpatialIndex,
    tolerance: LocateTolerance,
}

impl MeshLocator {
    /// 从网格创建定位器（使用默认容差）
    pub fn new(mesh: &PolyMesh) -> Self {
        Self::with_tolerance(mesh, LocateTolerance::default())
    }

    /// 使用自定义容差创建定位器
    pub fn with_tolerance(mesh: &PolyMesh, tolerance: LocateTolerance) -> Self {
        let stats = mesh.statistics();
        let pad = tolerance.envelope_pad * stats.max_volume.cbrt();
        let index = CellSpatialIndex::build(mesh.n_cells(), pad, |i| mesh.cell_points(i));

        Self { index, tolerance }
    }

    /// 当前容差配置
    #[inline]
    pub fn tolerance(&self) -> &LocateTolerance {
        &self.tolerance
    }

    /// 空间索引
    #[inline]
    pub fn spatial_index(&self) -> &CellSpatialIndex {
        &self.index
    }

    /// 查找点所在的单元
    pub fn find_cell(&self, mesh: &PolyMesh, point: DVec3) -> Option<usize> {
        if !point.is_finite() {
            return None;
        }
        self.index
            .candidates(point)
            .into_iter()
            .find(|&cell| self.point_in_cell(mesh, cell, point))
    }

    /// 快速判断点是否在网格内
    #[inline]
    pub fn contains(&self, mesh: &PolyMesh, point: DVec3) -> bool {
        self.find_cell(mesh, point).is_some()
    }

    /// 点是否在单元内
    pub fn point_in_cell(&self, mesh: &PolyMesh, cell: usize, point: DVec3) -> bool {
        self.behind_all_faces(mesh, cell, point) || self.in_cell_tets(mesh, cell, point)
    }

    fn behind_all_faces(&self, mesh: &PolyMesh, cell: usize, point: DVec3) -> bool {
        let tol = self.tolerance.inside_tol * mesh.cell_volume(cell).cbrt();

        mesh.cell_faces(cell).iter().all(|&f| {
            let f = f as usize;
            let outward = mesh.outward_area(cell, f);
            let len = outward.length();
            (point - mesh.face_centre(f)).dot(outward) / len <= tol
        })
    }

    fn in_cell_tets(&self, mesh: &PolyMesh, cell: usize, point: DVec3) -> bool {
        let centre = mesh.cell_centre(cell);
        let points = mesh.points();

        mesh.cell_faces(cell).iter().any(|&f| {
            let f = f as usize;
            let face_centre = mesh.face_centre(f);
            let ids = mesh.face_points(f);
            (0..ids.len()).any(|i| {
                let a = points[ids[i] as usize];
                let b = points[ids[(i + 1) % ids.len()] as usize];
                point_in_tet(point, [centre, face_centre, a, b], self.tolerance.inside_tol)
            })
        })
    }
}

/// 六倍有向体积
#[inline]
fn orient(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> f64 {
    (b - a).cross(c - a).dot(d - a)
}

/// 重心坐标判断，与四面体顶点顺序无关
fn point_in_tet(p: DVec3, [a, b, c, d]: [DVec3; 4], tol: f64) -> bool {
    let volume = orient(a, b, c, d);
    if volume.abs() <= VSMALL {
        return false;
    }
    [
        orient(p, b, c, d),
        orient(a, p, c, d),
        orient(a, b, p, d),
        orient(a, b, c, p),
    ]
    .iter()
    .all(|&w| w / volume >= -tol)
}
