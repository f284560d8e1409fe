// crates/mp_mesh/src/spatial_index.rs

//! 单元空间索引
//!
//! 基于 R-Tree 的三维包围盒索引，用于快速筛选可能包含某点的单元。
//! 使用 rstar crate 实现，精确的点-单元判断由 [`MeshLocator`](crate::MeshLocator) 完成。

use glam::DVec3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// 单元包围盒
///
/// 存储单元的轴对齐包围盒（AABB），用于 R-Tree 索引。
#[derive(Debug, Clone, PartialEq)]
pub struct CellEnvelope {
    /// 单元索引
    pub cell_index: usize,
    /// 最小角点
    pub min: [f64; 3],
    /// 最大角点
    pub max: [f64; 3],
}

impl CellEnvelope {
    /// 由单元顶点创建包围盒，`pad` 为各方向外扩量
    pub fn new(cell_index: usize, vertices: &[DVec3], pad: f64) -> Self {
        debug_assert!(!vertices.is_empty(), "单元顶点列表不能为空");

        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for v in vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        let min = min - DVec3::splat(pad);
        let max = max + DVec3::splat(pad);

        Self {
            cell_index,
            min: min.to_array(),
            max: max.to_array(),
        }
    }

    /// 检查点是否在包围盒内（闭区间）
    #[inline]
    pub fn contains(&self, p: &[f64; 3]) -> bool {
        (0..3).all(|d| p[d] >= self.min[d] && p[d] <= self.max[d])
    }
}

impl RTreeObject for CellEnvelope {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PointDistance for CellEnvelope {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        // 点到 AABB 最短距离的平方
        (0..3)
            .map(|d| {
                let delta = if point[d] < self.min[d] {
                    self.min[d] - point[d]
                } else if point[d] > self.max[d] {
                    point[d] - self.max[d]
                } else {
                    0.0
                };
                delta * delta
            })
            .sum()
    }

    fn contains_point(&self, point: &[f64; 3]) -> bool {
        self.contains(point)
    }
}

/// 单元空间索引
#[derive(Debug)]
pub struct CellSpatialIndex {
    tree: RTree<CellEnvelope>,
    n_cells: usize,
}

impl CellSpatialIndex {
    /// 构建空间索引
    ///
    /// `get_vertices` 返回单元 `i` 的顶点坐标。
    pub fn build<F>(n_cells: usize, pad: f64, get_vertices: F) -> Self
    where
        F: Fn(usize) -> Vec<DVec3>,
    {
        let envelopes: Vec<CellEnvelope> = (0..n_cells)
            .map(|i| CellEnvelope::new(i, &get_vertices(i), pad))
            .collect();

        Self {
            tree: RTree::bulk_load(envelopes),
            n_cells,
        }
    }

    /// 包围盒包含该点的候选单元（升序）
    pub fn candidates(&self, point: DVec3) -> Vec<usize> {
        let mut cells: Vec<usize> = self
            .tree
            .locate_all_at_point(&point.to_array())
            .map(|e| e.cell_index)
            .collect();
        cells.sort_unstable();
        cells
    }

    /// 索引的单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(offset: f64) -> Vec<DVec3> {
        vec![
            DVec3::new(offset, 0.0, 0.0),
            DVec3::new(offset + 1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_envelope_distance() {
        let e = CellEnvelope::new(0, &unit_box(0.0), 0.0);
        assert_eq!(e.distance_2(&[0.5, 0.5, 0.5]), 0.0);
        assert!((e.distance_2(&[3.0, 0.5, 0.5]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_candidates_sorted() {
        let index = CellSpatialIndex::build(3, 0.0, |i| unit_box(i as f64));
        assert_eq!(index.n_cells(), 3);
        // x = 1.0 位于单元 0 和 1 的公共面上
        assert_eq!(index.candidates(DVec3::new(1.0, 0.5, 0.5)), vec![0, 1]);
        assert_eq!(index.candidates(DVec3::new(2.5, 0.5, 0.5)), vec![2]);
        assert!(index.candidates(DVec3::new(9.0, 0.5, 0.5)).is_empty());
    }
}
