// crates/mp_mesh/src/generation.rs

//! 网格生成模块
//!
//! 提供结构化六面体盒子网格生成器，用于测试和演示算例：
//!
//! ```rust
//! use glam::DVec3;
//! use mp_mesh::generation::BoxMeshGenerator;
//!
//! let mesh = BoxMeshGenerator::new([4, 2, 1], DVec3::ZERO, DVec3::new(4.0, 2.0, 1.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mesh.n_cells(), 8);
//! assert_eq!(mesh.patches().len(), 6);
//! ```
//!
//! 生成的 patch 依次为 `xmin`, `xmax`, `ymin`, `ymax`, `zmin`, `zmax`。

use glam::DVec3;

use crate::error::{MeshError, MeshResult};
use crate::polymesh::{BoundaryPatch, PolyMesh};

/// 盒子网格 patch 名称（生成顺序）
pub const BOX_PATCH_NAMES: [&str; 6] = ["xmin", "xmax", "ymin", "ymax", "zmin", "zmax"];

/// 结构化六面体盒子网格生成器
///
/// 节点和单元均按 x 最快、z 最慢的顺序编号。
#[derive(Debug, Clone)]
pub struct BoxMeshGenerator {
    /// 各方向单元数
    divisions: [usize; 3],
    /// 最小角点
    min: DVec3,
    /// 最大角点
    max: DVec3,
}

impl BoxMeshGenerator {
    /// 创建盒子网格生成器
    ///
    /// # 参数
    ///
    /// - `divisions`: x/y/z 方向单元数
    /// - `min`: 最小角点
    /// - `max`: 最大角点
    pub fn new(divisions: [usize; 3], min: DVec3, max: DVec3) -> Self {
        Self { divisions, min, max }
    }

    /// 单位立方体，单个单元
    pub fn unit_cube() -> Self {
        Self::new([1, 1, 1], DVec3::ZERO, DVec3::ONE)
    }

    /// 生成网格
    pub fn build(&self) -> MeshResult<PolyMesh> {
        let [nx, ny, nz] = self.divisions;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(MeshError::invalid_topology(
                "BoxMeshGenerator::build",
                format!("单元数必须为正: {:?}", self.divisions),
            ));
        }
        let extent = self.max - self.min;
        if extent.min_element() <= 0.0 {
            return Err(MeshError::invalid_topology(
                "BoxMeshGenerator::build",
                format!("角点无效: min={:?}, max={:?}", self.min, self.max),
            ));
        }

        // 节点数不小于单元数，节点编号放得进 u32 即可
        let n_points = self
            .divisions
            .iter()
            .try_fold(1usize, |acc, &n| n.checked_add(1).and_then(|m| acc.checked_mul(m)))
            .filter(|&n| u32::try_from(n).is_ok())
            .ok_or_else(|| {
                MeshError::invalid_topology(
                    "BoxMeshGenerator::build",
                    format!("节点数超出 u32 索引范围: {:?}", self.divisions),
                )
            })?;

        let spacing = extent / DVec3::new(nx as f64, ny as f64, nz as f64);

        let pid = |i: usize, j: usize, k: usize| (i + (nx + 1) * (j + (ny + 1) * k)) as u32;
        let cid = |i: usize, j: usize, k: usize| (i + nx * (j + ny * k)) as u32;

        let mut points = Vec::with_capacity(n_points);
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    points.push(self.min + spacing * DVec3::new(i as f64, j as f64, k as f64));
                }
            }
        }

        let mut faces: Vec<Vec<u32>> = Vec::new();
        let mut owner = Vec::new();
        let mut neighbour = Vec::new();

        // ===== 内部面（法向 owner -> neighbour） =====
        for k in 0..nz {
            for j in 0..ny {
                for i in 1..nx {
                    faces.push(vec![pid(i, j, k), pid(i, j + 1, k), pid(i, j + 1, k + 1), pid(i, j, k + 1)]);
                    owner.push(cid(i - 1, j, k));
                    neighbour.push(cid(i, j, k));
                }
            }
        }
        for k in 0..nz {
            for j in 1..ny {
                for i in 0..nx {
                    faces.push(vec![pid(i, j, k), pid(i, j, k + 1), pid(i + 1, j, k + 1), pid(i + 1, j, k)]);
                    owner.push(cid(i, j - 1, k));
                    neighbour.push(cid(i, j, k));
                }
            }
        }
        for k in 1..nz {
            for j in 0..ny {
                for i in 0..nx {
                    faces.push(vec![pid(i, j, k), pid(i + 1, j, k), pid(i + 1, j + 1, k), pid(i, j + 1, k)]);
                    owner.push(cid(i, j, k - 1));
                    neighbour.push(cid(i, j, k));
                }
            }
        }

        // ===== 边界面（法向朝外） =====
        let mut patches = Vec::with_capacity(6);
        let mut push_patch = |name: &str, faces: &Vec<Vec<u32>>, start: usize| {
            patches.push(BoundaryPatch::new(name, start, faces.len() - start));
        };

        let start = faces.len();
        for k in 0..nz {
            for j in 0..ny {
                faces.push(vec![pid(0, j, k), pid(0, j, k + 1), pid(0, j + 1, k + 1), pid(0, j + 1, k)]);
                owner.push(cid(0, j, k));
            }
        }
        push_patch(BOX_PATCH_NAMES[0], &faces, start);

        let start = faces.len();
        for k in 0..nz {
            for j in 0..ny {
                faces.push(vec![pid(nx, j, k), pid(nx, j + 1, k), pid(nx, j + 1, k + 1), pid(nx, j, k + 1)]);
                owner.push(cid(nx - 1, j, k));
            }
        }
        push_patch(BOX_PATCH_NAMES[1], &faces, start);

        let start = faces.len();
        for k in 0..nz {
            for i in 0..nx {
                faces.push(vec![pid(i, 0, k), pid(i + 1, 0, k), pid(i + 1, 0, k + 1), pid(i, 0, k + 1)]);
                owner.push(cid(i, 0, k));
            }
        }
        push_patch(BOX_PATCH_NAMES[2], &faces, start);

        let start = faces.len();
        for k in 0..nz {
            for i in 0..nx {
                faces.push(vec![pid(i, ny, k), pid(i, ny, k + 1), pid(i + 1, ny, k + 1), pid(i + 1, ny, k)]);
                owner.push(cid(i, ny - 1, k));
            }
        }
        push_patch(BOX_PATCH_NAMES[3], &faces, start);

        let start = faces.len();
        for j in 0..ny {
            for i in 0..nx {
                faces.push(vec![pid(i, j, 0), pid(i, j + 1, 0), pid(i + 1, j + 1, 0), pid(i + 1, j, 0)]);
                owner.push(cid(i, j, 0));
            }
        }
        push_patch(BOX_PATCH_NAMES[4], &faces, start);

        let start = faces.len();
        for j in 0..ny {
            for i in 0..nx {
                faces.push(vec![pid(i, j, nz), pid(i + 1, j, nz), pid(i + 1, j + 1, nz), pid(i, j + 1, nz)]);
                owner.push(cid(i, j, nz - 1));
            }
        }
        push_patch(BOX_PATCH_NAMES[5], &faces, start);

        PolyMesh::from_parts(points, faces, owner, neighbour, patches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_faces_point_owner_to_neighbour() {
        let mesh = BoxMeshGenerator::new([2, 2, 2], DVec3::ZERO, DVec3::splat(1.0))
            .build()
            .unwrap();
        assert_eq!(mesh.n_internal_faces(), 12);
        for f in 0..mesh.n_internal_faces() {
            let o = mesh.cell_centre(mesh.face_owner(f));
            let n = mesh.cell_centre(mesh.face_neighbour(f).unwrap());
            assert!(mesh.face_area(f).dot(n - o) > 0.0);
        }
    }

    #[test]
    fn test_patch_names_and_sizes() {
        let mesh = BoxMeshGenerator::new([3, 2, 1], DVec3::ZERO, DVec3::new(3.0, 2.0, 1.0))
            .build()
            .unwrap();
        let names: Vec<&str> = mesh.patches().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, BOX_PATCH_NAMES.to_vec());
        let sizes: Vec<usize> = mesh.patches().iter().map(|p| p.n_faces).collect();
        assert_eq!(sizes, vec![2, 2, 3, 3, 6, 6]);
    }

    #[test]
    fn test_invalid_divisions() {
        assert!(BoxMeshGenerator::new([0, 1, 1], DVec3::ZERO, DVec3::ONE).build().is_err());
        assert!(BoxMeshGenerator::new([1, 1, 1], DVec3::ONE, DVec3::ZERO).build().is_err());
    }

    #[test]
    fn test_point_count_beyond_u32_is_rejected() {
        // 2^16 x 2^16 x 1 个单元有 (2^16 + 1)^2 * 2 > u32::MAX 个节点，须在分配前拒绝
        let err = BoxMeshGenerator::new([1 << 16, 1 << 16, 1], DVec3::ZERO, DVec3::ONE)
            .build()
            .unwrap_err();
        assert!(matches!(err, MeshError::InvalidTopology { .. }));
        assert!(err.to_string().contains("u32"));

        let err = BoxMeshGenerator::new([usize::MAX, 2, 2], DVec3::ZERO, DVec3::ONE)
            .build()
            .unwrap_err();
        assert!(matches!(err, MeshError::InvalidTopology { .. }));
    }
}
