// crates/mp_mesh/src/polymesh.rs

//! 多面体网格
//!
//! 面寻址的只读 SoA 网格布局：
//!
//! 1. **面排序**: 内部面在前，边界面按 patch 连续排列在后
//! 2. **方向**: 面积向量从 owner 指向 neighbour，边界面指向域外
//! 3. **几何**: 构造时一次性计算面/单元几何量，之后只读

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::geometry::{cell_geometry, face_geometry, FaceGeometry, VSMALL};
use crate::traits::CellId;

/// 边界 patch 定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPatch {
    /// patch 名称
    pub name: String,
    /// 起始面索引
    pub start_face: usize,
    /// 面数量
    pub n_faces: usize,
}

impl BoundaryPatch {
    /// 创建 patch 定义
    pub fn new(name: impl Into<String>, start_face: usize, n_faces: usize) -> Self {
        Self {
            name: name.into(),
            start_face,
            n_faces,
        }
    }

    /// 面索引范围
    #[inline]
    pub fn faces(&self) -> std::ops::Range<usize> {
        self.start_face..self.start_face + self.n_faces
    }
}

/// 多面体网格
#[derive(Debug, Clone)]
pub struct PolyMesh {
    // ===== 节点 =====
    points: Vec<DVec3>,

    // ===== 面 (压缩格式: offsets + indices) =====
    face_point_offsets: Vec<usize>,
    face_point_indices: Vec<u32>,
    face_owner: Vec<u32>,
    face_neighbour: Vec<u32>,
    face_centre: Vec<DVec3>,
    face_area: Vec<DVec3>,

    // ===== 单元 =====
    n_cells: usize,
    cell_face_offsets: Vec<usize>,
    cell_face_indices: Vec<u32>,
    cell_centre: Vec<DVec3>,
    cell_volume: Vec<f64>,

    // ===== 边界 =====
    patches: Vec<BoundaryPatch>,
}

impl PolyMesh {
    /// 从原始拓扑数组构建网格
    ///
    /// # 参数
    /// - `points`: 节点坐标
    /// - `faces`: 每个面的节点索引（右手顺序）
    /// - `owner`: 每个面的 owner 单元
    /// - `neighbour`: 内部面的 neighbour 单元（长度即内部面数）
    /// - `patches`: 边界 patch，须连续覆盖全部边界面
    pub fn from_parts(
        points: Vec<DVec3>,
        faces: Vec<Vec<u32>>,
        owner: Vec<u32>,
        neighbour: Vec<u32>,
        patches: Vec<BoundaryPatch>,
    ) -> MeshResult<Self> {
        let n_faces = faces.len();
        let n_internal = neighbour.len();

        if u32::try_from(n_faces).is_err() {
            return Err(MeshError::invalid_topology(
                "from_parts",
                format!("面数 {} 超出 u32 索引范围", n_faces),
            ));
        }
        if owner.len() != n_faces {
            return Err(MeshError::size_mismatch("owner", n_faces, owner.len()));
        }
        if n_internal > n_faces {
            return Err(MeshError::invalid_topology(
                "from_parts",
                format!("内部面数 {} 超过总面数 {}", n_internal, n_faces),
            ));
        }

        validate_patches(&patches, n_internal, n_faces)?;

        // 面节点
        let mut face_point_offsets = Vec::with_capacity(n_faces + 1);
        let mut face_point_indices = Vec::new();
        face_point_offsets.push(0);
        for (f, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::degenerate_face(f, format!("仅 {} 个顶点", face.len())));
            }
            if let Some(&bad) = face.iter().find(|&&p| p as usize >= points.len()) {
                return Err(MeshError::invalid_topology(
                    "from_parts",
                    format!("面 {} 引用不存在的节点 {}", f, bad),
                ));
            }
            face_point_indices.extend_from_slice(face);
            face_point_offsets.push(face_point_indices.len());
        }

        let n_cells = owner
            .iter()
            .chain(neighbour.iter())
            .map(|&c| c as usize + 1)
            .max()
            .unwrap_or(0);

        for (f, (&o, &n)) in owner.iter().zip(neighbour.iter()).enumerate() {
            if o == n {
                return Err(MeshError::invalid_topology(
                    "from_parts",
                    format!("内部面 {} 的 owner 与 neighbour 相同", f),
                ));
            }
        }

        // 面几何
        let mut face_centre = Vec::with_capacity(n_faces);
        let mut face_area = Vec::with_capacity(n_faces);
        for (f, face) in faces.iter().enumerate() {
            let coords: Vec<DVec3> = face.iter().map(|&p| points[p as usize]).collect();
            let g = face_geometry(&coords);
            if g.area.length() <= VSMALL {
                return Err(MeshError::degenerate_face(f, "面积为零"));
            }
            face_centre.push(g.centre);
            face_area.push(g.area);
        }

        // 单元 -> 面
        let mut counts = vec![0usize; n_cells];
        for &o in &owner {
            counts[o as usize] += 1;
        }
        for &n in &neighbour {
            counts[n as usize] += 1;
        }
        let mut cell_face_offsets = Vec::with_capacity(n_cells + 1);
        cell_face_offsets.push(0);
        for c in 0..n_cells {
            cell_face_offsets.push(cell_face_offsets[c] + counts[c]);
        }
        let mut cursor = cell_face_offsets[..n_cells].to_vec();
        let mut cell_face_indices = vec![0u32; cell_face_offsets[n_cells]];
        for f in 0..n_faces {
            let o = owner[f] as usize;
            cell_face_indices[cursor[o]] = f as u32;
            cursor[o] += 1;
            if f < n_internal {
                let n = neighbour[f] as usize;
                cell_face_indices[cursor[n]] = f as u32;
                cursor[n] += 1;
            }
        }

        // 单元几何
        let mut cell_centre = Vec::with_capacity(n_cells);
        let mut cell_volume = Vec::with_capacity(n_cells);
        for c in 0..n_cells {
            let faces_of_cell: Vec<(FaceGeometry, bool)> = cell_face_indices
                [cell_face_offsets[c]..cell_face_offsets[c + 1]]
                .iter()
                .map(|&f| {
                    let f = f as usize;
                    let g = FaceGeometry {
                        centre: face_centre[f],
                        area: face_area[f],
                    };
                    (g, owner[f] as usize == c)
                })
                .collect();
            let g = cell_geometry(&faces_of_cell);
            if g.volume <= 0.0 || !g.volume.is_finite() {
                return Err(MeshError::degenerate_cell(c, g.volume));
            }
            cell_centre.push(g.centre);
            cell_volume.push(g.volume);
        }

        debug!(
            "多面体网格: {} 节点, {} 面 ({} 内部), {} 单元, {} patch",
            points.len(),
            n_faces,
            n_internal,
            n_cells,
            patches.len()
        );

        Ok(Self {
            points,
            face_point_offsets,
            face_point_indices,
            face_owner: owner,
            face_neighbour: neighbour,
            face_centre,
            face_area,
            n_cells,
            cell_face_offsets,
            cell_face_indices,
            cell_centre,
            cell_volume,
            patches,
        })
    }

    // ===== 计数 =====

    /// 节点数
    #[inline]
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// 面总数
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.face_owner.len()
    }

    /// 内部面数
    #[inline]
    pub fn n_internal_faces(&self) -> usize {
        self.face_neighbour.len()
    }

    /// 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    // ===== 几何 =====

    /// 节点坐标
    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// 面的节点索引
    #[inline]
    pub fn face_points(&self, face: usize) -> &[u32] {
        &self.face_point_indices[self.face_point_offsets[face]..self.face_point_offsets[face + 1]]
    }

    /// 面中心
    #[inline]
    pub fn face_centre(&self, face: usize) -> DVec3 {
        self.face_centre[face]
    }

    /// 面积向量
    #[inline]
    pub fn face_area(&self, face: usize) -> DVec3 {
        self.face_area[face]
    }

    /// 面 owner
    #[inline]
    pub fn face_owner(&self, face: usize) -> usize {
        self.face_owner[face] as usize
    }

    /// 面 neighbour（边界面为 `None`）
    #[inline]
    pub fn face_neighbour(&self, face: usize) -> Option<usize> {
        self.face_neighbour.get(face).map(|&n| n as usize)
    }

    /// 单元的面
    #[inline]
    pub fn cell_faces(&self, cell: usize) -> &[u32] {
        &self.cell_face_indices[self.cell_face_offsets[cell]..self.cell_face_offsets[cell + 1]]
    }

    /// 单元质心
    #[inline]
    pub fn cell_centre(&self, cell: usize) -> DVec3 {
        self.cell_centre[cell]
    }

    /// 单元体积
    #[inline]
    pub fn cell_volume(&self, cell: usize) -> f64 {
        self.cell_volume[cell]
    }

    /// 单元顶点（去重，用于包围盒）
    pub fn cell_points(&self, cell: usize) -> Vec<DVec3> {
        let mut ids: Vec<u32> = self
            .cell_faces(cell)
            .iter()
            .flat_map(|&f| self.face_points(f as usize).iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter().map(|p| self.points[p as usize]).collect()
    }

    /// 单元外法向面积向量（对 neighbour 面取反）
    #[inline]
    pub fn outward_area(&self, cell: usize, face: usize) -> DVec3 {
        if self.face_owner(face) == cell {
            self.face_area[face]
        } else {
            -self.face_area[face]
        }
    }

    // ===== 边界 =====

    /// 全部 patch
    #[inline]
    pub fn patches(&self) -> &[BoundaryPatch] {
        &self.patches
    }

    /// 按名称查找 patch 序号
    pub fn find_patch(&self, name: &str) -> Option<usize> {
        self.patches.iter().position(|p| p.name == name)
    }

    /// patch 各面的 owner 单元（按面顺序）
    pub fn patch_face_cells(&self, patch: usize) -> Vec<CellId> {
        self.patches[patch]
            .faces()
            .map(|f| CellId::new(self.face_owner(f)))
            .collect()
    }

    /// 网格统计
    pub fn statistics(&self) -> MeshStatistics {
        let (min_volume, max_volume, total_volume) = self.cell_volume.iter().fold(
            (f64::MAX, 0.0_f64, 0.0),
            |(mn, mx, sum), &v| (mn.min(v), mx.max(v), sum + v),
        );
        MeshStatistics {
            n_points: self.n_points(),
            n_faces: self.n_faces(),
            n_internal_faces: self.n_internal_faces(),
            n_cells: self.n_cells,
            n_patches: self.patches.len(),
            min_volume: if self.n_cells == 0 { 0.0 } else { min_volume },
            max_volume,
            total_volume,
        }
    }
}

/// 网格统计信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStatistics {
    pub n_points: usize,
    pub n_faces: usize,
    pub n_internal_faces: usize,
    pub n_cells: usize,
    pub n_patches: usize,
    pub min_volume: f64,
    pub max_volume: f64,
    pub total_volume: f64,
}

/// patch 必须按顺序连续覆盖 `n_internal..n_faces`
fn validate_patches(patches: &[BoundaryPatch], n_internal: usize, n_faces: usize) -> MeshResult<()> {
    let mut expected_start = n_internal;
    for patch in patches {
        if patch.start_face != expected_start {
            return Err(MeshError::invalid_topology(
                "validate_patches",
                format!(
                    "patch '{}' 起始面 {}，期望 {}",
                    patch.name, patch.start_face, expected_start
                ),
            ));
        }
        expected_start += patch.n_faces;
    }
    if expected_start != n_faces {
        return Err(MeshError::invalid_topology(
            "validate_patches",
            format!("patch 覆盖到面 {}，总面数 {}", expected_start, n_faces),
        ));
    }

    for (i, a) in patches.iter().enumerate() {
        if patches[..i].iter().any(|b| b.name == a.name) {
            return Err(MeshError::invalid_topology(
                "validate_patches",
                format!("patch 名称重复: {}", a.name),
            ));
        }
    }
    Ok(())
}

/// 单个 L 形棱柱单元：截面为 [0,2]x[0,2] 去掉 [1,2]x[1,2]，z 方向厚 1
#[cfg(test)]
pub(crate) fn l_prism() -> PolyMesh {
    let outline = [
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (0.0, 2.0),
    ];
    let mut points: Vec<DVec3> = outline.iter().map(|&(x, y)| DVec3::new(x, y, 0.0)).collect();
    points.extend(outline.iter().map(|&(x, y)| DVec3::new(x, y, 1.0)));

    let mut faces = vec![vec![0, 5, 4, 3, 2, 1], vec![6, 7, 8, 9, 10, 11]];
    for i in 0..6u32 {
        let j = (i + 1) % 6;
        faces.push(vec![i, j, j + 6, i + 6]);
    }
    let n_faces = faces.len();

    PolyMesh::from_parts(
        points,
        faces,
        vec![0; n_faces],
        vec![],
        vec![BoundaryPatch::new("walls", 0, n_faces)],
    )
    .unwrap()
}
