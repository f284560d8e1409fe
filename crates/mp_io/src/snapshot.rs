// crates/mp_io/src/snapshot.rs

//! 算例快照
//!
//! 一个 JSON 文件包含网格拓扑和稳态流场：
//!
//! ```json
//! {
//!   "mesh": {
//!     "points": [[0, 0, 0], ...],
//!     "faces": [[0, 1, 5, 4], ...],
//!     "owner": [0, ...],
//!     "neighbour": [1, ...],
//!     "patches": [{ "name": "inlet", "start_face": 12, "n_faces": 4 }, ...]
//!   },
//!   "fields": {
//!     "U": [[1, 0, 0], ...],
//!     "phi": [0.25, ...]
//!   }
//! }
//! ```
//!
//! 面按 OpenFOAM 约定排列：内部面在前，边界面按 patch 连续排列。

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use glam::DVec3;
use mp_mesh::{BoundaryPatch, FlowField, PolyMesh};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{IoError, IoResult};

// ============================================================
// 快照结构
// ============================================================

/// 网格快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    /// 节点坐标
    pub points: Vec<DVec3>,
    /// 面节点索引
    pub faces: Vec<Vec<u32>>,
    /// 面 owner 单元
    pub owner: Vec<u32>,
    /// 内部面 neighbour 单元
    #[serde(alias = "neighbor")]
    pub neighbour: Vec<u32>,
    /// 边界 patch
    pub patches: Vec<BoundaryPatch>,
}

/// 场快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    /// 单元速度
    #[serde(rename = "U")]
    pub velocity: Vec<DVec3>,
    /// 面体积通量
    pub phi: Vec<f64>,
}

/// 算例快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSnapshot {
    /// 网格
    pub mesh: MeshSnapshot,
    /// 流场
    pub fields: FieldSnapshot,
}

impl MeshSnapshot {
    /// 从网格创建快照
    pub fn from_mesh(mesh: &PolyMesh) -> Self {
        let faces = (0..mesh.n_faces())
            .map(|f| mesh.face_points(f).to_vec())
            .collect();
        let owner = (0..mesh.n_faces())
            .map(|f| mesh.face_owner(f) as u32)
            .collect();
        let neighbour = (0..mesh.n_internal_faces())
            .filter_map(|f| mesh.face_neighbour(f))
            .map(|c| c as u32)
            .collect();

        Self {
            points: mesh.points().to_vec(),
            faces,
            owner,
            neighbour,
            patches: mesh.patches().to_vec(),
        }
    }

    /// 构建网格
    pub fn into_mesh(self) -> IoResult<PolyMesh> {
        Ok(PolyMesh::from_parts(
            self.points,
            self.faces,
            self.owner,
            self.neighbour,
            self.patches,
        )?)
    }
}

impl CaseSnapshot {
    /// 从流场创建快照
    pub fn from_flow_field(field: &FlowField) -> Self {
        Self {
            mesh: MeshSnapshot::from_mesh(field.mesh()),
            fields: FieldSnapshot {
                velocity: field.velocity().to_vec(),
                phi: field.face_flux().to_vec(),
            },
        }
    }

    /// 从 JSON 文件读取
    pub fn load(path: impl AsRef<Path>) -> IoResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| IoError::file(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| IoError::parse(path, e.to_string()))
    }

    /// 写入 JSON 文件
    pub fn save(&self, path: impl AsRef<Path>) -> IoResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| IoError::file(path, e))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer(&mut w, self).map_err(|e| IoError::parse(path, e.to_string()))?;
        w.flush().map_err(|e| IoError::file(path, e))?;
        Ok(())
    }

    /// 构建流场
    pub fn into_flow_field(self) -> IoResult<FlowField> {
        let mesh = self.mesh.into_mesh()?;
        Ok(FlowField::new(mesh, self.fields.velocity, self.fields.phi)?)
    }
}

/// 读取算例快照并构建流场
pub fn load_case(path: impl AsRef<Path>) -> IoResult<FlowField> {
    let path = path.as_ref();
    let field = CaseSnapshot::load(path)?.into_flow_field()?;
    let stats = field.mesh().statistics();
    info!(
        "算例加载完成: {} ({} 单元, {} 面, {} patch)",
        path.display(),
        stats.n_cells,
        stats.n_faces,
        stats.n_patches
    );
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mp_mesh::{BoxMeshGenerator, FlowOracle};

    fn channel() -> FlowField {
        let mesh = BoxMeshGenerator::new([3, 1, 1], DVec3::ZERO, DVec3::new(3.0, 1.0, 1.0))
            .build()
            .unwrap();
        FlowField::uniform(mesh, DVec3::X).unwrap()
    }

    #[test]
    fn test_snapshot_rebuilds_field() {
        let field = channel();
        let snapshot = CaseSnapshot::from_flow_field(&field);
        assert_eq!(snapshot.mesh.neighbour.len(), 2);
        assert_eq!(snapshot.fields.phi.len(), field.mesh().n_faces());

        let rebuilt = snapshot.into_flow_field().unwrap();
        assert_eq!(rebuilt.mesh().n_cells(), 3);
        let xmax = rebuilt.resolve_patch("xmax").unwrap();
        assert!((rebuilt.patch_net_flux(xmax.index) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_field_size_mismatch_is_reported() {
        let mut snapshot = CaseSnapshot::from_flow_field(&channel());
        snapshot.fields.velocity.pop();
        let err = snapshot.into_flow_field().err().unwrap();
        assert!(matches!(err, IoError::Mesh(_)));
    }

    #[test]
    fn test_json_field_names() {
        let snapshot = CaseSnapshot::from_flow_field(&channel());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["fields"]["U"].is_array());
        assert!(json["fields"]["phi"].is_array());
        assert_eq!(json["mesh"]["patches"][0]["name"], "xmin");
    }
}
