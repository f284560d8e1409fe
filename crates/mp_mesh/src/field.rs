// crates/mp_mesh/src/field.rs

//! 稳态流场
//!
//! 将多面体网格、单元速度场 `U` 和面通量场 `phi` 组合为只读流场，
//! 并实现 [`FlowOracle`]。流场在构造后不再修改。

use glam::DVec3;
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::locator::{LocateTolerance, MeshLocator};
use crate::polymesh::PolyMesh;
use crate::traits::{CellId, FlowOracle, FluxSign, PatchEntry};

/// 稳态流场
#[derive(Debug)]
pub struct FlowField {
    mesh: PolyMesh,
    locator: MeshLocator,
    /// 单元速度
    velocity: Vec<DVec3>,
    /// 面体积通量（外法向为正）
    face_flux: Vec<f64>,
}

impl FlowField {
    /// 从网格和场数据创建流场
    pub fn new(mesh: PolyMesh, velocity: Vec<DVec3>, face_flux: Vec<f64>) -> MeshResult<Self> {
        Self::with_tolerance(mesh, velocity, face_flux, LocateTolerance::default())
    }

    /// 使用自定义定位容差创建流场
    pub fn with_tolerance(
        mesh: PolyMesh,
        velocity: Vec<DVec3>,
        face_flux: Vec<f64>,
        tolerance: LocateTolerance,
    ) -> MeshResult<Self> {
        if velocity.len() != mesh.n_cells() {
            return Err(MeshError::size_mismatch("U", mesh.n_cells(), velocity.len()));
        }
        if face_flux.len() != mesh.n_faces() {
            return Err(MeshError::size_mismatch("phi", mesh.n_faces(), face_flux.len()));
        }

        let locator = MeshLocator::with_tolerance(&mesh, tolerance);
        debug!("流场构建完成: {} 单元, {} 面", mesh.n_cells(), mesh.n_faces());

        Ok(Self {
            mesh,
            locator,
            velocity,
            face_flux,
        })
    }

    /// 均匀速度场，面通量取 `U·Sf`
    pub fn uniform(mesh: PolyMesh, velocity: DVec3) -> MeshResult<Self> {
        let face_flux = (0..mesh.n_faces())
            .map(|f| velocity.dot(mesh.face_area(f)))
            .collect();
        let cell_velocity = vec![velocity; mesh.n_cells()];
        Self::new(mesh, cell_velocity, face_flux)
    }

    /// 网格引用
    #[inline]
    pub fn mesh(&self) -> &PolyMesh {
        &self.mesh
    }

    /// 单元速度场
    #[inline]
    pub fn velocity(&self) -> &[DVec3] {
        &self.velocity
    }

    /// 面通量场
    #[inline]
    pub fn face_flux(&self) -> &[f64] {
        &self.face_flux
    }

    /// patch 净通量（各面 `phi` 之和）
    pub fn patch_net_flux(&self, patch: usize) -> f64 {
        self.mesh.patches()[patch]
            .faces()
            .map(|f| self.face_flux[f])
            .sum()
    }

    fn entry(&self, patch: usize) -> PatchEntry {
        PatchEntry {
            name: self.mesh.patches()[patch].name.clone(),
            index: patch,
            face_cells: self.mesh.patch_face_cells(patch),
        }
    }
}

impl FlowOracle for FlowField {
    fn locate_cell(&self, point: DVec3) -> Option<CellId> {
        self.locator.find_cell(&self.mesh, point).map(CellId::new)
    }

    fn velocity_at(&self, cell: CellId) -> DVec3 {
        self.velocity[cell.index()]
    }

    fn volume_of(&self, cell: CellId) -> f64 {
        self.mesh.cell_volume(cell.index())
    }

    fn cell_centroid(&self, cell: CellId) -> DVec3 {
        self.mesh.cell_centre(cell.index())
    }

    fn resolve_patch(&self, name: &str) -> Option<PatchEntry> {
        self.mesh.find_patch(name).map(|p| self.entry(p))
    }

    fn all_patches(&self) -> Vec<PatchEntry> {
        (0..self.mesh.patches().len()).map(|p| self.entry(p)).collect()
    }

    fn net_flux_sign(&self, patch: &PatchEntry) -> FluxSign {
        FluxSign::from_flux(self.patch_net_flux(patch.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::BoxMeshGenerator;

    fn channel() -> FlowField {
        let mesh = BoxMeshGenerator::new([4, 1, 1], DVec3::ZERO, DVec3::new(4.0, 1.0, 1.0))
            .build()
            .unwrap();
        FlowField::uniform(mesh, DVec3::new(2.0, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_uniform_patch_flux_signs() {
        let field = channel();
        let xmin = field.resolve_patch("xmin").unwrap();
        let xmax = field.resolve_patch("xmax").unwrap();
        let ymin = field.resolve_patch("ymin").unwrap();

        assert_eq!(field.net_flux_sign(&xmin), FluxSign::Negative);
        assert_eq!(field.net_flux_sign(&xmax), FluxSign::Positive);
        assert_eq!(field.net_flux_sign(&ymin), FluxSign::Zero);
        assert!((field.patch_net_flux(xmax.index) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_oracle_queries() {
        let field = channel();
        let cell = field.locate_cell(DVec3::new(2.5, 0.5, 0.5)).unwrap();
        assert_eq!(cell, CellId::new(2));
        assert_eq!(field.velocity_at(cell), DVec3::new(2.0, 0.0, 0.0));
        assert!((field.volume_of(cell) - 1.0).abs() < 1e-12);
        assert!((field.cell_centroid(cell) - DVec3::new(2.5, 0.5, 0.5)).length() < 1e-12);
        assert!(field.locate_cell(DVec3::new(5.0, 0.5, 0.5)).is_none());
    }

    #[test]
    fn test_all_patches_in_registration_order() {
        let field = channel();
        let names: Vec<String> = field.all_patches().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["xmin", "xmax", "ymin", "ymax", "zmin", "zmax"]);
        assert!(field.resolve_patch("inlet").is_none());
    }

    #[test]
    fn test_field_size_mismatch() {
        let mesh = BoxMeshGenerator::unit_cube().build().unwrap();
        let n_faces = mesh.n_faces();
        let err = FlowField::new(mesh, vec![], vec![0.0; n_faces]).err().unwrap();
        assert!(matches!(err, MeshError::SizeMismatch { name: "U", .. }));
    }
}
