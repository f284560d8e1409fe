// crates/mp_mesh/src/lib.rs

//! mptrack 网格模块
//!
//! 提供面寻址多面体网格、单元定位和稳态流场，
//! 作为粒子追踪核心的网格/流场查询实现。
//!
//! # 核心类型
//!
//! - [`PolyMesh`]: 只读多面体网格（面寻址，OpenFOAM 风格 owner/neighbour）
//! - [`MeshLocator`]: R-Tree 筛选 + 凸单元半空间判断的点定位器
//! - [`FlowField`]: 网格 + `U` + `phi`，实现 [`FlowOracle`]
//!
//! # Trait 抽象
//!
//! - [`FlowOracle`]: 追踪核心消费的最小只读接口
//!
//! # 示例
//!
//! ```rust
//! use glam::DVec3;
//! use mp_mesh::{BoxMeshGenerator, FlowField, FlowOracle};
//!
//! let mesh = BoxMeshGenerator::new([4, 1, 1], DVec3::ZERO, DVec3::new(4.0, 1.0, 1.0))
//!     .build()
//!     .unwrap();
//! let field = FlowField::uniform(mesh, DVec3::X).unwrap();
//!
//! let cell = field.locate_cell(DVec3::new(0.5, 0.5, 0.5)).unwrap();
//! assert_eq!(field.velocity_at(cell), DVec3::X);
//! ```

pub mod error;
pub mod field;
pub mod generation;
pub mod geometry;
pub mod locator;
pub mod polymesh;
pub mod spatial_index;
pub mod traits;

// 重新导出核心类型
pub use error::{MeshError, MeshResult};
pub use field::FlowField;
pub use generation::{BoxMeshGenerator, BOX_PATCH_NAMES};
pub use locator::{LocateTolerance, MeshLocator};
pub use polymesh::{BoundaryPatch, MeshStatistics, PolyMesh};
pub use spatial_index::{CellEnvelope, CellSpatialIndex};
pub use traits::{CellId, FlowOracle, FluxSign, PatchEntry, PatchFlow};
