// crates/mp_io/src/lib.rs

//! mptrack IO 模块
//!
//! 提供算例读取和结果输出功能。
//!
//! # 模块
//!
//! - [`snapshot`]: 算例快照（网格 + `U` + `phi`）
//! - [`exporters`]: 轨迹 VTK 折线与汇总 CSV
//! - [`emitter`]: 结果输出器，负责目录创建和文件写出
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use mp_io::{load_case, ResultEmitter};
//!
//! let field = load_case("case/snapshot.json")?;
//! // ... 追踪 ...
//! ResultEmitter::new("case/postProcessing/particlesData.csv")
//!     .with_vtk_dir("case/VTK")
//!     .emit(&report.particles)?;
//! ```

pub mod emitter;
pub mod error;
pub mod exporters;
pub mod snapshot;

// 重导出常用类型
pub use emitter::{EmittedFiles, ResultEmitter};
pub use error::{IoError, IoResult};
pub use exporters::{SummaryWriter, VtkPolylineExporter, SUMMARY_HEADER};
pub use snapshot::{load_case, CaseSnapshot, FieldSnapshot, MeshSnapshot};
