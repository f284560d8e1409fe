// crates/mp_io/src/exporters/mod.rs

//! 结果导出
//!
//! - [`vtk`]: 粒子轨迹 legacy VTK POLYDATA 折线
//! - [`summary`]: 粒子汇总 CSV 表

pub mod summary;
pub mod vtk;

pub use summary::{summary_row, SummaryWriter, SUMMARY_HEADER};
pub use vtk::{trajectory_file_name, VtkPolylineExporter};
