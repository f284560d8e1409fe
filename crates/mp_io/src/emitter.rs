// crates/mp_io/src/emitter.rs

//! 结果输出器
//!
//! 追踪结束后创建输出目录，写出汇总表和每个粒子的轨迹文件。
//! 每个文件使用独立的 `BufWriter`，写完立即刷新关闭。

use std::path::{Path, PathBuf};

use mp_track::Particle;
use tracing::{debug, info};

use crate::error::{IoError, IoResult};
use crate::exporters::{trajectory_file_name, SummaryWriter, VtkPolylineExporter};

/// 已写出的文件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmittedFiles {
    /// 汇总表
    pub summary: PathBuf,
    /// 轨迹文件（按粒子顺序）
    pub trajectories: Vec<PathBuf>,
}

/// 结果输出器
#[derive(Debug, Clone)]
pub struct ResultEmitter {
    summary_path: PathBuf,
    vtk_dir: Option<PathBuf>,
}

impl ResultEmitter {
    /// 创建输出器，只写汇总表
    pub fn new(summary_path: impl Into<PathBuf>) -> Self {
        Self {
            summary_path: summary_path.into(),
            vtk_dir: None,
        }
    }

    /// 同时写出轨迹到指定目录
    pub fn with_vtk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vtk_dir = Some(dir.into());
        self
    }

    /// 汇总表路径
    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }

    /// 轨迹目录
    pub fn vtk_dir(&self) -> Option<&Path> {
        self.vtk_dir.as_deref()
    }

    /// 写出全部结果
    pub fn emit(&self, particles: &[Particle]) -> IoResult<EmittedFiles> {
        if let Some(parent) = self.summary_path.parent() {
            create_dir(parent)?;
        }
        SummaryWriter::new().export(&self.summary_path, particles)?;
        info!("汇总表已写出: {}", self.summary_path.display());

        let mut trajectories = Vec::new();
        if let Some(dir) = &self.vtk_dir {
            create_dir(dir)?;
            let exporter = VtkPolylineExporter::new();
            trajectories.reserve(particles.len());
            for p in particles {
                let name = trajectory_file_name(p.id);
                let path = dir.join(&name);
                let title = name.trim_end_matches(".vtk");
                exporter.export(&path, title, p.trajectory())?;
                debug!("轨迹已写出: {}", path.display());
                trajectories.push(path);
            }
            info!("{} 条轨迹已写出到 {}", trajectories.len(), dir.display());
        }

        Ok(EmittedFiles {
            summary: self.summary_path.clone(),
            trajectories,
        })
    }
}

fn create_dir(dir: &Path) -> IoResult<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| IoError::file(dir, e))
}
