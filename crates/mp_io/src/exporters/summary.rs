// crates/mp_io/src/exporters/summary.rs

//! 粒子汇总表
//!
//! 每个粒子一行：编号、停留时间、行程、是否被强制终止、是否离开、出口名称。
//! 不适用的字段写 `-`。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mp_track::{Particle, ParticleStatus};

use crate::error::{IoError, IoResult};

/// 表头
pub const SUMMARY_HEADER: &str =
    "Particle_Number,Age,Distance_Traveled,killed,went_out,out_patch_name";

/// 单个粒子的汇总行（不含换行）
pub fn summary_row(particle: &Particle) -> String {
    let (killed, went_out, patch) = match particle.status() {
        ParticleStatus::Killed => ("yes", "-", "-"),
        ParticleStatus::ExitedOutlet(name) => ("no", "yes", name.as_str()),
        ParticleStatus::StoppedInternal | ParticleStatus::Active => ("no", "no", "-"),
    };
    format!(
        "{},{},{},{},{},{}",
        particle.id,
        particle.age(),
        particle.distance(),
        killed,
        went_out,
        patch
    )
}

/// 汇总表写出器
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryWriter;

impl SummaryWriter {
    /// 创建写出器
    pub fn new() -> Self {
        Self
    }

    /// 写出到文件
    pub fn export(&self, path: impl AsRef<Path>, particles: &[Particle]) -> IoResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| IoError::file(path, e))?;
        let mut w = BufWriter::new(file);
        self.write(&mut w, particles)
            .and_then(|_| w.flush())
            .map_err(|e| IoError::file(path, e))
    }

    /// 写出表头和全部行
    pub fn write<W: Write>(&self, w: &mut W, particles: &[Particle]) -> std::io::Result<()> {
        writeln!(w, "{}", SUMMARY_HEADER)?;
        for p in particles {
            writeln!(w, "{}", summary_row(p))?;
        }
        Ok(())
    }
}
