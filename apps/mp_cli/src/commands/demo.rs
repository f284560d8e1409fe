// apps/mp_cli/src/commands/demo.rs

//! 演示算例命令
//!
//! 生成均匀流盒子网格算例快照，可选同时写出一个从 `xmin` 入口追踪的配置。

use anyhow::{Context, Result};
use clap::Args;
use glam::DVec3;
use mp_config::{SeedMethod, TrackConfig};
use mp_foundation::MpError;
use mp_io::CaseSnapshot;
use mp_mesh::{BoxMeshGenerator, FlowField};
use std::path::PathBuf;
use tracing::info;

/// 演示算例参数
#[derive(Args)]
pub struct DemoArgs {
    /// 快照输出路径
    #[arg(short, long, default_value = "case.json")]
    pub output: PathBuf,

    /// 各方向单元数
    #[arg(long, num_args = 3, default_values_t = [8, 2, 2])]
    pub cells: Vec<usize>,

    /// 盒子尺寸 [m]
    #[arg(long, num_args = 3, default_values_t = [8.0, 2.0, 2.0])]
    pub size: Vec<f64>,

    /// 均匀速度 [m/s]
    #[arg(long, num_args = 3, allow_negative_numbers = true, default_values_t = [1.0, 0.0, 0.0])]
    pub velocity: Vec<f64>,

    /// 同时写出追踪配置
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// 执行演示命令
pub fn execute(args: DemoArgs) -> Result<()> {
    info!("=== mptrack 演示算例 ===");

    let divisions = [args.cells[0], args.cells[1], args.cells[2]];
    let size = DVec3::from_slice(&args.size);
    let velocity = DVec3::from_slice(&args.velocity);

    let mesh = BoxMeshGenerator::new(divisions, DVec3::ZERO, size)
        .build()
        .map_err(MpError::from)
        .context("网格生成失败")?;
    let field = FlowField::uniform(mesh, velocity)
        .map_err(MpError::from)
        .context("流场构建失败")?;

    CaseSnapshot::from_flow_field(&field)
        .save(&args.output)
        .map_err(MpError::from)
        .with_context(|| format!("无法写出快照: {}", args.output.display()))?;
    println!("算例快照: {} ({} 单元)", args.output.display(), field.mesh().n_cells());

    if let Some(config_path) = &args.config {
        TrackConfig::patch(SeedMethod::Patch, "xmin")
            .save_to_file(config_path)
            .map_err(MpError::from)
            .with_context(|| format!("无法写出配置: {}", config_path.display()))?;
        println!("追踪配置: {}", config_path.display());
    }

    Ok(())
}
