// apps/mp_cli/src/commands/info.rs

//! 算例信息命令
//!
//! 显示网格统计、各 patch 的净通量与流向，以及出口注册表。

use anyhow::{Context, Result};
use clap::Args;
use mp_foundation::MpError;
use mp_io::load_case;
use mp_mesh::FlowOracle;
use mp_track::{detect_direction, OutletClassifier};
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 算例快照路径
    #[arg(long)]
    pub case: PathBuf,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== mptrack 算例信息 ===");

    let field = load_case(&args.case)
        .map_err(MpError::from)
        .with_context(|| format!("无法加载算例: {}", args.case.display()))?;
    let stats = field.mesh().statistics();

    println!("=== 网格 ===");
    println!("节点数: {}", stats.n_points);
    println!("面数: {} (内部 {})", stats.n_faces, stats.n_internal_faces);
    println!("单元数: {}", stats.n_cells);
    println!("单元体积: {:.4e} ~ {:.4e} (总计 {:.4e})",
             stats.min_volume, stats.max_volume, stats.total_volume);

    println!("\n=== 边界 patch ({}) ===", stats.n_patches);
    for patch in field.all_patches() {
        let sign = field.net_flux_sign(&patch);
        println!(
            "  {:<20} 面 {:>6}  单元 {:>6}  净通量 {:>12.4e}  {:<8} (自动方向: {})",
            patch.name,
            patch.n_faces(),
            patch.owning_cells().len(),
            field.patch_net_flux(patch.index),
            sign.flow(),
            detect_direction(sign)
        );
    }

    let classifier = OutletClassifier::from_oracle(&field);
    println!("\n=== 出口注册表 ===");
    if classifier.is_empty() {
        println!("  (无净出流 patch)");
    }
    for (i, outlet) in classifier.outlets().iter().enumerate() {
        println!("  {}. {} ({} 单元)", i + 1, outlet.name, outlet.n_cells());
    }

    Ok(())
}
