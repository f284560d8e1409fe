// apps/mp_cli/src/commands/track.rs

//! 粒子追踪命令
//!
//! 读取算例快照和追踪配置，运行追踪会话并写出汇总表与轨迹。
//! 命令行参数可覆盖配置中的方法、方向、最大步数和输出目录。

use anyhow::{Context, Result};
use clap::Args;
use mp_config::TrackConfig;
use mp_foundation::MpError;
use mp_io::{load_case, ResultEmitter};
use mp_track::TrackingSession;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// 追踪参数
#[derive(Args)]
pub struct TrackArgs {
    /// 算例快照路径（网格 + U + phi）
    #[arg(long)]
    pub case: PathBuf,

    /// 追踪配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 种子方法 (points, patch, backTrack)，覆盖配置
    #[arg(short, long)]
    pub method: Option<String>,

    /// 追踪方向 (forward, backward)，覆盖配置
    #[arg(short, long)]
    pub direction: Option<String>,

    /// 最大步数，覆盖配置
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// 输出目录，覆盖配置
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 不写出轨迹文件
    #[arg(long)]
    pub no_vtk: bool,

    /// 串行追踪
    #[arg(long)]
    pub sequential: bool,
}

/// 执行追踪命令
pub fn execute(args: TrackArgs) -> Result<()> {
    info!("=== mptrack 粒子追踪 ===");

    let mut config = TrackConfig::load(&args.config)
        .map_err(MpError::from)
        .with_context(|| format!("无法读取配置文件: {}", args.config.display()))?;
    apply_overrides(&mut config, &args)?;
    config.validate().map_err(MpError::from)?;

    let strategy = config.seed_strategy().map_err(MpError::from)?;
    let settings = config.track_settings().map_err(MpError::from)?;

    let field = load_case(&args.case)
        .map_err(MpError::from)
        .with_context(|| format!("无法加载算例: {}", args.case.display()))?;

    let start = Instant::now();
    let report = TrackingSession::new(&field, settings)
        .run(&strategy)
        .map_err(MpError::from)?;
    info!("追踪耗时: {:.2?}", start.elapsed());

    let mut emitter = ResultEmitter::new(config.output.summary_path());
    if config.output.write_vtk {
        emitter = emitter.with_vtk_dir(config.output.vtk_path());
    }
    let files = emitter
        .emit(&report.particles)
        .map_err(MpError::from)
        .context("写出结果失败")?;

    let s = &report.summary;
    println!("\n=== 追踪结果 ===");
    println!("粒子总数: {}", s.total);
    println!("  离开出口: {}", s.exited);
    for (name, count) in &s.per_outlet {
        println!("    {}: {}", name, count);
    }
    println!("  停在域内: {} (撞壁 {}, 停滞 {}, 种子在域外 {})",
             s.stopped(), s.wall_hit, s.stagnated, s.seed_outside);
    println!("  强制终止: {}", s.killed);
    if let Some(age) = s.mean_exit_age {
        println!("平均停留时间: {:.6e}", age);
    }
    println!("\n汇总表: {}", files.summary.display());
    if !files.trajectories.is_empty() {
        println!("轨迹: {} 个文件", files.trajectories.len());
    }

    Ok(())
}

/// 命令行覆盖配置
fn apply_overrides(config: &mut TrackConfig, args: &TrackArgs) -> Result<(), MpError> {
    if let Some(method) = &args.method {
        config.method = Some(method.parse()?);
    }
    if let Some(direction) = &args.direction {
        config.direction = Some(direction.parse()?);
    }
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(output) = &args.output {
        config.output.directory = output.clone();
    }
    if args.no_vtk {
        config.output.write_vtk = false;
    }
    if args.sequential {
        config.parallel = false;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mp_config::SeedMethod;
    use mp_track::Direction;

    fn args() -> TrackArgs {
        TrackArgs {
            case: PathBuf::from("case.json"),
            config: PathBuf::from("track.json"),
            method: None,
            direction: None,
            max_steps: None,
            output: None,
            no_vtk: false,
            sequential: false,
        }
    }

    #[test]
    fn test_overrides() {
        let mut config = TrackConfig::patch(SeedMethod::Patch, "inlet");
        let mut a = args();
        a.method = Some("backTrack".into());
        a.direction = Some("backward".into());
        a.max_steps = Some(12);
        a.output = Some(PathBuf::from("out"));
        a.no_vtk = true;
        a.sequential = true;

        apply_overrides(&mut config, &a).unwrap();
        assert_eq!(config.method, Some(SeedMethod::BackTrack));
        assert_eq!(config.direction, Some(Direction::Backward));
        assert_eq!(config.max_steps, 12);
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert!(!config.output.write_vtk);
        assert!(!config.parallel);
    }

    #[test]
    fn test_unknown_method_override_fails() {
        let mut config = TrackConfig::default();
        let mut a = args();
        a.method = Some("Points".into());
        let err = apply_overrides(&mut config, &a).unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_direction_override_matches_config_spelling() {
        let mut config = TrackConfig::default();
        let mut a = args();
        a.direction = Some("Backward".into());
        assert!(matches!(
            apply_overrides(&mut config, &a),
            Err(MpError::Config { .. })
        ));
        assert_eq!(config.direction, None);
    }
}
