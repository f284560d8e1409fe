// apps/mp_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 验证追踪配置；给出算例时，进一步检查 patch 是否存在、种子是否在网格内。

use anyhow::Result;
use clap::Args;
use mp_config::{SeedMethod, TrackConfig};
use mp_foundation::MpError;
use mp_io::load_case;
use mp_mesh::{FlowField, FlowOracle, FluxSign};
use mp_track::detect_direction;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 单次运行步数过多时给出警告
const LARGE_MAX_STEPS: usize = 10_000_000;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 追踪配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 算例快照路径
    #[arg(long)]
    pub case: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== mptrack 配置验证 ===");

    let mut result = ValidationResult::default();

    let config = validate_config(&args.config, &mut result);

    if let Some(case_path) = &args.case {
        println!("\n检查算例: {}", case_path.display());
        match load_case(case_path) {
            Ok(field) => {
                println!("  ✓ 算例有效 ({} 单元)", field.mesh().n_cells());
                if let Some(config) = &config {
                    validate_against_case(config, &field, &mut result);
                }
            }
            Err(e) => result.add_error(format!("算例无效: {}", e)),
        }
    }

    print_validation_result(&result, args.strict)
}

fn validate_config(path: &Path, result: &mut ValidationResult) -> Option<TrackConfig> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return None;
    }

    let config = match TrackConfig::load(path) {
        Ok(c) => c,
        Err(e) => {
            result.add_error(e.to_string());
            return None;
        }
    };

    if let Err(e) = config.validate() {
        result.add_error(e.to_string());
        return None;
    }

    if config.max_steps > LARGE_MAX_STEPS {
        result.add_warning(format!("max_steps = {} 较大，粒子可能长时间不终止", config.max_steps));
    }
    if config.method == Some(SeedMethod::Points) && config.patch_name.is_some() {
        result.add_warning("points 方法忽略 patch_name");
    }

    println!("  ✓ 配置文件格式有效");
    Some(config)
}

fn validate_against_case(config: &TrackConfig, field: &FlowField, result: &mut ValidationResult) {
    match config.method {
        Some(SeedMethod::Points) => {
            let outside: Vec<usize> = config
                .particle_positions
                .iter()
                .enumerate()
                .filter(|(_, p)| field.locate_cell(**p).is_none())
                .map(|(i, _)| i + 1)
                .collect();
            if !outside.is_empty() {
                result.add_warning(format!("种子 {:?} 不在网格内，将直接停止", outside));
            }
        }
        Some(method) => {
            let Some(name) = config.patch_name.as_deref() else {
                return;
            };
            let Some(patch) = field.resolve_patch(name) else {
                result.add_error(format!("patch 不存在: {}", name));
                return;
            };
            let sign = field.net_flux_sign(&patch);
            println!(
                "  patch '{}': {} 面, 净通量 {:.4e} ({})",
                name,
                patch.n_faces(),
                field.patch_net_flux(patch.index),
                sign.flow()
            );
            if method == SeedMethod::Patch && config.direction.is_none() {
                println!("  自动方向: {}", detect_direction(sign));
                if sign == FluxSign::Zero {
                    result.add_warning(format!("patch '{}' 净通量为零，将按出口反向追踪", name));
                }
            }
            if method == SeedMethod::BackTrack && sign == FluxSign::Negative {
                result.add_warning(format!("patch '{}' 为净入流，反向追踪可能立即离开网格", name));
            }
        }
        None => {}
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        Err(MpError::config(format!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        ))
        .into())
    }
}

/// 验证单个配置文件并返回结果（供测试使用）
#[cfg(test)]
fn check(config: &Path, case: Option<&Path>) -> Result<ValidationResult> {
    use anyhow::Context;

    let mut result = ValidationResult::default();
    let parsed = validate_config(config, &mut result);
    if let (Some(config), Some(case)) = (parsed, case) {
        let field = load_case(case).context("无法加载算例")?;
        validate_against_case(&config, &field, &mut result);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use mp_io::CaseSnapshot;
    use mp_mesh::BoxMeshGenerator;

    fn write_case(dir: &Path) -> PathBuf {
        let mesh = BoxMeshGenerator::new([2, 1, 1], DVec3::ZERO, DVec3::new(2.0, 1.0, 1.0))
            .build()
            .unwrap();
        let field = FlowField::uniform(mesh, DVec3::X).unwrap();
        let path = dir.join("case.json");
        CaseSnapshot::from_flow_field(&field).save(&path).unwrap();
        path
    }

    #[test]
    fn test_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = check(&dir.path().join("none.json"), None).unwrap();
        assert!(!result.is_ok());
    }

    #[test]
    fn test_unknown_patch_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let case = write_case(dir.path());
        let config = dir.path().join("track.json");
        TrackConfig::patch(SeedMethod::Patch, "nozzle").save_to_file(&config).unwrap();

        let result = check(&config, Some(&case)).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("nozzle"));
    }

    #[test]
    fn test_outside_seed_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let case = write_case(dir.path());
        let config = dir.path().join("track.json");
        TrackConfig::points(vec![DVec3::splat(0.5), DVec3::new(5.0, 0.5, 0.5)])
            .save_to_file(&config)
            .unwrap();

        let result = check(&config, Some(&case)).unwrap();
        assert!(result.is_ok());
        assert!(!result.is_ok_strict());
        assert!(result.warnings[0].contains("[2]"));
    }

    #[test]
    fn test_zero_flux_patch_warns() {
        let dir = tempfile::tempdir().unwrap();
        let case = write_case(dir.path());
        let config = dir.path().join("track.json");
        TrackConfig::patch(SeedMethod::Patch, "ymin").save_to_file(&config).unwrap();

        let result = check(&config, Some(&case)).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.warnings.len(), 1);
    }
}
