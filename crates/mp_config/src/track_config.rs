// crates/mp_config/src/track_config.rs

//! TrackConfig - 追踪配置
//!
//! JSON 格式，键名兼容旧版字典（`maxTimeStep`、`particlePositions`、
//! `patchName`、`outletPatchName`）：
//!
//! ```json
//! {
//!   "method": "points",
//!   "max_steps": 5000,
//!   "particle_positions": [[0.1, 0.2, 0.3]],
//!   "output": { "directory": "case" }
//! }
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use glam::DVec3;
use mp_foundation::{ensure, require};
use mp_track::{Direction, SeedStrategy, TrackSettings, DEFAULT_MAX_STEPS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::method::SeedMethod;

/// 追踪配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    /// 种子方法
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<SeedMethod>,

    /// 每个粒子的最大步数
    #[serde(default = "default_max_steps", alias = "maxTimeStep")]
    pub max_steps: usize,

    /// 显式种子坐标（`points` 方法）
    #[serde(default, alias = "particlePositions")]
    pub particle_positions: Vec<DVec3>,

    /// 种子 patch（`patch`/`backTrack` 方法）
    #[serde(
        default,
        alias = "patchName",
        alias = "outletPatchName",
        skip_serializing_if = "Option::is_none"
    )]
    pub patch_name: Option<String>,

    /// 追踪方向，缺省时 `patch` 方法按净通量判断
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,

    /// 是否并行追踪
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_max_steps() -> usize { DEFAULT_MAX_STEPS }
fn default_parallel() -> bool { true }

/// 输出配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出根目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 汇总表路径（相对输出根目录）
    #[serde(default = "default_summary_file")]
    pub summary_file: PathBuf,

    /// 轨迹目录（相对输出根目录）
    #[serde(default = "default_vtk_directory")]
    pub vtk_directory: PathBuf,

    /// 是否写出轨迹
    #[serde(default = "default_write_vtk")]
    pub write_vtk: bool,
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_summary_file() -> PathBuf { PathBuf::from("postProcessing/particlesData.csv") }
fn default_vtk_directory() -> PathBuf { PathBuf::from("VTK") }
fn default_write_vtk() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            summary_file: default_summary_file(),
            vtk_directory: default_vtk_directory(),
            write_vtk: default_write_vtk(),
        }
    }
}

impl OutputConfig {
    /// 汇总表完整路径
    pub fn summary_path(&self) -> PathBuf {
        self.directory.join(&self.summary_file)
    }

    /// 轨迹目录完整路径
    pub fn vtk_path(&self) -> PathBuf {
        self.directory.join(&self.vtk_directory)
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            method: None,
            max_steps: default_max_steps(),
            particle_positions: Vec::new(),
            patch_name: None,
            direction: None,
            output: OutputConfig::default(),
            parallel: default_parallel(),
        }
    }
}

impl TrackConfig {
    /// 显式坐标配置
    pub fn points(positions: Vec<DVec3>) -> Self {
        Self {
            method: Some(SeedMethod::Points),
            particle_positions: positions,
            ..Self::default()
        }
    }

    /// patch 配置
    pub fn patch(method: SeedMethod, patch: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            patch_name: Some(patch.into()),
            ..Self::default()
        }
    }

    /// 从文件加载配置并验证
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置（不验证，便于命令行覆盖后再验证）
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("加载追踪配置: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// 从 JSON 字符串解析（不验证）
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            self.max_steps > 0,
            ConfigError::invalid("max_steps", self.max_steps, "最大步数必须为正")
        );

        let method = require!(self.method, ConfigError::Missing("method".to_string()));
        match method {
            SeedMethod::Points => {
                if self.particle_positions.is_empty() {
                    return Err(ConfigError::invalid(
                        "particle_positions",
                        "[]",
                        "points 方法需要至少一个种子坐标",
                    ));
                }
                if let Some((i, p)) = self
                    .particle_positions
                    .iter()
                    .enumerate()
                    .find(|(_, p)| !p.is_finite())
                {
                    return Err(ConfigError::invalid(
                        format!("particle_positions[{}]", i),
                        p,
                        "坐标必须为有限值",
                    ));
                }
            }
            SeedMethod::Patch | SeedMethod::BackTrack => {
                match self.patch_name.as_deref() {
                    None => return Err(ConfigError::Missing("patch_name".to_string())),
                    Some(name) if name.trim().is_empty() => {
                        return Err(ConfigError::invalid("patch_name", "\"\"", "patch 名称不能为空"));
                    }
                    Some(_) => {}
                }
                if method == SeedMethod::BackTrack && self.direction == Some(Direction::Forward) {
                    return Err(ConfigError::invalid(
                        "direction",
                        Direction::Forward,
                        "backTrack 方法只能反向追踪",
                    ));
                }
            }
        }

        if self.output.summary_file.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output.summary_file", "\"\"", "汇总表路径不能为空"));
        }

        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 生成种子策略
    pub fn seed_strategy(&self) -> Result<SeedStrategy, ConfigError> {
        self.validate()?;
        let method = require!(self.method, ConfigError::Missing("method".to_string()));
        let patch = || {
            self.patch_name
                .clone()
                .ok_or_else(|| ConfigError::Missing("patch_name".to_string()))
        };

        let strategy = match method {
            SeedMethod::Points => SeedStrategy::Points {
                positions: self.particle_positions.clone(),
                direction: self.direction.unwrap_or_default(),
            },
            SeedMethod::Patch => match self.direction {
                Some(direction) => SeedStrategy::Patch {
                    patch: patch()?,
                    direction,
                },
                None => SeedStrategy::PatchAuto { patch: patch()? },
            },
            SeedMethod::BackTrack => SeedStrategy::Patch {
                patch: patch()?,
                direction: Direction::Backward,
            },
        };
        Ok(strategy)
    }

    /// 生成会话参数
    pub fn track_settings(&self) -> Result<TrackSettings, ConfigError> {
        let max_steps = NonZeroUsize::new(self.max_steps)
            .ok_or_else(|| ConfigError::invalid("max_steps", self.max_steps, "最大步数必须为正"))?;
        Ok(TrackSettings::default()
            .with_max_steps(max_steps)
            .with_parallel(self.parallel))
    }
}
