// crates/mp_config/src/lib.rs

//! mptrack Config Layer (Layer 4)
//!
//! 追踪配置层，负责读取、验证 JSON 配置并转换为追踪核心的种子策略和会话参数。
//!
//! # 模块概览
//!
//! - [`method`]: 种子方法选择器（`points` / `patch` / `backTrack`）
//! - [`track_config`]: TrackConfig 追踪配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: mp_cli          ─> uses TrackConfig
//! Layer 4: mp_config       ─> TrackConfig, SeedMethod (本层)
//! Layer 3: mp_track        ─> SeedStrategy, TrackSettings
//! Layer 2: mp_mesh
//! Layer 1: mp_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod method;
pub mod track_config;

/// 层级标识
pub const LAYER: u8 = 4;

// 重导出核心类型
pub use error::ConfigError;
pub use method::SeedMethod;
pub use track_config::{OutputConfig, TrackConfig};
