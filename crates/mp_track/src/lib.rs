// crates/mp_track/src/lib.rs

//! mptrack 粒子追踪核心
//!
//! 在稳态流场中追踪无质量粒子，记录轨迹、行程、停留时间和去向。
//!
//! # 模块
//!
//! - [`seed`]: 种子策略（坐标列表 / patch 质心，方向给定或自动判断）
//! - [`step`]: 局部时间步 `dt = 0.5 * cbrt(V) / |U|`
//! - [`tracer`]: 单粒子步进状态机
//! - [`classifier`]: 出口分类器
//! - [`session`]: Rayon 并行会话与统计
//!
//! 核心只通过 [`mp_mesh::FlowOracle`] 访问网格和流场。
//!
//! # 示例
//!
//! ```rust
//! use glam::DVec3;
//! use mp_mesh::{BoxMeshGenerator, FlowField};
//! use mp_track::{ParticleStatus, SeedStrategy, TrackSettings, TrackingSession};
//!
//! let mesh = BoxMeshGenerator::new([4, 1, 1], DVec3::ZERO, DVec3::new(4.0, 1.0, 1.0))
//!     .build()
//!     .unwrap();
//! let field = FlowField::uniform(mesh, DVec3::X).unwrap();
//!
//! let session = TrackingSession::new(&field, TrackSettings::default());
//! let report = session
//!     .run(&SeedStrategy::points(vec![DVec3::new(0.5, 0.5, 0.5)]))
//!     .unwrap();
//!
//! assert_eq!(report.particles[0].status(), &ParticleStatus::ExitedOutlet("xmax".into()));
//! ```

pub mod classifier;
pub mod error;
pub mod particle;
pub mod seed;
pub mod session;
pub mod step;
pub mod tracer;

pub use classifier::{OutletClassifier, OutletPatch};
pub use error::{TrackError, TrackResult};
pub use particle::{Particle, ParticleStatus, StopReason};
pub use seed::{detect_direction, SeedPlan, SeedSource, SeedStrategy};
pub use session::{SessionReport, SessionSummary, TrackSettings, TrackingSession, DEFAULT_MAX_STEPS};
pub use step::{local_time_step, Direction, STEP_FRACTION};
pub use tracer::Tracer;
