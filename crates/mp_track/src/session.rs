// crates/mp_track/src/session.rs

//! 追踪会话
//!
//! 一次会话解析种子计划、构建出口分类器，并用 Rayon 并行追踪全部粒子。
//! 粒子相互独立，流场与分类器在会话期间只读；结果按种子顺序收集，
//! 粒子编号从 1 开始与种子顺序一致。

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use mp_mesh::FlowOracle;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::OutletClassifier;
use crate::error::TrackResult;
use crate::particle::{Particle, ParticleStatus, StopReason};
use crate::seed::{SeedPlan, SeedStrategy};

/// 默认最大步数
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// 会话参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSettings {
    /// 每个粒子的最大步数
    pub max_steps: NonZeroUsize,
    /// 是否并行追踪
    pub parallel: bool,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            max_steps: NonZeroUsize::new(DEFAULT_MAX_STEPS).unwrap_or(NonZeroUsize::MIN),
            parallel: true,
        }
    }
}

impl TrackSettings {
    /// 指定最大步数
    pub fn with_max_steps(mut self, max_steps: NonZeroUsize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// 指定是否并行
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// 会话统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// 粒子总数
    pub total: usize,
    /// 从出口离开
    pub exited: usize,
    /// 撞壁停止
    pub wall_hit: usize,
    /// 速度停滞
    pub stagnated: usize,
    /// 种子在网格外
    pub seed_outside: usize,
    /// 达到最大步数
    pub killed: usize,
    /// 各出口计数
    pub per_outlet: BTreeMap<String, usize>,
    /// 离开粒子的平均停留时间
    pub mean_exit_age: Option<f64>,
}

impl SessionSummary {
    /// 从粒子结果统计
    pub fn from_particles(particles: &[Particle]) -> Self {
        let mut summary = Self {
            total: particles.len(),
            ..Self::default()
        };
        let mut exit_age = 0.0;

        for p in particles {
            match p.status() {
                ParticleStatus::Killed => summary.killed += 1,
                ParticleStatus::ExitedOutlet(name) => {
                    summary.exited += 1;
                    exit_age += p.age();
                    *summary.per_outlet.entry(name.clone()).or_insert(0) += 1;
                }
                ParticleStatus::StoppedInternal => match p.stop_reason() {
                    Some(StopReason::Stagnation) => summary.stagnated += 1,
                    Some(StopReason::SeedOutsideDomain) => summary.seed_outside += 1,
                    Some(StopReason::WallHit) | None => summary.wall_hit += 1,
                },
                ParticleStatus::Active => {}
            }
        }

        if summary.exited > 0 {
            summary.mean_exit_age = Some(exit_age / summary.exited as f64);
        }
        summary
    }

    /// 停在域内的粒子数
    #[inline]
    pub fn stopped(&self) -> usize {
        self.wall_hit + self.stagnated + self.seed_outside
    }

    /// 输出日志
    pub fn log(&self) {
        info!(
            "追踪完成: {} 个粒子, 离开 {}, 撞壁 {}, 停滞 {}, 种子在域外 {}, 强制终止 {}",
            self.total, self.exited, self.wall_hit, self.stagnated, self.seed_outside, self.killed
        );
        for (name, count) in &self.per_outlet {
            info!("  出口 '{}': {} 个粒子", name, count);
        }
        if let Some(age) = self.mean_exit_age {
            info!("  平均停留时间: {:.6e}", age);
        }
    }
}

/// 会话结果
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// 解析后的种子计划
    pub plan: SeedPlan,
    /// 粒子结果（按编号排序）
    pub particles: Vec<Particle>,
    /// 统计
    pub summary: SessionSummary,
}

/// 追踪会话
pub struct TrackingSession<'a, O: FlowOracle + ?Sized> {
    oracle: &'a O,
    classifier: OutletClassifier,
    settings: TrackSettings,
}

impl<'a, O: FlowOracle + ?Sized> TrackingSession<'a, O> {
    /// 创建会话，从流场构建出口分类器
    pub fn new(oracle: &'a O, settings: TrackSettings) -> Self {
        let classifier = OutletClassifier::from_oracle(oracle);
        Self {
            oracle,
            classifier,
            settings,
        }
    }

    /// 会话参数
    #[inline]
    pub fn settings(&self) -> &TrackSettings {
        &self.settings
    }

    /// 出口分类器
    #[inline]
    pub fn classifier(&self) -> &OutletClassifier {
        &self.classifier
    }

    /// 运行会话
    ///
    /// 配置错误和 patch 不存在在追踪前返回；粒子级异常只体现在粒子状态中。
    pub fn run(&self, strategy: &SeedStrategy) -> TrackResult<SessionReport> {
        let plan = strategy.resolve(self.oracle)?;
        info!(
            "开始追踪: {} 个种子, 方向 {}, 最大步数 {}, 出口 {:?}",
            plan.len(),
            plan.direction,
            self.settings.max_steps,
            self.classifier.names()
        );

        let particles = self.track_all(&plan);
        let summary = SessionSummary::from_particles(&particles);
        summary.log();

        Ok(SessionReport {
            plan,
            particles,
            summary,
        })
    }

    fn track_all(&self, plan: &SeedPlan) -> Vec<Particle> {
        let tracer = crate::tracer::Tracer::new(
            self.oracle,
            &self.classifier,
            plan.direction,
            self.settings.max_steps,
        );

        if self.settings.parallel {
            plan.points
                .par_iter()
                .enumerate()
                .map(|(i, &seed)| tracer.track(i + 1, seed))
                .collect()
        } else {
            plan.points
                .iter()
                .enumerate()
                .map(|(i, &seed)| tracer.track(i + 1, seed))
                .collect()
        }
    }
}
