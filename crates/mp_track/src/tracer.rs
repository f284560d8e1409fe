// crates/mp_track/src/tracer.rs

//! 粒子追踪器
//!
//! 单个粒子的步进状态机：
//!
//! ```text
//! Active ──定位成功──> 步进 ──步数达到上限──> Killed
//!   │                   │
//!   │                   └──零速度──> StoppedInternal (Stagnation)
//!   │
//!   └──定位失败──┬── 首次迭代 ──> StoppedInternal (SeedOutsideDomain)
//!                └── 之后 ──> 出口分类 ──> ExitedOutlet / StoppedInternal (WallHit)
//! ```
//!
//! 追踪器只读访问流场和分类器，除粒子本身外没有副作用，可在多线程间共享。

use std::num::NonZeroUsize;

use glam::DVec3;
use mp_mesh::{CellId, FlowOracle};
use tracing::{debug, trace, warn};

use crate::classifier::OutletClassifier;
use crate::error::TrackError;
use crate::particle::{Particle, ParticleStatus, StopReason};
use crate::step::{displacement, local_time_step, Direction};

/// 粒子追踪器
pub struct Tracer<'a, O: FlowOracle + ?Sized> {
    oracle: &'a O,
    classifier: &'a OutletClassifier,
    direction: Direction,
    max_steps: NonZeroUsize,
}

impl<'a, O: FlowOracle + ?Sized> Tracer<'a, O> {
    /// 创建追踪器
    pub fn new(
        oracle: &'a O,
        classifier: &'a OutletClassifier,
        direction: Direction,
        max_steps: NonZeroUsize,
    ) -> Self {
        Self {
            oracle,
            classifier,
            direction,
            max_steps,
        }
    }

    /// 追踪方向
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// 最大步数
    #[inline]
    pub fn max_steps(&self) -> usize {
        self.max_steps.get()
    }

    /// 从种子点追踪一个粒子直到终止
    pub fn track(&self, id: usize, seed: DVec3) -> Particle {
        let mut particle = Particle::new(id, seed);
        debug!("粒子 {} 开始追踪: seed = {}", id, seed);

        let mut iterations = 0usize;
        while particle.is_active() {
            let Some(cell) = self.oracle.locate_cell(particle.position()) else {
                self.finish_outside(&mut particle);
                break;
            };
            particle.set_last_cell(cell);

            let velocity = self.oracle.velocity_at(cell);
            let dt = match local_time_step(cell, self.oracle.volume_of(cell), velocity) {
                Ok(dt) => dt,
                Err(err) => {
                    warn!("粒子 {} 停止: {}", id, err);
                    particle.finish(ParticleStatus::StoppedInternal, Some(StopReason::Stagnation));
                    break;
                }
            };

            particle.advance(displacement(velocity, dt, self.direction), dt);
            trace!(
                "粒子 {} 第 {} 步: cell = {}, dt = {:e}, pos = {}",
                id,
                iterations + 1,
                cell,
                dt,
                particle.position()
            );

            iterations += 1;
            if iterations >= self.max_steps.get() {
                particle.finish(ParticleStatus::Killed, None);
            }
        }

        debug!(
            "粒子 {} 结束: {} ({} 步, 距离 {:.6e}, 时间 {:.6e})",
            id,
            particle.status(),
            particle.steps(),
            particle.distance(),
            particle.age()
        );
        particle
    }

    /// 定位失败时的终止处理
    fn finish_outside(&self, particle: &mut Particle) {
        match particle.last_cell() {
            None => {
                let err = TrackError::OutOfDomainOnSeed {
                    position: particle.seed(),
                };
                warn!("粒子 {} 停止: {}", particle.id, err);
                particle.finish(
                    ParticleStatus::StoppedInternal,
                    Some(StopReason::SeedOutsideDomain),
                );
            }
            Some(last) => self.classify_exit(particle, last),
        }
    }

    fn classify_exit(&self, particle: &mut Particle, last: CellId) {
        match self.classifier.classify(last) {
            Some(name) => particle.finish(ParticleStatus::ExitedOutlet(name.to_string()), None),
            None => particle.finish(ParticleStatus::StoppedInternal, Some(StopReason::WallHit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::OutletPatch;
    use mp_mesh::{FluxSign, PatchEntry};

    /// 半开区间 [0, n) x [0, 1) x [0, 1) 的均匀单元网格
    struct HalfOpenChannel {
        n_cells: usize,
        velocity: DVec3,
    }

    impl FlowOracle for HalfOpenChannel {
        fn locate_cell(&self, p: DVec3) -> Option<CellId> {
            let inside = p.x >= 0.0
                && p.x < self.n_cells as f64
                && (0.0..1.0).contains(&p.y)
                && (0.0..1.0).contains(&p.z);
            inside.then(|| CellId::new(p.x.floor() as usize))
        }

        fn velocity_at(&self, _cell: CellId) -> DVec3 {
            self.velocity
        }

        fn volume_of(&self, _cell: CellId) -> f64 {
            1.0
        }

        fn cell_centroid(&self, cell: CellId) -> DVec3 {
            DVec3::new(cell.index() as f64 + 0.5, 0.5, 0.5)
        }

        fn resolve_patch(&self, _name: &str) -> Option<PatchEntry> {
            None
        }

        fn all_patches(&self) -> Vec<PatchEntry> {
            Vec::new()
        }

        fn net_flux_sign(&self, _patch: &PatchEntry) -> FluxSign {
            FluxSign::Zero
        }
    }

    fn steps(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_unit_cube_leaves_after_two_steps() {
        let oracle = HalfOpenChannel {
            n_cells: 1,
            velocity: DVec3::X,
        };
        let classifier = OutletClassifier::default();
        let tracer = Tracer::new(&oracle, &classifier, Direction::Forward, steps(10));

        let p = tracer.track(1, DVec3::ZERO);
        assert_eq!(p.steps(), 2);
        assert_eq!(p.status(), &ParticleStatus::StoppedInternal);
        assert_eq!(p.stop_reason(), Some(StopReason::WallHit));
        assert!((p.distance() - 1.0).abs() < 1e-12);
        assert!((p.age() - 1.0).abs() < 1e-12);
        assert_eq!(p.last_cell(), Some(CellId::new(0)));
    }

    #[test]
    fn test_exit_through_registered_outlet() {
        let oracle = HalfOpenChannel {
            n_cells: 3,
            velocity: DVec3::X,
        };
        let classifier =
            OutletClassifier::from_outlets(vec![OutletPatch::new("outlet", [CellId::new(2)])]);
        let tracer = Tracer::new(&oracle, &classifier, Direction::Forward, steps(100));

        let p = tracer.track(1, DVec3::new(0.5, 0.5, 0.5));
        assert_eq!(p.status(), &ParticleStatus::ExitedOutlet("outlet".into()));
        assert!(p.stop_reason().is_none());
        assert_eq!(p.steps(), 5);
    }

    #[test]
    fn test_backward_leaves_through_wall() {
        let oracle = HalfOpenChannel {
            n_cells: 3,
            velocity: DVec3::X,
        };
        let classifier =
            OutletClassifier::from_outlets(vec![OutletPatch::new("outlet", [CellId::new(2)])]);
        let tracer = Tracer::new(&oracle, &classifier, Direction::Backward, steps(100));

        let p = tracer.track(1, DVec3::new(2.5, 0.5, 0.5));
        assert_eq!(p.status(), &ParticleStatus::StoppedInternal);
        assert_eq!(p.last_cell(), Some(CellId::new(0)));
        assert!(p.trajectory().windows(2).all(|w| w[1].x < w[0].x));
    }

    #[test]
    fn test_killed_at_max_steps() {
        let oracle = HalfOpenChannel {
            n_cells: 100,
            velocity: DVec3::X,
        };
        let classifier = OutletClassifier::default();
        let tracer = Tracer::new(&oracle, &classifier, Direction::Forward, steps(3));

        let p = tracer.track(4, DVec3::new(0.5, 0.5, 0.5));
        assert!(p.status().is_killed());
        assert_eq!(p.steps(), 3);
        assert_eq!(p.trajectory().len(), 4);
        assert_eq!(p.id, 4);
    }

    #[test]
    fn test_seed_outside_domain() {
        let oracle = HalfOpenChannel {
            n_cells: 1,
            velocity: DVec3::X,
        };
        let classifier = OutletClassifier::default();
        let tracer = Tracer::new(&oracle, &classifier, Direction::Forward, steps(10));

        let p = tracer.track(1, DVec3::new(-5.0, 0.5, 0.5));
        assert_eq!(p.status(), &ParticleStatus::StoppedInternal);
        assert_eq!(p.stop_reason(), Some(StopReason::SeedOutsideDomain));
        assert_eq!(p.trajectory().len(), 1);
        assert_eq!(p.distance(), 0.0);
        assert_eq!(p.age(), 0.0);
        assert!(p.last_cell().is_none());
    }

    #[test]
    fn test_zero_velocity_stagnates() {
        let oracle = HalfOpenChannel {
            n_cells: 1,
            velocity: DVec3::ZERO,
        };
        let classifier = OutletClassifier::default();
        let tracer = Tracer::new(&oracle, &classifier, Direction::Forward, steps(10));

        let p = tracer.track(1, DVec3::splat(0.5));
        assert_eq!(p.status(), &ParticleStatus::StoppedInternal);
        assert_eq!(p.stop_reason(), Some(StopReason::Stagnation));
        assert_eq!(p.steps(), 0);
        assert_eq!(p.last_cell(), Some(CellId::new(0)));
    }
}
