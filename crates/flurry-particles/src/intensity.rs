//! Production-rate to ambient density/speed mapping

use crate::config::IntensityConfig;
use crate::pool::ParticlePool;
use flurry_core::EconomySnapshot;

/// Output of the last recalculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityState {
    pub target_count: usize,
    pub speed_multiplier: f32,
    /// Host timestamp of the last recalculation, `None` before the first
    pub last_recalc: Option<f64>,
}

pub struct IntensityController {
    config: IntensityConfig,
    state: IntensityState,
}

/// `log10` of a magnitude, floored at 0. `+inf` saturates to the largest
/// finite value; NaN and negatives map to 0.
fn log_magnitude(value: f64) -> f64 {
    if value.is_nan() || value <= 1.0 {
        return 0.0;
    }
    value.min(f64::MAX).log10()
}

impl IntensityController {
    pub fn new(config: IntensityConfig) -> Self {
        let state = IntensityState {
            target_count: config.base_count,
            speed_multiplier: 1.0,
            last_recalc: None,
        };
        Self { config, state }
    }

    pub fn config(&self) -> &IntensityConfig {
        &self.config
    }

    pub fn state(&self) -> IntensityState {
        self.state
    }

    /// Target ambient count and speed multiplier for a snapshot.
    ///
    /// Count grows by `count_scale` per order of magnitude of production,
    /// speed by `speed_scale`. An active frenzy then adds its extra count and
    /// multiplies the speed before both are clamped again.
    pub fn compute(&self, snapshot: &EconomySnapshot) -> (usize, f32) {
        let cfg = &self.config;
        let log_m = log_magnitude(snapshot.sanitized_rate());
        let (min_count, max_count) = count_bounds(cfg);
        let max_speed = cfg.max_speed_multiplier.max(1.0);

        let mut count = scaled_count(cfg, log_m, min_count, max_count);
        let mut speed = scaled_speed(cfg, log_m, max_speed);

        if let Some(boost) = snapshot
            .frenzy
            .active_kind()
            .and_then(|kind| cfg.boost_for(kind))
        {
            count = count.saturating_add(boost.extra_count).min(max_count);
            let boosted = speed * boost.speed_factor;
            if boosted.is_finite() {
                speed = boosted.clamp(1.0, max_speed);
            }
        }
        (count, speed)
    }

    /// Recompute from `snapshot`, push the result into `pool` and return it.
    pub fn recalculate(
        &mut self,
        now: f64,
        snapshot: &EconomySnapshot,
        pool: &mut ParticlePool,
    ) -> IntensityState {
        let (target_count, speed_multiplier) = self.compute(snapshot);
        pool.resize_ambient_to(target_count);
        pool.set_ambient_speed(speed_multiplier);

        self.state = IntensityState {
            target_count,
            speed_multiplier,
            last_recalc: Some(now),
        };
        tracing::debug!(
            target_count,
            speed_multiplier,
            ambient = pool.ambient_len(),
            "intensity recalculated"
        );
        self.state
    }

    /// Burst size and speed for a windfall of `amount` at production `rate`.
    ///
    /// Uses the same scales and bounds as the ambient mapping, driven by how
    /// many seconds of production the windfall is worth.
    pub fn income_burst(&self, amount: f64, rate: f64) -> (usize, f32) {
        let cfg = &self.config;
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let rate = if rate.is_finite() { rate.max(1.0) } else { 1.0 };
        let log_r = log_magnitude(amount / rate);
        let (min_count, max_count) = count_bounds(cfg);

        let count = scaled_count(cfg, log_r, min_count, max_count);
        let speed = scaled_speed(cfg, log_r, cfg.max_speed_multiplier.max(1.0));
        (count, speed)
    }
}

/// `base_count + log * count_scale` within the bounds; a non-finite
/// intermediate falls back to `min_count`
fn scaled_count(cfg: &IntensityConfig, log: f64, min_count: usize, max_count: usize) -> usize {
    let raw = cfg.base_count as f64 + log * cfg.count_scale as f64;
    if !raw.is_finite() {
        return min_count;
    }
    raw.clamp(min_count as f64, max_count as f64).round() as usize
}

/// `1 + log * speed_scale` within `[1, max_speed]`; non-finite reads as 1
fn scaled_speed(cfg: &IntensityConfig, log: f64, max_speed: f32) -> f32 {
    let raw = 1.0 + log as f32 * cfg.speed_scale;
    if raw.is_finite() {
        raw.clamp(1.0, max_speed)
    } else {
        1.0
    }
}

fn count_bounds(cfg: &IntensityConfig) -> (usize, usize) {
    (cfg.base_count, cfg.max_count.max(cfg.base_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticleConfig;
    use flurry_core::FrenzyKind;
    use proptest::prelude::*;

    fn controller() -> IntensityController {
        IntensityController::new(IntensityConfig::default())
    }

    #[test]
    fn zero_metric_gives_baseline() {
        let c = controller();
        assert_eq!(c.compute(&EconomySnapshot::new(0.0)), (40, 1.0));
    }

    #[test]
    fn million_per_second_is_six_orders() {
        let c = controller();
        let (count, speed) = c.compute(&EconomySnapshot::new(1_000_000.0));
        assert_eq!(count, 40 + 6 * 8);
        assert!((speed - 1.9).abs() < 1e-5);
    }

    #[test]
    fn huge_metric_clamps() {
        let c = controller();
        let (count, speed) = c.compute(&EconomySnapshot::new(1e300));
        assert_eq!(count, 160);
        assert_eq!(speed, 3.0);
        assert_eq!(c.compute(&EconomySnapshot::new(f64::INFINITY)), (160, 3.0));
    }

    #[test]
    fn garbage_metric_treated_as_zero() {
        let c = controller();
        assert_eq!(c.compute(&EconomySnapshot::new(-5.0)), (40, 1.0));
        assert_eq!(c.compute(&EconomySnapshot::new(f64::NAN)), (40, 1.0));
    }

    #[test]
    fn click_frenzy_boosts_on_top_of_baseline() {
        let c = controller();
        let snap = EconomySnapshot::new(0.0).with_frenzy(FrenzyKind::Click, 10.0);
        assert_eq!(c.compute(&snap), (80, 2.0));

        // Speed clamps after the frenzy factor
        let snap = EconomySnapshot::new(1e12).with_frenzy(FrenzyKind::Click, 10.0);
        let (count, speed) = c.compute(&snap);
        assert_eq!(count, 160);
        assert_eq!(speed, 3.0);
    }

    #[test]
    fn unconfigured_frenzy_kind_has_no_effect() {
        let mut cfg = IntensityConfig::default();
        cfg.frenzy.clear();
        let c = IntensityController::new(cfg);
        let snap = EconomySnapshot::new(0.0).with_frenzy(FrenzyKind::Elder, 3.0);
        assert_eq!(c.compute(&snap), (40, 1.0));
    }

    #[test]
    fn non_finite_scales_fall_back_to_baseline() {
        let cfg = IntensityConfig {
            count_scale: f32::NAN,
            speed_scale: f32::INFINITY,
            ..IntensityConfig::default()
        };
        let c = IntensityController::new(cfg);
        assert_eq!(c.compute(&EconomySnapshot::new(0.0)), (40, 1.0));
        assert_eq!(c.compute(&EconomySnapshot::new(1e6)), (40, 1.0));
        assert_eq!(c.income_burst(1e6, 1.0), (40, 1.0));

        let mut pool = ParticlePool::new(ParticleConfig::default(), 3);
        pool.set_bounds(320.0, 240.0);
        let mut c = c;
        let state = c.recalculate(0.0, &EconomySnapshot::new(0.0), &mut pool);
        pool.seed(state.target_count);
        assert_eq!(pool.ambient_len(), 40);
    }

    #[test]
    fn recalculate_drives_pool_toward_target() {
        let mut c = controller();
        let mut pool = ParticlePool::new(ParticleConfig::default(), 9);
        pool.set_bounds(320.0, 240.0);
        pool.seed(40);

        let snap = EconomySnapshot::new(1_000_000.0);
        let mut now = 0.0;
        let state = c.recalculate(now, &snap, &mut pool);
        assert_eq!(state.target_count, 88);
        assert_eq!(state.last_recalc, Some(0.0));
        assert_eq!(pool.ambient_len(), 48);
        assert!((pool.ambient_speed() - 1.9).abs() < 1e-5);

        for _ in 0..10 {
            now += 1.0;
            c.recalculate(now, &snap, &mut pool);
        }
        assert_eq!(pool.ambient_len(), 88);

        c.recalculate(now + 1.0, &EconomySnapshot::new(0.0), &mut pool);
        assert_eq!(pool.ambient_len(), 40);
    }

    #[test]
    fn income_burst_scales_with_windfall() {
        let c = controller();
        assert_eq!(c.income_burst(10.0, 100.0), (40, 1.0));
        let (count, speed) = c.income_burst(100_000.0, 100.0);
        assert_eq!(count, 64);
        assert!((speed - 1.45).abs() < 1e-5);
        // Zero rate is treated as one per second
        assert_eq!(c.income_burst(1e30, 0.0), (160, 3.0));
        assert_eq!(c.income_burst(f64::NAN, 5.0), (40, 1.0));
    }

    proptest! {
        #[test]
        fn mapping_is_monotonic(a in 0.0f64..1e300, b in 0.0f64..1e300) {
            let c = controller();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (c1, s1) = c.compute(&EconomySnapshot::new(lo));
            let (c2, s2) = c.compute(&EconomySnapshot::new(hi));
            prop_assert!(c1 <= c2);
            prop_assert!(s1 <= s2);
            prop_assert!((40..=160).contains(&c1));
            prop_assert!((1.0..=3.0).contains(&s2));
        }
    }
}
