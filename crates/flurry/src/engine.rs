//! The engine facade the host talks to
//!
//! The host drives three entry points with its own timestamps: `frame` on
//! every display refresh, `poll_timers` whenever its timer callback fires (or
//! simply every refresh), and the burst/overlay calls from UI callbacks.

use crate::config::EngineConfig;
use crate::display::RateDisplay;
use crate::economy::Economy;
use crate::reward::{EngineTimer, EventTimer, RewardPhase};
use crate::scheduler::AnimationScheduler;
use flurry_core::{LayoutBox, Result, Surface};
use flurry_overlay::{DrawerRegistry, OverlayAnimator, RefreshStats, VisibleEntity};
use flurry_particles::{IntensityController, IntensityState, ParticlePool};
use flurry_runtime::{EngineEvent, EventBus, FrameSystem, ScreenStack, TimerId, TimerQueue};

const DEFAULT_SEED: u32 = 0x0F1A_5EED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    TornDown,
}

pub struct Engine {
    config: EngineConfig,
    scheduler: AnimationScheduler,
    pool: ParticlePool,
    intensity: IntensityController,
    overlays: OverlayAnimator,
    rewards: EventTimer,
    timers: TimerQueue<EngineTimer>,
    intensity_timer: Option<TimerId>,
    due: Vec<(TimerId, EngineTimer)>,
    screens: ScreenStack,
    events: EventBus,
    display: RateDisplay,
    surface: Surface,
    last_rate: f64,
    lifecycle: Lifecycle,
}

impl Engine {
    /// Create an engine drawing into a surface sized to `layout`
    pub fn new(config: EngineConfig, layout: LayoutBox) -> Result<Self> {
        Self::with_seed(config, layout, DEFAULT_SEED)
    }

    /// Same as [`Engine::new`] with an explicit seed for particle and reward
    /// randomness
    pub fn with_seed(config: EngineConfig, layout: LayoutBox, seed: u32) -> Result<Self> {
        config.validate()?;

        let mut pool = ParticlePool::new(config.particles.clone(), seed);
        pool.set_bounds(layout.width, layout.height);
        pool.reserve_ambient(config.intensity.max_count);

        Ok(Self {
            scheduler: AnimationScheduler::new(&config.scheduler),
            intensity: IntensityController::new(config.intensity.clone()),
            overlays: OverlayAnimator::new(DrawerRegistry::from_config(&config.overlays)),
            rewards: EventTimer::new(config.reward.clone(), seed.rotate_left(16) ^ 0x5EED),
            timers: TimerQueue::new(),
            intensity_timer: None,
            due: Vec::with_capacity(4),
            screens: ScreenStack::new(),
            events: EventBus::new(),
            display: RateDisplay::new(),
            surface: Surface::from_layout(&layout),
            last_rate: 0.0,
            lifecycle: Lifecycle::Created,
            pool,
            config,
        })
    }

    /// Seed the ambient layer, arm the intensity interval and the first
    /// reward, and register the frame callback. Only the first call counts.
    pub fn start(&mut self, now: f64, economy: &dyn Economy) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Running;

        let snapshot = economy.snapshot();
        let (target, _) = self.intensity.compute(&snapshot);
        self.pool.seed(target);
        self.recalculate_intensity(now, economy);

        self.intensity_timer = Some(self.timers.set_interval(
            now,
            self.config.intensity.recalc_interval,
            EngineTimer::IntensityRecalc,
        ));
        self.rewards.schedule(now, &mut self.timers, &mut self.events);
        self.scheduler.register();

        tracing::info!(
            ambient = self.pool.ambient_len(),
            burst_capacity = self.pool.burst_capacity(),
            width = self.surface.width(),
            height = self.surface.height(),
            "engine started"
        );
    }

    /// Offer a display refresh. Returns true when the frame did work.
    ///
    /// This is the only place the shared surface is cleared or drawn.
    pub fn frame(&mut self, now: f64) -> bool {
        let Some(frame) = self.scheduler.offer(now) else {
            return false;
        };
        let screen = self.screens.active();
        let (particles, overlays) = (screen.particles, screen.overlays);

        self.surface.clear();
        if particles.advances() {
            self.pool.update(&frame);
        }
        if particles.visible() {
            FrameSystem::render(&mut self.pool, &frame, &mut self.surface);
        }

        let overlay_time = self.scheduler.overlay_time(&frame, overlays.advances());
        if overlays.visible() {
            let at = flurry_runtime::FrameTime {
                elapsed: overlay_time,
                ..frame
            };
            self.overlays.render(&at, &mut self.surface);
        }

        self.display.update(self.last_rate);
        true
    }

    /// Fire every timer due at `now`
    pub fn poll_timers(&mut self, now: f64, economy: &mut dyn Economy) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        let mut due = std::mem::take(&mut self.due);
        due.clear();
        self.timers.poll(now, &mut due);
        for &(_, tag) in &due {
            match tag {
                EngineTimer::IntensityRecalc => self.recalculate_intensity(now, economy),
                EngineTimer::RewardAppear => {
                    self.rewards.on_appear(now, &mut self.timers, &mut self.events)
                }
                EngineTimer::RewardExpire => self.rewards.on_expire(
                    now,
                    self.screens.holds_rewards(),
                    &mut self.timers,
                    &mut self.events,
                ),
            }
        }
        self.due = due;
    }

    fn recalculate_intensity(&mut self, now: f64, economy: &dyn Economy) {
        let snapshot = economy.snapshot();
        self.last_rate = snapshot.sanitized_rate();
        let state = self.intensity.recalculate(now, &snapshot, &mut self.pool);
        self.events.push(EngineEvent::IntensityChanged {
            target_count: state.target_count,
            speed_multiplier: state.speed_multiplier,
        });
    }

    /// The player clicked the shown reward. Fires the reward burst, pays out
    /// through the economy and returns the amount, or `None` when no reward
    /// is on screen.
    pub fn click_reward(&mut self, now: f64, economy: &mut dyn Economy) -> Option<f64> {
        if self.lifecycle != Lifecycle::Running {
            return None;
        }
        let burst = self.rewards.click(now, &mut self.timers, &mut self.events)?;
        self.pool.spawn_burst(burst.count, burst.speed);
        let amount = economy.collect_reward();
        self.events.push(EngineEvent::RewardCollected { amount });
        tracing::info!(amount, "reward collected");
        Some(amount)
    }

    /// Fire a one-off burst. Returns how many particles were spawned;
    /// requests beyond the free burst capacity are dropped.
    pub fn trigger_burst(&mut self, count: usize, speed_multiplier: f32) -> usize {
        if self.lifecycle == Lifecycle::TornDown {
            return 0;
        }
        self.pool.spawn_burst(count, speed_multiplier)
    }

    /// Burst sized by how large `amount` is relative to the current
    /// production rate
    pub fn trigger_income_burst(&mut self, amount: f64) -> usize {
        let (count, speed) = self.intensity.income_burst(amount, self.last_rate);
        self.trigger_burst(count, speed)
    }

    /// Sync entity overlays with the visible set; call on layout changes
    pub fn refresh_overlays(&mut self, visible: &[VisibleEntity]) -> RefreshStats {
        self.overlays.refresh(visible)
    }

    /// The host viewport changed. Cached sprites are dropped when the pixel
    /// density changes.
    pub fn resize(&mut self, layout: LayoutBox) {
        if self.lifecycle == Lifecycle::TornDown || layout.is_empty() {
            return;
        }
        if layout.pixel_density != self.surface.pixel_density() {
            self.pool.clear_sprites();
        }
        let (w, h) = layout.physical_size();
        self.surface.resize(w, h, layout.pixel_density);
        self.pool.set_bounds(layout.width, layout.height);
    }

    /// Cancel every timer, deregister the frame callback, then release the
    /// surfaces. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.rewards.cancel(&mut self.timers);
        if let Some(id) = self.intensity_timer.take() {
            self.timers.cancel(id);
        }
        self.timers.cancel_all();
        self.scheduler.deregister();

        self.pool.shutdown();
        self.overlays.shutdown();
        self.surface.tear_down();
        self.lifecycle = Lifecycle::TornDown;
        tracing::info!(frames = self.scheduler.frames_run(), "engine torn down");
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn overlays(&self) -> &OverlayAnimator {
        &self.overlays
    }

    /// Register custom drawers before the first `refresh_overlays`
    pub fn drawers_mut(&mut self) -> &mut DrawerRegistry {
        self.overlays.registry_mut()
    }

    pub fn screens(&self) -> &ScreenStack {
        &self.screens
    }

    /// Open and close modal layers as the host UI shows them
    pub fn screens_mut(&mut self) -> &mut ScreenStack {
        &mut self.screens
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn intensity_state(&self) -> IntensityState {
        self.intensity.state()
    }

    pub fn reward_phase(&self) -> RewardPhase {
        self.rewards.phase()
    }

    /// Earliest armed timer deadline, for hosts that sleep between polls
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    /// Production rate text as of the last executed frame
    pub fn rate_text(&self) -> &str {
        self.display.text()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flurry_core::{EconomySnapshot, EntityId, FrenzyKind};
    use flurry_runtime::{LayerMode, Screen, ScreenPolicy};

    struct FakeEconomy {
        snapshot: EconomySnapshot,
        payouts: u32,
    }

    impl FakeEconomy {
        fn new(rate: f64) -> Self {
            Self {
                snapshot: EconomySnapshot::new(rate),
                payouts: 0,
            }
        }
    }

    impl Economy for FakeEconomy {
        fn snapshot(&self) -> EconomySnapshot {
            self.snapshot
        }

        fn collect_reward(&mut self) -> f64 {
            self.payouts += 1;
            self.snapshot.production_rate * 900.0
        }
    }

    fn layout() -> LayoutBox {
        LayoutBox::new(320.0, 240.0, 1.0)
    }

    fn engine() -> Engine {
        Engine::with_seed(EngineConfig::default(), layout(), 42).expect("valid config")
    }

    /// Run host refreshes at 60Hz from `from` for `seconds`, polling timers
    /// every refresh
    fn run(engine: &mut Engine, economy: &mut FakeEconomy, from: f64, seconds: f64) -> f64 {
        let steps = (seconds * 60.0) as u32;
        let mut now = from;
        for i in 1..=steps {
            now = from + i as f64 / 60.0;
            engine.poll_timers(now, economy);
            engine.frame(now);
        }
        now
    }

    fn reward_fire_at(engine: &Engine) -> f64 {
        match engine.reward_phase() {
            RewardPhase::Scheduled { fire_at } => fire_at,
            other => panic!("expected scheduled reward, got {other:?}"),
        }
    }

    #[test]
    fn start_seeds_baseline_and_arms_timers() {
        let mut engine = engine();
        let economy = FakeEconomy::new(0.0);
        assert!(!engine.frame(0.0));

        engine.start(0.0, &economy);
        assert!(engine.is_running());
        assert_eq!(engine.pool().ambient_len(), 40);
        assert_eq!(engine.intensity_state().speed_multiplier, 1.0);
        assert_eq!(engine.intensity_state().last_recalc, Some(0.0));
        assert_eq!(engine.next_deadline(), Some(1.0));
        assert!(matches!(engine.reward_phase(), RewardPhase::Scheduled { .. }));

        assert!(engine.frame(0.0));
        assert!(engine.surface().covered_pixels() > 0);
    }

    #[test]
    fn production_raises_density_gradually() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(0.0);
        engine.start(0.0, &economy);

        economy.snapshot.production_rate = 1_000_000.0;
        let now = run(&mut engine, &mut economy, 0.0, 1.05);
        assert_eq!(engine.intensity_state().target_count, 88);
        assert_eq!(engine.pool().ambient_len(), 48);

        run(&mut engine, &mut economy, now, 10.0);
        assert_eq!(engine.pool().ambient_len(), 88);
        assert_eq!(engine.rate_text(), "1.00M");
    }

    #[test]
    fn click_frenzy_boosts_on_next_recalc() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(0.0);
        engine.start(0.0, &economy);
        economy.snapshot = EconomySnapshot::new(0.0).with_frenzy(FrenzyKind::Click, 30.0);
        run(&mut engine, &mut economy, 0.0, 1.05);
        let state = engine.intensity_state();
        assert_eq!(state.target_count, 80);
        assert_eq!(state.speed_multiplier, 2.0);
    }

    #[test]
    fn throttled_host_recalculates_once_on_resume() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(1000.0);
        engine.start(0.0, &economy);
        engine.drain_events();

        // Tab in the background for a minute; nothing polled
        engine.poll_timers(60.0, &mut economy);
        let recalcs = engine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, EngineEvent::IntensityChanged { .. }))
            .count();
        assert_eq!(recalcs, 1);
        assert_eq!(engine.next_deadline(), Some(61.0));
    }

    #[test]
    fn undrained_events_stay_bounded_over_an_hour() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(1000.0);
        engine.start(0.0, &economy);

        for s in 1..=3600 {
            economy.snapshot.production_rate = f64::from(s) * 1000.0;
            engine.poll_timers(f64::from(s), &mut economy);
            assert!(engine.events.len() <= engine.events.capacity());
        }

        let events = engine.drain_events();
        let recalcs = events
            .iter()
            .filter(|e| matches!(e, EngineEvent::IntensityChanged { .. }))
            .count();
        assert_eq!(recalcs, 1);
        assert!(events.len() <= flurry_runtime::DEFAULT_EVENT_CAPACITY);
        assert!(events.contains(&EngineEvent::IntensityChanged {
            target_count: engine.intensity_state().target_count,
            speed_multiplier: engine.intensity_state().speed_multiplier,
        }));
    }

    #[test]
    fn burst_overflow_truncates() {
        let mut engine = engine();
        let economy = FakeEconomy::new(0.0);
        engine.start(0.0, &economy);
        let cap = engine.pool().burst_capacity();
        assert_eq!(engine.trigger_burst(cap + 50, 2.0), cap);
        assert_eq!(engine.pool().burst_active(), cap);
    }

    #[test]
    fn income_burst_uses_last_rate() {
        let mut engine = engine();
        let economy = FakeEconomy::new(100.0);
        engine.start(0.0, &economy);
        assert_eq!(engine.trigger_income_burst(100_000.0), 64);
    }

    #[test]
    fn reward_expiry_spawns_no_burst_and_reschedules() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(10.0);
        engine.start(0.0, &economy);

        let fire_at = reward_fire_at(&engine);
        engine.poll_timers(fire_at, &mut economy);
        assert!(matches!(engine.reward_phase(), RewardPhase::Displayed(_)));

        let expiry = fire_at + engine.config().reward.lifetime;
        engine.poll_timers(expiry, &mut economy);
        assert_eq!(engine.pool().burst_active(), 0);
        assert_eq!(economy.payouts, 0);

        let delay = reward_fire_at(&engine) - expiry;
        let reward = &engine.config().reward;
        assert!(delay >= reward.min_delay && delay <= reward.min_delay + reward.delay_range);
        assert!(engine.drain_events().contains(&EngineEvent::RewardExpired));
    }

    #[test]
    fn reward_click_pays_out_and_bursts() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(10.0);
        engine.start(0.0, &economy);
        assert!(engine.click_reward(1.0, &mut economy).is_none());

        let fire_at = reward_fire_at(&engine);
        engine.poll_timers(fire_at, &mut economy);
        let amount = engine.click_reward(fire_at + 1.0, &mut economy);
        assert_eq!(amount, Some(9000.0));
        assert_eq!(economy.payouts, 1);
        assert_eq!(engine.pool().burst_active(), engine.config().reward.burst_count);
        assert!(engine
            .drain_events()
            .contains(&EngineEvent::RewardCollected { amount: 9000.0 }));
    }

    #[test]
    fn modal_defers_reward_expiry() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(10.0);
        engine.start(0.0, &economy);
        let fire_at = reward_fire_at(&engine);
        engine.poll_timers(fire_at, &mut economy);

        engine.screens_mut().open(Screen::Prompt);
        let expiry = fire_at + engine.config().reward.lifetime;
        engine.poll_timers(expiry, &mut economy);
        assert!(matches!(engine.reward_phase(), RewardPhase::Displayed(_)));

        engine.screens_mut().close();
        engine.poll_timers(expiry + engine.config().reward.yield_retry, &mut economy);
        assert!(matches!(engine.reward_phase(), RewardPhase::Scheduled { .. }));
    }

    #[test]
    fn covered_pause_still_defers_expiry() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(10.0);
        engine.start(0.0, &economy);
        let fire_at = reward_fire_at(&engine);
        engine.poll_timers(fire_at, &mut economy);
        engine.drain_events();

        engine.screens_mut().open(Screen::Paused);
        engine.screens_mut().open(Screen::Custom(ScreenPolicy::default()));
        let expiry = fire_at + engine.config().reward.lifetime;
        engine.poll_timers(expiry, &mut economy);
        let retry_at = expiry + engine.config().reward.yield_retry;
        let events = engine.drain_events();
        assert!(events.contains(&EngineEvent::RewardDeferred { retry_at }));
        assert!(!events.contains(&EngineEvent::RewardExpired));

        engine.screens_mut().close();
        engine.screens_mut().close();
        engine.poll_timers(retry_at, &mut economy);
        assert!(engine.drain_events().contains(&EngineEvent::RewardExpired));
    }

    #[test]
    fn hidden_layers_neither_move_nor_draw() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(0.0);
        engine.start(0.0, &economy);
        engine.refresh_overlays(&[VisibleEntity::new(
            EntityId(1),
            "pulse",
            LayoutBox::new(48.0, 48.0, 1.0),
        )]);
        engine.screens_mut().open(Screen::Custom(ScreenPolicy {
            particles: LayerMode::Hidden,
            overlays: LayerMode::Hidden,
            claims_screen: false,
        }));

        let before: Vec<f32> = engine.pool().ambient().iter().map(|p| p.y).collect();
        run(&mut engine, &mut economy, 0.0, 0.5);
        let after: Vec<f32> = engine.pool().ambient().iter().map(|p| p.y).collect();
        assert_eq!(before, after);
        assert_eq!(engine.surface().covered_pixels(), 0);
        assert!(!engine.screens().holds_rewards());
    }

    #[test]
    fn paused_screen_freezes_particles() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(0.0);
        engine.start(0.0, &economy);
        engine.frame(0.0);
        engine.screens_mut().open(Screen::Paused);

        let before: Vec<f32> = engine.pool().ambient().iter().map(|p| p.y).collect();
        run(&mut engine, &mut economy, 0.0, 0.9);
        let after: Vec<f32> = engine.pool().ambient().iter().map(|p| p.y).collect();
        assert_eq!(before, after);
        // Still drawn while paused
        assert!(engine.surface().covered_pixels() > 0);
    }

    #[test]
    fn overlays_follow_refresh_and_draw_each_frame() {
        let mut engine = engine();
        let economy = FakeEconomy::new(0.0);
        engine.start(0.0, &economy);
        let stats = engine.refresh_overlays(&[
            VisibleEntity::new(EntityId(1), "orbit", LayoutBox::new(48.0, 48.0, 1.0)),
            VisibleEntity::new(EntityId(2), "pulse", LayoutBox::new(48.0, 48.0, 1.0)),
        ]);
        assert_eq!(stats.created, 2);
        engine.frame(0.0);
        let drawn = engine
            .overlays()
            .surface(EntityId(1))
            .map(Surface::covered_pixels);
        assert!(drawn.unwrap_or(0) > 0);
    }

    #[test]
    fn density_change_drops_sprites() {
        let mut engine = engine();
        let economy = FakeEconomy::new(0.0);
        engine.start(0.0, &economy);
        engine.frame(0.0);
        assert_eq!(engine.pool().sprites().len(), 1);

        engine.resize(LayoutBox::new(320.0, 240.0, 1.0));
        assert_eq!(engine.pool().sprites().len(), 1);

        engine.resize(LayoutBox::new(320.0, 240.0, 2.0));
        assert!(engine.pool().sprites().is_empty());
        assert_eq!(engine.surface().width(), 640);
        engine.frame(1.0);
        assert_eq!(engine.pool().sprites().len(), 1);
    }

    #[test]
    fn teardown_silences_everything() {
        let mut engine = engine();
        let mut economy = FakeEconomy::new(10.0);
        engine.start(0.0, &economy);
        engine.refresh_overlays(&[VisibleEntity::new(
            EntityId(1),
            "steam",
            LayoutBox::new(32.0, 32.0, 1.0),
        )]);
        engine.teardown();

        assert!(engine.next_deadline().is_none());
        assert!(!engine.scheduler().is_registered());
        assert!(!engine.surface().is_live());
        assert!(engine.overlays().is_empty());
        assert!(!engine.frame(100.0));
        engine.poll_timers(10_000.0, &mut economy);
        assert_eq!(engine.trigger_burst(10, 1.0), 0);
        assert!(engine.click_reward(10_000.0, &mut economy).is_none());
        engine.teardown();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.intensity.base_count = 1000;
        assert!(Engine::new(config, layout()).is_err());

        let mut config = EngineConfig::default();
        config.intensity.count_scale = f32::NAN;
        assert!(Engine::new(config, layout()).is_err());

        let mut config = EngineConfig::default();
        config.particles.min_speed = f32::NAN;
        assert!(Engine::new(config, layout()).is_err());
    }
}
