//! Headless simulation command

use anyhow::{bail, Context, Result};
use flurry::{Economy, Engine, EngineConfig, RewardPhase};
use flurry_core::{EconomySnapshot, LayoutBox};
use flurry_runtime::EngineEvent;

pub struct SimulateArgs {
    pub seconds: f64,
    pub rate: f64,
    pub growth: f64,
    pub refresh: f64,
    pub width: f32,
    pub height: f32,
    pub density: f32,
    pub seed: u32,
    pub burst_every: Option<f64>,
    pub click_rewards: bool,
    pub config: Option<String>,
    pub output: Option<String>,
}

/// Economy whose production grows geometrically with simulated time
struct SyntheticEconomy {
    base_rate: f64,
    growth: f64,
    now: f64,
    paid: f64,
}

impl SyntheticEconomy {
    fn rate(&self) -> f64 {
        self.base_rate * self.growth.powf(self.now)
    }
}

impl Economy for SyntheticEconomy {
    fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot::new(self.rate())
    }

    fn collect_reward(&mut self) -> f64 {
        let amount = self.rate() * 900.0;
        self.paid += amount;
        amount
    }
}

#[derive(Debug, Default)]
pub struct SimulationReport {
    pub executed: u64,
    pub throttled: u64,
    pub ambient: usize,
    pub target_count: usize,
    pub speed_multiplier: f32,
    pub peak_ambient: usize,
    pub peak_burst: usize,
    pub burst_active: usize,
    pub burst_capacity: usize,
    pub bursts_spawned: usize,
    pub rewards_shown: u32,
    pub rewards_collected: u32,
    pub rewards_expired: u32,
    pub paid: f64,
    pub rate_text: String,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let report = simulate(&args)?;

    println!("Simulated {:.1}s at {} Hz", args.seconds, args.refresh);
    println!(
        "Frames: {} executed, {} throttled",
        report.executed, report.throttled
    );
    println!("Production: {}/s", report.rate_text);
    println!(
        "Ambient: {} particles (target {}, peak {}), speed x{:.2}",
        report.ambient, report.target_count, report.peak_ambient, report.speed_multiplier
    );
    println!(
        "Burst: {} active, peak {} of {}, {} spawned by income",
        report.burst_active, report.peak_burst, report.burst_capacity, report.bursts_spawned
    );
    println!(
        "Rewards: {} shown, {} collected, {} expired ({:.0} paid)",
        report.rewards_shown, report.rewards_collected, report.rewards_expired, report.paid
    );
    if let Some(path) = &args.output {
        println!("Saved final frame to {path}");
    }
    Ok(())
}

/// Drive an engine through `args.seconds` of host refreshes and collect
/// pool statistics, writing the last frame when `args.output` is set
pub fn simulate(args: &SimulateArgs) -> Result<SimulationReport> {
    let refresh_ok = args.refresh.is_finite() && args.refresh > 0.0;
    let seconds_ok = args.seconds.is_finite() && args.seconds >= 0.0;
    if !refresh_ok || !seconds_ok {
        bail!("--refresh must be positive and --seconds non-negative");
    }
    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config: {path}"))?,
        None => EngineConfig::default(),
    };
    let layout = LayoutBox::new(args.width, args.height, args.density);
    if layout.is_empty() {
        bail!("Surface size must be at least 1x1 with a positive density");
    }

    let mut engine =
        Engine::with_seed(config, layout, args.seed).context("Failed to create engine")?;
    let mut economy = SyntheticEconomy {
        base_rate: args.rate,
        growth: args.growth,
        now: 0.0,
        paid: 0.0,
    };
    let mut report = SimulationReport::default();

    engine.start(0.0, &economy);

    let steps = (args.seconds * args.refresh).round() as u64;
    let mut next_burst = args.burst_every;
    for step in 0..=steps {
        let now = step as f64 / args.refresh;
        economy.now = now;

        engine.poll_timers(now, &mut economy);
        if args.click_rewards && matches!(engine.reward_phase(), RewardPhase::Displayed(_)) {
            engine.click_reward(now, &mut economy);
        }
        if let (Some(at), Some(every)) = (next_burst, args.burst_every) {
            if now >= at && every > 0.0 {
                report.bursts_spawned += engine.trigger_income_burst(economy.rate() * every);
                next_burst = Some(at + every);
            }
        }
        if engine.frame(now) {
            report.executed += 1;
        }

        report.peak_ambient = report.peak_ambient.max(engine.pool().ambient_len());
        report.peak_burst = report.peak_burst.max(engine.pool().burst_active());
        for event in engine.drain_events() {
            match event {
                EngineEvent::RewardShown { .. } => report.rewards_shown += 1,
                EngineEvent::RewardCollected { .. } => report.rewards_collected += 1,
                EngineEvent::RewardExpired => report.rewards_expired += 1,
                _ => {}
            }
        }
    }

    let intensity = engine.intensity_state();
    report.throttled = engine.scheduler().frames_skipped();
    report.ambient = engine.pool().ambient_len();
    report.target_count = intensity.target_count;
    report.speed_multiplier = intensity.speed_multiplier;
    report.burst_active = engine.pool().burst_active();
    report.burst_capacity = engine.pool().burst_capacity();
    report.paid = economy.paid;
    report.rate_text = engine.rate_text().to_string();

    if let Some(path) = &args.output {
        let surface = engine.surface();
        let img = image::RgbaImage::from_raw(
            surface.width(),
            surface.height(),
            surface.as_bytes().to_vec(),
        )
        .context("Surface size does not match its pixel buffer")?;
        img.save(path)
            .with_context(|| format!("Failed to write {path}"))?;
    }

    engine.teardown();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SimulateArgs {
        SimulateArgs {
            seconds: 5.0,
            rate: 1000.0,
            growth: 1.0,
            refresh: 60.0,
            width: 160.0,
            height: 120.0,
            density: 1.0,
            seed: 7,
            burst_every: None,
            click_rewards: false,
            config: None,
            output: None,
        }
    }

    #[test]
    fn throttles_to_the_frame_budget() {
        let report = simulate(&args()).expect("simulates");
        // 301 refreshes at 60 Hz against a 30 fps budget
        assert!((148..=152).contains(&report.executed), "{report:?}");
        assert_eq!(report.executed + report.throttled, 301);
        assert_eq!(report.target_count, 64);
        assert_eq!(report.ambient, 64);
        assert_eq!(report.rate_text, "1.00K");
    }

    #[test]
    fn income_bursts_fire_on_schedule() {
        let report = simulate(&SimulateArgs {
            burst_every: Some(1.0),
            ..args()
        })
        .expect("simulates");
        assert!(report.bursts_spawned > 0);
        assert!(report.peak_burst > 0);
        assert!(report.peak_burst <= report.burst_capacity);
    }

    #[test]
    fn rejects_bad_arguments() {
        for bad in [
            SimulateArgs { refresh: 0.0, ..args() },
            SimulateArgs { refresh: f64::NAN, ..args() },
            SimulateArgs { seconds: -1.0, ..args() },
            SimulateArgs { width: 0.0, ..args() },
            SimulateArgs { density: 0.0, ..args() },
        ] {
            assert!(simulate(&bad).is_err());
        }
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = simulate(&SimulateArgs {
            config: Some("/definitely/not/here/flurry.toml".into()),
            ..args()
        })
        .unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn config_file_is_applied() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("flurry.toml");
        std::fs::write(&path, "[intensity]\nbase_count = 10\ncount_scale = 0.0\n")
            .expect("write config");

        let report = simulate(&SimulateArgs {
            config: Some(path.display().to_string()),
            ..args()
        })
        .expect("simulates");
        assert_eq!(report.target_count, 10);
        assert_eq!(report.ambient, 10);
    }

    #[test]
    fn writes_final_frame_as_png() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("frame.png");
        simulate(&SimulateArgs {
            density: 2.0,
            output: Some(path.display().to_string()),
            ..args()
        })
        .expect("simulates");

        let img = image::open(&path).expect("png decodes").to_rgba8();
        assert_eq!(img.dimensions(), (320, 240));
        assert!(img.pixels().any(|p| p.0[3] > 0));
    }
}
