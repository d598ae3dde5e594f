//! Default config dump and config file checking

use anyhow::{Context, Result};
use flurry::EngineConfig;

pub fn run(check: Option<String>) -> Result<()> {
    match check {
        Some(path) => {
            let config = EngineConfig::load_from_file(&path)
                .with_context(|| format!("Invalid config: {path}"))?;
            println!(
                "{path}: ok (ambient {}..{}, {} burst slots, {} fps)",
                config.intensity.base_count,
                config.intensity.max_count,
                config.particles.burst_capacity,
                config.scheduler.max_fps
            );
        }
        None => {
            let text = EngineConfig::default()
                .to_toml_string()
                .context("Failed to serialize default config")?;
            print!("{text}");
        }
    }
    Ok(())
}
