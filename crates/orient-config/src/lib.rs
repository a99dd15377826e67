mod types;

pub use types::*;

use anyhow::{ensure, Result};
use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;
use tracing::info;

/// Highest render tick rate accepted. Keeps the frame period well above zero.
pub const MAX_FRAME_RATE_HZ: f32 = 1000.0;

/// Directory holding the tracker tuning file, created on first use.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("orient-ar");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// `config.toml` inside [`config_dir`]: frame rate, smoothing, gimbal guard,
/// absolute-sample policy and replay settings.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Read and validate the tracker tuning file. A missing file yields the
/// defaults; an invalid one is an error so the caller can decide to fall back.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        info!("No config found, using defaults");
        return Ok(AppConfig::default());
    }
    let config = parse_config(&std::fs::read_to_string(&path)?)?;
    info!(?path, smoothing = config.tracker.smoothing, "Loaded config");
    Ok(config)
}

/// Parse and validate a TOML config document.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents)?;
    validate(&config)?;
    Ok(config)
}

/// Write the current tuning back so edits made by hand survive a restart.
pub fn save_config(config: &AppConfig) -> Result<()> {
    validate(config)?;
    let path = config_path()?;
    std::fs::write(&path, toml::to_string_pretty(config)?)?;
    info!(?path, "Saved config");
    Ok(())
}

/// Reject values the tracker cannot work with.
pub fn validate(config: &AppConfig) -> Result<()> {
    ensure!(
        config.frame_rate_hz > 0.0 && config.frame_rate_hz <= MAX_FRAME_RATE_HZ,
        "frame_rate_hz must be in (0, {MAX_FRAME_RATE_HZ}], got {}",
        config.frame_rate_hz
    );
    let factor = config.tracker.smoothing;
    ensure!(
        factor > 0.0 && factor <= 1.0,
        "tracker.smoothing must be in (0, 1], got {factor}"
    );
    if let Some(epsilon) = config.tracker.gimbal_epsilon {
        ensure!(
            (0.0..FRAC_PI_2).contains(&epsilon),
            "tracker.gimbal_epsilon must be in [0, pi/2), got {epsilon}"
        );
    }
    Ok(())
}
