mod camera;

use anyhow::Result;
use camera::Camera;
use orient_config::AppConfig;
use orient_tracker::source::ReplaySource;
use orient_tracker::TrackerClient;
use std::time::Duration;
use tracing::{info, warn};

/// Headless host: replays a recorded sensor stream into the tracker and drives
/// the scene camera from a fixed-rate render tick.
async fn run(config: &AppConfig) -> Result<()> {
    let interval = Duration::from_millis(config.replay.sample_interval_ms);
    let source = ReplaySource::sweep(config.replay.frames as usize, 5, interval);
    info!(events = source.len(), "Replaying orientation stream");

    // Fall back to a frozen orientation if access is refused.
    let mut client = match TrackerClient::start(source, config.tracker).await {
        Ok(client) => client,
        Err(e) => {
            warn!(%e, "Orientation unavailable, camera stays fixed");
            TrackerClient::mock(config.tracker)
        }
    };

    let mut camera = Camera::new();
    camera.resize(1080, 1920);

    let mut ticker = tokio::time::interval(config.frame_period());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    for frame in 0..config.replay.frames {
        ticker.tick().await;

        let screen_before = client.sensors().screen_rotation;
        let mut orientation = client.tick();
        let screen = client.sensors().screen_rotation;
        if screen != screen_before {
            // A portrait/landscape switch is a jump, not sensor noise.
            info!(from = screen_before.degrees(), to = screen.degrees(), "Screen rotated");
            client.reset();
            orientation = client.tick();
        }
        camera.set_orientation(orientation);

        if frame % 60 == 0 {
            let sensors = client.sensors();
            info!(
                frame,
                sample = %sensors.sample,
                screen = sensors.screen_rotation.degrees(),
                heading = camera.heading_degrees(),
                "Camera updated"
            );
        }
    }

    let view_projection = camera.projection_matrix() * camera.view_matrix();
    tracing::debug!(?view_projection, "Final view-projection");

    client.dispose();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orient_ar=info,orient_tracker=info".into()),
        )
        .init();

    info!("Orientation AR view starting");

    // Load config.
    let config = orient_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(?config.tracker, frame_rate = config.frame_rate_hz, "Config loaded");

    run(&config).await?;

    // Save config on exit.
    if let Err(e) = orient_config::save_config(&config) {
        warn!(?e, "Failed to save config");
    }

    Ok(())
}
