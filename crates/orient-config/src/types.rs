use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Render tick rate in frames per second.
    pub frame_rate_hz: f32,
    /// Orientation tracking options.
    pub tracker: TrackerConfig,
    /// Sensor replay used when no live host is attached.
    pub replay: ReplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60.0,
            tracker: TrackerConfig::default(),
            replay: ReplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Time between render ticks. Only meaningful for a validated config.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate_hz))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Slerp factor toward the newest target on every frame, in (0, 1].
    /// Higher = more responsive, less smooth. 1.0 assigns the target directly.
    pub smoothing: f32,
    /// When `|beta|` is within this many radians of 90°, gamma is ignored.
    /// `None` disables the guard.
    pub gimbal_epsilon: Option<f32>,
    /// Which samples are accepted based on their `absolute` flag.
    pub absolute_policy: AbsolutePolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.99,
            gimbal_epsilon: None,
            absolute_policy: AbsolutePolicy::AcceptAll,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsolutePolicy {
    /// Use every sample regardless of its reference frame.
    #[default]
    AcceptAll,
    /// Drop samples the host flags as relative (`absolute == false`).
    RequireAbsolute,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Delay between replayed sensor events in milliseconds.
    pub sample_interval_ms: u64,
    /// Number of render frames to run before exiting.
    pub frames: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 16,
            frames: 600,
        }
    }
}
