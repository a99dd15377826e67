use crate::mapping::{smooth, target_orientation};
use crate::types::{Orientation, OrientationSample, ScreenRotation, SensorEvent};
use orient_config::{AbsolutePolicy, TrackerConfig};

/// Latest sensor readings. Always replaced as a whole so a reader never sees
/// fields from two different samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorState {
    pub sample: OrientationSample,
    pub screen_rotation: ScreenRotation,
}

impl SensorState {
    /// Apply one sensor event. Returns `false` when the event was rejected by
    /// `policy` and the state is unchanged.
    pub fn apply(&mut self, event: SensorEvent, policy: AbsolutePolicy) -> bool {
        match event {
            SensorEvent::Orientation(sample) => {
                if policy == AbsolutePolicy::RequireAbsolute && !sample.absolute {
                    tracing::trace!(%sample, "Dropping relative orientation sample");
                    return false;
                }
                self.sample = sample;
            }
            SensorEvent::ScreenRotation(rotation) => {
                self.screen_rotation = rotation;
            }
        }
        true
    }
}

/// Owned orientation-tracking context.
///
/// Sensor callbacks write the sensor state through the `ingest_*` methods;
/// the render tick calls [`OrientationTracker::update`] once per frame and is
/// the only writer of the output orientation.
#[derive(Debug, Clone)]
pub struct OrientationTracker {
    config: TrackerConfig,
    sensors: SensorState,
    /// Last orientation handed to the render loop.
    last: Option<Orientation>,
}

impl OrientationTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            sensors: SensorState::default(),
            last: None,
        }
    }

    pub fn sensors(&self) -> SensorState {
        self.sensors
    }

    /// Store the most recent raw angles.
    pub fn ingest_sample(&mut self, sample: OrientationSample) {
        self.ingest(SensorEvent::Orientation(sample));
    }

    /// Store the current screen rotation in degrees.
    pub fn ingest_screen_rotation(&mut self, degrees: f32) {
        self.ingest(SensorEvent::ScreenRotation(ScreenRotation(degrees)));
    }

    pub fn ingest(&mut self, event: SensorEvent) {
        self.sensors.apply(event, self.config.absolute_policy);
    }

    /// Orientation for the stored readings, smoothed against `previous` when given.
    pub fn compute_orientation(&self, previous: Option<&Orientation>) -> Orientation {
        let target = target_orientation(
            &self.sensors.sample,
            self.sensors.screen_rotation,
            self.config.gimbal_epsilon,
        );
        match previous {
            Some(previous) => smooth(previous, &target, self.config.smoothing),
            None => target,
        }
    }

    /// Render tick: compute against the previous frame's output and keep the result.
    pub fn update(&mut self) -> Orientation {
        let next = self.compute_orientation(self.last.as_ref());
        self.last = Some(next);
        next
    }

    /// Current output. Before the first tick this is the unsmoothed target.
    pub fn orientation(&self) -> Orientation {
        self.last.unwrap_or_else(|| self.compute_orientation(None))
    }

    /// Forget the previous output so the next tick snaps to the target.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for OrientationTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
