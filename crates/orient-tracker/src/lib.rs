pub mod mapping;
pub mod source;
pub mod tracker;
pub mod types;

use orient_config::TrackerConfig;
use source::{request_orientation_access, AccessError, OrientationSource};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracker::{OrientationTracker, SensorState};
use types::{Orientation, SensorEvent};

/// Client for a host's device-orientation sensor.
///
/// Acquires access, subscribes to the host's orientation and screen-rotation
/// events, and turns the latest readings into a camera orientation once per
/// rendered frame. Every event the host delivered before a tick is applied
/// before that tick computes.
pub struct TrackerClient {
    events: mpsc::UnboundedReceiver<SensorEvent>,
    tracker: OrientationTracker,
    // Owned so the host listeners live exactly as long as the client.
    _source: Option<Box<dyn Send>>,
    event_count: u64,
    stream_open: bool,
}

impl TrackerClient {
    /// Request access from `source` and start listening.
    ///
    /// Fails with [`AccessError`] when the host has no orientation sensor or the
    /// user refuses; nothing is retried.
    pub async fn start<S: OrientationSource>(
        mut source: S,
        config: TrackerConfig,
    ) -> Result<Self, AccessError> {
        let access = request_orientation_access(&mut source).await?;
        tracing::info!(?access, ?config, "Orientation tracking starting");

        let events = source.subscribe();
        Ok(Self {
            events,
            tracker: OrientationTracker::new(config),
            _source: Some(Box::new(source)),
            event_count: 0,
            stream_open: true,
        })
    }

    /// Client with no sensor behind it. The orientation stays at its default.
    pub fn mock(config: TrackerConfig) -> Self {
        let (_, events) = mpsc::unbounded_channel();
        Self {
            events,
            tracker: OrientationTracker::new(config),
            _source: None,
            event_count: 0,
            stream_open: false,
        }
    }

    /// Render tick: apply every pending host event, then advance the orientation.
    pub fn tick(&mut self) -> Orientation {
        self.drain();
        self.tracker.update()
    }

    /// Latest orientation (non-blocking).
    pub fn orientation(&self) -> Orientation {
        self.tracker.orientation()
    }

    /// Sensor readings as of the last tick or [`TrackerClient::changed`].
    pub fn sensors(&self) -> SensorState {
        self.tracker.sensors()
    }

    /// Wait for the next host event and apply it along with anything queued
    /// behind it. Returns `false` once the event stream has ended.
    pub async fn changed(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.apply(event);
                self.drain();
                true
            }
            None => {
                self.close();
                false
            }
        }
    }

    /// Snap to the target on the next tick instead of smoothing toward it.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    /// Detach from the host's sensor events.
    pub fn dispose(self) {
        tracing::info!(events = self.event_count, "Orientation tracking stopped");
    }

    fn drain(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.close();
                    break;
                }
            }
        }
    }

    fn apply(&mut self, event: SensorEvent) {
        if let SensorEvent::Orientation(sample) = &event {
            tracing::trace!(%sample, "Orientation sample");
        }
        self.tracker.ingest(event);
        self.event_count += 1;
        if self.event_count % 1000 == 0 {
            tracing::debug!(event_count = self.event_count, "Orientation events processed");
        }
    }

    fn close(&mut self) {
        if self.stream_open {
            self.stream_open = false;
            tracing::warn!(event_count = self.event_count, "Orientation event stream closed");
        }
    }
}
