use crate::types::{OrientationSample, ScreenRotation, SensorEvent};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Why orientation tracking could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Device orientation is not supported by this host")]
    Unsupported,
    #[error("Permission to read device orientation was denied")]
    PermissionDenied,
}

/// Answer to a host permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// The host delivers orientation events without asking the user.
    NotRequired,
    Granted,
    Denied,
}

/// How access to orientation events was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGranted {
    Implicit,
    UserGranted,
}

/// A host environment that can deliver orientation and screen-rotation events.
pub trait OrientationSource: Send + 'static {
    /// Whether the host has any orientation-sensing capability.
    fn is_supported(&self) -> bool;

    /// Ask for consent to read orientation. Hosts without a consent step
    /// answer [`Permission::NotRequired`].
    fn request_permission(&mut self) -> impl Future<Output = Permission> + Send;

    /// Attach listeners. Events stop when the source is dropped.
    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SensorEvent>;
}

/// Acquire access to orientation events. Called once before subscribing;
/// failures are returned as-is and never retried.
pub async fn request_orientation_access<S: OrientationSource>(
    source: &mut S,
) -> Result<AccessGranted, AccessError> {
    if !source.is_supported() {
        warn!("Device orientation unsupported");
        return Err(AccessError::Unsupported);
    }

    match source.request_permission().await {
        Permission::NotRequired => Ok(AccessGranted::Implicit),
        Permission::Granted => {
            info!("Device orientation permission granted");
            Ok(AccessGranted::UserGranted)
        }
        Permission::Denied => {
            warn!("Device orientation permission denied");
            Err(AccessError::PermissionDenied)
        }
    }
}

/// Handle the host's sensor callbacks push events through.
#[derive(Debug, Clone)]
pub struct SensorEmitter {
    tx: mpsc::UnboundedSender<SensorEvent>,
}

impl SensorEmitter {
    /// Returns `false` once the tracker has detached.
    pub fn emit(&self, event: SensorEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn emit_sample(&self, sample: OrientationSample) -> bool {
        self.emit(SensorEvent::Orientation(sample))
    }

    pub fn emit_screen_rotation(&self, degrees: f32) -> bool {
        self.emit(SensorEvent::ScreenRotation(ScreenRotation(degrees)))
    }

    pub fn is_attached(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Source fed by host callbacks through a [`SensorEmitter`].
pub struct ChannelSource {
    supported: bool,
    permission: Permission,
    rx: Option<mpsc::UnboundedReceiver<SensorEvent>>,
}

impl ChannelSource {
    pub fn new() -> (Self, SensorEmitter) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            supported: true,
            permission: Permission::NotRequired,
            rx: Some(rx),
        };
        (source, SensorEmitter { tx })
    }

    /// Host that has no orientation capability.
    pub fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }

    /// Answer the host will give to the permission request.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }
}

impl OrientationSource for ChannelSource {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn request_permission(&mut self) -> Permission {
        self.permission
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SensorEvent> {
        self.rx.take().unwrap_or_else(|| {
            warn!("Channel source already subscribed");
            // Already-closed receiver: the sender is dropped immediately.
            mpsc::unbounded_channel().1
        })
    }
}

/// Replays a recorded event list at a fixed interval.
pub struct ReplaySource {
    events: Vec<SensorEvent>,
    interval: Duration,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ReplaySource {
    pub fn new(events: Vec<SensorEvent>, interval: Duration) -> Self {
        Self {
            events,
            interval,
            task: None,
        }
    }

    /// Synthetic sweep: the device starts flat, tilts upright while turning
    /// through a full circle, then switches to landscape halfway through.
    /// The first `warmup` samples report no angles.
    pub fn sweep(samples: usize, warmup: usize, interval: Duration) -> Self {
        let mut events = Vec::with_capacity(samples + 1);
        for i in 0..samples {
            if i < warmup {
                events.push(SensorEvent::Orientation(OrientationSample::default()));
                continue;
            }
            let t = i as f32 / samples.max(1) as f32;
            let sample = OrientationSample::new(360.0 * t, 90.0 * t, 10.0 * (t * 12.0).sin());
            events.push(SensorEvent::Orientation(sample.absolute()));
            if i == samples / 2 {
                events.push(SensorEvent::ScreenRotation(ScreenRotation::LANDSCAPE));
            }
        }
        Self::new(events, interval)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl OrientationSource for ReplaySource {
    fn is_supported(&self) -> bool {
        true
    }

    async fn request_permission(&mut self) -> Permission {
        Permission::NotRequired
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SensorEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let events = std::mem::take(&mut self.events);
        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            for event in events {
                if tx.send(event).is_err() {
                    return;
                }
                if !interval.is_zero() {
                    tokio::time::sleep(interval).await;
                }
            }
            tracing::debug!("Replay finished");
        }));
        rx
    }
}

impl Drop for ReplaySource {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
