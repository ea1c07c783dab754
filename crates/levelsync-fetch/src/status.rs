//! Status and diagnostic reporting.
//!
//! Two independent channels: transient user-facing status text, and a
//! debug channel that never reaches the end user.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

/// Default emphasis, in seconds, for user-visible errors.
pub const DEFAULT_FLASH: f32 = 1.0;

pub trait StatusSink: Send + Sync {
    /// Transient status line. `alert` asks the host to draw attention to it.
    fn show(&self, message: &str, alert: bool);

    /// User-visible error, emphasised for `flash` seconds.
    fn error(&self, message: &str, flash: f32);

    fn debug(&self, message: &str);

    /// Download progress, `fraction` in `0.0..=1.0`.
    fn progress(&self, label: &str, fraction: f32) {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round();
        self.show(&format!("DOWNLOADING {label} ... {percent}%"), true);
    }
}

impl<S: StatusSink + ?Sized> StatusSink for std::sync::Arc<S> {
    fn show(&self, message: &str, alert: bool) { (**self).show(message, alert) }

    fn error(&self, message: &str, flash: f32) { (**self).error(message, flash) }

    fn debug(&self, message: &str) { (**self).debug(message) }

    fn progress(&self, label: &str, fraction: f32) { (**self).progress(label, fraction) }
}

/// Routes everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn show(&self, message: &str, alert: bool) { info!(alert, "{message}") }

    fn error(&self, message: &str, flash: f32) { error!(flash, "{message}") }

    fn debug(&self, message: &str) { debug!("{message}") }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Show { message: String, alert: bool },
    Error { message: String, flash: f32 },
    Debug(String),
    Progress { label: String, fraction: f32 },
}

/// Forwards events to a host loop that renders them while an acquisition
/// is in flight. Events sent after the receiver is gone are dropped.
///
/// Only debug messages are also logged; rendering errors is up to the host.
#[derive(Debug, Clone)]
pub struct ChannelStatus {
    tx: UnboundedSender<StatusEvent>,
}

impl ChannelStatus {
    pub fn new(tx: UnboundedSender<StatusEvent>) -> Self { Self { tx } }

    fn send(&self, event: StatusEvent) {
        if self.tx.send(event).is_err() {
            debug!("status receiver dropped");
        }
    }
}

impl StatusSink for ChannelStatus {
    fn show(&self, message: &str, alert: bool) {
        self.send(StatusEvent::Show {
            message: message.to_string(),
            alert,
        })
    }

    fn error(&self, message: &str, flash: f32) {
        self.send(StatusEvent::Error {
            message: message.to_string(),
            flash,
        })
    }

    fn debug(&self, message: &str) {
        debug!("{message}");
        self.send(StatusEvent::Debug(message.to_string()))
    }

    fn progress(&self, label: &str, fraction: f32) {
        self.send(StatusEvent::Progress {
            label:    label.to_string(),
            fraction: fraction.clamp(0.0, 1.0),
        })
    }
}
