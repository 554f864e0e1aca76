//! Progress reporting for a single call.

use std::sync::Arc;

use tokio::sync::watch;

/// Publishes the progress of one call as a fraction in `[0, 1]`.
///
/// Values only ever increase: a retried dispatch that restarts at zero
/// does not move the published value backwards.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    sender: Option<Arc<watch::Sender<f32>>>,
}

impl ProgressReporter {
    /// Creates a reporter and the receiver the caller observes.
    #[must_use]
    pub fn channel() -> (Self, watch::Receiver<f32>) {
        let (sender, receiver) = watch::channel(0.0);
        (
            Self {
                sender: Some(Arc::new(sender)),
            },
            receiver,
        )
    }

    /// A reporter that discards everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { sender: None }
    }

    /// Reports `fraction`, clamped to `[0, 1]`. NaN is ignored.
    pub fn report(&self, fraction: f32) {
        let Some(sender) = &self.sender else {
            return;
        };
        if fraction.is_nan() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        sender.send_if_modified(|current| {
            if fraction > *current {
                *current = fraction;
                true
            } else {
                false
            }
        });
    }

    /// Marks the call as complete.
    pub fn complete(&self) {
        self.report(1.0);
    }

    /// Last published value (0 for a disabled reporter).
    #[must_use]
    pub fn current(&self) -> f32 {
        self.sender.as_ref().map_or(0.0, |sender| *sender.borrow())
    }
}
