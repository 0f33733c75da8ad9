use embassy_time::{Duration, Instant, Timer};

/// One-shot timer with a single slot.
///
/// Scheduling replaces any pending deadline, so at most one expiry is ever pending.
#[derive(Debug, Default)]
pub struct DormantTimer {
    deadline: Option<Instant>,
}

impl DormantTimer {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer to fire `delay` from now, replacing a pending expiry
    pub fn schedule(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    /// Disarm the timer, a cancelled expiry never fires
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve once the pending deadline passes, then disarm.
    ///
    /// Pends forever while disarmed. Dropping the future keeps the deadline.
    pub async fn expired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                // `Timer` always pends on its first poll, even for a past deadline
                if Instant::now() < deadline {
                    Timer::at(deadline).await;
                }
                self.deadline = None;
            }
            None => core::future::pending::<()>().await,
        }
    }
}
