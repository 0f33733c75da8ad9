//! Fast ACTIVE request of a split peripheral
//!
//! The central owns the tier state machine. A peripheral with local activity asks for the
//! fixed ACTIVE-like profile itself, so its first keystrokes don't wait for the central.

use crate::applier::{ApplyReport, apply_subrate};
use crate::config::SubrateConfig;
use crate::event::{ActivitySource, ActivityState};
use crate::link::{ConnRole, LinkStack};
use crate::profile::PERIPHERAL_ACTIVE_PARAMS;

pub struct PeripheralFastActive<'a, L: LinkStack> {
    link: &'a L,
    // Whether a request was issued during the current active period
    requested: bool,
}

impl<'a, L: LinkStack> PeripheralFastActive<'a, L> {
    pub fn new(link: &'a L) -> Self {
        Self { link, requested: false }
    }

    pub fn requested(&self) -> bool {
        self.requested
    }

    /// Returns the fan-out result when a request was issued
    pub fn on_activity(&mut self, state: ActivityState) -> Option<ApplyReport> {
        match state {
            ActivityState::Active if !self.requested => {
                info!("Peripheral requesting ACTIVE subrate");
                let report = apply_subrate(self.link, &PERIPHERAL_ACTIVE_PARAMS, ConnRole::Peripheral);
                self.requested = true;
                Some(report)
            }
            ActivityState::Active => None,
            ActivityState::Idle | ActivityState::Sleep => {
                self.requested = false;
                None
            }
        }
    }

    pub async fn run<S: ActivitySource>(&mut self, source: &mut S) {
        loop {
            let state = source.next_state().await;
            self.on_activity(state);
        }
    }
}

/// Run the fast ACTIVE requester on a split peripheral.
///
/// Returns immediately when `peripheral_fast_active` is disabled.
pub async fn run_subrate_peripheral<L: LinkStack, S: ActivitySource>(link: &L, config: SubrateConfig, source: &mut S) {
    if !config.peripheral_fast_active {
        debug!("Peripheral fast ACTIVE request disabled");
        return;
    }
    PeripheralFastActive::new(link).run(source).await;
}
