//! Tier state machine of the split central
//!
//! Activity events and the dormant timer are processed on one task, so the current tier
//! and the timer are mutated without locks.

use embassy_futures::select::{Either, select};

use crate::applier::{apply_host_params, apply_subrate};
use crate::config::SubrateConfig;
use crate::error::SubrateError;
use crate::event::{ActivitySource, ActivityState};
use crate::link::{ConnRole, LinkStack};
use crate::profile::{HostProfile, Tier};
use crate::timer::DormantTimer;

/// Owner of the current tier
pub struct TierController<'a, L: LinkStack> {
    link: &'a L,
    config: SubrateConfig,
    current_tier: Tier,
    dormant_timer: DormantTimer,
}

impl<'a, L: LinkStack> TierController<'a, L> {
    /// Create a controller in the IDLE tier, rejecting an invalid config
    pub fn new(link: &'a L, config: SubrateConfig) -> Result<Self, SubrateError> {
        config.validate()?;
        Ok(Self {
            link,
            config,
            current_tier: Tier::Idle,
            dormant_timer: DormantTimer::new(),
        })
    }

    /// Make the IDLE profile the default for new connections
    pub fn init(&mut self) -> Result<(), SubrateError> {
        let profiles = &self.config.profiles;
        if let Err(e) = self.link.set_default_subrate(&profiles.idle) {
            error!("Failed to set subrating defaults: {:?}", e);
            return Err(SubrateError::DefaultProfile(e));
        }

        info!(
            "Subrating: active={}-{}/{}, idle={}-{}/{}, dormant={}-{}/{} (delay={}s)",
            profiles.active.subrate_min,
            profiles.active.subrate_max,
            profiles.active.max_latency,
            profiles.idle.subrate_min,
            profiles.idle.subrate_max,
            profiles.idle.max_latency,
            profiles.dormant.subrate_min,
            profiles.dormant.subrate_max,
            profiles.dormant.max_latency,
            self.config.dormant_delay.as_secs()
        );
        Ok(())
    }

    pub fn current_tier(&self) -> Tier {
        self.current_tier
    }

    pub fn dormant_timer(&self) -> &DormantTimer {
        &self.dormant_timer
    }

    pub fn config(&self) -> &SubrateConfig {
        &self.config
    }

    /// Switch to `tier` and push its profile to every central link.
    ///
    /// Switching to the current tier does nothing.
    pub fn set_tier(&mut self, tier: Tier) {
        if tier == self.current_tier {
            return;
        }

        let prev_tier = self.current_tier;
        self.current_tier = tier;

        let params = self.config.profiles.get(tier);
        info!(
            "Subrating tier: {} (factor={}-{}, latency={}, cn={})",
            tier.as_str(),
            params.subrate_min,
            params.subrate_max,
            params.max_latency,
            params.continuation_number
        );

        if let Err(e) = self.link.set_default_subrate(params) {
            warn!("Failed to update default subrate: {:?}", e);
        }
        apply_subrate(self.link, params, ConnRole::Central);

        // Host links only change when crossing the dormant boundary
        if let Some(split) = &self.config.host_split {
            let host = if tier == Tier::Dormant {
                Some((HostProfile::Dormant, &split.dormant))
            } else if prev_tier == Tier::Dormant {
                Some((HostProfile::Active, &split.active))
            } else {
                None
            };
            if let Some((profile, host_params)) = host {
                info!(
                    "Host conn params: {} (interval={}-{}, latency={})",
                    profile.as_str(),
                    host_params.interval_min,
                    host_params.interval_max,
                    host_params.latency
                );
                apply_host_params(self.link, host_params, ConnRole::Peripheral);
            }
        }
    }

    pub fn on_activity(&mut self, state: ActivityState) {
        match state {
            ActivityState::Active => {
                self.dormant_timer.cancel();
                self.set_tier(Tier::Active);
            }
            ActivityState::Idle | ActivityState::Sleep => {
                self.dormant_timer.cancel();
                self.set_tier(Tier::Idle);
                self.dormant_timer.schedule(self.config.dormant_delay);
            }
        }
    }

    /// Handle a raw activity state value, unsupported values leave the tier unchanged
    pub fn on_activity_raw(&mut self, raw: u8) -> Result<(), SubrateError> {
        match ActivityState::try_from(raw) {
            Ok(state) => {
                self.on_activity(state);
                Ok(())
            }
            Err(e) => {
                warn!("Unhandled activity state: {}", raw);
                Err(e)
            }
        }
    }

    pub fn on_dormant_timeout(&mut self) {
        self.set_tier(Tier::Dormant);
    }

    /// Process activity states and dormant timer expiry, forever
    pub async fn run<S: ActivitySource>(&mut self, source: &mut S) {
        loop {
            match select(source.next_state(), self.dormant_timer.expired()).await {
                Either::First(state) => self.on_activity(state),
                Either::Second(()) => self.on_dormant_timeout(),
            }
        }
    }
}

/// Run the tier state machine on the split central or a unibody keyboard.
///
/// Only returns if start-up fails.
pub async fn run_subrate_central<L: LinkStack, S: ActivitySource>(
    link: &L,
    config: SubrateConfig,
    source: &mut S,
) -> Result<(), SubrateError> {
    let mut controller = TierController::new(link, config)?;
    controller.init()?;
    controller.run(source).await;
    Ok(())
}
