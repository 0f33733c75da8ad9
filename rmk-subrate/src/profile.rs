//! Tier profile table
//!
//! Connection intervals are in 1.25ms units, supervision timeouts in 10ms units.
//! All validation is `const`, so a table built in a `const` item is checked at compile time.

use crate::error::ProfileError;

/// Link parameter tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tier {
    Active,
    #[default]
    Idle,
    Dormant,
}

impl Tier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::Active => "ACTIVE",
            Tier::Idle => "IDLE",
            Tier::Dormant => "DORMANT",
        }
    }
}

/// Which of the two host connection profiles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostProfile {
    Active,
    Dormant,
}

impl HostProfile {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HostProfile::Active => "active",
            HostProfile::Dormant => "dormant",
        }
    }
}

/// Upper bound of `subrate_max * (max_latency + 1)`
pub const SUBRATE_WINDOW_LIMIT: u32 = 500;

/// Connection subrate parameters, as sent in an LE Subrate Request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubrateParams {
    pub subrate_min: u16,
    pub subrate_max: u16,
    pub max_latency: u16,
    pub continuation_number: u16,
    pub supervision_timeout: u16,
}

impl SubrateParams {
    pub const fn new(
        subrate_min: u16,
        subrate_max: u16,
        max_latency: u16,
        continuation_number: u16,
        supervision_timeout: u16,
    ) -> Self {
        Self {
            subrate_min,
            subrate_max,
            max_latency,
            continuation_number,
            supervision_timeout,
        }
    }

    /// Worst-case multiplier of the underlying connection interval
    pub const fn window(&self) -> u32 {
        self.subrate_max as u32 * (self.max_latency as u32 + 1)
    }

    pub const fn validate(&self, tier: Tier) -> Result<(), ProfileError> {
        if self.subrate_min == 0 || self.subrate_max < self.subrate_min {
            return Err(ProfileError::SubrateRange(tier));
        }
        if self.window() > SUBRATE_WINDOW_LIMIT {
            return Err(ProfileError::SubrateWindow(tier));
        }
        if self.continuation_number >= self.subrate_max {
            return Err(ProfileError::ContinuationNumber(tier));
        }
        if self.supervision_timeout as u32 * 2 <= 3 * self.window() {
            return Err(ProfileError::SupervisionTimeout(tier));
        }
        Ok(())
    }
}

/// Subrate parameters of all three tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TierProfiles {
    pub active: SubrateParams,
    pub idle: SubrateParams,
    pub dormant: SubrateParams,
}

impl TierProfiles {
    pub const fn get(&self, tier: Tier) -> &SubrateParams {
        match tier {
            Tier::Active => &self.active,
            Tier::Idle => &self.idle,
            Tier::Dormant => &self.dormant,
        }
    }

    pub const fn validate(&self) -> Result<(), ProfileError> {
        let tiers = [Tier::Active, Tier::Idle, Tier::Dormant];
        let timeout = self.active.supervision_timeout;
        let mut i = 0;
        while i < tiers.len() {
            let params = self.get(tiers[i]);
            if let Err(e) = params.validate(tiers[i]) {
                return Err(e);
            }
            if params.supervision_timeout != timeout {
                return Err(ProfileError::SharedTimeout(tiers[i]));
            }
            i += 1;
        }
        Ok(())
    }
}

/// Interval granularity for host connections, 15ms
pub const HOST_INTERVAL_STEP: u16 = 12;

/// Max peripheral latency for host connections
pub const HOST_LATENCY_MAX: u16 = 30;

/// Upper bound of `interval_max_ms * (latency + 1)`
pub const HOST_WINDOW_LIMIT_MS: u32 = 6000;

/// Connection parameters requested on links where we are the peripheral
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostConnParams {
    pub interval_min: u16,
    pub interval_max: u16,
    pub latency: u16,
    pub timeout: u16,
}

impl HostConnParams {
    pub const fn new(interval_min: u16, interval_max: u16, latency: u16, timeout: u16) -> Self {
        Self {
            interval_min,
            interval_max,
            latency,
            timeout,
        }
    }

    /// Longest possible gap between serviced events, in ms
    pub const fn window_ms(&self) -> u32 {
        (self.interval_max as u32 * 125 / 100) * (self.latency as u32 + 1)
    }

    /// Interval granularity rules from Apple's accessory design guidelines
    pub const fn validate_granularity(&self, profile: HostProfile) -> Result<(), ProfileError> {
        if self.interval_min < HOST_INTERVAL_STEP || self.interval_min % HOST_INTERVAL_STEP != 0 {
            return Err(ProfileError::HostIntervalGranularity(profile));
        }
        if self.interval_max != self.interval_min && self.interval_max < self.interval_min + HOST_INTERVAL_STEP {
            return Err(ProfileError::HostIntervalMax(profile));
        }
        if self.latency > HOST_LATENCY_MAX {
            return Err(ProfileError::HostLatency(profile));
        }
        Ok(())
    }

    pub const fn validate_window(&self, profile: HostProfile) -> Result<(), ProfileError> {
        if self.interval_max < self.interval_min {
            return Err(ProfileError::HostIntervalMax(profile));
        }
        if self.window_ms() > HOST_WINDOW_LIMIT_MS {
            return Err(ProfileError::HostWindow(profile));
        }
        if self.timeout as u32 * 10 <= self.window_ms() * 3 {
            return Err(ProfileError::HostTimeout(profile));
        }
        Ok(())
    }
}

/// Host connection parameters swapped when entering and leaving the dormant tier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostParamSplit {
    pub dormant: HostConnParams,
    /// Usually the stack's preferred peripheral parameters
    pub active: HostConnParams,
}

impl HostParamSplit {
    pub const fn validate(&self) -> Result<(), ProfileError> {
        if let Err(e) = self.dormant.validate_granularity(HostProfile::Dormant) {
            return Err(e);
        }
        if let Err(e) = self.dormant.validate_window(HostProfile::Dormant) {
            return Err(e);
        }
        self.active.validate_window(HostProfile::Active)
    }
}

/// Fixed profile requested by split peripherals on local activity
pub const PERIPHERAL_ACTIVE_PARAMS: SubrateParams = SubrateParams::new(1, 2, 0, 1, 400);

const _: () = assert!(PERIPHERAL_ACTIVE_PARAMS.validate(Tier::Active).is_ok());
