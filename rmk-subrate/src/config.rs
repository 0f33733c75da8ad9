//! Subrating configuration
//!
//! The default config is generated by `build.rs` from the `[subrate]` section of the file
//! pointed to by `SUBRATE_TOML_PATH`.

use embassy_time::Duration;

use crate::error::ProfileError;
use crate::profile::{HostConnParams, HostParamSplit, SubrateParams, TierProfiles};

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

/// Configuration of the subrating service, read once at start-up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubrateConfig {
    pub profiles: TierProfiles,
    /// Idle dwell time before entering the dormant tier
    pub dormant_delay: Duration,
    /// Host connection parameter split, `None` leaves host links untouched
    pub host_split: Option<HostParamSplit>,
    /// Whether split peripherals request the fast ACTIVE profile on local activity
    pub peripheral_fast_active: bool,
}

impl SubrateConfig {
    pub const fn validate(&self) -> Result<(), ProfileError> {
        if let Err(e) = self.profiles.validate() {
            return Err(e);
        }
        match &self.host_split {
            Some(split) => split.validate(),
            None => Ok(()),
        }
    }
}

impl Default for SubrateConfig {
    fn default() -> Self {
        SUBRATE_CONFIG
    }
}

/// Config generated from the `[subrate]` section
pub const SUBRATE_CONFIG: SubrateConfig = SubrateConfig {
    profiles: TierProfiles {
        active: SubrateParams::new(
            SUBRATE_ACTIVE_MIN,
            SUBRATE_ACTIVE_MAX,
            SUBRATE_ACTIVE_MAX_LATENCY,
            SUBRATE_ACTIVE_CN,
            SUBRATE_TIMEOUT,
        ),
        idle: SubrateParams::new(
            SUBRATE_IDLE_MIN,
            SUBRATE_IDLE_MAX,
            SUBRATE_IDLE_MAX_LATENCY,
            SUBRATE_IDLE_CN,
            SUBRATE_TIMEOUT,
        ),
        dormant: SubrateParams::new(
            SUBRATE_DORMANT_MIN,
            SUBRATE_DORMANT_MAX,
            SUBRATE_DORMANT_MAX_LATENCY,
            SUBRATE_DORMANT_CN,
            SUBRATE_TIMEOUT,
        ),
    },
    dormant_delay: Duration::from_millis(SUBRATE_DORMANT_DELAY_MS as u64),
    host_split: if HOST_CONN_PARAM_DORMANT {
        Some(HostParamSplit {
            dormant: HostConnParams::new(
                HOST_DORMANT_INT_MIN,
                HOST_DORMANT_INT_MAX,
                HOST_DORMANT_LATENCY,
                HOST_DORMANT_TIMEOUT,
            ),
            active: HostConnParams::new(
                HOST_ACTIVE_INT_MIN,
                HOST_ACTIVE_INT_MAX,
                HOST_ACTIVE_LATENCY,
                HOST_ACTIVE_TIMEOUT,
            ),
        })
    } else {
        None
    },
    peripheral_fast_active: PERIPHERAL_FAST_ACTIVE,
};

const _: () = {
    if let Err(e) = SUBRATE_CONFIG.validate() {
        panic!("{}", e.message());
    }
};
