//! Error types of rmk-subrate
//!
//! No variant carries heap data, so every error is `Copy` and can be logged with defmt.

use core::fmt;

use crate::profile::{HostProfile, Tier};

/// A violated invariant of the tier profile table.
///
/// Only produced while validating configuration, before any connection is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileError {
    /// `subrate_min` is zero or `subrate_max < subrate_min`
    SubrateRange(Tier),
    /// `subrate_max * (max_latency + 1) > 500`
    SubrateWindow(Tier),
    /// `continuation_number >= subrate_max`
    ContinuationNumber(Tier),
    /// `supervision_timeout * 2 <= 3 * subrate_max * (max_latency + 1)`
    SupervisionTimeout(Tier),
    /// The tier doesn't use the supervision timeout shared by the table
    SharedTimeout(Tier),
    /// `interval_min` is below 15ms or not a multiple of 15ms
    HostIntervalGranularity(HostProfile),
    /// `interval_max` is below `interval_min`, or not equal to it and less than 15ms above it
    HostIntervalMax(HostProfile),
    /// Peripheral latency above 30
    HostLatency(HostProfile),
    /// `interval_max_ms * (latency + 1) > 6000`
    HostWindow(HostProfile),
    /// `timeout_ms <= 3 * interval_max_ms * (latency + 1)`
    HostTimeout(HostProfile),
}

impl ProfileError {
    /// Static description, usable in const panics.
    pub const fn message(&self) -> &'static str {
        match self {
            ProfileError::SubrateRange(_) => "subrate_max must be >= subrate_min >= 1",
            ProfileError::SubrateWindow(_) => "subrate_max * (max_latency + 1) must be <= 500",
            ProfileError::ContinuationNumber(_) => "continuation_number must be < subrate_max",
            ProfileError::SupervisionTimeout(_) => "supervision timeout too low for the tier",
            ProfileError::SharedTimeout(_) => "all tiers must share one supervision timeout",
            ProfileError::HostIntervalGranularity(_) => "host interval_min must be a multiple of 15ms (12 units)",
            ProfileError::HostIntervalMax(_) => "host interval_max must equal interval_min or be at least 15ms greater",
            ProfileError::HostLatency(_) => "host latency must be <= 30",
            ProfileError::HostWindow(_) => "host interval_max * (latency + 1) must be <= 6 seconds",
            ProfileError::HostTimeout(_) => "host timeout must be > interval_max * (latency + 1) * 3",
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::SubrateRange(t)
            | ProfileError::SubrateWindow(t)
            | ProfileError::ContinuationNumber(t)
            | ProfileError::SupervisionTimeout(t)
            | ProfileError::SharedTimeout(t) => write!(f, "{} tier: {}", t.as_str(), self.message()),
            ProfileError::HostIntervalGranularity(h)
            | ProfileError::HostIntervalMax(h)
            | ProfileError::HostLatency(h)
            | ProfileError::HostWindow(h)
            | ProfileError::HostTimeout(h) => write!(f, "{} host params: {}", h.as_str(), self.message()),
        }
    }
}

/// Outcome of a rejected link-stack request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The requested parameters are already in effect, or an identical request is pending
    Already,
    /// The connection is gone or not fully established
    NotConnected,
    /// The stack rejected the parameters
    InvalidParams,
    /// Another procedure is in progress on the connection
    Busy,
    /// HCI status code returned by the controller
    Hci(u8),
    /// Any other stack specific error code
    Other(i32),
}

impl LinkError {
    /// Redundant requests are treated as success
    pub const fn is_redundant(&self) -> bool {
        matches!(self, LinkError::Already)
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Already => write!(f, "already in effect"),
            LinkError::NotConnected => write!(f, "not connected"),
            LinkError::InvalidParams => write!(f, "invalid parameters"),
            LinkError::Busy => write!(f, "busy"),
            LinkError::Hci(status) => write!(f, "HCI error 0x{:02x}", status),
            LinkError::Other(code) => write!(f, "error {}", code),
        }
    }
}

/// Errors surfaced to the caller of the subrating service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubrateError {
    /// The supplied configuration violates a profile invariant
    InvalidProfile(ProfileError),
    /// Setting the default subrate profile failed at start-up
    DefaultProfile(LinkError),
    /// An activity state value that isn't ACTIVE, IDLE or SLEEP
    UnsupportedActivity(u8),
}

impl From<ProfileError> for SubrateError {
    fn from(e: ProfileError) -> Self {
        SubrateError::InvalidProfile(e)
    }
}

impl fmt::Display for SubrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubrateError::InvalidProfile(e) => write!(f, "invalid subrate profile, {}", e),
            SubrateError::DefaultProfile(e) => write!(f, "failed to set subrating defaults: {}", e),
            SubrateError::UnsupportedActivity(state) => write!(f, "unsupported activity state {}", state),
        }
    }
}
