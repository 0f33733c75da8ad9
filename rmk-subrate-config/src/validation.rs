//! Centralized validation for the `[subrate]` section
//!
//! The firmware re-checks the generated constants at compile time, this module
//! reports violations with readable field names before code generation.

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::{HostConnTomlConfig, SubrateTomlConfig, TierTomlConfig};

/// Validates the entire `[subrate]` section
pub fn validate_config(config: &SubrateTomlConfig) -> ConfigResult<()> {
    validate_tier("subrate.active", &config.active, config.supervision_timeout)?;
    validate_tier("subrate.idle", &config.idle, config.supervision_timeout)?;
    validate_tier("subrate.dormant", &config.dormant, config.supervision_timeout)?;
    if let Some(host_dormant) = &config.host_dormant {
        validate_host_granularity("subrate.host_dormant", host_dormant)?;
        validate_host_window("subrate.host_dormant", host_dormant)?;
        validate_host_window("subrate.host_active", &config.host_active_or_default())?;
    }
    Ok(())
}

/// Validates one tier against the shared supervision timeout
fn validate_tier(field: &str, tier: &TierTomlConfig, supervision_timeout: u16) -> ConfigResult<()> {
    if tier.min == 0 {
        return Err(ConfigError::InvalidValue {
            field: format!("{field}.min"),
            value: tier.min.to_string(),
            expected: "at least 1".to_string(),
        });
    }

    if tier.max < tier.min {
        return Err(ConfigError::Validation {
            field: format!("{field}.max"),
            message: format!("max ({}) must be >= min ({})", tier.max, tier.min),
        });
    }

    let window = tier.max as u32 * (tier.max_latency as u32 + 1);
    if window > defaults::SUBRATE_WINDOW_LIMIT {
        return Err(ConfigError::Validation {
            field: format!("{field}.max_latency"),
            message: format!(
                "max * (max_latency + 1) must be <= {}, got {}",
                defaults::SUBRATE_WINDOW_LIMIT,
                window
            ),
        });
    }

    if tier.continuation_number >= tier.max {
        return Err(ConfigError::Validation {
            field: format!("{field}.continuation_number"),
            message: format!(
                "continuation_number ({}) must be < max ({})",
                tier.continuation_number, tier.max
            ),
        });
    }

    if supervision_timeout as u32 * 2 <= 3 * window {
        return Err(ConfigError::Validation {
            field: "subrate.supervision_timeout".to_string(),
            message: format!(
                "supervision_timeout ({}) too low for {}, it must be > {}",
                supervision_timeout,
                field,
                3 * window / 2
            ),
        });
    }

    Ok(())
}

/// Interval rules from Apple's accessory design guidelines
fn validate_host_granularity(field: &str, host: &HostConnTomlConfig) -> ConfigResult<()> {
    let step = defaults::HOST_INTERVAL_STEP;
    if host.interval_min < step || host.interval_min % step != 0 {
        return Err(ConfigError::InvalidValue {
            field: format!("{field}.interval_min"),
            value: host.interval_min.to_string(),
            expected: "a multiple of 15ms (12 units), at least 12".to_string(),
        });
    }

    if host.interval_max != host.interval_min && host.interval_max < host.interval_min + step {
        return Err(ConfigError::Validation {
            field: format!("{field}.interval_max"),
            message: "interval_max must equal interval_min or be at least 15ms greater".to_string(),
        });
    }

    if host.latency > defaults::HOST_LATENCY_MAX {
        return Err(ConfigError::InvalidValue {
            field: format!("{field}.latency"),
            value: host.latency.to_string(),
            expected: format!("0 to {}", defaults::HOST_LATENCY_MAX),
        });
    }

    Ok(())
}

/// Latency window and supervision margin, applied to both host profiles
fn validate_host_window(field: &str, host: &HostConnTomlConfig) -> ConfigResult<()> {
    if host.interval_max < host.interval_min {
        return Err(ConfigError::Validation {
            field: format!("{field}.interval_max"),
            message: format!(
                "interval_max ({}) must be >= interval_min ({})",
                host.interval_max, host.interval_min
            ),
        });
    }

    let window_ms = (host.interval_max as u32 * 125 / 100) * (host.latency as u32 + 1);
    if window_ms > defaults::HOST_WINDOW_LIMIT_MS {
        return Err(ConfigError::Validation {
            field: format!("{field}.latency"),
            message: format!(
                "interval_max * (latency + 1) must be <= {}ms, got {}ms",
                defaults::HOST_WINDOW_LIMIT_MS,
                window_ms
            ),
        });
    }

    if host.timeout as u32 * 10 <= window_ms * 3 {
        return Err(ConfigError::Validation {
            field: format!("{field}.timeout"),
            message: format!(
                "timeout ({}ms) must be > interval_max * (latency + 1) * 3 ({}ms)",
                host.timeout as u32 * 10,
                window_ms * 3
            ),
        });
    }

    Ok(())
}
