//! Centralized default values for the `[subrate]` section
//!
//! Connection intervals are in 1.25ms units, supervision timeouts in 10ms units.

// ============================================================================
// Shared
// ============================================================================

/// Supervision timeout shared by all tiers, 4s
pub const SUPERVISION_TIMEOUT: u16 = 400;

/// Idle dwell time before entering the dormant tier
pub const DORMANT_DELAY_MS: u32 = 30_000;

/// Whether split peripherals request the fast ACTIVE profile on local activity
pub const PERIPHERAL_FAST_ACTIVE: bool = true;

// ============================================================================
// Tier defaults: (min, max, max_latency, continuation_number)
// ============================================================================

pub const ACTIVE_TIER: (u16, u16, u16, u16) = (1, 1, 0, 0);
pub const IDLE_TIER: (u16, u16, u16, u16) = (1, 4, 0, 1);
pub const DORMANT_TIER: (u16, u16, u16, u16) = (1, 32, 0, 1);

// ============================================================================
// Host connection parameters: (interval_min, interval_max, latency, timeout)
// ============================================================================

/// Preferred peripheral connection parameters of the BLE stack, restored when leaving dormant
pub const HOST_ACTIVE: (u16, u16, u16, u16) = (6, 12, 30, 400);

// ============================================================================
// Limits
// ============================================================================

/// Upper bound of `subrate_max * (max_latency + 1)`
pub const SUBRATE_WINDOW_LIMIT: u32 = 500;

/// Interval granularity for host connections, 15ms
pub const HOST_INTERVAL_STEP: u16 = 12;

/// Max peripheral latency for host connections
pub const HOST_LATENCY_MAX: u16 = 30;

/// Upper bound of `interval_max_ms * (latency + 1)`
pub const HOST_WINDOW_LIMIT_MS: u32 = 6000;
