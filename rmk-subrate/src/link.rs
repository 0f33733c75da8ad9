//! Interface to the BLE link stack
//!
//! The stack owns the connections. This crate only enumerates them and issues
//! fire-and-forget requests, outcomes arrive later through [`LinkObserver`].

use bt_hci::param::{BdAddr, ConnHandle};

use crate::error::LinkError;
use crate::profile::{HostConnParams, SubrateParams};

/// Our role on a connection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnRole {
    Central,
    Peripheral,
}

impl ConnRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConnRole::Central => "central",
            ConnRole::Peripheral => "peripheral",
        }
    }
}

/// Connection lifecycle state as reported by the stack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnState {
    Connecting,
    Connected,
    Disconnecting,
    Disconnected,
}

/// Snapshot of a live connection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnInfo {
    pub handle: ConnHandle,
    pub peer: BdAddr,
    pub role: ConnRole,
    pub state: ConnState,
}

impl ConnInfo {
    /// Whether this is an established link on which we act as `role`
    pub fn is_connected_as(&self, role: ConnRole) -> bool {
        self.role == role && self.state == ConnState::Connected
    }
}

/// Result of a subrate negotiation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubrateChanged {
    /// HCI status, 0 on success
    pub status: u8,
    pub factor: u16,
    pub peripheral_latency: u16,
    pub continuation_number: u16,
    pub supervision_timeout: u16,
}

impl SubrateChanged {
    pub const fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Connection parameters in effect after an update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnParamsUpdated {
    /// 1.25ms units
    pub interval: u16,
    pub latency: u16,
    /// 10ms units
    pub timeout: u16,
}

/// LE PHY
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phy {
    Le1M,
    Le2M,
    LeCoded,
    Unknown(u8),
}

impl From<u8> for Phy {
    fn from(value: u8) -> Self {
        match value {
            1 => Phy::Le1M,
            2 => Phy::Le2M,
            3 => Phy::LeCoded,
            other => Phy::Unknown(other),
        }
    }
}

impl Phy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Phy::Le1M => "1M",
            Phy::Le2M => "2M",
            Phy::LeCoded => "Coded",
            Phy::Unknown(_) => "Unknown",
        }
    }
}

/// PHYs in use after a PHY update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyUpdated {
    pub tx_phy: Phy,
    pub rx_phy: Phy,
}

/// Callbacks fired by the link stack when a procedure completes on any connection
pub trait LinkObserver {
    fn subrate_changed(&self, _conn: &ConnInfo, _result: &SubrateChanged) {}

    fn conn_params_updated(&self, _conn: &ConnInfo, _params: &ConnParamsUpdated) {}

    fn phy_updated(&self, _conn: &ConnInfo, _phy: &PhyUpdated) {}
}

/// Capabilities consumed from the BLE link stack
///
/// All requests return as soon as they're queued.
pub trait LinkStack {
    /// Call `f` for each live LE connection
    fn for_each_le_connection(&self, f: &mut dyn FnMut(&ConnInfo));

    /// Request a subrate change on a connection
    fn request_subrate(&self, conn: ConnHandle, params: &SubrateParams) -> Result<(), LinkError>;

    /// Default subrate parameters for connections established later
    fn set_default_subrate(&self, params: &SubrateParams) -> Result<(), LinkError>;

    /// Request a connection parameter update on a connection
    fn update_conn_params(&self, conn: ConnHandle, params: &HostConnParams) -> Result<(), LinkError>;

    /// Preferred connection parameters for connections established later
    fn set_default_conn_params(&self, params: &HostConnParams) -> Result<(), LinkError>;

    /// Register callbacks for subrate, connection parameter and PHY updates
    fn register_observer(&self, observer: &'static dyn LinkObserver);
}
