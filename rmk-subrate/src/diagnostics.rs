//! Logging of link procedure outcomes
//!
//! The observer keeps no state and never feeds back into the tier state machine.

use core::fmt;

use bt_hci::param::BdAddr;

use crate::link::{ConnInfo, ConnParamsUpdated, LinkObserver, LinkStack, PhyUpdated, SubrateChanged};

/// Peer address in the usual `AA:BB:CC:DD:EE:FF` notation
pub struct PeerAddr<'a>(pub &'a BdAddr);

impl PeerAddr<'_> {
    fn bytes(&self) -> [u8; 6] {
        let mut out = [0u8; 6];
        // Most significant byte first
        for (o, b) in out.iter_mut().zip(self.0.raw().iter().rev()) {
            *o = *b;
        }
        out
    }
}

impl fmt::Display for PeerAddr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bytes();
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PeerAddr<'_> {
    fn format(&self, f: defmt::Formatter) {
        let b = self.bytes();
        defmt::write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0],
            b[1],
            b[2],
            b[3],
            b[4],
            b[5]
        )
    }
}

/// Connection interval in 1.25ms units, split into whole milliseconds and hundredths
pub const fn interval_ms_parts(interval: u16) -> (u32, u32) {
    let interval_us = interval as u32 * 1250;
    (interval_us / 1000, (interval_us % 1000) / 10)
}

/// Logs every subrate, connection parameter and PHY update
pub struct DiagnosticsObserver;

impl LinkObserver for DiagnosticsObserver {
    fn subrate_changed(&self, conn: &ConnInfo, result: &SubrateChanged) {
        let addr = PeerAddr(&conn.peer);
        if result.is_success() {
            info!(
                "Subrating [{} {}]: factor={}, cn={}",
                conn.role.as_str(),
                addr,
                result.factor,
                result.continuation_number
            );
        } else {
            warn!(
                "Subrating failed [{} {}]: 0x{:02x}",
                conn.role.as_str(),
                addr,
                result.status
            );
        }
    }

    fn conn_params_updated(&self, conn: &ConnInfo, params: &ConnParamsUpdated) {
        let (ms, hundredths) = interval_ms_parts(params.interval);
        info!(
            "Conn params [{}]: interval={}.{:02}ms, latency={}, timeout={}ms",
            PeerAddr(&conn.peer),
            ms,
            hundredths,
            params.latency,
            params.timeout as u32 * 10
        );
    }

    fn phy_updated(&self, conn: &ConnInfo, phy: &PhyUpdated) {
        info!(
            "PHY updated [{}]: tx={}, rx={}",
            PeerAddr(&conn.peer),
            phy.tx_phy.as_str(),
            phy.rx_phy.as_str()
        );
    }
}

static DIAGNOSTICS: DiagnosticsObserver = DiagnosticsObserver;

/// Register the logging observer with the link stack
pub fn register_diagnostics<L: LinkStack + ?Sized>(link: &L) {
    link.register_observer(&DIAGNOSTICS);
}
