//! Fan-out of a parameter profile to every live connection of one role
//!
//! A failed request never aborts the iteration, the remaining connections are still
//! attempted. Nothing is retried, the next tier transition requests again.

use crate::error::LinkError;
use crate::link::{ConnInfo, ConnRole, LinkStack};
use crate::profile::{HostConnParams, SubrateParams};

/// Per-batch outcome of a fan-out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ApplyReport {
    /// Connections matching the role filter, all of them were requested
    pub matched: usize,
    /// Requests the stack reported as already in effect
    pub redundant: usize,
    /// Requests that failed with any other error
    pub failed: usize,
}

impl ApplyReport {
    fn record(&mut self, result: Result<(), LinkError>, what: &str) {
        self.matched += 1;
        match result {
            Ok(()) => {}
            Err(e) if e.is_redundant() => self.redundant += 1,
            Err(e) => {
                warn!("Failed to request {}: {:?}", what, e);
                self.failed += 1;
            }
        }
    }
}

/// Request `params` on every connected link where we act as `role`
pub fn apply_subrate<L: LinkStack + ?Sized>(link: &L, params: &SubrateParams, role: ConnRole) -> ApplyReport {
    let mut report = ApplyReport::default();
    link.for_each_le_connection(&mut |conn: &ConnInfo| {
        if conn.is_connected_as(role) {
            report.record(link.request_subrate(conn.handle, params), "subrate");
        }
    });
    report
}

/// Request host connection parameters on every connected link where we act as `role`.
///
/// `params` also becomes the preferred set for links established afterwards.
pub fn apply_host_params<L: LinkStack + ?Sized>(link: &L, params: &HostConnParams, role: ConnRole) -> ApplyReport {
    if let Err(e) = link.set_default_conn_params(params) {
        warn!("Failed to set default host conn params: {:?}", e);
    }
    let mut report = ApplyReport::default();
    link.for_each_le_connection(&mut |conn: &ConnInfo| {
        if conn.is_connected_as(role) {
            report.record(link.update_conn_params(conn.handle, params), "host conn param update");
        }
    });
    report
}
