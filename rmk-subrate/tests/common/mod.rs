#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use bt_hci::param::{BdAddr, ConnHandle};
use embassy_time::Duration;
use rmk_subrate::{
    ConnInfo, ConnRole, ConnState, HostConnParams, HostParamSplit, LinkError, LinkObserver, LinkStack, SubrateConfig,
    SubrateParams, TierProfiles,
};

thread_local! {
    static WARNINGS: Cell<usize> = const { Cell::new(0) };
}

/// env_logger wrapper counting WARN records emitted on the current test thread
struct CountingLogger {
    inner: env_logger::Logger,
}

impl log::Log for CountingLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if record.level() == log::Level::Warn {
            WARNINGS.with(|w| w.set(w.get() + 1));
        }
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let inner = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .build();
    let max_level = inner.filter();
    if log::set_logger(Box::leak(Box::new(CountingLogger { inner }))).is_ok() {
        log::set_max_level(max_level);
    }
}

/// WARN records logged on this thread since the last call
pub fn take_warnings() -> usize {
    WARNINGS.with(|w| w.replace(0))
}

pub const ACTIVE: SubrateParams = SubrateParams::new(1, 1, 0, 0, 400);
pub const IDLE: SubrateParams = SubrateParams::new(1, 4, 0, 1, 400);
pub const DORMANT: SubrateParams = SubrateParams::new(1, 32, 0, 1, 400);
pub const HOST_DORMANT: HostConnParams = HostConnParams::new(48, 48, 4, 400);
pub const HOST_ACTIVE: HostConnParams = HostConnParams::new(6, 12, 30, 400);
pub const DORMANT_DELAY: Duration = Duration::from_secs(30);

pub fn test_config(host_split: bool) -> SubrateConfig {
    SubrateConfig {
        profiles: TierProfiles {
            active: ACTIVE,
            idle: IDLE,
            dormant: DORMANT,
        },
        dormant_delay: DORMANT_DELAY,
        host_split: host_split.then_some(HostParamSplit {
            dormant: HOST_DORMANT,
            active: HOST_ACTIVE,
        }),
        peripheral_fast_active: true,
    }
}

pub fn conn(handle: u16, role: ConnRole, state: ConnState) -> ConnInfo {
    ConnInfo {
        handle: ConnHandle::new(handle),
        peer: BdAddr::new([handle as u8, 0x22, 0x33, 0x44, 0x55, 0xC6]),
        role,
        state,
    }
}

/// Requests recorded by [`FakeLink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCall {
    Subrate(u16, SubrateParams),
    DefaultSubrate(SubrateParams),
    ConnParams(u16, HostConnParams),
    DefaultConnParams(HostConnParams),
}

/// In-memory link stack with a scripted connection set
#[derive(Default)]
pub struct FakeLink {
    conns: RefCell<Vec<ConnInfo>>,
    calls: RefCell<Vec<LinkCall>>,
    failures: RefCell<Vec<(u16, LinkError)>>,
    default_error: Cell<Option<LinkError>>,
    observers: RefCell<Vec<&'static dyn LinkObserver>>,
}

impl FakeLink {
    pub fn new(conns: &[ConnInfo]) -> Self {
        Self {
            conns: RefCell::new(conns.to_vec()),
            ..Default::default()
        }
    }

    /// Split central with one peripheral half and one host:
    /// handle 1 is the peripheral half (we're central), handle 2 is the host (we're peripheral)
    pub fn split_central() -> Self {
        Self::new(&[
            conn(1, ConnRole::Central, ConnState::Connected),
            conn(2, ConnRole::Peripheral, ConnState::Connected),
        ])
    }

    pub fn add_conn(&self, info: ConnInfo) {
        self.conns.borrow_mut().push(info);
    }

    /// Make every request on `handle` fail with `error`
    pub fn fail_on(&self, handle: u16, error: LinkError) {
        self.failures.borrow_mut().push((handle, error));
    }

    pub fn fail_defaults(&self, error: LinkError) {
        self.default_error.set(Some(error));
    }

    pub fn calls(&self) -> Vec<LinkCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn subrate_requests(&self) -> Vec<(u16, SubrateParams)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                LinkCall::Subrate(h, p) => Some((h, p)),
                _ => None,
            })
            .collect()
    }

    pub fn conn_param_requests(&self) -> Vec<(u16, HostConnParams)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                LinkCall::ConnParams(h, p) => Some((h, p)),
                _ => None,
            })
            .collect()
    }

    pub fn default_subrates(&self) -> Vec<SubrateParams> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                LinkCall::DefaultSubrate(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn observers(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn notify(&self, f: impl Fn(&dyn LinkObserver)) {
        for observer in self.observers.borrow().iter() {
            f(*observer);
        }
    }

    fn outcome(&self, handle: u16) -> Result<(), LinkError> {
        match self.failures.borrow().iter().find(|(h, _)| *h == handle) {
            Some((_, e)) => Err(*e),
            None => Ok(()),
        }
    }
}

impl LinkStack for FakeLink {
    fn for_each_le_connection(&self, f: &mut dyn FnMut(&ConnInfo)) {
        let conns = self.conns.borrow().clone();
        for conn in conns.iter() {
            f(conn);
        }
    }

    fn request_subrate(&self, conn: ConnHandle, params: &SubrateParams) -> Result<(), LinkError> {
        self.calls.borrow_mut().push(LinkCall::Subrate(conn.raw(), *params));
        self.outcome(conn.raw())
    }

    fn set_default_subrate(&self, params: &SubrateParams) -> Result<(), LinkError> {
        self.calls.borrow_mut().push(LinkCall::DefaultSubrate(*params));
        match self.default_error.get() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn update_conn_params(&self, conn: ConnHandle, params: &HostConnParams) -> Result<(), LinkError> {
        self.calls.borrow_mut().push(LinkCall::ConnParams(conn.raw(), *params));
        self.outcome(conn.raw())
    }

    fn set_default_conn_params(&self, params: &HostConnParams) -> Result<(), LinkError> {
        self.calls.borrow_mut().push(LinkCall::DefaultConnParams(*params));
        Ok(())
    }

    fn register_observer(&self, observer: &'static dyn LinkObserver) {
        self.observers.borrow_mut().push(observer);
    }
}
