//! Connection subrating tiers for BLE keyboards.
//!
//! Trades link responsiveness against radio power by switching every central link between
//! ACTIVE, IDLE and DORMANT subrate profiles, following keyboard activity.
//!
//! - [`controller`] owns the tier state machine, run it on the split central.
//! - [`peripheral`] asks for a fast profile on split peripherals.
//! - [`diagnostics`] logs the outcome of link procedures.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod applier;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod link;
pub mod peripheral;
pub mod profile;
pub mod timer;

pub use applier::{ApplyReport, apply_host_params, apply_subrate};
pub use config::{SUBRATE_CONFIG, SubrateConfig};
pub use controller::{TierController, run_subrate_central};
pub use diagnostics::{DiagnosticsObserver, register_diagnostics};
pub use error::{LinkError, ProfileError, SubrateError};
pub use event::{ActivitySource, ActivityState, publish_activity_state};
pub use link::{ConnInfo, ConnRole, ConnState, LinkObserver, LinkStack};
pub use peripheral::{PeripheralFastActive, run_subrate_peripheral};
pub use profile::{HostConnParams, HostParamSplit, SubrateParams, Tier, TierProfiles};
pub use timer::DormantTimer;

pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
