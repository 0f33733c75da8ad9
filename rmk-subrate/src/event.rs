//! Activity state events
//!
//! The activity detector publishes one [`ActivityState`] per change. Subscribers only
//! care about the latest value, publishing never blocks and drops the oldest message
//! when a subscriber lags behind.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::pubsub::{PubSubChannel, Subscriber};

use crate::error::SubrateError;

/// Keyboard activity state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActivityState {
    Active,
    Idle,
    Sleep,
}

impl TryFrom<u8> for ActivityState {
    type Error = SubrateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ActivityState::Active),
            1 => Ok(ActivityState::Idle),
            2 => Ok(ActivityState::Sleep),
            other => Err(SubrateError::UnsupportedActivity(other)),
        }
    }
}

impl From<ActivityState> for u8 {
    fn from(state: ActivityState) -> Self {
        match state {
            ActivityState::Active => 0,
            ActivityState::Idle => 1,
            ActivityState::Sleep => 2,
        }
    }
}

pub const ACTIVITY_STATE_CHANNEL_SIZE: usize = 4;
pub const ACTIVITY_STATE_SUBS: usize = 2;
pub const ACTIVITY_STATE_PUBS: usize = 1;

pub type ActivityStateChannel = PubSubChannel<
    crate::RawMutex,
    ActivityState,
    ACTIVITY_STATE_CHANNEL_SIZE,
    ACTIVITY_STATE_SUBS,
    ACTIVITY_STATE_PUBS,
>;

pub type ActivityStateSubscriber = Subscriber<
    'static,
    crate::RawMutex,
    ActivityState,
    ACTIVITY_STATE_CHANNEL_SIZE,
    ACTIVITY_STATE_SUBS,
    ACTIVITY_STATE_PUBS,
>;

/// Channel carrying activity state changes
pub static ACTIVITY_STATE_CHANNEL: ActivityStateChannel = PubSubChannel::new();

/// Publish an activity state change, never waits
pub fn publish_activity_state(state: ActivityState) {
    debug!("Publishing activity state: {:?}", state);
    ACTIVITY_STATE_CHANNEL.immediate_publisher().publish_immediate(state);
}

/// Subscribe to [`ACTIVITY_STATE_CHANNEL`]
pub fn activity_state_subscriber() -> Option<ActivityStateSubscriber> {
    ACTIVITY_STATE_CHANNEL.subscriber().ok()
}

/// Source of activity states, delivered one at a time in publish order
pub trait ActivitySource {
    async fn next_state(&mut self) -> ActivityState;
}

impl<'a, M: RawMutex, const CAP: usize, const SUBS: usize, const PUBS: usize> ActivitySource
    for Subscriber<'a, M, ActivityState, CAP, SUBS, PUBS>
{
    async fn next_state(&mut self) -> ActivityState {
        self.next_message_pure().await
    }
}
