mod common;

use embassy_time::Instant;
use rmk_subrate::{
    ActivityState, ConnRole, ConnState, LinkError, ProfileError, SubrateError, SubrateParams, Tier, TierController,
};

use crate::common::{
    ACTIVE, DORMANT, DORMANT_DELAY, FakeLink, HOST_ACTIVE, HOST_DORMANT, IDLE, LinkCall, conn, test_config,
};

fn tier_params(tier: Tier) -> SubrateParams {
    match tier {
        Tier::Active => ACTIVE,
        Tier::Idle => IDLE,
        Tier::Dormant => DORMANT,
    }
}

#[test]
fn test_starts_idle_without_link_traffic() {
    let link = FakeLink::split_central();
    let controller = TierController::new(&link, test_config(false)).unwrap();
    assert_eq!(controller.current_tier(), Tier::Idle);
    assert!(!controller.dormant_timer().is_pending());
    assert!(link.calls().is_empty());
}

#[test]
fn test_init_sets_idle_default() {
    let link = FakeLink::split_central();
    let mut controller = TierController::new(&link, test_config(false)).unwrap();
    controller.init().unwrap();
    assert_eq!(link.calls(), vec![LinkCall::DefaultSubrate(IDLE)]);
}

#[test]
fn test_init_failure_is_propagated() {
    let link = FakeLink::split_central();
    link.fail_defaults(LinkError::Hci(0x12));
    let mut controller = TierController::new(&link, test_config(false)).unwrap();
    assert_eq!(
        controller.init(),
        Err(SubrateError::DefaultProfile(LinkError::Hci(0x12)))
    );
}

#[test]
fn test_invalid_config_is_rejected_before_link_traffic() {
    let link = FakeLink::split_central();
    let mut config = test_config(false);
    config.profiles.dormant = SubrateParams::new(1, 101, 4, 1, 3200);
    config.profiles.active.supervision_timeout = 3200;
    config.profiles.idle.supervision_timeout = 3200;
    let result = TierController::new(&link, config);
    assert!(matches!(
        result,
        Err(SubrateError::InvalidProfile(ProfileError::SubrateWindow(Tier::Dormant)))
    ));
    assert!(link.calls().is_empty());
}

#[test]
fn test_same_tier_is_noop() {
    let tiers = [Tier::Active, Tier::Idle, Tier::Dormant];
    for tier in tiers {
        let link = FakeLink::split_central();
        let mut controller = TierController::new(&link, test_config(true)).unwrap();
        controller.set_tier(tier);
        link.clear_calls();

        controller.set_tier(tier);
        assert!(link.calls().is_empty(), "repeated {:?} produced link traffic", tier);
        assert_eq!(controller.current_tier(), tier);
    }
}

#[test]
fn test_every_transition_requests_target_profile_on_central_links() {
    let tiers = [Tier::Active, Tier::Idle, Tier::Dormant];
    for from in tiers {
        for to in tiers {
            if from == to {
                continue;
            }
            let link = FakeLink::split_central();
            let mut controller = TierController::new(&link, test_config(false)).unwrap();
            controller.set_tier(from);
            link.clear_calls();

            controller.set_tier(to);
            assert_eq!(controller.current_tier(), to);
            // Only handle 1 is a central link
            assert_eq!(link.subrate_requests(), vec![(1, tier_params(to))], "{:?} -> {:?}", from, to);
            assert_eq!(link.default_subrates(), vec![tier_params(to)]);
            assert!(link.conn_param_requests().is_empty());
        }
    }
}

#[test]
fn test_disconnected_central_links_are_skipped() {
    let link = FakeLink::split_central();
    link.add_conn(conn(3, ConnRole::Central, ConnState::Disconnecting));
    link.add_conn(conn(4, ConnRole::Central, ConnState::Connected));
    let mut controller = TierController::new(&link, test_config(false)).unwrap();
    controller.set_tier(Tier::Active);
    assert_eq!(link.subrate_requests(), vec![(1, ACTIVE), (4, ACTIVE)]);
}

#[test]
fn test_failed_link_doesnt_stop_transition() {
    let link = FakeLink::split_central();
    link.add_conn(conn(3, ConnRole::Central, ConnState::Connected));
    link.fail_on(1, LinkError::Busy);
    let mut controller = TierController::new(&link, test_config(false)).unwrap();
    controller.set_tier(Tier::Active);
    assert_eq!(controller.current_tier(), Tier::Active);
    assert_eq!(link.subrate_requests(), vec![(1, ACTIVE), (3, ACTIVE)]);
}

#[test]
fn test_host_params_switch_only_across_dormant() {
    let link = FakeLink::split_central();
    let mut controller = TierController::new(&link, test_config(true)).unwrap();

    controller.set_tier(Tier::Active);
    controller.set_tier(Tier::Idle);
    controller.set_tier(Tier::Active);
    assert!(link.conn_param_requests().is_empty());

    controller.set_tier(Tier::Idle);
    controller.set_tier(Tier::Dormant);
    // Only handle 2 is a host link
    assert_eq!(link.conn_param_requests(), vec![(2, HOST_DORMANT)]);
    assert!(link.calls().contains(&LinkCall::DefaultConnParams(HOST_DORMANT)));

    link.clear_calls();
    controller.set_tier(Tier::Idle);
    assert_eq!(link.conn_param_requests(), vec![(2, HOST_ACTIVE)]);

    link.clear_calls();
    controller.set_tier(Tier::Active);
    assert!(link.conn_param_requests().is_empty());
}

#[test]
fn test_no_host_params_without_split() {
    let link = FakeLink::split_central();
    let mut controller = TierController::new(&link, test_config(false)).unwrap();
    controller.set_tier(Tier::Dormant);
    controller.set_tier(Tier::Active);
    assert!(link.conn_param_requests().is_empty());
}

#[test]
fn test_active_cancels_timer_from_any_tier() {
    for start in [Tier::Active, Tier::Idle, Tier::Dormant] {
        let link = FakeLink::split_central();
        let mut controller = TierController::new(&link, test_config(false)).unwrap();
        controller.set_tier(start);
        controller.on_activity(ActivityState::Idle);
        assert!(controller.dormant_timer().is_pending());

        controller.on_activity(ActivityState::Active);
        assert_eq!(controller.current_tier(), Tier::Active);
        assert!(!controller.dormant_timer().is_pending());
    }
}

#[test]
fn test_idle_and_sleep_schedule_one_dormant_timer() {
    for state in [ActivityState::Idle, ActivityState::Sleep] {
        let link = FakeLink::split_central();
        let mut controller = TierController::new(&link, test_config(false)).unwrap();
        controller.set_tier(Tier::Active);

        controller.on_activity(state);
        assert_eq!(controller.current_tier(), Tier::Idle);
        // The mock clock doesn't move in this test binary
        assert_eq!(controller.dormant_timer().deadline(), Some(Instant::now() + DORMANT_DELAY));

        controller.on_activity(state);
        assert_eq!(controller.current_tier(), Tier::Idle);
        assert_eq!(controller.dormant_timer().deadline(), Some(Instant::now() + DORMANT_DELAY));
    }
}

#[test]
fn test_idle_event_while_idle_only_reschedules() {
    let link = FakeLink::split_central();
    let mut controller = TierController::new(&link, test_config(false)).unwrap();
    controller.on_activity(ActivityState::Idle);
    controller.on_activity(ActivityState::Sleep);
    assert!(link.calls().is_empty());
    assert!(controller.dormant_timer().is_pending());
}

#[test]
fn test_unsupported_raw_activity_is_ignored() {
    let link = FakeLink::split_central();
    let mut controller = TierController::new(&link, test_config(false)).unwrap();
    controller.on_activity(ActivityState::Active);
    link.clear_calls();

    assert_eq!(controller.on_activity_raw(9), Err(SubrateError::UnsupportedActivity(9)));
    assert_eq!(controller.current_tier(), Tier::Active);
    assert!(link.calls().is_empty());

    assert_eq!(controller.on_activity_raw(1), Ok(()));
    assert_eq!(controller.current_tier(), Tier::Idle);
}

#[test]
fn test_scenario_idle_to_active() {
    let link = FakeLink::split_central();
    let mut controller = TierController::new(&link, test_config(true)).unwrap();
    controller.on_activity(ActivityState::Active);
    assert_eq!(controller.current_tier(), Tier::Active);
    assert!(!controller.dormant_timer().is_pending());
    assert!(link.conn_param_requests().is_empty());
}

#[test]
fn test_scenario_active_idle_dormant() {
    let link = FakeLink::split_central();
    let mut controller = TierController::new(&link, test_config(true)).unwrap();
    controller.on_activity(ActivityState::Active);
    link.clear_calls();

    controller.on_activity(ActivityState::Idle);
    assert_eq!(controller.current_tier(), Tier::Idle);
    assert!(controller.dormant_timer().is_pending());

    controller.on_dormant_timeout();
    assert_eq!(controller.current_tier(), Tier::Dormant);
    assert_eq!(link.subrate_requests(), vec![(1, IDLE), (1, DORMANT)]);
    assert_eq!(link.conn_param_requests(), vec![(2, HOST_DORMANT)]);
}

#[test]
fn test_scenario_dormant_to_active() {
    let link = FakeLink::split_central();
    let mut controller = TierController::new(&link, test_config(true)).unwrap();
    controller.on_activity(ActivityState::Sleep);
    controller.on_dormant_timeout();
    controller.on_activity(ActivityState::Idle);
    controller.on_dormant_timeout();
    assert_eq!(controller.current_tier(), Tier::Dormant);
    link.clear_calls();

    controller.on_activity(ActivityState::Active);
    assert_eq!(controller.current_tier(), Tier::Active);
    assert!(!controller.dormant_timer().is_pending());
    assert_eq!(link.subrate_requests(), vec![(1, ACTIVE)]);
    assert_eq!(link.conn_param_requests(), vec![(2, HOST_ACTIVE)]);
}
