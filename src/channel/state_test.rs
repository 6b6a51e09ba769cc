use super::*;

const ALL: [ChannelState; 5] = [
    ChannelState::Idle,
    ChannelState::Connecting,
    ChannelState::Open,
    ChannelState::Erroring,
    ChannelState::Closed,
];

#[test]
fn default_state_is_idle() {
    assert_eq!(ChannelState::default(), ChannelState::Idle);
}

#[test]
fn open_is_only_reachable_from_connecting() {
    for from in ALL {
        let allowed = from.can_transition_to(ChannelState::Open);
        assert_eq!(allowed, from == ChannelState::Connecting, "from {from}");
    }
}

#[test]
fn closed_is_terminal() {
    for next in ALL {
        assert!(!ChannelState::Closed.can_transition_to(next), "closed -> {next}");
    }
    assert!(ChannelState::Closed.is_terminal());
    assert!(!ChannelState::Erroring.is_terminal());
}

#[test]
fn erroring_only_leads_to_closed() {
    for next in ALL {
        let allowed = ChannelState::Erroring.can_transition_to(next);
        assert_eq!(allowed, next == ChannelState::Closed, "erroring -> {next}");
    }
}

#[test]
fn idle_cannot_skip_connecting() {
    assert!(ChannelState::Idle.can_transition_to(ChannelState::Connecting));
    assert!(!ChannelState::Idle.can_transition_to(ChannelState::Erroring));
    assert!(!ChannelState::Idle.can_transition_to(ChannelState::Closed));
}

#[test]
fn advance_applies_legal_transition_and_reports_previous() {
    let (tx, rx) = watch::channel(ChannelState::Idle);
    assert_eq!(advance(&tx, ChannelState::Connecting), Some(ChannelState::Idle));
    assert_eq!(*rx.borrow(), ChannelState::Connecting);
}

#[test]
fn advance_rejects_illegal_transition_without_notifying() {
    let (tx, mut rx) = watch::channel(ChannelState::Idle);
    rx.mark_unchanged();
    assert_eq!(advance(&tx, ChannelState::Open), None);
    assert_eq!(*rx.borrow(), ChannelState::Idle);
    assert!(!rx.has_changed().expect("sender alive"));
}

#[test]
fn display_uses_lowercase_names() {
    assert_eq!(ChannelState::Erroring.to_string(), "erroring");
}
