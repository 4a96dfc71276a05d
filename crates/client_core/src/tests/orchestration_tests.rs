use super::*;
use crate::{
    controller::{events::UiErrorCategory, NotificationView},
    selection::SelectAllState,
    store::{EnqueueOutcome, EntryStatus},
    test_support::{attendee, event, Canned, FakeEventApi, RecordedCall},
};
use shared::{domain::ActionKind, protocol::EventDiscoveryResponse};
use serde_json::json;

fn session_with(api: &Arc<FakeEventApi>) -> Session {
    Session::new(Arc::clone(api) as Arc<dyn EventApi>)
}

fn expect_error(events: &[UiEvent]) -> &UiError {
    match events {
        [UiEvent::Error(err)] => err,
        other => panic!("expected a single error event, got {other:?}"),
    }
}

fn rendered_rows(events: &[UiEvent]) -> Vec<(String, EntryStatus)> {
    let view = events
        .iter()
        .rev()
        .find_map(|event| match event {
            UiEvent::NotificationsRendered(view) => Some(view.clone()),
            _ => None,
        })
        .expect("notifications rendered");
    match view {
        NotificationView::Empty { .. } => Vec::new(),
        NotificationView::Rows(rows) => rows
            .into_iter()
            .map(|row| (row.username.to_string(), row.status))
            .collect(),
    }
}

#[tokio::test]
async fn austin_scenario_runs_all_three_phases() {
    let api = Arc::new(
        FakeEventApi::new()
            .with_events(vec![
                event("SXSW Showcase", Some("2026-03-10")),
                event("Austin Food Fest", Some("2026-03-12")),
                event("Tech Meetup", None),
            ])
            .with_attendees(vec![attendee("alice"), attendee("bob"), attendee("carol")])
            .with_action_json(json!({
                "success": true,
                "retweeted_count": 2,
                "failed_count": 0,
                "results": [{"status": "retweeted"}, {"status": "retweeted"}]
            })),
    );
    let mut session = session_with(&api).with_default_max_results(25);

    let events = session
        .handle(UiAction::DiscoverEvents(
            EventCriteria::new("Austin, TX", "2026-03-01", "2026-03-31").with_max_results(3),
        ))
        .await;
    assert_eq!(events[0], UiEvent::EventsLoaded { count: 3 });
    assert_eq!(session.controller().phase(), Phase::Events);

    let events = session.handle(UiAction::ChooseEvent(1)).await;
    assert!(matches!(
        &events[0],
        UiEvent::AttendeesLoaded { event_name, count: 3 } if event_name == "SXSW Showcase"
    ));
    assert_eq!(session.controller().phase(), Phase::Attendees);
    assert_eq!(
        api.calls()[1],
        RecordedCall::DiscoverAttendees(shared::protocol::AttendeeDiscoveryRequest {
            event_name: "SXSW Showcase".into(),
            event_date: Some("2026-03-10".into()),
            max_results: 25,
        })
    );

    session.handle(UiAction::Toggle(Username::from("alice"))).await;
    let events = session.handle(UiAction::Toggle(Username::from("bob"))).await;
    assert_eq!(
        events,
        vec![UiEvent::SelectionChanged {
            selected: 2,
            total: 3,
            state: SelectAllState::Indeterminate,
        }]
    );

    let events = session.handle(UiAction::SendSelectedToNotifications).await;
    assert_eq!(
        events[0],
        UiEvent::Enqueued(EnqueueOutcome {
            added: 2,
            already_queued: 0
        })
    );
    assert_eq!(
        rendered_rows(&events),
        vec![
            ("alice".to_string(), EntryStatus::Pending),
            ("bob".to_string(), EntryStatus::Pending),
        ]
    );

    let events = session
        .handle(UiAction::Dispatch(ActionChoice::new(ActionKind::Retweet)))
        .await;
    let UiEvent::DispatchCompleted(summary) = &events[0] else {
        panic!("expected dispatch summary, got {events:?}");
    };
    assert_eq!(summary.sent, 2);
    assert_eq!(summary.reported_sent, Some(2));
    assert_eq!(
        rendered_rows(&events),
        vec![
            ("alice".to_string(), EntryStatus::Sent),
            ("bob".to_string(), EntryStatus::Sent),
        ]
    );
    assert!(!session.controller().is_dispatch_in_flight());
}

#[tokio::test]
async fn short_response_leaves_second_entry_pending() {
    let api = Arc::new(
        FakeEventApi::new()
            .with_attendees(vec![attendee("alice"), attendee("bob")])
            .with_action_json(json!({"results": [{"status": "retweeted"}]})),
    );
    let mut session = session_with(&api);

    session
        .handle(UiAction::DiscoverAttendees(AttendeeCriteria::new("SXSW")))
        .await;
    session.handle(UiAction::SelectAll).await;
    session.handle(UiAction::SendSelectedToNotifications).await;
    let events = session
        .handle(UiAction::Dispatch(ActionChoice::new(ActionKind::Retweet)))
        .await;

    assert!(events.contains(&UiEvent::Info(
        "1 entries got no result from the service and stay pending".into()
    )));
    assert_eq!(
        rendered_rows(&events),
        vec![
            ("alice".to_string(), EntryStatus::Sent),
            ("bob".to_string(), EntryStatus::Pending),
        ]
    );
}

#[tokio::test]
async fn transport_failure_changes_no_status() {
    let api = Arc::new(
        FakeEventApi::new()
            .with_attendees(vec![attendee("alice"), attendee("bob")])
            .failing_actions(Some(500), "Internal Server Error"),
    );
    let mut session = session_with(&api);

    session
        .handle(UiAction::DiscoverAttendees(AttendeeCriteria::new("SXSW")))
        .await;
    session.handle(UiAction::SelectAll).await;
    session.handle(UiAction::SendSelectedToNotifications).await;

    let events = session
        .handle(UiAction::Dispatch(ActionChoice::new(ActionKind::Like)))
        .await;

    let err = expect_error(&events);
    assert_eq!(err.category(), UiErrorCategory::Transport);
    assert_eq!(err.context(), UiErrorContext::Dispatch);
    assert!(session
        .controller()
        .store()
        .queue()
        .entries()
        .iter()
        .all(|entry| entry.status == EntryStatus::Pending));
    assert!(!session.controller().is_dispatch_in_flight());
}

#[tokio::test]
async fn send_without_selection_reports_error() {
    let api = Arc::new(FakeEventApi::new().with_attendees(vec![attendee("alice")]));
    let mut session = session_with(&api);
    session
        .handle(UiAction::DiscoverAttendees(AttendeeCriteria::new("SXSW")))
        .await;

    let events = session.handle(UiAction::SendSelectedToNotifications).await;

    let err = expect_error(&events);
    assert_eq!(err.message(), "no users selected");
    assert_eq!(err.context(), UiErrorContext::SendToNotifications);
    assert_eq!(session.controller().phase(), Phase::Attendees);
}

#[tokio::test]
async fn rediscovery_clears_selection_but_keeps_queue() {
    let api = Arc::new(FakeEventApi::new().with_attendees(vec![attendee("alice"), attendee("bob")]));
    let mut session = session_with(&api);
    session
        .handle(UiAction::DiscoverAttendees(AttendeeCriteria::new("SXSW")))
        .await;
    session.handle(UiAction::Toggle(Username::from("alice"))).await;
    session.handle(UiAction::SendSelectedToNotifications).await;
    session.handle(UiAction::SelectAll).await;

    api.set_attendees(vec![attendee("zoe")]);
    let events = session
        .handle(UiAction::DiscoverAttendees(AttendeeCriteria::new("ACL Fest")))
        .await;

    assert!(events.contains(&UiEvent::SelectionChanged {
        selected: 0,
        total: 1,
        state: SelectAllState::Unchecked,
    }));
    assert_eq!(session.controller().store().selection().size(), 0);
    assert!(session.controller().store().queue().contains("alice"));
}

#[tokio::test]
async fn dequeue_then_reselect_requeues() {
    let api = Arc::new(FakeEventApi::new().with_attendees(vec![attendee("alice"), attendee("bob")]));
    let mut session = session_with(&api);
    session
        .handle(UiAction::DiscoverAttendees(AttendeeCriteria::new("SXSW")))
        .await;
    session.handle(UiAction::SelectAll).await;
    session.handle(UiAction::SendSelectedToNotifications).await;

    let events = session.handle(UiAction::Dequeue(Username::from("bob"))).await;
    assert_eq!(rendered_rows(&events), vec![("alice".to_string(), EntryStatus::Pending)]);
    assert!(!session.controller().store().selection().is_selected("bob"));

    session.handle(UiAction::Toggle(Username::from("bob"))).await;
    let events = session.handle(UiAction::SendSelectedToNotifications).await;
    assert_eq!(
        events[0],
        UiEvent::Enqueued(EnqueueOutcome {
            added: 1,
            already_queued: 1
        })
    );

    let events = session.handle(UiAction::Dequeue(Username::from("nobody"))).await;
    assert_eq!(expect_error(&events).category(), UiErrorCategory::Validation);
}

#[tokio::test]
async fn invalid_discovery_input_never_calls_the_service() {
    let api = Arc::new(FakeEventApi::new());
    let mut session = session_with(&api);

    let events = session
        .handle(UiAction::DiscoverEvents(
            EventCriteria::new("", "2026-03-01", "2026-03-02"),
        ))
        .await;
    assert_eq!(expect_error(&events).category(), UiErrorCategory::Validation);

    let events = session
        .handle(UiAction::DiscoverAttendees(
            AttendeeCriteria::new("SXSW").with_max_results(500),
        ))
        .await;
    assert_eq!(expect_error(&events).category(), UiErrorCategory::Validation);

    let events = session.handle(UiAction::ChooseEvent(1)).await;
    assert_eq!(expect_error(&events).category(), UiErrorCategory::Validation);

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn service_reported_discovery_failure_keeps_previous_events() {
    let api = Arc::new(FakeEventApi::new().with_events(vec![event("First", None)]));
    let mut session = session_with(&api);
    let criteria = EventCriteria::new("Austin", "2026-03-01", "2026-03-02");
    session
        .handle(UiAction::DiscoverEvents(criteria.clone()))
        .await;
    assert_eq!(session.controller().store().events().len(), 1);

    api.set_events_reply(Canned::Reply(EventDiscoveryResponse {
        success: false,
        events: Vec::new(),
        total_events: None,
        requested_limit: None,
        error: Some("search backend down".into()),
    }));
    let events = session.handle(UiAction::DiscoverEvents(criteria)).await;

    let err = expect_error(&events);
    assert_eq!(err.category(), UiErrorCategory::Service);
    assert_eq!(err.message(), "search backend down");
    assert_eq!(session.controller().store().events().len(), 1);
}

#[tokio::test]
async fn dispatch_with_empty_queue_reports_validation_error() {
    let api = Arc::new(FakeEventApi::new());
    let mut session = session_with(&api);

    let events = session
        .handle(UiAction::Dispatch(
            ActionChoice::new(ActionKind::Quote).with_message("hello"),
        ))
        .await;

    assert_eq!(expect_error(&events).category(), UiErrorCategory::Validation);
    assert!(api.action_calls().is_empty());
    assert!(!session.controller().is_dispatch_in_flight());
}

#[tokio::test]
async fn entering_notifications_tab_always_renders() {
    let api = Arc::new(FakeEventApi::new());
    let mut session = session_with(&api);

    let events = session.handle(UiAction::ShowPhase(Phase::Notifications)).await;
    assert_eq!(
        events,
        vec![
            UiEvent::PhaseChanged(Phase::Notifications),
            UiEvent::NotificationsRendered(NotificationView::Empty {
                message: crate::controller::EMPTY_QUEUE_MESSAGE,
            }),
        ]
    );

    let events = session.handle(UiAction::ShowPhase(Phase::Events)).await;
    assert_eq!(events, vec![UiEvent::PhaseChanged(Phase::Events)]);
}

#[tokio::test]
async fn health_and_auth_checks_surface_service_state() {
    let api = Arc::new(FakeEventApi::new());
    let mut session = session_with(&api);

    let events = session.handle(UiAction::CheckHealth).await;
    assert!(matches!(&events[..], [UiEvent::Health(health)] if health.healthy));

    let events = session.handle(UiAction::CheckAuth).await;
    assert!(matches!(&events[..], [UiEvent::AuthStatus(status)] if status.oauth1_ready));

    let api = Arc::new(FakeEventApi::new().failing_health("connection refused"));
    let mut session = session_with(&api);
    let events = session.handle(UiAction::CheckHealth).await;
    let err = expect_error(&events);
    assert_eq!(err.context(), UiErrorContext::Health);
    assert!(err.message().starts_with("Service unreachable"));
}
