//! Maps front-end actions onto store, controller, and remote operations.

use std::sync::Arc;

use shared::domain::Username;
use tracing::{debug, info};

use crate::{
    controller::{
        events::{HealthSnapshot, UiError, UiErrorContext, UiEvent},
        Phase, PhaseController,
    },
    discovery::{self, AttendeeCriteria, EventCriteria, DEFAULT_MAX_RESULTS},
    dispatcher::{ActionChoice, ActionDispatcher},
    transport::EventApi,
};

/// Everything a front-end can ask the core to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    ShowPhase(Phase),
    DiscoverEvents(EventCriteria),
    DiscoverAttendees(AttendeeCriteria),
    /// Discovers attendees for the n-th (1-based) discovered event.
    ChooseEvent(usize),
    Toggle(Username),
    SelectAll,
    ClearSelection,
    SendSelectedToNotifications,
    Dequeue(Username),
    Dispatch(ActionChoice),
    CheckHealth,
    CheckAuth,
}

pub fn action_name(action: &UiAction) -> &'static str {
    match action {
        UiAction::ShowPhase(_) => "show_phase",
        UiAction::DiscoverEvents(_) => "discover_events",
        UiAction::DiscoverAttendees(_) => "discover_attendees",
        UiAction::ChooseEvent(_) => "choose_event",
        UiAction::Toggle(_) => "toggle",
        UiAction::SelectAll => "select_all",
        UiAction::ClearSelection => "clear_selection",
        UiAction::SendSelectedToNotifications => "send_selected_to_notifications",
        UiAction::Dequeue(_) => "dequeue",
        UiAction::Dispatch(_) => "dispatch",
        UiAction::CheckHealth => "check_health",
        UiAction::CheckAuth => "check_auth",
    }
}

/// One user session: a single controller bound to one service handle.
pub struct Session {
    api: Arc<dyn EventApi>,
    dispatcher: ActionDispatcher,
    controller: PhaseController,
    default_max_results: u32,
}

impl Session {
    pub fn new(api: Arc<dyn EventApi>) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(Arc::clone(&api)),
            api,
            controller: PhaseController::new(),
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_default_max_results(mut self, max_results: u32) -> Self {
        self.default_max_results = max_results;
        self
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn default_max_results(&self) -> u32 {
        self.default_max_results
    }

    pub async fn handle(&mut self, action: UiAction) -> Vec<UiEvent> {
        debug!(action = action_name(&action), "handling ui action");
        match action {
            UiAction::ShowPhase(phase) => self.show_phase(phase),
            UiAction::DiscoverEvents(criteria) => self.discover_events(criteria).await,
            UiAction::DiscoverAttendees(criteria) => self.discover_attendees(criteria).await,
            UiAction::ChooseEvent(position) => self.choose_event(position).await,
            UiAction::Toggle(username) => self.toggle(&username),
            UiAction::SelectAll => {
                self.controller.store_mut().select_all();
                vec![self.selection_changed()]
            }
            UiAction::ClearSelection => {
                self.controller.store_mut().clear_selection();
                vec![self.selection_changed()]
            }
            UiAction::SendSelectedToNotifications => self.send_selected(),
            UiAction::Dequeue(username) => self.dequeue(&username),
            UiAction::Dispatch(choice) => self.dispatch(choice).await,
            UiAction::CheckHealth => self.check_health().await,
            UiAction::CheckAuth => self.check_auth().await,
        }
    }

    fn show_phase(&mut self, phase: Phase) -> Vec<UiEvent> {
        let mut events = vec![UiEvent::PhaseChanged(phase)];
        if let Some(view) = self.controller.enter(phase) {
            events.push(UiEvent::NotificationsRendered(view));
        }
        events
    }

    async fn discover_events(&mut self, criteria: EventCriteria) -> Vec<UiEvent> {
        match discovery::discover_events(self.api.as_ref(), &criteria).await {
            Ok(found) => {
                let count = found.len();
                self.controller.store_mut().set_events(found);
                let mut events = vec![UiEvent::EventsLoaded { count }];
                events.extend(self.show_phase(Phase::Events));
                events
            }
            Err(err) => vec![UiEvent::Error(UiError::from_client_error(
                UiErrorContext::EventDiscovery,
                &err,
            ))],
        }
    }

    async fn discover_attendees(&mut self, criteria: AttendeeCriteria) -> Vec<UiEvent> {
        match discovery::discover_attendees(self.api.as_ref(), &criteria).await {
            Ok(found) => {
                let count = found.len();
                self.controller.store_mut().set_attendees(found);
                let mut events = vec![UiEvent::AttendeesLoaded {
                    event_name: criteria.event_name.trim().to_string(),
                    count,
                }];
                events.extend(self.show_phase(Phase::Attendees));
                events.push(self.selection_changed());
                events
            }
            Err(err) => vec![UiEvent::Error(UiError::from_client_error(
                UiErrorContext::AttendeeDiscovery,
                &err,
            ))],
        }
    }

    async fn choose_event(&mut self, position: usize) -> Vec<UiEvent> {
        let chosen = position
            .checked_sub(1)
            .and_then(|idx| self.controller.store().events().get(idx));
        let Some(event) = chosen else {
            return vec![UiEvent::Error(UiError::validation(
                UiErrorContext::AttendeeDiscovery,
                format!(
                    "no event #{position}; {} events discovered",
                    self.controller.store().events().len()
                ),
            ))];
        };
        let criteria = AttendeeCriteria::for_event(event, self.default_max_results);
        self.discover_attendees(criteria).await
    }

    fn toggle(&mut self, username: &Username) -> Vec<UiEvent> {
        match self.controller.store_mut().toggle(username.as_str()) {
            Ok(_) => vec![self.selection_changed()],
            Err(err) => vec![UiEvent::Error(UiError::from_client_error(
                UiErrorContext::Selection,
                &err,
            ))],
        }
    }

    fn selection_changed(&self) -> UiEvent {
        let store = self.controller.store();
        UiEvent::SelectionChanged {
            selected: store.selection().size(),
            total: store.attendees().len(),
            state: store.select_all_state(),
        }
    }

    fn send_selected(&mut self) -> Vec<UiEvent> {
        match self.controller.send_selected_to_notifications() {
            Ok((outcome, view)) => {
                info!(
                    added = outcome.added,
                    already_queued = outcome.already_queued,
                    "selection sent to notifications"
                );
                vec![
                    UiEvent::Enqueued(outcome),
                    UiEvent::PhaseChanged(Phase::Notifications),
                    UiEvent::NotificationsRendered(view),
                ]
            }
            Err(err) => vec![UiEvent::Error(UiError::from_client_error(
                UiErrorContext::SendToNotifications,
                &err,
            ))],
        }
    }

    fn dequeue(&mut self, username: &Username) -> Vec<UiEvent> {
        if !self.controller.store_mut().dequeue(username.as_str()) {
            return vec![UiEvent::Error(UiError::validation(
                UiErrorContext::General,
                format!("'{username}' is not queued"),
            ))];
        }
        let mut events = vec![self.selection_changed()];
        if self.controller.phase() == Phase::Notifications {
            events.push(UiEvent::NotificationsRendered(
                self.controller.notifications_view(),
            ));
        }
        events
    }

    async fn dispatch(&mut self, choice: ActionChoice) -> Vec<UiEvent> {
        let snapshot = match self.controller.begin_dispatch() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                return vec![UiEvent::Error(UiError::from_client_error(
                    UiErrorContext::Dispatch,
                    &err,
                ))]
            }
        };

        let result = self.dispatcher.dispatch(&choice, &snapshot).await;
        let view = self.controller.finish_dispatch(result.as_ref().ok());

        match result {
            Ok(outcome) => {
                let unmatched = outcome.summary.unmatched;
                let mut events = vec![UiEvent::DispatchCompleted(outcome.summary)];
                if unmatched > 0 {
                    events.push(UiEvent::Info(format!(
                        "{unmatched} entries got no result from the service and stay pending"
                    )));
                }
                events.push(UiEvent::NotificationsRendered(view));
                events
            }
            Err(err) => vec![UiEvent::Error(UiError::from_client_error(
                UiErrorContext::Dispatch,
                &err,
            ))],
        }
    }

    async fn check_health(&self) -> Vec<UiEvent> {
        match self.api.health().await {
            Ok(health) => vec![UiEvent::Health(HealthSnapshot::from(health))],
            Err(err) => vec![UiEvent::Error(UiError::from_client_error(
                UiErrorContext::Health,
                &err,
            ))],
        }
    }

    async fn check_auth(&self) -> Vec<UiEvent> {
        match self.api.auth_status().await {
            Ok(status) => vec![UiEvent::AuthStatus(status)],
            Err(err) => vec![UiEvent::Error(UiError::from_client_error(
                UiErrorContext::Health,
                &err,
            ))],
        }
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
