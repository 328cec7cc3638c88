//! Client-side state machine for the shift-scheduling service: session
//! lifecycle, view routing, and per-view data synchronization against the
//! remote API. Rendering is decoupled behind the [`ClientEvent`] stream plus
//! snapshot accessors; shells subscribe and draw, tests inspect.

use std::sync::Arc;

use shared::{
    domain::{EmployeeRecord, Role, ScheduleEntry, UserProfile},
    protocol::GenerateScheduleRequest,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod api;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod notify;

pub use api::{HttpSchedulerApi, SchedulerApi};
pub use dispatch::{Action, NewEmployee, ProfileUpdate};
pub use error::{AuthError, FetchError, ValidationError};
pub use notify::{ErrorSlot, NotificationCenter, TransientNotice, TRANSIENT_DISMISS_DELAY};

/// Inline placeholders shown when a fetch fails.
const SCHEDULES_FETCH_FAILED: &str = "Error loading schedules";
const EMPLOYEES_FETCH_FAILED: &str = "Error loading employees";

/// The mutually exclusive top-level screens. Exactly one is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Home,
    Schedules,
    Employees,
    Profile,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Login => "login",
            View::Home => "home",
            View::Schedules => "schedules",
            View::Employees => "employees",
            View::Profile => "profile",
        }
    }
}

/// Render state of one data-bearing view. `Empty` (a successful fetch with
/// zero rows) renders the no-data placeholder; `Failed` renders the inline
/// error placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData<T> {
    Idle,
    Empty,
    Rows(Vec<T>),
    Failed(String),
}

/// One schedule line, fully formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub date: String,
    pub day: String,
    pub time_range: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    SessionEstablished { profile: UserProfile },
    SessionUpdated { profile: UserProfile },
    SessionCleared,
    ViewChanged { from: View, to: View },
    ScheduleDataChanged(ViewData<ScheduleRow>),
    EmployeeDataChanged(ViewData<EmployeeRow>),
    SlotErrorChanged { slot: ErrorSlot, message: Option<String> },
    NoticePosted { id: u64, message: String },
    NoticeExpired { id: u64 },
}

struct ClientState {
    session: Option<UserProfile>,
    current_view: View,
    schedule_rows: ViewData<ScheduleRow>,
    employee_rows: ViewData<EmployeeRow>,
    // Per-view fetch generations: a load captures the value it bumped to and
    // may only commit while it is still the newest.
    schedules_epoch: u64,
    employees_epoch: u64,
}

impl ClientState {
    fn new() -> Self {
        Self {
            session: None,
            current_view: View::Login,
            schedule_rows: ViewData::Idle,
            employee_rows: ViewData::Idle,
            schedules_epoch: 0,
            employees_epoch: 0,
        }
    }

    fn is_admin(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|profile| profile.role.is_admin())
    }

    /// Drops per-session render state and invalidates in-flight fetches.
    fn reset_view_data(&mut self) {
        self.schedule_rows = ViewData::Idle;
        self.employee_rows = ViewData::Idle;
        self.schedules_epoch += 1;
        self.employees_epoch += 1;
    }
}

pub struct SchedulerClient {
    api: Arc<dyn SchedulerApi>,
    inner: Mutex<ClientState>,
    notifications: NotificationCenter,
    events: broadcast::Sender<ClientEvent>,
}

impl SchedulerClient {
    pub fn new(api: Arc<dyn SchedulerApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            inner: Mutex::new(ClientState::new()),
            notifications: NotificationCenter::new(events.clone()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub async fn current_view(&self) -> View {
        self.inner.lock().await.current_view
    }

    pub async fn current_role(&self) -> Option<Role> {
        self.inner
            .lock()
            .await
            .session
            .as_ref()
            .map(|profile| profile.role)
    }

    pub async fn session(&self) -> Option<UserProfile> {
        self.inner.lock().await.session.clone()
    }

    pub async fn schedule_data(&self) -> ViewData<ScheduleRow> {
        self.inner.lock().await.schedule_rows.clone()
    }

    pub async fn employee_data(&self) -> ViewData<EmployeeRow> {
        self.inner.lock().await.employee_rows.clone()
    }

    /// Exchanges credentials with the service. On success the session is
    /// stored, stale view data is dropped and the router lands on `home`;
    /// on any failure the session and view are left exactly as they were.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let profile = self.api.authenticate(username, password).await?;
        let from = {
            let mut state = self.inner.lock().await;
            let from = state.current_view;
            state.session = Some(profile.clone());
            state.current_view = View::Home;
            state.reset_view_data();
            from
        };
        self.notifications.clear_slot_error(ErrorSlot::Login).await;
        info!(
            username = profile.username.as_str(),
            role = profile.role.as_str(),
            "session established"
        );
        self.emit(ClientEvent::SessionEstablished {
            profile: profile.clone(),
        });
        self.emit(ClientEvent::ViewChanged {
            from,
            to: View::Home,
        });
        Ok(profile)
    }

    /// Clears the session unconditionally and routes back to `login`.
    /// Calling with no active session is a no-op, not an error.
    pub async fn end_session(&self) {
        let (had_session, from) = {
            let mut state = self.inner.lock().await;
            let had_session = state.session.take().is_some();
            let from = state.current_view;
            state.current_view = View::Login;
            state.reset_view_data();
            (had_session, from)
        };
        self.notifications.clear_slot_error(ErrorSlot::Login).await;
        self.notifications
            .clear_slot_error(ErrorSlot::General)
            .await;
        if had_session {
            info!("session cleared");
            self.emit(ClientEvent::SessionCleared);
        }
        if from != View::Login {
            self.emit(ClientEvent::ViewChanged {
                from,
                to: View::Login,
            });
        }
    }

    /// Local profile edit: mutates the four editable fields atomically and
    /// returns the updated profile, or `None` when no session is active.
    /// Nothing is persisted remotely.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Option<UserProfile> {
        let updated = {
            let mut state = self.inner.lock().await;
            let profile = state.session.as_mut()?;
            profile.first_name = update.first_name;
            profile.last_name = update.last_name;
            profile.email = update.email;
            profile.phone = update.phone;
            profile.clone()
        };
        info!(username = updated.username.as_str(), "profile updated locally");
        self.emit(ClientEvent::SessionUpdated {
            profile: updated.clone(),
        });
        Some(updated)
    }

    /// Moves to `target`, or to the closest view the session is allowed to
    /// see: anonymous sessions land on `login`, non-admins asking for
    /// `employees` land on `home`. Returns the view actually shown. Entering
    /// a data-bearing view always issues exactly one fresh load.
    pub async fn navigate_to(self: &Arc<Self>, target: View) -> View {
        let (from, resolved) = {
            let mut state = self.inner.lock().await;
            let resolved = match target {
                View::Login => View::Login,
                _ if state.session.is_none() => View::Login,
                View::Employees if !state.is_admin() => View::Home,
                other => other,
            };
            let from = state.current_view;
            state.current_view = resolved;
            (from, resolved)
        };
        if resolved != target {
            debug!(
                requested = target.as_str(),
                shown = resolved.as_str(),
                "navigation redirected"
            );
        }
        if from != resolved {
            self.emit(ClientEvent::ViewChanged { from, to: resolved });
        }
        match resolved {
            View::Schedules => {
                let client = Arc::clone(self);
                tokio::spawn(async move { client.load_schedules().await });
            }
            View::Employees => {
                let client = Arc::clone(self);
                tokio::spawn(async move { client.load_employees().await });
            }
            _ => {}
        }
        resolved
    }

    /// Fetches the session's schedule collection and commits it to the
    /// schedules surface, unless a newer load was issued in the meantime.
    pub async fn load_schedules(&self) {
        let issued = {
            let mut state = self.inner.lock().await;
            let username = state
                .session
                .as_ref()
                .map(|profile| profile.username.clone());
            username.map(|username| {
                state.schedules_epoch += 1;
                (username, state.schedules_epoch)
            })
        };
        let Some((username, ticket)) = issued else {
            debug!("schedule load skipped: no active session");
            return;
        };

        debug!(username = username.as_str(), ticket, "schedule fetch issued");
        let outcome = match self.api.fetch_schedules(&username).await {
            Ok(entries) => build_schedule_view(&entries),
            Err(err) => {
                warn!(username = username.as_str(), error = %err, "schedule fetch failed");
                ViewData::Failed(SCHEDULES_FETCH_FAILED.to_string())
            }
        };
        self.commit_schedules(ticket, outcome).await;
    }

    /// Admin-only: fetches the employee roster. Non-admin sessions are
    /// refused before any request is issued.
    pub async fn load_employees(&self) {
        let ticket = {
            let mut state = self.inner.lock().await;
            let role = state.session.as_ref().map(|profile| profile.role);
            match role {
                Some(role) if role.is_admin() => {
                    state.employees_epoch += 1;
                    Some(state.employees_epoch)
                }
                Some(_) => {
                    warn!("employee load refused: requires admin role");
                    None
                }
                None => {
                    debug!("employee load skipped: no active session");
                    None
                }
            }
        };
        let Some(ticket) = ticket else { return };

        debug!(ticket, "employee fetch issued");
        let outcome = match self.api.fetch_employees().await {
            Ok(records) => build_employee_view(&records),
            Err(err) => {
                warn!(error = %err, "employee fetch failed");
                ViewData::Failed(EMPLOYEES_FETCH_FAILED.to_string())
            }
        };
        self.commit_employees(ticket, outcome).await;
    }

    /// Admin-only: asks the service to solve next week's staffing with the
    /// stock constraints. Success is acknowledged transiently and refreshes
    /// the schedules surface when it is on screen; rejections land in the
    /// general error slot.
    pub async fn generate_schedule(self: &Arc<Self>) {
        if !self.inner.lock().await.is_admin() {
            warn!("schedule generation refused: requires admin role");
            return;
        }
        match self
            .api
            .generate_schedule(&GenerateScheduleRequest::default_weekly())
            .await
        {
            Ok(ack) if ack.success => {
                let message = ack
                    .message
                    .unwrap_or_else(|| "Schedules generated successfully".to_string());
                info!("schedule generation accepted");
                self.notifications
                    .clear_slot_error(ErrorSlot::General)
                    .await;
                self.notifications.notify_success(message).await;
                if self.current_view().await == View::Schedules {
                    let client = Arc::clone(self);
                    tokio::spawn(async move { client.load_schedules().await });
                }
            }
            Ok(ack) => {
                let message = ack
                    .message
                    .unwrap_or_else(|| "No feasible schedule found".to_string());
                warn!(message = message.as_str(), "schedule generation rejected");
                self.notifications
                    .set_slot_error(ErrorSlot::General, message)
                    .await;
            }
            Err(err) => {
                warn!(error = %err, "schedule generation failed");
                self.notifications
                    .set_slot_error(ErrorSlot::General, "Failed to generate schedule")
                    .await;
            }
        }
    }

    /// Admin-only: registers a new employee with the service and refreshes
    /// the roster surface when it is on screen.
    pub async fn add_employee(self: &Arc<Self>, employee: NewEmployee) {
        if !self.inner.lock().await.is_admin() {
            warn!("employee creation refused: requires admin role");
            return;
        }
        let request = employee.into_request();
        match self.api.create_employee(&request).await {
            Ok(ack) if ack.success => {
                info!(username = request.username.as_str(), "employee created");
                self.notifications
                    .notify_success(format!("Employee {} added", request.username))
                    .await;
                if self.current_view().await == View::Employees {
                    let client = Arc::clone(self);
                    tokio::spawn(async move { client.load_employees().await });
                }
            }
            Ok(ack) => {
                let message = ack
                    .message
                    .unwrap_or_else(|| "Failed to add employee".to_string());
                warn!(
                    username = request.username.as_str(),
                    message = message.as_str(),
                    "employee creation rejected"
                );
                self.notifications
                    .set_slot_error(ErrorSlot::General, message)
                    .await;
            }
            Err(err) => {
                warn!(username = request.username.as_str(), error = %err, "employee creation failed");
                self.notifications
                    .set_slot_error(ErrorSlot::General, "Failed to add employee")
                    .await;
            }
        }
    }

    async fn commit_schedules(&self, ticket: u64, outcome: ViewData<ScheduleRow>) {
        let committed = {
            let mut state = self.inner.lock().await;
            if state.schedules_epoch == ticket {
                state.schedule_rows = outcome.clone();
                true
            } else {
                false
            }
        };
        if committed {
            self.emit(ClientEvent::ScheduleDataChanged(outcome));
        } else {
            debug!(ticket, "stale schedule fetch discarded");
        }
    }

    async fn commit_employees(&self, ticket: u64, outcome: ViewData<EmployeeRow>) {
        let committed = {
            let mut state = self.inner.lock().await;
            if state.employees_epoch == ticket {
                state.employee_rows = outcome.clone();
                true
            } else {
                false
            }
        };
        if committed {
            self.emit(ClientEvent::EmployeeDataChanged(outcome));
        } else {
            debug!(ticket, "stale employee fetch discarded");
        }
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}

fn build_schedule_view(entries: &[ScheduleEntry]) -> ViewData<ScheduleRow> {
    if entries.is_empty() {
        return ViewData::Empty;
    }
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        match format::schedule_row(entry) {
            Ok(row) => rows.push(row),
            Err(err) => {
                warn!(date = entry.date.as_str(), error = %err, "rejecting malformed schedule entry");
                return ViewData::Failed(SCHEDULES_FETCH_FAILED.to_string());
            }
        }
    }
    ViewData::Rows(rows)
}

fn build_employee_view(records: &[EmployeeRecord]) -> ViewData<EmployeeRow> {
    if records.is_empty() {
        return ViewData::Empty;
    }
    ViewData::Rows(records.iter().map(format::employee_row).collect())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
