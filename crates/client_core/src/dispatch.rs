//! External trigger surface: one [`Action`] per markup-level trigger, so
//! shells stay decoupled from component identities.

use std::sync::Arc;

use tracing::{debug, warn};

use shared::{domain::Role, protocol::NewEmployeeRequest};

use crate::{error::AuthError, format, notify::ErrorSlot, SchedulerClient, View};

/// Shown in the login slot when the service cannot be reached at all.
const LOGIN_RETRY_MESSAGE: &str = "Login failed. Please try again.";

#[derive(Debug, Clone)]
pub enum Action {
    SubmitLogin { username: String, password: String },
    Logout,
    Navigate(View),
    SubmitProfile(ProfileUpdate),
    GenerateSchedule,
    EditEmployee { username: String },
    AddEmployee(NewEmployee),
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl NewEmployee {
    pub(crate) fn into_request(self) -> NewEmployeeRequest {
        NewEmployeeRequest {
            name: format::full_name(&self.first_name, &self.last_name),
            username: self.username,
            email: self.email,
            phone: self.phone,
            password: self.password,
        }
    }
}

impl SchedulerClient {
    /// Entry point for the trigger-binding layer. Component failures are
    /// recovered here into slots and notices; dispatch itself never fails.
    /// Admin-only actions are dropped for non-admin sessions before any
    /// component runs (the router and sync controller gate again themselves).
    pub async fn dispatch(self: &Arc<Self>, action: Action) {
        match action {
            Action::SubmitLogin { username, password } => {
                let username = username.trim().to_string();
                match self.authenticate(&username, &password).await {
                    Ok(_) => {}
                    Err(err @ AuthError::InvalidCredentials { .. }) => {
                        self.notifications()
                            .set_slot_error(ErrorSlot::Login, err.to_string())
                            .await;
                    }
                    Err(AuthError::Unreachable(_)) => {
                        self.notifications()
                            .set_slot_error(ErrorSlot::Login, LOGIN_RETRY_MESSAGE)
                            .await;
                    }
                }
            }
            Action::Logout => self.end_session().await,
            Action::Navigate(target) => {
                self.navigate_to(target).await;
            }
            Action::SubmitProfile(update) => {
                if self.update_profile(update).await.is_some() {
                    self.notifications()
                        .notify_success("Profile updated successfully!")
                        .await;
                } else {
                    debug!("profile update ignored: no active session");
                }
            }
            Action::GenerateSchedule => {
                if self.require_admin("generate-schedule").await {
                    self.generate_schedule().await;
                }
            }
            Action::EditEmployee { username } => {
                if self.require_admin("edit-employee").await {
                    self.notifications()
                        .notify_success(format!("Editing {username} is not yet available"))
                        .await;
                }
            }
            Action::AddEmployee(employee) => {
                if self.require_admin("add-employee").await {
                    self.add_employee(employee).await;
                }
            }
        }
    }

    async fn require_admin(&self, operation: &str) -> bool {
        let authorized = self.current_role().await.is_some_and(Role::is_admin);
        if !authorized {
            warn!(operation, "dropped admin-only action for non-admin session");
        }
        authorized
    }
}
