//! Remote collaborator surface of the scheduling service.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use shared::{
    domain::{EmployeeRecord, ScheduleEntry, UserProfile},
    protocol::{
        GenerateScheduleRequest, LoginRequest, LoginResponse, MutationResponse, NewEmployeeRequest,
    },
};

use crate::error::{AuthError, FetchError};

/// The service's exposed operations. Business logic (credential checks, the
/// solver, persistence) lives server-side; tests substitute doubles.
#[async_trait]
pub trait SchedulerApi: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<UserProfile, AuthError>;
    async fn fetch_schedules(&self, username: &str) -> Result<Vec<ScheduleEntry>, FetchError>;
    async fn fetch_employees(&self) -> Result<Vec<EmployeeRecord>, FetchError>;
    async fn generate_schedule(
        &self,
        request: &GenerateScheduleRequest,
    ) -> Result<MutationResponse, FetchError>;
    async fn create_employee(
        &self,
        request: &NewEmployeeRequest,
    ) -> Result<MutationResponse, FetchError>;
}

pub struct HttpSchedulerApi {
    http: Client,
    base_url: String,
}

impl HttpSchedulerApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl SchedulerApi for HttpSchedulerApi {
    async fn authenticate(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        let response = self
            .http
            .post(format!("{}/api/login", self.base_url))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|err| AuthError::Unreachable(err.to_string()))?;

        let status = response.status();
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Unreachable(err.to_string()))?;

        match body.user {
            Some(user) if body.success => Ok(user),
            _ => {
                debug!(%status, "login rejected by service");
                Err(AuthError::invalid_credentials(body.message))
            }
        }
    }

    async fn fetch_schedules(&self, username: &str) -> Result<Vec<ScheduleEntry>, FetchError> {
        let response = self
            .http
            .get(format!("{}/api/schedules/{username}", self.base_url))
            .send()
            .await
            .map_err(|err| FetchError::Unreachable(err.to_string()))?;
        let response = check_fetch_status(response)?;
        response
            .json()
            .await
            .map_err(|err| FetchError::Unreachable(err.to_string()))
    }

    async fn fetch_employees(&self) -> Result<Vec<EmployeeRecord>, FetchError> {
        let response = self
            .http
            .get(format!("{}/api/employees", self.base_url))
            .send()
            .await
            .map_err(|err| FetchError::Unreachable(err.to_string()))?;
        let response = check_fetch_status(response)?;
        response
            .json()
            .await
            .map_err(|err| FetchError::Unreachable(err.to_string()))
    }

    async fn generate_schedule(
        &self,
        request: &GenerateScheduleRequest,
    ) -> Result<MutationResponse, FetchError> {
        let response = self
            .http
            .post(format!("{}/api/generate-schedule", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|err| FetchError::Unreachable(err.to_string()))?;
        read_mutation_response(response).await
    }

    async fn create_employee(
        &self,
        request: &NewEmployeeRequest,
    ) -> Result<MutationResponse, FetchError> {
        let response = self
            .http
            .post(format!("{}/api/employees", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|err| FetchError::Unreachable(err.to_string()))?;
        read_mutation_response(response).await
    }
}

fn check_fetch_status(response: Response) -> Result<Response, FetchError> {
    match response.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Unauthorized),
        status if status.is_success() => Ok(response),
        status => Err(FetchError::Unreachable(format!("unexpected status {status}"))),
    }
}

/// Mutating endpoints answer `{success, message}` on 2xx and on business
/// rejections (4xx with a body); only transport-level trouble is an error.
async fn read_mutation_response(response: Response) -> Result<MutationResponse, FetchError> {
    let status = response.status();
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(FetchError::Unauthorized);
    }
    response
        .json()
        .await
        .map_err(|err| FetchError::Unreachable(format!("unexpected response ({status}): {err}")))
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
