use serde::{Deserialize, Serialize};

use crate::domain::UserProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login outcome. Rejections carry `success: false` plus a human-readable
/// message; the `user` object is only present on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

/// Staffing minimums for one weekday, keyed by shift type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingMinimums {
    pub opening: u32,
    pub midday: u32,
    pub closing: u32,
}

impl StaffingMinimums {
    pub const fn uniform(count: u32) -> Self {
        Self {
            opening: count,
            midday: count,
            closing: count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStaffing {
    pub monday: StaffingMinimums,
    pub tuesday: StaffingMinimums,
    pub wednesday: StaffingMinimums,
    pub thursday: StaffingMinimums,
    pub friday: StaffingMinimums,
    pub saturday: StaffingMinimums,
    pub sunday: StaffingMinimums,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleRequest {
    pub max_shifts: u32,
    pub day_requirements: WeeklyStaffing,
}

impl GenerateScheduleRequest {
    /// The service's stock weekly demand: single coverage on quiet days,
    /// double coverage Friday and Saturday, at most five shifts per worker.
    pub fn default_weekly() -> Self {
        Self {
            max_shifts: 5,
            day_requirements: WeeklyStaffing {
                monday: StaffingMinimums::uniform(1),
                tuesday: StaffingMinimums::uniform(1),
                wednesday: StaffingMinimums::uniform(1),
                thursday: StaffingMinimums::uniform(1),
                friday: StaffingMinimums::uniform(2),
                saturday: StaffingMinimums::uniform(2),
                sunday: StaffingMinimums::uniform(1),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployeeRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Generic `{success, message}` acknowledgment used by mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_matches_service_field_names() {
        let encoded = serde_json::to_value(GenerateScheduleRequest::default_weekly())
            .expect("encode request");
        assert_eq!(encoded["maxShifts"], 5);
        assert_eq!(encoded["dayRequirements"]["friday"]["opening"], 2);
        assert_eq!(encoded["dayRequirements"]["sunday"]["closing"], 1);
    }

    #[test]
    fn login_rejection_parses_without_user() {
        let raw = r#"{"success": false, "message": "Invalid credentials"}"#;
        let response: LoginResponse = serde_json::from_str(raw).expect("parse response");
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Invalid credentials"));
        assert!(response.user.is_none());
    }
}
