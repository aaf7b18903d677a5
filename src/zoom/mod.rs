//! Zoom-backed adapters for the registration ports.

mod client;
mod repo;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::workflows::registration::{
    split_full_name, CustomAnswer, ExternalStatus, RegistrationRecord,
};

pub use client::{ZoomCredentials, ZoomRestClient, DEFAULT_API_BASE_URL, DEFAULT_OAUTH_URL};
pub use repo::{ZoomRegistrationRepo, ZoomWorkshopRepo};

/// Registrant as the Zoom registrants endpoint returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomRegistrant {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "create_time", default)]
    pub registered_on: String,
    #[serde(default)]
    pub custom_questions: Vec<CustomAnswer>,
}

impl ZoomRegistrant {
    /// Rebuilds the platform shape of a registration, splitting the display name on
    /// its last space.
    pub fn from_record(record: &RegistrationRecord, status: ExternalStatus) -> Self {
        let (first_name, last_name) = split_full_name(&record.name);
        Self {
            id: record.id.0.clone(),
            first_name,
            last_name,
            email: record.email.clone(),
            status: status.label().to_string(),
            registered_on: record.registered_on.clone(),
            custom_questions: record.custom_questions.clone(),
        }
    }
}

/// Upcoming meeting summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomMeeting {
    pub id: u64,
    pub topic: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub join_url: String,
    #[serde(rename = "type", default)]
    pub meeting_type: u8,
}

impl ZoomMeeting {
    pub const SCHEDULED: u8 = 2;
    pub const RECURRING_FIXED_TIME: u8 = 8;

    pub fn is_workshop(&self) -> bool {
        matches!(
            self.meeting_type,
            Self::SCHEDULED | Self::RECURRING_FIXED_TIME
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ZoomApiError {
    #[error("zoom request failed: {0}")]
    Transport(String),
    #[error("zoom authentication failed: {0}")]
    Auth(String),
    #[error("zoom resource not found: {0}")]
    NotFound(String),
    #[error("zoom returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unable to decode zoom response: {0}")]
    Decode(String),
    #[error("zoom has no action moving a registrant to '{0}'")]
    UnsupportedTransition(ExternalStatus),
}

/// Synchronous view of the Zoom endpoints the registration adapters need.
pub trait ZoomGateway: Debug + Send + Sync {
    fn list_upcoming_meetings(&self) -> Result<Vec<ZoomMeeting>, ZoomApiError>;

    fn list_registrants(
        &self,
        meeting_id: &str,
        status: ExternalStatus,
    ) -> Result<Vec<ZoomRegistrant>, ZoomApiError>;

    fn update_registrant_status(
        &self,
        meeting_id: &str,
        registrant: &ZoomRegistrant,
        target: ExternalStatus,
    ) -> Result<(), ZoomApiError>;
}

/// Zoom prints meeting ids in groups ("860 6126 7458"); the API wants them bare.
pub fn normalize_meeting_id(meeting_id: &str) -> String {
    meeting_id.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::registration::{RegistrationId, RegistrationStatus, WorkshopId};

    #[test]
    fn registrant_deserializes_from_zoom_payload() {
        let registrant: ZoomRegistrant = serde_json::from_value(serde_json::json!({
            "id": "some_random_chars",
            "first_name": "Mo",
            "last_name": "Bashiri",
            "email": "mo@email.com",
            "status": "approved",
            "create_time": "2023-09-25T10:00:00Z",
            "custom_questions": [{"title": "Group", "value": "iBehave"}],
            "join_url": "https://zoom.example/j/1"
        }))
        .expect("payload decodes");

        assert_eq!(registrant.registered_on, "2023-09-25T10:00:00Z");
        assert_eq!(registrant.custom_questions[0].value, "iBehave");
    }

    #[test]
    fn from_record_splits_name_on_last_space() {
        let record = RegistrationRecord {
            id: RegistrationId::from("abc"),
            workshop_id: WorkshopId::from("838 4730 7377"),
            name: "Mary Anne Smith".to_string(),
            email: "mary@example.org".to_string(),
            registered_on: "26092023".to_string(),
            custom_questions: Vec::new(),
            status: RegistrationStatus::Waitlisted,
        };

        let registrant = ZoomRegistrant::from_record(&record, ExternalStatus::Pending);

        assert_eq!(registrant.first_name, "Mary Anne");
        assert_eq!(registrant.last_name, "Smith");
        assert_eq!(registrant.status, "pending");
        assert_eq!(registrant.id, "abc");
    }

    #[test]
    fn meeting_ids_lose_their_spaces() {
        assert_eq!(normalize_meeting_id("860 6126 7458"), "86061267458");
    }

    #[test]
    fn only_scheduled_and_recurring_meetings_are_workshops() {
        let meeting = |meeting_type| ZoomMeeting {
            id: 1,
            topic: "Workshop".to_string(),
            start_time: String::new(),
            join_url: String::new(),
            meeting_type,
        };
        assert!(meeting(2).is_workshop());
        assert!(meeting(8).is_workshop());
        assert!(!meeting(1).is_workshop());
        assert!(!meeting(3).is_workshop());
    }
}
