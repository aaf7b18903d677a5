use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::status::UnmappedStatus;

/// Identifier of a workshop occurrence, as assigned by the meeting platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkshopId(pub String);

impl WorkshopId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkshopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkshopId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque registrant identifier assigned by the meeting platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub String);

impl RegistrationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegistrationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Internal registration status. Exactly three values are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Approved,
    Waitlisted,
    Rejected,
}

impl RegistrationStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Approved, Self::Waitlisted, Self::Rejected]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Waitlisted => "waitlisted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RegistrationStatus {
    type Err = UnmappedStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == value.trim())
            .ok_or_else(|| UnmappedStatus::new(value))
    }
}

/// Free-form answer to one of the platform's custom registration questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAnswer {
    #[serde(default)]
    pub title: String,
    pub value: String,
}

/// One person's registration for one workshop occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: RegistrationId,
    pub workshop_id: WorkshopId,
    pub name: String,
    pub email: String,
    /// Platform formatted date, kept verbatim.
    pub registered_on: String,
    #[serde(default)]
    pub custom_questions: Vec<CustomAnswer>,
    pub status: RegistrationStatus,
}

impl RegistrationRecord {
    /// The first custom answer doubles as the registrant's group or affiliation.
    pub fn affiliation(&self) -> Option<&str> {
        self.custom_questions
            .first()
            .map(|answer| answer.value.as_str())
            .filter(|value| !value.trim().is_empty())
    }
}

/// Splits a "first last" display name on its last space.
///
/// Names with more than two tokens keep every leading token in the first name, so
/// "Mary Anne Smith" becomes ("Mary Anne", "Smith"). A single token yields an empty
/// last name.
pub fn split_full_name(name: &str) -> (String, String) {
    match name.trim().rsplit_once(' ') {
        Some((first, last)) => (first.trim_end().to_string(), last.to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}

/// Joins platform first/last name fields into the single display name.
pub fn join_full_name(first_name: &str, last_name: &str) -> String {
    [first_name.trim(), last_name.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A schedulable workshop occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopRecord {
    pub id: WorkshopId,
    pub link: String,
    pub title: String,
    pub date: String,
    pub capacity: u32,
}
