//! Translation between the internal registration vocabulary and the meeting
//! platform's registrant vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::RegistrationStatus;

/// Registrant status as the meeting platform spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalStatus {
    Approved,
    Pending,
    Denied,
}

impl ExternalStatus {
    /// Bucket order used when enumerating registrants on the platform.
    pub const fn ordered() -> [Self; 3] {
        [Self::Approved, Self::Pending, Self::Denied]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for ExternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExternalStatus {
    type Err = UnmappedStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == value.trim())
            .ok_or_else(|| UnmappedStatus::new(value))
    }
}

/// A status value outside the closed three-value vocabularies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status '{value}' has no mapping")]
pub struct UnmappedStatus {
    pub value: String,
}

impl UnmappedStatus {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

pub const fn to_external(status: RegistrationStatus) -> ExternalStatus {
    match status {
        RegistrationStatus::Approved => ExternalStatus::Approved,
        RegistrationStatus::Waitlisted => ExternalStatus::Pending,
        RegistrationStatus::Rejected => ExternalStatus::Denied,
    }
}

pub const fn to_internal(status: ExternalStatus) -> RegistrationStatus {
    match status {
        ExternalStatus::Approved => RegistrationStatus::Approved,
        ExternalStatus::Pending => RegistrationStatus::Waitlisted,
        ExternalStatus::Denied => RegistrationStatus::Rejected,
    }
}

/// Parses a raw platform label straight into the internal vocabulary.
pub fn internal_from_external_label(label: &str) -> Result<RegistrationStatus, UnmappedStatus> {
    label.parse::<ExternalStatus>().map(to_internal)
}

/// Renders an internal status as the platform label it maps to.
pub fn external_label(status: RegistrationStatus) -> &'static str {
    to_external(status).label()
}
