use super::domain::{
    RegistrationId, RegistrationRecord, RegistrationStatus, WorkshopId, WorkshopRecord,
};
use super::status::UnmappedStatus;

/// Registration storage, decoupled from any particular meeting platform.
pub trait RegistrationRepo: Send + Sync {
    /// All registrations for the workshop, in no particular order.
    fn get_registrations(
        &self,
        workshop_id: &WorkshopId,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError>;

    fn change_registration_status(
        &self,
        registration: &RegistrationRecord,
        new_status: RegistrationStatus,
    ) -> Result<(), RepositoryError>;
}

/// Source of the workshops considered upcoming by the backing store.
pub trait WorkshopRepo: Send + Sync {
    fn get_upcoming_workshops(&self) -> Result<Vec<WorkshopRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    UnmappedStatus(#[from] UnmappedStatus),
    #[error("registration {registration_id} not found for workshop {workshop_id}")]
    RegistrationNotFound {
        workshop_id: WorkshopId,
        registration_id: RegistrationId,
    },
    #[error("remote platform unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("remote platform rejected the request: {0}")]
    RemoteRejected(String),
}

impl RepositoryError {
    pub fn registration_not_found(registration: &RegistrationRecord) -> Self {
        Self::RegistrationNotFound {
            workshop_id: registration.workshop_id.clone(),
            registration_id: registration.id.clone(),
        }
    }
}
