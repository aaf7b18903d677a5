use std::sync::Mutex;

use tracing::debug;

use super::domain::{RegistrationRecord, RegistrationStatus, WorkshopId, WorkshopRecord};
use super::repository::{RegistrationRepo, RepositoryError, WorkshopRepo};

/// Registration store held in process memory. Status changes apply immediately.
#[derive(Debug, Default)]
pub struct InMemoryRegistrationRepo {
    registrations: Mutex<Vec<RegistrationRecord>>,
}

impl InMemoryRegistrationRepo {
    pub fn new(registrations: Vec<RegistrationRecord>) -> Self {
        Self {
            registrations: Mutex::new(registrations),
        }
    }

    /// Copy of every held record, across all workshops.
    pub fn snapshot(&self) -> Vec<RegistrationRecord> {
        self.registrations
            .lock()
            .expect("registration mutex poisoned")
            .clone()
    }
}

impl RegistrationRepo for InMemoryRegistrationRepo {
    fn get_registrations(
        &self,
        workshop_id: &WorkshopId,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        let guard = self
            .registrations
            .lock()
            .expect("registration mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.workshop_id == workshop_id)
            .cloned()
            .collect())
    }

    fn change_registration_status(
        &self,
        registration: &RegistrationRecord,
        new_status: RegistrationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = self
            .registrations
            .lock()
            .expect("registration mutex poisoned");
        let stored = guard
            .iter_mut()
            .find(|record| {
                record.id == registration.id && record.workshop_id == registration.workshop_id
            })
            .ok_or_else(|| RepositoryError::registration_not_found(registration))?;

        debug!(
            registration_id = %stored.id,
            from = %stored.status,
            to = %new_status,
            "updating in-memory registration status"
        );
        stored.status = new_status;
        Ok(())
    }
}

/// Workshop store held in process memory; every held workshop counts as upcoming.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWorkshopRepo {
    workshops: Vec<WorkshopRecord>,
}

impl InMemoryWorkshopRepo {
    pub fn new(workshops: Vec<WorkshopRecord>) -> Self {
        Self { workshops }
    }
}

impl WorkshopRepo for InMemoryWorkshopRepo {
    fn get_upcoming_workshops(&self) -> Result<Vec<WorkshopRecord>, RepositoryError> {
        Ok(self.workshops.clone())
    }
}
