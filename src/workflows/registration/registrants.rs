use std::sync::Arc;

use tracing::info;

use super::domain::{RegistrationId, RegistrationRecord, RegistrationStatus, WorkshopId};
use super::repository::{RegistrationRepo, RepositoryError};

/// Receives the registrant list of a single workshop.
pub trait RegistrantsPresenter {
    fn show_registrants(&self, workshop_id: &WorkshopId, registrations: &[RegistrationRecord]);
}

/// Operator-facing use cases on individual registrations.
pub struct RegistrantWorkflows<R: ?Sized> {
    registration_repo: Arc<R>,
}

impl<R> RegistrantWorkflows<R>
where
    R: RegistrationRepo + ?Sized,
{
    pub fn new(registration_repo: Arc<R>) -> Self {
        Self { registration_repo }
    }

    pub fn registrants(
        &self,
        workshop_id: &WorkshopId,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        self.registration_repo.get_registrations(workshop_id)
    }

    pub fn list_registrants<P>(
        &self,
        workshop_id: &WorkshopId,
        presenter: &P,
    ) -> Result<(), RepositoryError>
    where
        P: RegistrantsPresenter + ?Sized,
    {
        let registrations = self.registrants(workshop_id)?;
        presenter.show_registrants(workshop_id, &registrations);
        Ok(())
    }

    /// Moves one registration to `new_status`.
    ///
    /// The mutation is issued even when the registration already has `new_status`.
    pub fn update_registration_status(
        &self,
        registration_id: &RegistrationId,
        workshop_id: &WorkshopId,
        new_status: RegistrationStatus,
    ) -> Result<(), RepositoryError> {
        let registration = self
            .registration_repo
            .get_registrations(workshop_id)?
            .into_iter()
            .find(|record| &record.id == registration_id)
            .ok_or_else(|| RepositoryError::RegistrationNotFound {
                workshop_id: workshop_id.clone(),
                registration_id: registration_id.clone(),
            })?;

        info!(
            %registration_id,
            %workshop_id,
            from = %registration.status,
            to = %new_status,
            "changing registration status"
        );
        self.registration_repo
            .change_registration_status(&registration, new_status)
    }
}
