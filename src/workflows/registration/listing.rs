use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::domain::{RegistrationRecord, RegistrationStatus, WorkshopId, WorkshopRecord};
use super::repository::{RegistrationRepo, RepositoryError, WorkshopRepo};

/// Receives the workshop overview once it has been computed.
pub trait ListWorkshopsPresenter {
    fn show(&self, upcoming_workshops: &[WorkshopRegistrationSummary]);
}

/// Capacity and occupancy of one workshop, computed from its registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkshopRegistrationSummary {
    pub id: WorkshopId,
    pub link: String,
    pub title: String,
    pub date: String,
    pub capacity: u32,
    pub num_approved: u32,
    pub num_waitlisted: u32,
    pub num_rejected: u32,
    /// Negative when approvals exceed capacity.
    pub num_free_spots: i64,
}

impl WorkshopRegistrationSummary {
    pub fn tally(workshop: &WorkshopRecord, registrations: &[RegistrationRecord]) -> Self {
        let count = |status: RegistrationStatus| {
            registrations
                .iter()
                .filter(|registration| registration.status == status)
                .count() as u32
        };
        let num_approved = count(RegistrationStatus::Approved);

        Self {
            id: workshop.id.clone(),
            link: workshop.link.clone(),
            title: workshop.title.clone(),
            date: workshop.date.clone(),
            capacity: workshop.capacity,
            num_approved,
            num_waitlisted: count(RegistrationStatus::Waitlisted),
            num_rejected: count(RegistrationStatus::Rejected),
            num_free_spots: i64::from(workshop.capacity) - i64::from(num_approved),
        }
    }

    pub fn total_registrations(&self) -> u32 {
        self.num_approved + self.num_waitlisted + self.num_rejected
    }
}

/// Builds the per-workshop occupancy overview for upcoming workshops.
pub struct ListWorkshopsWorkflow<W: ?Sized, R: ?Sized> {
    workshop_repo: Arc<W>,
    registration_repo: Arc<R>,
}

impl<W, R> ListWorkshopsWorkflow<W, R>
where
    W: WorkshopRepo + ?Sized,
    R: RegistrationRepo + ?Sized,
{
    pub fn new(workshop_repo: Arc<W>, registration_repo: Arc<R>) -> Self {
        Self {
            workshop_repo,
            registration_repo,
        }
    }

    /// One summary per upcoming workshop, in the order the workshop repo returned them.
    ///
    /// A failure fetching any workshop's registrations aborts the whole listing.
    pub fn summarize_upcoming_workshops(
        &self,
    ) -> Result<Vec<WorkshopRegistrationSummary>, RepositoryError> {
        let workshops = self.workshop_repo.get_upcoming_workshops()?;
        debug!(count = workshops.len(), "fetched upcoming workshops");

        workshops
            .iter()
            .map(|workshop| {
                let registrations = self.registration_repo.get_registrations(&workshop.id)?;
                debug!(
                    workshop_id = %workshop.id,
                    registrations = registrations.len(),
                    "fetched workshop registrations"
                );
                Ok(WorkshopRegistrationSummary::tally(workshop, &registrations))
            })
            .collect()
    }

    pub fn check_upcoming_workshops<P>(&self, presenter: &P) -> Result<(), RepositoryError>
    where
        P: ListWorkshopsPresenter + ?Sized,
    {
        let summaries = self.summarize_upcoming_workshops()?;
        presenter.show(&summaries);
        Ok(())
    }
}
