use std::cell::RefCell;
use std::sync::Mutex;

use crate::workflows::registration::domain::{
    CustomAnswer, RegistrationId, RegistrationRecord, RegistrationStatus, WorkshopId,
    WorkshopRecord,
};
use crate::workflows::registration::listing::{
    ListWorkshopsPresenter, WorkshopRegistrationSummary,
};
use crate::workflows::registration::registrants::RegistrantsPresenter;
use crate::workflows::registration::repository::{
    RegistrationRepo, RepositoryError, WorkshopRepo,
};

pub(super) fn workshop(id: &str, capacity: u32) -> WorkshopRecord {
    WorkshopRecord {
        id: WorkshopId::from(id),
        link: format!("https://zoom.example/meeting/register/{id}"),
        title: format!("Intro to Data Analysis ({id})"),
        date: "2023-10-02T09:00:00Z".to_string(),
        capacity,
    }
}

pub(super) fn registration(
    id: &str,
    workshop_id: &str,
    status: RegistrationStatus,
) -> RegistrationRecord {
    RegistrationRecord {
        id: RegistrationId::from(id),
        workshop_id: WorkshopId::from(workshop_id),
        name: format!("Registrant {id}"),
        email: format!("{id}@example.org"),
        registered_on: "25092023".to_string(),
        custom_questions: vec![CustomAnswer {
            title: "Group".to_string(),
            value: "Prof. Sangee".to_string(),
        }],
        status,
    }
}

pub(super) fn registrations(
    workshop_id: &str,
    statuses: &[RegistrationStatus],
) -> Vec<RegistrationRecord> {
    statuses
        .iter()
        .enumerate()
        .map(|(index, status)| registration(&format!("{workshop_id}-{index}"), workshop_id, *status))
        .collect()
}

#[derive(Default)]
pub(super) struct RecordingPresenter {
    pub(super) calls: RefCell<Vec<Vec<WorkshopRegistrationSummary>>>,
    pub(super) registrant_calls: RefCell<Vec<(WorkshopId, Vec<RegistrationRecord>)>>,
}

impl ListWorkshopsPresenter for RecordingPresenter {
    fn show(&self, upcoming_workshops: &[WorkshopRegistrationSummary]) {
        self.calls.borrow_mut().push(upcoming_workshops.to_vec());
    }
}

impl RegistrantsPresenter for RecordingPresenter {
    fn show_registrants(&self, workshop_id: &WorkshopId, registrations: &[RegistrationRecord]) {
        self.registrant_calls
            .borrow_mut()
            .push((workshop_id.clone(), registrations.to_vec()));
    }
}

/// Registration repo whose reads fail for one workshop.
pub(super) struct UnavailableFor {
    pub(super) workshop_id: WorkshopId,
    pub(super) inner: crate::workflows::registration::memory::InMemoryRegistrationRepo,
}

impl RegistrationRepo for UnavailableFor {
    fn get_registrations(
        &self,
        workshop_id: &WorkshopId,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        if workshop_id == &self.workshop_id {
            return Err(RepositoryError::RemoteUnavailable(
                "connection reset".to_string(),
            ));
        }
        self.inner.get_registrations(workshop_id)
    }

    fn change_registration_status(
        &self,
        registration: &RegistrationRecord,
        new_status: RegistrationStatus,
    ) -> Result<(), RepositoryError> {
        self.inner.change_registration_status(registration, new_status)
    }
}

/// Registration repo that records every mutation instead of applying it.
#[derive(Default)]
pub(super) struct MutationLog {
    pub(super) records: Vec<RegistrationRecord>,
    pub(super) mutations: Mutex<Vec<(RegistrationId, RegistrationStatus)>>,
}

impl MutationLog {
    pub(super) fn mutations(&self) -> Vec<(RegistrationId, RegistrationStatus)> {
        self.mutations.lock().expect("mutation mutex poisoned").clone()
    }
}

impl RegistrationRepo for MutationLog {
    fn get_registrations(
        &self,
        workshop_id: &WorkshopId,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        Ok(self
            .records
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
        self.mutations
            .lock()
            .expect("mutation mutex poisoned")
            .push((registration.id.clone(), new_status));
        Ok(())
    }
}

/// Workshop repo that is never reachable.
pub(super) struct OfflineWorkshops;

impl WorkshopRepo for OfflineWorkshops {
    fn get_upcoming_workshops(&self) -> Result<Vec<WorkshopRecord>, RepositoryError> {
        Err(RepositoryError::RemoteUnavailable("dns failure".to_string()))
    }
}
