use std::sync::Arc;

use tracing::{debug, warn};

use super::{ZoomApiError, ZoomGateway, ZoomRegistrant};
use crate::workflows::registration::status::{internal_from_external_label, to_external};
use crate::workflows::registration::{
    join_full_name, ExternalStatus, RegistrationId, RegistrationRecord, RegistrationRepo,
    RegistrationStatus, RepositoryError, WorkshopId, WorkshopRecord, WorkshopRepo,
};

/// Registration port backed by Zoom registrant lists. Nothing is cached locally; every
/// read goes to the platform.
#[derive(Debug)]
pub struct ZoomRegistrationRepo<G: ?Sized> {
    gateway: Arc<G>,
}

impl<G: ZoomGateway + ?Sized> ZoomRegistrationRepo<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

fn registration_from_registrant(
    workshop_id: &WorkshopId,
    registrant: ZoomRegistrant,
) -> Result<RegistrationRecord, RepositoryError> {
    let status = internal_from_external_label(&registrant.status)?;
    Ok(RegistrationRecord {
        id: RegistrationId(registrant.id),
        workshop_id: workshop_id.clone(),
        name: join_full_name(&registrant.first_name, &registrant.last_name),
        email: registrant.email,
        registered_on: registrant.registered_on,
        custom_questions: registrant.custom_questions,
        status,
    })
}

impl<G: ZoomGateway + ?Sized> RegistrationRepo for ZoomRegistrationRepo<G> {
    fn get_registrations(
        &self,
        workshop_id: &WorkshopId,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        let mut records = Vec::new();
        for bucket in ExternalStatus::ordered() {
            let registrants = self
                .gateway
                .list_registrants(workshop_id.as_str(), bucket)
                .map_err(remote_error)?;
            debug!(%workshop_id, %bucket, count = registrants.len(), "fetched zoom registrants");

            for registrant in registrants {
                records.push(registration_from_registrant(workshop_id, registrant)?);
            }
        }
        Ok(records)
    }

    fn change_registration_status(
        &self,
        registration: &RegistrationRecord,
        new_status: RegistrationStatus,
    ) -> Result<(), RepositoryError> {
        let registrant = ZoomRegistrant::from_record(registration, to_external(registration.status));
        let target = to_external(new_status);

        self.gateway
            .update_registrant_status(registration.workshop_id.as_str(), &registrant, target)
            .map_err(|err| match err {
                ZoomApiError::NotFound(_) => RepositoryError::registration_not_found(registration),
                other => {
                    warn!(
                        registration_id = %registration.id,
                        %target,
                        error = %other,
                        "zoom refused registrant status change"
                    );
                    remote_error(other)
                }
            })
    }
}

/// Workshop port listing the configured user's upcoming Zoom meetings.
#[derive(Debug)]
pub struct ZoomWorkshopRepo<G: ?Sized> {
    gateway: Arc<G>,
    default_capacity: u32,
}

impl<G: ZoomGateway + ?Sized> ZoomWorkshopRepo<G> {
    /// Zoom meetings carry no seat limit, so every workshop gets `default_capacity`.
    pub fn new(gateway: Arc<G>, default_capacity: u32) -> Self {
        Self {
            gateway,
            default_capacity,
        }
    }
}

impl<G: ZoomGateway + ?Sized> WorkshopRepo for ZoomWorkshopRepo<G> {
    fn get_upcoming_workshops(&self) -> Result<Vec<WorkshopRecord>, RepositoryError> {
        let meetings = self
            .gateway
            .list_upcoming_meetings()
            .map_err(remote_error)?;

        Ok(meetings
            .into_iter()
            .map(|meeting| WorkshopRecord {
                id: WorkshopId(meeting.id.to_string()),
                link: meeting.join_url,
                title: meeting.topic,
                date: meeting.start_time,
                capacity: self.default_capacity,
            })
            .collect())
    }
}

fn remote_error(err: ZoomApiError) -> RepositoryError {
    match &err {
        ZoomApiError::Transport(_) | ZoomApiError::Decode(_) => {
            RepositoryError::RemoteUnavailable(err.to_string())
        }
        ZoomApiError::Status { status, .. } if *status >= 500 => {
            RepositoryError::RemoteUnavailable(err.to_string())
        }
        ZoomApiError::Auth(_)
        | ZoomApiError::NotFound(_)
        | ZoomApiError::Status { .. }
        | ZoomApiError::UnsupportedTransition(_) => RepositoryError::RemoteRejected(err.to_string()),
    }
}
