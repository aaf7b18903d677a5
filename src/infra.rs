use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::config::{RegistrationBackend, ZoomConfig};
use crate::workflows::registration::{
    CustomAnswer, InMemoryRegistrationRepo, InMemoryWorkshopRepo, ListWorkshopsWorkflow,
    RegistrantWorkflows, RegistrationId, RegistrationRecord, RegistrationRepo,
    RegistrationStatus, WorkshopId, WorkshopRecord, WorkshopRepo,
};
use crate::zoom::{ZoomApiError, ZoomRegistrationRepo, ZoomRestClient, ZoomWorkshopRepo};

/// Workshops and registrations loaded into the in-memory backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub workshops: Vec<WorkshopRecord>,
    #[serde(default)]
    pub registrations: Vec<RegistrationRecord>,
}

impl SeedData {
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Demo ledger used when no seed file is configured.
    pub fn demo() -> Self {
        let workshop_id = WorkshopId::from("12345");
        Self {
            workshops: vec![WorkshopRecord {
                id: workshop_id.clone(),
                link: "https://zoom.us/meeting/register/12345".to_string(),
                title: "Intro to Data Analysis with Python and Pandas".to_string(),
                date: "2023-10-02".to_string(),
                capacity: 14,
            }],
            registrations: vec![
                RegistrationRecord {
                    id: RegistrationId::from("54321"),
                    workshop_id: workshop_id.clone(),
                    name: "eve".to_string(),
                    email: "e@e.com".to_string(),
                    registered_on: "25092023".to_string(),
                    custom_questions: vec![CustomAnswer {
                        title: String::new(),
                        value: "Prof. Sangee".to_string(),
                    }],
                    status: RegistrationStatus::Approved,
                },
                RegistrationRecord {
                    id: RegistrationId::from("11111"),
                    workshop_id,
                    name: "adam".to_string(),
                    email: "a@a.com".to_string(),
                    registered_on: "26092023".to_string(),
                    custom_questions: vec![CustomAnswer {
                        title: String::new(),
                        value: "Prof. Bee".to_string(),
                    }],
                    status: RegistrationStatus::Waitlisted,
                },
            ],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("unable to read seed file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid seed data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Repositories for the configured backend, built once per process and shared by every
/// entry point.
#[derive(Clone)]
pub struct AppContext {
    workshop_repo: Arc<dyn WorkshopRepo>,
    registration_repo: Arc<dyn RegistrationRepo>,
}

impl AppContext {
    pub fn new(
        workshop_repo: Arc<dyn WorkshopRepo>,
        registration_repo: Arc<dyn RegistrationRepo>,
    ) -> Self {
        Self {
            workshop_repo,
            registration_repo,
        }
    }

    pub fn in_memory(seed: SeedData) -> Self {
        Self::new(
            Arc::new(InMemoryWorkshopRepo::new(seed.workshops)),
            Arc::new(InMemoryRegistrationRepo::new(seed.registrations)),
        )
    }

    pub fn zoom(config: &ZoomConfig) -> Result<Self, ZoomApiError> {
        let gateway = Arc::new(ZoomRestClient::with_endpoints(
            config.credentials.clone(),
            config.user_id.clone(),
            config.api_base_url.clone(),
            config.oauth_url.clone(),
        )?);

        Ok(Self::new(
            Arc::new(ZoomWorkshopRepo::new(gateway.clone(), config.default_capacity)),
            Arc::new(ZoomRegistrationRepo::new(gateway)),
        ))
    }

    pub fn from_config(backend: &RegistrationBackend) -> Result<Self, crate::error::AppError> {
        match backend {
            RegistrationBackend::Memory { seed_path } => {
                let seed = match seed_path {
                    Some(path) => SeedData::from_path(path)?,
                    None => SeedData::demo(),
                };
                info!(
                    workshops = seed.workshops.len(),
                    registrations = seed.registrations.len(),
                    "using in-memory registration backend"
                );
                Ok(Self::in_memory(seed))
            }
            RegistrationBackend::Zoom(config) => {
                info!(user_id = %config.user_id, "using zoom registration backend");
                Ok(Self::zoom(config)?)
            }
        }
    }

    pub fn list_workshops_workflow(
        &self,
    ) -> ListWorkshopsWorkflow<dyn WorkshopRepo, dyn RegistrationRepo> {
        ListWorkshopsWorkflow::new(self.workshop_repo.clone(), self.registration_repo.clone())
    }

    pub fn registrant_workflows(&self) -> RegistrantWorkflows<dyn RegistrationRepo> {
        RegistrantWorkflows::new(self.registration_repo.clone())
    }
}
