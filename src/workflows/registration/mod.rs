//! Registration reconciliation: the registration/workshop domain, the repository ports
//! adapters plug into, and the workflows an operator drives.

pub mod domain;
pub mod listing;
pub mod memory;
pub mod registrants;
pub mod repository;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    join_full_name, split_full_name, CustomAnswer, RegistrationId, RegistrationRecord,
    RegistrationStatus, WorkshopId, WorkshopRecord,
};
pub use listing::{ListWorkshopsPresenter, ListWorkshopsWorkflow, WorkshopRegistrationSummary};
pub use memory::{InMemoryRegistrationRepo, InMemoryWorkshopRepo};
pub use registrants::{RegistrantWorkflows, RegistrantsPresenter};
pub use repository::{RegistrationRepo, RepositoryError, WorkshopRepo};
pub use status::{to_external, to_internal, ExternalStatus, UnmappedStatus};
