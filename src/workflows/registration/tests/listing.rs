use super::common::*;
use crate::workflows::registration::domain::{RegistrationStatus, WorkshopId};
use crate::workflows::registration::listing::{ListWorkshopsWorkflow, WorkshopRegistrationSummary};
use crate::workflows::registration::memory::{InMemoryRegistrationRepo, InMemoryWorkshopRepo};
use crate::workflows::registration::repository::{RegistrationRepo, RepositoryError, WorkshopRepo};
use std::sync::Arc;

use RegistrationStatus::{Approved, Rejected, Waitlisted};

#[test]
fn tally_counts_each_status_and_free_spots() {
    let summary = WorkshopRegistrationSummary::tally(
        &workshop("12345", 14),
        &registrations("12345", &[Approved, Waitlisted]),
    );

    assert_eq!(summary.num_approved, 1);
    assert_eq!(summary.num_waitlisted, 1);
    assert_eq!(summary.num_rejected, 0);
    assert_eq!(summary.num_free_spots, 13);
    assert_eq!(summary.capacity, 14);
    assert_eq!(summary.id, WorkshopId::from("12345"));
}

#[test]
fn tally_reports_overbooking_as_negative_free_spots() {
    let summary = WorkshopRegistrationSummary::tally(
        &workshop("12345", 14),
        &registrations("12345", &[Approved; 16]),
    );

    assert_eq!(summary.num_approved, 16);
    assert_eq!(summary.num_free_spots, -2);
}

#[test]
fn tally_of_empty_workshop_leaves_capacity_free() {
    let summary = WorkshopRegistrationSummary::tally(&workshop("777", 20), &[]);

    assert_eq!(
        (
            summary.num_approved,
            summary.num_waitlisted,
            summary.num_rejected,
            summary.num_free_spots
        ),
        (0, 0, 0, 20)
    );
}

#[test]
fn tally_conserves_every_registration() {
    let mixes: [&[RegistrationStatus]; 4] = [
        &[],
        &[Rejected],
        &[Approved, Approved, Waitlisted, Rejected, Rejected],
        &[Waitlisted, Waitlisted, Waitlisted, Approved],
    ];

    for mix in mixes {
        let records = registrations("42", mix);
        let summary = WorkshopRegistrationSummary::tally(&workshop("42", 3), &records);
        assert_eq!(summary.total_registrations() as usize, records.len());
        assert_eq!(
            summary.num_free_spots,
            3 - i64::from(summary.num_approved)
        );
    }
}

#[test]
fn check_upcoming_workshops_presents_summaries_in_repo_order_once() {
    let workshops = Arc::new(InMemoryWorkshopRepo::new(vec![
        workshop("b-second", 10),
        workshop("a-first", 5),
    ]));
    let mut records = registrations("a-first", &[Approved, Approved, Rejected]);
    records.extend(registrations("b-second", &[Waitlisted]));
    let registrations_repo = Arc::new(InMemoryRegistrationRepo::new(records));
    let workflow = ListWorkshopsWorkflow::new(workshops, registrations_repo);
    let presenter = RecordingPresenter::default();

    workflow
        .check_upcoming_workshops(&presenter)
        .expect("listing succeeds");

    let calls = presenter.calls.borrow();
    assert_eq!(calls.len(), 1, "presenter receives a single call");
    let shown = &calls[0];
    let ids: Vec<&str> = shown.iter().map(|summary| summary.id.as_str()).collect();
    assert_eq!(ids, vec!["b-second", "a-first"]);
    assert_eq!(shown[0].num_waitlisted, 1);
    assert_eq!(shown[0].num_free_spots, 10);
    assert_eq!(shown[1].num_approved, 2);
    assert_eq!(shown[1].num_rejected, 1);
    assert_eq!(shown[1].num_free_spots, 3);
}

#[test]
fn check_upcoming_workshops_with_no_workshops_presents_empty_list() {
    let workflow = ListWorkshopsWorkflow::new(
        Arc::new(InMemoryWorkshopRepo::default()),
        Arc::new(InMemoryRegistrationRepo::default()),
    );
    let presenter = RecordingPresenter::default();

    workflow
        .check_upcoming_workshops(&presenter)
        .expect("listing succeeds");

    assert_eq!(presenter.calls.borrow().as_slice(), &[Vec::new()]);
}

#[test]
fn registration_failure_aborts_listing_without_presenting() {
    let workshops = Arc::new(InMemoryWorkshopRepo::new(vec![
        workshop("ok", 10),
        workshop("broken", 10),
    ]));
    let registrations_repo = Arc::new(UnavailableFor {
        workshop_id: WorkshopId::from("broken"),
        inner: InMemoryRegistrationRepo::new(registrations("ok", &[Approved])),
    });
    let workflow = ListWorkshopsWorkflow::new(workshops, registrations_repo);
    let presenter = RecordingPresenter::default();

    match workflow.check_upcoming_workshops(&presenter) {
        Err(RepositoryError::RemoteUnavailable(reason)) => {
            assert_eq!(reason, "connection reset")
        }
        other => panic!("expected remote unavailable, got {other:?}"),
    }
    assert!(presenter.calls.borrow().is_empty());
}

#[test]
fn workshop_failure_propagates_unchanged() {
    let workflow = ListWorkshopsWorkflow::new(
        Arc::new(OfflineWorkshops),
        Arc::new(InMemoryRegistrationRepo::default()),
    );

    match workflow.summarize_upcoming_workshops() {
        Err(RepositoryError::RemoteUnavailable(reason)) => assert_eq!(reason, "dns failure"),
        other => panic!("expected remote unavailable, got {other:?}"),
    }
}

#[test]
fn workflow_accepts_trait_object_repos() {
    let workshops: Arc<dyn WorkshopRepo> =
        Arc::new(InMemoryWorkshopRepo::new(vec![workshop("12345", 14)]));
    let registrations_repo: Arc<dyn RegistrationRepo> = Arc::new(InMemoryRegistrationRepo::new(
        registrations("12345", &[Approved, Waitlisted]),
    ));
    let workflow = ListWorkshopsWorkflow::new(workshops, registrations_repo);

    let summaries = workflow
        .summarize_upcoming_workshops()
        .expect("listing succeeds");

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].num_free_spots, 13);
}
