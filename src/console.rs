use std::cell::RefCell;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;

use crate::workflows::registration::{
    ListWorkshopsPresenter, RegistrantsPresenter, RegistrationRecord, WorkshopId,
    WorkshopRegistrationSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// Presenter for the command line. Everything shown is buffered until
/// [`ConsolePresenter::into_output`] hands it to the caller.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    format: OutputFormat,
    output: RefCell<String>,
}

#[derive(Serialize)]
struct RegistrationRow<'a> {
    id: &'a str,
    workshop_id: &'a str,
    name: &'a str,
    email: &'a str,
    registered_on: &'a str,
    affiliation: &'a str,
    status: &'static str,
}

impl<'a> From<&'a RegistrationRecord> for RegistrationRow<'a> {
    fn from(record: &'a RegistrationRecord) -> Self {
        Self {
            id: record.id.as_str(),
            workshop_id: record.workshop_id.as_str(),
            name: &record.name,
            email: &record.email,
            registered_on: &record.registered_on,
            affiliation: record.affiliation().unwrap_or_default(),
            status: record.status.label(),
        }
    }
}

impl ConsolePresenter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            output: RefCell::new(String::new()),
        }
    }

    pub fn into_output(self) -> String {
        self.output.into_inner()
    }

    fn push(&self, rendered: String) {
        self.output.borrow_mut().push_str(&rendered);
    }
}

impl ListWorkshopsPresenter for ConsolePresenter {
    fn show(&self, upcoming_workshops: &[WorkshopRegistrationSummary]) {
        let rendered = match self.format {
            OutputFormat::Table => workshop_table(upcoming_workshops),
            OutputFormat::Csv => csv_rows(upcoming_workshops),
            OutputFormat::Json => json_document(&upcoming_workshops),
        };
        self.push(rendered);
    }
}

impl RegistrantsPresenter for ConsolePresenter {
    fn show_registrants(&self, workshop_id: &WorkshopId, registrations: &[RegistrationRecord]) {
        let rendered = match self.format {
            OutputFormat::Table => registrant_table(workshop_id, registrations),
            OutputFormat::Csv => {
                csv_rows(registrations.iter().map(RegistrationRow::from))
            }
            OutputFormat::Json => json_document(&registrations),
        };
        self.push(rendered);
    }
}

fn workshop_table(workshops: &[WorkshopRegistrationSummary]) -> String {
    let mut content = String::new();
    if workshops.is_empty() {
        writeln!(&mut content, "Upcoming workshops: none").expect("write empty heading");
        return content;
    }

    writeln!(&mut content, "Upcoming workshops").expect("write heading");
    for workshop in workshops {
        writeln!(
            &mut content,
            "- {} ({}) on {}: {}/{} approved, {} waitlisted, {} rejected, {} free spots",
            workshop.title,
            workshop.id,
            workshop.date,
            workshop.num_approved,
            workshop.capacity,
            workshop.num_waitlisted,
            workshop.num_rejected,
            workshop.num_free_spots
        )
        .expect("write workshop line");
        if !workshop.link.is_empty() {
            writeln!(&mut content, "  {}", workshop.link).expect("write workshop link");
        }
    }
    content
}

fn registrant_table(workshop_id: &WorkshopId, registrations: &[RegistrationRecord]) -> String {
    let mut content = String::new();
    if registrations.is_empty() {
        writeln!(&mut content, "Registrants for workshop {workshop_id}: none")
            .expect("write empty heading");
        return content;
    }

    writeln!(&mut content, "Registrants for workshop {workshop_id}").expect("write heading");
    for record in registrations {
        writeln!(
            &mut content,
            "- {} | {} | {} | registered {} | {} | {}",
            record.id,
            record.name,
            record.email,
            record.registered_on,
            record.affiliation().unwrap_or("-"),
            record.status
        )
        .expect("write registrant line");
    }
    content
}

fn csv_rows<T, I>(rows: I) -> String
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        if let Err(err) = writer.serialize(row) {
            warn!(error = %err, "skipping row that cannot be written as csv");
        }
    }

    match writer.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            warn!(error = %err, "unable to flush csv output");
            String::new()
        }
    }
}

fn json_document<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(mut json) => {
            json.push('\n');
            json
        }
        Err(err) => {
            warn!(error = %err, "unable to render json output");
            String::new()
        }
    }
}
