use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::console::{ConsolePresenter, OutputFormat};
use crate::error::AppError;
use crate::infra::AppContext;
use crate::server;
use crate::telemetry;
use crate::workflows::registration::{RegistrationId, RegistrationStatus, WorkshopId};

#[derive(Parser, Debug)]
#[command(
    name = "Workshop Registration",
    about = "Reconcile workshop registrations and review upcoming workshop occupancy",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Summarize registrations for every upcoming workshop
    Workshops(WorkshopsArgs),
    /// Inspect or change individual registrations
    Registrations {
        #[command(subcommand)]
        command: RegistrationsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RegistrationsCommand {
    /// List registrants of one workshop
    List(ListRegistrationsArgs),
    /// Move one registration to a new status
    SetStatus(SetStatusArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct WorkshopsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ListRegistrationsArgs {
    #[arg(long)]
    workshop_id: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct SetStatusArgs {
    #[arg(long)]
    workshop_id: String,
    #[arg(long)]
    registration_id: String,
    /// approved, waitlisted or rejected
    #[arg(long, value_parser = parse_status)]
    status: RegistrationStatus,
}

fn parse_status(raw: &str) -> Result<RegistrationStatus, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let mut config = AppConfig::load()?;
    if let Command::Serve(args) = &command {
        if let Some(host) = args.host.clone() {
            config.server.host = host;
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
    }

    telemetry::init(&config.telemetry)?;

    // The zoom client owns a runtime of its own, so the context is built and dropped
    // outside of any async scope.
    let context = AppContext::from_config(&config.registration)?;

    match command {
        Command::Serve(_) => {
            let runtime = tokio::runtime::Runtime::new()?;
            let result = runtime.block_on(server::run(config, context.clone()));
            drop(runtime);
            result
        }
        other => {
            let output = execute(other, &context)?;
            print!("{output}");
            Ok(())
        }
    }
}

/// Runs a console command against `context` and returns what should be printed.
fn execute(command: Command, context: &AppContext) -> Result<String, AppError> {
    match command {
        Command::Serve(_) => Ok(String::new()),
        Command::Workshops(args) => {
            let presenter = ConsolePresenter::new(args.format);
            context
                .list_workshops_workflow()
                .check_upcoming_workshops(&presenter)?;
            Ok(presenter.into_output())
        }
        Command::Registrations {
            command: RegistrationsCommand::List(args),
        } => {
            let presenter = ConsolePresenter::new(args.format);
            context
                .registrant_workflows()
                .list_registrants(&WorkshopId(args.workshop_id), &presenter)?;
            Ok(presenter.into_output())
        }
        Command::Registrations {
            command: RegistrationsCommand::SetStatus(args),
        } => {
            let registration_id = RegistrationId(args.registration_id);
            let workshop_id = WorkshopId(args.workshop_id);
            context.registrant_workflows().update_registration_status(
                &registration_id,
                &workshop_id,
                args.status,
            )?;
            info!(%registration_id, %workshop_id, status = %args.status, "registration updated");
            Ok(format!(
                "Registration {registration_id} in workshop {workshop_id} is now {}\n",
                args.status
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::SeedData;
    use crate::workflows::registration::RepositoryError;

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["workshop-registration"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv)
            .expect("arguments parse")
            .command
            .expect("command present")
    }

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["workshop-registration"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn set_status_rejects_external_vocabulary() {
        let result = Cli::try_parse_from([
            "workshop-registration",
            "registrations",
            "set-status",
            "--workshop-id",
            "12345",
            "--registration-id",
            "11111",
            "--status",
            "pending",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn workshops_command_prints_table() {
        let context = AppContext::in_memory(SeedData::demo());

        let output = execute(parse(&["workshops"]), &context).expect("command succeeds");

        assert!(output.contains("1/14 approved, 1 waitlisted, 0 rejected, 13 free spots"));
    }

    #[test]
    fn set_status_then_list_shows_new_status() {
        let context = AppContext::in_memory(SeedData::demo());

        let output = execute(
            parse(&[
                "registrations",
                "set-status",
                "--workshop-id",
                "12345",
                "--registration-id",
                "11111",
                "--status",
                "approved",
            ]),
            &context,
        )
        .expect("status change succeeds");
        assert_eq!(
            output,
            "Registration 11111 in workshop 12345 is now approved\n"
        );

        let listing = execute(
            parse(&[
                "registrations",
                "list",
                "--workshop-id",
                "12345",
                "--format",
                "csv",
            ]),
            &context,
        )
        .expect("listing succeeds");
        assert!(listing.contains("11111,12345,adam,a@a.com,26092023,Prof. Bee,approved"));

        let summary = execute(parse(&["workshops"]), &context).expect("command succeeds");
        assert!(summary.contains("2/14 approved, 0 waitlisted, 0 rejected, 12 free spots"));
    }

    #[test]
    fn set_status_for_unknown_registration_fails() {
        let context = AppContext::in_memory(SeedData::demo());

        let result = execute(
            parse(&[
                "registrations",
                "set-status",
                "--workshop-id",
                "12345",
                "--registration-id",
                "99999",
                "--status",
                "rejected",
            ]),
            &context,
        );

        assert!(matches!(
            result,
            Err(AppError::Registration(
                RepositoryError::RegistrationNotFound { .. }
            ))
        ));
    }
}
