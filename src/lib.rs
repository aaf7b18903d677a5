mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod infra;
mod routes;
mod server;
pub mod telemetry;
pub mod workflows;
pub mod zoom;

use error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
