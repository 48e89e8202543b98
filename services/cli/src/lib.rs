mod cli;
mod infra;
mod pipeline;
mod report;

use citation_calendar::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
