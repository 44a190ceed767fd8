mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use library_core::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
