mod cli;
mod error;
mod infra;
mod pages;
mod routes;
mod server;

pub use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
