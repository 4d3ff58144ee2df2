mod config;
mod context;
mod error;
mod pipeline;

#[cfg(test)]
mod tests;

pub use config::{ClientConfig, LogLevel, SERVER_ENV};
pub use context::AppContext;
pub use error::{AppError, Result};
pub use pipeline::{RunOptions, run_pipeline};
