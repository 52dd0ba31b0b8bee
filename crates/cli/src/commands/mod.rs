//! CLI subcommand implementations.
//!
//! Commands write their report to any [`std::io::Write`] so tests can
//! capture it; `main` hands them a locked stdout.

pub mod catalog;
pub mod quote;

use mercado_core::PricingError;
use thiserror::Error;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}
