//! Mercado CLI - catalog and pricing tools.
//!
//! # Usage
//!
//! ```bash
//! # List the seeded catalog
//! mercado-cli catalog
//!
//! # Shipping fee for a subtotal of R$ 50,00
//! mercado-cli shipping --subtotal-cents 5000
//!
//! # Installment table for a total of R$ 100,00
//! mercado-cli quote --total-cents 10000
//!
//! # A single quote
//! mercado-cli quote --total-cents 10000 --installments 3
//! ```
//!
//! Quotes use the storefront's pricing policy, including any
//! `STOREFRONT_*` pricing overrides in the environment or `.env`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mercado_core::{Catalog, Cents, PricingPolicy};
use mercado_storefront::config::pricing_from_env;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "mercado-cli")]
#[command(author, version, about = "Mercado CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Catalog,
    /// Show the shipping fee for a subtotal
    Shipping {
        /// Cart subtotal in cents
        #[arg(long)]
        subtotal_cents: i64,
    },
    /// Quote installment payments for a total
    Quote {
        /// Order total in cents, shipping included
        #[arg(long)]
        total_cents: i64,

        /// Number of installments; omit for the full table
        #[arg(short, long)]
        installments: Option<u32>,
    },
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean for reports
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mercado_cli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let policy = match pricing_from_env() {
        Ok(policy) => policy,
        Err(e) => {
            tracing::error!("Invalid pricing configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run(cli, &policy, &mut out).and_then(|()| out.flush().map_err(CommandError::from)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, policy: &PricingPolicy, out: &mut impl Write) -> Result<(), CommandError> {
    match cli.command {
        Commands::Catalog => commands::catalog::list(&Catalog::seeded(), out)?,
        Commands::Shipping { subtotal_cents } => {
            commands::quote::shipping(policy, Cents::new(subtotal_cents), out)?;
        }
        Commands::Quote {
            total_cents,
            installments,
        } => {
            commands::quote::installments(policy, Cents::new(total_cents), installments, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn run_args(args: &[&str], policy: &PricingPolicy) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(cli, policy, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_shipping_follows_configured_policy() {
        let args = ["mercado-cli", "shipping", "--subtotal-cents", "6000"];

        let default = run_args(&args, &PricingPolicy::default());
        let raised = run_args(
            &args,
            &PricingPolicy {
                free_shipping_threshold: Cents::new(8000),
                ..PricingPolicy::default()
            },
        );

        assert_ne!(default, raised);
        assert!(raised.contains("R$ 10,00"));
    }
}
