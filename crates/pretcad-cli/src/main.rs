//! pretcad — MOSFET material screening from the terminal.
//! Entry point for the `pretcad` binary.

mod commands;
mod terminal;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pretcad", version, about = "Screen MOSFET channel materials against the pre-TCAD service")]
pub struct Cli {
    /// Config file (default: $PRETCAD_CONFIG or ./pretcad.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Screening service base address
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Exchange storage file
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the built-in parameter presets
    Presets,
    /// Screen a device described by form fields
    Run {
        /// Start from a preset (si, si_long, short)
        #[arg(long)]
        preset: Option<String>,
        /// Set a form field, e.g. --set L_nm=30 (repeatable; empty value clears)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = commands::parse_assignment)]
        assignments: Vec<(String, String)>,
    },
    /// Screen a crystal structure from a CIF file
    RunCif {
        /// CIF file to upload
        path: Option<PathBuf>,
    },
    /// Show the last stored screening exchange
    Show {
        /// Write the ranking chart PNG here, when the result has one
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pretcad=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "pretcad starting");

    let config = commands::load_config(&cli)?;
    commands::dispatch(cli.command, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_preset_and_overrides() {
        let cli = Cli::try_parse_from([
            "pretcad", "run", "--preset", "short", "--set", "L_nm=30", "--set", "W_um=",
        ]).unwrap();
        match cli.command {
            Command::Run { preset, assignments } => {
                assert_eq!(preset.as_deref(), Some("short"));
                assert_eq!(assignments, vec![
                    ("L_nm".to_string(), "30".to_string()),
                    ("W_um".to_string(), String::new()),
                ]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pretcad", "run-cif", "Si.cif", "--base-url", "http://127.0.0.1:8000",
        ]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:8000"));
        assert!(matches!(cli.command, Command::RunCif { path: Some(_) }));
    }

    #[test]
    fn test_malformed_assignment_rejected() {
        assert!(Cli::try_parse_from(["pretcad", "run", "--set", "L_nm"]).is_err());
    }
}
