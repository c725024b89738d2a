//! Subcommand implementations.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine;
use pretcad_bridge::{
    BridgeConfig, BridgeDeps, FormBridge, FormSurface, JsonFileStore, SelectedFile,
    StoredExchange, SubmissionOutcome,
};
use pretcad_client::HttpScreeningService;
use pretcad_common::report::ScreeningReport;
use pretcad_common::{PresetCatalog, ScreenerConfig};
use tracing::{info, warn};

use crate::terminal::{ConsoleForm, ConsoleNavigator, ConsoleNotifier};
use crate::render::{render_exchange, render_presets};
use crate::{Cli, Command};

/// `FIELD=VALUE` → (FIELD, VALUE). The value may be empty.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in {:?}", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Config file, then environment, then command-line flags.
pub fn load_config(cli: &Cli) -> anyhow::Result<ScreenerConfig> {
    let mut config = ScreenerConfig::load(cli.config.as_deref())?;
    if let Some(base) = &cli.base_url {
        config.service.base_url = base.clone();
    }
    if let Some(path) = &cli.storage {
        config.storage.path = path.clone();
    }
    config.validate()?;
    info!(service = %config.service.base_url, storage = %config.storage.path.display(), "Configuration ready");
    Ok(config)
}

pub async fn dispatch(command: Command, config: ScreenerConfig) -> anyhow::Result<ExitCode> {
    match command {
        Command::Presets => {
            print!("{}", render_presets(&PresetCatalog::builtin()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { preset, assignments } => run_manual(&config, preset.as_deref(), &assignments).await,
        Command::RunCif { path } => run_cif(&config, path.as_deref()).await,
        Command::Show { chart_out } => show(&config, chart_out.as_deref()),
    }
}

fn build_bridge(
    config: &ScreenerConfig,
    form: Arc<ConsoleForm>,
    store: Arc<JsonFileStore>,
) -> anyhow::Result<FormBridge> {
    let service = HttpScreeningService::from_config(config)?;
    info!(base = %service.base(), "Screening service ready");
    Ok(FormBridge::new(
        BridgeConfig::from_screener_config(config)?,
        BridgeDeps {
            service: Arc::new(service),
            form,
            store,
            navigator: Arc::new(ConsoleNavigator),
            notifier: Arc::new(ConsoleNotifier),
        },
    ))
}

async fn run_manual(
    config: &ScreenerConfig,
    preset: Option<&str>,
    assignments: &[(String, String)],
) -> anyhow::Result<ExitCode> {
    let form = Arc::new(ConsoleForm::new());
    let store = Arc::new(JsonFileStore::new(&config.storage.path));
    let bridge = build_bridge(config, form.clone(), store.clone())?;

    if let Some(id) = preset {
        if !bridge.apply_preset(id) {
            warn!(preset = id, known = ?bridge.config().presets.ids(), "Unknown preset, starting from an empty form");
        }
    }
    for (name, value) in assignments {
        form.set_field(name, value);
    }

    finish(bridge.submit_manual().await.ok(), store.as_ref())
}

async fn run_cif(config: &ScreenerConfig, path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let form = Arc::new(ConsoleForm::new());
    if let Some(p) = path {
        form.select_file(SelectedFile::from_path(p));
    }
    let store = Arc::new(JsonFileStore::new(&config.storage.path));
    let bridge = build_bridge(config, form, store.clone())?;

    finish(bridge.submit_cif().await.ok(), store.as_ref())
}

/// Failures were already reported through the status region and an alert.
fn finish(outcome: Option<SubmissionOutcome>, store: &JsonFileStore) -> anyhow::Result<ExitCode> {
    Ok(if succeeded(outcome, store)? { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn succeeded(outcome: Option<SubmissionOutcome>, store: &JsonFileStore) -> anyhow::Result<bool> {
    match outcome {
        Some(SubmissionOutcome::Navigated(_)) => {
            if let Some(exchange) = StoredExchange::load(store)? {
                println!("{}", render_exchange(&exchange));
            }
            Ok(true)
        }
        Some(SubmissionOutcome::AwaitingInput) => Ok(true),
        None => Ok(false),
    }
}

fn show(config: &ScreenerConfig, chart_out: Option<&Path>) -> anyhow::Result<ExitCode> {
    let store = JsonFileStore::new(&config.storage.path);
    let Some(exchange) = StoredExchange::load(&store)? else {
        println!("No screening results stored yet in {}", store.path().display());
        return Ok(ExitCode::SUCCESS);
    };
    println!("{}", render_exchange(&exchange));

    if let Some(out) = chart_out {
        let report = ScreeningReport::from_value(&exchange.result);
        match report.chart.as_deref() {
            Some(chart) if report.has_chart() => {
                write_chart(chart, out)?;
                println!("Ranking chart written to {}", out.display());
            }
            _ => warn!("Stored result has no ranking chart"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn write_chart(chart_b64: &str, out: &Path) -> anyhow::Result<()> {
    let png = base64::engine::general_purpose::STANDARD
        .decode(chart_b64.trim())
        .context("ranking chart is not valid base64")?;
    std::fs::write(out, png).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("L_nm=30").unwrap(), ("L_nm".to_string(), "30".to_string()));
        assert_eq!(parse_assignment("VDD=").unwrap(), ("VDD".to_string(), String::new()));
        assert_eq!(parse_assignment("NA_cm3=1e17").unwrap().1, "1e17");
        assert!(parse_assignment("L_nm").is_err());
        assert!(parse_assignment("=5").is_err());
    }

    #[test]
    fn test_write_chart_decodes_base64() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("chart.png");
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"\x89PNG\r\n");
        write_chart(&encoded, &out).unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"\x89PNG\r\n");
    }

    #[test]
    fn test_write_chart_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_chart("not base64!!", &dir.path().join("x.png")).is_err());
    }

    #[test]
    fn test_failed_submission_is_not_success() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("s.json"));
        assert!(!succeeded(None, &store).unwrap());
        assert!(succeeded(Some(SubmissionOutcome::AwaitingInput), &store).unwrap());
    }
}
