//! Plain-text rendering of a stored exchange.

use std::fmt::Write;

use pretcad_bridge::StoredExchange;
use pretcad_common::models::{field, PARAMETER_FIELDS};
use pretcad_common::presets::format_field_value;
use pretcad_common::report::ScreeningReport;
use pretcad_common::PresetCatalog;
use serde_json::Value;

const BAR_WIDTH: usize = 30;

pub fn render_presets(catalog: &PresetCatalog) -> String {
    let mut out = String::new();
    for preset in catalog.iter() {
        let _ = writeln!(out, "{:<8} {}", preset.id, preset.description);
        let values: Vec<String> = preset
            .values
            .iter()
            .map(|(k, v)| format!("{}={}", k, format_field_value(*v)))
            .collect();
        let _ = writeln!(out, "         {}", values.join(" "));
    }
    out
}

fn render_input(out: &mut String, input: &Value) {
    if input["via"] == "cif" {
        let name = input["cif_filename"].as_str().unwrap_or("?");
        let _ = writeln!(out, "Input:  CIF file {}", name);
        return;
    }

    let _ = writeln!(out, "Input:  {} device", input["device"].as_str().unwrap_or("?"));
    for name in PARAMETER_FIELDS {
        let _ = writeln!(out, "  {:<12} {}", name, number_or_dash(&input["props"][name]));
    }
    let _ = writeln!(out, "  {:<12} {}", field::TEMPERATURE, number_or_dash(&input["conditions"]["temp"]));
    let _ = writeln!(out, "  {:<12} {}", field::SUPPLY_VOLTAGE, number_or_dash(&input["conditions"]["vdd"]));
}

fn number_or_dash(v: &Value) -> String {
    v.as_f64().map(format_field_value).unwrap_or_else(|| "—".to_string())
}

pub fn render_exchange(exchange: &StoredExchange) -> String {
    let mut out = String::new();
    match &exchange.input {
        Some(input) => render_input(&mut out, input),
        None => out.push_str("Input:  (not recorded)\n"),
    }

    let report = ScreeningReport::from_value(&exchange.result);
    out.push('\n');
    if let Some(decision) = &report.decision {
        let _ = writeln!(out, "Decision:     {}", decision);
    }
    if let Some(score) = report.score {
        let _ = writeln!(out, "Score:        {:.3}", score);
    }
    if let Some(u) = report.uncertainty {
        let _ = writeln!(out, "Uncertainty:  {}", u);
    }
    if let Some(version) = &report.model_version {
        let _ = writeln!(out, "Model:        {}", version);
    }

    if !report.metrics.is_empty() {
        out.push_str("\nMetrics\n");
        for (name, value) in &report.metrics {
            match value {
                Some(v) => { let _ = writeln!(out, "  {:<16} {:.4e}", name, v); }
                None => { let _ = writeln!(out, "  {:<16} —", name); }
            }
        }
    }

    let ranked = report.ranked_percentiles();
    if !ranked.is_empty() {
        out.push_str("\nRelative ranking vs baselines\n");
        for (label, pct) in ranked {
            let filled = ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
            let _ = writeln!(
                out,
                "  {:<10} {:<width$} {:>5.1}%",
                label,
                "█".repeat(filled),
                pct,
                width = BAR_WIDTH
            );
        }
    }

    if report.decision.is_none() && report.score.is_none() && report.metrics.is_empty() {
        // Unknown shape: show it raw.
        let raw = serde_json::to_string_pretty(&exchange.result).unwrap_or_default();
        let _ = writeln!(out, "Result:\n{}", raw);
    }
    out
}
