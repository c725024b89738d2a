//! Read-only view over a stored screening result.
//!
//! The service response is persisted verbatim; this view only picks out the
//! fields the terminal front-end knows how to display. Anything missing or
//! unexpected is tolerated.

use serde_json::Value;
use std::collections::BTreeMap;

/// Display order for percentile keys; unknown keys follow in key order.
const PERCENTILE_PRIORITY: [&str; 9] = [
    "Ion_percent",
    "gm_percent",
    "fT_percent",
    "Vth_score_percent",
    "SS_percent",
    "DIBL_percent",
    "r0_percent",
    "Ioff_percent",
    "Stab_percent",
];

fn percentile_label(key: &str) -> &str {
    match key {
        "SS_percent"        => "SS",
        "Vth_score_percent" => "Vth score",
        "Ion_percent"       => "Ion",
        "Ioff_percent"      => "Ioff",
        "gm_percent"        => "gm",
        "fT_percent"        => "fT",
        "r0_percent"        => "r0",
        "DIBL_percent"      => "DIBL",
        "Stab_percent"      => "Stability",
        other               => other,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreeningReport {
    /// Metrics the device model could not compute come back as `null`.
    pub metrics: BTreeMap<String, Option<f64>>,
    /// Non-numeric percentile entries are dropped.
    pub percentiles: BTreeMap<String, f64>,
    pub score: Option<f64>,
    pub decision: Option<String>,
    pub uncertainty: Option<f64>,
    pub model_version: Option<String>,
    /// Base64-encoded PNG ranking chart
    pub chart: Option<String>,
}

impl ScreeningReport {
    /// Best-effort view. Each field is picked independently, so a field of an
    /// unexpected type is skipped without losing the rest. A result that is
    /// not an object gives an empty report.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| obj.get(key).and_then(Value::as_f64);
        let entries = |key: &str| obj.get(key).and_then(Value::as_object).into_iter().flatten();

        Self {
            metrics: entries("metrics")
                .filter(|(_, v)| v.is_number() || v.is_null())
                .map(|(k, v)| (k.clone(), v.as_f64()))
                .collect(),
            percentiles: entries("percentiles")
                .filter_map(|(k, v)| v.as_f64().map(|pct| (k.clone(), pct)))
                .collect(),
            score: number("score"),
            decision: text("decision"),
            uncertainty: number("uncertainty"),
            model_version: text("model_version"),
            chart: text("chart"),
        }
    }

    /// Percentiles as (label, value), highest first. Ties keep priority order.
    pub fn ranked_percentiles(&self) -> Vec<(String, f64)> {
        let mut ordered: Vec<&str> = PERCENTILE_PRIORITY
            .iter()
            .copied()
            .filter(|k| self.percentiles.contains_key(*k))
            .collect();
        ordered.extend(
            self.percentiles
                .keys()
                .map(String::as_str)
                .filter(|k| !PERCENTILE_PRIORITY.contains(k)),
        );

        let mut ranked: Vec<(String, f64)> = ordered
            .into_iter()
            .map(|k| (percentile_label(k).to_string(), self.percentiles[k]))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn has_chart(&self) -> bool {
        self.chart.as_deref().is_some_and(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "metrics": { "SS_mVdec": 65.8, "Vth_V": 1.093 },
            "percentiles": {
                "SS_percent": 72.8,
                "Vth_score_percent": 63.8,
                "Ion_percent": 25.0,
                "gm_percent": 25.0,
                "Stab_percent": 45.3,
                "custom_percent": 90.0
            },
            "score": 0.72,
            "decision": "unsure",
            "uncertainty": 0,
            "model_version": "colab_screener_v1",
            "chart": ""
        })
    }

    #[test]
    fn test_known_fields_are_picked_up() {
        let report = ScreeningReport::from_value(&sample());
        assert_eq!(report.score, Some(0.72));
        assert_eq!(report.decision.as_deref(), Some("unsure"));
        assert_eq!(report.metrics["Vth_V"], Some(1.093));
        assert!(!report.has_chart());
    }

    #[test]
    fn test_percentiles_ranked_descending_with_labels() {
        let report = ScreeningReport::from_value(&sample());
        let ranked = report.ranked_percentiles();
        let labels: Vec<&str> = ranked.iter().map(|(l, _)| l.as_str()).collect();
        // Ion and gm tie at 25; Ion comes first in priority order.
        assert_eq!(labels, vec!["custom_percent", "SS", "Vth score", "Stability", "Ion", "gm"]);
    }

    #[test]
    fn test_null_metric_keeps_rest_of_report() {
        let report = ScreeningReport::from_value(&json!({
            "metrics": { "SS_mVdec": 65.8, "ft_Hz": null, "note": "n/a" },
            "percentiles": { "SS_percent": 72.8, "fT_percent": null },
            "baseline_percentiles": { "Si": { "SS_percent": 50.0 } },
            "explain": { "top_features": ["SS_mVdec"] },
            "score": 0.72,
            "decision": "unsure",
            "uncertainty": "n/a"
        }));
        assert_eq!(report.score, Some(0.72));
        assert_eq!(report.decision.as_deref(), Some("unsure"));
        assert_eq!(report.metrics.get("ft_Hz"), Some(&None));
        assert_eq!(report.metrics.get("SS_mVdec"), Some(&Some(65.8)));
        assert!(!report.metrics.contains_key("note"));
        assert_eq!(report.ranked_percentiles(), vec![("SS".to_string(), 72.8)]);
        assert!(report.uncertainty.is_none());
    }

    #[test]
    fn test_non_object_result_gives_empty_report() {
        let report = ScreeningReport::from_value(&json!(["unexpected"]));
        assert!(report.percentiles.is_empty());
        assert!(report.score.is_none());
    }
}
