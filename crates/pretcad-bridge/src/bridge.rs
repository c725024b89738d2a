//! Form Bridge: presets, manual screening and CIF screening.
//!
//! Per submission:
//!   Idle → Serializing → AwaitingResponse → Persisted + Navigated (done)
//!                                         ↘ ErrorDisplayed → Idle
//!
//! Exchange state is written only after a 2xx reply, and both entries of a
//! pair are written under one commit guard so overlapping submissions cannot
//! interleave their writes. Whichever response lands last wins.

use std::sync::{Arc, Mutex, PoisonError};

use pretcad_client::ScreeningService;
use pretcad_common::models::field;
use pretcad_common::presets::format_field_value;
use pretcad_common::{
    CifProvenance, CifScreeningRequest, DeviceKind, ManualScreeningRequest, PresetCatalog,
    Result, ScreenerConfig, ScreenerError, ScreeningRequest,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::input::{read_conditions, read_parameters};
use crate::navigation::results_target;
use crate::shell::{Navigator, Notifier};
use crate::store::{ExchangeStore, INPUT_KEY, RESULT_KEY};
use crate::surface::{FormSurface, SelectedFile};

pub const MANUAL_PROCESSING: &str = "Running screening on the server...";
pub const CIF_PROCESSING: &str = "Running ALIGNN prediction + MOSFET calculation...";
pub const CIF_PROMPT: &str = "Select a CIF file first.";
pub const DONE: &str = "Screening complete! Opening the results page...";

/// Injected values the bridge needs besides its capabilities.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub presets: PresetCatalog,
    /// URL of the page hosting the form.
    pub current_page: Url,
    /// Results page, relative to `current_page`.
    pub results_page: String,
}

impl BridgeConfig {
    pub fn from_screener_config(config: &ScreenerConfig) -> Result<Self> {
        Ok(Self {
            presets: PresetCatalog::builtin(),
            current_page: config.current_page()?,
            results_page: config.page.results_page.clone(),
        })
    }
}

/// Capabilities the bridge drives.
#[derive(Clone)]
pub struct BridgeDeps {
    pub service: Arc<dyn ScreeningService>,
    pub form: Arc<dyn FormSurface>,
    pub store: Arc<dyn ExchangeStore>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

/// How a submission ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Exchange state written and the results page opened.
    Navigated(Url),
    /// Nothing to submit yet; the user was prompted.
    AwaitingInput,
}

/// Which status region and alert wording a flow reports through.
#[derive(Debug, Clone, Copy)]
enum Flow {
    Manual,
    Cif,
}

impl Flow {
    fn status_field(self) -> &'static str {
        match self {
            Flow::Manual => field::STATUS,
            Flow::Cif    => field::CIF_STATUS,
        }
    }

    fn alert_text(self, err: &ScreenerError) -> String {
        match self {
            Flow::Manual => format!("Server error: {}", err),
            Flow::Cif    => format!("Error: {}", err),
        }
    }
}

pub struct FormBridge {
    config: BridgeConfig,
    deps: BridgeDeps,
    commit: Mutex<()>,
}

impl FormBridge {
    pub fn new(config: BridgeConfig, deps: BridgeDeps) -> Self {
        Self { config, deps, commit: Mutex::new(()) }
    }

    pub fn config(&self) -> &BridgeConfig { &self.config }

    /// Copy every value of the named preset into the form. Unknown ids do
    /// nothing. Returns whether a preset was applied.
    pub fn apply_preset(&self, id: &str) -> bool {
        let Some(preset) = self.config.presets.get(id) else {
            debug!(preset = id, "Unknown preset ignored");
            return false;
        };
        for (name, value) in &preset.values {
            self.deps.form.set_field(name, &format_field_value(*value));
        }
        info!(preset = id, fields = preset.values.len(), "Preset applied");
        true
    }

    /// Build the manual request from current form values.
    pub fn read_manual_request(&self) -> ManualScreeningRequest {
        let form = self.deps.form.as_ref();
        ManualScreeningRequest {
            props: read_parameters(form),
            device: DeviceKind::Nmos,
            conditions: read_conditions(form),
        }
    }

    /// Submit the form's device parameters to `/screen`.
    #[instrument(skip(self))]
    pub async fn submit_manual(&self) -> Result<SubmissionOutcome> {
        let flow = Flow::Manual;
        self.set_status(flow, MANUAL_PROCESSING);

        let outcome = self.run_manual().await;
        self.finish(flow, outcome)
    }

    /// Submit the selected CIF file to `/screen_alignn`.
    #[instrument(skip(self))]
    pub async fn submit_cif(&self) -> Result<SubmissionOutcome> {
        let flow = Flow::Cif;
        let Some(file) = self.deps.form.selected_file(field::CIF_FILE) else {
            self.set_status(flow, CIF_PROMPT);
            return Ok(SubmissionOutcome::AwaitingInput);
        };
        self.set_status(flow, CIF_PROCESSING);

        let outcome = self.run_cif(file).await;
        self.finish(flow, outcome)
    }

    async fn run_manual(&self) -> Result<Url> {
        let target = self.results_target()?;
        let request = ScreeningRequest::Manual(self.read_manual_request());
        debug!(phase = "serializing", "Manual request built");
        let input_json = serde_json::to_string(&request)?;

        let result = self.call_service(&request).await?;
        let result_json = serde_json::to_string(&result)?;

        self.commit(&[(INPUT_KEY, input_json.as_str()), (RESULT_KEY, result_json.as_str())])?;
        self.set_status(Flow::Manual, DONE);
        Ok(self.open_results(target))
    }

    async fn run_cif(&self, file: SelectedFile) -> Result<Url> {
        let target = self.results_target()?;
        let cif = file.read_text().await?;
        debug!(phase = "serializing", file = %file.name, bytes = cif.len(), "CIF request built");
        let request = ScreeningRequest::Cif(CifScreeningRequest::new(cif));

        let result = self.call_service(&request).await?;
        let result_json = serde_json::to_string(&result)?;
        let input_json = serde_json::to_string(&CifProvenance::new(&file.name))?;

        self.commit(&[(RESULT_KEY, result_json.as_str()), (INPUT_KEY, input_json.as_str())])?;
        self.set_status(Flow::Cif, DONE);
        Ok(self.open_results(target))
    }

    async fn call_service(&self, request: &ScreeningRequest) -> Result<Value> {
        debug!(
            phase = "awaiting_response",
            endpoint = request.endpoint(),
            device = request.device().as_str(),
            "Submitting"
        );
        self.deps.service.submit(request).await
    }

    fn commit(&self, entries: &[(&str, &str)]) -> Result<()> {
        let _guard = self.commit.lock().unwrap_or_else(PoisonError::into_inner);
        self.deps.store.persist_batch(entries)?;
        debug!(phase = "persisted", "Exchange state saved");
        Ok(())
    }

    /// Resolved before anything is sent or stored.
    fn results_target(&self) -> Result<Url> {
        results_target(&self.config.current_page, &self.config.results_page)
    }

    fn open_results(&self, target: Url) -> Url {
        info!(%target, "Navigating to results");
        self.deps.navigator.navigate(&target);
        target
    }

    fn finish(&self, flow: Flow, outcome: Result<Url>) -> Result<SubmissionOutcome> {
        match outcome {
            Ok(target) => Ok(SubmissionOutcome::Navigated(target)),
            Err(e) => {
                error!(error = %e, "Screening failed");
                self.set_status(flow, &format!("Error: {}", e));
                self.deps.notifier.alert(&flow.alert_text(&e));
                Err(e)
            }
        }
    }

    fn set_status(&self, flow: Flow, message: &str) {
        self.deps.form.set_field(flow.status_field(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{RecordingNavigator, RecordingNotifier};
    use crate::store::{MemoryStore, StoredExchange};
    use crate::surface::MemoryForm;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl ScreeningService for Unreachable {
        async fn submit(&self, _request: &ScreeningRequest) -> Result<Value> {
            panic!("no network call expected");
        }
    }

    fn bridge(form: Arc<MemoryForm>) -> FormBridge {
        bridge_at(form, "http://localhost/app/index.html", Arc::new(MemoryStore::new()))
    }

    fn bridge_at(form: Arc<MemoryForm>, current_page: &str, store: Arc<MemoryStore>) -> FormBridge {
        let config = BridgeConfig {
            presets: PresetCatalog::builtin(),
            current_page: Url::parse(current_page).unwrap(),
            results_page: "result.html".to_string(),
        };
        FormBridge::new(config, BridgeDeps {
            service: Arc::new(Unreachable),
            form,
            store,
            navigator: Arc::new(RecordingNavigator::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        })
    }

    #[test]
    fn test_apply_preset_fills_every_field() {
        let form = Arc::new(MemoryForm::with_fields([("status", "idle"), ("L_nm", "999")]));
        let bridge = bridge(form.clone());

        assert!(bridge.apply_preset("short"));
        let preset = bridge.config().presets.get("short").unwrap();
        for (name, value) in &preset.values {
            let text = form.field(name).unwrap();
            assert_eq!(text.parse::<f64>().unwrap(), *value, "field {name}");
        }
        assert_eq!(form.field("L_nm").as_deref(), Some("20"));
        assert_eq!(form.field("NA_cm3").as_deref(), Some("500000000000000000"));
        assert_eq!(form.field("status").as_deref(), Some("idle"));
    }

    #[test]
    fn test_unknown_preset_is_noop() {
        let form = Arc::new(MemoryForm::with_fields([("L_nm", "33")]));
        let bridge = bridge(form.clone());
        let before = form.snapshot();
        assert!(!bridge.apply_preset("gaas_hemt"));
        assert_eq!(form.snapshot(), before);
    }

    #[test]
    fn test_manual_request_from_preset() {
        let form = Arc::new(MemoryForm::new());
        let bridge = bridge(form.clone());
        bridge.apply_preset("si");
        form.set_field("W_um", "");

        let req = bridge.read_manual_request();
        assert_eq!(req.device, DeviceKind::Nmos);
        assert_eq!(req.props.mu_cm2_vs, Some(450.0));
        assert_eq!(req.props.w_um, None);
        assert_eq!(req.conditions.temp, Some(300.0));
        assert_eq!(req.conditions.vdd, Some(1.0));
    }

    #[test]
    fn test_cif_without_file_only_prompts() {
        let form = Arc::new(MemoryForm::new());
        let bridge = bridge(form.clone());
        let outcome = tokio_test::block_on(bridge.submit_cif()).unwrap();
        assert_eq!(outcome, SubmissionOutcome::AwaitingInput);
        assert_eq!(form.field("cif_status").as_deref(), Some(CIF_PROMPT));
    }

    #[test]
    fn test_unusable_page_address_fails_before_submitting() {
        let form = Arc::new(MemoryForm::new());
        let store = Arc::new(MemoryStore::new());
        let bridge = bridge_at(form.clone(), "about:blank", store.clone());
        bridge.apply_preset("si");

        let err = tokio_test::block_on(bridge.submit_manual()).unwrap_err();
        assert!(matches!(err, ScreenerError::Url(_)));
        assert!(StoredExchange::load(store.as_ref()).unwrap().is_none());
        assert!(form.field("status").unwrap().starts_with("Error: "));

        form.select_file("cif", SelectedFile::in_memory("Si.cif", "data_Si"));
        assert!(tokio_test::block_on(bridge.submit_cif()).is_err());
        assert!(StoredExchange::load(store.as_ref()).unwrap().is_none());
    }
}
