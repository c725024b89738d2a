//! Screening service trait and its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use pretcad_common::{Result, ScreenerConfig, ScreenerError, ScreeningRequest};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

/// Anything that can turn a screening request into an (opaque) result.
#[async_trait]
pub trait ScreeningService: Send + Sync {
    /// Send one request and return the decoded JSON body of a 2xx reply.
    /// Non-2xx replies become `ScreenerError::Rejected`.
    async fn submit(&self, request: &ScreeningRequest) -> Result<Value>;
}

/// Talks to the hosted FastAPI screener over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpScreeningService {
    base: Url,
    client: Client,
}

impl HttpScreeningService {
    /// `base` should end with a slash so endpoint names join beneath it.
    /// With `timeout` unset no client-side deadline is applied.
    pub fn new(base: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = ClientBuilder::new();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(Self { base, client })
    }

    pub fn from_config(config: &ScreenerConfig) -> Result<Self> {
        let timeout = config.service.request_timeout_secs.map(Duration::from_secs);
        Self::new(config.service_base()?, timeout)
    }

    pub fn base(&self) -> &Url { &self.base }

    pub fn endpoint_url(&self, request: &ScreeningRequest) -> Result<Url> {
        Ok(self.base.join(request.endpoint())?)
    }
}

#[async_trait]
impl ScreeningService for HttpScreeningService {
    #[instrument(skip_all, fields(endpoint = request.endpoint()))]
    async fn submit(&self, request: &ScreeningRequest) -> Result<Value> {
        let url = self.endpoint_url(request)?;
        debug!(%url, "Posting screening request");

        let resp = self.client
            .post(url)
            .json(request)
            .send()
            .await?;

        let json = check_response_status(resp).await?;
        debug!("Screening service replied");
        Ok(json)
    }
}

/// Decode a 2xx body as JSON, or turn any other status into a rejection whose
/// detail is the compact JSON error body, or the raw text when it is not JSON.
async fn check_response_status(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await?;
        let detail = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body.to_string(),
            Err(_) => text,
        };
        warn!(status = status.as_u16(), %detail, "Screening service rejected request");
        return Err(ScreenerError::Rejected { status: status.as_u16(), detail });
    }

    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretcad_common::{CifScreeningRequest, DeviceKind, DeviceParameters, ManualScreeningRequest, OperatingConditions};

    fn service(base: &str) -> HttpScreeningService {
        HttpScreeningService::new(Url::parse(base).unwrap(), None).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let svc = service("https://pre-tcad-app.onrender.com/");
        let manual = ScreeningRequest::Manual(ManualScreeningRequest {
            props: DeviceParameters::default(),
            device: DeviceKind::Nmos,
            conditions: OperatingConditions::default(),
        });
        let cif = ScreeningRequest::Cif(CifScreeningRequest::new(""));
        assert_eq!(svc.endpoint_url(&manual).unwrap().as_str(), "https://pre-tcad-app.onrender.com/screen");
        assert_eq!(svc.endpoint_url(&cif).unwrap().as_str(), "https://pre-tcad-app.onrender.com/screen_alignn");
    }

    #[test]
    fn test_from_config_normalises_base() {
        let mut config = ScreenerConfig::default();
        config.service.base_url = "http://10.0.0.5:8000/v1".to_string();
        let svc = HttpScreeningService::from_config(&config).unwrap();
        assert_eq!(svc.base().as_str(), "http://10.0.0.5:8000/v1/");
    }
}
