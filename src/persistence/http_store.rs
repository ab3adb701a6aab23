use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::warn;

use crate::element::element_model::ElementInstance;
use crate::error::{DesignerError, Result};
use crate::persistence::repository::FormRepository;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_RETRIES: u32 = 2;
/// Pause before the first retry; the n-th retry waits n times as long.
pub const DEFAULT_BACKOFF_MS: u64 = 200;

/// Form content held by a remote service:
/// `GET/PUT {endpoint}/forms/{id}/content` with a JSON array body.
pub struct HttpFormStore {
    endpoint: String,
    client: Client,
    retries: u32,
    backoff: Duration,
}

impl HttpFormStore {
    pub fn new(endpoint: &str, timeout_ms: u64, retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| DesignerError::Http {
                context: "build HTTP client".to_string(),
                source: e,
            })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
            retries,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        })
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn content_url(&self, form_id: &str) -> String {
        format!("{}/forms/{}/content", self.endpoint, form_id)
    }

    /// Retry transport errors and 5xx answers; anything else returns at once.
    fn send_with_retry(&self, url: &str, send: impl Fn() -> reqwest::Result<Response>) -> Result<Response> {
        let mut attempt = 0;
        loop {
            let outcome = send();
            let retryable = match &outcome {
                Ok(resp) => resp.status().is_server_error(),
                Err(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            };

            if !retryable || attempt >= self.retries {
                let response = outcome.map_err(|e| DesignerError::Http {
                    context: url.to_string(),
                    source: e,
                })?;
                if !response.status().is_success() {
                    return Err(DesignerError::HttpStatus {
                        url: url.to_string(),
                        status: response.status().as_u16(),
                    });
                }
                return Ok(response);
            }

            attempt += 1;
            let delay = self.backoff * attempt;
            warn!(url, attempt, delay_ms = delay.as_millis() as u64, "persistence request failed, retrying");
            std::thread::sleep(delay);
        }
    }
}

impl FormRepository for HttpFormStore {
    fn load_document(&self, form_id: &str) -> Result<Vec<ElementInstance>> {
        let url = self.content_url(form_id);
        let response = self.send_with_retry(&url, || self.client.get(&url).send())?;
        response.json().map_err(|e| DesignerError::Http {
            context: format!("decode {}", url),
            source: e,
        })
    }

    fn save_document(&self, form_id: &str, elements: &[ElementInstance]) -> Result<()> {
        let url = self.content_url(form_id);
        self.send_with_retry(&url, || self.client.put(&url).json(elements).send())?;
        Ok(())
    }
}
