use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{LoadError, LoadResult};
use crate::model::Record;

// Longest body prefix carried in `UnexpectedFormat`.
pub const SNIPPET_LEN: usize = 120;

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of the record collection. `HttpProvider` talks to the real price
/// service; tests substitute an in-memory one.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn health(&self) -> LoadResult<u16>;

    async fn prices(&self) -> LoadResult<ProviderResponse>;
}

pub struct HttpProvider {
    client: Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> LoadResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::NetworkFailure(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl PriceProvider for HttpProvider {
    async fn health(&self) -> LoadResult<u16> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().as_u16())
    }

    async fn prices(&self) -> LoadResult<ProviderResponse> {
        let resp = self
            .client
            .get(self.url("/prices"))
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await?;

        debug!(status, content_type = ?content_type, bytes = body.len(), "prices response");
        Ok(ProviderResponse {
            status,
            content_type,
            body,
        })
    }
}

pub struct Loader<P> {
    provider: P,
    probe_health: bool,
}

impl<P: PriceProvider> Loader<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            probe_health: true,
        }
    }

    pub fn with_health_probe(mut self, enabled: bool) -> Self {
        self.probe_health = enabled;
        self
    }

    // probe -> fetch -> content type -> shape
    pub async fn load(&self) -> LoadResult<Vec<Record>> {
        if self.probe_health {
            let status = self.provider.health().await?;
            if !(200..300).contains(&status) {
                return Err(LoadError::ProviderUnavailable { status });
            }
        }

        let resp = self.provider.prices().await?;
        if !resp.is_success() {
            return Err(LoadError::ProviderUnavailable {
                status: resp.status,
            });
        }

        if !is_structured(resp.content_type.as_deref()) {
            return Err(LoadError::UnexpectedFormat(snippet(&resp.body)));
        }

        let records = decode_records(&resp.body)?;
        info!(count = records.len(), "loaded price records");
        Ok(records)
    }
}

/// True for `application/json` and `+json` media types, ignoring parameters.
pub fn is_structured(content_type: Option<&str>) -> bool {
    let Some(ct) = content_type else {
        return false;
    };
    let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

pub fn decode_records(body: &str) -> LoadResult<Vec<Record>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| LoadError::UnexpectedFormat(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(LoadError::UnexpectedFormat(format!(
            "expected an array of records, got {}",
            json_kind(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Record>(item)
                .map_err(|e| LoadError::UnexpectedFormat(format!("record {i}: {e}")))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_LEN).collect()
}
