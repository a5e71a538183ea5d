use crate::error::{HfError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Seam between the dispatcher and the hosted inference endpoint. One call
/// per generation; retries and timeouts are the caller's concern.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// POST one generation payload to the model endpoint and return the raw
    /// bitmap bytes on success.
    async fn invoke(
        &self,
        model_id: &str,
        api_token: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<u8>>;
}

/// Backend that talks to the Hugging Face Inference API over HTTP.
pub struct HttpBackend {
    client: Client,
    api_base: String,
}

impl HttpBackend {
    pub fn new(api_base: impl Into<String>) -> Self {
        HttpBackend {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl InferenceBackend for HttpBackend {
    async fn invoke(
        &self,
        model_id: &str,
        api_token: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<u8>> {
        let url = format!("{}/models/{}", self.api_base, model_id);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| HfError::BackendError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Inference API returned {}: {}", status, body);
            return Err(HfError::BackendError(format!("{}: {}", status, body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HfError::ResponseError(e.to_string()))?;

        if bytes.is_empty() {
            return Err(HfError::ResponseError("Empty response body".into()));
        }

        Ok(bytes.to_vec())
    }
}
