//! Upload boundary: one JSON POST per submission.

use async_trait::async_trait;

use crate::config::UploadConfig;
use crate::form::model::FormFields;

/// Body of the upload call. Field names are fixed by the storage backend.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// `data:image/png;base64,...`
    pub image: String,
    pub student_name: String,
    pub student_id: String,
}

impl UploadRequest {
    /// The counter-signer name is on the image only; the backend does not take it.
    pub fn new(image: impl Into<String>, fields: &FormFields) -> Self {
        Self {
            image: image.into(),
            student_name: fields.subject_name.clone(),
            student_id: fields.subject_id.clone(),
        }
    }
}

/// Acknowledgement returned by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UploadAck {
    pub success: bool,
    pub filename: Option<String>,
    pub url: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransmissionError {
    #[error("upload rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upload transport error: {0}")]
    Transport(String),

    #[error("upload payload is {size} bytes, limit is {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("invalid upload endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Sends one finished document to storage. Implementations never retry.
#[async_trait]
pub trait UploadClient: Send + Sync {
    async fn send(&self, request: &UploadRequest) -> Result<UploadAck, TransmissionError>;
}

/// [`UploadClient`] over HTTP with `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpUploadClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    max_payload_bytes: usize,
}

impl HttpUploadClient {
    pub fn new(config: &UploadConfig) -> Result<Self, TransmissionError> {
        let endpoint = reqwest::Url::parse(config.endpoint.trim())
            .map_err(|e| TransmissionError::InvalidEndpoint(format!("{}: {e}", config.endpoint)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(TransmissionError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransmissionError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            max_payload_bytes: config.max_payload_bytes,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl UploadClient for HttpUploadClient {
    #[tracing::instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn send(&self, request: &UploadRequest) -> Result<UploadAck, TransmissionError> {
        let body = serde_json::to_vec(request)
            .map_err(|e| TransmissionError::Transport(format!("encode request: {e}")))?;
        if body.len() > self.max_payload_bytes {
            return Err(TransmissionError::PayloadTooLarge {
                size: body.len(),
                limit: self.max_payload_bytes,
            });
        }

        tracing::debug!(bytes = body.len(), "posting document");
        let res = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransmissionError::Transport(e.to_string()))?;

        let status = res.status();
        let bytes = res.bytes().await.unwrap_or_else(|e| {
            tracing::warn!(%e, %status, "failed to read upload response body");
            Default::default()
        });
        if !status.is_success() {
            return Err(TransmissionError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let ack = serde_json::from_slice::<UploadAck>(&bytes).unwrap_or_else(|e| {
            tracing::warn!(%e, "unparsable upload acknowledgement");
            UploadAck::default()
        });
        Ok(UploadAck {
            success: true,
            ..ack
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/upload/client.rs"]
mod tests;
