use futures_util::future::{AbortRegistration, Abortable};
use log::{error, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use url::Url;
use crate::client::config::ClientConfig;
use crate::client::models::app_state::UploadRequest;
use crate::client::models::extraction::{reply_message, ExtractionError, ExtractionResponse, RECEIVED_STATUS};
use crate::client::models::selected_file::PDF_CONTENT_TYPE;

const UPLOAD_PATH: &str = "upload-pdf";
const UPLOAD_FIELD: &str = "file";

/// HTTP client for the extraction service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ExtractionService {
    http: Client,
    endpoint: Url,
}

impl ExtractionService {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: upload_endpoint(&config.base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Read the selected file and upload it.
    pub async fn upload(&self, request: &UploadRequest) -> Result<ExtractionResponse, ExtractionError> {
        let bytes = tokio::fs::read(&request.path).await.map_err(|e| {
            error!("Unable to read '{}': {}", request.path.display(), e);
            ExtractionError::Transport(format!("could not read {}: {}", request.path.display(), e))
        })?;
        self.upload_bytes(&request.file_name, bytes).await
    }

    /// Same as [`upload`](Self::upload), resolving to `Cancelled` once the paired
    /// `AbortHandle` is aborted.
    pub async fn upload_abortable(
        &self,
        request: &UploadRequest,
        registration: AbortRegistration,
    ) -> Result<ExtractionResponse, ExtractionError> {
        match Abortable::new(self.upload(request), registration).await {
            Ok(outcome) => outcome,
            Err(_aborted) => {
                warn!("Upload of {} cancelled", request.file_name);
                Err(ExtractionError::Cancelled)
            }
        }
    }

    pub async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<ExtractionResponse, ExtractionError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(PDF_CONTENT_TYPE)
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        info!("📤 Uploading {} to {}", file_name, self.endpoint);
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body: Value = response.json().await.map_err(transport_error)?;
        let outcome = classify_reply(status.is_success(), body);
        match &outcome {
            Ok(r) => info!("✅ Extraction received ({} fields)", r.rows().len()),
            Err(e) => warn!("Extraction not received (HTTP {}): {}", status, e),
        }
        outcome
    }
}

fn transport_error(e: reqwest::Error) -> ExtractionError {
    error!("Extraction request failed: {}", e);
    let reason = if e.is_timeout() {
        format!("timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else if e.is_decode() {
        format!("invalid response body: {}", e)
    } else {
        e.to_string()
    };
    ExtractionError::Transport(reason)
}

/// `<base>/upload-pdf`, keeping any path prefix of the base URL.
pub fn upload_endpoint(base_url: &str) -> anyhow::Result<Url> {
    let mut base = Url::parse(base_url.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(UPLOAD_PATH)?)
}

/// Map a decoded reply to an outcome. Only a 2xx reply with `status == "received"` succeeds.
pub fn classify_reply(transport_ok: bool, body: Value) -> Result<ExtractionResponse, ExtractionError> {
    if body.is_null() {
        return Err(ExtractionError::Transport("empty response body".to_string()));
    }
    let received = body.get("status").and_then(Value::as_str) == Some(RECEIVED_STATUS);
    if transport_ok && received {
        ExtractionResponse::from_body(body)
            .map_err(|e| ExtractionError::Transport(format!("malformed extraction body: {}", e)))
    } else {
        Err(ExtractionError::Rejected { message: reply_message(&body) })
    }
}
