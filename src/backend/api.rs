//! ureq client for the training service API.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::{ServiceError, TrainingBackend};
use crate::http_client;
use crate::pipeline::types::{
    DatasetSummary, PredictRequest, PredictResponse, RunOutcome, RunRequest,
};
use crate::settings::Settings;

const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

const UPLOAD_PATH: &str = "/datasets/upload";
const RUN_PATH: &str = "/pipeline/run";
const PREDICT_PATH: &str = "/pipeline/predict";

/// Errors specific to dataset upload, which starts from a local file.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// HTTP client bound to one service base URL and API key.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    api_base: String,
    api_key: String,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Self {
        Self {
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    /// Upload a dataset file and receive its summary.
    pub fn upload_dataset(&self, path: &Path) -> Result<DatasetSummary, UploadError> {
        let bytes = std::fs::read(path).map_err(|source| UploadError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("dataset");
        let boundary = multipart_boundary();
        let body = multipart_body(&boundary, filename, content_type_for(path), &bytes);

        let url = format!("{}{UPLOAD_PATH}", self.api_base);
        let request = http_client::agent()
            .post(&url)
            .set("Accept", "application/json")
            .set("X-API-Key", &self.api_key)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            );
        let response = match request.send_bytes(&body) {
            Ok(response) => response,
            Err(error) => return Err(map_request_error(error).into()),
        };
        Ok(parse_json_response(response)?)
    }

    /// Resolve a service-relative artifact path against the service origin.
    pub fn artifact_url(&self, download_path: &str) -> Option<Url> {
        let base = Url::parse(&self.api_base).ok()?;
        base.join(download_path).ok()
    }

    fn post_json<R: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<R, ServiceError> {
        let url = format!("{}{path}", self.api_base);
        let request = http_client::agent()
            .post(&url)
            .set("Accept", "application/json")
            .set("X-API-Key", &self.api_key);
        let response = match request.send_json(payload) {
            Ok(response) => response,
            Err(error) => return Err(map_request_error(error)),
        };
        parse_json_response(response)
    }
}

impl TrainingBackend for HttpBackend {
    fn run_pipeline(&self, request: &RunRequest) -> Result<RunOutcome, ServiceError> {
        self.post_json(RUN_PATH, request)
    }

    fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ServiceError> {
        self.post_json(PREDICT_PATH, request)
    }
}

fn map_request_error(error: ureq::Error) -> ServiceError {
    match error {
        ureq::Error::Status(status, response) => {
            let detail = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
                .ok()
                .and_then(|bytes| parse_error_detail(&bytes));
            ServiceError::Api { status, detail }
        }
        ureq::Error::Transport(transport) => ServiceError::Transport(transport.to_string()),
    }
}

fn parse_json_response<R: DeserializeOwned>(response: ureq::Response) -> Result<R, ServiceError> {
    let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
        .map_err(|err| ServiceError::InvalidResponse(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| ServiceError::InvalidResponse(err.to_string()))
}

/// Extract the `detail` string from a FastAPI-style error body.
fn parse_error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(str::to_string)
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(0);
    format!("pipewright-{nanos:x}")
}

fn multipart_body(boundary: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => "text/csv",
        Some("xlsx") => {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        }
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpBackend {
        HttpBackend::new(&Settings {
            api_base: "http://localhost:8000/api".to_string(),
            api_key: "key".to_string(),
        })
    }

    #[test]
    fn error_detail_is_extracted_from_json_body() {
        let detail = parse_error_detail(br#"{"detail": "Target column not found in dataset."}"#);
        assert_eq!(
            detail.as_deref(),
            Some("Target column not found in dataset.")
        );
    }

    #[test]
    fn non_json_and_detail_free_bodies_yield_no_detail() {
        assert_eq!(parse_error_detail(b"Internal Server Error"), None);
        assert_eq!(parse_error_detail(br#"{"error": "nope"}"#), None);
        assert_eq!(parse_error_detail(br#"{"detail": 42}"#), None);
    }

    #[test]
    fn multipart_body_wraps_file_between_boundaries() {
        let body = multipart_body("b0undary", "iris.csv", "text/csv", b"a,b\n1,2\n");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--b0undary\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"file\"; filename=\"iris.csv\"\r\n"));
        assert!(text.contains("Content-Type: text/csv\r\n\r\na,b\n1,2\n"));
        assert!(text.ends_with("\r\n--b0undary--\r\n"));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("data/iris.csv")), "text/csv");
        assert_eq!(
            content_type_for(Path::new("data/IRIS.XLSX")),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            content_type_for(Path::new("data/unknown.bin")),
            "application/octet-stream"
        );
    }

    #[test]
    fn artifact_url_resolves_against_service_origin() {
        let url = backend()
            .artifact_url("/api/models/m-42/download")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/models/m-42/download"
        );
    }

    #[test]
    fn trailing_slash_in_base_is_tolerated() {
        let backend = HttpBackend::new(&Settings {
            api_base: "http://localhost:8000/api/".to_string(),
            api_key: "key".to_string(),
        });
        assert_eq!(backend.api_base, "http://localhost:8000/api");
    }
}
