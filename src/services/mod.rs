// One function per risk API endpoint.
//
// Every call resolves to a `ServiceResponse`; transport failures, error
// statuses and undecodable bodies all become `Failure(message)`.

pub mod metrics;
pub mod orders;
pub mod policy;
pub mod stores;
pub mod tickets;

use crate::observability::MetricsRecorder;
use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Outcome of a single backend call
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse<T> {
    Success(T),
    Failure(String),
}

impl<T> ServiceResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResponse::Success(_))
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ServiceResponse::Success(data) => Ok(data),
            ServiceResponse::Failure(message) => Err(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ServiceResponse<U> {
        match self {
            ServiceResponse::Success(data) => ServiceResponse::Success(f(data)),
            ServiceResponse::Failure(message) => ServiceResponse::Failure(message),
        }
    }
}

/// The backend wraps every payload as `{ "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

/// Error body shape the backend uses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error_message: Option<serde_json::Value>,
}

/// Message used when a failed response carries no usable `error_message`
pub fn fallback_message(status: StatusCode) -> String {
    format!("Falha na requisição (status {})", status.as_u16())
}

/// Pull `error_message` out of an error body, falling back to a generic
/// message for empty, non-JSON or differently shaped bodies.
pub fn extract_error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error_message)
        .and_then(|value| match value {
            serde_json::Value::String(message) => Some(message),
            _ => None,
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback_message(status))
}

/// Send a prepared request and decode the response body
pub(crate) async fn execute<T: DeserializeOwned>(
    endpoint: &'static str,
    request: RequestBuilder,
) -> ServiceResponse<T> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(endpoint, error = %e, "Backend unreachable");
            MetricsRecorder::record_backend_call(endpoint, "transport_error");
            return ServiceResponse::Failure(
                "Não foi possível conectar ao servidor".to_string(),
            );
        }
    };

    let status = response.status();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(endpoint, %status, error = %e, "Failed to read backend response");
            MetricsRecorder::record_backend_call(endpoint, "transport_error");
            return ServiceResponse::Failure(fallback_message(status));
        }
    };

    if !status.is_success() {
        let message = extract_error_message(status, &body);
        tracing::warn!(endpoint, %status, error = %message, "Backend returned an error");
        MetricsRecorder::record_backend_call(endpoint, "error");
        return ServiceResponse::Failure(message);
    }

    match serde_json::from_slice::<T>(&body) {
        Ok(data) => {
            tracing::debug!(endpoint, %status, "Backend call succeeded");
            MetricsRecorder::record_backend_call(endpoint, "success");
            ServiceResponse::Success(data)
        }
        Err(e) => {
            tracing::warn!(endpoint, error = %e, "Backend response did not match the expected shape");
            MetricsRecorder::record_backend_call(endpoint, "decode_error");
            ServiceResponse::Failure("Resposta inesperada do servidor".to_string())
        }
    }
}

/// Percent-encode an identifier for use as a single path segment
pub(crate) fn path_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
