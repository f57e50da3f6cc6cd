//! HTTP plumbing shared by the adapters.

use gateway_core::{GatewayError, ProviderId};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, trace};

/// Build the HTTP client used by an adapter
pub(crate) fn build_client(
    provider: ProviderId,
    timeout: Duration,
) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| {
            GatewayError::internal(format!("Failed to create HTTP client for {provider}: {e}"))
        })
}

/// Send a request and return the body of a successful response
pub(crate) async fn send(
    provider: ProviderId,
    request: RequestBuilder,
) -> Result<String, GatewayError> {
    let response = request.send().await.map_err(|e| {
        error!(provider = %provider, error = %e, "Provider request failed");
        GatewayError::provider(provider, format!("Request failed: {e}"), None, true)
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        GatewayError::provider(provider, format!("Failed to read response: {e}"), None, false)
    })?;

    trace!(provider = %provider, status = %status, body = %body, "Received provider response");

    if !status.is_success() {
        return Err(status_error(provider, status.as_u16(), &body));
    }

    Ok(body)
}

/// Send a request and decode a successful JSON response
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: ProviderId,
    request: RequestBuilder,
) -> Result<T, GatewayError> {
    let body = send(provider, request).await?;
    serde_json::from_str(&body).map_err(|e| {
        GatewayError::provider(provider, format!("Invalid response JSON: {e}"), None, false)
    })
}

/// Map a non-success status into a provider error; 429 and 5xx are retryable
pub(crate) fn status_error(provider: ProviderId, status: u16, body: &str) -> GatewayError {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorDetail {
        Object { message: String },
        Text(String),
    }

    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: ErrorDetail::Object { message } | ErrorDetail::Text(message),
        }) => message,
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    };

    let retryable = status == 429 || (500..=599).contains(&status);
    GatewayError::provider(provider, message, Some(status), retryable)
}

/// Reject empty completions
pub(crate) fn non_empty(provider: ProviderId, content: String) -> Result<String, GatewayError> {
    if content.trim().is_empty() {
        Err(GatewayError::provider(
            provider,
            "Empty response content",
            None,
            true,
        ))
    } else {
        Ok(content)
    }
}
