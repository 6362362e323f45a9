//! Request and response handling shared by the HTTP providers.

use std::time::Instant;

use reqwest::{RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::debug;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;

/// API key for the request, or an authentication error before any I/O.
pub(crate) fn require_api_key(config: &ProviderConfig) -> Result<&str, ProviderError> {
    let key = config.api_key.expose_secret();
    if key.trim().is_empty() {
        return Err(ProviderError::Authentication {
            provider: config.provider_kind,
            reason: "no API key configured".to_string(),
        });
    }
    Ok(key)
}

/// Join the configured base URL (or `default_base`) with `path`.
pub(crate) fn endpoint(config: &ProviderConfig, default_base: &str, path: &str) -> String {
    let base = config.base_url.as_deref().unwrap_or(default_base);
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Send a request and return the body of a successful response.
///
/// 401 and 403 map to [`ProviderError::Authentication`]; any other
/// non-success status maps to [`ProviderError::Backend`].
pub(crate) async fn send(
    provider: ProviderKind,
    request: RequestBuilder,
) -> Result<String, ProviderError> {
    let started = Instant::now();
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;

    debug!(
        "{provider} responded {status} after {}ms ({} bytes)",
        started.elapsed().as_millis(),
        body.len()
    );

    if status.is_success() {
        return Ok(body);
    }

    let message = backend_message(status, &body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Authentication {
            provider,
            reason: message,
        }),
        _ => Err(ProviderError::Backend {
            provider,
            status: status.as_u16(),
            message,
        }),
    }
}

/// Human-readable error text from a failed response.
///
/// Understands `{"error": {"message"}}`, `{"error": "..."}` and
/// `{"code", "message"}` bodies; otherwise returns the raw body.
fn backend_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let nested = json
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(Value::as_str);
        let flat = json.get("message").and_then(Value::as_str);

        if let Some(message) = nested.or(flat) {
            return match json.get("code").and_then(Value::as_str) {
                Some(code) if nested.is_none() => format!("{code}: {message}"),
                _ => message.to_string(),
            };
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no error message")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Decode a successful response body.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    provider: ProviderKind,
    body: &str,
) -> Result<T, ProviderError> {
    if body.trim().is_empty() {
        return Err(ProviderError::EmptyResponse { provider });
    }
    serde_json::from_str(body).map_err(|e| ProviderError::InvalidResponse {
        provider,
        detail: e.to_string(),
    })
}

/// Finish generated text: drop leading and trailing blank lines, and
/// reject text with nothing left.
pub(crate) fn finish_text(
    provider: ProviderKind,
    text: Option<String>,
) -> Result<String, ProviderError> {
    let text = text.map(|t| trim_blank_lines(&t)).unwrap_or_default();
    if text.is_empty() {
        return Err(ProviderError::EmptyResponse { provider });
    }
    Ok(text)
}

/// Remove whitespace-only lines from both ends; interior text is untouched.
pub fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let is_blank = |line: &&str| line.trim().is_empty();

    let Some(start) = lines.iter().position(|l| !is_blank(l)) else {
        return String::new();
    };
    let end = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(start);

    lines[start..=end].join("\n")
}
