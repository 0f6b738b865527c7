use crate::error::{Error, ModelResult};
use error_stack::{ResultExt, report};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::value::Value;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
        }
    }
}

/// Converts a JSON object into a query string with keys sorted alphabetically.
/// `null` entries are skipped, strings are emitted without quotes.
///
/// # Errors
///
/// `Error::ParseError` if `value` is not a JSON object
pub fn value_to_sorted_querystring(value: &Value) -> ModelResult<String> {
    let mut pairs: Vec<(&String, String)> = match value {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let value_str = match v {
                    Value::String(s) => s.clone(),
                    _ => v.to_string(),
                };
                (k, value_str)
            })
            .collect(),
        _ => {
            return Err(report!(Error::ParseError)
                .attach_printable(format!("Invalid JSON Object: {value:?}")));
        }
    };

    pairs.sort_by(|a, b| a.0.cmp(b.0));
    Ok(pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<String>>()
        .join("&"))
}

/// Deserializes a successful response body, or turns a 4xx/5xx into
/// `Error::ReqwestError` carrying the status and body text
pub async fn handle_reqwest_response<T: DeserializeOwned>(response: Response) -> ModelResult<T> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let error_body = response.text().await.change_context(Error::ReqwestError(
            "Failed to get text from response".to_string(),
        ))?;

        error!(status = status.as_u16(), "Error Body: {}", &error_body);

        return Err(report!(Error::ReqwestError(format!(
            "HTTP {}: {error_body}",
            status.as_u16()
        ))));
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Json is the default when the server does not say otherwise
    if content_type.contains("application/json") || content_type.is_empty() {
        response.json().await.change_context(Error::SerdeDeserialize(
            "Failed to deserialize JSON".to_string(),
        ))
    } else {
        Err(report!(Error::ParseError)
            .attach_printable(format!("Unsupported Content-Type: {content_type}")))
    }
}
