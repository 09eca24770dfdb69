//! Client side of the measurement service.

use crate::configuration::ApiSettings;
use log::{info, warn};
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Error HTTP: {status}{}", detail_suffix(.message))]
    Http { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" - {}", m))
        .unwrap_or_default()
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            GatewayError::Transport(e) => e.status().map(|s| s.as_u16()),
            GatewayError::Decode(_) => None,
        }
    }
}

pub trait MeasurementGateway {
    /// Raw history payload, normally a JSON array of measurements.
    fn fetch_history(&self) -> impl Future<Output = Result<Value, GatewayError>>;

    /// Asks the service to measure `city` now and returns the stored record.
    fn submit_city_query(&self, city: &str) -> impl Future<Output = Result<Value, GatewayError>>;
}

/// Fetches history for the startup load. Any failure is logged and
/// degrades to an empty history.
pub async fn fetch_history_or_empty<G: MeasurementGateway>(gateway: &G) -> Value {
    match gateway.fetch_history().await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Could not load measurement history: {}", e);
            Value::Array(Vec::new())
        }
    }
}

#[derive(serde::Serialize)]
struct CityQuery<'a> {
    ciudad: &'a str,
}

/// The `error` field of a failure body, unless it is falsy (null, false,
/// zero or empty). Non-string values are rendered as JSON.
fn server_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub struct HttpGateway {
    http_client: reqwest::Client,
    measurements_url: String,
}

impl HttpGateway {
    pub fn new(settings: &ApiSettings) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        info!("Measurement service at {}", settings.base_url());
        Ok(Self::with_client(http_client, settings.measurements_url()))
    }

    pub fn with_client(http_client: reqwest::Client, measurements_url: String) -> Self {
        Self {
            http_client,
            measurements_url,
        }
    }

    async fn json_body(response: reqwest::Response) -> Result<Value, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| server_message(&body));
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

impl MeasurementGateway for HttpGateway {
    async fn fetch_history(&self) -> Result<Value, GatewayError> {
        let response = self.http_client.get(&self.measurements_url).send().await?;
        Self::json_body(response).await
    }

    async fn submit_city_query(&self, city: &str) -> Result<Value, GatewayError> {
        let response = self
            .http_client
            .post(&self.measurements_url)
            .json(&CityQuery { ciudad: city })
            .send()
            .await?;
        Self::json_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_error_message_with_server_detail() {
        let err = GatewayError::Http {
            status: 500,
            message: Some("city not found".into()),
        };
        assert_eq!(err.to_string(), "Error HTTP: 500 - city not found");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn http_error_message_without_detail() {
        let err = GatewayError::Http {
            status: 404,
            message: None,
        };
        assert_eq!(err.to_string(), "Error HTTP: 404");
    }

    #[test]
    fn falsy_server_messages_are_dropped() {
        assert_eq!(server_message(&json!({ "error": "" })), None);
        assert_eq!(server_message(&json!({ "error": null })), None);
        assert_eq!(server_message(&json!({ "error": false })), None);
        assert_eq!(server_message(&json!({ "error": 0 })), None);
        assert_eq!(server_message(&json!({ "detalle": "x" })), None);
        assert_eq!(server_message(&json!("plain")), None);
    }

    #[test]
    fn non_string_server_messages_are_rendered() {
        assert_eq!(server_message(&json!({ "error": 404 })), Some("404".into()));
        assert_eq!(server_message(&json!({ "error": true })), Some("true".into()));
        assert_eq!(
            server_message(&json!({ "error": "Ciudad no encontrada" })),
            Some("Ciudad no encontrada".into())
        );
    }

    #[test]
    fn city_query_body_shape() {
        let body = serde_json::to_value(CityQuery { ciudad: "Mar del Plata" }).unwrap();
        assert_eq!(body, json!({ "ciudad": "Mar del Plata" }));
    }
}
