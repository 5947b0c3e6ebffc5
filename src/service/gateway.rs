//! Serverless gateway event adapter
//!
//! Lets the handlers run behind an HTTP-triggered function platform that
//! delivers `{httpMethod, queryStringParameters, body}` events and expects
//! `{statusCode, headers, body, isBase64Encoded}` back.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

use super::request::{RequestHandler, ServiceRequest, ServiceResponse};
use crate::{Error, Result};

fn default_http_method() -> String {
    Method::GET.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default = "default_http_method")]
    pub http_method: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl TryFrom<GatewayEvent> for ServiceRequest {
    type Error = Error;

    fn try_from(event: GatewayEvent) -> Result<Self> {
        let method = Method::from_bytes(event.http_method.as_bytes()).map_err(|_| {
            Error::InvalidGatewayEvent(format!("unsupported httpMethod {:?}", event.http_method))
        })?;

        let body = match event.body {
            Some(body) if event.is_base64_encoded => {
                let bytes = STANDARD
                    .decode(body.as_bytes())
                    .map_err(|e| Error::InvalidGatewayEvent(format!("body is not base64: {e}")))?;
                Some(String::from_utf8(bytes).map_err(|e| {
                    Error::InvalidGatewayEvent(format!("body is not UTF-8: {e}"))
                })?)
            }
            body => body,
        };

        Ok(ServiceRequest {
            method,
            query: event.query_string_parameters.unwrap_or_default(),
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<ServiceResponse> for GatewayResponse {
    fn from(response: ServiceResponse) -> Self {
        let headers = response
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Self {
            status_code: response.status.as_u16(),
            headers,
            body: response.body,
            is_base64_encoded: false,
        }
    }
}

/// Run a handler against a gateway event
#[instrument(skip(handler, event), fields(http_method = %event.http_method))]
pub async fn invoke(handler: &dyn RequestHandler, event: GatewayEvent) -> Result<GatewayResponse> {
    let request = ServiceRequest::try_from(event)?;
    let response = handler.handle(request).await?;
    Ok(response.into())
}
