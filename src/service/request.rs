//! Request/response contract shared by the handlers
//!
//! A handler sees only the method, the query parameters, and the raw body,
//! and answers with a status, headers, and a JSON body. The HTTP host and
//! the gateway adapter both translate into and out of these types.

use async_trait::async_trait;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;

use super::headers::{
    content_types, cors, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
};
use crate::domain::StudentId;
use crate::Result;

/// Body sent with a 405 response
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

#[derive(Debug, Clone, Default)]
pub struct ServiceRequest {
    pub method: Method,
    pub query: HashMap<String, String>,
    pub body: Option<String>,
}

impl ServiceRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Parse the body as JSON; an absent body is read as `{}`
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(self.body.as_deref().unwrap_or("{}"))?)
    }
}

#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ServiceResponse {
    /// JSON response carrying the common CORS headers
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_types::JSON));
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(cors::ALLOW_ANY_ORIGIN),
        );
        Ok(Self {
            status,
            headers,
            body: serde_json::to_string(value)?,
        })
    }

    /// Empty 200 answering a CORS preflight
    pub fn preflight(allowed_methods: &'static str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(cors::ALLOW_ANY_ORIGIN),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(allowed_methods),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(cors::ALLOWED_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(cors::PREFLIGHT_MAX_AGE),
        );
        Self {
            status: StatusCode::OK,
            headers,
            body: String::new(),
        }
    }

    pub fn method_not_allowed() -> Result<Self> {
        Self::json(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorBody {
                error: METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            },
        )
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// `{"error": ...}` body of handled failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"success": true}` acknowledgement, optionally echoing an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StudentId>,
}

impl Acknowledgement {
    pub fn success() -> Self {
        Self {
            success: true,
            id: None,
        }
    }

    pub fn created(id: StudentId) -> Self {
        Self {
            success: true,
            id: Some(id),
        }
    }
}

/// A method-dispatching request handler
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Value of `Access-Control-Allow-Methods` on preflight responses
    fn allowed_methods(&self) -> &'static str;

    async fn handle(&self, request: ServiceRequest) -> Result<ServiceResponse>;
}
