//! HTTP-shaped invocation contract.
//!
//! Field names follow the API-gateway event format, so raw events delivered
//! by a function runtime deserialize straight into [`ApiEvent`].

use std::collections::{BTreeMap, HashMap};

use axum::http::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiEvent {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub query_string_parameters: Option<HashMap<String, String>>,
    pub path_parameters: Option<HashMap<String, String>>,
    /// Either a JSON document encoded as a string or an already decoded value.
    pub body: Option<Value>,
}

impl ApiEvent {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            http_method: Some(method.to_string()),
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query_param(mut self, name: &str, value: &str) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_path_param(mut self, name: &str, value: &str) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Upper-cased method, `GET` when absent.
    pub fn method(&self) -> String {
        match self.http_method.as_deref() {
            Some(m) if !m.is_empty() => m.to_uppercase(),
            _ => "GET".to_string(),
        }
    }

    pub fn path(&self) -> &str {
        match self.path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "/",
        }
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        non_empty(self.path_parameters.as_ref(), name)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        non_empty(self.query_string_parameters.as_ref(), name)
    }

    /// Decodes the body into a request schema. A missing or empty body is `{}`.
    pub fn json_body<T: DeserializeOwned>(&self) -> AppResult<T> {
        let value = match &self.body {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(Value::String(raw)) if raw.trim().is_empty() => Value::Object(Default::default()),
            Some(Value::String(raw)) => serde_json::from_str(raw)
                .map_err(|e| AppError::Validation(format!("invalid JSON body: {e}")))?,
            Some(other) => other.clone(),
        };
        serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("invalid request body: {e}")))
    }
}

fn non_empty<'a>(params: Option<&'a HashMap<String, String>>, name: &str) -> Option<&'a str> {
    params
        .and_then(|p| p.get(name))
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json; charset=utf-8"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
    ("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS"),
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Self {
        let headers = CORS_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        match serde_json::to_string(body) {
            Ok(body) => Self {
                status_code: status.as_u16(),
                headers,
                body,
            },
            Err(e) => Self {
                status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                headers,
                body: serde_json::json!({
                    "error": "internal error",
                    "details": e.to_string(),
                })
                .to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn json_body(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}
