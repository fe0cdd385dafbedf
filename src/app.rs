use std::collections::HashMap;

use axum::{
    body::{Body, Bytes},
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::{
    app_state::AppState,
    event::{ApiEvent, ApiResponse},
    handler::Handler,
    middleware::tracing::observability_middleware,
};

/// Serves the dispatcher over plain HTTP. Routing is done by the dispatcher
/// itself, so every method and path goes to the fallback.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(middleware::from_fn(observability_middleware))
        .with_state(Handler::new(state))
}

async fn dispatch(
    State(handler): State<Handler>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let (query, body) = match (query, body) {
        (Ok(Query(query)), Ok(body)) => (query, body),
        (Err(rejection), _) => return rejected(rejection.status(), rejection.body_text()),
        (_, Err(rejection)) => return rejected(rejection.status(), rejection.body_text()),
    };

    let event = ApiEvent {
        http_method: Some(method.to_string()),
        path: Some(uri.path().to_string()),
        headers: Some(
            headers
                .iter()
                .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
                .collect(),
        ),
        query_string_parameters: (!query.is_empty()).then_some(query),
        path_parameters: None,
        body: (!body.is_empty()).then(|| Value::String(String::from_utf8_lossy(&body).into_owned())),
    };

    handler.handle(event).await.into_response()
}

/// Requests axum refuses before they reach the dispatcher still get a JSON
/// body and the CORS headers.
fn rejected(status: StatusCode, message: String) -> Response {
    warn!(status = status.as_u16(), error = %message, "Request rejected");
    ApiResponse::json(status, &json!({ "error": message })).into_response()
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        (status, headers, Body::from(self.body)).into_response()
    }
}
