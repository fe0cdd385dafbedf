//! Dispatches classified routes to the repositories and turns every outcome,
//! including failures, into a JSON [`ApiResponse`].

use axum::http::StatusCode;
use serde_json::json;
use time::{macros::format_description, OffsetDateTime};
use tracing::{debug, error, warn};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    event::{ApiEvent, ApiResponse},
    routing::{classify, Collection, Route},
};

#[derive(Clone)]
pub struct Handler {
    state: AppState,
}

impl Handler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn handle(&self, event: ApiEvent) -> ApiResponse {
        let route = classify(&event);
        debug!(?route, "Dispatching request");

        match self.dispatch(route, &event).await {
            Ok(response) => response,
            Err(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    error!(error = %err, path = event.path(), method = %event.method(), "Request failed");
                } else {
                    warn!(error = %err, status = status.as_u16(), path = event.path(), "Request rejected");
                }
                err.into_response()
            }
        }
    }

    async fn dispatch(&self, route: Route, event: &ApiEvent) -> AppResult<ApiResponse> {
        let state = &self.state;
        let response = match route {
            Route::Preflight => ApiResponse::json(StatusCode::OK, &json!({ "ok": true })),
            Route::Health => health()?,

            Route::List(Collection::Properties) => {
                ApiResponse::json(StatusCode::OK, &state.properties.list().await?)
            }
            Route::List(Collection::Tenants) => {
                ApiResponse::json(StatusCode::OK, &state.tenants.list().await?)
            }
            Route::List(Collection::Leases) => {
                ApiResponse::json(StatusCode::OK, &state.leases.list().await?)
            }

            Route::Create(Collection::Properties) => {
                let property_id = state.properties.create(event.json_body()?).await?;
                ApiResponse::json(StatusCode::CREATED, &json!({ "property_id": property_id }))
            }
            Route::Create(Collection::Tenants) => {
                let tenant_id = state.tenants.create(event.json_body()?).await?;
                ApiResponse::json(StatusCode::CREATED, &json!({ "tenant_id": tenant_id }))
            }
            Route::Create(Collection::Leases) => {
                let lease_id = state.leases.create(event.json_body()?).await?;
                ApiResponse::json(StatusCode::CREATED, &json!({ "lease_id": lease_id }))
            }

            Route::Get(Collection::Properties, id) => {
                ApiResponse::json(StatusCode::OK, &state.properties.get(&id).await?)
            }
            Route::Get(Collection::Tenants, id) => {
                ApiResponse::json(StatusCode::OK, &state.tenants.get(&id).await?)
            }

            Route::Update(Collection::Properties, id) => {
                state.properties.update(&id, event.json_body()?).await?;
                ApiResponse::json(StatusCode::OK, &json!({ "ok": true }))
            }
            Route::Update(Collection::Tenants, id) => {
                state.tenants.update(&id, event.json_body()?).await?;
                ApiResponse::json(StatusCode::OK, &json!({ "ok": true }))
            }

            Route::Delete(collection, id) => {
                let deleted_id = match collection {
                    Collection::Properties => state.properties.delete(&id).await?,
                    Collection::Tenants => state.tenants.delete(&id).await?,
                    Collection::Leases => state.leases.delete(&id).await?,
                };
                ApiResponse::json(StatusCode::OK, &json!({ "ok": true, "deleted_id": deleted_id }))
            }

            // classify() never yields these; leases have no get/update by id.
            Route::Get(Collection::Leases, _) | Route::Update(Collection::Leases, _) => {
                unknown_route(event.path(), &event.method())
            }
            Route::Unmatched { path, method } => unknown_route(&path, &method),
        };
        Ok(response)
    }
}

fn unknown_route(path: &str, method: &str) -> ApiResponse {
    ApiResponse::json(
        StatusCode::NOT_FOUND,
        &json!({ "error": "unknown route", "path": path, "method": method }),
    )
}

fn health() -> AppResult<ApiResponse> {
    let ts_utc = OffsetDateTime::now_utc()
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
        ))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(ApiResponse::json(
        StatusCode::OK,
        &json!({ "ok": true, "ts_utc": ts_utc }),
    ))
}
