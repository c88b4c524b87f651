use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::error;
use utoipa::ToSchema;

use crate::audit::ApiAuditLogger;
use crate::store::{Envelope, ErrorCode, PetStore};

/// Shared application state
pub struct AppState {
    pub store: RwLock<PetStore>,
    pub audit: Arc<ApiAuditLogger>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(PetStore::new()),
            audit: Arc::new(ApiAuditLogger::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> axum::response::Response {
        let status = if self.success {
            StatusCode::OK
        } else {
            match self.error.as_ref().map(|e| e.code) {
                Some(ErrorCode::NotFound) => StatusCode::NOT_FOUND,
                Some(ErrorCode::ValidationError) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };
        (status, Json(self)).into_response()
    }
}

/// Landing page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

/// API directory
#[derive(Serialize, ToSchema)]
pub struct ApiInfo {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}

/// Describe the available endpoints
#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "API directory", body = ApiInfo)
    ),
    tag = "system"
)]
pub async fn api_info() -> Json<ApiInfo> {
    let endpoints = [
        (
            "GET /pets",
            "List all pets (optional: ?species=dog&status=available)",
        ),
        ("GET /pets/{id}", "Get a specific pet"),
        ("POST /pets", "Create a new pet"),
        ("PUT /pets/{id}", "Update a pet"),
        ("DELETE /pets/{id}", "Delete a pet"),
    ];

    Json(ApiInfo {
        message: "Pet Adoption Center API".to_string(),
        endpoints: endpoints
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    })
}

/// Version information
#[derive(Serialize, ToSchema)]
pub struct VersionInfo {
    pub version: String,
}

/// Get service version
#[utoipa::path(
    get,
    path = "/version",
    responses(
        (status = 200, description = "Service version", body = VersionInfo)
    ),
    tag = "system"
)]
pub async fn get_version() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Query parameters for list pets
#[derive(Deserialize, ToSchema)]
pub struct ListPetsQuery {
    /// Filter by species (case-insensitive)
    pub species: Option<String>,
    /// Filter by adoption status
    pub status: Option<String>,
}

/// List all pets
#[utoipa::path(
    get,
    path = "/pets",
    params(
        ("species" = Option<String>, Query, description = "Filter by species"),
        ("status" = Option<String>, Query, description = "Filter by adoption status")
    ),
    responses(
        (status = 200, description = "List of pets", body = Envelope)
    ),
    tag = "pets"
)]
pub async fn list_pets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPetsQuery>,
) -> Envelope {
    let store = state.store.read().await;
    store.list(query.species.as_deref(), query.status.as_deref())
}

/// Get a pet by ID
#[utoipa::path(
    get,
    path = "/pets/{id}",
    params(
        ("id" = i64, Path, description = "Pet ID")
    ),
    responses(
        (status = 200, description = "Pet found", body = Envelope),
        (status = 404, description = "Pet not found", body = Envelope)
    ),
    tag = "pets"
)]
pub async fn get_pet(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Envelope {
    let store = state.store.read().await;
    store.get(id)
}

/// Create a new pet
#[utoipa::path(
    post,
    path = "/pets",
    request_body = Object,
    responses(
        (status = 200, description = "Pet created", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope)
    ),
    tag = "pets"
)]
pub async fn create_pet(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Envelope {
    let Some(data) = body.as_object() else {
        return Envelope::error(
            ErrorCode::ValidationError,
            "request body must be a JSON object",
        );
    };

    let env = state.store.write().await.create(data);
    if env.success
        && let Some(data) = &env.data
        && let Some(id) = data["id"].as_i64()
    {
        state
            .audit
            .pet_created(id, data["name"].as_str().unwrap_or_default());
    }
    env
}

/// Update a pet
#[utoipa::path(
    put,
    path = "/pets/{id}",
    params(
        ("id" = i64, Path, description = "Pet ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Pet updated", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 404, description = "Pet not found", body = Envelope),
        (status = 500, description = "Malformed status value", body = Envelope)
    ),
    tag = "pets"
)]
pub async fn update_pet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Envelope {
    let Some(data) = body.as_object() else {
        return Envelope::error(
            ErrorCode::ValidationError,
            "request body must be a JSON object",
        );
    };

    match state.store.write().await.update(id, data) {
        Ok(env) => {
            if env.success {
                state.audit.pet_updated(id);
            }
            env
        }
        // Malformed status bypasses the validation envelope entirely.
        Err(e) => {
            error!(pet_id = id, "update failed: {e}");
            Envelope::error(ErrorCode::InternalError, e.to_string())
        }
    }
}

/// Delete a pet
#[utoipa::path(
    delete,
    path = "/pets/{id}",
    params(
        ("id" = i64, Path, description = "Pet ID")
    ),
    responses(
        (status = 200, description = "Pet deleted", body = Envelope),
        (status = 404, description = "Pet not found", body = Envelope)
    ),
    tag = "pets"
)]
pub async fn delete_pet(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Envelope {
    let env = state.store.write().await.delete(id);
    if env.success {
        state.audit.pet_deleted(id);
    }
    env
}
