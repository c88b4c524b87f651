use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use super::handlers::{self, AppState};
use crate::pet::PetRepr;
use crate::store::{Envelope, EnvelopeError, ErrorCode};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pet Adoption Center API",
        version = "0.1.0",
        description = "REST API for managing pet-adoption records. All operations return a uniform {success, data|error} envelope.",
        license(name = "MIT")
    ),
    tags(
        (name = "system", description = "System information"),
        (name = "pets", description = "Pet CRUD operations")
    ),
    paths(
        handlers::get_version,
        handlers::api_info,
        handlers::list_pets,
        handlers::get_pet,
        handlers::create_pet,
        handlers::update_pet,
        handlers::delete_pet,
    ),
    components(schemas(
        handlers::VersionInfo,
        handlers::ApiInfo,
        handlers::ListPetsQuery,
        Envelope,
        EnvelopeError,
        ErrorCode,
        PetRepr,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages & system
        .route("/", get(handlers::index))
        .route("/api", get(handlers::api_info))
        .route("/version", get(handlers::get_version))
        .route("/api-docs/openapi.json", get(openapi_json))
        // Pets
        .route("/pets", get(handlers::list_pets))
        .route("/pets", post(handlers::create_pet))
        .route("/pets/{id}", get(handlers::get_pet))
        .route("/pets/{id}", put(handlers::update_pet))
        .route("/pets/{id}", delete(handlers::delete_pet))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
