//! HTTP surface of the shop service

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequest, Multipart},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use axum_extra::{TypedHeader, headers::Host};
use serde_json::json;
use std::collections::HashMap;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::auth_middleware,
    state::AppState,
    storage::{ImageUpload, PUBLIC_PATH},
};

pub mod account;
pub mod auth;
pub mod products;

/// Create the router for the shop service
pub fn create_router(state: AppState) -> Router {
    let require_session = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let account_routes = Router::new()
        .route("/api/auth/dashboard", get(account::dashboard))
        .route(
            "/api/auth/wishlist",
            get(account::get_wishlist).post(account::toggle_wishlist),
        )
        .route(
            "/api/auth/cart",
            get(account::get_cart)
                .post(account::add_to_cart)
                .patch(account::update_cart_quantity_body)
                .delete(account::clear_cart),
        )
        .route(
            "/api/auth/cart/:productId",
            patch(account::update_cart_quantity).delete(account::remove_from_cart),
        )
        .route(
            "/api/auth/profile",
            get(account::get_profile).put(account::update_profile),
        )
        .route_layer(require_session.clone());

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/admin-login", post(auth::admin_login))
        .merge(account_routes)
        .route(
            "/api/products",
            get(products::list_products)
                .merge(post(products::create_product).route_layer(require_session.clone())),
        )
        .route(
            "/api/products/:id",
            get(products::get_product).merge(
                put(products::update_product)
                    .delete(products::delete_product)
                    .route_layer(require_session),
            ),
        )
        .nest_service(PUBLIC_PATH, ServeDir::new(state.images.root()))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "shop"
    }))
}

/// JSON body extractor whose rejections use the service's error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Parse an identifier taken from a path or a request body
pub(crate) fn parse_id(raw: &str, what: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::Validation(format!("Invalid {}", what)))
}

/// `host[:port]` of the request, used to build image URLs
pub(crate) fn host_of(host: Option<TypedHeader<Host>>) -> Option<String> {
    host.map(|TypedHeader(host)| match host.port() {
        Some(port) => format!("{}:{}", host.hostname(), port),
        None => host.hostname().to_string(),
    })
}

/// Text fields and files of a multipart form, keyed by field name
#[derive(Debug, Default)]
pub(crate) struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl FormData {
    /// Drain a multipart stream; file parts left empty by the client are ignored
    pub(crate) async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        ImageUpload {
                            file_name: Some(file_name),
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub(crate) fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub(crate) fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }
}
