//! Product catalog endpoints

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::{TypedHeader, headers::Host};
use serde_json::json;

use super::{FormData, host_of, parse_id};
use crate::{
    catalog::ProductForm, error::ApiResult, jwt::Session, state::AppState, storage::ImageUpload,
};

/// Split a product form into its text fields and the `image` file
async fn read_product_form(
    multipart: Multipart,
) -> ApiResult<(ProductForm, Option<ImageUpload>)> {
    let mut form = FormData::read(multipart).await?;
    let fields = ProductForm {
        name: form.take("name"),
        description: form.take("description"),
        price: form.take("price"),
        category: form.take("category"),
        sizes: form.take("sizes"),
    };
    Ok((fields, form.take_file("image")))
}

pub async fn list_products(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.list().await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "product ID")?;
    Ok(Json(state.catalog.get(id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    session: Session,
    host: Option<TypedHeader<Host>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let (form, image) = read_product_form(multipart?).await?;
    let product = state
        .catalog
        .create(session, form, image, host_of(host).as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    host: Option<TypedHeader<Host>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "product ID")?;
    let (form, image) = read_product_form(multipart?).await?;
    let product = state
        .catalog
        .update(id, form, image, host_of(host).as_deref())
        .await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "product ID")?;
    state.catalog.delete(id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
