//! Signed-in user endpoints: dashboard, wishlist, cart and profile

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    response::IntoResponse,
};
use axum_extra::{TypedHeader, headers::Host};
use serde::Deserialize;
use serde_json::json;

use super::{ApiJson, FormData, host_of, parse_id};
use crate::{
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
    models::CartItem,
    profile::ProfileForm,
    state::AppState,
};

/// Body of the wishlist toggle and add-to-cart requests
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub product_id: Option<String>,
}

impl ProductRef {
    fn product_id(&self) -> ApiResult<uuid::Uuid> {
        let raw = self
            .product_id
            .as_deref()
            .ok_or_else(|| ApiError::Validation("Product ID is required".to_string()))?;
        parse_id(raw, "product ID")
    }
}

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: Option<i64>,
}

/// Quantity update addressed by a product ID in the body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuantityUpdate {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

fn quantity_of(raw: Option<i64>) -> ApiResult<i32> {
    let quantity = raw.ok_or_else(|| ApiError::Validation("Quantity is required".to_string()))?;
    i32::try_from(quantity)
        .map_err(|_| ApiError::Validation("Quantity is out of range".to_string()))
}

fn cart_response(message: &str, cart: Vec<CartItem>) -> Json<serde_json::Value> {
    Json(json!({ "message": message, "cart": cart }))
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let user = state.profile.dashboard(user_id).await?;
    Ok(Json(json!({
        "message": "Welcome to dashboard!",
        "user": user,
    })))
}

pub async fn get_wishlist(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.shopping.wishlist(user_id).await?))
}

pub async fn toggle_wishlist(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiJson(payload): ApiJson<ProductRef>,
) -> ApiResult<impl IntoResponse> {
    let product_id = payload.product_id()?;
    let (outcome, wishlist) = state.shopping.toggle_wishlist(user_id, product_id).await?;
    Ok(Json(json!({
        "message": outcome.message(),
        "wishlist": wishlist,
    })))
}

pub async fn get_cart(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.shopping.cart(user_id).await?))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiJson(payload): ApiJson<ProductRef>,
) -> ApiResult<impl IntoResponse> {
    let product_id = payload.product_id()?;
    let cart = state.shopping.add_to_cart(user_id, product_id).await?;
    Ok(cart_response("Product added to cart", cart))
}

pub async fn update_cart_quantity(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<String>,
    ApiJson(payload): ApiJson<QuantityUpdate>,
) -> ApiResult<impl IntoResponse> {
    let product_id = parse_id(&product_id, "product ID")?;
    let quantity = quantity_of(payload.quantity)?;

    let cart = state
        .shopping
        .update_quantity(user_id, product_id, quantity)
        .await?;
    Ok(cart_response("Cart updated", cart))
}

/// `PATCH /api/auth/cart` with `{productId, quantity}` in the body
pub async fn update_cart_quantity_body(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiJson(payload): ApiJson<CartQuantityUpdate>,
) -> ApiResult<impl IntoResponse> {
    let product_id = ProductRef {
        product_id: payload.product_id,
    }
    .product_id()?;
    let quantity = quantity_of(payload.quantity)?;

    let cart = state
        .shopping
        .update_quantity(user_id, product_id, quantity)
        .await?;
    Ok(cart_response("Cart updated", cart))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product_id = parse_id(&product_id, "product ID")?;
    let cart = state.shopping.remove_from_cart(user_id, product_id).await?;
    Ok(cart_response("Product removed from cart", cart))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let cart = state.shopping.clear_cart(user_id).await?;
    Ok(cart_response("Cart cleared", cart))
}

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.profile.profile(user_id).await?))
}

/// Multipart profile update; only non-empty fields are applied
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    host: Option<TypedHeader<Host>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let mut form = FormData::read(multipart?).await?;
    let fields = ProfileForm {
        name: form.take("name"),
        email: form.take("email"),
        address: form.take("address"),
        phone_number: form.take("phoneNumber"),
    };
    let image = form.take_file("profileImage");

    let profile = state
        .profile
        .update_profile(user_id, fields, image, host_of(host).as_deref())
        .await?;
    Ok(Json(profile))
}
