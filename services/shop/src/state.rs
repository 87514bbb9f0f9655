//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    auth::{AdminCredentials, AuthService},
    catalog::CatalogService,
    jwt::JwtService,
    profile::ProfileService,
    repositories::{CartRepository, ProductRepository, UserRepository},
    shopping::ShoppingService,
    storage::ImageStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub auth: AuthService,
    pub shopping: ShoppingService,
    pub profile: ProfileService,
    pub catalog: CatalogService,
    pub images: ImageStore,
    pub max_upload_bytes: usize,
}

/// Storage backends the services are built on
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        jwt_service: JwtService,
        admin: AdminCredentials,
        images: ImageStore,
        max_upload_bytes: usize,
    ) -> Self {
        let Repositories {
            users,
            carts,
            products,
        } = repositories;

        Self {
            auth: AuthService::new(users.clone(), carts.clone(), jwt_service.clone(), admin),
            shopping: ShoppingService::new(users.clone(), carts.clone()),
            profile: ProfileService::new(users, carts, images.clone()),
            catalog: CatalogService::new(products, images.clone()),
            jwt_service,
            images,
            max_upload_bytes,
        }
    }
}
