//! Product catalog: create, read, update and delete with image assets
//!
//! Every product owns exactly one stored image. Replacing or deleting the
//! product removes the previous file from the image store.

use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    jwt::Session,
    models::{NewProduct, Product, ProductFields},
    repositories::ProductRepository,
    storage::{ImageStore, ImageUpload},
    validation::{optional, parse_category, parse_price, parse_sizes, required},
};

/// Raw text fields of a product form, before validation
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    /// JSON-encoded array, e.g. `["S","M"]` or `[38, 39]`
    pub sizes: Option<String>,
}

impl ProductForm {
    /// Validate the scalar fields; `sizes` is checked first
    pub fn validate(&self) -> ApiResult<ProductFields> {
        let sizes = parse_sizes(self.sizes.as_deref())?;
        Ok(ProductFields {
            name: required(self.name.as_deref(), "Name is required")?,
            description: optional(self.description.as_deref()),
            price: parse_price(self.price.as_deref())?,
            category: parse_category(self.category.as_deref())?,
            sizes,
        })
    }
}

#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    images: ImageStore,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>, images: ImageStore) -> Self {
        Self { products, images }
    }

    async fn store_image(&self, image: &ImageUpload, host: Option<&str>) -> ApiResult<String> {
        self.images.save(image, host).await.map_err(|e| {
            error!("Failed to store product image: {}", e);
            ApiError::InternalServerError
        })
    }

    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
    }

    /// Create a product; an image is mandatory
    pub async fn create(
        &self,
        session: Session,
        form: ProductForm,
        image: Option<ImageUpload>,
        host: Option<&str>,
    ) -> ApiResult<Product> {
        let image = image.ok_or_else(|| ApiError::Validation("Image is required".to_string()))?;
        image.ensure_image()?;
        let fields = form.validate()?;

        let image_url = self.store_image(&image, host).await?;
        let new_product = NewProduct {
            fields,
            image_url,
            created_by: session.user_id(),
        };

        match self.products.create(&new_product).await {
            Ok(product) => {
                info!("Created product {} ({})", product.id, product.name);
                Ok(product)
            }
            Err(e) => {
                self.images.discard(&new_product.image_url).await;
                Err(e.into())
            }
        }
    }

    /// Overwrite every field; the image is kept unless a new one is supplied
    pub async fn update(
        &self,
        id: Uuid,
        form: ProductForm,
        image: Option<ImageUpload>,
        host: Option<&str>,
    ) -> ApiResult<Product> {
        let existing = self.get(id).await?;
        let fields = form.validate()?;
        if let Some(image) = &image {
            image.ensure_image()?;
        }

        let image_url = match &image {
            Some(image) => self.store_image(image, host).await?,
            None => existing.image_url.clone(),
        };

        let result = match self.products.update(id, &fields, &image_url).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(ApiError::NotFound("Product not found".to_string())),
            Err(e) => Err(ApiError::from(e)),
        };
        let updated = match result {
            Ok(product) => product,
            Err(e) => {
                if image.is_some() {
                    self.images.discard(&image_url).await;
                }
                return Err(e);
            }
        };

        if image.is_some() && !existing.image_url.is_empty() {
            self.images.discard(&existing.image_url).await;
        }

        info!("Updated product {}", id);
        Ok(updated)
    }

    /// Delete the product and its stored image
    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let existing = self.get(id).await?;

        self.images.discard(&existing.image_url).await;
        if !self.products.delete(id).await? {
            return Err(ApiError::NotFound("Product not found".to_string()));
        }

        info!("Deleted product {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Category, repositories::MemoryStore};
    use axum::body::Bytes;
    use std::path::Path;

    fn form() -> ProductForm {
        ProductForm {
            name: Some("Tee".to_string()),
            description: Some("Cotton".to_string()),
            price: Some("19.5".to_string()),
            category: Some("clothing".to_string()),
            sizes: Some(r#"["S","M"]"#.to_string()),
        }
    }

    fn jpeg() -> ImageUpload {
        ImageUpload {
            file_name: Some("tee.JPG".to_string()),
            content_type: Some("image/jpeg".to_string()),
            bytes: Bytes::from_static(b"jpeg-bytes"),
        }
    }

    fn service(dir: &Path) -> CatalogService {
        CatalogService::new(
            Arc::new(MemoryStore::new()),
            ImageStore::new(dir, None),
        )
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_form_validation() {
        let fields = form().validate().unwrap();
        assert_eq!(fields.category, Category::Clothing);
        assert_eq!(fields.sizes, vec!["S", "M"]);
        assert_eq!(fields.price, 19.5);

        let mut bad_sizes = form();
        bad_sizes.sizes = Some("S,M".to_string());
        bad_sizes.name = None;
        let err = bad_sizes.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("Sizes")));

        let mut no_price = form();
        no_price.price = None;
        assert!(no_price.validate().is_err());
    }

    #[tokio::test]
    async fn test_create_requires_image() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(dir.path());

        let err = catalog
            .create(Session::Admin, form(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg == "Image is required"));

        let mut text = jpeg();
        text.content_type = Some("text/plain".to_string());
        assert!(catalog.create(Session::Admin, form(), Some(text), None).await.is_err());
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_create_stores_image_and_creator() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(dir.path());
        let user_id = Uuid::new_v4();

        let product = catalog
            .create(Session::User(user_id), form(), Some(jpeg()), Some("localhost:5000"))
            .await
            .unwrap();
        assert!(product.image_url.starts_with("http://localhost:5000/uploads/"));
        assert!(product.image_url.ends_with(".jpg"));
        assert_eq!(product.created_by, Some(user_id));
        assert_eq!(files_in(dir.path()), 1);

        let by_admin = catalog
            .create(Session::Admin, form(), Some(jpeg()), None)
            .await
            .unwrap();
        assert_eq!(by_admin.created_by, None);
        assert_eq!(catalog.list().await.unwrap()[0].id, by_admin.id);
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_and_replaces_image() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(dir.path());
        let product = catalog
            .create(Session::Admin, form(), Some(jpeg()), None)
            .await
            .unwrap();

        let mut changed = form();
        changed.description = None;
        changed.category = Some("shoes".to_string());
        let updated = catalog.update(product.id, changed, None, None).await.unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.category, Category::Shoes);
        assert_eq!(updated.image_url, product.image_url);

        let replaced = catalog
            .update(product.id, form(), Some(jpeg()), None)
            .await
            .unwrap();
        assert_ne!(replaced.image_url, product.image_url);
        assert_eq!(files_in(dir.path()), 1);

        let err = catalog
            .update(Uuid::new_v4(), form(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_image() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(dir.path());
        let product = catalog
            .create(Session::Admin, form(), Some(jpeg()), None)
            .await
            .unwrap();

        catalog.delete(product.id).await.unwrap();
        assert_eq!(files_in(dir.path()), 0);
        assert!(matches!(
            catalog.get(product.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            catalog.delete(product.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
