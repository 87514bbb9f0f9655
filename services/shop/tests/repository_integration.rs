//! PostgreSQL repository tests
//!
//! They run the embedded migrations against `DATABASE_URL` and therefore need
//! a running server.

use common::database::{DatabaseConfig, init_pool, run_migrations};
use sqlx::{PgPool, migrate::Migrator};
use uuid::Uuid;

use shop::{
    models::{Category, NewProduct, NewUser, ProductFields, UpdateUser, WishlistToggle},
    repositories::{
        CartRepository, PgCartRepository, PgProductRepository, PgUserRepository,
        ProductRepository, UserRepository,
    },
};

static MIGRATOR: Migrator = sqlx::migrate!();

async fn pool() -> Result<PgPool, Box<dyn std::error::Error>> {
    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool, &MIGRATOR).await?;
    Ok(pool)
}

async fn new_user(users: &PgUserRepository) -> Result<Uuid, Box<dyn std::error::Error>> {
    let user = users
        .create(&NewUser {
            name: "A".to_string(),
            email: format!("{}@x.com", Uuid::new_v4()),
            password_hash: "hash".to_string(),
        })
        .await?;
    Ok(user.id)
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_user_email_is_unique() -> Result<(), Box<dyn std::error::Error>> {
    let users = PgUserRepository::new(pool().await?);
    let email = format!("{}@x.com", Uuid::new_v4());
    let new_user = NewUser {
        name: "A".to_string(),
        email: email.clone(),
        password_hash: "hash".to_string(),
    };

    let created = users.create(&new_user).await?;
    let err = users.create(&new_user).await.unwrap_err();
    assert!(err.is_conflict());

    let changes = UpdateUser {
        address: Some("1 Main St".to_string()),
        ..Default::default()
    };
    let updated = users.update(created.id, &changes).await?.unwrap();
    assert_eq!(updated.address, "1 Main St");
    assert_eq!(updated.email, email);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_cart_and_wishlist_rows() -> Result<(), Box<dyn std::error::Error>> {
    let pool = pool().await?;
    let users = PgUserRepository::new(pool.clone());
    let carts = PgCartRepository::new(pool);
    let user_id = new_user(&users).await?;
    let p1 = Uuid::new_v4();
    let p2 = Uuid::new_v4();

    assert_eq!(carts.toggle_wishlist(user_id, p1).await?, WishlistToggle::Added);
    assert_eq!(carts.toggle_wishlist(user_id, p2).await?, WishlistToggle::Added);
    assert_eq!(carts.toggle_wishlist(user_id, p1).await?, WishlistToggle::Removed);
    assert_eq!(carts.wishlist(user_id).await?, vec![p2]);

    carts.add_to_cart(user_id, p1).await?;
    carts.add_to_cart(user_id, p1).await?;
    carts.add_to_cart(user_id, p2).await?;
    let cart = carts.cart(user_id).await?;
    assert_eq!(cart[0].product, p1);
    assert_eq!(cart[0].quantity, 2);

    assert!(carts.set_cart_quantity(user_id, p2, i32::MAX).await?);
    assert!(!carts.add_to_cart(user_id, p2).await?);
    assert_eq!(carts.cart(user_id).await?[1].quantity, i32::MAX);

    assert!(carts.set_cart_quantity(user_id, p2, 7).await?);
    assert!(!carts.set_cart_quantity(user_id, Uuid::new_v4(), 7).await?);

    let lines = carts.cart_lines(user_id).await?;
    assert_eq!(lines[1].quantity, 7);
    assert_eq!(lines[1].name, None);
    assert_eq!(lines[1].price, 0.0);

    assert_eq!(carts.remove_from_cart(user_id, p1).await?, 1);
    carts.clear_cart(user_id).await?;
    assert!(carts.cart(user_id).await?.is_empty());

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_product_crud() -> Result<(), Box<dyn std::error::Error>> {
    let products = PgProductRepository::new(pool().await?);
    let mut fields = ProductFields {
        name: "Runner".to_string(),
        description: Some("Light".to_string()),
        price: 59.99,
        category: Category::Shoes,
        sizes: vec!["40".to_string(), "41".to_string()],
    };

    let product = products
        .create(&NewProduct {
            fields: fields.clone(),
            image_url: "http://shop.test/uploads/a.png".to_string(),
            created_by: None,
        })
        .await?;
    assert_eq!(products.find_by_id(product.id).await?.unwrap().sizes, fields.sizes);

    fields.description = None;
    let updated = products
        .update(product.id, &fields, "http://shop.test/uploads/b.png")
        .await?
        .unwrap();
    assert_eq!(updated.description, None);
    assert!(updated.image_url.ends_with("b.png"));

    assert!(products.delete(product.id).await?);
    assert!(!products.delete(product.id).await?);
    assert!(products.find_by_id(product.id).await?.is_none());

    Ok(())
}
