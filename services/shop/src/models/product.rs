//! Product model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Shoes,
}

impl Category {
    /// Get the category as the string stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothing => "clothing",
            Category::Shoes => "shoes",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown product category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "clothing" => Ok(Category::Clothing),
            "shoes" => Ok(Category::Shoes),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Category,
    pub sizes: Vec<String>,
    pub image_url: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated scalar fields of a product, written in full on create and update
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Category,
    pub sizes: Vec<String>,
}

/// New product creation payload
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub fields: ProductFields,
    pub image_url: String,
    pub created_by: Option<Uuid>,
}
