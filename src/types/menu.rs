//! Menu models: categories and products.
//!
//! Prices travel as decimal strings to preserve precision; the client never
//! does arithmetic on them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product category returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: Uuid,
    pub name: String,
}

/// Payload for creating a category.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
}

/// Partial PATCH payload for a category rename.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub new_name: String,
}

/// A product retrieved from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: Uuid,
    /// Decimal string, e.g. `"12.50"`.
    pub price: String,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Uuid,
    /// Decimal string, e.g. `"12.50"`.
    pub price: String,
}

/// Partial PATCH payload for a product; `None` fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_category: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_price: Option<String>,
}

/// Response of a product image upload.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpdate {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_without_image() {
        let raw = r#"{
            "id": "a3bb189e-8bf9-3888-9912-ace4e6543002",
            "name": "Margherita",
            "description": "Tomato, mozzarella and fresh basil",
            "category": "b3bb189e-8bf9-3888-9912-ace4e6543002",
            "price": "8.90"
        }"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.image_url, None);
        assert_eq!(product.price, "8.90");
    }

    #[test]
    fn test_product_update_omits_unchanged_fields() {
        let update = ProductUpdate {
            new_price: Some("9.50".to_string()),
            ..Default::default()
        };
        let wire = serde_json::to_string(&update).unwrap();
        assert_eq!(wire, r#"{"newPrice":"9.50"}"#);
    }
}
