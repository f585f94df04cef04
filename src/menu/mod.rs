//! Thin client for the menu subsystem: categories and products.
//!
//! The order store only depends on this through [`ProductCatalog`] to
//! resolve product names for display. A dangling `product_id` resolves to
//! `None` and renders as unavailable, never as an error.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    prelude::*,
    types::{
        CategoryUpdate, ImageUpdate, NewCategory, NewProduct, Product, ProductCategory,
        ProductUpdate,
    },
    Credentials, Error, HttpClient,
};

/// Read-only product lookup used when rendering ordered products.
pub trait ProductCatalog: Send + Sync {
    fn product_by_id(&self, id: Uuid) -> Option<Product>;
}

/// In-memory catalog built from a products fetch.
#[derive(Debug, Default, Clone)]
pub struct MenuCache {
    products: HashMap<Uuid, Product>,
}

impl MenuCache {
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.id, product))
                .collect(),
        }
    }
}

impl ProductCatalog for MenuCache {
    fn product_by_id(&self, id: Uuid) -> Option<Product> {
        self.products.get(&id).cloned()
    }
}

/// REST client for category and product management.
#[derive(Debug, Clone)]
pub struct MenuService {
    http: HttpClient,
}

impl MenuService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))
    }

    fn encode<T: serde::Serialize>(value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| Error::Encode(e.to_string()))
    }

    /// `GET /public/product-categories`
    pub async fn product_categories(&self) -> Result<Vec<ProductCategory>> {
        let body = self.http.get("/public/product-categories", None).await?;
        Self::decode(&body)
    }

    /// `GET /public/products`
    pub async fn products(&self) -> Result<Vec<Product>> {
        let body = self.http.get("/public/products", None).await?;
        Self::decode(&body)
    }

    /// `GET /public/products?category_id=...`
    pub async fn products_by_category(&self, category_id: Uuid) -> Result<Vec<Product>> {
        let body = self
            .http
            .get(&format!("/public/products?category_id={category_id}"), None)
            .await?;
        Self::decode(&body)
    }

    /// `POST /admin/menu/categories`
    pub async fn add_category(
        &self,
        credentials: &Credentials,
        category: &NewCategory,
    ) -> Result<ProductCategory> {
        let body = self
            .http
            .post(
                "/admin/menu/categories",
                Some(credentials),
                Some(Self::encode(category)?),
            )
            .await?;
        Self::decode(&body)
    }

    /// `PATCH /admin/menu/categories/{id}`
    pub async fn update_category(
        &self,
        credentials: &Credentials,
        id: Uuid,
        update: &CategoryUpdate,
    ) -> Result<()> {
        self.http
            .patch(
                &format!("/admin/menu/categories/{id}"),
                Some(credentials),
                Self::encode(update)?,
            )
            .await?;
        Ok(())
    }

    /// `DELETE /admin/menu/categories/{id}`
    pub async fn delete_category(&self, credentials: &Credentials, id: Uuid) -> Result<()> {
        self.http
            .delete(&format!("/admin/menu/categories/{id}"), Some(credentials))
            .await?;
        Ok(())
    }

    /// `POST /admin/menu/products`
    pub async fn add_product(
        &self,
        credentials: &Credentials,
        product: &NewProduct,
    ) -> Result<Product> {
        let body = self
            .http
            .post(
                "/admin/menu/products",
                Some(credentials),
                Some(Self::encode(product)?),
            )
            .await?;
        Self::decode(&body)
    }

    /// `PATCH /admin/menu/products/{id}` with changed fields only.
    pub async fn update_product(
        &self,
        credentials: &Credentials,
        id: Uuid,
        update: &ProductUpdate,
    ) -> Result<()> {
        self.http
            .patch(
                &format!("/admin/menu/products/{id}"),
                Some(credentials),
                Self::encode(update)?,
            )
            .await?;
        Ok(())
    }

    /// `PUT /admin/menu/products/{id}/image` with the raw image bytes.
    pub async fn update_product_image(
        &self,
        credentials: &Credentials,
        id: Uuid,
        image: Vec<u8>,
    ) -> Result<ImageUpdate> {
        let body = self
            .http
            .put_bytes(
                &format!("/admin/menu/products/{id}/image"),
                Some(credentials),
                image,
            )
            .await?;
        Self::decode(&body)
    }

    /// `DELETE /admin/menu/products/{id}`
    pub async fn delete_product(&self, credentials: &Credentials, id: Uuid) -> Result<()> {
        self.http
            .delete(&format!("/admin/menu/products/{id}"), Some(credentials))
            .await?;
        Ok(())
    }

    /// `DELETE /admin/menu/products?category_id=...`
    pub async fn delete_products_by_category(
        &self,
        credentials: &Credentials,
        category_id: Uuid,
    ) -> Result<()> {
        self.http
            .delete(
                &format!("/admin/menu/products?category_id={category_id}"),
                Some(credentials),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_resolves_known_product_and_tolerates_dangling_id() {
        let product = Product {
            id: Uuid::new_v4(),
            name: "Espresso".to_string(),
            description: "Single shot, dark roast".to_string(),
            image_url: None,
            category: Uuid::new_v4(),
            price: "2.20".to_string(),
        };
        let cache = MenuCache::from_products(vec![product.clone()]);

        assert_eq!(cache.product_by_id(product.id), Some(product));
        assert_eq!(cache.product_by_id(Uuid::new_v4()), None);
    }
}
