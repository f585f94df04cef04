//! REST client for order sessions and ordered products.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    prelude::*,
    types::{OrderSession, OrderedProduct, SessionUpdate},
    Credentials, Error, HttpClient,
};

/// Order-related REST operations, abstracted so the store can be driven by a
/// fake in tests.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// `GET /admin/orders/sessions`
    async fn order_sessions(&self, credentials: &Credentials) -> Result<Vec<OrderSession>>;

    /// `POST /admin/orders/sessions`; the server assigns the id.
    async fn create_session(&self, credentials: &Credentials) -> Result<OrderSession>;

    /// `DELETE /admin/orders/sessions/{id}`
    async fn delete_session(&self, credentials: &Credentials, id: Uuid) -> Result<()>;

    /// `PATCH /admin/orders/sessions/{id}` with changed fields only.
    async fn update_session(
        &self,
        credentials: &Credentials,
        id: Uuid,
        update: &SessionUpdate,
    ) -> Result<()>;

    /// `GET /admin/orders/ordered-products`
    async fn ordered_products(&self, credentials: &Credentials) -> Result<Vec<OrderedProduct>>;
}

/// Default [`OrderApi`] over the shared [`HttpClient`].
#[derive(Debug, Clone)]
pub struct OrderService {
    http: HttpClient,
}

impl OrderService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl OrderApi for OrderService {
    async fn order_sessions(&self, credentials: &Credentials) -> Result<Vec<OrderSession>> {
        let body = self
            .http
            .get("/admin/orders/sessions", Some(credentials))
            .await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }

    async fn create_session(&self, credentials: &Credentials) -> Result<OrderSession> {
        let body = self
            .http
            .post("/admin/orders/sessions", Some(credentials), None)
            .await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }

    async fn delete_session(&self, credentials: &Credentials, id: Uuid) -> Result<()> {
        self.http
            .delete(&format!("/admin/orders/sessions/{id}"), Some(credentials))
            .await?;
        Ok(())
    }

    async fn update_session(
        &self,
        credentials: &Credentials,
        id: Uuid,
        update: &SessionUpdate,
    ) -> Result<()> {
        let body = serde_json::to_string(update).map_err(|e| Error::Encode(e.to_string()))?;
        self.http
            .patch(&format!("/admin/orders/sessions/{id}"), Some(credentials), body)
            .await?;
        Ok(())
    }

    async fn ordered_products(&self, credentials: &Credentials) -> Result<Vec<OrderedProduct>> {
        let body = self
            .http
            .get("/admin/orders/ordered-products", Some(credentials))
            .await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }
}
