//! Service seams
//!
//! Traits the search and checkout flows depend on, so they can be driven by
//! mocks in tests and by [`ApiClient`] in the binary.

use async_trait::async_trait;
use medstore::{
    medicines::Medicine,
    orders::{Order, OrderRequest},
};
use mockall::automock;

use crate::api::{ApiClient, ApiError};

/// Catalog lookups.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Medicines matching `query`, at most `limit` of them.
    async fn search_medicines(&self, query: &str, limit: usize) -> Result<Vec<Medicine>, ApiError>;
}

/// Order submission.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Submit an order and return it as created.
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, ApiError>;
}

#[async_trait]
impl CatalogService for ApiClient {
    async fn search_medicines(&self, query: &str, limit: usize) -> Result<Vec<Medicine>, ApiError> {
        let response = ApiClient::search_medicines(self, query, limit).await?;

        Ok(response.medicines)
    }
}

#[async_trait]
impl OrdersService for ApiClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        ApiClient::create_order(self, request).await
    }
}
