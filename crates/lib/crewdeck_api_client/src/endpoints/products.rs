//! Product/service catalog endpoints.

use reqwest::Method;
use serde::Serialize;

use crewdeck_types::Product;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::routes;

/// Create/update body for a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl ApiClient {
    /// `GET /api/products`.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.request_data(
            Method::GET,
            routes::PRODUCTS,
            None,
            RequestOptions::authed(),
        )
        .await
    }

    /// `POST /api/products`.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let body = serde_json::to_value(input).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request_data(
            Method::POST,
            routes::PRODUCTS,
            Some(&body),
            RequestOptions::authed(),
        )
        .await
    }

    /// `PUT /api/products/:id`.
    pub async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        let body = serde_json::to_value(input).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request_data(
            Method::PUT,
            &routes::product(id),
            Some(&body),
            RequestOptions::authed(),
        )
        .await
    }

    /// `DELETE /api/products/:id`.
    pub async fn delete_product(&self, id: &str) -> Result<Option<String>, ApiError> {
        self.request_ack(
            Method::DELETE,
            &routes::product(id),
            None,
            RequestOptions::authed(),
        )
        .await
    }
}
