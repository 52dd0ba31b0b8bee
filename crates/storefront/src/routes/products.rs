//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use mercado_core::{Product, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// List the catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().products().to_vec())
}

/// Show one product.
///
/// Ids that are not numbers are reported as not found, like unknown ids.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    id.trim()
        .parse::<u32>()
        .ok()
        .and_then(|id| state.catalog().find(ProductId::new(id)))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Produto não encontrado".to_string()))
}
