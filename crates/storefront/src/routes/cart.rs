//! Cart route handlers.
//!
//! The cart is selected by the key stored in the shopper's session. Reads
//! against a session without a cart return an empty cart; only adding an
//! item assigns a key.

use axum::{
    Json,
    extract::{Path, State},
};
use mercado_core::{Cents, InstallmentQuote, LineItem, ProductId, QuantityUpdate};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiJson, AppError, Result, add_breadcrumb};
use crate::middleware::CartSession;
use crate::services::CartSummary;
use crate::state::AppState;

/// Cart contents with derived totals.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub subtotal_cents: Cents,
    pub shipping_cents: Cents,
    pub total_cents: Cents,
}

impl From<CartSummary> for CartResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            items: summary.items,
            subtotal_cents: summary.totals.subtotal_cents,
            shipping_cents: summary.totals.shipping_cents,
            total_cents: summary.totals.total_cents,
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartBody {
    /// Any integer; ids outside the catalog's range are unknown products.
    pub product_id: i64,
    pub qty: i64,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityBody {
    pub qty: i64,
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Confirmation of a quantity update with its outcome.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: &'static str,
    pub outcome: QuantityUpdate,
}

/// Installment preview for the current cart.
#[derive(Debug, Serialize)]
pub struct InstallmentsResponse {
    pub total_cents: Cents,
    pub options: Vec<InstallmentQuote>,
}

/// Show the cart.
#[instrument(skip(state, cart))]
pub async fn show(State(state): State<AppState>, cart: CartSession) -> Json<CartResponse> {
    let summary = state.carts().summary(cart.key(), state.pricing()).await;
    Json(summary.into())
}

/// Add an item to the cart.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: CartSession,
    ApiJson(body): ApiJson<AddToCartBody>,
) -> Result<Json<MessageResponse>> {
    let product_id = u32::try_from(body.product_id)
        .map(ProductId::new)
        .map_err(|_| AppError::NotFound("Produto não encontrado".to_string()))?;
    let key = cart.key_or_create().await?;

    let item = state
        .carts()
        .add(key, state.catalog(), product_id, body.qty)
        .await?;

    tracing::info!(
        cart = %key,
        product_id = %product_id,
        qty = item.qty,
        line_total_cents = item.line_total_cents.as_i64(),
        "Added to cart"
    );
    add_breadcrumb(
        "cart",
        "Added to cart",
        &[
            ("product_id", product_id.to_string()),
            ("qty", body.qty.to_string()),
        ],
    );

    Ok(Json(MessageResponse {
        message: "Produto adicionado ao carrinho",
    }))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(state, cart))]
pub async fn update(
    State(state): State<AppState>,
    cart: CartSession,
    Path(product_id): Path<String>,
    ApiJson(body): ApiJson<UpdateQuantityBody>,
) -> Result<Json<UpdateResponse>> {
    let outcome = match (cart.key(), product_id.trim().parse::<u32>()) {
        (Some(key), Ok(id)) => {
            state
                .carts()
                .set_quantity(key, ProductId::new(id), body.qty)
                .await?
        }
        _ => QuantityUpdate::NoOp,
    };

    if outcome == QuantityUpdate::NoOp {
        tracing::info!(product_id = %product_id, qty = body.qty, "Quantity update matched no cart line");
    } else {
        tracing::info!(product_id = %product_id, qty = body.qty, ?outcome, "Cart quantity updated");
    }

    Ok(Json(UpdateResponse {
        message: "Carrinho atualizado",
        outcome,
    }))
}

/// Empty the cart.
#[instrument(skip(state, cart))]
pub async fn clear(State(state): State<AppState>, cart: CartSession) -> Json<MessageResponse> {
    if let Some(key) = cart.key() {
        state.carts().clear(key).await;
        tracing::info!(cart = %key, "Cart cleared");
    }

    Json(MessageResponse {
        message: "Carrinho limpo",
    })
}

/// Installment options for the current cart total.
///
/// Uses the same pricing policy as checkout, so the preview always matches
/// what checkout charges.
#[instrument(skip(state, cart))]
pub async fn installments(
    State(state): State<AppState>,
    cart: CartSession,
) -> Result<Json<InstallmentsResponse>> {
    let summary = state.carts().summary(cart.key(), state.pricing()).await;
    let total_cents = summary.totals.total_cents;
    let options = state.pricing().installment_options(total_cents)?;

    Ok(Json(InstallmentsResponse {
        total_cents,
        options,
    }))
}
