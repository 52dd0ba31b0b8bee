//! Checkout route handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use mercado_core::{CheckoutError, CheckoutRequest, Order};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CartSession;
use crate::state::AppState;

/// Check out the session's cart.
///
/// An empty cart is reported before the body is looked at, so a shopper
/// with nothing to buy gets the empty-cart error even for a malformed form.
#[instrument(skip(state, cart, body))]
pub async fn checkout(
    State(state): State<AppState>,
    cart: CartSession,
    body: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<Order>> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let summary = state.carts().summary(cart.key(), state.pricing()).await;
            if summary.items.is_empty() {
                return Err(AppError::EmptyCart);
            }
            return Err(rejection.into());
        }
    };

    let result = state
        .carts()
        .checkout(cart.key(), state.pricing(), &request)
        .await;

    let order = match result {
        Ok(order) => order,
        Err(err) => {
            if !matches!(err, CheckoutError::EmptyCart) {
                tracing::warn!(error = %err, "Checkout rejected");
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        order_id = %order.order_id,
        payment_method = %order.payment_method,
        total_cents = order.total_cents.as_i64(),
        amount_charged_cents = order.amount_charged().as_i64(),
        items = order.items.len(),
        "Order placed"
    );
    add_breadcrumb(
        "checkout",
        "Order placed",
        &[
            ("order_id", order.order_id.to_string()),
            ("payment_method", order.payment_method.to_string()),
        ],
    );

    Ok(Json(order))
}
