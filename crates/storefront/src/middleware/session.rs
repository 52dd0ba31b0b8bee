//! Session middleware configuration and the cart-key extractor.
//!
//! Sessions only scope carts: the session holds a single UUID under
//! [`CART_KEY`], and that UUID selects the shopper's cart in the
//! [`CartBook`](crate::services::carts::CartBook). Sessions are kept in
//! memory and vanish on restart along with the carts.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::carts::CartKey;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "mercado_session";

/// Session key holding the cart UUID.
pub const CART_KEY: &str = "cart_id";

/// Create the session layer with an in-memory store.
///
/// Sessions expire after the same idle period as carts.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let idle_seconds = i64::try_from(config.cart_idle_timeout.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_seconds),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Extractor giving access to the shopper's cart key.
///
/// Reading never creates a key; [`CartSession::key_or_create`] does, which
/// is what makes the session cookie appear on the first add.
pub struct CartSession {
    session: Session,
    key: Option<CartKey>,
}

impl CartSession {
    /// The cart key, if this session has one.
    #[must_use]
    pub const fn key(&self) -> Option<CartKey> {
        self.key
    }

    /// The cart key, assigning a new one to the session if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn key_or_create(&mut self) -> Result<CartKey, AppError> {
        if let Some(key) = self.key {
            return Ok(key);
        }
        let key = Uuid::new_v4();
        self.session.insert(CART_KEY, key).await?;
        self.key = Some(key);
        tracing::debug!(cart = %key, "Cart key assigned");
        Ok(key)
    }
}

impl<S> FromRequestParts<S> for CartSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let key = session.get::<CartKey>(CART_KEY).await?;

        Ok(Self { session, key })
    }
}
