//! Per-visitor session storage.
//!
//! The only thing a session holds is the visitor's shopping cart. The cart
//! logic never touches the store; callers load a cart, pass it through a
//! cart operation and store the result.

use crate::core::cart::ShoppingCart;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::trace;

/// Visitor id → shopping cart.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    carts: Arc<RwLock<HashMap<String, ShoppingCart>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The visitor's cart, empty if there is none.
    pub async fn cart(&self, visitor: &str) -> ShoppingCart {
        self.carts
            .read()
            .await
            .get(visitor)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the visitor's cart. Storing an empty cart ends the session.
    pub async fn store(&self, visitor: &str, cart: ShoppingCart) {
        let mut carts = self.carts.write().await;
        if cart.is_empty() {
            carts.remove(visitor);
        } else {
            trace!("Storing cart with {} item(s) for {visitor}", cart.count());
            carts.insert(visitor.to_string(), cart);
        }
    }

    /// Removes and returns the visitor's cart.
    pub async fn take(&self, visitor: &str) -> ShoppingCart {
        self.carts
            .write()
            .await
            .remove(visitor)
            .unwrap_or_default()
    }

    /// Drops the visitor's cart.
    pub async fn clear(&self, visitor: &str) {
        self.carts.write().await.remove(visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_round_trip() {
        let sessions = SessionStore::new();
        assert!(sessions.cart("alice").await.is_empty());

        let cart = ShoppingCart::default().with_quantity("Espresso", 2);
        sessions.store("alice", cart.clone()).await;
        assert_eq!(sessions.cart("alice").await, cart);
        assert!(sessions.cart("bob").await.is_empty());

        assert_eq!(sessions.take("alice").await, cart);
        assert!(sessions.cart("alice").await.is_empty());
    }

    #[tokio::test]
    async fn test_storing_empty_cart_clears_session() {
        let sessions = SessionStore::new();
        sessions
            .store("alice", ShoppingCart::default().with_quantity("Mate", 1))
            .await;
        sessions.store("alice", ShoppingCart::default()).await;
        assert!(sessions.take("alice").await.is_empty());

        sessions
            .store("bob", ShoppingCart::default().with_quantity("Mate", 1))
            .await;
        sessions.clear("bob").await;
        assert!(sessions.cart("bob").await.is_empty());
    }
}
