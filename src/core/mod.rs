//! Core business logic - framework-agnostic catalog, cart, checkout and
//! account operations.
//!
//! Every function here takes its database handle explicitly. Functions that
//! must be atomic open their own transaction; the others are generic over
//! `ConnectionTrait` so they can run inside one.

/// Administrator account overview
pub mod accounts;
/// Cancellation of purchase groups
pub mod cancellation;
/// Session shopping cart
pub mod cart;
/// Deposits into employee accounts
pub mod deposit;
/// Employee accounts and preferences
pub mod employee;
/// Purchase grouping, history and filtering
pub mod history;
/// Cancellation key generation
pub mod keys;
/// Exact currency amounts
pub mod money;
/// Notification emails
pub mod notification;
/// Page windows for list views
pub mod pagination;
/// Product catalog and administration
pub mod product;
/// Checkout
pub mod purchase;
