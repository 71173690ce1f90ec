//! storefront — single-shop e-commerce backend
//!
//! Long-running service that:
//! - Creates Razorpay orders and verifies payment signatures (HMAC-SHA256)
//! - Tracks the order lifecycle (created → paid / payment_failed)
//! - Accepts product reviews
//! - Provides email/password accounts with opaque bearer tokens
//! - Persists everything in a single JSON document on disk
//!
//! # Module structure
//!
//! ```text
//! storefront/src/
//! ├── config/    # Environment configuration
//! ├── state/     # Shared application state
//! ├── error/     # Unified error type
//! ├── store/     # JSON document store (file + in-memory backends)
//! ├── models/    # Persisted entities (orders, reviews, users)
//! ├── razorpay/  # Payment gateway client + signature helpers
//! ├── orders/    # Order lifecycle service
//! ├── auth/      # Account service (register / login / tokens)
//! └── api/       # HTTP routes and handlers
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod orders;
pub mod razorpay;
pub mod state;
pub mod store;
pub mod util;

// Re-export common types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
