//! Persisted entities of the storefront document

pub mod order;
pub mod review;
pub mod user;

pub use order::{CartItem, CustomerInfo, Order, OrderStatus};
pub use review::Review;
pub use user::{User, UserProfile};
