//! API routes for storefront
//!
//! Handlers stay thin: extract, call the owning service, wrap the result.
//! Everything error-shaped funnels through [`AppError`]'s `IntoResponse`.

pub mod auth;
pub mod health;
pub mod orders;
pub mod reviews;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Result alias for JSON handlers
pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Order lifecycle + payment callback
    let orders = Router::new()
        .route("/create-order", post(orders::create_order))
        .route("/verify-payment", post(orders::verify_payment))
        .route("/orders", get(orders::list_orders))
        .route("/my-orders/phone/{phone}", get(orders::orders_by_phone))
        .route("/my-orders/email/{email}", get(orders::orders_by_email))
        .route("/update-status/{id}", patch(orders::update_status))
        .route("/delete-order/{id}", delete(orders::delete_order));

    // Reviews (public)
    let reviews = Router::new().route(
        "/reviews",
        get(reviews::list_reviews).post(reviews::create_review),
    );

    // Accounts
    let accounts = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(orders)
        .merge(reviews)
        .merge(accounts)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
