//! Order endpoints

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::models::Order;
use crate::orders::{
    CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::state::AppState;

use super::ApiResult;

/// POST /create-order
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<CreateOrderResponse> {
    Ok(Json(state.orders.create_order(req).await?))
}

/// POST /verify-payment
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(req): Json<VerifyPaymentRequest>,
) -> ApiResult<VerifyPaymentResponse> {
    Ok(Json(state.orders.verify_payment(req).await?))
}

/// GET /orders
pub async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.orders.list_orders().await)
}

/// GET /my-orders/phone/{phone}
pub async fn orders_by_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Json<Vec<Order>> {
    Json(state.orders.find_by_phone(&phone).await)
}

/// GET /my-orders/email/{email}
pub async fn orders_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Json<Vec<Order>> {
    Json(state.orders.find_by_email(&email).await)
}

/// PATCH /update-status/{id} body
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
    pub eta: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub order: Order,
}

/// PATCH /update-status/{id}
pub async fn update_status(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<UpdateStatusResponse> {
    let order = state.orders.update_status(&key, req.status, req.eta).await?;
    Ok(Json(UpdateStatusResponse {
        success: true,
        order,
    }))
}

#[derive(Debug, Serialize)]
pub struct DeleteOrderResponse {
    pub success: bool,
    pub removed: usize,
}

/// DELETE /delete-order/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteOrderResponse> {
    let removed = state.orders.delete_order(&key).await;
    Json(DeleteOrderResponse {
        success: true,
        removed,
    })
}
