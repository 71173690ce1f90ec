//! Order lifecycle service
//!
//! Owns every order mutation: creation (online via the payment gateway or
//! local for cash on delivery), payment verification, admin status updates,
//! deletion and the read-only queries. All writes go through the document
//! store's single-writer cycle; the gateway call happens before the store
//! is touched, so a failed creation never persists anything and a slow
//! gateway never blocks unrelated requests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{CartItem, CustomerInfo, Order, OrderStatus};
use crate::razorpay::PaymentGateway;
use crate::store::DocStore;
use crate::util;

pub const DEFAULT_CURRENCY: &str = "INR";

/// POST /create-order body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    /// Single-product checkout shortcut used by the storefront UI
    pub selected_product: Option<SelectedProduct>,
    pub customer: Option<CustomerInfo>,
    /// Cash on delivery: no gateway round-trip, `cod_<millis>` order id
    #[serde(default)]
    pub cod: bool,
}

/// Product block sent when the cart itself is empty
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProduct {
    pub name: Option<String>,
    pub price: f64,
    #[serde(default = "default_pack_quantity")]
    pub pack_quantity: u32,
}

fn default_pack_quantity() -> u32 {
    1
}

/// Checkout parameters returned to the storefront UI
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    /// Gateway order id to open checkout with
    pub order_id: String,
    /// Minor units (paise), as the gateway expects
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    /// Public key id; empty when the gateway is not in play
    pub key_id: String,
}

/// POST /verify-payment body, field names as Razorpay checkout posts them
#[derive(Debug, Default, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    /// Fallback correlation key for orders the gateway id cannot find
    pub receipt: Option<String>,
}

/// Verification outcome; `verified` is meaningful even without a match
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// Order mutations and queries, shared behind cheap clones
#[derive(Clone)]
pub struct OrderService {
    store: DocStore,
    gateway: Arc<dyn PaymentGateway>,
    key_id: String,
    key_secret: String,
}

impl OrderService {
    pub fn new(
        store: DocStore,
        gateway: Arc<dyn PaymentGateway>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }

    /// Create an order and persist it with status `created`.
    ///
    /// Validation happens before any I/O; a gateway failure propagates
    /// without persisting anything.
    pub async fn create_order(
        &self,
        req: CreateOrderRequest,
    ) -> AppResult<CreateOrderResponse> {
        let amount = req
            .amount
            .ok_or_else(|| AppError::Validation("amount is required".into()))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::Validation(format!(
                "amount must be a positive number, got {amount}"
            )));
        }

        let currency = req
            .currency
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_uppercase();
        let amount_paise = util::to_minor_units(amount);
        let cart = build_cart(&req);

        let id = util::next_id();
        let receipt = req
            .receipt
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| format!("rcpt_{id}"));

        let (gateway_order_id, stored_paise, stored_currency, stored_amount) = if req.cod {
            (format!("cod_{}", util::now_millis()), amount_paise, currency, amount)
        } else {
            if self.key_id.is_empty() || self.key_secret.is_empty() {
                return Err(AppError::Configuration(
                    "Razorpay keys are not configured; only cash on delivery is available".into(),
                ));
            }
            let remote = self
                .gateway
                .create_order(amount_paise, &currency, &receipt)
                .await?;
            // The gateway's echo is authoritative for amount and currency
            let major = if remote.amount == amount_paise {
                amount
            } else {
                remote.amount as f64 / 100.0
            };
            (remote.id, remote.amount, remote.currency, major)
        };

        let order = Order {
            id,
            receipt,
            razorpay_order_id: gateway_order_id,
            amount: stored_amount,
            amount_paise: stored_paise,
            currency: stored_currency,
            cart,
            customer: req.customer,
            status: OrderStatus::Created,
            razorpay_payment_id: None,
            razorpay_signature: None,
            eta: None,
            created_at: util::now_millis(),
            paid_at: None,
        };

        let response = CreateOrderResponse {
            success: true,
            order_id: order.razorpay_order_id.clone(),
            amount: order.amount_paise,
            currency: order.currency.clone(),
            receipt: order.receipt.clone(),
            key_id: self.key_id.clone(),
        };

        let cod = req.cod;
        self.store
            .mutate(move |doc| {
                if doc.orders.iter().any(|o| o.receipt == order.receipt) {
                    tracing::warn!(
                        receipt = %order.receipt,
                        "receipt already in use; receipt lookups resolve to the oldest order"
                    );
                }
                tracing::info!(
                    order_id = %order.razorpay_order_id,
                    receipt = %order.receipt,
                    amount_paise = order.amount_paise,
                    cod,
                    "order created"
                );
                doc.orders.push(order);
            })
            .await;

        Ok(response)
    }

    /// Verify a checkout callback and settle the order's payment state.
    ///
    /// The signature check runs unconditionally; lookup failure still
    /// reports the boolean. A valid signature moves the order to `paid`
    /// (idempotently), a mismatch to `payment_failed`.
    pub async fn verify_payment(
        &self,
        req: VerifyPaymentRequest,
    ) -> AppResult<VerifyPaymentResponse> {
        if self.key_secret.is_empty() {
            return Err(AppError::Configuration(
                "Razorpay key secret is not configured; cannot verify payments".into(),
            ));
        }
        let order_id = require_field(req.razorpay_order_id, "razorpay_order_id")?;
        let payment_id = require_field(req.razorpay_payment_id, "razorpay_payment_id")?;
        let signature = require_field(req.razorpay_signature, "razorpay_signature")?;

        let verified = crate::razorpay::verify_payment_signature(
            &self.key_secret,
            &order_id,
            &payment_id,
            &signature,
        );

        let receipt = req.receipt.filter(|r| !r.trim().is_empty());
        let response = self
            .store
            .mutate(|doc| {
                let pos = doc
                    .orders
                    .iter()
                    .position(|o| o.razorpay_order_id == order_id)
                    .or_else(|| {
                        receipt.as_ref().and_then(|r| {
                            doc.orders.iter().position(|o| &o.receipt == r)
                        })
                    });

                let Some(pos) = pos else {
                    tracing::warn!(
                        order_id = %order_id,
                        verified,
                        "payment verification for unknown order"
                    );
                    return VerifyPaymentResponse {
                        verified,
                        order_index: None,
                        order: None,
                    };
                };

                let order = &mut doc.orders[pos];
                if verified {
                    order.status = OrderStatus::Paid;
                    order.razorpay_payment_id = Some(payment_id.clone());
                    order.razorpay_signature = Some(signature.clone());
                    if order.paid_at.is_none() {
                        order.paid_at = Some(util::now_millis());
                    }
                } else {
                    order.status = OrderStatus::PaymentFailed;
                }
                tracing::info!(
                    order_id = %order.razorpay_order_id,
                    payment_id = %payment_id,
                    verified,
                    "payment verification settled"
                );
                VerifyPaymentResponse {
                    verified,
                    order_index: Some(pos),
                    order: Some(order.clone()),
                }
            })
            .await;

        Ok(response)
    }

    /// Admin update of status and/or delivery estimate.
    ///
    /// `key` matches the gateway order id first, the receipt as fallback.
    pub async fn update_status(
        &self,
        key: &str,
        status: Option<String>,
        eta: Option<String>,
    ) -> AppResult<Order> {
        if status.is_none() && eta.is_none() {
            return Err(AppError::Validation(
                "either status or eta must be provided".into(),
            ));
        }

        let updated = self
            .store
            .mutate(|doc| {
                let pos = doc
                    .orders
                    .iter()
                    .position(|o| o.razorpay_order_id == key)
                    .or_else(|| doc.orders.iter().position(|o| o.receipt == key))?;
                let order = &mut doc.orders[pos];
                if let Some(s) = &status {
                    let next = OrderStatus::from(s.as_str());
                    if !next.is_canonical() {
                        tracing::warn!(
                            order_id = %order.razorpay_order_id,
                            status = %s,
                            "status set outside the known lifecycle"
                        );
                    }
                    order.status = next;
                }
                if let Some(e) = &eta {
                    order.eta = Some(e.clone());
                }
                tracing::info!(
                    order_id = %order.razorpay_order_id,
                    status = %order.status,
                    "order updated"
                );
                Some(order.clone())
            })
            .await;

        updated.ok_or_else(|| AppError::NotFound(format!("order not found: {key}")))
    }

    /// Delete every order whose gateway id or receipt matches `key`.
    ///
    /// Zero matches is still success; deletion is idempotent.
    pub async fn delete_order(&self, key: &str) -> usize {
        self.store
            .mutate(|doc| {
                let before = doc.orders.len();
                doc.orders
                    .retain(|o| o.razorpay_order_id != key && o.receipt != key);
                let removed = before - doc.orders.len();
                if removed > 0 {
                    tracing::info!(key = %key, removed, "orders deleted");
                }
                removed
            })
            .await
    }

    /// All orders, insertion order
    pub async fn list_orders(&self) -> Vec<Order> {
        self.store.read(|doc| doc.orders.clone()).await
    }

    pub async fn find_by_phone(&self, phone: &str) -> Vec<Order> {
        self.store
            .read(|doc| {
                doc.orders
                    .iter()
                    .filter(|o| {
                        o.customer
                            .as_ref()
                            .and_then(|c| c.phone.as_deref())
                            .is_some_and(|p| p == phone)
                    })
                    .cloned()
                    .collect()
            })
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Vec<Order> {
        let needle = email.to_lowercase();
        self.store
            .read(|doc| {
                doc.orders
                    .iter()
                    .filter(|o| {
                        o.customer
                            .as_ref()
                            .and_then(|c| c.email.as_deref())
                            .is_some_and(|e| e.eq_ignore_ascii_case(&needle))
                    })
                    .cloned()
                    .collect()
            })
            .await
    }
}

fn require_field(value: Option<String>, name: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

/// Resolve the cart to store: the supplied one with recomputed line totals,
/// or a single line synthesized from the selected product.
fn build_cart(req: &CreateOrderRequest) -> Vec<CartItem> {
    if !req.cart.is_empty() {
        return req
            .cart
            .iter()
            .map(|item| CartItem {
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
                line_total: util::round_money(item.price * item.quantity as f64),
            })
            .collect();
    }
    if let Some(product) = &req.selected_product {
        let quantity = product.pack_quantity;
        return vec![CartItem {
            name: product
                .name
                .clone()
                .unwrap_or_else(|| "item".to_string()),
            price: product.price,
            quantity,
            line_total: util::round_money(product.price * quantity as f64),
        }];
    }
    Vec::new()
}
