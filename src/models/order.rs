//! Order entity and its lifecycle status
//!
//! An order is created against the payment gateway (or synthesized locally
//! for cash on delivery) and then moves through a small lifecycle:
//!
//! ```text
//! created ──verified──▶ paid
//!    └───mismatch────▶ payment_failed
//! ```
//!
//! Admins may additionally set free-form statuses ("shipped", …); those are
//! kept as [`OrderStatus::Custom`] so the known lifecycle stays a closed set.

use serde::{Deserialize, Serialize};

/// One line of an order's cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    /// Unit price in major units (rupees)
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// price × quantity, rounded to two decimals; recomputed on creation
    #[serde(default)]
    pub line_total: f64,
}

fn default_quantity() -> u32 {
    1
}

/// Optional contact details attached to an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Order lifecycle status
///
/// Serialized as its plain string form (`"created"`, `"paid"`,
/// `"payment_failed"`); any other string round-trips through [`Custom`].
///
/// [`Custom`]: OrderStatus::Custom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Created,
    Paid,
    PaymentFailed,
    /// Admin-set value outside the known lifecycle (e.g. "shipped")
    Custom(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::PaymentFailed => "payment_failed",
            OrderStatus::Custom(s) => s,
        }
    }

    /// Part of the known lifecycle, as opposed to an admin-set value
    pub fn is_canonical(&self) -> bool {
        !matches!(self, OrderStatus::Custom(_))
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "created" => OrderStatus::Created,
            "paid" => OrderStatus::Paid,
            "payment_failed" => OrderStatus::PaymentFailed,
            other => OrderStatus::Custom(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        OrderStatus::from(s.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(s: OrderStatus) -> Self {
        s.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer order and its payment state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Local correlation key; generated as `rcpt_<id>` when the caller sends none
    pub receipt: String,
    /// Gateway order id (`order_…`), or `cod_<millis>` for cash on delivery
    pub razorpay_order_id: String,
    /// Amount in major units (rupees)
    pub amount: f64,
    /// Amount in minor units (paise); always round(amount × 100)
    pub amount_paise: i64,
    pub currency: String,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerInfo>,
    pub status: OrderStatus,
    /// Set only by a successful signature verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_signature: Option<String>,
    /// Admin-set delivery estimate, free-form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
}
