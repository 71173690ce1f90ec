//! Razorpay integration via REST API (no SDK dependency)
//!
//! Two concerns live here:
//!
//! - [`PaymentGateway`] / [`RazorpayGateway`]: creating remote orders over
//!   the Orders API. The trait is the seam the order lifecycle goes
//!   through, so tests can inject a stub instead of the network.
//! - [`verify_payment_signature`]: checking the checkout callback signature
//!   locally. The key secret is only ever used as HMAC key material here;
//!   it is never sent anywhere.

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{AppError, AppResult};

const ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

type HmacSha256 = Hmac<Sha256>;

/// Remote order as created by the gateway
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub id: String,
    /// Minor units (paise)
    pub amount: i64,
    pub currency: String,
}

/// Seam between the order lifecycle and the payment gateway
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        amount_paise: i64,
        currency: &str,
        receipt: &str,
    ) -> AppResult<GatewayOrder>;
}

/// REST client for the Razorpay Orders API
pub struct RazorpayGateway {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    timeout: Duration,
    orders_url: String,
}

impl RazorpayGateway {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            timeout,
            orders_url: ORDERS_URL.to_string(),
        }
    }

    /// Point the client at a local stand-in for the Orders API
    #[cfg(test)]
    fn with_orders_url(mut self, url: impl Into<String>) -> Self {
        self.orders_url = url.into();
        self
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount_paise: i64,
        currency: &str,
        receipt: &str,
    ) -> AppResult<GatewayOrder> {
        let resp = self
            .client
            .post(&self.orders_url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .timeout(self.timeout)
            .json(&serde_json::json!({
                "amount": amount_paise,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Razorpay unreachable: {e}")))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Razorpay returned a non-JSON body: {e}")))?;

        if !status.is_success() {
            let detail = body["error"]["description"]
                .as_str()
                .unwrap_or("no description");
            return Err(AppError::Upstream(format!(
                "Razorpay order creation failed ({status}): {detail}"
            )));
        }

        let id = body["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| AppError::Upstream(format!("Razorpay response missing id: {body}")))?;

        // Adopt the gateway's canonical amount/currency; fall back to what
        // we sent if the response omits them.
        Ok(GatewayOrder {
            id,
            amount: body["amount"].as_i64().unwrap_or(amount_paise),
            currency: body["currency"].as_str().unwrap_or(currency).to_string(),
        })
    }
}

/// Verify a checkout callback signature.
///
/// The expected value is the lowercase-hex HMAC-SHA256 of
/// `"<order_id>|<payment_id>"` under the key secret. The supplied hex is
/// decoded and compared via `Mac::verify_slice`, which is constant-time;
/// non-hex input is simply a mismatch.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    supplied: &str,
) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    let Ok(sig_bytes) = hex::decode(supplied) else {
        return false;
    };
    mac.verify_slice(&sig_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test-side twin of the verification payload
    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_verifies() {
        let sig = sign("secret", "order_abc", "pay_123");
        assert!(verify_payment_signature("secret", "order_abc", "pay_123", &sig));
    }

    #[test]
    fn test_flipped_character_fails() {
        let sig = sign("secret", "order_abc", "pay_123");
        let mut bytes = sig.into_bytes();
        bytes[0] = if bytes[0] == b'a' { b'b' } else { b'a' };
        let flipped = String::from_utf8(bytes).unwrap();
        assert!(!verify_payment_signature(
            "secret", "order_abc", "pay_123", &flipped
        ));
    }

    #[test]
    fn test_non_hex_signature_is_a_mismatch() {
        assert!(!verify_payment_signature(
            "secret", "order_abc", "pay_123", "xyz"
        ));
        assert!(!verify_payment_signature("secret", "order_abc", "pay_123", ""));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let sig = sign("secret", "order_abc", "pay_123");
        assert!(!verify_payment_signature(
            "other_secret",
            "order_abc",
            "pay_123",
            &sig
        ));
    }

    #[test]
    fn test_ids_are_not_interchangeable() {
        let sig = sign("secret", "order_abc", "pay_123");
        assert!(!verify_payment_signature(
            "secret", "pay_123", "order_abc", &sig
        ));
    }

    #[tokio::test]
    async fn test_create_order_gives_up_after_the_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // accept connections and hold them open without ever answering
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let gateway = RazorpayGateway::new("key", "secret", Duration::from_millis(50))
            .with_orders_url(format!("http://{addr}/v1/orders"));

        let started = std::time::Instant::now();
        let err = gateway.create_order(50000, "INR", "r1").await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)), "got {err:?}");
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "a stalled gateway must not hang the call"
        );
    }
}
