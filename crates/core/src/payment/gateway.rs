//! Payment gateway abstraction for top-up orders.
//!
//! `CreateOrder` is the only operation this service needs from the gateway;
//! the pending order state belongs to the gateway, not to the ledger. The
//! stub implementation mints order handles locally so the rest of the flow
//! (signature verification, credit) can run without a live gateway account.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::PaymentError;
use paisa_shared::types::MinorUnits;

/// Status of a gateway order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order created, awaiting payment.
    Created,
}

/// An order handle returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order identifier.
    pub id: String,
    /// Order amount in minor currency units.
    pub amount: MinorUnits,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Merchant receipt reference.
    pub receipt: String,
    /// Order status.
    pub status: OrderStatus,
}

/// Gateway operations the ledger service depends on.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Requests a new top-up order from the gateway.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if the amount is below the gateway minimum or
    /// the gateway call fails.
    async fn create_order(&self, amount: MinorUnits) -> Result<GatewayOrder, PaymentError>;
}

/// In-process stand-in for the external payment gateway.
#[derive(Debug, Clone)]
pub struct StubGateway {
    currency: String,
    min_amount: MinorUnits,
}

impl StubGateway {
    /// Creates a stub gateway for the given currency and minimum order.
    #[must_use]
    pub fn new(currency: impl Into<String>, min_amount: MinorUnits) -> Self {
        Self {
            currency: currency.into(),
            min_amount,
        }
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(&self, amount: MinorUnits) -> Result<GatewayOrder, PaymentError> {
        if amount < self.min_amount {
            return Err(PaymentError::AmountBelowMinimum {
                amount: amount.value(),
                minimum: self.min_amount.value(),
            });
        }

        let id_bytes: [u8; 9] = rand::random();
        let receipt_tag: u32 = rand::random_range(0..10_000_000);

        Ok(GatewayOrder {
            id: format!("order_{}", hex::encode(id_bytes)),
            amount,
            currency: self.currency.clone(),
            receipt: format!("receipt_{receipt_tag}"),
            status: OrderStatus::Created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> StubGateway {
        StubGateway::new("INR", MinorUnits::new(100))
    }

    #[tokio::test]
    async fn test_create_order() {
        let order = gateway().create_order(MinorUnits::new(500)).await.unwrap();

        assert!(order.id.starts_with("order_"));
        assert!(order.receipt.starts_with("receipt_"));
        assert_eq!(order.amount, MinorUnits::new(500));
        assert_eq!(order.currency, "INR");
        assert_eq!(order.status, OrderStatus::Created);
    }

    #[tokio::test]
    async fn test_create_order_below_minimum() {
        let result = gateway().create_order(MinorUnits::new(99)).await;
        assert_eq!(
            result,
            Err(PaymentError::AmountBelowMinimum {
                amount: 99,
                minimum: 100,
            })
        );
    }

    #[tokio::test]
    async fn test_create_order_at_minimum() {
        assert!(gateway().create_order(MinorUnits::new(100)).await.is_ok());
    }

    #[tokio::test]
    async fn test_order_ids_are_unique() {
        let g = gateway();
        let a = g.create_order(MinorUnits::new(100)).await.unwrap();
        let b = g.create_order(MinorUnits::new(100)).await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
