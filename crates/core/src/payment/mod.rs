//! Payment gateway integration for wallet top-ups.
//!
//! The gateway itself is an external collaborator; this module provides:
//! - The [`PaymentGateway`] trait and the in-process stub implementation
//! - HMAC-SHA256 signature verification for payment callbacks
//! - Error types for payment operations
//!
//! Signature verification is always enforced before a top-up credits a
//! wallet; there is no bypass.

pub mod error;
pub mod gateway;
pub mod signature;

pub use error::PaymentError;
pub use gateway::{GatewayOrder, OrderStatus, PaymentGateway, StubGateway};
pub use signature::SignatureVerifier;
