//! HMAC-SHA256 signature verification for payment callbacks.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with the shared key secret.
//! Comparison is constant-time; a top-up is credited only after this check
//! passes.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::error::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Verifies gateway payment signatures against a shared secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret.
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

impl SignatureVerifier {
    /// Creates a verifier for the given shared secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Computes the expected hex signature for an order/payment pair.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Gateway` if the MAC cannot be keyed.
    pub fn expected(&self, order_id: &str, payment_id: &str) -> Result<String, PaymentError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Verifies a supplied signature in constant time.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::VerificationFailed` on mismatch. The error does
    /// not reveal the expected value.
    pub fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        let expected = self.expected(order_id, payment_id)?;
        let supplied = signature.to_ascii_lowercase();

        if expected.as_bytes().ct_eq(supplied.as_bytes()).into() {
            Ok(())
        } else {
            Err(PaymentError::VerificationFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new("test_key_secret")
    }

    #[test]
    fn test_expected_is_deterministic() {
        let a = verifier().expected("order_1", "pay_1").unwrap();
        let b = verifier().expected("order_1", "pay_1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64); // SHA-256 output as hex
    }

    #[test]
    fn test_verify_accepts_matching_signature() {
        let v = verifier();
        let signature = v.expected("order_1", "pay_1").unwrap();
        assert!(v.verify("order_1", "pay_1", &signature).is_ok());
    }

    #[test]
    fn test_verify_accepts_uppercase_hex() {
        let v = verifier();
        let signature = v.expected("order_1", "pay_1").unwrap().to_uppercase();
        assert!(v.verify("order_1", "pay_1", &signature).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampered_signature() {
        let v = verifier();
        let mut signature = v.expected("order_1", "pay_1").unwrap();
        // Flip one hex digit.
        let flipped = if signature.ends_with('0') { "1" } else { "0" };
        signature.replace_range(signature.len() - 1.., flipped);

        assert_eq!(
            v.verify("order_1", "pay_1", &signature),
            Err(PaymentError::VerificationFailed)
        );
    }

    #[test]
    fn test_verify_rejects_signature_for_other_order() {
        let v = verifier();
        let signature = v.expected("order_1", "pay_1").unwrap();
        assert_eq!(
            v.verify("order_2", "pay_1", &signature),
            Err(PaymentError::VerificationFailed)
        );
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signature = SignatureVerifier::new("other_secret")
            .expected("order_1", "pay_1")
            .unwrap();
        assert_eq!(
            verifier().verify("order_1", "pay_1", &signature),
            Err(PaymentError::VerificationFailed)
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert_eq!(
            verifier().verify("order_1", "pay_1", "not-a-signature"),
            Err(PaymentError::VerificationFailed)
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", verifier());
        assert!(!rendered.contains("test_key_secret"));
    }
}
