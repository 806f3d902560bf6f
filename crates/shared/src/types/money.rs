//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Wallet balances and transaction amounts are `rust_decimal::Decimal` with
//! at most [`AMOUNT_SCALE`] fractional digits. The payment gateway speaks in
//! integer minor units (e.g., paise), represented by [`MinorUnits`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum number of fractional digits for a monetary amount.
pub const AMOUNT_SCALE: u32 = 2;

/// An amount in the smallest currency unit (e.g., paise for INR).
///
/// Gateway order amounts are always integer minor units; wallet amounts are
/// decimal major units. Conversions between the two are lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(pub i64);

impl MinorUnits {
    /// Creates a minor-unit amount from a raw value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw minor-unit value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts to a decimal amount in major units (100 minor = 1.00 major).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, AMOUNT_SCALE)
    }

    /// Converts a decimal major-unit amount to minor units.
    ///
    /// Returns `None` if the amount has more than [`AMOUNT_SCALE`] fractional
    /// digits or does not fit in an `i64`.
    #[must_use]
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        if amount.scale() > AMOUNT_SCALE {
            return None;
        }
        let mut scaled = amount;
        scaled.rescale(AMOUNT_SCALE);
        let units = scaled.mantissa();
        i64::try_from(units).ok().map(Self)
    }
}

impl std::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(100, dec!(1.00))]
    #[case(12345, dec!(123.45))]
    #[case(0, dec!(0.00))]
    fn test_minor_units_to_decimal(#[case] raw: i64, #[case] expected: Decimal) {
        assert_eq!(MinorUnits::new(raw).to_decimal(), expected);
    }

    #[rstest]
    #[case(dec!(1.00), 100)]
    #[case(dec!(123.45), 12345)]
    #[case(dec!(500), 50000)]
    fn test_minor_units_from_decimal(#[case] amount: Decimal, #[case] expected: i64) {
        assert_eq!(MinorUnits::from_decimal(amount), Some(MinorUnits(expected)));
    }

    #[test]
    fn test_from_decimal_rejects_excess_scale() {
        assert_eq!(MinorUnits::from_decimal(dec!(1.001)), None);
        assert_eq!(MinorUnits::from_decimal(dec!(0.005)), None);
    }

    #[test]
    fn test_round_trip() {
        for raw in [0i64, 1, 99, 100, 12345, 1_000_000] {
            let units = MinorUnits::new(raw);
            assert_eq!(MinorUnits::from_decimal(units.to_decimal()), Some(units));
        }
    }

    #[test]
    fn test_is_positive() {
        assert!(MinorUnits::new(1).is_positive());
        assert!(!MinorUnits::new(0).is_positive());
        assert!(!MinorUnits::new(-5).is_positive());
    }

    #[test]
    fn test_display() {
        assert_eq!(MinorUnits::new(500).to_string(), "500");
    }
}
