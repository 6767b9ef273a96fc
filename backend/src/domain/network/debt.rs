//! Monetary debt owed by a node to its supplier.

use std::fmt;

use rust_decimal::Decimal;

use crate::domain::validation::{FieldViolation, ViolationKind};

const SCALE: u32 = 2;
const LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Non-negative amount with two fractional digits, below 10^8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Debt(Decimal);

impl Debt {
    /// No debt.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, SCALE));

    /// Validate an amount and fix its scale to two places.
    ///
    /// # Errors
    /// Returns a `debt` violation when the amount is negative, has more than
    /// two fractional digits, or does not fit `NUMERIC(10,2)`.
    ///
    /// # Examples
    /// ```
    /// use network_backend::domain::Debt;
    /// use rust_decimal::Decimal;
    ///
    /// let debt = Debt::try_new(Decimal::new(15, 1)).expect("valid");
    /// assert_eq!(debt.to_string(), "1.50");
    /// assert!(Debt::try_new(Decimal::new(-1, 0)).is_err());
    /// ```
    pub fn try_new(amount: Decimal) -> Result<Self, FieldViolation> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Self::violation(ViolationKind::Negative, amount));
        }
        if amount.normalize().scale() > SCALE {
            return Err(Self::violation(ViolationKind::TooPrecise, amount));
        }
        if amount >= LIMIT {
            return Err(Self::violation(ViolationKind::TooLarge, amount));
        }
        let mut fixed = amount.abs();
        fixed.rescale(SCALE);
        Ok(Self(fixed))
    }

    fn violation(kind: ViolationKind, amount: Decimal) -> FieldViolation {
        FieldViolation::new("debt", kind).with_value(amount.to_string())
    }

    /// Amount as a decimal with scale two.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Whether nothing is owed.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Debt {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), "0.00")]
    #[case(dec!(1500000.5), "1500000.50")]
    #[case(dec!(950000.30), "950000.30")]
    #[case(dec!(99999999.99), "99999999.99")]
    #[case(dec!(-0), "0.00")]
    fn formats_two_places(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(Debt::try_new(amount).expect("valid").to_string(), expected);
    }

    #[rstest]
    #[case(dec!(-0.01), ViolationKind::Negative)]
    #[case(dec!(1.005), ViolationKind::TooPrecise)]
    #[case(dec!(100000000), ViolationKind::TooLarge)]
    fn rejects(#[case] amount: Decimal, #[case] kind: ViolationKind) {
        let err = Debt::try_new(amount).expect_err("rejected");
        assert_eq!(err.kind(), kind);
        assert_eq!(err.field(), "debt");
    }

    #[rstest]
    fn trailing_zeroes_are_not_extra_precision() {
        assert!(Debt::try_new(dec!(12.5000)).is_ok());
    }

    #[rstest]
    fn zero_constant_has_two_places() {
        assert_eq!(Debt::ZERO.to_string(), "0.00");
        assert!(Debt::ZERO.is_zero());
    }
}
