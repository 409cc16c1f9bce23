use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValueError;

/// A strictly positive, finite USD amount (price or market capitalization)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct UsdAmount(f64);

impl UsdAmount {
    pub fn new(value: f64) -> Result<Self, ValueError> {
        Self::for_field("amount", value)
    }

    /// Same as `new`, naming the offending field in the error
    pub fn for_field(field: &'static str, value: f64) -> Result<Self, ValueError> {
        if value.is_finite() && value > 0.0 {
            Ok(UsdAmount(value))
        } else {
            Err(ValueError::NotPositive { field, value })
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for UsdAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for UsdAmount {
    type Error = ValueError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        UsdAmount::new(value)
    }
}

impl From<UsdAmount> for f64 {
    fn from(amount: UsdAmount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_amount_accepted() {
        assert_eq!(UsdAmount::new(50_000.0).unwrap().value(), 50_000.0);
        assert!(UsdAmount::new(f64::MIN_POSITIVE).is_ok());
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        assert!(UsdAmount::new(0.0).is_err());
        assert!(UsdAmount::new(-1.5).is_err());
        assert!(UsdAmount::new(f64::NAN).is_err());
        assert!(UsdAmount::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_names_field() {
        let err = UsdAmount::for_field("market_cap", 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "market_cap must be a positive finite number, got 0"
        );
    }
}
