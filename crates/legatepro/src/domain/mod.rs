//! Identifiers and value types shared across every resource module.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Identifier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

/// Identifier for an estate workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstateId(pub Uuid);

/// Identifier for any estate-scoped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

id_impls!(UserId);
id_impls!(EstateId);
id_impls!(RecordId);

/// Monetary amount held as non-negative integer cents.
///
/// The API accepts dollars as a JSON number or a numeric string; everything
/// past the parse boundary works in cents only.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

const MAX_DOLLARS: f64 = 90_000_000_000_000.0;

impl Money {
    pub fn from_cents(cents: i64) -> Result<Self, MoneyParseError> {
        if cents < 0 {
            return Err(MoneyParseError::Negative);
        }
        Ok(Self(cents))
    }

    /// Normalize a loosely-typed JSON amount into cents.
    pub fn parse(value: &Value) -> Result<Self, MoneyParseError> {
        let dollars = match value {
            Value::Number(number) => number.as_f64().ok_or(MoneyParseError::OutOfRange)?,
            Value::String(raw) => {
                let trimmed = raw.trim().trim_start_matches('$');
                trimmed
                    .parse::<f64>()
                    .map_err(|_| MoneyParseError::NotNumeric)?
            }
            _ => return Err(MoneyParseError::NotNumeric),
        };

        if !dollars.is_finite() || dollars.abs() > MAX_DOLLARS {
            return Err(MoneyParseError::OutOfRange);
        }
        if dollars < 0.0 {
            return Err(MoneyParseError::Negative);
        }

        Ok(Self((dollars * 100.0).round() as i64))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Render as a decimal dollar string, e.g. `"1250.00"`.
    pub fn dollars(self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

/// Normalization failures for inbound amounts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyParseError {
    #[error("amount must be a number or numeric string")]
    NotNumeric,
    #[error("amount must not be negative")]
    Negative,
    #[error("amount is out of range")]
    OutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_json_numbers_as_dollars() {
        assert_eq!(Money::parse(&json!(12.34)).unwrap().cents(), 1234);
        assert_eq!(Money::parse(&json!(0)).unwrap().cents(), 0);
        assert_eq!(Money::parse(&json!(1500)).unwrap().cents(), 150_000);
    }

    #[test]
    fn parses_numeric_strings() {
        assert_eq!(Money::parse(&json!("99.95")).unwrap().cents(), 9995);
        assert_eq!(Money::parse(&json!(" $42 ")).unwrap().cents(), 4200);
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(
            Money::parse(&json!("twelve")),
            Err(MoneyParseError::NotNumeric)
        );
        assert_eq!(
            Money::parse(&json!({"amount": 5})),
            Err(MoneyParseError::NotNumeric)
        );
        assert_eq!(Money::parse(&json!(null)), Err(MoneyParseError::NotNumeric));
    }

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!(Money::parse(&json!(-10)), Err(MoneyParseError::Negative));
        assert_eq!(
            Money::parse(&json!("-0.01")),
            Err(MoneyParseError::Negative)
        );
    }

    #[test]
    fn formats_dollars() {
        assert_eq!(Money::from_cents(1234).unwrap().dollars(), "12.34");
        assert_eq!(Money::from_cents(5).unwrap().dollars(), "0.05");
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let a = Money::from_cents(1500).unwrap();
        let b = Money::from_cents(25).unwrap();
        assert_eq!(a.saturating_add(b).cents(), 1525);

        let max = Money::from_cents(i64::MAX).unwrap();
        assert_eq!(max.saturating_add(b).cents(), i64::MAX);
    }
}
