//! Integer monetary amounts for configurator prices.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A non-negative amount in whole currency units.
///
/// Deserializes from integer or integral float JSON numbers. Fractional
/// amounts round to the nearest unit and `null` reads as zero, matching what
/// the editor stores for a cleared price field. Negative amounts are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u64 {
        self.0
    }

    /// Adds two amounts, clamping at `u64::MAX` instead of wrapping.
    #[must_use]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl From<u64> for Money {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        self.saturating_add(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Money {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Money {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl serde::de::Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative amount")
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Money, E> {
        Ok(Money(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Money, E> {
        u64::try_from(v)
            .map(Money)
            .map_err(|_| E::invalid_value(serde::de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Money, E> {
        let rounded = v.round();
        if !rounded.is_finite() || rounded < 0.0 || rounded > u64::MAX as f64 {
            return Err(E::invalid_value(serde::de::Unexpected::Float(v), &self));
        }
        Ok(Money(rounded as u64))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Money, E> {
        Ok(Money::ZERO)
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Money, E> {
        Ok(Money::ZERO)
    }
}
