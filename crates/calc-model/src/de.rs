//! Field deserializers for documents written by the configuration store.
//!
//! The store writes `null` for nil maps and slices, so an explicit `null`
//! is read the same way as an absent field.

use serde::{Deserialize, Deserializer};

/// `null` becomes `T::default()`.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` becomes `true`.
pub(crate) fn null_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}
