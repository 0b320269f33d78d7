//! Deserialization helpers for loosely-typed artifact and remote payloads.

use serde::{Deserialize, Deserializer};

use crate::ids::Id;

/// Treat an explicit `null` the same as a missing field.
///
/// # Errors
///
/// Propagates the inner deserializer's error for non-null values of the wrong type.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A list of strings where the list itself, or any entry, may be `null`.
/// Null entries are dropped.
///
/// # Errors
///
/// Fails when the value is neither `null` nor a list of strings and nulls.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(entries.into_iter().flatten().flatten().collect())
}

/// A 0/1 flag that may arrive as a bool, an integer, or `null`.
///
/// # Errors
///
/// Fails on strings, floats, and nested values.
pub fn flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(true)) => 1,
        Some(Flag::Int(value)) if value != 0 => 1,
        _ => 0,
    })
}

/// An optional id where a blank string means "absent".
///
/// # Errors
///
/// Fails when a non-blank value is not a valid identifier.
pub fn blank_id_as_none<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => Id::parse(value.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
