//! Lenient field decoders for feed payloads.
//!
//! The feed is loose about scalar types and about how sequences are sent.
//! These helpers accept every shape seen on the wire and map anything else to
//! "absent" rather than failing the payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Index-keyed sequences never address more slots than this.
const MAX_POSITIONAL_INDEX: usize = 64;

/// A display string sent as either a JSON string or a number.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        Some(Value::Number(value)) => Some(value.to_string()),
        _ => None,
    })
}

/// A non-negative count sent as either a number or a numeric string.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(value)) => value.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(value)) => value.trim().parse().ok(),
        _ => None,
    })
}

/// A status code that only counts when sent as a JSON string, verbatim.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        _ => None,
    })
}

/// A nested record or enum. A value of the wrong shape reads as absent
/// instead of failing the enclosing line.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(value) => serde_json::from_value(value).ok(),
    })
}

/// A boolean flag; anything other than `true` reads as unset.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(
        Option::<Value>::deserialize(deserializer)?,
        Some(Value::Bool(true))
    ))
}

/// A sequence sent either as an array or as an object keyed by slot index.
///
/// Object keys place elements at their index; gaps are filled with defaults.
pub(crate) fn positional_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(items.into_iter().map(element).collect())),
        Some(Value::Object(map)) => {
            let mut out: Vec<T> = Vec::new();
            for (key, value) in map {
                let Ok(index) = key.parse::<usize>() else {
                    continue;
                };
                if index >= MAX_POSITIONAL_INDEX {
                    continue;
                }
                if out.len() <= index {
                    out.resize_with(index + 1, T::default);
                }
                out[index] = element(value);
            }
            Ok(Some(out))
        }
        _ => Ok(None),
    }
}

/// A sequence sent either as an array or as an object keyed by index.
///
/// Object entries are kept in ascending numeric key order without gaps.
pub(crate) fn indexed_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(items.into_iter().map(element).collect())),
        Some(Value::Object(map)) => {
            let ordered: BTreeMap<usize, Value> = map
                .into_iter()
                .filter_map(|(key, value)| key.parse::<usize>().ok().map(|index| (index, value)))
                .collect();
            Ok(Some(ordered.into_values().map(element).collect()))
        }
        _ => Ok(None),
    }
}

/// Records keyed by car number. Non-object entries (feed markers such as
/// `_kf`) are skipped, and so is a record that fails to decode; the other
/// cars in the payload are kept.
pub(crate) fn keyed_records<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(Value::Object(map)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    Ok(map
        .into_iter()
        .filter(|(_, value)| value.is_object())
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(record) => Some((key, record)),
            Err(err) => {
                tracing::warn!(car = %key, error = %err, "Skipping undecodable record");
                None
            }
        })
        .collect())
}

/// One sequence element; null or malformed elements become the default.
fn element<T>(value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    serde_json::from_value(value).unwrap_or_default()
}
