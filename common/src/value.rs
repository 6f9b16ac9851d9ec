// Self-describing values returned by the ledger's call interface.
// Token and collection metadata arrive as tagged values; the gallery
// flattens them into plain value trees before anything touches them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, GalleryResult};

/// A tagged value as it appears on the wire.
///
/// Well-formed data carries exactly one tag. The wire format cannot
/// guarantee that, so every tag is optional here and [`decode`] enforces
/// the one-tag rule, rejecting tag-less and multi-tagged values with
/// [`GalleryError::MalformedValue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireValue {
    #[serde(rename = "Text", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "Nat", skip_serializing_if = "Option::is_none")]
    pub nat: Option<u128>,

    #[serde(rename = "Int", skip_serializing_if = "Option::is_none")]
    pub int: Option<i128>,

    #[serde(rename = "Bool", skip_serializing_if = "Option::is_none")]
    pub bool: Option<bool>,

    #[serde(rename = "Blob", skip_serializing_if = "Option::is_none")]
    pub blob: Option<Vec<u8>>,

    #[serde(rename = "Map", skip_serializing_if = "Option::is_none")]
    pub map: Option<Vec<(String, WireValue)>>,

    #[serde(rename = "Array", skip_serializing_if = "Option::is_none")]
    pub array: Option<Vec<WireValue>>,
}

impl WireValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        Self {
            text: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn nat(value: u128) -> Self {
        Self {
            nat: Some(value),
            ..Default::default()
        }
    }

    pub fn int(value: i128) -> Self {
        Self {
            int: Some(value),
            ..Default::default()
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            bool: Some(value),
            ..Default::default()
        }
    }

    pub fn blob<B: Into<Vec<u8>>>(value: B) -> Self {
        Self {
            blob: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, WireValue)>,
        K: Into<String>,
    {
        Self {
            map: Some(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn array<I: IntoIterator<Item = WireValue>>(values: I) -> Self {
        Self {
            array: Some(values.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Number of tags populated on this value
    fn tag_count(&self) -> usize {
        [
            self.text.is_some(),
            self.nat.is_some(),
            self.int.is_some(),
            self.bool.is_some(),
            self.blob.is_some(),
            self.map.is_some(),
            self.array.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// A decoded value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlainValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Map(IndexMap<String, PlainValue>),
    Array(Vec<PlainValue>),
    Null,
}

impl PlainValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PlainValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, PlainValue>> {
        match self {
            PlainValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PlainValue]> {
        match self {
            PlainValue::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// Decode a wire value into a plain value tree.
///
/// Total over well-formed input. Nat and Int both collapse to `f64`:
/// magnitudes above 2^53 lose precision. That boundary is accepted for
/// free-form metadata numerics; token identifiers never go through this
/// path (they are `u64` end to end).
///
/// Map entries keep insertion order. A producer violating key uniqueness
/// is tolerated with last-write-wins.
pub fn decode(value: &WireValue) -> GalleryResult<PlainValue> {
    if value.tag_count() != 1 {
        return Err(GalleryError::MalformedValue);
    }

    if let Some(text) = &value.text {
        return Ok(PlainValue::Text(text.clone()));
    }
    if let Some(nat) = value.nat {
        return Ok(PlainValue::Number(nat as f64));
    }
    if let Some(int) = value.int {
        return Ok(PlainValue::Number(int as f64));
    }
    if let Some(flag) = value.bool {
        return Ok(PlainValue::Bool(flag));
    }
    if let Some(blob) = &value.blob {
        return Ok(PlainValue::Bytes(blob.clone()));
    }
    if let Some(entries) = &value.map {
        let mut map = IndexMap::with_capacity(entries.len());
        for (key, entry) in entries {
            map.insert(key.clone(), decode(entry)?);
        }
        return Ok(PlainValue::Map(map));
    }
    if let Some(values) = &value.array {
        let mut array = Vec::with_capacity(values.len());
        for entry in values {
            array.push(decode(entry)?);
        }
        return Ok(PlainValue::Array(array));
    }

    // tag_count() == 1 guarantees one arm above matched
    unreachable!("wire value with a single tag must decode")
}
