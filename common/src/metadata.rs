// Token metadata normalization and the display accessors built on it.
// The ledger hands back ordered (key, value) entries; the gallery decodes
// them once into an attribute map and derives every display field from
// that map with a documented fallback, so missing or malformed metadata
// never breaks rendering.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    account::Account,
    config::{
        DEFAULT_DESCRIPTION, DEFAULT_IMAGE_URL, ICRC97_IMAGE_PURPOSE, ICRC97_METADATA_KEY,
        MINT_IMAGE_MIME,
    },
    value::{decode, PlainValue, WireValue},
};

/// Decoded token attributes, keyed by the original entry keys
pub type AttributeMap = IndexMap<String, PlainValue>;

/// Normalize raw metadata entries into an attribute map.
///
/// Entry order is preserved and duplicate keys resolve last-write-wins.
/// A malformed entry value normalizes to [`PlainValue::Null`] instead of
/// failing the whole map.
pub fn normalize_metadata<I, K>(entries: I) -> AttributeMap
where
    I: IntoIterator<Item = (K, WireValue)>,
    K: Into<String>,
{
    let mut map = AttributeMap::new();
    for (key, value) in entries {
        let decoded = decode(&value).unwrap_or(PlainValue::Null);
        map.insert(key.into(), decoded);
    }
    map
}

/// The `icrc97:metadata` sub-map, when present and well-shaped
fn icrc97_section(map: &AttributeMap) -> Option<&IndexMap<String, PlainValue>> {
    map.get(ICRC97_METADATA_KEY).and_then(PlainValue::as_map)
}

/// Display name of a token, `"NFT #<id>"` when absent
pub fn display_name(map: &AttributeMap, token_id: u64) -> String {
    icrc97_section(map)
        .and_then(|section| section.get("name"))
        .and_then(PlainValue::as_text)
        .map(str::to_string)
        .unwrap_or_else(|| format!("NFT #{}", token_id))
}

/// Display description of a token, a fixed placeholder when absent
pub fn display_description(map: &AttributeMap) -> String {
    icrc97_section(map)
        .and_then(|section| section.get("description"))
        .and_then(PlainValue::as_text)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
}

/// URL of the primary image asset.
///
/// Scans `assets` for the first entry whose `purpose` is the icrc97 image
/// marker and returns its `url`. Absent or malformed assets fall back to
/// the default image reference; this never errors.
pub fn primary_image_url(map: &AttributeMap) -> String {
    let matching = icrc97_section(map)
        .and_then(|section| section.get("assets"))
        .and_then(PlainValue::as_array)
        .and_then(|assets| {
            assets.iter().find(|asset| {
                asset
                    .as_map()
                    .and_then(|fields| fields.get("purpose"))
                    .and_then(PlainValue::as_text)
                    == Some(ICRC97_IMAGE_PURPOSE)
            })
        });

    matching
        .and_then(PlainValue::as_map)
        .and_then(|fields| fields.get("url"))
        .and_then(PlainValue::as_text)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string())
}

/// Build the wire metadata for a token minted through the gallery.
///
/// Produces the icrc97 shape the display accessors read back: name,
/// description and a single image asset entry.
pub fn build_token_metadata(name: &str, description: &str, image_url: &str) -> WireValue {
    WireValue::map([(
        ICRC97_METADATA_KEY,
        WireValue::map([
            ("name", WireValue::text(name)),
            ("description", WireValue::text(description)),
            (
                "assets",
                WireValue::array([WireValue::map([
                    ("url", WireValue::text(image_url)),
                    ("mime", WireValue::text(MINT_IMAGE_MIME)),
                    ("purpose", WireValue::text(ICRC97_IMAGE_PURPOSE)),
                ])]),
            ),
        ]),
    )])
}

/// A token as the gallery sees it.
///
/// Records are created by a store fetch and replaced wholesale on every
/// refresh; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Token identifier, unique within the collection
    pub id: u64,

    /// Normalized attributes, `None` when the ledger returned none
    pub metadata: Option<AttributeMap>,

    /// Current owner as reported by the ledger
    pub owner: Account,
}

impl TokenRecord {
    pub fn display_name(&self) -> String {
        match &self.metadata {
            Some(map) => display_name(map, self.id),
            None => format!("NFT #{}", self.id),
        }
    }

    pub fn display_description(&self) -> String {
        match &self.metadata {
            Some(map) => display_description(map),
            None => DEFAULT_DESCRIPTION.to_string(),
        }
    }

    pub fn image_url(&self) -> String {
        match &self.metadata {
            Some(map) => primary_image_url(map),
            None => DEFAULT_IMAGE_URL.to_string(),
        }
    }
}

/// Collection-level metadata, fetched once per identity and cached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub attributes: AttributeMap,
}
