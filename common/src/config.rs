// Protocol constants shared by the gallery client.

/// Metadata key under which ICRC-97 display metadata is namespaced
pub const ICRC97_METADATA_KEY: &str = "icrc97:metadata";

/// Asset purpose marking the primary token image
pub const ICRC97_IMAGE_PURPOSE: &str = "icrc97:image";

/// Image reference used when a token has no usable image asset
pub const DEFAULT_IMAGE_URL: &str = "/default-nft.png";

/// Placeholder shown when a token carries no description
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// Mime type stamped on assets minted through the gallery
pub const MINT_IMAGE_MIME: &str = "image/jpeg";

/// Maximum length of a principal in textual form (bytes)
pub const MAX_PRINCIPAL_TEXT_LENGTH: usize = 63;

/// Length of every principal text group except the last
pub const PRINCIPAL_GROUP_LENGTH: usize = 5;
