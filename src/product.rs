//! Product records extracted from listing pages

use serde::{Deserialize, Serialize};

/// One product as rendered on a collection listing page
///
/// `price` is the raw display text (currency symbol and locale formatting
/// included). `image_url` is the raw `src` attribute and is not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Display name, trimmed
    pub name: String,

    /// Absolute product URL
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
