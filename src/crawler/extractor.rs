//! Product extraction from listing fragments
//!
//! A listing fragment is the markup block (one `product-card` match) that
//! represents a single product on a collection page.

use crate::config::{compile_selector, SelectorConfig};
use crate::product::ProductRecord;
use crate::ConfigError;
use scraper::{ElementRef, Selector};
use thiserror::Error;
use url::Url;

/// Structural problems that make a fragment unusable
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("product link '{name}' has no href")]
    MissingHref { name: String },

    #[error("cannot resolve product link '{href}': {source}")]
    InvalidUrl {
        href: String,
        source: url::ParseError,
    },
}

/// Compiled storefront selectors
#[derive(Debug, Clone)]
pub struct Selectors {
    pub product_card: Selector,
    pub product_heading: Selector,
    pub product_link: Selector,
    pub price: Selector,
    pub image: Selector,
    pub collection_link: Selector,
    pub collection_path_segment: String,
    pub next_page: Selector,
}

impl Selectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            product_card: compile_selector("product-card", &config.product_card)?,
            product_heading: compile_selector("product-heading", &config.product_heading)?,
            product_link: compile_selector("product-link", &config.product_link)?,
            price: compile_selector("price", &config.price)?,
            image: compile_selector("image", &config.image)?,
            collection_link: compile_selector("collection-link", &config.collection_link)?,
            collection_path_segment: config.collection_path_segment.clone(),
            next_page: compile_selector("next-page", &config.next_page)?,
        })
    }
}

/// Extracts a product record from one listing fragment
///
/// # Extraction Rules
///
/// - Name: text of the first `product-link` inside the first `product-heading`, trimmed.
///   Without a non-empty name there is no record.
/// - URL: the link's `href` resolved against `base_url`.
/// - Price: trimmed text of the first `price` element, kept verbatim.
/// - Image: raw `src` of the first `image` element, not resolved.
///
/// # Returns
///
/// * `Ok(Some(record))` - A named product was found
/// * `Ok(None)` - The fragment carries no product name
/// * `Err(ExtractError)` - The name was found but the link is unusable
pub fn extract_product(
    fragment: ElementRef<'_>,
    selectors: &Selectors,
    base_url: &Url,
) -> Result<Option<ProductRecord>, ExtractError> {
    let link = fragment
        .select(&selectors.product_heading)
        .next()
        .and_then(|heading| heading.select(&selectors.product_link).next());

    let Some(link) = link else {
        return Ok(None);
    };

    let name = trimmed_text(link);
    if name.is_empty() {
        return Ok(None);
    }

    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| ExtractError::MissingHref { name: name.clone() })?;

    let url = base_url
        .join(href.trim())
        .map_err(|source| ExtractError::InvalidUrl {
            href: href.to_string(),
            source,
        })?;

    let price = fragment.select(&selectors.price).next().map(trimmed_text);

    let image_url = fragment
        .select(&selectors.image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    Ok(Some(ProductRecord {
        name,
        url: url.to_string(),
        price,
        image_url,
    }))
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
