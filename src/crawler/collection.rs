//! Collection pagination
//!
//! A collection is walked page by page (`?page=1`, `?page=2`, ...) until one
//! of three things happens:
//!
//! | Condition | End |
//! |-----------|-----|
//! | Fetcher returns no content | `WalkEnd::FetchFailed` |
//! | Page has zero listing fragments | `WalkEnd::NoListings` |
//! | Page has no next-page marker | `WalkEnd::LastPage` |
//!
//! The empty-listings check runs before the next-marker check, so a site that
//! always renders a "next" link still terminates.

use crate::crawler::extractor::{extract_product, Selectors};
use crate::crawler::{Harvest, Harvester};
use scraper::Html;
use url::Url;

/// Why a collection walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    FetchFailed,
    NoListings,
    LastPage,
}

/// Summary of one collection walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionWalk {
    /// Page number the walk stopped on
    pub last_page: u32,
    /// Records appended during this walk
    pub products: usize,
    pub end: WalkEnd,
}

/// What a single listing page contained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScan {
    pub fragments: usize,
    pub has_next: bool,
}

/// Extracts every listing fragment on a page into `harvest`
///
/// Records are appended as soon as each fragment is extracted. Fragments
/// without a name are skipped; fragments whose link is unusable are logged
/// and skipped.
pub fn scan_listing_page(
    html: &str,
    selectors: &Selectors,
    base_url: &Url,
    harvest: &mut Harvest,
) -> PageScan {
    let document = Html::parse_document(html);
    let mut fragments = 0;

    for fragment in document.select(&selectors.product_card) {
        fragments += 1;
        match extract_product(fragment, selectors, base_url) {
            Ok(Some(product)) => harvest.record(product),
            Ok(None) => tracing::debug!("Skipping listing fragment without a product name"),
            Err(e) => {
                harvest.stats.extraction_failures += 1;
                tracing::warn!("Error parsing product: {}", e);
            }
        }
    }
    harvest.stats.fragments_seen += fragments;

    let has_next = document.select(&selectors.next_page).next().is_some();

    PageScan {
        fragments,
        has_next,
    }
}

/// URL of page `page` of a collection
pub(crate) fn page_url(collection_url: &Url, page: u32) -> Url {
    let mut url = collection_url.clone();
    url.query_pairs_mut().append_pair("page", &page.to_string());
    url
}

impl Harvester {
    /// Paginates one collection, appending its products to `harvest`
    pub async fn walk_collection(
        &mut self,
        collection_url: &Url,
        harvest: &mut Harvest,
    ) -> CollectionWalk {
        let before = harvest.len();
        let mut page = 1;

        let end = loop {
            let url = page_url(collection_url, page);
            tracing::info!("Scraping page {} of collection", page);

            let Some(html) = self.fetcher.fetch(&url).await else {
                break WalkEnd::FetchFailed;
            };

            let scan = scan_listing_page(&html, &self.selectors, &self.base_url, harvest);
            if scan.fragments == 0 {
                tracing::debug!("No listings on page {}, ending collection", page);
                break WalkEnd::NoListings;
            }

            if !scan.has_next {
                break WalkEnd::LastPage;
            }

            page += 1;
        };

        CollectionWalk {
            last_page: page,
            products: harvest.len() - before,
            end,
        }
    }
}
