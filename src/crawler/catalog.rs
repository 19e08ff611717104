//! Collection discovery from the catalog root

use crate::crawler::extractor::Selectors;
use crate::crawler::{Harvest, Harvester};
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Finds collection links on the catalog root page
///
/// A link counts when it matches the `collection-link` selector and its raw
/// `href` contains the collection path segment. Targets are resolved against
/// `base_url` and returned in document order, duplicates included.
pub fn discover_collections(html: &str, selectors: &Selectors, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.collection_link)
        .filter_map(|link| link.value().attr("href"))
        .filter(|href| href.contains(&selectors.collection_path_segment))
        .filter_map(|href| match base_url.join(href.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Skipping unresolvable collection link '{}': {}", href, e);
                None
            }
        })
        .collect()
}

/// Keeps the first occurrence of each URL
fn dedupe(collections: Vec<Url>) -> Vec<Url> {
    let mut seen = HashSet::new();
    collections
        .into_iter()
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}

impl Harvester {
    /// Fetches the catalog root and walks every discovered collection in order
    ///
    /// An unreachable catalog root ends the run with whatever `harvest` holds.
    pub async fn walk_catalog(&mut self, harvest: &mut Harvest) {
        let catalog_url = self.catalog_url.clone();
        let Some(html) = self.fetcher.fetch(&catalog_url).await else {
            tracing::warn!("Catalog root {} unavailable, nothing to harvest", catalog_url);
            return;
        };

        let mut collections = discover_collections(&html, &self.selectors, &self.base_url);
        harvest.stats.collections_discovered = collections.len();

        if self.dedupe_collections {
            collections = dedupe(collections);
        }
        tracing::debug!("Walking {} collections", collections.len());

        for collection_url in &collections {
            tracing::info!("Scraping collection: {}", collection_url);
            let walk = self.walk_collection(collection_url, harvest).await;
            harvest.stats.collections_walked += 1;
            tracing::debug!(
                "Collection {} ended on page {} ({:?}), {} products",
                collection_url,
                walk.last_page,
                walk.end,
                walk.products
            );
        }
    }
}
