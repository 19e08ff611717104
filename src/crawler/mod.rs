//! Crawler module for catalog traversal and product extraction
//!
//! This module contains the core harvesting logic, including:
//! - Policy-gated, rate-limited HTTP fetching
//! - Product extraction from listing fragments
//! - Pagination through a single collection
//! - Collection discovery from the catalog root
//!
//! Everything runs sequentially; each request is awaited before the next.

mod catalog;
mod collection;
mod delay;
mod extractor;
mod fetcher;

pub use catalog::discover_collections;
pub use collection::{scan_listing_page, CollectionWalk, PageScan, WalkEnd};
pub use delay::RandomDelay;
pub use extractor::{extract_product, ExtractError, Selectors};
pub use fetcher::{build_http_client, FetchError, FetchStats, Fetcher};

use crate::config::Config;
use crate::output::HarvestStats;
use crate::product::ProductRecord;
use crate::robots::PolicyGate;
use crate::HarvestError;
use url::Url;

/// Accumulated result of a run
///
/// Records are appended in traversal order as they are extracted. A product
/// listed on several pages (or in several collections) appears once per listing.
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub products: Vec<ProductRecord>,
    pub stats: HarvestStats,
}

impl Harvest {
    /// Appends one extracted record
    pub fn record(&mut self, product: ProductRecord) {
        tracing::info!("Found product: {}", product.name);
        self.stats.products += 1;
        self.products.push(product);
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Drives the catalog and collection walks for one site
pub struct Harvester {
    fetcher: Fetcher,
    selectors: Selectors,
    base_url: Url,
    catalog_url: Url,
    dedupe_collections: bool,
}

impl Harvester {
    /// Assembles a harvester from already-built parts
    pub fn new(fetcher: Fetcher, selectors: Selectors, base_url: Url, catalog_url: Url) -> Self {
        Self {
            fetcher,
            selectors,
            base_url,
            catalog_url,
            dedupe_collections: false,
        }
    }

    /// Walk each discovered collection URL only once
    pub fn with_dedupe_collections(mut self, dedupe: bool) -> Self {
        self.dedupe_collections = dedupe;
        self
    }

    /// Builds the HTTP client, loads the robots policy and compiles selectors
    ///
    /// Fails when robots.txt cannot be loaded; no page is requested in that case.
    pub async fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let catalog_url = base_url.join(&config.site.catalog_path)?;
        let robots_url = base_url.join(&config.site.robots_path)?;

        let client = build_http_client(&config.headers, &config.fetcher)?;
        let selectors = Selectors::from_config(&config.selectors)?;
        let delay = RandomDelay::from_config(&config.fetcher);

        let gate = PolicyGate::load(&client, &robots_url).await?;
        if let Some(seconds) = gate.crawl_delay() {
            if seconds * 1000.0 > delay.max().as_millis() as f64 {
                tracing::warn!(
                    "robots.txt asks for a {}s crawl delay, above the configured maximum of {:?}",
                    seconds,
                    delay.max()
                );
            }
        }

        let fetcher = Fetcher::new(client, gate, delay);
        Ok(Self::new(fetcher, selectors, base_url, catalog_url)
            .with_dedupe_collections(config.crawl.dedupe_collections))
    }

    /// Runs discovery and every collection walk, returning the accumulation
    pub async fn run(mut self) -> Harvest {
        let mut harvest = Harvest::default();
        self.walk_catalog(&mut harvest).await;
        harvest.stats.absorb_fetch_stats(self.fetcher.stats());
        harvest
    }
}

/// Harvests every product reachable from the configured catalog root
///
/// This is the main entry point for a run. Per-page and per-fragment failures
/// are logged and skipped; only startup failures are returned as errors.
///
/// # Returns
///
/// * `Ok(Harvest)` - Run finished (possibly with zero products)
/// * `Err(HarvestError)` - Client, selectors or robots policy could not be set up
pub async fn harvest(config: &Config) -> Result<Harvest, HarvestError> {
    let harvester = Harvester::from_config(config).await?;
    Ok(harvester.run().await)
}
