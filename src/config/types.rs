use serde::Deserialize;

/// Main configuration structure for Catalog-Harvest
///
/// Every section is optional; an empty file (or no file at all) yields the
/// defaults for the reference storefront.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetcher: FetcherConfig,
    pub headers: HeadersConfig,
    pub selectors: SelectorConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root that relative links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the catalog root listing all collections
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,

    /// Path of the robots.txt file
    #[serde(rename = "robots-path")]
    pub robots_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gardeniashop.co.uk".to_string(),
            catalog_path: "/collections".to_string(),
            robots_path: "/robots.txt".to_string(),
        }
    }
}

/// Fetcher pacing and timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Lower bound of the randomized pre-request delay (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the randomized pre-request delay (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 2_000,
            max_delay_ms: 5_000,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Request headers sent identically on every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadersConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

/// CSS selectors describing the storefront markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One listing fragment per product
    #[serde(rename = "product-card")]
    pub product_card: String,

    /// Heading inside a fragment that names the product
    #[serde(rename = "product-heading")]
    pub product_heading: String,

    /// Link inside the heading carrying name and product path
    #[serde(rename = "product-link")]
    pub product_link: String,

    pub price: String,

    pub image: String,

    /// Links on the catalog root that may point at collections
    #[serde(rename = "collection-link")]
    pub collection_link: String,

    /// Substring a link target must contain to count as a collection
    #[serde(rename = "collection-path-segment")]
    pub collection_path_segment: String,

    /// Pagination marker; its absence ends a collection
    #[serde(rename = "next-page")]
    pub next_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            product_card: "div.card-wrapper".to_string(),
            product_heading: "h3.card__heading".to_string(),
            product_link: "a.full-unstyled-link".to_string(),
            price: "span.price-item--regular".to_string(),
            image: "img.motion-reduce".to_string(),
            collection_link: "a.full-unstyled-link".to_string(),
            collection_path_segment: "/collections/".to_string(),
            next_page: "a.pagination__next".to_string(),
        }
    }
}

/// Traversal behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Walk each discovered collection URL only once
    #[serde(rename = "dedupe-collections")]
    pub dedupe_collections: bool,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON product document
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "products.json".to_string(),
        }
    }
}
