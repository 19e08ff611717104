//! Run statistics
//!
//! Counters accumulated while harvesting, printed as a summary at the end
//! of the run.

use crate::crawler::FetchStats;

/// Harvest statistics summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Collection links found on the catalog root (duplicates included)
    pub collections_discovered: usize,

    /// Collection walks performed
    pub collections_walked: usize,

    /// Pages fetched successfully (catalog root included)
    pub pages_fetched: usize,

    /// URLs refused by the robots policy
    pub pages_denied: usize,

    /// Transport or HTTP status failures
    pub fetch_failures: usize,

    /// Listing fragments seen across all pages
    pub fragments_seen: usize,

    /// Fragments that carried a name but could not be turned into a record
    pub extraction_failures: usize,

    /// Records appended to the output
    pub products: usize,
}

impl HarvestStats {
    /// Copies the fetcher's counters into this summary
    pub fn absorb_fetch_stats(&mut self, fetch: FetchStats) {
        self.pages_fetched = fetch.pages_fetched;
        self.pages_denied = fetch.pages_denied;
        self.fetch_failures = fetch.fetch_failures;
    }

    /// Fragments that produced neither a record nor an error
    pub fn fragments_skipped(&self) -> usize {
        self.fragments_seen
            .saturating_sub(self.products)
            .saturating_sub(self.extraction_failures)
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStats) {
    println!("=== Harvest Statistics ===\n");

    println!("Collections:");
    println!("  Discovered: {}", stats.collections_discovered);
    println!("  Walked: {}", stats.collections_walked);
    println!();

    println!("Requests:");
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Denied by robots.txt: {}", stats.pages_denied);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!();

    println!("Listings:");
    println!("  Fragments seen: {}", stats.fragments_seen);
    println!("  Products recorded: {}", stats.products);
    println!("  Skipped (no name): {}", stats.fragments_skipped());
    println!("  Extraction failures: {}", stats.extraction_failures);
}
