//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small storefront and run the full
//! discovery, pagination and extraction cycle against it.

use catalog_harvest::config::{Config, SelectorConfig};
use catalog_harvest::crawler::{
    build_http_client, Fetcher, Harvest, Harvester, RandomDelay, Selectors, WalkEnd,
};
use catalog_harvest::robots::{ParsedRobots, PolicyGate};
use catalog_harvest::{harvest, load_products, persist, HarvestError};
use url::Url;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server, with no delay
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.fetcher.min_delay_ms = 0;
    config.fetcher.max_delay_ms = 0;
    config.fetcher.timeout_secs = 5;
    config.fetcher.connect_timeout_secs = 5;
    config
}

/// Builds a harvester with an allow-all policy, skipping robots.txt
fn create_test_harvester(base_url: &str) -> Harvester {
    let config = create_test_config(base_url);
    let client = build_http_client(&config.headers, &config.fetcher).expect("client");
    let fetcher = Fetcher::new(
        client,
        PolicyGate::new(ParsedRobots::allow_all()),
        RandomDelay::new(0, 0),
    );
    let selectors = Selectors::from_config(&SelectorConfig::default()).expect("selectors");
    let base = Url::parse(base_url).expect("base url");
    let catalog = base.join("/collections").expect("catalog url");
    Harvester::new(fetcher, selectors, base, catalog)
}

fn full_card(slug: &str, name: &str, price: &str) -> String {
    format!(
        r#"<div class="card-wrapper">
             <div class="card__media"><img class="motion-reduce" src="//cdn.example/{slug}.jpg"></div>
             <h3 class="card__heading"><a class="full-unstyled-link" href="/products/{slug}"> {name} </a></h3>
             <div class="price"><span class="price-item price-item--regular"> {price} </span></div>
           </div>"#
    )
}

fn priceless_card(slug: &str, name: &str) -> String {
    format!(
        r#"<div class="card-wrapper">
             <h3 class="card__heading"><a class="full-unstyled-link" href="/products/{slug}">{name}</a></h3>
           </div>"#
    )
}

fn listing_page(cards: &[String], has_next: bool) -> String {
    let next = if has_next {
        r#"<nav class="pagination"><a class="pagination__next" href="?page=next">Next</a></nav>"#
    } else {
        ""
    };
    format!(
        "<html><body><div id=\"product-grid\">{}</div>{}</body></html>",
        cards.concat(),
        next
    )
}

fn catalog_page(slugs: &[&str]) -> String {
    let links: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<div class="card"><a class="full-unstyled-link" href="/collections/{slug}">{slug}</a></div>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><a class="full-unstyled-link" href="/pages/contact">Contact</a>{}</body></html>"#,
        links
    )
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_catalog(server: &MockServer, slugs: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page(slugs)))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, slug: &str, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/collections/{}", slug)))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn forbid_page(server: &MockServer, slug: &str, page: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/collections/{}", slug)))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], false)))
        .expect(0)
        .mount(server)
        .await;
}

/// Two collections, one linked twice, one page each with a full and a
/// priceless product: six records in traversal order.
#[tokio::test]
async fn test_full_harvest_with_duplicate_collection_link() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /checkout").await;
    mount_catalog(&server, &["roses", "tulips", "roses"]).await;
    mount_page(
        &server,
        "roses",
        1,
        listing_page(
            &[
                full_card("red-rose", "Red Rose", "£30.00"),
                priceless_card("white-rose", "White Rose"),
            ],
            false,
        ),
    )
    .await;
    mount_page(
        &server,
        "tulips",
        1,
        listing_page(
            &[
                full_card("tulipe", "Tulipe Élégante", "€12,50"),
                priceless_card("yellow-tulip", "Yellow Tulip"),
            ],
            false,
        ),
    )
    .await;

    let config = create_test_config(&server.uri());
    let result = harvest(&config).await.expect("harvest");

    let names: Vec<_> = result.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Red Rose",
            "White Rose",
            "Tulipe Élégante",
            "Yellow Tulip",
            "Red Rose",
            "White Rose",
        ]
    );

    let red = &result.products[0];
    assert_eq!(red.url, format!("{}/products/red-rose", server.uri()));
    assert_eq!(red.price.as_deref(), Some("£30.00"));
    assert_eq!(red.image_url.as_deref(), Some("//cdn.example/red-rose.jpg"));

    let white = &result.products[1];
    assert_eq!(white.price, None);
    assert_eq!(white.image_url, None);

    assert_eq!(result.stats.collections_discovered, 3);
    assert_eq!(result.stats.collections_walked, 3);
    assert_eq!(result.stats.pages_fetched, 4);
    assert_eq!(result.stats.products, 6);

    // The persisted document reads back field for field
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("products.json");
    persist(&result.products, &output).expect("persist");
    let text = std::fs::read_to_string(&output).expect("read output");
    assert!(text.contains("Tulipe Élégante"));
    assert!(text.contains("€12,50"));
    assert_eq!(load_products(&output).expect("load"), result.products);
}

#[tokio::test]
async fn test_dedupe_collections_walks_each_once() {
    let server = MockServer::start().await;
    mount_robots(&server, "").await;
    mount_catalog(&server, &["roses", "tulips", "roses"]).await;
    mount_page(
        &server,
        "roses",
        1,
        listing_page(&[full_card("red-rose", "Red Rose", "£30.00")], false),
    )
    .await;
    mount_page(
        &server,
        "tulips",
        1,
        listing_page(&[priceless_card("tulip", "Tulip")], false),
    )
    .await;

    let mut config = create_test_config(&server.uri());
    config.crawl.dedupe_collections = true;
    let result = harvest(&config).await.expect("harvest");

    assert_eq!(result.len(), 2);
    assert_eq!(result.stats.collections_discovered, 3);
    assert_eq!(result.stats.collections_walked, 2);
}

#[tokio::test]
async fn test_pagination_follows_next_marker() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "roses",
        1,
        listing_page(&[priceless_card("a", "Alpha")], true),
    )
    .await;
    mount_page(
        &server,
        "roses",
        2,
        listing_page(&[priceless_card("b", "Beta")], true),
    )
    .await;
    mount_page(
        &server,
        "roses",
        3,
        listing_page(&[priceless_card("c", "Gamma")], false),
    )
    .await;
    forbid_page(&server, "roses", 4).await;

    let mut harvester = create_test_harvester(&server.uri());
    let mut result = Harvest::default();
    let collection = Url::parse(&format!("{}/collections/roses", server.uri())).unwrap();
    let walk = harvester.walk_collection(&collection, &mut result).await;

    assert_eq!(walk.end, WalkEnd::LastPage);
    assert_eq!(walk.last_page, 3);
    assert_eq!(walk.products, 3);
}

#[tokio::test]
async fn test_walk_stops_on_empty_listings_despite_next_marker() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "roses",
        1,
        listing_page(&[priceless_card("a", "Alpha")], true),
    )
    .await;
    mount_page(&server, "roses", 2, listing_page(&[], true)).await;
    forbid_page(&server, "roses", 3).await;

    let mut harvester = create_test_harvester(&server.uri());
    let mut result = Harvest::default();
    let collection = Url::parse(&format!("{}/collections/roses", server.uri())).unwrap();
    let walk = harvester.walk_collection(&collection, &mut result).await;

    assert_eq!(walk.end, WalkEnd::NoListings);
    assert_eq!(walk.last_page, 2);
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_walk_stops_without_next_marker() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "roses",
        1,
        listing_page(
            &[priceless_card("a", "Alpha"), priceless_card("b", "Beta")],
            false,
        ),
    )
    .await;
    forbid_page(&server, "roses", 2).await;

    let mut harvester = create_test_harvester(&server.uri());
    let mut result = Harvest::default();
    let collection = Url::parse(&format!("{}/collections/roses", server.uri())).unwrap();
    let walk = harvester.walk_collection(&collection, &mut result).await;

    assert_eq!(walk.end, WalkEnd::LastPage);
    assert_eq!(walk.last_page, 1);
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_walk_stops_on_fetch_failure() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "roses",
        1,
        listing_page(&[priceless_card("a", "Alpha")], true),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/collections/roses"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    forbid_page(&server, "roses", 3).await;

    let mut harvester = create_test_harvester(&server.uri());
    let mut result = Harvest::default();
    let collection = Url::parse(&format!("{}/collections/roses", server.uri())).unwrap();
    let walk = harvester.walk_collection(&collection, &mut result).await;

    assert_eq!(walk.end, WalkEnd::FetchFailed);
    assert_eq!(walk.last_page, 2);
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_robots_denial_skips_collection() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /collections/tulips").await;
    mount_catalog(&server, &["roses", "tulips"]).await;
    mount_page(
        &server,
        "roses",
        1,
        listing_page(&[priceless_card("rose", "Rose")], false),
    )
    .await;
    forbid_page(&server, "tulips", 1).await;

    let config = create_test_config(&server.uri());
    let result = harvest(&config).await.expect("harvest");

    assert_eq!(result.len(), 1);
    assert_eq!(result.products[0].name, "Rose");
    assert_eq!(result.stats.collections_walked, 2);
    assert_eq!(result.stats.pages_denied, 1);
}

#[tokio::test]
async fn test_robots_server_error_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page(&["roses"])))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let result = harvest(&config).await;

    assert!(matches!(
        result,
        Err(HarvestError::RobotsUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_catalog(&server, &["roses"]).await;
    mount_page(
        &server,
        "roses",
        1,
        listing_page(&[priceless_card("rose", "Rose")], false),
    )
    .await;

    let config = create_test_config(&server.uri());
    let result = harvest(&config).await.expect("harvest");

    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_forbidden_robots_denies_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page(&["roses"])))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let result = harvest(&config).await.expect("harvest");

    assert!(result.is_empty());
    assert_eq!(result.stats.pages_denied, 1);
}

#[tokio::test]
async fn test_unreachable_catalog_yields_empty_harvest() {
    let server = MockServer::start().await;
    mount_robots(&server, "").await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let result = harvest(&config).await.expect("harvest");

    assert!(result.is_empty());
    assert_eq!(result.stats.collections_discovered, 0);
    assert_eq!(result.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_fixed_headers_sent() {
    let server = MockServer::start().await;
    mount_robots(&server, "").await;

    let config = create_test_config(&server.uri());
    Mock::given(method("GET"))
        .and(path("/collections"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept"))
        .and(header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_page(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let result = harvest(&config).await.expect("harvest");
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_fetch_waits_before_each_request() {
    let server = MockServer::start().await;
    mount_page(&server, "roses", 1, listing_page(&[], false)).await;

    let config = create_test_config(&server.uri());
    let client = build_http_client(&config.headers, &config.fetcher).expect("client");
    let mut fetcher = Fetcher::new(
        client,
        PolicyGate::new(ParsedRobots::allow_all()),
        RandomDelay::new(50, 80),
    );
    let url = Url::parse(&format!("{}/collections/roses?page=1", server.uri())).expect("url");

    for _ in 0..5 {
        let started = std::time::Instant::now();
        assert!(fetcher.fetch(&url).await.is_some());
        let elapsed = started.elapsed();
        assert!(
            elapsed >= std::time::Duration::from_millis(50),
            "request sent after only {:?}",
            elapsed
        );
    }

    assert_eq!(fetcher.stats().pages_fetched, 5);
}
