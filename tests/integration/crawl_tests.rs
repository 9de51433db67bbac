//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the best-seller site and drive
//! full runs through the coordinator end-to-end.

use shelf_surfer::config::{parse_config, Config};
use shelf_surfer::filter::fields;
use shelf_surfer::{Coordinator, CrawlOptions, OptionsForm, OptionsError, SurferError};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
///
/// Category 2 gets one extra subcategory per entry of `subcategories`.
fn create_test_config(host: &str, subcategories: &[(u64, &str)]) -> Config {
    let mut toml = format!(
        r#"
[crawler]
host = "{}"
min-pause = 0
max-pause = 0
request-timeout = 5

[headers]
user-agent = "ShelfSurferTest/1.0"
"#,
        host
    );

    for (id, slug) in subcategories {
        toml.push_str(&format!(
            "\n[[catalog.subcategory]]\ncategory = 2\nid = {}\nslug = \"{}\"\n",
            id, slug
        ));
    }

    parse_config(&toml).expect("test config should be valid")
}

fn listing_body(entries: &[(&str, &str)]) -> String {
    let mut body = String::from("<html><body><ol>");
    for (href, title) in entries {
        body.push_str(&format!(
            r#"<div class="zg_itemWrapper"><div><a class="a-link-normal" href="{}">{}</a></div></div>"#,
            href, title
        ));
    }
    body.push_str("</ol></body></html>");
    body
}

fn detail_body(name: &str, price: &str, reviews: u32, rank: u32) -> String {
    format!(
        r#"<html><body>
        <span id="productTitle">  {} </span>
        <span id="priceblock_ourprice">{}</span>
        <span id="acrCustomerReviewText">{} customer reviews</span>
        <div id="dp-container">
          <table>
            <tr><th>Product Dimensions</th><td>12.3 x 14 x 2.5 inches</td></tr>
            <tr><th>Item Weight</th><td>3.1 pounds</td></tr>
            <tr><th>Best Sellers Rank</th><td>#{} in Apps &amp; Games</td></tr>
          </table>
        </div>
        </body></html>"#,
        name, price, reviews, rank
    )
}

async fn mount_listing(server: &MockServer, listing_path: &str, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(listing_path))
        .and(query_param("pg", page.to_string()))
        .and(query_param("ajax", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, detail_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(detail_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn detail_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path().contains("/dp/"))
        .count()
}

#[tokio::test]
async fn test_full_run_two_subcategories() {
    let server = MockServer::start().await;
    let config = create_test_config(
        &server.uri(),
        &[(101, "Best-Sellers-Games-Puzzle"), (102, "Best-Sellers-Games-Card")],
    );

    mount_listing(
        &server,
        "/Best-Sellers-Games-Puzzle/zgbs/mobile-apps/101",
        1,
        listing_body(&[("/Jigsaw/dp/P1/ref=zg_bs_1", "Jigsaw")]),
    )
    .await;
    mount_listing(
        &server,
        "/Best-Sellers-Games-Card/zgbs/mobile-apps/102",
        1,
        listing_body(&[("/Solitaire/dp/C1/ref=zg_bs_1", "Solitaire")]),
    )
    .await;
    mount_detail(&server, "/Jigsaw/dp/P1", detail_body("Jigsaw", "$4.99", 1200, 3)).await;
    mount_detail(
        &server,
        "/Solitaire/dp/C1",
        detail_body("Solitaire", "$1.00 - $3.00", 88, 14),
    )
    .await;

    let coordinator = Coordinator::new(&config).unwrap();
    let stream = coordinator
        .start(CrawlOptions::for_categories(vec![2]))
        .unwrap();

    let mut products = tokio::time::timeout(Duration::from_secs(10), stream.collect())
        .await
        .expect("stream should close once both walkers finish");
    products.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(products.len(), 2);

    let jigsaw = &products[0];
    assert_eq!(jigsaw.name, "Jigsaw");
    assert_eq!(jigsaw.link, format!("{}/Jigsaw/dp/P1", server.uri()));
    assert!((jigsaw.price - 4.99).abs() < 1e-9);
    assert_eq!(jigsaw.review_count, 1200);
    assert_eq!(jigsaw.rank, 3);
    assert!((jigsaw.length - 12.3).abs() < 1e-9);
    assert!((jigsaw.width - 14.0).abs() < 1e-9);
    assert!((jigsaw.height - 2.5).abs() < 1e-9);
    assert!((jigsaw.weight - 3.1).abs() < 1e-9);

    let solitaire = &products[1];
    assert!((solitaire.price - 2.0).abs() < 1e-9);

    let summary = coordinator.wait().await.unwrap();
    assert_eq!(summary.links, 2);
    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.accepted(), 2);
    assert!(!summary.cancelled);
    assert!(!coordinator.is_running());
}

#[tokio::test]
async fn test_repeated_link_fetched_once() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri(), &[(201, "Best-Sellers-Games-Word")]);
    let listing = "/Best-Sellers-Games-Word/zgbs/mobile-apps/201";

    mount_listing(
        &server,
        listing,
        1,
        listing_body(&[
            ("/Crossword/dp/W1/ref=zg_bs_1", "Crossword"),
            ("/Anagram/dp/W2/ref=zg_bs_2", "Anagram"),
        ]),
    )
    .await;
    // Same product again on the next page, with a different tracking suffix
    mount_listing(
        &server,
        listing,
        2,
        listing_body(&[("/Crossword/dp/W1/ref=zg_bs_51?psc=1", "Crossword")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(listing))
        .and(query_param("pg", "3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Crossword/dp/W1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(detail_body("Crossword", "$2.00", 5, 1)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_detail(&server, "/Anagram/dp/W2", detail_body("Anagram", "$3.00", 9, 2)).await;

    let coordinator = Coordinator::new(&config).unwrap();
    let products = coordinator
        .start(CrawlOptions::for_categories(vec![2]))
        .unwrap()
        .collect()
        .await;

    assert_eq!(products.len(), 2);

    let summary = coordinator.wait().await.unwrap();
    assert_eq!(summary.pages(), 2);
    assert_eq!(summary.detail_pages(), 2);
}

#[tokio::test]
async fn test_unread_stream_blocks_walker_at_first_emission() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri(), &[(301, "Best-Sellers-Games-Board")]);

    mount_listing(
        &server,
        "/Best-Sellers-Games-Board/zgbs/mobile-apps/301",
        1,
        listing_body(&[
            ("/Chess/dp/B1/ref=zg_bs_1", "Chess"),
            ("/Go/dp/B2/ref=zg_bs_2", "Go"),
            ("/Checkers/dp/B3/ref=zg_bs_3", "Checkers"),
        ]),
    )
    .await;
    for (route, name) in [
        ("/Chess/dp/B1", "Chess"),
        ("/Go/dp/B2", "Go"),
        ("/Checkers/dp/B3", "Checkers"),
    ] {
        mount_detail(&server, route, detail_body(name, "$5.00", 10, 1)).await;
    }

    let coordinator = Coordinator::new(&config).unwrap();
    let mut stream = coordinator
        .start(CrawlOptions::for_categories(vec![2]))
        .unwrap();

    // Nobody reads: the walker parks on its first product
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(detail_requests(&server).await, 1);
    assert!(coordinator.is_running());

    coordinator.stop();
    assert!(stream.cancel_signal().is_active());

    let summary = tokio::time::timeout(Duration::from_secs(5), coordinator.wait())
        .await
        .expect("run should end after stop")
        .unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.accepted(), 0);

    // The abandoned product is never delivered
    assert!(stream.next().await.is_none());
    assert_eq!(detail_requests(&server).await, 1);
}

#[tokio::test]
async fn test_reading_releases_walker() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri(), &[(302, "Best-Sellers-Games-Dice")]);

    mount_listing(
        &server,
        "/Best-Sellers-Games-Dice/zgbs/mobile-apps/302",
        1,
        listing_body(&[
            ("/Yahtzee/dp/D1/ref=zg_bs_1", "Yahtzee"),
            ("/Farkle/dp/D2/ref=zg_bs_2", "Farkle"),
        ]),
    )
    .await;
    mount_detail(&server, "/Yahtzee/dp/D1", detail_body("Yahtzee", "$5.00", 10, 1)).await;
    mount_detail(&server, "/Farkle/dp/D2", detail_body("Farkle", "$5.00", 10, 2)).await;

    let coordinator = Coordinator::new(&config).unwrap();
    let mut stream = coordinator
        .start(CrawlOptions::for_categories(vec![2]))
        .unwrap();

    let first = stream.next().await.unwrap();
    assert_eq!(first.name, "Yahtzee");

    let second = stream.next().await.unwrap();
    assert_eq!(second.name, "Farkle");
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_filtered_products_are_not_emitted() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri(), &[(401, "Best-Sellers-Games-Trivia")]);

    mount_listing(
        &server,
        "/Best-Sellers-Games-Trivia/zgbs/mobile-apps/401",
        1,
        listing_body(&[
            ("/Quiz/dp/T1/ref=zg_bs_1", "Quiz"),
            ("/Pricey/dp/T2/ref=zg_bs_2", "Pricey"),
            ("/Obscure/dp/T3/ref=zg_bs_3", "Obscure"),
        ]),
    )
    .await;
    mount_detail(&server, "/Quiz/dp/T1", detail_body("Quiz", "$9.99", 500, 4)).await;
    mount_detail(&server, "/Pricey/dp/T2", detail_body("Pricey", "$99.00", 500, 5)).await;
    mount_detail(&server, "/Obscure/dp/T3", detail_body("Obscure", "$9.99", 500, 9000)).await;

    let coordinator = Coordinator::new(&config).unwrap();
    let mut form = OptionsForm::new();
    form.push(fields::CATEGORIES, "2")
        .push(fields::MAX_PRICE, "20")
        .push(fields::MAX_RANK, "100")
        .push(fields::MAX_WEIGHT, "3")
        .push(fields::TOLERANCE, "0.05");
    let options = form.into_options(coordinator.catalog()).unwrap();

    let products = coordinator.start(options).unwrap().collect().await;
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Quiz"]);

    let summary = coordinator.wait().await.unwrap();
    assert_eq!(summary.rejected(), 2);
}

#[tokio::test]
async fn test_start_while_active_is_rejected() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri(), &[(501, "Best-Sellers-Games-Arcade")]);

    mount_listing(
        &server,
        "/Best-Sellers-Games-Arcade/zgbs/mobile-apps/501",
        1,
        listing_body(&[("/Pinball/dp/A1/ref=zg_bs_1", "Pinball")]),
    )
    .await;
    mount_detail(&server, "/Pinball/dp/A1", detail_body("Pinball", "$1.00", 1, 1)).await;

    let coordinator = Coordinator::new(&config).unwrap();
    let stream = coordinator
        .start(CrawlOptions::for_categories(vec![2]))
        .unwrap();

    let second = coordinator.start(CrawlOptions::for_categories(vec![2]));
    assert!(matches!(second, Err(SurferError::RunActive)));

    assert_eq!(stream.collect().await.len(), 1);
    coordinator.wait().await.unwrap();

    // Once the first run is over a new one may start
    let again = coordinator
        .start(CrawlOptions::for_categories(vec![2]))
        .unwrap();
    assert_eq!(again.collect().await.len(), 1);
}

#[tokio::test]
async fn test_unknown_category_rejected_before_any_request() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri(), &[]);
    let coordinator = Coordinator::new(&config).unwrap();

    let mut form = OptionsForm::new();
    form.push(fields::CATEGORIES, "1").push(fields::CATEGORIES, "99");
    assert_eq!(
        form.into_options(coordinator.catalog()).err(),
        Some(OptionsError::UnknownCategory(99))
    );

    let started = coordinator.start(CrawlOptions::for_categories(vec![99]));
    assert!(matches!(
        started,
        Err(SurferError::Options(OptionsError::UnknownCategory(99)))
    ));

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    assert!(!coordinator.is_running());
}

#[tokio::test]
async fn test_category_without_subcategories_closes_immediately() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri(), &[]);
    let coordinator = Coordinator::new(&config).unwrap();

    let stream = coordinator
        .start(CrawlOptions::for_categories(vec![2]))
        .unwrap();
    let products = tokio::time::timeout(Duration::from_secs(2), stream.collect())
        .await
        .expect("empty run should close at once");
    assert!(products.is_empty());

    coordinator.stop();
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
