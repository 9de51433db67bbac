//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared client with browser-like headers and timeouts
//! - Building paginated listing URLs
//! - Classifying responses into a [`FetchResult`]
//!
//! There are no retries. A failed listing page ends that link's walk and a
//! failed detail page skips that one product.

use crate::config::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the client timeout
        timed_out: bool,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds the HTTP client shared by every task of a coordinator
///
/// The client carries the configured request headers, the per-request timeout
/// and compression support. It is cheap to clone.
pub fn build_http_client(config: &Config) -> Result<Client, crate::SurferError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_str(&config.headers.accept).map_err(|e| {
            crate::ConfigError::Validation(format!("Invalid accept header: {}", e))
        })?,
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.headers.accept_language).map_err(|e| {
            crate::ConfigError::Validation(format!("Invalid accept-language header: {}", e))
        })?,
    );

    let client = Client::builder()
        .user_agent(config.headers.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.crawler.request_timeout())
        .connect_timeout(config.crawler.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Builds the URL of one page of a best-seller listing
///
/// # Example
///
/// ```
/// use shelf_surfer::crawler::listing_page_url;
/// use url::Url;
///
/// let link = Url::parse("https://www.amazon.com/Best-Sellers/zgbs/appliances/1").unwrap();
/// assert_eq!(
///     listing_page_url(&link, 2).as_str(),
///     "https://www.amazon.com/Best-Sellers/zgbs/appliances/1?_encoding=UTF8&pg=2&ajax=1"
/// );
/// ```
pub fn listing_page_url(link: &Url, page: u32) -> Url {
    let mut url = link.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("_encoding", "UTF8")
        .append_pair("pg", &page.to_string())
        .append_pair("ajax", "1");
    url
}

/// Fetches a URL and classifies the outcome
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::NetworkError {
                timed_out: e.is_timeout(),
                error: if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                },
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            timed_out: e.is_timeout(),
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut config = Config::default();
        config.headers.accept = "bad\nheader".to_string();
        assert!(build_http_client(&config).is_err());
    }

    #[test]
    fn test_listing_page_url_replaces_query() {
        let link = Url::parse("https://www.amazon.com/B/zgbs/a/1?pg=9&ref=x").unwrap();
        let url = listing_page_url(&link, 3);
        assert_eq!(url.query(), Some("_encoding=UTF8&pg=3&ajax=1"));
        assert_eq!(url.path(), "/B/zgbs/a/1");
    }

    #[tokio::test]
    async fn test_fetch_success_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list"))
            .and(query_param("pg", "1"))
            .and(header_exists("accept-language"))
            .and(header("user-agent", "ShelfSurferTest/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.headers.user_agent = "ShelfSurferTest/1.0".to_string();
        let client = build_http_client(&config).unwrap();
        let link = Url::parse(&format!("{}/list", server.uri())).unwrap();
        let result = fetch_page(&client, listing_page_url(&link, 1).as_str()).await;

        match result {
            FetchResult::Success {
                status_code, body, ..
            } => {
                assert_eq!(status_code, 200);
                assert_eq!(body, "<html>ok</html>");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&Config::default()).unwrap();
        let result = fetch_page(&client, &format!("{}/missing", server.uri())).await;
        assert!(matches!(result, FetchResult::HttpError { status_code: 404 }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let client = build_http_client(&Config::default()).unwrap();
        // Port 9 (discard) is closed on test machines
        let result = fetch_page(&client, "http://127.0.0.1:9/").await;
        assert!(matches!(result, FetchResult::NetworkError { .. }));
    }
}
