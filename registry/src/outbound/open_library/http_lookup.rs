//! Reqwest-backed Open Library book lookup adapter.
//!
//! This adapter owns transport details only: request construction, timeout and
//! HTTP error mapping, and JSON decoding into domain book records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::BooksResponseDto;
use crate::domain::Isbn;
use crate::domain::ports::{BookLookup, BookLookupError, BookRecord};

const BOOKS_API_PATH: &str = "api/books";
const DEFAULT_USER_AGENT: &str = "gift-registry/0.1";

/// Outbound identity sent with Open Library requests.
#[derive(Debug, Clone)]
pub struct OpenLibraryIdentity {
    /// HTTP user-agent sent to Open Library.
    pub user_agent: String,
}

impl Default for OpenLibraryIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Errors raised while constructing the adapter.
#[derive(Debug, thiserror::Error)]
pub enum OpenLibrarySetupError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The books endpoint could not be derived from the base URL.
    #[error("invalid Open Library base URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Book lookup adapter that performs HTTP GET requests against Open Library.
pub struct OpenLibraryBookLookup {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl OpenLibraryBookLookup {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let lookup = OpenLibraryBookLookup::new(base_url, Duration::from_secs(10));
    /// assert!(lookup.is_ok() || lookup.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot carry a path.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, OpenLibrarySetupError> {
        Self::with_identity(base_url, timeout, OpenLibraryIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot carry a path.
    pub fn with_identity(
        base_url: &Url,
        timeout: Duration,
        identity: OpenLibraryIdentity,
    ) -> Result<Self, OpenLibrarySetupError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: books_endpoint(base_url)?,
            user_agent: identity.user_agent,
        })
    }

    fn request_url(&self, isbn: &Isbn) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("bibkeys", &bibkey(isbn))
            .append_pair("jscmd", "data")
            .append_pair("format", "json");
        url
    }
}

#[async_trait]
impl BookLookup for OpenLibraryBookLookup {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<BookRecord, BookLookupError> {
        let url = self.request_url(isbn);
        debug!(%isbn, %url, "requesting Open Library book data");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| map_transport_error(&err))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_record(isbn, body.as_ref())
    }
}

fn books_endpoint(base_url: &Url) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }
    base.join(BOOKS_API_PATH)
}

fn bibkey(isbn: &Isbn) -> String {
    format!("ISBN:{isbn}")
}

fn parse_record(isbn: &Isbn, body: &[u8]) -> Result<BookRecord, BookLookupError> {
    let decoded: BooksResponseDto = serde_json::from_slice(body).map_err(|error| {
        BookLookupError::decode(format!("invalid Open Library JSON payload: {error}"))
    })?;
    decoded
        .into_record(&bibkey(isbn))
        .ok_or_else(|| BookLookupError::not_found(isbn.as_str()))
}

fn map_transport_error(error: &reqwest::Error) -> BookLookupError {
    if error.is_timeout() {
        BookLookupError::timeout(error.to_string())
    } else {
        BookLookupError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BookLookupError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => BookLookupError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BookLookupError::timeout(message)
        }
        _ => BookLookupError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the Open Library adapter.
    //!
    //! The wire tests serve one canned response from a local listener so the
    //! full request path runs without reaching the network.

    use super::*;
    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const CONCRETE_MATHEMATICS_BODY: &str = r#"{"ISBN:0201558025":{"title":"Concrete mathematics","authors":[{"name":"Ronald L. Graham"}],"cover":{"medium":"https://covers.openlibrary.org/b/id/135182-M.jpg"}}}"#;

    fn isbn(raw: &str) -> Isbn {
        Isbn::parse(raw).expect("valid isbn")
    }

    fn lookup(base: &str) -> OpenLibraryBookLookup {
        let base_url = Url::parse(base).expect("valid base url");
        OpenLibraryBookLookup::new(&base_url, Duration::from_secs(5)).expect("client builds")
    }

    #[rstest]
    #[case::bare_host("https://openlibrary.org")]
    #[case::trailing_slash("https://openlibrary.org/")]
    fn builds_books_query_for_the_isbn_bibkey(#[case] base: &str) {
        let url = lookup(base).request_url(&isbn("0-201-55802-5"));
        assert_eq!(
            url.as_str(),
            "https://openlibrary.org/api/books?bibkeys=ISBN%3A0201558025&jscmd=data&format=json"
        );
    }

    #[test]
    fn keeps_a_mirror_path_prefix() {
        let url = lookup("http://127.0.0.1:8080/mirror").request_url(&isbn("9781598560169"));
        assert_eq!(url.path(), "/mirror/api/books");
    }

    #[test]
    fn parses_book_data_into_a_record() {
        let body = r#"{
            "ISBN:0201558025": {
                "url": "https://openlibrary.org/books/OL1429049M/Concrete_mathematics",
                "title": "Concrete mathematics",
                "subtitle": "a foundation for computer science",
                "authors": [
                    { "url": "https://openlibrary.org/authors/OL720958A", "name": "Ronald L. Graham" },
                    { "url": "https://openlibrary.org/authors/OL229501A", "name": "Donald Knuth" }
                ],
                "cover": {
                    "small": "https://covers.openlibrary.org/b/id/135182-S.jpg",
                    "medium": "https://covers.openlibrary.org/b/id/135182-M.jpg",
                    "large": "https://covers.openlibrary.org/b/id/135182-L.jpg"
                },
                "number_of_pages": 625
            }
        }"#;

        let record = parse_record(&isbn("0201558025"), body.as_bytes()).expect("JSON should decode");
        assert_eq!(
            record,
            BookRecord {
                title: "Concrete mathematics".to_owned(),
                authors: vec!["Ronald L. Graham".to_owned(), "Donald Knuth".to_owned()],
                cover: crate::domain::ports::BookCover {
                    small: Some("https://covers.openlibrary.org/b/id/135182-S.jpg".to_owned()),
                    medium: Some("https://covers.openlibrary.org/b/id/135182-M.jpg".to_owned()),
                    large: Some("https://covers.openlibrary.org/b/id/135182-L.jpg".to_owned()),
                },
            },
            "subtitle and page count are not carried into the record"
        );
    }

    #[test]
    fn book_without_cover_decodes_with_empty_cover() {
        let body = r#"{ "ISBN:9781598560169": { "title": "The Unicode Standard, Version 5.0" } }"#;
        let record =
            parse_record(&isbn("9781598560169"), body.as_bytes()).expect("JSON should decode");
        assert_eq!(record.cover, crate::domain::ports::BookCover::default());
        assert!(record.authors.is_empty());
    }

    #[test]
    fn empty_object_means_not_found() {
        let error = parse_record(&isbn("0201558025"), b"{}").expect_err("no entry");
        assert_eq!(error, BookLookupError::not_found("0201558025"));
    }

    #[test]
    fn invalid_json_maps_to_decode() {
        let error = parse_record(&isbn("0201558025"), b"<html>").expect_err("decode should fail");
        assert!(
            matches!(error, BookLookupError::Decode { .. }),
            "non-JSON bodies should map to Decode errors",
        );
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    #[case::not_found(StatusCode::NOT_FOUND)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_http_statuses_to_expected_domain_errors(#[case] status: StatusCode) {
        let error = map_status_error(status, b"{\"error\":\"backend unavailable\"}");
        let matched = match status {
            StatusCode::TOO_MANY_REQUESTS => matches!(error, BookLookupError::RateLimited { .. }),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                matches!(error, BookLookupError::Timeout { .. })
            }
            _ => matches!(error, BookLookupError::Transport { .. }),
        };
        assert!(matched, "unexpected mapping for {status}: {error:?}");
    }

    #[test]
    fn status_messages_carry_a_compact_body_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"  upstream \n  down  ");
        assert_eq!(error, BookLookupError::transport("status 502: upstream down"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(200);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    async fn read_request_head(socket: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut chunk = [0_u8; 1024];
        while !head.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = socket.read(&mut chunk).await.expect("request should be readable");
            if read == 0 {
                break;
            }
            head.extend_from_slice(chunk.get(..read).expect("read stays within the chunk"));
        }
        String::from_utf8_lossy(&head).to_ascii_lowercase()
    }

    /// Accept one connection, answer it with `status` and `body`, and hand
    /// back the lower-cased request head.
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("listener has an address");
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("client should connect");
            let head = read_request_head(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("response should be written");
            head
        });
        let base_url = Url::parse(&format!("http://{address}")).expect("valid local url");
        (base_url, server)
    }

    fn wire_lookup(base_url: &Url, timeout: Duration) -> OpenLibraryBookLookup {
        let identity = OpenLibraryIdentity {
            user_agent: "gift-registry-tests/1.0".to_owned(),
        };
        OpenLibraryBookLookup::with_identity(base_url, timeout, identity).expect("client builds")
    }

    #[tokio::test]
    async fn fetches_and_maps_a_book_over_http() {
        let (base_url, server) = serve_once("200 OK", CONCRETE_MATHEMATICS_BODY).await;
        let lookup = wire_lookup(&base_url, Duration::from_secs(5));

        let record = lookup
            .find_by_isbn(&isbn("0-201-55802-5"))
            .await
            .expect("book should resolve");
        let head = server.await.expect("server task completes");

        assert_eq!(record.title, "Concrete mathematics");
        assert_eq!(record.authors, ["Ronald L. Graham"]);
        assert_eq!(
            record.cover.medium.as_deref(),
            Some("https://covers.openlibrary.org/b/id/135182-M.jpg")
        );
        assert!(
            head.starts_with(
                "get /api/books?bibkeys=isbn%3a0201558025&jscmd=data&format=json http/1.1"
            ),
            "request head: {head}"
        );
        assert!(head.contains("user-agent: gift-registry-tests/1.0"), "request head: {head}");
        assert!(head.contains("accept: application/json"), "request head: {head}");
    }

    #[tokio::test]
    async fn empty_response_object_is_not_found() {
        let (base_url, server) = serve_once("200 OK", "{}").await;
        let lookup = wire_lookup(&base_url, Duration::from_secs(5));

        let error = lookup
            .find_by_isbn(&isbn("0201558025"))
            .await
            .expect_err("empty object has no book");
        server.await.expect("server task completes");

        assert_eq!(error, BookLookupError::not_found("0201558025"));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let (base_url, server) =
            serve_once("429 Too Many Requests", r#"{"error":"slow down"}"#).await;
        let lookup = wire_lookup(&base_url, Duration::from_secs(5));

        let error = lookup
            .find_by_isbn(&isbn("0201558025"))
            .await
            .expect_err("429 should fail the lookup");
        server.await.expect("server task completes");

        assert_eq!(
            error,
            BookLookupError::rate_limited(r#"status 429: {"error":"slow down"}"#)
        );
    }

    #[tokio::test]
    async fn silent_server_maps_to_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("listener has an address");
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("client should connect");
            read_request_head(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        let base_url = Url::parse(&format!("http://{address}")).expect("valid local url");
        let lookup = wire_lookup(&base_url, Duration::from_millis(200));

        let error = lookup
            .find_by_isbn(&isbn("0201558025"))
            .await
            .expect_err("silent server should time out");
        server.abort();

        assert!(
            matches!(error, BookLookupError::Timeout { .. }),
            "unexpected error: {error:?}"
        );
    }
}
