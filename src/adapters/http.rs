use crate::domain::model::{PuzzleId, SessionToken};
use crate::domain::ports::PuzzleProvider;
use crate::utils::error::{AocError, Result};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://adventofcode.com/";

pub fn default_user_agent() -> String {
    format!(
        "{}/{} (+https://github.com/aoc-setup/aoc-setup)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Thin client over the puzzle site's two endpoints.
pub struct AocClient {
    client: Client,
    base_url: Url,
}

impl AocClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|e| AocError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn puzzle_url(&self, puzzle: PuzzleId) -> Result<Url> {
        self.join(&format!("{}/day/{}", puzzle.year, puzzle.day))
    }

    pub fn input_url(&self, puzzle: PuzzleId) -> Result<Url> {
        self.join(&format!("{}/day/{}/input", puzzle.year, puzzle.day))
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AocError::ConfigError {
                message: format!("Cannot build URL for {}: {}", path, e),
            })
    }

    async fn get(&self, url: Url, token: &SessionToken) -> Result<(StatusCode, String)> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(COOKIE, format!("session={}", token.expose()))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl PuzzleProvider for AocClient {
    async fn fetch_input(&self, puzzle: PuzzleId, token: &SessionToken) -> Result<String> {
        let url = self.input_url(puzzle)?;
        let (status, body) = self.get(url.clone(), token).await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::NOT_FOUND => Err(AocError::PuzzleLocked {
                year: puzzle.year,
                day: puzzle.day,
            }),
            // the site answers a stale or forged cookie with 400 ("please log in") or 500
            StatusCode::BAD_REQUEST | StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::debug!("Rejected session response: {}", body.trim());
                Err(AocError::InvalidSession {
                    status: status.as_u16(),
                })
            }
            _ => Err(AocError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }

    async fn fetch_page(&self, puzzle: PuzzleId, token: &SessionToken) -> Result<String> {
        let url = self.puzzle_url(puzzle)?;
        let (status, body) = self.get(url.clone(), token).await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::NOT_FOUND => Err(AocError::PuzzleLocked {
                year: puzzle.year,
                day: puzzle.day,
            }),
            _ => Err(AocError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> AocClient {
        AocClient::new(&server.base_url(), "aoc-setup-tests", Duration::from_secs(5)).unwrap()
    }

    fn token() -> SessionToken {
        SessionToken::parse("53616c7465645f5f").unwrap()
    }

    #[test]
    fn test_urls_keep_base_path() {
        let client =
            AocClient::new("http://localhost:9000/mirror", "ua", Duration::from_secs(1)).unwrap();
        let puzzle = PuzzleId::new(2021, 4);
        assert_eq!(
            client.input_url(puzzle).unwrap().as_str(),
            "http://localhost:9000/mirror/2021/day/4/input"
        );
        assert_eq!(
            client.puzzle_url(puzzle).unwrap().as_str(),
            "http://localhost:9000/mirror/2021/day/4"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(AocClient::new("not a url", "ua", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_fetch_input_sends_session_cookie() {
        let server = MockServer::start();
        let input_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/2022/day/1/input")
                .header("cookie", "session=53616c7465645f5f");
            then.status(200).body("1000\n2000\n\n3000\n");
        });

        let input = client(&server)
            .fetch_input(PuzzleId::new(2022, 1), &token())
            .await
            .unwrap();

        input_mock.assert();
        assert_eq!(input, "1000\n2000\n\n3000\n");
    }

    #[tokio::test]
    async fn test_fetch_input_not_found_is_locked() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/2022/day/25/input");
            then.status(404)
                .body("Please don't repeatedly request this endpoint before it unlocks!");
        });

        let err = client(&server)
            .fetch_input(PuzzleId::new(2022, 25), &token())
            .await
            .unwrap_err();

        assert!(matches!(err, AocError::PuzzleLocked { year: 2022, day: 25 }));
    }

    #[tokio::test]
    async fn test_fetch_input_bad_request_is_invalid_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/2022/day/2/input");
            then.status(400)
                .body("Puzzle inputs differ by user.  Please log in to get your puzzle input.");
        });

        let err = client(&server)
            .fetch_input(PuzzleId::new(2022, 2), &token())
            .await
            .unwrap_err();

        assert!(matches!(err, AocError::InvalidSession { status: 400 }));
    }

    #[tokio::test]
    async fn test_fetch_page_other_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/2022/day/3");
            then.status(503);
        });

        let err = client(&server)
            .fetch_page(PuzzleId::new(2022, 3), &token())
            .await
            .unwrap_err();

        assert!(matches!(err, AocError::UnexpectedStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_page_returns_html() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/2022/day/3");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<article class=\"day-desc\"><h2>--- Day 3: Test ---</h2></article>");
        });

        let html = client(&server)
            .fetch_page(PuzzleId::new(2022, 3), &token())
            .await
            .unwrap();

        page_mock.assert();
        assert!(html.contains("Day 3: Test"));
    }
}
