use crate::adapters::token::resolve_single;
use crate::core::examples::parse_puzzle_page;
use crate::domain::model::{DiscoveredToken, Example, PuzzleId, PuzzlePage, SessionToken};
use crate::domain::ports::{PuzzleProvider, TokenSource};
use crate::utils::error::{AocError, Result};

/// One puzzle plus the credentials used to fetch it. The session token is
/// discovered once and reused; the puzzle page is fetched once and shared
/// between title and examples.
pub struct PuzzleSession<T: TokenSource, P: PuzzleProvider> {
    puzzle: PuzzleId,
    tokens: T,
    provider: P,
    token: Option<DiscoveredToken>,
    page: Option<PuzzlePage>,
}

impl<T: TokenSource, P: PuzzleProvider> PuzzleSession<T, P> {
    pub fn new(puzzle: PuzzleId, tokens: T, provider: P) -> Self {
        Self {
            puzzle,
            tokens,
            provider,
            token: None,
            page: None,
        }
    }

    /// Discovery only runs on the first call or when `force_reload` is set.
    /// A failed reload keeps the previously cached token.
    pub async fn session_token(&mut self, force_reload: bool) -> Result<&SessionToken> {
        if force_reload || self.token.is_none() {
            let found = resolve_single(&self.tokens).await?;
            tracing::info!(
                "Session token: {} (from {})",
                found.token.redacted(),
                found.origin
            );
            self.token = Some(found);
        }
        self.token
            .as_ref()
            .map(|found| &found.token)
            .ok_or_else(|| AocError::TokenNotFound {
                tried: vec![self.tokens.name()],
            })
    }

    pub async fn input(&mut self) -> Result<String> {
        let token = self.session_token(false).await?.clone();
        self.provider.fetch_input(self.puzzle, &token).await
    }

    pub async fn page(&mut self) -> Result<&PuzzlePage> {
        let page = match self.page.take() {
            Some(page) => page,
            None => {
                let token = self.session_token(false).await?.clone();
                let html = self.provider.fetch_page(self.puzzle, &token).await?;
                parse_puzzle_page(&html)
            }
        };
        Ok(self.page.insert(page))
    }

    pub async fn examples(&mut self) -> Result<Vec<Example>> {
        Ok(self.page().await?.examples.clone())
    }

    pub async fn title(&mut self) -> Result<Option<String>> {
        Ok(self.page().await?.title.clone())
    }

    /// Answers already accepted for this puzzle, in part order.
    pub async fn submitted_answers(&mut self) -> Result<Vec<String>> {
        Ok(self.page().await?.submitted_answers.clone())
    }
}
