// ── Token lifecycle ──
//
// One token per bridge, valid for the calendar day it was issued on.
// Every device operation asks the guard first; a stale or missing token
// is replaced by a fresh login before the operation proceeds.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use salus_api::ThermostatApi;

use crate::clock::Clock;
use crate::error::CoreError;
use crate::token::Token;

/// How concurrent callers that all find the token stale are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Callers arriving during a refresh wait for it and share its token.
    #[default]
    SingleFlight,
    /// Each caller that sees a stale token refreshes on its own. Cheaper
    /// locking, but a burst of requests at midnight logs in several times.
    Independent,
}

/// Owns the bridge's token and keeps it fresh for "today".
pub struct TokenGuard<A> {
    api: Arc<A>,
    clock: Arc<dyn Clock>,
    policy: RefreshPolicy,
    current: Mutex<Option<Token>>,
}

impl<A: ThermostatApi> TokenGuard<A> {
    pub fn new(api: Arc<A>, clock: Arc<dyn Clock>, policy: RefreshPolicy) -> Self {
        Self {
            api,
            clock,
            policy,
            current: Mutex::new(None),
        }
    }

    /// Seed the guard with a token obtained elsewhere.
    pub fn with_token(mut self, token: Token) -> Self {
        self.current = Mutex::new(Some(token));
        self
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Return `token` if it was issued today, otherwise issue a new one.
    ///
    /// Stateless: the caller keeps whatever comes back. Issuance failures
    /// propagate untouched; there is no retry.
    pub async fn ensure_valid(&self, token: Option<Token>) -> Result<Token, CoreError> {
        let today = self.clock.today();
        match token {
            Some(token) if token.is_valid_on(today) => Ok(token),
            Some(stale) => {
                debug!(issued = %stale.creation_day(), %today, "token expired");
                self.issue(today).await
            }
            None => {
                debug!("no token held");
                self.issue(today).await
            }
        }
    }

    /// A token valid for today, refreshing the held one if needed.
    pub async fn token(&self) -> Result<Token, CoreError> {
        match self.policy {
            RefreshPolicy::SingleFlight => {
                // Held across the refresh so concurrent callers queue on it.
                let mut current = self.current.lock().await;
                let token = self.ensure_valid(current.clone()).await?;
                *current = Some(token.clone());
                Ok(token)
            }
            RefreshPolicy::Independent => {
                let held = self.current.lock().await.clone();
                let token = self.ensure_valid(held).await?;
                *self.current.lock().await = Some(token.clone());
                Ok(token)
            }
        }
    }

    /// Make sure a token is held before the first device request.
    pub async fn prefetch(&self) -> Result<(), CoreError> {
        self.token().await.map(|_| ())
    }

    /// Drop the held token; the next request logs in again.
    pub async fn invalidate(&self) {
        *self.current.lock().await = None;
    }

    /// The token currently held, fresh or not.
    pub async fn current(&self) -> Option<Token> {
        self.current.lock().await.clone()
    }

    async fn issue(&self, today: chrono::NaiveDate) -> Result<Token, CoreError> {
        let value = self.api.issue_token().await?;
        info!(%today, "issued new session token");
        Ok(Token::new(value, today))
    }
}
