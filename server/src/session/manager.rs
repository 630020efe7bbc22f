use crate::catalog::{BookCatalog, CatalogError, Review};
use crate::session::state::{
    Account, CredentialHasher, ReviewerPolicy, SessionConfig, SessionToken, Sha256Hasher,
    generate_session_token,
};
use dashmap::DashMap;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Session manager errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("User already exists: {0}")]
    UsernameTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A live login session
#[derive(Debug, Clone)]
struct SessionEntry {
    username: String,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Session manager: accounts, login sessions and authenticated review edits
pub struct SessionManager {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: DashMap<SessionToken, SessionEntry>,
    catalog: Arc<dyn BookCatalog>,
    hasher: Arc<dyn CredentialHasher>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(catalog: Arc<dyn BookCatalog>) -> Self {
        Self::with_config(catalog, SessionConfig::default())
    }

    pub fn with_config(catalog: Arc<dyn BookCatalog>, config: SessionConfig) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: DashMap::new(),
            catalog,
            hasher: Arc::new(Sha256Hasher),
            config,
        }
    }

    /// Replace the credential hasher
    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn catalog(&self) -> &Arc<dyn BookCatalog> {
        &self.catalog
    }

    /// Register a new account. The account is not logged in.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(username) {
            warn!("Registration rejected, username taken: {}", username);
            return Err(SessionError::UsernameTaken(username.to_string()));
        }

        let account = Account {
            username: username.to_string(),
            credential: self.hasher.hash(password),
        };
        accounts.insert(username.to_string(), account);
        counter!("bookstore_registrations_total").increment(1);

        info!("Registered user {}", username);
        Ok(())
    }

    /// Log in and open a new session.
    ///
    /// Returns the session token the caller presents on later requests.
    /// A failed attempt leaves every existing session untouched.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionToken, SessionError> {
        let verified = {
            let accounts = self.accounts.read().await;
            accounts
                .get(username)
                .is_some_and(|account| self.hasher.verify(password, &account.credential))
        };

        if !verified {
            counter!("bookstore_logins_total", "outcome" => "rejected").increment(1);
            warn!("Login rejected for {}", username);
            return Err(SessionError::InvalidCredentials);
        }

        let token = generate_session_token();
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                username: username.to_string(),
                expires_at: Instant::now() + self.config.session_ttl,
            },
        );
        counter!("bookstore_logins_total", "outcome" => "accepted").increment(1);

        info!("User {} logged in", username);
        Ok(token)
    }

    /// Resolve a session token to its account. Expired tokens are dropped.
    pub async fn resolve(&self, token: &str) -> Option<Account> {
        let now = Instant::now();
        self.sessions
            .remove_if(token, |_, session| session.is_expired(now));
        let username = self.sessions.get(token)?.username.clone();
        self.accounts.read().await.get(&username).cloned()
    }

    /// Drop every expired session, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        let removed = before.saturating_sub(self.sessions.len());

        if removed > 0 {
            info!("Cleaned up {} expired sessions", removed);
        }
        removed
    }

    /// Append a review to a book on behalf of `acting`
    pub async fn add_review(
        &self,
        acting: Option<&Account>,
        isbn: &str,
        reviewer: &str,
        text: &str,
        rating: u8,
    ) -> Result<Vec<Review>, SessionError> {
        let acting = acting.ok_or(SessionError::Unauthorized)?;

        let reviewer = match self.config.reviewer_policy {
            ReviewerPolicy::AsSubmitted => reviewer,
            ReviewerPolicy::ActingAccount => acting.username.as_str(),
        };

        let reviews = self
            .catalog
            .append_review(isbn, Review::new(reviewer, text, rating))
            .await?;
        counter!("bookstore_reviews_added_total").increment(1);

        info!(
            "User {} added review on {} as {}",
            acting.username, isbn, reviewer
        );
        Ok(reviews)
    }

    /// Remove every review on a book written under the acting username
    pub async fn remove_reviews_by_current_user(
        &self,
        acting: Option<&Account>,
        isbn: &str,
    ) -> Result<Vec<Review>, SessionError> {
        let acting = acting.ok_or(SessionError::Unauthorized)?;

        let removal = self
            .catalog
            .remove_reviews_by(isbn, &acting.username)
            .await?;
        counter!("bookstore_reviews_removed_total").increment(removal.removed as u64);

        info!(
            "User {} removed {} own reviews on {}",
            acting.username, removal.removed, isbn
        );
        Ok(removal.reviews)
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
