//! Server configuration
//!
//! Configuration is loaded from environment variables. Unset or unparsable
//! values fall back to the defaults.

use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::server::DEFAULT_RATING_RANGE;
use crate::session::ReviewerPolicy;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,

    /// Catalog configuration
    pub catalog: CatalogConfig,

    /// Review configuration
    pub review: ReviewConfig,

    /// How long a login token stays valid
    pub session_ttl: Duration,
}

/// Catalog-related configuration
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// JSON file replacing the built-in seed books
    pub seed_path: Option<PathBuf>,
}

/// Review-related configuration
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub reviewer_policy: ReviewerPolicy,
    pub min_rating: u8,
    pub max_rating: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            catalog: CatalogConfig::default(),
            review: ReviewConfig::default(),
            session_ttl: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            reviewer_policy: ReviewerPolicy::default(),
            min_rating: *DEFAULT_RATING_RANGE.start(),
            max_rating: *DEFAULT_RATING_RANGE.end(),
        }
    }
}

impl ReviewConfig {
    pub fn rating_range(&self) -> RangeInclusive<u8> {
        self.min_rating..=self.max_rating
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Server config
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }

        // Session config
        if let Some(val) = lookup("SESSION_TTL_HOURS")
            && let Ok(hours) = val.parse::<u64>()
        {
            config.session_ttl = Duration::from_secs(hours * 60 * 60);
        }

        // Catalog config
        if let Some(path) = lookup("CATALOG_SEED_PATH")
            && !path.is_empty()
        {
            config.catalog.seed_path = Some(PathBuf::from(path));
        }

        // Review config
        if let Some(val) = lookup("REVIEWER_POLICY")
            && let Some(policy) = ReviewerPolicy::parse(&val)
        {
            config.review.reviewer_policy = policy;
        }
        if let Some(val) = lookup("REVIEW_MIN_RATING")
            && let Ok(v) = val.parse()
        {
            config.review.min_rating = v;
        }
        if let Some(val) = lookup("REVIEW_MAX_RATING")
            && let Ok(v) = val.parse()
        {
            config.review.max_rating = v;
        }
        if config.review.min_rating > config.review.max_rating {
            config.review.min_rating = *DEFAULT_RATING_RANGE.start();
            config.review.max_rating = *DEFAULT_RATING_RANGE.end();
        }

        config
    }
}
