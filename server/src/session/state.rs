use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Opaque bearer token handed out by a successful login
pub type SessionToken = String;

/// Session tokens carry 256 bits of entropy
const SESSION_TOKEN_BITS: usize = 256;
const SALT_BITS: usize = 128;

/// Generate a high-entropy hex secret (session tokens and password salts)
pub fn generate_secret(bits: usize) -> String {
    let bytes_needed = bits.div_ceil(8);
    let mut secret = String::with_capacity(bytes_needed * 2);

    while secret.len() < bytes_needed * 2 {
        for byte in Uuid::new_v4().as_bytes() {
            if secret.len() == bytes_needed * 2 {
                break;
            }
            secret.push_str(&format!("{:02x}", byte));
        }
    }

    secret
}

pub fn generate_session_token() -> SessionToken {
    generate_secret(SESSION_TOKEN_BITS)
}

/// Password material as stored on an account
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub salt: String,
    pub hash: String,
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("salt", &self.salt)
            .field("hash", &"<redacted>")
            .finish()
    }
}

/// Turns passwords into stored credentials and checks them later
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> StoredCredential;

    fn verify(&self, password: &str, stored: &StoredCredential) -> bool;
}

/// Salted SHA-256 credential hashing
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    fn digest(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(b":");
        hasher.update(password.as_bytes());
        let result = hasher.finalize();
        result.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl CredentialHasher for Sha256Hasher {
    fn hash(&self, password: &str) -> StoredCredential {
        let salt = generate_secret(SALT_BITS);
        let hash = Self::digest(&salt, password);
        StoredCredential { salt, hash }
    }

    fn verify(&self, password: &str, stored: &StoredCredential) -> bool {
        let candidate = Self::digest(&stored.salt, password);
        // Compare every byte so timing does not leak the mismatch position
        candidate.len() == stored.hash.len()
            && candidate
                .bytes()
                .zip(stored.hash.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

/// A registered user
#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    pub credential: StoredCredential,
}

/// Which name a new review is attributed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewerPolicy {
    /// Use the reviewer named in the request, whoever is logged in
    #[default]
    AsSubmitted,
    /// Always attribute the review to the acting account
    ActingAccount,
}

impl ReviewerPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "as_submitted" => Some(Self::AsSubmitted),
            "acting_account" => Some(Self::ActingAccount),
            _ => None,
        }
    }
}

/// Session manager configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub reviewer_policy: ReviewerPolicy,
    /// How long a login token stays valid
    pub session_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reviewer_policy: ReviewerPolicy::default(),
            session_ttl: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }
}
