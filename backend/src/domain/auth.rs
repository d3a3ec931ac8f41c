//! Authentication primitives: login credentials and salted password digests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a controller talks to a repository.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::{Role, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `name` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backoffice::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "secret").unwrap();
/// assert_eq!(creds.name(), "ada");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    name: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw name/password inputs.
    pub fn try_from_parts(name: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = name.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyName);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            name: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Name suitable for user lookups.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Digest iterations applied to newly derived hashes.
pub const HASH_ROUNDS: u32 = 10_000;

/// Raised when a stored password hash cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed password hash")]
pub struct MalformedPasswordHash;

/// Salted, iterated SHA-256 password digest.
///
/// Stored as `sha256$<rounds>$<salt-hex>$<digest-hex>`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    rounds: u32,
    salt: Vec<u8>,
    digest: [u8; 32],
}

impl PasswordHash {
    /// Derive a hash for `password` under a fresh random salt.
    pub fn derive(password: &str) -> Self {
        let mut salt = vec![0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::derive_with(password, salt, HASH_ROUNDS)
    }

    fn derive_with(password: &str, salt: Vec<u8>, rounds: u32) -> Self {
        let digest = stretch(password.as_bytes(), &salt, rounds);
        Self {
            rounds,
            salt,
            digest,
        }
    }

    /// Parse the stored representation.
    pub fn parse(stored: &str) -> Result<Self, MalformedPasswordHash> {
        let mut parts = stored.split('$');
        let (Some(scheme), Some(rounds), Some(salt), Some(digest), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(MalformedPasswordHash);
        };
        if scheme != SCHEME {
            return Err(MalformedPasswordHash);
        }
        let rounds: u32 = rounds.parse().map_err(|_| MalformedPasswordHash)?;
        if rounds == 0 {
            return Err(MalformedPasswordHash);
        }
        let salt = hex::decode(salt).map_err(|_| MalformedPasswordHash)?;
        let digest: [u8; 32] = hex::decode(digest)
            .map_err(|_| MalformedPasswordHash)?
            .try_into()
            .map_err(|_| MalformedPasswordHash)?;
        Ok(Self {
            rounds,
            salt,
            digest,
        })
    }

    /// Compare `password` against this hash in constant time.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = stretch(password.as_bytes(), &self.salt, self.rounds);
        bool::from(candidate.as_slice().ct_eq(self.digest.as_slice()))
    }

    /// Render the stored representation.
    pub fn encode(&self) -> String {
        format!(
            "{SCHEME}${}${}${}",
            self.rounds,
            hex::encode(&self.salt),
            hex::encode(self.digest)
        )
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}

fn stretch(password: &[u8], salt: &[u8], rounds: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password);
    let mut digest: [u8; 32] = hasher.finalize().into();
    for _ in 1..rounds {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(salt);
        digest = hasher.finalize().into();
    }
    digest
}
