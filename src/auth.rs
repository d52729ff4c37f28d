//! Toy user registry.
//!
//! Passwords are stored as an unsalted fast digest. That is fine for a demo and
//! wrong for anything real: swap in a slow, salted [`PasswordHasher`] before
//! storing actual credentials.

use std::fmt;

use indexmap::IndexMap;
use md5::Md5;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::TrackerError;
use crate::types::{EntityKind, HashAlgorithm};

/// Turns a password into the string stored for it.
///
/// Must be deterministic: verification recomputes the digest and compares.
pub trait PasswordHasher: Send + Sync {
    fn digest(&self, password: &str) -> String;
}

/// Hex MD5 of the UTF-8 password. Matches digests produced by older tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

impl PasswordHasher for Md5Hasher {
    fn digest(&self, password: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Hex SHA-256 of the UTF-8 password. Still unsalted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn digest(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Get the hasher for an algorithm name.
pub fn hasher_for(algorithm: HashAlgorithm) -> Box<dyn PasswordHasher> {
    match algorithm {
        HashAlgorithm::Md5 => Box::new(Md5Hasher),
        HashAlgorithm::Sha256 => Box::new(Sha256Hasher),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub password_hash: String,
    pub full_name: String,
}

/// Login → user record, with the digest used to check passwords.
pub struct Authenticator {
    users: IndexMap<String, UserRecord>,
    hasher: Box<dyn PasswordHasher>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("users", &self.users.len())
            .finish_non_exhaustive()
    }
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new(Box::new(Md5Hasher))
    }
}

impl Authenticator {
    pub fn new(hasher: Box<dyn PasswordHasher>) -> Self {
        Self {
            users: IndexMap::new(),
            hasher,
        }
    }

    /// Build an authenticator that owns a copy of `snapshot`.
    ///
    /// Stored hashes must come from the same `hasher`, or nobody will verify.
    pub fn from_snapshot<I, K>(hasher: Box<dyn PasswordHasher>, snapshot: I) -> Self
    where
        I: IntoIterator<Item = (K, UserRecord)>,
        K: Into<String>,
    {
        Self {
            users: snapshot
                .into_iter()
                .map(|(login, record)| (login.into(), record))
                .collect(),
            hasher,
        }
    }

    pub fn register(
        &mut self,
        login: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), TrackerError> {
        if self.users.contains_key(login) {
            debug!(login, "rejected duplicate login");
            return Err(TrackerError::already_exists(EntityKind::User, login));
        }
        let record = UserRecord {
            password_hash: self.hasher.digest(password),
            full_name: full_name.to_string(),
        };
        self.users.insert(login.to_string(), record);
        debug!(login, "user registered");
        Ok(())
    }

    /// Check `password` for `login` and return the stored record on success.
    pub fn authenticate(&self, login: &str, password: &str) -> Result<&UserRecord, TrackerError> {
        let record = self
            .users
            .get(login)
            .ok_or_else(|| TrackerError::not_found(EntityKind::User, login))?;
        if self.hasher.digest(password) != record.password_hash {
            debug!(login, "password mismatch");
            return Err(TrackerError::InvalidCredentials);
        }
        Ok(record)
    }

    /// `true` only when `login` exists and `password` matches.
    pub fn verify(&self, login: &str, password: &str) -> bool {
        self.authenticate(login, password).is_ok()
    }

    pub fn user(&self, login: &str) -> Option<&UserRecord> {
        self.users.get(login)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
