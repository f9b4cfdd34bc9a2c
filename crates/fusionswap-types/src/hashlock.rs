//! Hashlock: a SHA-256 commitment unlocked by its preimage.
//!
//! The commitment is the plain `sha256(secret)` with no domain prefix, so the
//! same secret unlocks the matching escrow on the other chain.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Result, SwapError};

/// Hash a secret the way every hashlock expects it.
#[must_use]
pub fn hash_secret(secret: &[u8]) -> [u8; 32] {
    Sha256::digest(secret).into()
}

/// An immutable 32-byte commitment to a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 32]", into = "[u8; 32]")]
pub struct HashLock {
    commitment: [u8; 32],
}

impl HashLock {
    /// Wrap an existing commitment.
    ///
    /// # Errors
    /// `InvalidHashLock` if the commitment is all zeroes.
    pub fn new(commitment: [u8; 32]) -> Result<Self> {
        if commitment == [0u8; 32] {
            return Err(SwapError::InvalidHashLock {
                reason: "commitment is all zeroes".into(),
            });
        }
        Ok(Self { commitment })
    }

    /// Wrap a commitment received as raw bytes.
    ///
    /// # Errors
    /// `InvalidHashLock` if the slice is empty, not 32 bytes, or all zeroes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(SwapError::InvalidHashLock {
                reason: "commitment is empty".into(),
            });
        }
        let commitment: [u8; 32] =
            bytes
                .try_into()
                .map_err(|_| SwapError::InvalidHashLock {
                    reason: format!("commitment is {} bytes, expected 32", bytes.len()),
                })?;
        Self::new(commitment)
    }

    /// Build the hashlock that `secret` unlocks.
    #[must_use]
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            commitment: hash_secret(secret),
        }
    }

    /// `true` iff `sha256(secret)` equals the commitment. Never fails.
    #[must_use]
    pub fn verify(&self, secret: &[u8]) -> bool {
        hash_secret(secret) == self.commitment
    }

    #[must_use]
    pub fn commitment(&self) -> &[u8; 32] {
        &self.commitment
    }
}

impl TryFrom<[u8; 32]> for HashLock {
    type Error = SwapError;

    fn try_from(commitment: [u8; 32]) -> Result<Self> {
        Self::new(commitment)
    }
}

impl From<HashLock> for [u8; 32] {
    fn from(lock: HashLock) -> Self {
        lock.commitment
    }
}

/// Random 32-byte secret for tests.
#[cfg(any(test, feature = "test-helpers"))]
#[must_use]
pub fn random_secret() -> [u8; 32] {
    rand::random::<[u8; 32]>()
}
