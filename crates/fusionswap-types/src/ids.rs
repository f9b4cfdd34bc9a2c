//! Identifiers used throughout FusionSwap.
//!
//! Entity handles (auctions, orders, escrows) use UUIDv7 so they sort by
//! creation time. Parties are addressed by a raw 32-byte account key.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seconds since the UNIX epoch, as read from the host clock.
pub type Timestamp = u64;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A party on the ledger (maker, resolver, or any public caller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Deterministic address derived from a human-readable label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"fusionswap:address:v1:");
        hasher.update(label.as_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    /// Random address for tests.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random::<[u8; 32]>())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// OrderHash
// ---------------------------------------------------------------------------

/// The off-chain order digest that links both legs of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderHash(pub [u8; 32]);

impl OrderHash {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Entity handles
// ---------------------------------------------------------------------------

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Handle of a live Dutch auction.
    AuctionId,
    "auction"
);
entity_id!(
    /// Handle of a live fusion order.
    FusionOrderId,
    "order"
);
entity_id!(
    /// Handle of a live escrow.
    EscrowId,
    "escrow"
);

// ---------------------------------------------------------------------------
// Holder
// ---------------------------------------------------------------------------

/// Anything that can hold custodied funds: a party's account, or one of the
/// entities that locks funds on a party's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Holder {
    Account(Address),
    Order(FusionOrderId),
    Escrow(EscrowId),
}

impl From<Address> for Holder {
    fn from(address: Address) -> Self {
        Self::Account(address)
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(address) => write!(f, "{address}"),
            Self::Order(id) => write!(f, "{id}"),
            Self::Escrow(id) => write!(f, "{id}"),
        }
    }
}
