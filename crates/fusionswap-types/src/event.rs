//! Protocol events.
//!
//! Events are observational only: nothing in the protocol reads them back.
//! They are emitted after the transaction that produced them commits.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, AuctionId, EscrowId, FusionOrderId, OrderHash};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwapEvent {
    AuctionCreated {
        auction: AuctionId,
        order_hash: OrderHash,
        maker: Address,
    },
    AuctionFilled {
        auction: AuctionId,
        resolver: Address,
        segment: usize,
        amount: Amount,
        safety_deposit: Amount,
        completed: bool,
    },
    AuctionCancelled {
        auction: AuctionId,
    },
    OrderCreated {
        order: FusionOrderId,
        order_hash: OrderHash,
        maker: Address,
        amount: Amount,
    },
    OrderAccepted {
        order: FusionOrderId,
        resolver: Address,
        segment: usize,
        amount: Amount,
        safety_deposit: Amount,
        completed: bool,
    },
    OrderCancelled {
        order: FusionOrderId,
        cancelled_by: Address,
        refunded: Amount,
    },
    EscrowCreated {
        escrow: EscrowId,
        order_hash: OrderHash,
        taker: Address,
        amount: Amount,
        source_chain: bool,
    },
    EscrowWithdrawn {
        escrow: EscrowId,
        caller: Address,
        recipient: Address,
        amount: Amount,
    },
    EscrowRecovered {
        escrow: EscrowId,
        caller: Address,
        recipient: Address,
        amount: Amount,
    },
}

impl SwapEvent {
    /// Short machine-readable name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuctionCreated { .. } => "auction_created",
            Self::AuctionFilled { .. } => "auction_filled",
            Self::AuctionCancelled { .. } => "auction_cancelled",
            Self::OrderCreated { .. } => "order_created",
            Self::OrderAccepted { .. } => "order_accepted",
            Self::OrderCancelled { .. } => "order_cancelled",
            Self::EscrowCreated { .. } => "escrow_created",
            Self::EscrowWithdrawn { .. } => "escrow_withdrawn",
            Self::EscrowRecovered { .. } => "escrow_recovered",
        }
    }
}

impl fmt::Display for SwapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
