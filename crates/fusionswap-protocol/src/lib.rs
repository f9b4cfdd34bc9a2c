//! # fusionswap-protocol
//!
//! **Swap core**: Dutch auctions, fusion orders, escrows, and the
//! transactional protocol surface that ties them to custody.
//!
//! ## Architecture
//!
//! A swap has two legs:
//! 1. **Source leg**: the maker opens a [`FusionOrder`], locking the amount
//!    and a safety deposit. A whitelisted resolver claims it (whole or by
//!    segment) into a source-chain [`Escrow`].
//! 2. **Destination leg**: the maker posts a [`DutchAuction`]. A resolver
//!    fills it at the live price from its own balance into a
//!    destination-chain [`Escrow`].
//!
//! Each escrow releases once: `withdraw` with the segment secret during the
//! withdrawal phases, or `recovery` during the cancellation phases.
//!
//! ## Atomicity
//!
//! [`SwapProtocol`] runs every mutating call as a clone-and-commit
//! transaction and emits events only after commit. Filling and claiming
//! require a [`FillCapability`], which only this crate can create.

pub mod auction;
pub mod capability;
pub mod escrow;
pub mod fusion_order;
pub mod protocol;
pub mod shared;
pub mod supply_conservation;

pub use auction::{AuctionFill, AuctionParams, DutchAuction};
pub use capability::FillCapability;
pub use escrow::{Escrow, EscrowPayout};
pub use fusion_order::{FusionOrder, FusionOrderParams, OrderCancellation, OrderClaim};
pub use protocol::SwapProtocol;
pub use shared::SharedSwapProtocol;
pub use supply_conservation::SupplyConservation;
