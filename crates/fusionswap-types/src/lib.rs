//! # fusionswap-types
//!
//! Shared types, errors, configuration, and the pure swap primitives for
//! **FusionSwap**.
//!
//! This crate is the leaf dependency of the workspace. Nothing in it touches
//! balances or storage; every computation takes `now` explicitly. It defines:
//!
//! - **Identifiers**: [`Address`], [`OrderHash`], [`AuctionId`], [`FusionOrderId`], [`EscrowId`], [`Holder`]
//! - **HashLock**: [`HashLock`], [`hash_secret`]
//! - **Timelock**: [`Timelock`], [`TimelockPhase`], [`PhaseDurations`]
//! - **Segment ledger**: [`SegmentSet`], [`FillState`], [`FillQuote`], [`SegmentRequest`]
//! - **Auction curve**: [`AuctionCurve`]
//! - **Whitelist**: [`Whitelist`]
//! - **Events**: [`SwapEvent`]
//! - **Configuration**: [`ProtocolConfig`]
//! - **Errors**: [`SwapError`] with `FS_ERR_` prefix codes
//! - **Constants**: protocol-wide limits and defaults

pub mod auction_curve;
pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod hashlock;
pub mod ids;
pub mod segment;
pub mod timelock;
pub mod whitelist;

// Re-export all primary types at crate root for ergonomic imports:
//   use fusionswap_types::{HashLock, Timelock, SegmentSet, ...};

pub use auction_curve::*;
pub use balance::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use hashlock::*;
pub use ids::*;
pub use segment::*;
pub use timelock::*;
pub use whitelist::*;

// Constants are accessed via `fusionswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
