//! # fusionswap-custody
//!
//! **Host collaborators** the protocol core is written against: asset
//! custody, the entity arena, the clock, and the event sink. Each is a trait
//! or a small generic container with an in-process implementation, so the
//! protocol can run standalone or on top of a real ledger.
//!
//! ## Components
//!
//! 1. **BalanceManager**: per-(holder, asset) balances behind [`CustodyStore`]
//! 2. **EntityStore**: live auctions, orders, and escrows keyed by handle
//! 3. **Clock**: [`SystemClock`] for production, [`ManualClock`] for tests
//! 4. **EventSink**: [`TracingEventSink`] and [`MemoryEventSink`]
//!
//! ## Custody Flow
//!
//! ```text
//! mint → Account ─withdraw→ Funds ─deposit→ Order / Escrow ─withdraw→ Funds ─deposit→ Account → burn
//! ```

pub mod balance_manager;
pub mod clock;
pub mod entity_store;
pub mod event_sink;

pub use balance_manager::{BalanceManager, CustodyStore, Funds};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entity_store::{EntityKey, EntityStore};
pub use event_sink::{EventSink, MemoryEventSink, TracingEventSink};
