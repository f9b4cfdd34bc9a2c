//! Capability required to fill auctions and claim orders.
//!
//! [`DutchAuction::fill`](crate::DutchAuction::fill) and
//! [`FusionOrder::resolver_accept`](crate::FusionOrder::resolver_accept)
//! mutate an entity and move custody on a resolver's behalf. Only code in
//! this crate can mint the token, so outside callers must go through
//! [`SwapProtocol`](crate::SwapProtocol), which runs them inside a
//! transaction.

/// Unforgeable proof that the holder is the protocol's escrow factory.
#[derive(Debug)]
pub struct FillCapability {
    _sealed: (),
}

impl FillCapability {
    pub(crate) fn issue() -> Self {
        Self { _sealed: () }
    }
}
