//! Dutch auction for the destination leg.
//!
//! The maker posts a decaying price and a set of segment hashes but locks
//! nothing. A resolver filling the auction pays the live price out of its
//! own balance at fill time, so the maker carries no price risk and the
//! resolver cannot lock in a stale price.

use fusionswap_custody::{CustodyStore, Funds};
use fusionswap_types::{
    Address, Amount, AssetKind, AuctionCurve, AuctionId, FillQuote, FillState, HashLock, Holder,
    OrderHash, Result, SegmentRequest, SegmentSet, SwapError, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::capability::FillCapability;

/// Maker-supplied parameters for a new auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionParams {
    pub order_hash: OrderHash,
    pub asset_kind: AssetKind,
    pub starting_amount: Amount,
    pub ending_amount: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub decay_duration: u64,
    /// Total safety deposit a resolver posts across all fills.
    pub safety_deposit: Amount,
    pub segment_hashes: Vec<[u8; 32]>,
}

/// A live Dutch auction.
#[derive(Debug, Clone, Serialize)]
pub struct DutchAuction {
    id: AuctionId,
    order_hash: OrderHash,
    maker: Address,
    asset_kind: AssetKind,
    deposit_kind: AssetKind,
    curve: AuctionCurve,
    safety_deposit_total: Amount,
    segments: SegmentSet,
    fill_state: FillState,
}

/// What a resolver paid for one fill, and the hashlock its escrow must use.
#[derive(Debug)]
pub struct AuctionFill {
    pub quote: FillQuote,
    pub hashlock: HashLock,
    pub asset: Funds,
    pub safety_deposit: Funds,
}

impl DutchAuction {
    /// Validate the parameters and build the auction. Nothing is locked.
    ///
    /// # Errors
    /// `InvalidAuctionCurve`, `ZeroAmount`, `EmptySegmentSet`,
    /// `InvalidHashLock`, or `TooManySegments`.
    pub fn new(
        id: AuctionId,
        maker: Address,
        params: AuctionParams,
        deposit_kind: AssetKind,
    ) -> Result<Self> {
        let curve = AuctionCurve::new(
            params.starting_amount,
            params.ending_amount,
            params.start_time,
            params.end_time,
            params.decay_duration,
        )?;
        if params.safety_deposit == 0 {
            return Err(SwapError::ZeroAmount {
                field: "safety_deposit",
            });
        }
        let segments = SegmentSet::from_commitments(&params.segment_hashes)?;

        Ok(Self {
            id,
            order_hash: params.order_hash,
            maker,
            asset_kind: params.asset_kind,
            deposit_kind,
            curve,
            safety_deposit_total: params.safety_deposit,
            segments,
            fill_state: FillState::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> AuctionId {
        self.id
    }

    #[must_use]
    pub fn order_hash(&self) -> OrderHash {
        self.order_hash
    }

    #[must_use]
    pub fn maker(&self) -> Address {
        self.maker
    }

    #[must_use]
    pub fn asset_kind(&self) -> &str {
        &self.asset_kind
    }

    #[must_use]
    pub fn curve(&self) -> &AuctionCurve {
        &self.curve
    }

    #[must_use]
    pub fn safety_deposit_total(&self) -> Amount {
        self.safety_deposit_total
    }

    #[must_use]
    pub fn segments(&self) -> &SegmentSet {
        &self.segments
    }

    #[must_use]
    pub fn last_filled(&self) -> Option<usize> {
        self.fill_state.last_filled()
    }

    /// Price of a 100% fill at `now`.
    #[must_use]
    pub fn current_price(&self, now: Timestamp) -> Amount {
        self.curve.price_at(now)
    }

    /// # Errors
    /// `NotMaker` unless `caller` created the auction.
    pub fn ensure_maker(&self, caller: Address) -> Result<()> {
        if caller != self.maker {
            tracing::warn!(auction = %self.id, caller = %caller, "Non-maker attempted auction cancel");
            return Err(SwapError::NotMaker { caller });
        }
        Ok(())
    }

    /// What a fill would cost at `now`, without taking it.
    ///
    /// # Errors
    /// `AuctionNotStarted` before `start_time`, `ZeroAmount` if the covered
    /// share of the live price truncates to nothing, or any segment ledger
    /// error.
    pub fn quote_fill(&self, request: SegmentRequest, now: Timestamp) -> Result<FillQuote> {
        if now < self.curve.start_time() {
            return Err(SwapError::AuctionNotStarted {
                start_time: self.curve.start_time(),
                now,
            });
        }
        let price = self.current_price(now);
        let quote = self
            .fill_state
            .quote(&self.segments, price, self.safety_deposit_total, request)?;
        // A live price below the part count leaves nothing in a single part.
        if quote.amount == 0 {
            return Err(SwapError::ZeroAmount {
                field: "fill_amount",
            });
        }
        Ok(quote)
    }

    /// Fill at the live price, paid from `resolver`'s balance.
    ///
    /// The caller must delete the auction when `quote.completes` is set.
    ///
    /// # Errors
    /// Anything from [`quote_fill`](Self::quote_fill), or
    /// `InsufficientBalance` if the resolver cannot pay.
    pub fn fill<S: CustodyStore>(
        &mut self,
        _capability: &FillCapability,
        custody: &mut S,
        resolver: Address,
        request: SegmentRequest,
        now: Timestamp,
    ) -> Result<AuctionFill> {
        let quote = self.quote_fill(request, now)?;
        let hashlock = self
            .segments
            .hashlock(quote.target_index)
            .ok_or_else(|| SwapError::Internal(format!("no hashlock for segment {}", quote.target_index)))?;

        let (asset, safety_deposit) = custody.withdraw_pair(
            Holder::Account(resolver),
            (self.asset_kind.as_str(), quote.amount),
            (self.deposit_kind.as_str(), quote.safety_deposit),
        )?;
        self.fill_state.record(&quote)?;

        tracing::debug!(
            auction = %self.id,
            resolver = %resolver,
            segment = quote.target_index,
            covered = quote.segments_covered,
            amount = quote.amount,
            price = self.current_price(now),
            completes = quote.completes,
            "Auction filled"
        );

        Ok(AuctionFill {
            quote,
            hashlock,
            asset,
            safety_deposit,
        })
    }
}
