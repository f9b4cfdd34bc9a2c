//! Fusion order for the source leg.
//!
//! The maker locks the full amount plus the safety deposit when the order is
//! opened. Whitelisted resolvers claim it segment by segment (or all at
//! once); each claim moves exactly the claimed share out of the order's
//! custody. Whatever is left returns to the maker on cancellation.

use fusionswap_custody::{CustodyStore, Funds};
use fusionswap_types::{
    Address, Amount, AssetKind, FillQuote, FillState, FusionOrderId, HashLock, Holder, OrderHash,
    PhaseDurations, Result, SegmentRequest, SegmentSet, SwapError, Timestamp, Whitelist,
};
use serde::{Deserialize, Serialize};

use crate::capability::FillCapability;

/// Maker-supplied parameters for a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionOrderParams {
    pub order_hash: OrderHash,
    pub asset_kind: AssetKind,
    pub amount: Amount,
    pub safety_deposit: Amount,
    pub whitelist: Whitelist,
    pub segment_hashes: Vec<[u8; 32]>,
    /// Escrow schedule for claims; `None` uses the protocol default.
    pub durations: Option<PhaseDurations>,
    /// After this time whitelisted resolvers may cancel the order and keep
    /// the remaining safety deposit.
    pub auto_cancel_after: Option<Timestamp>,
}

/// A live fusion order.
#[derive(Debug, Clone, Serialize)]
pub struct FusionOrder {
    id: FusionOrderId,
    order_hash: OrderHash,
    maker: Address,
    asset_kind: AssetKind,
    deposit_kind: AssetKind,
    amount: Amount,
    safety_deposit_total: Amount,
    whitelist: Whitelist,
    segments: SegmentSet,
    fill_state: FillState,
    durations: PhaseDurations,
    auto_cancel_after: Option<Timestamp>,
    created_at: Timestamp,
}

/// Funds released to a resolver by one claim.
#[derive(Debug)]
pub struct OrderClaim {
    pub quote: FillQuote,
    pub hashlock: HashLock,
    pub asset: Funds,
    pub safety_deposit: Funds,
}

/// Where the unfilled remainder went on cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancellation {
    pub order: FusionOrderId,
    /// Unfilled amount returned to the maker.
    pub refunded: Amount,
    /// Unfilled safety deposit paid out.
    pub safety_deposit: Amount,
    /// The maker, or the resolver who cancelled after the deadline.
    pub deposit_recipient: Address,
}

impl FusionOrder {
    /// Validate the parameters and lock `amount + safety_deposit` from the
    /// maker into the order's custody.
    ///
    /// # Errors
    /// Validation errors for bad parameters, `InsufficientBalance` if the
    /// maker cannot fund the order.
    pub fn open<S: CustodyStore>(
        id: FusionOrderId,
        maker: Address,
        params: FusionOrderParams,
        deposit_kind: AssetKind,
        default_durations: PhaseDurations,
        custody: &mut S,
        now: Timestamp,
    ) -> Result<Self> {
        if params.amount == 0 {
            return Err(SwapError::ZeroAmount { field: "amount" });
        }
        if params.safety_deposit == 0 {
            return Err(SwapError::ZeroAmount {
                field: "safety_deposit",
            });
        }
        let segments = SegmentSet::from_commitments(&params.segment_hashes)?;
        params.whitelist.validate()?;
        segments.check_divisible("amount", params.amount)?;
        segments.check_divisible("safety_deposit", params.safety_deposit)?;
        let durations = params.durations.unwrap_or(default_durations);
        durations.validate()?;
        if let Some(deadline) = params.auto_cancel_after {
            if deadline <= now {
                return Err(SwapError::InvalidDeadline { deadline, now });
            }
        }

        let (asset, safety_deposit) = custody.withdraw_pair(
            Holder::Account(maker),
            (params.asset_kind.as_str(), params.amount),
            (deposit_kind.as_str(), params.safety_deposit),
        )?;
        custody.deposit(Holder::Order(id), asset);
        custody.deposit(Holder::Order(id), safety_deposit);

        tracing::info!(
            order = %id,
            maker = %maker,
            order_hash = %params.order_hash,
            amount = params.amount,
            segments = segments.len(),
            "Fusion order opened"
        );

        Ok(Self {
            id,
            order_hash: params.order_hash,
            maker,
            asset_kind: params.asset_kind,
            deposit_kind,
            amount: params.amount,
            safety_deposit_total: params.safety_deposit,
            whitelist: params.whitelist,
            segments,
            fill_state: FillState::new(),
            durations,
            auto_cancel_after: params.auto_cancel_after,
            created_at: now,
        })
    }

    #[must_use]
    pub fn id(&self) -> FusionOrderId {
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
    pub fn amount(&self) -> Amount {
        self.amount
    }

    #[must_use]
    pub fn safety_deposit_total(&self) -> Amount {
        self.safety_deposit_total
    }

    #[must_use]
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    #[must_use]
    pub fn segments(&self) -> &SegmentSet {
        &self.segments
    }

    #[must_use]
    pub fn last_filled(&self) -> Option<usize> {
        self.fill_state.last_filled()
    }

    #[must_use]
    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    #[must_use]
    pub fn auto_cancel_after(&self) -> Option<Timestamp> {
        self.auto_cancel_after
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Amount still held for future claims.
    #[must_use]
    pub fn remaining_amount(&self) -> Amount {
        self.fill_state.remaining_amount(&self.segments, self.amount)
    }

    /// Safety deposit still held for future claims.
    #[must_use]
    pub fn remaining_safety_deposit(&self) -> Amount {
        self.fill_state
            .remaining_amount(&self.segments, self.safety_deposit_total)
    }

    fn ensure_whitelisted(&self, caller: Address) -> Result<()> {
        if !self.whitelist.is_whitelisted(&caller) {
            tracing::warn!(order = %self.id, caller = %caller, "Non-whitelisted resolver rejected");
            return Err(SwapError::NotWhitelisted { caller });
        }
        Ok(())
    }

    /// What a claim would release, without taking it.
    ///
    /// # Errors
    /// `NotWhitelisted`, or any segment ledger error.
    pub fn quote_accept(&self, caller: Address, request: SegmentRequest) -> Result<FillQuote> {
        self.ensure_whitelisted(caller)?;
        self.fill_state.quote(
            &self.segments,
            self.amount,
            self.safety_deposit_total,
            request,
        )
    }

    /// Release the claimed share of the order to the caller.
    ///
    /// The caller must delete the order when `quote.completes` is set.
    ///
    /// # Errors
    /// Anything from [`quote_accept`](Self::quote_accept).
    pub fn resolver_accept<S: CustodyStore>(
        &mut self,
        _capability: &FillCapability,
        custody: &mut S,
        caller: Address,
        request: SegmentRequest,
    ) -> Result<OrderClaim> {
        let quote = self.quote_accept(caller, request)?;
        let hashlock = self
            .segments
            .hashlock(quote.target_index)
            .ok_or_else(|| SwapError::Internal(format!("no hashlock for segment {}", quote.target_index)))?;

        let (asset, safety_deposit) = custody.withdraw_pair(
            Holder::Order(self.id),
            (self.asset_kind.as_str(), quote.amount),
            (self.deposit_kind.as_str(), quote.safety_deposit),
        )?;
        self.fill_state.record(&quote)?;

        tracing::debug!(
            order = %self.id,
            resolver = %caller,
            segment = quote.target_index,
            covered = quote.segments_covered,
            amount = quote.amount,
            remaining = self.remaining_amount(),
            "Fusion order claimed"
        );

        Ok(OrderClaim {
            quote,
            hashlock,
            asset,
            safety_deposit,
        })
    }

    /// Return the unfilled remainder. The maker may cancel at any time; a
    /// whitelisted resolver only once `auto_cancel_after` has passed, and
    /// then collects the remaining safety deposit itself.
    ///
    /// The caller must delete the order afterwards.
    ///
    /// # Errors
    /// `NotWhitelisted` or `AutoCancelNotReached` for unauthorized callers.
    pub fn cancel<S: CustodyStore>(
        &self,
        custody: &mut S,
        caller: Address,
        now: Timestamp,
    ) -> Result<OrderCancellation> {
        let deposit_recipient = if caller == self.maker {
            self.maker
        } else {
            self.ensure_whitelisted(caller)?;
            match self.auto_cancel_after {
                Some(deadline) if now >= deadline => caller,
                deadline => {
                    tracing::warn!(
                        order = %self.id,
                        caller = %caller,
                        deadline = ?deadline,
                        now,
                        "Resolver cancel before auto-cancel deadline"
                    );
                    return Err(SwapError::AutoCancelNotReached { deadline, now });
                }
            }
        };

        let refunded = self.remaining_amount();
        let safety_deposit = self.remaining_safety_deposit();
        let (asset, deposit) = custody.withdraw_pair(
            Holder::Order(self.id),
            (self.asset_kind.as_str(), refunded),
            (self.deposit_kind.as_str(), safety_deposit),
        )?;
        custody.deposit(Holder::Account(self.maker), asset);
        custody.deposit(Holder::Account(deposit_recipient), deposit);

        tracing::info!(
            order = %self.id,
            cancelled_by = %caller,
            refunded,
            safety_deposit,
            "Fusion order cancelled"
        );

        Ok(OrderCancellation {
            order: self.id,
            refunded,
            safety_deposit,
            deposit_recipient,
        })
    }
}
