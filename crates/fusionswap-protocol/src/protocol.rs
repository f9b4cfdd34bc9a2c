//! The protocol surface.
//!
//! [`SwapProtocol`] owns custody, the entity arenas, and the supply ledger.
//! Every mutating call:
//! 1. Reads the clock once and rejects a rewind
//! 2. Clones the state and runs the operation against the clone
//! 3. Commits the clone only if the operation succeeded
//! 4. Emits the buffered events after commit
//!
//! A failed call therefore leaves no trace: no balance moves, no entity is
//! created or deleted, and no event is emitted.

use fusionswap_custody::{
    BalanceManager, Clock, CustodyStore, EntityStore, EventSink, SystemClock, TracingEventSink,
};
use fusionswap_types::{
    Address, Amount, AuctionId, EscrowId, FillQuote, FusionOrderId, Holder, PhaseDurations,
    ProtocolConfig, Result, SegmentRequest, SwapError, SwapEvent, TimelockPhase, Timestamp,
    constants,
};

use crate::{
    AuctionFill, AuctionParams, DutchAuction, Escrow, EscrowPayout, FillCapability, FusionOrder,
    FusionOrderParams, OrderCancellation, OrderClaim, SupplyConservation,
};

/// Everything a transaction may change.
#[derive(Debug, Clone)]
struct ProtocolState {
    custody: BalanceManager,
    supply: SupplyConservation,
    auctions: EntityStore<AuctionId, DutchAuction>,
    orders: EntityStore<FusionOrderId, FusionOrder>,
    escrows: EntityStore<EscrowId, Escrow>,
}

impl ProtocolState {
    fn new() -> Self {
        Self {
            custody: BalanceManager::new(),
            supply: SupplyConservation::new(),
            auctions: EntityStore::new(),
            orders: EntityStore::new(),
            escrows: EntityStore::new(),
        }
    }
}

/// Working copy of the state for one operation.
struct Tx<'a> {
    state: ProtocolState,
    capability: &'a FillCapability,
    config: &'a ProtocolConfig,
    now: Timestamp,
    events: Vec<SwapEvent>,
}

impl Tx<'_> {
    fn check_segment_count(&self, count: usize) -> Result<()> {
        if count > self.config.max_segments {
            return Err(SwapError::TooManySegments {
                count,
                max: self.config.max_segments,
            });
        }
        Ok(())
    }

    fn fill_auction(
        &mut self,
        resolver: Address,
        id: AuctionId,
        request: SegmentRequest,
    ) -> Result<AuctionFill> {
        let state = &mut self.state;
        let auction = state
            .auctions
            .get_mut(&id)
            .ok_or(SwapError::AuctionNotFound(id))?;
        let fill = auction.fill(self.capability, &mut state.custody, resolver, request, self.now)?;
        self.events.push(SwapEvent::AuctionFilled {
            auction: id,
            resolver,
            segment: fill.quote.target_index,
            amount: fill.quote.amount,
            safety_deposit: fill.quote.safety_deposit,
            completed: fill.quote.completes,
        });
        Ok(fill)
    }

    fn retire_auction_if_complete(&mut self, id: AuctionId, completes: bool) {
        if completes && self.state.auctions.destroy(&id).is_some() {
            tracing::info!(auction = %id, "Auction fully filled");
        }
    }

    fn claim_order(
        &mut self,
        resolver: Address,
        id: FusionOrderId,
        request: SegmentRequest,
    ) -> Result<OrderClaim> {
        let state = &mut self.state;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or(SwapError::OrderNotFound(id))?;
        let claim = order.resolver_accept(self.capability, &mut state.custody, resolver, request)?;
        self.events.push(SwapEvent::OrderAccepted {
            order: id,
            resolver,
            segment: claim.quote.target_index,
            amount: claim.quote.amount,
            safety_deposit: claim.quote.safety_deposit,
            completed: claim.quote.completes,
        });
        Ok(claim)
    }

    fn retire_order_if_complete(&mut self, id: FusionOrderId, completes: bool) {
        if completes && self.state.orders.destroy(&id).is_some() {
            tracing::info!(order = %id, "Fusion order fully filled");
        }
    }

    fn escrow_created(&mut self, escrow: EscrowId) -> Result<()> {
        let escrow = self
            .state
            .escrows
            .get(&escrow)
            .ok_or(SwapError::EscrowNotFound(escrow))?;
        self.events.push(SwapEvent::EscrowCreated {
            escrow: escrow.id(),
            order_hash: escrow.order_hash(),
            taker: escrow.taker(),
            amount: escrow.amount(),
            source_chain: escrow.is_source_chain(),
        });
        Ok(())
    }
}

/// Cross-chain swap protocol instance.
pub struct SwapProtocol<C: Clock = SystemClock, E: EventSink = TracingEventSink> {
    config: ProtocolConfig,
    clock: C,
    sink: E,
    capability: FillCapability,
    last_now: Timestamp,
    state: ProtocolState,
}

impl SwapProtocol {
    /// Protocol on wall-clock time that logs events through `tracing`.
    ///
    /// # Errors
    /// `Configuration` if `config` is unusable.
    pub fn new(config: ProtocolConfig) -> Result<Self> {
        Self::with_clock_and_sink(config, SystemClock, TracingEventSink)
    }
}

impl<C: Clock, E: EventSink> SwapProtocol<C, E> {
    /// # Errors
    /// `Configuration` if `config` is unusable.
    pub fn with_clock_and_sink(config: ProtocolConfig, clock: C, sink: E) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            protocol = constants::PROTOCOL_NAME,
            version = constants::VERSION,
            safety_deposit_asset = %config.safety_deposit_asset,
            max_segments = config.max_segments,
            "Swap protocol initialized"
        );
        Ok(Self {
            config,
            clock,
            sink,
            capability: FillCapability::issue(),
            last_now: 0,
            state: ProtocolState::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn sink(&self) -> &E {
        &self.sink
    }

    /// Read the clock, rejecting a value earlier than any already used.
    fn observe(&self) -> Result<Timestamp> {
        let now = self.clock.now();
        if now < self.last_now {
            tracing::warn!(last = self.last_now, now, "Clock moved backwards");
            return Err(SwapError::ClockRewound {
                last: self.last_now,
                now,
            });
        }
        Ok(now)
    }

    fn transact<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Tx<'_>) -> Result<T>,
    ) -> Result<T> {
        let now = self.observe()?;
        let mut tx = Tx {
            state: self.state.clone(),
            capability: &self.capability,
            config: &self.config,
            now,
            events: Vec::new(),
        };
        match f(&mut tx) {
            Ok(value) => {
                let Tx { state, events, .. } = tx;
                self.state = state;
                self.last_now = now;
                for event in &events {
                    self.sink.emit(event);
                }
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(op, code = err.code(), error = %err, "Operation rolled back");
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Custody boundary
    // -----------------------------------------------------------------------

    /// Credit `account` with funds arriving from outside the protocol.
    ///
    /// # Errors
    /// `ZeroAmount`, or `ArithmeticOverflow`.
    pub fn fund(&mut self, account: Address, kind: &str, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(SwapError::ZeroAmount { field: "amount" });
        }
        self.transact("fund", |tx| {
            tx.state.custody.mint(Holder::Account(account), kind, amount)?;
            tx.state.supply.record_deposit(kind, amount)?;
            tracing::info!(account = %account, asset = kind, amount, "Account funded");
            Ok(())
        })
    }

    /// Pay funds out of `account` to outside the protocol.
    ///
    /// # Errors
    /// `ZeroAmount`, or `InsufficientBalance`.
    pub fn withdraw_external(&mut self, account: Address, kind: &str, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(SwapError::ZeroAmount { field: "amount" });
        }
        self.transact("withdraw_external", |tx| {
            tx.state.custody.burn(Holder::Account(account), kind, amount)?;
            tx.state.supply.record_withdrawal(kind, amount)?;
            tracing::info!(account = %account, asset = kind, amount, "External withdrawal");
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Dutch auctions
    // -----------------------------------------------------------------------

    /// # Errors
    /// Any validation error from [`DutchAuction::new`], or `TooManySegments`.
    pub fn create_auction(&mut self, maker: Address, params: AuctionParams) -> Result<AuctionId> {
        self.transact("create_auction", |tx| {
            tx.check_segment_count(params.segment_hashes.len())?;
            let order_hash = params.order_hash;
            let deposit_kind = tx.config.safety_deposit_asset.clone();
            let id = tx.state.auctions.create_with(maker, |id| {
                DutchAuction::new(id, maker, params, deposit_kind)
            })?;
            tracing::info!(auction = %id, maker = %maker, order_hash = %order_hash, "Auction created");
            tx.events.push(SwapEvent::AuctionCreated {
                auction: id,
                order_hash,
                maker,
            });
            Ok(id)
        })
    }

    /// # Errors
    /// `AuctionNotFound`, or `NotMaker`.
    pub fn cancel_auction(&mut self, caller: Address, id: AuctionId) -> Result<()> {
        self.transact("cancel_auction", |tx| {
            tx.state
                .auctions
                .get(&id)
                .ok_or(SwapError::AuctionNotFound(id))?
                .ensure_maker(caller)?;
            tx.state.auctions.destroy(&id);
            tracing::info!(auction = %id, "Auction cancelled");
            tx.events.push(SwapEvent::AuctionCancelled { auction: id });
            Ok(())
        })
    }

    /// Fill without deploying an escrow. The resolver pays the live price
    /// and the funds are credited straight back to its account.
    ///
    /// # Errors
    /// `AuctionNotFound`, `AuctionNotStarted`, any segment ledger error, or
    /// `InsufficientBalance`.
    pub fn fill_auction(
        &mut self,
        resolver: Address,
        id: AuctionId,
        segment: Option<usize>,
    ) -> Result<FillQuote> {
        self.transact("fill_auction", |tx| {
            let fill = tx.fill_auction(resolver, id, segment.into())?;
            let quote = fill.quote;
            tx.state.custody.deposit(Holder::Account(resolver), fill.asset);
            tx.state
                .custody
                .deposit(Holder::Account(resolver), fill.safety_deposit);
            tx.retire_auction_if_complete(id, quote.completes);
            Ok(quote)
        })
    }

    /// Fill and lock the resolver's payment in a destination-leg escrow.
    ///
    /// # Errors
    /// Anything from [`fill_auction`](Self::fill_auction), or
    /// `InvalidDurations`.
    pub fn deploy_escrow_from_auction(
        &mut self,
        resolver: Address,
        id: AuctionId,
        segment: Option<usize>,
        durations: PhaseDurations,
    ) -> Result<EscrowId> {
        self.transact("deploy_escrow_from_auction", |tx| {
            durations.validate()?;
            let fill = tx.fill_auction(resolver, id, segment.into())?;
            let completes = fill.quote.completes;
            let now = tx.now;
            let state = &mut tx.state;
            let auction = state
                .auctions
                .get(&id)
                .ok_or(SwapError::AuctionNotFound(id))?;
            let escrow = state.escrows.create_with(resolver, |escrow| {
                Escrow::from_auction_fill(
                    escrow,
                    auction,
                    fill,
                    resolver,
                    durations,
                    &mut state.custody,
                    now,
                )
            })?;
            tx.escrow_created(escrow)?;
            tx.retire_auction_if_complete(id, completes);
            Ok(escrow)
        })
    }

    // -----------------------------------------------------------------------
    // Fusion orders
    // -----------------------------------------------------------------------

    /// Open an order and lock `amount + safety_deposit` from the maker.
    ///
    /// # Errors
    /// Any validation error from [`FusionOrder::open`], `TooManySegments`,
    /// or `InsufficientBalance`.
    pub fn create_fusion_order(
        &mut self,
        maker: Address,
        params: FusionOrderParams,
    ) -> Result<FusionOrderId> {
        self.transact("create_fusion_order", |tx| {
            tx.check_segment_count(params.segment_hashes.len())?;
            let order_hash = params.order_hash;
            let amount = params.amount;
            let deposit_kind = tx.config.safety_deposit_asset.clone();
            let durations = tx.config.default_escrow_durations;
            let now = tx.now;
            let state = &mut tx.state;
            let id = state.orders.create_with(maker, |id| {
                FusionOrder::open(
                    id,
                    maker,
                    params,
                    deposit_kind,
                    durations,
                    &mut state.custody,
                    now,
                )
            })?;
            tx.events.push(SwapEvent::OrderCreated {
                order: id,
                order_hash,
                maker,
                amount,
            });
            Ok(id)
        })
    }

    /// # Errors
    /// `OrderNotFound`, `NotWhitelisted`, or `AutoCancelNotReached`.
    pub fn cancel_fusion_order(
        &mut self,
        caller: Address,
        id: FusionOrderId,
    ) -> Result<OrderCancellation> {
        self.transact("cancel_fusion_order", |tx| {
            let state = &mut tx.state;
            let outcome = state
                .orders
                .get(&id)
                .ok_or(SwapError::OrderNotFound(id))?
                .cancel(&mut state.custody, caller, tx.now)?;
            state.orders.destroy(&id);
            tx.events.push(SwapEvent::OrderCancelled {
                order: id,
                cancelled_by: caller,
                refunded: outcome.refunded,
            });
            Ok(outcome)
        })
    }

    /// Claim without deploying an escrow; the claimed funds are credited to
    /// the resolver's account.
    ///
    /// # Errors
    /// `OrderNotFound`, `NotWhitelisted`, or any segment ledger error.
    pub fn resolver_accept_order(
        &mut self,
        resolver: Address,
        id: FusionOrderId,
        segment: Option<usize>,
    ) -> Result<FillQuote> {
        self.transact("resolver_accept_order", |tx| {
            let claim = tx.claim_order(resolver, id, segment.into())?;
            let quote = claim.quote;
            tx.state.custody.deposit(Holder::Account(resolver), claim.asset);
            tx.state
                .custody
                .deposit(Holder::Account(resolver), claim.safety_deposit);
            tx.retire_order_if_complete(id, quote.completes);
            Ok(quote)
        })
    }

    /// Claim and lock the slice in a source-leg escrow on the order's
    /// schedule.
    ///
    /// # Errors
    /// Anything from [`resolver_accept_order`](Self::resolver_accept_order).
    pub fn deploy_escrow_from_order(
        &mut self,
        resolver: Address,
        id: FusionOrderId,
        segment: Option<usize>,
    ) -> Result<EscrowId> {
        self.transact("deploy_escrow_from_order", |tx| {
            let claim = tx.claim_order(resolver, id, segment.into())?;
            let completes = claim.quote.completes;
            let now = tx.now;
            let state = &mut tx.state;
            let order = state
                .orders
                .get(&id)
                .ok_or(SwapError::OrderNotFound(id))?;
            let escrow = state.escrows.create_with(resolver, |escrow| {
                Escrow::from_order_claim(escrow, order, claim, resolver, &mut state.custody, now)
            })?;
            tx.escrow_created(escrow)?;
            tx.retire_order_if_complete(id, completes);
            Ok(escrow)
        })
    }

    // -----------------------------------------------------------------------
    // Escrows
    // -----------------------------------------------------------------------

    /// # Errors
    /// `EscrowNotFound`, `InvalidSecret`, `WithdrawalNotOpen`, or `NotTaker`.
    pub fn escrow_withdraw(
        &mut self,
        caller: Address,
        id: EscrowId,
        secret: &[u8],
    ) -> Result<EscrowPayout> {
        self.transact("escrow_withdraw", |tx| {
            let state = &mut tx.state;
            let payout = state
                .escrows
                .get(&id)
                .ok_or(SwapError::EscrowNotFound(id))?
                .withdraw(&mut state.custody, caller, secret, tx.now)?;
            state.escrows.destroy(&id);
            tx.events.push(SwapEvent::EscrowWithdrawn {
                escrow: id,
                caller,
                recipient: payout.asset_recipient,
                amount: payout.amount,
            });
            Ok(payout)
        })
    }

    /// # Errors
    /// `EscrowNotFound`, `CancellationNotOpen`, or `NotTaker`.
    pub fn escrow_recovery(&mut self, caller: Address, id: EscrowId) -> Result<EscrowPayout> {
        self.transact("escrow_recovery", |tx| {
            let state = &mut tx.state;
            let payout = state
                .escrows
                .get(&id)
                .ok_or(SwapError::EscrowNotFound(id))?
                .recovery(&mut state.custody, caller, tx.now)?;
            state.escrows.destroy(&id);
            tx.events.push(SwapEvent::EscrowRecovered {
                escrow: id,
                caller,
                recipient: payout.asset_recipient,
                amount: payout.amount,
            });
            Ok(payout)
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn auction(&self, id: AuctionId) -> Option<&DutchAuction> {
        self.state.auctions.get(&id)
    }

    #[must_use]
    pub fn order(&self, id: FusionOrderId) -> Option<&FusionOrder> {
        self.state.orders.get(&id)
    }

    #[must_use]
    pub fn escrow(&self, id: EscrowId) -> Option<&Escrow> {
        self.state.escrows.get(&id)
    }

    #[must_use]
    pub fn auction_count(&self) -> usize {
        self.state.auctions.len()
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.state.orders.len()
    }

    #[must_use]
    pub fn escrow_count(&self) -> usize {
        self.state.escrows.len()
    }

    #[must_use]
    pub fn balance(&self, holder: impl Into<Holder>, kind: &str) -> Amount {
        self.state.custody.balance(holder.into(), kind)
    }

    /// Price of a 100% fill right now.
    ///
    /// # Errors
    /// `AuctionNotFound`, or `ClockRewound`.
    pub fn current_price(&self, id: AuctionId) -> Result<Amount> {
        let now = self.observe()?;
        let auction = self.auction(id).ok_or(SwapError::AuctionNotFound(id))?;
        let price = auction.current_price(now);
        tracing::debug!(auction = %id, now, price, "Auction price read");
        Ok(price)
    }

    /// What [`fill_auction`](Self::fill_auction) would charge right now.
    ///
    /// # Errors
    /// Same as `fill_auction`, except for balance checks.
    pub fn quote_auction_fill(&self, id: AuctionId, segment: Option<usize>) -> Result<FillQuote> {
        let now = self.observe()?;
        self.auction(id)
            .ok_or(SwapError::AuctionNotFound(id))?
            .quote_fill(segment.into(), now)
    }

    /// What [`resolver_accept_order`](Self::resolver_accept_order) would
    /// release to `resolver`.
    ///
    /// # Errors
    /// `OrderNotFound`, `NotWhitelisted`, or any segment ledger error.
    pub fn quote_order_accept(
        &self,
        resolver: Address,
        id: FusionOrderId,
        segment: Option<usize>,
    ) -> Result<FillQuote> {
        self.order(id)
            .ok_or(SwapError::OrderNotFound(id))?
            .quote_accept(resolver, segment.into())
    }

    /// # Errors
    /// `EscrowNotFound`, or `ClockRewound`.
    pub fn escrow_phase(&self, id: EscrowId) -> Result<TimelockPhase> {
        let now = self.observe()?;
        let escrow = self.escrow(id).ok_or(SwapError::EscrowNotFound(id))?;
        Ok(escrow.phase(now))
    }

    /// Check that everything in custody for `kind` is accounted for by
    /// external deposits and withdrawals.
    ///
    /// # Errors
    /// `SupplyInvariantViolation`.
    pub fn verify_supply(&self, kind: &str) -> Result<()> {
        self.state
            .supply
            .verify(kind, self.state.custody.total_supply(kind))
    }

    /// [`verify_supply`](Self::verify_supply) for every asset ever funded.
    ///
    /// # Errors
    /// The first `SupplyInvariantViolation` found.
    pub fn verify_all_supply(&self) -> Result<()> {
        self.state
            .supply
            .tracked_assets()
            .iter()
            .try_for_each(|kind| self.verify_supply(kind))
    }
}

#[cfg(test)]
mod tests {
    use fusionswap_custody::{ManualClock, MemoryEventSink};
    use fusionswap_types::{OrderHash, Whitelist, hash_secret};

    use super::*;

    type TestProtocol = SwapProtocol<ManualClock, MemoryEventSink>;

    fn setup() -> (TestProtocol, ManualClock, MemoryEventSink) {
        let clock = ManualClock::new(1_000);
        let sink = MemoryEventSink::new();
        let protocol =
            SwapProtocol::with_clock_and_sink(ProtocolConfig::default(), clock.clone(), sink.clone())
                .unwrap();
        (protocol, clock, sink)
    }

    fn maker() -> Address {
        Address::from_label("maker")
    }

    fn resolver() -> Address {
        Address::from_label("resolver")
    }

    fn order_params(segments: usize) -> FusionOrderParams {
        FusionOrderParams {
            order_hash: OrderHash([9u8; 32]),
            asset_kind: "USDC".into(),
            amount: 100,
            safety_deposit: 10,
            whitelist: Whitelist::specific([resolver()]).unwrap(),
            segment_hashes: (0..segments)
                .map(|i| hash_secret(format!("k{i}").as_bytes()))
                .collect(),
            durations: None,
            auto_cancel_after: None,
        }
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ProtocolConfig {
            max_segments: 0,
            ..ProtocolConfig::default()
        };
        assert!(SwapProtocol::new(config).is_err());
    }

    #[test]
    fn fund_records_supply() {
        let (mut p, _, _) = setup();
        p.fund(maker(), "USDC", 500).unwrap();
        p.withdraw_external(maker(), "USDC", 200).unwrap();
        assert_eq!(p.balance(maker(), "USDC"), 300);
        assert!(p.verify_supply("USDC").is_ok());
        assert!(matches!(
            p.fund(maker(), "USDC", 0),
            Err(SwapError::ZeroAmount { .. })
        ));
        assert!(p.withdraw_external(maker(), "USDC", 301).is_err());
    }

    #[test]
    fn failed_operation_rolls_back_everything() {
        let (mut p, _, sink) = setup();
        p.fund(maker(), "USDC", 100).unwrap();
        // No NATIVE for the safety deposit: the asset leg must be restored.
        let err = p.create_fusion_order(maker(), order_params(1)).unwrap_err();
        assert!(matches!(err, SwapError::InsufficientBalance { .. }));
        assert_eq!(p.balance(maker(), "USDC"), 100);
        assert_eq!(p.order_count(), 0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn max_segments_enforced() {
        let config = ProtocolConfig {
            max_segments: 2,
            ..ProtocolConfig::default()
        };
        let mut p = SwapProtocol::with_clock_and_sink(
            config,
            ManualClock::new(0),
            MemoryEventSink::new(),
        )
        .unwrap();
        p.fund(maker(), "USDC", 100).unwrap();
        p.fund(maker(), "NATIVE", 10).unwrap();
        let err = p.create_fusion_order(maker(), order_params(3)).unwrap_err();
        assert_eq!(err, SwapError::TooManySegments { count: 3, max: 2 });
    }

    #[test]
    fn clock_rewind_rejected() {
        let (mut p, clock, _) = setup();
        p.fund(maker(), "USDC", 1).unwrap();
        clock.set(999);
        let err = p.fund(maker(), "USDC", 1).unwrap_err();
        assert_eq!(err, SwapError::ClockRewound { last: 1_000, now: 999 });
        clock.set(1_000);
        assert!(p.fund(maker(), "USDC", 1).is_ok());
    }

    #[test]
    fn order_claim_credits_resolver() {
        let (mut p, _, sink) = setup();
        p.fund(maker(), "USDC", 100).unwrap();
        p.fund(maker(), "NATIVE", 10).unwrap();
        let id = p.create_fusion_order(maker(), order_params(1)).unwrap();

        let quote = p.resolver_accept_order(resolver(), id, None).unwrap();
        assert_eq!(quote.amount, 100);
        assert!(quote.completes);
        assert!(p.order(id).is_none());
        assert_eq!(p.balance(resolver(), "USDC"), 100);
        assert_eq!(p.balance(resolver(), "NATIVE"), 10);
        assert_eq!(sink.names(), vec!["order_created", "order_accepted"]);
        assert!(p.verify_all_supply().is_ok());
    }

    #[test]
    fn cancel_missing_order_is_not_found() {
        let (mut p, _, _) = setup();
        let id = FusionOrderId::new();
        assert_eq!(
            p.cancel_fusion_order(maker(), id).unwrap_err(),
            SwapError::OrderNotFound(id)
        );
    }
}
