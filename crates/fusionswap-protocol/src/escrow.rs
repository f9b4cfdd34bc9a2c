//! Hash- and time-locked escrow for one leg of a swap.
//!
//! An escrow custodies exactly one asset amount and one safety deposit. It is
//! deployed from a fusion order claim (source leg) or an auction fill
//! (destination leg) and released exactly once, either by `withdraw` with
//! the segment secret or by `recovery` after the withdrawal windows close.

use fusionswap_custody::{CustodyStore, Funds};
use fusionswap_types::{
    Address, Amount, AssetKind, EscrowId, HashLock, Holder, OrderHash, PhaseDurations, Result,
    SwapError, Timelock, TimelockPhase, Timestamp,
};
use serde::Serialize;

use crate::{AuctionFill, DutchAuction, FusionOrder, OrderClaim};

/// A deployed escrow.
#[derive(Debug, Clone, Serialize)]
pub struct Escrow {
    id: EscrowId,
    order_hash: OrderHash,
    asset_kind: AssetKind,
    amount: Amount,
    deposit_kind: AssetKind,
    safety_deposit: Amount,
    maker: Address,
    taker: Address,
    is_source_chain: bool,
    timelock: Timelock,
    hashlock: HashLock,
}

/// Where an escrow's funds went when it was released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EscrowPayout {
    pub escrow: EscrowId,
    pub asset_recipient: Address,
    pub amount: Amount,
    pub deposit_recipient: Address,
    pub safety_deposit: Amount,
}

impl Escrow {
    /// Source-leg escrow for a claimed slice of a fusion order. The resolver
    /// is the taker and the order's own schedule applies.
    ///
    /// # Errors
    /// `AssetMismatch` if the claim is not in the order's asset, or
    /// `InvalidDurations` if the schedule overflows from `now`.
    pub fn from_order_claim<S: CustodyStore>(
        id: EscrowId,
        order: &FusionOrder,
        claim: OrderClaim,
        resolver: Address,
        custody: &mut S,
        now: Timestamp,
    ) -> Result<Self> {
        claim.asset.ensure_kind(order.asset_kind())?;
        let timelock = Timelock::new(now, order.durations())?;
        let escrow = Self::lock(
            id,
            order.order_hash(),
            order.maker(),
            resolver,
            true,
            timelock,
            claim.hashlock,
            claim.asset,
            claim.safety_deposit,
            custody,
        );
        Ok(escrow)
    }

    /// Destination-leg escrow funded by the resolver who filled `auction`.
    ///
    /// # Errors
    /// `AssetMismatch` if the fill is not in the auction's asset, or
    /// `InvalidDurations` for an unusable schedule.
    pub fn from_auction_fill<S: CustodyStore>(
        id: EscrowId,
        auction: &DutchAuction,
        fill: AuctionFill,
        resolver: Address,
        durations: PhaseDurations,
        custody: &mut S,
        now: Timestamp,
    ) -> Result<Self> {
        fill.asset.ensure_kind(auction.asset_kind())?;
        let timelock = Timelock::new(now, durations)?;
        let escrow = Self::lock(
            id,
            auction.order_hash(),
            auction.maker(),
            resolver,
            false,
            timelock,
            fill.hashlock,
            fill.asset,
            fill.safety_deposit,
            custody,
        );
        Ok(escrow)
    }

    #[allow(clippy::too_many_arguments)]
    fn lock<S: CustodyStore>(
        id: EscrowId,
        order_hash: OrderHash,
        maker: Address,
        taker: Address,
        is_source_chain: bool,
        timelock: Timelock,
        hashlock: HashLock,
        asset: Funds,
        safety_deposit: Funds,
        custody: &mut S,
    ) -> Self {
        let escrow = Self {
            id,
            order_hash,
            asset_kind: asset.kind().to_string(),
            amount: asset.amount(),
            deposit_kind: safety_deposit.kind().to_string(),
            safety_deposit: safety_deposit.amount(),
            maker,
            taker,
            is_source_chain,
            timelock,
            hashlock,
        };
        custody.deposit(Holder::Escrow(id), asset);
        custody.deposit(Holder::Escrow(id), safety_deposit);

        tracing::info!(
            escrow = %id,
            order_hash = %order_hash,
            taker = %taker,
            amount = escrow.amount,
            source_chain = is_source_chain,
            "Escrow deployed"
        );
        escrow
    }

    #[must_use]
    pub fn id(&self) -> EscrowId {
        self.id
    }

    #[must_use]
    pub fn order_hash(&self) -> OrderHash {
        self.order_hash
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
    pub fn safety_deposit(&self) -> Amount {
        self.safety_deposit
    }

    #[must_use]
    pub fn maker(&self) -> Address {
        self.maker
    }

    #[must_use]
    pub fn taker(&self) -> Address {
        self.taker
    }

    #[must_use]
    pub fn is_source_chain(&self) -> bool {
        self.is_source_chain
    }

    #[must_use]
    pub fn timelock(&self) -> &Timelock {
        &self.timelock
    }

    #[must_use]
    pub fn hashlock(&self) -> &HashLock {
        &self.hashlock
    }

    #[must_use]
    pub fn phase(&self, now: Timestamp) -> TimelockPhase {
        self.timelock.current_phase(now)
    }

    /// Who receives the asset on a successful withdraw: the taker on the
    /// source leg, the maker on the destination leg.
    #[must_use]
    pub fn withdraw_recipient(&self) -> Address {
        if self.is_source_chain {
            self.taker
        } else {
            self.maker
        }
    }

    /// Who the asset returns to on recovery: whoever committed it.
    #[must_use]
    pub fn recovery_recipient(&self) -> Address {
        if self.is_source_chain {
            self.maker
        } else {
            self.taker
        }
    }

    /// Release to the withdraw recipient against the secret. The safety
    /// deposit goes to `caller`. The caller must delete the escrow.
    ///
    /// # Errors
    /// `InvalidSecret`, `WithdrawalNotOpen` outside the withdrawal phases,
    /// or `NotTaker` for a third party during exclusive withdrawal.
    pub fn withdraw<S: CustodyStore>(
        &self,
        custody: &mut S,
        caller: Address,
        secret: &[u8],
        now: Timestamp,
    ) -> Result<EscrowPayout> {
        if !self.hashlock.verify(secret) {
            tracing::warn!(escrow = %self.id, caller = %caller, "Escrow withdraw with wrong secret");
            return Err(SwapError::InvalidSecret);
        }
        let phase = self.phase(now);
        match phase {
            TimelockPhase::ExclusiveWithdrawal if caller != self.taker => {
                tracing::warn!(escrow = %self.id, caller = %caller, "Exclusive withdraw by non-taker");
                return Err(SwapError::NotTaker { caller });
            }
            TimelockPhase::ExclusiveWithdrawal | TimelockPhase::PublicWithdrawal => {}
            _ => return Err(SwapError::WithdrawalNotOpen { phase }),
        }

        let payout = self.release(custody, self.withdraw_recipient(), caller)?;
        tracing::info!(
            escrow = %self.id,
            caller = %caller,
            recipient = %payout.asset_recipient,
            amount = payout.amount,
            phase = %phase,
            "Escrow withdrawn"
        );
        Ok(payout)
    }

    /// Return the asset to its committer once the withdrawal windows have
    /// closed. The safety deposit goes to `caller`. The caller must delete
    /// the escrow.
    ///
    /// # Errors
    /// `CancellationNotOpen` before private cancellation, or `NotTaker` for
    /// a third party during private cancellation.
    pub fn recovery<S: CustodyStore>(
        &self,
        custody: &mut S,
        caller: Address,
        now: Timestamp,
    ) -> Result<EscrowPayout> {
        let phase = self.phase(now);
        match phase {
            TimelockPhase::PrivateCancellation if caller != self.taker => {
                tracing::warn!(escrow = %self.id, caller = %caller, "Private recovery by non-taker");
                return Err(SwapError::NotTaker { caller });
            }
            TimelockPhase::PrivateCancellation | TimelockPhase::PublicCancellation => {}
            _ => return Err(SwapError::CancellationNotOpen { phase }),
        }

        let payout = self.release(custody, self.recovery_recipient(), caller)?;
        tracing::info!(
            escrow = %self.id,
            caller = %caller,
            recipient = %payout.asset_recipient,
            amount = payout.amount,
            phase = %phase,
            "Escrow recovered"
        );
        Ok(payout)
    }

    fn release<S: CustodyStore>(
        &self,
        custody: &mut S,
        asset_recipient: Address,
        deposit_recipient: Address,
    ) -> Result<EscrowPayout> {
        let (asset, deposit) = custody.withdraw_pair(
            Holder::Escrow(self.id),
            (self.asset_kind.as_str(), self.amount),
            (self.deposit_kind.as_str(), self.safety_deposit),
        )?;
        custody.deposit(Holder::Account(asset_recipient), asset);
        custody.deposit(Holder::Account(deposit_recipient), deposit);
        Ok(EscrowPayout {
            escrow: self.id,
            asset_recipient,
            amount: self.amount,
            deposit_recipient,
            safety_deposit: self.safety_deposit,
        })
    }
}
