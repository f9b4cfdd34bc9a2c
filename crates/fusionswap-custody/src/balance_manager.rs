//! Asset custody for parties and the entities that lock funds.
//!
//! Tracks one balance per (holder, asset). Funds leave a holder only as a
//! [`Funds`] value and re-enter only by depositing that value, so every
//! transfer is a withdraw/deposit pair and nothing is created in between.
//! All mutations are atomic: either the full operation succeeds or the
//! balance is unchanged.

use std::collections::HashMap;

use fusionswap_types::{Amount, AssetKind, Holder, Result, SwapError};

/// A quantity of one asset that has left custody and must be deposited
/// somewhere. Not `Clone`: it can only be moved.
#[must_use = "withdrawn funds must be deposited"]
#[derive(Debug, PartialEq, Eq)]
pub struct Funds {
    kind: AssetKind,
    amount: Amount,
}

impl Funds {
    fn new(kind: AssetKind, amount: Amount) -> Self {
        Self { kind, amount }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Fail unless these funds are of the `expected` asset.
    ///
    /// # Errors
    /// `AssetMismatch`.
    pub fn ensure_kind(&self, expected: &str) -> Result<()> {
        if self.kind != expected {
            return Err(SwapError::AssetMismatch {
                expected: expected.to_string(),
                actual: self.kind.clone(),
            });
        }
        Ok(())
    }
}

/// The custody primitive the protocol is written against.
pub trait CustodyStore {
    /// Take `amount` of `kind` out of `payer`'s balance.
    ///
    /// # Errors
    /// `InsufficientBalance` if `payer` holds less than `amount`.
    fn withdraw(&mut self, payer: Holder, kind: &str, amount: Amount) -> Result<Funds>;

    /// Credit `funds` to `recipient`.
    fn deposit(&mut self, recipient: Holder, funds: Funds);

    /// Current balance of `holder` in `kind`.
    fn balance(&self, holder: Holder, kind: &str) -> Amount;

    /// Withdraw an asset and its safety deposit together. If the second
    /// withdrawal fails the first is put back.
    fn withdraw_pair(
        &mut self,
        payer: Holder,
        (asset_kind, amount): (&str, Amount),
        (deposit_kind, deposit): (&str, Amount),
    ) -> Result<(Funds, Funds)> {
        let asset = self.withdraw(payer, asset_kind, amount)?;
        match self.withdraw(payer, deposit_kind, deposit) {
            Ok(safety_deposit) => Ok((asset, safety_deposit)),
            Err(err) => {
                self.deposit(payer, asset);
                Err(err)
            }
        }
    }
}

/// In-memory [`CustodyStore`].
#[derive(Debug, Clone, Default)]
pub struct BalanceManager {
    /// Per-(holder, asset) balances. Zero balances are removed.
    balances: HashMap<(Holder, AssetKind), Amount>,
}

impl BalanceManager {
    /// Create a new empty balance manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring new funds into custody from outside the protocol.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the balance would exceed `Amount::MAX`.
    pub fn mint(&mut self, holder: Holder, kind: &str, amount: Amount) -> Result<()> {
        let entry = self.balances.entry((holder, kind.to_string())).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(SwapError::ArithmeticOverflow { what: "balance" })?;
        Ok(())
    }

    /// Pay funds out of custody to outside the protocol.
    pub fn burn(&mut self, holder: Holder, kind: &str, amount: Amount) -> Result<()> {
        let funds = self.withdraw(holder, kind, amount)?;
        drop(funds);
        Ok(())
    }

    /// Withdraw from one holder and deposit into another.
    pub fn transfer(&mut self, from: Holder, to: Holder, kind: &str, amount: Amount) -> Result<()> {
        let funds = self.withdraw(from, kind, amount)?;
        self.deposit(to, funds);
        Ok(())
    }

    /// Total of an asset across every holder.
    #[must_use]
    pub fn total_supply(&self, kind: &str) -> Amount {
        self.balances
            .iter()
            .filter(|((_, k), _)| k == kind)
            .map(|(_, amount)| amount)
            .sum()
    }

    /// Every non-zero balance of `holder`, sorted by asset.
    #[must_use]
    pub fn holdings(&self, holder: Holder) -> Vec<(AssetKind, Amount)> {
        let mut out: Vec<(AssetKind, Amount)> = self
            .balances
            .iter()
            .filter(|((h, _), _)| *h == holder)
            .map(|((_, k), amount)| (k.clone(), *amount))
            .collect();
        out.sort();
        out
    }
}

impl CustodyStore for BalanceManager {
    fn withdraw(&mut self, payer: Holder, kind: &str, amount: Amount) -> Result<Funds> {
        let key = (payer, kind.to_string());
        let available = self.balances.get(&key).copied().unwrap_or(0);
        if available < amount {
            return Err(SwapError::InsufficientBalance {
                holder: payer.to_string(),
                asset: kind.to_string(),
                needed: amount,
                available,
            });
        }
        if available == amount {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, available - amount);
        }
        Ok(Funds::new(kind.to_string(), amount))
    }

    fn deposit(&mut self, recipient: Holder, funds: Funds) {
        if funds.is_zero() {
            return;
        }
        // Funds only exist after a withdraw of the same amount, so the
        // credited total never exceeds what was minted.
        let entry = self.balances.entry((recipient, funds.kind)).or_insert(0);
        *entry = entry.saturating_add(funds.amount);
    }

    fn balance(&self, holder: Holder, kind: &str) -> Amount {
        self.balances
            .get(&(holder, kind.to_string()))
            .copied()
            .unwrap_or(0)
    }
}
