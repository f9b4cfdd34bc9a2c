//! Supply conservation invariant checker.
//!
//! Every asset enters the protocol through `fund` and leaves through
//! `withdraw_external`. In between, orders, fills, escrows, and refunds only
//! move funds between holders, so for every asset:
//! ```text
//! Σ(accounts) + Σ(orders) + Σ(escrows) == Σ(deposits) - Σ(withdrawals)
//! ```

use std::collections::{BTreeSet, HashMap};

use fusionswap_types::{Amount, AssetKind, Result, SwapError};

/// Per-asset running totals of external deposits and withdrawals.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    deposits: HashMap<AssetKind, Amount>,
    withdrawals: HashMap<AssetKind, Amount>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record funds entering custody.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the running total overflows.
    pub fn record_deposit(&mut self, asset: &str, amount: Amount) -> Result<()> {
        let total = self.deposits.entry(asset.to_string()).or_insert(0);
        *total = total
            .checked_add(amount)
            .ok_or(SwapError::ArithmeticOverflow { what: "deposits" })?;
        Ok(())
    }

    /// Record funds leaving custody.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the running total overflows.
    pub fn record_withdrawal(&mut self, asset: &str, amount: Amount) -> Result<()> {
        let total = self.withdrawals.entry(asset.to_string()).or_insert(0);
        *total = total
            .checked_add(amount)
            .ok_or(SwapError::ArithmeticOverflow { what: "withdrawals" })?;
        Ok(())
    }

    #[must_use]
    pub fn total_deposits(&self, asset: &str) -> Amount {
        self.deposits.get(asset).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_withdrawals(&self, asset: &str) -> Amount {
        self.withdrawals.get(asset).copied().unwrap_or(0)
    }

    /// Deposits minus withdrawals. `None` if more left than ever came in.
    #[must_use]
    pub fn expected_supply(&self, asset: &str) -> Option<Amount> {
        self.total_deposits(asset)
            .checked_sub(self.total_withdrawals(asset))
    }

    /// Compare the supply actually held in custody against the ledger.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` on any mismatch.
    pub fn verify(&self, asset: &str, actual_supply: Amount) -> Result<()> {
        let deposits = self.total_deposits(asset);
        let withdrawals = self.total_withdrawals(asset);
        match self.expected_supply(asset) {
            Some(expected) if expected == actual_supply => Ok(()),
            expected => {
                tracing::error!(
                    asset,
                    actual = actual_supply,
                    expected = ?expected,
                    deposits,
                    withdrawals,
                    "Supply invariant violated"
                );
                Err(SwapError::SupplyInvariantViolation {
                    reason: format!(
                        "asset {asset}: actual supply {actual_supply} != expected {expected:?} \
                         (deposits={deposits}, withdrawals={withdrawals})"
                    ),
                })
            }
        }
    }

    /// Every asset that has moved across the boundary, sorted.
    #[must_use]
    pub fn tracked_assets(&self) -> Vec<AssetKind> {
        let assets: BTreeSet<&AssetKind> =
            self.deposits.keys().chain(self.withdrawals.keys()).collect();
        assets.into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.expected_supply("USDC"), Some(0));
        assert!(sc.verify("USDC", 0).is_ok());
    }

    #[test]
    fn withdrawals_decrease_expected() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit("USDC", 1000).unwrap();
        sc.record_deposit("USDC", 500).unwrap();
        sc.record_withdrawal("USDC", 300).unwrap();
        assert_eq!(sc.expected_supply("USDC"), Some(1200));
        assert!(sc.verify("USDC", 1200).is_ok());
    }

    #[test]
    fn verify_fails_when_imbalanced() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit("NATIVE", 10).unwrap();
        let err = sc.verify("NATIVE", 11).unwrap_err();
        assert!(matches!(err, SwapError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn over_withdrawal_never_verifies() {
        let mut sc = SupplyConservation::new();
        sc.record_withdrawal("NATIVE", 1).unwrap();
        assert_eq!(sc.expected_supply("NATIVE"), None);
        assert!(sc.verify("NATIVE", 0).is_err());
    }

    #[test]
    fn assets_tracked_independently() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit("USDC", 50).unwrap();
        sc.record_withdrawal("NATIVE", 0).unwrap();
        assert_eq!(sc.tracked_assets(), vec!["NATIVE".to_string(), "USDC".to_string()]);
        assert!(sc.verify("USDC", 50).is_ok());
    }

    #[test]
    fn deposit_overflow_rejected() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit("X", Amount::MAX).unwrap();
        assert!(sc.record_deposit("X", 1).is_err());
    }
}
