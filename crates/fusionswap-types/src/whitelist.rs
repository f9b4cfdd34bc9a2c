//! Resolver whitelist.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Address, Result, SwapError};

/// Which resolvers may accept (and, after the deadline, cancel) an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Whitelist {
    /// Any caller is accepted.
    Any,
    /// Only the listed resolvers.
    Specific(BTreeSet<Address>),
}

impl Whitelist {
    /// # Errors
    /// `EmptyWhitelist` if no resolver is given.
    pub fn specific(resolvers: impl IntoIterator<Item = Address>) -> Result<Self> {
        let set: BTreeSet<Address> = resolvers.into_iter().collect();
        if set.is_empty() {
            return Err(SwapError::EmptyWhitelist);
        }
        Ok(Self::Specific(set))
    }

    #[must_use]
    pub fn is_whitelisted(&self, caller: &Address) -> bool {
        match self {
            Self::Any => true,
            Self::Specific(set) => set.contains(caller),
        }
    }

    /// # Errors
    /// `EmptyWhitelist` for an empty `Specific` list.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Specific(set) if set.is_empty() => Err(SwapError::EmptyWhitelist),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_accepts_everyone() {
        assert!(Whitelist::Any.is_whitelisted(&Address::random()));
    }

    #[test]
    fn specific_accepts_members_only() {
        let r = Address::from_label("resolver");
        let wl = Whitelist::specific([r]).unwrap();
        assert!(wl.is_whitelisted(&r));
        assert!(!wl.is_whitelisted(&Address::from_label("stranger")));
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(
            Whitelist::specific(std::iter::empty()).unwrap_err(),
            SwapError::EmptyWhitelist
        );
        assert!(Whitelist::Specific(BTreeSet::new()).validate().is_err());
        assert!(Whitelist::Any.validate().is_ok());
    }
}
