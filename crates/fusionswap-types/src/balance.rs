//! Amount and asset primitives.
//!
//! All quantities are integers in the asset's smallest unit. Division always
//! truncates; callers that split a total must carry the remainder explicitly.

/// Quantity of an asset in its smallest unit.
pub type Amount = u128;

/// Type alias for asset identifiers (e.g., "USDC", "NATIVE").
pub type AssetKind = String;

/// Widen a count (segment index, number of segments) to an [`Amount`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn count_to_amount(count: usize) -> Amount {
    count as Amount
}
