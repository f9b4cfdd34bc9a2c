//! Segmented fill accounting shared by fusion orders and Dutch auctions.
//!
//! A total is split into `N - 1` equal parts guarded by `N` secret hashes.
//! Filling up to index `k` (0-based) makes the cumulative fill `k + 1`
//! parts, so index `N - 2` reaches 100%. Index `N - 1` is the single-shot
//! full-fill secret and is only usable while nothing has been filled yet.
//!
//! ```text
//!   N = 5 hashes, 4 parts
//!   index:        0     1     2     3   | 4
//!   cumulative:  25%   50%   75%  100%  | 100% (full fill, no history)
//! ```
//!
//! Fills must strictly advance `last_filled`. The fill that completes the
//! total pays `total - already_filled`, absorbing the truncation remainder so
//! the fills always sum to the total exactly.

use serde::{Deserialize, Serialize};

use crate::{Amount, HashLock, Result, SwapError, constants, count_to_amount};

/// Which segment a resolver wants to fill up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentRequest {
    /// Fill everything that is left: the full-fill index without history,
    /// or the last regular segment after partial fills.
    Full,
    /// Fill up to and including this index.
    Index(usize),
}

impl From<Option<usize>> for SegmentRequest {
    fn from(index: Option<usize>) -> Self {
        index.map_or(Self::Full, Self::Index)
    }
}

/// Ordered, non-empty list of segment hashlocks. Deserialization goes
/// through [`SegmentSet::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HashLock>", into = "Vec<HashLock>")]
pub struct SegmentSet {
    hashes: Vec<HashLock>,
}

impl SegmentSet {
    /// # Errors
    /// `EmptySegmentSet` or `TooManySegments`.
    pub fn new(hashes: Vec<HashLock>) -> Result<Self> {
        if hashes.is_empty() {
            return Err(SwapError::EmptySegmentSet);
        }
        if hashes.len() > constants::MAX_SEGMENTS {
            return Err(SwapError::TooManySegments {
                count: hashes.len(),
                max: constants::MAX_SEGMENTS,
            });
        }
        Ok(Self { hashes })
    }

    /// Build from raw commitments, validating each.
    pub fn from_commitments(commitments: &[[u8; 32]]) -> Result<Self> {
        let hashes = commitments
            .iter()
            .map(|c| HashLock::new(*c))
            .collect::<Result<Vec<_>>>()?;
        Self::new(hashes)
    }

    /// Build from the secrets themselves (maker side).
    pub fn from_secrets<S: AsRef<[u8]>>(secrets: &[S]) -> Result<Self> {
        Self::new(
            secrets
                .iter()
                .map(|s| HashLock::from_secret(s.as_ref()))
                .collect(),
        )
    }

    /// Number of hashes, `N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Always `false`; kept for the `len` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Number of equal parts the total is divided into (`N - 1`), or 1 for
    /// the single-hash case.
    #[must_use]
    pub fn parts(&self) -> usize {
        self.hashes.len().saturating_sub(1).max(1)
    }

    /// Index of the single-shot full-fill hash.
    #[must_use]
    pub fn full_fill_index(&self) -> usize {
        self.hashes.len() - 1
    }

    #[must_use]
    pub fn hashlock(&self, index: usize) -> Option<HashLock> {
        self.hashes.get(index).copied()
    }

    /// # Errors
    /// `IndivisibleSegments` if `amount` does not split evenly into
    /// [`parts`](Self::parts).
    pub fn check_divisible(&self, field: &'static str, amount: Amount) -> Result<()> {
        let parts = self.parts();
        if amount % count_to_amount(parts) != 0 {
            return Err(SwapError::IndivisibleSegments {
                field,
                amount,
                parts,
            });
        }
        Ok(())
    }

    fn segment_size(&self, total: Amount) -> Amount {
        total / count_to_amount(self.parts())
    }
}

impl TryFrom<Vec<HashLock>> for SegmentSet {
    type Error = SwapError;

    fn try_from(hashes: Vec<HashLock>) -> Result<Self> {
        Self::new(hashes)
    }
}

impl From<SegmentSet> for Vec<HashLock> {
    fn from(set: SegmentSet) -> Self {
        set.hashes
    }
}

/// What a fill request would take, computed without mutating anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillQuote {
    /// Index the fill advances `last_filled` to.
    pub target_index: usize,
    /// Number of segments this fill newly covers.
    pub segments_covered: usize,
    /// Asset amount owed for this fill.
    pub amount: Amount,
    /// Safety deposit owed for this fill.
    pub safety_deposit: Amount,
    /// The fill exhausts the total.
    pub completes: bool,
}

/// Progress of a segmented fill. `last_filled` only ever increases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillState {
    last_filled: Option<usize>,
}

impl FillState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_filled(&self) -> Option<usize> {
        self.last_filled
    }

    /// Price a fill request against `total` and `deposit_total`.
    ///
    /// # Errors
    /// - `InvalidSegmentIndex` if the index is out of range
    /// - `SegmentAlreadyFilled` if it does not advance past `last_filled`
    /// - `FullFillAfterPartial` if the full-fill index is named after a
    ///   partial fill
    pub fn quote(
        &self,
        segments: &SegmentSet,
        total: Amount,
        deposit_total: Amount,
        request: SegmentRequest,
    ) -> Result<FillQuote> {
        let n = segments.len();

        if n == 1 {
            if let SegmentRequest::Index(index) = request {
                if index != 0 {
                    return Err(SwapError::InvalidSegmentIndex { index, segments: n });
                }
            }
            if let Some(last_filled) = self.last_filled {
                return Err(SwapError::SegmentAlreadyFilled {
                    requested: 0,
                    last_filled,
                });
            }
            return Ok(FillQuote {
                target_index: 0,
                segments_covered: 1,
                amount: total,
                safety_deposit: deposit_total,
                completes: true,
            });
        }

        let full = segments.full_fill_index();
        let target = match request {
            SegmentRequest::Full => match self.last_filled {
                None => full,
                Some(_) => full - 1,
            },
            SegmentRequest::Index(index) if index >= n => {
                return Err(SwapError::InvalidSegmentIndex { index, segments: n });
            }
            SegmentRequest::Index(index) => index,
        };

        if let Some(last_filled) = self.last_filled {
            if target <= last_filled {
                return Err(SwapError::SegmentAlreadyFilled {
                    requested: target,
                    last_filled,
                });
            }
            if target == full {
                return Err(SwapError::FullFillAfterPartial { last_filled });
            }
        }

        let next = self.last_filled.map_or(0, |l| l + 1);
        let segments_covered = target + 1 - next;
        let completes = target >= full - 1;

        let (amount, safety_deposit) = if completes {
            (
                total - self.filled_amount(segments, total),
                deposit_total - self.filled_amount(segments, deposit_total),
            )
        } else {
            let covered = count_to_amount(segments_covered);
            (
                covered * segments.segment_size(total),
                covered * segments.segment_size(deposit_total),
            )
        };

        Ok(FillQuote {
            target_index: target,
            segments_covered,
            amount,
            safety_deposit,
            completes,
        })
    }

    /// Commit a quote. Re-checks ordering so a stale quote cannot rewind.
    ///
    /// # Errors
    /// `SegmentAlreadyFilled` if `quote.target_index` is not past `last_filled`.
    pub fn record(&mut self, quote: &FillQuote) -> Result<()> {
        if let Some(last_filled) = self.last_filled {
            if quote.target_index <= last_filled {
                return Err(SwapError::SegmentAlreadyFilled {
                    requested: quote.target_index,
                    last_filled,
                });
            }
        }
        self.last_filled = Some(quote.target_index);
        Ok(())
    }

    /// Portion of `total` already taken by recorded fills, at segment
    /// granularity.
    #[must_use]
    pub fn filled_amount(&self, segments: &SegmentSet, total: Amount) -> Amount {
        match self.last_filled {
            None => 0,
            Some(last) if last + 1 >= segments.parts() => total,
            Some(last) => count_to_amount(last + 1) * segments.segment_size(total),
        }
    }

    /// Portion of `total` not yet taken.
    #[must_use]
    pub fn remaining_amount(&self, segments: &SegmentSet, total: Amount) -> Amount {
        total - self.filled_amount(segments, total)
    }
}
