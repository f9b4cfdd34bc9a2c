//! Timelock phase machine for escrows.
//!
//! An escrow moves through five phases, each entered exactly once:
//! **FINALITY → EXCLUSIVE_WITHDRAWAL → PUBLIC_WITHDRAWAL →
//! PRIVATE_CANCELLATION → PUBLIC_CANCELLATION**
//!
//! The phase is never stored. It is recomputed from `now - created_at`
//! against cumulative thresholds, so it can only move forward as long as the
//! clock does. A zero-length public withdrawal window drops that phase,
//! giving the four-phase schedule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, SwapError, Timestamp, constants};

/// The ordered phases of an escrow's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimelockPhase {
    /// Waiting for the source chain to finalize. Nobody may act.
    Finality,
    /// Only the taker may withdraw, with the secret.
    ExclusiveWithdrawal,
    /// Anyone holding the secret may withdraw on the taker's behalf.
    PublicWithdrawal,
    /// Only the taker may cancel and return funds.
    PrivateCancellation,
    /// Anyone may cancel and return funds. Terminal.
    PublicCancellation,
}

impl TimelockPhase {
    /// Phases in which `withdraw` is accepted.
    #[must_use]
    pub fn is_withdrawal(self) -> bool {
        matches!(self, Self::ExclusiveWithdrawal | Self::PublicWithdrawal)
    }

    /// Phases in which `recovery` is accepted.
    #[must_use]
    pub fn is_cancellation(self) -> bool {
        matches!(self, Self::PrivateCancellation | Self::PublicCancellation)
    }
}

impl fmt::Display for TimelockPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finality => write!(f, "FINALITY"),
            Self::ExclusiveWithdrawal => write!(f, "EXCLUSIVE_WITHDRAWAL"),
            Self::PublicWithdrawal => write!(f, "PUBLIC_WITHDRAWAL"),
            Self::PrivateCancellation => write!(f, "PRIVATE_CANCELLATION"),
            Self::PublicCancellation => write!(f, "PUBLIC_CANCELLATION"),
        }
    }
}

/// Lengths of the non-terminal phases, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub finality: u64,
    pub exclusive_withdrawal: u64,
    /// Zero removes the public withdrawal phase.
    pub public_withdrawal: u64,
    pub private_cancellation: u64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            finality: constants::DEFAULT_FINALITY_SECS,
            exclusive_withdrawal: constants::DEFAULT_EXCLUSIVE_WITHDRAWAL_SECS,
            public_withdrawal: constants::DEFAULT_PUBLIC_WITHDRAWAL_SECS,
            private_cancellation: constants::DEFAULT_PRIVATE_CANCELLATION_SECS,
        }
    }
}

impl PhaseDurations {
    /// Four-phase schedule without a public withdrawal window.
    #[must_use]
    pub fn new(finality: u64, exclusive_withdrawal: u64, private_cancellation: u64) -> Self {
        Self {
            finality,
            exclusive_withdrawal,
            public_withdrawal: 0,
            private_cancellation,
        }
    }

    #[must_use]
    pub fn with_public_withdrawal(mut self, public_withdrawal: u64) -> Self {
        self.public_withdrawal = public_withdrawal;
        self
    }

    /// Sum of all windows before the terminal phase.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.finality
            .checked_add(self.exclusive_withdrawal)?
            .checked_add(self.public_withdrawal)?
            .checked_add(self.private_cancellation)
    }

    /// # Errors
    /// `InvalidDurations` if the taker would never get a window to withdraw
    /// or cancel, or if the schedule overflows.
    pub fn validate(&self) -> Result<()> {
        if self.exclusive_withdrawal == 0 {
            return Err(SwapError::InvalidDurations {
                reason: "exclusive withdrawal window is zero".into(),
            });
        }
        if self.private_cancellation == 0 {
            return Err(SwapError::InvalidDurations {
                reason: "private cancellation window is zero".into(),
            });
        }
        if self.total().is_none() {
            return Err(SwapError::InvalidDurations {
                reason: "total schedule overflows".into(),
            });
        }
        Ok(())
    }
}

/// Creation time plus phase schedule. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timelock {
    created_at: Timestamp,
    durations: PhaseDurations,
}

impl Timelock {
    /// # Errors
    /// `InvalidDurations` if the durations are unusable or the last threshold
    /// would overflow the timestamp range.
    pub fn new(created_at: Timestamp, durations: PhaseDurations) -> Result<Self> {
        durations.validate()?;
        let total = durations.total().unwrap_or(u64::MAX);
        if created_at.checked_add(total).is_none() {
            return Err(SwapError::InvalidDurations {
                reason: format!("schedule starting at {created_at} overflows"),
            });
        }
        Ok(Self {
            created_at,
            durations,
        })
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    #[must_use]
    pub fn durations(&self) -> &PhaseDurations {
        &self.durations
    }

    /// Absolute start times of the four phases after Finality:
    /// `[exclusive, public_withdrawal, private_cancellation, public_cancellation]`.
    #[must_use]
    pub fn thresholds(&self) -> [Timestamp; 4] {
        // Overflow was ruled out in `new`.
        let t1 = self.created_at + self.durations.finality;
        let t2 = t1 + self.durations.exclusive_withdrawal;
        let t3 = t2 + self.durations.public_withdrawal;
        let t4 = t3 + self.durations.private_cancellation;
        [t1, t2, t3, t4]
    }

    /// The phase `now` falls in. Times before creation count as Finality.
    #[must_use]
    pub fn current_phase(&self, now: Timestamp) -> TimelockPhase {
        let [t1, t2, t3, t4] = self.thresholds();
        if now < t1 {
            TimelockPhase::Finality
        } else if now < t2 {
            TimelockPhase::ExclusiveWithdrawal
        } else if now < t3 {
            TimelockPhase::PublicWithdrawal
        } else if now < t4 {
            TimelockPhase::PrivateCancellation
        } else {
            TimelockPhase::PublicCancellation
        }
    }

    /// Seconds until the next phase begins; zero once terminal.
    #[must_use]
    pub fn remaining_time(&self, now: Timestamp) -> u64 {
        self.thresholds()
            .into_iter()
            .find(|&threshold| now < threshold)
            .map_or(0, |threshold| threshold - now)
    }
}
