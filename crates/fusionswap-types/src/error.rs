//! Error types for the FusionSwap protocol.
//!
//! All errors use the `FS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by kind:
//! - 1xx: Validation (malformed parameters, rejected at construction)
//! - 2xx: Authorization (wrong caller, wrong secret)
//! - 3xx: State (missing entity, segment ordering, lifecycle phase)
//! - 4xx: Custody (balances, asset kinds, supply conservation)
//! - 9xx: General / internal errors

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Address, Amount, AuctionId, EscrowId, FusionOrderId, TimelockPhase, Timestamp};

/// Coarse classification of a [`SwapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed input. Never worth retrying unchanged.
    Validation,
    /// Wrong caller or secret. Retrying with the same caller repeats the failure.
    Authorization,
    /// Entity missing or in the wrong lifecycle state. May succeed with
    /// corrected parameters (e.g. the next free segment) or at a later time.
    State,
    /// Balance or asset bookkeeping failure.
    Custody,
    /// Configuration, serialization, or an internal bug.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::State => write!(f, "STATE"),
            Self::Custody => write!(f, "CUSTODY"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all FusionSwap operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// An amount that must be positive was zero.
    #[error("FS_ERR_100: {field} must be greater than zero")]
    ZeroAmount { field: &'static str },

    /// The segment hash list was empty.
    #[error("FS_ERR_101: Segment hash list is empty")]
    EmptySegmentSet,

    /// A segmented amount does not split evenly into its parts.
    #[error("FS_ERR_102: {field} of {amount} is not divisible into {parts} segments")]
    IndivisibleSegments {
        field: &'static str,
        amount: Amount,
        parts: usize,
    },

    /// The auction curve parameters are inconsistent.
    #[error("FS_ERR_103: Invalid auction curve: {reason}")]
    InvalidAuctionCurve { reason: String },

    /// A hashlock commitment was empty, the wrong length, or all zeroes.
    #[error("FS_ERR_104: Invalid hashlock: {reason}")]
    InvalidHashLock { reason: String },

    /// The requested segment index does not exist.
    #[error("FS_ERR_105: Segment index {index} out of range for {segments} segments")]
    InvalidSegmentIndex { index: usize, segments: usize },

    /// The resolver whitelist was empty.
    #[error("FS_ERR_106: Resolver whitelist is empty")]
    EmptyWhitelist,

    /// Too many segment hashes for one order.
    #[error("FS_ERR_107: {count} segments exceeds the maximum of {max}")]
    TooManySegments { count: usize, max: usize },

    /// The auto-cancel deadline is not in the future.
    #[error("FS_ERR_108: Auto-cancel deadline {deadline} is not after {now}")]
    InvalidDeadline { deadline: Timestamp, now: Timestamp },

    /// The timelock phase durations are unusable.
    #[error("FS_ERR_109: Invalid phase durations: {reason}")]
    InvalidDurations { reason: String },

    /// An amount or timestamp computation overflowed.
    #[error("FS_ERR_110: Arithmetic overflow computing {what}")]
    ArithmeticOverflow { what: &'static str },

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// Only the maker may perform this operation.
    #[error("FS_ERR_200: Caller {caller} is not the maker")]
    NotMaker { caller: Address },

    /// The caller is not on the resolver whitelist.
    #[error("FS_ERR_201: Caller {caller} is not a whitelisted resolver")]
    NotWhitelisted { caller: Address },

    /// Only the escrow taker may act in this phase.
    #[error("FS_ERR_202: Caller {caller} is not the escrow taker")]
    NotTaker { caller: Address },

    /// A resolver tried to cancel before the auto-cancel deadline.
    #[error("FS_ERR_203: Resolver cancellation not yet allowed (deadline {deadline:?}, now {now})")]
    AutoCancelNotReached {
        deadline: Option<Timestamp>,
        now: Timestamp,
    },

    /// The presented secret does not match the hashlock.
    #[error("FS_ERR_204: Secret does not match hashlock")]
    InvalidSecret,

    // =================================================================
    // State Errors (3xx)
    // =================================================================
    /// The auction does not exist (never created, filled, or cancelled).
    #[error("FS_ERR_300: Auction not found: {0}")]
    AuctionNotFound(AuctionId),

    /// The fusion order does not exist.
    #[error("FS_ERR_301: Fusion order not found: {0}")]
    OrderNotFound(FusionOrderId),

    /// The escrow does not exist (never created, withdrawn, or recovered).
    #[error("FS_ERR_302: Escrow not found: {0}")]
    EscrowNotFound(EscrowId),

    /// The requested segment is not after the last filled one.
    #[error("FS_ERR_303: Segment already filled: requested {requested}, last filled {last_filled}")]
    SegmentAlreadyFilled { requested: usize, last_filled: usize },

    /// The full-fill segment was requested after a partial fill.
    #[error("FS_ERR_304: Full-fill segment unavailable after partial fill up to {last_filled}")]
    FullFillAfterPartial { last_filled: usize },

    /// The auction start time has not been reached.
    #[error("FS_ERR_305: Auction starts at {start_time}, now {now}")]
    AuctionNotStarted { start_time: Timestamp, now: Timestamp },

    /// Withdrawal attempted outside a withdrawal phase.
    #[error("FS_ERR_306: Withdrawal not open during {phase}")]
    WithdrawalNotOpen { phase: TimelockPhase },

    /// Recovery attempted outside a cancellation phase.
    #[error("FS_ERR_307: Recovery not open during {phase}")]
    CancellationNotOpen { phase: TimelockPhase },

    /// The host clock went backwards.
    #[error("FS_ERR_308: Clock rewound from {last} to {now}")]
    ClockRewound { last: Timestamp, now: Timestamp },

    // =================================================================
    // Custody Errors (4xx)
    // =================================================================
    /// Not enough balance to perform the transfer.
    #[error("FS_ERR_400: Insufficient {asset} balance for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        holder: String,
        asset: String,
        needed: Amount,
        available: Amount,
    },

    /// Funds of one asset were offered where another was expected.
    #[error("FS_ERR_401: Asset mismatch: expected {expected}, got {actual}")]
    AssetMismatch { expected: String, actual: String },

    /// Supply conservation invariant violated.
    #[error("FS_ERR_402: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("FS_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("FS_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("FS_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl SwapError {
    /// Stable numeric code, matching the `FS_ERR_` prefix.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::ZeroAmount { .. } => 100,
            Self::EmptySegmentSet => 101,
            Self::IndivisibleSegments { .. } => 102,
            Self::InvalidAuctionCurve { .. } => 103,
            Self::InvalidHashLock { .. } => 104,
            Self::InvalidSegmentIndex { .. } => 105,
            Self::EmptyWhitelist => 106,
            Self::TooManySegments { .. } => 107,
            Self::InvalidDeadline { .. } => 108,
            Self::InvalidDurations { .. } => 109,
            Self::ArithmeticOverflow { .. } => 110,
            Self::NotMaker { .. } => 200,
            Self::NotWhitelisted { .. } => 201,
            Self::NotTaker { .. } => 202,
            Self::AutoCancelNotReached { .. } => 203,
            Self::InvalidSecret => 204,
            Self::AuctionNotFound(_) => 300,
            Self::OrderNotFound(_) => 301,
            Self::EscrowNotFound(_) => 302,
            Self::SegmentAlreadyFilled { .. } => 303,
            Self::FullFillAfterPartial { .. } => 304,
            Self::AuctionNotStarted { .. } => 305,
            Self::WithdrawalNotOpen { .. } => 306,
            Self::CancellationNotOpen { .. } => 307,
            Self::ClockRewound { .. } => 308,
            Self::InsufficientBalance { .. } => 400,
            Self::AssetMismatch { .. } => 401,
            Self::SupplyInvariantViolation { .. } => 402,
            Self::Internal(_) => 900,
            Self::Serialization(_) => 901,
            Self::Configuration(_) => 902,
        }
    }

    /// The error group, derived from the code's hundreds digit.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.code() / 100 {
            1 => ErrorKind::Validation,
            2 => ErrorKind::Authorization,
            3 => ErrorKind::State,
            4 => ErrorKind::Custody,
            _ => ErrorKind::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
