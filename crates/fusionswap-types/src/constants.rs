//! System-wide constants for the FusionSwap protocol.

/// Default finality phase length in seconds.
pub const DEFAULT_FINALITY_SECS: u64 = 3600;

/// Default exclusive (taker-only) withdrawal window in seconds.
pub const DEFAULT_EXCLUSIVE_WITHDRAWAL_SECS: u64 = 1800;

/// Default public withdrawal window in seconds. Zero disables the phase.
pub const DEFAULT_PUBLIC_WITHDRAWAL_SECS: u64 = 0;

/// Default private (taker-only) cancellation window in seconds.
pub const DEFAULT_PRIVATE_CANCELLATION_SECS: u64 = 900;

/// Maximum number of segment hashes per order or auction.
pub const MAX_SEGMENTS: usize = 1024;

/// The auction price curve advances in steps of `1 / PRICE_STEP_SCALE`
/// of the decay window (whole percent).
pub const PRICE_STEP_SCALE: u128 = 100;

/// Asset in which safety deposits are posted unless configured otherwise.
pub const DEFAULT_SAFETY_DEPOSIT_ASSET: &str = "NATIVE";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol name.
pub const PROTOCOL_NAME: &str = "FusionSwap";
