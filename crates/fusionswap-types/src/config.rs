//! Protocol configuration.

use serde::{Deserialize, Serialize};

use crate::{AssetKind, PhaseDurations, Result, SwapError, constants};

/// Configuration for a FusionSwap protocol instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Asset in which every safety deposit is posted.
    pub safety_deposit_asset: AssetKind,
    /// Upper bound on segment hashes per order or auction.
    pub max_segments: usize,
    /// Escrow schedule used when an order does not carry its own.
    pub default_escrow_durations: PhaseDurations,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            safety_deposit_asset: constants::DEFAULT_SAFETY_DEPOSIT_ASSET.to_string(),
            max_segments: constants::MAX_SEGMENTS,
            default_escrow_durations: PhaseDurations::default(),
        }
    }
}

impl ProtocolConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    /// `Configuration` if the JSON is malformed or the values are unusable.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SwapError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// `Configuration` describing the first unusable value.
    pub fn validate(&self) -> Result<()> {
        if self.safety_deposit_asset.is_empty() {
            return Err(SwapError::Configuration(
                "safety_deposit_asset is empty".into(),
            ));
        }
        if self.max_segments == 0 || self.max_segments > constants::MAX_SEGMENTS {
            return Err(SwapError::Configuration(format!(
                "max_segments must be in 1..={}, got {}",
                constants::MAX_SEGMENTS,
                self.max_segments
            )));
        }
        self.default_escrow_durations
            .validate()
            .map_err(|e| SwapError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ProtocolConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.safety_deposit_asset, "NATIVE");
        assert_eq!(cfg.default_escrow_durations.finality, 3600);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let cfg = ProtocolConfig::from_json(r#"{"max_segments": 16}"#).unwrap();
        assert_eq!(cfg.max_segments, 16);
        assert_eq!(cfg.safety_deposit_asset, "NATIVE");
    }

    #[test]
    fn from_json_rejects_bad_values() {
        let err = ProtocolConfig::from_json(r#"{"max_segments": 0}"#).unwrap_err();
        assert!(matches!(err, SwapError::Configuration(_)));

        let err = ProtocolConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, SwapError::Configuration(_)));

        let err = ProtocolConfig::from_json(
            r#"{"default_escrow_durations": {"finality": 1, "exclusive_withdrawal": 0,
                 "public_withdrawal": 0, "private_cancellation": 1}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exclusive withdrawal"));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = ProtocolConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(ProtocolConfig::from_json(&json).unwrap(), cfg);
    }
}
