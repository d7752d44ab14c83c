// Bridge settings
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on the initial scratch reservation (vertices).
pub const MAX_SCRATCH_VERTICES: usize = 1 << 22;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Vertices reserved in the assembler scratch at init.
    pub scratch_vertices: usize,
    /// Level used when a call carries a token the bridge does not know.
    pub unknown_token_level: TokenLogLevel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenLogLevel {
    Warn,
    Debug,
}

impl From<TokenLogLevel> for log::Level {
    fn from(level: TokenLogLevel) -> Self {
        match level {
            TokenLogLevel::Warn => log::Level::Warn,
            TokenLogLevel::Debug => log::Level::Debug,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            scratch_vertices: 1024,
            unknown_token_level: TokenLogLevel::Warn,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scratch_vertices > MAX_SCRATCH_VERTICES {
            return Err(BridgeError::Config(format!(
                "scratch_vertices {} exceeds {}",
                self.scratch_vertices, MAX_SCRATCH_VERTICES
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: BridgeConfig = serde_json::from_str(r#"{"unknown_token_level":"debug"}"#).unwrap();
        assert_eq!(cfg.scratch_vertices, 1024);
        assert_eq!(cfg.unknown_token_level, TokenLogLevel::Debug);
    }

    #[test]
    fn oversized_scratch_is_rejected() {
        let cfg = BridgeConfig {
            scratch_vertices: MAX_SCRATCH_VERTICES + 1,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(BridgeError::Config(_))));
        assert!(BridgeConfig::default().validate().is_ok());
    }
}
