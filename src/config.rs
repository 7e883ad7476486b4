// Transaction policy: gas and placeholder signature values applied by the builders

use crate::constants::tx_defaults;
use crate::error::{CodecError, Result};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Policy defaults for built transactions
///
/// Fields missing from a JSON policy keep their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxPolicy {
    /// Gas price for every built transaction
    pub gas_price: U256,

    /// Gas limit for contract creation
    pub create_gas_limit: U256,

    /// Gas limit for calls and transfers
    pub call_gas_limit: U256,

    /// Placeholder `v` of the attached signature; `r` and `s` are zero
    pub v: U256,
}

impl Default for TxPolicy {
    fn default() -> Self {
        Self {
            gas_price: U256::from(tx_defaults::GAS_PRICE),
            create_gas_limit: U256::from(tx_defaults::CREATE_GAS_LIMIT),
            call_gas_limit: U256::from(tx_defaults::CALL_GAS_LIMIT),
            v: U256::from(tx_defaults::PLACEHOLDER_V),
        }
    }
}

impl TxPolicy {
    /// Parse and validate a JSON policy
    pub fn from_json_str(json: &str) -> Result<Self> {
        let policy: TxPolicy = serde_json::from_str(json)
            .map_err(|e| CodecError::malformed(format!("invalid policy JSON: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject policies whose gas limits could never pay for a transaction
    pub fn validate(&self) -> Result<()> {
        if self.create_gas_limit.is_zero() {
            return Err(CodecError::out_of_range("create_gas_limit must be positive"));
        }
        if self.call_gas_limit.is_zero() {
            return Err(CodecError::out_of_range("call_gas_limit must be positive"));
        }
        Ok(())
    }
}
