// Transaction builders for deployment and token operations
//
// Every built transaction carries the policy's placeholder signature
// (v = policy.v, r = 0, s = 0), so the encoding always ends with v, r, s.

use crate::config::TxPolicy;
use crate::constants::{signatures, ADDRESS_BYTES, WORD_BYTES};
use crate::txn::legacy::{Signature, Transaction};
use crate::utils::bytes::u256_word;
use crate::utils::derive::method_selector;
use alloy_primitives::{Address, Bytes, U256};

/// Builds transactions with gas and signature values taken from a policy
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    policy: TxPolicy,
}

impl TxBuilder {
    pub fn new(policy: TxPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TxPolicy {
        &self.policy
    }

    /// Contract creation: `to` is empty, payload is the init code followed by
    /// the 32-byte initial supply when a non-zero one is given
    pub fn contract_creation(
        &self,
        nonce: U256,
        bytecode: &[u8],
        supply: Option<U256>,
    ) -> Transaction {
        let mut data = bytecode.to_vec();
        if let Some(supply) = supply.filter(|supply| !supply.is_zero()) {
            data.extend_from_slice(&u256_word(supply));
        }
        log::debug!(
            "building contract creation nonce={nonce} code={} bytes",
            bytecode.len()
        );
        self.assemble(nonce, self.policy.create_gas_limit, None, U256::ZERO, data)
    }

    /// Plain call or value transfer to `to`
    pub fn call(&self, nonce: U256, to: Address, value: U256, data: Vec<u8>) -> Transaction {
        log::debug!("building call nonce={nonce} to={to} value={value}");
        self.assemble(nonce, self.policy.call_gas_limit, Some(to), value, data)
    }

    /// Wrap `amount` of native value into the token contract
    pub fn wrap_native(&self, nonce: U256, contract: Address, amount: U256) -> Transaction {
        let data = method_selector(signatures::WRAP).to_vec();
        self.call(nonce, contract, amount, data)
    }

    /// Unwrap `amount` tokens back to native value
    pub fn unwrap_native(&self, nonce: U256, contract: Address, amount: U256) -> Transaction {
        let mut data = method_selector(signatures::UNWRAP).to_vec();
        data.extend_from_slice(&u256_word(amount));
        self.call(nonce, contract, U256::ZERO, data)
    }

    /// ERC-20 style `transfer(to, amount)` on the token contract
    pub fn token_transfer(
        &self,
        nonce: U256,
        contract: Address,
        to: Address,
        amount: U256,
    ) -> Transaction {
        let mut data = method_selector(signatures::TRANSFER).to_vec();
        data.extend_from_slice(&address_word(to));
        data.extend_from_slice(&u256_word(amount));
        self.call(nonce, contract, U256::ZERO, data)
    }

    /// Native value transfer with an empty payload
    pub fn native_transfer(&self, nonce: U256, to: Address, amount: U256) -> Transaction {
        self.call(nonce, to, amount, Vec::new())
    }

    fn assemble(
        &self,
        nonce: U256,
        gas_limit: U256,
        to: Option<Address>,
        value: U256,
        data: Vec<u8>,
    ) -> Transaction {
        Transaction {
            nonce,
            gas_price: self.policy.gas_price,
            gas_limit,
            to,
            value,
            data: Bytes::from(data),
            signature: Some(self.placeholder_signature()),
        }
    }

    fn placeholder_signature(&self) -> Signature {
        Signature {
            v: self.policy.v,
            r: U256::ZERO,
            s: U256::ZERO,
        }
    }
}

/// Address left-padded to a 32-byte ABI word
fn address_word(address: Address) -> [u8; WORD_BYTES] {
    let mut word = [0u8; WORD_BYTES];
    word[WORD_BYTES - ADDRESS_BYTES..].copy_from_slice(address.as_slice());
    word
}
