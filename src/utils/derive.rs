// Address and selector derivation
//
// The contract address is the low 20 bytes of:
//   keccak256(rlp([sender, minimal(nonce)]))

use crate::constants::{ADDRESS_BYTES, SELECTOR_BYTES};
use crate::error::Result;
use crate::utils::bytes::address_from_slice;
use crate::utils::keccak::keccak256;
use crate::utils::rlp::RlpValue;
use alloy_primitives::{Address, U256};

/// Compute the address of a contract created by `sender` at `nonce`
pub fn contract_address(sender: Address, nonce: U256) -> Result<Address> {
    let encoded = RlpValue::list([
        RlpValue::bytes(sender.as_slice()),
        RlpValue::uint(nonce),
    ])
    .encode()?;
    let hash = keccak256(&encoded);

    // Take the low-order 20 bytes as the address
    let mut address_bytes = [0u8; ADDRESS_BYTES];
    address_bytes.copy_from_slice(&hash[32 - ADDRESS_BYTES..]);

    Ok(Address::from(address_bytes))
}

/// Same as [`contract_address`] for a sender given as raw bytes
///
/// Fails with `InvalidAddressLength` unless the sender is exactly 20 bytes.
pub fn contract_address_from_slice(sender: &[u8], nonce: U256) -> Result<Address> {
    contract_address(address_from_slice(sender)?, nonce)
}

/// First 4 bytes of the Keccak256 hash of a function signature
pub fn method_selector(signature: &str) -> [u8; SELECTOR_BYTES] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; SELECTOR_BYTES];
    selector.copy_from_slice(&hash[..SELECTOR_BYTES]);
    selector
}
