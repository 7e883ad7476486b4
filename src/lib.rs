// Keccak sponge, RLP codec and legacy transaction assembly
// for Ethereum-style execution layers

pub mod error;
pub mod constants;
pub mod config;
pub mod utils;
pub mod txn;

// Re-export commonly used types
pub use config::TxPolicy;
pub use error::{CodecError, Result};
pub use txn::{Signature, Transaction, TxBuilder};
pub use utils::rlp::RlpValue;
pub use utils::sponge::KeccakSponge;

// Re-export the hashing and derivation entry points
pub use utils::{
    derive::{contract_address, method_selector},
    keccak::{keccak256, keccak256_batch, keccak256_hex},
};
