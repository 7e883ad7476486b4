// Keccak256 hash utilities
// Ethereum-compatible Keccak256 on top of the generic sponge

use crate::utils::sponge::KeccakSponge;
use rayon::prelude::*;

/// Compute Keccak256 hash of input bytes
/// Returns 32-byte hash
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let digest = KeccakSponge::KECCAK_256.hash(input);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Compute Keccak256 and return as hex string
pub fn keccak256_hex(input: &[u8]) -> String {
    hex::encode(keccak256(input))
}

/// Hash independent inputs in parallel, preserving input order
pub fn keccak256_batch<T>(inputs: &[T]) -> Vec<[u8; 32]>
where
    T: AsRef<[u8]> + Sync,
{
    log::trace!("hashing batch of {} inputs", inputs.len());
    inputs
        .par_iter()
        .map(|input| keccak256(input.as_ref()))
        .collect()
}
