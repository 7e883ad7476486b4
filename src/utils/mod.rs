// Hashing and encoding primitives

pub mod bytes;
pub mod sponge;
pub mod keccak;
pub mod rlp;
pub mod derive;
