// Constants for the Keccak permutation, the RLP prefix layout and the
// transaction policy defaults used by the builders

/// Keccak-f round constants, one per round. Permutations on lanes narrower
/// than 64 bits use the low bits of the first `rounds` entries.
pub const ROUND_CONSTANTS: [u64; 24] = [
    0x0000000000000001, 0x0000000000008082, 0x800000000000808a,
    0x8000000080008000, 0x000000000000808b, 0x0000000080000001,
    0x8000000080008081, 0x8000000000008009, 0x000000000000008a,
    0x0000000000000088, 0x0000000080008009, 0x000000008000000a,
    0x000000008000808b, 0x800000000000008b, 0x8000000000008089,
    0x8000000000008003, 0x8000000000008002, 0x8000000000000080,
    0x000000000000800a, 0x800000008000000a, 0x8000000080008081,
    0x8000000000008080, 0x0000000080000001, 0x8000000080008008,
];

/// Rotation offsets indexed `[x][y]`, reduced modulo the lane width at use.
pub const ROTATION_OFFSETS: [[u32; 5]; 5] = [
    [0, 36, 3, 41, 18],
    [1, 44, 10, 45, 2],
    [62, 6, 43, 15, 61],
    [28, 55, 25, 21, 56],
    [27, 20, 39, 8, 14],
];

/// Keccak-256 as used by Ethereum: rate 1088, capacity 512, output 256 bits
pub mod keccak256_params {
    pub const RATE_BITS: usize = 1088;
    pub const CAPACITY_BITS: usize = 512;
    pub const OUTPUT_BITS: usize = 256;

    /// Rate in bytes (one absorbed block)
    pub const RATE_BYTES: usize = RATE_BITS / 8;
}

/// RLP prefix layout
pub mod rlp_prefix {
    /// Header base for byte strings
    pub const STRING_BASE: u8 = 0x80;

    /// Header base for lists
    pub const LIST_BASE: u8 = 0xc0;

    /// Largest payload that still fits a single-byte header
    pub const SHORT_PAYLOAD_MAX: usize = 55;

    /// First header byte of the long string form (0x80 + 55 + 1)
    pub const LONG_STRING_OFFSET: u8 = 0xb7;

    /// First header byte of the long list form (0xc0 + 55 + 1)
    pub const LONG_LIST_OFFSET: u8 = 0xf7;

    /// Deepest list nesting the decoder accepts
    pub const MAX_NESTING_DEPTH: usize = 1024;
}

/// Defaults applied by the transaction builders when no policy file is given
pub mod tx_defaults {
    pub const GAS_PRICE: u64 = 1;

    /// Gas limit for contract creation transactions
    pub const CREATE_GAS_LIMIT: u64 = 10_000_000;

    /// Gas limit for calls and value transfers
    pub const CALL_GAS_LIMIT: u64 = 100_000;

    /// Placeholder `v` attached to unsigned submissions; `r` and `s` stay zero.
    pub const PLACEHOLDER_V: u64 = 27;
}

/// Byte width of an Ethereum address
pub const ADDRESS_BYTES: usize = 20;

/// Byte width of a 256-bit word
pub const WORD_BYTES: usize = 32;

/// Byte width of a method selector
pub const SELECTOR_BYTES: usize = 4;

/// Function signatures used by the token builders
pub mod signatures {
    pub const WRAP: &str = "wrap()";
    pub const UNWRAP: &str = "unwrap(uint256)";
    pub const TRANSFER: &str = "transfer(address,uint256)";
}
