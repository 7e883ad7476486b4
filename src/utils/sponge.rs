// Generic Keccak sponge
//
// Parameterized by rate, capacity and output length (all in bits). Uses the
// multi-rate padding of the Keccak reference submission (0x01 .. 0x80, or a
// single 0x81), not the SHA-3 domain separated padding.

use crate::constants::{keccak256_params, ROTATION_OFFSETS, ROUND_CONSTANTS};
use crate::error::{CodecError, Result};
use itertools::iproduct;

/// 5x5 lanes indexed `[x][y]`; only the low `lane_bits` bits of each are used
type State = [[u64; 5]; 5];

/// A validated Keccak sponge configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeccakSponge {
    rate_bits: usize,
    capacity_bits: usize,
    output_bits: usize,
    lane_bits: usize,
    rounds: usize,
}

impl KeccakSponge {
    /// Keccak-256 (rate 1088, capacity 512, output 256; 64-bit lanes, 24 rounds)
    pub const KECCAK_256: KeccakSponge = KeccakSponge {
        rate_bits: keccak256_params::RATE_BITS,
        capacity_bits: keccak256_params::CAPACITY_BITS,
        output_bits: keccak256_params::OUTPUT_BITS,
        lane_bits: 64,
        rounds: 24,
    };

    /// Validate a configuration
    ///
    /// Rate, capacity and output must be multiples of 8, their state width
    /// `b = rate + capacity` a multiple of 25, and the lane width `b / 25` a
    /// power of two between 8 and 64 that divides the rate.
    pub fn new(rate_bits: usize, capacity_bits: usize, output_bits: usize) -> Result<Self> {
        let invalid = |reason: String| Err(CodecError::InvalidSpongeParameters { reason });

        if rate_bits == 0 {
            return invalid("rate must be positive".to_string());
        }
        for (name, bits) in [
            ("rate", rate_bits),
            ("capacity", capacity_bits),
            ("output", output_bits),
        ] {
            if bits % 8 != 0 {
                return invalid(format!("{name} of {bits} bits is not a multiple of 8"));
            }
        }

        let state_bits = rate_bits + capacity_bits;
        if state_bits % 25 != 0 {
            return invalid(format!("state width {state_bits} is not a multiple of 25"));
        }
        let lane_bits = state_bits / 25;
        if lane_bits % 8 != 0 || !lane_bits.is_power_of_two() || lane_bits > 64 {
            return invalid(format!(
                "lane width {lane_bits} must be a power of two between 8 and 64"
            ));
        }
        if rate_bits % lane_bits != 0 {
            return invalid(format!(
                "rate {rate_bits} is not a whole number of {lane_bits}-bit lanes"
            ));
        }

        let rounds = 12 + 2 * lane_bits.trailing_zeros() as usize;
        Ok(Self {
            rate_bits,
            capacity_bits,
            output_bits,
            lane_bits,
            rounds,
        })
    }

    pub fn rate_bits(&self) -> usize {
        self.rate_bits
    }

    pub fn capacity_bits(&self) -> usize {
        self.capacity_bits
    }

    pub fn output_bits(&self) -> usize {
        self.output_bits
    }

    pub fn lane_bits(&self) -> usize {
        self.lane_bits
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn rate_bytes(&self) -> usize {
        self.rate_bits / 8
    }

    fn lane_bytes(&self) -> usize {
        self.lane_bits / 8
    }

    fn lane_mask(&self) -> u64 {
        if self.lane_bits == 64 {
            u64::MAX
        } else {
            (1u64 << self.lane_bits) - 1
        }
    }

    /// Apply the multi-rate padding so the result is a whole number of blocks
    pub fn pad(&self, message: &[u8]) -> Vec<u8> {
        let rate_bytes = self.rate_bytes();
        let pad = rate_bytes - message.len() % rate_bytes;

        let mut padded = Vec::with_capacity(message.len() + pad);
        padded.extend_from_slice(message);
        if pad > 1 {
            padded.push(0x01);
            padded.resize(padded.len() + pad - 2, 0x00);
            padded.push(0x80);
        } else {
            padded.push(0x81);
        }
        padded
    }

    /// Hash a message, returning exactly `output_bits / 8` bytes
    pub fn hash(&self, message: &[u8]) -> Vec<u8> {
        let mut state: State = [[0u64; 5]; 5];

        for block in self.pad(message).chunks(self.rate_bytes()) {
            self.absorb_block(&mut state, block);
            self.permute(&mut state);
        }

        self.squeeze(&mut state)
    }

    /// XOR one rate-sized block into the state; word `5y + x` goes to lane `[x][y]`
    fn absorb_block(&self, state: &mut State, block: &[u8]) {
        for (index, word) in block.chunks(self.lane_bytes()).enumerate() {
            let (x, y) = (index % 5, index / 5);
            state[x][y] ^= lane_from_le(word);
        }
    }

    fn squeeze(&self, state: &mut State) -> Vec<u8> {
        let output_bytes = self.output_bits / 8;
        let rate_lanes = self.rate_bits / self.lane_bits;
        let mut output = Vec::with_capacity(output_bytes + self.rate_bytes());

        loop {
            for index in 0..rate_lanes {
                let (x, y) = (index % 5, index / 5);
                output.extend_from_slice(&state[x][y].to_le_bytes()[..self.lane_bytes()]);
            }
            if output.len() >= output_bytes {
                break;
            }
            self.permute(state);
        }

        output.truncate(output_bytes);
        output
    }

    /// Keccak-f over `rounds` rounds
    fn permute(&self, state: &mut State) {
        let width = self.lane_bits as u32;
        let mask = self.lane_mask();

        for round_constant in ROUND_CONSTANTS.iter().take(self.rounds) {
            // θ
            let mut parity = [0u64; 5];
            for (x, column) in state.iter().enumerate() {
                parity[x] = column.iter().fold(0, |acc, lane| acc ^ lane);
            }
            for x in 0..5 {
                let d = parity[(x + 4) % 5] ^ rotate_left(parity[(x + 1) % 5], 1, width, mask);
                for lane in state[x].iter_mut() {
                    *lane ^= d;
                }
            }

            // ρ and π
            let mut b: State = [[0u64; 5]; 5];
            for (x, y) in iproduct!(0..5, 0..5) {
                b[y][(2 * x + 3 * y) % 5] =
                    rotate_left(state[x][y], ROTATION_OFFSETS[x][y], width, mask);
            }

            // χ
            for (x, y) in iproduct!(0..5, 0..5) {
                state[x][y] = b[x][y] ^ (!b[(x + 1) % 5][y] & b[(x + 2) % 5][y]);
            }

            // ι
            state[0][0] ^= round_constant & mask;
        }
    }
}

/// Rotate within a `width`-bit lane
fn rotate_left(lane: u64, offset: u32, width: u32, mask: u64) -> u64 {
    let shift = offset % width;
    if width == 64 {
        return lane.rotate_left(shift);
    }
    if shift == 0 {
        return lane;
    }
    ((lane << shift) | (lane >> (width - shift))) & mask
}

/// Little-endian lane value from up to 8 bytes
fn lane_from_le(word: &[u8]) -> u64 {
    word.iter()
        .rev()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_constant_matches_constructor() {
        let built = KeccakSponge::new(1088, 512, 256).unwrap();
        assert_eq!(built, KeccakSponge::KECCAK_256);
        assert_eq!(built.rounds(), 24);
        assert_eq!(built.lane_bits(), 64);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        // rate not a multiple of 8
        assert!(KeccakSponge::new(1084, 516, 256).is_err());
        // state width not a multiple of 25
        assert!(KeccakSponge::new(1088, 520, 256).is_err());
        // lane width 24 is not a power of two
        assert!(KeccakSponge::new(400, 200, 64).is_err());
        // output not byte aligned
        assert!(KeccakSponge::new(1088, 512, 255).is_err());
        assert!(KeccakSponge::new(0, 1600, 256).is_err());
    }

    #[test]
    fn test_round_count_follows_lane_width() {
        assert_eq!(KeccakSponge::new(1344, 256, 256).unwrap().rounds(), 24);
        assert_eq!(KeccakSponge::new(640, 160, 160).unwrap().rounds(), 22);
        assert_eq!(KeccakSponge::new(320, 80, 80).unwrap().rounds(), 20);
        assert_eq!(KeccakSponge::new(160, 40, 40).unwrap().rounds(), 18);
    }

    #[test]
    fn test_pad_two_byte_form() {
        let sponge = KeccakSponge::KECCAK_256;
        let padded = sponge.pad(b"");
        assert_eq!(padded.len(), 136);
        assert_eq!(padded[0], 0x01);
        assert!(padded[1..135].iter().all(|&b| b == 0));
        assert_eq!(padded[135], 0x80);
    }

    #[test]
    fn test_pad_single_byte_boundary() {
        let sponge = KeccakSponge::KECCAK_256;
        let message = [0xaa; 135];
        let padded = sponge.pad(&message);
        assert_eq!(padded.len(), 136);
        assert_eq!(padded[135], 0x81);
    }

    #[test]
    fn test_pad_full_block_adds_block() {
        let sponge = KeccakSponge::KECCAK_256;
        let padded = sponge.pad(&[0u8; 136]);
        assert_eq!(padded.len(), 272);
        assert_eq!(padded[136], 0x01);
        assert_eq!(padded[271], 0x80);
    }

    #[test]
    fn test_rotate_left_narrow_lane() {
        let mask = 0xff;
        assert_eq!(rotate_left(0b1000_0001, 1, 8, mask), 0b0000_0011);
        assert_eq!(rotate_left(0x12, 8, 8, mask), 0x12);
        assert_eq!(rotate_left(0x12, 36, 8, mask), 0x21);
    }

    #[test]
    fn test_lane_from_le() {
        assert_eq!(lane_from_le(&[0x01, 0x02]), 0x0201);
        assert_eq!(
            lane_from_le(&[1, 0, 0, 0, 0, 0, 0, 0x80]),
            0x8000_0000_0000_0001
        );
    }

    #[test]
    fn test_keccak256_empty_digest() {
        let digest = KeccakSponge::KECCAK_256.hash(b"");
        assert_eq!(
            hex::encode(digest),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_extended_output_squeezes_more_blocks() {
        let sponge = KeccakSponge::new(1088, 512, 2048).unwrap();
        let long = sponge.hash(b"abc");
        assert_eq!(long.len(), 256);

        let short = KeccakSponge::KECCAK_256.hash(b"abc");
        assert_eq!(&long[..32], short.as_slice());
    }

    #[test]
    fn test_narrow_lane_instances_are_deterministic() {
        for (rate, capacity) in [(160, 40), (320, 80), (640, 160)] {
            let sponge = KeccakSponge::new(rate, capacity, 64).unwrap();
            let a = sponge.hash(b"keccak");
            let b = sponge.hash(b"keccak");
            assert_eq!(a, b);
            assert_eq!(a.len(), 8);
            assert_ne!(a, sponge.hash(b"keccal"));
        }
    }
}
