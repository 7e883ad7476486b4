// Conversions between byte sequences, hex text and 256-bit unsigned integers
//
// The minimal encoding (big-endian, no leading zero byte, zero as the empty
// sequence) is what RLP and every transaction field rely on.

use crate::constants::{ADDRESS_BYTES, WORD_BYTES};
use crate::error::{CodecError, Result};
use alloy_primitives::{Address, U256};
use num_bigint::{BigInt, Sign};
use num_traits::Num;

/// Decode hex text into bytes
///
/// An optional `0x` prefix is stripped and an odd number of digits is
/// treated as if a leading zero nibble were present.
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>> {
    let digits = strip_hex_prefix(text);
    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    decoded.map_err(|e| CodecError::malformed(format!("{text:?} is not hex: {e}")))
}

/// Encode bytes as lowercase hex without prefix
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Interpret bytes as a big-endian unsigned integer
///
/// Leading zero bytes are accepted; the value itself must stay below 2^256.
pub fn bytes_to_integer(bytes: &[u8]) -> Result<U256> {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    U256::try_from_be_slice(&bytes[first..]).ok_or_else(|| {
        CodecError::out_of_range(format!(
            "{} byte big-endian value exceeds 2^256 - 1",
            bytes.len()
        ))
    })
}

/// Encode an integer big-endian
///
/// With `length` the output is left-padded with zeros to exactly that many
/// bytes. Without it the minimal encoding is produced.
pub fn integer_to_bytes(value: U256, length: Option<usize>) -> Result<Vec<u8>> {
    let minimal = minimal_bytes(value);
    match length {
        None => Ok(minimal),
        Some(len) if minimal.len() > len => Err(CodecError::out_of_range(format!(
            "{value} needs {} bytes, only {len} requested",
            minimal.len()
        ))),
        Some(len) => {
            let mut out = vec![0u8; len - minimal.len()];
            out.extend_from_slice(&minimal);
            Ok(out)
        }
    }
}

/// Minimal big-endian encoding: no leading zero byte, zero is empty
pub fn minimal_bytes(value: U256) -> Vec<u8> {
    let word = value.to_be_bytes::<WORD_BYTES>();
    let first = word.iter().position(|&b| b != 0).unwrap_or(WORD_BYTES);
    word[first..].to_vec()
}

/// Full 32-byte big-endian word, as used for ABI arguments
pub fn u256_word(value: U256) -> [u8; WORD_BYTES] {
    value.to_be_bytes::<WORD_BYTES>()
}

/// Parse a decimal or `0x`-hex quantity of arbitrary length
///
/// Values are parsed at arbitrary precision first so that negative numbers
/// and numbers beyond 2^256 - 1 are reported rather than wrapped.
pub fn parse_quantity(text: &str) -> Result<U256> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (radix, digits) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex_digits) => (16, hex_digits),
        None => (10, unsigned),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) || digits.contains('_') {
        return Err(CodecError::malformed(format!("{text:?} is not a quantity")));
    }

    let magnitude = BigInt::from_str_radix(digits, radix)
        .map_err(|e| CodecError::malformed(format!("{text:?} is not a quantity: {e}")))?;
    let value = if negative { -magnitude } else { magnitude };

    let (sign, bytes) = value.to_bytes_be();
    if sign == Sign::Minus {
        return Err(CodecError::out_of_range(format!("{text} is negative")));
    }
    if bytes.len() > WORD_BYTES {
        return Err(CodecError::out_of_range(format!("{text} exceeds 2^256 - 1")));
    }
    bytes_to_integer(&bytes)
}

/// Parse a hex address, which must decode to exactly 20 bytes
pub fn parse_address(text: &str) -> Result<Address> {
    address_from_slice(&hex_to_bytes(text)?)
}

/// Build an address from raw bytes, which must be exactly 20 long
pub fn address_from_slice(bytes: &[u8]) -> Result<Address> {
    if bytes.len() != ADDRESS_BYTES {
        return Err(CodecError::InvalidAddressLength {
            length: bytes.len(),
        });
    }
    Ok(Address::from_slice(bytes))
}

fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_bytes_odd_length() {
        assert_eq!(hex_to_bytes("abc").unwrap(), vec![0x0a, 0xbc]);
        assert_eq!(hex_to_bytes("0x1").unwrap(), vec![0x01]);
        assert_eq!(hex_to_bytes("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_hex_to_bytes_rejects_non_hex() {
        let err = hex_to_bytes("0xzz").unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput { .. }));
    }

    #[test]
    fn test_bytes_to_hex() {
        assert_eq!(bytes_to_hex(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn test_minimal_bytes() {
        assert!(minimal_bytes(U256::ZERO).is_empty());
        assert_eq!(minimal_bytes(U256::from(1u64)), vec![0x01]);
        assert_eq!(minimal_bytes(U256::from(256u64)), vec![0x01, 0x00]);
        assert_eq!(minimal_bytes(U256::from(1024u64)), vec![0x04, 0x00]);
        assert_eq!(minimal_bytes(U256::MAX), vec![0xff; 32]);
    }

    #[test]
    fn test_integer_to_bytes_fixed_length() {
        let padded = integer_to_bytes(U256::from(27u64), Some(4)).unwrap();
        assert_eq!(padded, vec![0, 0, 0, 27]);

        let zero = integer_to_bytes(U256::ZERO, Some(2)).unwrap();
        assert_eq!(zero, vec![0, 0]);

        let err = integer_to_bytes(U256::from(0x1_0000u64), Some(2)).unwrap_err();
        assert!(matches!(err, CodecError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_bytes_to_integer() {
        assert_eq!(bytes_to_integer(&[]).unwrap(), U256::ZERO);
        assert_eq!(bytes_to_integer(&[0, 0, 1, 0]).unwrap(), U256::from(256u64));

        let mut wide = vec![0u8; 40];
        wide[39] = 7;
        assert_eq!(bytes_to_integer(&wide).unwrap(), U256::from(7u64));

        wide[0] = 1;
        assert!(matches!(
            bytes_to_integer(&wide),
            Err(CodecError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0").unwrap(), U256::ZERO);
        assert_eq!(parse_quantity("1000").unwrap(), U256::from(1000u64));
        assert_eq!(parse_quantity("0x3e8").unwrap(), U256::from(1000u64));
        assert_eq!(
            parse_quantity("115792089237316195423570985008687907853269984665640564039457584007913129639935")
                .unwrap(),
            U256::MAX
        );
    }

    #[test]
    fn test_parse_quantity_out_of_range() {
        let too_big =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(
            parse_quantity(too_big),
            Err(CodecError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            parse_quantity("-1"),
            Err(CodecError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            parse_quantity("12a"),
            Err(CodecError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_quantity(""),
            Err(CodecError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_parse_quantity_rejects_digit_separators() {
        for text in ["1_000", "0x3_e8", "1000_"] {
            assert!(
                matches!(parse_quantity(text), Err(CodecError::MalformedInput { .. })),
                "{text}"
            );
        }
    }

    #[test]
    fn test_parse_address() {
        let address = parse_address("0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0").unwrap();
        assert_eq!(address.as_slice()[0], 0x6a);

        assert_eq!(
            parse_address("0x1234"),
            Err(CodecError::InvalidAddressLength { length: 2 })
        );
    }
}
