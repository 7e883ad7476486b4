// Legacy transaction codec
//
// Wire form is the positional RLP list
//   [nonce, gasprice, gaslimit, to, value, data]
// with [v, r, s] appended when the transaction carries a signature.

use crate::constants::WORD_BYTES;
use crate::error::{CodecError, Result};
use crate::utils::bytes::{address_from_slice, bytes_to_hex, bytes_to_integer, hex_to_bytes};
use crate::utils::keccak::keccak256;
use crate::utils::rlp::{self, RlpValue};
use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Number of fields of an unsigned transaction
const UNSIGNED_FIELDS: usize = 6;

/// Number of fields of a signed transaction
const SIGNED_FIELDS: usize = 9;

/// First `v` value that carries an EIP-155 chain id
const EIP155_V_OFFSET: u64 = 35;

/// Signature triple; all three are present together or not at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub v: U256,
    pub r: U256,
    pub s: U256,
}

impl Signature {
    /// All three fields encode as empty strings, which the wire form
    /// cannot tell apart from an absent signature
    pub fn is_empty(&self) -> bool {
        self.v.is_zero() && self.r.is_zero() && self.s.is_zero()
    }
}

/// A legacy (pre-typed-envelope) transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,

    /// Recipient; `None` creates a contract
    pub to: Option<Address>,

    pub value: U256,

    /// Call data or init code, passed through unmodified
    pub data: Bytes,

    pub signature: Option<Signature>,
}

impl Transaction {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// Field list in wire order
    ///
    /// An empty signature (`v`, `r` and `s` all zero) is omitted entirely.
    pub fn fields(&self) -> Vec<RlpValue> {
        let mut fields = self.unsigned_fields();
        if let Some(signature) = self.signature.filter(|sig| !sig.is_empty()) {
            fields.extend([
                RlpValue::uint(signature.v),
                RlpValue::uint(signature.r),
                RlpValue::uint(signature.s),
            ]);
        }
        fields
    }

    fn unsigned_fields(&self) -> Vec<RlpValue> {
        let to = match &self.to {
            Some(address) => RlpValue::bytes(address.as_slice()),
            None => RlpValue::bytes(Vec::new()),
        };
        vec![
            RlpValue::uint(self.nonce),
            RlpValue::uint(self.gas_price),
            RlpValue::uint(self.gas_limit),
            to,
            RlpValue::uint(self.value),
            RlpValue::bytes(self.data.to_vec()),
        ]
    }

    pub fn to_rlp(&self) -> RlpValue {
        RlpValue::List(self.fields())
    }

    /// RLP-encode the transaction
    pub fn encode(&self) -> Result<Vec<u8>> {
        let encoded = self.to_rlp().encode()?;
        log::debug!(
            "encoded transaction nonce={} create={} signed={} ({} bytes)",
            self.nonce,
            self.is_contract_creation(),
            self.signature.is_some_and(|sig| !sig.is_empty()),
            encoded.len()
        );
        Ok(encoded)
    }

    /// RLP-encode and render as lowercase hex
    pub fn encode_hex(&self) -> Result<String> {
        Ok(bytes_to_hex(&self.encode()?))
    }

    /// Transaction hash: Keccak256 of the encoding
    pub fn hash(&self) -> Result<[u8; 32]> {
        Ok(keccak256(&self.encode()?))
    }

    /// Hash covered by the signature
    ///
    /// With a chain id the EIP-155 triple `[chain_id, 0, 0]` is appended to
    /// the unsigned fields.
    pub fn signing_hash(&self, chain_id: Option<u64>) -> Result<[u8; 32]> {
        let mut fields = self.unsigned_fields();
        if let Some(chain_id) = chain_id {
            fields.extend([
                RlpValue::uint(U256::from(chain_id)),
                RlpValue::bytes(Vec::new()),
                RlpValue::bytes(Vec::new()),
            ]);
        }
        Ok(keccak256(&RlpValue::List(fields).encode()?))
    }

    /// Chain id carried by an EIP-155 `v` (`v = chain_id * 2 + 35 + parity`)
    pub fn chain_id(&self) -> Option<u64> {
        let v = self.signature.as_ref()?.v;
        if v < U256::from(EIP155_V_OFFSET) {
            return None;
        }
        let chain_id: U256 = (v - U256::from(EIP155_V_OFFSET)) / U256::from(2u64);
        u64::try_from(chain_id).ok()
    }

    /// Decode a canonical RLP transaction
    pub fn decode(input: &[u8]) -> Result<Self> {
        let value = rlp::decode(input)?;
        let fields = value
            .as_list()
            .ok_or_else(|| invalid("transaction is not an RLP list"))?;

        let (base, signature) = match fields.len() {
            UNSIGNED_FIELDS => (fields, None),
            SIGNED_FIELDS => (&fields[..UNSIGNED_FIELDS], Some(&fields[UNSIGNED_FIELDS..])),
            count => {
                return Err(invalid(format!(
                    "expected {UNSIGNED_FIELDS} or {SIGNED_FIELDS} fields, found {count}"
                )))
            }
        };

        let to = match field_bytes(&base[3], "to")? {
            [] => None,
            bytes => Some(address_from_slice(bytes)?),
        };

        if let Some(triple) = signature {
            if triple.iter().all(|field| field.as_bytes() == Some(&[][..])) {
                return Err(CodecError::NonCanonicalEncoding {
                    reason: "empty v, r and s must be omitted",
                });
            }
        }

        let signature = signature
            .map(|triple| -> Result<Signature> {
                Ok(Signature {
                    v: decode_uint(&triple[0], "v")?,
                    r: decode_uint(&triple[1], "r")?,
                    s: decode_uint(&triple[2], "s")?,
                })
            })
            .transpose()?;

        let tx = Transaction {
            nonce: decode_uint(&base[0], "nonce")?,
            gas_price: decode_uint(&base[1], "gasprice")?,
            gas_limit: decode_uint(&base[2], "gaslimit")?,
            to,
            value: decode_uint(&base[4], "value")?,
            data: Bytes::copy_from_slice(field_bytes(&base[5], "data")?),
            signature,
        };
        log::debug!(
            "decoded transaction nonce={} create={} signed={}",
            tx.nonce,
            tx.is_contract_creation(),
            tx.signature.is_some()
        );
        Ok(tx)
    }

    /// Decode from hex text (optional `0x` prefix)
    pub fn decode_hex(text: &str) -> Result<Self> {
        Self::decode(&hex_to_bytes(text)?)
    }
}

fn invalid(reason: impl Into<String>) -> CodecError {
    CodecError::InvalidTransaction {
        reason: reason.into(),
    }
}

fn field_bytes<'a>(field: &'a RlpValue, name: &str) -> Result<&'a [u8]> {
    field
        .as_bytes()
        .ok_or_else(|| invalid(format!("{name} must be a byte string")))
}

/// Integer fields must be minimal and at most 32 bytes wide
fn decode_uint(field: &RlpValue, name: &str) -> Result<U256> {
    let bytes = field_bytes(field, name)?;
    if bytes.first() == Some(&0) {
        return Err(CodecError::NonCanonicalEncoding {
            reason: "integer field has a leading zero byte",
        });
    }
    if bytes.len() > WORD_BYTES {
        return Err(CodecError::out_of_range(format!(
            "{name} is {} bytes wide",
            bytes.len()
        )));
    }
    bytes_to_integer(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-155 example transaction
    const EIP155_SIGNED: &str = "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

    fn eip155_transaction() -> Transaction {
        Transaction {
            nonce: U256::from(9u64),
            gas_price: U256::from(20_000_000_000u64),
            gas_limit: U256::from(21_000u64),
            to: Some(Address::repeat_byte(0x35)),
            value: U256::from(1_000_000_000_000_000_000u64),
            data: Bytes::new(),
            signature: Some(Signature {
                v: U256::from(37u64),
                r: "0x28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276"
                    .parse()
                    .unwrap(),
                s: "0x67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
                    .parse()
                    .unwrap(),
            }),
        }
    }

    #[test]
    fn test_encode_eip155_vector() {
        assert_eq!(eip155_transaction().encode_hex().unwrap(), EIP155_SIGNED);
    }

    #[test]
    fn test_signing_hash_eip155() {
        let hash = eip155_transaction().signing_hash(Some(1)).unwrap();
        assert_eq!(
            hex::encode(hash),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn test_transaction_hash() {
        let hash = eip155_transaction().hash().unwrap();
        assert_eq!(
            hex::encode(hash),
            "33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788"
        );
    }

    #[test]
    fn test_chain_id_from_v() {
        assert_eq!(eip155_transaction().chain_id(), Some(1));

        let mut legacy = eip155_transaction();
        legacy.signature = Some(Signature {
            v: U256::from(27u64),
            r: U256::ZERO,
            s: U256::ZERO,
        });
        assert_eq!(legacy.chain_id(), None);

        legacy.signature = None;
        assert_eq!(legacy.chain_id(), None);
    }

    #[test]
    fn test_unsigned_omits_signature_fields() {
        let mut tx = eip155_transaction();
        tx.signature = None;
        assert_eq!(tx.fields().len(), 6);

        let encoded = tx.encode().unwrap();
        let decoded = rlp::decode(&encoded).unwrap();
        assert_eq!(decoded.as_list().unwrap().len(), 6);
    }

    #[test]
    fn test_empty_signature_is_omitted() {
        let mut tx = eip155_transaction();
        tx.signature = None;
        let unsigned = tx.encode_hex().unwrap();

        tx.signature = Some(Signature {
            v: U256::ZERO,
            r: U256::ZERO,
            s: U256::ZERO,
        });
        assert!(tx.signature.unwrap().is_empty());
        assert_eq!(tx.fields().len(), 6);
        assert_eq!(tx.encode_hex().unwrap(), unsigned);

        let blank = Transaction {
            signature: tx.signature,
            ..Transaction::default()
        };
        assert_eq!(blank.encode_hex().unwrap(), "c6808080808080");
    }

    #[test]
    fn test_partially_zero_signature_is_kept() {
        let mut tx = eip155_transaction();
        tx.signature = Some(Signature {
            v: U256::from(27u64),
            r: U256::ZERO,
            s: U256::ZERO,
        });
        assert_eq!(tx.fields().len(), 9);
        assert!(tx.encode_hex().unwrap().ends_with("1b8080"));
    }

    #[test]
    fn test_decode_rejects_empty_signature_fields() {
        let encoded = RlpValue::list(vec![RlpValue::bytes(Vec::new()); 9])
            .encode()
            .unwrap();
        assert!(matches!(
            Transaction::decode(&encoded),
            Err(CodecError::NonCanonicalEncoding { .. })
        ));
    }

    #[test]
    fn test_contract_creation_has_empty_to() {
        let tx = Transaction {
            gas_price: U256::from(1u64),
            gas_limit: U256::from(10_000_000u64),
            data: Bytes::from(vec![0x60, 0x00]),
            signature: Some(Signature {
                v: U256::from(27u64),
                r: U256::ZERO,
                s: U256::ZERO,
            }),
            ..Transaction::default()
        };
        assert!(tx.is_contract_creation());
        assert_eq!(tx.encode_hex().unwrap(), "ce80018398968080808260001b8080");
    }

    #[test]
    fn test_decode_roundtrip() {
        let tx = eip155_transaction();
        assert_eq!(Transaction::decode_hex(EIP155_SIGNED).unwrap(), tx);

        let mut unsigned = tx.clone();
        unsigned.signature = None;
        unsigned.to = None;
        let encoded = unsigned.encode().unwrap();
        assert_eq!(Transaction::decode(&encoded).unwrap(), unsigned);
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        // not a list
        assert!(matches!(
            Transaction::decode(&[0x80]),
            Err(CodecError::InvalidTransaction { .. })
        ));

        // seven fields
        let seven = RlpValue::list(vec![RlpValue::bytes(Vec::new()); 7]).encode().unwrap();
        assert!(matches!(
            Transaction::decode(&seven),
            Err(CodecError::InvalidTransaction { .. })
        ));

        // nested list where an integer belongs
        let mut fields = vec![RlpValue::bytes(Vec::new()); 6];
        fields[0] = RlpValue::list([]);
        let nested = RlpValue::List(fields).encode().unwrap();
        assert!(matches!(
            Transaction::decode(&nested),
            Err(CodecError::InvalidTransaction { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_recipient() {
        let mut fields = vec![RlpValue::bytes(Vec::new()); 6];
        fields[3] = RlpValue::bytes(vec![0x11; 19]);
        let encoded = RlpValue::List(fields).encode().unwrap();
        assert_eq!(
            Transaction::decode(&encoded),
            Err(CodecError::InvalidAddressLength { length: 19 })
        );
    }

    #[test]
    fn test_decode_rejects_non_minimal_integers() {
        let mut fields = vec![RlpValue::bytes(Vec::new()); 6];
        fields[0] = RlpValue::bytes(vec![0x00, 0x01]);
        let encoded = RlpValue::List(fields).encode().unwrap();
        assert!(matches!(
            Transaction::decode(&encoded),
            Err(CodecError::NonCanonicalEncoding { .. })
        ));

        let mut fields = vec![RlpValue::bytes(Vec::new()); 6];
        fields[4] = RlpValue::bytes(vec![0x01; 33]);
        let encoded = RlpValue::List(fields).encode().unwrap();
        assert!(matches!(
            Transaction::decode(&encoded),
            Err(CodecError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let tx = eip155_transaction();
        let json = serde_json::to_string(&tx).unwrap();
        let parsed: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tx);
    }
}
