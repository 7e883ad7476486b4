// Error type shared by the hashing, encoding and transaction layers

/// Failures reported by the codec.
///
/// Every operation is a deterministic pure computation, so a failure on a
/// given input always reproduces. Callers propagate these instead of
/// emitting a malformed transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Value out of range: {reason}")]
    ValueOutOfRange { reason: String },

    #[error("Length {length} does not fit in 64 bits")]
    LengthOutOfRange { length: u128 },

    #[error("Invalid address length: {length} bytes, expected 20")]
    InvalidAddressLength { length: usize },

    #[error("Unsupported value for RLP encoding: {kind}")]
    UnsupportedValue { kind: &'static str },

    #[error("Non-canonical encoding: {reason}")]
    NonCanonicalEncoding { reason: &'static str },

    #[error("Unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEnd { needed: usize, available: usize },

    #[error("RLP lists nested deeper than {depth} levels")]
    RecursionLimit { depth: usize },

    #[error("{count} trailing bytes after RLP item")]
    TrailingBytes { count: usize },

    #[error("Invalid transaction: {reason}")]
    InvalidTransaction { reason: String },

    #[error("Invalid sponge parameters: {reason}")]
    InvalidSpongeParameters { reason: String },
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    pub(crate) fn out_of_range(reason: impl Into<String>) -> Self {
        CodecError::ValueOutOfRange {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CodecError::MalformedInput {
            reason: reason.into(),
        }
    }
}
