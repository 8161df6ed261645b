//! Error types for the Huffman codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Debug, Error)]
pub enum Error {
    /// The container bytes are not a valid layout.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),

    /// The bit stream ran out while the decoder was inside the tree.
    #[error("bit stream ends mid-code after {bits_read} bits")]
    TruncatedCode { bits_read: u64 },

    /// A bit selected a path that does not exist in the tree.
    #[error("invalid code bit at offset {bit_offset}")]
    InvalidCode { bit_offset: u64 },

    #[error("decoded {actual} symbols, expected {expected}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("checksum mismatch: decoded data does not match stored digest")]
    ChecksumMismatch,

    /// Encoding hit a byte the code table knows nothing about.
    #[error("no code for symbol 0x{symbol:02x}")]
    MissingCode { symbol: u8 },

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedContainer(message.into())
    }

    /// True for failures caused by damaged or foreign input on the decode side.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::MalformedContainer(_)
                | Error::UnsupportedVersion(_)
                | Error::TruncatedCode { .. }
                | Error::InvalidCode { .. }
                | Error::LengthMismatch { .. }
                | Error::ChecksumMismatch
        )
    }

    /// Short stable label for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Error::MalformedContainer(_) => "malformed_container",
            Error::UnsupportedVersion(_) => "unsupported_version",
            Error::TruncatedCode { .. } => "truncated_code",
            Error::InvalidCode { .. } => "invalid_code",
            Error::LengthMismatch { .. } => "length_mismatch",
            Error::ChecksumMismatch => "checksum_mismatch",
            Error::MissingCode { .. } => "missing_code",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io_error",
        }
    }
}
