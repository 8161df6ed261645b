//! On-disk layout of a compressed artifact.
//!
//! ```text
//! magic    [u8; 4]   b"HUFP"
//! version  u8
//! symbols  u64 count, then (u8 symbol, u64 count) per entry
//! digest   [u8; 32]  SHA-256 of the original input
//! bit_len  u64       meaningful bits in payload
//! payload  u64 length, then packed bytes
//! ```
//!
//! All integers are fixed-width little-endian, so symbol values such as
//! spaces or newlines can never be confused with field boundaries.

use bincode::Options;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::encoder::EncodedStream;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

pub const MAGIC: [u8; 4] = *b"HUFP";
pub const VERSION: u8 = 1;

#[derive(Serialize, Deserialize)]
struct RawContainer {
    magic: [u8; 4],
    version: u8,
    symbols: Vec<(u8, u64)>,
    digest: [u8; 32],
    bit_len: u64,
    payload: Vec<u8>,
}

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Frequency table, packed stream and input digest, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    frequencies: FrequencyTable,
    stream: EncodedStream,
    digest: [u8; 32],
}

impl Container {
    pub fn new(frequencies: FrequencyTable, stream: EncodedStream, original: &[u8]) -> Self {
        Container {
            frequencies,
            stream,
            digest: digest_of(original),
        }
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn stream(&self) -> &EncodedStream {
        &self.stream
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Length of the data this container decodes to.
    pub fn original_len(&self) -> u64 {
        self.frequencies.total()
    }

    /// Compare `decoded` against the stored digest.
    pub fn verify(&self, decoded: &[u8]) -> Result<()> {
        if digest_of(decoded) != self.digest {
            return Err(Error::ChecksumMismatch);
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let raw = RawContainer {
            magic: MAGIC,
            version: VERSION,
            symbols: self.frequencies.iter().collect(),
            digest: self.digest,
            bit_len: self.stream.bit_len(),
            payload: self.stream.bytes().to_vec(),
        };
        Ok(wire_options().serialize(&raw)?)
    }

    /// Parse and validate container bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes).inspect_err(|err| {
            warn!(category = err.category(), error = %err, "rejected container");
        })
    }

    fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
            return Err(Error::malformed("missing HUFP magic"));
        }

        let raw: RawContainer = wire_options()
            .deserialize(bytes)
            .map_err(|e| Error::malformed(format!("unreadable layout: {e}")))?;

        if raw.version != VERSION {
            return Err(Error::UnsupportedVersion(raw.version));
        }

        let frequencies = FrequencyTable::from_counts(raw.symbols)?;

        let needed = raw.bit_len.div_ceil(8);
        if raw.payload.len() as u64 != needed {
            return Err(Error::malformed(format!(
                "payload is {} bytes but {} bits need {needed}",
                raw.payload.len(),
                raw.bit_len
            )));
        }
        if frequencies.is_empty() && raw.bit_len != 0 {
            return Err(Error::malformed("bit stream present without a frequency table"));
        }

        let stream = EncodedStream::new(raw.payload, raw.bit_len);
        let padding = stream.padding_bits();
        if let Some(&last) = stream.bytes().last() {
            if padding > 0 && last & ((1u8 << padding) - 1) != 0 {
                return Err(Error::malformed("non-zero padding bits"));
            }
        }

        Ok(Container {
            frequencies,
            stream,
            digest: raw.digest,
        })
    }
}

fn digest_of(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}
