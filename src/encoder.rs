use bitstream_io::{BigEndian, BitWrite, BitWriter};
use tracing::debug;

use crate::code::CodeTable;
use crate::error::{Error, Result};

/// Packed bit stream: codes laid out MSB-first, last byte zero-padded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedStream {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl EncodedStream {
    pub fn new(bytes: Vec<u8>, bit_len: u64) -> Self {
        EncodedStream { bytes, bit_len }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of meaningful bits; anything after it in `bytes` is padding.
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    pub fn padding_bits(&self) -> u8 {
        ((8 - self.bit_len % 8) % 8) as u8
    }
}

/// Encode `data` through `codes`.
///
/// Every byte of `data` must have a code. A missing one is reported as
/// [`Error::MissingCode`] instead of being skipped.
pub fn encode(data: &[u8], codes: &CodeTable) -> Result<EncodedStream> {
    let mut bytes = Vec::new();
    let mut bit_len: u64 = 0;
    {
        let mut writer = BitWriter::endian(&mut bytes, BigEndian);
        for &symbol in data {
            let code = codes.get(symbol).ok_or(Error::MissingCode { symbol })?;
            for &bit in code.bits() {
                writer.write_bit(bit)?;
            }
            bit_len += code.len() as u64;
        }
        writer.byte_align()?;
    }

    debug!(symbols = data.len(), bits = bit_len, bytes = bytes.len(), "encoded stream");
    Ok(EncodedStream { bytes, bit_len })
}
