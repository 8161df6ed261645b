use std::io::{Read, Write};

use tracing::debug;

use crate::code::CodeTable;
use crate::container::Container;
use crate::decoder;
use crate::encoder;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

/// Figures from one compression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_len: u64,
    pub compressed_len: u64,
    pub payload_bits: u64,
    pub alphabet_size: usize,
}

impl CompressionStats {
    /// Container size over input size. Zero for empty input.
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.compressed_len as f64 / self.original_len as f64
    }

    /// Average payload bits spent per input byte, table excluded.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.payload_bits as f64 / self.original_len as f64
    }
}

/// Compress `data` into a self-contained container.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_stats(data).map(|(bytes, _)| bytes)
}

pub fn compress_with_stats(data: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
    let frequencies = FrequencyTable::from_bytes(data);
    let tree = HuffmanTree::build(&frequencies);
    let codes = CodeTable::from_optional(tree.as_ref());
    let stream = encoder::encode(data, &codes)?;

    let payload_bits = stream.bit_len();
    let alphabet_size = frequencies.len();
    let bytes = Container::new(frequencies, stream, data).to_bytes()?;

    let stats = CompressionStats {
        original_len: data.len() as u64,
        compressed_len: bytes.len() as u64,
        payload_bits,
        alphabet_size,
    };

    debug!(
        original = stats.original_len,
        compressed = stats.compressed_len,
        alphabet = stats.alphabet_size,
        "compressed"
    );
    Ok((bytes, stats))
}

/// Restore the original bytes from a container produced by [`compress`].
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let container = Container::from_bytes(bytes)?;
    let tree = HuffmanTree::build(container.frequencies());
    let data = decoder::decode(container.stream(), tree.as_ref(), container.original_len())?;
    container.verify(&data)?;

    debug!(compressed = bytes.len(), restored = data.len(), "decompressed");
    Ok(data)
}

/// Read `reader` to its end, compress, and write the container to `writer`.
///
/// Nothing is written unless compression succeeds.
pub fn compress_stream<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<CompressionStats> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let (bytes, stats) = compress_with_stats(&data)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(stats)
}

/// Read a container from `reader` and write the restored bytes to `writer`.
/// Returns the number of bytes written.
pub fn decompress_stream<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<u64> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let data = decompress(&bytes)?;
    writer.write_all(&data)?;
    writer.flush()?;
    Ok(data.len() as u64)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::Error;

    #[test]
    fn abracadabra_roundtrip() {
        let packed = compress(b"abracadabra").unwrap();
        assert_eq!(decompress(&packed).unwrap(), b"abracadabra");
    }

    #[test]
    fn degenerate_inputs_roundtrip() {
        for data in [&b""[..], b"a", b"aaaa", b"\n\n\n", b"  "] {
            let packed = compress(data).unwrap();
            assert_eq!(decompress(&packed).unwrap(), data);
        }
    }

    #[test]
    fn every_byte_value_roundtrips() {
        let data: Vec<u8> = (0..=255u8).cycle().take(256 * 3 + 17).collect();
        assert_eq!(decompress(&compress(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn stats_for_skewed_input() {
        let (packed, stats) = compress_with_stats(b"aaaaaaaab").unwrap();
        assert_eq!(stats.original_len, 9);
        assert_eq!(stats.alphabet_size, 2);
        assert_eq!(stats.payload_bits, 9);
        assert_eq!(stats.compressed_len, packed.len() as u64);
        assert!(stats.payload_bits < 8 * stats.original_len);
        assert!((stats.bits_per_symbol() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_stats_do_not_divide_by_zero() {
        let (_, stats) = compress_with_stats(&[]).unwrap();
        assert_eq!(stats.ratio(), 0.0);
        assert_eq!(stats.bits_per_symbol(), 0.0);
    }

    #[test]
    fn altered_counts_are_detected() {
        // Table a:5 ... ; bump a's count so the decoded length disagrees.
        let mut packed = compress(b"abracadabra").unwrap();
        // magic(4) + version(1) + len(8) + symbol(1) -> a's count starts at 14
        packed[14] = 6;
        let err = decompress(&packed).unwrap_err();
        assert!(err.is_corruption(), "{err}");
    }

    #[test]
    fn altered_payload_is_detected() {
        let mut packed = compress(b"abracadabra").unwrap();
        let last = packed.len() - 1;
        // Flip a meaningful bit of the final payload byte (bit_len is 23).
        packed[last] ^= 0b0000_0010;
        let err = decompress(&packed).unwrap_err();
        assert!(err.is_corruption(), "{err}");
    }

    #[test]
    fn streams_roundtrip() {
        let mut packed = Vec::new();
        let stats = compress_stream(Cursor::new(b"stream me".to_vec()), &mut packed).unwrap();
        assert_eq!(stats.original_len, 9);

        let mut restored = Vec::new();
        let written = decompress_stream(Cursor::new(packed), &mut restored).unwrap();
        assert_eq!(written, 9);
        assert_eq!(restored, b"stream me");
    }

    #[test]
    fn garbage_is_rejected_without_output() {
        let mut restored = Vec::new();
        let err = decompress_stream(Cursor::new(b"not a container".to_vec()), &mut restored)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
        assert!(restored.is_empty());
    }
}
