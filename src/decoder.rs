use bitstream_io::{BigEndian, BitRead, BitReader};
use tracing::debug;

use crate::encoder::EncodedStream;
use crate::error::{Error, Result};
use crate::tree::{HuffmanNode, HuffmanTree};

/// Walk `tree` against the bits of `stream`, emitting one symbol per leaf.
///
/// Exactly `stream.bit_len()` bits are consumed; padding is never read as
/// code. `expected` is the symbol count the container promised.
pub fn decode(stream: &EncodedStream, tree: Option<&HuffmanTree>, expected: u64) -> Result<Vec<u8>> {
    let bit_len = stream.bit_len();
    let needed = bit_len.div_ceil(8);
    if (stream.bytes().len() as u64) < needed {
        return Err(Error::malformed(format!(
            "payload holds {} bytes, {bit_len} bits need {needed}",
            stream.bytes().len()
        )));
    }

    let Some(tree) = tree else {
        if bit_len > 0 {
            return Err(Error::malformed("bit stream present without a frequency table"));
        }
        return check_len(Vec::new(), expected);
    };

    let mut reader = BitReader::endian(stream.bytes(), BigEndian);
    let mut out = Vec::with_capacity(usize::try_from(expected).unwrap_or(0).min(1 << 24));
    let root = tree.root();

    if let HuffmanNode::Leaf { symbol, .. } = root {
        for offset in 0..bit_len {
            if reader.read_bit()? {
                return Err(Error::InvalidCode { bit_offset: offset });
            }
            out.push(*symbol);
        }
        return check_len(out, expected);
    }

    let mut current = root;
    for _ in 0..bit_len {
        current = match current {
            HuffmanNode::Internal { left, right, .. } => {
                if reader.read_bit()? {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
            HuffmanNode::Leaf { .. } => unreachable!("position resets to root after a leaf"),
        };
        if let HuffmanNode::Leaf { symbol, .. } = current {
            out.push(*symbol);
            current = root;
        }
    }

    if !std::ptr::eq(current, root) {
        return Err(Error::TruncatedCode { bits_read: bit_len });
    }

    debug!(bits = bit_len, symbols = out.len(), "decoded stream");
    check_len(out, expected)
}

fn check_len(out: Vec<u8>, expected: u64) -> Result<Vec<u8>> {
    let actual = out.len() as u64;
    if actual != expected {
        return Err(Error::LengthMismatch { expected, actual });
    }
    Ok(out)
}
