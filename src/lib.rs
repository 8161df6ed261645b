//! # huffpress
//!
//! Lossless byte compression with static Huffman codes.
//!
//! The whole input is counted, a prefix tree is built from the counts, and
//! the input is re-emitted as a packed bit stream. The container stores the
//! counts rather than the tree, so decompression rebuilds the exact same tree.
//!
//! ```rust
//! let packed = huffpress::compress(b"abracadabra")?;
//! assert_eq!(huffpress::decompress(&packed)?, b"abracadabra");
//! # Ok::<(), huffpress::Error>(())
//! ```

pub mod code;
pub mod codec;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod tree;

pub use code::{Code, CodeTable};
pub use codec::{
    CompressionStats, compress, compress_stream, compress_with_stats, decompress,
    decompress_stream,
};
pub use container::Container;
pub use encoder::EncodedStream;
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use tree::{HuffmanNode, HuffmanTree};
