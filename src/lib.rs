#![warn(missing_docs)]

//! # fgk-codec
//!
//! Adaptive Huffman coding (the FGK algorithm) for arbitrary byte streams.
//!
//! The encoder and the decoder each grow their own code [`Tree`] from the data, one symbol at a
//! time, applying the same deterministic update after every symbol. No code table is ever
//! written to the stream; the decoder recovers it from the bits it has already decoded.
//!
//! ```
//! let encoded = fgk_codec::encode(b"abracadabra")?;
//! assert_eq!(fgk_codec::decode(&encoded)?, b"abracadabra");
//! # Ok::<(), fgk_codec::CodecError>(())
//! ```

/// Stream encoding and decoding
pub mod codec;

/// Statistics reported after an encoding session
pub mod stats;

/// The adaptive code tree shared by the encoder and decoder
pub mod tree;

pub use bitstream_io;
pub use codec::{decode, encode, ByteTransform, CodecError, Decoder, Encoder, Fgk};
pub use tree::{Tree, TreeError};
