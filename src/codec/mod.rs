//! Whole-stream encoding and decoding, and the bit-level [`Encoder`] and [`Decoder`] behind
//! them.
//!
//! An encoded stream is one header byte, `1PPPPPPP`, followed by the codeword bits packed
//! most-significant-bit first, followed by `P` zero bits.

use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use thiserror::Error;

use crate::codec::header::PaddingHeader;
use crate::tree::TreeError;

/// Adaptive Huffman stream decoder
pub mod decoder;

/// Adaptive Huffman stream encoder
pub mod encoder;
mod header;

pub use decoder::Decoder;
pub use encoder::Encoder;

#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error")]
    IoError(#[from] io::Error),

    #[error("Stream is empty, expected a header byte")]
    MissingHeader,

    #[error("Header byte {0:#04x} does not have its flag bit set")]
    BadHeader(u8),

    #[error("Header claims {pad} padding bits, but only {available} bits follow it")]
    BadPadding { pad: u8, available: u64 },

    #[error("Padding bits are not all zero")]
    NonZeroPadding,

    #[error("Stream truncated: needed {needed} more bits, found {remaining}")]
    Truncated { needed: u32, remaining: u64 },

    #[error("Tree error")]
    TreeError(#[from] TreeError),
}

/// A transform from one whole byte stream to another, and back.
///
/// The caller reads all its input into memory first and writes all the output at the end.
pub trait ByteTransform {
    /// Transform raw bytes into the encoded representation
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Recover the raw bytes from an encoded representation
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// The adaptive Huffman (FGK) transform
#[derive(Debug, Default, Clone, Copy)]
pub struct Fgk;

impl ByteTransform for Fgk {
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        encode(input)
    }

    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        decode(input)
    }
}

/// Encode a whole byte stream.
///
/// The output is always at least one byte long: empty input encodes to the lone header `0x80`.
///
/// # Errors
///
/// Only fails if writing to the in-memory buffer fails.
pub fn encode(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    // Reserve the header byte; the pad count is only known once the payload is written
    let mut bitwriter = BitWriter::endian(vec![0_u8], BigEndian);
    let mut encoder = Encoder::new();

    encoder.encode_all(input.iter().copied(), &mut bitwriter)?;
    bitwriter.byte_align()?;

    let header = PaddingHeader::for_payload(encoder.bits_written());
    let mut output = bitwriter.into_writer();
    output[0] = header.to_byte();

    tracing::debug!(
        input_bytes = input.len(),
        output_bytes = output.len(),
        symbols = encoder.tree().leaf_count(),
        pad = header.pad,
        "encoded stream"
    );
    Ok(output)
}

/// Decode a whole byte stream produced by [`encode`].
///
/// # Errors
///
/// Malformed streams are rejected rather than decoded on a best-effort basis: a missing or
/// invalid header, a payload that stops partway through a codeword, a literal for a symbol the
/// tree already holds, or non-zero padding.
pub fn decode(stream: &[u8]) -> Result<Vec<u8>, CodecError> {
    let (header, body) = PaddingHeader::split(stream)?;
    let mut bitreader = BitReader::endian(body, BigEndian);
    let mut decoder = Decoder::new(header.payload_bits(body));

    let output = decoder
        .decode_all(&mut bitreader)
        .collect::<Result<Vec<u8>, _>>()?;

    if header.pad > 0 && bitreader.read::<u8>(u32::from(header.pad))? != 0 {
        return Err(CodecError::NonZeroPadding);
    }

    tracing::debug!(
        input_bytes = stream.len(),
        output_bytes = output.len(),
        symbols = decoder.tree().leaf_count(),
        pad = header.pad,
        "decoded stream"
    );
    Ok(output)
}
