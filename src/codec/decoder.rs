//! The [`Decoder`] half of the adaptive Huffman coder.

use bitstream_io::BitRead;

use crate::codec::CodecError;
use crate::tree::{NodeKind, Tree};

/// An adaptive Huffman decoder
///
/// A decoder walks its own [`Tree`] one bit at a time until it reaches a leaf. A symbol leaf
/// yields that symbol; the NYT leaf means the next 8 bits are a literal byte. Either way the tree
/// is then updated exactly as the [`Encoder`](crate::codec::encoder::Encoder) updated its own, so
/// the two stay identical without ever being compared.
///
/// The decoder must be told how many payload bits the stream holds, since the padding after
/// them would otherwise read as codewords.
#[derive(Debug, Clone)]
pub struct Decoder {
    tree: Tree,
    remaining: u64,
}

impl Decoder {
    /// Construct a new [`Decoder`] for a payload of `payload_bits` bits
    pub fn new(payload_bits: u64) -> Self {
        Self {
            tree: Tree::new(),
            remaining: payload_bits,
        }
    }

    /// The tree as it stands after the symbols decoded so far
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Payload bits not yet consumed
    pub fn remaining_bits(&self) -> u64 {
        self.remaining
    }

    /// Return an iterator over the decoded symbols.
    ///
    /// The iterator will continue returning symbols until the payload is exhausted
    pub fn decode_all<'a, R: BitRead>(&'a mut self, input: &'a mut R) -> DecodeIter<'a, R> {
        DecodeIter {
            decoder: self,
            input,
        }
    }

    /// Read the next symbol from the stream of bits
    ///
    /// This method will return `Ok(None)` once every payload bit has been consumed.
    ///
    /// # Errors
    ///
    /// Fails if the payload ends partway through a codeword or literal, if a literal names a
    /// symbol the tree already holds, or if the underlying [`BitRead`] cannot be read from.
    pub fn decode<R: BitRead>(&mut self, input: &mut R) -> Result<Option<u8>, CodecError> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let mut node = self.tree.root();
        let symbol = loop {
            match self.tree.node(node).kind() {
                NodeKind::Internal { left, right } => {
                    node = if self.read_bit(input)? { right } else { left };
                }
                NodeKind::Leaf(symbol) => {
                    self.tree.increment(node);
                    break symbol;
                }
                NodeKind::Nyt => {
                    let symbol = self.read_literal(input)?;
                    tracing::trace!(symbol, "new symbol");
                    let internal = self.tree.insert_symbol_pair(symbol)?;
                    self.tree.increment(internal);
                    break symbol;
                }
            }
        };

        Ok(Some(symbol))
    }

    fn read_bit<R: BitRead>(&mut self, input: &mut R) -> Result<bool, CodecError> {
        if self.remaining == 0 {
            return Err(CodecError::Truncated {
                needed: 1,
                remaining: 0,
            });
        }
        let bit = input.read_bit()?;
        self.remaining -= 1;
        Ok(bit)
    }

    fn read_literal<R: BitRead>(&mut self, input: &mut R) -> Result<u8, CodecError> {
        if self.remaining < 8 {
            return Err(CodecError::Truncated {
                needed: 8,
                remaining: self.remaining,
            });
        }
        let symbol = input.read::<u8>(8)?;
        self.remaining -= 8;
        Ok(symbol)
    }
}

/// The iterator returned by the [`Decoder::decode_all`] method
#[allow(missing_debug_implementations)]
pub struct DecodeIter<'a, R>
where
    R: BitRead,
{
    decoder: &'a mut Decoder,
    input: &'a mut R,
}

impl<'a, R> Iterator for DecodeIter<'a, R>
where
    R: BitRead,
{
    type Item = Result<u8, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.decode(self.input).transpose()
    }
}
