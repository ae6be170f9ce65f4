//! The [`Encoder`] half of the adaptive Huffman coder.

use std::io;

use bitstream_io::BitWrite;

use crate::codec::CodecError;
use crate::tree::{NodeId, Tree};

/// An adaptive Huffman encoder
///
/// An encoder converts a stream of bytes into a stream of codeword bits, using a [`Tree`] that
/// it grows from the bytes themselves. A byte seen before is written as the path to its leaf. A
/// new byte is written as the path to the NYT leaf followed by the byte's 8 literal bits.
///
/// Only payload bits are produced here. [`crate::codec::encode`] wraps them in the padding
/// header.
#[derive(Debug, Default, Clone)]
pub struct Encoder {
    tree: Tree,
    bits_written: u64,
}

impl Encoder {
    /// Construct a new [`Encoder`] with an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// The tree as it stands after the symbols encoded so far
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of payload bits emitted so far
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Encode every symbol from the iterator into the provided output.
    ///
    /// # Errors
    ///
    /// This method can fail if the underlying [`BitWrite`] cannot be written to.
    pub fn encode_all<W: BitWrite>(
        &mut self,
        symbols: impl IntoIterator<Item = u8>,
        output: &mut W,
    ) -> Result<(), CodecError> {
        for symbol in symbols {
            self.encode(symbol, output)?;
        }
        Ok(())
    }

    /// Encode a symbol into the provided output, then update the tree.
    ///
    /// # Errors
    ///
    /// This method can fail if the underlying [`BitWrite`] cannot be written to.
    pub fn encode<W: BitWrite>(&mut self, symbol: u8, output: &mut W) -> Result<(), CodecError> {
        let start = match self.tree.leaf_for(symbol) {
            Some(leaf) => {
                self.write_path(leaf, output)?;
                leaf
            }
            None => {
                self.write_path(self.tree.nyt(), output)?;
                output.write(8, symbol)?;
                self.bits_written += 8;
                tracing::trace!(symbol, "new symbol");
                self.tree.insert_symbol_pair(symbol)?
            }
        };

        self.tree.increment(start);
        Ok(())
    }

    fn write_path<W: BitWrite>(&mut self, node: NodeId, output: &mut W) -> io::Result<()> {
        let path = self.tree.path_to(node);
        for side in &path {
            output.write_bit(side.bit())?;
        }
        self.bits_written += path.len() as u64;
        Ok(())
    }
}
