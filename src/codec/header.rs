use crate::codec::CodecError;

/// Flag bit that every stream header carries
pub(crate) const HEADER_FLAG: u8 = 0b1000_0000;

/// Largest pad count accepted when reading. Writers only ever produce 0..=7, but a byte-aligned
/// payload followed by a whole byte of padding is still a valid stream.
pub(crate) const MAX_PAD_BITS: u8 = 8;

/// The single byte in front of every encoded stream: `1PPPPPPP`, where `P` is the number of
/// zero bits appended after the payload to reach a byte boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct PaddingHeader {
    pub(crate) pad: u8,
}

impl PaddingHeader {
    /// The header for a payload of `payload_bits` bits
    pub(crate) fn for_payload(payload_bits: u64) -> Self {
        Self {
            pad: ((8 - payload_bits % 8) % 8) as u8,
        }
    }

    pub(crate) fn to_byte(self) -> u8 {
        HEADER_FLAG | self.pad
    }

    /// Split a stream into its header and the bytes that follow it
    pub(crate) fn split(stream: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (&byte, body) = stream.split_first().ok_or(CodecError::MissingHeader)?;
        if byte & HEADER_FLAG == 0 {
            return Err(CodecError::BadHeader(byte));
        }

        let pad = byte & !HEADER_FLAG;
        let available = body.len() as u64 * 8;
        if pad > MAX_PAD_BITS || u64::from(pad) > available {
            return Err(CodecError::BadPadding { pad, available });
        }
        Ok((Self { pad }, body))
    }

    /// Number of codeword bits in `body`
    pub(crate) fn payload_bits(&self, body: &[u8]) -> u64 {
        body.len() as u64 * 8 - u64::from(self.pad)
    }
}
