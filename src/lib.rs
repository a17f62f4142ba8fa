//! # Tagged LZW decoder and encoder
//!
//! This crate provides an [`Encoder`] and a [`Decoder`] for a byte-aligned variant of LZW. Codes
//! are not packed into a bit stream. Instead the encoded form is a sequence of whole-byte coding
//! units:
//!
//!  * a *literal* is a source byte below `0x80`, written as-is,
//!  * a *reference* is a 15-bit dictionary code, written as two big-endian bytes with the top bit
//!    of the first byte set as a tag,
//!  * an *escaped literal* is a source byte of `0x80` or above, written as `0xff` followed by the
//!    byte itself.
//!
//! There is no header and the dictionary is never transmitted. The decoder rebuilds the
//! dictionary of the encoder in lockstep while reading the units, so both sides have to be
//! configured with the same dictionary capacity.
//!
//! Exemplary use of the encoder and decoder:
//!
//! ```
//! use tagzw::{decode::Decoder, encode::Encoder};
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let compressed = Encoder::new().encode(data).unwrap();
//! let decompressed = Decoder::new().decode(&compressed).unwrap();
//! assert_eq!(decompressed, data);
//! ```
#![forbid(unsafe_code)]

/// The number of values a reference can carry.
pub const CODE_SPACE: usize = 1 << 15;

/// The first code that carries an escaped literal instead of naming a dictionary entry.
pub const ESCAPE_BASE: Code = 0x7f80;

/// The largest possible dictionary, which is also the default.
pub const MAX_ENTRIES: usize = ESCAPE_BASE as usize;

/// Alias for a code point of the dictionary.
pub type Code = u16;

/// The error kind of a failed coding run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LzwError {
    /// A reference named a code that is neither in the dictionary nor the next one to be added.
    ///
    /// The stream is corrupt, was produced with a different dictionary capacity, or was not
    /// produced by this encoder at all.
    #[error("invalid code {code} at byte offset {offset}")]
    InvalidCode { code: Code, offset: usize },
    /// The input ended between the two bytes of a tagged unit.
    #[error("stream ends inside a two-byte unit at byte offset {offset}")]
    UnexpectedEnd { offset: usize },
    /// The output buffer could not be grown.
    #[error("out of memory while growing the output buffer")]
    OutOfMemory,
}

pub mod decode;
pub mod dict;
pub mod encode;
pub mod frame;

pub use decode::Decoder;
pub use encode::Encoder;

pub(crate) fn assert_capacity(capacity: usize) {
    assert!(
        capacity <= MAX_ENTRIES,
        "dictionary capacity {} exceeds the maximum of {}",
        capacity,
        MAX_ENTRIES
    );
}

pub(crate) fn reserve(out: &mut Vec<u8>, additional: usize) -> Result<(), LzwError> {
    out.try_reserve(additional).map_err(|_| LzwError::OutOfMemory)
}
