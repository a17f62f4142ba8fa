//! The byte framing of coding units.
//!
//! A unit with a clear top bit in its first byte is a one-byte literal. A unit with the top bit
//! set spans two bytes: with the tag cleared, the big-endian pair is a 15-bit value that is
//! either a dictionary code or, at [`ESCAPE_BASE`] and above, an escaped literal whose byte is
//! the low byte of the value.
//!
//! [`ESCAPE_BASE`]: ../constant.ESCAPE_BASE.html
use crate::{Code, LzwError, ESCAPE_BASE};

const TAG: u8 = 0x80;
const TAG_BIT: u16 = 0x8000;
const ESCAPE: u8 = 0xff;

/// One atom of the encoded stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// A single source byte.
    Literal(u8),
    /// The code of a dictionary entry.
    Reference(Code),
}

/// An iterator over the units of an encoded stream.
///
/// See [`units`] on how to create this type.
///
/// [`units`]: fn.units.html
#[derive(Clone, Debug)]
pub struct Units<'a> {
    inp: &'a [u8],
    offset: usize,
}

/// Split an encoded stream into its units.
///
/// Each item carries the byte offset at which its unit starts. A stream cut off after the
/// first byte of a two-byte unit ends with an [`LzwError::UnexpectedEnd`].
///
/// [`LzwError::UnexpectedEnd`]: ../enum.LzwError.html#variant.UnexpectedEnd
pub fn units(inp: &[u8]) -> Units<'_> {
    Units { inp, offset: 0 }
}

impl Unit {
    /// The number of bytes this unit occupies when written.
    pub fn encoded_len(self) -> usize {
        match self {
            Unit::Literal(byte) if byte < TAG => 1,
            _ => 2,
        }
    }

    /// Append the framed unit to `out`.
    ///
    /// A reference at [`ESCAPE_BASE`] or above has no framing of its own and is rejected with
    /// [`LzwError::InvalidCode`], leaving `out` unchanged. Growing `out` may fail with
    /// [`LzwError::OutOfMemory`].
    ///
    /// [`ESCAPE_BASE`]: ../constant.ESCAPE_BASE.html
    /// [`LzwError::InvalidCode`]: ../enum.LzwError.html#variant.InvalidCode
    /// [`LzwError::OutOfMemory`]: ../enum.LzwError.html#variant.OutOfMemory
    pub fn write(self, out: &mut Vec<u8>) -> Result<(), LzwError> {
        if let Unit::Reference(code) = self {
            if code >= ESCAPE_BASE {
                return Err(LzwError::InvalidCode {
                    code,
                    offset: out.len(),
                });
            }
        }

        crate::reserve(out, self.encoded_len())?;
        match self {
            Unit::Literal(byte) if byte < TAG => out.push(byte),
            Unit::Literal(byte) => out.extend_from_slice(&[ESCAPE, byte]),
            Unit::Reference(code) => out.extend_from_slice(&(code | TAG_BIT).to_be_bytes()),
        }
        Ok(())
    }

    /// Read the unit at the start of `inp`, returning it with the number of bytes it spans.
    ///
    /// Returns `None` if `inp` is empty or holds only the first byte of a two-byte unit.
    pub fn read(inp: &[u8]) -> Option<(Unit, usize)> {
        match *inp {
            [byte, ..] if byte < TAG => Some((Unit::Literal(byte), 1)),
            [high, low, ..] => {
                let value = u16::from_be_bytes([high, low]) & !TAG_BIT;
                let unit = if value >= ESCAPE_BASE {
                    Unit::Literal(low)
                } else {
                    Unit::Reference(value)
                };
                Some((unit, 2))
            }
            _ => None,
        }
    }
}

impl<'a> Iterator for Units<'a> {
    type Item = Result<(usize, Unit), LzwError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.inp.is_empty() {
            return None;
        }

        let offset = self.offset;
        match Unit::read(self.inp) {
            Some((unit, len)) => {
                self.inp = &self.inp[len..];
                self.offset += len;
                Some(Ok((offset, unit)))
            }
            None => {
                self.inp = &[];
                Some(Err(LzwError::UnexpectedEnd { offset }))
            }
        }
    }
}

impl core::iter::FusedIterator for Units<'_> {}
