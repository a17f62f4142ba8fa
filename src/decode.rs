//! A module for all decoding needs.
use crate::dict::Dictionary;
use crate::frame::{self, Unit};
use crate::{Code, LzwError, MAX_ENTRIES};

use std::io::{self, Read, Write};

/// The configuration of a decoding run.
///
/// Every run starts with an empty dictionary, mirroring the [`Encoder`].
///
/// [`Encoder`]: ../encode/struct.Encoder.html
pub struct Decoder {
    /// The dictionary capacity of each run.
    capacity: usize,
}

/// A decoding stream sink.
///
/// See [`Decoder::into_stream`] on how to create this type and more information.
///
/// [`Decoder::into_stream`]: struct.Decoder.html#method.into_stream
pub struct IntoStream<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
}

/// A decoding sink into a vector.
///
/// See [`Decoder::into_vec`] on how to create this type and more information.
///
/// [`Decoder::into_vec`]: struct.Decoder.html#method.into_vec
pub struct IntoVec<'d> {
    decoder: &'d mut Decoder,
    vector: &'d mut Vec<u8>,
}

/// An async decoding sink.
///
/// See [`Decoder::into_async`] on how to create this type and more information.
///
/// [`Decoder::into_async`]: struct.Decoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
}

/// The result of coding into a vector.
#[derive(Debug)]
pub struct VecResult {
    /// The number of bytes consumed from the input slice.
    pub consumed_in: usize,
    /// The number of bytes appended to the vector.
    pub consumed_out: usize,
    pub status: Result<(), LzwError>,
}

/// The result of coding from a reader into a writer.
#[derive(Debug)]
pub struct AllResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: usize,
    /// The total number of bytes written into the writer.
    pub bytes_written: usize,
    pub status: io::Result<()>,
}

/// The state of a single decoding run.
struct DecodeState<'o> {
    dict: Dictionary,
    /// The string reconstructed last, possibly extended by a following literal.
    prev: Vec<u8>,
    /// Scratch space for the string of the current reference.
    current: Vec<u8>,
    out: &'o mut Vec<u8>,
}

impl Decoder {
    /// Create a decoder with the largest possible dictionary.
    pub fn new() -> Self {
        Decoder::with_capacity(MAX_ENTRIES)
    }

    /// Create a decoder whose dictionary holds at most `capacity` strings.
    ///
    /// This must match the capacity the data was encoded with.
    ///
    /// # Panics
    ///
    /// If `capacity` exceeds [`MAX_ENTRIES`].
    ///
    /// [`MAX_ENTRIES`]: ../constant.MAX_ENTRIES.html
    pub fn with_capacity(capacity: usize) -> Self {
        crate::assert_capacity(capacity);
        Decoder { capacity }
    }

    /// The dictionary capacity of each run.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Decode all of `data` into a new vector.
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<u8>, LzwError> {
        let mut output = vec![];
        self.into_vec(&mut output).decode_all(data).status?;
        Ok(output)
    }

    /// Construct a decoder into a writer.
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            decoder: self,
            writer,
        }
    }

    /// Construct a decoder into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::io::AsyncWrite>(&mut self, writer: W) -> IntoAsync<'_, W> {
        IntoAsync {
            decoder: self,
            writer,
        }
    }

    /// Construct a decoder that appends to a vector.
    pub fn into_vec<'lt>(&'lt mut self, vec: &'lt mut Vec<u8>) -> IntoVec<'lt> {
        IntoVec {
            decoder: self,
            vector: vec,
        }
    }

    fn run(&self, inp: &[u8], out: &mut Vec<u8>) -> Result<Dictionary, LzwError> {
        let start = out.len();
        let result = DecodeState::new(self.capacity, out).decode(inp);

        match result {
            Ok(dict) => {
                tracing::debug!(
                    input = inp.len(),
                    output = out.len() - start,
                    entries = dict.len(),
                    "decoded"
                );
                Ok(dict)
            }
            Err(err) => {
                tracing::debug!(error = %err, "rejected encoded stream");
                // Nothing of a rejected run is handed out.
                out.truncate(start);
                Err(err)
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl IntoVec<'_> {
    /// Decode all of `read` and append the result to the vector.
    ///
    /// On error the vector is left as it was.
    pub fn decode_all(self, read: &[u8]) -> VecResult {
        let IntoVec { decoder, vector } = self;
        let start = vector.len();
        let status = decoder.run(read, vector).map(|_| ());

        VecResult {
            consumed_in: if status.is_ok() { read.len() } else { 0 },
            consumed_out: vector.len() - start,
            status,
        }
    }
}

impl<W: Write> IntoStream<'_, W> {
    /// Decode all data from a reader.
    ///
    /// The reader is drained into memory before decoding starts. Nothing is written unless
    /// decoding succeeds.
    pub fn decode_all(self, mut read: impl Read) -> AllResult {
        let IntoStream { decoder, mut writer } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let status = (|| -> io::Result<()> {
            let mut data = vec![];
            bytes_read = read.read_to_end(&mut data)?;

            let mut outbuf = vec![];
            decoder.run(&data, &mut outbuf).map_err(into_io)?;
            writer.write_all(&outbuf)?;
            writer.flush()?;
            bytes_written = outbuf.len();
            Ok(())
        })();

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

#[cfg(feature = "async")]
impl<W: futures::io::AsyncWrite + core::marker::Unpin> IntoAsync<'_, W> {
    /// Decode all data from an async reader.
    ///
    /// The reader is drained into memory before decoding starts. Nothing is written unless
    /// decoding succeeds.
    pub async fn decode_all(self, read: impl futures::io::AsyncRead) -> AllResult {
        use futures::io::{AsyncReadExt, AsyncWriteExt};

        let IntoAsync { decoder, mut writer } = self;
        futures::pin_mut!(read);

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let status = async {
            let mut data = vec![];
            bytes_read = read.read_to_end(&mut data).await?;

            let mut outbuf = vec![];
            decoder.run(&data, &mut outbuf).map_err(into_io)?;
            writer.write_all(&outbuf).await?;
            writer.flush().await?;
            bytes_written = outbuf.len();
            Ok::<_, io::Error>(())
        }
        .await;

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

pub(crate) fn into_io(err: LzwError) -> io::Error {
    let kind = match err {
        LzwError::OutOfMemory => io::ErrorKind::OutOfMemory,
        _ => io::ErrorKind::InvalidData,
    };
    io::Error::new(kind, err)
}

impl<'o> DecodeState<'o> {
    fn new(capacity: usize, out: &'o mut Vec<u8>) -> Self {
        DecodeState {
            dict: Dictionary::new(capacity),
            prev: Vec::new(),
            current: Vec::new(),
            out,
        }
    }

    fn decode(mut self, inp: &[u8]) -> Result<Dictionary, LzwError> {
        crate::reserve(self.out, inp.len())?;

        for unit in frame::units(inp) {
            match unit? {
                (_, Unit::Literal(byte)) => self.literal(byte)?,
                (offset, Unit::Reference(code)) => self.reference(code, offset)?,
            }
        }

        Ok(self.dict)
    }

    fn literal(&mut self, byte: u8) -> Result<(), LzwError> {
        crate::reserve(self.out, 1)?;
        self.out.push(byte);

        // The very first unit, there is nothing to learn from yet.
        if self.prev.is_empty() {
            self.prev.push(byte);
            return Ok(());
        }

        self.prev.push(byte);
        // Already known means the encoder kept extending its match past this byte, as it does
        // for raw pairs. Otherwise the encoder learnt `prev + byte` when it ended the match.
        if !self.dict.contains(&self.prev) {
            let _ = self.dict.insert(&self.prev);
            self.prev.clear();
            self.prev.push(byte);
        }

        Ok(())
    }

    fn reference(&mut self, code: Code, offset: usize) -> Result<(), LzwError> {
        self.current.clear();
        if let Some(entry) = self.dict.get(code) {
            self.current.extend_from_slice(entry);
        } else if code == self.dict.next_code() && !self.dict.is_full() && !self.prev.is_empty() {
            // The encoder used the entry it added right before, which we only learn now.
            self.current.extend_from_slice(&self.prev);
            self.current.push(self.prev[0]);
        } else {
            return Err(LzwError::InvalidCode { code, offset });
        }

        crate::reserve(self.out, self.current.len())?;
        self.out.extend_from_slice(&self.current);

        if !self.prev.is_empty() {
            self.prev.push(self.current[0]);
            let _ = self.dict.insert(&self.prev);
        }

        core::mem::swap(&mut self.prev, &mut self.current);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Decoder;
    use crate::encode::Encoder;
    use crate::LzwError;

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert_eq!(Decoder::new().decode(b"").unwrap(), b"");
    }

    #[test]
    fn literals_pass_through() {
        assert_eq!(Decoder::new().decode(b"AAAA").unwrap(), b"AAAA");
        assert_eq!(Decoder::new().decode(&[0xff, 0x80, b'z']).unwrap(), [0x80, b'z']);
    }

    #[test]
    fn reference_before_definition() {
        // Code 1 (`AAA`) is referenced before the decoder has inserted it.
        let stream = [b'A', b'A', b'A', 0x80, 0x01, b'A'];
        let mut out = vec![];
        let dict = Decoder::new().run(&stream, &mut out).unwrap();
        assert_eq!(out, b"AAAAAAA");
        assert_eq!(dict.get(0), Some(&b"AA"[..]));
        assert_eq!(dict.get(1), Some(&b"AAA"[..]));
        assert_eq!(dict.get(2), Some(&b"AAAA"[..]));
    }

    #[test]
    fn dictionaries_stay_in_lockstep() {
        let data = include_bytes!("frame.rs");
        let mut encoded = vec![];
        let enc_dict = Encoder::new().run(data, &mut encoded).unwrap();
        let mut decoded = vec![];
        let dec_dict = Decoder::new().run(&encoded, &mut decoded).unwrap();

        assert_eq!(&decoded[..], &data[..]);
        assert_eq!(enc_dict.len(), dec_dict.len());
        for code in 0..dec_dict.len() as u16 {
            assert_eq!(enc_dict.get(code), dec_dict.get(code));
        }
    }

    #[test]
    fn reference_first_is_rejected() {
        let err = Decoder::new().decode(&[0x80, 0x00]).unwrap_err();
        assert_eq!(err, LzwError::InvalidCode { code: 0, offset: 0 });
    }

    #[test]
    fn undefined_code_is_rejected() {
        let err = Decoder::new().decode(&[b'A', b'B', 0x80, 0x05]).unwrap_err();
        assert_eq!(err, LzwError::InvalidCode { code: 5, offset: 2 });
    }

    #[test]
    fn truncated_reference_is_rejected() {
        let err = Decoder::new().decode(&[b'A', b'B', 0x80]).unwrap_err();
        assert_eq!(err, LzwError::UnexpectedEnd { offset: 2 });
    }

    #[test]
    fn failed_run_leaves_vector_untouched() {
        let mut out = b"kept".to_vec();
        let result = Decoder::new()
            .into_vec(&mut out)
            .decode_all(&[b'x', b'y', 0x80, 0x07]);
        assert!(result.status.is_err());
        assert_eq!(result.consumed_out, 0);
        assert_eq!(out, b"kept");
    }

    #[test]
    fn next_code_invalid_when_full() {
        // With no room to learn, the next free code can never have been assigned.
        let err = Decoder::with_capacity(0).decode(&[b'A', 0x80, 0x00]).unwrap_err();
        assert_eq!(err, LzwError::InvalidCode { code: 0, offset: 1 });
    }

    #[test]
    fn stream_adapter_reports_invalid_data() {
        let mut sink = vec![];
        let result = Decoder::new()
            .into_stream(&mut sink)
            .decode_all(&[0x80, 0x00][..]);
        let err = result.status.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(sink.is_empty());
        assert_eq!(result.bytes_written, 0);
    }
}
