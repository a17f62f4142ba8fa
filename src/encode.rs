//! A module for all encoding needs.
use crate::decode::{AllResult, VecResult};
use crate::dict::Dictionary;
use crate::frame::Unit;
use crate::{Code, LzwError, MAX_ENTRIES};

use std::io::{self, Read, Write};

/// The configuration of an encoding run.
///
/// Every run starts with an empty dictionary, so one encoder can be used for any number of
/// independent inputs.
pub struct Encoder {
    /// The dictionary capacity of each run.
    capacity: usize,
}

/// A encoding stream sink.
///
/// See [`Encoder::into_stream`] on how to create this type and more information.
///
/// [`Encoder::into_stream`]: struct.Encoder.html#method.into_stream
pub struct IntoStream<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
}

/// An encoding sink into a vector.
///
/// See [`Encoder::into_vec`] on how to create this type and more information.
///
/// [`Encoder::into_vec`]: struct.Encoder.html#method.into_vec
pub struct IntoVec<'d> {
    encoder: &'d mut Encoder,
    vector: &'d mut Vec<u8>,
}

/// An async encoding sink.
///
/// See [`Encoder::into_async`] on how to create this type and more information.
///
/// [`Encoder::into_async`]: struct.Encoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
}

/// The part of the input matched so far, by how it will be written.
#[derive(Clone, Copy)]
enum Pending {
    Empty,
    /// Single bytes are implicitly known and need no dictionary entry.
    Byte(u8),
    /// Two-byte matches cost as much as a reference and are written raw.
    Pair(u8, u8),
    Entry(Code),
}

/// The state of a single encoding run.
struct EncodeState<'o> {
    dict: Dictionary,
    /// The bytes of the longest match, followed by the current byte while probing.
    prefix: Vec<u8>,
    pending: Pending,
    out: &'o mut Vec<u8>,
}

impl Encoder {
    /// Create an encoder with the largest possible dictionary.
    pub fn new() -> Self {
        Encoder::with_capacity(MAX_ENTRIES)
    }

    /// Create an encoder whose dictionary holds at most `capacity` strings.
    ///
    /// The decoder must be created with the same capacity.
    ///
    /// # Panics
    ///
    /// If `capacity` exceeds [`MAX_ENTRIES`].
    ///
    /// [`MAX_ENTRIES`]: ../constant.MAX_ENTRIES.html
    pub fn with_capacity(capacity: usize) -> Self {
        crate::assert_capacity(capacity);
        Encoder { capacity }
    }

    /// The dictionary capacity of each run.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Encode all of `data` into a new vector.
    pub fn encode(&mut self, data: &[u8]) -> Result<Vec<u8>, LzwError> {
        let mut output = vec![];
        self.into_vec(&mut output).encode_all(data).status?;
        Ok(output)
    }

    /// Construct a encoder into a writer.
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            encoder: self,
            writer,
        }
    }

    /// Construct a encoder into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::io::AsyncWrite>(&mut self, writer: W) -> IntoAsync<'_, W> {
        IntoAsync {
            encoder: self,
            writer,
        }
    }

    /// Construct a encoder that appends to a vector.
    pub fn into_vec<'lt>(&'lt mut self, vec: &'lt mut Vec<u8>) -> IntoVec<'lt> {
        IntoVec {
            encoder: self,
            vector: vec,
        }
    }

    pub(crate) fn run(&self, inp: &[u8], out: &mut Vec<u8>) -> Result<Dictionary, LzwError> {
        // Most inputs shrink, each unit reserves whatever more it needs.
        crate::reserve(out, inp.len())?;
        let start = out.len();

        let mut state = EncodeState::new(self.capacity, out);
        let status = inp
            .iter()
            .try_for_each(|&byte| state.advance(byte))
            .and_then(|()| state.finish());

        let EncodeState { dict, out, .. } = state;
        if let Err(err) = status {
            out.truncate(start);
            return Err(err);
        }
        tracing::debug!(
            input = inp.len(),
            output = out.len() - start,
            entries = dict.len(),
            "encoded"
        );
        Ok(dict)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

impl IntoVec<'_> {
    /// Encode all of `read` and append the result to the vector.
    pub fn encode_all(self, read: &[u8]) -> VecResult {
        let IntoVec { encoder, vector } = self;
        let start = vector.len();
        let status = encoder.run(read, vector).map(|_| ());

        VecResult {
            consumed_in: if status.is_ok() { read.len() } else { 0 },
            consumed_out: vector.len() - start,
            status,
        }
    }
}

impl<W: Write> IntoStream<'_, W> {
    /// Encode all data from a reader.
    ///
    /// The reader is drained into memory before encoding starts. Nothing is written unless
    /// encoding succeeds.
    pub fn encode_all(self, mut read: impl Read) -> AllResult {
        let IntoStream { encoder, mut writer } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let status = (|| -> io::Result<()> {
            let mut data = vec![];
            bytes_read = read.read_to_end(&mut data)?;

            let mut outbuf = vec![];
            encoder.run(&data, &mut outbuf).map_err(crate::decode::into_io)?;
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
    /// Encode all data from an async reader.
    ///
    /// The reader is drained into memory before encoding starts. Nothing is written unless
    /// encoding succeeds.
    pub async fn encode_all(self, read: impl futures::io::AsyncRead) -> AllResult {
        use futures::io::{AsyncReadExt, AsyncWriteExt};

        let IntoAsync { encoder, mut writer } = self;
        futures::pin_mut!(read);

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let status = async {
            let mut data = vec![];
            bytes_read = read.read_to_end(&mut data).await?;

            let mut outbuf = vec![];
            encoder.run(&data, &mut outbuf).map_err(crate::decode::into_io)?;
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

impl<'o> EncodeState<'o> {
    fn new(capacity: usize, out: &'o mut Vec<u8>) -> Self {
        EncodeState {
            dict: Dictionary::new(capacity),
            prefix: Vec::new(),
            pending: Pending::Empty,
            out,
        }
    }

    /// Extend the current match by one byte, or emit it and start a new one.
    fn advance(&mut self, byte: u8) -> Result<(), LzwError> {
        self.prefix.push(byte);

        let extended = match (self.pending, self.prefix.len()) {
            (Pending::Empty, _) => Some(Pending::Byte(byte)),
            (_, 2) if self.dict.contains(&self.prefix) => {
                Some(Pending::Pair(self.prefix[0], byte))
            }
            _ => self.dict.lookup_code(&self.prefix).map(Pending::Entry),
        };

        match extended {
            Some(pending) => self.pending = pending,
            None => {
                self.emit()?;
                // Inserting may fail once the dictionary is full, which is fine.
                let _ = self.dict.insert(&self.prefix);
                self.prefix.clear();
                self.prefix.push(byte);
                self.pending = Pending::Byte(byte);
            }
        }
        Ok(())
    }

    /// Write out whatever is still matched at the end of input.
    fn finish(&mut self) -> Result<(), LzwError> {
        self.emit()?;
        self.prefix.clear();
        self.pending = Pending::Empty;
        Ok(())
    }

    fn emit(&mut self) -> Result<(), LzwError> {
        match self.pending {
            Pending::Empty => Ok(()),
            Pending::Byte(byte) => Unit::Literal(byte).write(self.out),
            Pending::Pair(first, second) => {
                Unit::Literal(first).write(self.out)?;
                Unit::Literal(second).write(self.out)
            }
            Pending::Entry(code) => Unit::Reference(code).write(self.out),
        }
    }
}
