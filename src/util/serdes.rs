//! Binary serialization/deserialization trait for wire objects.
use crate::util::Result;
use std::io;
use std::io::{Read, Write};

/// An object that may be serialized and deserialized.
pub trait Serializable<T> {
    /// Reads the object from serialized form.
    ///
    /// # Errors
    /// `Error::EncodingError` on truncated or malformed input.
    fn read(reader: &mut dyn Read) -> Result<T>
    where
        Self: Sized;

    /// Writes the object to serialized form.
    ///
    /// # Errors
    /// IO errors from the writer.
    fn write(&self, writer: &mut dyn Write) -> io::Result<()>;
}

/// Serializes an object into a new byte vector.
#[must_use]
pub fn serialize<T: Serializable<T>>(value: &T) -> Vec<u8> {
    write_to_vec(|w| value.write(w))
}

/// Runs a writer callback against a new byte vector and returns the bytes.
#[must_use]
pub fn write_to_vec<F: FnOnce(&mut dyn Write) -> io::Result<()>>(f: F) -> Vec<u8> {
    let mut v = Vec::new();
    f(&mut v).expect("in-memory writers don't error");
    v
}

/// Reads exactly `len` bytes, growing the buffer only as data arrives.
///
/// # Errors
/// `Error::EncodingError` if the reader ends first.
pub(crate) fn read_bytes(reader: &mut dyn Read, len: usize) -> Result<Vec<u8>> {
    let mut v = Vec::with_capacity(len.min(4096));
    let read = reader.take(len as u64).read_to_end(&mut v)?;
    if read != len {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into());
    }
    Ok(v)
}
