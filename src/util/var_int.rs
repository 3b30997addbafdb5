//! Variable length integer (varint / CompactSize) ser/des.

use crate::util::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Returns the number of bytes required for the varint.
#[must_use]
#[inline]
pub fn size(n: u64) -> usize {
    if n <= 252 {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffffffff {
        5
    } else {
        9
    }
}

/// Writes the var int to bytes.
#[inline]
pub fn write(n: u64, writer: &mut dyn Write) -> io::Result<()> {
    if n <= 252 {
        writer.write_u8(n as u8)
    } else if n <= 0xffff {
        writer.write_u8(0xfd)?;
        writer.write_u16::<LittleEndian>(n as u16)
    } else if n <= 0xffffffff {
        writer.write_u8(0xfe)?;
        writer.write_u32::<LittleEndian>(n as u32)
    } else {
        writer.write_u8(0xff)?;
        writer.write_u64::<LittleEndian>(n)
    }
}

/// Appends the var int to an in-memory buffer.
#[inline]
pub fn push(n: u64, out: &mut Vec<u8>) {
    if n <= 252 {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffffffff {
        out.push(0xfe);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

/// Reads a var int from bytes.
///
/// # Errors
/// `Error::EncodingError` if the buffer ends early or the value was not
/// written with the shortest form its marker allows.
#[inline]
pub fn read(reader: &mut dyn Read) -> Result<u64> {
    let n0 = reader.read_u8()?;
    let (n, min) = match n0 {
        0xff => (reader.read_u64::<LittleEndian>()?, 0x1_0000_0000),
        0xfe => (u64::from(reader.read_u32::<LittleEndian>()?), 0x1_0000),
        0xfd => (u64::from(reader.read_u16::<LittleEndian>()?), 0xfd),
        _ => return Ok(u64::from(n0)),
    };
    if n < min {
        return Err(Error::EncodingError(format!(
            "Non-canonical varint: marker 0x{:02x} with value {}",
            n0, n
        )));
    }
    Ok(n)
}
