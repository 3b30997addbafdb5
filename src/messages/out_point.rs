use crate::util::{Hash256, Result, Serializable, ZERO_HASH};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// The coinbase transaction input will have this hash
pub const COINBASE_OUTPOINT_HASH: Hash256 = ZERO_HASH;
/// The coinbase transaction input will have this index
pub const COINBASE_OUTPOINT_INDEX: u32 = 0xffffffff;

/// Reference to a transaction output
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct OutPoint {
    /// Hash of the referenced transaction, internal byte order
    pub hash: Hash256,
    /// Index of the output in the transaction, zero-indexed
    pub index: u32,
}

impl OutPoint {
    /// Size of the out point in bytes
    pub const SIZE: usize = 36;

    /// Creates an out point from a transaction id in display hex and an output index.
    ///
    /// # Errors
    /// Bad hex or a length other than 32 bytes.
    pub fn from_txid(txid: &str, index: u32) -> Result<OutPoint> {
        let hash = Hash256::decode(txid)?;
        Ok(OutPoint { hash, index })
    }

    /// Returns whether this points at the null output a coinbase input spends
    #[must_use]
    #[inline]
    pub fn is_coinbase(&self) -> bool {
        self.index == COINBASE_OUTPOINT_INDEX && self.hash == COINBASE_OUTPOINT_HASH
    }

    /// Returns the size of the out point in bytes
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        OutPoint::SIZE
    }
}

impl Serializable<OutPoint> for OutPoint {
    fn read(reader: &mut dyn Read) -> Result<OutPoint> {
        let hash = Hash256::read(reader)?;
        let index = reader.read_u32::<LittleEndian>()?;
        Ok(OutPoint { hash, index })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.hash.write(writer)?;
        writer.write_u32::<LittleEndian>(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Error;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn write_read() -> Result<()> {
        let mut v = Vec::new();
        let t = OutPoint::from_txid(
            "123412345678567890ab90abcdefcdef123412345678567890ab90abcdefcdef",
            7,
        )?;
        t.write(&mut v)?;
        assert_eq!(v.len(), t.size());
        // Hash goes out in internal order, index little-endian
        assert_eq!(v[0], 0xef);
        assert_eq!(v[32..].to_vec(), vec![7, 0, 0, 0]);
        assert_eq!(OutPoint::read(&mut Cursor::new(&v))?, t);
        Ok(())
    }

    #[test]
    fn coinbase() -> Result<()> {
        let mut v = Vec::new();
        let t = OutPoint {
            hash: COINBASE_OUTPOINT_HASH,
            index: COINBASE_OUTPOINT_INDEX,
        };
        assert!(t.is_coinbase());
        assert!(!OutPoint { hash: COINBASE_OUTPOINT_HASH, index: 0 }.is_coinbase());
        t.write(&mut v)?;
        assert_eq!(OutPoint::read(&mut Cursor::new(&v))?, t);
        Ok(())
    }

    #[test]
    fn truncated() {
        let err = OutPoint::read(&mut Cursor::new(vec![0u8; 35])).unwrap_err();
        assert!(matches!(err, Error::EncodingError(_)));
    }
}
