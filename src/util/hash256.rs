//! 256-bit hash for transactions and signature hashes.
//!
//! Stored in internal (wire) byte order; hex display is the reverse.
use crate::util::{Error, Result, Serializable};
use bitcoin_hashes::{sha256, sha256d as bh_sha256d, Hash};
use std::fmt;
use std::io;
use std::io::{Read, Write};

/// 32 zero bytes, used by coinbase outpoints and cleared sighash digests.
pub const ZERO_HASH: Hash256 = Hash256([0; 32]);

/// Little-endian 1: the hash returned for an out-of-range input index
/// or an unmatched SIGHASH_SINGLE output.
pub const SIGHASH_ONE: Hash256 = Hash256([
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
]);

/// 256-bit hash in internal byte order.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Converts the hash into a display hex string (byte order reversed).
    #[must_use]
    #[inline]
    pub fn encode(&self) -> String {
        let mut r = self.0;
        r.reverse();
        hex::encode(r)
    }

    /// Converts a string of 64 display-order hex characters into a hash.
    ///
    /// # Errors
    /// `Error::FromHexError` for bad hex, `Error::BadArgument` for a wrong length.
    pub fn decode(s: &str) -> Result<Hash256> {
        let decoded_bytes = hex::decode(s)?;
        if decoded_bytes.len() != 32 {
            let msg = format!("Length {} of decoded bytes", decoded_bytes.len());
            return Err(Error::BadArgument(msg));
        }
        let mut hash_bytes = [0; 32];
        hash_bytes.copy_from_slice(&decoded_bytes);
        hash_bytes.reverse();
        Ok(Hash256(hash_bytes))
    }
}

impl Serializable<Hash256> for Hash256 {
    fn read(reader: &mut dyn Read) -> Result<Hash256> {
        let mut bytes = [0; 32];
        reader.read_exact(&mut bytes)?;
        Ok(Hash256(bytes))
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&self.0)
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }
}

/// Hashes a data array once using SHA256.
#[must_use]
#[inline]
pub fn sha256(data: &[u8]) -> Hash256 {
    Hash256(sha256::Hash::hash(data).to_byte_array())
}

/// Hashes a data array twice using SHA256.
#[must_use]
#[inline]
pub fn sha256d(data: &[u8]) -> Hash256 {
    Hash256(bh_sha256d::Hash::hash(data).to_byte_array())
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn sha256d_test() {
        let x = hex::decode("0123456789abcdef").unwrap();
        let e = hex::encode(sha256d(&x).0);
        assert_eq!(e, "137ad663f79da06e282ed0abbec4d70523ced5ff8e39d5c2e5641d978c5925aa");
    }

    #[test]
    fn sha256_test() {
        let e = hex::encode(sha256(b"abc").0);
        assert_eq!(e, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn hash_decode() {
        let s1 = "0000000000000000000000000000000000000000000000000000000000000000";
        let s2 = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let s3 = "abcdef0000112233445566778899abcdef000011223344556677889912345678";
        assert!(Hash256::decode(s1).is_ok());
        assert!(Hash256::decode(s2).is_ok());
        assert!(Hash256::decode(s3).is_ok());
        let s1 = "000000000000000000000000000000000000000000000000000000000000000";
        let s2 = "00000000000000000000000000000000000000000000000000000000000000000";
        let s3 = "000000000000000000000000000000000000000000000000000000000000000g";
        assert!(Hash256::decode(s1).is_err());
        assert!(Hash256::decode(s2).is_err());
        assert!(Hash256::decode(s3).is_err());
    }

    #[test]
    fn display_order_is_reversed() {
        let h = Hash256::decode("0100000000000000000000000000000000000000000000000000000000000002")
            .unwrap();
        assert_eq!(h.0[0], 2);
        assert_eq!(h.0[31], 1);
        assert_eq!(
            SIGHASH_ONE.encode(),
            "0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn hash_decode_write_read_encode() {
        let s1 = "abcdef0000112233445566778899abcdef000011223344556677889912345678";
        let h1 = Hash256::decode(s1).unwrap();
        let mut v = Vec::new();
        h1.write(&mut v).unwrap();
        let h2 = Hash256::read(&mut Cursor::new(v)).unwrap();
        assert_eq!(s1, h2.encode());
    }

    #[test]
    fn short_read() {
        let err = Hash256::read(&mut Cursor::new(vec![0u8; 31])).unwrap_err();
        assert!(matches!(err, Error::EncodingError(_)));
    }
}
