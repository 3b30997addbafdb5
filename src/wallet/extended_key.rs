//! BIP-32 extended keys.

use crate::network::{Network, Purpose};
use crate::util::{hash160, sha256d, Error, Result, Serializable};
use crate::wallet::{mnemonic_to_seed, Key};
use base58::{FromBase58, ToBase58};
use bitcoin_hashes::hmac::{Hmac, HmacEngine};
use bitcoin_hashes::{sha512, Hash, HashEngine};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use std::fmt;
use std::io::{self, Read, Write};

/// Index offset of hardened children
pub const HARDENED_KEY: u32 = 0x8000_0000;

/// Serialized size of an extended key
pub const EXTENDED_KEY_SIZE: usize = 78;

/// Private or public BIP-32 extended key in its 78 byte serialized form
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedKey(pub [u8; EXTENDED_KEY_SIZE]);

impl ExtendedKey {
    /// Creates a master private key from a seed.
    ///
    /// # Errors
    /// `Error::SigningError` in the rare case the seed hashes to an invalid key.
    pub fn from_seed(seed: &[u8], network: Network, purpose: Purpose) -> Result<ExtendedKey> {
        let i = hmac_sha512(b"Bitcoin seed", &[seed]);
        secret_key(&i[..32])?;

        let mut key = ExtendedKey([0; EXTENDED_KEY_SIZE]);
        key.0[0..4].copy_from_slice(&network.private_key_version(purpose));
        key.0[13..45].copy_from_slice(&i[32..]);
        key.0[46..78].copy_from_slice(&i[..32]);
        Ok(key)
    }

    /// Creates a master private key from a mnemonic phrase.
    ///
    /// # Errors
    /// `Error::SigningError` for an invalid phrase, otherwise see `from_seed`.
    pub fn from_mnemonic(
        phrase: &str,
        passphrase: &str,
        network: Network,
        purpose: Purpose,
    ) -> Result<ExtendedKey> {
        ExtendedKey::from_seed(&mnemonic_to_seed(phrase, passphrase)?, network, purpose)
    }

    /// Version bytes
    #[must_use]
    pub fn version(&self) -> [u8; 4] {
        let mut version = [0u8; 4];
        version.copy_from_slice(&self.0[0..4]);
        version
    }

    /// Depth in the tree, 0 for a master key
    #[must_use]
    pub fn depth(&self) -> u8 {
        self.0[4]
    }

    /// First four bytes of the parent key's hash160
    #[must_use]
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&self.0[5..9]);
        fingerprint
    }

    /// Index of this key under its parent, hardened offset included
    #[must_use]
    pub fn child_number(&self) -> u32 {
        u32::from_be_bytes([self.0[9], self.0[10], self.0[11], self.0[12]])
    }

    /// Chain code
    #[must_use]
    pub fn chain_code(&self) -> [u8; 32] {
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&self.0[13..45]);
        chain_code
    }

    /// Key data: zero then the secret for private keys, the compressed point for public keys
    #[must_use]
    pub fn key(&self) -> [u8; 33] {
        let mut key = [0u8; 33];
        key.copy_from_slice(&self.0[45..78]);
        key
    }

    /// Whether the key data holds a secret
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.0[45] == 0
    }

    /// Compressed public key
    ///
    /// # Errors
    /// Key data that is not a valid secret or point.
    pub fn public_key(&self) -> Result<[u8; 33]> {
        if self.is_private() {
            let secret = secret_key(&self.0[46..78])?;
            Ok(PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret).serialize())
        } else {
            Ok(PublicKey::from_slice(&self.0[45..78])?.serialize())
        }
    }

    /// Returns the public key of a private key, or a copy of a public key.
    ///
    /// # Errors
    /// `Error::BadData` if the version bytes are not known.
    pub fn public(&self) -> Result<ExtendedKey> {
        if !self.is_private() {
            return Ok(self.clone());
        }
        let version = Network::public_version_for(self.version()).ok_or_else(|| {
            Error::BadData(format!("Unknown version: {}", hex::encode(self.version())))
        })?;
        let mut key = self.clone();
        key.0[0..4].copy_from_slice(&version);
        key.0[45..78].copy_from_slice(&self.public_key()?);
        Ok(key)
    }

    /// Converts a private extended key into a signing key
    ///
    /// # Errors
    /// `Error::SigningError` for a public extended key.
    pub fn to_key(&self) -> Result<Key> {
        if !self.is_private() {
            return Err(Error::SigningError("Public extended key cannot sign".to_string()));
        }
        let mut private_key = [0u8; 32];
        private_key.copy_from_slice(&self.0[46..78]);
        Key::from_private_key(&private_key)
    }

    /// Derives the child at `index`, offset into the hardened range if `hardened`.
    ///
    /// # Errors
    /// `Error::SigningError` for hardened derivation from a public key, an index already in
    /// the hardened range, or too deep a tree.
    pub fn derive(&self, index: u32, hardened: bool) -> Result<ExtendedKey> {
        if index >= HARDENED_KEY {
            return Err(Error::SigningError(format!("Index out of range: {}", index)));
        }
        if hardened && !self.is_private() {
            let msg = "Hardened derivation from a public key".to_string();
            return Err(Error::SigningError(msg));
        }
        let depth = self.depth().checked_add(1).ok_or_else(|| {
            Error::SigningError("Maximum derivation depth reached".to_string())
        })?;
        let child_number = if hardened { index + HARDENED_KEY } else { index };

        let parent_public = self.public_key()?;
        let i = if hardened {
            hmac_sha512(&self.chain_code(), &[&self.0[45..78], &child_number.to_be_bytes()[..]])
        } else {
            hmac_sha512(&self.chain_code(), &[&parent_public[..], &child_number.to_be_bytes()[..]])
        };
        let mut il = [0u8; 32];
        il.copy_from_slice(&i[..32]);
        let tweak = Scalar::from_be_bytes(il)
            .map_err(|_| Error::SigningError(format!("Invalid child {}", child_number)))?;

        let mut child = ExtendedKey([0; EXTENDED_KEY_SIZE]);
        child.0[0..4].copy_from_slice(&self.version());
        child.0[4] = depth;
        child.0[5..9].copy_from_slice(&hash160(&parent_public).0[..4]);
        child.0[9..13].copy_from_slice(&child_number.to_be_bytes());
        child.0[13..45].copy_from_slice(&i[32..]);
        if self.is_private() {
            let secret = secret_key(&self.0[46..78])?.add_tweak(&tweak)?;
            child.0[46..78].copy_from_slice(&secret.secret_bytes());
        } else {
            let secp = Secp256k1::verification_only();
            let point = PublicKey::from_slice(&parent_public)?.add_exp_tweak(&secp, &tweak)?;
            child.0[45..78].copy_from_slice(&point.serialize());
        }
        Ok(child)
    }

    /// Derives a descendant by path, such as `m/49'/0'/0'/0/0`.
    ///
    /// Hardened levels end in `'`, `h` or `H`. `m` alone is this key.
    ///
    /// # Errors
    /// `Error::SigningError` for a malformed path or a failed derivation step.
    pub fn derive_path(&self, path: &str) -> Result<ExtendedKey> {
        let invalid = || Error::SigningError(format!("Invalid derivation path: {}", path));
        let mut levels = path.split('/');
        if levels.next() != Some("m") {
            return Err(invalid());
        }
        let mut key = self.clone();
        for level in levels {
            let hardened_suffix = |c: char| c == '\'' || c == 'h' || c == 'H';
            let (digits, hardened) = match level.strip_suffix(hardened_suffix) {
                Some(digits) => (digits, true),
                None => (level, false),
            };
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let index: u32 = digits.parse().map_err(|_| invalid())?;
            key = key.derive(index, hardened)?;
        }
        Ok(key)
    }

    /// Base58Check encoding, such as `xprv...`
    #[must_use]
    pub fn encode(&self) -> String {
        let checksum = sha256d(&self.0);
        let mut v = [0u8; EXTENDED_KEY_SIZE + 4];
        v[..EXTENDED_KEY_SIZE].copy_from_slice(&self.0);
        v[EXTENDED_KEY_SIZE..].copy_from_slice(&checksum.0[..4]);
        v.to_base58()
    }

    /// Decodes a Base58Check extended key
    ///
    /// # Errors
    /// `Error::BadData` for bad base58, length or checksum.
    pub fn decode(s: &str) -> Result<ExtendedKey> {
        let v = s
            .from_base58()
            .map_err(|e| Error::BadData(format!("Bad base58: {:?}", e)))?;
        if v.len() != EXTENDED_KEY_SIZE + 4 {
            return Err(Error::BadData(format!("Bad extended key length: {}", v.len())));
        }
        let checksum = sha256d(&v[..EXTENDED_KEY_SIZE]);
        if checksum.0[..4] != v[EXTENDED_KEY_SIZE..] {
            return Err(Error::BadData("Bad extended key checksum".to_string()));
        }
        let mut key = ExtendedKey([0; EXTENDED_KEY_SIZE]);
        key.0.copy_from_slice(&v[..EXTENDED_KEY_SIZE]);
        Ok(key)
    }
}

impl Serializable<ExtendedKey> for ExtendedKey {
    fn read(reader: &mut dyn Read) -> Result<ExtendedKey> {
        let mut key = ExtendedKey([0; EXTENDED_KEY_SIZE]);
        reader.read_exact(&mut key.0)?;
        Ok(key)
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&self.0)
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_private() {
            write!(f, "ExtendedKey(private, depth {})", self.depth())
        } else {
            write!(f, "ExtendedKey({})", self.encode())
        }
    }
}

fn hmac_sha512(key: &[u8], data: &[&[u8]]) -> [u8; 64] {
    let mut engine = HmacEngine::<sha512::Hash>::new(key);
    for d in data {
        engine.input(d);
    }
    Hmac::<sha512::Hash>::from_engine(engine).to_byte_array()
}

fn secret_key(bytes: &[u8]) -> Result<SecretKey> {
    SecretKey::from_slice(bytes).map_err(|e| Error::SigningError(format!("Invalid secret: {}", e)))
}
