//! Base58Check addresses and their classification into spending modes.
//!
//! A P2PKH address pays to a key hash and is spent legacy style. A P2SH address is treated as
//! a P2WPKH program nested in P2SH and is spent with a witness.

use crate::messages::SpendingMode;
use crate::network::Network;
use crate::script::op_codes::{OP_EQUAL, OP_HASH160, OP_PUSH};
use crate::script::Script;
use crate::transaction::{p2pkh, p2sh_p2wpkh};
use crate::util::{hash160, sha256d, Error, Hash160, Result};
use base58::{FromBase58, ToBase58};

/// Length of a decoded address: version, 20 byte hash and 4 byte checksum
const ADDRESS_LEN: usize = 25;

/// Script type an address pays to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressType {
    /// Pay to public key hash
    P2PKH,
    /// Pay to script hash
    P2SH,
}

impl AddressType {
    /// How inputs spending this address type are signed
    #[must_use]
    pub fn spending_mode(&self) -> SpendingMode {
        match self {
            AddressType::P2PKH => SpendingMode::Legacy,
            AddressType::P2SH => SpendingMode::WrappedWitness,
        }
    }
}

/// Encodes a Base58Check address from a version byte and 20 byte hash.
///
/// # Errors
/// `Error::AddressError` if the payload is not 20 bytes.
///
/// # Examples
/// ```
/// use segsign::address::encode_address;
/// let addr = encode_address(0x00, &[0u8; 20]).unwrap();
/// assert_eq!(addr, "1111111111111111111114oLvT2");
/// ```
pub fn encode_address(version: u8, payload: &[u8]) -> Result<String> {
    if payload.len() != 20 {
        let msg = format!("Payload must be 20 bytes, got {}", payload.len());
        return Err(Error::AddressError(msg));
    }
    let mut hash = Hash160([0; 20]);
    hash.0.copy_from_slice(payload);
    Ok(hash_address(version, &hash))
}

/// Decodes a Base58Check address into its version byte and hash.
///
/// # Errors
/// `Error::AddressError` for bad base58, length or checksum.
pub fn decode_address(address: &str) -> Result<(u8, Hash160)> {
    let bytes = address
        .from_base58()
        .map_err(|e| Error::AddressError(format!("Bad base58: {:?}", e)))?;
    if bytes.len() != ADDRESS_LEN {
        return Err(Error::AddressError(format!("Bad length: {}", bytes.len())));
    }
    let checksum = sha256d(&bytes[..21]);
    if checksum.0[..4] != bytes[21..] {
        return Err(Error::AddressError("Bad checksum".to_string()));
    }
    let mut hash = Hash160([0; 20]);
    hash.0.copy_from_slice(&bytes[1..21]);
    Ok((bytes[0], hash))
}

/// Classifies an address by its version byte on the given network.
///
/// # Errors
/// `Error::AddressError` if it fails to decode or its prefix belongs to another network.
pub fn classify(network: Network, address: &str) -> Result<AddressType> {
    let (version, _) = decode_address(address)?;
    classify_version(network, version)
}

fn classify_version(network: Network, version: u8) -> Result<AddressType> {
    if version == network.p2pkh_prefix() {
        Ok(AddressType::P2PKH)
    } else if version == network.p2sh_prefix() {
        Ok(AddressType::P2SH)
    } else {
        let msg = format!("Prefix {:#04x} is not a {} address", version, network);
        Err(Error::AddressError(msg))
    }
}

/// Creates the lock script paying to an address.
///
/// P2PKH gives `DUP HASH160 <hash> EQUALVERIFY CHECKSIG` and P2SH gives `HASH160 <hash> EQUAL`.
///
/// # Errors
/// `Error::AddressError` if the address is invalid for the network.
pub fn lock_script(network: Network, address: &str) -> Result<Script> {
    let (version, hash) = decode_address(address)?;
    Ok(match classify_version(network, version)? {
        AddressType::P2PKH => p2pkh::create_lock_script(&hash),
        AddressType::P2SH => {
            let mut script = Script::new();
            script.append(OP_HASH160);
            script.append(OP_PUSH + 20);
            script.append_slice(&hash.0);
            script.append(OP_EQUAL);
            script
        }
    })
}

/// P2PKH address of a public key
#[must_use]
pub fn p2pkh_address(network: Network, public_key: &[u8]) -> String {
    hash_address(network.p2pkh_prefix(), &hash160(public_key))
}

/// P2SH address of the P2WPKH redeem script for a public key
#[must_use]
pub fn p2sh_p2wpkh_address(network: Network, public_key: &[u8]) -> String {
    let redeem = p2sh_p2wpkh::redeem_script(public_key);
    hash_address(network.p2sh_prefix(), &hash160(&redeem.0))
}

fn hash_address(version: u8, hash: &Hash160) -> String {
    let mut v = [0u8; ADDRESS_LEN];
    v[0] = version;
    v[1..21].copy_from_slice(&hash.0);
    let checksum = sha256d(&v[..21]);
    v[21..].copy_from_slice(&checksum.0[..4]);
    v.to_base58()
}
