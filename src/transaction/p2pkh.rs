//! Pay-to-public-key-hash scripts.
//!
//! The lock script is the standard "send to address" script. The unlock script pushes the
//! signature then the public key.
use crate::script::op_codes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160, OP_PUSH};
use crate::script::{next_op, Script};
use crate::util::{Error, Hash160, Result};

/// Length of a P2PKH lock script
pub const LOCK_SCRIPT_LEN: usize = 25;

/// Creates a lock script: DUP HASH160 <hash> EQUALVERIFY CHECKSIG
#[must_use]
pub fn create_lock_script(pubkey_hash: &Hash160) -> Script {
    let mut script = Script::new();
    script.append(OP_DUP);
    script.append(OP_HASH160);
    script.append(OP_PUSH + 20);
    script.append_slice(&pubkey_hash.0);
    script.append(OP_EQUALVERIFY);
    script.append(OP_CHECKSIG);
    script
}

/// Creates an unlock script pushing the signature (with its sighash flag byte) and the
/// public key.
///
/// # Errors
/// `Error::BadArgument` if either item is too long to push.
pub fn create_unlock_script(sig: &[u8], public_key: &[u8]) -> Result<Script> {
    let mut script = Script::new();
    script.append_data(sig)?;
    script.append_data(public_key)?;
    Ok(script)
}

/// Returns whether the script is a P2PKH lock script
#[must_use]
pub fn check_lock_script(lock_script: &[u8]) -> bool {
    lock_script.len() == LOCK_SCRIPT_LEN
        && lock_script[0] == OP_DUP
        && lock_script[1] == OP_HASH160
        && lock_script[2] == OP_PUSH + 20
        && lock_script[23] == OP_EQUALVERIFY
        && lock_script[24] == OP_CHECKSIG
}

/// Returns whether the script is a P2PKH unlock script: a 9 to 73 byte signature push then a
/// 33 or 65 byte public key push.
#[must_use]
pub fn check_unlock_script(unlock_script: &[u8]) -> bool {
    let sig_len = match unlock_script.first() {
        Some(len) => *len,
        None => return false,
    };
    if !(OP_PUSH + 9..=OP_PUSH + 73).contains(&sig_len) {
        return false;
    }
    let i = next_op(0, unlock_script);
    let pk_len = match unlock_script.get(i) {
        Some(len) => *len,
        None => return false,
    };
    if pk_len != OP_PUSH + 33 && pk_len != OP_PUSH + 65 {
        return false;
    }
    next_op(i, unlock_script) == unlock_script.len()
}

/// Extracts the public key from a P2PKH unlock script
///
/// # Errors
/// `Error::BadData` if the script is not a P2PKH unlock script.
pub fn extract_pubkey(unlock_script: &[u8]) -> Result<Vec<u8>> {
    if !check_unlock_script(unlock_script) {
        return Err(Error::BadData("Not a P2PKH unlock script".to_string()));
    }
    let i = next_op(0, unlock_script);
    Ok(unlock_script[i + 1..].to_vec())
}

/// Extracts the public key hash from a P2PKH lock script
///
/// # Errors
/// `Error::BadData` if the script is not a P2PKH lock script.
pub fn extract_pubkeyhash(lock_script: &[u8]) -> Result<Hash160> {
    if !check_lock_script(lock_script) {
        return Err(Error::BadData("Not a P2PKH lock script".to_string()));
    }
    let mut hash160 = Hash160([0; 20]);
    hash160.0.copy_from_slice(&lock_script[3..23]);
    Ok(hash160)
}
