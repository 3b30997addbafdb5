//! Pay-to-witness-public-key-hash nested in pay-to-script-hash.
//!
//! The output locks to the hash of a redeem script holding a version 0 witness program. The
//! spender's unlock script pushes the redeem script and the signature and key go in the witness.
use crate::script::op_codes::{OP_0, OP_EQUAL, OP_HASH160, OP_PUSH};
use crate::script::Script;
use crate::util::{hash160, Hash160, Result};

/// Length of the version 0 key hash witness program
pub const WITNESS_PROGRAM_LEN: usize = 22;

/// Creates the witness program `0x00 0x14 <pubkey hash>`
#[must_use]
pub fn witness_program(pubkey_hash: &Hash160) -> Script {
    let mut script = Script::new();
    script.append(OP_0);
    script.append(OP_PUSH + 20);
    script.append_slice(&pubkey_hash.0);
    script
}

/// Creates the redeem script for a public key: the witness program of its hash
#[must_use]
pub fn redeem_script(public_key: &[u8]) -> Script {
    witness_program(&hash160(public_key))
}

/// Creates the P2SH lock script `HASH160 <hash of redeem script> EQUAL` for a public key
#[must_use]
pub fn create_lock_script(public_key: &[u8]) -> Script {
    let mut script = Script::new();
    script.append(OP_HASH160);
    script.append(OP_PUSH + 20);
    script.append_slice(&hash160(&redeem_script(public_key).0).0);
    script.append(OP_EQUAL);
    script
}

/// Creates the unlock script: a single push of the redeem script
///
/// # Errors
/// Never for a valid redeem script. Propagates push errors.
pub fn create_unlock_script(redeem_script: &Script) -> Result<Script> {
    let mut script = Script::new();
    script.append_data(&redeem_script.0)?;
    Ok(script)
}

/// Creates the witness items: signature with its sighash flag byte, then the public key
#[must_use]
pub fn create_witness(sig: &[u8], public_key: &[u8]) -> Vec<Vec<u8>> {
    vec![sig.to_vec(), public_key.to_vec()]
}

/// Returns whether the script is a P2SH lock script
#[must_use]
pub fn check_lock_script(lock_script: &[u8]) -> bool {
    lock_script.len() == 23
        && lock_script[0] == OP_HASH160
        && lock_script[1] == OP_PUSH + 20
        && lock_script[22] == OP_EQUAL
}

/// Extracts the key hash from a version 0 key hash witness program
#[must_use]
pub fn extract_program_hash(program: &[u8]) -> Option<Hash160> {
    if program.len() != WITNESS_PROGRAM_LEN || program[0] != OP_0 || program[1] != OP_PUSH + 20 {
        return None;
    }
    let mut hash = Hash160([0; 20]);
    hash.0.copy_from_slice(&program[2..]);
    Some(hash)
}
