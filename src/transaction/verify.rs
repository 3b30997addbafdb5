//! Verifies signed inputs by running their scripts through the interpreter.
use crate::messages::{SpendingMode, Tx};
use crate::script::op_codes::OP_CODESEPARATOR;
use crate::script::{Chunk, Script, TransactionChecker};
use crate::transaction::{p2pkh, p2sh_p2wpkh};
use crate::util::{hash160, Error, Result, ScriptErrorKind};

/// Verifies input `n_input` of a signed transaction against the lock script it spends.
///
/// Legacy inputs evaluate the unlock script, a code separator, then the lock script. Wrapped
/// witness inputs check the redeem script against the P2SH hash, read the key hash from the
/// witness program, and evaluate the witness signature and key against the P2PKH script of
/// that hash. Witness signatures commit to the referenced value, which must be set on the input.
///
/// # Errors
/// `Error::ScriptError` if evaluation fails, `Error::BadData` for a malformed spend.
pub fn verify_input(tx: &Tx, n_input: usize, prev_lock_script: &Script) -> Result<()> {
    let input = tx.inputs.get(n_input).ok_or_else(|| {
        Error::BadArgument(format!("Input {} of {}", n_input, tx.inputs.len()))
    })?;
    let mut checker = TransactionChecker::new(tx, n_input);
    match input.mode {
        SpendingMode::Legacy => {
            let mut script = Script::new();
            script.append_slice(&input.unlock_script.0);
            script.append(OP_CODESEPARATOR);
            script.append_slice(&prev_lock_script.0);
            script.eval(&mut checker)
        }
        SpendingMode::WrappedWitness => {
            if !p2sh_p2wpkh::check_lock_script(&prev_lock_script.0) {
                return Err(Error::BadData("Not a P2SH lock script".to_string()));
            }
            let chunks = input.unlock_script.chunks()?;
            let redeem = match chunks.as_slice() {
                [Chunk::Push(_, data)] => *data,
                _ => return Err(Error::BadData("Unlock script is not a single push".to_string())),
            };
            if hash160(redeem).0[..] != prev_lock_script.0[2..22] {
                let kind = ScriptErrorKind::VerifyFailed("Redeem script hash".to_string());
                return Err(Error::ScriptError(kind));
            }
            let program_hash = p2sh_p2wpkh::extract_program_hash(redeem)
                .ok_or_else(|| Error::BadData("Not a key hash witness program".to_string()))?;
            let (sig, pubkey) = match input.witness.as_slice() {
                [sig, pubkey] => (sig, pubkey),
                _ => {
                    let msg = format!("Expected 2 witness items, found {}", input.witness.len());
                    return Err(Error::BadData(msg));
                }
            };
            let mut script = Script::new();
            script.append_data(sig)?;
            script.append_data(pubkey)?;
            script.append(OP_CODESEPARATOR);
            script.append_slice(&p2pkh::create_lock_script(&program_hash).0);
            script.eval(&mut checker)
        }
    }
}
