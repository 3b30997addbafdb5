//! Signature checkers plugged into the interpreter at OP_CHECKSIG.

use crate::messages::Tx;
use crate::script::Script;
use crate::transaction::sighash::{sighash, SighashType};
use crate::transaction::verify_signature;
use crate::util::{Error, Result};
use log::debug;

/// Callback the interpreter uses to validate signatures.
pub trait Checker {
    /// Verifies a signature (DER plus sighash flag byte) against a public key, with
    /// `script_code` being the script from the last code separator onwards.
    ///
    /// # Errors
    /// Malformed signatures or keys, or no transaction to check against.
    fn check_sig(&mut self, sig: &[u8], pubkey: &[u8], script_code: &[u8]) -> Result<bool>;
}

/// Checker for scripts evaluated without a transaction. Any signature check fails.
#[derive(Default, Clone, Debug)]
pub struct TransactionlessChecker;

impl Checker for TransactionlessChecker {
    fn check_sig(&mut self, _sig: &[u8], _pubkey: &[u8], _script_code: &[u8]) -> Result<bool> {
        Err(Error::BadData("No transaction context".to_string()))
    }
}

/// Checker that recomputes the sighash of one input of a transaction.
///
/// The input's spending mode and referenced value select the legacy or witness layout.
#[derive(Debug, Clone)]
pub struct TransactionChecker<'a> {
    /// The transaction being validated
    pub tx: &'a Tx,
    /// Index of the input being checked
    pub input: usize,
}

impl<'a> TransactionChecker<'a> {
    /// Creates a new transaction checker.
    #[must_use]
    pub fn new(tx: &'a Tx, input: usize) -> Self {
        TransactionChecker { tx, input }
    }
}

impl<'a> Checker for TransactionChecker<'a> {
    fn check_sig(&mut self, sig: &[u8], pubkey: &[u8], script_code: &[u8]) -> Result<bool> {
        let (flag, der) = match sig.split_last() {
            Some(split) => split,
            None => return Ok(false),
        };
        let sighash_type = match SighashType::from_u8(*flag) {
            Ok(t) => t,
            Err(e) => {
                debug!("Rejecting signature on input {}: {}", self.input, e);
                return Ok(false);
            }
        };
        let input = self.tx.inputs.get(self.input).ok_or_else(|| {
            let msg = format!("Input {} of {}", self.input, self.tx.inputs.len());
            Error::BadArgument(msg)
        })?;
        let mut signing_input = input.clone();
        signing_input.unlock_script = Script(script_code.to_vec());
        let hash = sighash(self.tx, &signing_input, self.input, sighash_type);
        verify_signature(der, &hash, pubkey)
    }
}
