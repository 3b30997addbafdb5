//! Signature hash computation for legacy and wrapped witness inputs.
//!
//! Legacy inputs hash a modified copy of the transaction. Wrapped witness inputs hash a
//! fixed-layout preimage built from digests of the prevouts, sequences and outputs.
use crate::messages::{SpendingMode, Tx, TxIn, TxOut};
use crate::script::{op_codes::OP_CODESEPARATOR, Script};
use crate::util::{serialize, sha256d, var_int, write_to_vec, Error, Hash256, Result};
use crate::util::{SIGHASH_ONE, ZERO_HASH};
use log::{trace, warn};
use std::fmt;

/// Bit set on the flag byte when only the signed input is committed to.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Sign all outputs
pub const SIGHASH_ALL: SighashType = SighashType::new(SighashBase::All, false);
/// Sign no outputs so anyone can spend
pub const SIGHASH_NONE: SighashType = SighashType::new(SighashBase::None, false);
/// Sign only the output at the same index as the input
pub const SIGHASH_SINGLE: SighashType = SighashType::new(SighashBase::Single, false);

/// Which outputs a signature commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SighashBase {
    /// Every output
    All = 1,
    /// No outputs
    None = 2,
    /// The output at the signed input's index
    Single = 3,
}

/// Sighash base type and ANYONECANPAY modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SighashType {
    /// Output commitment
    pub base: SighashBase,
    /// Commit to the signed input only
    pub anyone_can_pay: bool,
}

impl SighashType {
    /// Creates a sighash type
    #[must_use]
    pub const fn new(base: SighashBase, anyone_can_pay: bool) -> SighashType {
        SighashType {
            base,
            anyone_can_pay,
        }
    }

    /// Parses the flag byte appended to signatures
    ///
    /// # Errors
    /// `Error::BadArgument` for any base other than 1, 2 or 3, or unknown bits.
    pub fn from_u8(flag: u8) -> Result<SighashType> {
        let base = match flag & !SIGHASH_ANYONECANPAY {
            1 => SighashBase::All,
            2 => SighashBase::None,
            3 => SighashBase::Single,
            _ => return Err(Error::BadArgument(format!("Unknown sighash type: {:#04x}", flag))),
        };
        Ok(SighashType::new(base, flag & SIGHASH_ANYONECANPAY != 0))
    }

    /// Flag byte appended to signatures
    #[must_use]
    #[inline]
    pub fn to_u8(&self) -> u8 {
        let acp = if self.anyone_can_pay {
            SIGHASH_ANYONECANPAY
        } else {
            0
        };
        self.base as u8 | acp
    }

    /// Flag word appended to preimages
    #[must_use]
    #[inline]
    pub fn to_u32(&self) -> u32 {
        u32::from(self.to_u8())
    }
}

impl Default for SighashType {
    fn default() -> SighashType {
        SIGHASH_ALL
    }
}

impl fmt::Display for SighashType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let base = match self.base {
            SighashBase::All => "ALL",
            SighashBase::None => "NONE",
            SighashBase::Single => "SINGLE",
        };
        if self.anyone_can_pay {
            write!(f, "{}|ANYONECANPAY", base)
        } else {
            f.write_str(base)
        }
    }
}

/// Computes the hash to sign for input `n_input` of `tx`.
///
/// `signing_input` is the input being signed with its script field holding the script code:
/// the spent lock script for legacy inputs, the P2PKH script of the key hash for wrapped
/// witness inputs. Its spending mode picks the preimage layout.
///
/// Never fails. An out-of-range `n_input`, or SINGLE without a matching output, gives
/// `SIGHASH_ONE`.
///
/// # Examples
/// ```
/// use segsign::messages::{Tx, TxIn};
/// use segsign::transaction::sighash::{sighash, SIGHASH_ALL};
/// use segsign::util::SIGHASH_ONE;
///
/// let tx = Tx::new(1, 0);
/// assert_eq!(sighash(&tx, &TxIn::default(), 0, SIGHASH_ALL), SIGHASH_ONE);
/// ```
#[must_use]
pub fn sighash(
    tx: &Tx,
    signing_input: &TxIn,
    n_input: usize,
    sighash_type: SighashType,
) -> Hash256 {
    if n_input >= tx.inputs.len() {
        warn!("Sighash input {} out of range of {} inputs", n_input, tx.inputs.len());
        return SIGHASH_ONE;
    }
    if sighash_type.base == SighashBase::Single && n_input >= tx.outputs.len() {
        warn!("SIGHASH_SINGLE input {} has no matching output", n_input);
        return SIGHASH_ONE;
    }
    let mut preimage = match signing_input.mode {
        SpendingMode::Legacy => {
            let synthetic = legacy_sighash_tx(tx, signing_input, n_input, sighash_type);
            write_to_vec(|w| synthetic.write_base(w))
        }
        SpendingMode::WrappedWitness => {
            witness_preimage(tx, signing_input, n_input, sighash_type)
        }
    };
    preimage.extend_from_slice(&sighash_type.to_u32().to_le_bytes());
    let hash = sha256d(&preimage);
    trace!(
        "Sighash input {} {:?} {}: {} byte preimage, hash {}",
        n_input,
        signing_input.mode,
        sighash_type,
        preimage.len(),
        hex::encode(hash.0)
    );
    hash
}

/// Builds the modified transaction a legacy signature commits to.
///
/// The signed input carries `signing_input`'s script with code separators removed. Other
/// inputs are blanked, or dropped under ANYONECANPAY. Outputs are kept, cleared for NONE, or
/// cut to the matching index for SINGLE with zero-value placeholders before it.
#[must_use]
pub fn legacy_sighash_tx(
    tx: &Tx,
    signing_input: &TxIn,
    n_input: usize,
    sighash_type: SighashType,
) -> Tx {
    let base = sighash_type.base;
    let signed = TxIn {
        prev_output: signing_input.prev_output,
        unlock_script: signing_input.unlock_script.remove_op(OP_CODESEPARATOR),
        sequence: signing_input.sequence,
        ..Default::default()
    };

    let inputs = if sighash_type.anyone_can_pay {
        vec![signed]
    } else {
        let mut inputs = Vec::with_capacity(tx.inputs.len());
        for (i, input) in tx.inputs.iter().enumerate() {
            if i == n_input {
                inputs.push(signed.clone());
            } else {
                let sequence = match base {
                    SighashBase::None | SighashBase::Single => 0,
                    SighashBase::All => input.sequence,
                };
                inputs.push(TxIn {
                    prev_output: input.prev_output,
                    unlock_script: Script::new(),
                    sequence,
                    ..Default::default()
                });
            }
        }
        inputs
    };

    let outputs = match base {
        SighashBase::All => tx.outputs.clone(),
        SighashBase::None => vec![],
        SighashBase::Single => {
            let mut outputs = vec![TxOut::default(); n_input.min(tx.outputs.len())];
            if let Some(output) = tx.outputs.get(n_input) {
                outputs.push(output.clone());
            }
            outputs
        }
    };

    Tx {
        version: tx.version,
        inputs,
        outputs,
        lock_time: tx.lock_time,
    }
}

/// Witness preimage without the trailing flag word.
///
/// The signed input's sequence is written as all-ones and the lock time field as zero,
/// whatever the transaction holds.
fn witness_preimage(
    tx: &Tx,
    signing_input: &TxIn,
    n_input: usize,
    sighash_type: SighashType,
) -> Vec<u8> {
    let base = sighash_type.base;
    let acp = sighash_type.anyone_can_pay;

    let hash_prevouts = if acp {
        ZERO_HASH
    } else {
        let mut prevouts = Vec::with_capacity(36 * tx.inputs.len());
        for input in &tx.inputs {
            prevouts.extend_from_slice(&serialize(&input.prev_output));
        }
        sha256d(&prevouts)
    };

    let hash_sequence = if acp || base != SighashBase::All {
        ZERO_HASH
    } else {
        sha256d(&vec![0xff; 4 * tx.inputs.len()])
    };

    let hash_outputs = match base {
        SighashBase::All => {
            let mut outputs = Vec::new();
            for output in &tx.outputs {
                outputs.extend_from_slice(&serialize(output));
            }
            sha256d(&outputs)
        }
        SighashBase::Single => match tx.outputs.get(n_input) {
            Some(output) => sha256d(&serialize(output)),
            None => ZERO_HASH,
        },
        SighashBase::None => ZERO_HASH,
    };

    let script_code = &signing_input.unlock_script.0;
    let mut s = Vec::with_capacity(160 + script_code.len());
    s.extend_from_slice(&tx.version.to_le_bytes());
    s.extend_from_slice(&hash_prevouts.0);
    s.extend_from_slice(&hash_sequence.0);
    s.extend_from_slice(&serialize(&signing_input.prev_output));
    var_int::push(script_code.len() as u64, &mut s);
    s.extend_from_slice(script_code);
    s.extend_from_slice(&signing_input.satoshis.to_le_bytes());
    s.extend_from_slice(&0xffffffffu32.to_le_bytes());
    s.extend_from_slice(&hash_outputs.0);
    s.extend_from_slice(&0u32.to_le_bytes());
    s
}
