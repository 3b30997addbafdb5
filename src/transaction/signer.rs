//! Per-input signing strategies and all-or-nothing batch signing.
use crate::messages::{SpendingMode, Tx, TxIn};
use crate::transaction::sighash::{sighash, SighashType};
use crate::transaction::{p2pkh, p2sh_p2wpkh};
use crate::util::{Error, Hash256, Result};
use crate::wallet::Key;
use log::debug;
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey};

/// ECDSA primitive used to sign and verify sighashes
pub trait Signer {
    /// Signs a sighash, returning the DER signature without a flag byte
    ///
    /// # Errors
    /// `Error::SigningError` if the private key is invalid.
    fn sign(&self, sighash: &Hash256, private_key: &[u8; 32]) -> Result<Vec<u8>>;

    /// Verifies a DER signature without a flag byte against a sighash and public key
    ///
    /// # Errors
    /// A malformed public key.
    fn verify(&self, sig: &[u8], sighash: &Hash256, public_key: &[u8]) -> Result<bool>;
}

/// Signer backed by libsecp256k1. Signatures are deterministic (RFC 6979) with low S.
#[derive(Default, Clone, Copy, Debug)]
pub struct Secp256k1Signer;

impl Signer for Secp256k1Signer {
    fn sign(&self, sighash: &Hash256, private_key: &[u8; 32]) -> Result<Vec<u8>> {
        let secp = Secp256k1::signing_only();
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| Error::SigningError(format!("Invalid private key: {}", e)))?;
        let message = Message::from_digest_slice(&sighash.0)?;
        let mut signature = secp.sign_ecdsa(&message, &secret_key);
        signature.normalize_s();
        Ok(signature.serialize_der().to_vec())
    }

    fn verify(&self, sig: &[u8], sighash: &Hash256, public_key: &[u8]) -> Result<bool> {
        let secp = Secp256k1::verification_only();
        let public_key = PublicKey::from_slice(public_key)?;
        let mut signature = match Signature::from_der(sig) {
            Ok(signature) => signature,
            Err(e) => {
                debug!("Malformed DER signature: {}", e);
                return Ok(false);
            }
        };
        signature.normalize_s();
        let message = Message::from_digest_slice(&sighash.0)?;
        Ok(secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
    }
}

/// Signs input `n_input` of `tx` with `key`, returning the signed input.
///
/// Legacy inputs hash with the spent lock script held in their script field and get a
/// signature and key push. Wrapped witness inputs hash with the P2PKH script of the key hash
/// and the referenced value, then carry the redeem script push and a two item witness.
///
/// # Errors
/// `Error::BadArgument` for an out-of-range index, or the signer's error.
pub fn sign_input<S: Signer>(
    tx: &Tx,
    n_input: usize,
    key: &Key,
    sighash_type: SighashType,
    signer: &S,
) -> Result<TxIn> {
    let input = tx.inputs.get(n_input).ok_or_else(|| {
        Error::BadArgument(format!("Input {} of {}", n_input, tx.inputs.len()))
    })?;
    let mut signed = input.clone();
    match input.mode {
        SpendingMode::Legacy => {
            let hash = sighash(tx, input, n_input, sighash_type);
            let mut sig = signer.sign(&hash, &key.private_key)?;
            sig.push(sighash_type.to_u8());
            signed.unlock_script = p2pkh::create_unlock_script(&sig, &key.public_key)?;
            signed.witness.clear();
        }
        SpendingMode::WrappedWitness => {
            let mut signing_input = input.clone();
            signing_input.unlock_script = p2pkh::create_lock_script(&key.pubkey_hash());
            let hash = sighash(tx, &signing_input, n_input, sighash_type);
            let mut sig = signer.sign(&hash, &key.private_key)?;
            sig.push(sighash_type.to_u8());
            signed.unlock_script = p2sh_p2wpkh::create_unlock_script(&key.witness_redeem_script())?;
            signed.witness = p2sh_p2wpkh::create_witness(&sig, &key.public_key);
        }
    }
    Ok(signed)
}

/// Signs every input of `tx` with the key at the same position in `keys`.
///
/// Returns a new transaction. `tx` is never modified, so a failure on any input leaves the
/// caller with the unsigned transaction.
///
/// # Errors
/// `Error::SigningError` if an input has no key, or the first signing failure.
pub fn sign_transaction(tx: &Tx, keys: &[Key], sighash_type: SighashType) -> Result<Tx> {
    sign_transaction_with(tx, keys, sighash_type, &Secp256k1Signer)
}

/// Same as `sign_transaction` with a caller-supplied signer
///
/// # Errors
/// `Error::SigningError` if an input has no key, or the first signing failure.
pub fn sign_transaction_with<S: Signer>(
    tx: &Tx,
    keys: &[Key],
    sighash_type: SighashType,
    signer: &S,
) -> Result<Tx> {
    let mut inputs = Vec::with_capacity(tx.inputs.len());
    for (i, input) in tx.inputs.iter().enumerate() {
        let key = keys.get(i).ok_or_else(|| {
            Error::SigningError(format!("No key for input {} of {}", i, tx.inputs.len()))
        })?;
        debug!("Signing input {} {:?} {}", i, input.mode, sighash_type);
        inputs.push(sign_input(tx, i, key, sighash_type, signer)?);
    }
    Ok(Tx {
        version: tx.version,
        inputs,
        outputs: tx.outputs.clone(),
        lock_time: tx.lock_time,
    })
}

impl Tx {
    /// Signs every input with the matching key. See `sign_transaction`.
    ///
    /// # Errors
    /// `Error::SigningError` if an input has no key, or the first signing failure.
    pub fn sign(&self, keys: &[Key], sighash_type: SighashType) -> Result<Tx> {
        sign_transaction(self, keys, sighash_type)
    }
}
