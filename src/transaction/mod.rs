//! Transaction signing.
//!
//! Computes sighashes for legacy and wrapped witness inputs, signs them with ECDSA, and builds
//! the unlock scripts and witnesses for P2PKH and P2SH-P2WPKH spends.
//!
//! # Examples
//!
//! Sign a P2PKH spend and check it:
//!
//! ```
//! use segsign::messages::{OutPoint, SpendingMode, Tx, TxIn, TxOut};
//! use segsign::transaction::{p2pkh, sighash::SIGHASH_ALL, verify_input};
//! use segsign::util::Hash256;
//! use segsign::wallet::Key;
//!
//! let key = Key::from_private_key(&[1; 32]).unwrap();
//! let lock_script = p2pkh::create_lock_script(&key.pubkey_hash());
//!
//! let mut tx = Tx::new(1, 0);
//! let prev_output = OutPoint { hash: Hash256([9; 32]), index: 0 };
//! tx.add_input(TxIn::new(prev_output, lock_script.clone(), 10_000, SpendingMode::Legacy));
//! tx.add_output(TxOut::new(9_000, lock_script.clone()));
//!
//! let signed = tx.sign(&[key], SIGHASH_ALL).unwrap();
//! verify_input(&signed, 0, &lock_script).unwrap();
//! ```

pub mod p2pkh;
pub mod p2sh_p2wpkh;
pub mod sighash;
mod signer;
mod verify;

pub use self::signer::{
    sign_input, sign_transaction, sign_transaction_with, Secp256k1Signer, Signer,
};
pub use self::verify::verify_input;

use crate::util::{Hash256, Result};

/// Verifies a DER signature, without its sighash flag byte, over a sighash.
///
/// # Errors
/// A malformed public key.
pub fn verify_signature(sig: &[u8], sighash: &Hash256, public_key: &[u8]) -> Result<bool> {
    Secp256k1Signer.verify(sig, sighash, public_key)
}
