use crate::address::{p2pkh_address, p2sh_p2wpkh_address};
use crate::messages::SpendingMode;
use crate::network::Network;
use crate::script::Script;
use crate::transaction::p2sh_p2wpkh;
use crate::util::{hash160, Error, Hash160, Result};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::fmt;

/// Private key and its compressed public key
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    /// 32 byte secret
    pub private_key: [u8; 32],
    /// 33 byte compressed public key
    pub public_key: [u8; 33],
}

impl Key {
    /// Creates a key from a secret, computing its public key.
    ///
    /// # Errors
    /// `Error::SigningError` if the secret is zero or not below the curve order.
    pub fn from_private_key(private_key: &[u8; 32]) -> Result<Key> {
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| Error::SigningError(format!("Invalid private key: {}", e)))?;
        let public_key = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret_key);
        Ok(Key {
            private_key: *private_key,
            public_key: public_key.serialize(),
        })
    }

    /// Hash160 of the public key
    #[must_use]
    pub fn pubkey_hash(&self) -> Hash160 {
        hash160(&self.public_key)
    }

    /// Witness program a wrapped witness output of this key commits to
    #[must_use]
    pub fn witness_redeem_script(&self) -> Script {
        p2sh_p2wpkh::witness_program(&self.pubkey_hash())
    }

    /// Address receiving to this key, spent in the given mode
    #[must_use]
    pub fn address(&self, network: Network, mode: SpendingMode) -> String {
        match mode {
            SpendingMode::Legacy => p2pkh_address(network, &self.public_key),
            SpendingMode::WrappedWitness => p2sh_p2wpkh_address(network, &self.public_key),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Key")
            .field("public_key", &hex::encode(self.public_key))
            .finish_non_exhaustive()
    }
}
