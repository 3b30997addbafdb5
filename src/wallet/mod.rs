//! Signing keys and their derivation from mnemonics.
//!
//! # Examples
//!
//! Derive the first receive key of a BIP-49 testnet account:
//!
//! ```
//! use segsign::network::{Network, Purpose};
//! use segsign::wallet::ExtendedKey;
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
//! let master = ExtendedKey::from_mnemonic(phrase, "", Network::Testnet, Purpose::Bip49).unwrap();
//! let account = master.derive_path(Network::Testnet.account_path(Purpose::Bip49)).unwrap();
//! let key = account.derive_path("m/0/0").unwrap().to_key().unwrap();
//! assert_eq!(key.public_key.len(), 33);
//! ```

mod extended_key;
mod key;
mod mnemonic;

pub use self::extended_key::{ExtendedKey, EXTENDED_KEY_SIZE, HARDENED_KEY};
pub use self::key::Key;
pub use self::mnemonic::{mnemonic_to_seed, PBKDF2_ROUNDS};
