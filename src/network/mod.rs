//! Network parameters: address prefixes, extended key versions and account paths.

use crate::util::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Key derivation scheme an account follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// Legacy pay-to-public-key-hash accounts
    Bip44,
    /// Pay-to-witness-key-hash nested in pay-to-script-hash accounts
    Bip49,
}

/// Network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Production network
    Mainnet,
    /// Public test network
    Testnet,
    /// Local regression test network
    Regtest,
}

impl Network {
    /// Version byte of pay-to-public-key-hash addresses.
    #[must_use]
    pub fn p2pkh_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet | Network::Regtest => 0x6f,
        }
    }

    /// Version byte of pay-to-script-hash addresses.
    #[must_use]
    pub fn p2sh_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            Network::Testnet | Network::Regtest => 0xc4,
        }
    }

    /// Account derivation path for the purpose.
    #[must_use]
    pub fn account_path(&self, purpose: Purpose) -> &'static str {
        match (purpose, self) {
            (Purpose::Bip44, Network::Mainnet) => "m/44'/0'/0'",
            (Purpose::Bip44, _) => "m/44'/1'/0'",
            (Purpose::Bip49, Network::Mainnet) => "m/49'/0'/0'",
            (Purpose::Bip49, _) => "m/49'/1'/0'",
        }
    }

    /// Extended public key version bytes (xpub, tpub, ypub, upub).
    #[must_use]
    pub fn public_key_version(&self, purpose: Purpose) -> [u8; 4] {
        match (purpose, self) {
            (Purpose::Bip44, Network::Mainnet) => [0x04, 0x88, 0xb2, 0x1e],
            (Purpose::Bip44, _) => [0x04, 0x35, 0x87, 0xcf],
            (Purpose::Bip49, Network::Mainnet) => [0x04, 0x9d, 0x7c, 0xb2],
            (Purpose::Bip49, _) => [0x04, 0x4a, 0x52, 0x62],
        }
    }

    /// Extended private key version bytes (xprv, tprv, yprv, uprv).
    #[must_use]
    pub fn private_key_version(&self, purpose: Purpose) -> [u8; 4] {
        match (purpose, self) {
            (Purpose::Bip44, Network::Mainnet) => [0x04, 0x88, 0xad, 0xe4],
            (Purpose::Bip44, _) => [0x04, 0x35, 0x83, 0x94],
            (Purpose::Bip49, Network::Mainnet) => [0x04, 0x9d, 0x78, 0x78],
            (Purpose::Bip49, _) => [0x04, 0x4a, 0x4e, 0x28],
        }
    }

    /// Finds the public version matching a private version across all networks and purposes.
    #[must_use]
    pub fn public_version_for(private_version: [u8; 4]) -> Option<[u8; 4]> {
        for network in [Network::Mainnet, Network::Testnet] {
            for purpose in [Purpose::Bip44, Purpose::Bip49] {
                if network.private_key_version(purpose) == private_version {
                    return Some(network.public_key_version(purpose));
                }
            }
        }
        None
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Network> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            _ => Err(Error::BadArgument(format!("Unknown network: {}", s))),
        }
    }
}
