#![deny(missing_docs)]
#![deny(unsafe_code)]

/*! # Segsign

Builds and signs Bitcoin transactions spending pay-to-public-key-hash outputs and
pay-to-witness-public-key-hash outputs nested in pay-to-script-hash.

Each input carries its spending mode. Signing computes the legacy or witness signature hash for
every input, signs it with secp256k1, and fills in the unlock script and witness. The result
serializes to the wire layout with the witness marker when any input has a witness.

## Usage
```
use segsign::messages::{OutPoint, Tx, TxIn, TxOut};
use segsign::network::Network;
use segsign::transaction::sighash::SIGHASH_ALL;
use segsign::util::Hash256;
use segsign::wallet::Key;

let key = Key::from_private_key(&[1; 32]).unwrap();
let from = key.address(Network::Testnet, segsign::messages::SpendingMode::WrappedWitness);
let prev_output = OutPoint { hash: Hash256([7; 32]), index: 0 };

let mut tx = Tx::new(2, 0);
tx.add_input(TxIn::from_address(Network::Testnet, &from, prev_output, 50_000).unwrap());
tx.add_output(TxOut::to_address(Network::Testnet, "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn", 40_000).unwrap());

let signed = tx.sign(&[key], SIGHASH_ALL).unwrap();
assert!(signed.is_witness());
let hex = signed.to_hex();
assert_eq!(Tx::from_hex(&hex).unwrap().id(), signed.id());
```

The library logs through the `log` facade and never installs a logger.
*/

pub mod address;
pub mod messages;
pub mod network;
pub mod script;
pub mod transaction;
pub mod util;
pub mod wallet;
