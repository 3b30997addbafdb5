//! Transaction entities and their wire layouts
//!
//! Transactions serialize in the base layout unless an input carries witness data, in which
//! case the marker and flag bytes follow the version and a witness section precedes the lock
//! time. The transaction id always hashes the base layout.
//!
//! # Examples
//!
//! Build a transaction and decode it back:
//!
//! ```rust
//! use segsign::messages::{Tx, TxIn, TxOut};
//! use segsign::script::Script;
//!
//! let mut tx = Tx::new(1, 0);
//! tx.add_input(TxIn::default());
//! tx.add_output(TxOut::new(1000, Script(vec![0x51])));
//! let decoded = Tx::from_hex(&tx.to_hex()).unwrap();
//! assert_eq!(decoded.id(), tx.id());
//! ```

mod out_point;
mod tx;
mod tx_in;
mod tx_out;

pub use self::out_point::{OutPoint, COINBASE_OUTPOINT_HASH, COINBASE_OUTPOINT_INDEX};
pub use self::tx::{Tx, MAX_TX_ITEMS};
pub use self::tx_in::{SpendingMode, TxIn, MAX_SCRIPT_LEN, MAX_WITNESS_ITEMS};
pub use self::tx_out::TxOut;
