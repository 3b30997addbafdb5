//! Byte codec helpers: hashes, varints, serialization and errors.

pub mod hash160;
mod hash256;
mod result;
mod serdes;
pub mod var_int;

pub use self::hash160::{hash160, Hash160};
pub use self::hash256::{sha256, sha256d, Hash256, SIGHASH_ONE, ZERO_HASH};
pub use self::result::{Error, Result, ScriptErrorKind};
pub(crate) use self::serdes::read_bytes;
pub use self::serdes::{serialize, write_to_vec, Serializable};
