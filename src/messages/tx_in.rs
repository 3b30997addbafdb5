use crate::address::{classify, lock_script};
use crate::messages::OutPoint;
use crate::network::Network;
use crate::script::Script;
use crate::util::{read_bytes, var_int, Error, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Longest script accepted when decoding
pub const MAX_SCRIPT_LEN: usize = 10_000;
/// Most witness items accepted for one input when decoding
pub const MAX_WITNESS_ITEMS: u64 = 100_000;

/// How an input is signed and serialized
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SpendingMode {
    /// Pay-to-public-key-hash: signature and key in the unlock script
    #[default]
    Legacy,
    /// Pay-to-witness-key-hash nested in pay-to-script-hash: redeem script in the unlock
    /// script, signature and key in the witness
    WrappedWitness,
}

/// Transaction input
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TxIn {
    /// The previous output transaction reference
    pub prev_output: OutPoint,
    /// Unlock script. Before signing this holds the spent output's lock script.
    pub unlock_script: Script,
    /// Transaction version as defined by the sender for replacement or negotiation
    pub sequence: u32,
    /// Witness stack items, empty for legacy inputs
    pub witness: Vec<Vec<u8>>,
    /// Value of the spent output. Hashed by witness signatures, never serialized.
    pub satoshis: u64,
    /// Signing strategy, fixed when the input is created
    pub mode: SpendingMode,
}

impl Default for TxIn {
    fn default() -> TxIn {
        TxIn {
            prev_output: OutPoint::default(),
            unlock_script: Script::new(),
            sequence: 0xffffffff,
            witness: vec![],
            satoshis: 0,
            mode: SpendingMode::Legacy,
        }
    }
}

impl TxIn {
    /// Creates an unsigned input spending an output with the given lock script and value.
    #[must_use]
    pub fn new(
        prev_output: OutPoint,
        prev_lock_script: Script,
        satoshis: u64,
        mode: SpendingMode,
    ) -> TxIn {
        TxIn {
            prev_output,
            unlock_script: prev_lock_script,
            satoshis,
            mode,
            ..Default::default()
        }
    }

    /// Creates an unsigned input spending an output paid to `address`.
    ///
    /// The spending mode comes from the address type: P2PKH is legacy, P2SH is wrapped witness.
    ///
    /// # Errors
    /// `Error::AddressError` if the address does not decode or belongs to another network.
    pub fn from_address(
        network: Network,
        address: &str,
        prev_output: OutPoint,
        satoshis: u64,
    ) -> Result<TxIn> {
        let mode = classify(network, address)?.spending_mode();
        let script = lock_script(network, address)?;
        Ok(TxIn::new(prev_output, script, satoshis, mode))
    }

    /// Returns whether the input spends the null coinbase out point
    #[must_use]
    #[inline]
    pub fn is_coinbase(&self) -> bool {
        self.prev_output.is_coinbase()
    }

    /// Returns the size of the input without its witness
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        OutPoint::SIZE
            + var_int::size(self.unlock_script.0.len() as u64)
            + self.unlock_script.0.len()
            + 4
    }

    /// Returns the size of the input's witness section entry
    #[must_use]
    pub fn witness_size(&self) -> usize {
        var_int::size(self.witness.len() as u64)
            + self
                .witness
                .iter()
                .map(|item| var_int::size(item.len() as u64) + item.len())
                .sum::<usize>()
    }

    /// Writes the input's witness: the item count then each length-prefixed item.
    ///
    /// No items is a single zero byte.
    pub fn write_witness(&self, writer: &mut dyn Write) -> io::Result<()> {
        var_int::write(self.witness.len() as u64, writer)?;
        for item in &self.witness {
            var_int::write(item.len() as u64, writer)?;
            writer.write_all(item)?;
        }
        Ok(())
    }

    /// Reads a witness written by `write_witness`.
    ///
    /// # Errors
    /// `Error::EncodingError` if truncated or over the decode limits.
    pub fn read_witness(reader: &mut dyn Read) -> Result<Vec<Vec<u8>>> {
        let n_items = var_int::read(reader)?;
        if n_items > MAX_WITNESS_ITEMS {
            let msg = format!("Too many witness items: {}", n_items);
            return Err(Error::EncodingError(msg));
        }
        let mut items = Vec::new();
        for _ in 0..n_items {
            items.push(read_script_bytes(reader)?);
        }
        Ok(items)
    }
}

/// Reads a varint length then that many bytes, bounded by `MAX_SCRIPT_LEN`.
pub(crate) fn read_script_bytes(reader: &mut dyn Read) -> Result<Vec<u8>> {
    let len = var_int::read(reader)?;
    if len > MAX_SCRIPT_LEN as u64 {
        return Err(Error::EncodingError(format!("Script too long: {}", len)));
    }
    read_bytes(reader, len as usize)
}

impl Serializable<TxIn> for TxIn {
    /// Reads the base layout. The witness and referenced value are not part of it.
    fn read(reader: &mut dyn Read) -> Result<TxIn> {
        let prev_output = OutPoint::read(reader)?;
        let unlock_script = Script(read_script_bytes(reader)?);
        let sequence = reader.read_u32::<LittleEndian>()?;
        Ok(TxIn {
            prev_output,
            unlock_script,
            sequence,
            ..Default::default()
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.prev_output.write(writer)?;
        var_int::write(self.unlock_script.0.len() as u64, writer)?;
        writer.write_all(&self.unlock_script.0)?;
        writer.write_u32::<LittleEndian>(self.sequence)
    }
}
