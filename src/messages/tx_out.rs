use crate::address::lock_script;
use crate::messages::tx_in::read_script_bytes;
use crate::network::Network;
use crate::script::{op_codes::OP_RETURN, Script};
use crate::util::{var_int, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Transaction output
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxOut {
    /// Number of satoshis to spend
    pub satoshis: u64,
    /// Public key script to claim the output
    pub lock_script: Script,
}

impl TxOut {
    /// Creates an output paying `satoshis` to a lock script
    #[must_use]
    pub fn new(satoshis: u64, lock_script: Script) -> TxOut {
        TxOut {
            satoshis,
            lock_script,
        }
    }

    /// Creates an output paying `satoshis` to an address
    ///
    /// # Errors
    /// `Error::AddressError` if the address is invalid for the network.
    pub fn to_address(network: Network, address: &str, satoshis: u64) -> Result<TxOut> {
        Ok(TxOut::new(satoshis, lock_script(network, address)?))
    }

    /// Creates a zero-value output carrying `data` after OP_RETURN
    ///
    /// # Errors
    /// `Error::BadArgument` if the data cannot be pushed.
    pub fn op_return(data: &[u8]) -> Result<TxOut> {
        let mut script = Script::new();
        script.append(OP_RETURN);
        script.append_data(data)?;
        Ok(TxOut::new(0, script))
    }

    /// Returns the size of the transaction output in bytes
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        8 + var_int::size(self.lock_script.0.len() as u64) + self.lock_script.0.len()
    }
}

impl Serializable<TxOut> for TxOut {
    fn read(reader: &mut dyn Read) -> Result<TxOut> {
        let satoshis = reader.read_u64::<LittleEndian>()?;
        let lock_script = Script(read_script_bytes(reader)?);
        Ok(TxOut {
            satoshis,
            lock_script,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u64::<LittleEndian>(self.satoshis)?;
        var_int::write(self.lock_script.0.len() as u64, writer)?;
        writer.write_all(&self.lock_script.0)
    }
}
