use crate::messages::{SpendingMode, TxIn, TxOut};
use crate::util::{
    serialize, sha256d, var_int, write_to_vec, Error, Hash256, Result, Serializable,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io;
use std::io::{Cursor, Read, Write};

/// Most inputs or outputs accepted when decoding
pub const MAX_TX_ITEMS: u64 = 100_000;

/// Marker byte that replaces the input count in the witness layout
const WITNESS_MARKER: u8 = 0x00;
/// Flag byte that follows the marker
const WITNESS_FLAG: u8 = 0x01;

/// Bitcoin transaction
#[derive(Default, PartialEq, Eq, Hash, Clone)]
pub struct Tx {
    /// Transaction version
    pub version: u32,
    /// Transaction inputs
    pub inputs: Vec<TxIn>,
    /// Transaction outputs
    pub outputs: Vec<TxOut>,
    /// The block number or timestamp at which this transaction is unlocked
    pub lock_time: u32,
}

impl Tx {
    /// Creates a transaction with no inputs or outputs
    #[must_use]
    pub fn new(version: u32, lock_time: u32) -> Tx {
        Tx {
            version,
            lock_time,
            ..Default::default()
        }
    }

    /// Appends an input
    pub fn add_input(&mut self, input: TxIn) {
        self.inputs.push(input);
    }

    /// Appends an output
    pub fn add_output(&mut self, output: TxOut) {
        self.outputs.push(output);
    }

    /// Returns whether any input carries witness data, which selects the witness layout
    #[must_use]
    pub fn is_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    /// Calculates the hash of the transaction in internal byte order
    ///
    /// Witness data never contributes.
    #[must_use]
    pub fn hash(&self) -> Hash256 {
        sha256d(&write_to_vec(|w| self.write_base(w)))
    }

    /// Transaction id: the hash in display byte order, as hex
    #[must_use]
    pub fn id(&self) -> String {
        self.hash().encode()
    }

    /// Returns whether the transaction is the block reward
    #[must_use]
    #[inline]
    pub fn coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_coinbase()
    }

    /// Size of the layout `hash` covers
    #[must_use]
    pub fn base_size(&self) -> usize {
        8 + var_int::size(self.inputs.len() as u64)
            + self.inputs.iter().map(|tx_in| tx_in.size()).sum::<usize>()
            + var_int::size(self.outputs.len() as u64)
            + self.outputs.iter().map(|tx_out| tx_out.size()).sum::<usize>()
    }

    /// Size of the full serialization, including the witness section when present
    #[must_use]
    pub fn size(&self) -> usize {
        if self.is_witness() {
            self.base_size()
                + 2
                + self.inputs.iter().map(|tx_in| tx_in.witness_size()).sum::<usize>()
        } else {
            self.base_size()
        }
    }

    /// Writes the layout without marker, flag or witness section
    pub fn write_base(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.write_layout(writer, false)
    }

    fn write_layout(&self, writer: &mut dyn Write, witness: bool) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.version)?;
        if witness {
            writer.write_u8(WITNESS_MARKER)?;
            writer.write_u8(WITNESS_FLAG)?;
        }
        var_int::write(self.inputs.len() as u64, writer)?;
        for tx_in in &self.inputs {
            tx_in.write(writer)?;
        }
        var_int::write(self.outputs.len() as u64, writer)?;
        for tx_out in &self.outputs {
            tx_out.write(writer)?;
        }
        if witness {
            for tx_in in &self.inputs {
                tx_in.write_witness(writer)?;
            }
        }
        writer.write_u32::<LittleEndian>(self.lock_time)
    }

    /// Full serialization as hex
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(serialize(self))
    }

    /// Decodes a transaction from hex, requiring every byte to be consumed
    ///
    /// A transaction with no inputs and one output starts with the same two bytes as the witness
    /// layout. When the witness reading fails, the bytes are read again as that base layout.
    ///
    /// # Errors
    /// Bad hex, malformed data or trailing bytes.
    pub fn from_hex(s: &str) -> Result<Tx> {
        let bytes = hex::decode(s)?;
        match read_exact(&bytes, Tx::read) {
            Err(e) if bytes.get(4..6) == Some(&[WITNESS_MARKER, WITNESS_FLAG][..]) => {
                read_exact(&bytes, read_without_inputs).map_err(|_| e)
            }
            result => result,
        }
    }

    /// Reads inputs, outputs, witnesses when `witness` is set, and the lock time
    fn read_body(reader: &mut dyn Read, version: u32, n_inputs: u64, witness: bool) -> Result<Tx> {
        let mut inputs = Vec::new();
        for _ in 0..n_inputs {
            inputs.push(TxIn::read(reader)?);
        }
        let n_outputs = read_count(reader, "outputs")?;
        let mut outputs = Vec::new();
        for _ in 0..n_outputs {
            outputs.push(TxOut::read(reader)?);
        }
        if witness {
            for tx_in in inputs.iter_mut() {
                tx_in.witness = TxIn::read_witness(reader)?;
                if !tx_in.witness.is_empty() {
                    tx_in.mode = SpendingMode::WrappedWitness;
                }
            }
        }
        let lock_time = reader.read_u32::<LittleEndian>()?;
        Ok(Tx {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }
}

/// Runs `read` over `bytes` and fails unless every byte was consumed
fn read_exact(bytes: &[u8], read: fn(&mut dyn Read) -> Result<Tx>) -> Result<Tx> {
    let mut cursor = Cursor::new(bytes);
    let tx = read(&mut cursor)?;
    if cursor.position() != bytes.len() as u64 {
        let extra = bytes.len() as u64 - cursor.position();
        return Err(Error::EncodingError(format!("{} trailing bytes", extra)));
    }
    Ok(tx)
}

/// Reads the base layout of a transaction whose input count is zero
fn read_without_inputs(reader: &mut dyn Read) -> Result<Tx> {
    let version = reader.read_u32::<LittleEndian>()?;
    let n_inputs = read_count(reader, "inputs")?;
    if n_inputs != 0 {
        return Err(Error::EncodingError(format!("Expected no inputs, got {}", n_inputs)));
    }
    Tx::read_body(reader, version, 0, false)
}

fn read_count(reader: &mut dyn Read, what: &str) -> Result<u64> {
    let n = var_int::read(reader)?;
    if n > MAX_TX_ITEMS {
        return Err(Error::EncodingError(format!("Too many {}: {}", what, n)));
    }
    Ok(n)
}

impl Serializable<Tx> for Tx {
    /// Reads either layout. Inputs that come with witness items are marked wrapped witness.
    ///
    /// A zero byte where the input count belongs is the witness marker only when the flag
    /// follows. Otherwise it is an empty input list.
    fn read(reader: &mut dyn Read) -> Result<Tx> {
        let version = reader.read_u32::<LittleEndian>()?;
        let first = reader.read_u8()?;
        if first != WITNESS_MARKER {
            let prefix = [first];
            let mut chained = (&prefix[..]).chain(&mut *reader);
            let n_inputs = read_count(&mut chained, "inputs")?;
            return Tx::read_body(&mut chained, version, n_inputs, false);
        }
        let second = reader.read_u8()?;
        if second != WITNESS_FLAG {
            let prefix = [second];
            let mut chained = (&prefix[..]).chain(&mut *reader);
            return Tx::read_body(&mut chained, version, 0, false);
        }
        let n_inputs = read_count(reader, "inputs")?;
        let tx = Tx::read_body(reader, version, n_inputs, true)?;
        if !tx.is_witness() {
            let msg = "Witness layout without witness data".to_string();
            return Err(Error::EncodingError(msg));
        }
        Ok(tx)
    }

    /// Writes the witness layout if any input has witness data, otherwise the base layout
    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.write_layout(writer, self.is_witness())
    }
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inputs_str = format!("[<{} inputs>]", self.inputs.len());
        let outputs_str = format!("[<{} outputs>]", self.outputs.len());

        let mut ds = f.debug_struct("Tx");
        ds.field("version", &self.version);
        if self.inputs.len() <= 3 {
            ds.field("inputs", &self.inputs);
        } else {
            ds.field("inputs", &inputs_str);
        }
        if self.outputs.len() <= 3 {
            ds.field("outputs", &self.outputs);
        } else {
            ds.field("outputs", &outputs_str);
        }
        ds.field("lock_time", &self.lock_time).finish()
    }
}
