//! Script opcodes, builder and interpreter
//!
//! # Examples
//!
//! Evaluate a script that adds two numbers:
//!
//! ```rust
//! use segsign::script::op_codes::*;
//! use segsign::script::{Script, TransactionlessChecker};
//!
//! let mut script = Script::new();
//! script.append(OP_2);
//! script.append(OP_3);
//! script.append(OP_ADD);
//! script.append_num(5).unwrap();
//! script.append(OP_EQUAL);
//!
//! script.eval(&mut TransactionlessChecker {}).unwrap();
//! ```

use crate::util::{Error, Result, ScriptErrorKind};
use std::fmt;

mod checker;
mod interpreter;
pub mod op_codes;
pub mod stack;

pub use self::checker::{Checker, TransactionChecker, TransactionlessChecker};
pub use self::interpreter::{eval, next_op, ExecutionContext};
use self::op_codes::*;

/// One tokenized element of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// A non-push opcode
    Op(u8),
    /// A data push: the push opcode and its payload
    Push(u8, &'a [u8]),
}

/// Transaction script
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Script(pub Vec<u8>);

impl Script {
    /// Creates a new empty script
    #[must_use]
    pub fn new() -> Script {
        Script(vec![])
    }

    /// Appends a single opcode or data byte
    pub fn append(&mut self, byte: u8) {
        self.0.push(byte);
    }

    /// Appends a slice of data
    pub fn append_slice(&mut self, slice: &[u8]) {
        self.0.extend_from_slice(slice);
    }

    /// Appends the opcodes and provided data that push it onto the stack
    ///
    /// The shortest encoding for the payload length is used. An empty payload is OP_0.
    ///
    /// # Errors
    /// `Error::BadArgument` if the payload is longer than a 4-byte length can express.
    pub fn append_data(&mut self, data: &[u8]) -> Result<()> {
        let len = data.len();
        match len {
            0 => self.0.push(OP_0),
            1..=75 => self.0.push(OP_PUSH + len as u8),
            76..=255 => {
                self.0.push(OP_PUSHDATA1);
                self.0.push(len as u8);
            }
            256..=65535 => {
                self.0.push(OP_PUSHDATA2);
                self.0.extend_from_slice(&(len as u16).to_le_bytes());
            }
            _ => {
                let len = u32::try_from(len)
                    .map_err(|_| Error::BadArgument(format!("Data too long: {}", len)))?;
                self.0.push(OP_PUSHDATA4);
                self.0.extend_from_slice(&len.to_le_bytes());
            }
        }
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Appends the opcodes to push a number to the stack
    ///
    /// -1 and 0 to 16 use their dedicated opcodes.
    ///
    /// # Errors
    /// Never for numbers in range, but shares `append_data`'s signature.
    pub fn append_num(&mut self, n: i32) -> Result<()> {
        match n {
            -1 => self.append(OP_1NEGATE),
            0 => self.append(OP_0),
            1..=16 => self.append(OP_1 + (n - 1) as u8),
            _ => self.append_data(&stack::encode_num(i64::from(n)))?,
        }
        Ok(())
    }

    /// Returns a copy of the script with every occurrence of a non-push opcode removed
    ///
    /// Push payloads are never matched. Bytes after a truncated push are kept as they are.
    #[must_use]
    pub fn remove_op(&self, op: u8) -> Script {
        let script = &self.0;
        let mut result = Vec::with_capacity(script.len());
        let mut i = 0;
        while i < script.len() {
            let next = next_op(i, script).min(script.len());
            if script[i] != op {
                result.extend_from_slice(&script[i..next]);
            }
            i = next;
        }
        Script(result)
    }

    /// Splits the script into opcodes and data pushes
    ///
    /// # Errors
    /// `ScriptErrorKind::TruncatedPush` if a push runs past the end of the script.
    pub fn chunks(&self) -> Result<Vec<Chunk<'_>>> {
        let script = &self.0;
        let mut chunks = Vec::new();
        let mut i = 0;
        while i < script.len() {
            let op = script[i];
            let next = next_op(i, script);
            if op == OP_0 || op > OP_PUSHDATA4 {
                chunks.push(Chunk::Op(op));
            } else {
                let header = match op {
                    OP_PUSHDATA1 => 1,
                    OP_PUSHDATA2 => 2,
                    OP_PUSHDATA4 => 4,
                    _ => 0,
                };
                let start = i + 1 + header;
                if start > script.len() || next > script.len() {
                    return Err(ScriptErrorKind::TruncatedPush { offset: i }.into());
                }
                chunks.push(Chunk::Push(op, &script[start..next]));
            }
            i = next;
        }
        Ok(chunks)
    }

    /// Evaluates a script using the provided checker
    ///
    /// # Errors
    /// `Error::ScriptError` if the script fails or finishes with false on top.
    pub fn eval<T: Checker>(&self, checker: &mut T) -> Result<()> {
        self::interpreter::eval(&self.0, checker)
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chunks = match self.chunks() {
            Ok(chunks) => chunks,
            Err(_) => return write!(f, "<malformed script {}>", hex::encode(&self.0)),
        };
        let mut parts = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            match chunk {
                Chunk::Push(_, data) => parts.push(hex::encode(data)),
                Chunk::Op(op) => match op_name(op) {
                    Some(name) => parts.push(name.to_string()),
                    None => parts.push(format!("OP_UNKNOWN({})", op)),
                },
            }
        }
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_data() -> Result<()> {
        let mut s = Script::new();
        s.append_data(&[])?;
        assert_eq!(s.0, vec![OP_0]);

        let mut s = Script::new();
        s.append_data(&[0; 75])?;
        assert_eq!(s.0[0], OP_PUSH + 75);
        assert_eq!(s.0.len(), 76);

        let mut s = Script::new();
        s.append_data(&[0; 76])?;
        assert_eq!(s.0[..2].to_vec(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(s.0.len(), 78);

        let mut s = Script::new();
        s.append_data(&[0; 256])?;
        assert_eq!(s.0[..3].to_vec(), vec![OP_PUSHDATA2, 0, 1]);

        let mut s = Script::new();
        s.append_data(&[0; 65536])?;
        assert_eq!(s.0[..5].to_vec(), vec![OP_PUSHDATA4, 0, 0, 1, 0]);
        assert_eq!(s.0.len(), 65541);
        Ok(())
    }

    #[test]
    fn append_num() -> Result<()> {
        let mut s = Script::new();
        s.append_num(-1)?;
        s.append_num(0)?;
        s.append_num(1)?;
        s.append_num(16)?;
        s.append_num(17)?;
        s.append_num(-5)?;
        assert_eq!(s.0, vec![OP_1NEGATE, OP_0, OP_1, OP_16, 1, 17, 1, 0x85]);
        Ok(())
    }

    #[test]
    fn remove_op() {
        let s = Script(vec![OP_CODESEPARATOR, OP_DUP, OP_CODESEPARATOR, OP_CHECKSIG]);
        assert_eq!(s.remove_op(OP_CODESEPARATOR).0, vec![OP_DUP, OP_CHECKSIG]);

        // Payload bytes equal to the opcode stay
        let s = Script(vec![2, OP_CODESEPARATOR, OP_CODESEPARATOR, OP_CODESEPARATOR]);
        assert_eq!(s.remove_op(OP_CODESEPARATOR).0, vec![2, OP_CODESEPARATOR, OP_CODESEPARATOR]);

        // Truncated trailing push kept verbatim
        let s = Script(vec![OP_CODESEPARATOR, OP_1, 5, OP_CODESEPARATOR]);
        assert_eq!(s.remove_op(OP_CODESEPARATOR).0, vec![OP_1, 5, OP_CODESEPARATOR]);
    }

    #[test]
    fn chunks() -> Result<()> {
        let s = Script(hex!("76a914751e76e8199196d454941c45d1b3a323f1433bd688ac").to_vec());
        let chunks = s.chunks()?;
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0], Chunk::Op(OP_DUP));
        assert_eq!(
            chunks[2],
            Chunk::Push(20, &hex!("751e76e8199196d454941c45d1b3a323f1433bd6")[..])
        );
        assert_eq!(chunks[4], Chunk::Op(OP_CHECKSIG));

        let s = Script(vec![OP_PUSHDATA1, 3, 1, 2]);
        assert!(matches!(
            s.chunks().unwrap_err(),
            Error::ScriptError(ScriptErrorKind::TruncatedPush { offset: 0 })
        ));
        let s = Script(vec![OP_DUP, OP_PUSHDATA4, 0]);
        assert!(s.chunks().is_err());
        Ok(())
    }

    #[test]
    fn debug() {
        let s = Script(hex!("76a914751e76e8199196d454941c45d1b3a323f1433bd688ac").to_vec());
        assert_eq!(
            format!("{:?}", s),
            "OP_DUP OP_HASH160 751e76e8199196d454941c45d1b3a323f1433bd6 OP_EQUALVERIFY OP_CHECKSIG"
        );
        assert_eq!(format!("{:?}", Script(vec![0xba])), "OP_UNKNOWN(186)");
        assert_eq!(format!("{:?}", Script(vec![5, 1])), "<malformed script 0501>");
    }
}
