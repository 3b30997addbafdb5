//! Standard error and result types for the library.
use hex::FromHexError;
use secp256k1::Error as Secp256k1Error;
use std::io;
use thiserror::Error;

/// Reason a script failed to parse or evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptErrorKind {
    /// An opcode needed more stack items than were available
    #[error("Stack underflow: {required} required, {depth} present")]
    StackUnderflow {
        /// Operands the opcode declares
        required: usize,
        /// Items on the stack when it ran
        depth: usize,
    },
    /// The opcode is not part of the supported set
    #[error("Unknown opcode: 0x{0:02x}")]
    UnknownOpcode(u8),
    /// A data push runs past the end of the script
    #[error("Truncated push at offset {offset}")]
    TruncatedPush {
        /// Byte offset of the push opcode
        offset: usize,
    },
    /// A numeric operand was too long or not minimally encoded
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    /// A VERIFY-style opcode found false on the stack
    #[error("{0} failed")]
    VerifyFailed(String),
    /// The script finished with a false value on top of the stack
    #[error("Top of stack is false")]
    FalseResult,
}

/// Standard error type used in the library
#[derive(Debug, Error)]
pub enum Error {
    /// An argument provided is invalid
    #[error("Bad argument: {0}")]
    BadArgument(String),
    /// The data given is not valid
    #[error("Bad data: {0}")]
    BadData(String),
    /// Wire bytes could not be decoded
    #[error("Encoding error: {0}")]
    EncodingError(String),
    /// Error parsing or evaluating a script
    #[error("Script error: {0}")]
    ScriptError(ScriptErrorKind),
    /// A signature could not be produced
    #[error("Signing error: {0}")]
    SigningError(String),
    /// Address has a bad prefix, length or checksum
    #[error("Address error: {0}")]
    AddressError(String),
    /// Hex string could not be decoded
    #[error("Hex decoding error: {0}")]
    FromHexError(#[from] FromHexError),
    /// Standard library IO error
    #[error("IO error: {0}")]
    IOError(io::Error),
    /// Error in the Secp256k1 library
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] Secp256k1Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::EncodingError("Unexpected end of data".to_string())
        } else {
            Error::IOError(e)
        }
    }
}

impl From<ScriptErrorKind> for Error {
    fn from(kind: ScriptErrorKind) -> Self {
        Error::ScriptError(kind)
    }
}

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn eof_is_encoding_error() {
        let e: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "short").into();
        assert!(matches!(e, Error::EncodingError(_)));
        let e: Error = io::Error::new(io::ErrorKind::Other, "disk").into();
        assert!(matches!(e, Error::IOError(_)));
    }

    #[test]
    fn display() {
        let e = Error::ScriptError(ScriptErrorKind::StackUnderflow { required: 2, depth: 1 });
        assert_eq!(e.to_string(), "Script error: Stack underflow: 2 required, 1 present");
        assert_eq!(Error::BadData("x".to_string()).to_string(), "Bad data: x");
    }
}
