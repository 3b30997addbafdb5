//! Script opcodes used when building and checking spend scripts.
//!
//! Only the subset the interpreter executes is listed, plus the push markers.
//!
//! # Examples
//! ```
//! use segsign::script::op_codes::*;
//! assert_eq!(OP_CHECKSIG, 0xac);
//! ```

// Pushdata and constants
/// Pushes an empty array (0/false) onto the stack.
pub const OP_0: u8 = 0;
/// Alias of OP_0.
pub const OP_FALSE: u8 = 0;
/// Base of the direct push opcodes: `OP_PUSH + n` pushes the next n bytes (n: 1-75).
pub const OP_PUSH: u8 = 0;
/// Next byte is push length (up to 255 bytes).
pub const OP_PUSHDATA1: u8 = 76;
/// Next two bytes are push length (up to 65535 bytes).
pub const OP_PUSHDATA2: u8 = 77;
/// Next four bytes are push length.
pub const OP_PUSHDATA4: u8 = 78;
/// Pushes -1 onto the stack.
pub const OP_1NEGATE: u8 = 79;
/// Pushes 1 (true) onto the stack.
pub const OP_1: u8 = 81;
/// Alias of OP_1.
pub const OP_TRUE: u8 = 81;
/// Pushes 2 onto the stack.
pub const OP_2: u8 = 82;
/// Pushes 3 onto the stack.
pub const OP_3: u8 = 83;
/// Pushes 16 onto the stack; OP_2..OP_16 are contiguous.
pub const OP_16: u8 = 96;

// Flow control
/// Does nothing.
pub const OP_NOP: u8 = 97;
/// Fails if top stack item is false (pops it).
pub const OP_VERIFY: u8 = 105;
/// Marks the output unspendable.
pub const OP_RETURN: u8 = 106;

// Stack
/// Drops top item.
pub const OP_DROP: u8 = 117;
/// Duplicates top item.
pub const OP_DUP: u8 = 118;
/// Swaps top two items.
pub const OP_SWAP: u8 = 124;
/// Pushes the length of the top item without popping it.
pub const OP_SIZE: u8 = 130;

// Bitwise logic
/// Pushes 1 if the top two items are byte-equal, 0 otherwise.
pub const OP_EQUAL: u8 = 135;
/// OP_EQUAL then OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 136;

// Arithmetic
/// a + b.
pub const OP_ADD: u8 = 147;
/// a - b.
pub const OP_SUB: u8 = 148;
/// Pushes 1 if the numbers are equal.
pub const OP_NUMEQUAL: u8 = 156;
/// Pushes 1 if the numbers are not equal.
pub const OP_NUMNOTEQUAL: u8 = 158;

// Cryptography
/// SHA256(top).
pub const OP_SHA256: u8 = 168;
/// RIPEMD160(SHA256(top)).
pub const OP_HASH160: u8 = 169;
/// SHA256(SHA256(top)).
pub const OP_HASH256: u8 = 170;
/// Signature checks only cover the script after the most recent separator.
pub const OP_CODESEPARATOR: u8 = 171;
/// Verifies a signature against a public key (pushes 1/0).
pub const OP_CHECKSIG: u8 = 172;
/// OP_CHECKSIG then OP_VERIFY.
pub const OP_CHECKSIGVERIFY: u8 = 173;

/// Returns the mnemonic of a known non-push opcode.
#[must_use]
pub fn op_name(op: u8) -> Option<&'static str> {
    let name = match op {
        OP_0 => "OP_0",
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_1 => "OP_1",
        OP_2 => "OP_2",
        OP_3 => "OP_3",
        84..=OP_16 => return Some(SMALL_NUMS[(op - 84) as usize]),
        OP_NOP => "OP_NOP",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_SWAP => "OP_SWAP",
        OP_SIZE => "OP_SIZE",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_NUMNOTEQUAL => "OP_NUMNOTEQUAL",
        OP_SHA256 => "OP_SHA256",
        OP_HASH160 => "OP_HASH160",
        OP_HASH256 => "OP_HASH256",
        OP_CODESEPARATOR => "OP_CODESEPARATOR",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        _ => return None,
    };
    Some(name)
}

const SMALL_NUMS: [&str; 13] = [
    "OP_4", "OP_5", "OP_6", "OP_7", "OP_8", "OP_9", "OP_10", "OP_11", "OP_12", "OP_13", "OP_14",
    "OP_15", "OP_16",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names() {
        assert_eq!(op_name(OP_DUP), Some("OP_DUP"));
        assert_eq!(op_name(OP_16), Some("OP_16"));
        assert_eq!(op_name(90), Some("OP_10"));
        assert_eq!(op_name(99), None);
    }
}
