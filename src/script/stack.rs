//! Script number and boolean encodings for stack items.
use crate::util::{Result, ScriptErrorKind};

/// Longest numeric operand accepted by arithmetic opcodes.
pub const MAX_NUM_SIZE: usize = 4;

/// Decodes a stack item to bool.
///
/// Any non-zero byte is true, except a lone sign bit in the last byte (negative zero).
///
/// # Examples
/// ```
/// use segsign::script::stack::decode_bool;
/// assert_eq!(decode_bool(&[1]), true);
/// assert_eq!(decode_bool(&[0, 0, 128]), false);
/// ```
#[must_use]
#[inline]
pub fn decode_bool(s: &[u8]) -> bool {
    match s.split_last() {
        None => false,
        Some((last, rest)) => rest.iter().any(|b| *b != 0) || (last & 127) != 0,
    }
}

/// Encodes a bool the way comparison opcodes push it: `[1]` or empty.
#[must_use]
#[inline]
pub fn encode_bool(b: bool) -> Vec<u8> {
    if b {
        vec![1]
    } else {
        vec![]
    }
}

/// Decodes a little-endian sign-magnitude number.
///
/// # Errors
/// `ScriptErrorKind::InvalidNumber` if longer than 4 bytes or not minimally encoded.
///
/// # Examples
/// ```
/// use segsign::script::stack::decode_num;
/// assert_eq!(decode_num(&[1]).unwrap(), 1);
/// assert_eq!(decode_num(&[129]).unwrap(), -1);
/// ```
pub fn decode_num(s: &[u8]) -> Result<i64> {
    if s.len() > MAX_NUM_SIZE {
        let msg = format!("{} bytes exceeds {}", s.len(), MAX_NUM_SIZE);
        return Err(ScriptErrorKind::InvalidNumber(msg).into());
    }
    let (last, rest) = match s.split_last() {
        None => return Ok(0),
        Some(split) => split,
    };
    // The top byte may only be all-zero (apart from sign) when the byte below needs its high bit
    if last & 127 == 0 && rest.last().map_or(true, |b| b & 128 == 0) {
        let msg = format!("non-minimal encoding {}", hex::encode(s));
        return Err(ScriptErrorKind::InvalidNumber(msg).into());
    }
    let mut n: i64 = i64::from(last & 127) << (8 * rest.len());
    for (i, b) in rest.iter().enumerate() {
        n |= i64::from(*b) << (8 * i);
    }
    Ok(if last & 128 != 0 { -n } else { n })
}

/// Encodes a number to its minimal stack form.
///
/// # Examples
/// ```
/// use segsign::script::stack::encode_num;
/// assert_eq!(encode_num(0), Vec::<u8>::new());
/// assert_eq!(encode_num(-1), vec![129]);
/// assert_eq!(encode_num(128), vec![128, 0]);
/// ```
#[must_use]
pub fn encode_num(val: i64) -> Vec<u8> {
    let mut result = Vec::new();
    let mut abs = val.unsigned_abs();
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    if let Some(last) = result.last_mut() {
        if *last & 128 != 0 {
            result.push(if val < 0 { 128 } else { 0 });
        } else if val < 0 {
            *last |= 128;
        }
    }
    result
}
