//! Script interpreter for the opcodes needed to check standard spends.

use crate::script::{op_codes::*, stack::*, Checker};
use crate::util::{hash160, sha256, sha256d, Result, ScriptErrorKind};
use log::trace;

/// Data stack and code-separator position for one script evaluation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Stack items, top last
    pub stack: Vec<Vec<u8>>,
    /// Start of the script code a signature check covers
    pub check_index: usize,
}

impl ExecutionContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> ExecutionContext {
        ExecutionContext::default()
    }

    /// Fails with a stack underflow unless at least `n` items are present.
    ///
    /// # Errors
    /// `ScriptErrorKind::StackUnderflow` with the stack left untouched.
    #[inline]
    pub fn require(&self, n: usize) -> Result<()> {
        if self.stack.len() < n {
            let depth = self.stack.len();
            return Err(ScriptErrorKind::StackUnderflow { required: n, depth }.into());
        }
        Ok(())
    }

    /// Pushes an item.
    #[inline]
    pub fn push(&mut self, item: Vec<u8>) {
        self.stack.push(item);
    }

    /// Pushes a canonical bool.
    #[inline]
    pub fn push_bool(&mut self, b: bool) {
        self.stack.push(encode_bool(b));
    }

    /// Pops the top item.
    ///
    /// # Errors
    /// `ScriptErrorKind::StackUnderflow` if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> Result<Vec<u8>> {
        self.require(1)?;
        self.stack
            .pop()
            .ok_or_else(|| ScriptErrorKind::StackUnderflow { required: 1, depth: 0 }.into())
    }

    /// Returns the item `depth` places below the top without removing it.
    fn peek(&self, depth: usize) -> &[u8] {
        &self.stack[self.stack.len() - 1 - depth]
    }

    /// Executes one chunk starting at `i` in `script`, returning the index of the next chunk.
    ///
    /// Every handler checks its operand count and decodes its operands before touching the
    /// stack, so a failed step leaves the stack as it was.
    ///
    /// # Errors
    /// `Error::ScriptError` for truncated pushes, underflow, bad numbers, failed verifies
    /// and unsupported opcodes. Checker errors are propagated.
    pub fn step<T: Checker>(&mut self, script: &[u8], i: usize, checker: &mut T) -> Result<usize> {
        let op = *script
            .get(i)
            .ok_or(ScriptErrorKind::TruncatedPush { offset: i })?;
        let next = next_op(i, script);
        match op {
            OP_0 => self.push(vec![]),
            1..=OP_PUSHDATA4 => {
                let start = data_start(i, script)?;
                if next > script.len() || start > next {
                    return Err(ScriptErrorKind::TruncatedPush { offset: i }.into());
                }
                self.push(script[start..next].to_vec());
            }
            OP_1NEGATE => self.push(encode_num(-1)),
            OP_1..=OP_16 => self.push(encode_num(i64::from(op - OP_1 + 1))),
            OP_NOP => {}
            OP_VERIFY => {
                self.require(1)?;
                if !decode_bool(self.peek(0)) {
                    return Err(ScriptErrorKind::VerifyFailed("OP_VERIFY".to_string()).into());
                }
                self.pop()?;
            }
            OP_RETURN => {
                return Err(ScriptErrorKind::VerifyFailed("OP_RETURN".to_string()).into());
            }
            OP_DROP => {
                self.pop()?;
            }
            OP_DUP => {
                self.require(1)?;
                let copy = self.peek(0).to_vec();
                self.push(copy);
            }
            OP_SWAP => {
                self.require(2)?;
                let len = self.stack.len();
                self.stack.swap(len - 1, len - 2);
            }
            OP_SIZE => {
                self.require(1)?;
                let len = self.peek(0).len() as i64;
                self.push(encode_num(len));
            }
            OP_EQUAL | OP_EQUALVERIFY => {
                self.require(2)?;
                let equal = self.peek(0) == self.peek(1);
                if op == OP_EQUALVERIFY && !equal {
                    return Err(ScriptErrorKind::VerifyFailed("OP_EQUALVERIFY".to_string()).into());
                }
                self.stack.truncate(self.stack.len() - 2);
                if op == OP_EQUAL {
                    self.push_bool(equal);
                }
            }
            OP_ADD | OP_SUB | OP_NUMEQUAL | OP_NUMNOTEQUAL => {
                self.require(2)?;
                let b = decode_num(self.peek(0))?;
                let a = decode_num(self.peek(1))?;
                self.stack.truncate(self.stack.len() - 2);
                match op {
                    OP_ADD => self.push(encode_num(a + b)),
                    OP_SUB => self.push(encode_num(a - b)),
                    OP_NUMEQUAL => self.push_bool(a == b),
                    _ => self.push_bool(a != b),
                }
            }
            OP_SHA256 => {
                let v = self.pop()?;
                self.push(sha256(&v).0.to_vec());
            }
            OP_HASH160 => {
                let v = self.pop()?;
                self.push(hash160(&v).0.to_vec());
            }
            OP_HASH256 => {
                let v = self.pop()?;
                self.push(sha256d(&v).0.to_vec());
            }
            OP_CODESEPARATOR => self.check_index = next,
            OP_CHECKSIG | OP_CHECKSIGVERIFY => {
                self.require(2)?;
                let script_code = &script[self.check_index.min(script.len())..];
                let success = checker.check_sig(self.peek(1), self.peek(0), script_code)?;
                if op == OP_CHECKSIGVERIFY && !success {
                    let msg = "OP_CHECKSIGVERIFY".to_string();
                    return Err(ScriptErrorKind::VerifyFailed(msg).into());
                }
                self.stack.truncate(self.stack.len() - 2);
                if op == OP_CHECKSIG {
                    self.push_bool(success);
                }
            }
            _ => return Err(ScriptErrorKind::UnknownOpcode(op).into()),
        }
        Ok(next)
    }
}

/// Executes a script and requires a true value on top of the stack at the end.
///
/// # Errors
/// `Error::ScriptError` if any step fails, the stack ends empty, or the top item is false.
pub fn eval<T: Checker>(script: &[u8], checker: &mut T) -> Result<()> {
    let mut ctx = ExecutionContext::new();
    let mut i = 0;
    while i < script.len() {
        i = ctx.step(script, i, checker)?;
    }
    trace!("Script finished with {} stack items", ctx.stack.len());
    ctx.require(1)?;
    if !decode_bool(ctx.peek(0)) {
        return Err(ScriptErrorKind::FalseResult.into());
    }
    Ok(())
}

/// Index of the first payload byte of the push at `i`.
fn data_start(i: usize, script: &[u8]) -> Result<usize> {
    let header = match script[i] {
        OP_PUSHDATA1 => 1,
        OP_PUSHDATA2 => 2,
        OP_PUSHDATA4 => 4,
        _ => 0,
    };
    if i + 1 + header > script.len() {
        return Err(ScriptErrorKind::TruncatedPush { offset: i }.into());
    }
    Ok(i + 1 + header)
}

/// Gets the index of the operation after the one at `i`.
///
/// For a push whose length header is cut off this is the script length; for a push whose
/// payload runs past the end it is past the script length, which callers treat as truncation.
#[must_use]
pub fn next_op(i: usize, script: &[u8]) -> usize {
    if i >= script.len() {
        return script.len();
    }
    match script[i] {
        len @ 1..=75 => i + 1 + len as usize,
        OP_PUSHDATA1 => {
            if i + 2 > script.len() {
                script.len()
            } else {
                i + 2 + script[i + 1] as usize
            }
        }
        OP_PUSHDATA2 => {
            if i + 3 > script.len() {
                script.len()
            } else {
                i + 3 + u16::from_le_bytes([script[i + 1], script[i + 2]]) as usize
            }
        }
        OP_PUSHDATA4 => {
            if i + 5 > script.len() {
                script.len()
            } else {
                let len = u32::from_le_bytes([
                    script[i + 1],
                    script[i + 2],
                    script[i + 3],
                    script[i + 4],
                ]);
                i + 5 + len as usize
            }
        }
        _ => i + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Script, TransactionlessChecker};
    use crate::util::Error;
    use pretty_assertions::assert_eq;

    fn run(script: &Script) -> Result<()> {
        eval(&script.0, &mut TransactionlessChecker {})
    }

    fn underflow(err: Error) -> (usize, usize) {
        match err {
            Error::ScriptError(ScriptErrorKind::StackUnderflow { required, depth }) => {
                (required, depth)
            }
            e => panic!("Expected underflow, got {:?}", e),
        }
    }

    #[test]
    fn op_push() -> Result<()> {
        let mut s = Script::new();
        s.append(OP_PUSH + 3);
        s.append_slice(&[1, 2, 3]);
        run(&s)?;
        let mut s = Script::new();
        s.append_data(&[5; 300])?;
        run(&s)
    }

    #[test]
    fn truncated_push() {
        let s = Script(vec![OP_PUSH + 3, 1, 2]);
        match run(&s).unwrap_err() {
            Error::ScriptError(ScriptErrorKind::TruncatedPush { offset }) => assert_eq!(offset, 0),
            e => panic!("{:?}", e),
        }
        let s = Script(vec![OP_1, OP_PUSHDATA2, 1]);
        assert!(run(&s).is_err());
    }

    #[test]
    fn step_past_end() {
        let mut ctx = ExecutionContext::new();
        let script = [OP_1];
        match ctx.step(&script, 1, &mut TransactionlessChecker {}).unwrap_err() {
            Error::ScriptError(ScriptErrorKind::TruncatedPush { offset }) => assert_eq!(offset, 1),
            e => panic!("{:?}", e),
        }
        assert!(ctx.step(&[], 0, &mut TransactionlessChecker {}).is_err());
        assert!(ctx.stack.is_empty());
    }

    #[test]
    fn arity_leaves_stack_unchanged() {
        let mut checker = TransactionlessChecker {};
        for (op, required) in [
            (OP_DROP, 1),
            (OP_DUP, 1),
            (OP_SIZE, 1),
            (OP_VERIFY, 1),
            (OP_SHA256, 1),
            (OP_HASH160, 1),
            (OP_HASH256, 1),
            (OP_SWAP, 2),
            (OP_EQUAL, 2),
            (OP_EQUALVERIFY, 2),
            (OP_ADD, 2),
            (OP_SUB, 2),
            (OP_NUMEQUAL, 2),
            (OP_NUMNOTEQUAL, 2),
            (OP_CHECKSIG, 2),
            (OP_CHECKSIGVERIFY, 2),
        ] {
            let mut ctx = ExecutionContext::new();
            for _ in 1..required {
                ctx.push(vec![7]);
            }
            let before = ctx.clone();
            let err = ctx.step(&[op], 0, &mut checker).unwrap_err();
            assert_eq!(underflow(err), (required, required - 1), "{:?}", op_name(op));
            assert_eq!(ctx, before);
        }
    }

    #[test]
    fn arithmetic() -> Result<()> {
        let mut s = Script::new();
        s.append_num(2)?;
        s.append_num(3)?;
        s.append(OP_ADD);
        s.append_num(5)?;
        s.append(OP_NUMEQUAL);
        run(&s)?;

        let mut s = Script::new();
        s.append_num(2)?;
        s.append_num(3)?;
        s.append(OP_SUB);
        s.append(OP_1NEGATE);
        s.append(OP_NUMEQUAL);
        run(&s)?;

        let mut s = Script::new();
        s.append_num(1000)?;
        s.append_num(999)?;
        s.append(OP_NUMNOTEQUAL);
        run(&s)
    }

    #[test]
    fn invalid_number_leaves_stack() {
        let mut checker = TransactionlessChecker {};
        let mut ctx = ExecutionContext::new();
        ctx.push(vec![1, 2, 3, 4, 5]);
        ctx.push(vec![1]);
        let before = ctx.clone();
        let err = ctx.step(&[OP_ADD], 0, &mut checker).unwrap_err();
        assert!(matches!(err, Error::ScriptError(ScriptErrorKind::InvalidNumber(_))));
        assert_eq!(ctx, before);
    }

    #[test]
    fn comparisons_push_canonical_bools() {
        let mut checker = TransactionlessChecker {};
        let mut ctx = ExecutionContext::new();
        ctx.push(vec![1, 2]);
        ctx.push(vec![1, 3]);
        ctx.step(&[OP_EQUAL], 0, &mut checker).unwrap();
        assert_eq!(ctx.stack, vec![Vec::<u8>::new()]);
        ctx.push(vec![]);
        ctx.step(&[OP_EQUAL], 0, &mut checker).unwrap();
        assert_eq!(ctx.stack, vec![vec![1]]);
    }

    #[test]
    fn stack_ops() -> Result<()> {
        let mut s = Script::new();
        s.append_data(&[1, 2, 3])?;
        s.append(OP_DUP);
        s.append(OP_SIZE);
        s.append_num(3)?;
        s.append(OP_EQUALVERIFY);
        s.append(OP_DROP);
        s.append(OP_1);
        s.append(OP_SWAP);
        s.append(OP_DROP);
        run(&s)
    }

    #[test]
    fn hashes() -> Result<()> {
        let data = b"abc";
        let mut s = Script::new();
        s.append_data(data)?;
        s.append(OP_SHA256);
        s.append_data(&sha256(data).0)?;
        s.append(OP_EQUALVERIFY);
        s.append_data(data)?;
        s.append(OP_HASH160);
        s.append_data(&hash160(data).0)?;
        s.append(OP_EQUALVERIFY);
        s.append_data(data)?;
        s.append(OP_HASH256);
        s.append_data(&sha256d(data).0)?;
        s.append(OP_EQUAL);
        run(&s)
    }

    #[test]
    fn failures() {
        let s = Script(vec![OP_0, OP_VERIFY, OP_1]);
        assert!(run(&s).is_err());
        let s = Script(vec![OP_1, OP_RETURN]);
        assert!(run(&s).is_err());
        let s = Script(vec![OP_0]);
        assert!(matches!(
            run(&s).unwrap_err(),
            Error::ScriptError(ScriptErrorKind::FalseResult)
        ));
        let s = Script(vec![]);
        assert!(run(&s).is_err());
        // OP_IF is outside the supported set
        let s = Script(vec![OP_1, 99, OP_1]);
        assert!(matches!(
            run(&s).unwrap_err(),
            Error::ScriptError(ScriptErrorKind::UnknownOpcode(99))
        ));
    }

    #[test]
    fn checksig_without_tx() {
        let s = Script(vec![OP_1, OP_1, OP_CHECKSIG]);
        assert!(run(&s).is_err());
    }

    #[test]
    fn next_op_tests() {
        assert_eq!(next_op(0, &[OP_DUP, OP_HASH160]), 1);
        assert_eq!(next_op(0, &[2, 9, 9, OP_DUP]), 3);
        assert_eq!(next_op(0, &[OP_PUSHDATA1, 2, 9, 9]), 4);
        assert_eq!(next_op(0, &[OP_PUSHDATA2]), 1);
        assert_eq!(next_op(5, &[OP_1]), 1);
    }
}
