use crate::adapter::Frame;
use crate::u256::U256;

pub fn pop(frame: &mut Frame) {
    frame.pop();
}

/// Reads `n` immediate bytes starting just after the opcode, left-aligning
/// them into the n-byte field (missing trailing bytes are zero) before
/// widening to a 32-byte word (spec.md §4.3 "PUSHn reads min(n, ...) bytes
/// and left-aligns them").
pub fn push(frame: &mut Frame, n: usize) {
    let start = frame.pc + 1;
    let available = frame.code.len().saturating_sub(start);
    let take = n.min(available);
    let mut buf = [0u8; 32];
    buf[32 - n..32 - n + take].copy_from_slice(&frame.code[start..start + take]);
    frame.push(U256::from_big_endian(&buf));
}

pub fn dup(frame: &mut Frame, height: usize) {
    let value = frame.peek(height - 1).unwrap();
    frame.push(value);
}

pub fn swap(frame: &mut Frame, height: usize) {
    frame.swap_top(height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;

    #[test]
    fn push1_with_no_operand_byte_pushes_zero() {
        let state = State::new(vec![crate::opcode::OpCode::PUSH1.0]);
        let mut frame = crate::adapter::decode(&state).0;
        push(&mut frame, 1);
        assert_eq!(frame.peek(0), Some(U256::ZERO));
    }

    #[test]
    fn push2_reads_two_big_endian_bytes() {
        let state = State::new(vec![crate::opcode::OpCode::PUSH1.0 + 1, 0x01, 0x02]);
        let mut frame = crate::adapter::decode(&state).0;
        push(&mut frame, 2);
        assert_eq!(frame.peek(0), Some(U256::from_u64(0x0102)));
    }

    #[test]
    fn dup1_duplicates_the_top_of_stack() {
        let mut state = State::new(vec![]);
        state.push(U256::from_u64(7));
        let mut frame = crate::adapter::decode(&state).0;
        dup(&mut frame, 1);
        assert_eq!(frame.stack.len(), 2);
        assert_eq!(frame.peek(0), frame.peek(1));
    }

    #[test]
    fn swap1_exchanges_the_top_two_values() {
        let mut state = State::new(vec![]);
        state.push(U256::from_u64(2)); // second from top
        state.push(U256::from_u64(1)); // top
        let mut frame = crate::adapter::decode(&state).0;
        swap(&mut frame, 1);
        assert_eq!(frame.peek(0), Some(U256::from_u64(2)));
        assert_eq!(frame.peek(1), Some(U256::from_u64(1)));
    }
}
