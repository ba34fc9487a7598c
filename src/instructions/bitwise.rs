use crate::adapter::Frame;

pub fn and(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.and(&b));
}

pub fn or(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.or(&b));
}

pub fn xor(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(a.xor(&b));
}

pub fn not(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    frame.push(a.not());
}

pub fn byte(frame: &mut Frame) {
    let index = frame.pop().unwrap();
    let value = frame.pop().unwrap();
    frame.push(value.byte(&index));
}

pub fn shl(frame: &mut Frame) {
    let shift = frame.pop().unwrap();
    let value = frame.pop().unwrap();
    frame.push(value.shl_u256(&shift));
}

pub fn shr(frame: &mut Frame) {
    let shift = frame.pop().unwrap();
    let value = frame.pop().unwrap();
    frame.push(value.shr_u256(&shift));
}

pub fn sar(frame: &mut Frame) {
    let shift = frame.pop().unwrap();
    let value = frame.pop().unwrap();
    frame.push(value.sar(&shift));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use crate::u256::U256;

    fn frame_with_stack(values: &[u64]) -> Frame {
        let mut state = State::new(vec![]);
        for &v in values.iter().rev() {
            state.push(U256::from_u64(v));
        }
        crate::adapter::decode(&state).0
    }

    #[test]
    fn shl_by_one_doubles_the_value() {
        let mut frame = frame_with_stack(&[1, 3]);
        shl(&mut frame);
        assert_eq!(frame.peek(0), Some(U256::from_u64(6)));
    }

    #[test]
    fn byte_zero_is_the_most_significant_byte() {
        let mut frame = frame_with_stack(&[0, 0xff]);
        byte(&mut frame);
        assert_eq!(frame.peek(0), Some(U256::ZERO));
    }

    #[test]
    fn not_is_involutive() {
        let mut state = State::new(vec![]);
        state.push(U256::from_u64(0xdead));
        let mut frame = crate::adapter::decode(&state).0;
        not(&mut frame);
        not(&mut frame);
        assert_eq!(frame.peek(0), Some(U256::from_u64(0xdead)));
    }
}
