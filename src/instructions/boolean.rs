use crate::adapter::Frame;
use crate::u256::U256;

fn bool_u256(value: bool) -> U256 {
    if value {
        U256::ONE
    } else {
        U256::ZERO
    }
}

pub fn lt(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(bool_u256(a.lt(&b)));
}

pub fn gt(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(bool_u256(a.gt(&b)));
}

pub fn slt(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(bool_u256(a.slt(&b)));
}

pub fn sgt(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(bool_u256(a.sgt(&b)));
}

pub fn eq(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    let b = frame.pop().unwrap();
    frame.push(bool_u256(a == b));
}

pub fn iszero(frame: &mut Frame) {
    let a = frame.pop().unwrap();
    frame.push(bool_u256(a.is_zero()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;

    fn frame_with_stack(values: &[u64]) -> Frame {
        let mut state = State::new(vec![]);
        for &v in values.iter().rev() {
            state.push(U256::from_u64(v));
        }
        crate::adapter::decode(&state).0
    }

    #[test]
    fn lt_pushes_one_when_top_is_smaller() {
        let mut frame = frame_with_stack(&[1, 2]);
        lt(&mut frame);
        assert_eq!(frame.peek(0), Some(U256::ONE));
    }

    #[test]
    fn slt_treats_the_top_bit_as_sign() {
        let mut state = State::new(vec![]);
        state.push(U256::ZERO);
        state.push(U256::MAX); // pushed last, so MAX (-1 signed) is on top
        let mut frame = crate::adapter::decode(&state).0;
        slt(&mut frame);
        assert_eq!(frame.peek(0), Some(U256::ONE));
    }
}
