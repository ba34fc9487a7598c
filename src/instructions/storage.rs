//! SLOAD/SSTORE (spec.md §4.3), grounded on the shape of the teacher's
//! `sudo.rs` but shorn of its EIP-2929 warm/cold access bookkeeping — this
//! model has no persistent cross-call access list, so every access costs
//! the same static [`InstructionSpec`](crate::instructions::table::InstructionSpec) gas.

use crate::adapter::Frame;
use crate::host::Host;
use crate::instructions::Fail;

pub fn sload(frame: &mut Frame, host: &dyn Host) -> Result<(), Fail> {
    let key = frame.pop().ok_or(Fail::StackUnderflow)?;
    frame.push(host.get_storage(key));
    Ok(())
}

pub fn sstore(frame: &mut Frame, host: &mut dyn Host) -> Result<(), Fail> {
    if frame.is_static {
        return Err(Fail::StaticModeViolation);
    }
    let key = frame.pop().ok_or(Fail::StackUnderflow)?;
    let value = frame.pop().ok_or(Fail::StackUnderflow)?;
    host.set_storage(key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryHost;
    use crate::state::State;
    use crate::u256::U256;

    fn frame_and_host(state: &State) -> (Frame, InMemoryHost) {
        crate::adapter::decode(state)
    }

    #[test]
    fn sstore_then_sload_round_trips() {
        let mut state = State::new(vec![]);
        state.push(U256::from_u64(42)); // value
        state.push(U256::from_u64(7)); // key
        let (mut frame, mut host) = frame_and_host(&state);
        sstore(&mut frame, &mut host).unwrap();
        frame.push(U256::from_u64(7)); // key
        sload(&mut frame, &host).unwrap();
        assert_eq!(frame.peek(0), Some(U256::from_u64(42)));
    }

    #[test]
    fn sstore_in_static_mode_fails() {
        let mut state = State::new(vec![]);
        state.set_is_static(true);
        state.push(U256::from_u64(1));
        state.push(U256::from_u64(1));
        let (mut frame, mut host) = frame_and_host(&state);
        assert_eq!(sstore(&mut frame, &mut host), Err(Fail::StaticModeViolation));
    }
}
