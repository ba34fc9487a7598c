//! JUMP/JUMPI/JUMPDEST/PC/GAS (spec.md §4.3 control-flow opcodes), grounded
//! on the teacher's `op_jump`, adapted to validate against the interpreter's
//! own [`CodeMap`] instead of a revision-aware `JumpdestMap`.

use crate::adapter::Frame;
use crate::instructions::Fail;
use crate::opcode::OpCode;
use crate::u256::U256;

fn is_valid_jump_destination(frame: &Frame, dst: usize) -> bool {
    dst < frame.code.len() && frame.code_map.is_code(dst) && frame.code[dst] == OpCode::JUMPDEST.0
}

/// Returns the validated destination; the caller is responsible for setting
/// `frame.pc` to it instead of advancing past the opcode as usual.
pub fn jump(frame: &mut Frame) -> Result<usize, Fail> {
    let dst = frame.pop().ok_or(Fail::StackUnderflow)?;
    let dst = dst.as_usize_saturating();
    if !is_valid_jump_destination(frame, dst) {
        return Err(Fail::InvalidJumpDestination);
    }
    Ok(dst)
}

/// `None` means the condition was false and control falls through.
pub fn jumpi(frame: &mut Frame) -> Result<Option<usize>, Fail> {
    let dst = frame.pop().ok_or(Fail::StackUnderflow)?;
    let cond = frame.pop().ok_or(Fail::StackUnderflow)?;
    if cond.is_zero() {
        return Ok(None);
    }
    let dst = dst.as_usize_saturating();
    if !is_valid_jump_destination(frame, dst) {
        return Err(Fail::InvalidJumpDestination);
    }
    Ok(Some(dst))
}

pub fn jumpdest(_frame: &mut Frame) {
    // A no-op marker; its only effect is being a valid jump target.
}

pub fn pc(frame: &mut Frame) {
    let value = U256::from_u64(frame.pc as u64);
    frame.push(value);
}

pub fn gas(frame: &mut Frame) {
    let value = frame.gas_left.max(0) as u64;
    frame.push(U256::from_u64(value));
}
