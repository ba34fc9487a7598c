//! The reference interpreter (spec.md §3 "Evm", component C9).
//!
//! Built independently of the rule catalogue in [`crate::specification`] —
//! it walks the same [`Frame`](crate::adapter::Frame)/[`Host`](crate::host::Host)
//! shape the per-instruction handlers under [`crate::instructions`] already
//! operate on, rather than reusing the catalogue's `State`-level effects —
//! so the two halves of the conformance checker ([`crate::differential`])
//! can never agree by construction.

use crate::adapter::{self, Frame};
use crate::error::Result as CtResult;
use crate::host::Host;
use crate::instructions::{arithmetic, bitwise, boolean, call, control, memory, stack_manip, storage, table, Fail};
use crate::opcode::OpCode;
use crate::state::{State, MAX_STACK_SIZE};
use crate::status::Status;

/// What a dispatched instruction did to control flow; `pc` is updated by
/// the caller once the handler itself has succeeded (spec.md §4.3 "pc
/// advances by the instruction's width unless the instruction sets it
/// itself").
enum Flow {
    Advance,
    Jump(usize),
    Stop,
}

/// Execute exactly one opcode, if `state` is still running (spec.md §4.3,
/// the per-step algorithm).
pub fn step(state: &State) -> CtResult<State> {
    if state.status().is_terminal() {
        return Ok(state.clone());
    }
    let (mut frame, mut host) = adapter::decode(state);
    step_frame(&mut frame, &mut host);
    adapter::encode(frame, host)
}

/// Execute up to `n` opcodes, stopping early once the state goes terminal
/// (spec.md §6 `Evm.step_n`).
pub fn step_n(state: &State, n: usize) -> CtResult<State> {
    let mut current = state.clone();
    for _ in 0..n {
        if current.status().is_terminal() {
            break;
        }
        current = step(&current)?;
    }
    Ok(current)
}

/// Like [`step_n`], but notifies `tracer` before/after the run and before
/// each dispatched instruction (SPEC_FULL.md §3.2). The tracer sees the
/// state exactly as `step_n` would have produced it at each point.
pub fn step_n_traced(state: &State, n: usize, tracer: &mut dyn crate::tracing::Tracer) -> CtResult<State> {
    tracer.notify_execution_start(state);
    let mut current = state.clone();
    for _ in 0..n {
        if current.status().is_terminal() {
            break;
        }
        if *current.pc() as usize < current.code().len() {
            let op = OpCode(current.code()[*current.pc() as usize]);
            tracer.notify_instruction_start(*current.pc(), op, &current);
        }
        current = step(&current)?;
    }
    tracer.notify_execution_end(&current);
    Ok(current)
}

/// The `Evm` capability a differential run checks the catalogue against
/// (spec.md §6 "Evm").
pub trait Evm {
    fn step_n(&self, state: &State, n: usize) -> CtResult<State>;
}

/// The interpreter built from [`crate::instructions`] (spec.md §4.9).
pub struct ReferenceInterpreter;

impl Evm for ReferenceInterpreter {
    fn step_n(&self, state: &State, n: usize) -> CtResult<State> {
        step_n(state, n)
    }
}

fn step_frame(frame: &mut Frame, host: &mut dyn Host) {
    if frame.pc >= frame.code.len() {
        frame.status = Status::Stopped;
        return;
    }
    if !frame.code_map.is_code(frame.pc) {
        frame.status = Status::Failed;
        return;
    }
    let op = OpCode(frame.code[frame.pc]);
    let spec = match table::spec_for(op) {
        Some(spec) => spec,
        None => {
            frame.status = Status::Failed;
            return;
        }
    };
    if frame.gas_left < spec.gas as i64 {
        frame.status = Status::Failed;
        return;
    }
    if frame.stack.len() < spec.stack_required {
        frame.status = Status::Failed;
        return;
    }

    frame.gas_left -= spec.gas as i64;

    match dispatch(frame, host, op) {
        Ok(Flow::Advance) => {
            if frame.stack.len() > MAX_STACK_SIZE {
                frame.status = Status::Failed;
                return;
            }
            frame.pc += op.width();
        }
        Ok(Flow::Jump(dst)) => frame.pc = dst,
        Ok(Flow::Stop) => frame.status = Status::Stopped,
        Err(_fail) => frame.status = Status::Failed,
    }
}

fn dispatch(frame: &mut Frame, host: &mut dyn Host, op: OpCode) -> Result<Flow, Fail> {
    if op == OpCode::STOP {
        return Ok(Flow::Stop);
    }
    if op == OpCode::ADD {
        arithmetic::add(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::MUL {
        arithmetic::mul(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SUB {
        arithmetic::sub(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::DIV {
        arithmetic::div(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SDIV {
        arithmetic::sdiv(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::MOD {
        arithmetic::modulo(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SMOD {
        arithmetic::smod(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::ADDMOD {
        arithmetic::addmod(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::MULMOD {
        arithmetic::mulmod(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::EXP {
        arithmetic::exp(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SIGNEXTEND {
        arithmetic::signextend(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::LT {
        boolean::lt(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::GT {
        boolean::gt(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SLT {
        boolean::slt(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SGT {
        boolean::sgt(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::EQ {
        boolean::eq(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::ISZERO {
        boolean::iszero(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::AND {
        bitwise::and(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::OR {
        bitwise::or(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::XOR {
        bitwise::xor(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::NOT {
        bitwise::not(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::BYTE {
        bitwise::byte(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SHL {
        bitwise::shl(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SHR {
        bitwise::shr(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SAR {
        bitwise::sar(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::POP {
        stack_manip::pop(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::MLOAD {
        memory::mload(frame)?;
        return Ok(Flow::Advance);
    }
    if op == OpCode::MSTORE {
        memory::mstore(frame)?;
        return Ok(Flow::Advance);
    }
    if op == OpCode::MSTORE8 {
        memory::mstore8(frame)?;
        return Ok(Flow::Advance);
    }
    if op == OpCode::MSIZE {
        memory::msize(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::SLOAD {
        storage::sload(frame, host)?;
        return Ok(Flow::Advance);
    }
    if op == OpCode::SSTORE {
        storage::sstore(frame, host)?;
        return Ok(Flow::Advance);
    }
    if op == OpCode::JUMP {
        let dst = control::jump(frame)?;
        return Ok(Flow::Jump(dst));
    }
    if op == OpCode::JUMPI {
        return match control::jumpi(frame)? {
            Some(dst) => Ok(Flow::Jump(dst)),
            None => Ok(Flow::Advance),
        };
    }
    if op == OpCode::JUMPDEST {
        control::jumpdest(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::PC {
        control::pc(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::GAS {
        control::gas(frame);
        return Ok(Flow::Advance);
    }
    if op == OpCode::CALL {
        call::call(frame, host)?;
        return Ok(Flow::Advance);
    }
    if op == OpCode::INVALID {
        return Err(Fail::InvalidOpcode);
    }
    if let Some(n) = op.push_len() {
        stack_manip::push(frame, n);
        return Ok(Flow::Advance);
    }
    if let Some(h) = op.dup_height() {
        stack_manip::dup(frame, h);
        return Ok(Flow::Advance);
    }
    if let Some(h) = op.swap_height() {
        stack_manip::swap(frame, h);
        return Ok(Flow::Advance);
    }
    Err(Fail::InvalidOpcode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::u256::U256;

    fn running_state(code: Vec<u8>, gas: u64) -> State {
        let mut state = State::new(code);
        state.set_gas(gas);
        state
    }

    #[test]
    fn add_pops_pushes_sum_and_advances_pc() {
        let mut state = running_state(vec![OpCode::ADD.0], 10);
        state.push(U256::from_u64(1));
        state.push(U256::from_u64(2));
        let next = step(&state).unwrap();
        assert_eq!(next.param(0), Some(U256::from_u64(3)));
        assert_eq!(*next.pc(), 1);
        assert_eq!(*next.gas(), 7);
    }

    #[test]
    fn add_without_enough_gas_fails() {
        let mut state = running_state(vec![OpCode::ADD.0], 2);
        state.push(U256::from_u64(1));
        state.push(U256::from_u64(2));
        let next = step(&state).unwrap();
        assert_eq!(*next.status(), Status::Failed);
    }

    #[test]
    fn add_with_too_few_operands_fails() {
        let mut state = running_state(vec![OpCode::ADD.0], 10);
        state.push(U256::from_u64(1));
        let next = step(&state).unwrap();
        assert_eq!(*next.status(), Status::Failed);
    }

    #[test]
    fn jump_to_a_jumpdest_lands_the_pc_there() {
        let mut state = running_state(vec![OpCode::JUMP.0, OpCode::JUMPDEST.0], 10);
        state.push(U256::from_u64(1));
        let next = step(&state).unwrap();
        assert_eq!(*next.status(), Status::Running);
        assert_eq!(*next.pc(), 1);
    }

    #[test]
    fn jump_to_a_non_jumpdest_fails() {
        let mut state = running_state(vec![OpCode::JUMP.0, OpCode::STOP.0], 10);
        state.push(U256::from_u64(1));
        let next = step(&state).unwrap();
        assert_eq!(*next.status(), Status::Failed);
    }

    #[test]
    fn mstore_then_mload_round_trips_through_full_steps() {
        let mut state = running_state(
            vec![
                OpCode::PUSH1.0,
                0xff,
                OpCode::PUSH1.0,
                0x00,
                OpCode::MSTORE.0,
            ],
            1_000,
        );
        state = step_n(&state, 3).unwrap();
        assert_eq!(state.param(0), None);
        assert_eq!(state.memory()[31], 0xff);
    }

    #[test]
    fn push1_with_a_truncated_immediate_pads_with_zero() {
        let state = running_state(vec![OpCode::PUSH1.0], 10);
        let next = step(&state).unwrap();
        assert_eq!(next.param(0), Some(U256::ZERO));
    }

    #[test]
    fn running_off_the_end_of_code_stops() {
        let state = running_state(vec![OpCode::JUMPDEST.0], 10);
        let next = step_n(&state, 2).unwrap();
        assert_eq!(*next.status(), Status::Stopped);
    }

    #[test]
    fn stepping_a_terminal_state_is_a_no_op() {
        let mut state = running_state(vec![OpCode::STOP.0], 10);
        state.set_status(Status::Reverted);
        let next = step(&state).unwrap();
        assert!(state.equal(&next));
    }

    #[test]
    fn step_n_traced_records_one_entry_per_dispatched_instruction() {
        use crate::tracing::CallTrace;

        let state = running_state(vec![OpCode::PUSH1.0, 0x01, OpCode::PUSH1.0, 0x02, OpCode::ADD.0], 100);
        let mut trace = CallTrace::default();
        let next = step_n_traced(&state, 3, &mut trace).unwrap();
        assert_eq!(trace.steps.len(), 3);
        assert_eq!(next.param(0), Some(U256::from_u64(3)));
    }
}
