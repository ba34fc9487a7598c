//! The rule catalogue (spec.md §3 "Specification", component C8).
//!
//! Every "regular" opcode expands into three or four rules sharing one guard
//! prefix — status running, `pc` pointing at a code byte, that byte equal to
//! the opcode (spec.md §4.7) — and diverging on whether gas, stack depth and
//! (for opcodes that grow the stack) headroom below the 1024-item limit
//! suffice: an out-of-gas rule, a stack-underflow rule, a stack-overflow rule
//! where applicable, and the rule that actually applies the opcode's effect.
//! A handful of opcode-agnostic rules cover what isn't keyed to a specific
//! opcode: staying put once terminal, an unmodelled opcode byte, `pc` landing
//! inside a PUSH immediate, and `pc` running off the end of code entirely.

use crate::condition::{Condition, Position};
use crate::effect::{self, Effect};
use crate::expr::{self, Expr};
use crate::instructions::table;
use crate::opcode::OpCode;
use crate::rule::{ParamSampler, Rule};
use crate::state::{State, MAX_STACK_SIZE};
use crate::status::Status;
use crate::u256::U256;

const WORD_SIZE: usize = 32;
const MAX_BUFFER_SIZE: usize = u32::MAX as usize;

/// The full catalogue a conformant interpreter's single step must satisfy
/// (spec.md §4.7, component C8).
pub struct Specification {
    rules: Vec<Rule>,
}

impl Specification {
    pub fn build() -> Self {
        let mut rules = Vec::new();
        rules.extend(terminal_status_rules());
        rules.push(invalid_opcode_rule());
        rules.push(data_section_rule());
        rules.push(past_end_rule());
        for op in table::modelled_opcodes() {
            rules.extend(opcode_rules(op));
        }
        Specification { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Build a catalogue from an arbitrary rule set, for callers (tests,
    /// `crate::differential`) that want to check a narrower slice than the
    /// full catalogue.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Specification { rules }
    }

    /// The subset of rules whose guard `state` currently satisfies (spec.md
    /// §6 `Specification.get_rules_for(state)`).
    pub fn rules_for<'a>(&'a self, state: &State) -> Vec<&'a Rule> {
        self.rules.iter().filter(|r| r.applies(state)).collect()
    }
}

impl Default for Specification {
    fn default() -> Self {
        Self::build()
    }
}

// -- opcode-agnostic rules ------------------------------------------------

fn terminal_status_rules() -> Vec<Rule> {
    [Status::Stopped, Status::Returned, Status::Reverted, Status::Failed]
        .iter()
        .map(|&status| {
            Rule::new(
                format!("terminal-{status}"),
                Condition::Eq(Expr::Status, expr::status_value(status)),
                vec![],
                effect::identity(),
            )
        })
        .collect()
}

fn invalid_opcode_rule() -> Rule {
    let modelled: Vec<u8> = table::modelled_opcodes().map(|op| op.0).collect();
    Rule::new(
        "invalid-opcode",
        Condition::and(vec![
            Condition::Eq(Expr::Status, expr::status_value(Status::Running)),
            Condition::OpNotIn(Position::Pc, modelled),
            Condition::IsCode(Position::Pc),
        ]),
        vec![],
        effect::fail(),
    )
}

fn data_section_rule() -> Rule {
    Rule::new(
        "pc-in-data-section",
        Condition::and(vec![
            Condition::Eq(Expr::Status, expr::status_value(Status::Running)),
            Condition::IsData(Position::Pc),
        ]),
        vec![],
        effect::fail(),
    )
}

fn past_end_rule() -> Rule {
    Rule::new(
        "pc-past-end-of-code",
        Condition::and(vec![
            Condition::Eq(Expr::Status, expr::status_value(Status::Running)),
            Condition::PastEnd(Position::Pc),
        ]),
        vec![],
        Effect::new("stop-at-end-of-code", |state| {
            let mut next = state.clone();
            next.set_status(Status::Stopped);
            next
        }),
    )
}

// -- per-opcode rules -------------------------------------------------------

fn base_guard(op: OpCode) -> Condition {
    // `OpEq` must enumerate before `IsCode`: `OpEq`'s restrict fixes the
    // opcode byte at `pc` via `set_opcode`, while `IsCode`'s restrict may
    // regenerate the whole code buffer to manufacture a code/data position.
    // Enumerating `IsCode` first would regenerate code and potentially refix
    // a conflicting byte at `pc` before `OpEq` ever runs, so no enumerated
    // case would actually carry the target opcode.
    Condition::and(vec![
        Condition::Eq(Expr::Status, expr::status_value(Status::Running)),
        Condition::OpEq(Position::Pc, op.0),
        Condition::IsCode(Position::Pc),
    ])
}

fn opcode_rules(op: OpCode) -> Vec<Rule> {
    let spec = table::spec_for(op).expect("modelled opcode carries a table entry");
    let base = base_guard(op);
    let gas_needed = U256::from_u64(spec.gas);
    let stack_needed = U256::from_u64(spec.stack_required as u64);
    let params: Vec<ParamSampler> = (0..spec.stack_required).map(ParamSampler::new).collect();

    let mut rules = vec![
        Rule::new(
            format!("{}-out-of-gas", spec.name),
            Condition::and(vec![base.clone(), Condition::Lt(Expr::Gas, gas_needed)]),
            vec![],
            effect::fail(),
        ),
        Rule::new(
            format!("{}-stack-underflow", spec.name),
            Condition::and(vec![
                base.clone(),
                Condition::Ge(Expr::Gas, gas_needed),
                Condition::Lt(Expr::StackSize, stack_needed),
            ]),
            vec![],
            effect::fail(),
        ),
    ];

    // Opcodes that grow the stack (spec.md §4.3 "stack_change") can overflow
    // it, matching `interpreter::step_frame`'s post-dispatch
    // `stack.len() > MAX_STACK_SIZE` check; opcodes that hold or shrink the
    // stack can't, so they carry no such guard.
    let no_overflow_guard = if spec.stack_change > 0 {
        let threshold = U256::from_u64((MAX_STACK_SIZE as i64 - spec.stack_change as i64 + 1) as u64);
        rules.push(Rule::new(
            format!("{}-stack-overflow", spec.name),
            Condition::and(vec![
                base.clone(),
                Condition::Ge(Expr::Gas, gas_needed),
                Condition::Ge(Expr::StackSize, stack_needed),
                Condition::Ge(Expr::StackSize, threshold),
            ]),
            params.clone(),
            effect::fail(),
        ));
        Some(Condition::Lt(Expr::StackSize, threshold))
    } else {
        None
    };

    // SSTORE is the one modelled opcode with a static-call guard (spec.md
    // §4.3): a dedicated rule intercepts it ahead of the regular effect.
    if op == OpCode::SSTORE {
        rules.push(Rule::new(
            "SSTORE-static-violation",
            Condition::and(vec![
                base.clone(),
                Condition::Ge(Expr::Gas, gas_needed),
                Condition::Ge(Expr::StackSize, stack_needed),
                Condition::Eq(Expr::Static, U256::ONE),
            ]),
            params.clone(),
            effect::fail(),
        ));
        let mut guard = vec![
            base,
            Condition::Ge(Expr::Gas, gas_needed),
            Condition::Ge(Expr::StackSize, stack_needed),
            Condition::Ne(Expr::Static, U256::ONE),
        ];
        guard.extend(no_overflow_guard);
        rules.push(Rule::new(spec.name, Condition::and(guard), params, effect_for(op)));
    } else {
        let mut guard = vec![
            base,
            Condition::Ge(Expr::Gas, gas_needed),
            Condition::Ge(Expr::StackSize, stack_needed),
        ];
        guard.extend(no_overflow_guard);
        rules.push(Rule::new(spec.name, Condition::and(guard), params, effect_for(op)));
    }

    rules
}

// -- effect construction ----------------------------------------------------

/// Deduct `op`'s static gas cost and advance `pc` by its width, around a
/// body that only touches the stack, memory or storage (spec.md §4.3 "the
/// common epilogue"). JUMP/JUMPI/GAS/CALL/MLOAD/MSTORE/MSTORE8 set `pc`/gas
/// themselves and bypass this helper.
fn regular(op: OpCode, body: impl Fn(&mut State) + Send + Sync + 'static) -> Effect {
    let spec = table::spec_for(op).expect("modelled opcode carries a table entry");
    let gas = spec.gas;
    let width = op.width() as u16;
    let name = spec.name;
    Effect::new(name, move |state| {
        let mut next = state.clone();
        body(&mut next);
        next.set_gas(next.gas().wrapping_sub(gas));
        next.set_pc(next.pc().wrapping_add(width));
        next
    })
}

fn binop(op: OpCode, f: impl Fn(U256, U256) -> U256 + Send + Sync + 'static) -> Effect {
    regular(op, move |s| {
        let a = s.pop().unwrap();
        let b = s.pop().unwrap();
        s.push(f(a, b));
    })
}

fn unop(op: OpCode, f: impl Fn(U256) -> U256 + Send + Sync + 'static) -> Effect {
    regular(op, move |s| {
        let a = s.pop().unwrap();
        s.push(f(a));
    })
}

fn triop(op: OpCode, f: impl Fn(U256, U256, U256) -> U256 + Send + Sync + 'static) -> Effect {
    regular(op, move |s| {
        let a = s.pop().unwrap();
        let b = s.pop().unwrap();
        let m = s.pop().unwrap();
        s.push(f(a, b, m));
    })
}

fn bool_u256(value: bool) -> U256 {
    if value {
        U256::ONE
    } else {
        U256::ZERO
    }
}

fn push_effect(n: usize) -> Effect {
    let op = OpCode(OpCode::PUSH1.0 + (n as u8 - 1));
    let spec = table::spec_for(op).expect("PUSHn is modelled");
    let gas = spec.gas;
    let name = spec.name;
    Effect::new(name, move |state| {
        let mut next = state.clone();
        let pc = *next.pc() as usize;
        let start = pc + 1;
        let mut buf = [0u8; 32];
        {
            let code = next.code();
            let available = code.len().saturating_sub(start);
            let take = n.min(available);
            buf[32 - n..32 - n + take].copy_from_slice(&code[start..start + take]);
        }
        next.push(U256::from_big_endian(&buf));
        next.set_gas(next.gas().wrapping_sub(gas));
        next.set_pc(next.pc().wrapping_add(1 + n as u16));
        next
    })
}

fn dup_effect(height: usize) -> Effect {
    let op = OpCode(OpCode::DUP1.0 + (height as u8 - 1));
    regular(op, move |s| {
        let value = s.param(height - 1).unwrap();
        s.push(value);
    })
}

fn swap_effect(height: usize) -> Effect {
    let op = OpCode(OpCode::SWAP1.0 + (height as u8 - 1));
    regular(op, move |s| {
        let top = s.param(0).unwrap();
        let other = s.param(height).unwrap();
        s.set_param(0, other);
        s.set_param(height, top);
    })
}

fn is_valid_jump_destination(state: &State, dst: usize) -> bool {
    dst < state.code().len() && state.is_code(dst) && state.op_at(dst) == OpCode::JUMPDEST.0
}

fn jump_effect() -> Effect {
    let gas = table::spec_for(OpCode::JUMP).unwrap().gas;
    Effect::new("JUMP", move |state| {
        let mut next = state.clone();
        let dst = next.pop().unwrap().as_usize_saturating();
        if !is_valid_jump_destination(&next, dst) {
            next.set_status(Status::Failed);
            return next;
        }
        next.set_gas(next.gas().wrapping_sub(gas));
        next.set_pc(dst as u16);
        next
    })
}

fn jumpi_effect() -> Effect {
    let gas = table::spec_for(OpCode::JUMPI).unwrap().gas;
    Effect::new("JUMPI", move |state| {
        let mut next = state.clone();
        let dst = next.pop().unwrap().as_usize_saturating();
        let cond = next.pop().unwrap();
        next.set_gas(next.gas().wrapping_sub(gas));
        if cond.is_zero() {
            next.set_pc(next.pc().wrapping_add(1));
            return next;
        }
        if !is_valid_jump_destination(&next, dst) {
            next.set_status(Status::Failed);
            return next;
        }
        next.set_pc(dst as u16);
        next
    })
}

fn gas_effect() -> Effect {
    let gas = table::spec_for(OpCode::GAS).unwrap().gas;
    Effect::new("GAS", move |state| {
        let mut next = state.clone();
        let remaining = next.gas().wrapping_sub(gas);
        next.set_gas(remaining);
        next.push(U256::from_u64(remaining));
        next.set_pc(next.pc().wrapping_add(1));
        next
    })
}

fn num_words(size_in_bytes: usize) -> usize {
    (size_in_bytes + WORD_SIZE - 1) / WORD_SIZE
}

fn memory_cost(words: usize) -> u64 {
    let words = words as u64;
    3 * words + words * words / 512
}

/// The gas delta a memory access of `[offset, offset+size)` would charge,
/// given the memory is currently `current_len` bytes long. `None` means the
/// region doesn't fit a 32-bit byte count at all.
fn memory_expansion_cost(current_len: usize, offset: usize, size: usize) -> Option<u64> {
    if size == 0 {
        return Some(0);
    }
    if offset > MAX_BUFFER_SIZE {
        return None;
    }
    let new_size = offset.checked_add(size)?;
    if new_size > MAX_BUFFER_SIZE {
        return None;
    }
    if new_size <= current_len {
        return Some(0);
    }
    Some(memory_cost(num_words(new_size)) - memory_cost(num_words(current_len)))
}

fn mload_effect() -> Effect {
    let gas = table::spec_for(OpCode::MLOAD).unwrap().gas;
    Effect::new("MLOAD", move |state| {
        let mut next = state.clone();
        let index = next.pop().unwrap();
        let offset = index.as_usize_saturating();
        match memory_expansion_cost(next.memory().len(), offset, WORD_SIZE) {
            Some(expansion) if *next.gas() >= gas + expansion => {
                next.grow_memory_words(num_words(offset + WORD_SIZE));
                let value = U256::from_big_endian(&next.memory()[offset..offset + WORD_SIZE]);
                next.push(value);
                next.set_gas(next.gas() - gas - expansion);
                next.set_pc(next.pc().wrapping_add(1));
            }
            _ => next.set_status(Status::Failed),
        }
        next
    })
}

fn mstore_effect() -> Effect {
    let gas = table::spec_for(OpCode::MSTORE).unwrap().gas;
    Effect::new("MSTORE", move |state| {
        let mut next = state.clone();
        let index = next.pop().unwrap();
        let value = next.pop().unwrap();
        let offset = index.as_usize_saturating();
        match memory_expansion_cost(next.memory().len(), offset, WORD_SIZE) {
            Some(expansion) if *next.gas() >= gas + expansion => {
                next.grow_memory_words(num_words(offset + WORD_SIZE));
                let bytes = value.to_big_endian();
                next.memory_mut()[offset..offset + WORD_SIZE].copy_from_slice(&bytes);
                next.set_gas(next.gas() - gas - expansion);
                next.set_pc(next.pc().wrapping_add(1));
            }
            _ => next.set_status(Status::Failed),
        }
        next
    })
}

fn mstore8_effect() -> Effect {
    let gas = table::spec_for(OpCode::MSTORE8).unwrap().gas;
    Effect::new("MSTORE8", move |state| {
        let mut next = state.clone();
        let index = next.pop().unwrap();
        let value = next.pop().unwrap();
        let offset = index.as_usize_saturating();
        match memory_expansion_cost(next.memory().len(), offset, 1) {
            Some(expansion) if *next.gas() >= gas + expansion => {
                next.grow_memory_words(num_words(offset + 1));
                next.memory_mut()[offset] = (value.low_u64() & 0xff) as u8;
                next.set_gas(next.gas() - gas - expansion);
                next.set_pc(next.pc().wrapping_add(1));
            }
            _ => next.set_status(Status::Failed),
        }
        next
    })
}

/// CALL consumes the next pre-programmed [`CallResult`](crate::state::CallResult)
/// directly off `State`, with no [`Host`](crate::host::Host) in the loop —
/// the catalogue's effects describe a single step in isolation, and `State`
/// already carries everything that step can observe (spec.md §9 "rule
/// effects operate on State directly").
fn call_effect() -> Effect {
    let gas = table::spec_for(OpCode::CALL).unwrap().gas;
    Effect::new("CALL", move |state| {
        use crate::state::CallRecord;

        let mut next = state.clone();
        let call_gas = next.pop().unwrap();
        let address = next.pop().unwrap();
        let value = next.pop().unwrap();
        let args_offset = next.pop().unwrap();
        let args_size = next.pop().unwrap();
        let ret_offset = next.pop().unwrap();
        let ret_size = next.pop().unwrap();

        if !value.is_zero() && *next.is_static() {
            next.set_status(Status::Failed);
            return next;
        }

        let args_off = args_offset.as_usize_saturating();
        let args_sz = args_size.as_usize_saturating();
        let ret_off = ret_offset.as_usize_saturating();
        let ret_sz = ret_size.as_usize_saturating();

        // Mirrors `instructions::call::call`'s two `verify_memory_region`
        // calls: charge expansion for the args region, then the ret region
        // against memory as already expanded by the first, failing as soon
        // as either region is out of range or gas runs out.
        macro_rules! fail {
            () => {{
                next.set_status(Status::Failed);
                return next;
            }};
        }
        let mut remaining = match next.gas().checked_sub(gas) {
            Some(g) => g,
            None => fail!(),
        };
        let args_cost = match memory_expansion_cost(next.memory().len(), args_off, args_sz) {
            Some(cost) => cost,
            None => fail!(),
        };
        remaining = match remaining.checked_sub(args_cost) {
            Some(g) => g,
            None => fail!(),
        };
        if args_sz > 0 {
            next.grow_memory_words(num_words(args_off + args_sz));
        }

        let ret_cost = match memory_expansion_cost(next.memory().len(), ret_off, ret_sz) {
            Some(cost) => cost,
            None => fail!(),
        };
        remaining = match remaining.checked_sub(ret_cost) {
            Some(g) => g,
            None => fail!(),
        };
        if ret_sz > 0 {
            next.grow_memory_words(num_words(ret_off + ret_sz));
        }

        let record = CallRecord {
            gas: call_gas,
            address,
            value,
            args_offset,
            args_size,
            ret_offset,
            ret_size,
        };

        match next.next_call_result() {
            Some(result) => {
                let copy_size = result.return_data.len().min(ret_sz);
                if copy_size > 0 {
                    next.memory_mut()[ret_off..ret_off + copy_size]
                        .copy_from_slice(&result.return_data[..copy_size]);
                }
                next.record_call(record);
                next.push(bool_u256(result.success));
            }
            None => {
                next.record_call(record);
                next.push(U256::ZERO);
            }
        }
        next.set_gas(remaining);
        next.set_pc(next.pc().wrapping_add(1));
        next
    })
}

fn effect_for(op: OpCode) -> Effect {
    if op == OpCode::STOP {
        return Effect::new("STOP", |state| {
            let mut next = state.clone();
            next.set_status(Status::Stopped);
            next
        });
    }
    if op == OpCode::ADD {
        return binop(op, |a, b| a.add(&b));
    }
    if op == OpCode::MUL {
        return binop(op, |a, b| a.mul(&b));
    }
    if op == OpCode::SUB {
        return binop(op, |a, b| a.sub(&b));
    }
    if op == OpCode::DIV {
        return binop(op, |a, b| a.div(&b));
    }
    if op == OpCode::SDIV {
        return binop(op, |a, b| a.sdiv(&b));
    }
    if op == OpCode::MOD {
        return binop(op, |a, b| a.rem(&b));
    }
    if op == OpCode::SMOD {
        return binop(op, |a, b| a.smod(&b));
    }
    if op == OpCode::ADDMOD {
        return triop(op, |a, b, m| a.addmod(&b, &m));
    }
    if op == OpCode::MULMOD {
        return triop(op, |a, b, m| a.mulmod(&b, &m));
    }
    if op == OpCode::EXP {
        return binop(op, |base, exponent| base.pow(&exponent));
    }
    if op == OpCode::SIGNEXTEND {
        return binop(op, |byte_index, value| byte_index.signextend(&value));
    }
    if op == OpCode::LT {
        return binop(op, |a, b| bool_u256(a.lt(&b)));
    }
    if op == OpCode::GT {
        return binop(op, |a, b| bool_u256(a.gt(&b)));
    }
    if op == OpCode::SLT {
        return binop(op, |a, b| bool_u256(a.slt(&b)));
    }
    if op == OpCode::SGT {
        return binop(op, |a, b| bool_u256(a.sgt(&b)));
    }
    if op == OpCode::EQ {
        return binop(op, |a, b| bool_u256(a == b));
    }
    if op == OpCode::ISZERO {
        return unop(op, |a| bool_u256(a.is_zero()));
    }
    if op == OpCode::AND {
        return binop(op, |a, b| a.and(&b));
    }
    if op == OpCode::OR {
        return binop(op, |a, b| a.or(&b));
    }
    if op == OpCode::XOR {
        return binop(op, |a, b| a.xor(&b));
    }
    if op == OpCode::NOT {
        return unop(op, |a| a.not());
    }
    if op == OpCode::BYTE {
        return binop(op, |index, value| value.byte(&index));
    }
    if op == OpCode::SHL {
        return binop(op, |shift, value| value.shl_u256(&shift));
    }
    if op == OpCode::SHR {
        return binop(op, |shift, value| value.shr_u256(&shift));
    }
    if op == OpCode::SAR {
        return binop(op, |shift, value| value.sar(&shift));
    }
    if op == OpCode::POP {
        return regular(op, |s| {
            s.pop();
        });
    }
    if op == OpCode::MLOAD {
        return mload_effect();
    }
    if op == OpCode::MSTORE {
        return mstore_effect();
    }
    if op == OpCode::MSTORE8 {
        return mstore8_effect();
    }
    if op == OpCode::SLOAD {
        return regular(op, |s| {
            let key = s.pop().unwrap();
            let value = s.storage_get(&key);
            s.push(value);
        });
    }
    if op == OpCode::SSTORE {
        return regular(op, |s| {
            let key = s.pop().unwrap();
            let value = s.pop().unwrap();
            s.storage_set(key, value);
        });
    }
    if op == OpCode::JUMP {
        return jump_effect();
    }
    if op == OpCode::JUMPI {
        return jumpi_effect();
    }
    if op == OpCode::PC {
        return regular(op, |s| {
            let value = U256::from_u64(*s.pc() as u64);
            s.push(value);
        });
    }
    if op == OpCode::MSIZE {
        return regular(op, |s| {
            let size = s.memory().len() as u64;
            s.push(U256::from_u64(size));
        });
    }
    if op == OpCode::GAS {
        return gas_effect();
    }
    if op == OpCode::JUMPDEST {
        return regular(op, |_s| {});
    }
    if op == OpCode::CALL {
        return call_effect();
    }
    if op == OpCode::INVALID {
        return effect::fail();
    }
    if let Some(n) = op.push_len() {
        return push_effect(n);
    }
    if let Some(h) = op.dup_height() {
        return dup_effect(h);
    }
    if let Some(h) = op.swap_height() {
        return swap_effect(h);
    }
    unreachable!("unmodelled opcode {:?}", op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_modelled_opcode_has_rules() {
        let spec = Specification::build();
        for op in table::modelled_opcodes() {
            let name = table::spec_for(op).unwrap().name;
            assert!(
                spec.rules().iter().any(|r| r.name.starts_with(name)),
                "no rule named after {name}"
            );
        }
    }

    #[test]
    fn add_rule_applies_to_a_running_state_positioned_on_add() {
        let spec = Specification::build();
        let mut state = State::new(vec![OpCode::ADD.0]);
        state.set_gas(10);
        state.push(U256::from_u64(1));
        state.push(U256::from_u64(2));
        let applicable = spec.rules_for(&state);
        assert!(applicable.iter().any(|r| r.name == "ADD"));
    }

    #[test]
    fn add_effect_pops_both_operands_and_pushes_the_sum() {
        let mut state = State::new(vec![OpCode::ADD.0]);
        state.set_gas(10);
        state.push(U256::from_u64(1));
        state.push(U256::from_u64(2));
        let next = effect_for(OpCode::ADD).apply(&state);
        assert_eq!(next.param(0), Some(U256::from_u64(3)));
        assert_eq!(*next.pc(), 1);
        assert_eq!(*next.gas(), 7);
    }

    #[test]
    fn stop_rule_collapses_to_stopped() {
        let state = State::new(vec![OpCode::STOP.0]);
        let next = effect_for(OpCode::STOP).apply(&state);
        assert_eq!(*next.status(), Status::Stopped);
    }

    #[test]
    fn jump_into_a_non_jumpdest_fails() {
        let mut state = State::new(vec![OpCode::JUMP.0, OpCode::STOP.0]);
        state.push(U256::from_u64(1));
        let next = jump_effect().apply(&state);
        assert_eq!(*next.status(), Status::Failed);
    }

    #[test]
    fn invalid_opcode_rule_fires_on_an_unmodelled_byte() {
        let spec = Specification::build();
        let state = State::new(vec![0xef]);
        let applicable = spec.rules_for(&state);
        assert!(applicable.iter().any(|r| r.name == "invalid-opcode"));
    }

    #[test]
    fn past_end_rule_fires_when_pc_reaches_code_length() {
        let spec = Specification::build();
        let mut state = State::new(vec![OpCode::STOP.0]);
        state.set_pc(1);
        let applicable = spec.rules_for(&state);
        assert!(applicable.iter().any(|r| r.name == "pc-past-end-of-code"));
    }
}
