//! Converts between the core [`State`] and the interpreter's internal
//! frame shape, and supplies the in-memory [`Host`] that mediates storage
//! and call effects during a step (spec.md §4.8).
//!
//! The internal representation genuinely differs from the public one: the
//! core keeps the stack top-first and `pc`/`gas` narrow (`u16`/`u64`), which
//! is convenient for expressions and builders; the interpreter works
//! bottom-first with a wide, possibly-negative `pc`/`gas_left` so it can
//! detect an out-of-range jump or an exhausted gas budget *after* the fact
//! rather than having to pre-validate every arithmetic step.

use std::collections::VecDeque;

use crate::code_map::CodeMap;
use crate::error::{CtError, Result};
use crate::host::Host;
use crate::state::{CallRecord, CallResult, State};
use crate::status::Status;
use crate::u256::U256;

/// The interpreter's internal execution frame (spec.md §4.8 "the
/// interpreter's internal representation").
#[derive(Clone, Debug)]
pub struct Frame {
    pub status: Status,
    pub code: Vec<u8>,
    pub code_map: CodeMap,
    pub pc: usize,
    pub gas_left: i64,
    /// Bottom-first: `stack.last()` is the top of stack.
    pub stack: Vec<U256>,
    pub memory: Vec<u8>,
    pub is_static: bool,
    pub past_calls: Vec<CallRecord>,
}

impl Frame {
    pub fn push(&mut self, value: U256) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Option<U256> {
        self.stack.pop()
    }

    pub fn peek(&self, depth_from_top: usize) -> Option<U256> {
        let len = self.stack.len();
        if depth_from_top >= len {
            None
        } else {
            Some(self.stack[len - 1 - depth_from_top])
        }
    }

    pub fn swap_top(&mut self, depth_from_top: usize) {
        let len = self.stack.len();
        self.stack.swap(len - 1, len - 1 - depth_from_top);
    }
}

/// The synchronous in-memory [`Host`] backing one interpreter step.
/// Storage, past calls and the pre-programmed future results are
/// deep-copied in from the state at decode time (spec.md §9 open question:
/// "a correct implementation deep-copies at the boundary", superseding the
/// source's share-by-reference shortcut).
pub struct InMemoryHost {
    storage: std::collections::BTreeMap<U256, U256>,
    future_results: VecDeque<CallResult>,
}

impl InMemoryHost {
    fn from_state(state: &State) -> Self {
        InMemoryHost {
            storage: state.storage().clone(),
            future_results: state.future_results().iter().cloned().collect(),
        }
    }

    fn into_storage(self) -> std::collections::BTreeMap<U256, U256> {
        self.storage
    }
}

impl Host for InMemoryHost {
    fn get_storage(&self, key: U256) -> U256 {
        self.storage.get(&key).copied().unwrap_or(U256::ZERO)
    }

    fn set_storage(&mut self, key: U256, value: U256) {
        if value.is_zero() {
            self.storage.remove(&key);
        } else {
            self.storage.insert(key, value);
        }
    }

    fn call(&mut self, _record: CallRecord) -> Option<CallResult> {
        self.future_results.pop_front()
    }
}

/// Decode a core `State` into an interpreter `Frame` plus the `Host` that
/// will service its storage and call effects.
pub fn decode(state: &State) -> (Frame, InMemoryHost) {
    let code_map = CodeMap::compute(state.code());
    let frame = Frame {
        status: *state.status(),
        code: state.code().to_vec(),
        code_map,
        pc: *state.pc() as usize,
        gas_left: *state.gas() as i64,
        stack: state.stack().iter().rev().copied().collect(),
        memory: state.memory().to_vec(),
        is_static: *state.is_static(),
        past_calls: state.past_calls().to_vec(),
    };
    (frame, InMemoryHost::from_state(state))
}

/// Re-encode a `Frame` and its `Host` back into a core `State` (spec.md
/// §4.8: "if pc exceeds 16-bit range at encode time, the adapter reports an
/// out-of-range error").
pub fn encode(frame: Frame, host: InMemoryHost) -> Result<State> {
    if frame.pc > u16::MAX as usize {
        return Err(CtError::PcOutOfRange(frame.pc as u32));
    }
    let gas = frame.gas_left.max(0) as u64;

    let mut state = State::new(frame.code);
    state.set_status(frame.status);
    state.set_pc(frame.pc as u16);
    state.set_gas(gas);
    state.set_is_static(frame.is_static);
    for (i, value) in frame.stack.into_iter().rev().enumerate() {
        state.set_param(i, value);
    }
    *state.memory_mut() = frame.memory;
    for call in frame.past_calls {
        state.record_call(call);
    }
    for (key, value) in host.into_storage() {
        state.storage_set(key, value);
    }
    Ok(state)
}
