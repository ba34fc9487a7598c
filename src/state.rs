//! The observable execution frame (spec.md §3 "State", component C2).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use getset::{Getters, Setters};

use crate::code_map::CodeMap;
use crate::status::Status;
use crate::u256::U256;

pub const MAX_CODE_SIZE: usize = 24_576;
pub const MAX_STACK_SIZE: usize = 1024;

/// A description of an outgoing CALL, recorded append-only in
/// `State::past_calls` (spec.md §3, §4.3 CALL, §9 open question on deep
/// copies at the host boundary).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRecord {
    pub gas: U256,
    pub address: U256,
    pub value: U256,
    pub args_offset: U256,
    pub args_size: U256,
    pub ret_offset: U256,
    pub ret_size: U256,
}

/// A pre-programmed response to the next CALL, consumed FIFO from
/// `State::future_results` (spec.md §3, §4.3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallResult {
    pub success: bool,
    pub return_data: Vec<u8>,
}

/// The EVM execution frame. Fields marked `pub(crate)` are reached through
/// the accessor methods below so every mutation can keep its invariants
/// (code-length cap, memory word-alignment, storage zero-absence) intact.
#[derive(Clone, Getters, Setters)]
pub struct State {
    #[getset(get = "pub", set = "pub")]
    status: Status,
    code: Vec<u8>,
    code_map: RefCell<Option<CodeMap>>,
    #[getset(get = "pub", set = "pub")]
    pc: u16,
    #[getset(get = "pub", set = "pub")]
    gas: u64,
    /// Top-of-stack is conceptually at position 0, per the boundary
    /// representation in spec.md §6; `stack[0]` is therefore literally the
    /// last-pushed value.
    stack: Vec<U256>,
    memory: Vec<u8>,
    storage: BTreeMap<U256, U256>,
    #[getset(get = "pub", set = "pub")]
    is_static: bool,
    past_calls: Vec<CallRecord>,
    future_results: Vec<CallResult>,
}

impl State {
    pub fn new(code: Vec<u8>) -> Self {
        State {
            status: Status::Running,
            code,
            code_map: RefCell::new(None),
            pc: 0,
            gas: 0,
            stack: Vec::new(),
            memory: Vec::new(),
            storage: BTreeMap::new(),
            is_static: false,
            past_calls: Vec::new(),
            future_results: Vec::new(),
        }
    }

    // -- code -----------------------------------------------------------

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn set_code(&mut self, code: Vec<u8>) {
        self.code = code;
        self.code_map.replace(None);
    }

    pub fn set_code_byte(&mut self, pos: usize, byte: u8) {
        if pos >= self.code.len() {
            self.code.resize(pos + 1, 0);
        }
        self.code[pos] = byte;
        self.code_map.replace(None);
    }

    fn with_code_map<R>(&self, f: impl FnOnce(&CodeMap) -> R) -> R {
        if self.code_map.borrow().is_none() {
            let computed = CodeMap::compute(&self.code);
            self.code_map.replace(Some(computed));
        }
        let borrow = self.code_map.borrow();
        f(borrow.as_ref().unwrap())
    }

    pub fn is_code(&self, pos: usize) -> bool {
        pos < self.code.len() && self.with_code_map(|m| m.is_code(pos))
    }

    pub fn is_data(&self, pos: usize) -> bool {
        pos < self.code.len() && self.with_code_map(|m| m.is_data(pos))
    }

    pub fn next_code_position(&self, start: usize) -> usize {
        self.with_code_map(|m| m.next_code_position(start))
    }

    pub fn next_data_position(&self, start: usize) -> usize {
        self.with_code_map(|m| m.next_data_position(start))
    }

    pub fn code_positions(&self, want_code: bool) -> Vec<usize> {
        self.with_code_map(|m| m.positions_matching(want_code).collect())
    }

    /// The opcode byte at `pos`, or STOP past the end of code (spec.md §3
    /// `Op(pos)`).
    pub fn op_at(&self, pos: usize) -> u8 {
        self.code.get(pos).copied().unwrap_or(0x00)
    }

    // -- stack ------------------------------------------------------------

    pub fn stack(&self) -> &[U256] {
        &self.stack
    }

    pub fn stack_size(&self) -> usize {
        self.stack.len()
    }

    /// `i`-th value from the top (0 = top of stack).
    pub fn param(&self, i: usize) -> Option<U256> {
        self.stack.get(i).copied()
    }

    pub fn set_param(&mut self, i: usize, value: U256) {
        if i >= self.stack.len() {
            self.stack.resize(i + 1, U256::ZERO);
        }
        self.stack[i] = value;
    }

    pub fn push(&mut self, value: U256) {
        self.stack.insert(0, value);
    }

    pub fn pop(&mut self) -> Option<U256> {
        if self.stack.is_empty() {
            None
        } else {
            Some(self.stack.remove(0))
        }
    }

    // -- memory -----------------------------------------------------------

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Vec<u8> {
        &mut self.memory
    }

    /// Grows memory to at least `words * 32` bytes, zero-filled. Memory only
    /// ever grows (spec.md §3 `memory` invariant).
    pub fn grow_memory_words(&mut self, words: usize) {
        let target = words * 32;
        if target > self.memory.len() {
            self.memory.resize(target, 0);
        }
    }

    // -- storage ------------------------------------------------------------

    pub fn storage(&self) -> &BTreeMap<U256, U256> {
        &self.storage
    }

    pub fn storage_get(&self, key: &U256) -> U256 {
        self.storage.get(key).copied().unwrap_or(U256::ZERO)
    }

    /// Zero writes delete the key, keeping "absent" and "zero" equivalent
    /// (spec.md §3 `storage` invariant).
    pub fn storage_set(&mut self, key: U256, value: U256) {
        if value.is_zero() {
            self.storage.remove(&key);
        } else {
            self.storage.insert(key, value);
        }
    }

    // -- calls ------------------------------------------------------------

    pub fn past_calls(&self) -> &[CallRecord] {
        &self.past_calls
    }

    pub fn record_call(&mut self, call: CallRecord) {
        self.past_calls.push(call);
    }

    pub fn future_results(&self) -> &[CallResult] {
        &self.future_results
    }

    pub fn push_future_result(&mut self, result: CallResult) {
        self.future_results.push(result);
    }

    /// Consume the next pre-programmed call result, FIFO (spec.md §4.3
    /// CALL).
    pub fn next_call_result(&mut self) -> Option<CallResult> {
        if self.future_results.is_empty() {
            None
        } else {
            Some(self.future_results.remove(0))
        }
    }

    // -- equality / diagnostics -------------------------------------------

    /// Human-readable mismatches between `self` and `other` (spec.md §4.2
    /// `diff()`). Empty iff `self.equal(other)`.
    pub fn diff(&self, other: &State) -> Vec<String> {
        let mut out = Vec::new();
        match (self.status, other.status) {
            (Status::Failed, Status::Failed) => {}
            (a, b) if a != b => out.push(format!("status: {a:?} != {b:?}")),
            _ => {}
        }
        if self.status != Status::Failed && other.status != Status::Failed {
            if self.pc != other.pc {
                out.push(format!("pc: {} != {}", self.pc, other.pc));
            }
            if self.gas != other.gas {
                out.push(format!("gas: {} != {}", self.gas, other.gas));
            }
            if self.stack != other.stack {
                out.push(format!("stack: {:?} != {:?}", self.stack, other.stack));
            }
            if self.memory != other.memory {
                out.push(format!(
                    "memory: {} bytes != {} bytes",
                    self.memory.len(),
                    other.memory.len()
                ));
            }
            if self.storage != other.storage {
                out.push("storage differs".to_string());
            }
            if self.past_calls != other.past_calls {
                out.push("past_calls differs".to_string());
            }
        }
        out
    }

    /// Structural equality, except that all `Failed` states compare equal
    /// (spec.md §4.2, §7, §8 "Failure collapse").
    pub fn equal(&self, other: &State) -> bool {
        self.diff(other).is_empty()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("status", &self.status)
            .field("pc", &self.pc)
            .field("gas", &self.gas)
            .field("stack", &self.stack)
            .field("memory_len", &self.memory.len())
            .field("storage_len", &self.storage.len())
            .field("is_static", &self.is_static)
            .finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "status: {:?}", self.status)?;
        writeln!(f, "pc: {} gas: {}", self.pc, self.gas)?;
        writeln!(f, "stack: {:?}", self.stack)?;
        writeln!(f, "memory: {} bytes", self.memory.len())?;
        write!(f, "storage: {} entries", self.storage.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_independent() {
        let mut a = State::new(vec![0x00]);
        a.push(U256::from_u64(1));
        let mut b = a.clone();
        b.push(U256::from_u64(2));
        assert_eq!(a.stack_size(), 1);
        assert_eq!(b.stack_size(), 2);
    }

    #[test]
    fn all_failed_states_are_equal() {
        let mut a = State::new(vec![0x00]);
        a.set_status(Status::Failed);
        a.set_gas(0);
        let mut b = State::new(vec![0x01, 0x02, 0x03]);
        b.set_status(Status::Failed);
        b.set_gas(999);
        b.push(U256::from_u64(7));
        assert!(a.equal(&b));
    }

    #[test]
    fn storage_zero_write_deletes_key() {
        let mut s = State::new(vec![]);
        s.storage_set(U256::from_u64(1), U256::from_u64(42));
        assert_eq!(s.storage().len(), 1);
        s.storage_set(U256::from_u64(1), U256::ZERO);
        assert_eq!(s.storage().len(), 0);
        assert_eq!(s.storage_get(&U256::from_u64(1)), U256::ZERO);
    }

    #[test]
    fn mutating_code_invalidates_code_map() {
        let mut s = State::new(vec![0x00]);
        assert!(s.is_code(0));
        s.set_code_byte(0, crate::opcode::OpCode::PUSH1.0);
        s.set_code_byte(1, 0xaa);
        assert!(s.is_code(0));
        assert!(s.is_data(1));
    }
}
