//! A fluent single-step test harness (SPEC_FULL.md §3.4), adapted from the
//! teacher's `EvmTester`: build a `State`, run it through the reference
//! interpreter, assert on the result.

use crate::interpreter::{self, Evm, ReferenceInterpreter};
use crate::state::State;
use crate::status::Status;
use crate::u256::U256;

/// Fluently configures a [`State`] and checks the outcome of running it
/// through [`ReferenceInterpreter`].
#[derive(Clone)]
pub struct CtTester {
    state: State,
    steps: usize,
}

impl CtTester {
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        CtTester {
            state: State::new(code.into()),
            steps: 1,
        }
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.state.set_gas(gas);
        self
    }

    /// Push a value onto the stack. Calls compose bottom-up: the first
    /// `push` ends up deepest, matching `State::push`'s own semantics.
    pub fn push(mut self, value: impl Into<U256>) -> Self {
        self.state.push(value.into());
        self
    }

    pub fn storage(mut self, key: impl Into<U256>, value: impl Into<U256>) -> Self {
        self.state.storage_set(key.into(), value.into());
        self
    }

    pub fn static_call(mut self, is_static: bool) -> Self {
        self.state.set_is_static(is_static);
        self
    }

    pub fn steps(mut self, n: usize) -> Self {
        self.steps = n;
        self
    }

    /// Run the configured state through the reference interpreter and
    /// return the resulting state.
    pub fn run(&self) -> State {
        ReferenceInterpreter
            .step_n(&self.state, self.steps)
            .expect("step_n should only fail on out-of-range encode")
    }

    pub fn assert_status(&self, want: Status) -> &Self {
        let got = self.run();
        assert_eq!(*got.status(), want, "status mismatch: {got}");
        self
    }

    pub fn assert_gas(&self, want: u64) -> &Self {
        let got = self.run();
        assert_eq!(*got.gas(), want, "gas mismatch: {got}");
        self
    }

    pub fn assert_top(&self, want: impl Into<U256>) -> &Self {
        let got = self.run();
        assert_eq!(got.param(0), Some(want.into()), "top-of-stack mismatch: {got}");
        self
    }
}

/// `Evm::step_n` is also reachable directly without the fluent wrapper, for
/// callers that already hold a `State`.
pub fn step_n(state: &State, n: usize) -> crate::error::Result<State> {
    interpreter::step_n(state, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::OpCode;

    #[test]
    fn add_tester_checks_status_gas_and_top() {
        CtTester::new(vec![OpCode::ADD.0])
            .gas(100)
            .push(21u64)
            .push(42u64)
            .assert_status(Status::Stopped)
            .assert_gas(97)
            .assert_top(63u64);
    }

    #[test]
    fn sstore_in_static_mode_fails() {
        CtTester::new(vec![OpCode::SSTORE.0])
            .gas(1000)
            .static_call(true)
            .push(1u64)
            .push(1u64)
            .assert_status(Status::Failed);
    }
}
