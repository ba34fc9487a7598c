use strum_macros::Display;

/// Execution status of a [`State`](crate::state::State).
///
/// Once a state leaves [`Status::Running`] it is terminal: every subsequent
/// `Evm::step_n` call on it must be a no-op (spec.md "Status" invariant).
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Status {
    Running,
    Stopped,
    Returned,
    Reverted,
    /// Collapses every distinct failure reason (gas, stack, bad jump,
    /// invalid opcode, ...). Two `Failed` states are always `equal`
    /// (spec.md §4.2, §7): the spec deliberately does not require
    /// implementations to agree on *why* execution failed.
    Failed,
}

impl Status {
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }
}
