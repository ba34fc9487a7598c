//! Typed accessors into a [`State`](crate::state::State) or
//! [`StateBuilder`](crate::builder::StateBuilder) (spec.md §3, §4.4,
//! §9 "Generic expression/domain polymorphism").
//!
//! The source used run-time generics over the accessed type; here each
//! accessor is a variant of one flat enum carrying its own typed payload,
//! and every variant evaluates to a [`U256`] so the condition algebra in
//! [`crate::condition`] stays uniform regardless of which field it guards.
//! `Status` is encoded as its discriminant, `Static` as 0/1.

use crate::builder::StateBuilder;
use crate::state::State;
use crate::status::Status;
use crate::u256::U256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Execution status, encoded as its discriminant (Running=0 .. Failed=4).
    Status,
    /// Program counter.
    Pc,
    /// Remaining gas.
    Gas,
    /// The opcode byte at a fixed code position (STOP past the end).
    Op(usize),
    /// The `i`-th stack value from the top (0 = top of stack).
    Param(usize),
    /// Current stack depth.
    StackSize,
    /// The static-call flag, 0 or 1.
    Static,
}

/// The `Expr::Status` encoding, exposed for callers (e.g. the rule
/// catalogue) that need to write a status guard without going through a
/// `StateBuilder`.
pub fn status_value(status: Status) -> U256 {
    status_to_u256(status)
}

fn status_to_u256(status: Status) -> U256 {
    let n = match status {
        Status::Running => 0,
        Status::Stopped => 1,
        Status::Returned => 2,
        Status::Reverted => 3,
        Status::Failed => 4,
    };
    U256::from_u64(n)
}

fn u256_to_status(v: U256) -> Status {
    match v.low_u64() {
        0 => Status::Running,
        1 => Status::Stopped,
        2 => Status::Returned,
        3 => Status::Reverted,
        _ => Status::Failed,
    }
}

impl Expr {
    pub fn eval(&self, state: &State) -> U256 {
        match *self {
            Expr::Status => status_to_u256(*state.status()),
            Expr::Pc => U256::from_u64(*state.pc() as u64),
            Expr::Gas => U256::from_u64(*state.gas()),
            Expr::Op(pos) => U256::from_u64(state.op_at(pos) as u64),
            Expr::Param(i) => state.param(i).unwrap_or(U256::ZERO),
            Expr::StackSize => U256::from_u64(state.stack_size() as u64),
            Expr::Static => U256::from_u64(*state.is_static() as u64),
        }
    }

    /// Read the same accessor off a builder, fixing the underlying field to
    /// a random value on first read (spec.md §4.6 "first `get_X`...").
    pub fn eval_builder(&self, builder: &mut StateBuilder) -> U256 {
        match *self {
            Expr::Status => status_to_u256(builder.get_status()),
            Expr::Pc => U256::from_u64(builder.get_pc() as u64),
            Expr::Gas => U256::from_u64(builder.get_gas()),
            Expr::Op(pos) => U256::from_u64(builder.get_code_byte(pos) as u64),
            Expr::Param(i) => builder.get_param(i),
            Expr::StackSize => U256::from_u64(builder.get_stack_size() as u64),
            Expr::Static => U256::from_u64(builder.get_static() as u64),
        }
    }

    /// Constrain `builder` so that `eval(builder) == value` once built
    /// (spec.md §4.4 "Write").
    pub fn set(&self, value: U256, builder: &mut StateBuilder) -> crate::error::Result<()> {
        match *self {
            Expr::Status => builder.set_status(u256_to_status(value)),
            Expr::Pc => builder.set_pc(value.low_u64() as u16),
            Expr::Gas => builder.set_gas(value.low_u64()),
            Expr::Op(pos) => builder.set_opcode(pos, value.low_u64() as u8),
            Expr::Param(i) => builder.set_param(i, value),
            Expr::StackSize => builder.set_stack_size(value.as_usize_saturating()),
            Expr::Static => builder.set_static(value.low_u64() != 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_u256() {
        for status in [
            Status::Running,
            Status::Stopped,
            Status::Returned,
            Status::Reverted,
            Status::Failed,
        ] {
            assert_eq!(u256_to_status(status_to_u256(status)), status);
        }
    }

    #[test]
    fn op_reads_stop_past_end_of_code() {
        let state = State::new(vec![0x01]);
        assert_eq!(Expr::Op(5).eval(&state), U256::ZERO);
    }
}
