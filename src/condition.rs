//! The condition algebra (spec.md §3 "Rule", §4.5, §9 "Condition composition
//! with existentials becomes a flat Condition variant").

use crate::builder::StateBuilder;
use crate::domain;
use crate::error::{CtError, Result};
use crate::expr::Expr;
use crate::state::State;
use crate::u256::U256;

/// The position an `IsCode`/`IsData` guard is written through. The source
/// only supported `Pc` and `Param`; this broadens it to a fixed code
/// position (`Op` in the expression language denotes exactly that: the byte
/// at a literal position), resolving the open question in spec.md §9 rather
/// than leaving it panicking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Pc,
    Param(usize),
    Fixed(usize),
}

impl Position {
    fn eval(self, state: &State) -> usize {
        match self {
            Position::Pc => *state.pc() as usize,
            Position::Param(i) => state.param(i).unwrap_or(U256::ZERO).as_usize_saturating(),
            Position::Fixed(pos) => pos,
        }
    }

    fn eval_builder(self, builder: &mut StateBuilder) -> usize {
        match self {
            Position::Pc => builder.get_pc() as usize,
            Position::Param(i) => builder.get_param(i).as_usize_saturating(),
            Position::Fixed(pos) => pos,
        }
    }

    fn set(self, pos: usize, builder: &mut StateBuilder) -> Result<()> {
        match self {
            Position::Pc => builder.set_pc(pos as u16),
            Position::Param(i) => builder.set_param(i, U256::from_u64(pos as u64)),
            Position::Fixed(fixed) if fixed == pos => Ok(()),
            Position::Fixed(_) => Err(CtError::UnsupportedPositionExpr),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Condition {
    Eq(Expr, U256),
    Ne(Expr, U256),
    Lt(Expr, U256),
    Ge(Expr, U256),
    In(Expr, Vec<U256>),
    IsCode(Position),
    IsData(Position),
    /// The byte at a (possibly runtime-valued) code position equals a
    /// literal opcode. This is `op(pos) = OP` from spec.md §4.7's rule
    /// guard, generalised to any `Position` rather than only a fixed one
    /// — `Expr::Op(pos)` alone can only name a *literal* position, but the
    /// guard needs "whatever `pc` currently is".
    OpEq(Position, u8),
    /// The byte at a code position is none of the given bytes — the
    /// "unknown opcode" guard (spec.md §4.3 step 5, §4.7 "invalid-opcode").
    OpNotIn(Position, Vec<u8>),
    /// The position is at or past the end of the code buffer (spec.md §4.3
    /// step 2 "If pc ≥ len(code)").
    PastEnd(Position),
    And(Vec<Condition>),
}

impl Condition {
    /// `And()` with no conjuncts is the trivially-true condition (spec.md
    /// §4.5).
    pub fn always() -> Condition {
        Condition::And(Vec::new())
    }

    pub fn and(conditions: Vec<Condition>) -> Condition {
        Condition::And(conditions)
    }

    pub fn check(&self, state: &State) -> bool {
        match self {
            Condition::Eq(e, v) => e.eval(state) == *v,
            Condition::Ne(e, v) => e.eval(state) != *v,
            Condition::Lt(e, v) => e.eval(state).lt(v),
            Condition::Ge(e, v) => e.eval(state).ge(v),
            Condition::In(e, values) => values.contains(&e.eval(state)),
            Condition::IsCode(pos) => state.is_code(pos.eval(state)),
            Condition::IsData(pos) => state.is_data(pos.eval(state)),
            Condition::OpEq(pos, byte) => state.op_at(pos.eval(state)) == *byte,
            Condition::OpNotIn(pos, values) => !values.contains(&state.op_at(pos.eval(state))),
            Condition::PastEnd(pos) => pos.eval(state) >= state.code().len(),
            Condition::And(conjuncts) => conjuncts.iter().all(|c| c.check(state)),
        }
    }

    /// Fix fields of `builder` so the eventual state necessarily satisfies
    /// this condition (spec.md §4.5).
    pub fn restrict(&self, builder: &mut StateBuilder) -> Result<()> {
        match self {
            Condition::Eq(e, v) => e.set(*v, builder),
            Condition::Ne(e, v) => {
                let alt = if *v == U256::ZERO {
                    U256::ONE
                } else {
                    v.sub(&U256::ONE)
                };
                e.set(alt, builder)
            }
            Condition::Lt(e, v) => {
                let below = if v.is_zero() { U256::ZERO } else { v.sub(&U256::ONE) };
                e.set(below, builder)
            }
            Condition::Ge(e, v) => e.set(*v, builder),
            Condition::In(e, values) => match values.first() {
                Some(v) => e.set(*v, builder),
                None => Ok(()),
            },
            Condition::IsCode(pos) => restrict_code_classification(*pos, true, builder),
            Condition::IsData(pos) => restrict_code_classification(*pos, false, builder),
            Condition::OpEq(pos, byte) => {
                let at = pos.eval_builder(builder);
                builder.set_opcode(at, *byte)
            }
            Condition::OpNotIn(pos, values) => {
                let chosen = (0u16..=255).map(|b| b as u8).find(|b| !values.contains(b));
                match chosen {
                    Some(byte) => {
                        let at = pos.eval_builder(builder);
                        builder.set_opcode(at, byte)
                    }
                    None => Ok(()),
                }
            }
            Condition::PastEnd(pos) => {
                let len = builder.code_len_hint().max(1);
                if !builder.code_length_is_fixed() {
                    builder.set_code_len(len)?;
                }
                pos.set(len, builder)
            }
            Condition::And(conjuncts) => {
                for c in conjuncts {
                    c.restrict(builder)?;
                }
                Ok(())
            }
        }
    }

    /// Emit builders whose built states exercise this condition's boundary
    /// (spec.md §4.5). `Eq`/`Ne`/`In` sample both satisfying and violating
    /// values; `And` composes conjuncts by nested enumeration.
    pub fn enumerate_test_cases(&self, builder: &StateBuilder, sink: &mut dyn FnMut(StateBuilder)) {
        match self {
            Condition::Eq(e, v) | Condition::Ne(e, v) | Condition::Lt(e, v) | Condition::Ge(e, v) => {
                for w in domain::samples_for(e, *v) {
                    let mut b = builder.clone();
                    let _ = e.set(w, &mut b);
                    sink(b);
                }
            }
            Condition::In(e, values) => {
                for w in domain::samples_for_all(e, values) {
                    let mut b = builder.clone();
                    let _ = e.set(w, &mut b);
                    sink(b);
                }
            }
            Condition::IsCode(pos) | Condition::IsData(pos) => {
                let want_code = matches!(self, Condition::IsCode(_));
                let mut yes = builder.clone();
                let _ = restrict_code_classification(*pos, want_code, &mut yes);
                sink(yes);
                let mut no = builder.clone();
                let _ = restrict_code_classification(*pos, !want_code, &mut no);
                sink(no);
            }
            Condition::OpEq(_, _) | Condition::OpNotIn(_, _) | Condition::PastEnd(_) => {
                let mut b = builder.clone();
                let _ = self.restrict(&mut b);
                sink(b);
            }
            Condition::And(conjuncts) => {
                let mut frontier = vec![builder.clone()];
                for c in conjuncts {
                    let mut next = Vec::new();
                    for b in &frontier {
                        c.enumerate_test_cases(b, &mut |nb| next.push(nb));
                    }
                    if next.is_empty() {
                        next = frontier;
                    }
                    frontier = next;
                }
                for b in frontier {
                    sink(b);
                }
            }
        }
    }
}

/// Shared implementation of `IsCode`/`IsData` restrict (spec.md §4.5): pick
/// a code position already classified the way we want, or regenerate the
/// code if the length isn't fixed yet and none exists.
fn restrict_code_classification(pos: Position, want_code: bool, builder: &mut StateBuilder) -> Result<()> {
    match builder.find_code_position(want_code) {
        Some(found) => pos.set(found, builder),
        None => {
            if builder.code_length_is_fixed() {
                // Best-effort: no matching position exists and we're not
                // allowed to change the code length. Leave the builder
                // unchanged rather than fail the whole restrict chain.
                Ok(())
            } else {
                builder.regenerate_code_with(want_code)?;
                match builder.find_code_position(want_code) {
                    Some(found) => pos.set(found, builder),
                    None => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::OpCode;

    #[test]
    fn and_with_no_conjuncts_is_trivially_true() {
        let state = State::new(vec![]);
        assert!(Condition::always().check(&state));
    }

    #[test]
    fn eq_restrict_then_check_round_trips() {
        let mut builder = StateBuilder::new(1);
        Condition::Eq(Expr::Gas, U256::from_u64(77))
            .restrict(&mut builder)
            .unwrap();
        let state = builder.build();
        assert!(Condition::Eq(Expr::Gas, U256::from_u64(77)).check(&state));
    }

    #[test]
    fn is_code_restrict_finds_a_code_byte() {
        let mut builder = StateBuilder::new(2);
        builder.set_opcode(0, OpCode::PUSH1.0).unwrap();
        builder.set_opcode(1, 0xaa).unwrap();
        builder.set_opcode(2, OpCode::STOP.0).unwrap();
        Condition::IsCode(Position::Pc).restrict(&mut builder).unwrap();
        let state = builder.build();
        assert!(state.is_code(*state.pc() as usize));
    }
}
