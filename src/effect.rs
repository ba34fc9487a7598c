//! Rule effects (spec.md §3 "Rule", §9 "Effect functions").
//!
//! The source represented an effect as an opaque `State -> State` closure;
//! the design notes accept that form as long as the name travels with it.
//! Plain `fn` pointers cover the opcode-agnostic effects (`IDENTITY`,
//! `FAIL`), but the specification catalogue (`crate::specification`) also
//! needs one effect per PUSHn/DUPh/SWAPh, which differ only by a captured
//! width — so `Effect` holds a reference-counted closure rather than a bare
//! pointer.

use std::sync::Arc;

use crate::state::State;
use crate::status::Status;

#[derive(Clone)]
pub struct Effect {
    pub name: &'static str,
    apply_fn: Arc<dyn Fn(&State) -> State + Send + Sync>,
}

impl Effect {
    pub fn new(name: &'static str, apply_fn: impl Fn(&State) -> State + Send + Sync + 'static) -> Self {
        Effect {
            name,
            apply_fn: Arc::new(apply_fn),
        }
    }

    pub fn apply(&self, state: &State) -> State {
        (self.apply_fn)(state)
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect").field("name", &self.name).finish()
    }
}

/// Leaves the state untouched, for rules that guard already-terminal
/// statuses (spec.md §4.7 "stay terminal; effect is identity").
pub fn identity() -> Effect {
    Effect::new("identity", |state| state.clone())
}

/// Collapses the state into `Failed` without otherwise describing why
/// (spec.md §4.2, §7 "Failure collapse").
pub fn fail() -> Effect {
    Effect::new("fail", |state| {
        let mut next = state.clone();
        next.set_status(Status::Failed);
        next
    })
}
