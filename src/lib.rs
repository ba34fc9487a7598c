//! A conformance testing framework for EVM interpreters.
//!
//! The crate is organised leaf-first, matching `spec.md`'s component list:
//! [`u256`] (C1), [`state`]/[`code_map`]/[`status`] (C2/C3), [`expr`]/
//! [`domain`] (C4), [`condition`] (C5), [`rule`]/[`effect`] (C6),
//! [`builder`] (C7), [`specification`] (C8), [`interpreter`] (C9),
//! [`adapter`]/[`host`] (C10), and [`differential`] (C11).
//!
//! Two interfaces cross the boundary: [`interpreter::Evm::step_n`] and
//! [`specification::Specification`]'s rule catalogue.

pub mod adapter;
pub mod builder;
pub mod code_map;
pub mod condition;
pub mod config;
pub mod differential;
pub mod domain;
pub mod effect;
pub mod error;
pub mod expr;
pub mod host;
#[doc(hidden)]
pub mod instructions;
pub mod interpreter;
pub mod opcode;
pub mod rule;
pub mod specification;
pub mod state;
pub mod status;
pub mod tracing;
pub mod u256;

#[cfg(feature = "util")]
pub mod util;

pub use builder::StateBuilder;
pub use condition::Condition;
pub use effect::Effect;
pub use error::{CtError, Result};
pub use host::Host;
pub use interpreter::{Evm, ReferenceInterpreter};
pub use opcode::OpCode;
pub use rule::Rule;
pub use specification::Specification;
pub use state::State;
pub use status::Status;
pub use u256::U256;
