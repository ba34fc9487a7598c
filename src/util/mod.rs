//! Test-authoring helpers (SPEC_FULL.md §3.4), gated behind the `util`
//! feature the way the teacher gates its own equivalent module.

pub mod bytecode;
pub mod tester;

pub use bytecode::Bytecode;
pub use tester::CtTester;
