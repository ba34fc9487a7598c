//! The host capability (spec.md §3 "Host", §4.8, §9 "Host capability is a
//! trait/interface taken by reference through the adapter — not global
//! state").
//!
//! Unlike the teacher's `evmc`-flavoured `Host`, which is `async` to allow
//! for a remote backing store, the modelled subset never crosses an await
//! point: storage and call effects are synchronous in-memory operations, so
//! the trait is plain and object-safe.

use crate::state::{CallRecord, CallResult};
use crate::u256::U256;

/// Capability exposing storage and outgoing-call operations to the
/// interpreter, mediated by the adapter rather than reached globally.
pub trait Host {
    /// Absent keys read as zero (spec.md §3 `storage` invariant).
    fn get_storage(&self, key: U256) -> U256;
    fn set_storage(&mut self, key: U256, value: U256);

    /// Record an outgoing call and consume the next pre-programmed result,
    /// if any (spec.md §4.3 CALL).
    fn call(&mut self, record: CallRecord) -> Option<CallResult>;
}

/// A host that rejects every operation, for interpreter code paths that are
/// statically known not to touch storage or issue calls.
pub struct NullHost;

impl Host for NullHost {
    fn get_storage(&self, _key: U256) -> U256 {
        U256::ZERO
    }

    fn set_storage(&mut self, _key: U256, _value: U256) {}

    fn call(&mut self, _record: CallRecord) -> Option<CallResult> {
        None
    }
}
