//! Ambient limits and builder tuning (spec.md §3, §4.6, SPEC_FULL.md §3.3).
//!
//! The teacher carries a `Revision`/`Config` table deriving gas costs per
//! hard fork; this crate models a single constant-cost gas table instead
//! (spec.md Non-goals: "gas-schedule derivations per hard-fork"), so what's
//! left of the teacher's ambient configuration is just the handful of
//! named constants it also keeps around (`MAX_CODE_SIZE` and friends) plus
//! the knobs [`StateBuilder`](crate::builder::StateBuilder) reads from
//! when it isn't given an explicit seed.

pub use crate::state::{MAX_CODE_SIZE, MAX_STACK_SIZE};

/// Call depth isn't modelled: `CALL` never recurses into another frame
/// here, it just consumes a pre-programmed [`CallResult`](crate::state::CallResult).
pub const CALL_DEPTH_MODELLED: bool = false;

/// Tunables for [`StateBuilder`](crate::builder::StateBuilder)'s random
/// finalisation, grounded in the constants the builder itself already
/// hard-codes (spec.md §4.6). Constructing one and threading it through
/// is optional — `StateBuilder::new` keeps its own defaults matching
/// [`BuilderConfig::default`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuilderConfig {
    /// Seed for the builder's PRNG; two builders with the same seed and
    /// the same sequence of constraints build identical states.
    pub seed: u64,
    /// Probability that a `pc` left unfixed on read lands one byte past
    /// the end of code rather than uniformly inside it (spec.md §4.6).
    pub pc_past_end_probability: f64,
    /// Inclusive upper bound on a randomly-chosen unfixed stack depth.
    pub max_unfixed_stack_size: usize,
    /// Inclusive upper bound (in wei-gas units) on a randomly-chosen
    /// unfixed gas value.
    pub max_unfixed_gas: u64,
}

impl BuilderConfig {
    pub const fn new(seed: u64) -> Self {
        BuilderConfig {
            seed,
            pc_past_end_probability: 0.01,
            max_unfixed_stack_size: 8,
            max_unfixed_gas: 10_000_000,
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_builders_own_hardcoded_defaults() {
        let config = BuilderConfig::default();
        assert_eq!(config.pc_past_end_probability, 0.01);
        assert_eq!(config.max_unfixed_stack_size, 8);
    }
}
