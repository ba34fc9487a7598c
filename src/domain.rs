//! Per-[`Expr`] sampling metadata (spec.md §3 "Domain[T]", §4.4).
//!
//! The source carried one generic `Domain<T>` interface; here the sample
//! sets are computed directly from the accessor variant so each field gets
//! boundary values scaled to its own representable range rather than the
//! full `U256` space.

use crate::expr::Expr;
use crate::u256::U256;

/// The fixed powers-of-two and extremes every `U256` domain must sample
/// (spec.md §4.4).
fn u256_fixed_points() -> [U256; 11] {
    [
        U256::ZERO,
        U256::ONE,
        U256::from_u64(1 << 8),
        U256::from_u64(1 << 16),
        U256::from_u64(1u64 << 32),
        U256::from_u64(1u64 << 48),
        U256::from_u64(u64::MAX).add(&U256::ONE), // 2^64
        U256::from_limbs([0, 0, 1, 0]),            // 2^128
        U256::from_limbs([0, 0, 0, 1]),             // 2^192
        U256::from_limbs([0, 0, 0, 1u64 << 63]),    // 2^255
        U256::MAX,                                  // 2^256 - 1
    ]
}

fn neighbours(x: U256) -> Vec<U256> {
    let mut out = vec![x];
    if !x.is_zero() {
        out.push(x.sub(&U256::ONE));
    }
    if x != U256::MAX {
        out.push(x.add(&U256::ONE));
    }
    out
}

/// Samples for a value living in the full `U256` range: extremes,
/// neighbours of `x`, and the fixed power-of-two ladder.
pub fn u256_samples(x: U256) -> Vec<U256> {
    let mut out = neighbours(x);
    out.extend(u256_fixed_points());
    out
}

/// Samples for a value known to live in `[0, bound]` (e.g. `pc`,
/// `stack_size`): the same neighbourhood treatment, clipped to the bound,
/// plus the bound itself.
pub fn bounded_samples(x: U256, bound: U256) -> Vec<U256> {
    let mut out: Vec<U256> = neighbours(x).into_iter().filter(|v| v.le(&bound)).collect();
    out.push(U256::ZERO);
    out.push(bound);
    out
}

/// The boundary samples appropriate to a given accessor (spec.md §4.4).
pub fn samples_for(expr: &Expr, x: U256) -> Vec<U256> {
    match *expr {
        Expr::Status => (0..=4).map(U256::from_u64).collect(),
        Expr::Static => vec![U256::ZERO, U256::ONE],
        Expr::Pc => bounded_samples(x, U256::from_u64(u16::MAX as u64)),
        Expr::Op(_) => bounded_samples(x, U256::from_u64(u8::MAX as u64)),
        Expr::StackSize => bounded_samples(x, U256::from_u64(crate::state::MAX_STACK_SIZE as u64)),
        Expr::Gas | Expr::Param(_) => u256_samples(x),
    }
}

/// `samples_for_all` (spec.md §4.4): the union of samples for each `x` in
/// `xs`, duplicates tolerated.
pub fn samples_for_all(expr: &Expr, xs: &[U256]) -> Vec<U256> {
    xs.iter().flat_map(|&x| samples_for(expr, x)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u256_samples_include_extremes() {
        let samples = u256_samples(U256::from_u64(42));
        assert!(samples.contains(&U256::ZERO));
        assert!(samples.contains(&U256::MAX));
    }

    #[test]
    fn bounded_samples_never_exceed_the_bound() {
        let bound = U256::from_u64(1024);
        let samples = bounded_samples(U256::from_u64(1023), bound);
        assert!(samples.iter().all(|v| v.le(&bound)));
    }

    #[test]
    fn status_domain_is_exactly_five_values() {
        assert_eq!(samples_for(&Expr::Status, U256::ZERO).len(), 5);
    }
}
