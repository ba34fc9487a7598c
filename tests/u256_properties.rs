//! Property-based checks of the U256 algebraic laws from spec.md §8,
//! run over many randomly generated operands rather than hand-picked
//! values.

use ct::u256::U256;
use proptest::prelude::*;

fn arb_u256() -> impl Strategy<Value = U256> {
    any::<[u64; 4]>().prop_map(U256::from_limbs)
}

proptest! {
    #[test]
    fn add_is_commutative(a in arb_u256(), b in arb_u256()) {
        prop_assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn add_is_associative(a in arb_u256(), b in arb_u256(), c in arb_u256()) {
        prop_assert_eq!(a.add(&b).add(&c), a.add(&b.add(&c)));
    }

    #[test]
    fn mul_is_commutative(a in arb_u256(), b in arb_u256()) {
        prop_assert_eq!(a.mul(&b), b.mul(&a));
    }

    #[test]
    fn mul_distributes_over_add(a in arb_u256(), b in arb_u256(), c in arb_u256()) {
        prop_assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));
    }

    #[test]
    fn and_or_xor_are_commutative(a in arb_u256(), b in arb_u256()) {
        prop_assert_eq!(a.and(&b), b.and(&a));
        prop_assert_eq!(a.or(&b), b.or(&a));
        prop_assert_eq!(a.xor(&b), b.xor(&a));
    }

    #[test]
    fn not_is_its_own_inverse(a in arb_u256()) {
        prop_assert_eq!(a.not().not(), a);
    }

    /// `AddMod(a,b,m) = (a+b) mod m` without losing the 257th bit. Reduce
    /// each operand mod m first (each now < m < 2^256, so no precision is
    /// lost however `m` is chosen), then add the two reduced values and
    /// subtract `m` back out if that addition carried past 2^256 — the
    /// carry is exactly 2^256, so a single wrapping subtraction recovers
    /// the true reduced sum.
    #[test]
    fn addmod_matches_reduce_then_add_for_any_nonzero_modulus(a in arb_u256(), b in arb_u256(), m in arb_u256()) {
        prop_assume!(!m.is_zero());
        let a_mod = a.rem(&m);
        let b_mod = b.rem(&m);
        let (sum, overflowed) = a_mod.overflowing_add(&b_mod);
        let reference = if overflowed { sum.sub(&m) } else { sum };
        prop_assert_eq!(a.addmod(&b, &m), reference);
    }

    #[test]
    fn shl_matches_multiplication_by_power_of_two_for_shifts_under_256(a in arb_u256(), n in 0usize..256) {
        let mut power = U256::ONE;
        for _ in 0..n {
            power = power.add(&power);
        }
        prop_assert_eq!(a.shl(n), a.mul(&power));
    }

    #[test]
    fn shl_by_256_or_more_is_always_zero(a in arb_u256(), extra in 0usize..64) {
        prop_assert_eq!(a.shl(256 + extra), U256::ZERO);
    }

    #[test]
    fn is_zero_agrees_with_equality_to_zero(a in arb_u256()) {
        prop_assert_eq!(a.is_zero(), a == U256::ZERO);
    }

    #[test]
    fn div_and_rem_by_zero_are_zero(a in arb_u256()) {
        prop_assert_eq!(a.div(&U256::ZERO), U256::ZERO);
        prop_assert_eq!(a.rem(&U256::ZERO), U256::ZERO);
    }
}
