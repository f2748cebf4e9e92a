//! Deterministic primality testing used to size tables.
//!
//! `is_prime` is a Miller–Rabin test whose witness set is picked by the
//! magnitude of the input. Each bracket below is exact: every composite
//! under the bound fails at least one of the listed witnesses, so the
//! answer is never probabilistic for any `u64`.

/// `(exclusive upper bound, witnesses)` pairs, checked in order.
const WITNESS_BRACKETS: &[(u64, &[u64])] = &[
    (1_373_653, &[2, 3]),
    (9_080_191, &[31, 73]),
    (4_759_123_141, &[2, 7, 61]),
    (1_122_004_669_633, &[2, 13, 23, 1_662_803]),
    (2_152_302_898_747, &[2, 3, 5, 7, 11]),
    (3_474_749_660_383, &[2, 3, 5, 7, 11, 13]),
    (341_550_071_728_321, &[2, 3, 5, 7, 11, 13, 17]),
];

/// Witnesses covering every remaining `u64`.
const FULL_RANGE_WITNESSES: &[u64] = &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

#[inline]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// One Miller–Rabin round for odd `n` with `n - 1 = 2^s * d`, `d` odd.
///
/// Returns `false` when `a` proves `n` composite.
fn passes_witness(n: u64, s: u32, d: u64, a: u64) -> bool {
    let mut x = pow_mod(a, d, n);
    let mut y = x;
    for _ in 0..s {
        y = mul_mod(x, x, n);
        // A nontrivial square root of 1 exposes a composite.
        if y == 1 && x != 1 && x != n - 1 {
            return false;
        }
        x = y;
    }
    y == 1
}

/// Exact primality test for the whole `u64` range.
///
/// Even numbers other than 2, multiples of 3 other than 3 and everything
/// below 2 are rejected before any witness runs.
pub fn is_prime(n: u64) -> bool {
    if n < 2 || (n % 2 == 0 && n != 2) || (n % 3 == 0 && n != 3) {
        return false;
    }
    if n <= 3 {
        return true;
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    let witnesses = WITNESS_BRACKETS
        .iter()
        .find(|(bound, _)| n < *bound)
        .map(|(_, w)| *w)
        .unwrap_or(FULL_RANGE_WITNESSES);

    witnesses.iter().all(|&a| passes_witness(n, s, d, a))
}

/// Smallest prime strictly greater than `x`, or `None` if it does not fit
/// in a `u64`.
pub fn next_prime(x: u64) -> Option<u64> {
    (x.checked_add(1)?..=u64::MAX).find(|&n| is_prime(n))
}

/// Smallest prime greater than or equal to `x`.
pub(crate) fn prime_at_least(x: u64) -> Option<u64> {
    if is_prime(x) {
        Some(x)
    } else {
        next_prime(x)
    }
}
