//! Twin prime search backed by a randomized modular-exponentiation
//! primality test.
//!
//! Table sizes that are the larger member of a twin prime pair give both
//! hash functions a prime modulus, which keeps probe sequences from
//! degenerating. The test is probabilistic: a composite can slip through
//! with probability shrinking in the number of rounds, a prime is never
//! rejected.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Searches numeric ranges for twin primes.
///
/// Each candidate is checked with a configurable number of independent
/// witness trials. The random source is part of the finder so tests can
/// inject a seeded generator and get reproducible scans.
#[derive(Debug, Clone)]
pub struct TwinPrimeFinder<R = StdRng> {
    /// Independent witness trials run per candidate.
    rounds: u32,
    /// Source of witness bases.
    rng: R,
}

impl TwinPrimeFinder<StdRng> {
    /// Creates a finder seeded from the operating system.
    #[must_use]
    pub fn new(rounds: u32) -> Self {
        Self::with_rng(rounds, StdRng::from_os_rng())
    }
}

impl<R: Rng> TwinPrimeFinder<R> {
    /// Creates a finder with an injected random source.
    pub fn with_rng(rounds: u32, rng: R) -> Self {
        Self { rounds, rng }
    }

    /// Returns the configured number of witness trials per candidate.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Reconfigures the number of witness trials per candidate.
    pub fn set_rounds(&mut self, rounds: u32) {
        self.rounds = rounds;
    }

    /// Reports whether `n` is probably prime.
    ///
    /// Rejects 0 and 1, accepts 2 and rejects every other even number.
    /// For odd `n > 2` it runs [`rounds`](Self::rounds) trials, each
    /// raising a random base `a` with `2 <= a < n` to the power `n - 1`
    /// modulo `n`. Any trial that does not end congruent to 1 proves `n`
    /// composite. The answer is approximate, not definitive: see the
    /// module docs.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn is_probably_prime(&mut self, n: u64) -> bool {
        if n == 0 || n == 1 {
            return false;
        }
        if n == 2 {
            return true;
        }
        if n % 2 == 0 {
            return false;
        }
        let exponent = n - 1;
        for _ in 0..self.rounds {
            let base = self.rng.random_range(0..n).max(2);
            if mod_pow(base, exponent, n) != 1 {
                return false;
            }
        }
        true
    }

    /// Returns the larger member of the first twin prime pair in range.
    ///
    /// Bumps an even `from` to the next odd number, then scans odd
    /// candidates upward while they stay at or below `to`. The first
    /// probable prime has `candidate + 2` tested immediately; when that
    /// also passes, `candidate + 2` is the result (it may lie just past
    /// `to`, since only the lower member is bounded by the range).
    /// `None` means the scan exhausted the range without finding a pair.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn find_larger_twin_prime(&mut self, from: u64, to: u64) -> Option<u64> {
        let mut candidate = from;
        if candidate % 2 == 0 {
            candidate += 1;
        }
        while candidate <= to {
            if self.is_probably_prime(candidate) {
                let upper = candidate + 2;
                if self.is_probably_prime(upper) {
                    return Some(upper);
                }
                candidate = upper;
            } else {
                candidate += 2;
            }
        }
        None
    }
}

/// Computes `base ^ exponent mod modulus` by square-and-multiply.
///
/// Walks the exponent's bits from the most significant down, skipping the
/// implicit leading 1: square each step, multiply in the base on set bits.
#[allow(clippy::arithmetic_side_effects)]
fn mod_pow(base: u64, exponent: u64, modulus: u64) -> u64 {
    let mut acc = base % modulus;
    if exponent == 0 {
        return 1 % modulus;
    }
    let top_bit = 63 - exponent.leading_zeros();
    for bit in (0..top_bit).rev() {
        acc = mul_mod(acc, acc, modulus);
        if (exponent >> bit) & 1 == 1 {
            acc = mul_mod(acc, base, modulus);
        }
    }
    acc
}

/// Multiplies `a * b mod modulus` without overflow.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn mul_mod(a: u64, b: u64, modulus: u64) -> u64 {
    // The 128-bit intermediate keeps the product exact; the result is
    // below `modulus`, so the narrowing cast is lossless.
    ((u128::from(a) * u128::from(b)) % u128::from(modulus)) as u64
}
