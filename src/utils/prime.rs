//! Prime number source used while seeding the generators.
//!
//! Multiply-with-Carry takes one prime per lag-table column to diversify
//! the columns, and Blum Blum Shub takes two Blum primes (`p ≡ 3 mod 4`)
//! to build its modulus. Both are consumed once, at initialization.

use crate::error::{RandomError, Result};
use crate::utils::bits::mul_mod;

/// Witness bases that make Miller-Rabin deterministic for every `u64`.
const MR_BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Supplies primes to the seeding routines.
///
/// Implementations are trusted: callers check cheap structural properties
/// (congruence, distinctness) but never re-run a primality test.
pub trait PrimeSource {
    /// Returns the first `count` primes in increasing order.
    fn primes(&self, count: usize) -> Result<Vec<u64>>;

    /// Returns the smallest prime `p >= at_least` with `p % 4 == 3`.
    fn blum_prime(&self, at_least: u64) -> Result<u64>;
}

/// Default [`PrimeSource`]: a sieve of Eratosthenes for small prime lists
/// and deterministic Miller-Rabin for the large Blum primes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimeSieve;

impl PrimeSieve {
    /// Creates the default prime source.
    pub fn new() -> Self {
        PrimeSieve
    }
}

impl PrimeSource for PrimeSieve {
    fn primes(&self, count: usize) -> Result<Vec<u64>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let limit = sieve_limit(count);
        let mut composite = vec![false; limit + 1];
        let mut out = Vec::with_capacity(count);
        for n in 2..=limit {
            if composite[n] {
                continue;
            }
            out.push(n as u64);
            if out.len() == count {
                return Ok(out);
            }
            let mut multiple = n.saturating_mul(n);
            while multiple <= limit {
                composite[multiple] = true;
                multiple += n;
            }
        }
        Err(RandomError::InitializationFailure(format!(
            "sieve up to {} produced only {} of {} primes",
            limit,
            out.len(),
            count
        )))
    }

    fn blum_prime(&self, at_least: u64) -> Result<u64> {
        let overflow = || {
            RandomError::InitializationFailure(format!(
                "no prime congruent to 3 mod 4 at or above {}",
                at_least
            ))
        };
        // First candidate >= at_least with candidate % 4 == 3.
        let mut candidate = at_least
            .checked_add((3 + 4 - at_least % 4) % 4)
            .ok_or_else(overflow)?;
        loop {
            if is_prime(candidate) {
                return Ok(candidate);
            }
            candidate = candidate.checked_add(4).ok_or_else(overflow)?;
        }
    }
}

/// Upper bound for the `count`-th prime (Rosser's theorem).
fn sieve_limit(count: usize) -> usize {
    if count < 6 {
        return 15;
    }
    let n = count as f64;
    (n * (n.ln() + n.ln().ln())).ceil() as usize
}

/// Deterministic primality test for any `u64`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in MR_BASES.iter() {
        if n.is_multiple_of(p) {
            return n == p;
        }
    }
    let mut d = n - 1;
    let mut s = 0;
    while d.is_multiple_of(2) {
        d /= 2;
        s += 1;
    }
    'witness: for &a in MR_BASES.iter() {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1u64;
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
