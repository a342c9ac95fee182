//! Blum Blum Shub quadratic residue generator.
//!
//! The state advances as `x = x² mod M`, where `M = p·q` and both primes are
//! congruent to 3 mod 4. Each draw returns the low 32 bits of the new
//! residue. Not suitable for cryptographic use at these modulus sizes.

use crate::error::{RandomError, Result};
use crate::utils::bits::{gcd, mix64, mul_mod};
use crate::utils::prime::PrimeSource;

/// Lower bound for both primes of the modulus.
pub const PRIME_FLOOR: u64 = 1 << 31;

/// Width of the window above [`PRIME_FLOOR`] the seed selects primes from.
/// Keeps `p·q` below `2^63`.
const PRIME_WINDOW_MASK: u64 = (1 << 29) - 1;

/// The two smallest Blum primes at or above [`PRIME_FLOOR`], used when no
/// prime source is available.
const FALLBACK_P: u64 = 2_147_483_659;
const FALLBACK_Q: u64 = 2_147_483_743;

/// Blum Blum Shub generator.
///
/// # Invariants
/// - `modulus` is the product of two distinct primes congruent to 3 mod 4.
/// - `current` is coprime to `modulus` and never 0 or 1. Squaring permutes
///   the quadratic residues of a Blum integer, so a residue other than 1 can
///   never square to 1.
pub struct BlumBlumShub {
    current: u64,
    modulus: u64,
}

impl BlumBlumShub {
    /// Seeds a new generator, drawing both primes from `primes`.
    ///
    /// The two primes are picked at seed-dependent offsets above
    /// [`PRIME_FLOOR`]; if they collide, the second moves to the next Blum
    /// prime.
    ///
    /// # Errors
    /// Returns [`RandomError::InitializationFailure`] if the prime source
    /// fails or returns primes that violate the modulus preconditions.
    pub fn seed(seed: u64, primes: &dyn PrimeSource) -> Result<Self> {
        let mixed = mix64(seed);
        let p = primes.blum_prime(PRIME_FLOOR + (mixed & PRIME_WINDOW_MASK))?;
        let mut q = primes.blum_prime(PRIME_FLOOR + ((mixed >> 32) & PRIME_WINDOW_MASK))?;
        if q == p {
            q = primes.blum_prime(p + 1)?;
        }
        Self::from_primes(p, q, mix64(mixed))
    }

    /// Seeds over the fixed modulus `FALLBACK_P * FALLBACK_Q`, without a
    /// prime source.
    pub(crate) fn fallback(seed: u64) -> Self {
        Self::with_modulus(FALLBACK_P * FALLBACK_Q, mix64(mix64(seed)))
    }

    /// Builds a generator from two primes and a start value.
    ///
    /// Checks that each prime is congruent to 3 mod 4, that they differ and
    /// that their product fits in 64 bits. Primality is not re-checked.
    ///
    /// The start value is reduced modulo `p·q` and stepped forward until it
    /// is coprime to the modulus and its square is neither 0 nor 1; that
    /// square becomes the initial state.
    ///
    /// # Errors
    /// Returns [`RandomError::InitializationFailure`] on a precondition
    /// violation.
    pub fn from_primes(p: u64, q: u64, start: u64) -> Result<Self> {
        if p % 4 != 3 || q % 4 != 3 {
            return Err(RandomError::InitializationFailure(format!(
                "primes {} and {} must both be congruent to 3 mod 4",
                p, q
            )));
        }
        if p == q {
            return Err(RandomError::InitializationFailure(format!(
                "modulus primes must differ, got {} twice",
                p
            )));
        }
        let modulus = p.checked_mul(q).ok_or_else(|| {
            RandomError::InitializationFailure(format!("modulus {} * {} overflows", p, q))
        })?;

        Ok(Self::with_modulus(modulus, start))
    }

    fn with_modulus(modulus: u64, start: u64) -> Self {
        let mut x = start % modulus;
        let current = loop {
            if x > 1 && gcd(x, modulus) == 1 {
                let squared = mul_mod(x, x, modulus);
                if squared > 1 {
                    break squared;
                }
            }
            x = (x + 1) % modulus;
        };

        BlumBlumShub { current, modulus }
    }

    /// Advances the state and returns its low 32 bits.
    pub fn next_u32(&mut self) -> u32 {
        self.current = mul_mod(self.current, self.current, self.modulus);
        self.current as u32
    }

    /// Current residue.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// The modulus `p·q`.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}
