//! Lag-4096 Multiply-with-Carry generator.
//!
//! Each draw takes the next lag-table word `x` in rotation and computes
//! `t = x * MULTIPLIER + carry` in 64 bits. The high half of `t` becomes the
//! new carry and the low half (`t mod 2^32`) is written back to the table and
//! returned.
//!
//! The multiplier 18782 is borrowed from Marsaglia's complementary lag-4096
//! generator, which works in base `2^32 - 1`. This plain base-`2^32` variant
//! does not inherit that generator's period bound.

use crate::error::{RandomError, Result};
use crate::utils::bits::{fold32, mix64};
use crate::utils::prime::PrimeSource;

/// Number of words in the lag table.
pub const LAG: usize = 4096;

/// Fixed multiplier `a` of the recurrence, in base `2^32`.
pub const MULTIPLIER: u64 = 18782;

/// Odd multiplier spreading each column's prime over the full 64-bit word.
const COLUMN_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Multiply-with-Carry generator over a 4096-word lag table.
///
/// The carry always stays below [`MULTIPLIER`]: with `x < 2^32` and
/// `carry < a`, `x * a + carry < a * 2^32`, so the high half is `< a`.
pub struct MultiplyWithCarry {
    table: Box<[u32; LAG]>,
    carry: u32,
    index: usize,
    cycles: u64,
}

impl MultiplyWithCarry {
    /// Seeds a new generator.
    ///
    /// Every column `i` is derived from the mixed seed combined with the
    /// `i`-th prime, so no two columns start from correlated values. A column
    /// that mixes down to zero takes its prime instead, keeping every word
    /// nonzero.
    ///
    /// # Parameters
    /// - `seed`: Seed value (usually from the system clock).
    /// - `primes`: Source of the per-column primes.
    ///
    /// # Errors
    /// Returns [`RandomError::InitializationFailure`] if the prime source
    /// cannot supply [`LAG`] primes.
    pub fn seed(seed: u64, primes: &dyn PrimeSource) -> Result<Self> {
        let column_primes = primes.primes(LAG)?;
        if column_primes.len() != LAG {
            return Err(RandomError::InitializationFailure(format!(
                "expected {} primes for the lag table, got {}",
                LAG,
                column_primes.len()
            )));
        }

        Ok(Self::from_columns(seed, column_primes.into_iter()))
    }

    /// Seeds without a prime source. Column `i` takes the odd offset
    /// `2i + 3` where [`MultiplyWithCarry::seed`] uses the `i`-th prime.
    pub(crate) fn fallback(seed: u64) -> Self {
        Self::from_columns(seed, (0..LAG as u64).map(|i| 2 * i + 3))
    }

    fn from_columns(seed: u64, columns: impl Iterator<Item = u64>) -> Self {
        let base = mix64(seed);
        let mut table = Box::new([0u32; LAG]);
        for (word, column) in table.iter_mut().zip(columns) {
            let mixed = fold32(mix64(base ^ column.wrapping_mul(COLUMN_STRIDE)));
            *word = if mixed == 0 { column as u32 } else { mixed };
        }
        let carry = (mix64(base.rotate_left(32)) % MULTIPLIER) as u32;

        Self::from_boxed(table, carry)
    }

    /// Builds a generator from an explicit lag table and carry.
    ///
    /// The first draw uses `table[0]`. A carry at or above [`MULTIPLIER`] is
    /// reduced modulo the multiplier.
    pub fn from_table(table: [u32; LAG], carry: u32) -> Self {
        Self::from_boxed(Box::new(table), (carry as u64 % MULTIPLIER) as u32)
    }

    fn from_boxed(table: Box<[u32; LAG]>, carry: u32) -> Self {
        MultiplyWithCarry {
            table,
            carry,
            index: 0,
            cycles: 0,
        }
    }

    /// Generates the next 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        let i = self.index;
        let t = self.table[i] as u64 * MULTIPLIER + self.carry as u64;
        self.carry = (t >> 32) as u32;
        self.table[i] = t as u32;

        self.index = (i + 1) % LAG;
        if self.index == 0 {
            self.cycles += 1;
        }
        self.table[i]
    }

    /// Position of the table word the next draw will use.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of complete passes over the lag table.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Current carry.
    pub fn carry(&self) -> u32 {
        self.carry
    }

    /// Read-only view of the lag table.
    pub fn table(&self) -> &[u32; LAG] {
        &self.table
    }
}
