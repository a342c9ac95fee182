//! Bit mixing helpers shared by the seeding routines.
//!
//! Seeds coming from the clock have most of their entropy in the low bits,
//! so every strategy runs them through [`mix64`] before deriving state.

/// SplitMix64 finalizer: a bijective avalanche over 64-bit words.
///
/// # Parameters
/// - `value`: The word to scramble.
///
/// # Returns
/// The scrambled word. Distinct inputs always give distinct outputs.
pub(crate) fn mix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Folds a 64-bit word into 32 bits by XOR-ing its halves.
pub(crate) fn fold32(value: u64) -> u32 {
    ((value >> 32) ^ value) as u32
}

/// Greatest common divisor (binary algorithm).
pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }
    let shift = (a | b).trailing_zeros();
    a >>= a.trailing_zeros();
    loop {
        b >>= b.trailing_zeros();
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        b -= a;
        if b == 0 {
            return a << shift;
        }
    }
}

/// Computes `(a * b) mod m` without overflow.
pub(crate) fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}
