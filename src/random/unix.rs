//! Unix `random()` style additive feedback generator.
//!
//! Reproduces the default glibc generator (`TYPE_3`): a 31-word table seeded
//! by the Park-Miller recurrence `r[i] = 16807 * r[i-1] mod (2^31 - 1)`,
//! advanced by `r[i] = r[i-3] + r[i-31]` with the first 310 outputs
//! discarded. Each draw returns the new word shifted right by one, so the
//! weak lowest bit of the sum is never exposed. The table is owned by the
//! generator rather than shared process-wide.

/// Largest value the generator returns.
pub const RAND_MAX: u32 = 0x7FFF_FFFF;

/// Number of words in the feedback table.
const DEGREE: usize = 31;

/// Distance between the front and rear taps.
const SEPARATION: usize = 3;

/// Outputs dropped after seeding.
const DISCARD: usize = 10 * DEGREE;

/// Owned glibc-compatible `random()` generator.
#[derive(Debug, Clone)]
pub struct UnixRand {
    table: [u32; DEGREE],
    front: usize,
    rear: usize,
}

impl UnixRand {
    /// Seeds the generator the way `srand` does: the seed is truncated to
    /// 32 bits and a zero seed is treated as 1.
    pub fn seed(seed: u64) -> Self {
        let seed = match seed as u32 {
            0 => 1,
            s => s,
        };

        let mut table = [0u32; DEGREE];
        table[0] = seed;
        let mut word = seed as i32 as i64;
        for slot in table.iter_mut().skip(1) {
            // Schrage's method for 16807 * word mod (2^31 - 1).
            let hi = word / 127_773;
            let lo = word % 127_773;
            word = 16_807 * lo - 2_836 * hi;
            if word < 0 {
                word += 2_147_483_647;
            }
            *slot = word as u32;
        }

        let mut rng = UnixRand {
            table,
            front: SEPARATION,
            rear: 0,
        };
        for _ in 0..DISCARD {
            rng.next_u32();
        }
        rng
    }

    /// Generates the next value in `[0, RAND_MAX]`.
    pub fn next_u32(&mut self) -> u32 {
        let sum = self.table[self.front].wrapping_add(self.table[self.rear]);
        self.table[self.front] = sum;
        self.front = (self.front + 1) % DEGREE;
        self.rear = (self.rear + 1) % DEGREE;
        sum >> 1
    }
}
