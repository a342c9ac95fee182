//! Seed sources for generator initialization.
//!
//! Defines the interface the generators use to obtain their initial seed.
//! The production source reads the wall clock; tests pin a fixed value so
//! sequences are reproducible.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{RandomError, Result};

/// Trait for seed providers consumed once per strategy initialization.
///
/// A seed source is never consulted on the per-draw path.
pub trait SeedSource {
    /// Returns a seed value, or an error if none can be produced.
    fn seed(&mut self) -> Result<u64>;
}

/// Seed source backed by the system wall clock.
///
/// The seed is the number of nanoseconds since the Unix epoch, truncated
/// to 64 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SeedSource for SystemClock {
    fn seed(&mut self) -> Result<u64> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .map_err(|e| {
                RandomError::InitializationFailure(format!("system clock before epoch: {}", e))
            })
    }
}

/// Seed source that always yields the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeed(pub u64);

impl SeedSource for FixedSeed {
    fn seed(&mut self) -> Result<u64> {
        Ok(self.0)
    }
}
