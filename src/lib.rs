//! trirand: pseudo-random numbers from three interchangeable algorithms.
//!
//! A [`Generator`] is built with an [`Algorithm`] and then seeded, either
//! from the system clock or from an explicit seed. All three algorithms share
//! the same draw interface.
//!
//! # Architecture
//!
//! ```text
//! Generator        (dispatcher — owns exactly one Strategy)
//!     ├── MultiplyWithCarry  (lag-4096 table + carry, seeded via PrimeSource)
//!     ├── BlumBlumShub       (x² mod p·q, Blum primes from PrimeSource)
//!     └── UnixRand           (glibc random()-style additive feedback, 31 bits)
//! SeedSource       (system clock, or a fixed seed)
//! PrimeSource      (sieve + Miller-Rabin)
//! ```
//!
//! None of the algorithms is suitable for cryptographic use.
//!
//! # Examples
//!
//! Reproducible draws from a fixed seed:
//!
//! ```
//! use trirand::{Algorithm, Generator};
//!
//! let mut a = Generator::new(Algorithm::MultiplyWithCarry);
//! let mut b = Generator::new(Algorithm::MultiplyWithCarry);
//! a.init_with_seed(7).unwrap();
//! b.init_with_seed(7).unwrap();
//!
//! for _ in 0..10 {
//!     assert_eq!(a.random(), b.random());
//! }
//! ```
//!
//! Bounded draws reject inverted ranges:
//!
//! ```
//! use trirand::{Algorithm, Generator, RandomError};
//!
//! let mut rng = Generator::new(Algorithm::Unix);
//! rng.init().unwrap();
//!
//! let digit = rng.random_range(0, 9).unwrap();
//! assert!(digit <= 9);
//! assert_eq!(
//!     rng.random_range(5, 1),
//!     Err(RandomError::InvalidRange { min: 5, max: 1 })
//! );
//! ```

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod random;
pub mod utils;

mod generator;

pub use config::GeneratorConfig;
pub use error::{RandomError, Result};
pub use generator::{Algorithm, Generator, Strategy, FALLBACK_SEED};
