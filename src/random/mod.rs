//! Random number generation strategies.
//!
//! Each strategy owns its state and exposes a `seed` constructor plus a
//! `next_u32` draw. [`Generator`](crate::Generator) selects one of them.

pub mod blum_blum_shub;
pub mod multiply_with_carry;
pub mod seed_source;
pub mod unix;
