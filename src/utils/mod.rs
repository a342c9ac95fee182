//! Numeric helpers consumed by the seeding routines.

pub(crate) mod bits;
pub mod prime;
