//! Generator configuration.
//!
//! A configuration names the algorithm and, optionally, a fixed seed:
//!
//! ```toml
//! algorithm = "blum_blum_shub"
//! seed = 42
//! ```
//!
//! Without a seed the generator is seeded from the system clock.

use serde::{Deserialize, Serialize};

use crate::error::{RandomError, Result};
use crate::generator::{Algorithm, Generator};

/// Settings used to build a [`Generator`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Algorithm to run. Defaults to Multiply-with-Carry.
    pub algorithm: Algorithm,
    /// Fixed seed; `None` seeds from the system clock.
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    /// Returns [`RandomError::Config`] if the document is malformed or
    /// contains unknown keys.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| RandomError::Config(e.to_string()))
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    /// Returns [`RandomError::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| RandomError::Config(e.to_string()))
    }
}

impl Generator {
    /// Builds and initializes a generator from a configuration.
    ///
    /// # Errors
    /// Returns [`RandomError::InitializationFailure`] if seeding fails.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let mut generator = Generator::new(config.algorithm);
        match config.seed {
            Some(seed) => generator.init_with_seed(seed)?,
            None => generator.init()?,
        }
        Ok(generator)
    }
}
