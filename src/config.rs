//! Construction parameters for `ChainedHashSet`.

use core::fmt;

/// Bucket-array length used by `ChainedHashSet::new`.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Growth threshold used by `ChainedHashSet::new`.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Initial bucket count and load-factor threshold of a set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SetConfig {
    pub initial_capacity: usize,
    pub load_factor: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroCapacity,
    LoadFactorOutOfRange(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => f.write_str("initial capacity must be positive"),
            ConfigError::LoadFactorOutOfRange(lf) => {
                write!(f, "load factor {} is outside (0, 1]", lf)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for SetConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl SetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Rejects a zero capacity and any load factor outside `(0, 1]`,
    /// NaN included.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        // Written so that NaN fails the range test.
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(ConfigError::LoadFactorOutOfRange(self.load_factor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SetConfig::default();
        assert_eq!(cfg.initial_capacity, 16);
        assert_eq!(cfg.load_factor, 0.75);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let cfg = SetConfig::new().with_initial_capacity(0);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn load_factor_bounds() {
        for lf in [0.0, -0.5, 1.0001, f64::INFINITY] {
            match SetConfig::new().with_load_factor(lf).validate() {
                Err(ConfigError::LoadFactorOutOfRange(got)) => assert_eq!(got, lf),
                other => panic!("unexpected result for {}: {:?}", lf, other),
            }
        }
        assert!(matches!(
            SetConfig::new().with_load_factor(f64::NAN).validate(),
            Err(ConfigError::LoadFactorOutOfRange(_))
        ));
        assert!(SetConfig::new().with_load_factor(1.0).validate().is_ok());
        assert!(SetConfig::new().with_load_factor(0.01).validate().is_ok());
    }

    #[test]
    fn errors_display() {
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "initial capacity must be positive"
        );
        assert_eq!(
            ConfigError::LoadFactorOutOfRange(1.5).to_string(),
            "load factor 1.5 is outside (0, 1]"
        );
    }
}
