//! Engine configuration.
//!
//! The adaptive routines (sort selection, GEMM backend) read their
//! thresholds from an [`EngineConfig`]. Every routine has a `*_with` form
//! that takes the configuration explicitly; the plain form uses
//! [`EngineConfig::default`].
//!
//! # Environment Variables
//!
//! [`EngineConfig::from_env`] reads:
//! - `NDVIEWS_GEMM_BACKEND`: `naive` (default) or `faer`
//! - `NDVIEWS_COUNTING_SORT_MAX_WIDTH`: positive integer (default 10000)

use std::str::FromStr;

use crate::error::{ArrayError, Result};

/// Environment variable selecting the dense GEMM backend.
pub const ENV_GEMM_BACKEND: &str = "NDVIEWS_GEMM_BACKEND";

/// Environment variable overriding the counting-sort width threshold.
pub const ENV_COUNTING_SORT_MAX_WIDTH: &str = "NDVIEWS_COUNTING_SORT_MAX_WIDTH";

/// Default upper bound (exclusive) on `max - min + 1` for counting sort.
pub const DEFAULT_COUNTING_SORT_MAX_WIDTH: usize = 10_000;

/// Default run length below which merge and quick sort switch to insertion sort.
pub const DEFAULT_INSERTION_SORT_CUTOFF: usize = 7;

/// Backend for the dense x dense multiplication kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GemmBackend {
    /// Triple-nested accumulation in index order.
    #[default]
    Naive,
    /// Delegate contiguous `f64`/`c64` products to faer.
    Faer,
}

impl FromStr for GemmBackend {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(GemmBackend::Naive),
            "faer" => Ok(GemmBackend::Faer),
            other => Err(ArrayError::InvalidConfig {
                message: format!("unknown GEMM backend '{other}'"),
            }),
        }
    }
}

/// Tunables for the adaptive algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Counting sort is considered only when the value width is below this.
    pub counting_sort_max_width: usize,
    /// Runs shorter than this are insertion-sorted.
    pub insertion_sort_cutoff: usize,
    /// Dense x dense multiplication backend.
    pub gemm_backend: GemmBackend,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            counting_sort_max_width: DEFAULT_COUNTING_SORT_MAX_WIDTH,
            insertion_sort_cutoff: DEFAULT_INSERTION_SORT_CUTOFF,
            gemm_backend: GemmBackend::Naive,
        }
    }
}

impl EngineConfig {
    /// Build a configuration from defaults overridden by environment variables.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`] with a caller-supplied variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_GEMM_BACKEND) {
            config.gemm_backend = value.parse()?;
        }
        if let Some(value) = lookup(ENV_COUNTING_SORT_MAX_WIDTH) {
            config.counting_sort_max_width =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ArrayError::InvalidConfig {
                        message: format!("{ENV_COUNTING_SORT_MAX_WIDTH} must be an integer, got '{value}'"),
                    })?;
        }
        config.validate()?;
        tracing::debug!(?config, "engine configuration loaded");
        Ok(config)
    }

    /// Set the counting-sort width threshold.
    pub fn with_counting_sort_max_width(mut self, width: usize) -> Self {
        self.counting_sort_max_width = width;
        self
    }

    /// Set the insertion-sort cutoff.
    pub fn with_insertion_sort_cutoff(mut self, cutoff: usize) -> Self {
        self.insertion_sort_cutoff = cutoff;
        self
    }

    /// Set the dense GEMM backend.
    pub fn with_gemm_backend(mut self, backend: GemmBackend) -> Self {
        self.gemm_backend = backend;
        self
    }

    /// Check that all tunables are usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero counting-sort width or insertion cutoff.
    pub fn validate(&self) -> Result<()> {
        if self.counting_sort_max_width == 0 {
            return Err(ArrayError::InvalidConfig {
                message: "counting_sort_max_width must be positive".to_string(),
            });
        }
        if self.insertion_sort_cutoff == 0 {
            return Err(ArrayError::InvalidConfig {
                message: "insertion_sort_cutoff must be positive".to_string(),
            });
        }
        Ok(())
    }
}
