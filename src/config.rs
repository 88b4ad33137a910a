//! Validator configuration
//!
//! Plain data, deserializable so hosts can embed it in their own
//! configuration files. The crate itself never reads files or the
//! environment.

use serde::{Deserialize, Serialize};

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Maximum nesting depth followed through `struct` fields (default: 32)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    32
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl ValidatorConfig {
    /// Create a config with the given nesting limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }
}
