//! Transformer configuration.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// How literals of the `FLOAT_NUMBER` class are decoded.
///
/// The target language's numeric domain is not settled: the reference
/// behavior truncates fractional literals to integers, which is kept as the
/// default until that is confirmed one way or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatLiterals {
    /// `2.9` becomes the integer `2`.
    #[default]
    Truncate,
    /// `2.9` stays a float.
    Preserve,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformOptions {
    pub float_literals: FloatLiterals,
}

impl TransformOptions {
    /// Reads options from a YAML document; absent keys keep their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
