use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};
use crate::resolver::Resolver;
use crate::strategy::{MergeStrategy, TieBreak};

/// Resolver settings for one kind of record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub strategy: MergeStrategy,
    pub tie_break: TieBreak,
}

impl ResolverConfig {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            tie_break: TieBreak::default(),
        }
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.strategy).with_tie_break(self.tie_break)
    }
}

/// Which resolver each record type uses.
///
/// ```toml
/// [default]
/// strategy = "scalar-wins"
///
/// [record_types.tags]
/// strategy = "set-union"
/// tie_break = "content-digest"
/// ```
///
/// Record types without an entry use `default`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    pub default: ResolverConfig,
    pub record_types: BTreeMap<String, ResolverConfig>,
}

impl ResolutionConfig {
    pub fn from_toml_str(text: &str) -> MergeResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MergeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MergeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> MergeResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Register settings for a record type.
    pub fn with_record_type(mut self, record_type: impl Into<String>, config: ResolverConfig) -> Self {
        self.record_types.insert(record_type.into(), config);
        self
    }

    /// Settings for `record_type`, falling back to the default.
    pub fn config_for(&self, record_type: &str) -> ResolverConfig {
        self.record_types
            .get(record_type)
            .copied()
            .unwrap_or(self.default)
    }

    pub fn resolver_for(&self, record_type: &str) -> Resolver {
        self.config_for(record_type).resolver()
    }
}
