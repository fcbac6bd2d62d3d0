use std::fmt;

use serde::{Deserialize, Serialize};

/// How two sibling values for the same field are combined.
///
/// Mappings are always merged key by key under either strategy. The
/// strategies differ only in how sequences are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Every non-mapping field, sequences included, takes the newer
    /// sibling's value.
    #[default]
    ScalarWins,
    /// Sequences present in both siblings are replaced by their
    /// deduplicated union. Element order and duplicate counts are lost, so
    /// only use this for fields holding sets of scalars.
    SetUnion,
}

impl MergeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScalarWins => "scalar-wins",
            Self::SetUnion => "set-union",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order applied to siblings whose timestamps compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Keep the order the store returned the siblings in. The result can
    /// then differ between two reads of the same sibling set.
    #[default]
    Arrival,
    /// Order tied siblings by [`DocumentDigest`](accord_types::DocumentDigest),
    /// so the result depends only on the siblings' content.
    ContentDigest,
}

impl TieBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arrival => "arrival",
            Self::ContentDigest => "content-digest",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_plain_json_resolver() {
        assert_eq!(MergeStrategy::default(), MergeStrategy::ScalarWins);
        assert_eq!(TieBreak::default(), TieBreak::Arrival);
    }

    #[test]
    fn serde_names_are_kebab_case() {
        assert_eq!(serde_json::to_string(&MergeStrategy::SetUnion).unwrap(), "\"set-union\"");
        assert_eq!(serde_json::to_string(&TieBreak::ContentDigest).unwrap(), "\"content-digest\"");
        let parsed: MergeStrategy = serde_json::from_str("\"scalar-wins\"").unwrap();
        assert_eq!(parsed, MergeStrategy::ScalarWins);
    }

    #[test]
    fn display_matches_serde_name() {
        assert_eq!(MergeStrategy::SetUnion.to_string(), "set-union");
        assert_eq!(TieBreak::Arrival.to_string(), "arrival");
    }
}
