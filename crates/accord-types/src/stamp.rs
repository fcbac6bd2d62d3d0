use std::fmt;

use serde::{Deserialize, Serialize};

/// Write timestamp attached to each sibling by the store.
///
/// Combines the wall-clock write time with a logical counter and the id of
/// the replica that accepted the write. Two stamps from different replicas
/// can still be equal when both components and the node id match, so the
/// merge engine treats equality as a tie, not as an error.
///
/// Ordering: `physical_ms` → `logical` → `node_id` (total order).
///
/// Deserializes from the full `{"physical_ms", "logical", "node_id"}` form,
/// where the last two may be omitted, or from a bare integer of milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StampRepr")]
pub struct WriteStamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub physical_ms: u64,
    /// Logical counter for writes within the same millisecond.
    pub logical: u32,
    /// Replica that accepted the write.
    pub node_id: u16,
}

impl WriteStamp {
    /// Create a stamp with explicit values.
    pub fn new(physical_ms: u64, logical: u32, node_id: u16) -> Self {
        Self {
            physical_ms,
            logical,
            node_id,
        }
    }

    /// A plain wall-clock stamp, as reported by stores that only track
    /// last-modified time.
    pub fn from_millis(physical_ms: u64) -> Self {
        Self::new(physical_ms, 0, 0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StampRepr {
    Millis(u64),
    Full {
        physical_ms: u64,
        #[serde(default)]
        logical: u32,
        #[serde(default)]
        node_id: u16,
    },
}

impl From<StampRepr> for WriteStamp {
    fn from(repr: StampRepr) -> Self {
        match repr {
            StampRepr::Millis(ms) => Self::from_millis(ms),
            StampRepr::Full {
                physical_ms,
                logical,
                node_id,
            } => Self::new(physical_ms, logical, node_id),
        }
    }
}

impl PartialOrd for WriteStamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WriteStamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.physical_ms
            .cmp(&other.physical_ms)
            .then(self.logical.cmp(&other.logical))
            .then(self.node_id.cmp(&other.node_id))
    }
}

impl fmt::Debug for WriteStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WriteStamp({}ms.{}.n{})",
            self.physical_ms, self.logical, self.node_id
        )
    }
}

impl fmt::Display for WriteStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.n{}", self.physical_ms, self.logical, self.node_id)
    }
}
