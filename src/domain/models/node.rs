use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a passive tree node.
pub type NodeId = u32;

/// Classification of a passive tree node.
///
/// The classification drives move prioritization: candidate moves that
/// allocate more valuable nodes are evaluated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Pathing node with no meaningful stats of its own.
    Travel,
    /// Minor stat node.
    Small,
    /// Major named node.
    Notable,
    /// Build-defining node with large trade-offs.
    Keystone,
}

impl NodeKind {
    /// Prioritization score used when ordering candidate moves.
    ///
    /// | Kind     | Score |
    /// |----------|-------|
    /// | Notable  | 3     |
    /// | Keystone | 2     |
    /// | Small    | 1     |
    /// | Travel   | 0     |
    pub const fn value_score(self) -> u8 {
        match self {
            Self::Notable => 3,
            Self::Keystone => 2,
            Self::Small => 1,
            Self::Travel => 0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Small => "small",
            Self::Notable => "notable",
            Self::Keystone => "keystone",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "travel" => Ok(Self::Travel),
            "small" => Ok(Self::Small),
            "notable" => Ok(Self::Notable),
            "keystone" => Ok(Self::Keystone),
            other => Err(format!(
                "Invalid node kind: {other}. Must be one of: travel, small, notable, keystone"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_scores() {
        assert_eq!(NodeKind::Notable.value_score(), 3);
        assert_eq!(NodeKind::Keystone.value_score(), 2);
        assert_eq!(NodeKind::Small.value_score(), 1);
        assert_eq!(NodeKind::Travel.value_score(), 0);
    }

    #[test]
    fn test_notable_outranks_keystone() {
        assert!(NodeKind::Notable.value_score() > NodeKind::Keystone.value_score());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Notable".parse::<NodeKind>().unwrap(), NodeKind::Notable);
        assert_eq!("travel".parse::<NodeKind>().unwrap(), NodeKind::Travel);
        assert!("mastery".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&NodeKind::Keystone).unwrap();
        assert_eq!(json, "\"keystone\"");
        let kind: NodeKind = serde_json::from_str("\"small\"").unwrap();
        assert_eq!(kind, NodeKind::Small);
    }
}
