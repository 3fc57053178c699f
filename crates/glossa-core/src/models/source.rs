use serde::{Deserialize, Serialize};
use std::fmt;

/// A prediction source whose output the hybrid predictor fuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The character-level context model.
    Character,
    /// The segment discoverer's vocabulary.
    Segment,
}

impl Source {
    /// Number of sources; sizes per-source tables.
    pub const COUNT: usize = 2;

    /// Every source, in index order.
    pub const ALL: [Source; Self::COUNT] = [Source::Character, Source::Segment];

    /// Dense index for per-source arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Character => 0,
            Self::Segment => 1,
        }
    }

    /// The other source.
    pub fn other(self) -> Self {
        match self {
            Self::Character => Self::Segment,
            Self::Segment => Self::Character,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => f.write_str("character"),
            Self::Segment => f.write_str("segment"),
        }
    }
}
