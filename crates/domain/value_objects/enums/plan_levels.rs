use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Canonical subscription tier. Variant order is the tier order.
#[derive(
    Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
    #[default]
    Free,
    Start,
    Pro,
    Business,
    Enterprise,
    Premium,
}

impl PlanLevel {
    /// Every level, lowest first.
    pub const ALL: [PlanLevel; 6] = [
        PlanLevel::Free,
        PlanLevel::Start,
        PlanLevel::Pro,
        PlanLevel::Business,
        PlanLevel::Enterprise,
        PlanLevel::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanLevel::Free => "free",
            PlanLevel::Start => "start",
            PlanLevel::Pro => "pro",
            PlanLevel::Business => "business",
            PlanLevel::Enterprise => "enterprise",
            PlanLevel::Premium => "premium",
        }
    }

    /// Maps a catalog rank onto a level. Ranks past the top level saturate.
    pub fn from_rank(rank: i32) -> Self {
        let index = rank.clamp(0, (Self::ALL.len() - 1) as i32) as usize;
        Self::ALL[index]
    }

    /// The level directly below this one, `None` for the lowest.
    pub fn previous(&self) -> Option<Self> {
        let index = Self::ALL.iter().position(|level| level == self)?;
        index.checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl Display for PlanLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
