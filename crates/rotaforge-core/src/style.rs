//! Combat styles. Each style has its own ability catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RotaforgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStyle {
    Magic,
    Melee,
    Ranged,
}

impl CombatStyle {
    pub const ALL: [CombatStyle; 3] = [CombatStyle::Magic, CombatStyle::Melee, CombatStyle::Ranged];

    pub fn as_str(&self) -> &'static str {
        match self {
            CombatStyle::Magic => "magic",
            CombatStyle::Melee => "melee",
            CombatStyle::Ranged => "ranged",
        }
    }
}

impl fmt::Display for CombatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CombatStyle {
    type Err = RotaforgeError;

    /// Parses a style name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        CombatStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == lowered)
            .ok_or_else(|| {
                RotaforgeError::InvalidParameter(format!(
                    "style must be one of magic, melee, or ranged (got '{}')",
                    s.trim()
                ))
            })
    }
}
