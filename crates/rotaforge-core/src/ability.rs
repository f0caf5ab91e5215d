//! Ability definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resource-transition class of an ability.
///
/// The category alone selects which meter rule applies when the ability
/// starts; the rule parameters live in [`ResourceModel`](crate::ResourceModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Category {
    /// Always usable; builds the meter.
    Basic,
    /// Usable above a minimum level; spends the meter.
    Threshold,
    /// Usable at a required level; resets the meter and may open a buff window.
    Ultimate,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Basic, Category::Threshold, Category::Ultimate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Basic => "Basic",
            Category::Threshold => "Threshold",
            Category::Ultimate => "Ultimate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown category '{}' (expected Basic, Threshold or Ultimate)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

/// A combat action that can be started on a tick.
///
/// Abilities are immutable once built. Use [`AbilityCatalog`](crate::AbilityCatalog)
/// to validate a set of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ability {
    name: String,
    damage: u32,
    duration: u32,
    cooldown: u32,
    category: Category,
}

impl Ability {
    /// Creates an ability. `duration` is the number of ticks the actor is
    /// occupied, including the start tick.
    pub fn new(
        name: impl Into<String>,
        damage: u32,
        duration: u32,
        cooldown: u32,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            damage,
            duration,
            cooldown,
            category,
        }
    }

    pub fn basic(name: impl Into<String>, damage: u32, duration: u32, cooldown: u32) -> Self {
        Self::new(name, damage, duration, cooldown, Category::Basic)
    }

    pub fn threshold(name: impl Into<String>, damage: u32, duration: u32, cooldown: u32) -> Self {
        Self::new(name, damage, duration, cooldown, Category::Threshold)
    }

    pub fn ultimate(name: impl Into<String>, damage: u32, duration: u32, cooldown: u32) -> Self {
        Self::new(name, damage, duration, cooldown, Category::Ultimate)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn damage(&self) -> u32 {
        self.damage
    }

    #[inline]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[inline]
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} dmg, {}t busy, {}t cd)",
            self.name, self.category, self.damage, self.duration, self.cooldown
        )
    }
}
