//! Raw catalog rows as they appear in the tabular source.

use serde::{Deserialize, Serialize};

use crate::ability::{Ability, Category};
use crate::error::{Result, RotaforgeError};

/// One unvalidated catalog row.
///
/// Numeric fields are signed so that negative input reaches validation
/// instead of failing as a parse error.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AbilityRecord {
    #[serde(rename = "Ability Name")]
    pub name: String,
    #[serde(rename = "Damage")]
    pub damage: f64,
    #[serde(rename = "Duration")]
    pub duration: i64,
    #[serde(rename = "Cooldown")]
    pub cooldown: i64,
    #[serde(rename = "Type")]
    pub category: String,
}

impl AbilityRecord {
    pub fn new(
        name: impl Into<String>,
        damage: f64,
        duration: i64,
        cooldown: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            damage,
            duration,
            cooldown,
            category: category.into(),
        }
    }

    /// Validates the row and converts it into an [`Ability`].
    pub fn into_ability(self, row: usize) -> Result<Ability> {
        let invalid = |reason: String| RotaforgeError::Validation { row, reason };

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(invalid("ability name is empty".to_string()));
        }
        if !self.damage.is_finite() || self.damage < 0.0 {
            return Err(invalid(format!(
                "'{}' has invalid damage {}",
                name, self.damage
            )));
        }
        if self.damage.fract() != 0.0 || self.damage > u32::MAX as f64 {
            return Err(invalid(format!(
                "'{}' damage {} is not a whole number in range",
                name, self.damage
            )));
        }
        if self.duration <= 0 || self.duration > u32::MAX as i64 {
            return Err(invalid(format!(
                "'{}' has non-positive duration {}",
                name, self.duration
            )));
        }
        if self.cooldown < 0 || self.cooldown > u32::MAX as i64 {
            return Err(invalid(format!(
                "'{}' has negative cooldown {}",
                name, self.cooldown
            )));
        }
        let category: Category = self
            .category
            .parse()
            .map_err(|e: crate::ability::UnknownCategory| invalid(format!("'{}': {}", name, e)))?;

        Ok(Ability::new(
            name,
            self.damage as u32,
            self.duration as u32,
            self.cooldown as u32,
            category,
        ))
    }
}
