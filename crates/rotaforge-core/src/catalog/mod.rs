//! Ability catalog: the validated, read-only table of abilities for one solve.
//!
//! A catalog is loaded once per style and never mutated afterwards. Loading
//! rejects the whole source on the first malformed row.

mod record;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ability::{Ability, Category};
use crate::error::{Result, RotaforgeError};
use crate::style::CombatStyle;

pub use record::AbilityRecord;

/// A validated list of abilities with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityCatalog {
    abilities: Vec<Ability>,
}

impl AbilityCatalog {
    /// Builds a catalog from already-typed abilities.
    ///
    /// Rows are numbered from 1 in errors.
    pub fn new(abilities: Vec<Ability>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(abilities.len());
        for (idx, ability) in abilities.iter().enumerate() {
            let row = idx + 1;
            if ability.name().trim().is_empty() {
                return Err(RotaforgeError::Validation {
                    row,
                    reason: "ability name is empty".to_string(),
                });
            }
            if ability.duration() == 0 {
                return Err(RotaforgeError::Validation {
                    row,
                    reason: format!("'{}' has a non-positive duration", ability.name()),
                });
            }
            if !seen.insert(ability.name()) {
                return Err(RotaforgeError::Validation {
                    row,
                    reason: format!("duplicate ability name '{}'", ability.name()),
                });
            }
        }
        Ok(Self { abilities })
    }

    /// Builds a catalog from raw tabular records.
    pub fn from_records(records: impl IntoIterator<Item = AbilityRecord>) -> Result<Self> {
        let abilities = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| record.into_ability(idx + 1))
            .collect::<Result<Vec<_>>>()?;
        Self::new(abilities)
    }

    /// Reads CSV with the columns
    /// `Ability Name, Damage, Duration, Cooldown, Type`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();
        for (idx, row) in csv.deserialize::<AbilityRecord>().enumerate() {
            let record = row.map_err(|e| RotaforgeError::Validation {
                row: idx + 1,
                reason: e.to_string(),
            })?;
            records.push(record);
        }
        Self::from_records(records)
    }

    /// Loads a catalog from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_csv_reader(file)?;
        debug!(
            event = "catalog_loaded",
            path = %path.display(),
            abilities = catalog.len(),
        );
        Ok(catalog)
    }

    /// Loads the catalog for a combat style from `{data_dir}/{style}_data.csv`.
    pub fn load_style(data_dir: impl AsRef<Path>, style: CombatStyle) -> Result<Self> {
        Self::load(Self::style_path(data_dir, style))
    }

    /// Returns the file a style's catalog is read from.
    pub fn style_path(data_dir: impl AsRef<Path>, style: CombatStyle) -> PathBuf {
        data_dir
            .as_ref()
            .join(format!("{}_data.csv", style.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    #[inline]
    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn get(&self, index: usize) -> Option<&Ability> {
        self.abilities.get(index)
    }

    /// Returns the index of the ability with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.abilities.iter().position(|a| a.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.iter()
    }

    /// Indices of abilities in the given category.
    pub fn indices_of(&self, category: Category) -> impl Iterator<Item = usize> + '_ {
        self.abilities
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.category() == category)
            .map(|(i, _)| i)
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.abilities.iter().any(|a| a.category() == category)
    }

    /// Largest single-start damage, 0 for an empty catalog.
    pub fn max_damage(&self) -> u32 {
        self.abilities.iter().map(Ability::damage).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a AbilityCatalog {
    type Item = &'a Ability;
    type IntoIter = std::slice::Iter<'a, Ability>;

    fn into_iter(self) -> Self::IntoIter {
        self.abilities.iter()
    }
}
