//! Ability catalog fixtures.
//!
//! # Example
//!
//! ```
//! use rotaforge_test::catalog::single_basic;
//!
//! let catalog = single_basic(10);
//! assert_eq!(catalog.len(), 1);
//! ```

use rotaforge_core::{Ability, AbilityCatalog};

fn build(abilities: Vec<Ability>) -> AbilityCatalog {
    match AbilityCatalog::new(abilities) {
        Ok(catalog) => catalog,
        Err(err) => panic!("invalid fixture catalog: {err}"),
    }
}

/// One Basic ability usable every tick.
pub fn single_basic(damage: u32) -> AbilityCatalog {
    build(vec![Ability::basic("Slice", damage, 1, 0)])
}

/// One Threshold ability, "Smash".
pub fn threshold_only(damage: u32) -> AbilityCatalog {
    build(vec![Ability::threshold("Smash", damage, 1, 0)])
}

/// One Ultimate ability, "Overpower".
pub fn ultimate_only(damage: u32) -> AbilityCatalog {
    build(vec![Ability::ultimate("Overpower", damage, 1, 0)])
}

/// Two Basic abilities whose cooldowns compete for the same ticks.
///
/// "Heavy" hits for 50 with a 3 tick cooldown, "Light" for 30 with 2.
pub fn competing_pair() -> AbilityCatalog {
    build(vec![
        Ability::basic("Light", 30, 1, 2),
        Ability::basic("Heavy", 50, 1, 3),
    ])
}

/// A small catalog shaped like a melee style: two builders, two spenders and
/// one Ultimate.
pub fn melee_like() -> AbilityCatalog {
    build(vec![
        Ability::basic("Slice", 60, 3, 5),
        Ability::basic("Backhand", 50, 3, 25),
        Ability::threshold("Slaughter", 150, 3, 50),
        Ability::threshold("Assault", 210, 3, 50),
        Ability::ultimate("Overpower", 400, 3, 100),
    ])
}

#[cfg(test)]
mod tests {
    use rotaforge_core::Category;

    use super::*;

    #[test]
    fn test_melee_like_has_every_category() {
        let catalog = melee_like();
        for category in Category::ALL {
            assert!(catalog.has_category(category));
        }
    }

    #[test]
    fn test_competing_pair_order() {
        let catalog = competing_pair();
        assert_eq!(catalog.position("Heavy"), Some(1));
    }
}
