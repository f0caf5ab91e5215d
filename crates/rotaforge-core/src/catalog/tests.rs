//! Tests for catalog loading and validation.

use super::*;
use std::io::Write;

const MELEE_CSV: &str = "\
Ability Name,Damage,Duration,Cooldown,Type
Slice,60,3,5,Basic
Assault,210,7,50,Threshold
Overpower,400,3,100,Ultimate
";

fn validation_row(err: RotaforgeError) -> usize {
    match err {
        RotaforgeError::Validation { row, .. } => row,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_from_csv_reader() {
    let catalog = AbilityCatalog::from_csv_reader(MELEE_CSV.as_bytes()).unwrap();

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.abilities()[0], Ability::basic("Slice", 60, 3, 5));
    assert_eq!(catalog.abilities()[2].category(), Category::Ultimate);
    assert_eq!(catalog.position("Assault"), Some(1));
    assert_eq!(catalog.max_damage(), 400);
}

#[test]
fn test_trims_whitespace() {
    let csv = "Ability Name , Damage, Duration, Cooldown, Type\n Slice , 60, 3, 5, basic\n";
    let catalog = AbilityCatalog::from_csv_reader(csv.as_bytes()).unwrap();

    assert_eq!(catalog.abilities()[0].name(), "Slice");
    assert_eq!(catalog.abilities()[0].category(), Category::Basic);
}

#[test]
fn test_rejects_negative_damage() {
    let csv = "Ability Name,Damage,Duration,Cooldown,Type\nA,10,1,0,Basic\nB,-5,1,0,Basic\n";
    let err = AbilityCatalog::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert_eq!(validation_row(err), 2);
}

#[test]
fn test_rejects_fractional_damage() {
    let csv = "Ability Name,Damage,Duration,Cooldown,Type\nA,10.5,1,0,Basic\n";
    let err = AbilityCatalog::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert_eq!(validation_row(err), 1);
}

#[test]
fn test_rejects_zero_duration() {
    let csv = "Ability Name,Damage,Duration,Cooldown,Type\nA,10,0,0,Basic\n";
    let err = AbilityCatalog::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert_eq!(validation_row(err), 1);
}

#[test]
fn test_rejects_negative_cooldown() {
    let csv = "Ability Name,Damage,Duration,Cooldown,Type\nA,10,1,-1,Basic\n";
    let err = AbilityCatalog::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert_eq!(validation_row(err), 1);
}

#[test]
fn test_rejects_unknown_category() {
    let csv = "Ability Name,Damage,Duration,Cooldown,Type\nA,10,1,0,Special\n";
    let err = AbilityCatalog::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("Special"));
}

#[test]
fn test_rejects_unparseable_row() {
    let csv = "Ability Name,Damage,Duration,Cooldown,Type\nA,ten,1,0,Basic\n";
    let err = AbilityCatalog::from_csv_reader(csv.as_bytes()).unwrap_err();
    assert_eq!(validation_row(err), 1);
}

#[test]
fn test_rejects_duplicate_names() {
    let err = AbilityCatalog::new(vec![
        Ability::basic("Slice", 60, 3, 5),
        Ability::basic("Slice", 70, 3, 5),
    ])
    .unwrap_err();

    assert_eq!(validation_row(err), 2);
}

#[test]
fn test_rejects_zero_duration_ability() {
    let err = AbilityCatalog::new(vec![Ability::basic("Slice", 60, 0, 5)]).unwrap_err();
    assert_eq!(validation_row(err), 1);
}

#[test]
fn test_category_queries() {
    let catalog = AbilityCatalog::from_csv_reader(MELEE_CSV.as_bytes()).unwrap();

    assert!(catalog.has_category(Category::Threshold));
    assert_eq!(catalog.indices_of(Category::Ultimate).collect::<Vec<_>>(), vec![2]);
    assert!(AbilityCatalog::new(Vec::new()).unwrap().is_empty());
}

#[test]
fn test_load_style_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = AbilityCatalog::style_path(dir.path(), CombatStyle::Melee);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(MELEE_CSV.as_bytes()).unwrap();

    let catalog = AbilityCatalog::load_style(dir.path(), CombatStyle::Melee).unwrap();
    assert_eq!(catalog.len(), 3);
    assert!(path.ends_with("melee_data.csv"));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = AbilityCatalog::load_style(dir.path(), CombatStyle::Magic).unwrap_err();
    assert!(matches!(err, RotaforgeError::Io(_)));
}
