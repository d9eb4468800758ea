use std::path::PathBuf;

use zm_core::{Position, ZoneId};
use zm_project::{ProjectError, ValidationError, compile, generate, load};
use zm_zones::{ConfigError, ZoneConstraints, ZoneError};

fn demo(name: &str) -> PathBuf {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("demos")
        .join(name)
}

#[test]
fn demos_validate_and_compile() {
    for name in ["worked_example.yaml", "walled_dungeon.yaml"] {
        let path = demo(name);
        let config = load(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        let compiled = compile(&config).unwrap();
        assert_eq!(compiled.table.max_zones(), config.zones.len());
        assert_eq!(compiled.seed, config.seed);
    }
}

#[test]
fn walled_dungeon_blocks_cells() {
    let config = load(&demo("walled_dungeon.yaml")).unwrap();
    let compiled = compile(&config).unwrap();
    assert!(!compiled.grid.is_valid_position(Position::new(11, 3)));
    assert!(compiled.grid.is_valid_position(Position::new(11, 8)));
    assert_eq!(compiled.table.max_total_nodes(), 108.min(120));
}

#[test]
fn worked_example_generates_nine_nodes() {
    let config = load(&demo("worked_example.yaml")).unwrap();
    let compiled = compile(&config).unwrap();
    let maze = generate(&config, None).unwrap();

    maze.check_invariants(&compiled.table).unwrap();
    assert_eq!(maze.node_count(), 9);
    assert_eq!(maze.zone(ZoneId::from_index(1)).unwrap().parts().len(), 2);
}

#[test]
fn structural_errors_surface_from_compile() {
    let mut config = load(&demo("worked_example.yaml")).unwrap();
    config.zones[0].parts = 2;
    let err = compile(&config).unwrap_err();
    assert!(
        matches!(
            err,
            ProjectError::Zone(ZoneError::Configuration(ConfigError::ZoneZeroParts { parts: 2 }))
        ),
        "{err:?}"
    );
}

#[test]
fn bad_weight_factor_is_a_validation_error() {
    let mut config = load(&demo("worked_example.yaml")).unwrap();
    config.growth.weight_factor = -1.0;
    let err = compile(&config).unwrap_err();
    assert!(
        matches!(
            err,
            ProjectError::Validation(ValidationError::Zone(
                ConfigError::InvalidWeightFactor { .. }
            ))
        ),
        "{err:?}"
    );
}
