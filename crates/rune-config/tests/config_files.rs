use std::io::Write;

use rune_config::{ConfigError, TypesetConfig, load_families_json};

#[test]
fn loads_toml_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[layout]
area_width = 240.0
vertical_alignment = "center"

[[families]]
name = "Sans"
linked = ["Sans Arabic"]

[[families.faces]]
name = "Sans Regular"
uri = "system:sans-serif"
"#
    )
    .unwrap();

    let config = TypesetConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.layout.area_width, 240.0);
    assert_eq!(config.layout.vertical_alignment, "center");
    assert_eq!(config.families[0].linked, vec!["Sans Arabic".to_string()]);
    assert_eq!(config.families[0].faces[0].weight, 400);
}

#[test]
fn extends_families_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"name": "Mono", "faces": [{{"uri": "mono.ttf"}}]}}]"#
    )
    .unwrap();

    let direct = load_families_json(file.path()).unwrap();
    assert_eq!(direct[0].name, "Mono");

    let mut config = TypesetConfig::default();
    config.extend_families_from_json(file.path()).unwrap();
    assert_eq!(config.families.len(), 1);
    assert_eq!(config.families[0].faces[0].uri, "mono.ttf");
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TypesetConfig::load_from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
