use std::path::PathBuf;

use super::*;
use crate::field::{FieldKind, Presence, Range};
use crate::schema::VariantLength;

fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
	let path = dir.path().join(name);
	std::fs::write(&path, text).unwrap();
	path
}

#[test]
fn engine_config_defaults_and_overrides() {
	let dir = tempfile::tempdir().unwrap();
	let empty = write(&dir, "empty.toml", "");
	assert_eq!(EngineConfig::load(&empty).unwrap(), EngineConfig::default());
	assert!(EngineConfig::default().builtins);

	let full = write(
		&dir,
		"trex.toml",
		r#"
builtins = false
plugin_dirs = ["/opt/trex/plugins"]
schema_dirs = ["schemas", "more"]
"#,
	);
	let config = EngineConfig::load(&full).unwrap();
	assert!(!config.builtins);
	assert_eq!(config.plugin_dirs, [PathBuf::from("/opt/trex/plugins")]);
	assert_eq!(config.schema_dirs.len(), 2);
}

#[test]
fn engine_config_errors_name_the_file() {
	let dir = tempfile::tempdir().unwrap();
	let typo = write(&dir, "typo.toml", "plugin_dir = []");
	let err = EngineConfig::load(&typo).unwrap_err();
	assert!(matches!(&err, ConfigError::Toml { path, .. } if path == &typo));

	let missing = dir.path().join("absent.toml");
	assert!(matches!(
		EngineConfig::load(&missing),
		Err(ConfigError::Io { .. })
	));
}

const PIAEQA: &str = r#"
tag = "PIAEQA"
name = "Equipment"

[[variants]]
name = "PIAEQA"
length = 12

[[variants.fields]]
tag = "EQPCODE"
label = "Equipment Code"
kind = "alpha"
width = 7
required = true

[[variants.fields]]
tag = "EQPNOMEN"
kind = "numeric"
width = 5
range = [0, 99999]
"#;

#[test]
fn schema_file_builds_a_description_set() {
	let file = SchemaFile::parse(PIAEQA).unwrap();
	assert_eq!(file.tag().unwrap().as_str(), "PIAEQA");

	let set = file.to_set();
	set.validate().unwrap();
	assert_eq!(set.name(), "Equipment");
	let variant = set.default_variant().unwrap();
	assert_eq!(variant.length, VariantLength::Fixed(12));

	let code = variant.table.field("EQPCODE").unwrap();
	assert_eq!(code.kind, FieldKind::AlphaText);
	assert_eq!(code.label, "Equipment Code");
	assert_eq!(code.presence, Presence::NonBlankRequired);

	let nomen = variant.table.field("EQPNOMEN").unwrap();
	assert_eq!(nomen.label, "EQPNOMEN");
	assert_eq!(nomen.range, Range::Bounded { min: 0, max: 99999 });
}

#[test]
fn schema_file_without_length_is_variable() {
	let text = PIAEQA.replace("length = 12\n", "");
	let set = SchemaFile::parse(&text).unwrap().to_set();
	assert_eq!(set.variants()[0].length, VariantLength::Variable);
}

#[test]
fn schema_file_load_validates() {
	let dir = tempfile::tempdir().unwrap();
	let good = write(&dir, "piaeqa.toml", PIAEQA);
	let (tag, set) = SchemaFile::load(&good).unwrap();
	assert_eq!(tag.as_str(), "PIAEQA");
	assert_eq!(set.variants().len(), 1);

	let short = write(&dir, "short.toml", &PIAEQA.replace("length = 12", "length = 11"));
	assert!(matches!(
		SchemaFile::load(&short),
		Err(ConfigError::Schema {
			source: SchemaError::LengthMismatch { .. },
			..
		})
	));

	let long_tag = write(&dir, "tag.toml", &PIAEQA.replace("\"PIAEQA\"\nname", "\"PIAEQAX\"\nname"));
	assert!(matches!(
		SchemaFile::load(&long_tag),
		Err(ConfigError::Tag { .. })
	));

	let unknown = write(&dir, "kind.toml", &PIAEQA.replace("\"numeric\"", "\"binary\""));
	assert!(matches!(
		SchemaFile::load(&unknown),
		Err(ConfigError::Toml { .. })
	));
}

#[test]
fn environment_lists_extend_configured_dirs() {
	let plugins = std::env::join_paths(["/opt/trex/plugins", "/usr/lib/trex"]).unwrap();
	let base = EngineConfig {
		plugin_dirs: vec![PathBuf::from("local")],
		..EngineConfig::default()
	};
	let config = base.with_dir_lists(Some(plugins.as_os_str()), None);
	assert_eq!(
		config.plugin_dirs,
		[
			PathBuf::from("local"),
			PathBuf::from("/opt/trex/plugins"),
			PathBuf::from("/usr/lib/trex"),
		]
	);
	assert!(config.schema_dirs.is_empty());
	assert!(config.builtins);

	let from_env = EngineConfig::from_env();
	let expected = EngineConfig::default().with_dir_lists(
		std::env::var_os(PLUGIN_DIR_ENV).as_deref(),
		std::env::var_os(SCHEMA_DIR_ENV).as_deref(),
	);
	assert_eq!(from_env, expected);
}
