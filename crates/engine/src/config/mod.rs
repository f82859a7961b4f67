//! Engine configuration.
//!
//! ```toml
//! builtins = true
//! plugin_dirs = ["/usr/lib/trex/plugins"]
//! schema_dirs = ["/etc/trex/schemas"]
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::schema::SchemaError;
use crate::tag::TagError;

mod schema_file;

pub use schema_file::{FieldSpec, SchemaFile, SchemaFieldKind, VariantSpec};

/// Extra module directories, in `PATH` syntax.
pub const PLUGIN_DIR_ENV: &str = "TREX_PLUGIN_DIR";
/// Extra schema directories, in `PATH` syntax.
pub const SCHEMA_DIR_ENV: &str = "TREX_SCHEMA_DIR";

/// Errors that can occur when reading configuration or schema files.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a file or directory.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Malformed TOML or a shape mismatch.
	#[error("TOML error in {path}: {source}")]
	Toml {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// A schema file declares an invalid tag.
	#[error("invalid tag in {path}: {source}")]
	Tag {
		path: PathBuf,
		#[source]
		source: TagError,
	},

	/// A schema file describes a set that fails validation.
	#[error("invalid schema in {path}: {source}")]
	Schema {
		path: PathBuf,
		#[source]
		source: SchemaError,
	},
}

/// Startup options for [`Registry::from_config`](crate::Registry::from_config).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Register the statically compiled tags.
	pub builtins: bool,
	/// Directories scanned for handler modules.
	pub plugin_dirs: Vec<PathBuf>,
	/// Directories scanned for `*.toml` schema files.
	pub schema_dirs: Vec<PathBuf>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			builtins: true,
			plugin_dirs: Vec::new(),
			schema_dirs: Vec::new(),
		}
	}
}

impl EngineConfig {
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = read(path)?;
		toml::from_str(&text).map_err(|source| ConfigError::Toml {
			path: path.to_owned(),
			source,
		})
	}

	/// Defaults plus the directories named by the environment.
	pub fn from_env() -> Self {
		Self::default().with_env()
	}

	/// Appends directories from [`PLUGIN_DIR_ENV`] and [`SCHEMA_DIR_ENV`].
	pub fn with_env(self) -> Self {
		let plugin_dirs = std::env::var_os(PLUGIN_DIR_ENV);
		let schema_dirs = std::env::var_os(SCHEMA_DIR_ENV);
		self.with_dir_lists(plugin_dirs.as_deref(), schema_dirs.as_deref())
	}

	/// Appends directories from `PATH`-style lists.
	pub(crate) fn with_dir_lists(
		mut self,
		plugin_dirs: Option<&OsStr>,
		schema_dirs: Option<&OsStr>,
	) -> Self {
		if let Some(dirs) = plugin_dirs {
			self.plugin_dirs.extend(std::env::split_paths(dirs));
		}
		if let Some(dirs) = schema_dirs {
			self.schema_dirs.extend(std::env::split_paths(dirs));
		}
		self
	}
}

pub(crate) fn read(path: &Path) -> Result<String, ConfigError> {
	std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
		path: path.to_owned(),
		error,
	})
}

#[cfg(test)]
mod tests;
