//! Startup population from an [`EngineConfig`].

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::Registry;
use crate::config::{ConfigError, EngineConfig, SchemaFile};
use crate::error::{Error, Result};
use crate::tag::Tag;

/// Outcome of [`Registry::autoload`]. Failures never abort the scan.
#[derive(Debug, Default)]
pub struct AutoloadReport {
	/// Files that registered, with the tags each provided.
	pub loaded: Vec<(PathBuf, Vec<Tag>)>,
	/// Files or directories that failed, with the reason.
	pub failed: Vec<(PathBuf, Error)>,
}

impl AutoloadReport {
	pub fn is_clean(&self) -> bool {
		self.failed.is_empty()
	}

	/// Every tag registered by the scan.
	pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
		self.loaded.iter().flat_map(|(_, tags)| tags.iter().copied())
	}

	/// Files in `dir` accepted by `filter`, sorted by path.
	fn scan(&mut self, dir: &Path, filter: fn(&Path) -> bool) -> Vec<PathBuf> {
		if !dir.is_dir() {
			debug!(dir = %dir.display(), "skipping missing directory");
			return Vec::new();
		}
		let entries = match std::fs::read_dir(dir) {
			Ok(entries) => entries,
			Err(error) => {
				let err = ConfigError::Io {
					path: dir.to_owned(),
					error,
				};
				self.record(dir.to_owned(), Err(err.into()));
				return Vec::new();
			}
		};
		self.collect(dir, entries.map(|entry| entry.map(|e| e.path())), filter)
	}

	/// Keeps accepted files; entries that cannot be read are reported against
	/// `dir`.
	pub(super) fn collect(
		&mut self,
		dir: &Path,
		entries: impl IntoIterator<Item = io::Result<PathBuf>>,
		filter: fn(&Path) -> bool,
	) -> Vec<PathBuf> {
		let mut paths = Vec::new();
		for entry in entries {
			match entry {
				Ok(path) if path.is_file() && filter(&path) => paths.push(path),
				Ok(_) => {}
				Err(error) => {
					let err = ConfigError::Io {
						path: dir.to_owned(),
						error,
					};
					self.record(dir.to_owned(), Err(err.into()));
				}
			}
		}
		paths.sort();
		paths
	}

	fn record(&mut self, path: PathBuf, result: Result<Vec<Tag>>) {
		match result {
			Ok(tags) => self.loaded.push((path, tags)),
			Err(error) => {
				warn!(path = %path.display(), %error, "autoload failed");
				self.failed.push((path, error));
			}
		}
	}
}

impl Registry {
	/// Builds a registry from `config`: builtins first, then [`Self::autoload`].
	pub fn from_config(config: &EngineConfig) -> Result<(Self, AutoloadReport)> {
		let registry = Self::new();
		if config.builtins {
			registry.register_builtins()?;
		}
		let report = registry.autoload(config);
		Ok((registry, report))
	}

	/// Registers every schema file in `schema_dirs`, then loads every shared
	/// library in `plugin_dirs`.
	///
	/// Each file succeeds or fails on its own; missing directories are skipped.
	pub fn autoload(&self, config: &EngineConfig) -> AutoloadReport {
		let mut report = AutoloadReport::default();

		for dir in &config.schema_dirs {
			for path in report.scan(dir, is_schema_file) {
				let result = SchemaFile::load(&path)
					.map_err(Error::from)
					.and_then(|(tag, set)| {
						self.register_set(tag, set)?;
						Ok(vec![tag])
					});
				report.record(path, result);
			}
		}

		for dir in &config.plugin_dirs {
			for path in report.scan(dir, is_dynamic_lib) {
				let result = self.load_external(&path);
				report.record(path, result);
			}
		}

		info!(
			loaded = report.loaded.len(),
			failed = report.failed.len(),
			"autoload finished"
		);
		report
	}
}

fn is_schema_file(path: &Path) -> bool {
	path.extension().is_some_and(|ext| ext == "toml")
}

fn is_dynamic_lib(path: &Path) -> bool {
	matches!(
		path.extension().and_then(|ext| ext.to_str()),
		Some("so" | "dylib" | "dll")
	)
}
