//! Tag handlers and the module loading seam.
//!
//! A handler describes one tag. Handlers come from three places:
//!
//! - [`StaticHandler`] wraps a set built in Rust or read from a schema file.
//! - [`BuiltinPlugin`] submissions collected with `inventory`.
//! - Shared libraries implementing the `trex-abi` contract, opened through a
//!   [`ModuleLoader`].

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use trex_abi::TrexStatus;

use crate::schema::DescriptionSet;

#[cfg(feature = "dylib")]
mod dylib;
mod external;
#[cfg(test)]
pub(crate) mod fake;
mod loader;

#[cfg(feature = "dylib")]
pub use dylib::LibLoader;
pub(crate) use external::{ExternalModule, open as open_module, release as release_module};
pub use loader::{LoadedModule, ModuleLoader, SymbolAddr, UnsupportedLoader, default_loader};

/// Describes a tag and optionally vets decoded records.
pub trait TreHandler: Send + Sync {
	fn describe(&self) -> Arc<DescriptionSet>;

	/// Record-level check on raw bytes that already passed the field walk.
	fn validate(&self, _raw: &[u8]) -> Result<(), String> {
		Ok(())
	}
}

/// Handler backed by a description set owned by the host.
#[derive(Debug, Clone)]
pub struct StaticHandler {
	set: Arc<DescriptionSet>,
}

impl StaticHandler {
	pub fn new(set: DescriptionSet) -> Self {
		Self { set: Arc::new(set) }
	}

	pub fn from_arc(set: Arc<DescriptionSet>) -> Self {
		Self { set }
	}
}

impl TreHandler for StaticHandler {
	fn describe(&self) -> Arc<DescriptionSet> {
		Arc::clone(&self.set)
	}
}

/// A statically linked tag, submitted with `inventory::submit!`.
pub struct BuiltinPlugin {
	pub tag: &'static str,
	pub describe: fn() -> DescriptionSet,
}

inventory::collect!(BuiltinPlugin);

impl BuiltinPlugin {
	/// All submitted builtins, sorted by tag.
	pub fn all() -> Vec<&'static BuiltinPlugin> {
		let mut plugins: Vec<_> = inventory::iter::<BuiltinPlugin>.into_iter().collect();
		plugins.sort_by_key(|p| p.tag);
		plugins
	}
}

/// Module loading and ABI failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
	#[error("failed to load {path}: {reason}")]
	Load { path: PathBuf, reason: String },

	#[error("{path} does not export {symbol}")]
	MissingSymbol { path: PathBuf, symbol: String },

	#[error("failed to unload {path}: {reason}")]
	Unload { path: PathBuf, reason: String },

	#[error("{path}: {entry} returned {status:?}")]
	EntryPoint {
		path: PathBuf,
		entry: &'static str,
		status: TrexStatus,
	},

	#[error("{path} targets ABI v{actual}, expected v{expected}")]
	AbiMismatch {
		path: PathBuf,
		expected: u32,
		actual: u32,
	},

	#[error("{path}: invalid description: {reason}")]
	InvalidDescription { path: PathBuf, reason: String },

	#[error("dynamic loading is not available, cannot load {path}")]
	Unsupported { path: PathBuf },
}
