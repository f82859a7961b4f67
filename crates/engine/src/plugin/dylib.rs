//! `libloading` adapter.

use std::ffi::c_void;
use std::path::{Path, PathBuf};

use libloading::Library;

use super::{LoadedModule, ModuleLoader, PluginError, SymbolAddr};

/// Opens modules with the platform dynamic loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibLoader;

struct LibModule {
	path: PathBuf,
	lib: Library,
}

impl ModuleLoader for LibLoader {
	fn load(&self, path: &Path) -> Result<Box<dyn LoadedModule>, PluginError> {
		// SAFETY: loading runs the library's initializers; modules are trusted
		// code supplied by the embedding application.
		let lib = unsafe { Library::new(path) }.map_err(|e| PluginError::Load {
			path: path.to_owned(),
			reason: e.to_string(),
		})?;
		Ok(Box::new(LibModule {
			path: path.to_owned(),
			lib,
		}))
	}
}

impl LoadedModule for LibModule {
	fn path(&self) -> &Path {
		&self.path
	}

	fn resolve(&self, symbol: &str) -> Result<SymbolAddr, PluginError> {
		let missing = || PluginError::MissingSymbol {
			path: self.path.clone(),
			symbol: symbol.to_owned(),
		};
		// SAFETY: the address is only reinterpreted by the ABI layer, which
		// knows each symbol's signature.
		let sym = unsafe { self.lib.get::<*mut c_void>(symbol.as_bytes()) }.map_err(|_| missing())?;
		SymbolAddr::new(*sym).ok_or_else(missing)
	}

	fn unload(self: Box<Self>) -> Result<(), PluginError> {
		let Self { path, lib } = *self;
		lib.close().map_err(|e| PluginError::Unload {
			path,
			reason: e.to_string(),
		})
	}
}
