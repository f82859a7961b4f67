use std::ffi::c_void;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use super::PluginError;

/// Address of an exported symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolAddr(NonNull<c_void>);

// SAFETY: an address is plain data; calling through it is the caller's
// responsibility and only happens while the owning module is loaded.
unsafe impl Send for SymbolAddr {}
unsafe impl Sync for SymbolAddr {}

impl SymbolAddr {
	pub fn new(ptr: *mut c_void) -> Option<Self> {
		NonNull::new(ptr).map(Self)
	}

	pub fn as_ptr(self) -> *mut c_void {
		self.0.as_ptr()
	}
}

/// Opens shared libraries.
pub trait ModuleLoader: Send + Sync {
	fn load(&self, path: &Path) -> Result<Box<dyn LoadedModule>, PluginError>;
}

/// An open shared library.
pub trait LoadedModule: Send + Sync {
	fn path(&self) -> &Path;

	fn resolve(&self, symbol: &str) -> Result<SymbolAddr, PluginError>;

	/// Closes the library. Addresses resolved from it become dangling.
	fn unload(self: Box<Self>) -> Result<(), PluginError>;
}

/// Loader for builds without dynamic loading support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLoader;

impl ModuleLoader for UnsupportedLoader {
	fn load(&self, path: &Path) -> Result<Box<dyn LoadedModule>, PluginError> {
		Err(PluginError::Unsupported {
			path: path.to_owned(),
		})
	}
}

/// The `libloading` loader when the `dylib` feature is on.
pub fn default_loader() -> Arc<dyn ModuleLoader> {
	#[cfg(feature = "dylib")]
	{
		Arc::new(super::LibLoader)
	}
	#[cfg(not(feature = "dylib"))]
	{
		Arc::new(UnsupportedLoader)
	}
}
