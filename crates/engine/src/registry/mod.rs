//! Process-wide tag registry.
//!
//! Maps each [`Tag`] to its description set and handler. Entries and the
//! modules backing dynamic entries live in one [`RegistryState`] behind a
//! single lock, so registration, removal and module unload are atomic with
//! respect to lookups.
//!
//! A [`PluginRef`] holds the read lock. Module unload needs the write lock,
//! so a module cannot be closed while one of its handlers is in use. Handlers
//! must not call back into the registry that invoked them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use rustc_hash::{FxHashMap, FxHashSet};
use slab::Slab;
use tracing::{debug, info, warn};
use trex_abi::TrexFinalizeFn;

use crate::error::{Error, Result};
use crate::plugin::{
	BuiltinPlugin, ExternalModule, LoadedModule, ModuleLoader, PluginError, StaticHandler,
	TreHandler, default_loader, open_module, release_module,
};
use crate::record::RecordInstance;
use crate::schema::{DescriptionSet, SchemaError};
use crate::tag::Tag;

mod autoload;

pub use autoload::AutoloadReport;

/// Where an entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOrigin {
	/// Registered in-process: builtins, schema files or [`Registry::register`].
	Static,
	/// Provided by a shared library.
	Dynamic { path: PathBuf },
}

/// A registered tag.
pub struct PluginEntry {
	tag: Tag,
	set: Arc<DescriptionSet>,
	handler: Arc<dyn TreHandler>,
	origin: PluginOrigin,
	/// Index into [`RegistryState::modules`] for dynamic entries.
	module: Option<usize>,
}

impl PluginEntry {
	pub fn tag(&self) -> Tag {
		self.tag
	}

	pub fn set(&self) -> &Arc<DescriptionSet> {
		&self.set
	}

	/// Borrowed only; dynamic handlers must not outlive the lookup.
	pub fn handler(&self) -> &dyn TreHandler {
		self.handler.as_ref()
	}

	pub fn origin(&self) -> &PluginOrigin {
		&self.origin
	}
}

impl fmt::Debug for PluginEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PluginEntry")
			.field("tag", &self.tag)
			.field("set", &self.set.name())
			.field("origin", &self.origin)
			.finish_non_exhaustive()
	}
}

/// Read access to one entry; holds the registry read lock.
pub type PluginRef<'a> = MappedRwLockReadGuard<'a, PluginEntry>;

struct ModuleSlot {
	module: Box<dyn LoadedModule>,
	finalize: TrexFinalizeFn,
	/// Registered tags still served by this module.
	live_tags: usize,
}

#[derive(Default)]
struct RegistryState {
	entries: FxHashMap<Tag, PluginEntry>,
	modules: Slab<ModuleSlot>,
}

impl RegistryState {
	/// Drops one tag reference; finalizes and unloads the module on the last.
	fn release_tag(&mut self, index: usize) -> std::result::Result<(), PluginError> {
		let Some(slot) = self.modules.get_mut(index) else {
			return Ok(());
		};
		slot.live_tags = slot.live_tags.saturating_sub(1);
		if slot.live_tags > 0 {
			return Ok(());
		}
		let ModuleSlot {
			module, finalize, ..
		} = self.modules.remove(index);
		let path = module.path().to_owned();
		release_module(module, finalize)?;
		info!(path = %path.display(), "unloaded module");
		Ok(())
	}

	fn clear(&mut self) {
		let entries = self.entries.len();
		self.entries.clear();
		for slot in self.modules.drain() {
			let path = slot.module.path().to_owned();
			match release_module(slot.module, slot.finalize) {
				Ok(()) => info!(path = %path.display(), "unloaded module"),
				Err(error) => warn!(path = %path.display(), %error, "module release failed during shutdown"),
			}
		}
		if entries > 0 {
			debug!(entries, "registry cleared");
		}
	}
}

/// Tag to description set and handler mapping.
///
/// Construct one at startup and pass it by reference; dropping it shuts it
/// down.
pub struct Registry {
	state: RwLock<RegistryState>,
	loader: Arc<dyn ModuleLoader>,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl Registry {
	/// Empty registry using the default module loader.
	pub fn new() -> Self {
		Self::with_loader(default_loader())
	}

	pub fn with_loader(loader: Arc<dyn ModuleLoader>) -> Self {
		Self {
			state: RwLock::new(RegistryState::default()),
			loader,
		}
	}

	/// Registry holding every [`BuiltinPlugin`] submission.
	pub fn with_builtins() -> Result<Self> {
		let registry = Self::new();
		registry.register_builtins()?;
		Ok(registry)
	}

	/// Registers every [`BuiltinPlugin`] submission; returns how many.
	///
	/// All or nothing: an invalid set or a tag that is already registered
	/// leaves the registry unchanged.
	pub fn register_builtins(&self) -> Result<usize> {
		let mut staged = Vec::new();
		for plugin in BuiltinPlugin::all() {
			let tag = Tag::new(plugin.tag)?;
			let set = (plugin.describe)();
			set.validate()?;
			staged.push((tag, Arc::new(set)));
		}

		let mut state = self.state.write();
		let mut seen = FxHashSet::default();
		if let Some(tag) = staged
			.iter()
			.map(|(tag, _)| *tag)
			.find(|tag| state.entries.contains_key(tag) || !seen.insert(*tag))
		{
			return Err(SchemaError::DuplicateTag(tag).into());
		}
		for (tag, set) in &staged {
			let handler = Arc::new(StaticHandler::from_arc(Arc::clone(set)));
			state.entries.insert(
				*tag,
				PluginEntry {
					tag: *tag,
					set: Arc::clone(set),
					handler,
					origin: PluginOrigin::Static,
					module: None,
				},
			);
		}
		debug!(count = staged.len(), "registered builtins");
		Ok(staged.len())
	}

	/// Registers `tag` with a validated description set and its handler.
	///
	/// A tag already present fails with [`SchemaError::DuplicateTag`]; the
	/// existing entry stays authoritative.
	pub fn register(
		&self,
		tag: Tag,
		set: DescriptionSet,
		handler: Arc<dyn TreHandler>,
	) -> Result<()> {
		self.insert_static(tag, Arc::new(set), handler)
	}

	/// Registers a set with a [`StaticHandler`] sharing it.
	pub fn register_set(&self, tag: Tag, set: DescriptionSet) -> Result<()> {
		let set = Arc::new(set);
		let handler = Arc::new(StaticHandler::from_arc(Arc::clone(&set)));
		self.insert_static(tag, set, handler)
	}

	fn insert_static(
		&self,
		tag: Tag,
		set: Arc<DescriptionSet>,
		handler: Arc<dyn TreHandler>,
	) -> Result<()> {
		set.validate()?;
		let mut state = self.state.write();
		if state.entries.contains_key(&tag) {
			return Err(SchemaError::DuplicateTag(tag).into());
		}
		debug!(tag = %tag, set = set.name(), variants = set.variants().len(), "registered");
		state.entries.insert(
			tag,
			PluginEntry {
				tag,
				set,
				handler,
				origin: PluginOrigin::Static,
				module: None,
			},
		);
		Ok(())
	}

	pub fn lookup(&self, tag: Tag) -> Result<PluginRef<'_>> {
		RwLockReadGuard::try_map(self.state.read(), |state| state.entries.get(&tag))
			.map_err(|_| Error::NotFound(tag))
	}

	pub fn contains(&self, tag: Tag) -> bool {
		self.state.read().entries.contains_key(&tag)
	}

	/// Registered tags in sorted order.
	pub fn tags(&self) -> Vec<Tag> {
		let mut tags: Vec<_> = self.state.read().entries.keys().copied().collect();
		tags.sort_unstable();
		tags
	}

	pub fn len(&self) -> usize {
		self.state.read().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Opens a handler module and registers every tag it provides.
	///
	/// All or nothing: if any step fails, including a tag that is already
	/// registered, the module is finalized (when initialized), unloaded and
	/// no entry becomes visible.
	pub fn load_external(&self, path: impl AsRef<Path>) -> Result<Vec<Tag>> {
		let path = path.as_ref();
		let mut state = self.state.write();
		let ExternalModule {
			module,
			finalize,
			handlers,
		} = open_module(self.loader.as_ref(), path)?;

		let mut seen = FxHashSet::default();
		let duplicate = handlers
			.iter()
			.map(|h| h.tag)
			.find(|tag| state.entries.contains_key(tag) || !seen.insert(*tag));
		if let Some(tag) = duplicate {
			drop(handlers);
			if let Err(error) = release_module(module, finalize) {
				warn!(path = %path.display(), %error, "failed to release rejected module");
			}
			return Err(SchemaError::DuplicateTag(tag).into());
		}

		let index = state.modules.insert(ModuleSlot {
			module,
			finalize,
			live_tags: handlers.len(),
		});
		let tags: Vec<Tag> = handlers.iter().map(|h| h.tag).collect();
		for h in handlers {
			state.entries.insert(
				h.tag,
				PluginEntry {
					tag: h.tag,
					set: h.set,
					handler: h.handler,
					origin: PluginOrigin::Dynamic {
						path: path.to_owned(),
					},
					module: Some(index),
				},
			);
		}
		info!(path = %path.display(), tags = ?tags, "loaded module");
		Ok(tags)
	}

	/// Removes `tag`. For dynamic entries the backing module is finalized and
	/// unloaded once its last tag is gone.
	///
	/// The entry is removed even if unloading fails; the unload error is
	/// returned.
	pub fn unregister(&self, tag: Tag) -> Result<()> {
		let mut state = self.state.write();
		let entry = state.entries.remove(&tag).ok_or(Error::NotFound(tag))?;
		debug!(tag = %tag, "unregistered");
		if let Some(index) = entry.module {
			drop(entry);
			state.release_tag(index)?;
		}
		Ok(())
	}

	/// Unregisters everything and unloads all modules. Idempotent.
	pub fn shutdown(&self) {
		self.state.write().clear();
	}

	/// Decodes `bytes` as an instance of `tag`.
	///
	/// The entry stays locked for the walk and the handler's check.
	pub fn decode(&self, tag: Tag, bytes: &[u8]) -> Result<RecordInstance> {
		let entry = self.lookup(tag)?;
		let record = RecordInstance::decode(tag, &entry.set, bytes)?;
		entry
			.handler
			.validate(bytes)
			.map_err(|reason| Error::Rejected { tag, reason })?;
		Ok(record)
	}

	/// Encodes `instance` with the variant it names.
	pub fn encode(&self, instance: &RecordInstance) -> Result<Vec<u8>> {
		let tag = instance.tag();
		let entry = self.lookup(tag)?;
		let bytes = instance.encode(&entry.set)?;
		entry
			.handler
			.validate(&bytes)
			.map_err(|reason| Error::Rejected { tag, reason })?;
		Ok(bytes)
	}

	/// A blank record of `tag`'s default variant.
	pub fn empty_record(&self, tag: Tag) -> Result<RecordInstance> {
		let entry = self.lookup(tag)?;
		RecordInstance::empty(tag, &entry.set)
	}
}

impl Drop for Registry {
	fn drop(&mut self) {
		self.state.get_mut().clear();
	}
}
