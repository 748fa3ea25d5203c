// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The canonical-path-keyed resource store.

use crate::loader;
use crate::resource::{Resource, ResourceData, ResourceHandle, ResourceKind};
use crate::watcher::FileWatcher;
use crate::{Handle, Model, ResourceError, ResourceType, Script, Shader, ShaderDependent, Sound, Texture};
use ahash::AHashMap;
use crossbeam_channel::Sender;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::rc::Weak;

/// Lazily loads, deduplicates and hot-reloads resources under a data root.
///
/// Every path resolves to one canonical key and every key maps to exactly one
/// entry for the lifetime of the cache. Reloads replace an entry's payload in
/// place, so handles given out earlier stay valid and observe new content.
/// Entries are never evicted.
pub struct ResourceCache {
    root: PathBuf,
    entries: AHashMap<PathBuf, ResourceHandle>,
    watcher: FileWatcher,
    compiler: rhai::Engine,
}

impl ResourceCache {
    /// Creates a cache rooted at `root` and starts watching it for changes.
    ///
    /// ## Arguments
    /// * `root` - The data directory. Relative request paths are resolved against it.
    ///
    /// ## Returns
    /// The cache, or [`ResourceError::InvalidRoot`] if the root cannot be resolved.
    /// Failure to set up the watch only disables hot reload.
    pub fn init(root: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let root = Self::resolve_root(root.as_ref())?;
        let watcher = FileWatcher::watch(&root);
        Ok(Self::with_watcher(root, watcher))
    }

    /// Creates a cache that only reloads on explicit invalidation through
    /// [`ResourceCache::notifier`].
    pub fn unwatched(root: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let root = Self::resolve_root(root.as_ref())?;
        Ok(Self::with_watcher(root, FileWatcher::inert()))
    }

    fn resolve_root(root: &Path) -> Result<PathBuf, ResourceError> {
        root.canonicalize()
            .map_err(|source| ResourceError::InvalidRoot {
                path: root.to_path_buf(),
                source,
            })
    }

    fn with_watcher(root: PathBuf, watcher: FileWatcher) -> Self {
        log::info!("Resource cache rooted at '{}'.", root.display());
        Self {
            root,
            entries: AHashMap::new(),
            watcher,
            compiler: rhai::Engine::new_raw(),
        }
    }

    /// The canonical data root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` to the key it is cached under.
    pub fn key_for(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        joined
            .canonicalize()
            .unwrap_or_else(|_| normalize_lexically(&joined))
    }

    /// Returns the entry for `path`, loading it on first request.
    ///
    /// A file whose load fails is still cached, in the failed state, so a later
    /// change can repair it. Returns `None` only when the extension maps to no
    /// resource kind.
    pub fn get_resource(&mut self, path: impl AsRef<Path>) -> Option<ResourceHandle> {
        let path = path.as_ref();
        let key = self.key_for(path);
        if let Some(handle) = self.entries.get(&key) {
            return Some(handle.clone());
        }

        let Some(kind) = ResourceKind::from_path(&key) else {
            log::warn!("Cannot determine resource type of '{}'.", path.display());
            return None;
        };

        let resource = match loader::load_file(kind, &key, &self.compiler) {
            Ok(data) => {
                log::debug!("Loaded {kind} '{}'.", key.display());
                Resource::loaded(key.clone(), data)
            }
            Err(e) => {
                log::warn!("{e}");
                Resource::failed(key.clone(), kind)
            }
        };

        let handle = ResourceHandle::new(resource);
        self.entries.insert(key, handle.clone());
        Some(handle)
    }

    fn get_typed<T: ResourceType>(&mut self, path: &Path) -> Option<Handle<T>> {
        let handle = self.get_resource(path)?;
        let typed = handle.typed::<T>();
        if typed.is_none() {
            log::warn!(
                "'{}' is a {}, not a {}.",
                path.display(),
                handle.kind(),
                T::KIND
            );
        }
        typed
    }

    /// Returns the texture at `path`.
    pub fn get_texture(&mut self, path: impl AsRef<Path>) -> Option<Handle<Texture>> {
        self.get_typed(path.as_ref())
    }

    /// Returns the model at `path`.
    pub fn get_model(&mut self, path: impl AsRef<Path>) -> Option<Handle<Model>> {
        self.get_typed(path.as_ref())
    }

    /// Returns the shader at `path` and records `dependent` so it is told
    /// when the shader is reloaded or dropped.
    pub fn get_shader(
        &mut self,
        path: impl AsRef<Path>,
        dependent: Weak<dyn ShaderDependent>,
    ) -> Option<Handle<Shader>> {
        let handle = self.get_typed::<Shader>(path.as_ref())?;
        if let ResourceData::Shader(shader) = &mut handle.untyped().borrow_mut().data {
            shader.add_dependent(dependent);
        }
        Some(handle)
    }

    /// Returns the sound at `path`.
    pub fn get_sound(&mut self, path: impl AsRef<Path>) -> Option<Handle<Sound>> {
        self.get_typed(path.as_ref())
    }

    /// Returns the script module at `path`.
    pub fn get_script(&mut self, path: impl AsRef<Path>) -> Option<Handle<Script>> {
        self.get_typed(path.as_ref())
    }

    /// Applies pending file changes.
    ///
    /// ## Returns
    /// The number of cached entries that were reloaded. Changes to files that
    /// were never requested are ignored.
    pub fn update(&mut self) -> usize {
        let changed = self.watcher.drain();
        if changed.is_empty() {
            return 0;
        }

        let keys: BTreeSet<PathBuf> = changed.iter().map(|p| self.key_for(p)).collect();
        let mut reloaded = 0;
        for key in keys {
            let Some(handle) = self.entries.get(&key).cloned() else {
                continue;
            };
            if self.reload_entry(&handle) {
                reloaded += 1;
            }
        }
        reloaded
    }

    /// Reloads `handle` in place. Returns false if the entry is currently
    /// borrowed; the reload is then queued for the next `update`.
    fn reload_entry(&self, handle: &ResourceHandle) -> bool {
        let (path, kind) = {
            let entry = handle.borrow();
            (entry.path().to_path_buf(), entry.kind())
        };

        let data = match loader::load_file(kind, &path, &self.compiler) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("Reload failed: {e}");
                None
            }
        };
        let ok = data.is_some();

        let to_notify = {
            let Some(mut entry) = handle.try_borrow_mut() else {
                log::debug!("'{}' is in use, deferring reload.", path.display());
                if let Err(e) = self.watcher.sender().send(path) {
                    log::trace!("Dropping deferred reload: {e}");
                }
                return false;
            };

            let dependents = match &mut entry.data {
                ResourceData::Shader(shader) => shader.take_dependents(),
                _ => Vec::new(),
            };
            entry.replace(data);
            match &mut entry.data {
                ResourceData::Shader(shader) => {
                    for dependent in dependents {
                        shader.add_dependent(dependent);
                    }
                    shader.live_dependents()
                }
                _ => Vec::new(),
            }
        };

        for dependent in to_notify {
            dependent.unload();
        }

        if ok {
            log::info!("Reloaded {kind} '{}'.", path.display());
        }
        true
    }

    /// A sender onto the change channel, for queuing invalidations explicitly.
    pub fn notifier(&self) -> Sender<PathBuf> {
        self.watcher.sender()
    }

    /// True if the OS file watch is active.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_active()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `path` is cached.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.entries.contains_key(&self.key_for(path.as_ref()))
    }

    /// Drops every entry. Handles held elsewhere keep their entry alive.
    pub fn clear(&mut self) {
        log::debug!("Clearing {} cached resources.", self.entries.len());
        self.entries.clear();
    }
}

/// Resolves `.` and `..` without touching the file system.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
