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

//! The resource sum type and the handles the cache hands out.

use ember_core::math::Vec3;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

/// The closed set of resource kinds, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Decoded RGBA8 image.
    Texture,
    /// Triangulated mesh.
    Model,
    /// Shader source text.
    Shader,
    /// Decoded PCM samples.
    Sound,
    /// Compiled script module.
    Script,
}

impl ResourceKind {
    /// Determines the kind from the extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "bmp" | "tga" => Some(Self::Texture),
            "obj" => Some(Self::Model),
            "wgsl" | "glsl" | "vert" | "frag" => Some(Self::Shader),
            "wav" => Some(Self::Sound),
            "rhai" => Some(Self::Script),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Model => "model",
            Self::Shader => "shader",
            Self::Sound => "sound",
            Self::Script => "script",
        };
        f.write_str(name)
    }
}

/// CPU-side image data, always RGBA8.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

/// A triangulated, single-indexed mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals, empty if the file has none.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, empty if the file has none.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
    /// Minimum corner of the bounding box.
    pub bbox_min: Vec3,
    /// Maximum corner of the bounding box.
    pub bbox_max: Vec3,
    /// Number of triangles.
    pub num_tris: usize,
}

/// Something built from a shader that must be rebuilt when the shader goes away.
pub trait ShaderDependent {
    /// Called when a shader this object depends on is reloaded or dropped.
    fn unload(&self);
}

/// Shader source plus the objects that were built from it.
#[derive(Default)]
pub struct Shader {
    /// The shader source text.
    pub source: String,
    dependents: Vec<Weak<dyn ShaderDependent>>,
}

impl Shader {
    /// Creates a shader with no dependents.
    pub fn new(source: String) -> Self {
        Self {
            source,
            dependents: Vec::new(),
        }
    }

    /// Registers `dependent` unless it is already registered. Dead entries are pruned.
    pub fn add_dependent(&mut self, dependent: Weak<dyn ShaderDependent>) {
        self.dependents.retain(|d| d.strong_count() > 0);
        if !self.dependents.iter().any(|d| d.ptr_eq(&dependent)) {
            self.dependents.push(dependent);
        }
    }

    /// Number of live dependents.
    pub fn dependent_count(&self) -> usize {
        self.dependents.iter().filter(|d| d.strong_count() > 0).count()
    }

    pub(crate) fn take_dependents(&mut self) -> Vec<Weak<dyn ShaderDependent>> {
        std::mem::take(&mut self.dependents)
    }

    pub(crate) fn live_dependents(&self) -> Vec<Rc<dyn ShaderDependent>> {
        self.dependents.iter().filter_map(Weak::upgrade).collect()
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("source_len", &self.source.len())
            .field("dependents", &self.dependent_count())
            .finish()
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        for dependent in self.live_dependents() {
            dependent.unload();
        }
    }
}

/// Decoded audio, samples normalised to `[-1, 1]` and interleaved by channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sound {
    /// Interleaved samples.
    pub samples: Vec<f32>,
    /// Number of channels.
    pub channels: u16,
    /// Samples per second per channel.
    pub sample_rate: u32,
}

/// A compiled script module.
#[derive(Debug, Clone)]
pub struct Script {
    /// The script source text.
    pub source: String,
    ast: Rc<rhai::AST>,
}

impl Script {
    /// Wraps a compiled module.
    pub fn new(source: String, ast: rhai::AST) -> Self {
        Self {
            source,
            ast: Rc::new(ast),
        }
    }

    /// The compiled module. Cloning the `Rc` lets callers run it without
    /// keeping the resource borrowed.
    pub fn ast(&self) -> Rc<rhai::AST> {
        Rc::clone(&self.ast)
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new(String::new(), rhai::AST::empty())
    }
}

/// The payload of a [`Resource`].
#[derive(Debug)]
pub enum ResourceData {
    /// See [`Texture`].
    Texture(Texture),
    /// See [`Model`].
    Model(Model),
    /// See [`Shader`].
    Shader(Shader),
    /// See [`Sound`].
    Sound(Sound),
    /// See [`Script`].
    Script(Script),
}

impl ResourceData {
    /// The kind of this payload.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Texture(_) => ResourceKind::Texture,
            Self::Model(_) => ResourceKind::Model,
            Self::Shader(_) => ResourceKind::Shader,
            Self::Sound(_) => ResourceKind::Sound,
            Self::Script(_) => ResourceKind::Script,
        }
    }

    /// An empty payload standing in for a failed load.
    pub(crate) fn placeholder(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Texture => Self::Texture(Texture::default()),
            ResourceKind::Model => Self::Model(Model::default()),
            ResourceKind::Shader => Self::Shader(Shader::default()),
            ResourceKind::Sound => Self::Sound(Sound::default()),
            ResourceKind::Script => Self::Script(Script::default()),
        }
    }
}

/// One cache entry.
///
/// A resource is either loaded (`failed == false`) or a failed sentinel whose
/// payload is an empty placeholder that must not be used.
#[derive(Debug)]
pub struct Resource {
    path: PathBuf,
    failed: bool,
    generation: u64,
    pub(crate) data: ResourceData,
}

impl Resource {
    pub(crate) fn loaded(path: PathBuf, data: ResourceData) -> Self {
        Self {
            path,
            failed: false,
            generation: 0,
            data,
        }
    }

    pub(crate) fn failed(path: PathBuf, kind: ResourceKind) -> Self {
        Self {
            path,
            failed: true,
            generation: 0,
            data: ResourceData::placeholder(kind),
        }
    }

    /// Replaces the payload after a reload. `None` marks the entry failed.
    pub(crate) fn replace(&mut self, data: Option<ResourceData>) {
        let kind = self.kind();
        self.failed = data.is_none();
        self.data = data.unwrap_or_else(|| ResourceData::placeholder(kind));
        self.generation += 1;
    }

    /// Canonical path the entry is keyed by.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The kind of the entry.
    pub fn kind(&self) -> ResourceKind {
        self.data.kind()
    }

    /// True while the entry holds no usable payload.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Incremented every time the entry is reloaded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The payload, or `None` for a failed entry.
    pub fn data(&self) -> Option<&ResourceData> {
        (!self.failed).then_some(&self.data)
    }
}

/// An untyped, shared handle onto a cache entry.
///
/// The cache reloads entries in place, so a handle obtained before a reload
/// observes the new content.
#[derive(Clone)]
pub struct ResourceHandle(Rc<RefCell<Resource>>);

impl ResourceHandle {
    pub(crate) fn new(resource: Resource) -> Self {
        Self(Rc::new(RefCell::new(resource)))
    }

    /// Borrows the entry.
    pub fn borrow(&self) -> Ref<'_, Resource> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Resource> {
        self.0.borrow_mut()
    }

    pub(crate) fn try_borrow_mut(&self) -> Option<RefMut<'_, Resource>> {
        self.0.try_borrow_mut().ok()
    }

    /// The kind of the entry.
    pub fn kind(&self) -> ResourceKind {
        self.0.borrow().kind()
    }

    /// True while the entry holds no usable payload.
    pub fn is_failed(&self) -> bool {
        self.0.borrow().is_failed()
    }

    /// Reload counter of the entry.
    pub fn generation(&self) -> u64 {
        self.0.borrow().generation()
    }

    /// Canonical path of the entry.
    pub fn path(&self) -> PathBuf {
        self.0.borrow().path().to_path_buf()
    }

    /// Returns true if both handles point at the same entry.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Converts to a typed handle if the entry has kind `T`.
    pub fn typed<T: ResourceType>(&self) -> Option<Handle<T>> {
        (self.kind() == T::KIND).then(|| Handle {
            entry: self.clone(),
            _marker: PhantomData,
        })
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(r) => f
                .debug_struct("ResourceHandle")
                .field("path", &r.path)
                .field("kind", &r.kind())
                .field("failed", &r.failed)
                .field("generation", &r.generation)
                .finish(),
            Err(_) => f.write_str("ResourceHandle(<reloading>)"),
        }
    }
}

/// Implemented by the payload types that can be viewed through a [`Handle`].
pub trait ResourceType: Sized + 'static {
    /// The kind this payload type corresponds to.
    const KIND: ResourceKind;

    /// Extracts the payload from the sum type.
    fn from_data(data: &ResourceData) -> Option<&Self>;
}

macro_rules! impl_resource_type {
    ($ty:ident) => {
        impl ResourceType for $ty {
            const KIND: ResourceKind = ResourceKind::$ty;

            fn from_data(data: &ResourceData) -> Option<&Self> {
                match data {
                    ResourceData::$ty(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_resource_type!(Texture);
impl_resource_type!(Model);
impl_resource_type!(Shader);
impl_resource_type!(Sound);
impl_resource_type!(Script);

/// A typed handle onto a cache entry of kind `T`.
pub struct Handle<T: ResourceType> {
    entry: ResourceHandle,
    _marker: PhantomData<T>,
}

impl<T: ResourceType> Handle<T> {
    /// Borrows the payload, or returns `None` while the entry is failed.
    pub fn get(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.entry.borrow(), |r| {
            if r.failed {
                None
            } else {
                T::from_data(&r.data)
            }
        })
        .ok()
    }

    /// True while the entry holds no usable payload.
    pub fn is_failed(&self) -> bool {
        self.entry.is_failed()
    }

    /// Reload counter of the entry.
    pub fn generation(&self) -> u64 {
        self.entry.generation()
    }

    /// Canonical path of the entry.
    pub fn path(&self) -> PathBuf {
        self.entry.path()
    }

    /// Returns true if both handles point at the same entry.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.entry.ptr_eq(&other.entry)
    }

    /// The untyped handle.
    pub fn untyped(&self) -> &ResourceHandle {
        &self.entry
    }
}

impl<T: ResourceType> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ResourceType> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.entry).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Program {
        unloads: Cell<usize>,
    }

    impl ShaderDependent for Program {
        fn unload(&self) {
            self.unloads.set(self.unloads.get() + 1);
        }
    }

    #[test]
    fn kind_from_extension_is_case_insensitive() {
        assert_eq!(
            ResourceKind::from_path(Path::new("a/b.PNG")),
            Some(ResourceKind::Texture)
        );
        assert_eq!(
            ResourceKind::from_path(Path::new("tree.obj")),
            Some(ResourceKind::Model)
        );
        assert_eq!(
            ResourceKind::from_path(Path::new("lit.Frag")),
            Some(ResourceKind::Shader)
        );
        assert_eq!(
            ResourceKind::from_path(Path::new("boom.wav")),
            Some(ResourceKind::Sound)
        );
        assert_eq!(
            ResourceKind::from_path(Path::new("main.rhai")),
            Some(ResourceKind::Script)
        );
        assert_eq!(ResourceKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(ResourceKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn failed_entry_has_no_typed_view() {
        let handle = ResourceHandle::new(Resource::failed(
            PathBuf::from("/data/missing.png"),
            ResourceKind::Texture,
        ));
        let texture = handle.typed::<Texture>().expect("kind matches");
        assert!(texture.is_failed());
        assert!(texture.get().is_none());
        assert!(handle.typed::<Model>().is_none());
        assert!(handle.borrow().data().is_none());
    }

    #[test]
    fn replace_bumps_generation_and_clears_failure() {
        let handle = ResourceHandle::new(Resource::failed(
            PathBuf::from("/data/a.wav"),
            ResourceKind::Sound,
        ));
        handle.borrow_mut().replace(Some(ResourceData::Sound(Sound {
            samples: vec![0.5],
            channels: 1,
            sample_rate: 8000,
        })));
        let sound = handle.typed::<Sound>().unwrap();
        assert_eq!(sound.generation(), 1);
        assert_eq!(sound.get().map(|s| s.sample_rate), Some(8000));
    }

    #[test]
    fn shader_drop_notifies_live_dependents_once() {
        let program = Rc::new(Program {
            unloads: Cell::new(0),
        });
        let weak: Weak<dyn ShaderDependent> = Rc::downgrade(&program) as Weak<dyn ShaderDependent>;

        let mut shader = Shader::new("void main() {}".to_string());
        shader.add_dependent(weak.clone());
        shader.add_dependent(weak);
        assert_eq!(shader.dependent_count(), 1);

        drop(shader);
        assert_eq!(program.unloads.get(), 1);
    }
}
