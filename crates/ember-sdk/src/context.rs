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

use crate::entity::{EntityId, EntityType, World};
use ember_core::math::{Mat4, Vec3};
use ember_core::{ActionBus, Camera, Config};
use ember_io::{Handle, ResourceCache, Script};
use std::cell::{Cell, RefCell};
use std::path::Path;

/// State shared between the engine loop and the native functions scripts call.
///
/// Created once by [`crate::Engine::init`] and handed out as an `Rc`. Native
/// functions may run while the loop is itself inside a script call, so every
/// mutable part sits in its own cell and borrows are kept short: no borrow is
/// held across a call into the script bridge.
pub struct EngineContext {
    resources: RefCell<ResourceCache>,
    world: RefCell<World>,
    actions: RefCell<ActionBus>,
    config: RefCell<Config>,
    camera: Cell<Camera>,
    projection: Cell<Mat4>,
    view: Cell<Mat4>,
    fps: Cell<u32>,
    ms: Cell<f64>,
    running: Cell<bool>,
}

impl EngineContext {
    /// Creates a context around an initialized resource cache and the loaded config.
    pub fn new(resources: ResourceCache, config: Config) -> Self {
        Self {
            resources: RefCell::new(resources),
            world: RefCell::new(World::new()),
            actions: RefCell::new(ActionBus::new()),
            config: RefCell::new(config),
            camera: Cell::new(Camera::default()),
            projection: Cell::new(Mat4::IDENTITY),
            view: Cell::new(Mat4::IDENTITY),
            fps: Cell::new(0),
            ms: Cell::new(0.0),
            running: Cell::new(false),
        }
    }

    /// The resource cache.
    pub fn resources(&self) -> &RefCell<ResourceCache> {
        &self.resources
    }

    /// Entity types and entities.
    pub fn world(&self) -> &RefCell<World> {
        &self.world
    }

    /// The action event bus.
    pub fn actions(&self) -> &RefCell<ActionBus> {
        &self.actions
    }

    /// The runtime key-value configuration.
    pub fn config(&self) -> &RefCell<Config> {
        &self.config
    }

    /// Current camera.
    pub fn camera(&self) -> Camera {
        self.camera.get()
    }

    /// Replaces the camera.
    pub fn set_camera(&self, camera: Camera) {
        self.camera.set(camera);
    }

    /// Projection matrix of the last renderer update.
    pub fn projection(&self) -> Mat4 {
        self.projection.get()
    }

    /// View matrix of the last renderer update.
    pub fn view(&self) -> Mat4 {
        self.view.get()
    }

    pub(crate) fn set_matrices(&self, projection: Mat4, view: Mat4) {
        self.projection.set(projection);
        self.view.set(view);
    }

    /// Frames counted in the last closed FPS window.
    pub fn fps(&self) -> u32 {
        self.fps.get()
    }

    /// Rolling average frame cost in milliseconds.
    pub fn ms(&self) -> f64 {
        self.ms.get()
    }

    pub(crate) fn set_frame_stats(&self, fps: u32, ms: f64) {
        self.fps.set(fps);
        self.ms.set(ms);
    }

    /// Whether the loop should keep running.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Starts or stops the loop. Stopping takes effect after the current tick.
    pub fn set_running(&self, running: bool) {
        self.running.set(running);
    }

    /// Registers an entity type backed by the script at `script_path`.
    ///
    /// ## Returns
    /// `false` if the cache cannot provide a script for that path. A script
    /// that exists but fails to compile is accepted; a later reload repairs it.
    pub fn create_entity_type(&self, name: &str, script_path: impl AsRef<Path>) -> bool {
        let script_path = script_path.as_ref();
        let Some(script) = self.resources.borrow_mut().get_script(script_path) else {
            log::warn!(
                "Cannot create entity type '{name}': '{}' is not a script.",
                script_path.display()
            );
            return false;
        };
        if script.is_failed() {
            log::warn!(
                "Entity type '{name}' uses '{}', which is not loaded yet.",
                script_path.display()
            );
        }
        self.world
            .borrow_mut()
            .register_type(EntityType::new(name, script));
        log::debug!("Entity type '{name}' registered.");
        true
    }

    /// Spawns an entity of the registered type `name`.
    pub fn spawn_entity(&self, name: &str, position: Vec3, rotation: Vec3) -> Option<EntityId> {
        self.world.borrow_mut().spawn(name, position, rotation)
    }

    /// Script module of the entity with `id`.
    pub fn entity_script(&self, id: EntityId) -> Option<Handle<Script>> {
        self.world
            .borrow()
            .get(id)
            .map(|entity| entity.entity_type().script().clone())
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.world.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(dir: &tempfile::TempDir) -> EngineContext {
        let cache = ResourceCache::unwatched(dir.path()).unwrap();
        EngineContext::new(cache, Config::new())
    }

    #[test]
    fn entity_type_needs_a_script_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("crate.rhai"), "fn update(id) {}").unwrap();
        let ctx = context(&dir);

        assert!(!ctx.create_entity_type("crate", "crate.png"));
        assert!(ctx.create_entity_type("crate", "crate.rhai"));

        let id = ctx.spawn_entity("crate", Vec3::ZERO, Vec3::ZERO).unwrap();
        assert_eq!(ctx.entity_count(), 1);
        assert!(ctx.entity_script(id).is_some());
        assert!(ctx.entity_script(EntityId(7)).is_none());
    }

    #[test]
    fn missing_script_still_registers_type() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        assert!(ctx.create_entity_type("ghost", "ghost.rhai"));
        assert!(ctx.spawn_entity("ghost", Vec3::ZERO, Vec3::ZERO).is_some());
    }
}
