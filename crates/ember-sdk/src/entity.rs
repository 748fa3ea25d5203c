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

//! The entity layer: script-backed entity types and their instances.

use ember_core::math::Vec3;
use ember_io::{Handle, Script};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Index of an entity in spawn order. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named kind of entity whose behaviour lives in a script module.
#[derive(Debug)]
pub struct EntityType {
    name: String,
    script: Handle<Script>,
}

impl EntityType {
    /// Pairs `name` with the script module behind `script`.
    pub fn new(name: impl Into<String>, script: Handle<Script>) -> Self {
        Self {
            name: name.into(),
            script,
        }
    }

    /// The registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The script module driving entities of this type.
    pub fn script(&self) -> &Handle<Script> {
        &self.script
    }
}

/// An instance of an [`EntityType`] with a transform.
#[derive(Debug, Clone)]
pub struct Entity {
    entity_type: Rc<EntityType>,
    /// World position.
    pub position: Vec3,
    /// Euler rotation in degrees.
    pub rotation: Vec3,
}

impl Entity {
    /// Creates an entity of `entity_type` at the given transform.
    pub fn spawn(entity_type: Rc<EntityType>, position: Vec3, rotation: Vec3) -> Self {
        Self {
            entity_type,
            position,
            rotation,
        }
    }

    /// The type this entity was spawned from.
    pub fn entity_type(&self) -> &Rc<EntityType> {
        &self.entity_type
    }
}

/// Registry of entity types and the dense sequence of live entities.
#[derive(Debug, Default)]
pub struct World {
    types: HashMap<String, Rc<EntityType>>,
    entities: Vec<Entity>,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity_type` under its name, replacing any previous
    /// registration. Entities already spawned keep the type they were spawned with.
    pub fn register_type(&mut self, entity_type: EntityType) -> Rc<EntityType> {
        let entity_type = Rc::new(entity_type);
        if self
            .types
            .insert(entity_type.name.clone(), Rc::clone(&entity_type))
            .is_some()
        {
            log::warn!("Entity type '{}' was registered again.", entity_type.name);
        }
        entity_type
    }

    /// Looks up a registered type.
    pub fn entity_type(&self, name: &str) -> Option<&Rc<EntityType>> {
        self.types.get(name)
    }

    /// Spawns an entity of the type registered as `name`.
    ///
    /// ## Returns
    /// The new entity's id, or `None` (with a warning, leaving the world
    /// untouched) when no such type is registered.
    pub fn spawn(&mut self, name: &str, position: Vec3, rotation: Vec3) -> Option<EntityId> {
        let Some(entity_type) = self.types.get(name) else {
            log::warn!("Cannot spawn entity: unknown entity type '{name}'.");
            return None;
        };
        let id = EntityId(self.entities.len());
        self.entities
            .push(Entity::spawn(Rc::clone(entity_type), position, rotation));
        Some(id)
    }

    /// The entity with `id`, if it exists.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    /// Mutable access to the entity with `id`.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    /// Entities in spawn order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entity has been spawned.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Destroys every entity and type registration.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.types.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_io::ResourceCache;

    fn script_handle(dir: &tempfile::TempDir) -> Handle<Script> {
        std::fs::write(dir.path().join("crate.rhai"), "fn update(id) {}").unwrap();
        let mut cache = ResourceCache::unwatched(dir.path()).unwrap();
        cache.get_script("crate.rhai").unwrap()
    }

    #[test]
    fn spawn_assigns_ids_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = World::new();
        world.register_type(EntityType::new("crate", script_handle(&dir)));

        let a = world.spawn("crate", Vec3::ZERO, Vec3::ZERO).unwrap();
        let b = world
            .spawn("crate", Vec3::new(1.0, 2.0, 3.0), Vec3::Y)
            .unwrap();

        assert_eq!(a, EntityId(0));
        assert_eq!(b, EntityId(1));
        assert_eq!(world.get(b).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world.get(b).unwrap().entity_type().name(), "crate");
    }

    #[test]
    fn unknown_type_leaves_world_untouched() {
        let mut world = World::new();
        assert_eq!(world.spawn("nonexistent", Vec3::ZERO, Vec3::ZERO), None);
        assert!(world.is_empty());
    }

    #[test]
    fn re_registering_keeps_spawned_entities_on_old_type() {
        let dir = tempfile::tempdir().unwrap();
        let script = script_handle(&dir);
        let mut world = World::new();
        let first = world.register_type(EntityType::new("crate", script.clone()));
        let id = world.spawn("crate", Vec3::ZERO, Vec3::ZERO).unwrap();
        let second = world.register_type(EntityType::new("crate", script));

        assert!(Rc::ptr_eq(world.get(id).unwrap().entity_type(), &first));
        assert!(Rc::ptr_eq(world.entity_type("crate").unwrap(), &second));
        assert_eq!(world.type_count(), 1);

        world.clear();
        assert!(world.is_empty());
        assert_eq!(world.type_count(), 0);
    }
}
