use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Simple entity storage using a flat Vec.
/// A solar system holds a few dozen entities; linear lookup is fine.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(256),
        }
    }

    /// Create a scene with a specific entity capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Show or hide an entity. Returns false when the ID is unknown.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.get_mut(id) {
            Some(e) => {
                e.active = active;
                true
            }
            None => false,
        }
    }

    /// All entities, in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Active entities that carry a mesh, in spawn order. This is what the
    /// renderer sees.
    pub fn visible(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.active && e.mesh.is_some())
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.tag == tag).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity, e.g. before a scene config is respawned.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mesh::{MeshColor, MeshComponent, MeshShape};
    use glam::Vec3;

    fn sphere() -> MeshComponent {
        MeshComponent::new(MeshShape::Sphere { radius: 1.0 }, MeshColor::hex(0xFDB813))
    }

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(scene.get(id).unwrap().pos, Vec3::new(10.0, 0.0, 0.0));
        assert!(scene.get(EntityId(2)).is_none());
    }

    #[test]
    fn tags_find_first_and_all() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("Earth"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("orbit-path"));
        scene.spawn(Entity::new(EntityId(3)).with_tag("orbit-path"));
        assert_eq!(scene.find_by_tag("Earth").unwrap().id, EntityId(1));
        assert_eq!(scene.find_all_by_tag("orbit-path").len(), 2);
        assert!(scene.find_by_tag("Pluto").is_none());
    }

    #[test]
    fn visible_skips_hidden_and_meshless() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_mesh(sphere()));
        scene.spawn(Entity::new(EntityId(2)).with_mesh(sphere()));
        scene.spawn(Entity::new(EntityId(3)));
        assert!(scene.set_active(EntityId(2), false));
        assert!(!scene.set_active(EntityId(9), false));

        let ids: Vec<EntityId> = scene.visible().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(1)]);
        assert_eq!(scene.len(), 3);

        scene.clear();
        assert!(scene.is_empty());
    }
}
