//! Entities supplied by the game side and drawn by the entity pass.

use slotmap::{new_key_type, SlotMap};

use crate::texture::Texture;
use crate::types::TilePos;

new_key_type! {
    /// Stable handle to an entity in a [`Scene`].
    pub struct EntityId;
}

/// One texture drawn at an offset (in tiles) from the entity's translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub offset: TilePos,
    pub texture: Texture,
}

impl Sprite {
    pub fn new(offset: TilePos, texture: Texture) -> Self {
        Self { offset, texture }
    }
}

/// A scene entity with optional capabilities.
///
/// An entity without `translation` draws its sprites at their raw offsets; one
/// without `sprites` is invisible to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub translation: Option<TilePos>,
    pub sprites: Option<Vec<Sprite>>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, pos: TilePos) -> Self {
        self.translation = Some(pos);
        self
    }

    pub fn with_sprite(mut self, offset: TilePos, texture: Texture) -> Self {
        self.sprites
            .get_or_insert_with(Vec::new)
            .push(Sprite::new(offset, texture));
        self
    }

    /// Absolute tile-space positions and textures of everything this entity draws.
    pub fn placed_sprites(&self) -> impl Iterator<Item = (TilePos, &Texture)> + '_ {
        let base = self.translation.unwrap_or_default();
        self.sprites
            .iter()
            .flatten()
            .map(move |s| (s.offset.offset(base.x, base.y), &s.texture))
    }
}

/// Ordered collection of entities.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entities: SlotMap<EntityId, Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.entities.insert(entity)
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn placed_sprites_add_translation() {
        let tex = Texture::solid(1, 1, Rgba::rgb(1, 1, 1));
        let e = Entity::new()
            .with_translation(TilePos::new(2.0, 3.0))
            .with_sprite(TilePos::new(0.5, 0.0), tex.clone())
            .with_sprite(TilePos::new(1.0, 1.0), tex);
        let placed: Vec<_> = e.placed_sprites().map(|(p, _)| p).collect();
        assert_eq!(placed, vec![TilePos::new(2.5, 3.0), TilePos::new(3.0, 4.0)]);
    }

    #[test]
    fn entity_without_sprites_draws_nothing() {
        let e = Entity::new().with_translation(TilePos::new(1.0, 1.0));
        assert_eq!(e.placed_sprites().count(), 0);
    }

    #[test]
    fn despawned_ids_do_not_resolve() {
        let mut scene = Scene::new();
        let id = scene.spawn(Entity::new());
        assert!(scene.get(id).is_some());
        scene.despawn(id);
        assert!(scene.get(id).is_none());
        assert!(scene.is_empty());
    }
}
