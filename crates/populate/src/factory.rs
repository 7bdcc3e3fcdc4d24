use crate::error::PopError;
use crate::grammar::{PopDef, PopRequest};
use delve_common::{Overrides, SpriteKind};
use delve_coords::Coord;
use delve_kernel::{Sprite, WorldQuery};

/// Turns leaf requests into sprites and judges where they may stand.
pub trait EntityFactory {
    fn create_item(&self, name: &str, overrides: &Overrides) -> Result<Sprite, PopError>;

    fn create_actor(&self, role: &str, overrides: &Overrides) -> Result<Sprite, PopError>;

    /// Placement legality for `sprite` at `at`. `def` is the leaf being
    /// placed and `root` the definition the spawn started from.
    fn can_spawn_at(
        &self,
        sprite: &Sprite,
        at: Coord,
        world: &dyn WorldQuery,
        _def: &PopDef,
        _root: &PopDef,
    ) -> bool {
        sprite.can_spawn_at(at, world)
    }

    fn create(&self, request: &PopRequest) -> Result<Sprite, PopError> {
        match request.kind {
            SpriteKind::Item => self.create_item(&request.name, &request.overrides),
            SpriteKind::Actor => self.create_actor(&request.name, &request.overrides),
        }
    }
}
