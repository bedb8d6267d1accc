//! World registry - the process-wide aggregator of Mitas and players
//!
//! The world is a lazily-initialized singleton: every call to
//! [`World::instance`] yields the same registry, and state survives across
//! call sites. Insertion order is kept for iteration; membership is
//! deduplicated by entity identity.

use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::common::sync::lock_unpoisoned;
use crate::entities::mita::SharedMita;
use crate::entities::player::SharedPlayer;
use crate::ids::{EntityId, IdentityRegistry};

static WORLD: Lazy<World> = Lazy::new(World::default);

/// One entry of [`World::all_entities`].
#[derive(Debug, Clone)]
pub enum WorldEntity {
    Mita(SharedMita),
    Player(SharedPlayer),
}

impl WorldEntity {
    pub fn id(&self) -> EntityId {
        match self {
            Self::Mita(mita) => lock_unpoisoned(mita).id(),
            Self::Player(player) => lock_unpoisoned(player).id(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Mita(mita) => lock_unpoisoned(mita).name().to_string(),
            Self::Player(player) => lock_unpoisoned(player).name().to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    mitas: Vec<SharedMita>,
    players: Vec<SharedPlayer>,
}

/// The game world. Obtain it through [`World::instance`].
#[derive(Debug, Default)]
pub struct World {
    inner: Mutex<Registry>,
}

impl World {
    /// The process-wide world. First access constructs it; later accesses
    /// return the same instance with its state intact.
    pub fn instance() -> &'static World {
        &WORLD
    }

    /// Add a Mita. Re-adding the same entity (by identity) is a no-op.
    pub fn add_mita(&self, mita: &SharedMita) {
        let id = lock_unpoisoned(mita).id();
        let mut inner = lock_unpoisoned(&self.inner);
        if inner.mitas.iter().any(|m| lock_unpoisoned(m).id() == id) {
            return;
        }
        inner.mitas.push(Arc::clone(mita));
        tracing::debug!(id = %id, "mita added to world");
    }

    /// Add a player. Re-adding the same entity (by identity) is a no-op.
    pub fn add_player(&self, player: &SharedPlayer) {
        let id = lock_unpoisoned(player).id();
        let mut inner = lock_unpoisoned(&self.inner);
        if inner.players.iter().any(|p| lock_unpoisoned(p).id() == id) {
            return;
        }
        inner.players.push(Arc::clone(player));
        tracing::debug!(id = %id, "player added to world");
    }

    /// First Mita with this exact name, in insertion order.
    pub fn find_mita_by_name(&self, name: &str) -> Option<SharedMita> {
        lock_unpoisoned(&self.inner)
            .mitas
            .iter()
            .find(|m| lock_unpoisoned(m).name() == name)
            .map(Arc::clone)
    }

    /// First player with this exact name, in insertion order.
    pub fn find_player_by_name(&self, name: &str) -> Option<SharedPlayer> {
        lock_unpoisoned(&self.inner)
            .players
            .iter()
            .find(|p| lock_unpoisoned(p).name() == name)
            .map(Arc::clone)
    }

    pub fn mita_count(&self) -> usize {
        lock_unpoisoned(&self.inner).mitas.len()
    }

    pub fn player_count(&self) -> usize {
        lock_unpoisoned(&self.inner).players.len()
    }

    /// All registered entities: Mitas in insertion order, then players in
    /// insertion order. Each call takes a fresh snapshot, so the iteration
    /// is safe to repeat.
    pub fn all_entities(&self) -> impl Iterator<Item = WorldEntity> {
        let inner = lock_unpoisoned(&self.inner);
        let entities: Vec<WorldEntity> = inner
            .mitas
            .iter()
            .map(|m| WorldEntity::Mita(Arc::clone(m)))
            .chain(
                inner
                    .players
                    .iter()
                    .map(|p| WorldEntity::Player(Arc::clone(p))),
            )
            .collect();
        entities.into_iter()
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Игровой мир (Singleton)\nМиты: {}\nИгроки: {}\nВсего сущностей: {}",
            self.mita_count(),
            self.player_count(),
            IdentityRegistry::global().live_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::mita::Mita;
    use crate::entities::player::Player;

    fn mita(name: &str) -> SharedMita {
        Mita::new(name, "Описание", Vec::new(), Vec::new())
            .expect("valid mita")
            .into_shared()
    }

    #[test]
    fn test_instance_is_a_singleton() {
        let first = World::instance();
        let second = World::instance();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_state_is_shared_across_accesses() {
        let added = mita("Зеркальная Мита");
        World::instance().add_mita(&added);
        let found = World::instance()
            .find_mita_by_name("Зеркальная Мита")
            .expect("visible through the other access");
        let found_id = lock_unpoisoned(&found).id();
        let added_id = lock_unpoisoned(&added).id();
        assert_eq!(found_id, added_id);
    }

    #[test]
    fn test_add_mita_dedups_by_identity() {
        let world = World::instance();
        let m = mita("Мита-дубль");
        let before = world.mita_count();
        world.add_mita(&m);
        world.add_mita(&m);
        assert_eq!(world.mita_count(), before + 1);
    }

    #[test]
    fn test_same_name_distinct_identity_both_kept() {
        let world = World::instance();
        let before = world.mita_count();
        world.add_mita(&mita("Тёзка"));
        world.add_mita(&mita("Тёзка"));
        assert_eq!(world.mita_count(), before + 2);
    }

    #[test]
    fn test_find_player_by_name() {
        let world = World::instance();
        let player = Player::new("Искатель").expect("valid player").into_shared();
        world.add_player(&player);
        assert!(world.find_player_by_name("Искатель").is_some());
        assert!(world.find_player_by_name("Никто такой").is_none());
    }

    #[test]
    fn test_all_entities_mitas_before_players_and_restartable() {
        let world = World::instance();
        let m = mita("Порядковая Мита");
        let p = Player::new("Порядковый игрок")
            .expect("valid player")
            .into_shared();
        world.add_mita(&m);
        world.add_player(&p);

        let order: Vec<String> = world.all_entities().map(|e| e.name()).collect();
        let mita_pos = order
            .iter()
            .position(|n| n == "Порядковая Мита")
            .expect("mita listed");
        let player_pos = order
            .iter()
            .position(|n| n == "Порядковый игрок")
            .expect("player listed");
        assert!(mita_pos < player_pos);

        // A second invocation yields a fresh pass
        let again: Vec<String> = world.all_entities().map(|e| e.name()).collect();
        assert_eq!(order, again);
    }
}
