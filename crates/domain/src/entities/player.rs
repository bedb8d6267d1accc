//! Player entity - progression tracking
//!
//! A player deduplicates encounters and quests by entity identity: ids are
//! unique per live entity, so id-keyed maps over shared references give
//! exactly reference-identity semantics. Two Mitas sharing a name remain
//! distinct encounters.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::common::sync::lock_unpoisoned;
use crate::entities::mita::SharedMita;
use crate::entities::quest::{CompletionOutcome, QuestLedger, SharedQuest};
use crate::entities::traits::Trait;
use crate::entity::{validate_name, Entity};
use crate::error::DomainError;
use crate::ids::{EntityId, IdentityTag};

/// Shared handle on a player.
pub type SharedPlayer = Arc<Mutex<Player>>;

/// Result of [`Player::encounter_mita`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncounterOutcome {
    /// First time this Mita (by identity) is seen; its active quests were
    /// taken on.
    New { mita: String },
    /// Already encountered; nothing changed.
    AlreadySeen { mita: String },
}

impl fmt::Display for EncounterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New { mita } => write!(f, "Вы встретили новую Миту: {}", mita),
            Self::AlreadySeen { mita } => write!(f, "Вы снова встретили Миту: {}", mita),
        }
    }
}

/// Result of [`Player::complete_quest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCompletion {
    /// The quest completed; it moved to the completed set and the player
    /// leveled up.
    Completed {
        quest: String,
        reward: String,
        level: u32,
    },
    /// The quest was found among active but had already been completed
    /// elsewhere; nothing changed.
    AlreadyCompleted { quest: String },
    /// No active quest carries this name.
    NotActive,
}

impl fmt::Display for PlayerCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed {
                quest,
                reward,
                level,
            } => write!(
                f,
                "Задание '{}' выполнено! Награда: {}\nУровень повышен до {}!",
                quest, reward, level
            ),
            Self::AlreadyCompleted { quest } => {
                write!(f, "Задание '{}' уже выполнено", quest)
            }
            Self::NotActive => write!(f, "Задание не найдено среди активных"),
        }
    }
}

/// Per-player progression record.
#[derive(Debug)]
pub struct Player {
    tag: IdentityTag,
    name: String,
    level: u32,
    encountered: HashMap<EntityId, SharedMita>,
    active: HashMap<EntityId, SharedQuest>,
    completed: HashMap<EntityId, SharedQuest>,
    trait_levels: HashMap<String, u32>,
}

impl Player {
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 100;

    /// Create a level-1 player.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the name is shorter than two
    /// characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            tag: IdentityTag::allocate(),
            name,
            level: Self::MIN_LEVEL,
            encountered: HashMap::new(),
            active: HashMap::new(),
            completed: HashMap::new(),
            trait_levels: HashMap::new(),
        })
    }

    /// Set the starting level, clamped to `[1, 100]`.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.clamp(Self::MIN_LEVEL, Self::MAX_LEVEL);
        self
    }

    pub fn into_shared(self) -> SharedPlayer {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> EntityId {
        self.tag.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn encountered_count(&self) -> usize {
        self.encountered.len()
    }

    pub fn active_quest_count(&self) -> usize {
        self.active.len()
    }

    pub fn completed_quest_count(&self) -> usize {
        self.completed.len()
    }

    pub fn trait_levels(&self) -> &HashMap<String, u32> {
        &self.trait_levels
    }

    /// Whether a quest reference (by identity) sits in the active set.
    pub fn has_active_quest(&self, quest: &SharedQuest) -> bool {
        self.active.contains_key(&lock_unpoisoned(quest).id())
    }

    /// Meet a Mita. On a first encounter (by identity) every active quest
    /// of the Mita joins the player's active set; meeting the same Mita
    /// again changes nothing.
    pub fn encounter_mita(&mut self, mita: &SharedMita) -> EncounterOutcome {
        let (id, name, active_quests) = {
            let guard = lock_unpoisoned(mita);
            (
                guard.id(),
                guard.name().to_string(),
                guard.active_quests().collect::<Vec<_>>(),
            )
        };
        if self.encountered.contains_key(&id) {
            return EncounterOutcome::AlreadySeen { mita: name };
        }
        self.encountered.insert(id, Arc::clone(mita));
        for quest in active_quests {
            let quest_id = lock_unpoisoned(&quest).id();
            self.active.entry(quest_id).or_insert(quest);
        }
        tracing::debug!(player = %self.name, mita = %name, "new mita encountered");
        EncounterOutcome::New { mita: name }
    }

    /// Complete an active quest by exact name: the reference moves from the
    /// active set to the completed set and the player gains a level. A
    /// quest completed elsewhere stays put and nothing changes.
    pub fn complete_quest(&mut self, name: &str) -> PlayerCompletion {
        let found = self
            .active
            .iter()
            .find(|(_, quest)| lock_unpoisoned(quest).name() == name)
            .map(|(id, quest)| (*id, Arc::clone(quest)));
        let Some((id, quest)) = found else {
            return PlayerCompletion::NotActive;
        };
        match QuestLedger::global().complete(&quest) {
            CompletionOutcome::AlreadyCompleted { quest } => {
                PlayerCompletion::AlreadyCompleted { quest }
            }
            CompletionOutcome::Completed {
                quest: quest_name,
                reward,
            } => {
                self.active.remove(&id);
                self.completed.insert(id, quest);
                self.level_up();
                tracing::debug!(player = %self.name, quest = %quest_name, level = self.level, "quest completed");
                PlayerCompletion::Completed {
                    quest: quest_name,
                    reward,
                    level: self.level,
                }
            }
        }
    }

    /// Gain one level; false once the cap is reached.
    pub fn level_up(&mut self) -> bool {
        if self.level < Self::MAX_LEVEL {
            self.level += 1;
            true
        } else {
            false
        }
    }

    /// Set or overwrite the player's level in a trait.
    pub fn add_trait(&mut self, trait_: &Trait, level: u32) {
        self.trait_levels.insert(trait_.name().to_string(), level);
    }

    /// Shift the level by a signed delta, clamped to `[1, 100]`. Returns
    /// the new level.
    pub fn adjust_level(&mut self, delta: i64) -> u32 {
        let level = i64::from(self.level) + delta;
        let clamped = level.clamp(i64::from(Self::MIN_LEVEL), i64::from(Self::MAX_LEVEL));
        self.level = u32::try_from(clamped).unwrap_or(Self::MIN_LEVEL);
        self.level
    }

    /// [`Player::adjust_level`] for untyped deltas.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidLevel` when the value is not an integer.
    pub fn adjust_level_value(&mut self, delta: &serde_json::Value) -> Result<u32, DomainError> {
        let delta = delta.as_i64().ok_or_else(|| {
            DomainError::invalid_level(format!("level delta must be an integer, got {}", delta))
        })?;
        Ok(self.adjust_level(delta))
    }

    /// Pure formatting: address a message to the player.
    pub fn send_message(&self, text: &str) -> String {
        format!("Сообщение для {}: {}", self.name, text)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Игрок: {} (Уровень: {}/{})\nАктивные задания: {}\nЗавершенные задания: {}",
            self.name,
            self.level,
            Self::MAX_LEVEL,
            self.active.len(),
            self.completed.len()
        )
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.tag.id()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        validate_name(name)?;
        self.name = name.to_string();
        Ok(())
    }

    fn info(&self) -> String {
        self.to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
