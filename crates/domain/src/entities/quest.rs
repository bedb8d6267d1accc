//! Quest entity - objectives with difficulty ordering and one-way completion
//!
//! Quests are shared mutable references ([`SharedQuest`]): a Mita carries
//! them, a player completes them, and both sides observe the same state.
//! Every construction records the quest's difficulty in the process-wide
//! [`QuestLedger`]; later constructions under the same name overwrite the
//! ledger entry, never prior quest objects.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::common::sync::lock_unpoisoned;
use crate::entity::{validate_name, Entity};
use crate::error::DomainError;
use crate::ids::{EntityId, IdentityTag};

/// Shared handle on a quest.
pub type SharedQuest = Arc<Mutex<Quest>>;

/// Quest difficulty, a fixed ordered enumeration with an unranked fallback.
///
/// Ranks: Легкий=1, Обычный=2, Сложный=3, Очень сложный=4. Anything else is
/// [`Difficulty::Unranked`] and sorts below every known rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    VeryHard,
    Unranked(String),
}

impl Difficulty {
    /// Ordering rank; unranked difficulties rank 0.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Unranked(_) => 0,
            Self::Easy => 1,
            Self::Normal => 2,
            Self::Hard => 3,
            Self::VeryHard => 4,
        }
    }

    /// Parse a difficulty label; unknown labels become `Unranked`.
    pub fn parse(label: &str) -> Self {
        match label {
            "Легкий" => Self::Easy,
            "Обычный" => Self::Normal,
            "Сложный" => Self::Hard,
            "Очень сложный" => Self::VeryHard,
            other => Self::Unranked(other.to_string()),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "Легкий"),
            Self::Normal => write!(f, "Обычный"),
            Self::Hard => write!(f, "Сложный"),
            Self::VeryHard => write!(f, "Очень сложный"),
            Self::Unranked(label) => write!(f, "{}", label),
        }
    }
}

impl From<String> for Difficulty {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<&str> for Difficulty {
    fn from(label: &str) -> Self {
        Self::parse(label)
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.to_string()
    }
}

/// Result of a completion attempt. Completing twice is a routine outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The quest just transitioned Active → Completed.
    Completed { quest: String, reward: String },
    /// The quest was already completed; nothing changed.
    AlreadyCompleted { quest: String },
}

impl CompletionOutcome {
    pub fn is_newly_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

impl fmt::Display for CompletionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed { quest, reward } => {
                write!(f, "Задание '{}' выполнено! Награда: {}", quest, reward)
            }
            Self::AlreadyCompleted { quest } => {
                write!(f, "Задание '{}' уже выполнено", quest)
            }
        }
    }
}

/// An objective with a reward and a difficulty.
#[derive(Debug)]
pub struct Quest {
    tag: IdentityTag,
    name: String,
    description: String,
    reward: String,
    completed: bool,
    difficulty: Difficulty,
}

impl Quest {
    /// Create an active quest with the default difficulty and record it in
    /// the ledger.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the name is shorter than two
    /// characters.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        reward: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        validate_name(&name)?;
        let quest = Self {
            tag: IdentityTag::allocate(),
            name,
            description: description.into(),
            reward: reward.into(),
            completed: false,
            difficulty: Difficulty::default(),
        };
        QuestLedger::global().register(&quest.name, &quest.difficulty);
        Ok(quest)
    }

    /// Set the difficulty; the ledger entry for this name is overwritten.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        QuestLedger::global().register(&self.name, &difficulty);
        self.difficulty = difficulty;
        self
    }

    /// Set the initial completion state.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn into_shared(self) -> SharedQuest {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> EntityId {
        self.tag.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reward(&self) -> &str {
        &self.reward
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    /// Transition Active → Completed. Idempotent-safe: a second call reports
    /// [`CompletionOutcome::AlreadyCompleted`] and mutates nothing.
    pub fn complete(&mut self) -> CompletionOutcome {
        if self.completed {
            return CompletionOutcome::AlreadyCompleted {
                quest: self.name.clone(),
            };
        }
        self.completed = true;
        tracing::debug!(quest = %self.name, "quest completed");
        CompletionOutcome::Completed {
            quest: self.name.clone(),
            reward: self.reward.clone(),
        }
    }

    /// Plain-data image for structured serialization.
    pub fn to_snapshot(&self) -> QuestSnapshot {
        QuestSnapshot {
            name: self.name.clone(),
            description: self.description.clone(),
            reward: self.reward.clone(),
            completed: self.completed,
            difficulty: self.difficulty.clone(),
        }
    }

    /// Reconstruct a quest from a snapshot through the normal validating
    /// constructor: fresh id, difficulty re-registered in the ledger.
    pub fn from_snapshot(snapshot: QuestSnapshot) -> Result<Self, DomainError> {
        Ok(
            Self::new(snapshot.name, snapshot.description, snapshot.reward)?
                .with_completed(snapshot.completed)
                .with_difficulty(snapshot.difficulty),
        )
    }
}

impl fmt::Display for Quest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.completed { "Выполнено" } else { "Активно" };
        write!(f, "[{}] {}: {}", status, self.name, self.description)
    }
}

impl Entity for Quest {
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
        let status = if self.completed { "Выполнено" } else { "Активно" };
        format!(
            "[{}] {}: {} (Сложность: {})",
            status, self.name, self.description, self.difficulty
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Serializable image of a [`Quest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSnapshot {
    pub name: String,
    pub description: String,
    pub reward: String,
    pub completed: bool,
    pub difficulty: Difficulty,
}

static LEDGER: Lazy<QuestLedger> = Lazy::new(QuestLedger::new);

/// Process-wide quest bookkeeping: name → difficulty, ordering, substring
/// search, and completion.
#[derive(Debug)]
pub struct QuestLedger {
    difficulties: Mutex<HashMap<String, Difficulty>>,
}

impl QuestLedger {
    fn new() -> Self {
        Self {
            difficulties: Mutex::new(HashMap::new()),
        }
    }

    pub fn global() -> &'static QuestLedger {
        &LEDGER
    }

    /// Record a quest's difficulty; last write wins for duplicate names.
    pub fn register(&self, name: &str, difficulty: &Difficulty) {
        lock_unpoisoned(&self.difficulties).insert(name.to_string(), difficulty.clone());
        tracing::debug!(quest = %name, difficulty = %difficulty, "quest registered");
    }

    /// Difficulty last recorded under a name.
    pub fn difficulty_of(&self, name: &str) -> Option<Difficulty> {
        lock_unpoisoned(&self.difficulties).get(name).cloned()
    }

    /// Order two quests by difficulty rank: negative when `a` ranks below
    /// `b`, zero on equal ranks.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Comparison` when either operand is not a
    /// [`Quest`].
    pub fn compare(&self, a: &dyn Entity, b: &dyn Entity) -> Result<i32, DomainError> {
        let a = a
            .as_any()
            .downcast_ref::<Quest>()
            .ok_or_else(|| DomainError::comparison("only quests can be ordered"))?;
        let b = b
            .as_any()
            .downcast_ref::<Quest>()
            .ok_or_else(|| DomainError::comparison("only quests can be ordered"))?;
        Ok(i32::from(a.difficulty.rank()) - i32::from(b.difficulty.rank()))
    }

    /// Case-sensitive substring test against a quest's description or name.
    pub fn contains(&self, quest: &Quest, token: &str) -> bool {
        quest.description.contains(token) || quest.name.contains(token)
    }

    /// Complete a shared quest. Never fails; see [`Quest::complete`].
    pub fn complete(&self, quest: &SharedQuest) -> CompletionOutcome {
        lock_unpoisoned(quest).complete()
    }
}
