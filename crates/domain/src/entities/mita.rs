//! Mita entity - a character aggregating traits and quests
//!
//! A Mita owns an ordered sequence of traits and an ordered sequence of
//! shared quest references; both may contain duplicates. Lookup is
//! dual-mode: by index (traits first, then the same index reapplied to the
//! quest sequence) or by exact name (traits first, then quests).

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::common::sync::lock_unpoisoned;
use crate::entities::quest::{CompletionOutcome, QuestLedger, SharedQuest};
use crate::entities::traits::Trait;
use crate::entity::{validate_name, Entity};
use crate::error::DomainError;
use crate::ids::{EntityId, IdentityTag};

/// Shared handle on a Mita.
pub type SharedMita = Arc<Mutex<Mita>>;

/// Key accepted by [`Mita::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Index(i64),
    Name(String),
}

impl From<i64> for LookupKey {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for LookupKey {
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

impl From<&str> for LookupKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for LookupKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl TryFrom<&serde_json::Value> for LookupKey {
    type Error = DomainError;

    /// Dynamic entry point for untyped callers: integers and strings are
    /// keys, everything else is a type mismatch.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        if let Some(index) = value.as_i64() {
            return Ok(Self::Index(index));
        }
        if let Some(name) = value.as_str() {
            return Ok(Self::Name(name.to_string()));
        }
        Err(DomainError::type_mismatch(format!(
            "lookup key must be an integer or a string, got {}",
            value
        )))
    }
}

/// Item returned by [`Mita::lookup`].
#[derive(Debug)]
pub enum LookupItem<'a> {
    Trait(&'a Trait),
    Quest(&'a SharedQuest),
}

impl LookupItem<'_> {
    pub fn name(&self) -> String {
        match self {
            Self::Trait(trait_) => trait_.name().to_string(),
            Self::Quest(quest) => lock_unpoisoned(quest).name().to_string(),
        }
    }
}

/// Result of [`Mita::complete_quest`]. A missing or already-completed quest
/// is a routine outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MitaCompletion {
    Done(CompletionOutcome),
    NotFound,
}

impl fmt::Display for MitaCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(outcome) => outcome.fmt(f),
            Self::NotFound => write!(f, "Задание не найдено или уже выполнено"),
        }
    }
}

/// A game character carrying traits and quests.
#[derive(Debug)]
pub struct Mita {
    tag: IdentityTag,
    name: String,
    description: String,
    category: String,
    traits: Vec<Trait>,
    quests: Vec<SharedQuest>,
}

impl Mita {
    /// Category assigned when none is given.
    pub const DEFAULT_CATEGORY: &'static str = "Обычная";

    /// Create a Mita and register its name under the default category.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the name is shorter than two
    /// characters.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        traits: Vec<Trait>,
        quests: Vec<SharedQuest>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        validate_name(&name)?;
        let mita = Self {
            tag: IdentityTag::allocate(),
            name,
            description: description.into(),
            category: Self::DEFAULT_CATEGORY.to_string(),
            traits,
            quests,
        };
        MitaCatalog::global().register(&mita.category, &mita.name);
        Ok(mita)
    }

    /// Move the Mita to another category; the catalog entry follows.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        MitaCatalog::global().reassign(&self.category, &category, &self.name);
        self.category = category;
        self
    }

    pub fn into_shared(self) -> SharedMita {
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

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn quests(&self) -> &[SharedQuest] {
        &self.quests
    }

    /// Append a trait; duplicates are allowed.
    pub fn add_trait(&mut self, trait_: Trait) {
        self.traits.push(trait_);
    }

    /// Append a quest reference; duplicates are allowed.
    pub fn add_quest(&mut self, quest: SharedQuest) {
        self.quests.push(quest);
    }

    /// Not-completed quests in insertion order. Restartable: each call
    /// produces a fresh pass over the current sequence.
    pub fn active_quests(&self) -> impl Iterator<Item = SharedQuest> + '_ {
        self.quests
            .iter()
            .filter(|quest| !lock_unpoisoned(quest).completed())
            .map(Arc::clone)
    }

    /// Complete the first not-completed quest with this exact name through
    /// the ledger. Reports [`MitaCompletion::NotFound`] when nothing
    /// matches, whether absent or already completed.
    pub fn complete_quest(&mut self, name: &str) -> MitaCompletion {
        for quest in &self.quests {
            let matched = {
                let guard = lock_unpoisoned(quest);
                guard.name() == name && !guard.completed()
            };
            if matched {
                return MitaCompletion::Done(QuestLedger::global().complete(quest));
            }
        }
        MitaCompletion::NotFound
    }

    /// Dual-mode accessor over traits and quests.
    ///
    /// Index keys try the trait sequence first, then reapply the same index
    /// to the quest sequence. Name keys search traits first, then quests;
    /// first exact match wins.
    ///
    /// # Errors
    ///
    /// `DomainError::OutOfRange` for an index miss, `DomainError::NotFound`
    /// for a name miss.
    pub fn lookup(&self, key: impl Into<LookupKey>) -> Result<LookupItem<'_>, DomainError> {
        match key.into() {
            LookupKey::Index(index) => {
                let i =
                    usize::try_from(index).map_err(|_| DomainError::out_of_range(index))?;
                if i < self.traits.len() {
                    Ok(LookupItem::Trait(&self.traits[i]))
                } else if i < self.quests.len() {
                    Ok(LookupItem::Quest(&self.quests[i]))
                } else {
                    Err(DomainError::out_of_range(index))
                }
            }
            LookupKey::Name(name) => {
                if let Some(trait_) = self.traits.iter().find(|t| t.name() == name) {
                    return Ok(LookupItem::Trait(trait_));
                }
                if let Some(quest) = self
                    .quests
                    .iter()
                    .find(|q| lock_unpoisoned(q).name() == name)
                {
                    return Ok(LookupItem::Quest(quest));
                }
                Err(DomainError::not_found("trait or quest", name))
            }
        }
    }

    /// [`Mita::lookup`] for untyped keys; unsupported kinds fail with
    /// `DomainError::TypeMismatch`.
    pub fn lookup_value(
        &self,
        key: &serde_json::Value,
    ) -> Result<LookupItem<'_>, DomainError> {
        self.lookup(LookupKey::try_from(key)?)
    }
}

impl fmt::Display for Mita {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let traits = self
            .traits
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let quests = self
            .quests
            .iter()
            .map(|q| lock_unpoisoned(q).to_string())
            .collect::<Vec<_>>()
            .join("\n");
        write!(
            f,
            "Мита: {}\nТип: {}\nОписание: {}\n\nЧерты:\n{}\n\nЗадания:\n{}",
            self.name, self.category, self.description, traits, quests
        )
    }
}

impl Entity for Mita {
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
        format!("Мита: {} (Тип: {})", self.name, self.category)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

static CATALOG: Lazy<MitaCatalog> = Lazy::new(MitaCatalog::new);

/// Process-wide index of Mita names by category.
#[derive(Debug)]
pub struct MitaCatalog {
    by_category: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl MitaCatalog {
    fn new() -> Self {
        Self {
            by_category: Mutex::new(HashMap::new()),
        }
    }

    pub fn global() -> &'static MitaCatalog {
        &CATALOG
    }

    /// Record a Mita name under a category.
    pub fn register(&self, category: &str, name: &str) {
        lock_unpoisoned(&self.by_category)
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string());
        tracing::debug!(mita = %name, category = %category, "mita registered");
    }

    /// Move a name from one category to another.
    pub fn reassign(&self, from: &str, to: &str, name: &str) {
        let mut by_category = lock_unpoisoned(&self.by_category);
        if let Some(names) = by_category.get_mut(from) {
            names.remove(name);
        }
        by_category
            .entry(to.to_string())
            .or_default()
            .insert(name.to_string());
    }

    /// Names registered under a category; empty for unseen categories.
    pub fn mitas_in_category(&self, category: &str) -> BTreeSet<String> {
        lock_unpoisoned(&self.by_category)
            .get(category)
            .cloned()
            .unwrap_or_default()
    }
}
