//! Trait entity - named abilities with a combination algebra
//!
//! Traits are indexed by category in a process-wide [`TraitCatalog`] as they
//! are constructed. Two traits combine into a composite trait whose category
//! records both parents; the composite registers itself like any other trait.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::common::sync::lock_unpoisoned;
use crate::entity::{validate_name, Entity};
use crate::error::DomainError;
use crate::ids::{EntityId, IdentityTag};

/// A named ability/modifier carried by a Mita.
///
/// Equality is structural over `{name, description, effect}`; the category
/// is a filing detail and takes no part in it.
#[derive(Debug)]
pub struct Trait {
    tag: IdentityTag,
    name: String,
    description: String,
    effect: String,
    category: String,
}

impl Trait {
    /// Create a trait and register its name under its category.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the name is shorter than two
    /// characters.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        effect: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        validate_name(&name)?;
        let trait_ = Self {
            tag: IdentityTag::allocate(),
            name,
            description: description.into(),
            effect: effect.into(),
            category: category.into(),
        };
        TraitCatalog::global().register(&trait_);
        Ok(trait_)
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

    pub fn effect(&self) -> &str {
        &self.effect
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Plain-data image for structured serialization.
    pub fn to_snapshot(&self) -> TraitSnapshot {
        TraitSnapshot {
            name: self.name.clone(),
            description: self.description.clone(),
            effect: self.effect.clone(),
            category: self.category.clone(),
        }
    }

    /// Reconstruct a trait from a snapshot through the normal validating
    /// constructor: fresh id, re-registered in the catalog.
    pub fn from_snapshot(snapshot: TraitSnapshot) -> Result<Self, DomainError> {
        Self::new(
            snapshot.name,
            snapshot.description,
            snapshot.effect,
            snapshot.category,
        )
    }
}

impl PartialEq for Trait {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.effect == other.effect
    }
}

impl Eq for Trait {}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (Эффект: {})",
            self.name, self.description, self.effect
        )
    }
}

impl Entity for Trait {
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
        format!("{} ({}): {}", self.name, self.category, self.description)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Serializable image of a [`Trait`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitSnapshot {
    pub name: String,
    pub description: String,
    pub effect: String,
    pub category: String,
}

static CATALOG: Lazy<TraitCatalog> = Lazy::new(TraitCatalog::new);

/// Process-wide index of trait names by category, and home of the
/// combination algebra.
#[derive(Debug)]
pub struct TraitCatalog {
    by_category: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl TraitCatalog {
    fn new() -> Self {
        Self {
            by_category: Mutex::new(HashMap::new()),
        }
    }

    pub fn global() -> &'static TraitCatalog {
        &CATALOG
    }

    /// Record a trait name under its category.
    pub fn register(&self, trait_: &Trait) {
        lock_unpoisoned(&self.by_category)
            .entry(trait_.category.clone())
            .or_default()
            .insert(trait_.name.clone());
        tracing::debug!(name = %trait_.name, category = %trait_.category, "trait registered");
    }

    /// Names registered under a category; empty for unseen categories.
    pub fn traits_in_category(&self, category: &str) -> BTreeSet<String> {
        lock_unpoisoned(&self.by_category)
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    /// Combine two traits into a composite trait.
    ///
    /// The composite is named `a+b`, its category is
    /// `Combined(a.category+b.category)`, and it registers itself in the
    /// catalog like any constructed trait.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Combination` when either operand is not a
    /// [`Trait`].
    pub fn combine(&self, a: &dyn Entity, b: &dyn Entity) -> Result<Trait, DomainError> {
        let a = a
            .as_any()
            .downcast_ref::<Trait>()
            .ok_or_else(|| DomainError::combination("only traits can be combined"))?;
        let b = b
            .as_any()
            .downcast_ref::<Trait>()
            .ok_or_else(|| DomainError::combination("only traits can be combined"))?;
        Trait::new(
            format!("{}+{}", a.name, b.name),
            format!("Комбинация {} и {}", a.name, b.name),
            format!("{} и {}", a.effect, b.effect),
            format!("Combined({}+{})", a.category, b.category),
        )
    }
}
