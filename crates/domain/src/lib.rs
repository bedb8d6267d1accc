//! Mitaworld domain layer
//!
//! In-process persistent state of a small quest-driven game world:
//! character entities ("Mitas") carrying traits and quests, players tracking
//! progression, and a process-wide world registry coordinating lookups.
//!
//! State is ephemeral and synchronous: no I/O, no persistence, no retries.
//! Shared mutable entities travel as `Arc<Mutex<_>>` handles (`SharedQuest`,
//! `SharedMita`, `SharedPlayer`); deduplication is by entity identity.

pub mod common;
pub mod entities;
pub mod entity;
pub mod error;
pub mod ids;
pub mod world;

pub use entities::{
    CompletionOutcome, Difficulty, EncounterOutcome, LookupItem, LookupKey, Mita, MitaCatalog,
    MitaCompletion, Player, PlayerCompletion, Quest, QuestLedger, QuestSnapshot, SharedMita,
    SharedPlayer, SharedQuest, Trait, TraitCatalog, TraitSnapshot,
};
pub use entity::Entity;
pub use error::DomainError;
pub use ids::{EntityId, IdentityRegistry};
pub use world::{World, WorldEntity};
