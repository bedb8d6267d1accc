//! Domain entities: traits, quests, Mitas, and players.

pub mod mita;
pub mod player;
pub mod quest;
pub mod traits;

pub use mita::{LookupItem, LookupKey, Mita, MitaCatalog, MitaCompletion, SharedMita};
pub use player::{EncounterOutcome, Player, PlayerCompletion, SharedPlayer};
pub use quest::{
    CompletionOutcome, Difficulty, Quest, QuestLedger, QuestSnapshot, SharedQuest,
};
pub use traits::{Trait, TraitCatalog, TraitSnapshot};
