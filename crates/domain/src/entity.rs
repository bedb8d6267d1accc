//! The `Entity` capability shared by every domain object
//!
//! Traits, quests, Mitas, and players all expose an id, a validated name,
//! and a one-line summary. `as_any` keeps the dynamic-operand contracts of
//! the combination and comparison operations expressible: the catalog and
//! ledger accept `&dyn Entity` and reject operands of the wrong kind with a
//! domain error instead of a compile error.

use std::any::Any;

use crate::error::DomainError;
use crate::ids::EntityId;

/// Minimum entity name length, counted in characters (names are Cyrillic,
/// byte length would over-count).
pub const MIN_NAME_CHARS: usize = 2;

/// Capability trait implemented by all domain entities.
pub trait Entity: Any {
    /// Unique id assigned at construction.
    fn id(&self) -> EntityId;

    /// Current name.
    fn name(&self) -> &str;

    /// Rename the entity; the same validation as at construction applies.
    fn rename(&mut self, name: &str) -> Result<(), DomainError>;

    /// Human-readable one-line summary.
    fn info(&self) -> String;

    /// Dynamic view for operand-kind checks.
    fn as_any(&self) -> &dyn Any;
}

/// Validates an entity name: at least [`MIN_NAME_CHARS`] characters.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(DomainError::validation(format!(
            "name must be at least {} characters, got {:?}",
            MIN_NAME_CHARS, name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_pass() {
        assert!(validate_name("Игнис").is_ok());
        assert!(validate_name("Ая").is_ok());
        assert!(validate_name("ab").is_ok());
    }

    #[test]
    fn test_short_names_fail() {
        assert!(matches!(
            validate_name(""),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            validate_name("A"),
            Err(DomainError::Validation(_))
        ));
        // One Cyrillic character is more than one byte but still one char
        assert!(matches!(
            validate_name("Я"),
            Err(DomainError::Validation(_))
        ));
    }
}
