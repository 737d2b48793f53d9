//! Character display names.
//!
//! The compiler knows characters only by ID. A host that has a character
//! catalog supplies a [`CharacterRoster`] so `Character(id:)` objects and
//! `talk` actions carry localized names.

use rustc_hash::FxHashMap;
use zeile_ir::Locale;

/// Maps character IDs to display names.
pub trait CharacterRoster {
    /// Name of character `id` for `locale`, if known.
    fn character_name(&self, id: i64, locale: Locale) -> Option<String>;
}

/// Roster that knows no characters; every name is empty.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyRoster;

impl CharacterRoster for EmptyRoster {
    fn character_name(&self, _id: i64, _locale: Locale) -> Option<String> {
        None
    }
}

/// In-memory roster with per-locale names.
///
/// A name missing for the requested locale falls back to the `jp` name.
#[derive(Clone, Debug, Default)]
pub struct MapRoster {
    names: FxHashMap<(i64, Locale), String>,
}

impl MapRoster {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, id: i64, locale: Locale, name: impl Into<String>) -> Self {
        self.insert(id, locale, name);
        self
    }

    pub fn insert(&mut self, id: i64, locale: Locale, name: impl Into<String>) {
        self.names.insert((id, locale), name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl CharacterRoster for MapRoster {
    fn character_name(&self, id: i64, locale: Locale) -> Option<String> {
        self.names
            .get(&(id, locale))
            .or_else(|| self.names.get(&(id, Locale::Jp)))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_roster() {
        assert_eq!(EmptyRoster.character_name(1, Locale::En), None);
    }

    #[test]
    fn test_locale_fallback() {
        let roster = MapRoster::new()
            .with_name(1, Locale::Jp, "戸山香澄")
            .with_name(1, Locale::En, "Kasumi Toyama");

        assert_eq!(roster.character_name(1, Locale::En).as_deref(), Some("Kasumi Toyama"));
        assert_eq!(roster.character_name(1, Locale::Kr).as_deref(), Some("戸山香澄"));
        assert_eq!(roster.character_name(2, Locale::Jp), None);
        assert_eq!(roster.len(), 2);
    }
}
