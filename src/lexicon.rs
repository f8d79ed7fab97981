//! Contract for the external lexicon.
//!
//! Deconjugated dictionary-form hypotheses are resolved against a
//! vocabulary database that this crate does not implement. The trait is
//! the whole contract: a dictionary-form string (plus an optional
//! reading to disambiguate homographs) either names a known entry or it
//! does not.

/// A resolved vocabulary entry: the entry's identifier and which of its
/// readings matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexiconRef {
    pub vocabulary_id: i64,
    pub reading_index: u8,
}

pub trait Lexicon: Send + Sync {
    fn resolve(&self, dictionary_form: &str, reading: Option<&str>) -> Option<LexiconRef>;
}
