//! Core text analysis for Japanese vocabulary mining.
//!
//! Turns raw Japanese text into a structured sequence of
//! dictionary-form vocabulary occurrences, for frequency analysis,
//! flashcard export and example-sentence mining. The pipeline:
//!
//! 1. an external tokenizer (behind [`tokenizer::SharedTokenizer`])
//!    produces a flat morpheme stream;
//! 2. [`combine::combine`] re-segments it into dictionary-lookup
//!    granularity words through ordered fusion passes;
//! 3. [`segment::segment`] splits the text into sentences and attaches
//!    per-morpheme spans;
//! 4. [`deconjugate::Deconjugator`] enumerates dictionary-form
//!    hypotheses for each surface word, which the caller resolves
//!    through its [`lexicon::Lexicon`];
//! 5. [`select::select_examples`] picks representative example
//!    sentences for the resolved occurrences.
//!
//! Everything here is synchronous, CPU-bound and free of internal I/O;
//! the deconjugation rule set is loaded once and shared read-only.

pub mod combine;
pub mod deconjugate;
pub mod lexicon;
pub mod morpheme;
pub mod segment;
pub mod select;
pub mod tokenizer;
pub mod unicode;


pub use combine::combine;
pub use deconjugate::rule::{RuleError, RuleSet};
pub use deconjugate::{Deconjugator, Hypothesis};
pub use lexicon::{Lexicon, LexiconRef};
pub use morpheme::{Morpheme, PosClass, PosError};
pub use segment::{segment, MorphemeSpan, Sentence};
pub use select::{select_examples, ExampleSentence, SentenceMatch, VocabularyOccurrence};
pub use tokenizer::{SharedTokenizer, TokenizeBackend, TokenizeError, TokenizeMode};
