//! The morphological combiner.
//!
//! Tokenizer-granularity morphemes are too fine for dictionary lookup:
//! auxiliaries, conjunctive particles, suffixes and stems have to ride
//! their host word first. [`combine`] runs a fixed sequence of fusion
//! passes over the morpheme list.
//!
//! Pass order is a contract, not an implementation detail. Later passes
//! assume earlier fusions already happened — the auxiliary pass, for
//! example, relies on te-form and dependent-verb fusion having built
//! the host it attaches to. Reordering silently mis-splits words.

mod passes;
mod tables;

use tracing::debug_span;

use crate::morpheme::Morpheme;

/// Run the full ordered pass pipeline.
///
/// Each pass consumes the previous pass's list and produces a new one;
/// the input morphemes themselves are never mutated.
pub fn combine(morphemes: Vec<Morpheme>) -> Vec<Morpheme> {
    let _span = debug_span!("combine", morphemes_in = morphemes.len()).entered();
    let m = passes::apply_idioms(morphemes);
    let m = passes::fuse_conjunctive_particle(m);
    let m = passes::fuse_prefix(m);
    let m = passes::fuse_numeric(m);
    let m = passes::fuse_small_tsu(m);
    let m = passes::fuse_aux_stem(m);
    let m = passes::fuse_plain_dependent(m);
    let m = passes::fuse_possible_dependent(m);
    let m = passes::fuse_suru_compound(m);
    let m = passes::fuse_teiru(m);
    let m = passes::fuse_adverbial_particle(m);
    let m = passes::fuse_suffix(m);
    let m = passes::fuse_auxiliary(m);
    let m = passes::fuse_particle_pairs(m);
    let m = passes::fuse_trailing_conditional(m);
    passes::split_honorifics(m)
}
