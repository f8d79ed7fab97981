//! Example sentence selection.
//!
//! Picks at most one example sentence per outstanding vocabulary
//! occurrence from a document's sentences. Three passes widen the
//! acceptable length band and raise the consumption quota, so common
//! vocabulary gets clean medium-length examples early while rarer words
//! can still land in outlier-length sentences later. Within a band,
//! longer sentences go first — same band, more disambiguating context.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, debug_span};

use crate::segment::Sentence;

/// A resolved dictionary entry with the surface forms it still needs an
/// example for, oldest first.
#[derive(Debug, Clone)]
pub struct VocabularyOccurrence {
    pub vocabulary_id: i64,
    pub reading_index: u8,
    pub surfaces: VecDeque<String>,
}

/// One vocabulary hit inside a chosen sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceMatch {
    pub vocabulary_id: i64,
    pub reading_index: u8,
    pub start: u8,
    pub len: u8,
}

/// A chosen example: the sentence text, its index within the source
/// document, and the matches found in it.
#[derive(Debug, Clone)]
pub struct ExampleSentence {
    pub text: String,
    pub position: usize,
    pub matches: Vec<SentenceMatch>,
}

/// Sentences whose morphemes span fewer distinct characters than this
/// are onomatopoeia or filler, not examples.
const MIN_DISTINCT_CHARS: usize = 6;

/// (min chars, max chars, cumulative quota over valid sentences).
const PASSES: &[(usize, usize, f64)] = &[(15, 40, 0.25), (10, 45, 0.50), (10, 55, 1.0)];

/// Per-pass consumption counters, for quota accounting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct PassStats {
    pub consumed: [usize; 3],
    pub valid: usize,
}

/// Choose at most one example sentence per outstanding occurrence.
///
/// Selection stops outright once every occurrence queue is empty; no
/// sentence is ever consumed twice across passes.
pub fn select_examples(
    sentences: &[Sentence],
    occurrences: Vec<VocabularyOccurrence>,
) -> Vec<ExampleSentence> {
    select_with_stats(sentences, occurrences).0
}

pub(crate) fn select_with_stats(
    sentences: &[Sentence],
    occurrences: Vec<VocabularyOccurrence>,
) -> (Vec<ExampleSentence>, PassStats) {
    let _span = debug_span!("select_examples", sentences = sentences.len()).entered();

    // FIFO queues of outstanding occurrences, keyed by exact surface.
    let mut queues: HashMap<String, VecDeque<(i64, u8)>> = HashMap::new();
    for occ in occurrences {
        for surface in occ.surfaces {
            queues
                .entry(surface)
                .or_default()
                .push_back((occ.vocabulary_id, occ.reading_index));
        }
    }
    if queues.is_empty() {
        return (Vec::new(), PassStats::default());
    }

    let valid: Vec<usize> = (0..sentences.len())
        .filter(|&i| distinct_chars(&sentences[i]) >= MIN_DISTINCT_CHARS)
        .collect();

    let mut used = vec![false; sentences.len()];
    let mut consumed = 0usize;
    let mut output = Vec::new();
    let mut stats = PassStats {
        consumed: [0; 3],
        valid: valid.len(),
    };

    'passes: for (pass, &(min_len, max_len, quota)) in PASSES.iter().enumerate() {
        let target = (quota * valid.len() as f64).floor() as usize;

        let mut candidates: Vec<usize> = valid
            .iter()
            .copied()
            .filter(|&i| {
                if used[i] {
                    return false;
                }
                let len = sentences[i].text.chars().count();
                (min_len..=max_len).contains(&len)
            })
            .collect();
        // Longest first; index order breaks ties so runs are stable.
        candidates.sort_by(|&a, &b| {
            let la = sentences[a].text.chars().count();
            let lb = sentences[b].text.chars().count();
            lb.cmp(&la).then(a.cmp(&b))
        });

        for i in candidates {
            if consumed >= target {
                continue 'passes;
            }
            used[i] = true;
            consumed += 1;
            stats.consumed[pass] += 1;

            let mut matches = Vec::new();
            let mut matched_keys: HashSet<(i64, u8)> = HashSet::new();
            for span in &sentences[i].spans {
                let surface = span.morpheme.surface.as_str();
                let mut emptied = false;
                if let Some(queue) = queues.get_mut(surface) {
                    if let Some((vocabulary_id, reading_index)) = queue.pop_front() {
                        if matched_keys.insert((vocabulary_id, reading_index)) {
                            matches.push(SentenceMatch {
                                vocabulary_id,
                                reading_index,
                                start: span.start,
                                len: span.len,
                            });
                        }
                    }
                    emptied = queue.is_empty();
                }
                if emptied {
                    queues.remove(surface);
                }
            }

            if !matches.is_empty() {
                debug!(position = i, matches = matches.len(), "example chosen");
                output.push(ExampleSentence {
                    text: sentences[i].text.clone(),
                    position: i,
                    matches,
                });
            }
            if queues.is_empty() {
                break 'passes;
            }
        }
    }

    (output, stats)
}

fn distinct_chars(sentence: &Sentence) -> usize {
    sentence
        .spans
        .iter()
        .flat_map(|s| s.morpheme.surface.chars())
        .collect::<HashSet<char>>()
        .len()
}
