//! Sentence segmentation and morpheme span reattachment.
//!
//! Splitting walks the text character by character; span assignment
//! then walks sentences and morphemes in parallel with a forward-only
//! cursor. When a morpheme fails to match because an upstream break was
//! inserted through the middle of it, the two sentences are merged and
//! the search retried — each merge removes a sentence, so the retry is
//! bounded.

use tracing::{debug_span, warn};

use crate::morpheme::Morpheme;
use crate::unicode::{is_ellipsis, is_sentence_ender, is_trailing_punct};

/// A morpheme located within its sentence. Offsets are character
/// based and deliberately 8-bit: a sentence longer than 255 characters
/// cannot address all of its spans, and spans that fall outside the
/// range are skipped rather than widened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphemeSpan {
    pub morpheme: Morpheme,
    pub start: u8,
    pub len: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub spans: Vec<MorphemeSpan>,
}

/// Split `text` into sentences and attach each morpheme's span.
///
/// Concatenating the returned sentence texts reproduces the
/// line-break-stripped input exactly; segmentation itself never drops
/// or duplicates characters.
pub fn segment(text: &str, morphemes: &[Morpheme]) -> Vec<Sentence> {
    let _span = debug_span!("segment", len = text.len()).entered();
    attach_spans(split_sentences(text), morphemes)
}

/// Character scan with a seen-ender flag. The flag absorbs clustered
/// terminators (。」 and the like); the first ordinary character after
/// an ender starts the next sentence. A line ending right after an
/// ellipsis also flushes, since ellipses end thoughts without being
/// terminators.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut buf = String::new();
    let mut seen_ender = false;

    for line in text.lines() {
        for c in line.chars() {
            if seen_ender && !is_trailing_punct(c) {
                sentences.push(std::mem::take(&mut buf));
                seen_ender = false;
            }
            buf.push(c);
            if is_sentence_ender(c) {
                seen_ender = true;
            }
        }
        if buf.chars().next_back().is_some_and(is_ellipsis) {
            sentences.push(std::mem::take(&mut buf));
            seen_ender = false;
        }
    }
    if !buf.is_empty() {
        sentences.push(buf);
    }
    sentences
}

fn attach_spans(texts: Vec<String>, morphemes: &[Morpheme]) -> Vec<Sentence> {
    let mut sentences: Vec<Sentence> = texts
        .into_iter()
        .map(|text| Sentence {
            text,
            spans: Vec::new(),
        })
        .collect();

    let mut si = 0usize;
    let mut cursor = 0usize; // character offset within the current sentence
    'morphemes: for morpheme in morphemes {
        if morpheme.surface.is_empty() {
            continue;
        }
        let (saved_si, saved_cursor) = (si, cursor);
        loop {
            if si >= sentences.len() {
                // Exhausted every sentence: skip this morpheme and
                // resume from where the previous one matched.
                warn!(surface = %morpheme.surface, "morpheme not locatable in any sentence");
                si = saved_si;
                cursor = saved_cursor;
                continue 'morphemes;
            }
            if let Some(pos) = find_chars(&sentences[si].text, &morpheme.surface, cursor) {
                let len = morpheme.surface.chars().count();
                if pos <= u8::MAX as usize && len <= u8::MAX as usize {
                    sentences[si].spans.push(MorphemeSpan {
                        morpheme: morpheme.clone(),
                        start: pos as u8,
                        len: len as u8,
                    });
                } else {
                    warn!(surface = %morpheme.surface, pos, "span outside 8-bit offset range");
                }
                cursor = pos + len;
                continue 'morphemes;
            }
            if si + 1 < sentences.len()
                && straddles_boundary(&sentences[si].text, &sentences[si + 1].text, &morpheme.surface)
            {
                // An upstream break cut through this morpheme: merge
                // the two sentences and retry in the merged one.
                let next = sentences.remove(si + 1);
                sentences[si].text.push_str(&next.text);
                continue;
            }
            si += 1;
            cursor = 0;
        }
    }

    sentences
}

/// Character-based substring search starting at `from`.
fn find_chars(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay: Vec<char> = haystack.chars().collect();
    let ndl: Vec<char> = needle.chars().collect();
    if ndl.is_empty() || from + ndl.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - ndl.len()).find(|&i| hay[i..i + ndl.len()] == ndl[..])
}

/// Does some non-empty split of `needle` finish `current` and open
/// `next`?
fn straddles_boundary(current: &str, next: &str, needle: &str) -> bool {
    let chars: Vec<char> = needle.chars().collect();
    (1..chars.len()).any(|k| {
        let head: String = chars[..k].iter().collect();
        let tail: String = chars[k..].iter().collect();
        current.ends_with(&head) && next.starts_with(&tail)
    })
}
