//! The deconjugation engine.
//!
//! Given one surface word, enumerate every dictionary-form hypothesis
//! reachable by reversing conjugation rules. The search is a
//! breadth-first fixpoint: each round applies every rule to every
//! frontier hypothesis, collects the products that are genuinely new,
//! and stops when a round adds nothing. The accumulated set — identity
//! form included — is the answer; the caller resolves hypotheses
//! against a lexicon and keeps the ones that name real words.

mod pool;
pub mod rule;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use tracing::debug_span;

use self::pool::Pool;
use self::rule::{Rule, RuleKind, RuleSet, Variant};

/// Conjugation chains are short in practice; anything that outgrows the
/// original text by this many characters is a rule cycle, not grammar.
const MAX_TEXT_GROWTH: usize = 10;
const MAX_TAG_GROWTH: usize = 6;

/// Free-list ceiling for the per-call scratch pools.
const POOL_CEILING: usize = 64;

/// One point in the search space.
///
/// Identity (and therefore set membership) covers all five fields: two
/// hypotheses that reach the same text through different rule trails
/// are distinct results, and callers rely on that to show every
/// derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hypothesis<'r> {
    /// Current candidate text.
    pub text: String,
    /// The surface form the search started from, untouched.
    pub original: String,
    /// Grammatical categories assigned so far, oldest first.
    pub tags: Vec<&'r str>,
    /// Labels of every rule applied, oldest first.
    pub trail: Vec<&'r str>,
    /// Every text form this path has passed through.
    pub seen: BTreeSet<String>,
}

impl<'r> Hypothesis<'r> {
    fn identity(text: &str) -> Self {
        let mut seen = BTreeSet::new();
        seen.insert(text.to_string());
        Hypothesis {
            text: text.to_string(),
            original: text.to_string(),
            tags: Vec::new(),
            trail: Vec::new(),
            seen,
        }
    }

    /// Most recent tag, if any.
    pub fn last_tag(&self) -> Option<&'r str> {
        self.tags.last().copied()
    }
}

/// Per-call scratch pools; rejected candidates feed their collections
/// back instead of dropping them.
struct Scratch<'r> {
    tags: Pool<Vec<&'r str>>,
    trails: Pool<Vec<&'r str>>,
    seen: Pool<BTreeSet<String>>,
}

impl<'r> Scratch<'r> {
    fn new() -> Self {
        Scratch {
            tags: Pool::new(POOL_CEILING),
            trails: Pool::new(POOL_CEILING),
            seen: Pool::new(POOL_CEILING),
        }
    }

    fn recycle(&mut self, hyp: Hypothesis<'r>) {
        self.tags.give_back(hyp.tags);
        self.trails.give_back(hyp.trail);
        self.seen.give_back(hyp.seen);
    }
}

/// The search driver. Cheap to construct; borrows the shared rule set.
///
/// Safe to call from multiple threads: the rule set is read-only and
/// all scratch state is per-call. The optional whole-input memo sits
/// behind a mutex and is off unless requested.
pub struct Deconjugator<'r> {
    rules: &'r RuleSet,
    memo: Option<Mutex<HashMap<String, HashSet<Hypothesis<'r>>>>>,
}

impl<'r> Deconjugator<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Deconjugator { rules, memo: None }
    }

    /// Enable memoization of whole-input results. Off by default.
    pub fn with_memo(rules: &'r RuleSet) -> Self {
        Deconjugator {
            rules,
            memo: Some(Mutex::new(HashMap::new())),
        }
    }

    /// Enumerate every dictionary-form hypothesis for `text`.
    ///
    /// Never fails: empty input yields the empty set, and pathological
    /// inputs are contained by the growth guards, not by erroring.
    pub fn deconjugate(&self, text: &str) -> HashSet<Hypothesis<'r>> {
        if text.is_empty() {
            return HashSet::new();
        }
        if let Some(memo) = &self.memo {
            if let Ok(memo) = memo.lock() {
                if let Some(hit) = memo.get(text) {
                    return hit.clone();
                }
            }
        }

        let _span = debug_span!("deconjugate", text).entered();
        let original_chars = text.chars().count();
        let mut scratch = Scratch::new();
        let mut results: HashSet<Hypothesis<'r>> = HashSet::new();
        let mut frontier: HashSet<Hypothesis<'r>> = HashSet::new();
        let mut produced: Vec<Hypothesis<'r>> = Vec::new();
        frontier.insert(Hypothesis::identity(text));

        while !frontier.is_empty() {
            for hyp in &frontier {
                for rule in self.rules.iter() {
                    apply_rule(rule, hyp, original_chars, &mut scratch, &mut produced);
                }
            }
            results.extend(frontier.drain());
            for cand in produced.drain(..) {
                if results.contains(&cand) || frontier.contains(&cand) {
                    scratch.recycle(cand);
                } else {
                    frontier.insert(cand);
                }
            }
        }

        if let Some(memo) = &self.memo {
            if let Ok(mut memo) = memo.lock() {
                memo.insert(text.to_string(), results.clone());
            }
        }
        results
    }
}

fn apply_rule<'r>(
    rule: &'r Rule,
    hyp: &Hypothesis<'r>,
    original_chars: usize,
    scratch: &mut Scratch<'r>,
    out: &mut Vec<Hypothesis<'r>>,
) {
    match rule.kind {
        RuleKind::Standard | RuleKind::Rewrite | RuleKind::ContextGuarded => {
            for variant in &rule.variants {
                apply_standard(rule, variant, hyp, original_chars, scratch, out);
            }
        }
        RuleKind::OnlyFinal => {
            if hyp.tags.is_empty() {
                for variant in &rule.variants {
                    apply_standard(rule, variant, hyp, original_chars, scratch, out);
                }
            }
        }
        RuleKind::NeverFinal => {
            if !hyp.tags.is_empty() {
                for variant in &rule.variants {
                    apply_standard(rule, variant, hyp, original_chars, scratch, out);
                }
            }
        }
        RuleKind::Substitution => {
            if hyp.trail.is_empty() && !hyp.text.is_empty() {
                for variant in &rule.variants {
                    apply_substitution(rule, variant, hyp, original_chars, scratch, out);
                }
            }
        }
    }
}

/// Standard-family application: suffix (or whole-word) match, tag-path
/// discipline, suffix replacement.
fn apply_standard<'r>(
    rule: &'r Rule,
    variant: &'r Variant,
    hyp: &Hypothesis<'r>,
    original_chars: usize,
    scratch: &mut Scratch<'r>,
    out: &mut Vec<Hypothesis<'r>>,
) {
    if rule.kind == RuleKind::Rewrite {
        if hyp.text != variant.con_end {
            return;
        }
    } else if !hyp.text.ends_with(&variant.con_end) {
        return;
    }

    // First rule on a path fires unconditionally; afterwards the most
    // recent tag must be the form this rule conjugates from.
    if let Some(last) = hyp.last_tag() {
        if variant.con_tag.as_deref() != Some(last) {
            return;
        }
    }

    if let Some(guard) = rule.context {
        if !guard.allows(&hyp.text, &variant.con_end, &hyp.tags) {
            return;
        }
    }

    let stem = &hyp.text[..hyp.text.len() - variant.con_end.len()];
    let new_text = format!("{}{}", stem, variant.dec_end);
    // Stripping the whole word away leaves nothing to search from.
    if new_text.is_empty() {
        return;
    }
    // Reaching the untouched surface form again is a no-op cycle, and
    // any previously visited form on this path is a loop.
    if hyp.seen.contains(&new_text) {
        return;
    }

    let extra_tags = usize::from(hyp.tags.is_empty() && variant.con_tag.is_some())
        + usize::from(variant.dec_tag.is_some());
    if new_text.chars().count() > original_chars + MAX_TEXT_GROWTH
        || hyp.tags.len() + extra_tags > original_chars + MAX_TAG_GROWTH
    {
        return;
    }

    let mut tags = scratch.tags.rent();
    tags.extend_from_slice(&hyp.tags);
    if hyp.tags.is_empty() {
        if let Some(con_tag) = &variant.con_tag {
            tags.push(con_tag.as_str());
        }
    }
    if let Some(dec_tag) = &variant.dec_tag {
        tags.push(dec_tag.as_str());
    }

    let mut trail = scratch.trails.rent();
    trail.extend_from_slice(&hyp.trail);
    trail.push(rule.detail.as_str());

    let mut seen = scratch.seen.rent();
    seen.extend(hyp.seen.iter().cloned());
    seen.insert(new_text.clone());

    out.push(Hypothesis {
        text: new_text,
        original: hyp.original.clone(),
        tags,
        trail,
        seen,
    });
}

/// Substitution application: plain substring replace anywhere in the
/// text, allowed only before any other rule has touched the path.
fn apply_substitution<'r>(
    rule: &'r Rule,
    variant: &'r Variant,
    hyp: &Hypothesis<'r>,
    original_chars: usize,
    scratch: &mut Scratch<'r>,
    out: &mut Vec<Hypothesis<'r>>,
) {
    if variant.con_end.is_empty() || !hyp.text.contains(&variant.con_end) {
        return;
    }
    let new_text = hyp.text.replace(&variant.con_end, &variant.dec_end);
    if new_text == hyp.text || new_text.is_empty() {
        return;
    }
    if new_text.chars().count() > original_chars + MAX_TEXT_GROWTH {
        return;
    }

    let mut tags = scratch.tags.rent();
    tags.extend_from_slice(&hyp.tags);

    let mut trail = scratch.trails.rent();
    trail.push(rule.detail.as_str());

    let mut seen = scratch.seen.rent();
    seen.extend(hyp.seen.iter().cloned());
    seen.insert(new_text.clone());

    out.push(Hypothesis {
        text: new_text,
        original: hyp.original.clone(),
        tags,
        trail,
        seen,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results_with_text<'a, 'r>(
        set: &'a HashSet<Hypothesis<'r>>,
        text: &str,
    ) -> Vec<&'a Hypothesis<'r>> {
        set.iter().filter(|h| h.text == text).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        assert!(engine.deconjugate("").is_empty());
    }

    #[test]
    fn test_identity_hypothesis_always_present() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        for word in ["食べた", "猫", "walk"] {
            let results = engine.deconjugate(word);
            assert!(
                results
                    .iter()
                    .any(|h| h.text == word && h.tags.is_empty() && h.trail.is_empty()),
                "identity missing for {word}"
            );
        }
    }

    #[test]
    fn test_past_tense_ichidan() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let results = engine.deconjugate("食べた");
        let hits = results_with_text(&results, "食べる");
        assert!(!hits.is_empty());
        assert!(hits.iter().any(|h| h.trail.contains(&"past")));
    }

    #[test]
    fn test_past_tense_godan_variants() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let results = engine.deconjugate("買った");
        assert!(!results_with_text(&results, "買う").is_empty());
        let results = engine.deconjugate("泳いだ");
        assert!(!results_with_text(&results, "泳ぐ").is_empty());
        let results = engine.deconjugate("死んだ");
        assert!(!results_with_text(&results, "死ぬ").is_empty());
    }

    #[test]
    fn test_polite_chain() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let results = engine.deconjugate("食べました");
        let hits = results_with_text(&results, "食べる");
        assert!(!hits.is_empty());
        assert!(hits.iter().any(|h| h.trail.contains(&"polite past")));
    }

    #[test]
    fn test_long_agglutination_chain() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        // causative + passive + past
        let results = engine.deconjugate("食べさせられた");
        assert!(!results_with_text(&results, "食べる").is_empty());
        // progressive + past
        let results = engine.deconjugate("買っていた");
        assert!(!results_with_text(&results, "買う").is_empty());
    }

    #[test]
    fn test_same_text_different_trails_both_retained() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        // られる reverses both as ichidan potential/passive and as the
        // godan passive of 食べら… — at least two derivations reach
        // 食べる with distinct trails.
        let results = engine.deconjugate("食べられる");
        let hits = results_with_text(&results, "食べる");
        assert!(
            hits.len() >= 2,
            "expected multiple derivations, got {:?}",
            hits.iter().map(|h| &h.trail).collect::<Vec<_>>()
        );
        let trails: HashSet<_> = hits.iter().map(|h| h.trail.clone()).collect();
        assert!(trails.len() >= 2);
    }

    #[test]
    fn test_fixpoint_stability() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let results = engine.deconjugate("食べませんでした");
        let original_chars = "食べませんでした".chars().count();
        let mut scratch = Scratch::new();
        let mut produced = Vec::new();
        for hyp in &results {
            for rule in rules.iter() {
                apply_rule(rule, hyp, original_chars, &mut scratch, &mut produced);
            }
        }
        for cand in produced {
            assert!(
                results.contains(&cand),
                "re-running rules produced a new hypothesis: {cand:?}"
            );
        }
    }

    #[test]
    fn test_bare_stem_does_not_regrow() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let results = engine.deconjugate("食べ");
        assert!(!results_with_text(&results, "食べる").is_empty());
        assert!(
            results_with_text(&results, "食べるる").is_empty(),
            "bare-stem guard failed to stop regeneration"
        );
    }

    #[test]
    fn test_sa_short_causative_guard() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let results = engine.deconjugate("買わされた");
        assert!(!results_with_text(&results, "買う").is_empty());
        // s-stem verbs never take the shortened causative-passive.
        let results = engine.deconjugate("話さされた");
        assert!(results_with_text(&results, "話さす").is_empty());
    }

    #[test]
    fn test_slurred_negative_substitution() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let results = engine.deconjugate("食べねえ");
        assert!(!results_with_text(&results, "食べる").is_empty());
    }

    #[test]
    fn test_whole_word_rewrite_only_matches_exactly() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let results = engine.deconjugate("した");
        assert!(!results_with_text(&results, "する").is_empty());
        // Suffix-matching した inside a longer word must not rewrite.
        let results = engine.deconjugate("話した");
        assert!(results_with_text(&results, "話する").is_empty());
        assert!(!results_with_text(&results, "話す").is_empty());
    }

    #[test]
    fn test_memo_returns_identical_results() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::with_memo(&rules);
        let first = engine.deconjugate("行きました");
        let second = engine.deconjugate("行きました");
        assert_eq!(first, second);
        assert!(!results_with_text(&first, "行く").is_empty());
    }

    #[test]
    fn test_pathological_input_terminates() {
        let rules = RuleSet::builtin().unwrap();
        let engine = Deconjugator::new(&rules);
        let junk = "るるるるるるるるるる";
        let results = engine.deconjugate(junk);
        assert!(results.iter().any(|h| h.text == junk));
        for h in &results {
            assert!(h.text.chars().count() <= junk.chars().count() + MAX_TEXT_GROWTH);
        }
    }
}
