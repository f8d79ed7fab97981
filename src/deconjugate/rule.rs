//! Deconjugation rule model and resource loading.
//!
//! Rules live in an ordered JSON resource. Ending and tag fields are
//! scalar-or-array in the resource; both shapes decode to `Vec<String>`
//! before any rule logic sees them. Arrays of length > 1 define
//! positional variants (index i pairs ending[i]/tag[i], shorter arrays
//! fall back to index 0); variants are expanded once at load time and
//! cached on the rule, since every search replays them.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// The built-in rule resource, compiled into the crate.
const BUILTIN_RULES: &str = include_str!("../../data/deconjugation_rules.json");

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("failed to read rule resource: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode rule resource: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("rule '{detail}' has unknown type tag: {kind}")]
    UnknownKind { kind: String, detail: String },

    #[error("rule '{detail}' references unknown context guard: {name}")]
    UnknownContextGuard { name: String, detail: String },

    #[error("context-guarded rule '{detail}' names no guard")]
    MissingContextGuard { detail: String },

    #[error("rule '{detail}' has empty ending arrays")]
    EmptyEndings { detail: String },
}

/// How a rule matches and fires. See the engine for exact semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Standard,
    Rewrite,
    OnlyFinal,
    NeverFinal,
    ContextGuarded,
    Substitution,
}

/// Named predicates referenced by context-guarded rules.
///
/// The guard inventory is closed; a resource naming anything else fails
/// to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextGuard {
    /// Rejects the single-tag bare-continuative state. The bare-stem
    /// rule already appends る once to an untouched surface; letting
    /// the chained continuative rule fire on that product would grow
    /// る again off every word in the input.
    BareStemTrap,
    /// Rejects a される match whose preceding character is さ. The
    /// shortened causative-passive never attaches to s-stem verbs, so
    /// *話さされる must not resolve.
    SaShortCausative,
}

impl ContextGuard {
    fn from_name(name: &str, detail: &str) -> Result<Self, RuleError> {
        match name {
            "bare_stem_trap" => Ok(ContextGuard::BareStemTrap),
            "sa_short_causative" => Ok(ContextGuard::SaShortCausative),
            _ => Err(RuleError::UnknownContextGuard {
                name: name.to_string(),
                detail: detail.to_string(),
            }),
        }
    }

    /// Evaluate the guard against a hypothesis about to be matched.
    /// `text` is the hypothesis's current text, `con_end` the variant
    /// ending under consideration, `tags` the tag path so far.
    pub fn allows(&self, text: &str, con_end: &str, tags: &[&str]) -> bool {
        match self {
            ContextGuard::BareStemTrap => !(tags.len() == 1 && tags[0] == "stem-ren"),
            ContextGuard::SaShortCausative => {
                let Some(stem) = text.strip_suffix(con_end) else {
                    return false;
                };
                !stem.ends_with('さ')
            }
        }
    }
}

/// One positional variant of a rule: a concrete ending pair plus its
/// optional tag pair.
#[derive(Debug, Clone)]
pub struct Variant {
    pub con_end: String,
    pub dec_end: String,
    pub con_tag: Option<String>,
    pub dec_tag: Option<String>,
}

/// A loaded rule: kind, optional guard, label, and the precomputed
/// variant list.
#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: RuleKind,
    pub context: Option<ContextGuard>,
    pub detail: String,
    pub variants: Vec<Variant>,
}

/// Scalar-or-array JSON field, normalized to a vector on decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRule {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    context_rule: Option<String>,
    dec_end: OneOrMany,
    con_end: OneOrMany,
    #[serde(default)]
    dec_tag: Option<OneOrMany>,
    #[serde(default)]
    con_tag: Option<OneOrMany>,
    detail: String,
}

impl RawRule {
    fn into_rule(self) -> Result<Rule, RuleError> {
        let kind = match self.kind.as_str() {
            "standard" => RuleKind::Standard,
            "rewrite" => RuleKind::Rewrite,
            "only-final" => RuleKind::OnlyFinal,
            "never-final" => RuleKind::NeverFinal,
            "context" => RuleKind::ContextGuarded,
            "substitution" => RuleKind::Substitution,
            other => {
                return Err(RuleError::UnknownKind {
                    kind: other.to_string(),
                    detail: self.detail,
                })
            }
        };

        let context = match (&kind, self.context_rule.as_deref()) {
            (RuleKind::ContextGuarded, Some(name)) => {
                Some(ContextGuard::from_name(name, &self.detail)?)
            }
            (RuleKind::ContextGuarded, None) => {
                return Err(RuleError::MissingContextGuard {
                    detail: self.detail,
                })
            }
            _ => None,
        };

        let con_end = self.con_end.into_vec();
        let dec_end = self.dec_end.into_vec();
        if con_end.is_empty() || dec_end.is_empty() {
            return Err(RuleError::EmptyEndings {
                detail: self.detail,
            });
        }
        let con_tag = self.con_tag.map(OneOrMany::into_vec).unwrap_or_default();
        let dec_tag = self.dec_tag.map(OneOrMany::into_vec).unwrap_or_default();

        // Index i falls back to index 0 for any shorter array.
        let pick = |v: &[String], i: usize| -> Option<String> {
            v.get(i).or_else(|| v.first()).cloned()
        };
        let count = con_end.len().max(dec_end.len());
        let variants = (0..count)
            .map(|i| Variant {
                con_end: pick(&con_end, i).unwrap_or_default(),
                dec_end: pick(&dec_end, i).unwrap_or_default(),
                con_tag: pick(&con_tag, i),
                dec_tag: pick(&dec_tag, i),
            })
            .collect();

        Ok(Rule {
            kind,
            context,
            detail: self.detail,
            variants,
        })
    }
}

/// The immutable, ordered rule store. Built once at startup and shared
/// read-only across every search.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Load the compiled-in rule resource.
    pub fn builtin() -> Result<Self, RuleError> {
        Self::from_json(BUILTIN_RULES)
    }

    /// Load a rule resource from an external file.
    pub fn from_path(path: &Path) -> Result<Self, RuleError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RuleError> {
        let raw_rules: Vec<RawRule> = serde_json::from_str(raw)?;
        let rules = raw_rules
            .into_iter()
            .map(RawRule::into_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
