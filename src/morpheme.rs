//! Morpheme data model and tokenizer-record ingestion.
//!
//! The external tokenizer emits newline-separated records, one morpheme
//! per line, tab-separated:
//!
//! `<surface>\t<pos1>,<pos2>,<pos3>,<pos4>[,..]\t<normalized>\t<dictionary>\t<unused>\t<reading>`
//!
//! A literal `EOS` line marks a segment boundary. Short or unparseable
//! records are tokenizer noise and are dropped; a POS class string that
//! is missing from the class table means the tokenizer and our rule
//! tables have drifted apart, and that is a hard error.

use std::fmt;

/// Primary part-of-speech class, as emitted by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Particle,
    Auxiliary,
    Conjunction,
    Prefix,
    Adnominal,
    Interjection,
    Symbol,
    Filler,
    Other,
}

impl PosClass {
    /// Map a tokenizer class string to its enum value.
    ///
    /// Both the classic and the revised spellings of the prefix and
    /// symbol classes are accepted; anything else is unmapped.
    pub fn from_code(code: &str) -> Result<Self, PosError> {
        match code {
            "名詞" => Ok(PosClass::Noun),
            "動詞" => Ok(PosClass::Verb),
            "形容詞" => Ok(PosClass::Adjective),
            "副詞" => Ok(PosClass::Adverb),
            "助詞" => Ok(PosClass::Particle),
            "助動詞" => Ok(PosClass::Auxiliary),
            "接続詞" => Ok(PosClass::Conjunction),
            "接頭詞" | "接頭辞" => Ok(PosClass::Prefix),
            "連体詞" => Ok(PosClass::Adnominal),
            "感動詞" => Ok(PosClass::Interjection),
            "記号" | "補助記号" => Ok(PosClass::Symbol),
            "フィラー" => Ok(PosClass::Filler),
            "その他" => Ok(PosClass::Other),
            _ => Err(PosError::UnmappedClass(code.to_string())),
        }
    }
}

impl fmt::Display for PosClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PosClass::Noun => "名詞",
            PosClass::Verb => "動詞",
            PosClass::Adjective => "形容詞",
            PosClass::Adverb => "副詞",
            PosClass::Particle => "助詞",
            PosClass::Auxiliary => "助動詞",
            PosClass::Conjunction => "接続詞",
            PosClass::Prefix => "接頭詞",
            PosClass::Adnominal => "連体詞",
            PosClass::Interjection => "感動詞",
            PosClass::Symbol => "記号",
            PosClass::Filler => "フィラー",
            PosClass::Other => "その他",
        };
        f.write_str(s)
    }
}

/// Fatal ingestion errors. Everything else in a tokenizer record is
/// best-effort noise; an unmapped class is schema drift.
#[derive(Debug, thiserror::Error)]
pub enum PosError {
    #[error("unmapped part-of-speech class: {0}")]
    UnmappedClass(String),
}

/// One morpheme of tokenizer output.
///
/// Immutable once constructed; combiner passes produce new morphemes
/// (and new lists) rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub surface: String,
    pub class: PosClass,
    /// Up to three subclass tags; `*` placeholders become `None`.
    pub subclasses: [Option<String>; 3],
    pub normalized: String,
    pub dictionary_form: String,
    pub reading: String,
}

impl Morpheme {
    /// Parse one tab-separated tokenizer record.
    ///
    /// Returns `Ok(None)` for records that should be dropped (too few
    /// tab fields, too few POS fields). An unmapped POS class is the
    /// one fatal case.
    pub fn parse_record(line: &str) -> Result<Option<Morpheme>, PosError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 6 {
            return Ok(None);
        }
        let pos: Vec<&str> = fields[1].split(',').collect();
        if pos.len() < 4 {
            return Ok(None);
        }
        let class = PosClass::from_code(pos[0])?;
        let sub = |s: &str| {
            if s.is_empty() || s == "*" {
                None
            } else {
                Some(s.to_string())
            }
        };
        Ok(Some(Morpheme {
            surface: fields[0].to_string(),
            class,
            subclasses: [sub(pos[1]), sub(pos[2]), sub(pos[3])],
            normalized: fields[2].to_string(),
            dictionary_form: fields[3].to_string(),
            reading: fields[5].to_string(),
        }))
    }

    /// First subclass tag, or `""` when absent. The combiner's pass
    /// predicates key on this constantly.
    pub fn subclass(&self) -> &str {
        self.subclasses[0].as_deref().unwrap_or("")
    }

    pub fn has_subclass(&self, tag: &str) -> bool {
        self.subclasses
            .iter()
            .any(|s| s.as_deref() == Some(tag))
    }

    /// Fuse `next` onto `self`, appending surface/normalized/reading.
    ///
    /// `keep` selects which side supplies the grammatical identity
    /// (class, subclasses, dictionary form) of the compound.
    pub fn fuse(&self, next: &Morpheme, keep: FuseSide) -> Morpheme {
        let (class, subclasses, dictionary_form) = match keep {
            FuseSide::Left => (
                self.class,
                self.subclasses.clone(),
                self.dictionary_form.clone(),
            ),
            FuseSide::Right => (
                next.class,
                next.subclasses.clone(),
                next.dictionary_form.clone(),
            ),
            // Compounds like サ変 noun + する carry the verb's class but
            // a dictionary form built from both sides.
            FuseSide::RightWithJoinedLemma => (
                next.class,
                next.subclasses.clone(),
                format!("{}{}", self.surface, next.dictionary_form),
            ),
        };
        Morpheme {
            surface: format!("{}{}", self.surface, next.surface),
            class,
            subclasses,
            normalized: format!("{}{}", self.normalized, next.normalized),
            dictionary_form,
            reading: format!("{}{}", self.reading, next.reading),
        }
    }
}

/// Which side of a fusion supplies the compound's grammatical identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuseSide {
    Left,
    Right,
    RightWithJoinedLemma,
}

#[cfg(test)]
pub(crate) fn test_morpheme(surface: &str, class: PosClass, sub1: &str, dict: &str) -> Morpheme {
    let sub = |s: &str| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    };
    Morpheme {
        surface: surface.to_string(),
        class,
        subclasses: [sub(sub1), None, None],
        normalized: surface.to_string(),
        dictionary_form: dict.to_string(),
        reading: String::new(),
    }
}
