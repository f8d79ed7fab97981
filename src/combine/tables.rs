//! Literal lookup tables for the combiner passes.

use crate::morpheme::PosClass;

/// Fixed multi-morpheme idioms, fused verbatim before any other pass.
/// An entry optionally overrides the compound's class; the surface
/// strings must match the tokenizer output exactly.
pub(super) struct Idiom3 {
    pub pattern: [&'static str; 3],
    pub class: Option<PosClass>,
}

pub(super) struct Idiom2 {
    pub pattern: [&'static str; 2],
    pub class: Option<PosClass>,
}

pub(super) static IDIOMS_3: &[Idiom3] = &[
    Idiom3 { pattern: ["かも", "しれ", "ない"], class: Some(PosClass::Auxiliary) },
    Idiom3 { pattern: ["に", "つい", "て"], class: Some(PosClass::Particle) },
    Idiom3 { pattern: ["に", "よっ", "て"], class: Some(PosClass::Particle) },
    Idiom3 { pattern: ["に", "とっ", "て"], class: Some(PosClass::Particle) },
    Idiom3 { pattern: ["に", "対し", "て"], class: Some(PosClass::Particle) },
    Idiom3 { pattern: ["に", "おい", "て"], class: Some(PosClass::Particle) },
    Idiom3 { pattern: ["と", "し", "て"], class: Some(PosClass::Particle) },
];

pub(super) static IDIOMS_2: &[Idiom2] = &[
    Idiom2 { pattern: ["かも", "しれない"], class: Some(PosClass::Auxiliary) },
    Idiom2 { pattern: ["と", "いう"], class: Some(PosClass::Particle) },
    Idiom2 { pattern: ["そう", "いう"], class: Some(PosClass::Adnominal) },
    Idiom2 { pattern: ["こう", "いう"], class: Some(PosClass::Adnominal) },
    Idiom2 { pattern: ["ああ", "いう"], class: Some(PosClass::Adnominal) },
    Idiom2 { pattern: ["に", "ついて"], class: Some(PosClass::Particle) },
    Idiom2 { pattern: ["に", "よって"], class: Some(PosClass::Particle) },
    Idiom2 { pattern: ["に", "とって"], class: Some(PosClass::Particle) },
    Idiom2 { pattern: ["と", "して"], class: Some(PosClass::Particle) },
    Idiom2 { pattern: ["それ", "でも"], class: Some(PosClass::Conjunction) },
    Idiom2 { pattern: ["だ", "けど"], class: Some(PosClass::Conjunction) },
];

/// Conjunctive particles that ride on a preceding verb.
pub(super) static CONJUNCTIVE_PARTICLES: &[&str] = &["て", "で", "ちゃ", "じゃ"];

/// Dictionary forms a te-form verb may bind as a following dependent,
/// beyond the 非自立-tagged ones. Both spellings appear in tokenizer
/// output, so both are listed.
pub(super) static POSSIBLE_DEPENDENT: &[&str] = &[
    "みる", "見る", "いく", "行く", "くる", "来る", "おく", "置く", "しまう",
    "あげる", "上げる", "くれる", "もらう", "貰う", "いただく", "頂く",
    "やる", "ください", "下さい",
];

/// Progressive hosts handled by the dedicated teiru sub-pass.
pub(super) static PROGRESSIVE_HOSTS: &[&str] = &["いる", "おる"];

/// Auxiliaries that must NOT fuse onto their predecessor: sentence-final
/// copulas, the hearsay marker, and the conditional copula form.
pub(super) static AUX_NO_FUSE_LEMMA: &[&str] = &["だ", "です", "らしい"];
pub(super) static AUX_NO_FUSE_SURFACE: &[&str] = &["なら"];

/// Case particle + topic particle contractions treated as one unit.
pub(super) static PARTICLE_PAIRS: &[(&str, &str)] = &[
    ("に", "は"),
    ("で", "は"),
    ("と", "は"),
    ("へ", "は"),
    ("から", "は"),
    ("まで", "は"),
    ("に", "も"),
    ("で", "も"),
    ("と", "も"),
    ("から", "も"),
    ("まで", "も"),
];

/// Honorific suffixes split off a preceding personal name, with their
/// katakana readings for reading-splitting.
pub(super) static HONORIFICS: &[(&str, &str)] = &[
    ("さん", "サン"),
    ("くん", "クン"),
    ("ちゃん", "チャン"),
    ("さま", "サマ"),
    ("様", "サマ"),
    ("殿", "ドノ"),
    ("氏", "シ"),
];
