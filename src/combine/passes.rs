//! The individual fusion passes.
//!
//! Every pass is one left-to-right scan. The accumulator is the last
//! morpheme written to the output; each incoming morpheme either fuses
//! into it or becomes the new accumulator. A pass never looks further
//! ahead than the next morpheme — the idiom tables are the exception
//! and see exactly two or three.

use crate::morpheme::{FuseSide, Morpheme, PosClass};

use super::tables::{
    AUX_NO_FUSE_LEMMA, AUX_NO_FUSE_SURFACE, CONJUNCTIVE_PARTICLES, HONORIFICS, IDIOMS_2,
    IDIOMS_3, PARTICLE_PAIRS, POSSIBLE_DEPENDENT, PROGRESSIVE_HOSTS,
};

/// Left-to-right accumulator scan. `rule` inspects the accumulator and
/// the next morpheme; returning a side fuses them.
fn scan(input: Vec<Morpheme>, rule: impl Fn(&Morpheme, &Morpheme) -> Option<FuseSide>) -> Vec<Morpheme> {
    let mut out: Vec<Morpheme> = Vec::with_capacity(input.len());
    for next in input {
        if let Some(acc) = out.last() {
            if let Some(side) = rule(acc, &next) {
                let fused = acc.fuse(&next, side);
                out.pop();
                out.push(fused);
                continue;
            }
        }
        out.push(next);
    }
    out
}

/// Pass 1: fixed idiom tables. Greedy left-to-right; at each position
/// the 3-morpheme table is tried before the 2-morpheme table.
pub(super) fn apply_idioms(input: Vec<Morpheme>) -> Vec<Morpheme> {
    let mut out: Vec<Morpheme> = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if let Some((len, class)) = idiom_at(&input, i) {
            let mut fused = input[i].clone();
            for next in &input[i + 1..i + len] {
                fused = fused.fuse(next, FuseSide::Left);
            }
            if let Some(class) = class {
                fused.class = class;
                fused.subclasses = [None, None, None];
            }
            // An idiom is its own lexical unit.
            fused.dictionary_form = fused.surface.clone();
            out.push(fused);
            i += len;
        } else {
            out.push(input[i].clone());
            i += 1;
        }
    }
    out
}

fn idiom_at(input: &[Morpheme], i: usize) -> Option<(usize, Option<PosClass>)> {
    if input.len() - i >= 3 {
        for idiom in IDIOMS_3 {
            if idiom.pattern[0] == input[i].surface
                && idiom.pattern[1] == input[i + 1].surface
                && idiom.pattern[2] == input[i + 2].surface
            {
                return Some((3, idiom.class));
            }
        }
    }
    if input.len() - i >= 2 {
        for idiom in IDIOMS_2 {
            if idiom.pattern[0] == input[i].surface && idiom.pattern[1] == input[i + 1].surface {
                return Some((2, idiom.class));
            }
        }
    }
    None
}

/// Pass 2: conjunctive particle onto a preceding verb (食べ + て).
pub(super) fn fuse_conjunctive_particle(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Verb
            && next.class == PosClass::Particle
            && next.subclass() == "接続助詞"
            && CONJUNCTIVE_PARTICLES.contains(&next.surface.as_str()))
        .then_some(FuseSide::Left)
    })
}

/// Pass 3: a prefix absorbs into whatever follows it (お + 茶).
pub(super) fn fuse_prefix(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Prefix && next.class != PosClass::Symbol)
            .then_some(FuseSide::Right)
    })
}

/// Pass 4: digit runs, then counter suffixes (三 + 十 + 人).
pub(super) fn fuse_numeric(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        if acc.class != PosClass::Noun || !acc.has_subclass("数") {
            return None;
        }
        if next.class == PosClass::Noun && next.has_subclass("数") {
            return Some(FuseSide::Left);
        }
        if next.has_subclass("助数詞") {
            return Some(FuseSide::Left);
        }
        None
    })
}

/// Pass 5: orthographic gemination — a morpheme left dangling on っ
/// picks up the following te/ta unit.
pub(super) fn fuse_small_tsu(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        let dangling = acc.surface.ends_with('っ') || acc.surface.ends_with('ッ');
        let starts_te = next
            .surface
            .chars()
            .next()
            .is_some_and(|c| matches!(c, 'て' | 'た' | 'ち'));
        (dangling && starts_te).then_some(FuseSide::Left)
    })
}

/// Pass 6: auxiliary-verb stems (助動詞語幹, e.g. 降り + そう).
pub(super) fn fuse_aux_stem(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (matches!(acc.class, PosClass::Verb | PosClass::Adjective)
            && next.class == PosClass::Noun
            && next.has_subclass("助動詞語幹"))
        .then_some(FuseSide::Left)
    })
}

/// Pass 7a: 非自立 dependent verbs onto a preceding verb.
pub(super) fn fuse_plain_dependent(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Verb
            && next.class == PosClass::Verb
            && next.subclass() == "非自立")
        .then_some(FuseSide::Left)
    })
}

/// Pass 7b: whitelisted lexical verbs that bind to a te-form host
/// (買って + みる) even when the tokenizer tags them independent.
pub(super) fn fuse_possible_dependent(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Verb
            && ends_in_te(acc)
            && next.class == PosClass::Verb
            && POSSIBLE_DEPENDENT.contains(&next.dictionary_form.as_str()))
        .then_some(FuseSide::Left)
    })
}

/// Pass 7c: サ変 noun + する compounds into one verb (勉強 + する).
pub(super) fn fuse_suru_compound(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Noun
            && acc.has_subclass("サ変接続")
            && next.class == PosClass::Verb
            && next.dictionary_form == "する")
        .then_some(FuseSide::RightWithJoinedLemma)
    })
}

/// Pass 7d: progressive いる/おる onto a te-form host (食べて + いる).
pub(super) fn fuse_teiru(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Verb
            && ends_in_te(acc)
            && next.class == PosClass::Verb
            && PROGRESSIVE_HOSTS.contains(&next.dictionary_form.as_str()))
        .then_some(FuseSide::Left)
    })
}

fn ends_in_te(m: &Morpheme) -> bool {
    m.surface.ends_with('て') || m.surface.ends_with('で')
}

/// Pass 8: adverbial particles riding a verb (食べて + ばかり).
pub(super) fn fuse_adverbial_particle(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Verb
            && next.class == PosClass::Particle
            && next.subclass() == "副助詞")
        .then_some(FuseSide::Left)
    })
}

/// Pass 9: noun suffixes onto a preceding noun (子供 + たち). Counters
/// and auxiliary stems were taken by earlier passes.
pub(super) fn fuse_suffix(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Noun
            && next.class == PosClass::Noun
            && next.subclass() == "接尾"
            && !next.has_subclass("助数詞")
            && !next.has_subclass("助動詞語幹"))
        .then_some(FuseSide::Left)
    })
}

/// Pass 10: general auxiliary fusion (食べ + られ + た), minus the
/// explicit do-not-fuse list.
pub(super) fn fuse_auxiliary(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        if !matches!(acc.class, PosClass::Verb | PosClass::Adjective) {
            return None;
        }
        if next.class != PosClass::Auxiliary {
            return None;
        }
        if AUX_NO_FUSE_LEMMA.contains(&next.dictionary_form.as_str())
            || AUX_NO_FUSE_SURFACE.contains(&next.surface.as_str())
        {
            return None;
        }
        Some(FuseSide::Left)
    })
}

/// Pass 11: case + topic particle contractions (に + は).
pub(super) fn fuse_particle_pairs(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Particle
            && next.class == PosClass::Particle
            && PARTICLE_PAIRS
                .iter()
                .any(|&(a, b)| a == acc.surface && b == next.surface))
        .then_some(FuseSide::Left)
    })
}

/// Pass 12: cleanup — a trailing conditional ば left behind by the
/// auxiliary pass re-merges onto its verb (食べなけれ + ば).
pub(super) fn fuse_trailing_conditional(input: Vec<Morpheme>) -> Vec<Morpheme> {
    scan(input, |acc, next| {
        (acc.class == PosClass::Verb
            && next.class == PosClass::Particle
            && next.subclass() == "接続助詞"
            && next.surface == "ば")
        .then_some(FuseSide::Left)
    })
}

/// Pass 13: the inverse direction — a personal name the tokenizer
/// emitted with its honorific attached is split back into two.
pub(super) fn split_honorifics(input: Vec<Morpheme>) -> Vec<Morpheme> {
    let mut out = Vec::with_capacity(input.len());
    for m in input {
        if m.class == PosClass::Noun && m.has_subclass("人名") {
            if let Some((name, honorific)) = split_honorific(&m) {
                out.push(name);
                out.push(honorific);
                continue;
            }
        }
        out.push(m);
    }
    out
}

fn split_honorific(m: &Morpheme) -> Option<(Morpheme, Morpheme)> {
    for &(suffix, suffix_reading) in HONORIFICS {
        let Some(stem) = m.surface.strip_suffix(suffix) else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }
        let stem_reading = m
            .reading
            .strip_suffix(suffix_reading)
            .unwrap_or(&m.reading)
            .to_string();
        let name = Morpheme {
            surface: stem.to_string(),
            class: m.class,
            subclasses: m.subclasses.clone(),
            normalized: stem.to_string(),
            dictionary_form: stem.to_string(),
            reading: stem_reading,
        };
        let honorific = Morpheme {
            surface: suffix.to_string(),
            class: PosClass::Noun,
            subclasses: [Some("接尾".to_string()), Some("人名".to_string()), None],
            normalized: suffix.to_string(),
            dictionary_form: suffix.to_string(),
            reading: suffix_reading.to_string(),
        };
        return Some((name, honorific));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morpheme::test_morpheme;

    fn verb(surface: &str, dict: &str) -> Morpheme {
        test_morpheme(surface, PosClass::Verb, "自立", dict)
    }

    fn surfaces(morphemes: &[Morpheme]) -> Vec<&str> {
        morphemes.iter().map(|m| m.surface.as_str()).collect()
    }

    #[test]
    fn test_idiom_three_beats_two() {
        let input = vec![
            test_morpheme("かも", PosClass::Particle, "副助詞", "かも"),
            test_morpheme("しれ", PosClass::Verb, "自立", "しれる"),
            test_morpheme("ない", PosClass::Auxiliary, "", "ない"),
        ];
        let out = apply_idioms(input);
        assert_eq!(surfaces(&out), vec!["かもしれない"]);
        assert_eq!(out[0].class, PosClass::Auxiliary);
        assert_eq!(out[0].dictionary_form, "かもしれない");
    }

    #[test]
    fn test_idiom_two_morpheme() {
        let input = vec![
            test_morpheme("と", PosClass::Particle, "格助詞", "と"),
            test_morpheme("いう", PosClass::Verb, "自立", "いう"),
            test_morpheme("話", PosClass::Noun, "一般", "話"),
        ];
        let out = apply_idioms(input);
        assert_eq!(surfaces(&out), vec!["という", "話"]);
        assert_eq!(out[0].class, PosClass::Particle);
    }

    #[test]
    fn test_conjunctive_particle_fuses_onto_verb() {
        let input = vec![
            verb("食べ", "食べる"),
            test_morpheme("て", PosClass::Particle, "接続助詞", "て"),
        ];
        let out = fuse_conjunctive_particle(input);
        assert_eq!(surfaces(&out), vec!["食べて"]);
        assert_eq!(out[0].class, PosClass::Verb);
        assert_eq!(out[0].dictionary_form, "食べる");
    }

    #[test]
    fn test_conjunctive_particle_needs_verb_host() {
        let input = vec![
            test_morpheme("猫", PosClass::Noun, "一般", "猫"),
            test_morpheme("て", PosClass::Particle, "接続助詞", "て"),
        ];
        let out = fuse_conjunctive_particle(input);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_prefix_absorbs_forward() {
        let input = vec![
            test_morpheme("お", PosClass::Prefix, "名詞接続", "お"),
            test_morpheme("茶", PosClass::Noun, "一般", "茶"),
        ];
        let out = fuse_prefix(input);
        assert_eq!(surfaces(&out), vec!["お茶"]);
        assert_eq!(out[0].class, PosClass::Noun);
        assert_eq!(out[0].dictionary_form, "茶");
    }

    #[test]
    fn test_numeric_run_and_counter() {
        let input = vec![
            test_morpheme("三", PosClass::Noun, "数", "三"),
            test_morpheme("十", PosClass::Noun, "数", "十"),
            test_morpheme("人", PosClass::Noun, "接尾", "人"),
        ];
        // mark 人 as a counter
        let mut input = input;
        input[2].subclasses[1] = Some("助数詞".to_string());
        let out = fuse_numeric(input);
        assert_eq!(surfaces(&out), vec!["三十人"]);
    }

    #[test]
    fn test_suru_compound() {
        let input = vec![
            test_morpheme("勉強", PosClass::Noun, "サ変接続", "勉強"),
            verb("し", "する"),
        ];
        let out = fuse_suru_compound(input);
        assert_eq!(surfaces(&out), vec!["勉強し"]);
        assert_eq!(out[0].class, PosClass::Verb);
        assert_eq!(out[0].dictionary_form, "勉強する");
    }

    #[test]
    fn test_possible_dependent_whitelist() {
        let input = vec![verb("買って", "買う"), verb("みる", "みる")];
        let out = fuse_possible_dependent(input);
        assert_eq!(surfaces(&out), vec!["買ってみる"]);
        assert_eq!(out[0].dictionary_form, "買う");

        // Non-whitelisted verb stays separate.
        let input = vec![verb("買って", "買う"), verb("走る", "走る")];
        let out = fuse_possible_dependent(input);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_teiru_compound() {
        let input = vec![verb("食べて", "食べる"), verb("いる", "いる")];
        let out = fuse_teiru(input);
        assert_eq!(surfaces(&out), vec!["食べている"]);
    }

    #[test]
    fn test_auxiliary_chain_fuses() {
        let input = vec![
            verb("食べ", "食べる"),
            test_morpheme("させ", PosClass::Auxiliary, "", "させる"),
            test_morpheme("られ", PosClass::Auxiliary, "", "られる"),
            test_morpheme("た", PosClass::Auxiliary, "", "た"),
        ];
        let out = fuse_auxiliary(input);
        assert_eq!(surfaces(&out), vec!["食べさせられた"]);
        assert_eq!(out[0].dictionary_form, "食べる");
    }

    #[test]
    fn test_auxiliary_exception_list_blocks_copula() {
        let input = vec![
            verb("食べる", "食べる"),
            test_morpheme("らしい", PosClass::Auxiliary, "", "らしい"),
        ];
        let out = fuse_auxiliary(input);
        assert_eq!(out.len(), 2, "hearsay marker must stay separate");

        let input = vec![
            test_morpheme("静か", PosClass::Adjective, "", "静か"),
            test_morpheme("だ", PosClass::Auxiliary, "", "だ"),
        ];
        let out = fuse_auxiliary(input);
        assert_eq!(out.len(), 2, "sentence-final copula must stay separate");
    }

    #[test]
    fn test_particle_pair_contraction() {
        let input = vec![
            test_morpheme("に", PosClass::Particle, "格助詞", "に"),
            test_morpheme("は", PosClass::Particle, "係助詞", "は"),
        ];
        let out = fuse_particle_pairs(input);
        assert_eq!(surfaces(&out), vec!["には"]);

        let input = vec![
            test_morpheme("が", PosClass::Particle, "格助詞", "が"),
            test_morpheme("は", PosClass::Particle, "係助詞", "は"),
        ];
        let out = fuse_particle_pairs(input);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_trailing_conditional_cleanup() {
        let input = vec![
            verb("食べなけれ", "食べる"),
            test_morpheme("ば", PosClass::Particle, "接続助詞", "ば"),
        ];
        let out = fuse_trailing_conditional(input);
        assert_eq!(surfaces(&out), vec!["食べなければ"]);
    }

    #[test]
    fn test_honorific_split() {
        let mut name = test_morpheme("田中さん", PosClass::Noun, "固有名詞", "田中さん");
        name.subclasses[1] = Some("人名".to_string());
        name.reading = "タナカサン".to_string();
        let out = split_honorifics(vec![name]);
        assert_eq!(surfaces(&out), vec!["田中", "さん"]);
        assert_eq!(out[0].reading, "タナカ");
        assert_eq!(out[1].subclasses[0].as_deref(), Some("接尾"));
    }

    #[test]
    fn test_honorific_split_requires_person_tag() {
        let plain = test_morpheme("お父さん", PosClass::Noun, "一般", "お父さん");
        let out = split_honorifics(vec![plain]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_honorific_alone_not_split() {
        let mut m = test_morpheme("さん", PosClass::Noun, "固有名詞", "さん");
        m.subclasses[1] = Some("人名".to_string());
        let out = split_honorifics(vec![m]);
        assert_eq!(out.len(), 1);
    }
}
