//! Contract for the external tokenizer.
//!
//! The tokenizer itself is a native black box and is **not** safe to
//! invoke concurrently. [`SharedTokenizer`] is the single serialization
//! point: it owns the backend behind a mutex, so every call in the
//! process goes through one lock. Nothing in this crate works around
//! that property.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug_span;

use crate::morpheme::{Morpheme, PosError};

/// Output mode flag passed through to the tokenizer invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeMode {
    /// Full morpheme records; what the analysis pipeline consumes.
    Morpheme,
    /// Surface-only segmentation: space-separated surfaces, one input
    /// segment per line.
    Wakati,
}

/// The external segmenter: config path + text + dictionary path + mode
/// in, raw newline-separated records out.
///
/// Implementations wrap a native library or a subprocess; they are
/// expected to be `!Sync` in spirit even when the type system cannot
/// see it, which is why the only consumer is [`SharedTokenizer`].
pub trait TokenizeBackend: Send {
    fn run(
        &mut self,
        config: &Path,
        text: &str,
        dictionary: &Path,
        mode: TokenizeMode,
    ) -> io::Result<String>;
}

/// Process-wide serialized access to one tokenizer backend.
pub struct SharedTokenizer<B: TokenizeBackend> {
    backend: Mutex<B>,
    config: PathBuf,
    dictionary: PathBuf,
}

impl<B: TokenizeBackend> SharedTokenizer<B> {
    pub fn new(backend: B, config: PathBuf, dictionary: PathBuf) -> Self {
        Self {
            backend: Mutex::new(backend),
            config,
            dictionary,
        }
    }

    /// Run the backend on `text` and parse its output into morphemes.
    ///
    /// The mutex is held for the whole native call; callers on other
    /// threads queue up behind it.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>, TokenizeError> {
        let _span = debug_span!("tokenize", len = text.len()).entered();
        let raw = self.run_locked(text, TokenizeMode::Morpheme)?;
        parse_token_output(&raw).map_err(TokenizeError::Pos)
    }

    /// Surface-only segmentation: just the token surfaces, in order.
    ///
    /// Same serialization contract as [`Self::tokenize`]; useful when a
    /// caller needs word boundaries without the analysis pipeline.
    pub fn tokenize_surfaces(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let _span = debug_span!("tokenize_surfaces", len = text.len()).entered();
        let raw = self.run_locked(text, TokenizeMode::Wakati)?;
        Ok(parse_wakati_output(&raw))
    }

    fn run_locked(&self, text: &str, mode: TokenizeMode) -> Result<String, TokenizeError> {
        let mut backend = self.backend.lock().expect("tokenizer mutex poisoned");
        backend
            .run(&self.config, text, &self.dictionary, mode)
            .map_err(TokenizeError::Io)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error("tokenizer invocation failed: {0}")]
    Io(#[source] io::Error),

    #[error(transparent)]
    Pos(#[from] PosError),
}

/// Parse wakati-mode output: space-separated surfaces, one segment per
/// line.
pub fn parse_wakati_output(raw: &str) -> Vec<String> {
    raw.lines()
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

/// Parse the raw record stream into a flat morpheme list.
///
/// `EOS` segment markers are consumed; malformed records are dropped.
/// Only an unmapped POS class aborts the parse.
pub fn parse_token_output(raw: &str) -> Result<Vec<Morpheme>, PosError> {
    let mut morphemes = Vec::new();
    for line in raw.lines() {
        if line == "EOS" || line.is_empty() {
            continue;
        }
        if let Some(m) = Morpheme::parse_record(line)? {
            morphemes.push(m);
        }
    }
    Ok(morphemes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morpheme::PosClass;

    struct FixedBackend {
        morpheme: String,
        wakati: String,
    }

    impl FixedBackend {
        fn new(morpheme: &str) -> Self {
            FixedBackend {
                morpheme: morpheme.to_string(),
                wakati: String::new(),
            }
        }
    }

    impl TokenizeBackend for FixedBackend {
        fn run(
            &mut self,
            _config: &Path,
            _text: &str,
            _dictionary: &Path,
            mode: TokenizeMode,
        ) -> io::Result<String> {
            Ok(match mode {
                TokenizeMode::Morpheme => self.morpheme.clone(),
                TokenizeMode::Wakati => self.wakati.clone(),
            })
        }
    }

    const SAMPLE: &str = "\
猫\t名詞,一般,*,*\t猫\t猫\t*\tネコ
が\t助詞,格助詞,一般,*\tが\tが\t*\tガ
鳴い\t動詞,自立,*,*,五段・カ行イ音便,連用タ接続\t鳴い\t鳴く\t*\tナイ
た\t助動詞,*,*,*\tた\tた\t*\tタ
EOS
";

    #[test]
    fn test_parse_token_output() {
        let morphemes = parse_token_output(SAMPLE).unwrap();
        assert_eq!(morphemes.len(), 4);
        assert_eq!(morphemes[0].surface, "猫");
        assert_eq!(morphemes[2].dictionary_form, "鳴く");
        assert_eq!(morphemes[3].class, PosClass::Auxiliary);
    }

    #[test]
    fn test_parse_token_output_drops_noise() {
        let raw = "garbage line\n猫\t名詞,一般,*,*\t猫\t猫\t*\tネコ\nEOS\n";
        let morphemes = parse_token_output(raw).unwrap();
        assert_eq!(morphemes.len(), 1);
    }

    #[test]
    fn test_shared_tokenizer_round_trip() {
        let tok = SharedTokenizer::new(
            FixedBackend::new(SAMPLE),
            PathBuf::from("/dev/null"),
            PathBuf::from("/dev/null"),
        );
        let morphemes = tok.tokenize("猫が鳴いた").unwrap();
        assert_eq!(morphemes.len(), 4);
    }

    #[test]
    fn test_tokenize_surfaces_uses_wakati_mode() {
        let mut backend = FixedBackend::new(SAMPLE);
        backend.wakati = "猫 が 鳴い た\nはい\n".to_string();
        let tok = SharedTokenizer::new(
            backend,
            PathBuf::from("/dev/null"),
            PathBuf::from("/dev/null"),
        );
        let surfaces = tok.tokenize_surfaces("猫が鳴いた。はい").unwrap();
        assert_eq!(surfaces, vec!["猫", "が", "鳴い", "た", "はい"]);
    }

    #[test]
    fn test_parse_wakati_output_empty_lines() {
        assert!(parse_wakati_output("").is_empty());
        assert_eq!(parse_wakati_output("一つ\n\n二つ 三つ\n"), vec!["一つ", "二つ", "三つ"]);
    }

    #[test]
    fn test_unmapped_class_surfaces_as_error() {
        let tok = SharedTokenizer::new(
            FixedBackend::new("犬\t謎品詞,一般,*,*\t犬\t犬\t*\tイヌ\n"),
            PathBuf::from("/dev/null"),
            PathBuf::from("/dev/null"),
        );
        assert!(matches!(
            tok.tokenize("犬"),
            Err(TokenizeError::Pos(PosError::UnmappedClass(_)))
        ));
    }
}
