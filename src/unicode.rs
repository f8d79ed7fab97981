/// Character classification for sentence segmentation.

/// Sentence-ending punctuation. Flips the segmenter's seen-ender flag.
pub fn is_sentence_ender(c: char) -> bool {
    matches!(c, '。' | '．' | '！' | '？' | '!' | '?')
}

/// Punctuation absorbed into a sentence after an ender has been seen:
/// further enders plus closing quotes/brackets (」 after 。 etc.).
pub fn is_trailing_punct(c: char) -> bool {
    is_sentence_ender(c)
        || matches!(
            c,
            '」' | '』' | '）' | '〉' | '》' | '】' | '”' | '’' | ')' | '"' | '\''
        )
}

pub fn is_ellipsis(c: char) -> bool {
    matches!(c, '…' | '‥')
}
