//! Lexical-script detection for looked-up words.
//!
//! Lookup stems often carry stray punctuation, brackets or latin noise picked
//! up by the reader's word selection. Only the longest contiguous run of
//! Japanese lexical characters is kept.

/// Hiragana, katakana (with ー and half-width forms), CJK ideographs and the
/// iteration/abbreviation marks that appear inside words
pub fn is_lexical(c: char) -> bool {
    matches!(
        c,
        '\u{3041}'..='\u{309F}'      // hiragana
            | '\u{30A1}'..='\u{30FA}' // katakana, ヶ
            | '\u{30FC}'..='\u{30FF}' // ー and iteration marks, without the middle dot
            | '\u{31F0}'..='\u{31FF}' // katakana phonetic extensions
            | '\u{FF66}'..='\u{FF9F}' // half-width katakana
            | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
            | '\u{3400}'..='\u{4DBF}' // extension A
            | '\u{F900}'..='\u{FAFF}' // compatibility ideographs
            | '々'
            | '〆'
    )
}

/// Longest run of lexical characters; the first one wins a tie
pub fn longest_lexical_run(text: &str) -> Option<&str> {
    let mut best: Option<(usize, usize, usize)> = None;
    let mut current: Option<(usize, usize)> = None;

    for (idx, c) in text.char_indices() {
        if is_lexical(c) {
            let (start, len) = current.get_or_insert((idx, 0));
            *len += 1;
            let end = idx + c.len_utf8();
            if best.is_none_or(|(_, _, best_len)| *len > best_len) {
                best = Some((*start, end, *len));
            }
        } else {
            current = None;
        }
    }

    best.map(|(start, end, _)| &text[start..end])
}

/// Keep the longest lexical run, or the original text when there is none
pub fn strip_non_lexical(text: &str) -> &str {
    longest_lexical_run(text).unwrap_or(text)
}
