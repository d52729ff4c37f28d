use indexmap::IndexMap;
use serde::Serialize;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Tokens seen more than this many times are reported as frequent.
pub const FREQUENT_WORD_MIN: u64 = 3;

/// Token counts in first-encounter order.
pub type WordCounts = IndexMap<String, u64>;

/// Result of analyzing a block of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextAnalysis {
    pub counts: WordCounts,
    /// Tokens whose count is strictly greater than the threshold, in first-encounter order.
    pub frequent: Vec<String>,
}

impl TextAnalysis {
    /// Number of tokens the text produced, duplicates included.
    pub fn total_tokens(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Lowercase `text`, drop everything that is not a word character or
/// whitespace, and split on whitespace runs.
///
/// Word characters are letters (`L*`), numbers (`N*`) and `_`; combining
/// marks and symbols such as `Ⓐ` are dropped. Whitespace also includes the
/// information separators U+001C..=U+001F. Case mapping runs first so marks
/// it introduces (`İ` → `i̇`) are dropped too, which keeps the result stable
/// when fed back in.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || is_separator(*c))
        .collect();
    cleaned
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    use GeneralCategory::*;

    c == '_'
        || matches!(
            get_general_category(c),
            UppercaseLetter
                | LowercaseLetter
                | TitlecaseLetter
                | ModifierLetter
                | OtherLetter
                | DecimalNumber
                | LetterNumber
                | OtherNumber
        )
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Count tokens in `text` and report those seen more than [`FREQUENT_WORD_MIN`] times.
pub fn analyze(text: &str) -> TextAnalysis {
    analyze_with_threshold(text, FREQUENT_WORD_MIN)
}

/// Like [`analyze`], with a caller-supplied frequency threshold (strict `>`).
pub fn analyze_with_threshold(text: &str, min_count: u64) -> TextAnalysis {
    let mut counts = WordCounts::new();
    for token in normalize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }

    let frequent = counts
        .iter()
        .filter(|(_, count)| **count > min_count)
        .map(|(token, _)| token.clone())
        .collect();

    TextAnalysis { counts, frequent }
}
