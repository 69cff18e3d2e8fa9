//! Text statistics shown in the status bar.
//!
//! Statistics are never cached: callers recompute them from the current text
//! every time, so a stale count can't leak out of a [`crate::model::Note`].

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStatistics {
    pub line_count: usize,
    pub word_count: usize,
    pub char_count: usize,
}

impl TextStatistics {
    /// Status bar text, e.g. `Lines: 2 | Words: 5 | Characters: 31 | todo.md`.
    pub fn status_line(&self, file_name: Option<&str>) -> String {
        let mut status = format!(
            "Lines: {} | Words: {} | Characters: {}",
            self.line_count, self.word_count, self.char_count
        );
        if let Some(name) = file_name {
            status.push_str(" | ");
            status.push_str(name);
        }
        status
    }
}

/// Computes line, word and character counts for `text`.
///
/// - Blank text (empty or whitespace only) has no lines and no words.
/// - Otherwise lines are `'\n'` count plus one, words are whitespace-separated tokens.
/// - `char_count` is always the number of characters, whitespace included.
pub fn compute_statistics(text: &str) -> TextStatistics {
    let char_count = text.chars().count();

    // Newline-only text is blank too: "\n\n" has no lines, not three.
    if text.trim().is_empty() {
        return TextStatistics {
            line_count: 0,
            word_count: 0,
            char_count,
        };
    }

    TextStatistics {
        line_count: text.matches('\n').count() + 1,
        word_count: text.split_whitespace().count(),
        char_count,
    }
}
