//! Token derivation from composition text.

/// Bar separator token. Structural only, never played.
pub const BAR_TOKEN: &str = "|";

/// A single token of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A note identifier, matched against the key layout as an opaque string.
    Note(&'a str),
    /// The bar separator `|`.
    Bar,
}

impl<'a> Token<'a> {
    /// Classifies a raw non-empty token.
    pub fn classify(raw: &'a str) -> Self {
        if raw == BAR_TOKEN {
            Token::Bar
        } else {
            Token::Note(raw)
        }
    }
}

/// Splits composition text into tokens on runs of any whitespace.
///
/// Irregular spacing typed by hand is tolerated here; the text itself is
/// left alone.
pub fn tokens(text: &str) -> impl Iterator<Item = Token<'_>> {
    text.split_whitespace().map(Token::classify)
}

/// Returns the ordered note tokens to play, with bar separators removed.
pub fn playable_notes(text: &str) -> Vec<String> {
    tokens(text)
        .filter_map(|token| match token {
            Token::Note(name) => Some(name.to_string()),
            Token::Bar => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_classify_bars() {
        let parsed: Vec<Token> = tokens("C4 | D4").collect();
        assert_eq!(parsed, vec![Token::Note("C4"), Token::Bar, Token::Note("D4")]);
    }

    #[test]
    fn test_playable_notes_drop_bars_and_empty_fragments() {
        assert_eq!(
            playable_notes("  C4   E4 |\tG4\n| C5 "),
            vec!["C4", "E4", "G4", "C5"]
        );
        assert!(playable_notes("").is_empty());
        assert!(playable_notes("   | |  ").is_empty());
    }

    #[test]
    fn test_glued_bar_is_a_note_token() {
        // Only a standalone `|` is a separator.
        assert_eq!(playable_notes("C4| D4"), vec!["C4|", "D4"]);
    }

    #[test]
    fn test_note_count_is_runs_minus_bar_runs() {
        let samples = [
            "C4 E4 G4 C5 | E4 G4 C5 E5",
            "|",
            "C4  D4",
            " | C4 |  | D4",
            "C4|D4 |",
        ];
        for text in samples {
            let runs = text.split_whitespace().count();
            let bars = text.split_whitespace().filter(|t| *t == "|").count();
            assert_eq!(playable_notes(text).len(), runs - bars, "{:?}", text);
        }
    }
}
