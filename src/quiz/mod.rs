pub mod catalog;
pub mod category;
pub mod diagnostics;
pub mod error;
pub mod exam;
pub mod legacy;
pub mod loader;
pub mod plain_text;
pub mod structured;

use std::collections::BTreeMap;
use std::fmt::Write;

use category::CategoryMetadata;

/// Letters a question may use for its options, in display order.
pub const OPTION_LETTERS: [char; 5] = ['a', 'b', 'c', 'd', 'e'];

/// Used when no answer could be recovered from the source.
pub const FALLBACK_ANSWER: char = 'a';

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Quiz {
    pub questions: Vec<NormalizedQuestion>,
}

impl Quiz {
    pub fn new(questions: Vec<NormalizedQuestion>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuestionCategory {
    pub name: String,
    pub subcategory: Option<String>,
    pub icon: String,
    pub bg_color_token: String,
    pub text_color_token: String,
}

impl QuestionCategory {
    pub fn new(name: &str, subcategory: Option<&str>, meta: CategoryMetadata) -> Self {
        Self {
            name: name.to_string(),
            subcategory: subcategory.map(str::to_string),
            icon: meta.icon.to_string(),
            bg_color_token: meta.bg_color_token.to_string(),
            text_color_token: meta.text_color_token.to_string(),
        }
    }
}

/// A multiple-choice question in the shape every source format is parsed into.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NormalizedQuestion {
    pub question_text: String,
    /// Keyed by lower-case letter; always at least two entries.
    pub options: BTreeMap<char, String>,
    /// May point at a placeholder option when the source was incomplete.
    pub answer_letter: char,
    pub category: QuestionCategory,
}

impl NormalizedQuestion {
    pub fn is_correct(&self, letter: char) -> bool {
        letter.to_ascii_lowercase() == self.answer_letter
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(&self.answer_letter).map(String::as_str)
    }

    /// Prompt followed by one `x) text` line per option.
    pub fn render(&self) -> String {
        let mut text = self.question_text.clone();
        text.push('\n');
        for (letter, option) in &self.options {
            let _ = write!(text, "\n{}) {}", letter, option);
        }
        text
    }
}

pub fn placeholder_option(letter: char) -> String {
    format!("[Option {}]", letter.to_ascii_uppercase())
}

/// Adds `[Option X]` entries for missing letters a-d until four options exist.
///
/// Returns how many placeholders were inserted.
pub fn fill_placeholder_options(options: &mut BTreeMap<char, String>) -> usize {
    let mut inserted = 0;
    for letter in &OPTION_LETTERS[..4] {
        if options.len() >= 4 {
            break;
        }
        if !options.contains_key(letter) {
            options.insert(*letter, placeholder_option(*letter));
            inserted += 1;
        }
    }
    inserted
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_fill_up_to_four() {
        let mut options = BTreeMap::new();
        options.insert('b', "Dog".to_string());
        let inserted = fill_placeholder_options(&mut options);
        assert_eq!(inserted, 3);
        assert_eq!(options.len(), 4);
        assert_eq!(options[&'a'], "[Option A]");
        assert_eq!(options[&'b'], "Dog");
        assert_eq!(options[&'d'], "[Option D]");
    }

    #[test]
    fn placeholders_leave_full_sets_alone() {
        let mut options: BTreeMap<char, String> = OPTION_LETTERS[..4]
            .iter()
            .map(|l| (*l, l.to_string()))
            .collect();
        assert_eq!(fill_placeholder_options(&mut options), 0);
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn render_lists_options_in_letter_order() {
        let mut options = BTreeMap::new();
        options.insert('b', "Dog".to_string());
        options.insert('a', "Cat".to_string());
        let question = NormalizedQuestion {
            question_text: "Pick one".to_string(),
            options,
            answer_letter: 'b',
            category: QuestionCategory::default(),
        };
        assert_eq!(question.render(), "Pick one\n\na) Cat\nb) Dog");
        assert!(question.is_correct('B'));
        assert_eq!(question.correct_option(), Some("Dog"));
    }

    #[test]
    fn collapse_whitespace_joins_with_single_spaces() {
        assert_eq!(collapse_whitespace("  a \n b\t\tc "), "a b c");
    }
}
