//! Parser for JSON question documents (`{"category": .., "questions": [..]}`).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::quiz::category::resolve_category_meta;
use crate::quiz::diagnostics::Diagnostics;
use crate::quiz::{
    fill_placeholder_options, NormalizedQuestion, QuestionCategory, FALLBACK_ANSWER,
    OPTION_LETTERS,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredDocument {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Kept loose so one malformed entry cannot sink the whole document.
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
}

impl StructuredDocument {
    /// The label a document gives itself, `category` before `name`.
    pub fn own_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .or(self.name.as_deref())
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructuredEntry {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

static FILE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(File\s+\d+(?:\s*-\s*[^)]+)?\)\s*").expect("valid regex")
});

static CATEGORY_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*\([^)]*(?:Antonym|Synonym|Active|Passive|Grammar|Vocabulary|Idiom|Phrase|Spelling|Comprehension|Reading|Writing)[^)]*\)\s*$",
    )
    .expect("valid regex")
});

static OPTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\([a-eA-E]\)|[a-eA-E]\))\s*").expect("valid regex"));

static LEADING_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-dA-D])\s*[(.]").expect("valid regex"));

static BARE_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-dA-D])$").expect("valid regex"));

pub fn clean_question_text(text: &str) -> String {
    CATEGORY_HINT
        .replace(&FILE_REFERENCE.replace_all(text, ""), "")
        .trim()
        .to_string()
}

pub fn clean_option_text(text: &str) -> String {
    FILE_REFERENCE
        .replace_all(&OPTION_PREFIX.replace(text, ""), "")
        .trim()
        .to_string()
}

/// Pulls an answer letter out of strings like `"C (Present Perfect ...)"`,
/// `"c."` or `"b"`. Returns `None` when no strategy recognises the text.
pub fn extract_answer_letter(answer: &str) -> Option<char> {
    let strategies: [fn(&str) -> Option<char>; 3] = [
        |a| LEADING_ANSWER.captures(a).and_then(|c| c[1].chars().next()),
        |a| BARE_ANSWER.captures(a).and_then(|c| c[1].chars().next()),
        |a| a.trim().chars().next().filter(|c| matches!(*c, 'a'..='d' | 'A'..='D')),
    ];
    strategies
        .iter()
        .find_map(|strategy| strategy(answer))
        .map(|c| c.to_ascii_lowercase())
}

/// Normalizes one document entry.
///
/// Options are lettered by position in the source array; any letter embedded
/// in the option text is discarded.
pub fn parse_structured_question(
    entry: &StructuredEntry,
    category: &QuestionCategory,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> NormalizedQuestion {
    if entry.options.len() > OPTION_LETTERS.len() {
        diagnostics.warn(
            context,
            format!(
                "dropping {} options beyond '{}'",
                entry.options.len() - OPTION_LETTERS.len(),
                OPTION_LETTERS[OPTION_LETTERS.len() - 1]
            ),
        );
    }

    let mut options: BTreeMap<char, String> = OPTION_LETTERS
        .iter()
        .zip(&entry.options)
        .map(|(letter, text)| (*letter, clean_option_text(text)))
        .collect();

    if options.len() < 2 {
        let inserted = fill_placeholder_options(&mut options);
        diagnostics.warn(
            context,
            format!("only {} options, inserted {} placeholders", entry.options.len(), inserted),
        );
    }

    let answer_letter = extract_answer_letter(&entry.answer).unwrap_or_else(|| {
        diagnostics.warn(
            context,
            format!(
                "could not extract answer letter from '{}', using default '{}'",
                entry.answer, FALLBACK_ANSWER
            ),
        );
        FALLBACK_ANSWER
    });

    NormalizedQuestion {
        question_text: clean_question_text(&entry.question),
        options,
        answer_letter,
        category: category.clone(),
    }
}

/// Normalizes every usable entry of a document.
///
/// The subcategory is the document's own label, or `fallback_subcategory`
/// when it has none.
pub fn parse_structured_document(
    document: &StructuredDocument,
    category_name: &str,
    fallback_subcategory: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<NormalizedQuestion> {
    let subcategory_name = document.own_label().unwrap_or(fallback_subcategory);
    let category = QuestionCategory::new(
        category_name,
        Some(subcategory_name),
        resolve_category_meta(subcategory_name),
    );

    if document.questions.is_empty() {
        diagnostics.warn(subcategory_name, "document has no questions");
    }

    document
        .questions
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let context = format!("{} question {}", subcategory_name, index + 1);
            match StructuredEntry::deserialize(value) {
                Ok(entry) => Some(parse_structured_question(
                    &entry,
                    &category,
                    &context,
                    diagnostics,
                )),
                Err(err) => {
                    diagnostics.warn(&context, format!("skipping entry: {}", err));
                    None
                }
            }
        })
        .collect()
}

pub fn parse_structured_text(
    raw_text: &str,
    category_name: &str,
    fallback_subcategory: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<NormalizedQuestion> {
    match serde_json::from_str::<StructuredDocument>(raw_text) {
        Ok(document) => {
            parse_structured_document(&document, category_name, fallback_subcategory, diagnostics)
        }
        Err(err) => {
            diagnostics.warn(
                fallback_subcategory,
                format!("invalid question document: {}", err),
            );
            Vec::new()
        }
    }
}
