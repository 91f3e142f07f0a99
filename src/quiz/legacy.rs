//! Strict reader for numbered question files: incomplete questions are dropped.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::quiz::category::resolve_category_meta;
use crate::quiz::diagnostics::Diagnostics;
use crate::quiz::{NormalizedQuestion, QuestionCategory};

static QUESTION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*\.\s*(.+)").expect("valid regex"));

static OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-e])\)\s*(.+)").expect("valid regex"));

static ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^answer\s*:\s*([a-e])").expect("valid regex"));

/// Option or answer markers without usable content, e.g. `c)` or `Answer: -`.
static LEFTOVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-e]\)|(?i:answer)\s*:)").expect("valid regex"));

/// A question being assembled line by line.
#[derive(Debug, Default)]
struct Pending {
    number: usize,
    text: String,
    options: BTreeMap<char, String>,
    answer: Option<char>,
}

impl Pending {
    fn finish(
        self,
        category: &QuestionCategory,
        source: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<NormalizedQuestion> {
        let context = format!("{} question {}", source, self.number);
        if self.options.len() < 2 {
            diagnostics.warn(
                context,
                format!("dropping question with {} options", self.options.len()),
            );
            return None;
        }
        let Some(answer_letter) = self.answer else {
            diagnostics.warn(context, "dropping question without an answer line");
            return None;
        };
        Some(NormalizedQuestion {
            question_text: self.text,
            options: self.options,
            answer_letter,
            category: category.clone(),
        })
    }
}

pub fn parse_legacy_line_format(
    raw_text: &str,
    category_name: &str,
    subcategory_name: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<NormalizedQuestion> {
    let category = QuestionCategory::new(
        category_name,
        Some(subcategory_name),
        resolve_category_meta(subcategory_name),
    );

    let mut questions = Vec::new();
    let mut current: Option<Pending> = None;
    let mut seen = 0;

    for line in raw_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = QUESTION_START.captures(line) {
            if let Some(done) = current.take() {
                questions.extend(done.finish(&category, subcategory_name, diagnostics));
            }
            seen += 1;
            current = Some(Pending {
                number: seen,
                text: caps[1].trim().to_string(),
                ..Pending::default()
            });
            continue;
        }

        // Lines before the first numbered question are ignored.
        let Some(pending) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = OPTION.captures(line) {
            if let Some(letter) = caps[1].chars().next() {
                pending.options.insert(letter, caps[2].trim().to_string());
            }
        } else if let Some(caps) = ANSWER.captures(line) {
            pending.answer = caps[1].chars().next().map(|c| c.to_ascii_lowercase());
        } else if !LEFTOVER.is_match(line) {
            pending.text.push(' ');
            pending.text.push_str(line);
        }
    }

    if let Some(done) = current {
        questions.extend(done.finish(&category, subcategory_name, diagnostics));
    }
    questions
}
