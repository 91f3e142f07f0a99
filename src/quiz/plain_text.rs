//! Parser for hand-authored numbered question files.
//!
//! A file is a sequence of blocks, each opened by a `<number>.` line. Inside a
//! block every line is either an answer line, an option line or part of the
//! question text. Missing answers and options are recovered from the question
//! text when possible and defaulted otherwise, so a block is only ever dropped
//! when it is too short to be a question at all.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::quiz::category::resolve_category_meta;
use crate::quiz::diagnostics::Diagnostics;
use crate::quiz::{
    collapse_whitespace, fill_placeholder_options, NormalizedQuestion, QuestionCategory,
    FALLBACK_ANSWER,
};

/// Fewest lines a block needs: two options and an answer signal.
const MIN_BLOCK_LINES: usize = 3;

const ERROR_SPOTTING_PROMPT: &str = "Find the part of the sentence that has an error.";

/// Categories whose files often put the options on the question line itself.
const EMBEDDED_OPTION_CATEGORIES: [&str; 2] = ["general knowledge", "meghalaya gk"];

static BLOCK_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s*").expect("valid regex"));

static ANSWER_LINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^answer:\s*([a-d])",
        r"(?i)^answer\s*[:\-]\s*([a-d])",
        r"(?i)^answer\s*[:\-]\s*option\s*[:\-]?\s*([a-d])",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-d])\s*[).]\s*(.*)$").expect("valid regex"));

static TRAILING_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\(([a-d])\)\s*$").expect("valid regex"));

/// Bracketed, parenthesised and bare answer tokens, tried in that order.
static INLINE_ANSWER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s*\[(?:answer|ans)\.?\s*:?\s*([a-d])\]\s*",
        r"(?i)\s*\((?:answer|ans)\.?\s*:?\s*([a-d])\)\s*",
        r"(?i)\s*\b(?:answer|ans)\.?\s*:?\s*([a-d])\b\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static EMBEDDED_OPTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)([a-d])\)\s*").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Answer(char),
    Option(char, &'a str),
    Text(&'a str),
}

fn answer_letter(line: &str) -> Option<char> {
    ANSWER_LINE_PATTERNS
        .iter()
        .find_map(|re| re.captures(line))
        .and_then(|caps| first_letter(&caps[1]))
}

/// Answer lines are checked first, including option-shaped lines such as
/// "a) Answer: b" whose text is itself an answer line.
fn classify_line(line: &str) -> Line<'_> {
    if let Some(letter) = answer_letter(line) {
        return Line::Answer(letter);
    }

    if let Some(caps) = OPTION_LINE.captures(line) {
        if let (Some(letter), Some(text)) = (first_letter(&caps[1]), caps.get(2)) {
            let text = text.as_str().trim();
            return match answer_letter(text) {
                Some(answer) => Line::Answer(answer),
                None => Line::Option(letter, text),
            };
        }
    }

    Line::Text(line)
}

fn first_letter(text: &str) -> Option<char> {
    text.chars().next().map(|c| c.to_ascii_lowercase())
}

/// Where an answer letter was finally taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerSource {
    AnswerLine,
    TrailingLetter,
    InlineToken,
    Fallback,
}

/// Trailing `(x)` at the end of the question text, stripped on success.
fn answer_from_trailing_letter(question: &mut String) -> Option<char> {
    let letter = TRAILING_LETTER
        .captures(question.as_str())
        .and_then(|caps| first_letter(&caps[1]))?;
    let stripped = TRAILING_LETTER
        .replace(question.as_str(), "")
        .trim()
        .to_string();
    *question = stripped;
    Some(letter)
}

/// `[Answer: x]`, `(Answer: x)` or a bare `Answer x` anywhere in the text.
fn answer_from_inline_token(question: &mut String) -> Option<char> {
    let letter = INLINE_ANSWER_PATTERNS
        .iter()
        .find_map(|re| re.captures(question.as_str()))
        .and_then(|caps| first_letter(&caps[1]))?;

    let mut cleaned = question.clone();
    for re in INLINE_ANSWER_PATTERNS.iter() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    *question = collapse_whitespace(&cleaned);
    Some(letter)
}

fn resolve_answer(answer_line: Option<char>, question: &mut String) -> (char, AnswerSource) {
    if let Some(letter) = answer_line {
        return (letter, AnswerSource::AnswerLine);
    }
    if let Some(letter) = answer_from_trailing_letter(question) {
        return (letter, AnswerSource::TrailingLetter);
    }
    if let Some(letter) = answer_from_inline_token(question) {
        return (letter, AnswerSource::InlineToken);
    }
    (FALLBACK_ANSWER, AnswerSource::Fallback)
}

/// Pulls `x) text` runs out of the question text.
///
/// The prompt keeps whatever precedes the first marker, minus a trailing colon.
fn extract_embedded_options(question: &mut String) -> BTreeMap<char, String> {
    let markers: Vec<(char, usize, usize)> = EMBEDDED_OPTION_MARKER
        .captures_iter(question.as_str())
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((first_letter(&caps[1])?, whole.start(), whole.end()))
        })
        .collect();

    let mut options = BTreeMap::new();
    let Some(&(_, prompt_end, _)) = markers.first() else {
        return options;
    };

    for (i, &(letter, _, text_start)) in markers.iter().enumerate() {
        let text_end = markers
            .get(i + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(question.len());
        let text = question[text_start..text_end].trim();
        if !text.is_empty() {
            options.insert(letter, text.to_string());
        }
    }

    if !options.is_empty() {
        let prompt = collapse_whitespace(&question[..prompt_end]);
        *question = prompt.trim_end_matches(':').trim_end().to_string();
    }
    options
}

fn wants_embedded_options(category: &str, subcategory: &str) -> bool {
    [category, subcategory].iter().any(|name| {
        EMBEDDED_OPTION_CATEGORIES
            .iter()
            .any(|known| name.eq_ignore_ascii_case(known))
    })
}

fn is_error_spotting(subcategory: &str) -> bool {
    subcategory.to_lowercase().contains("error spotting")
}

/// Parses every numbered block in `raw_text`.
///
/// Blocks with fewer than three non-empty lines are skipped. Every other
/// block yields a question, patched with defaults where the source is
/// incomplete. Each skip and patch is recorded in `diagnostics`.
pub fn parse_plain_text_questions(
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

    let blocks: Vec<&str> = BLOCK_DELIMITER
        .split(raw_text)
        .filter(|block| !block.is_empty())
        .collect();
    diagnostics.debug(
        subcategory_name,
        format!("found {} question blocks", blocks.len()),
    );

    blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let context = format!("{} block {}", subcategory_name, index + 1);
            parse_block(block, &category, subcategory_name, &context, diagnostics)
        })
        .collect()
}

fn parse_block(
    block: &str,
    category: &QuestionCategory,
    subcategory_name: &str,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Option<NormalizedQuestion> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < MIN_BLOCK_LINES {
        diagnostics.warn(
            context,
            format!("skipping block with insufficient lines ({})", lines.len()),
        );
        return None;
    }

    let mut question_lines = Vec::new();
    let mut options = BTreeMap::new();
    let mut answer_line = None;

    for line in lines {
        match classify_line(line) {
            Line::Answer(letter) => answer_line = Some(letter),
            Line::Option(letter, text) => {
                options.insert(letter, text.to_string());
            }
            Line::Text(text) => question_lines.push(text),
        }
    }

    let mut question_text = if is_error_spotting(subcategory_name) {
        ERROR_SPOTTING_PROMPT.to_string()
    } else {
        question_lines.join(" ")
    };

    let (answer_letter, source) = resolve_answer(answer_line, &mut question_text);
    match source {
        AnswerSource::AnswerLine => {}
        AnswerSource::TrailingLetter | AnswerSource::InlineToken => diagnostics.debug(
            context,
            format!(
                "missing answer line, took '{}' from the question text",
                answer_letter
            ),
        ),
        AnswerSource::Fallback => diagnostics.warn(
            context,
            format!("missing answer, using default '{}'", FALLBACK_ANSWER),
        ),
    }

    if options.len() < 2 {
        diagnostics.warn(
            context,
            format!("not enough options ({})", options.len()),
        );

        if wants_embedded_options(&category.name, subcategory_name) {
            let embedded = extract_embedded_options(&mut question_text);
            if !embedded.is_empty() {
                diagnostics.debug(
                    context,
                    format!("extracted {} options from the question text", embedded.len()),
                );
            }
            options.extend(embedded);
        }

        if options.len() < 2 {
            let inserted = fill_placeholder_options(&mut options);
            diagnostics.warn(context, format!("inserted {} placeholder options", inserted));
        }
    }

    Some(NormalizedQuestion {
        question_text,
        options,
        answer_letter,
        category: category.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(text: &str, category: &str, subcategory: &str) -> (Vec<NormalizedQuestion>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let questions = parse_plain_text_questions(text, category, subcategory, &mut diagnostics);
        (questions, diagnostics)
    }

    #[test]
    fn parses_well_formed_blocks() {
        let text = "1. What is the opposite of hot?\na) Cold\nb) Warm\nc) Wet\nd) Dry\nAnswer: a\n\n\
                    2. Pick the synonym of big.\na) Small\nb) Large\nc) Thin\nd) Short\nAnswer - b\n";
        let (questions, diagnostics) = parse(text, "General English", "Antonyms");

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question_text, "What is the opposite of hot?");
        assert_eq!(questions[0].answer_letter, 'a');
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].options[&'b'], "Warm");
        assert_eq!(questions[1].answer_letter, 'b');
        assert_eq!(questions[1].category.name, "General English");
        assert_eq!(questions[1].category.subcategory.as_deref(), Some("Antonyms"));
        assert_eq!(questions[1].category.icon, "🔄");
        assert_eq!(diagnostics.warnings().count(), 0);
    }

    #[test]
    fn accepts_answer_line_variants() {
        assert_eq!(classify_line("Answer: c"), Line::Answer('c'));
        assert_eq!(classify_line("ANSWER : D"), Line::Answer('d'));
        assert_eq!(classify_line("answer - b"), Line::Answer('b'));
        assert_eq!(classify_line("Answer: option c"), Line::Answer('c'));
        assert_eq!(classify_line("Answer - Option: d"), Line::Answer('d'));
    }

    #[test]
    fn accepts_option_line_variants() {
        assert_eq!(classify_line("a) Cold"), Line::Option('a', "Cold"));
        assert_eq!(classify_line("B. Warm"), Line::Option('b', "Warm"));
        assert_eq!(classify_line("c ) Wet"), Line::Option('c', "Wet"));
        assert_eq!(classify_line("Delhi is big"), Line::Text("Delhi is big"));
    }

    #[test]
    fn answer_check_runs_before_option_check() {
        assert_eq!(classify_line("Answer: b) Dog"), Line::Answer('b'));
        assert_eq!(classify_line("a) Answer: c"), Line::Answer('c'));
    }

    #[test]
    fn multi_line_question_text_is_joined() {
        let text = "1. Read the line:\nThe cat sat.\na) Yes\nb) No\nAnswer: b\n";
        let (questions, _) = parse(text, "General English", "Comprehension");
        assert_eq!(questions[0].question_text, "Read the line: The cat sat.");
    }

    #[test]
    fn trailing_letter_supplies_missing_answer() {
        let text = "1. Which statement is correct (b)\na) One\nb) Two\nc) Three\n";
        let (questions, diagnostics) = parse(text, "Aptitude", "Logical Reasoning");

        assert_eq!(questions[0].answer_letter, 'b');
        assert_eq!(questions[0].question_text, "Which statement is correct");
        assert!(!questions[0].question_text.contains("(b)"));
        assert_eq!(diagnostics.warnings().count(), 0);
    }

    #[test]
    fn inline_answer_tokens_are_tried_in_order() {
        let bracket = "1. Capital of France? [Answer: c]\na) Rome\nb) Berlin\nc) Paris\n";
        let (questions, _) = parse(bracket, "General Knowledge", "World");
        assert_eq!(questions[0].answer_letter, 'c');
        assert_eq!(questions[0].question_text, "Capital of France?");

        let paren = "1. Capital of Italy? (Ans. a) more\na) Rome\nb) Berlin\nc) Paris\n";
        let (questions, _) = parse(paren, "General Knowledge", "World");
        assert_eq!(questions[0].answer_letter, 'a');
        assert_eq!(questions[0].question_text, "Capital of Italy? more");

        let bare = "1. Capital of Germany? Answer b\na) Rome\nb) Berlin\nc) Paris\n";
        let (questions, _) = parse(bare, "General Knowledge", "World");
        assert_eq!(questions[0].answer_letter, 'b');
        assert_eq!(questions[0].question_text, "Capital of Germany?");
    }

    #[test]
    fn missing_answer_defaults_to_a_with_warning() {
        let text = "1. Pick one\na) One\nb) Two\nc) Three\n";
        let (questions, diagnostics) = parse(text, "Aptitude", "Puzzles");
        assert_eq!(questions[0].answer_letter, 'a');
        assert!(diagnostics.has_warning_containing("missing answer"));
    }

    #[test]
    fn error_spotting_replaces_question_text() {
        let text = "1. He go (a) to school (b) every day (c) no error (d)\na) He go\nb) to school\nc) every day\nd) no error\nAnswer: a\n";
        let (questions, _) = parse(text, "General English", "Error Spotting");
        assert_eq!(
            questions[0].question_text,
            "Find the part of the sentence that has an error."
        );
        assert_eq!(questions[0].answer_letter, 'a');
    }

    #[test]
    fn short_blocks_are_skipped_not_fatal() {
        let text = "1. Lonely question\nAnswer: a\n\n2. Real one\na) x\nb) y\nAnswer: b\n";
        let (questions, diagnostics) = parse(text, "Aptitude", "Puzzles");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_text, "Real one");
        assert!(diagnostics.has_warning_containing("insufficient lines"));
    }

    #[test]
    fn embedded_options_are_extracted_for_general_knowledge() {
        let text = "1. Capital of Meghalaya: a) Shillong b) Tura c) Jowai d) Nongpoh\nsome note\nAnswer: a\n";
        let (questions, _) = parse(text, "General Knowledge", "Meghalaya GK");

        let question = &questions[0];
        assert_eq!(question.question_text, "Capital of Meghalaya");
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.options[&'a'], "Shillong");
        assert_eq!(question.options[&'d'], "Nongpoh some note");
    }

    #[test]
    fn embedded_options_are_not_extracted_elsewhere() {
        let text = "1. Value: a) 1 b) 2\nmore text\nAnswer: a\n";
        let (questions, diagnostics) = parse(text, "Aptitude", "Algebra");

        let question = &questions[0];
        assert_eq!(question.question_text, "Value: a) 1 b) 2 more text");
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.options[&'a'], "[Option A]");
        assert!(diagnostics.has_warning_containing("placeholder"));
    }

    #[test]
    fn single_option_gets_placeholders_up_to_four() {
        let text = "1. Only one option\nc) Three\nAnswer: c\n";
        let (questions, _) = parse(text, "Aptitude", "Puzzles");
        let question = &questions[0];
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.options[&'c'], "Three");
        assert_eq!(question.options[&'b'], "[Option B]");
    }

    #[test]
    fn options_come_out_sorted_by_letter() {
        let text = "1. Reversed\nd) Four\nc) Three\nb) Two\na) One\nAnswer: d\n";
        let (questions, _) = parse(text, "Aptitude", "Puzzles");
        let letters: Vec<char> = questions[0].options.keys().copied().collect();
        assert_eq!(letters, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let (questions, _) = parse("", "Aptitude", "Puzzles");
        assert!(questions.is_empty());
    }

    proptest! {
        #[test]
        fn option_count_stays_between_two_and_four(
            prompt in "[A-Za-z][A-Za-z ?]{0,39}",
            option_count in 0usize..8,
            with_answer in any::<bool>(),
        ) {
            let letters = ['a', 'b', 'c', 'd', 'e', 'a', 'b', 'c'];
            let mut block = format!("1. {}\n", prompt);
            for letter in letters.iter().take(option_count) {
                block.push_str(&format!("{}) option {}\n", letter, letter));
            }
            if with_answer {
                block.push_str("Answer: b\n");
            }
            block.push_str("filler line\nanother filler\n");

            let mut diagnostics = Diagnostics::new();
            let questions =
                parse_plain_text_questions(&block, "General Knowledge", "Books", &mut diagnostics);
            prop_assert_eq!(questions.len(), 1);
            let count = questions[0].options.len();
            prop_assert!((2..=4).contains(&count), "got {} options", count);
        }
    }
}
