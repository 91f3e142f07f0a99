use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::catalog::{
    self, category_display_name, CatalogEntry, CategorySummary, FileKind,
};
use crate::quiz::diagnostics::Diagnostics;
use crate::quiz::error::BankError;
use crate::quiz::legacy::parse_legacy_line_format;
use crate::quiz::plain_text::parse_plain_text_questions;
use crate::quiz::structured::parse_structured_text;
use crate::quiz::NormalizedQuestion;

/// Which reader handles `.txt` question files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlainTextMode {
    /// Recovers answers and options from the question text.
    #[default]
    Heuristic,
    /// Drops any question lacking options or an answer line.
    Strict,
}

impl FromStr for PlainTextMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(PlainTextMode::Heuristic),
            "strict" => Ok(PlainTextMode::Strict),
            other => Err(format!("unknown plain text parser '{}'", other)),
        }
    }
}

/// Reads and parses one catalogued file.
///
/// Unreadable or empty files give no questions and a warning.
pub fn parse_entry(
    entry: &CatalogEntry,
    mode: PlainTextMode,
    diagnostics: &mut Diagnostics,
) -> Vec<NormalizedQuestion> {
    let raw = match fs::read_to_string(&entry.file_path) {
        Ok(raw) => raw,
        Err(source) => {
            let err = BankError::Io {
                path: entry.file_path.clone(),
                source,
            };
            diagnostics.warn(&entry.subcategory, err.to_string());
            return Vec::new();
        }
    };
    if raw.trim().is_empty() {
        diagnostics.warn(
            entry.file_path.display().to_string(),
            "file is empty",
        );
        return Vec::new();
    }

    let category_name = category_display_name(&entry.category);
    match (entry.file_kind, mode) {
        (FileKind::Structured, _) => {
            parse_structured_text(&raw, &category_name, &entry.display_name, diagnostics)
        }
        (FileKind::PlainText, PlainTextMode::Heuristic) => {
            parse_plain_text_questions(&raw, &category_name, &entry.display_name, diagnostics)
        }
        (FileKind::PlainText, PlainTextMode::Strict) => {
            parse_legacy_line_format(&raw, &category_name, &entry.display_name, diagnostics)
        }
    }
}

/// Shuffles uniformly and keeps at most `count` questions.
pub fn shuffle_and_truncate<R: Rng + ?Sized>(
    rng: &mut R,
    mut questions: Vec<NormalizedQuestion>,
    count: usize,
) -> Vec<NormalizedQuestion> {
    questions.shuffle(rng);
    questions.truncate(count);
    questions
}

/// Handle on a question bank directory.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    root: PathBuf,
    mode: PlainTextMode,
}

impl QuestionBank {
    pub fn new(root: impl Into<PathBuf>, mode: PlainTextMode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> std::collections::BTreeMap<String, CategorySummary> {
        catalog::catalog_question_bank(&self.root, diagnostics)
    }

    pub fn subcategories(&self, category: &str, diagnostics: &mut Diagnostics) -> Vec<CatalogEntry> {
        catalog::list_subcategories(&self.root, category, diagnostics)
    }

    /// Up to `count` random questions from one subcategory, or from the whole
    /// category when `subcategory` is `None`. Never pads and never fails.
    pub fn load_questions(
        &self,
        category: &str,
        subcategory: Option<&str>,
        count: usize,
        diagnostics: &mut Diagnostics,
    ) -> Vec<NormalizedQuestion> {
        self.load_questions_with(
            &mut rand::thread_rng(),
            category,
            subcategory,
            count,
            diagnostics,
        )
    }

    pub fn load_questions_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        category: &str,
        subcategory: Option<&str>,
        count: usize,
        diagnostics: &mut Diagnostics,
    ) -> Vec<NormalizedQuestion> {
        let entries: Vec<CatalogEntry> = match subcategory {
            Some(id) => catalog::resolve_entry(&self.root, category, id, diagnostics)
                .into_iter()
                .collect(),
            None => self.subcategories(category, diagnostics),
        };

        let mut pool = Vec::new();
        for entry in &entries {
            let mut file_diagnostics = Diagnostics::new();
            pool.extend(parse_entry(entry, self.mode, &mut file_diagnostics));
            if !file_diagnostics.is_empty() {
                log::debug!(
                    "{} diagnostics from {}",
                    file_diagnostics.len(),
                    entry.file_path.display()
                );
            }
            diagnostics.extend(file_diagnostics);
        }
        log::debug!(
            "loaded {} questions from {} files in {}",
            pool.len(),
            entries.len(),
            category
        );

        shuffle_and_truncate(rng, pool, count)
    }
}
