//! Question-bank layout on disk.
//!
//! ```text
//! <root>/
//!   aptitude/            *.txt
//!   general-english/     *.json (categories_summary.json excluded)
//!   general-knowledge/   *.txt
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::quiz::category::{folder_meta, CategoryMetadata};
use crate::quiz::diagnostics::Diagnostics;
use crate::quiz::error::{BankError, Result};
use crate::quiz::structured::StructuredDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    PlainText,
    Structured,
}

impl FileKind {
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::PlainText => "txt",
            FileKind::Structured => "json",
        }
    }
}

/// Known category folders, scanned in this order.
pub const KNOWN_CATEGORIES: [(&str, FileKind); 3] = [
    ("aptitude", FileKind::PlainText),
    ("general-english", FileKind::Structured),
    ("general-knowledge", FileKind::PlainText),
];

const STRUCTURED_SUMMARY_FILE: &str = "categories_summary.json";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogEntry {
    /// Category folder name, e.g. `general-english`.
    pub category: String,
    /// File stem, used to request this file again.
    pub subcategory: String,
    pub display_name: String,
    pub file_path: PathBuf,
    pub file_kind: FileKind,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub display_name: String,
    pub meta: CategoryMetadata,
    pub subcategories: Vec<CatalogEntry>,
}

pub fn file_kind_for(category_id: &str) -> Option<FileKind> {
    KNOWN_CATEGORIES
        .iter()
        .find(|(id, _)| *id == category_id)
        .map(|(_, kind)| *kind)
}

/// Upper-cases the first letter of every whitespace-separated word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && !c.is_whitespace() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

/// `general-english` -> `General English`
pub fn category_display_name(category_id: &str) -> String {
    title_case(&category_id.replace('-', " "))
}

/// `meghalaya_gk-2` -> `Meghalaya Gk 2`
pub fn display_name_from_stem(stem: &str) -> String {
    title_case(&stem.replace(['_', '-'], " "))
}

/// Collapses the many spellings of the two GK file names.
fn normalize_gk_name(name: String) -> String {
    let lower = name.to_lowercase();
    if lower.contains("general knowledge") {
        "General Knowledge".to_string()
    } else if lower.contains("meghalaya gk") || lower.contains("meghalaya-gk") {
        "Meghalaya GK".to_string()
    } else {
        name
    }
}

fn structured_display_name(path: &Path, stem: &str, diagnostics: &mut Diagnostics) -> String {
    let document = fs::read_to_string(path)
        .map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|raw| {
            serde_json::from_str::<StructuredDocument>(&raw).map_err(|source| BankError::Json {
                path: path.to_path_buf(),
                source,
            })
        });

    match document {
        Ok(document) => document
            .own_label()
            .map(str::to_string)
            .unwrap_or_else(|| display_name_from_stem(stem)),
        Err(err) => {
            diagnostics.debug(stem, format!("naming from file name: {}", err));
            display_name_from_stem(stem)
        }
    }
}

fn scan_category(
    root: &Path,
    category_id: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<CatalogEntry>> {
    let kind = file_kind_for(category_id)
        .ok_or_else(|| BankError::UnknownCategory(category_id.to_string()))?;
    let dir = root.join(category_id);
    if !dir.is_dir() {
        return Err(BankError::MissingDirectory(dir));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != kind.extension()) {
            continue;
        }
        if kind == FileKind::Structured
            && path.file_name().is_some_and(|name| name == STRUCTURED_SUMMARY_FILE)
        {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            diagnostics.warn(path.display().to_string(), "skipping file with non UTF-8 name");
            continue;
        };

        let display_name = match kind {
            FileKind::Structured => structured_display_name(path, stem, diagnostics),
            FileKind::PlainText => normalize_gk_name(display_name_from_stem(stem)),
        };

        entries.push(CatalogEntry {
            category: category_id.to_string(),
            subcategory: stem.to_string(),
            display_name,
            file_path: path.to_path_buf(),
            file_kind: kind,
        });
    }

    entries.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(entries)
}

/// Files of one category, alphabetical by display name.
///
/// A missing directory or unknown category yields an empty list and a warning.
pub fn list_subcategories(
    root: &Path,
    category_id: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<CatalogEntry> {
    scan_category(root, category_id, diagnostics).unwrap_or_else(|err| {
        diagnostics.warn(category_id, err.to_string());
        Vec::new()
    })
}

/// All known categories that exist under `root`, keyed by folder name.
pub fn catalog_question_bank(
    root: &Path,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, CategorySummary> {
    if !root.is_dir() {
        diagnostics.warn(
            root.display().to_string(),
            BankError::MissingDirectory(root.to_path_buf()).to_string(),
        );
        return BTreeMap::new();
    }

    let mut catalog = BTreeMap::new();
    for (id, _) in KNOWN_CATEGORIES {
        let subcategories = match scan_category(root, id, diagnostics) {
            Ok(entries) => entries,
            Err(err) => {
                diagnostics.warn(id, err.to_string());
                continue;
            }
        };
        catalog.insert(
            id.to_string(),
            CategorySummary {
                id: id.to_string(),
                display_name: category_display_name(id),
                meta: folder_meta(id),
                subcategories,
            },
        );
    }
    catalog
}

/// Looks up one file of a category by its stem.
pub fn resolve_entry(
    root: &Path,
    category_id: &str,
    subcategory_id: &str,
    diagnostics: &mut Diagnostics,
) -> Option<CatalogEntry> {
    let found = list_subcategories(root, category_id, diagnostics)
        .into_iter()
        .find(|entry| entry.subcategory == subcategory_id);
    if found.is_none() {
        diagnostics.warn(
            format!("{}/{}", category_id, subcategory_id),
            "no such subcategory",
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn sample_bank() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "aptitude/time_and_work.txt", "1. Q\na) x\nb) y\nAnswer: a\n");
        write(root, "aptitude/profit-and-loss.txt", "");
        write(root, "aptitude/notes.md", "ignored");
        write(
            root,
            "general-english/voice.json",
            r#"{"category": "Change of Voice", "questions": []}"#,
        );
        write(root, "general-english/idioms.json", r#"{"questions": []}"#);
        write(root, "general-english/categories_summary.json", "{}");
        write(root, "general-knowledge/Meghalaya-GK.txt", "");
        dir
    }

    #[test]
    fn title_case_matches_display_rules() {
        assert_eq!(category_display_name("general-english"), "General English");
        assert_eq!(display_name_from_stem("time_and_work"), "Time And Work");
        assert_eq!(
            normalize_gk_name(display_name_from_stem("Meghalaya-GK")),
            "Meghalaya GK"
        );
        assert_eq!(
            normalize_gk_name(display_name_from_stem("general-knowledge-set-1")),
            "General Knowledge"
        );
    }

    #[test]
    fn lists_plain_text_files_sorted_by_display_name() {
        let bank = sample_bank();
        let mut diagnostics = Diagnostics::new();
        let entries = list_subcategories(bank.path(), "aptitude", &mut diagnostics);

        let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Profit And Loss", "Time And Work"]);
        assert!(entries.iter().all(|e| e.file_kind == FileKind::PlainText));
        assert_eq!(entries[1].subcategory, "time_and_work");
    }

    #[test]
    fn structured_files_use_document_category_and_skip_summary() {
        let bank = sample_bank();
        let mut diagnostics = Diagnostics::new();
        let entries = list_subcategories(bank.path(), "general-english", &mut diagnostics);

        let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Change of Voice", "Idioms"]);
        assert!(entries.iter().all(|e| e.file_kind == FileKind::Structured));
    }

    #[test]
    fn catalog_covers_existing_categories() {
        let bank = sample_bank();
        fs::remove_dir_all(bank.path().join("general-knowledge")).unwrap();
        let mut diagnostics = Diagnostics::new();
        let catalog = catalog_question_bank(bank.path(), &mut diagnostics);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["general-english"].display_name, "General English");
        assert_eq!(catalog["aptitude"].subcategories.len(), 2);
        assert!(diagnostics.has_warning_containing("directory not found"));
    }

    #[test]
    fn missing_root_is_empty_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new();
        let catalog = catalog_question_bank(&dir.path().join("nope"), &mut diagnostics);
        assert!(catalog.is_empty());
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn unknown_category_is_empty_with_warning() {
        let bank = sample_bank();
        let mut diagnostics = Diagnostics::new();
        assert!(list_subcategories(bank.path(), "history", &mut diagnostics).is_empty());
        assert!(diagnostics.has_warning_containing("unknown category"));
    }

    #[test]
    fn resolves_entries_by_stem() {
        let bank = sample_bank();
        let mut diagnostics = Diagnostics::new();
        let entry = resolve_entry(bank.path(), "general-knowledge", "Meghalaya-GK", &mut diagnostics)
            .expect("entry");
        assert_eq!(entry.display_name, "Meghalaya GK");
        assert!(resolve_entry(bank.path(), "aptitude", "missing", &mut diagnostics).is_none());
        assert!(diagnostics.has_warning_containing("no such subcategory"));
    }
}
