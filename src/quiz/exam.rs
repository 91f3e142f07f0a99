use rand::Rng;

use crate::quiz::catalog::KNOWN_CATEGORIES;
use crate::quiz::diagnostics::Diagnostics;
use crate::quiz::loader::{shuffle_and_truncate, QuestionBank};
use crate::quiz::NormalizedQuestion;

/// Short exam names accepted in place of a bank folder.
const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("english", "general-english"),
    ("gk", "general-knowledge"),
    ("math", "aptitude"),
    ("aptitude", "aptitude"),
    ("general-english", "general-english"),
    ("general-knowledge", "general-knowledge"),
];

/// Maps an exam type such as `gk` to its question-bank folder.
pub fn resolve_category_alias(exam_type: &str) -> Option<&'static str> {
    let exam_type = exam_type.trim().to_lowercase();
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == exam_type)
        .map(|(_, folder)| *folder)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSource {
    Category(&'static str),
    /// Every known category pooled together.
    AllCategories,
    /// Marked in the paper but the bank has nothing for it (e.g. interviews).
    Unavailable,
}

#[derive(Debug, Clone, Copy)]
pub struct ExamSection {
    pub name: &'static str,
    pub count: usize,
    pub marks: u32,
    pub source: SectionSource,
}

const fn section(
    name: &'static str,
    count: usize,
    marks: u32,
    source: SectionSource,
) -> ExamSection {
    ExamSection {
        name,
        count,
        marks,
        source,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExamPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub sections: &'static [ExamSection],
}

impl ExamPreset {
    pub fn total_questions(&self) -> usize {
        self.sections.iter().map(|s| s.count).sum()
    }

    pub fn total_marks(&self) -> u32 {
        self.sections.iter().map(|s| s.marks).sum()
    }
}

pub const PRESETS: &[ExamPreset] = &[
    ExamPreset {
        id: "mpsc_lda",
        name: "MPSC LDA Mock Test (300 Marks)",
        sections: &[
            section("General English", 100, 100, SectionSource::Category("general-english")),
            section(
                "General Knowledge & Aptitude",
                75,
                100,
                SectionSource::Category("general-knowledge"),
            ),
            section("Arithmetic", 50, 100, SectionSource::Category("aptitude")),
        ],
    },
    ExamPreset {
        id: "dsc_lda",
        name: "DSC LDA Mock Test (300 Marks)",
        sections: &[
            section("General English", 100, 100, SectionSource::Category("general-english")),
            section(
                "Elementary Mathematics & Science",
                70,
                70,
                SectionSource::Category("aptitude"),
            ),
            section("General Knowledge", 70, 70, SectionSource::Category("general-knowledge")),
            section("Aptitude", 30, 30, SectionSource::Category("aptitude")),
            section("Interview", 1, 30, SectionSource::Unavailable),
        ],
    },
    ExamPreset {
        id: "mpsc_typist",
        name: "MPSC Typist Test (50 Marks)",
        sections: &[section("English", 50, 50, SectionSource::Category("general-english"))],
    },
];

pub const GENERAL_MOCK_TEST: ExamPreset = ExamPreset {
    id: "general",
    name: "General Mock Test",
    sections: &[section("All Categories", 50, 50, SectionSource::AllCategories)],
};

/// Named presets followed by the general test.
pub fn all_presets() -> impl Iterator<Item = &'static ExamPreset> {
    PRESETS.iter().chain(std::iter::once(&GENERAL_MOCK_TEST))
}

/// Looks a preset up by id or display name; anything else is the general test.
pub fn exam_preset(key: &str) -> &'static ExamPreset {
    let key = key.trim();
    all_presets()
        .find(|p| p.id.eq_ignore_ascii_case(key) || p.name == key)
        .unwrap_or(&GENERAL_MOCK_TEST)
}

#[derive(Debug, Clone, Default)]
pub struct MockTest {
    pub name: String,
    /// Section names with the number of questions actually drawn.
    pub sections: Vec<(String, usize)>,
    pub questions: Vec<NormalizedQuestion>,
}

pub fn build_mock_test(
    bank: &QuestionBank,
    preset: &ExamPreset,
    diagnostics: &mut Diagnostics,
) -> MockTest {
    build_mock_test_with(&mut rand::thread_rng(), bank, preset, diagnostics)
}

/// Draws every section in order. A question never appears in two sections,
/// and a section short of questions is filled as far as the bank allows.
pub fn build_mock_test_with<R: Rng + ?Sized>(
    rng: &mut R,
    bank: &QuestionBank,
    preset: &ExamPreset,
    diagnostics: &mut Diagnostics,
) -> MockTest {
    let mut test = MockTest {
        name: preset.name.to_string(),
        ..MockTest::default()
    };

    for section in preset.sections {
        let pool = match section.source {
            SectionSource::Category(category) => {
                bank.load_questions_with(rng, category, None, usize::MAX, diagnostics)
            }
            SectionSource::AllCategories => {
                let mut pool = Vec::new();
                for (category, _) in KNOWN_CATEGORIES {
                    pool.extend(bank.load_questions_with(
                        rng,
                        category,
                        None,
                        usize::MAX,
                        diagnostics,
                    ));
                }
                shuffle_and_truncate(rng, pool, usize::MAX)
            }
            SectionSource::Unavailable => {
                diagnostics.warn(section.name, "no questions in the bank, skipping section");
                continue;
            }
        };

        let mut drawn = Vec::with_capacity(section.count.min(pool.len()));
        for question in pool {
            if drawn.len() == section.count {
                break;
            }
            if !test.questions.contains(&question) {
                drawn.push(question);
            }
        }
        if drawn.len() < section.count {
            diagnostics.warn(
                section.name,
                format!("only {} of {} questions available", drawn.len(), section.count),
            );
        }

        test.sections.push((section.name.to_string(), drawn.len()));
        test.questions.extend(drawn);
    }

    log::debug!(
        "built {} with {} questions",
        test.name,
        test.questions.len()
    );
    test
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::loader::PlainTextMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::TempDir;

    fn numbered_file(prefix: &str, n: usize) -> String {
        (1..=n)
            .map(|i| format!("{}. {} {}?\na) x\nb) y\nAnswer: b\n\n", i, prefix, i))
            .collect()
    }

    fn sample_bank() -> (TempDir, QuestionBank) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for folder in ["aptitude", "general-english", "general-knowledge"] {
            fs::create_dir_all(root.join(folder)).unwrap();
        }
        fs::write(root.join("aptitude/average.txt"), numbered_file("Average", 4)).unwrap();
        fs::write(
            root.join("general-knowledge/general-knowledge.txt"),
            numbered_file("Capital", 3),
        )
        .unwrap();
        fs::write(
            root.join("general-english/voice.json"),
            r#"{"category": "Change of Voice", "questions": [
                {"question": "V1", "options": ["x", "y"], "answer": "a"},
                {"question": "V2", "options": ["x", "y"], "answer": "b"}
            ]}"#,
        )
        .unwrap();
        let bank = QuestionBank::new(root, PlainTextMode::Heuristic);
        (dir, bank)
    }

    #[test]
    fn aliases_map_to_bank_folders() {
        assert_eq!(resolve_category_alias("english"), Some("general-english"));
        assert_eq!(resolve_category_alias(" GK "), Some("general-knowledge"));
        assert_eq!(resolve_category_alias("math"), Some("aptitude"));
        assert_eq!(resolve_category_alias("aptitude"), Some("aptitude"));
        assert_eq!(resolve_category_alias("history"), None);
    }

    #[test]
    fn preset_totals() {
        assert_eq!(exam_preset("mpsc_lda").total_questions(), 225);
        assert_eq!(exam_preset("mpsc_lda").total_marks(), 300);
        assert_eq!(exam_preset("DSC_LDA").total_questions(), 241);
        assert_eq!(exam_preset("dsc_lda").total_marks(), 300);
        assert_eq!(exam_preset("MPSC Typist Test (50 Marks)").id, "mpsc_typist");
        assert_eq!(exam_preset("anything").name, "General Mock Test");
        assert_eq!(all_presets().count(), 4);
    }

    #[test]
    fn sections_are_capped_at_the_available_pool() {
        let (_dir, bank) = sample_bank();
        let mut diagnostics = Diagnostics::new();
        let test = build_mock_test_with(
            &mut StdRng::seed_from_u64(3),
            &bank,
            exam_preset("mpsc_typist"),
            &mut diagnostics,
        );

        assert_eq!(test.sections, vec![("English".to_string(), 2)]);
        assert_eq!(test.questions.len(), 2);
        assert!(diagnostics.has_warning_containing("only 2 of 50"));
    }

    #[test]
    fn sections_sharing_a_category_do_not_repeat_questions() {
        let (_dir, bank) = sample_bank();
        let mut diagnostics = Diagnostics::new();
        let test = build_mock_test_with(
            &mut StdRng::seed_from_u64(5),
            &bank,
            exam_preset("dsc_lda"),
            &mut diagnostics,
        );

        let counts: Vec<usize> = test.sections.iter().map(|(_, n)| *n).collect();
        assert_eq!(counts, vec![2, 4, 3, 0]);
        assert_eq!(test.questions.len(), 9);
        assert!(diagnostics.has_warning_containing("skipping section"));
    }

    #[test]
    fn general_test_pools_every_category() {
        let (_dir, bank) = sample_bank();
        let mut diagnostics = Diagnostics::new();
        let test = build_mock_test_with(
            &mut StdRng::seed_from_u64(11),
            &bank,
            &GENERAL_MOCK_TEST,
            &mut diagnostics,
        );
        assert_eq!(test.sections, vec![("All Categories".to_string(), 9)]);
    }
}
