//! Maps free-text category labels to display metadata.
//!
//! Lookup is two ordered tiers of substring rules. The first tier holds known
//! category names and is scanned in declaration order, so longer phrases that
//! contain a shorter key ("meghalaya gk" vs "gk", "quantitative aptitude" vs
//! "aptitude") must be declared first. The second tier holds broader keyword
//! rules for labels no known name matched. Anything left gets [`DEFAULT`].

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CategoryMetadata {
    pub icon: &'static str,
    pub bg_color_token: &'static str,
    pub text_color_token: &'static str,
}

const fn meta(
    icon: &'static str,
    bg_color_token: &'static str,
    text_color_token: &'static str,
) -> CategoryMetadata {
    CategoryMetadata {
        icon,
        bg_color_token,
        text_color_token,
    }
}

// Language and grammar
const ANTONYMS: CategoryMetadata = meta("🔄", "bg-blue-100", "text-blue-800");
const SYNONYMS: CategoryMetadata = meta("📖", "bg-blue-100", "text-blue-800");
const CHANGE_OF_SPEECH: CategoryMetadata = meta("🎭", "bg-indigo-100", "text-indigo-800");
const CHANGE_OF_VOICE: CategoryMetadata = meta("🗣️", "bg-indigo-100", "text-indigo-800");
const ERROR_SPOTTING: CategoryMetadata = meta("⚠️", "bg-red-100", "text-red-800");
const FILL_IN_THE_BLANKS: CategoryMetadata = meta("📝", "bg-teal-100", "text-teal-800");
const IDIOMS_AND_PHRASES: CategoryMetadata = meta("💬", "bg-purple-100", "text-purple-800");
const ONE_WORD_SUBSTITUTES: CategoryMetadata = meta("🔤", "bg-cyan-100", "text-cyan-800");
const SPELLINGS: CategoryMetadata = meta("✏️", "bg-green-100", "text-green-800");

// General knowledge
const GENERAL_KNOWLEDGE: CategoryMetadata = meta("🌍", "bg-blue-100", "text-blue-800");
const MEGHALAYA_GK: CategoryMetadata = meta("🏞️", "bg-green-100", "text-green-800");
const BOOKS_AND_AUTHORS: CategoryMetadata = meta("📚", "bg-amber-100", "text-amber-800");
const DAYS_AND_YEARS: CategoryMetadata = meta("📅", "bg-yellow-100", "text-yellow-800");
const FAMOUS_PLACES: CategoryMetadata = meta("🏛️", "bg-orange-100", "text-orange-800");
const GENERAL_SCIENCE: CategoryMetadata = meta("🔬", "bg-purple-100", "text-purple-800");
const HONOURS_AND_AWARDS: CategoryMetadata = meta("🏆", "bg-yellow-100", "text-yellow-800");
const INDIAN_CULTURE: CategoryMetadata = meta("🎎", "bg-rose-100", "text-rose-800");
const INDIAN_GEOGRAPHY: CategoryMetadata = meta("🗺️", "bg-emerald-100", "text-emerald-800");
const INDIAN_HISTORY: CategoryMetadata = meta("🏺", "bg-amber-100", "text-amber-800");
const TECHNOLOGY: CategoryMetadata = meta("💻", "bg-indigo-100", "text-indigo-800");

// Aptitude
const APTITUDE: CategoryMetadata = meta("🧮", "bg-blue-100", "text-blue-800");
const QUANTITATIVE_APTITUDE: CategoryMetadata = meta("🔢", "bg-blue-100", "text-blue-800");
const LOGICAL_REASONING: CategoryMetadata = meta("🧩", "bg-purple-100", "text-purple-800");
const DATA_INTERPRETATION: CategoryMetadata = meta("📊", "bg-teal-100", "text-teal-800");
const NUMBER_SERIES: CategoryMetadata = meta("🔢", "bg-indigo-100", "text-indigo-800");
const PERCENTAGE: CategoryMetadata = meta("📈", "bg-green-100", "text-green-800");
const PROFIT_AND_LOSS: CategoryMetadata = meta("💰", "bg-yellow-100", "text-yellow-800");
const SIMPLE_INTEREST: CategoryMetadata = meta("💵", "bg-green-100", "text-green-800");
const COMPOUND_INTEREST: CategoryMetadata = meta("💲", "bg-green-100", "text-green-800");
const TIME_AND_WORK: CategoryMetadata = meta("⏱️", "bg-blue-100", "text-blue-800");
const TIME_AND_DISTANCE: CategoryMetadata = meta("🛣️", "bg-blue-100", "text-blue-800");
const AVERAGE: CategoryMetadata = meta("📊", "bg-purple-100", "text-purple-800");
const RATIO_AND_PROPORTION: CategoryMetadata = meta("📐", "bg-red-100", "text-red-800");
const ALGEBRA: CategoryMetadata = meta("x²", "bg-indigo-100", "text-indigo-800");
const GEOMETRY: CategoryMetadata = meta("△", "bg-blue-100", "text-blue-800");
const TRIGONOMETRY: CategoryMetadata = meta("θ", "bg-purple-100", "text-purple-800");
const PROBABILITY: CategoryMetadata = meta("🎲", "bg-red-100", "text-red-800");
const PERMUTATION: CategoryMetadata = meta("🔀", "bg-purple-100", "text-purple-800");
const PUZZLES: CategoryMetadata = meta("🧩", "bg-yellow-100", "text-yellow-800");
const BLOOD_RELATIONS: CategoryMetadata = meta("👨‍👩‍👧‍👦", "bg-pink-100", "text-pink-800");
const CODING_DECODING: CategoryMetadata = meta("🔣", "bg-indigo-100", "text-indigo-800");
const DIRECTION_SENSE: CategoryMetadata = meta("🧭", "bg-blue-100", "text-blue-800");
const SEATING_ARRANGEMENT: CategoryMetadata = meta("🪑", "bg-purple-100", "text-purple-800");
const SYLLOGISM: CategoryMetadata = meta("⊂", "bg-red-100", "text-red-800");
const ANALOGY: CategoryMetadata = meta("⇄", "bg-blue-100", "text-blue-800");
const CLASSIFICATION: CategoryMetadata = meta("🗂️", "bg-purple-100", "text-purple-800");
const SERIES_COMPLETION: CategoryMetadata = meta("🔢", "bg-teal-100", "text-teal-800");
const CLOCK_AND_CALENDAR: CategoryMetadata = meta("🕒", "bg-yellow-100", "text-yellow-800");
const MATHEMATICAL_OPERATIONS: CategoryMetadata = meta("➕", "bg-green-100", "text-green-800");
const DATA_SUFFICIENCY: CategoryMetadata = meta("📋", "bg-blue-100", "text-blue-800");
const STATEMENT_CONCLUSIONS: CategoryMetadata = meta("💭", "bg-purple-100", "text-purple-800");
const STATEMENT_ASSUMPTIONS: CategoryMetadata = meta("💡", "bg-yellow-100", "text-yellow-800");
const COURSE_OF_ACTION: CategoryMetadata = meta("🛤️", "bg-blue-100", "text-blue-800");
const CAUSE_AND_EFFECT: CategoryMetadata = meta("⚡", "bg-red-100", "text-red-800");
const STATEMENT_ARGUMENTS: CategoryMetadata = meta("💬", "bg-purple-100", "text-purple-800");
const LOGICAL_DEDUCTION: CategoryMetadata = meta("🧠", "bg-indigo-100", "text-indigo-800");

pub const DEFAULT: CategoryMetadata = meta("📚", "bg-gray-100", "text-gray-800");

/// Known category names, first substring match wins.
const DIRECT_MAP: &[(&str, CategoryMetadata)] = &[
    ("antonyms", ANTONYMS),
    ("synonyms", SYNONYMS),
    ("change of speech", CHANGE_OF_SPEECH),
    ("change of voice", CHANGE_OF_VOICE),
    ("error spotting", ERROR_SPOTTING),
    ("fill in the blanks", FILL_IN_THE_BLANKS),
    ("idioms and phrases", IDIOMS_AND_PHRASES),
    ("one word substitutes", ONE_WORD_SUBSTITUTES),
    ("spellings", SPELLINGS),
    ("general knowledge", GENERAL_KNOWLEDGE),
    ("meghalaya gk", MEGHALAYA_GK),
    ("books and authors", BOOKS_AND_AUTHORS),
    ("days and years", DAYS_AND_YEARS),
    ("famous places in india", FAMOUS_PLACES),
    ("general science", GENERAL_SCIENCE),
    ("honours and awards", HONOURS_AND_AWARDS),
    ("indian culture", INDIAN_CULTURE),
    ("indian geography", INDIAN_GEOGRAPHY),
    ("indian history", INDIAN_HISTORY),
    ("technology", TECHNOLOGY),
    ("quantitative aptitude", QUANTITATIVE_APTITUDE),
    ("logical reasoning", LOGICAL_REASONING),
    ("data interpretation", DATA_INTERPRETATION),
    ("number series", NUMBER_SERIES),
    ("percentage", PERCENTAGE),
    ("profit and loss", PROFIT_AND_LOSS),
    ("simple interest", SIMPLE_INTEREST),
    ("compound interest", COMPOUND_INTEREST),
    ("time and work", TIME_AND_WORK),
    ("time and distance", TIME_AND_DISTANCE),
    ("average", AVERAGE),
    ("ratio and proportion", RATIO_AND_PROPORTION),
    ("algebra", ALGEBRA),
    ("geometry", GEOMETRY),
    ("trigonometry", TRIGONOMETRY),
    ("probability", PROBABILITY),
    ("permutation and combination", PERMUTATION),
    ("puzzles", PUZZLES),
    ("blood relations", BLOOD_RELATIONS),
    ("coding decoding", CODING_DECODING),
    ("direction sense", DIRECTION_SENSE),
    ("seating arrangement", SEATING_ARRANGEMENT),
    ("syllogism", SYLLOGISM),
    ("analogy", ANALOGY),
    ("classification", CLASSIFICATION),
    ("series completion", SERIES_COMPLETION),
    ("clock and calendar", CLOCK_AND_CALENDAR),
    ("mathematical operations", MATHEMATICAL_OPERATIONS),
    ("data sufficiency", DATA_SUFFICIENCY),
    ("statement and conclusions", STATEMENT_CONCLUSIONS),
    ("statement and assumptions", STATEMENT_ASSUMPTIONS),
    ("course of action", COURSE_OF_ACTION),
    ("cause and effect", CAUSE_AND_EFFECT),
    ("statement and arguments", STATEMENT_ARGUMENTS),
    ("logical deduction", LOGICAL_DEDUCTION),
    ("aptitude", APTITUDE),
];

/// How a fallback rule tests a lower-cased label.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// Any of the fragments occurs as a substring.
    Any(&'static [&'static str]),
    /// The first fragment occurs together with any of the others.
    Both(&'static str, &'static [&'static str]),
    /// The fragment occurs as a whole word.
    Word(&'static str),
}

impl Pattern {
    fn matches(&self, label: &str) -> bool {
        match self {
            Pattern::Any(fragments) => fragments.iter().any(|f| label.contains(f)),
            Pattern::Both(first, others) => {
                label.contains(first) && others.iter().any(|f| label.contains(f))
            }
            Pattern::Word(word) => label
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == *word),
        }
    }
}

/// Broader keyword rules, tried in order once the direct map has failed.
const FALLBACK_RULES: &[(Pattern, CategoryMetadata)] = &[
    (Pattern::Any(&["spell"]), SPELLINGS),
    (Pattern::Any(&["synonym", "antonym"]), SYNONYMS),
    (Pattern::Any(&["general-knowledge"]), GENERAL_KNOWLEDGE),
    (Pattern::Any(&["meghalaya", "megha"]), MEGHALAYA_GK),
    // "meghalaya" labels never get this far
    (Pattern::Any(&["gk"]), GENERAL_KNOWLEDGE),
    (Pattern::Word("it"), TECHNOLOGY),
    (Pattern::Any(&["tech"]), TECHNOLOGY),
    (Pattern::Any(&["env", "geo"]), INDIAN_GEOGRAPHY),
    (Pattern::Any(&["quant", "math"]), QUANTITATIVE_APTITUDE),
    (Pattern::Any(&["logic", "reason"]), LOGICAL_REASONING),
    (Pattern::Any(&["data", "interpret"]), DATA_INTERPRETATION),
    (Pattern::Any(&["number", "series"]), NUMBER_SERIES),
    (Pattern::Any(&["percent"]), PERCENTAGE),
    (Pattern::Any(&["profit", "loss"]), PROFIT_AND_LOSS),
    (Pattern::Both("interest", &["simple"]), SIMPLE_INTEREST),
    (Pattern::Both("interest", &["compound"]), COMPOUND_INTEREST),
    (Pattern::Any(&["interest"]), SIMPLE_INTEREST),
    (Pattern::Both("time", &["work"]), TIME_AND_WORK),
    (Pattern::Both("time", &["dist"]), TIME_AND_DISTANCE),
    (Pattern::Any(&["average"]), AVERAGE),
    (Pattern::Any(&["ratio", "proportion"]), RATIO_AND_PROPORTION),
    (Pattern::Any(&["algebra"]), ALGEBRA),
    (Pattern::Any(&["shape"]), GEOMETRY),
    (Pattern::Any(&["trigo"]), TRIGONOMETRY),
    (Pattern::Any(&["probab"]), PROBABILITY),
    (Pattern::Any(&["permut", "combinat"]), PERMUTATION),
    (Pattern::Any(&["puzzle"]), PUZZLES),
    (Pattern::Any(&["blood", "relation"]), BLOOD_RELATIONS),
    (Pattern::Any(&["code", "decod"]), CODING_DECODING),
    (Pattern::Any(&["direct"]), DIRECTION_SENSE),
    (Pattern::Any(&["seat"]), SEATING_ARRANGEMENT),
    (Pattern::Any(&["syllog"]), SYLLOGISM),
    (Pattern::Any(&["analog"]), ANALOGY),
    (Pattern::Any(&["classif"]), CLASSIFICATION),
    (Pattern::Any(&["clock", "calendar"]), CLOCK_AND_CALENDAR),
    (Pattern::Any(&["operat"]), MATHEMATICAL_OPERATIONS),
    (Pattern::Any(&["suffi"]), DATA_SUFFICIENCY),
    (Pattern::Any(&["conclu"]), STATEMENT_CONCLUSIONS),
    (Pattern::Any(&["assum"]), STATEMENT_ASSUMPTIONS),
    (Pattern::Any(&["course", "action"]), COURSE_OF_ACTION),
    (Pattern::Any(&["cause", "effect"]), CAUSE_AND_EFFECT),
    (Pattern::Any(&["argu"]), STATEMENT_ARGUMENTS),
    (Pattern::Any(&["deduc"]), LOGICAL_DEDUCTION),
    (Pattern::Any(&["aptitude"]), APTITUDE),
];

/// Resolves display metadata for a category or subcategory label.
///
/// Total: labels that match nothing get [`DEFAULT`].
pub fn resolve_category_meta(label: &str) -> CategoryMetadata {
    let label = label.to_lowercase();

    if let Some((_, meta)) = DIRECT_MAP.iter().find(|(key, _)| label.contains(key)) {
        return *meta;
    }

    FALLBACK_RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(&label))
        .map(|(_, meta)| *meta)
        .unwrap_or(DEFAULT)
}

/// Metadata for a top-level question-bank folder such as `general-english`.
pub fn folder_meta(folder: &str) -> CategoryMetadata {
    match folder {
        "aptitude" => meta("🧮", "bg-purple-100", "text-purple-800"),
        "general-english" => meta("📚", "bg-blue-100", "text-blue-800"),
        "general-knowledge" => meta("🌍", "bg-green-100", "text-green-800"),
        _ => meta("📖", "bg-gray-100", "text-gray-800"),
    }
}
