use std::path::PathBuf;

use crate::quiz::loader::PlainTextMode;

const DEFAULT_BANK_ROOT: &str = "TestQnA";
const DEFAULT_DIALOGUE_DB: &str = "db.sqlite";

#[derive(Debug, Clone)]
pub struct Config {
    pub bank_root: PathBuf,
    pub plain_text_mode: PlainTextMode,
    pub dialogue_db: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_root: PathBuf::from(DEFAULT_BANK_ROOT),
            plain_text_mode: PlainTextMode::default(),
            dialogue_db: DEFAULT_DIALOGUE_DB.to_string(),
        }
    }
}

impl Config {
    /// Reads `QUIZ_BANK_ROOT`, `QUIZ_PLAIN_TEXT_PARSER` and `QUIZ_DIALOGUE_DB`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(root) = lookup("QUIZ_BANK_ROOT").filter(|v| !v.trim().is_empty()) {
            config.bank_root = PathBuf::from(root);
        }

        if let Some(mode) = lookup("QUIZ_PLAIN_TEXT_PARSER") {
            match mode.parse() {
                Ok(mode) => config.plain_text_mode = mode,
                Err(err) => log::warn!("{}, using {:?}", err, config.plain_text_mode),
            }
        }

        if let Some(db) = lookup("QUIZ_DIALOGUE_DB").filter(|v| !v.trim().is_empty()) {
            config.dialogue_db = db;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.bank_root, PathBuf::from("TestQnA"));
        assert_eq!(config.plain_text_mode, PlainTextMode::Heuristic);
        assert_eq!(config.dialogue_db, "db.sqlite");
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("QUIZ_BANK_ROOT", "/srv/bank"),
            ("QUIZ_PLAIN_TEXT_PARSER", "strict"),
            ("QUIZ_DIALOGUE_DB", "state.sqlite"),
        ]);
        assert_eq!(config.bank_root, PathBuf::from("/srv/bank"));
        assert_eq!(config.plain_text_mode, PlainTextMode::Strict);
        assert_eq!(config.dialogue_db, "state.sqlite");
    }

    #[test]
    fn invalid_parser_name_keeps_default() {
        let config = config_from(&[("QUIZ_PLAIN_TEXT_PARSER", "fuzzy"), ("QUIZ_BANK_ROOT", " ")]);
        assert_eq!(config.plain_text_mode, PlainTextMode::Heuristic);
        assert_eq!(config.bank_root, PathBuf::from("TestQnA"));
    }
}
