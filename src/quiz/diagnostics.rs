use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Debug,
    Warning,
}

/// One anomaly noticed while parsing or scanning the question bank.
///
/// Nothing recorded here is fatal: the parse that produced it still returned
/// a best-effort result.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Where it happened, usually a file name and block number.
    pub context: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {} ({})", self.severity, self.message, self.context)
    }
}

/// Collects diagnostics for a parse pass and mirrors them to the `log` facade.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Debug, context.into(), message.into());
    }

    pub fn warn(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, context.into(), message.into());
    }

    fn push(&mut self, severity: Severity, context: String, message: String) {
        match severity {
            Severity::Debug => log::debug!("{}: {}", context, message),
            Severity::Warning => log::warn!("{}: {}", context, message),
        }
        self.records.push(Diagnostic {
            severity,
            message,
            context,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Moves every record out of `other` without logging them a second time.
    pub fn extend(&mut self, other: Diagnostics) {
        self.records.extend(other.records);
    }

    #[cfg(test)]
    pub fn has_warning_containing(&self, needle: &str) -> bool {
        self.warnings().any(|d| d.message.contains(needle))
    }
}
