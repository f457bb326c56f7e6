use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Line matches neither `Key: value` nor `Decl(arg): value`
    MalformedLine,
    /// Declaration other than `SiteConfig`
    UnknownDeclaration,
    /// Field that may appear only once appeared again
    DuplicateField,
    /// Value rejected by a validator or by the field's own grammar
    InvalidValue,
    /// Mandatory field absent after the whole file was read
    MissingMandatoryField,
    /// Relative SiteConfig declaration before the Name field
    MissingContext,
    /// Retired field name
    DeprecatedField,
    /// Unknown TestTime unit suffix
    UnitSuffix,
    /// TestTime under a minute
    ShortDuration,
    /// Architectures or Releases mixing negated and plain entries
    MixedNegation,
}

/// A single error or warning found while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// 1-based line number the diagnostic was raised on
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.message)
    }
}

/// Parse aborted by a strict sink
///
/// Errors and warnings are kept apart so callers can treat them differently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0}")]
    Error(Diagnostic),

    #[error("{0}")]
    Warning(Diagnostic),
}

impl ParseError {
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            ParseError::Error(d) | ParseError::Warning(d) => d,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.diagnostic().kind
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ParseError::Warning(_))
    }
}
