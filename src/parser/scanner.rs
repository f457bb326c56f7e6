use super::registry::{self, MANDATORY_FIELDS};
use super::{Diagnostic, DiagnosticKind, DiagnosticSink, ParseError, Severity};
use crate::record::{SiteConfig, TestInfo};
use regex::Regex;
use std::sync::LazyLock;

/// `Decl(arg): value`, with no colon in `Decl`
static DECLARATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]*)\((.*)\):(.*)$").expect("valid regex"));

/// Classification of one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'l> {
    Comment,
    Blank,
    /// `Decl(arg): value`, all three parts trimmed
    Declaration {
        name: &'l str,
        arg: &'l str,
        value: &'l str,
    },
    /// `Key: value`, both parts trimmed
    KeyValue { key: &'l str, value: &'l str },
    Malformed,
}

/// Classify a raw line
///
/// Comments are recognised only when `#` is the very first character;
/// everything else is classified after trimming.
pub fn classify(raw: &str) -> LineKind<'_> {
    if raw.starts_with('#') {
        return LineKind::Comment;
    }

    let line = raw.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    if let Some(caps) = DECLARATION_RE.captures(line) {
        let part = |i: usize| caps.get(i).map_or("", |m| m.as_str()).trim();
        return LineKind::Declaration {
            name: part(1),
            arg: part(2),
            value: part(3),
        };
    }

    match line.split_once(':') {
        Some((key, value)) => LineKind::KeyValue {
            key: key.trim(),
            value: value.trim(),
        },
        None => LineKind::Malformed,
    }
}

/// Line-by-line testinfo.desc parser
///
/// Builds a [`TestInfo`] as lines are fed in file order and reports every
/// problem through the sink it was created with.
pub struct Parser<'s> {
    pub(super) info: TestInfo,
    sink: &'s mut dyn DiagnosticSink,
    line_num: usize,
}

impl<'s> Parser<'s> {
    pub fn new(sink: &'s mut dyn DiagnosticSink) -> Self {
        Self {
            info: TestInfo::new(),
            sink,
            line_num: 0,
        }
    }

    /// Feed every line, then check that the mandatory fields are present
    ///
    /// Stops early only if the sink aborts. The record built so far stays
    /// available through [`Parser::info`] either way.
    pub fn run<I, S>(&mut self, lines: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tracing::debug!("parsing testinfo lines");
        for line in lines {
            self.line_num += 1;
            self.handle_line(line.as_ref())?;
        }
        tracing::debug!(lines = self.line_num, "checking mandatory fields");
        self.check_mandatory()
    }

    /// Handle one line
    pub fn handle_line(&mut self, raw: &str) -> Result<(), ParseError> {
        let kind = classify(raw);
        tracing::trace!(line = self.line_num, ?kind, "classified line");

        match kind {
            LineKind::Comment | LineKind::Blank => Ok(()),
            LineKind::Declaration { name, arg, value } => {
                self.handle_declaration(name, arg, value)
            }
            LineKind::KeyValue { key, value } => self.handle_field(key, value),
            LineKind::Malformed => {
                self.error(DiagnosticKind::MalformedLine, "Malformed \"Key: value\" line")
            }
        }
    }

    /// Dispatch a `Key: value` pair to its field handler
    ///
    /// Unrecognised keys are ignored.
    pub fn handle_field(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        match registry::lookup(key) {
            Some((field, handler)) => {
                tracing::trace!(line = self.line_num, field = field.key(), "dispatching field");
                handler(self, field, value)
            }
            None => {
                tracing::trace!(line = self.line_num, key, "ignoring unknown field");
                Ok(())
            }
        }
    }

    /// Dispatch a `Decl(arg): value` line; only `SiteConfig` is known
    pub fn handle_declaration(
        &mut self,
        name: &str,
        arg: &str,
        value: &str,
    ) -> Result<(), ParseError> {
        if name != "SiteConfig" {
            return self.error(
                DiagnosticKind::UnknownDeclaration,
                format!("\"{}\" is not a valid declaration", name),
            );
        }

        match self.info.siteconfig_path(arg) {
            Some(path) => {
                self.info.siteconfig.push(SiteConfig::new(path, value));
                Ok(())
            }
            None => self.error(
                DiagnosticKind::MissingContext,
                "A relative SiteConfig(): declaration appeared before a Name: field",
            ),
        }
    }

    fn check_mandatory(&mut self) -> Result<(), ParseError> {
        for field in MANDATORY_FIELDS {
            if !field.is_set(&self.info) {
                self.error(
                    DiagnosticKind::MissingMandatoryField,
                    format!("{} field not defined", field.key()),
                )?;
            }
        }
        Ok(())
    }

    /// The record as built so far
    pub fn info(&self) -> &TestInfo {
        &self.info
    }

    pub fn into_info(self) -> TestInfo {
        self.info
    }

    /// Number of lines consumed so far
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    pub(super) fn error(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Result<(), ParseError> {
        let diagnostic = self.diagnostic(Severity::Error, kind, message.into());
        self.sink.handle_error(diagnostic)
    }

    pub(super) fn warning(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Result<(), ParseError> {
        let diagnostic = self.diagnostic(Severity::Warning, kind, message.into());
        self.sink.handle_warning(diagnostic)
    }

    fn diagnostic(&self, severity: Severity, kind: DiagnosticKind, message: String) -> Diagnostic {
        Diagnostic {
            severity,
            kind,
            line: self.line_num,
            message,
        }
    }
}
