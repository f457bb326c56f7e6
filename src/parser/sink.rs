use super::{Diagnostic, ParseError};
use std::io::Write;

/// Where diagnostics go
///
/// Handlers report every problem through this trait and never decide for
/// themselves whether parsing should stop. Returning `Err` aborts the parse.
pub trait DiagnosticSink {
    fn handle_error(&mut self, diagnostic: Diagnostic) -> Result<(), ParseError>;

    fn handle_warning(&mut self, diagnostic: Diagnostic) -> Result<(), ParseError>;
}

/// Raise on the first diagnostic, or silently drop all of them
#[derive(Debug, Clone, Copy)]
pub struct StrictSink {
    raise_errors: bool,
}

impl StrictSink {
    pub fn new(raise_errors: bool) -> Self {
        Self { raise_errors }
    }
}

impl DiagnosticSink for StrictSink {
    fn handle_error(&mut self, diagnostic: Diagnostic) -> Result<(), ParseError> {
        if self.raise_errors {
            return Err(ParseError::Error(diagnostic));
        }
        Ok(())
    }

    fn handle_warning(&mut self, diagnostic: Diagnostic) -> Result<(), ParseError> {
        if self.raise_errors {
            return Err(ParseError::Warning(diagnostic));
        }
        Ok(())
    }
}

/// Print GCC-style lines and keep counting
///
/// Each diagnostic is written as `<source>:<line>: <severity>: <message>`.
/// Never aborts the parse; a failed write is logged and otherwise ignored.
pub struct ReportingSink<W: Write> {
    out: W,
    source_name: String,
    errors: usize,
    warnings: usize,
}

impl<W: Write> ReportingSink<W> {
    pub fn new(out: W, source_name: impl Into<String>) -> Self {
        Self {
            out,
            source_name: source_name.into(),
            errors: 0,
            warnings: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, diagnostic: &Diagnostic) {
        let written = writeln!(
            self.out,
            "{}:{}: {}: {}",
            self.source_name, diagnostic.line, diagnostic.severity, diagnostic.message
        );

        if let Err(err) = written {
            tracing::warn!(source = %self.source_name, error = %err, "failed to write diagnostic");
        }
    }
}

impl<W: Write> DiagnosticSink for ReportingSink<W> {
    fn handle_error(&mut self, diagnostic: Diagnostic) -> Result<(), ParseError> {
        self.write(&diagnostic);
        self.errors += 1;
        Ok(())
    }

    fn handle_warning(&mut self, diagnostic: Diagnostic) -> Result<(), ParseError> {
        self.write(&diagnostic);
        self.warnings += 1;
        Ok(())
    }
}

/// Collect every diagnostic in order
impl DiagnosticSink for Vec<Diagnostic> {
    fn handle_error(&mut self, diagnostic: Diagnostic) -> Result<(), ParseError> {
        self.push(diagnostic);
        Ok(())
    }

    fn handle_warning(&mut self, diagnostic: Diagnostic) -> Result<(), ParseError> {
        self.push(diagnostic);
        Ok(())
    }
}
