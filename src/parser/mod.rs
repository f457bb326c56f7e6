mod error;
mod handlers;
mod registry;
mod scanner;
mod sink;
pub mod vocab;


pub use error::{Diagnostic, DiagnosticKind, ParseError, Severity};
pub use registry::{Field, FieldHandler, MANDATORY_FIELDS};
pub use scanner::{LineKind, Parser, classify};
pub use sink::{DiagnosticSink, ReportingSink, StrictSink};

use crate::record::TestInfo;
use std::io::Write;

/// Parse testinfo.desc lines with the strict policy
///
/// With `raise_errors` the first error or warning aborts the parse and is
/// returned. Without it every diagnostic is dropped and whatever could be
/// parsed is returned.
pub fn parse<I, S>(lines: I, raise_errors: bool) -> Result<TestInfo, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sink = StrictSink::new(raise_errors);
    parse_with_sink(lines, &mut sink)
}

/// Parse a whole file's text; see [`parse`]
pub fn parse_str(text: &str, raise_errors: bool) -> Result<TestInfo, ParseError> {
    parse(text.split('\n'), raise_errors)
}

/// Parse with any diagnostic sink
pub fn parse_with_sink<I, S>(lines: I, sink: &mut dyn DiagnosticSink) -> Result<TestInfo, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new(sink);
    parser.run(lines)?;
    Ok(parser.into_info())
}

/// Parse while printing every diagnostic to `out`
///
/// Diagnostics are written as `<source_name>:<line>: <severity>: <message>`.
/// Parsing always runs to the end. Returns the record together with the
/// number of errors and warnings reported.
pub fn parse_with_reporting<I, S, W>(
    lines: I,
    source_name: &str,
    out: W,
) -> (TestInfo, usize, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    W: Write,
{
    let mut sink = ReportingSink::new(out, source_name);
    tracing::debug!(source = source_name, "parsing with reporting sink");

    let mut parser = Parser::new(&mut sink);
    if let Err(err) = parser.run(lines) {
        // Reporting sinks never abort
        tracing::error!(source = source_name, %err, "parse aborted unexpectedly");
    }
    let lines_read = parser.line_num();
    let info = parser.into_info();

    tracing::debug!(
        source = source_name,
        lines = lines_read,
        errors = sink.error_count(),
        warnings = sink.warning_count(),
        "finished parsing"
    );

    (info, sink.error_count(), sink.warning_count())
}
