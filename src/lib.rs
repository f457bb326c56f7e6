// Public API exports
pub mod parser;
pub mod record;
pub mod validator;

// Re-export main types for convenience
pub use parser::{
    Diagnostic, DiagnosticKind, DiagnosticSink, Field, ParseError, Parser, ReportingSink,
    Severity, StrictSink, parse, parse_str, parse_with_reporting, parse_with_sink,
};

pub use record::{
    Comparison, Environment, NeedProperty, SiteConfig, TestInfo, lookup_namespace, serialize,
};

pub use validator::{
    BoolValidator, DashListValidator, ListValidator, NameAddrValidator, RegexValidator, Validator,
};
