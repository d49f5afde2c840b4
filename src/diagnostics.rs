use std::fmt::Write;

use crate::source::SourceMap;
use crate::token::Span;

/// Wording appended after internal compiler errors.
pub const REQUEST_BUG_REPORT: &str =
    "please report a bug with attached minimal filter source that reproduces it";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }

    /// ANSI SGR parameters used when printing to a terminal: bold red
    /// for errors, yellow for warnings, cyan for notes.
    fn sgr_params(self) -> &'static str {
        match self {
            Severity::Error => "1;31",
            Severity::Warning => "33",
            Severity::Note => "36",
        }
    }
}

fn colored_label(severity: Severity) -> String {
    format!("\x1b[{}m{}\x1b[0m", severity.sgr_params(), severity.label())
}

/// Closed set of diagnostic identifiers, usable for programmatic
/// suppression and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticId {
    NameAlreadyExists,
    NoSuchName,
    InvalidAmountOfArguments,
    InvalidIntegerValue,
    TypeMismatch,
    InvalidRangedStringsCondition,
    EmptySocketSpec,
    IllegalCharacterInSocketSpec,
    InvalidSocketSpec,
    DuplicateInfluence,
    ConditionRedefinition,
    ActionRedefinition,
    LowerBoundRedefinition,
    UpperBoundRedefinition,
    InvalidAction,
    InvalidSetAlertSound,
    PriceWithoutAutogen,
    AutogenError,
    UnknownExpression,
    ParseError,
    InternalCompilerError,
    FontSizeOutsideRange,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub id: DiagnosticId,
    pub origin: Option<Span>,
    pub message: String,
}

/// Append-only buffer of diagnostics produced by every compiler pass.
///
/// Messages keep their append order; pretty-printing walks them in that
/// order so output is stable across runs of identical input.
#[derive(Default)]
pub struct DiagnosticsStore {
    messages: Vec<Diagnostic>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.messages.push(diagnostic);
    }

    pub fn push_error(&mut self, id: DiagnosticId, origin: Span, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Error,
            id,
            origin: Some(origin),
            message: message.into(),
        });
    }

    pub fn push_warning(&mut self, id: DiagnosticId, origin: Span, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            id,
            origin: Some(origin),
            message: message.into(),
        });
    }

    /// Notes attach context to the directly preceding error or warning
    /// and reuse its identifier.
    pub fn push_note(&mut self, id: DiagnosticId, origin: Option<Span>, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Note,
            id,
            origin,
            message: message.into(),
        });
    }

    pub fn push_internal_compiler_error(&mut self, cause: &str, origin: Span) {
        self.push_error(
            DiagnosticId::InternalCompilerError,
            origin,
            format!("internal compiler error in {}", cause),
        );
        self.push_note(DiagnosticId::InternalCompilerError, None, REQUEST_BUG_REPORT);
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.severity == Severity::Warning)
    }

    /// Overall failure verdict, honoring warning promotion.
    pub fn failed(&self, treat_warnings_as_errors: bool) -> bool {
        self.has_errors() || (treat_warnings_as_errors && self.has_warnings())
    }

    /// Render every diagnostic in order using the stable text format:
    /// `severity: message`, then `line N: code` and a `~` underline row
    /// when the diagnostic carries an origin.
    pub fn print_to(&self, map: &SourceMap, output: &mut String) {
        for diagnostic in &self.messages {
            print_one(diagnostic, map, output, false);
        }
    }

    /// Same format with ANSI severity coloring for terminal output.
    pub fn print_ansi_to(&self, map: &SourceMap, output: &mut String) {
        for diagnostic in &self.messages {
            print_one(diagnostic, map, output, true);
        }
    }
}

fn print_one(diagnostic: &Diagnostic, map: &SourceMap, output: &mut String, ansi: bool) {
    let label = if ansi {
        colored_label(diagnostic.severity)
    } else {
        diagnostic.severity.label().to_string()
    };

    let _ = writeln!(output, "{}: {}", label, diagnostic.message);

    if let Some(origin) = diagnostic.origin {
        for line in map.underline(origin) {
            let prefix = format!("line {}: ", line.line_number);
            let _ = writeln!(output, "{}{}", prefix, line.text);
            let _ = writeln!(
                output,
                "{}{}",
                " ".repeat(prefix.len() + line.spaces_before),
                "~".repeat(line.underline_len)
            );
        }
    }
}
