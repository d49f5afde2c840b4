//! Filter Spirit: a compiler that turns spirit filter templates into
//! item filters in the game client's native format.
//!
//! The pipeline, in pass order:
//! text → tokens → AST → (symbol table, statement tree) → flat block list
//! → (with market data) resolved name lists → emitted filter text.

pub mod ast;
pub mod compile;
pub mod compiler;
pub mod diagnostics;
pub mod generator;
pub mod lang;
pub mod lexemes;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token;

pub mod cli;

pub use compile::{
    compile_real_filter, compile_spirit_filter, generate_filter, generate_filter_without_preamble,
};
pub use compiler::Settings;
pub use diagnostics::{Diagnostic, DiagnosticId, DiagnosticsStore, Severity};
pub use lexemes::{LexemeTable, Symbol};
pub use lexer::Lexer;
pub use source::SourceMap;
pub use token::{Span, Token, TokenKind};

/// Version string baked into generated filter preambles and the snapshot cache index.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
