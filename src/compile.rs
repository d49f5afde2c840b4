//! End-to-end compilation pipelines: source text in, compiled filter or
//! generated text out, with all failures reported through the
//! diagnostics store.

use crate::compiler::{
    compile_spirit_filter_statements, resolve_spirit_filter_symbols, Settings,
};
use crate::diagnostics::{DiagnosticId, DiagnosticsStore};
use crate::generator::{emit_filter, emit_filter_with_preamble, make_item_filter};
use crate::lang::item_filter::{ItemFilter, SpiritFilter};
use crate::lexemes::LexemeTable;
use crate::lang::market::{ItemPriceData, ItemPriceMetadata};
use crate::parser::{self, ParseFailure};

fn push_parse_failure(failure: &ParseFailure, diagnostics: &mut DiagnosticsStore) {
    for error in &failure.errors {
        diagnostics.push_error(DiagnosticId::ParseError, error.origin, error.kind.to_string());
    }
}

/// Lex, parse, resolve symbols and compile a spirit filter template
/// into its flat block list.
pub fn compile_spirit_filter(
    source: &str,
    settings: Settings,
    diagnostics: &mut DiagnosticsStore,
) -> Option<SpiritFilter> {
    let mut lexemes = LexemeTable::new();
    let ast = match parser::parse_spirit_filter(source, &mut lexemes) {
        Ok(ast) => ast,
        Err(failure) => {
            push_parse_failure(&failure, diagnostics);
            return None;
        }
    };

    let symbols = resolve_spirit_filter_symbols(&ast.definitions, settings, diagnostics);
    if settings.stop_on_error && diagnostics.has_errors() {
        return None;
    }

    compile_spirit_filter_statements(&ast.statements, &symbols, settings, diagnostics)
}

/// Compile a filter written in the game client's native format.
pub fn compile_real_filter(
    source: &str,
    settings: Settings,
    diagnostics: &mut DiagnosticsStore,
) -> Option<ItemFilter> {
    let mut lexemes = LexemeTable::new();
    let ast = match parser::parse_real_filter(source, &mut lexemes) {
        Ok(ast) => ast,
        Err(failure) => {
            push_parse_failure(&failure, diagnostics);
            return None;
        }
    };
    crate::compiler::compile_real_filter(&ast, settings, diagnostics)
}

/// Compile a spirit filter and expand it against market data, without
/// the generated-file preamble. Used heavily by tests.
pub fn generate_filter_without_preamble(
    source: &str,
    item_price_data: &ItemPriceData,
    settings: Settings,
    diagnostics: &mut DiagnosticsStore,
) -> Option<String> {
    let spirit = compile_spirit_filter(source, settings, diagnostics)?;
    let filter = make_item_filter(&spirit, item_price_data, diagnostics);
    if settings.stop_on_error && diagnostics.has_errors() {
        return None;
    }
    Some(emit_filter(&filter))
}

/// Full generation: compiled filter text with a preamble naming the
/// program version and snapshot provenance.
pub fn generate_filter(
    source: &str,
    item_price_data: &ItemPriceData,
    metadata: Option<&ItemPriceMetadata>,
    settings: Settings,
    diagnostics: &mut DiagnosticsStore,
) -> Option<String> {
    let spirit = compile_spirit_filter(source, settings, diagnostics)?;
    let filter = make_item_filter(&spirit, item_price_data, diagnostics);
    if settings.stop_on_error && diagnostics.has_errors() {
        return None;
    }
    Some(emit_filter_with_preamble(&filter, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_input_generates_empty_filter() {
        let mut diagnostics = DiagnosticsStore::new();
        let filter = generate_filter_without_preamble(
            "",
            &ItemPriceData::default(),
            Settings::default(),
            &mut diagnostics,
        );
        assert_eq!(filter.as_deref(), Some(""));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn parse_errors_become_diagnostics() {
        let mut diagnostics = DiagnosticsStore::new();
        let filter = compile_spirit_filter("Show }", Settings::default(), &mut diagnostics);
        assert!(filter.is_none());
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.messages()[0].id, DiagnosticId::ParseError);
    }

    #[test]
    fn compiling_without_snapshot_equals_empty_snapshot() {
        let source = "Quality > 10 { SetFontSize 45 Show }\nHide\n";
        let mut diagnostics = DiagnosticsStore::new();
        let with_empty = generate_filter_without_preamble(
            source,
            &ItemPriceData::default(),
            Settings::default(),
            &mut diagnostics,
        )
        .unwrap();

        let mut diagnostics = DiagnosticsStore::new();
        let spirit =
            compile_spirit_filter(source, Settings::default(), &mut diagnostics).unwrap();
        let mut direct = String::new();
        for block in &spirit.blocks {
            assert!(block.autogen.is_none());
            block.block.generate(&mut direct);
        }
        assert_eq!(with_empty, direct);
    }
}
