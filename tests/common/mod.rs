//! Shared helpers for the integration suites.

use filter_spirit::compiler::Settings;
use filter_spirit::diagnostics::DiagnosticsStore;
use filter_spirit::lang::item_filter::{ItemFilter, SpiritFilter};
use filter_spirit::lang::market::{DivinationCard, ElementaryItem, ItemPriceData};
use filter_spirit::source::SourceMap;

pub fn render_diagnostics(source: &str, diagnostics: &DiagnosticsStore) -> String {
    let map = SourceMap::new(source);
    let mut out = String::new();
    diagnostics.print_to(&map, &mut out);
    out
}

/// Compile and expand a spirit filter, panicking with rendered
/// diagnostics on failure.
pub fn generate_filter(source: &str, data: &ItemPriceData) -> String {
    let mut diagnostics = DiagnosticsStore::new();
    let result = filter_spirit::generate_filter_without_preamble(
        source,
        data,
        Settings::default(),
        &mut diagnostics,
    );
    assert!(
        result.is_some() && !diagnostics.has_errors(),
        "filter generation failed:\n{}",
        render_diagnostics(source, &diagnostics)
    );
    result.unwrap_or_default()
}

pub fn generate(source: &str) -> String {
    generate_filter(source, &ItemPriceData::default())
}

pub fn compile_spirit(source: &str) -> SpiritFilter {
    let mut diagnostics = DiagnosticsStore::new();
    let result =
        filter_spirit::compile_spirit_filter(source, Settings::default(), &mut diagnostics);
    assert!(
        result.is_some() && !diagnostics.has_errors(),
        "compilation failed:\n{}",
        render_diagnostics(source, &diagnostics)
    );
    result.unwrap_or_default()
}

pub fn compile_real(source: &str) -> ItemFilter {
    let mut diagnostics = DiagnosticsStore::new();
    let result = filter_spirit::compile_real_filter(source, Settings::default(), &mut diagnostics);
    assert!(
        result.is_some() && !diagnostics.has_errors(),
        "compilation failed:\n{}",
        render_diagnostics(source, &diagnostics)
    );
    result.unwrap_or_default()
}

/// Diagnostics produced by compiling a spirit filter, for error tests.
pub fn spirit_diagnostics(source: &str) -> DiagnosticsStore {
    let mut diagnostics = DiagnosticsStore::new();
    let _ = filter_spirit::compile_spirit_filter(source, Settings::default(), &mut diagnostics);
    diagnostics
}

pub fn card(name: &str, chaos_value: f64) -> DivinationCard {
    DivinationCard {
        item: ElementaryItem::new(name, chaos_value),
        stack_size: 1,
    }
}

/// The divination card snapshot used by the autogeneration scenarios.
pub fn cards_snapshot() -> ItemPriceData {
    let mut data = ItemPriceData::default();
    data.divination_cards = vec![
        card("Rain of Chaos", 0.125),
        card("Humility", 5.0),
        card("A Dab of Ink", 10.0),
        card("Abandoned Wealth", 100.0),
        card("The Doctor", 1000.0),
    ];
    data
}
