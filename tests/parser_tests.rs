//! Parser-facing integration checks: spans, recovery data and grammar
//! corners that only show up with full inputs.

mod common;

use filter_spirit::lexemes::LexemeTable;
use filter_spirit::parser::{parse_real_filter, parse_spirit_filter};

#[test]
fn parse_failure_reports_stop_position() {
    let mut lexemes = LexemeTable::new();
    let source = "Quality > 0 {\n\tShow\n";
    let failure = parse_spirit_filter(source, &mut lexemes).unwrap_err();
    assert!(!failure.errors.is_empty());
    assert!(failure.stop_position.end <= source.len());
}

#[test]
fn every_error_span_is_a_subrange_of_the_input() {
    let sources = [
        "Class < \"x\" { Show }",
        "$x = \nShow",
        "Show }",
        "version: oops\nShow",
    ];
    for source in sources {
        let mut lexemes = LexemeTable::new();
        if let Err(failure) = parse_spirit_filter(source, &mut lexemes) {
            for error in &failure.errors {
                assert!(
                    error.origin.start <= error.origin.end && error.origin.end <= source.len(),
                    "bad span for {:?} in {:?}",
                    error,
                    source
                );
            }
        } else {
            panic!("expected parse failure for {:?}", source);
        }
    }
}

#[test]
fn keywords_are_not_valid_constant_names() {
    let mut lexemes = LexemeTable::new();
    assert!(parse_spirit_filter("$Show = 1\n", &mut lexemes).is_err());
}

#[test]
fn comments_can_carry_any_bytes() {
    let mut lexemes = LexemeTable::new();
    let filter = parse_spirit_filter(
        "# filter strictness: {}$\"\\ weird\nShow # trailing\n",
        &mut lexemes,
    )
    .expect("parse failed");
    assert_eq!(filter.statements.len(), 1);
}

#[test]
fn real_filter_accepts_minimal_visibility() {
    let mut lexemes = LexemeTable::new();
    let filter = parse_real_filter("Minimal\n\tQuality > 0\n", &mut lexemes).expect("parse");
    assert_eq!(filter.blocks.len(), 1);
}

#[test]
fn multiple_block_errors_are_all_collected() {
    let mut lexemes = LexemeTable::new();
    let failure = parse_real_filter(
        "Show\n\tClass < \"a\"\n\
         Show\n\tBaseType > \"b\"\n\
         Show\n\tQuality > 1\n",
        &mut lexemes,
    )
    .unwrap_err();
    assert_eq!(failure.errors.len(), 2);
}

#[test]
fn lexing_then_reemitting_preserves_semantics() {
    // whitespace and comment layout do not influence the compiled output
    let dense = "Quality>0{SetFontSize 45 Show}";
    let airy = "# header\nQuality  >  0   {\n\tSetFontSize 45 # loud\n\tShow\n}\n";
    assert_eq!(common::generate(dense), common::generate(airy));
}
