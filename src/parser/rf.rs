use crate::ast::{rf, Condition, PrimitiveExpr, Sequence};
use crate::token::TokenKind;

use super::{ParseError, ParseErrorKind, ParseFailure, ParseResult, Parser};

/// Real filter grammar: a flat list of blocks, each a visibility
/// keyword followed by condition and action lines. No constants, no
/// nesting, no spirit extensions.
pub trait RealFilterParsing {
    fn parse_real_filter(&mut self) -> Result<rf::Filter, ParseFailure>;
}

impl RealFilterParsing for Parser<'_> {
    fn parse_real_filter(&mut self) -> Result<rf::Filter, ParseFailure> {
        let mut filter = rf::Filter::default();
        let mut errors = Vec::new();

        while !self.at_eof() {
            match parse_block(self) {
                Ok(block) => filter.blocks.push(block),
                Err(error) => {
                    // resynchronize at the next visibility keyword so
                    // later blocks still produce line-accurate errors
                    errors.push(error);
                    if !self.at_eof() {
                        self.advance();
                    }
                    loop {
                        match self.peek_kind() {
                            TokenKind::Visibility(_) | TokenKind::Eof => break,
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(ParseFailure {
                stop_position: self.span(),
                errors,
            })
        }
    }
}

fn parse_block(p: &mut Parser<'_>) -> ParseResult<rf::Block> {
    let visibility = match p.peek_kind() {
        TokenKind::Visibility(visibility) if visibility.in_real_filter() => *visibility,
        _ => return Err(p.error("'Show', 'Hide' or 'Minimal'")),
    };
    let visibility_origin = p.advance().span;

    let mut entries = Vec::new();
    loop {
        match p.peek_kind() {
            TokenKind::Condition(property) => {
                let property = *property;
                let condition = p.parse_property_condition(property)?;
                reject_name_references(&condition)?;
                entries.push(rf::BlockEntry::Condition(condition));
            }
            TokenKind::Action(action) => {
                let action = *action;
                let keyword_span = p.advance().span;
                let value = p.parse_optional_sequence()?;

                if value.is_none() && !action.is_drop_sound_switch() {
                    return Err(ParseError {
                        kind: ParseErrorKind::EmptySequence,
                        origin: p.span(),
                    });
                }
                if let Some(sequence) = &value {
                    reject_names_in_sequence(sequence)?;
                }

                let origin = match &value {
                    Some(sequence) => keyword_span.merge(sequence.origin),
                    None => keyword_span,
                };
                entries.push(rf::BlockEntry::Action(rf::Action {
                    action,
                    value,
                    origin,
                }));
            }
            TokenKind::LBrace => {
                return Err(ParseError {
                    kind: ParseErrorKind::NestingInRealFilter,
                    origin: p.span(),
                });
            }
            _ => break,
        }
    }

    Ok(rf::Block {
        visibility,
        visibility_origin,
        entries,
    })
}

fn reject_name_references(condition: &Condition) -> ParseResult<()> {
    if let Condition::Property { value, .. } = condition {
        reject_names_in_sequence(value)?;
    }
    Ok(())
}

fn reject_names_in_sequence(sequence: &Sequence) -> ParseResult<()> {
    for element in &sequence.elements {
        if let PrimitiveExpr::NameRef { origin, .. } = element {
            return Err(ParseError {
                kind: ParseErrorKind::NameInRealFilter,
                origin: *origin,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::rf::BlockEntry;
    use crate::lang::Visibility;
    use crate::lexemes::LexemeTable;
    use crate::parser::parse_real_filter;

    fn parse(source: &str) -> rf::Filter {
        let mut lexemes = LexemeTable::new();
        parse_real_filter(source, &mut lexemes).expect("parse failed")
    }

    #[test]
    fn blocks_split_on_visibility_keywords() {
        let filter = parse(
            "Show\n\tQuality > 10\n\tSetFontSize 45\n\
             Hide\n\tClass \"Boots\"\n",
        );
        assert_eq!(filter.blocks.len(), 2);
        assert_eq!(filter.blocks[0].visibility, Visibility::Show);
        assert_eq!(filter.blocks[0].entries.len(), 2);
        assert_eq!(filter.blocks[1].visibility, Visibility::Hide);
    }

    #[test]
    fn entries_keep_source_order() {
        let filter = parse("Show\n\tSetFontSize 45\n\tQuality > 10\n");
        assert!(matches!(filter.blocks[0].entries[0], BlockEntry::Action(_)));
        assert!(matches!(
            filter.blocks[0].entries[1],
            BlockEntry::Condition(_)
        ));
    }

    #[test]
    fn name_references_are_rejected() {
        let mut lexemes = LexemeTable::new();
        let failure =
            parse_real_filter("Show\n\tSetFontSize $size\n", &mut lexemes).unwrap_err();
        assert!(matches!(
            failure.errors[0].kind,
            ParseErrorKind::NameInRealFilter
        ));
    }

    #[test]
    fn nested_braces_are_rejected() {
        let mut lexemes = LexemeTable::new();
        let failure =
            parse_real_filter("Show\n\tQuality > 0 { Hide }\n", &mut lexemes).unwrap_err();
        assert!(matches!(
            failure.errors[0].kind,
            ParseErrorKind::NestingInRealFilter
        ));
    }

    #[test]
    fn errors_resynchronize_at_next_block() {
        let mut lexemes = LexemeTable::new();
        let failure = parse_real_filter(
            "Show\n\tClass < \"x\"\nHide\n\tSetFontSize $a\n",
            &mut lexemes,
        )
        .unwrap_err();
        assert_eq!(failure.errors.len(), 2);
    }

    #[test]
    fn discard_visibility_is_not_accepted() {
        let mut lexemes = LexemeTable::new();
        let failure = parse_real_filter("ShowDiscard\n", &mut lexemes).unwrap_err();
        assert!(!failure.errors.is_empty());
    }
}
