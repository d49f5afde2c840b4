use crate::ast::sf;
use crate::ast::Condition;
use crate::lang::types::ComparisonOp;
use crate::token::TokenKind;

use super::{ParseError, ParseFailure, ParseResult, Parser};

/// Spirit filter grammar: preamble, constant definitions, then nested
/// rule statements.
pub trait SpiritFilterParsing {
    fn parse_spirit_filter(&mut self) -> Result<sf::Filter, ParseFailure>;
}

impl SpiritFilterParsing for Parser<'_> {
    fn parse_spirit_filter(&mut self) -> Result<sf::Filter, ParseFailure> {
        let mut filter = sf::Filter::default();
        match parse_filter(self, &mut filter) {
            Ok(()) => Ok(filter),
            Err(error) => Err(self.failure(error)),
        }
    }
}

fn parse_filter(p: &mut Parser<'_>, filter: &mut sf::Filter) -> ParseResult<()> {
    if matches!(p.peek_kind(), TokenKind::VersionKw) {
        filter.version = Some(parse_version(p)?);
    }
    if matches!(p.peek_kind(), TokenKind::ConfigKw) {
        filter.config = parse_config(p)?;
    }

    while matches!(p.peek_kind(), TokenKind::Dollar) {
        filter.definitions.push(parse_definition(p)?);
    }

    while !p.at_eof() {
        filter.statements.push(parse_statement(p)?);
    }

    Ok(())
}

fn parse_version(p: &mut Parser<'_>) -> ParseResult<sf::VersionRequirement> {
    let keyword_span = p.advance().span;
    p.expect_colon()?;
    match *p.peek_kind() {
        TokenKind::VersionLiteral {
            major,
            minor,
            patch,
        } => {
            let literal_span = p.advance().span;
            Ok(sf::VersionRequirement {
                major,
                minor,
                patch,
                origin: keyword_span.merge(literal_span),
            })
        }
        _ => Err(p.error("version literal (e.g. 1.2.3)")),
    }
}

fn parse_config(p: &mut Parser<'_>) -> ParseResult<sf::Config> {
    p.advance();
    p.expect_colon()?;
    p.expect_lbrace()?;
    let params = parse_config_params(p)?;
    p.expect_rbrace()?;
    Ok(sf::Config { params })
}

fn parse_config_params(p: &mut Parser<'_>) -> ParseResult<Vec<sf::ConfigParam>> {
    let mut params = Vec::new();
    while matches!(p.peek_kind(), TokenKind::Ident(_)) {
        let (name, name_span) = p.expect_ident("config parameter name")?;
        p.expect_colon()?;
        let enabled = match p.peek_kind() {
            TokenKind::Yes => {
                p.advance();
                true
            }
            TokenKind::No => {
                p.advance();
                false
            }
            _ => return Err(p.error("'yes' or 'no'")),
        };
        let child_params = if matches!(p.peek_kind(), TokenKind::LBrace) {
            p.advance();
            let children = parse_config_params(p)?;
            p.expect_rbrace()?;
            children
        } else {
            Vec::new()
        };
        params.push(sf::ConfigParam {
            name,
            enabled,
            child_params,
            origin: name_span,
        });
    }
    Ok(params)
}

fn parse_definition(p: &mut Parser<'_>) -> ParseResult<sf::Definition> {
    let (name, name_origin) = p.expect_name_reference()?;

    match p.peek_kind() {
        TokenKind::Cmp(ComparisonOp::Equal) => {
            p.advance();
        }
        _ => return Err(p.error("'='")),
    }

    let value = if matches!(p.peek_kind(), TokenKind::LBrace) {
        let open = p.advance().span;
        let mut actions = Vec::new();
        while !matches!(p.peek_kind(), TokenKind::RBrace) {
            if p.at_eof() {
                return Err(p.error("'}'"));
            }
            actions.push(parse_action_stmt(p)?);
        }
        let close = p.expect_rbrace()?;
        sf::DefinitionValue::CompoundAction {
            actions,
            origin: open.merge(close),
        }
    } else {
        sf::DefinitionValue::Sequence(p.parse_sequence()?)
    };

    let value_origin = match &value {
        sf::DefinitionValue::Sequence(sequence) => sequence.origin,
        sf::DefinitionValue::CompoundAction { origin, .. } => *origin,
    };

    Ok(sf::Definition {
        name,
        name_origin,
        value,
        origin: name_origin.merge(value_origin),
    })
}

fn parse_statement(p: &mut Parser<'_>) -> ParseResult<sf::Statement> {
    match p.peek_kind() {
        TokenKind::Visibility(visibility) => {
            let visibility = *visibility;
            let origin = p.advance().span;
            Ok(sf::Statement::Visibility { visibility, origin })
        }
        TokenKind::Action(_) | TokenKind::Set => Ok(sf::Statement::Action(parse_action_stmt(p)?)),
        TokenKind::Condition(_) | TokenKind::Autogen | TokenKind::Price => {
            Ok(sf::Statement::Block(parse_rule_block(p)?))
        }
        _ => Err(p.error("a statement")),
    }
}

fn parse_action_stmt(p: &mut Parser<'_>) -> ParseResult<sf::ActionStmt> {
    match p.peek_kind() {
        TokenKind::Set => {
            let keyword_span = p.advance().span;
            let (name, name_span) = p.expect_name_reference()?;
            Ok(sf::ActionStmt::SetRef {
                name,
                origin: keyword_span.merge(name_span),
            })
        }
        TokenKind::Action(action) => {
            let action = *action;
            let keyword_span = p.advance().span;
            let value = p.parse_optional_sequence()?;

            if value.is_none() && !action.is_drop_sound_switch() {
                return Err(ParseError {
                    kind: super::ParseErrorKind::EmptySequence,
                    origin: p.span(),
                });
            }

            let origin = match &value {
                Some(sequence) => keyword_span.merge(sequence.origin),
                None => keyword_span,
            };
            Ok(sf::ActionStmt::Apply {
                action,
                value,
                origin,
            })
        }
        _ => Err(p.error("an action")),
    }
}

fn parse_condition(p: &mut Parser<'_>) -> ParseResult<Condition> {
    match p.peek_kind() {
        TokenKind::Condition(property) => {
            let property = *property;
            p.parse_property_condition(property)
        }
        TokenKind::Autogen => p.parse_autogen_condition(),
        TokenKind::Price => p.parse_price_condition(),
        _ => Err(p.error("a condition")),
    }
}

fn parse_rule_block(p: &mut Parser<'_>) -> ParseResult<sf::RuleBlock> {
    let start = p.span();
    let mut conditions = vec![parse_condition(p)?];

    loop {
        match p.peek_kind() {
            TokenKind::AndAnd => {
                p.advance();
                conditions.push(parse_condition(p)?);
            }
            TokenKind::Condition(_) | TokenKind::Autogen | TokenKind::Price => {
                conditions.push(parse_condition(p)?);
            }
            _ => break,
        }
    }

    p.expect_lbrace()?;
    let mut statements = Vec::new();
    while !matches!(p.peek_kind(), TokenKind::RBrace) {
        if p.at_eof() {
            return Err(p.error("'}'"));
        }
        statements.push(parse_statement(p)?);
    }
    let close = p.expect_rbrace()?;

    Ok(sf::RuleBlock {
        conditions,
        statements,
        origin: start.merge(close),
    })
}
