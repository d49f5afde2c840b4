mod rf;
mod sf;

pub use rf::RealFilterParsing;
pub use sf::SpiritFilterParsing;

use std::fmt;

use crate::ast;
use crate::ast::{Condition, LiteralExpr, LiteralKind, PrimitiveExpr, Sequence};
use crate::lang::types::{ComparisonOp, ConditionProperty};
use crate::lexemes::LexemeTable;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },
    EmptySequence,
    /// Comparison operator written where the property admits none, or
    /// the wrong one.
    OperatorNotAllowed {
        property: &'static str,
        operator: &'static str,
    },
    NameInRealFilter,
    NestingInRealFilter,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {} but found {}", expected, found)
            }
            ParseErrorKind::EmptySequence => {
                write!(f, "expected at least one value")
            }
            ParseErrorKind::OperatorNotAllowed { property, operator } => {
                write!(f, "operator '{}' is not allowed for {}", operator, property)
            }
            ParseErrorKind::NameInRealFilter => {
                write!(f, "name references are not allowed in real filters")
            }
            ParseErrorKind::NestingInRealFilter => {
                write!(f, "nested blocks are not allowed in real filters")
            }
        }
    }
}

/// Returned when parsing cannot continue. Errors carry spans so the
/// front end can still print line-accurate messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    pub errors: Vec<ParseError>,
    pub stop_position: Span,
}

/// Parse a spirit filter template into its AST.
pub fn parse_spirit_filter(
    source: &str,
    lexemes: &mut LexemeTable,
) -> Result<ast::sf::Filter, ParseFailure> {
    let tokens = Lexer::new(source, lexemes).tokenize();
    let mut parser = Parser::new(tokens, lexemes);
    parser.parse_spirit_filter()
}

/// Parse a filter already in the game client's native format.
pub fn parse_real_filter(
    source: &str,
    lexemes: &mut LexemeTable,
) -> Result<ast::rf::Filter, ParseFailure> {
    let tokens = Lexer::new(source, lexemes).tokenize();
    let mut parser = Parser::new(tokens, lexemes);
    parser.parse_real_filter()
}

/// Recursive descent parser over a token buffer. Grammar-specific
/// productions live in the [`SpiritFilterParsing`] and
/// [`RealFilterParsing`] traits.
pub struct Parser<'lex> {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    pub(super) lexemes: &'lex LexemeTable,
}

impl<'lex> Parser<'lex> {
    pub fn new(tokens: Vec<Token>, lexemes: &'lex LexemeTable) -> Self {
        Parser {
            tokens,
            current: 0,
            lexemes,
        }
    }

    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(super) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(super) fn span(&self) -> Span {
        self.peek().span
    }

    pub(super) fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(super) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        token
    }

    pub(super) fn error(&self, expected: &'static str) -> ParseError {
        ParseError {
            kind: ParseErrorKind::UnexpectedToken {
                expected,
                found: self.peek_kind().describe(),
            },
            origin: self.span(),
        }
    }

    pub(super) fn failure(&self, error: ParseError) -> ParseFailure {
        ParseFailure {
            stop_position: error.origin,
            errors: vec![error],
        }
    }

    pub(super) fn expect_lbrace(&mut self) -> ParseResult<Span> {
        match self.peek_kind() {
            TokenKind::LBrace => Ok(self.advance().span),
            _ => Err(self.error("'{'")),
        }
    }

    pub(super) fn expect_rbrace(&mut self) -> ParseResult<Span> {
        match self.peek_kind() {
            TokenKind::RBrace => Ok(self.advance().span),
            _ => Err(self.error("'}'")),
        }
    }

    pub(super) fn expect_colon(&mut self) -> ParseResult<Span> {
        match self.peek_kind() {
            TokenKind::Colon => Ok(self.advance().span),
            _ => Err(self.error("':'")),
        }
    }

    pub(super) fn expect_ident(&mut self, expected: &'static str) -> ParseResult<(String, Span)> {
        match self.peek_kind() {
            TokenKind::Ident(symbol) => {
                let name = self.lexemes.get(*symbol).to_string();
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => Err(self.error(expected)),
        }
    }

    /// `$name`; the returned span covers the dollar and the identifier.
    pub(super) fn expect_name_reference(&mut self) -> ParseResult<(String, Span)> {
        let dollar = match self.peek_kind() {
            TokenKind::Dollar => self.advance().span,
            _ => return Err(self.error("'$'")),
        };
        let (name, name_span) = self.expect_ident("name after '$'")?;
        Ok((name, dollar.merge(name_span)))
    }

    // ------------------------------------------------------------------
    // Sequences
    // ------------------------------------------------------------------

    fn primitive_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Ident(_)
                | TokenKind::Str(_)
                | TokenKind::Int(_)
                | TokenKind::Frac(_)
                | TokenKind::SocketLiteral { .. }
                | TokenKind::True
                | TokenKind::False
                | TokenKind::NoneLit
                | TokenKind::TempLit
                | TokenKind::RarityLit(_)
                | TokenKind::ShapeLit(_)
                | TokenKind::SuitLit(_)
                | TokenKind::InfluenceLit(_)
                | TokenKind::ShaperVoiceLit(_)
                | TokenKind::GemQualityLit(_)
                | TokenKind::Unknown(_)
                | TokenKind::Dollar
        )
    }

    fn parse_primitive(&mut self) -> ParseResult<PrimitiveExpr> {
        let token = self.peek().clone();
        let origin = token.span;

        let literal = |kind| PrimitiveExpr::Literal(LiteralExpr { kind, origin });

        let expr = match token.kind {
            TokenKind::Dollar => {
                let (name, span) = self.expect_name_reference()?;
                return Ok(PrimitiveExpr::NameRef { name, origin: span });
            }
            TokenKind::Ident(symbol) => {
                // a bare word of socket letters is a socket spec literal;
                // anything else is unknown until evaluation rejects it
                let word = self.lexemes.get(symbol);
                if !word.is_empty() && word.bytes().all(|b| b"RGBWAD".contains(&b)) {
                    literal(LiteralKind::SocketSpec {
                        count: None,
                        letters: word.to_string(),
                    })
                } else {
                    PrimitiveExpr::Unknown { origin }
                }
            }
            TokenKind::Str(symbol) => literal(LiteralKind::String(
                self.lexemes.get(symbol).to_string(),
            )),
            TokenKind::Int(value) => literal(LiteralKind::Integer(value)),
            TokenKind::Frac(value) => literal(LiteralKind::Fractional(value)),
            TokenKind::SocketLiteral { count, letters } => literal(LiteralKind::SocketSpec {
                count: Some(count),
                letters: self.lexemes.get(letters).to_string(),
            }),
            TokenKind::True => literal(LiteralKind::Boolean(true)),
            TokenKind::False => literal(LiteralKind::Boolean(false)),
            TokenKind::NoneLit => literal(LiteralKind::None),
            TokenKind::TempLit => literal(LiteralKind::Temp),
            TokenKind::RarityLit(value) => literal(LiteralKind::Rarity(value)),
            TokenKind::ShapeLit(value) => literal(LiteralKind::Shape(value)),
            TokenKind::SuitLit(value) => literal(LiteralKind::Suit(value)),
            TokenKind::InfluenceLit(value) => literal(LiteralKind::Influence(value)),
            TokenKind::ShaperVoiceLit(value) => literal(LiteralKind::ShaperVoiceLine(value)),
            TokenKind::GemQualityLit(value) => literal(LiteralKind::GemQualityType(value)),
            TokenKind::Unknown(_) => PrimitiveExpr::Unknown { origin },
            _ => return Err(self.error("a value")),
        };

        self.advance();
        Ok(expr)
    }

    /// Parse `primitive+`. Never returns an empty sequence.
    pub(super) fn parse_sequence(&mut self) -> ParseResult<Sequence> {
        if !self.primitive_start() {
            return Err(ParseError {
                kind: ParseErrorKind::EmptySequence,
                origin: self.span(),
            });
        }

        let mut elements = Vec::new();
        let mut origin = self.span();
        while self.primitive_start() {
            let element = self.parse_primitive()?;
            origin = origin.merge(element.origin());
            elements.push(element);
        }

        Ok(Sequence { elements, origin })
    }

    /// Optional sequence: present only when a primitive follows.
    pub(super) fn parse_optional_sequence(&mut self) -> ParseResult<Option<Sequence>> {
        if self.primitive_start() {
            Ok(Some(self.parse_sequence()?))
        } else {
            Ok(None)
        }
    }

    // ------------------------------------------------------------------
    // Conditions
    // ------------------------------------------------------------------

    /// Parse `PROPERTY OP? sequence`, validating the operator against
    /// what the property's grammar admits.
    pub(super) fn parse_property_condition(
        &mut self,
        property: ConditionProperty,
    ) -> ParseResult<Condition> {
        let keyword_span = self.advance().span;

        let (comparison, comparison_origin) = match self.peek_kind() {
            TokenKind::Cmp(op) => {
                let op = *op;
                let span = self.advance().span;
                (op, Some(span))
            }
            _ => (ComparisonOp::Equal, None),
        };

        if let Some(op_span) = comparison_origin {
            if !operator_allowed(property, comparison) {
                return Err(ParseError {
                    kind: ParseErrorKind::OperatorNotAllowed {
                        property: property.as_keyword(),
                        operator: comparison.as_str(),
                    },
                    origin: op_span,
                });
            }
        }

        let value = self.parse_sequence()?;
        let origin = keyword_span.merge(value.origin);

        Ok(Condition::Property {
            property,
            comparison,
            comparison_origin,
            value,
            origin,
        })
    }

    pub(super) fn parse_price_condition(&mut self) -> ParseResult<Condition> {
        let keyword_span = self.advance().span;
        let comparison = match self.peek_kind() {
            TokenKind::Cmp(op) => {
                let op = *op;
                self.advance();
                op
            }
            _ => ComparisonOp::Equal,
        };
        let value = self.parse_sequence()?;
        let origin = keyword_span.merge(value.origin);
        Ok(Condition::Price {
            comparison,
            value,
            origin,
        })
    }

    pub(super) fn parse_autogen_condition(&mut self) -> ParseResult<Condition> {
        let keyword_span = self.advance().span;
        let (category_name, category_origin) = self.expect_ident("autogen category name")?;
        Ok(Condition::Autogen {
            category_name,
            category_origin,
            origin: keyword_span.merge(category_origin),
        })
    }
}

fn operator_allowed(property: ConditionProperty, comparison: ComparisonOp) -> bool {
    use crate::lang::types::ComparisonOp::*;

    if property.is_numeric_range() || property == ConditionProperty::Rarity {
        return !matches!(comparison, NotEqual);
    }
    if property.is_string_list() {
        return matches!(comparison, Equal | ExactMatch);
    }
    if property.is_ranged_string_list() {
        return !matches!(comparison, NotEqual);
    }
    if property.is_socket_spec() {
        return !matches!(comparison, NotEqual);
    }
    if property == ConditionProperty::HasInfluence {
        return matches!(comparison, Equal | ExactMatch);
    }
    // booleans and gem quality types take no operator
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::sf::Statement;

    fn parse_sf(source: &str) -> ast::sf::Filter {
        let mut lexemes = LexemeTable::new();
        parse_spirit_filter(source, &mut lexemes).expect("parse failed")
    }

    fn parse_sf_err(source: &str) -> ParseFailure {
        let mut lexemes = LexemeTable::new();
        parse_spirit_filter(source, &mut lexemes).expect_err("parse unexpectedly succeeded")
    }

    #[test]
    fn empty_input_parses_to_empty_filter() {
        let filter = parse_sf("# nothing but comments\n");
        assert!(filter.definitions.is_empty());
        assert!(filter.statements.is_empty());
    }

    #[test]
    fn definition_binds_name_to_sequence() {
        let filter = parse_sf("$color = 255 0 0\n");
        assert_eq!(filter.definitions.len(), 1);
        let definition = &filter.definitions[0];
        assert_eq!(definition.name, "color");
        match &definition.value {
            ast::sf::DefinitionValue::Sequence(sequence) => {
                assert_eq!(sequence.elements.len(), 3);
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn compound_action_definition_holds_actions() {
        let filter = parse_sf("$loud = { SetFontSize 45 PlayAlertSound 1 }\n");
        match &filter.definitions[0].value {
            ast::sf::DefinitionValue::CompoundAction { actions, .. } => {
                assert_eq!(actions.len(), 2);
            }
            other => panic!("expected compound action, got {:?}", other),
        }
    }

    #[test]
    fn nested_blocks_parse_recursively() {
        let filter = parse_sf(
            "Class \"Boots\" {\n\
             \tQuality > 10 { Show }\n\
             \tHide\n\
             }\n",
        );
        assert_eq!(filter.statements.len(), 1);
        match &filter.statements[0] {
            Statement::Block(block) => {
                assert_eq!(block.conditions.len(), 1);
                assert_eq!(block.statements.len(), 2);
                assert!(matches!(block.statements[0], Statement::Block(_)));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn conditions_may_be_joined_by_and_and() {
        let juxtaposed = parse_sf("Price < 100 Price >= 10 { Show }");
        let joined = parse_sf("Price < 100 && Price >= 10 { Show }");
        match (&juxtaposed.statements[0], &joined.statements[0]) {
            (Statement::Block(a), Statement::Block(b)) => {
                assert_eq!(a.conditions.len(), 2);
                assert_eq!(b.conditions.len(), 2);
            }
            other => panic!("expected blocks, got {:?}", other),
        }
    }

    #[test]
    fn unknown_word_in_value_position_is_deferred() {
        let filter = parse_sf("$x = bogus\n");
        match &filter.definitions[0].value {
            ast::sf::DefinitionValue::Sequence(sequence) => {
                assert!(matches!(sequence.elements[0], PrimitiveExpr::Unknown { .. }));
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn bare_socket_letters_parse_as_socket_literal() {
        let filter = parse_sf("Sockets >= RR { Show }");
        match &filter.statements[0] {
            Statement::Block(block) => match &block.conditions[0] {
                Condition::Property { value, .. } => match &value.elements[0] {
                    PrimitiveExpr::Literal(LiteralExpr {
                        kind: LiteralKind::SocketSpec { count, letters },
                        ..
                    }) => {
                        assert_eq!(*count, None);
                        assert_eq!(letters, "RR");
                    }
                    other => panic!("expected socket literal, got {:?}", other),
                },
                other => panic!("expected property condition, got {:?}", other),
            },
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn string_condition_rejects_ordering_operator() {
        let failure = parse_sf_err("Class < \"Boots\" { Show }");
        assert!(matches!(
            failure.errors[0].kind,
            ParseErrorKind::OperatorNotAllowed { .. }
        ));
    }

    #[test]
    fn empty_sequence_is_a_parse_error() {
        let failure = parse_sf_err("SetFontSize\nShow\n");
        assert!(matches!(
            failure.errors[0].kind,
            ParseErrorKind::EmptySequence
        ));
    }

    #[test]
    fn version_and_config_preamble_parse() {
        let filter = parse_sf(
            "version: 1.2.3\n\
             config: { opt: yes nested: no { inner: yes } }\n\
             Show\n",
        );
        let version = filter.version.expect("version missing");
        assert_eq!((version.major, version.minor, version.patch), (1, 2, 3));
        assert_eq!(filter.config.params.len(), 2);
        assert_eq!(filter.config.params[1].child_params.len(), 1);
    }

    #[test]
    fn every_node_span_is_inside_the_input() {
        let source = "$x = 1 2\nClass \"Boots\" { Quality > 0 { Show } }\n";
        let filter = parse_sf(source);
        fn check_statement(statement: &Statement, len: usize) {
            match statement {
                Statement::Block(block) => {
                    assert!(block.origin.end <= len);
                    for condition in &block.conditions {
                        assert!(condition.origin().end <= len);
                    }
                    for inner in &block.statements {
                        check_statement(inner, len);
                    }
                }
                Statement::Visibility { origin, .. } => assert!(origin.end <= len),
                Statement::Action(action) => assert!(action.origin().end <= len),
            }
        }
        for definition in &filter.definitions {
            assert!(definition.origin.end <= source.len());
        }
        for statement in &filter.statements {
            check_statement(statement, source.len());
        }
    }
}
