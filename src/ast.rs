//! Position-tagged abstract syntax trees for both input grammars.
//!
//! `sf` nodes describe spirit filter templates (constants, nesting,
//! compound actions, autogeneration); `rf` nodes describe filters
//! already in the game client's native flat format. Both share literal
//! and condition shapes. Every node records the byte range it was
//! parsed from.

use crate::lang::types::{ActionProperty, ComparisonOp, ConditionProperty};
use crate::lang::{GemQualityType, Influence, Rarity, Shape, ShaperVoiceLine, Suit, Visibility};
use crate::token::Span;

// ============================================================================
// Shared literal and sequence nodes
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Integer(i32),
    Fractional(f64),
    String(String),
    Boolean(bool),
    None,
    Temp,
    Rarity(Rarity),
    Shape(Shape),
    Suit(Suit),
    Influence(Influence),
    ShaperVoiceLine(ShaperVoiceLine),
    GemQualityType(GemQualityType),
    /// Raw socket literal; letters are validated at evaluation.
    SocketSpec { count: Option<i32>, letters: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub origin: Span,
}

/// One element of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveExpr {
    /// `$name` reference, spirit filters only.
    NameRef { name: String, origin: Span },
    Literal(LiteralExpr),
    /// A token the lexer could not classify; reported during evaluation.
    Unknown { origin: Span },
}

impl PrimitiveExpr {
    pub fn origin(&self) -> Span {
        match self {
            PrimitiveExpr::NameRef { origin, .. } => *origin,
            PrimitiveExpr::Literal(literal) => literal.origin,
            PrimitiveExpr::Unknown { origin } => *origin,
        }
    }
}

/// Non-empty flat list of primitives; the whole span covers every
/// element.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub elements: Vec<PrimitiveExpr>,
    pub origin: Span,
}

// ============================================================================
// Conditions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `PROPERTY OP? sequence` for every official condition property.
    Property {
        property: ConditionProperty,
        comparison: ComparisonOp,
        /// Span of the operator when one was written.
        comparison_origin: Option<Span>,
        value: Sequence,
        origin: Span,
    },
    /// `Autogen CATEGORY`, spirit filters only.
    Autogen {
        category_name: String,
        category_origin: Span,
        origin: Span,
    },
    /// `Price OP VALUE`, spirit filters only.
    Price {
        comparison: ComparisonOp,
        value: Sequence,
        origin: Span,
    },
}

impl Condition {
    pub fn origin(&self) -> Span {
        match self {
            Condition::Property { origin, .. } => *origin,
            Condition::Autogen { origin, .. } => *origin,
            Condition::Price { origin, .. } => *origin,
        }
    }
}

// ============================================================================
// Spirit filter nodes
// ============================================================================

pub mod sf {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum ActionStmt {
        /// `ACTION_KEYWORD sequence`. Drop-sound switches have an empty
        /// sequence.
        Apply {
            action: ActionProperty,
            value: Option<Sequence>,
            origin: Span,
        },
        /// `Set $name`: splice a stored compound action.
        SetRef { name: String, origin: Span },
    }

    impl ActionStmt {
        pub fn origin(&self) -> Span {
            match self {
                ActionStmt::Apply { origin, .. } => *origin,
                ActionStmt::SetRef { origin, .. } => *origin,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum Statement {
        Action(ActionStmt),
        Visibility {
            visibility: Visibility,
            origin: Span,
        },
        Block(RuleBlock),
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RuleBlock {
        pub conditions: Vec<Condition>,
        pub statements: Vec<Statement>,
        pub origin: Span,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum DefinitionValue {
        Sequence(Sequence),
        /// `$x = { action* }`.
        CompoundAction {
            actions: Vec<ActionStmt>,
            origin: Span,
        },
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Definition {
        pub name: String,
        pub name_origin: Span,
        pub value: DefinitionValue,
        pub origin: Span,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VersionRequirement {
        pub major: i32,
        pub minor: i32,
        pub patch: i32,
        pub origin: Span,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ConfigParam {
        pub name: String,
        pub enabled: bool,
        pub child_params: Vec<ConfigParam>,
        pub origin: Span,
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Config {
        pub params: Vec<ConfigParam>,
    }

    /// A whole spirit filter template.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Filter {
        pub version: Option<VersionRequirement>,
        pub config: Config,
        pub definitions: Vec<Definition>,
        pub statements: Vec<Statement>,
    }
}

// ============================================================================
// Real filter nodes
// ============================================================================

pub mod rf {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Action {
        pub action: ActionProperty,
        pub value: Option<Sequence>,
        pub origin: Span,
    }

    /// Conditions and actions keep their source order within a block.
    #[derive(Debug, Clone, PartialEq)]
    pub enum BlockEntry {
        Condition(Condition),
        Action(Action),
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Block {
        pub visibility: Visibility,
        pub visibility_origin: Span,
        pub entries: Vec<BlockEntry>,
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Filter {
        pub blocks: Vec<Block>,
    }
}
