//! Evaluation of value expressions into typed objects, plus the
//! `get_as_*` helpers that perform one-step promotions at use sites.

use crate::ast::{LiteralExpr, LiteralKind, PrimitiveExpr, Sequence};
use crate::diagnostics::{DiagnosticId, DiagnosticsStore};
use crate::lang::types::{
    GemQualityType, Influence, Object, ObjectKind, PrimitiveValue, Rarity, Shape, SingleObject,
    SocketSpec, Suit,
};
use crate::lang::{keywords, limits};
use crate::token::Span;

use super::{Settings, SymbolTable};

pub fn push_type_mismatch(
    diagnostics: &mut DiagnosticsStore,
    expected: ObjectKind,
    actual: ObjectKind,
    origin: Span,
) {
    diagnostics.push_error(
        DiagnosticId::TypeMismatch,
        origin,
        format!(
            "type mismatch in expression, expected expression of type '{}' but got '{}'",
            expected.as_str(),
            actual.as_str()
        ),
    );
}

pub fn push_invalid_integer_value(
    diagnostics: &mut DiagnosticsStore,
    min: i32,
    max: i32,
    actual: i32,
    origin: Span,
) {
    diagnostics.push_error(
        DiagnosticId::InvalidIntegerValue,
        origin,
        format!(
            "invalid integer value, expected value in range {} - {} but got {}",
            min, max, actual
        ),
    );
}

fn evaluate_socket_spec_literal(
    count: Option<i32>,
    letters: &str,
    origin: Span,
    diagnostics: &mut DiagnosticsStore,
) -> Option<SocketSpec> {
    let mut spec = SocketSpec {
        count,
        ..SocketSpec::default()
    };

    if let Some(count) = count {
        if !(limits::MIN_ITEM_SOCKETS..=limits::MAX_ITEM_SOCKETS).contains(&count) {
            push_invalid_integer_value(
                diagnostics,
                limits::MIN_ITEM_SOCKETS,
                limits::MAX_ITEM_SOCKETS,
                count,
                origin,
            );
            return None;
        }
    }

    if letters.is_empty() && count.is_none() {
        diagnostics.push_error(
            DiagnosticId::EmptySocketSpec,
            origin,
            "socket group can not be empty",
        );
        return None;
    }

    let mut ok = true;
    for (index, c) in letters.chars().enumerate() {
        match c {
            keywords::R => spec.r += 1,
            keywords::G => spec.g += 1,
            keywords::B => spec.b += 1,
            keywords::W => spec.w += 1,
            keywords::A => spec.a += 1,
            keywords::D => spec.d += 1,
            _ => {
                diagnostics.push_error(
                    DiagnosticId::IllegalCharacterInSocketSpec,
                    origin,
                    format!(
                        "illegal character in socket group at position {} (only R/G/B/W/A/D characters are allowed)",
                        index
                    ),
                );
                ok = false;
            }
        }
    }

    if !ok || !spec.is_valid() {
        if ok {
            diagnostics.push_error(DiagnosticId::InvalidSocketSpec, origin, "invalid socket group");
        }
        return None;
    }

    Some(spec)
}

fn evaluate_literal(
    literal: &LiteralExpr,
    diagnostics: &mut DiagnosticsStore,
) -> Option<SingleObject> {
    let origin = literal.origin;
    let value = match &literal.kind {
        LiteralKind::Integer(value) => PrimitiveValue::Integer(*value),
        LiteralKind::Fractional(value) => PrimitiveValue::Fractional(*value),
        LiteralKind::String(value) => PrimitiveValue::String(value.clone()),
        LiteralKind::Boolean(value) => PrimitiveValue::Boolean(*value),
        LiteralKind::None => PrimitiveValue::None,
        LiteralKind::Temp => PrimitiveValue::Temp,
        LiteralKind::Rarity(value) => PrimitiveValue::Rarity(*value),
        LiteralKind::Shape(value) => PrimitiveValue::Shape(*value),
        LiteralKind::Suit(value) => PrimitiveValue::Suit(*value),
        LiteralKind::Influence(value) => PrimitiveValue::Influence(*value),
        LiteralKind::ShaperVoiceLine(value) => PrimitiveValue::ShaperVoiceLine(*value),
        LiteralKind::GemQualityType(value) => PrimitiveValue::GemQualityType(*value),
        LiteralKind::SocketSpec { count, letters } => {
            let spec = evaluate_socket_spec_literal(*count, letters, origin, diagnostics)?;
            PrimitiveValue::SocketSpec(spec)
        }
    };
    Some(SingleObject { value, origin })
}

fn evaluate_name(
    name: &str,
    origin: Span,
    symbols: &SymbolTable,
    diagnostics: &mut DiagnosticsStore,
) -> Option<Object> {
    match symbols.objects.get(name) {
        Some(named) => {
            // the reference site is a better origin for diagnostics than
            // the definition, which may sit many assignments upwards
            Some(Object {
                values: named.object.values.clone(),
                origin,
            })
        }
        None => {
            if symbols.trees.contains_key(name) {
                diagnostics.push_error(
                    DiagnosticId::TypeMismatch,
                    origin,
                    "type mismatch in expression, expected primitive language type but got compound action",
                );
                diagnostics.push_note(
                    DiagnosticId::TypeMismatch,
                    None,
                    format!("if you want to apply a stored action set write \"Set ${}\"", name),
                );
            } else {
                diagnostics.push_error(DiagnosticId::NoSuchName, origin, "no such name exists");
            }
            None
        }
    }
}

/// Evaluate a sequence element-wise under the symbol table. Referenced
/// sequences flatten into the parent; the parent's origin covers the
/// whole source span. Returns nothing when the arity check fails.
pub fn evaluate_sequence(
    sequence: &Sequence,
    symbols: &SymbolTable,
    min_allowed: usize,
    max_allowed: Option<usize>,
    settings: Settings,
    diagnostics: &mut DiagnosticsStore,
) -> Option<Object> {
    let mut values = Vec::with_capacity(sequence.elements.len());
    for element in &sequence.elements {
        let result = match element {
            PrimitiveExpr::NameRef { name, origin } => {
                evaluate_name(name, *origin, symbols, diagnostics)
            }
            PrimitiveExpr::Literal(literal) => {
                evaluate_literal(literal, diagnostics).map(|single| Object {
                    origin: single.origin,
                    values: vec![single],
                })
            }
            PrimitiveExpr::Unknown { origin } => {
                diagnostics.push_error(DiagnosticId::UnknownExpression, *origin, "unknown expression");
                None
            }
        };

        match result {
            Some(object) => values.extend(object.values),
            None if settings.stop_on_error => return None,
            None => {}
        }
    }

    if values.len() < min_allowed || max_allowed.is_some_and(|max| values.len() > max) {
        let expected = match max_allowed {
            Some(max) if max == min_allowed => format!("{}", min_allowed),
            Some(max) => format!("from {} to {}", min_allowed, max),
            None => format!("at least {}", min_allowed),
        };
        diagnostics.push_error(
            DiagnosticId::InvalidAmountOfArguments,
            sequence.origin,
            format!(
                "invalid amount of arguments, expected {} but got {}",
                expected,
                values.len()
            ),
        );
        return None;
    }

    Some(Object {
        values,
        origin: sequence.origin,
    })
}

// ============================================================================
// get_as helpers: exact kind or a single promotion step
// ============================================================================

pub fn get_as_integer(object: &SingleObject, diagnostics: &mut DiagnosticsStore) -> Option<i32> {
    match &object.value {
        PrimitiveValue::Integer(value) => Some(*value),
        other => {
            push_type_mismatch(diagnostics, ObjectKind::Integer, other.kind(), object.origin);
            None
        }
    }
}

pub fn get_as_integer_in_range(
    object: &SingleObject,
    min: i32,
    max: i32,
    diagnostics: &mut DiagnosticsStore,
) -> Option<i32> {
    let value = get_as_integer(object, diagnostics)?;
    if !(min..=max).contains(&value) {
        push_invalid_integer_value(diagnostics, min, max, value, object.origin);
        return None;
    }
    Some(value)
}

/// Integer promotes to fractional.
pub fn get_as_fractional(object: &SingleObject, diagnostics: &mut DiagnosticsStore) -> Option<f64> {
    match &object.value {
        PrimitiveValue::Fractional(value) => Some(*value),
        PrimitiveValue::Integer(value) => Some(f64::from(*value)),
        other => {
            push_type_mismatch(
                diagnostics,
                ObjectKind::Fractional,
                other.kind(),
                object.origin,
            );
            None
        }
    }
}

/// Integer promotes to a count-only socket spec.
pub fn get_as_socket_spec(
    object: &SingleObject,
    diagnostics: &mut DiagnosticsStore,
) -> Option<SocketSpec> {
    match &object.value {
        PrimitiveValue::SocketSpec(spec) => Some(*spec),
        PrimitiveValue::Integer(value) => {
            if !(limits::MIN_ITEM_SOCKETS..=limits::MAX_ITEM_SOCKETS).contains(value) {
                push_invalid_integer_value(
                    diagnostics,
                    limits::MIN_ITEM_SOCKETS,
                    limits::MAX_ITEM_SOCKETS,
                    *value,
                    object.origin,
                );
                return None;
            }
            Some(SocketSpec {
                count: Some(*value),
                ..SocketSpec::default()
            })
        }
        other => {
            push_type_mismatch(
                diagnostics,
                ObjectKind::SocketSpec,
                other.kind(),
                object.origin,
            );
            None
        }
    }
}

pub fn get_as_boolean(object: &SingleObject, diagnostics: &mut DiagnosticsStore) -> Option<bool> {
    match &object.value {
        PrimitiveValue::Boolean(value) => Some(*value),
        other => {
            push_type_mismatch(diagnostics, ObjectKind::Boolean, other.kind(), object.origin);
            None
        }
    }
}

pub fn get_as_string<'a>(
    object: &'a SingleObject,
    diagnostics: &mut DiagnosticsStore,
) -> Option<&'a str> {
    match &object.value {
        PrimitiveValue::String(value) => Some(value),
        other => {
            push_type_mismatch(diagnostics, ObjectKind::String, other.kind(), object.origin);
            None
        }
    }
}

pub fn get_as_rarity(object: &SingleObject, diagnostics: &mut DiagnosticsStore) -> Option<Rarity> {
    match &object.value {
        PrimitiveValue::Rarity(value) => Some(*value),
        other => {
            push_type_mismatch(diagnostics, ObjectKind::Rarity, other.kind(), object.origin);
            None
        }
    }
}

pub fn get_as_suit(object: &SingleObject, diagnostics: &mut DiagnosticsStore) -> Option<Suit> {
    match &object.value {
        PrimitiveValue::Suit(value) => Some(*value),
        other => {
            push_type_mismatch(diagnostics, ObjectKind::Suit, other.kind(), object.origin);
            None
        }
    }
}

pub fn get_as_shape(object: &SingleObject, diagnostics: &mut DiagnosticsStore) -> Option<Shape> {
    match &object.value {
        PrimitiveValue::Shape(value) => Some(*value),
        other => {
            push_type_mismatch(diagnostics, ObjectKind::Shape, other.kind(), object.origin);
            None
        }
    }
}

pub fn get_as_influence(
    object: &SingleObject,
    diagnostics: &mut DiagnosticsStore,
) -> Option<Influence> {
    match &object.value {
        PrimitiveValue::Influence(value) => Some(*value),
        other => {
            push_type_mismatch(
                diagnostics,
                ObjectKind::Influence,
                other.kind(),
                object.origin,
            );
            None
        }
    }
}

pub fn get_as_gem_quality_type(
    object: &SingleObject,
    diagnostics: &mut DiagnosticsStore,
) -> Option<GemQualityType> {
    match &object.value {
        PrimitiveValue::GemQualityType(value) => Some(*value),
        other => {
            push_type_mismatch(
                diagnostics,
                ObjectKind::GemQualityType,
                other.kind(),
                object.origin,
            );
            None
        }
    }
}
