//! Lowering of parsed conditions into condition sets, including the
//! redefinition checks that make each property a single-assignment slot
//! along every nesting path.

use crate::ast::{Condition, Sequence};
use crate::diagnostics::{DiagnosticId, DiagnosticsStore};
use crate::lang::condition_set::{
    AutogenCondition, BooleanCondition, ConditionSet, GemQualityTypeCondition, InfluenceFlags,
    InfluencesCondition, RangeCondition, RangeValue, RangedStringsCondition, SocketSpecCondition,
    SpiritConditionSet, StringsCondition,
};
use crate::lang::types::{AutogenCategory, ComparisonOp, ConditionProperty, Influence};
use crate::token::Span;

use super::evaluate::{
    evaluate_sequence, get_as_boolean, get_as_fractional, get_as_gem_quality_type,
    get_as_influence, get_as_integer, get_as_rarity, get_as_socket_spec, get_as_string,
};
use super::{Settings, SymbolTable};

/// Merge every condition of a rule block header into the scope's
/// condition set. Reports all failures; returns `None` only when
/// `stop_on_error` is set and something failed.
pub fn spirit_filter_add_conditions(
    conditions: &[Condition],
    symbols: &SymbolTable,
    settings: Settings,
    set: &mut SpiritConditionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    for condition in conditions {
        let result = match condition {
            Condition::Property {
                property,
                comparison,
                value,
                origin,
                ..
            } => add_property_condition(
                *property,
                *comparison,
                value,
                *origin,
                symbols,
                settings,
                &mut set.conditions,
                diagnostics,
            ),
            Condition::Autogen {
                category_name,
                category_origin,
                origin,
            } => add_autogen(category_name, *category_origin, *origin, set, diagnostics),
            Condition::Price {
                comparison,
                value,
                origin,
            } => add_price(*comparison, value, *origin, symbols, settings, set, diagnostics),
        };

        if result.is_none() && settings.stop_on_error {
            return None;
        }
    }
    Some(())
}

/// Real filter variant: the grammar has no autogen or price conditions,
/// so only property conditions reach this point.
pub fn real_filter_add_condition(
    condition: &Condition,
    settings: Settings,
    set: &mut ConditionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    match condition {
        Condition::Property {
            property,
            comparison,
            value,
            origin,
            ..
        } => add_property_condition(
            *property,
            *comparison,
            value,
            *origin,
            &SymbolTable::default(),
            settings,
            set,
            diagnostics,
        ),
        _ => {
            diagnostics.push_internal_compiler_error("real_filter_add_condition", condition.origin());
            None
        }
    }
}

// ----------------------------------------------------------------------------
// shared pieces
// ----------------------------------------------------------------------------

fn push_condition_redefinition(
    diagnostics: &mut DiagnosticsStore,
    redefinition: Span,
    original: Span,
) {
    diagnostics.push_error(
        DiagnosticId::ConditionRedefinition,
        redefinition,
        "condition redefinition (the same condition can not be specified again in the same block or nested blocks)",
    );
    diagnostics.push_note(
        DiagnosticId::ConditionRedefinition,
        Some(original),
        "first defined here",
    );
}

fn add_range_condition<T: RangeValue>(
    comparison: ComparisonOp,
    value: T,
    origin: Span,
    target: &mut RangeCondition<T>,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    let lower_taken = target.lower_bound.map(|b| b.origin);
    let upper_taken = target.upper_bound.map(|b| b.origin);

    let push_bound_redefinition = |diagnostics: &mut DiagnosticsStore, id, original: Span| {
        let what = match id {
            DiagnosticId::LowerBoundRedefinition => "lower",
            _ => "upper",
        };
        diagnostics.push_error(
            id,
            origin,
            format!(
                "{} bound redefinition (the same bound can not be specified again in the same block or nested blocks)",
                what
            ),
        );
        diagnostics.push_note(id, Some(original), "first defined here");
    };

    match comparison {
        ComparisonOp::Equal | ComparisonOp::ExactMatch => {
            if let Some(original) = lower_taken {
                push_bound_redefinition(diagnostics, DiagnosticId::LowerBoundRedefinition, original);
                return None;
            }
            if let Some(original) = upper_taken {
                push_bound_redefinition(diagnostics, DiagnosticId::UpperBoundRedefinition, original);
                return None;
            }
            target.set_exact(value, origin);
            Some(())
        }
        ComparisonOp::Less | ComparisonOp::LessEqual => {
            if let Some(original) = upper_taken {
                push_bound_redefinition(diagnostics, DiagnosticId::UpperBoundRedefinition, original);
                return None;
            }
            target.set_upper_bound(value, comparison == ComparisonOp::LessEqual, origin);
            Some(())
        }
        ComparisonOp::Greater | ComparisonOp::GreaterEqual => {
            if let Some(original) = lower_taken {
                push_bound_redefinition(diagnostics, DiagnosticId::LowerBoundRedefinition, original);
                return None;
            }
            target.set_lower_bound(value, comparison == ComparisonOp::GreaterEqual, origin);
            Some(())
        }
        ComparisonOp::NotEqual => {
            diagnostics.push_internal_compiler_error("add_range_condition", origin);
            None
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn add_property_condition(
    property: ConditionProperty,
    comparison: ComparisonOp,
    value: &Sequence,
    origin: Span,
    symbols: &SymbolTable,
    settings: Settings,
    set: &mut ConditionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    use ConditionProperty as P;

    if property.is_numeric_range() {
        let object = evaluate_sequence(value, symbols, 1, Some(1), settings, diagnostics)?;
        let integer = get_as_integer(&object.values[0], diagnostics)?;
        let target = match property {
            P::ItemLevel => &mut set.item_level,
            P::DropLevel => &mut set.drop_level,
            P::Quality => &mut set.quality,
            P::LinkedSockets => &mut set.linked_sockets,
            P::Height => &mut set.height,
            P::Width => &mut set.width,
            P::StackSize => &mut set.stack_size,
            P::GemLevel => &mut set.gem_level,
            P::MapTier => &mut set.map_tier,
            P::AreaLevel => &mut set.area_level,
            P::CorruptedMods => &mut set.corrupted_mods,
            _ => &mut set.enchantment_passive_num,
        };
        return add_range_condition(comparison, integer, origin, target, diagnostics);
    }

    if property.is_boolean() {
        let object = evaluate_sequence(value, symbols, 1, Some(1), settings, diagnostics)?;
        let boolean = get_as_boolean(&object.values[0], diagnostics)?;
        let target = match property {
            P::Identified => &mut set.is_identified,
            P::Corrupted => &mut set.is_corrupted,
            P::Mirrored => &mut set.is_mirrored,
            P::ElderItem => &mut set.is_elder_item,
            P::ShaperItem => &mut set.is_shaper_item,
            P::FracturedItem => &mut set.is_fractured_item,
            P::SynthesisedItem => &mut set.is_synthesised_item,
            P::AnyEnchantment => &mut set.is_enchanted,
            P::ShapedMap => &mut set.is_shaped_map,
            P::ElderMap => &mut set.is_elder_map,
            P::BlightedMap => &mut set.is_blighted_map,
            P::Replica => &mut set.is_replica,
            _ => &mut set.is_alternate_quality,
        };
        if let Some(existing) = target {
            push_condition_redefinition(diagnostics, origin, existing.origin);
            return None;
        }
        *target = Some(BooleanCondition {
            value: boolean,
            origin,
        });
        return Some(());
    }

    if property.is_string_list() {
        let object = evaluate_sequence(value, symbols, 1, None, settings, diagnostics)?;
        let mut strings = Vec::with_capacity(object.values.len());
        for single in &object.values {
            strings.push(get_as_string(single, diagnostics)?.to_string());
        }
        let condition = StringsCondition {
            strings,
            exact_match: comparison == ComparisonOp::ExactMatch,
            origin,
        };
        let target = match property {
            P::Class => &mut set.class,
            P::BaseType => &mut set.base_type,
            P::Prophecy => &mut set.prophecy,
            P::EnchantmentPassiveNode => &mut set.enchantment_passive_node,
            _ => &mut set.archnemesis_mod,
        };
        if let Some(existing) = target {
            push_condition_redefinition(diagnostics, origin, existing.origin);
            return None;
        }
        *target = Some(condition);
        return Some(());
    }

    if property.is_ranged_string_list() {
        return add_ranged_strings_condition(
            property, comparison, value, origin, symbols, settings, set, diagnostics,
        );
    }

    if property.is_socket_spec() {
        let object = evaluate_sequence(value, symbols, 1, Some(6), settings, diagnostics)?;
        let mut specs = Vec::with_capacity(object.values.len());
        for single in &object.values {
            specs.push(get_as_socket_spec(single, diagnostics)?);
        }
        let condition = SocketSpecCondition {
            comparison,
            values: specs,
            origin,
        };
        let target = match property {
            P::Sockets => &mut set.sockets,
            _ => &mut set.socket_group,
        };
        if let Some(existing) = target {
            push_condition_redefinition(diagnostics, origin, existing.origin);
            return None;
        }
        *target = Some(condition);
        return Some(());
    }

    match property {
        P::Rarity => {
            let object = evaluate_sequence(value, symbols, 1, Some(1), settings, diagnostics)?;
            let rarity = get_as_rarity(&object.values[0], diagnostics)?;
            add_range_condition(comparison, rarity, origin, &mut set.rarity, diagnostics)
        }
        P::HasInfluence => {
            add_influence_condition(comparison, value, origin, symbols, settings, set, diagnostics)
        }
        P::GemQualityType => {
            let object = evaluate_sequence(value, symbols, 1, Some(4), settings, diagnostics)?;
            let mut values = Vec::with_capacity(object.values.len());
            for single in &object.values {
                values.push(get_as_gem_quality_type(single, diagnostics)?);
            }
            if let Some(existing) = &set.gem_quality_type {
                push_condition_redefinition(diagnostics, origin, existing.origin);
                return None;
            }
            set.gem_quality_type = Some(GemQualityTypeCondition { values, origin });
            Some(())
        }
        _ => {
            diagnostics.push_internal_compiler_error("add_property_condition", origin);
            None
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn add_ranged_strings_condition(
    property: ConditionProperty,
    comparison: ComparisonOp,
    value: &Sequence,
    origin: Span,
    symbols: &SymbolTable,
    settings: Settings,
    set: &mut ConditionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    let object = evaluate_sequence(value, symbols, 1, None, settings, diagnostics)?;

    let has_ordering_op = matches!(
        comparison,
        ComparisonOp::Less | ComparisonOp::LessEqual | ComparisonOp::Greater | ComparisonOp::GreaterEqual
    );

    let mut values = object.values.as_slice();
    let mut count = RangeCondition::new();

    if let Some(first) = values.first() {
        if let crate::lang::PrimitiveValue::Integer(n) = first.value {
            add_range_condition(comparison, n, first.origin, &mut count, diagnostics)?;
            values = &values[1..];
        } else if has_ordering_op {
            diagnostics.push_error(
                DiagnosticId::InvalidRangedStringsCondition,
                origin,
                "expected an integer count right after the comparison operator",
            );
            return None;
        }
    }

    if values.is_empty() {
        diagnostics.push_error(
            DiagnosticId::InvalidRangedStringsCondition,
            origin,
            "expected at least one string",
        );
        return None;
    }

    let mut strings = Vec::with_capacity(values.len());
    for single in values {
        strings.push(get_as_string(single, diagnostics)?.to_string());
    }

    let condition = RangedStringsCondition {
        strings: StringsCondition {
            strings,
            exact_match: comparison == ComparisonOp::ExactMatch,
            origin,
        },
        count,
    };

    let target = match property {
        ConditionProperty::HasExplicitMod => &mut set.has_explicit_mod,
        _ => &mut set.has_enchantment,
    };
    if let Some(existing) = target {
        push_condition_redefinition(diagnostics, origin, existing.strings.origin);
        return None;
    }
    *target = Some(condition);
    Some(())
}

fn add_influence_condition(
    comparison: ComparisonOp,
    value: &Sequence,
    origin: Span,
    symbols: &SymbolTable,
    settings: Settings,
    set: &mut ConditionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    let object = evaluate_sequence(value, symbols, 1, Some(6), settings, diagnostics)?;

    let mut flags = InfluenceFlags::default();
    let is_none = object.values.len() == 1
        && matches!(object.values[0].value, crate::lang::PrimitiveValue::None);

    if !is_none {
        let mut seen: Vec<(Influence, Span)> = Vec::new();
        for single in &object.values {
            let influence = get_as_influence(single, diagnostics)?;
            if let Some((_, first_origin)) = seen.iter().find(|(i, _)| *i == influence) {
                diagnostics.push_error(
                    DiagnosticId::DuplicateInfluence,
                    single.origin,
                    "duplicate influence",
                );
                diagnostics.push_note(
                    DiagnosticId::DuplicateInfluence,
                    Some(*first_origin),
                    "first listed here",
                );
                return None;
            }
            seen.push((influence, single.origin));
            match influence {
                Influence::Shaper => flags.shaper = true,
                Influence::Elder => flags.elder = true,
                Influence::Crusader => flags.crusader = true,
                Influence::Redeemer => flags.redeemer = true,
                Influence::Hunter => flags.hunter = true,
                Influence::Warlord => flags.warlord = true,
            }
        }
    }

    if let Some(existing) = &set.has_influence {
        push_condition_redefinition(diagnostics, origin, existing.origin);
        return None;
    }
    set.has_influence = Some(InfluencesCondition {
        influence: flags,
        exact_match: comparison == ComparisonOp::ExactMatch,
        origin,
    });
    Some(())
}

fn add_autogen(
    category_name: &str,
    category_origin: Span,
    origin: Span,
    set: &mut SpiritConditionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    let category = match AutogenCategory::from_keyword(category_name) {
        Some(category) => category,
        None => {
            diagnostics.push_error(
                DiagnosticId::AutogenError,
                category_origin,
                format!("unknown autogeneration category '{}'", category_name),
            );
            return None;
        }
    };

    if let Some(existing) = &set.autogen {
        push_condition_redefinition(diagnostics, origin, existing.origin);
        return None;
    }
    set.autogen = Some(AutogenCondition { category, origin });
    Some(())
}

fn add_price(
    comparison: ComparisonOp,
    value: &Sequence,
    origin: Span,
    symbols: &SymbolTable,
    settings: Settings,
    set: &mut SpiritConditionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    let object = evaluate_sequence(value, symbols, 1, Some(1), settings, diagnostics)?;
    let price = get_as_fractional(&object.values[0], diagnostics)?;
    add_range_condition(comparison, price, origin, &mut set.price, diagnostics)
}
