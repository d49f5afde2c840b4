//! Semantic passes: symbol resolution, spirit filter block compilation
//! and the alternate real filter entry.

pub mod actions;
pub mod conditions;
pub mod evaluate;

use std::collections::HashMap;

use crate::ast::{rf, sf};
use crate::diagnostics::{DiagnosticId, DiagnosticsStore};
use crate::lang::action_set::ActionSet;
use crate::lang::condition_set::{ConditionSet, SpiritConditionSet};
use crate::lang::item_filter::{
    AutogenExtension, ItemFilter, ItemFilterBlock, SpiritFilter, SpiritFilterBlock,
};
use crate::lang::types::{AutogenCategory, Object, Rarity};
use crate::token::Span;

use actions::{real_filter_add_action, spirit_filter_add_action};
use conditions::{real_filter_add_condition, spirit_filter_add_conditions};
use evaluate::evaluate_sequence;

/// Error handling knobs shared by every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Abandon the current subtree on the first error. Siblings are
    /// still processed.
    pub stop_on_error: bool,
    /// Lift warnings to errors in the final outcome.
    pub treat_warnings_as_errors: bool,
}

#[derive(Debug, Clone)]
pub struct NamedObject {
    pub object: Object,
    pub name_origin: Span,
}

#[derive(Debug, Clone)]
pub struct NamedTree {
    /// Only plain actions; nested `Set` references are inlined when the
    /// tree is stored.
    pub actions: Vec<sf::ActionStmt>,
    pub name_origin: Span,
}

/// Names are globally unique within a file; objects and compound-action
/// subtrees live in separate maps so diagnostics can tell the two
/// mistakes apart.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub objects: HashMap<String, NamedObject>,
    pub trees: HashMap<String, NamedTree>,
}

impl SymbolTable {
    fn origin_of(&self, name: &str) -> Option<Span> {
        self.objects
            .get(name)
            .map(|named| named.name_origin)
            .or_else(|| self.trees.get(name).map(|named| named.name_origin))
    }
}

/// Walk `$name = value` definitions in source order and build the
/// symbol table. Forward references are not allowed.
pub fn resolve_spirit_filter_symbols(
    definitions: &[sf::Definition],
    settings: Settings,
    diagnostics: &mut DiagnosticsStore,
) -> SymbolTable {
    let mut symbols = SymbolTable::default();

    for definition in definitions {
        if let Some(original) = symbols.origin_of(&definition.name) {
            diagnostics.push_error(
                DiagnosticId::NameAlreadyExists,
                definition.name_origin,
                "name already exists",
            );
            diagnostics.push_note(
                DiagnosticId::NameAlreadyExists,
                Some(original),
                "first defined here",
            );
            continue;
        }

        match &definition.value {
            sf::DefinitionValue::Sequence(sequence) => {
                let object =
                    evaluate_sequence(sequence, &symbols, 1, None, settings, diagnostics);
                match object {
                    Some(object) => {
                        symbols.objects.insert(
                            definition.name.clone(),
                            NamedObject {
                                object,
                                name_origin: definition.name_origin,
                            },
                        );
                    }
                    None if settings.stop_on_error => return symbols,
                    None => {}
                }
            }
            sf::DefinitionValue::CompoundAction { actions, .. } => {
                match inline_compound_action(actions, &symbols, diagnostics) {
                    Some(actions) => {
                        symbols.trees.insert(
                            definition.name.clone(),
                            NamedTree {
                                actions,
                                name_origin: definition.name_origin,
                            },
                        );
                    }
                    None if settings.stop_on_error => return symbols,
                    None => {}
                }
            }
        }
    }

    symbols
}

/// Replace nested `Set $other` references with the referenced tree's
/// actions. Keeps application free of recursion and makes
/// self-reference impossible (the name is not in the table yet).
fn inline_compound_action(
    actions: &[sf::ActionStmt],
    symbols: &SymbolTable,
    diagnostics: &mut DiagnosticsStore,
) -> Option<Vec<sf::ActionStmt>> {
    let mut inlined = Vec::with_capacity(actions.len());
    for action in actions {
        match action {
            sf::ActionStmt::Apply { .. } => inlined.push(action.clone()),
            sf::ActionStmt::SetRef { name, origin } => match symbols.trees.get(name) {
                Some(tree) => inlined.extend(tree.actions.iter().cloned()),
                None => {
                    if symbols.objects.contains_key(name) {
                        diagnostics.push_error(
                            DiagnosticId::TypeMismatch,
                            *origin,
                            "type mismatch in expression, expected compound action but got primitive value",
                        );
                    } else {
                        diagnostics.push_error(DiagnosticId::NoSuchName, *origin, "no such name exists");
                    }
                    return None;
                }
            },
        }
    }
    Some(inlined)
}

/// Scope state threaded through nested blocks: the conditions and
/// actions accumulated from every enclosing block. Copied on entering a
/// child so inner blocks never mutate their parents.
#[derive(Debug, Clone, Default)]
struct ScopeState {
    conditions: SpiritConditionSet,
    actions: ActionSet,
}

/// Lower the statement tree into a flat list of spirit filter blocks,
/// one per visibility statement, in depth-first order.
pub fn compile_spirit_filter_statements(
    statements: &[sf::Statement],
    symbols: &SymbolTable,
    settings: Settings,
    diagnostics: &mut DiagnosticsStore,
) -> Option<SpiritFilter> {
    let errors_before = count_errors(diagnostics);
    let mut blocks = Vec::new();
    compile_statements(
        statements,
        symbols,
        settings,
        ScopeState::default(),
        &mut blocks,
        diagnostics,
    );

    if settings.stop_on_error && count_errors(diagnostics) > errors_before {
        return None;
    }
    Some(SpiritFilter { blocks })
}

fn count_errors(diagnostics: &DiagnosticsStore) -> usize {
    diagnostics
        .messages()
        .iter()
        .filter(|m| m.severity == crate::diagnostics::Severity::Error)
        .count()
}

fn compile_statements(
    statements: &[sf::Statement],
    symbols: &SymbolTable,
    settings: Settings,
    mut scope: ScopeState,
    blocks: &mut Vec<SpiritFilterBlock>,
    diagnostics: &mut DiagnosticsStore,
) {
    for statement in statements {
        match statement {
            sf::Statement::Action(action) => {
                // a failed action is reported and skipped; the scope
                // keeps whatever was applied before it
                let _ =
                    spirit_filter_add_action(action, symbols, settings, &mut scope.actions, diagnostics);
            }
            sf::Statement::Visibility { visibility, origin } => {
                let _ = finalize_block(&scope, *visibility, *origin, blocks, diagnostics);
            }
            sf::Statement::Block(rule) => {
                let mut child = scope.clone();
                let added = spirit_filter_add_conditions(
                    &rule.conditions,
                    symbols,
                    settings,
                    &mut child.conditions,
                    diagnostics,
                );
                if added.is_none() && settings.stop_on_error {
                    // the failed subtree is abandoned; siblings continue
                    continue;
                }
                compile_statements(&rule.statements, symbols, settings, child, blocks, diagnostics);
            }
        }
    }
}

fn finalize_block(
    scope: &ScopeState,
    visibility: crate::lang::Visibility,
    visibility_origin: Span,
    blocks: &mut Vec<SpiritFilterBlock>,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    let spirit = &scope.conditions;

    if spirit.price.has_bound() && spirit.autogen.is_none() {
        let price_origin = spirit.price.first_origin().unwrap_or(visibility_origin);
        diagnostics.push_error(
            DiagnosticId::PriceWithoutAutogen,
            price_origin,
            "price condition outside an Autogen block",
        );
        if let Some(second) = spirit.price.second_origin() {
            diagnostics.push_note(
                DiagnosticId::PriceWithoutAutogen,
                Some(second),
                "another price bound here",
            );
        }
        diagnostics.push_note(
            DiagnosticId::PriceWithoutAutogen,
            Some(visibility_origin),
            "the block is finalized here",
        );
        return None;
    }

    if let Some(autogen) = &spirit.autogen {
        verify_autogen_conditions(
            autogen.category,
            autogen.origin,
            &spirit.conditions,
            diagnostics,
        )?;
    }

    blocks.push(SpiritFilterBlock {
        block: ItemFilterBlock {
            visibility,
            visibility_origin,
            conditions: spirit.conditions.clone(),
            actions: scope.actions.clone(),
        },
        autogen: spirit.autogen.as_ref().map(|autogen| AutogenExtension {
            category: autogen.category,
            price_range: spirit.price,
            origin: autogen.origin,
        }),
    });
    Some(())
}

/// Reject condition combinations that contradict what the expansion
/// will synthesize.
fn verify_autogen_conditions(
    category: AutogenCategory,
    autogen_origin: Span,
    conditions: &ConditionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    if category.is_uniques()
        && conditions.rarity.has_bound()
        && !conditions.rarity.includes(Rarity::Unique)
    {
        let origin = conditions.rarity.first_origin().unwrap_or(autogen_origin);
        diagnostics.push_error(
            DiagnosticId::AutogenError,
            origin,
            "autogeneration error: this rarity condition can never match unique items",
        );
        diagnostics.push_note(
            DiagnosticId::AutogenError,
            Some(autogen_origin),
            "required by this autogeneration",
        );
        return None;
    }

    if let (Some(expected), Some(class_condition)) = (category.class_names(), &conditions.class) {
        let admits_expected = expected
            .iter()
            .any(|name| class_condition.find_match(name).is_some());
        if !admits_expected {
            diagnostics.push_error(
                DiagnosticId::AutogenError,
                class_condition.origin,
                "autogeneration error: this class condition can never match the generated item class",
            );
            diagnostics.push_note(
                DiagnosticId::AutogenError,
                Some(autogen_origin),
                "required by this autogeneration",
            );
            return None;
        }
    }

    let conflicting_slot = if category == AutogenCategory::Prophecies {
        conditions.base_type.as_ref()
    } else {
        conditions.prophecy.as_ref()
    };
    if let Some(condition) = conflicting_slot {
        diagnostics.push_error(
            DiagnosticId::AutogenError,
            condition.origin,
            "autogeneration error: expected no condition here, it would conflict with the generated one",
        );
        diagnostics.push_note(
            DiagnosticId::AutogenError,
            Some(autogen_origin),
            "required by this autogeneration",
        );
        return None;
    }

    Some(())
}

/// Compile a parsed real filter: same block model, but condition AND
/// action redefinition within one block are errors.
pub fn compile_real_filter(
    filter: &rf::Filter,
    settings: Settings,
    diagnostics: &mut DiagnosticsStore,
) -> Option<ItemFilter> {
    let errors_before = count_errors(diagnostics);
    let mut blocks = Vec::with_capacity(filter.blocks.len());

    for block in &filter.blocks {
        let mut conditions = ConditionSet::default();
        let mut actions = ActionSet::default();

        for entry in &block.entries {
            let result = match entry {
                rf::BlockEntry::Condition(condition) => {
                    real_filter_add_condition(condition, settings, &mut conditions, diagnostics)
                }
                rf::BlockEntry::Action(action) => {
                    real_filter_add_action(action, settings, &mut actions, diagnostics)
                }
            };
            if result.is_none() && settings.stop_on_error {
                break;
            }
        }

        blocks.push(ItemFilterBlock {
            visibility: block.visibility,
            visibility_origin: block.visibility_origin,
            conditions,
            actions,
        });
    }

    if settings.stop_on_error && count_errors(diagnostics) > errors_before {
        return None;
    }
    Some(ItemFilter { blocks })
}
