//! Lowering of action statements onto action sets. Spirit filters
//! overlay slots (innermost scope wins); real filters treat a second
//! assignment in one block as an error.

use crate::ast::{rf, sf, Sequence};
use crate::diagnostics::{DiagnosticId, DiagnosticsStore};
use crate::lang::action_set::{
    ActionSet, AlertSound, AlertSoundAction, BuiltinAlertSoundId, Color, ColorAction,
    FontSizeAction, MinimapIcon, MinimapIconAction, PlayEffect, PlayEffectAction,
    SwitchDropSoundAction,
};
use crate::lang::types::{ActionProperty, ObjectKind, PrimitiveValue};
use crate::lang::limits;
use crate::token::Span;

use super::evaluate::{
    evaluate_sequence, get_as_boolean, get_as_integer, get_as_integer_in_range, get_as_shape,
    get_as_string, get_as_suit, push_type_mismatch,
};
use super::{Settings, SymbolTable};

/// Apply one spirit filter action statement to the scope's action set.
pub fn spirit_filter_add_action(
    statement: &sf::ActionStmt,
    symbols: &SymbolTable,
    settings: Settings,
    action_set: &mut ActionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    match statement {
        sf::ActionStmt::Apply {
            action,
            value,
            origin,
        } => add_action(
            *action,
            value.as_ref(),
            *origin,
            symbols,
            settings,
            action_set,
            false,
            diagnostics,
        ),
        sf::ActionStmt::SetRef { name, origin } => {
            let tree = match symbols.trees.get(name) {
                Some(tree) => tree,
                None => {
                    if symbols.objects.contains_key(name) {
                        diagnostics.push_error(
                            DiagnosticId::TypeMismatch,
                            *origin,
                            "type mismatch in expression, expected compound action but got primitive value",
                        );
                    } else {
                        diagnostics.push_error(
                            DiagnosticId::NoSuchName,
                            *origin,
                            "no such name exists",
                        );
                    }
                    return None;
                }
            };

            // stored subtrees contain only plain actions; nested Set
            // references were inlined during symbol resolution
            let mut ok = true;
            for action in &tree.actions {
                let result = match action {
                    sf::ActionStmt::Apply {
                        action,
                        value,
                        origin,
                    } => add_action(
                        *action,
                        value.as_ref(),
                        *origin,
                        symbols,
                        settings,
                        action_set,
                        false,
                        diagnostics,
                    ),
                    sf::ActionStmt::SetRef { origin, .. } => {
                        diagnostics.push_internal_compiler_error("spirit_filter_add_action", *origin);
                        None
                    }
                };
                if result.is_none() {
                    ok = false;
                    if settings.stop_on_error {
                        return None;
                    }
                }
            }
            if ok {
                Some(())
            } else {
                None
            }
        }
    }
}

/// Apply one real filter action; a slot already holding a value is an
/// error here, unlike in spirit filters.
pub fn real_filter_add_action(
    action: &rf::Action,
    settings: Settings,
    action_set: &mut ActionSet,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    add_action(
        action.action,
        action.value.as_ref(),
        action.origin,
        &SymbolTable::default(),
        settings,
        action_set,
        true,
        diagnostics,
    )
}

fn push_action_redefinition(diagnostics: &mut DiagnosticsStore, redefinition: Span, original: Span) {
    diagnostics.push_error(
        DiagnosticId::ActionRedefinition,
        redefinition,
        "action redefinition (the same action can not be specified again in the same block)",
    );
    diagnostics.push_note(
        DiagnosticId::ActionRedefinition,
        Some(original),
        "first defined here",
    );
}

#[allow(clippy::too_many_arguments)]
fn add_action(
    action: ActionProperty,
    value: Option<&Sequence>,
    origin: Span,
    symbols: &SymbolTable,
    settings: Settings,
    action_set: &mut ActionSet,
    real_filter: bool,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    use ActionProperty as A;

    match action {
        A::SetTextColor | A::SetBorderColor | A::SetBackgroundColor => {
            let sequence = value?;
            let object = evaluate_sequence(sequence, symbols, 3, Some(4), settings, diagnostics)?;
            let mut components = [0i32; 3];
            for (slot, single) in components.iter_mut().zip(&object.values) {
                *slot = get_as_integer_in_range(
                    single,
                    limits::MIN_COLOR_COMPONENT,
                    limits::MAX_COLOR_COMPONENT,
                    diagnostics,
                )?;
            }
            let alpha = match object.values.get(3) {
                Some(single) => Some(get_as_integer_in_range(
                    single,
                    limits::MIN_COLOR_COMPONENT,
                    limits::MAX_COLOR_COMPONENT,
                    diagnostics,
                )?),
                None => None,
            };
            let new_action = ColorAction {
                color: Color {
                    r: components[0],
                    g: components[1],
                    b: components[2],
                    a: alpha,
                },
                origin,
            };
            let target = match action {
                A::SetTextColor => &mut action_set.text_color,
                A::SetBorderColor => &mut action_set.border_color,
                _ => &mut action_set.background_color,
            };
            if real_filter {
                if let Some(existing) = target {
                    push_action_redefinition(diagnostics, origin, existing.origin);
                    return None;
                }
            }
            *target = Some(new_action);
            Some(())
        }

        A::SetFontSize => {
            let object = evaluate_sequence(value?, symbols, 1, Some(1), settings, diagnostics)?;
            let size = get_as_integer(&object.values[0], diagnostics)?;
            if !(limits::MIN_FONT_SIZE..=limits::MAX_FONT_SIZE).contains(&size) {
                diagnostics.push_warning(
                    DiagnosticId::FontSizeOutsideRange,
                    object.values[0].origin,
                    format!(
                        "font size outside allowed range ({} - {}), the game client will clamp it",
                        limits::MIN_FONT_SIZE,
                        limits::MAX_FONT_SIZE
                    ),
                );
            }
            if real_filter {
                if let Some(existing) = &action_set.font_size {
                    push_action_redefinition(diagnostics, origin, existing.origin);
                    return None;
                }
            }
            action_set.font_size = Some(FontSizeAction { size, origin });
            Some(())
        }

        A::PlayEffect => {
            let object = evaluate_sequence(value?, symbols, 1, Some(2), settings, diagnostics)?;
            let effect = if matches!(object.values[0].value, PrimitiveValue::None) {
                if object.values.len() > 1 {
                    diagnostics.push_error(
                        DiagnosticId::InvalidAmountOfArguments,
                        object.origin,
                        "invalid amount of arguments, expected 1 but got 2",
                    );
                    return None;
                }
                PlayEffect::Disabled
            } else {
                let suit = get_as_suit(&object.values[0], diagnostics)?;
                let is_temporary = match object.values.get(1) {
                    Some(single) => match single.value {
                        PrimitiveValue::Temp => true,
                        _ => {
                            push_type_mismatch(
                                diagnostics,
                                ObjectKind::Temp,
                                single.value.kind(),
                                single.origin,
                            );
                            return None;
                        }
                    },
                    None => false,
                };
                PlayEffect::Enabled { suit, is_temporary }
            };
            if real_filter {
                if let Some(existing) = &action_set.play_effect {
                    push_action_redefinition(diagnostics, origin, existing.origin);
                    return None;
                }
            }
            action_set.play_effect = Some(PlayEffectAction { effect, origin });
            Some(())
        }

        A::MinimapIcon => {
            let object = evaluate_sequence(value?, symbols, 1, Some(3), settings, diagnostics)?;
            let first = get_as_integer(&object.values[0], diagnostics)?;

            let icon = if first == limits::MINIMAP_ICON_CANCEL && object.values.len() == 1 {
                MinimapIcon::Disabled
            } else {
                if object.values.len() != 3 {
                    diagnostics.push_error(
                        DiagnosticId::InvalidAmountOfArguments,
                        object.origin,
                        format!(
                            "invalid amount of arguments, expected 3 but got {}",
                            object.values.len()
                        ),
                    );
                    return None;
                }
                let size = get_as_integer_in_range(
                    &object.values[0],
                    limits::MIN_MINIMAP_ICON_SIZE,
                    limits::MAX_MINIMAP_ICON_SIZE,
                    diagnostics,
                )?;
                let suit = get_as_suit(&object.values[1], diagnostics)?;
                let shape = get_as_shape(&object.values[2], diagnostics)?;
                MinimapIcon::Enabled { size, suit, shape }
            };
            if real_filter {
                if let Some(existing) = &action_set.minimap_icon {
                    push_action_redefinition(diagnostics, origin, existing.origin);
                    return None;
                }
            }
            action_set.minimap_icon = Some(MinimapIconAction { icon, origin });
            Some(())
        }

        A::PlayAlertSound | A::PlayAlertSoundPositional | A::SetAlertSound
        | A::SetAlertSoundPositional => {
            let positional = matches!(
                action,
                A::PlayAlertSoundPositional | A::SetAlertSoundPositional
            );
            let object = evaluate_sequence(value?, symbols, 1, Some(2), settings, diagnostics)?;

            let id = match &object.values[0].value {
                PrimitiveValue::None => BuiltinAlertSoundId::None,
                PrimitiveValue::Integer(_) => BuiltinAlertSoundId::Integer(get_as_integer_in_range(
                    &object.values[0],
                    limits::MIN_ALERT_SOUND_ID,
                    limits::MAX_ALERT_SOUND_ID,
                    diagnostics,
                )?),
                PrimitiveValue::ShaperVoiceLine(line) => BuiltinAlertSoundId::ShaperVoiceLine(*line),
                _ => {
                    diagnostics.push_error(
                        DiagnosticId::InvalidSetAlertSound,
                        object.values[0].origin,
                        "invalid alert sound, expected a sound id, a shaper voice line or None",
                    );
                    return None;
                }
            };

            let volume = match object.values.get(1) {
                Some(single) => Some(get_as_integer_in_range(
                    single,
                    limits::MIN_ALERT_VOLUME,
                    limits::MAX_ALERT_VOLUME,
                    diagnostics,
                )?),
                None => None,
            };

            set_alert_sound(
                action_set,
                AlertSoundAction {
                    sound: AlertSound::Builtin { id, positional },
                    volume,
                    origin,
                },
                real_filter,
                diagnostics,
            )
        }

        A::CustomAlertSound | A::CustomAlertSoundOptional => {
            let object = evaluate_sequence(value?, symbols, 1, Some(2), settings, diagnostics)?;
            let path = get_as_string(&object.values[0], diagnostics)?.to_string();
            let volume = match object.values.get(1) {
                Some(single) => Some(get_as_integer_in_range(
                    single,
                    limits::MIN_ALERT_VOLUME,
                    limits::MAX_ALERT_VOLUME,
                    diagnostics,
                )?),
                None => None,
            };
            set_alert_sound(
                action_set,
                AlertSoundAction {
                    sound: AlertSound::Custom {
                        path,
                        optional: action == A::CustomAlertSoundOptional,
                    },
                    volume,
                    origin,
                },
                real_filter,
                diagnostics,
            )
        }

        A::EnableDropSound | A::DisableDropSound | A::EnableDropSoundIfAlertSound
        | A::DisableDropSoundIfAlertSound => {
            let keyword_enables = matches!(action, A::EnableDropSound | A::EnableDropSoundIfAlertSound);
            let enable = match value {
                Some(sequence) => {
                    let object =
                        evaluate_sequence(sequence, symbols, 1, Some(1), settings, diagnostics)?;
                    let flag = get_as_boolean(&object.values[0], diagnostics)?;
                    if keyword_enables {
                        flag
                    } else {
                        !flag
                    }
                }
                None => keyword_enables,
            };
            let new_action = SwitchDropSoundAction { enable, origin };
            let target = if matches!(
                action,
                A::EnableDropSoundIfAlertSound | A::DisableDropSoundIfAlertSound
            ) {
                &mut action_set.switch_drop_sound_if_alert_sound
            } else {
                &mut action_set.switch_drop_sound
            };
            if real_filter {
                if let Some(existing) = target {
                    push_action_redefinition(diagnostics, origin, existing.origin);
                    return None;
                }
            }
            *target = Some(new_action);
            Some(())
        }
    }
}

fn set_alert_sound(
    action_set: &mut ActionSet,
    new_action: AlertSoundAction,
    real_filter: bool,
    diagnostics: &mut DiagnosticsStore,
) -> Option<()> {
    if real_filter {
        if let Some(existing) = &action_set.alert_sound {
            push_action_redefinition(diagnostics, new_action.origin, existing.origin);
            return None;
        }
    }
    action_set.alert_sound = Some(new_action);
    Some(())
}
