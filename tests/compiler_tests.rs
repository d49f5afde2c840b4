//! Block-level semantics of the spirit filter compiler.

mod common;

use common::compile_spirit;
use filter_spirit::compiler::Settings;
use filter_spirit::diagnostics::DiagnosticsStore;
use filter_spirit::lang::action_set::{AlertSound, BuiltinAlertSoundId};
use filter_spirit::lang::{Rarity, Visibility};

#[test]
fn blocks_follow_depth_first_visibility_order() {
    let filter = compile_spirit(
        "Class \"Boots\" {\n\
         \tQuality > 10 { Show }\n\
         \tHide\n\
         }\n\
         Show\n",
    );
    let visibilities: Vec<Visibility> =
        filter.blocks.iter().map(|b| b.block.visibility).collect();
    assert_eq!(
        visibilities,
        vec![Visibility::Show, Visibility::Hide, Visibility::Show]
    );
}

#[test]
fn block_without_visibility_emits_nothing() {
    let filter = compile_spirit("Class \"Boots\" { SetFontSize 45 }\n");
    assert!(filter.blocks.is_empty());
}

#[test]
fn inner_scopes_do_not_leak_into_outer_blocks() {
    let filter = compile_spirit(
        "Class \"Boots\" {\n\
         \tQuality > 10 { SetFontSize 45 Show }\n\
         \tShow\n\
         }\n",
    );
    assert_eq!(filter.blocks.len(), 2);
    // the sibling Show must not see the nested font size nor quality
    let outer = &filter.blocks[1].block;
    assert!(outer.actions.font_size.is_none());
    assert!(!outer.conditions.quality.has_bound());
    assert!(outer.conditions.class.is_some());
}

#[test]
fn alert_sound_keywords_share_one_slot() {
    let filter = compile_spirit(
        "PlayAlertSound 1\n\
         Class \"Boots\" {\n\
         \tCustomAlertSound \"pop.wav\"\n\
         \tPlayAlertSoundPositional 5 200\n\
         \tShow\n\
         }\n",
    );
    let actions = &filter.blocks[0].block.actions;
    let alert = actions.alert_sound.as_ref().expect("missing alert sound");
    match &alert.sound {
        AlertSound::Builtin { id, positional } => {
            assert_eq!(*id, BuiltinAlertSoundId::Integer(5));
            assert!(*positional);
        }
        other => panic!("expected builtin alert sound, got {:?}", other),
    }
    assert_eq!(alert.volume, Some(200));
}

#[test]
fn set_alert_sound_aliases_play_alert_sound() {
    let filter = compile_spirit(
        "SetAlertSound 3\n\
         Class \"Boots\" { PlayAlertSound 7 Show }\n",
    );
    let alert = filter.blocks[0]
        .block
        .actions
        .alert_sound
        .as_ref()
        .expect("missing alert sound");
    match &alert.sound {
        AlertSound::Builtin { id, .. } => assert_eq!(*id, BuiltinAlertSoundId::Integer(7)),
        other => panic!("expected builtin alert sound, got {:?}", other),
    }
}

#[test]
fn rarity_condition_compiles_to_exact_range() {
    let filter = compile_spirit("Rarity Unique { Show }\n");
    let rarity = &filter.blocks[0].block.conditions.rarity;
    assert!(rarity.is_exact());
    assert!(rarity.includes(Rarity::Unique));
    assert!(!rarity.includes(Rarity::Rare));
}

#[test]
fn exact_range_bounds_are_both_inclusive() {
    let filter = compile_spirit("Quality == 20 { Show }\nItemLevel = 60 { Show }\n");
    for block in &filter.blocks {
        let conditions = &block.block.conditions;
        for range in [&conditions.quality, &conditions.item_level] {
            if range.has_bound() {
                let lower = range.lower_bound.expect("missing lower bound");
                let upper = range.upper_bound.expect("missing upper bound");
                assert!(lower.inclusive && upper.inclusive);
            }
        }
    }
}

#[test]
fn autogen_extension_carries_price_range() {
    let filter = compile_spirit(
        "Autogen cards Price >= 10 Price < 100 { Show }\n",
    );
    let autogen = filter.blocks[0].autogen.as_ref().expect("missing autogen");
    assert!(autogen.price_range.includes(50.0));
    assert!(!autogen.price_range.includes(5.0));
    assert!(!autogen.price_range.includes(100.0));
}

#[test]
fn sequence_reference_flattens_into_parent() {
    let filter = compile_spirit(
        "$names = \"Humility\" \"The Doctor\"\n\
         BaseType $names \"Rain of Chaos\" { Show }\n",
    );
    let base_type = filter.blocks[0]
        .block
        .conditions
        .base_type
        .as_ref()
        .expect("missing BaseType");
    assert_eq!(base_type.strings.len(), 3);
    assert_eq!(base_type.strings[2], "Rain of Chaos");
}

#[test]
fn stop_on_error_short_circuits_but_keeps_siblings() {
    let settings = Settings {
        stop_on_error: true,
        treat_warnings_as_errors: false,
    };
    let mut diagnostics = DiagnosticsStore::new();
    let result = filter_spirit::compile_spirit_filter(
        "Class $missing { Show }\n\
         Quality > 10 { Show }\n",
        settings,
        &mut diagnostics,
    );
    // the failed subtree is reported, the phase result is withheld
    assert!(result.is_none());
    assert!(diagnostics.has_errors());
}

#[test]
fn best_effort_keeps_compiling_after_errors() {
    let mut diagnostics = DiagnosticsStore::new();
    let result = filter_spirit::compile_spirit_filter(
        "Class $missing { Show }\n\
         Quality > 10 { Show }\n",
        Settings::default(),
        &mut diagnostics,
    );
    assert!(diagnostics.has_errors());
    let filter = result.expect("best effort result missing");
    // the sibling block still compiled
    assert!(filter
        .blocks
        .iter()
        .any(|b| b.block.conditions.quality.has_bound()));
}

#[test]
fn drop_sound_switch_takes_optional_boolean() {
    let filter = compile_spirit(
        "DisableDropSound\nShow\n\
         DisableDropSound false\nShow\n",
    );
    let first = filter.blocks[0]
        .block
        .actions
        .switch_drop_sound
        .expect("missing drop sound switch");
    assert!(!first.enable);

    let second = filter.blocks[1]
        .block
        .actions
        .switch_drop_sound
        .expect("missing drop sound switch");
    assert!(second.enable);
}
