//! End-to-end generation scenarios: spirit filter source in, native
//! filter text out.

mod common;

use common::{cards_snapshot, generate, generate_filter};
use filter_spirit::compiler::Settings;
use filter_spirit::diagnostics::DiagnosticsStore;
use filter_spirit::lang::market::ItemPriceData;

#[test]
fn empty_input_generates_empty_filter() {
    assert_eq!(generate(""), "");
}

#[test]
fn comments_do_not_reach_the_output() {
    let filter = generate(
        "# a single \"Show\" block with a comment above\n\
         Show\n\
         ## other comment\n\
         # # # something else\n",
    );
    assert_eq!(filter, "Show\n\n");
}

#[test]
fn single_condition_passes_through() {
    let filter = generate("Quality > 0 { Show }\n");
    assert_eq!(filter, "Show\n\tQuality > 0\n\n");
}

#[test]
fn nested_blocks_merge_conditions_and_override_actions() {
    let filter = generate(
        "SetBackgroundColor 0 0 0\n\
         Class \"Boots\" {\n\
         \tSetBorderColor 1 2 3\n\
         \tBaseType \"Dragonscale Boots\" \"Sorcerer Boots\" {\n\
         \t\tPlayAlertSound 1\n\
         \t\tQuality > 0 { SetBorderColor 255 255 255  Show }\n\
         \t\tShow\n\
         \t}\n\
         \tHide\n\
         }\n\
         Show\n",
    );

    let blocks: Vec<&str> = filter.split("\n\n").filter(|b| !b.is_empty()).collect();
    assert_eq!(blocks.len(), 4);

    // innermost Show: fully merged conditions, innermost border wins
    assert_eq!(
        blocks[0],
        "Show\n\
         \tQuality > 0\n\
         \tClass \"Boots\"\n\
         \tBaseType \"Dragonscale Boots\" \"Sorcerer Boots\"\n\
         \tSetBorderColor 255 255 255\n\
         \tSetBackgroundColor 0 0 0\n\
         \tPlayAlertSound 1"
    );

    // sibling Show: same scope minus the Quality condition, outer border
    assert_eq!(
        blocks[1],
        "Show\n\
         \tClass \"Boots\"\n\
         \tBaseType \"Dragonscale Boots\" \"Sorcerer Boots\"\n\
         \tSetBorderColor 1 2 3\n\
         \tSetBackgroundColor 0 0 0\n\
         \tPlayAlertSound 1"
    );

    // the Hide closes the Class scope, which had set a border already
    assert_eq!(
        blocks[2],
        "Hide\n\
         \tClass \"Boots\"\n\
         \tSetBorderColor 1 2 3\n\
         \tSetBackgroundColor 0 0 0"
    );

    // top level Show carries only the top level action
    assert_eq!(blocks[3], "Show\n\tSetBackgroundColor 0 0 0");
}

#[test]
fn autogen_cards_split_by_price() {
    let filter = generate_filter(
        "Class \"Divination Card\" Autogen cards {\n\
         \tPrice >= 100            { Show }\n\
         \tPrice < 100 Price >= 10 { Show }\n\
         \tPrice < 10  Price >= 5  { Show }\n\
         \tPrice < 5               { Hide }\n\
         }\n",
        &cards_snapshot(),
    );

    let expected = "Show\n\
         \tClass == \"Divination Card\"\n\
         \tBaseType == \"Abandoned Wealth\" \"The Doctor\"\n\
         \n\
         Show\n\
         \tClass == \"Divination Card\"\n\
         \tBaseType == \"A Dab of Ink\"\n\
         \n\
         Show\n\
         \tClass == \"Divination Card\"\n\
         \tBaseType == \"Humility\"\n\
         \n\
         Hide\n\
         \tClass == \"Divination Card\"\n\
         \tBaseType == \"Rain of Chaos\"\n\
         \n";
    assert_eq!(filter, expected);
}

#[test]
fn autogen_block_with_no_matches_is_dropped() {
    let filter = generate_filter(
        "Class \"Divination Card\" Autogen cards {\n\
         \tPrice >= 100000 { Show }\n\
         }\n\
         Show\n",
        &cards_snapshot(),
    );
    assert_eq!(filter, "Show\n\n");
}

#[test]
fn minimap_icon_size_promotes_within_range() {
    let filter = generate("MinimapIcon 1 Grey Moon\nShow\n");
    assert_eq!(filter, "Show\n\tMinimapIcon 1 Grey Moon\n\n");
}

#[test]
fn shaper_voice_line_emits_without_volume() {
    let filter = generate("PlayAlertSound ShExalted\nShow\n");
    assert_eq!(filter, "Show\n\tPlayAlertSound ShExalted\n\n");
}

#[test]
fn socket_conditions_always_print_their_operator() {
    let filter = generate("SocketGroup >= 5GGG { Show }\nSockets 3 { Show }\n");
    assert_eq!(
        filter,
        "Show\n\tSocketGroup >= 5GGG\n\n\
         Show\n\tSockets = 3\n\n"
    );
}

#[test]
fn influence_none_is_emitted() {
    let filter = generate("HasInfluence None { Show }\n");
    assert_eq!(filter, "Show\n\tHasInfluence None\n\n");
}

#[test]
fn ranged_strings_emit_count_next_to_operator() {
    let filter = generate("HasExplicitMod >= 3 \"of Haast\" { Show }\n");
    assert_eq!(filter, "Show\n\tHasExplicitMod >=3 \"of Haast\"\n\n");
}

#[test]
fn constants_substitute_into_conditions_and_actions() {
    let filter = generate(
        "$card_class = \"Divination Card\"\n\
         $highlight = 255 255 0\n\
         Class $card_class {\n\
         \tSetBorderColor $highlight\n\
         \tShow\n\
         }\n",
    );
    assert_eq!(
        filter,
        "Show\n\
         \tClass \"Divination Card\"\n\
         \tSetBorderColor 255 255 0\n\n"
    );
}

#[test]
fn compound_action_applies_all_slots() {
    let filter = generate(
        "$valuable = { SetFontSize 45 PlayAlertSound 1 300 }\n\
         Rarity Unique {\n\
         \tSet $valuable\n\
         \tShow\n\
         }\n",
    );
    assert_eq!(
        filter,
        "Show\n\
         \tRarity = Unique\n\
         \tSetFontSize 45\n\
         \tPlayAlertSound 1 300\n\n"
    );
}

#[test]
fn discard_blocks_never_reach_the_output() {
    let filter = generate(
        "Class \"Boots\" { ShowDiscard }\n\
         Show\n",
    );
    assert_eq!(filter, "Show\n\n");
}

#[test]
fn fractional_version_and_config_preamble_are_accepted() {
    let filter = generate(
        "version: 1.2.3\n\
         config: { opt: yes }\n\
         Quality > 0 { Show }\n",
    );
    assert_eq!(filter, "Show\n\tQuality > 0\n\n");
}

#[test]
fn preamble_names_version_and_league() {
    use chrono::{TimeZone, Utc};
    use filter_spirit::lang::market::{DataSource, ItemPriceMetadata};

    let metadata = ItemPriceMetadata {
        league_name: "Ritual".to_string(),
        data_source: DataSource::Ninja,
        download_date: Utc.with_ymd_and_hms(2021, 1, 20, 12, 0, 0).unwrap(),
    };
    let mut diagnostics = DiagnosticsStore::new();
    let output = filter_spirit::generate_filter(
        "Show\n",
        &ItemPriceData::default(),
        Some(&metadata),
        Settings::default(),
        &mut diagnostics,
    )
    .expect("generation failed");

    let mut lines = output.lines();
    let first = lines.next().expect("missing preamble");
    assert!(first.starts_with("# Generated by Filter Spirit"));
    let second = lines.next().expect("missing snapshot line");
    assert!(second.contains("Ritual"));
    assert!(second.contains("ninja"));
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.next(), Some("Show"));
}

#[test]
fn generation_is_deterministic() {
    let source = "Class \"Divination Card\" Autogen cards {\n\
                  \tPrice >= 10 { Show }\n\
                  \tPrice < 10 { Hide }\n\
                  }\n";
    let first = generate_filter(source, &cards_snapshot());
    let second = generate_filter(source, &cards_snapshot());
    assert_eq!(first, second);
}
