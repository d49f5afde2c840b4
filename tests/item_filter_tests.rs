//! Passing items through compiled real filters: first-match semantics,
//! style resolution and the socket condition matrix.

mod common;

use common::compile_real;
use filter_spirit::generator::emit_filter;
use filter_spirit::lang::item::SocketInfo;
use filter_spirit::lang::{pass_item_through_filter, Item, Rarity, Visibility};

fn socket_item(text: &str) -> Item {
    Item {
        sockets: SocketInfo::parse(text).expect("bad socket text"),
        ..Item::default()
    }
}

/// Whether an item with the given sockets is caught by a one-block
/// filter with the given condition line.
fn caught_by(condition_line: &str, sockets: &str) -> bool {
    let source = format!("Show\n\t{}\n\tPlayEffect Yellow\n", condition_line);
    let filter = compile_real(&source);
    let item = if sockets.is_empty() {
        Item::default()
    } else {
        socket_item(sockets)
    };
    let result = pass_item_through_filter(&item, &filter);
    result.style.actions.play_effect.is_some()
}

#[test]
fn first_matching_block_decides_the_style() {
    let filter = compile_real(
        "Show\n\tQuality >= 15\n\tSetFontSize 45\n\
         Show\n\tQuality >= 5\n\tSetFontSize 30\n\
         Hide\n",
    );

    let high = Item {
        quality: 18,
        ..Item::default()
    };
    let result = pass_item_through_filter(&high, &filter);
    assert_eq!(result.matched_block, Some(0));
    assert_eq!(result.style.actions.font_size.map(|f| f.size), Some(45));

    let mid = Item {
        quality: 7,
        ..Item::default()
    };
    let result = pass_item_through_filter(&mid, &filter);
    assert_eq!(result.matched_block, Some(1));

    let low = Item::default();
    let result = pass_item_through_filter(&low, &filter);
    assert_eq!(result.matched_block, Some(2));
    assert_eq!(result.style.visibility, Visibility::Hide);
}

#[test]
fn no_block_matches_returns_none() {
    let filter = compile_real("Show\n\tRarity Unique\n");
    let result = pass_item_through_filter(&Item::default(), &filter);
    assert_eq!(result.matched_block, None);
}

#[test]
fn rarity_uses_the_enum_order() {
    let filter = compile_real("Show\n\tRarity >= Rare\n");
    let rare = Item {
        rarity: Rarity::Rare,
        ..Item::default()
    };
    let unique = Item {
        rarity: Rarity::Unique,
        ..Item::default()
    };
    let magic = Item {
        rarity: Rarity::Magic,
        ..Item::default()
    };
    assert!(pass_item_through_filter(&rare, &filter).matched_block.is_some());
    assert!(pass_item_through_filter(&unique, &filter).matched_block.is_some());
    assert!(pass_item_through_filter(&magic, &filter).matched_block.is_none());
}

#[test]
fn exact_string_matching_requires_equality() {
    let filter = compile_real("Show\n\tBaseType == \"Sorcerer Boots\"\n");
    let exact = Item {
        base_type: "Sorcerer Boots".to_string(),
        ..Item::default()
    };
    let superstring = Item {
        base_type: "Grand Sorcerer Boots".to_string(),
        ..Item::default()
    };
    assert!(pass_item_through_filter(&exact, &filter).matched_block.is_some());
    assert!(pass_item_through_filter(&superstring, &filter).matched_block.is_none());

    let loose = compile_real("Show\n\tBaseType \"Sorcerer Boots\"\n");
    assert!(pass_item_through_filter(&superstring, &loose).matched_block.is_some());
}

// The socket matrix mirrors the game's behavior, including the cases
// that make `<` read like "below in some dimension".

#[test]
fn no_sockets_socket_conditions() {
    assert!(!caught_by("Sockets < 0", ""));
    assert!(caught_by("Sockets < 1", ""));
    assert!(caught_by("Sockets < 1RGB", ""));
    assert!(caught_by("Sockets < RGB", ""));
    assert!(caught_by("Sockets <= 1", ""));
    assert!(caught_by("SocketGroup < 1", ""));
    assert!(caught_by("SocketGroup <= 0", ""));
    assert!(caught_by("SocketGroup 0", ""));
    assert!(caught_by("SocketGroup == 0", ""));
    assert!(!caught_by("SocketGroup < 0", ""));

    assert!(!caught_by("Sockets > 0", ""));
    assert!(!caught_by("Sockets > 0R", ""));
    assert!(caught_by("Sockets >= 0", ""));
    assert!(!caught_by("Sockets >= 0R", ""));
}

#[test]
fn linked_red_pair_needs_one_group() {
    assert!(caught_by("SocketGroup > 1R", "B-B R R"));
    assert!(!caught_by("SocketGroup > 2R", "B-B R R"));
    assert!(caught_by("SocketGroup > 2R", "B B R-R"));
    assert!(caught_by("SocketGroup >= 2R", "B B R-R"));
    assert!(!caught_by("SocketGroup >= 2R", "B-B R R"));
}

#[test]
fn four_link_below_five_rr() {
    // 4 sockets with 3 red: below 5RR in the count dimension only
    assert!(caught_by("Sockets < 5RR", "R-R-R-G"));
    assert!(!caught_by("Sockets <= 5RR", "R-R-R-G"));
    assert!(caught_by("SocketGroup < 5RR", "R-R-R-G"));
    assert!(!caught_by("SocketGroup <= 5RR", "R-R-R-G"));
}

#[test]
fn six_link_below_five_ggg() {
    assert!(caught_by("Sockets < 5GGG", "R-R-R-R-G-B"));
    assert!(!caught_by("Sockets <= 5GGG", "R-R-R-R-G-B"));
}

#[test]
fn five_socket_exact_green_matrix() {
    // 5 sockets, exactly 3 green
    for condition in ["Sockets 5GGG", "Sockets == 5GGG", "Sockets <= 5GGG", "Sockets >= 5GGG"] {
        assert!(caught_by(condition, "W-G-G-G-R"), "{}", condition);
    }
    assert!(!caught_by("Sockets < 5GGG", "W-G-G-G-R"));
    assert!(!caught_by("Sockets > 5GGG", "W-G-G-G-R"));

    // 5 sockets, 4 green: soft equal yes, exact no
    assert!(caught_by("Sockets 5GGG", "G-G-W-G-G"));
    assert!(!caught_by("Sockets == 5GGG", "G-G-W-G-G"));
    assert!(caught_by("Sockets > 5GGG", "G-G-W-G-G"));
}

#[test]
fn sockets_count_across_groups_socket_group_does_not() {
    // 6 sockets, 3 green spread over a 5-link and a loose socket
    assert!(caught_by("Sockets >= 5GGG", "W-G-B-G-R G"));
    assert!(!caught_by("Sockets 5GGG", "W-G-B-G-R G"));
    assert!(caught_by("SocketGroup < 5GGG", "W-G-B-G-R G"));
    assert!(!caught_by("SocketGroup >= 5GGG", "W-G-B-G-R G"));

    // same shape but the greens are linked together
    assert!(caught_by("SocketGroup 5GGG", "W-G-G-G-R G"));
    assert!(caught_by("SocketGroup >= 5GGG", "W-G-G-G-R G"));
    assert!(!caught_by("SocketGroup > 5GGG", "W-G-G-G-R G"));
}

#[test]
fn greater_matches_when_any_dimension_exceeds() {
    assert!(caught_by("Sockets > 4RG", "B-B-B-B-B"));
    assert!(caught_by("Sockets > 4RG", "R-R"));
    assert!(caught_by("Sockets > 4RG", "R R"));
    assert!(!caught_by("SocketGroup > 4RG", "R R"));
    assert!(!caught_by("Sockets > 4RG", "R-G"));
    assert!(!caught_by("Sockets > 4RG", "R-G-B-B"));
    assert!(caught_by("Sockets > 4RG", "R-G-B-B B"));
}

#[test]
fn influence_subset_and_exact_matching() {
    let filter = compile_real("Show\n\tHasInfluence Shaper\n");
    let both = Item {
        influence: filter_spirit::lang::InfluenceFlags {
            shaper: true,
            elder: true,
            ..Default::default()
        },
        ..Item::default()
    };
    assert!(pass_item_through_filter(&both, &filter).matched_block.is_some());

    let exact = compile_real("Show\n\tHasInfluence == Shaper\n");
    assert!(pass_item_through_filter(&both, &exact).matched_block.is_none());

    let none = compile_real("Show\n\tHasInfluence None\n");
    assert!(pass_item_through_filter(&Item::default(), &none).matched_block.is_some());
    assert!(pass_item_through_filter(&both, &none).matched_block.is_none());
}

#[test]
fn has_explicit_mod_counts_against_the_range() {
    let filter = compile_real("Show\n\tHasExplicitMod >=2 \"Tyrannical\" \"of Haast\"\n");
    let one = Item {
        explicit_mods: vec!["Tyrannical".to_string()],
        ..Item::default()
    };
    let two = Item {
        explicit_mods: vec!["Tyrannical".to_string(), "of Haast".to_string()],
        ..Item::default()
    };
    assert!(pass_item_through_filter(&one, &filter).matched_block.is_none());
    assert!(pass_item_through_filter(&two, &filter).matched_block.is_some());
}

#[test]
fn real_filter_emission_round_trips() {
    let source = "Show\n\
                  \tItemLevel >= 60\n\
                  \tRarity <= Rare\n\
                  \tClass == \"Boots\"\n\
                  \tSockets >= 4\n\
                  \tSetTextColor 200 200 200\n\
                  \tSetFontSize 36\n\
                  \n\
                  Hide\n\
                  \tIdentified True\n\
                  \n";
    let first = compile_real(source);
    let emitted = emit_filter(&first);
    let second = compile_real(&emitted);
    // block structure survives modulo source ranges, so the emitted
    // text is the fixed point
    assert_eq!(emit_filter(&second), emitted);
    assert_eq!(first.blocks.len(), second.blocks.len());
}
