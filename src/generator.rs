//! Autogeneration expansion against a market data snapshot and final
//! emission of native filter text.

use std::fmt::Write;

use crate::diagnostics::{DiagnosticId, DiagnosticsStore};
use crate::lang::condition_set::{
    BooleanCondition, RangeCondition, StringsCondition,
};
use crate::lang::item_filter::{ItemFilter, ItemFilterBlock, SpiritFilter, SpiritFilterBlock};
use crate::lang::market::{
    BaseItem, ElementaryItem, Gem, ItemPriceData, ItemPriceMetadata, UniqueItemPriceData,
};
use crate::lang::types::{AutogenCategory, Rarity};
use crate::token::Span;

/// Expand every autogen block against the snapshot and drop blocks
/// whose condition sets end up unable to match anything.
pub fn make_item_filter(
    filter: &SpiritFilter,
    item_price_data: &ItemPriceData,
    diagnostics: &mut DiagnosticsStore,
) -> ItemFilter {
    let mut blocks = Vec::with_capacity(filter.blocks.len());
    for template in &filter.blocks {
        if let Some(block) = make_filter_block(template, item_price_data, diagnostics) {
            if block.conditions.is_valid() {
                blocks.push(block);
            }
        }
    }
    ItemFilter { blocks }
}

fn make_filter_block(
    template: &SpiritFilterBlock,
    data: &ItemPriceData,
    diagnostics: &mut DiagnosticsStore,
) -> Option<ItemFilterBlock> {
    let autogen = match &template.autogen {
        Some(autogen) => autogen,
        None => return Some(template.block.clone()),
    };

    let mut block = template.block.clone();
    let origin = autogen.origin;
    let price_range = autogen.price_range;

    // the user's own BaseType condition acts as an allow-list over the
    // synthesized names
    let prefilter = block.conditions.base_type.clone();
    let allowed =
        |name: &str| prefilter.as_ref().map_or(true, |c| c.find_match(name).is_some());

    let in_range = |item: &ElementaryItem| {
        price_range.includes(item.price.chaos_value) && !item.price.is_low_confidence
    };

    let names_condition = |strings: Vec<String>| StringsCondition {
        strings,
        // generated data contains full names; substring matching could
        // catch unrelated items whose name embeds another
        exact_match: true,
        origin,
    };

    let basic = |items: &[ElementaryItem]| {
        names_condition(
            items
                .iter()
                .filter(|item| in_range(item) && allowed(&item.name))
                .map(|item| item.name.clone())
                .collect(),
        )
    };

    let class_condition = |names: &[&str]| StringsCondition {
        strings: names.iter().map(|s| s.to_string()).collect(),
        exact_match: true,
        origin,
    };

    let unambiguous = |items: &UniqueItemPriceData| {
        names_condition(
            items
                .unambiguous
                .iter()
                .filter(|(base, item)| in_range(item) && allowed(base))
                .map(|(base, _)| base.clone())
                .collect(),
        )
    };

    // a base type is selected when any of its uniques is in range
    let ambiguous = |items: &UniqueItemPriceData| {
        names_condition(
            items
                .ambiguous
                .iter()
                .filter(|(base, uniques)| uniques.iter().any(|item| in_range(item)) && allowed(base))
                .map(|(base, _)| base.clone())
                .collect(),
        )
    };

    use AutogenCategory as C;
    match autogen.category {
        C::Currency => block.conditions.base_type = Some(basic(&data.currency)),
        C::Fragments => block.conditions.base_type = Some(basic(&data.fragments)),
        C::DeliriumOrbs => block.conditions.base_type = Some(basic(&data.delirium_orbs)),
        C::Cards => {
            let items: Vec<ElementaryItem> =
                data.divination_cards.iter().map(|c| c.item.clone()).collect();
            block.conditions.base_type = Some(basic(&items));
        }
        C::Prophecies => block.conditions.prophecy = Some(basic(&data.prophecies)),
        C::Essences => block.conditions.base_type = Some(basic(&data.essences)),
        C::Fossils => block.conditions.base_type = Some(basic(&data.fossils)),
        C::Resonators => block.conditions.base_type = Some(basic(&data.resonators)),
        C::Scarabs => block.conditions.base_type = Some(basic(&data.scarabs)),
        C::Incubators => block.conditions.base_type = Some(basic(&data.incubators)),
        C::Oils => block.conditions.base_type = Some(basic(&data.oils)),
        C::Vials => block.conditions.base_type = Some(basic(&data.vials)),

        C::Gems => {
            let names = gem_names(&block, &data.gems, price_range, origin, &allowed, diagnostics)?;
            block.conditions.base_type = Some(names_condition(names));
        }

        C::Bases => {
            let names = base_names(&block, &data.bases, price_range, origin, &allowed, diagnostics)?;
            block.conditions.base_type = Some(names_condition(names));
            block.conditions.is_corrupted = Some(BooleanCondition {
                value: false,
                origin,
            });
            block.conditions.is_mirrored = Some(BooleanCondition {
                value: false,
                origin,
            });
            if !block.conditions.rarity.has_bound() {
                block.conditions.rarity.set_lower_bound(Rarity::Normal, true, origin);
                block.conditions.rarity.set_upper_bound(Rarity::Rare, true, origin);
            }
        }

        C::UniquesEqUnambiguous => block.conditions.base_type = Some(unambiguous(&data.unique_eq)),
        C::UniquesEqAmbiguous => block.conditions.base_type = Some(ambiguous(&data.unique_eq)),
        C::UniquesFlasksUnambiguous => {
            block.conditions.base_type = Some(unambiguous(&data.unique_flasks))
        }
        C::UniquesFlasksAmbiguous => {
            block.conditions.base_type = Some(ambiguous(&data.unique_flasks))
        }
        C::UniquesJewelsUnambiguous => {
            block.conditions.base_type = Some(unambiguous(&data.unique_jewels))
        }
        C::UniquesJewelsAmbiguous => {
            block.conditions.base_type = Some(ambiguous(&data.unique_jewels))
        }
        C::UniquesMapsUnambiguous => {
            block.conditions.base_type = Some(unambiguous(&data.unique_maps))
        }
        C::UniquesMapsAmbiguous => block.conditions.base_type = Some(ambiguous(&data.unique_maps)),
    }

    // category-standard class and rarity conditions
    if let Some(names) = autogen.category.class_names() {
        if autogen.category == C::Gems {
            if block.conditions.class.is_none() {
                block.conditions.class = Some(class_condition(names));
            }
        } else {
            block.conditions.class = Some(class_condition(names));
        }
    }
    if autogen.category.is_uniques() {
        block.conditions.rarity = RangeCondition::exact(Rarity::Unique, origin);
    }

    Some(block)
}

fn push_missing_condition(
    diagnostics: &mut DiagnosticsStore,
    origin: Span,
    condition: &str,
    category: &str,
) {
    diagnostics.push_error(
        DiagnosticId::AutogenError,
        origin,
        format!(
            "autogeneration error: missing {} condition required by the {} category",
            condition, category
        ),
    );
}

fn gem_names(
    block: &ItemFilterBlock,
    gems: &[Gem],
    price_range: RangeCondition<f64>,
    origin: Span,
    allowed: &dyn Fn(&str) -> bool,
    diagnostics: &mut DiagnosticsStore,
) -> Option<Vec<String>> {
    let conditions = &block.conditions;
    if !conditions.gem_level.has_bound() {
        push_missing_condition(diagnostics, origin, "GemLevel", "gems");
        return None;
    }
    if !conditions.quality.has_bound() {
        push_missing_condition(diagnostics, origin, "Quality", "gems");
        return None;
    }
    let corrupted = match &conditions.is_corrupted {
        Some(condition) => condition.value,
        None => {
            push_missing_condition(diagnostics, origin, "Corrupted", "gems");
            return None;
        }
    };

    Some(
        gems.iter()
            .filter(|gem| {
                price_range.includes(gem.item.price.chaos_value)
                    && !gem.item.price.is_low_confidence
                    && conditions.gem_level.includes(gem.level)
                    && conditions.quality.includes(gem.quality)
                    && gem.is_corrupted == corrupted
                    && allowed(&gem.item.name)
            })
            .map(|gem| gem.item.name.clone())
            .collect(),
    )
}

fn base_names(
    block: &ItemFilterBlock,
    bases: &[BaseItem],
    price_range: RangeCondition<f64>,
    origin: Span,
    allowed: &dyn Fn(&str) -> bool,
    diagnostics: &mut DiagnosticsStore,
) -> Option<Vec<String>> {
    let conditions = &block.conditions;
    if !conditions.item_level.has_bound() {
        push_missing_condition(diagnostics, origin, "ItemLevel", "bases");
        return None;
    }
    let influence = match &conditions.has_influence {
        Some(condition) if condition.exact_match => condition.influence,
        Some(condition) => {
            diagnostics.push_error(
                DiagnosticId::AutogenError,
                condition.origin,
                "autogeneration error: the HasInfluence condition must require exact matching (\"==\") under the bases category",
            );
            return None;
        }
        None => {
            push_missing_condition(diagnostics, origin, "HasInfluence", "bases");
            return None;
        }
    };

    Some(
        bases
            .iter()
            .filter(|base| {
                price_range.includes(base.item.price.chaos_value)
                    && !base.item.price.is_low_confidence
                    && conditions.item_level.includes(base.item_level)
                    && base.influence == influence
                    && allowed(&base.item.name)
            })
            .map(|base| base.item.name.clone())
            .collect(),
    )
}

// ============================================================================
// Emission
// ============================================================================

/// Serialize blocks to the native format. Discard blocks and blocks
/// with empty string lists are omitted.
pub fn emit_filter(filter: &ItemFilter) -> String {
    let mut output = String::new();
    for block in &filter.blocks {
        if block.visibility.is_discard() || !block.conditions.is_valid() {
            continue;
        }
        block.generate(&mut output);
    }
    output
}

/// Same, preceded by a comment preamble naming the program version and
/// the snapshot the filter was generated from.
pub fn emit_filter_with_preamble(
    filter: &ItemFilter,
    metadata: Option<&ItemPriceMetadata>,
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Generated by Filter Spirit {}", crate::VERSION);
    if let Some(metadata) = metadata {
        let _ = writeln!(
            output,
            "# League: {}, data source: {}, downloaded: {}",
            metadata.league_name,
            metadata.data_source.as_str(),
            metadata.download_date.to_rfc3339()
        );
    }
    output.push('\n');
    output.push_str(&emit_filter(filter));
    output
}
