use crate::lang::action_set::ActionSet;
use crate::lang::condition_set::{
    ConditionSet, RangeCondition, RangedStringsCondition, SocketSpecCondition, StringsCondition,
};
use crate::lang::item::{Item, SocketColor, SocketInfo};
use crate::lang::types::{AutogenCategory, ComparisonOp, SocketSpec, Visibility};
use crate::token::Span;

/// A fully materialized filter block in the native format.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFilterBlock {
    pub visibility: Visibility,
    pub visibility_origin: Span,
    pub conditions: ConditionSet,
    pub actions: ActionSet,
}

impl ItemFilterBlock {
    /// Emit this block as native filter text, followed by a blank line.
    pub fn generate(&self, output: &mut String) {
        output.push_str(self.visibility.as_keyword());
        output.push('\n');
        self.conditions.generate(output);
        self.actions.generate(output);
        output.push('\n');
    }
}

/// Autogeneration request attached to a compiled spirit filter block.
#[derive(Debug, Clone, PartialEq)]
pub struct AutogenExtension {
    pub category: AutogenCategory,
    pub price_range: RangeCondition<f64>,
    pub origin: Span,
}

/// A compiled spirit filter block: a native block plus the optional
/// autogeneration extension resolved later against market data.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiritFilterBlock {
    pub block: ItemFilterBlock,
    pub autogen: Option<AutogenExtension>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemFilter {
    pub blocks: Vec<ItemFilterBlock>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpiritFilter {
    pub blocks: Vec<SpiritFilterBlock>,
}

/// The look and sound an item ends up with after passing through a
/// filter: the winning block's visibility and action set, or defaults
/// when nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStyle {
    pub visibility: Visibility,
    pub actions: ActionSet,
}

impl Default for ItemStyle {
    fn default() -> Self {
        ItemStyle {
            visibility: Visibility::Show,
            actions: ActionSet::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemFilteringResult {
    /// Index of the first matching block, if any.
    pub matched_block: Option<usize>,
    pub style: ItemStyle,
}

/// Iterate blocks in order; the first whose condition set is satisfied
/// by the item wins.
pub fn pass_item_through_filter(item: &Item, filter: &ItemFilter) -> ItemFilteringResult {
    for (index, block) in filter.blocks.iter().enumerate() {
        if conditions_match_item(&block.conditions, item) {
            let mut style = ItemStyle {
                visibility: block.visibility,
                actions: ActionSet::default(),
            };
            style.actions.override_with(&block.actions);
            return ItemFilteringResult {
                matched_block: Some(index),
                style,
            };
        }
    }

    ItemFilteringResult {
        matched_block: None,
        style: ItemStyle::default(),
    }
}

pub fn conditions_match_item(conditions: &ConditionSet, item: &Item) -> bool {
    conditions.item_level.includes(item.item_level)
        && conditions.drop_level.includes(item.drop_level)
        && conditions.quality.includes(item.quality)
        && conditions.rarity.includes(item.rarity)
        && conditions.linked_sockets.includes(item.sockets.links())
        && conditions.height.includes(item.height)
        && conditions.width.includes(item.width)
        && conditions.stack_size.includes(item.stack_size)
        && conditions.gem_level.includes(item.gem_level)
        && conditions.map_tier.includes(item.map_tier)
        && conditions.area_level.includes(item.area_level)
        && conditions.corrupted_mods.includes(item.corrupted_mods)
        && conditions
            .enchantment_passive_num
            .includes(item.enchantments_passive_nodes.len() as i32)
        && gem_quality_type_matches(conditions, item)
        && socket_condition_matches(&conditions.sockets, item, false)
        && socket_condition_matches(&conditions.socket_group, item, true)
        && boolean_matches(&conditions.is_identified, item.is_identified)
        && boolean_matches(&conditions.is_corrupted, item.is_corrupted)
        && boolean_matches(&conditions.is_mirrored, item.is_mirrored)
        && boolean_matches(&conditions.is_elder_item, item.influence.elder)
        && boolean_matches(&conditions.is_shaper_item, item.influence.shaper)
        && boolean_matches(&conditions.is_fractured_item, item.is_fractured_item)
        && boolean_matches(&conditions.is_synthesised_item, item.is_synthesised_item)
        && boolean_matches(&conditions.is_enchanted, item.is_enchanted())
        && boolean_matches(&conditions.is_shaped_map, item.is_shaped_map)
        && boolean_matches(&conditions.is_elder_map, item.is_elder_map)
        && boolean_matches(&conditions.is_blighted_map, item.is_blighted_map)
        && boolean_matches(&conditions.is_replica, item.is_replica)
        && boolean_matches(&conditions.is_alternate_quality, item.is_alternate_quality)
        && single_string_matches(&conditions.class, &item.class)
        && single_string_matches(&conditions.base_type, &item.base_type)
        && prophecy_matches(&conditions.prophecy, item)
        && any_string_matches(
            &conditions.enchantment_passive_node,
            &item.enchantments_passive_nodes,
        )
        && any_string_matches(&conditions.archnemesis_mod, &item.archnemesis_mods)
        && ranged_strings_match(&conditions.has_explicit_mod, &item.explicit_mods)
        && ranged_strings_match(&conditions.has_enchantment, &item.enchantments_labyrinth)
        && influence_matches(conditions, item)
}

fn boolean_matches(
    condition: &Option<crate::lang::condition_set::BooleanCondition>,
    item_value: bool,
) -> bool {
    match condition {
        Some(condition) => condition.value == item_value,
        None => true,
    }
}

fn single_string_matches(condition: &Option<StringsCondition>, value: &str) -> bool {
    match condition {
        Some(condition) => condition.find_match(value).is_some(),
        None => true,
    }
}

fn prophecy_matches(condition: &Option<StringsCondition>, item: &Item) -> bool {
    match condition {
        Some(condition) => item.is_prophecy && condition.find_match(&item.base_type).is_some(),
        None => true,
    }
}

fn any_string_matches(condition: &Option<StringsCondition>, values: &[String]) -> bool {
    match condition {
        Some(condition) => values.iter().any(|v| condition.find_match(v).is_some()),
        None => true,
    }
}

fn ranged_strings_match(condition: &Option<RangedStringsCondition>, values: &[String]) -> bool {
    match condition {
        Some(condition) => {
            let matching = values
                .iter()
                .filter(|v| condition.strings.find_match(v).is_some())
                .count() as i32;
            if condition.count.has_bound() {
                condition.count.includes(matching)
            } else {
                matching >= 1
            }
        }
        None => true,
    }
}

fn gem_quality_type_matches(conditions: &ConditionSet, item: &Item) -> bool {
    match &conditions.gem_quality_type {
        Some(condition) => condition.values.contains(&item.gem_quality_type),
        None => true,
    }
}

fn influence_matches(conditions: &ConditionSet, item: &Item) -> bool {
    match &conditions.has_influence {
        Some(condition) => {
            if condition.influence.is_none() {
                item.influence.is_none()
            } else if condition.exact_match {
                condition.influence == item.influence
            } else {
                condition.influence.is_subset_of(&item.influence)
            }
        }
        None => true,
    }
}

// ============================================================================
// Socket condition semantics
// ============================================================================

// A socket spec is compared dimension-wise. Its dimensions are the
// optional socket count plus each letter with a non-zero requirement.
// `<` and `>` hold when SOME dimension of the item is strictly
// below/above the spec; `<=` and `>=` when EVERY dimension is at or
// below/above it. Soft equality requires the exact count (when present)
// and at least the required letters; `==` requires exact letter counts.

struct SocketDimensions {
    /// (item value, spec value) per dimension.
    pairs: Vec<(i32, i32)>,
    /// The pair for the count dimension, when the spec has one.
    count: Option<(i32, i32)>,
}

fn letter_counts(spec: &SocketSpec) -> [(SocketColor, u8); 6] {
    [
        (SocketColor::R, spec.r),
        (SocketColor::G, spec.g),
        (SocketColor::B, spec.b),
        (SocketColor::W, spec.w),
        (SocketColor::A, spec.a),
        (SocketColor::D, spec.d),
    ]
}

fn dimensions(
    spec: &SocketSpec,
    item_total: i32,
    item_count_of: impl Fn(SocketColor) -> i32,
) -> SocketDimensions {
    let mut pairs = Vec::new();
    let mut count = None;

    if let Some(required) = spec.count {
        pairs.push((item_total, required));
        count = Some((item_total, required));
    }
    for (color, required) in letter_counts(spec) {
        if required > 0 {
            pairs.push((item_count_of(color), i32::from(required)));
        }
    }

    SocketDimensions { pairs, count }
}

fn spec_satisfied(comparison: ComparisonOp, dims: &SocketDimensions) -> bool {
    match comparison {
        ComparisonOp::Less => dims.pairs.iter().any(|(item, spec)| item < spec),
        ComparisonOp::LessEqual => dims.pairs.iter().all(|(item, spec)| item <= spec),
        ComparisonOp::Greater => dims.pairs.iter().any(|(item, spec)| item > spec),
        ComparisonOp::GreaterEqual => dims.pairs.iter().all(|(item, spec)| item >= spec),
        ComparisonOp::Equal => {
            dims.count.map_or(true, |(item, spec)| item == spec)
                && letter_dims(dims).all(|(item, spec)| item >= spec)
        }
        ComparisonOp::ExactMatch => {
            dims.count.map_or(true, |(item, spec)| item == spec)
                && letter_dims(dims).all(|(item, spec)| item == spec)
        }
        // not part of the socket grammar; treat as negated soft equality
        ComparisonOp::NotEqual => !spec_satisfied(ComparisonOp::Equal, dims),
    }
}

fn letter_dims(dims: &SocketDimensions) -> impl Iterator<Item = (i32, i32)> + '_ {
    let skip_first = dims.count.is_some();
    dims.pairs.iter().copied().skip(usize::from(skip_first))
}

fn socket_condition_matches(
    condition: &Option<SocketSpecCondition>,
    item: &Item,
    links_matter: bool,
) -> bool {
    let Some(condition) = condition else {
        return true;
    };

    condition.values.iter().any(|spec| {
        if links_matter {
            socket_group_spec_matches(condition.comparison, spec, &item.sockets)
        } else {
            let dims = dimensions(spec, item.sockets.sockets(), |color| {
                item.sockets.count_of(color)
            });
            spec_satisfied(condition.comparison, &dims)
        }
    })
}

fn socket_group_spec_matches(
    comparison: ComparisonOp,
    spec: &SocketSpec,
    sockets: &SocketInfo,
) -> bool {
    if sockets.groups.is_empty() {
        // an unsocketed item behaves as if it had a single empty group
        let dims = dimensions(spec, 0, |_| 0);
        return spec_satisfied(comparison, &dims);
    }

    sockets.groups.iter().any(|group| {
        let dims = dimensions(spec, group.len() as i32, |color| group.count_of(color));
        spec_satisfied(comparison, &dims)
    })
}
