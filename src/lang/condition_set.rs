use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::lang::keywords;
use crate::lang::types::{AutogenCategory, ComparisonOp, GemQualityType, Rarity, SocketSpec};
use crate::token::Span;

// ============================================================================
// Range conditions
// ============================================================================

/// Values usable as range condition bounds.
pub trait RangeValue: Copy + PartialOrd {
    fn write_filter_value(self, output: &mut String);
}

impl RangeValue for i32 {
    fn write_filter_value(self, output: &mut String) {
        let _ = write!(output, "{}", self);
    }
}

impl RangeValue for f64 {
    fn write_filter_value(self, output: &mut String) {
        let _ = write!(output, "{}", self);
    }
}

impl RangeValue for Rarity {
    fn write_filter_value(self, output: &mut String) {
        output.push_str(self.as_keyword());
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBound<T> {
    pub value: T,
    pub inclusive: bool,
    pub origin: Span,
}

/// Ordered pair of optional bounds. An "exact" condition sets both to the
/// same inclusive bound. An empty range (lower above upper) is valid and
/// simply matches no item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCondition<T> {
    pub lower_bound: Option<RangeBound<T>>,
    pub upper_bound: Option<RangeBound<T>>,
}

impl<T> Default for RangeCondition<T> {
    fn default() -> Self {
        RangeCondition {
            lower_bound: None,
            upper_bound: None,
        }
    }
}

impl<T: RangeValue> RangeCondition<T> {
    pub fn new() -> Self {
        RangeCondition {
            lower_bound: None,
            upper_bound: None,
        }
    }

    pub fn exact(value: T, origin: Span) -> Self {
        let mut range = Self::new();
        range.set_exact(value, origin);
        range
    }

    pub fn has_bound(&self) -> bool {
        self.lower_bound.is_some() || self.upper_bound.is_some()
    }

    pub fn is_exact(&self) -> bool {
        match (&self.lower_bound, &self.upper_bound) {
            (Some(lower), Some(upper)) => {
                lower.value == upper.value && lower.inclusive && upper.inclusive
            }
            _ => false,
        }
    }

    /// Whether `value` fits into the currently specified range.
    pub fn includes(&self, value: T) -> bool {
        if let Some(lower) = &self.lower_bound {
            if lower.value > value {
                return false;
            }
            if lower.value == value && !lower.inclusive {
                return false;
            }
        }

        if let Some(upper) = &self.upper_bound {
            if upper.value < value {
                return false;
            }
            if upper.value == value && !upper.inclusive {
                return false;
            }
        }

        true
    }

    pub fn set_exact(&mut self, value: T, origin: Span) {
        let bound = RangeBound {
            value,
            inclusive: true,
            origin,
        };
        self.lower_bound = Some(bound);
        self.upper_bound = Some(bound);
    }

    pub fn set_lower_bound(&mut self, value: T, inclusive: bool, origin: Span) {
        self.lower_bound = Some(RangeBound {
            value,
            inclusive,
            origin,
        });
    }

    pub fn set_upper_bound(&mut self, value: T, inclusive: bool, origin: Span) {
        self.upper_bound = Some(RangeBound {
            value,
            inclusive,
            origin,
        });
    }

    pub fn first_origin(&self) -> Option<Span> {
        match (&self.lower_bound, &self.upper_bound) {
            (Some(lower), Some(upper)) => {
                if lower.origin.start <= upper.origin.start {
                    Some(lower.origin)
                } else {
                    Some(upper.origin)
                }
            }
            (Some(lower), None) => Some(lower.origin),
            (None, Some(upper)) => Some(upper.origin),
            (None, None) => None,
        }
    }

    pub fn second_origin(&self) -> Option<Span> {
        match (&self.lower_bound, &self.upper_bound) {
            (Some(lower), Some(upper)) => {
                if lower.origin.start <= upper.origin.start {
                    Some(upper.origin)
                } else {
                    Some(lower.origin)
                }
            }
            _ => None,
        }
    }

    fn generate(&self, keyword: &str, output: &mut String) {
        if !self.has_bound() {
            return;
        }

        if self.is_exact() {
            if let Some(bound) = &self.lower_bound {
                let _ = write!(output, "\t{} = ", keyword);
                bound.value.write_filter_value(output);
                output.push('\n');
            }
            return;
        }

        if let Some(bound) = &self.lower_bound {
            let op = if bound.inclusive { ">=" } else { ">" };
            let _ = write!(output, "\t{} {} ", keyword, op);
            bound.value.write_filter_value(output);
            output.push('\n');
        }

        if let Some(bound) = &self.upper_bound {
            let op = if bound.inclusive { "<=" } else { "<" };
            let _ = write!(output, "\t{} {} ", keyword, op);
            bound.value.write_filter_value(output);
            output.push('\n');
        }
    }
}

// ============================================================================
// Non-range condition records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BooleanCondition {
    pub value: bool,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringsCondition {
    pub strings: Vec<String>,
    pub exact_match: bool,
    pub origin: Span,
}

impl StringsCondition {
    /// First string satisfied by `value`: full equality under exact
    /// matching, substring containment otherwise.
    pub fn find_match(&self, value: &str) -> Option<&String> {
        self.strings.iter().find(|requirement| {
            if self.exact_match {
                value == requirement.as_str()
            } else {
                value.contains(requirement.as_str())
            }
        })
    }

    fn generate(&self, keyword: &str, output: &mut String) {
        let _ = write!(output, "\t{}", keyword);
        if self.exact_match {
            output.push_str(" ==");
        }
        for string in &self.strings {
            let _ = write!(output, " \"{}\"", string);
        }
        output.push('\n');
    }
}

/// String list plus an integer range over the count of matching mods.
#[derive(Debug, Clone, PartialEq)]
pub struct RangedStringsCondition {
    pub strings: StringsCondition,
    pub count: RangeCondition<i32>,
}

impl RangedStringsCondition {
    fn generate(&self, keyword: &str, output: &mut String) {
        let _ = write!(output, "\t{}", keyword);

        // unlike plain range conditions the integer sits right after the
        // operator and only one bound can be active when not exact
        if self.count.has_bound() {
            if self.count.is_exact() {
                if let Some(bound) = &self.count.lower_bound {
                    let op = if self.strings.exact_match { "==" } else { "=" };
                    let _ = write!(output, " {}{}", op, bound.value);
                }
            } else if let Some(bound) = &self.count.lower_bound {
                let op = if bound.inclusive { ">=" } else { ">" };
                let _ = write!(output, " {}{}", op, bound.value);
            } else if let Some(bound) = &self.count.upper_bound {
                let op = if bound.inclusive { "<=" } else { "<" };
                let _ = write!(output, " {}{}", op, bound.value);
            }
        } else if self.strings.exact_match {
            output.push_str(" ==");
        }

        for string in &self.strings.strings {
            let _ = write!(output, " \"{}\"", string);
        }
        output.push('\n');
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocketSpecCondition {
    pub comparison: ComparisonOp,
    pub values: Vec<SocketSpec>,
    pub origin: Span,
}

impl SocketSpecCondition {
    fn generate(&self, keyword: &str, output: &mut String) {
        // the comparison operator is always printed, even for equality
        let _ = write!(output, "\t{} {}", keyword, self.comparison.as_str());

        for spec in &self.values {
            output.push(' ');
            if let Some(count) = spec.count {
                let _ = write!(output, "{}", count);
            }
            for _ in 0..spec.r {
                output.push(keywords::R);
            }
            for _ in 0..spec.g {
                output.push(keywords::G);
            }
            for _ in 0..spec.b {
                output.push(keywords::B);
            }
            for _ in 0..spec.w {
                output.push(keywords::W);
            }
            for _ in 0..spec.a {
                output.push(keywords::A);
            }
            for _ in 0..spec.d {
                output.push(keywords::D);
            }
        }
        output.push('\n');
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InfluenceFlags {
    pub shaper: bool,
    pub elder: bool,
    pub crusader: bool,
    pub redeemer: bool,
    pub hunter: bool,
    pub warlord: bool,
}

impl InfluenceFlags {
    pub fn is_none(&self) -> bool {
        !(self.shaper || self.elder || self.crusader || self.redeemer || self.hunter || self.warlord)
    }

    pub fn is_subset_of(&self, other: &InfluenceFlags) -> bool {
        (!self.shaper || other.shaper)
            && (!self.elder || other.elder)
            && (!self.crusader || other.crusader)
            && (!self.redeemer || other.redeemer)
            && (!self.hunter || other.hunter)
            && (!self.warlord || other.warlord)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluencesCondition {
    pub influence: InfluenceFlags,
    pub exact_match: bool,
    pub origin: Span,
}

impl InfluencesCondition {
    fn generate(&self, output: &mut String) {
        let _ = write!(output, "\t{}", keywords::HAS_INFLUENCE);
        if self.exact_match {
            output.push_str(" ==");
        }

        if self.influence.is_none() {
            let _ = write!(output, " {}", keywords::NONE);
        } else {
            if self.influence.shaper {
                let _ = write!(output, " {}", keywords::SHAPER);
            }
            if self.influence.elder {
                let _ = write!(output, " {}", keywords::ELDER);
            }
            if self.influence.crusader {
                let _ = write!(output, " {}", keywords::CRUSADER);
            }
            if self.influence.redeemer {
                let _ = write!(output, " {}", keywords::REDEEMER);
            }
            if self.influence.hunter {
                let _ = write!(output, " {}", keywords::HUNTER);
            }
            if self.influence.warlord {
                let _ = write!(output, " {}", keywords::WARLORD);
            }
        }
        output.push('\n');
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GemQualityTypeCondition {
    pub values: Vec<GemQualityType>,
    pub origin: Span,
}

impl GemQualityTypeCondition {
    fn generate(&self, output: &mut String) {
        let _ = write!(output, "\t{}", keywords::GEM_QUALITY_TYPE);
        for value in &self.values {
            let _ = write!(output, " {}", value.as_keyword());
        }
        output.push('\n');
    }
}

// ============================================================================
// Condition set
// ============================================================================

/// At most one instance of each condition property. Redefinition is
/// detected by the compiler before a slot is overwritten.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionSet {
    pub item_level: RangeCondition<i32>,
    pub drop_level: RangeCondition<i32>,
    pub quality: RangeCondition<i32>,
    pub rarity: RangeCondition<Rarity>,
    pub linked_sockets: RangeCondition<i32>,
    pub height: RangeCondition<i32>,
    pub width: RangeCondition<i32>,
    pub stack_size: RangeCondition<i32>,
    pub gem_level: RangeCondition<i32>,
    pub map_tier: RangeCondition<i32>,
    pub area_level: RangeCondition<i32>,
    pub corrupted_mods: RangeCondition<i32>,
    pub enchantment_passive_num: RangeCondition<i32>,

    pub gem_quality_type: Option<GemQualityTypeCondition>,

    pub sockets: Option<SocketSpecCondition>,
    pub socket_group: Option<SocketSpecCondition>,

    pub is_identified: Option<BooleanCondition>,
    pub is_corrupted: Option<BooleanCondition>,
    pub is_mirrored: Option<BooleanCondition>,
    pub is_elder_item: Option<BooleanCondition>,
    pub is_shaper_item: Option<BooleanCondition>,
    pub is_fractured_item: Option<BooleanCondition>,
    pub is_synthesised_item: Option<BooleanCondition>,
    pub is_enchanted: Option<BooleanCondition>,
    pub is_shaped_map: Option<BooleanCondition>,
    pub is_elder_map: Option<BooleanCondition>,
    pub is_blighted_map: Option<BooleanCondition>,
    pub is_replica: Option<BooleanCondition>,
    pub is_alternate_quality: Option<BooleanCondition>,

    pub class: Option<StringsCondition>,
    pub base_type: Option<StringsCondition>,
    pub prophecy: Option<StringsCondition>,
    pub enchantment_passive_node: Option<StringsCondition>,
    pub archnemesis_mod: Option<StringsCondition>,

    pub has_explicit_mod: Option<RangedStringsCondition>,
    pub has_enchantment: Option<RangedStringsCondition>,

    pub has_influence: Option<InfluencesCondition>,
}

fn generate_boolean(
    condition: &Option<BooleanCondition>,
    keyword: &str,
    output: &mut String,
) {
    if let Some(condition) = condition {
        let value = if condition.value {
            keywords::TRUE
        } else {
            keywords::FALSE
        };
        let _ = writeln!(output, "\t{} {}", keyword, value);
    }
}

fn generate_strings(condition: &Option<StringsCondition>, keyword: &str, output: &mut String) {
    if let Some(condition) = condition {
        condition.generate(keyword, output);
    }
}

impl ConditionSet {
    /// Write every present condition in canonical order.
    pub fn generate(&self, output: &mut String) {
        self.item_level.generate(keywords::ITEM_LEVEL, output);
        self.drop_level.generate(keywords::DROP_LEVEL, output);
        self.quality.generate(keywords::QUALITY, output);
        self.rarity.generate(keywords::RARITY, output);
        self.linked_sockets.generate(keywords::LINKED_SOCKETS, output);
        self.height.generate(keywords::HEIGHT, output);
        self.width.generate(keywords::WIDTH, output);
        self.stack_size.generate(keywords::STACK_SIZE, output);
        self.gem_level.generate(keywords::GEM_LEVEL, output);
        self.map_tier.generate(keywords::MAP_TIER, output);
        self.area_level.generate(keywords::AREA_LEVEL, output);
        self.corrupted_mods.generate(keywords::CORRUPTED_MODS, output);
        self.enchantment_passive_num
            .generate(keywords::ENCHANTMENT_PASSIVE_NUM, output);

        if let Some(condition) = &self.gem_quality_type {
            condition.generate(output);
        }

        if let Some(condition) = &self.sockets {
            condition.generate(keywords::SOCKETS, output);
        }
        if let Some(condition) = &self.socket_group {
            condition.generate(keywords::SOCKET_GROUP, output);
        }

        generate_boolean(&self.is_identified, keywords::IDENTIFIED, output);
        generate_boolean(&self.is_corrupted, keywords::CORRUPTED, output);
        generate_boolean(&self.is_mirrored, keywords::MIRRORED, output);
        generate_boolean(&self.is_elder_item, keywords::ELDER_ITEM, output);
        generate_boolean(&self.is_shaper_item, keywords::SHAPER_ITEM, output);
        generate_boolean(&self.is_fractured_item, keywords::FRACTURED_ITEM, output);
        generate_boolean(&self.is_synthesised_item, keywords::SYNTHESISED_ITEM, output);
        generate_boolean(&self.is_enchanted, keywords::ANY_ENCHANTMENT, output);
        generate_boolean(&self.is_shaped_map, keywords::SHAPED_MAP, output);
        generate_boolean(&self.is_elder_map, keywords::ELDER_MAP, output);
        generate_boolean(&self.is_blighted_map, keywords::BLIGHTED_MAP, output);
        generate_boolean(&self.is_replica, keywords::REPLICA, output);
        generate_boolean(&self.is_alternate_quality, keywords::ALTERNATE_QUALITY, output);

        generate_strings(&self.class, keywords::CLASS, output);
        generate_strings(&self.base_type, keywords::BASE_TYPE, output);
        generate_strings(&self.prophecy, keywords::PROPHECY, output);
        generate_strings(
            &self.enchantment_passive_node,
            keywords::ENCHANTMENT_PASSIVE_NODE,
            output,
        );
        generate_strings(&self.archnemesis_mod, keywords::ARCHNEMESIS_MOD, output);

        if let Some(condition) = &self.has_explicit_mod {
            condition.generate(keywords::HAS_EXPLICIT_MOD, output);
        }
        if let Some(condition) = &self.has_enchantment {
            condition.generate(keywords::HAS_ENCHANTMENT, output);
        }

        if let Some(condition) = &self.has_influence {
            condition.generate(output);
        }
    }

    /// A condition set with an empty string list can never match and the
    /// game client rejects such blocks, so they are dropped at emission.
    pub fn is_valid(&self) -> bool {
        let strings_ok = |condition: &Option<StringsCondition>| match condition {
            Some(condition) => !condition.strings.is_empty(),
            None => true,
        };
        let ranged_ok = |condition: &Option<RangedStringsCondition>| match condition {
            Some(condition) => !condition.strings.strings.is_empty(),
            None => true,
        };

        strings_ok(&self.class)
            && strings_ok(&self.base_type)
            && strings_ok(&self.prophecy)
            && strings_ok(&self.enchantment_passive_node)
            && strings_ok(&self.archnemesis_mod)
            && ranged_ok(&self.has_explicit_mod)
            && ranged_ok(&self.has_enchantment)
    }
}

// ============================================================================
// Spirit filter extensions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutogenCondition {
    pub category: AutogenCategory,
    pub origin: Span,
}

/// Condition set plus the spirit-filter-only autogeneration state
/// accumulated while walking nested blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpiritConditionSet {
    pub conditions: ConditionSet,
    pub price: RangeCondition<f64>,
    pub autogen: Option<AutogenCondition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn exact_range_includes_only_the_value() {
        let range = RangeCondition::exact(5, span());
        assert!(range.is_exact());
        assert!(range.includes(5));
        assert!(!range.includes(4));
        assert!(!range.includes(6));
    }

    #[test]
    fn exclusive_bound_excludes_the_boundary() {
        let mut range = RangeCondition::new();
        range.set_lower_bound(10, false, span());
        assert!(!range.includes(10));
        assert!(range.includes(11));
    }

    #[test]
    fn empty_range_matches_nothing() {
        let mut range = RangeCondition::new();
        range.set_lower_bound(10, true, span());
        range.set_upper_bound(5, true, span());
        for value in 0..20 {
            assert!(!range.includes(value));
        }
    }

    #[test]
    fn exact_range_emits_single_line() {
        let range = RangeCondition::exact(20, span());
        let mut out = String::new();
        range.generate("Quality", &mut out);
        assert_eq!(out, "\tQuality = 20\n");
    }

    #[test]
    fn two_bounds_emit_two_lines() {
        let mut range = RangeCondition::new();
        range.set_lower_bound(5, true, span());
        range.set_upper_bound(10, false, span());
        let mut out = String::new();
        range.generate("ItemLevel", &mut out);
        assert_eq!(out, "\tItemLevel >= 5\n\tItemLevel < 10\n");
    }

    #[test]
    fn rarity_range_emits_keywords() {
        let mut range = RangeCondition::new();
        range.set_upper_bound(Rarity::Rare, true, span());
        let mut out = String::new();
        range.generate("Rarity", &mut out);
        assert_eq!(out, "\tRarity <= Rare\n");
    }

    #[test]
    fn strings_condition_quotes_all_values() {
        let condition = StringsCondition {
            strings: vec!["Humility".into(), "A Dab of Ink".into()],
            exact_match: true,
            origin: span(),
        };
        let mut out = String::new();
        condition.generate("BaseType", &mut out);
        assert_eq!(out, "\tBaseType == \"Humility\" \"A Dab of Ink\"\n");
    }

    #[test]
    fn substring_matching_honors_exact_flag() {
        let loose = StringsCondition {
            strings: vec!["Boots".into()],
            exact_match: false,
            origin: span(),
        };
        assert!(loose.find_match("Dragonscale Boots").is_some());

        let exact = StringsCondition {
            strings: vec!["Boots".into()],
            exact_match: true,
            origin: span(),
        };
        assert!(exact.find_match("Dragonscale Boots").is_none());
        assert!(exact.find_match("Boots").is_some());
    }

    #[test]
    fn ranged_strings_put_count_next_to_operator() {
        let condition = RangedStringsCondition {
            strings: StringsCondition {
                strings: vec!["of Haast".into()],
                exact_match: false,
                origin: span(),
            },
            count: {
                let mut range = RangeCondition::new();
                range.set_lower_bound(3, true, span());
                range
            },
        };
        let mut out = String::new();
        condition.generate("HasExplicitMod", &mut out);
        assert_eq!(out, "\tHasExplicitMod >=3 \"of Haast\"\n");
    }

    #[test]
    fn socket_condition_always_prints_operator() {
        let condition = SocketSpecCondition {
            comparison: ComparisonOp::Equal,
            values: vec![SocketSpec {
                count: Some(5),
                r: 2,
                g: 1,
                ..SocketSpec::default()
            }],
            origin: span(),
        };
        let mut out = String::new();
        condition.generate("Sockets", &mut out);
        assert_eq!(out, "\tSockets = 5RRG\n");
    }

    #[test]
    fn influence_condition_with_no_flags_prints_none() {
        let condition = InfluencesCondition {
            influence: InfluenceFlags::default(),
            exact_match: true,
            origin: span(),
        };
        let mut out = String::new();
        condition.generate(&mut out);
        assert_eq!(out, "\tHasInfluence == None\n");
    }

    #[test]
    fn empty_string_list_invalidates_the_set() {
        let mut set = ConditionSet::default();
        assert!(set.is_valid());
        set.base_type = Some(StringsCondition {
            strings: vec![],
            exact_match: true,
            origin: span(),
        });
        assert!(!set.is_valid());
    }

    #[test]
    fn generate_orders_class_before_base_type() {
        let mut set = ConditionSet::default();
        set.base_type = Some(StringsCondition {
            strings: vec!["Humility".into()],
            exact_match: true,
            origin: span(),
        });
        set.class = Some(StringsCondition {
            strings: vec!["Divination Card".into()],
            exact_match: true,
            origin: span(),
        });
        let mut out = String::new();
        set.generate(&mut out);
        let class_pos = out.find("Class").unwrap();
        let base_pos = out.find("BaseType").unwrap();
        assert!(class_pos < base_pos);
    }
}
