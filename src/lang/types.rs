use crate::lang::keywords;
use crate::token::Span;

// ============================================================================
// Enumerated literal types
// ============================================================================

/// Item rarity. The ordering is meaningful: rarity conditions are range
/// conditions over this total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Normal,
    Magic,
    Rare,
    Unique,
}

impl Rarity {
    pub fn as_keyword(self) -> &'static str {
        match self {
            Rarity::Normal => keywords::NORMAL,
            Rarity::Magic => keywords::MAGIC,
            Rarity::Rare => keywords::RARE,
            Rarity::Unique => keywords::UNIQUE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Circle,
    Diamond,
    Hexagon,
    Square,
    Star,
    Triangle,
    Cross,
    Moon,
    Raindrop,
    Kite,
    Pentagon,
    UpsideDownHouse,
}

impl Shape {
    pub fn as_keyword(self) -> &'static str {
        match self {
            Shape::Circle => keywords::CIRCLE,
            Shape::Diamond => keywords::DIAMOND,
            Shape::Hexagon => keywords::HEXAGON,
            Shape::Square => keywords::SQUARE,
            Shape::Star => keywords::STAR,
            Shape::Triangle => keywords::TRIANGLE,
            Shape::Cross => keywords::CROSS,
            Shape::Moon => keywords::MOON,
            Shape::Raindrop => keywords::RAINDROP,
            Shape::Kite => keywords::KITE,
            Shape::Pentagon => keywords::PENTAGON,
            Shape::UpsideDownHouse => keywords::UPSIDE_DOWN_HOUSE,
        }
    }
}

/// Named "suit" to avoid confusion with RGB color values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Red,
    Green,
    Blue,
    White,
    Brown,
    Yellow,
    Cyan,
    Grey,
    Orange,
    Pink,
    Purple,
}

impl Suit {
    pub fn as_keyword(self) -> &'static str {
        match self {
            Suit::Red => keywords::RED,
            Suit::Green => keywords::GREEN,
            Suit::Blue => keywords::BLUE,
            Suit::White => keywords::WHITE,
            Suit::Brown => keywords::BROWN,
            Suit::Yellow => keywords::YELLOW,
            Suit::Cyan => keywords::CYAN,
            Suit::Grey => keywords::GREY,
            Suit::Orange => keywords::ORANGE,
            Suit::Pink => keywords::PINK,
            Suit::Purple => keywords::PURPLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Influence {
    Shaper,
    Elder,
    Crusader,
    Redeemer,
    Hunter,
    Warlord,
}

impl Influence {
    pub fn as_keyword(self) -> &'static str {
        match self {
            Influence::Shaper => keywords::SHAPER,
            Influence::Elder => keywords::ELDER,
            Influence::Crusader => keywords::CRUSADER,
            Influence::Redeemer => keywords::REDEEMER,
            Influence::Hunter => keywords::HUNTER,
            Influence::Warlord => keywords::WARLORD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaperVoiceLine {
    Mirror,
    Exalted,
    Divine,
    General,
    Regal,
    Chaos,
    Fusing,
    Alchemy,
    Vaal,
    Blessed,
}

impl ShaperVoiceLine {
    pub fn as_keyword(self) -> &'static str {
        match self {
            ShaperVoiceLine::Mirror => keywords::SH_MIRROR,
            ShaperVoiceLine::Exalted => keywords::SH_EXALTED,
            ShaperVoiceLine::Divine => keywords::SH_DIVINE,
            ShaperVoiceLine::General => keywords::SH_GENERAL,
            ShaperVoiceLine::Regal => keywords::SH_REGAL,
            ShaperVoiceLine::Chaos => keywords::SH_CHAOS,
            ShaperVoiceLine::Fusing => keywords::SH_FUSING,
            ShaperVoiceLine::Alchemy => keywords::SH_ALCHEMY,
            ShaperVoiceLine::Vaal => keywords::SH_VAAL,
            ShaperVoiceLine::Blessed => keywords::SH_BLESSED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemQualityType {
    Superior,
    Divergent,
    Anomalous,
    Phantasmal,
}

impl GemQualityType {
    pub fn as_keyword(self) -> &'static str {
        match self {
            GemQualityType::Superior => keywords::SUPERIOR,
            GemQualityType::Divergent => keywords::DIVERGENT,
            GemQualityType::Anomalous => keywords::ANOMALOUS,
            GemQualityType::Phantasmal => keywords::PHANTASMAL,
        }
    }
}

// ============================================================================
// Socket specification
// ============================================================================

/// A socket requirement literal such as `5RGB`, `RR` or a bare count.
///
/// Valid when at least one field is non-zero and neither the count nor
/// the letter total exceeds six.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SocketSpec {
    pub count: Option<i32>,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
    pub a: u8,
    pub d: u8,
}

impl SocketSpec {
    pub fn letter_total(&self) -> i32 {
        i32::from(self.r)
            + i32::from(self.g)
            + i32::from(self.b)
            + i32::from(self.w)
            + i32::from(self.a)
            + i32::from(self.d)
    }

    pub fn has_letters(&self) -> bool {
        self.letter_total() > 0
    }

    pub fn is_valid(&self) -> bool {
        let count_ok = match self.count {
            Some(n) => (super::limits::MIN_ITEM_SOCKETS..=super::limits::MAX_ITEM_SOCKETS)
                .contains(&n),
            None => true,
        };
        let any_field = self.count.is_some() || self.has_letters();
        count_ok && any_field && self.letter_total() <= super::limits::MAX_ITEM_SOCKETS
    }
}

// ============================================================================
// Comparison operators, condition and action keywords, visibility
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Less,
    LessEqual,
    /// Plain `=` or no operator at all.
    Equal,
    /// `==`: exact matching.
    ExactMatch,
    Greater,
    GreaterEqual,
    /// `!=` or `!`.
    NotEqual,
}

impl ComparisonOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Less => "<",
            ComparisonOp::LessEqual => "<=",
            ComparisonOp::Equal => "=",
            ComparisonOp::ExactMatch => "==",
            ComparisonOp::Greater => ">",
            ComparisonOp::GreaterEqual => ">=",
            ComparisonOp::NotEqual => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionProperty {
    ItemLevel,
    DropLevel,
    Quality,
    Rarity,
    Class,
    BaseType,
    Prophecy,
    LinkedSockets,
    Sockets,
    SocketGroup,
    Height,
    Width,
    StackSize,
    GemLevel,
    GemQualityType,
    MapTier,
    AreaLevel,
    CorruptedMods,
    EnchantmentPassiveNum,
    HasExplicitMod,
    HasEnchantment,
    EnchantmentPassiveNode,
    ArchnemesisMod,
    Identified,
    Corrupted,
    Mirrored,
    ElderItem,
    ShaperItem,
    FracturedItem,
    SynthesisedItem,
    AnyEnchantment,
    ShapedMap,
    ElderMap,
    BlightedMap,
    Replica,
    AlternateQuality,
    HasInfluence,
}

impl ConditionProperty {
    pub fn as_keyword(self) -> &'static str {
        use ConditionProperty::*;
        match self {
            ItemLevel => keywords::ITEM_LEVEL,
            DropLevel => keywords::DROP_LEVEL,
            Quality => keywords::QUALITY,
            Rarity => keywords::RARITY,
            Class => keywords::CLASS,
            BaseType => keywords::BASE_TYPE,
            Prophecy => keywords::PROPHECY,
            LinkedSockets => keywords::LINKED_SOCKETS,
            Sockets => keywords::SOCKETS,
            SocketGroup => keywords::SOCKET_GROUP,
            Height => keywords::HEIGHT,
            Width => keywords::WIDTH,
            StackSize => keywords::STACK_SIZE,
            GemLevel => keywords::GEM_LEVEL,
            GemQualityType => keywords::GEM_QUALITY_TYPE,
            MapTier => keywords::MAP_TIER,
            AreaLevel => keywords::AREA_LEVEL,
            CorruptedMods => keywords::CORRUPTED_MODS,
            EnchantmentPassiveNum => keywords::ENCHANTMENT_PASSIVE_NUM,
            HasExplicitMod => keywords::HAS_EXPLICIT_MOD,
            HasEnchantment => keywords::HAS_ENCHANTMENT,
            EnchantmentPassiveNode => keywords::ENCHANTMENT_PASSIVE_NODE,
            ArchnemesisMod => keywords::ARCHNEMESIS_MOD,
            Identified => keywords::IDENTIFIED,
            Corrupted => keywords::CORRUPTED,
            Mirrored => keywords::MIRRORED,
            ElderItem => keywords::ELDER_ITEM,
            ShaperItem => keywords::SHAPER_ITEM,
            FracturedItem => keywords::FRACTURED_ITEM,
            SynthesisedItem => keywords::SYNTHESISED_ITEM,
            AnyEnchantment => keywords::ANY_ENCHANTMENT,
            ShapedMap => keywords::SHAPED_MAP,
            ElderMap => keywords::ELDER_MAP,
            BlightedMap => keywords::BLIGHTED_MAP,
            Replica => keywords::REPLICA,
            AlternateQuality => keywords::ALTERNATE_QUALITY,
            HasInfluence => keywords::HAS_INFLUENCE,
        }
    }

    /// Integer-valued range properties.
    pub fn is_numeric_range(self) -> bool {
        use ConditionProperty::*;
        matches!(
            self,
            ItemLevel
                | DropLevel
                | Quality
                | LinkedSockets
                | Height
                | Width
                | StackSize
                | GemLevel
                | MapTier
                | AreaLevel
                | CorruptedMods
                | EnchantmentPassiveNum
        )
    }

    pub fn is_boolean(self) -> bool {
        use ConditionProperty::*;
        matches!(
            self,
            Identified
                | Corrupted
                | Mirrored
                | ElderItem
                | ShaperItem
                | FracturedItem
                | SynthesisedItem
                | AnyEnchantment
                | ShapedMap
                | ElderMap
                | BlightedMap
                | Replica
                | AlternateQuality
        )
    }

    pub fn is_string_list(self) -> bool {
        use ConditionProperty::*;
        matches!(
            self,
            Class | BaseType | Prophecy | EnchantmentPassiveNode | ArchnemesisMod
        )
    }

    pub fn is_ranged_string_list(self) -> bool {
        matches!(
            self,
            ConditionProperty::HasExplicitMod | ConditionProperty::HasEnchantment
        )
    }

    pub fn is_socket_spec(self) -> bool {
        matches!(
            self,
            ConditionProperty::Sockets | ConditionProperty::SocketGroup
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionProperty {
    SetTextColor,
    SetBorderColor,
    SetBackgroundColor,
    SetFontSize,
    PlayEffect,
    MinimapIcon,
    PlayAlertSound,
    PlayAlertSoundPositional,
    SetAlertSound,
    SetAlertSoundPositional,
    CustomAlertSound,
    CustomAlertSoundOptional,
    EnableDropSound,
    DisableDropSound,
    EnableDropSoundIfAlertSound,
    DisableDropSoundIfAlertSound,
}

impl ActionProperty {
    pub fn as_keyword(self) -> &'static str {
        use ActionProperty::*;
        match self {
            SetTextColor => keywords::SET_TEXT_COLOR,
            SetBorderColor => keywords::SET_BORDER_COLOR,
            SetBackgroundColor => keywords::SET_BACKGROUND_COLOR,
            SetFontSize => keywords::SET_FONT_SIZE,
            PlayEffect => keywords::PLAY_EFFECT,
            MinimapIcon => keywords::MINIMAP_ICON,
            PlayAlertSound => keywords::PLAY_ALERT_SOUND,
            PlayAlertSoundPositional => keywords::PLAY_ALERT_SOUND_POSITIONAL,
            SetAlertSound => keywords::SET_ALERT_SOUND,
            SetAlertSoundPositional => keywords::SET_ALERT_SOUND_POSITIONAL,
            CustomAlertSound => keywords::CUSTOM_ALERT_SOUND,
            CustomAlertSoundOptional => keywords::CUSTOM_ALERT_SOUND_OPTIONAL,
            EnableDropSound => keywords::ENABLE_DROP_SOUND,
            DisableDropSound => keywords::DISABLE_DROP_SOUND,
            EnableDropSoundIfAlertSound => keywords::ENABLE_DROP_SOUND_IF_ALERT_SOUND,
            DisableDropSoundIfAlertSound => keywords::DISABLE_DROP_SOUND_IF_ALERT_SOUND,
        }
    }

    /// Drop-sound switches take no value sequence (optionally a boolean).
    pub fn is_drop_sound_switch(self) -> bool {
        use ActionProperty::*;
        matches!(
            self,
            EnableDropSound
                | DisableDropSound
                | EnableDropSoundIfAlertSound
                | DisableDropSoundIfAlertSound
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Show,
    Hide,
    Minimal,
    ShowDiscard,
    HideDiscard,
}

impl Visibility {
    pub fn as_keyword(self) -> &'static str {
        match self {
            Visibility::Show => keywords::SHOW,
            Visibility::Hide => keywords::HIDE,
            Visibility::Minimal => keywords::MINIMAL,
            Visibility::ShowDiscard => keywords::SHOW_DISCARD,
            Visibility::HideDiscard => keywords::HIDE_DISCARD,
        }
    }

    /// Discard blocks participate in matching but are never emitted.
    pub fn is_discard(self) -> bool {
        matches!(self, Visibility::ShowDiscard | Visibility::HideDiscard)
    }

    /// Visibilities accepted by the game client's own grammar.
    pub fn in_real_filter(self) -> bool {
        matches!(
            self,
            Visibility::Show | Visibility::Hide | Visibility::Minimal
        )
    }
}

// ============================================================================
// Autogeneration categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutogenCategory {
    Currency,
    Fragments,
    DeliriumOrbs,
    Cards,
    Prophecies,
    Essences,
    Fossils,
    Resonators,
    Scarabs,
    Incubators,
    Oils,
    Vials,
    Gems,
    Bases,
    UniquesEqUnambiguous,
    UniquesEqAmbiguous,
    UniquesFlasksUnambiguous,
    UniquesFlasksAmbiguous,
    UniquesJewelsUnambiguous,
    UniquesJewelsAmbiguous,
    UniquesMapsUnambiguous,
    UniquesMapsAmbiguous,
}

impl AutogenCategory {
    pub fn from_keyword(name: &str) -> Option<Self> {
        use AutogenCategory::*;
        Some(match name {
            "currency" => Currency,
            "fragments" => Fragments,
            "delirium_orbs" => DeliriumOrbs,
            "cards" => Cards,
            "prophecies" => Prophecies,
            "essences" => Essences,
            "fossils" => Fossils,
            "resonators" => Resonators,
            "scarabs" => Scarabs,
            "incubators" => Incubators,
            "oils" => Oils,
            "vials" => Vials,
            "gems" => Gems,
            "bases" => Bases,
            "uniques_eq_unambiguous" => UniquesEqUnambiguous,
            "uniques_eq_ambiguous" => UniquesEqAmbiguous,
            "uniques_flasks_unambiguous" => UniquesFlasksUnambiguous,
            "uniques_flasks_ambiguous" => UniquesFlasksAmbiguous,
            "uniques_jewels_unambiguous" => UniquesJewelsUnambiguous,
            "uniques_jewels_ambiguous" => UniquesJewelsAmbiguous,
            "uniques_maps_unambiguous" => UniquesMapsUnambiguous,
            "uniques_maps_ambiguous" => UniquesMapsAmbiguous,
            _ => return None,
        })
    }

    pub fn as_keyword(self) -> &'static str {
        use AutogenCategory::*;
        match self {
            Currency => "currency",
            Fragments => "fragments",
            DeliriumOrbs => "delirium_orbs",
            Cards => "cards",
            Prophecies => "prophecies",
            Essences => "essences",
            Fossils => "fossils",
            Resonators => "resonators",
            Scarabs => "scarabs",
            Incubators => "incubators",
            Oils => "oils",
            Vials => "vials",
            Gems => "gems",
            Bases => "bases",
            UniquesEqUnambiguous => "uniques_eq_unambiguous",
            UniquesEqAmbiguous => "uniques_eq_ambiguous",
            UniquesFlasksUnambiguous => "uniques_flasks_unambiguous",
            UniquesFlasksAmbiguous => "uniques_flasks_ambiguous",
            UniquesJewelsUnambiguous => "uniques_jewels_unambiguous",
            UniquesJewelsAmbiguous => "uniques_jewels_ambiguous",
            UniquesMapsUnambiguous => "uniques_maps_unambiguous",
            UniquesMapsAmbiguous => "uniques_maps_ambiguous",
        }
    }

    pub fn is_uniques(self) -> bool {
        use AutogenCategory::*;
        matches!(
            self,
            UniquesEqUnambiguous
                | UniquesEqAmbiguous
                | UniquesFlasksUnambiguous
                | UniquesFlasksAmbiguous
                | UniquesJewelsUnambiguous
                | UniquesJewelsAmbiguous
                | UniquesMapsUnambiguous
                | UniquesMapsAmbiguous
        )
    }

    /// Item class names a block of this category ends up matching, when
    /// the category pins them down. Unique categories constrain rarity
    /// instead and return nothing.
    pub fn class_names(self) -> Option<&'static [&'static str]> {
        use crate::lang::keywords::item_class_names as cn;
        use AutogenCategory::*;
        Some(match self {
            Currency => &[cn::CURRENCY_STACKABLE],
            Fragments => &[cn::MAP_FRAGMENTS],
            DeliriumOrbs => &[cn::DELIRIUM_ORBS],
            Cards => &[cn::DIVINATION_CARD],
            Prophecies => &[cn::PROPHECIES],
            Essences => &[cn::ESSENCES],
            Fossils => &[cn::FOSSILS],
            Resonators => &[cn::RESONATORS],
            Scarabs => &[cn::SCARABS],
            Incubators => &[cn::INCUBATOR],
            Oils => &[cn::OILS],
            Vials => &[cn::VIALS],
            Gems => &[cn::GEMS_ACTIVE, cn::GEMS_SUPPORT],
            Bases | UniquesEqUnambiguous | UniquesEqAmbiguous | UniquesFlasksUnambiguous
            | UniquesFlasksAmbiguous | UniquesJewelsUnambiguous | UniquesJewelsAmbiguous
            | UniquesMapsUnambiguous | UniquesMapsAmbiguous => return None,
        })
    }
}

// ============================================================================
// Typed objects produced by the evaluator
// ============================================================================

/// Kind tag for [`PrimitiveValue`], used in type mismatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    None,
    Temp,
    Boolean,
    Integer,
    Fractional,
    SocketSpec,
    Rarity,
    Shape,
    Suit,
    Influence,
    ShaperVoiceLine,
    GemQualityType,
    String,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::None => "none",
            ObjectKind::Temp => "temp",
            ObjectKind::Boolean => "boolean",
            ObjectKind::Integer => "integer",
            ObjectKind::Fractional => "fractional",
            ObjectKind::SocketSpec => "socket spec",
            ObjectKind::Rarity => "rarity",
            ObjectKind::Shape => "shape",
            ObjectKind::Suit => "suit",
            ObjectKind::Influence => "influence",
            ObjectKind::ShaperVoiceLine => "shaper voice line",
            ObjectKind::GemQualityType => "gem quality type",
            ObjectKind::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    None,
    Temp,
    Boolean(bool),
    Integer(i32),
    Fractional(f64),
    SocketSpec(SocketSpec),
    Rarity(Rarity),
    Shape(Shape),
    Suit(Suit),
    Influence(Influence),
    ShaperVoiceLine(ShaperVoiceLine),
    GemQualityType(GemQualityType),
    String(String),
}

impl PrimitiveValue {
    pub fn kind(&self) -> ObjectKind {
        match self {
            PrimitiveValue::None => ObjectKind::None,
            PrimitiveValue::Temp => ObjectKind::Temp,
            PrimitiveValue::Boolean(_) => ObjectKind::Boolean,
            PrimitiveValue::Integer(_) => ObjectKind::Integer,
            PrimitiveValue::Fractional(_) => ObjectKind::Fractional,
            PrimitiveValue::SocketSpec(_) => ObjectKind::SocketSpec,
            PrimitiveValue::Rarity(_) => ObjectKind::Rarity,
            PrimitiveValue::Shape(_) => ObjectKind::Shape,
            PrimitiveValue::Suit(_) => ObjectKind::Suit,
            PrimitiveValue::Influence(_) => ObjectKind::Influence,
            PrimitiveValue::ShaperVoiceLine(_) => ObjectKind::ShaperVoiceLine,
            PrimitiveValue::GemQualityType(_) => ObjectKind::GemQualityType,
            PrimitiveValue::String(_) => ObjectKind::String,
        }
    }
}

/// A single evaluated primitive with the source range it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleObject {
    pub value: PrimitiveValue,
    pub origin: Span,
}

/// An evaluated sequence. Never empty: the grammar requires at least one
/// primitive and name references flatten into the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub values: Vec<SingleObject>,
    pub origin: Span,
}
