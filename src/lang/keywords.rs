//! Centralized keyword constants of the filter language.
//!
//! Keeping every string in one place means no typo can slip into an
//! emitted filter or a parser table unnoticed, and diffs against the
//! official filter syntax stay trivial to audit.

// ---- visibility ----

pub const SHOW: &str = "Show";
pub const HIDE: &str = "Hide";
pub const MINIMAL: &str = "Minimal";
pub const SHOW_DISCARD: &str = "ShowDiscard";
pub const HIDE_DISCARD: &str = "HideDiscard";

// ---- literals ----

pub const TRUE: &str = "True";
pub const FALSE: &str = "False";
pub const NONE: &str = "None";
pub const TEMP: &str = "Temp";

pub const NORMAL: &str = "Normal";
pub const MAGIC: &str = "Magic";
pub const RARE: &str = "Rare";
pub const UNIQUE: &str = "Unique";

pub const CIRCLE: &str = "Circle";
pub const DIAMOND: &str = "Diamond";
pub const HEXAGON: &str = "Hexagon";
pub const SQUARE: &str = "Square";
pub const STAR: &str = "Star";
pub const TRIANGLE: &str = "Triangle";
pub const CROSS: &str = "Cross";
pub const MOON: &str = "Moon";
pub const RAINDROP: &str = "Raindrop";
pub const KITE: &str = "Kite";
pub const PENTAGON: &str = "Pentagon";
pub const UPSIDE_DOWN_HOUSE: &str = "UpsideDownHouse";

pub const RED: &str = "Red";
pub const GREEN: &str = "Green";
pub const BLUE: &str = "Blue";
pub const WHITE: &str = "White";
pub const BROWN: &str = "Brown";
pub const YELLOW: &str = "Yellow";
pub const CYAN: &str = "Cyan";
pub const GREY: &str = "Grey";
pub const ORANGE: &str = "Orange";
pub const PINK: &str = "Pink";
pub const PURPLE: &str = "Purple";

pub const SHAPER: &str = "Shaper";
pub const ELDER: &str = "Elder";
pub const CRUSADER: &str = "Crusader";
pub const REDEEMER: &str = "Redeemer";
pub const HUNTER: &str = "Hunter";
pub const WARLORD: &str = "Warlord";

pub const SH_MIRROR: &str = "ShMirror";
pub const SH_EXALTED: &str = "ShExalted";
pub const SH_DIVINE: &str = "ShDivine";
pub const SH_GENERAL: &str = "ShGeneral";
pub const SH_REGAL: &str = "ShRegal";
pub const SH_CHAOS: &str = "ShChaos";
pub const SH_FUSING: &str = "ShFusing";
pub const SH_ALCHEMY: &str = "ShAlchemy";
pub const SH_VAAL: &str = "ShVaal";
pub const SH_BLESSED: &str = "ShBlessed";

pub const SUPERIOR: &str = "Superior";
pub const DIVERGENT: &str = "Divergent";
pub const ANOMALOUS: &str = "Anomalous";
pub const PHANTASMAL: &str = "Phantasmal";

// socket color letters, also used by socket spec literals
pub const R: char = 'R';
pub const G: char = 'G';
pub const B: char = 'B';
pub const W: char = 'W';
pub const A: char = 'A';
pub const D: char = 'D';

// ---- conditions ----

pub const ITEM_LEVEL: &str = "ItemLevel";
pub const DROP_LEVEL: &str = "DropLevel";
pub const QUALITY: &str = "Quality";
pub const RARITY: &str = "Rarity";
pub const CLASS: &str = "Class";
pub const BASE_TYPE: &str = "BaseType";
pub const PROPHECY: &str = "Prophecy";
pub const LINKED_SOCKETS: &str = "LinkedSockets";
pub const SOCKETS: &str = "Sockets";
pub const SOCKET_GROUP: &str = "SocketGroup";
pub const HEIGHT: &str = "Height";
pub const WIDTH: &str = "Width";
pub const STACK_SIZE: &str = "StackSize";
pub const GEM_LEVEL: &str = "GemLevel";
pub const GEM_QUALITY_TYPE: &str = "GemQualityType";
pub const MAP_TIER: &str = "MapTier";
pub const AREA_LEVEL: &str = "AreaLevel";
pub const CORRUPTED_MODS: &str = "CorruptedMods";
pub const ENCHANTMENT_PASSIVE_NUM: &str = "EnchantmentPassiveNum";
pub const HAS_EXPLICIT_MOD: &str = "HasExplicitMod";
pub const HAS_ENCHANTMENT: &str = "HasEnchantment";
pub const ENCHANTMENT_PASSIVE_NODE: &str = "EnchantmentPassiveNode";
pub const ARCHNEMESIS_MOD: &str = "ArchnemesisMod";
pub const IDENTIFIED: &str = "Identified";
pub const CORRUPTED: &str = "Corrupted";
pub const MIRRORED: &str = "Mirrored";
pub const ELDER_ITEM: &str = "ElderItem";
pub const SHAPER_ITEM: &str = "ShaperItem";
pub const FRACTURED_ITEM: &str = "FracturedItem";
pub const SYNTHESISED_ITEM: &str = "SynthesisedItem";
pub const ANY_ENCHANTMENT: &str = "AnyEnchantment";
pub const SHAPED_MAP: &str = "ShapedMap";
pub const ELDER_MAP: &str = "ElderMap";
pub const BLIGHTED_MAP: &str = "BlightedMap";
pub const REPLICA: &str = "Replica";
pub const ALTERNATE_QUALITY: &str = "AlternateQuality";
pub const HAS_INFLUENCE: &str = "HasInfluence";

// ---- actions ----

pub const SET_TEXT_COLOR: &str = "SetTextColor";
pub const SET_BORDER_COLOR: &str = "SetBorderColor";
pub const SET_BACKGROUND_COLOR: &str = "SetBackgroundColor";
pub const SET_FONT_SIZE: &str = "SetFontSize";
pub const PLAY_EFFECT: &str = "PlayEffect";
pub const MINIMAP_ICON: &str = "MinimapIcon";
pub const PLAY_ALERT_SOUND: &str = "PlayAlertSound";
pub const PLAY_ALERT_SOUND_POSITIONAL: &str = "PlayAlertSoundPositional";
pub const SET_ALERT_SOUND: &str = "SetAlertSound";
pub const SET_ALERT_SOUND_POSITIONAL: &str = "SetAlertSoundPositional";
pub const CUSTOM_ALERT_SOUND: &str = "CustomAlertSound";
pub const CUSTOM_ALERT_SOUND_OPTIONAL: &str = "CustomAlertSoundOptional";
pub const ENABLE_DROP_SOUND: &str = "EnableDropSound";
pub const DISABLE_DROP_SOUND: &str = "DisableDropSound";
pub const ENABLE_DROP_SOUND_IF_ALERT_SOUND: &str = "EnableDropSoundIfAlertSound";
pub const DISABLE_DROP_SOUND_IF_ALERT_SOUND: &str = "DisableDropSoundIfAlertSound";

// ---- spirit filter extensions ----

pub const SET: &str = "Set";
pub const EXPAND: &str = "Expand";
pub const AUTOGEN: &str = "Autogen";
pub const PRICE: &str = "Price";
pub const VERSION: &str = "version";
pub const CONFIG: &str = "config";
pub const YES: &str = "yes";
pub const NO: &str = "no";

/// Class names attached by autogeneration, exactly as the game reports them.
pub mod item_class_names {
    pub const CURRENCY_STACKABLE: &str = "Stackable Currency";
    pub const MAP_FRAGMENTS: &str = "Map Fragments";
    pub const DELIRIUM_ORBS: &str = "Delirium Orb";
    pub const DIVINATION_CARD: &str = "Divination Card";
    pub const PROPHECIES: &str = "Stackable Currency";
    pub const ESSENCES: &str = "Stackable Currency";
    pub const FOSSILS: &str = "Stackable Currency";
    pub const RESONATORS: &str = "Delve Stackable Socketable Currency";
    pub const SCARABS: &str = "Map Fragments";
    pub const INCUBATOR: &str = "Incubator";
    pub const OILS: &str = "Stackable Currency";
    pub const VIALS: &str = "Stackable Currency";
    pub const GEMS_ACTIVE: &str = "Active Skill Gems";
    pub const GEMS_SUPPORT: &str = "Support Skill Gems";
}
