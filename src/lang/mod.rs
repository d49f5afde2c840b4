pub mod action_set;
pub mod condition_set;
pub mod item;
pub mod item_filter;
pub mod keywords;
pub mod limits;
pub mod market;
pub mod types;

pub use action_set::{
    ActionSet, AlertSound, AlertSoundAction, BuiltinAlertSoundId, Color, ColorAction,
    FontSizeAction, MinimapIcon, MinimapIconAction, PlayEffect, PlayEffectAction,
    SwitchDropSoundAction,
};
pub use condition_set::{
    AutogenCondition, BooleanCondition, ConditionSet, GemQualityTypeCondition, InfluenceFlags,
    InfluencesCondition, RangeBound, RangeCondition, RangedStringsCondition, SocketSpecCondition,
    SpiritConditionSet, StringsCondition,
};
pub use item::{Item, LinkedSockets, SocketColor, SocketInfo};
pub use item_filter::{
    pass_item_through_filter, AutogenExtension, ItemFilter, ItemFilterBlock, ItemFilteringResult,
    ItemStyle, SpiritFilter, SpiritFilterBlock,
};
pub use market::{DataSource, ItemPriceData, ItemPriceMetadata, ItemPriceReport};
pub use types::{
    ActionProperty, AutogenCategory, ComparisonOp, ConditionProperty, GemQualityType, Influence,
    Object, ObjectKind, PrimitiveValue, Rarity, Shape, ShaperVoiceLine, SingleObject, SocketSpec,
    Suit, Visibility,
};
