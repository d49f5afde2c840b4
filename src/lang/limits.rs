//! Numeric limits imposed by the game client on filter values.

pub const MIN_ITEM_SOCKETS: i32 = 0;
pub const MAX_ITEM_SOCKETS: i32 = 6;

pub const MIN_COLOR_COMPONENT: i32 = 0;
pub const MAX_COLOR_COMPONENT: i32 = 255;

/// Font sizes outside this range are accepted but clamped by the client,
/// hence a warning rather than an error.
pub const MIN_FONT_SIZE: i32 = 18;
pub const MAX_FONT_SIZE: i32 = 45;

pub const MIN_ALERT_SOUND_ID: i32 = 1;
pub const MAX_ALERT_SOUND_ID: i32 = 16;

pub const MIN_ALERT_VOLUME: i32 = 0;
pub const MAX_ALERT_VOLUME: i32 = 300;

pub const MIN_MINIMAP_ICON_SIZE: i32 = 0;
pub const MAX_MINIMAP_ICON_SIZE: i32 = 2;

/// `MinimapIcon -1` cancels an icon inherited from an outer scope.
pub const MINIMAP_ICON_CANCEL: i32 = -1;
