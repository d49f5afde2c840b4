use std::fmt::Write;

use crate::lang::keywords;
use crate::lang::types::{Shape, ShaperVoiceLine, Suit};
use crate::token::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAction {
    pub color: Color,
    pub origin: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizeAction {
    pub size: i32,
    pub origin: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayEffect {
    Enabled { suit: Suit, is_temporary: bool },
    /// `PlayEffect None` cancels an effect inherited from an outer scope.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayEffectAction {
    pub effect: PlayEffect,
    pub origin: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimapIcon {
    Enabled { size: i32, suit: Suit, shape: Shape },
    /// `MinimapIcon -1` cancels an icon inherited from an outer scope.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimapIconAction {
    pub icon: MinimapIcon,
    pub origin: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinAlertSoundId {
    /// `PlayAlertSound None` disables the sound.
    None,
    Integer(i32),
    ShaperVoiceLine(ShaperVoiceLine),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertSound {
    Builtin {
        id: BuiltinAlertSoundId,
        positional: bool,
    },
    Custom {
        path: String,
        optional: bool,
    },
}

/// One slot shared by every alert sound action keyword; inner spirit
/// filter scopes override it as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSoundAction {
    pub sound: AlertSound,
    pub volume: Option<i32>,
    pub origin: Span,
}

impl AlertSoundAction {
    pub fn is_disabled(&self) -> bool {
        matches!(
            self.sound,
            AlertSound::Builtin {
                id: BuiltinAlertSoundId::None,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchDropSoundAction {
    pub enable: bool,
    pub origin: Span,
}

/// A record of optional actions. Overlaying replaces whole slots; outer
/// scopes are never mutated because the compiler copies the set on
/// entering a nested block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionSet {
    pub text_color: Option<ColorAction>,
    pub border_color: Option<ColorAction>,
    pub background_color: Option<ColorAction>,
    pub font_size: Option<FontSizeAction>,
    pub play_effect: Option<PlayEffectAction>,
    pub minimap_icon: Option<MinimapIconAction>,
    pub alert_sound: Option<AlertSoundAction>,
    pub switch_drop_sound: Option<SwitchDropSoundAction>,
    pub switch_drop_sound_if_alert_sound: Option<SwitchDropSoundAction>,
}

fn generate_color(action: &Option<ColorAction>, keyword: &str, output: &mut String) {
    if let Some(action) = action {
        let c = action.color;
        let _ = write!(output, "\t{} {} {} {}", keyword, c.r, c.g, c.b);
        if let Some(alpha) = c.a {
            let _ = write!(output, " {}", alpha);
        }
        output.push('\n');
    }
}

fn generate_switch_drop_sound(
    action: &Option<SwitchDropSoundAction>,
    if_alert_sound: bool,
    output: &mut String,
) {
    if let Some(action) = action {
        let keyword = match (action.enable, if_alert_sound) {
            (true, false) => keywords::ENABLE_DROP_SOUND,
            (false, false) => keywords::DISABLE_DROP_SOUND,
            (true, true) => keywords::ENABLE_DROP_SOUND_IF_ALERT_SOUND,
            (false, true) => keywords::DISABLE_DROP_SOUND_IF_ALERT_SOUND,
        };
        let _ = writeln!(output, "\t{}", keyword);
    }
}

impl ActionSet {
    /// Write every present action, colors first, in canonical order.
    pub fn generate(&self, output: &mut String) {
        generate_color(&self.text_color, keywords::SET_TEXT_COLOR, output);
        generate_color(&self.border_color, keywords::SET_BORDER_COLOR, output);
        generate_color(&self.background_color, keywords::SET_BACKGROUND_COLOR, output);

        if let Some(action) = &self.font_size {
            let _ = writeln!(output, "\t{} {}", keywords::SET_FONT_SIZE, action.size);
        }

        if let Some(action) = &self.play_effect {
            match action.effect {
                PlayEffect::Enabled { suit, is_temporary } => {
                    let _ = write!(output, "\t{} {}", keywords::PLAY_EFFECT, suit.as_keyword());
                    if is_temporary {
                        let _ = write!(output, " {}", keywords::TEMP);
                    }
                    output.push('\n');
                }
                PlayEffect::Disabled => {
                    let _ = writeln!(output, "\t{} {}", keywords::PLAY_EFFECT, keywords::NONE);
                }
            }
        }

        if let Some(action) = &self.minimap_icon {
            match action.icon {
                MinimapIcon::Enabled { size, suit, shape } => {
                    let _ = writeln!(
                        output,
                        "\t{} {} {} {}",
                        keywords::MINIMAP_ICON,
                        size,
                        suit.as_keyword(),
                        shape.as_keyword()
                    );
                }
                MinimapIcon::Disabled => {
                    let _ = writeln!(
                        output,
                        "\t{} {}",
                        keywords::MINIMAP_ICON,
                        super::limits::MINIMAP_ICON_CANCEL
                    );
                }
            }
        }

        if let Some(action) = &self.alert_sound {
            match &action.sound {
                AlertSound::Builtin { id, positional } => {
                    let keyword = if *positional {
                        keywords::PLAY_ALERT_SOUND_POSITIONAL
                    } else {
                        keywords::PLAY_ALERT_SOUND
                    };
                    let _ = write!(output, "\t{}", keyword);
                    match id {
                        BuiltinAlertSoundId::None => {
                            let _ = write!(output, " {}", keywords::NONE);
                        }
                        BuiltinAlertSoundId::Integer(id) => {
                            let _ = write!(output, " {}", id);
                        }
                        BuiltinAlertSoundId::ShaperVoiceLine(line) => {
                            let _ = write!(output, " {}", line.as_keyword());
                        }
                    }
                }
                AlertSound::Custom { path, optional } => {
                    let keyword = if *optional {
                        keywords::CUSTOM_ALERT_SOUND_OPTIONAL
                    } else {
                        keywords::CUSTOM_ALERT_SOUND
                    };
                    let _ = write!(output, "\t{} \"{}\"", keyword, path);
                }
            }
            if let Some(volume) = action.volume {
                if !action.is_disabled() {
                    let _ = write!(output, " {}", volume);
                }
            }
            output.push('\n');
        }

        generate_switch_drop_sound(&self.switch_drop_sound, false, output);
        generate_switch_drop_sound(&self.switch_drop_sound_if_alert_sound, true, output);
    }

    /// Overlay `other` on top of this set: any slot present in `other`
    /// replaces the one here.
    pub fn override_with(&mut self, other: &ActionSet) {
        if let Some(action) = &other.text_color {
            self.text_color = Some(*action);
        }
        if let Some(action) = &other.border_color {
            self.border_color = Some(*action);
        }
        if let Some(action) = &other.background_color {
            self.background_color = Some(*action);
        }
        if let Some(action) = &other.font_size {
            self.font_size = Some(*action);
        }
        if let Some(action) = &other.play_effect {
            self.play_effect = Some(*action);
        }
        if let Some(action) = &other.minimap_icon {
            self.minimap_icon = Some(*action);
        }
        if let Some(action) = &other.alert_sound {
            self.alert_sound = Some(action.clone());
        }
        if let Some(action) = &other.switch_drop_sound {
            self.switch_drop_sound = Some(*action);
        }
        if let Some(action) = &other.switch_drop_sound_if_alert_sound {
            self.switch_drop_sound_if_alert_sound = Some(*action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn color_with_alpha_emits_four_components() {
        let mut set = ActionSet::default();
        set.border_color = Some(ColorAction {
            color: Color {
                r: 255,
                g: 0,
                b: 127,
                a: Some(200),
            },
            origin: span(),
        });
        let mut out = String::new();
        set.generate(&mut out);
        assert_eq!(out, "\tSetBorderColor 255 0 127 200\n");
    }

    #[test]
    fn shaper_voice_line_emits_without_volume() {
        let mut set = ActionSet::default();
        set.alert_sound = Some(AlertSoundAction {
            sound: AlertSound::Builtin {
                id: BuiltinAlertSoundId::ShaperVoiceLine(ShaperVoiceLine::Exalted),
                positional: false,
            },
            volume: None,
            origin: span(),
        });
        let mut out = String::new();
        set.generate(&mut out);
        assert_eq!(out, "\tPlayAlertSound ShExalted\n");
    }

    #[test]
    fn disabled_alert_sound_suppresses_volume() {
        let mut set = ActionSet::default();
        set.alert_sound = Some(AlertSoundAction {
            sound: AlertSound::Builtin {
                id: BuiltinAlertSoundId::None,
                positional: false,
            },
            volume: Some(300),
            origin: span(),
        });
        let mut out = String::new();
        set.generate(&mut out);
        assert_eq!(out, "\tPlayAlertSound None\n");
    }

    #[test]
    fn custom_alert_sound_quotes_path() {
        let mut set = ActionSet::default();
        set.alert_sound = Some(AlertSoundAction {
            sound: AlertSound::Custom {
                path: "pop.wav".into(),
                optional: true,
            },
            volume: Some(100),
            origin: span(),
        });
        let mut out = String::new();
        set.generate(&mut out);
        assert_eq!(out, "\tCustomAlertSoundOptional \"pop.wav\" 100\n");
    }

    #[test]
    fn override_replaces_only_present_slots() {
        let mut outer = ActionSet::default();
        outer.font_size = Some(FontSizeAction {
            size: 40,
            origin: span(),
        });
        outer.border_color = Some(ColorAction {
            color: Color {
                r: 1,
                g: 2,
                b: 3,
                a: None,
            },
            origin: span(),
        });

        let mut inner = ActionSet::default();
        inner.border_color = Some(ColorAction {
            color: Color {
                r: 255,
                g: 255,
                b: 255,
                a: None,
            },
            origin: span(),
        });

        outer.override_with(&inner);
        assert_eq!(outer.font_size.map(|a| a.size), Some(40));
        assert_eq!(outer.border_color.map(|a| a.color.r), Some(255));
    }

    #[test]
    fn minimap_cancel_emits_sentinel() {
        let mut set = ActionSet::default();
        set.minimap_icon = Some(MinimapIconAction {
            icon: MinimapIcon::Disabled,
            origin: span(),
        });
        let mut out = String::new();
        set.generate(&mut out);
        assert_eq!(out, "\tMinimapIcon -1\n");
    }

    #[test]
    fn play_effect_temp_emits_suffix() {
        let mut set = ActionSet::default();
        set.play_effect = Some(PlayEffectAction {
            effect: PlayEffect::Enabled {
                suit: Suit::Yellow,
                is_temporary: true,
            },
            origin: span(),
        });
        let mut out = String::new();
        set.generate(&mut out);
        assert_eq!(out, "\tPlayEffect Yellow Temp\n");
    }
}
