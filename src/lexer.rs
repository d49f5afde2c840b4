use crate::lang::keywords;
use crate::lang::types::{ActionProperty, ComparisonOp, ConditionProperty};
use crate::lang::{GemQualityType, Influence, Rarity, Shape, ShaperVoiceLine, Suit, Visibility};
use crate::lexemes::LexemeTable;
use crate::token::{Span, Token, TokenKind};

/// Hand-written lexer over the raw input bytes.
///
/// Whitespace and `#` line comments are discarded. Words are classified
/// against the keyword tables; everything unrecognized is kept as an
/// `Unknown` token so the parser can defer the error to semantic
/// diagnostics when it occurs in a value position.
pub struct Lexer<'a, 'lex> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    lexemes: &'lex mut LexemeTable,
}

impl<'a, 'lex> Lexer<'a, 'lex> {
    pub fn new(source: &'a str, lexemes: &'lex mut LexemeTable) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            lexemes,
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.pos >= self.bytes.len() {
                tokens.push(Token::new(TokenKind::Eof, Span::new(self.pos, self.pos)));
                return tokens;
            }
            tokens.push(self.next_token());
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'#' => {
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let byte = self.bytes[self.pos];

        match byte {
            b'"' => self.lex_string(start),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'$' => self.single(TokenKind::Dollar),
            b':' => self.single(TokenKind::Colon),
            b',' => self.single(TokenKind::Comma),
            b'&' => {
                if self.peek_at(1) == Some(b'&') {
                    self.pos += 2;
                    Token::new(TokenKind::AndAnd, Span::new(start, self.pos))
                } else {
                    self.unknown_char(start)
                }
            }
            b'<' => self.comparison(start, ComparisonOp::Less, ComparisonOp::LessEqual),
            b'>' => self.comparison(start, ComparisonOp::Greater, ComparisonOp::GreaterEqual),
            b'=' => self.comparison(start, ComparisonOp::Equal, ComparisonOp::ExactMatch),
            b'!' => self.comparison(start, ComparisonOp::NotEqual, ComparisonOp::NotEqual),
            b'-' => {
                if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                    self.lex_number(start, true)
                } else {
                    self.unknown_char(start)
                }
            }
            b'0'..=b'9' => self.lex_number(start, false),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.lex_word(start),
            _ => self.unknown_char(start),
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.pos += 1;
        Token::new(kind, Span::new(start, self.pos))
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn unknown_char(&mut self, start: usize) -> Token {
        self.pos += 1;
        let symbol = self.lexemes.insert(&self.source[start..self.pos]);
        Token::new(TokenKind::Unknown(symbol), Span::new(start, self.pos))
    }

    /// `=` alone is Equal, `==` is ExactMatch; same pattern for the
    /// other two-character operators.
    fn comparison(&mut self, start: usize, bare: ComparisonOp, with_equal: ComparisonOp) -> Token {
        self.pos += 1;
        if self.bytes.get(self.pos) == Some(&b'=') {
            self.pos += 1;
            Token::new(TokenKind::Cmp(with_equal), Span::new(start, self.pos))
        } else {
            Token::new(TokenKind::Cmp(bare), Span::new(start, self.pos))
        }
    }

    /// String literals have no escape sequences; the body runs to the
    /// next quote.
    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        let content_start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'"' {
            self.pos += 1;
        }
        let content = &self.source[content_start..self.pos];
        if self.pos < self.bytes.len() {
            self.pos += 1;
        }
        let symbol = self.lexemes.insert(content);
        Token::new(TokenKind::Str(symbol), Span::new(start, self.pos))
    }

    fn scan_digits(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
    }

    fn scan_word_tail(&mut self) {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_alphanumeric() || self.bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
    }

    /// Numbers cover four shapes: integers, fractionals (`0.125`),
    /// version literals (`1.2.3`) and socket literals (`5RGB`).
    fn lex_number(&mut self, start: usize, negative: bool) -> Token {
        self.scan_digits();
        let integer_end = self.pos;

        // fractional or version literal
        if self.bytes.get(self.pos) == Some(&b'.')
            && self.peek_at(1).is_some_and(|b| b.is_ascii_digit())
        {
            self.pos += 1;
            self.scan_digits();

            if self.bytes.get(self.pos) == Some(&b'.')
                && self.peek_at(1).is_some_and(|b| b.is_ascii_digit())
                && !negative
            {
                let minor_end = self.pos;
                self.pos += 1;
                self.scan_digits();
                return self.version_token(start, integer_end, minor_end);
            }

            let text = &self.source[start..self.pos];
            return match text.parse::<f64>() {
                Ok(value) => Token::new(TokenKind::Frac(value), Span::new(start, self.pos)),
                Err(_) => self.unknown_word(start),
            };
        }

        // socket literal: digits immediately followed by letters
        if self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_')
        {
            let letters_start = self.pos;
            self.scan_word_tail();
            let letters = &self.source[letters_start..self.pos];
            if negative || !letters.bytes().all(is_socket_letter) {
                return self.unknown_word(start);
            }
            let count = match self.source[start..letters_start].parse::<i32>() {
                Ok(count) => count,
                Err(_) => return self.unknown_word(start),
            };
            let letters = self.lexemes.insert(letters);
            return Token::new(
                TokenKind::SocketLiteral { count, letters },
                Span::new(start, self.pos),
            );
        }

        match self.source[start..self.pos].parse::<i32>() {
            Ok(value) => Token::new(TokenKind::Int(value), Span::new(start, self.pos)),
            Err(_) => self.unknown_word(start),
        }
    }

    fn version_token(&mut self, start: usize, integer_end: usize, minor_end: usize) -> Token {
        let major = self.source[start..integer_end].parse::<i32>();
        let minor = self.source[integer_end + 1..minor_end].parse::<i32>();
        let patch = self.source[minor_end + 1..self.pos].parse::<i32>();
        match (major, minor, patch) {
            (Ok(major), Ok(minor), Ok(patch)) => Token::new(
                TokenKind::VersionLiteral {
                    major,
                    minor,
                    patch,
                },
                Span::new(start, self.pos),
            ),
            _ => self.unknown_word(start),
        }
    }

    fn unknown_word(&mut self, start: usize) -> Token {
        self.scan_word_tail();
        let symbol = self.lexemes.insert(&self.source[start..self.pos]);
        Token::new(TokenKind::Unknown(symbol), Span::new(start, self.pos))
    }

    fn lex_word(&mut self, start: usize) -> Token {
        self.scan_word_tail();
        let word = &self.source[start..self.pos];
        let kind = match classify_word(word) {
            Some(kind) => kind,
            None => TokenKind::Ident(self.lexemes.insert(word)),
        };
        Token::new(kind, Span::new(start, self.pos))
    }
}

fn is_socket_letter(byte: u8) -> bool {
    matches!(byte, b'R' | b'G' | b'B' | b'W' | b'A' | b'D')
}

fn classify_word(word: &str) -> Option<TokenKind> {
    use keywords as kw;

    Some(match word {
        kw::SHOW => TokenKind::Visibility(Visibility::Show),
        kw::HIDE => TokenKind::Visibility(Visibility::Hide),
        kw::MINIMAL => TokenKind::Visibility(Visibility::Minimal),
        kw::SHOW_DISCARD => TokenKind::Visibility(Visibility::ShowDiscard),
        kw::HIDE_DISCARD => TokenKind::Visibility(Visibility::HideDiscard),

        kw::TRUE | "true" => TokenKind::True,
        kw::FALSE | "false" => TokenKind::False,
        kw::NONE => TokenKind::NoneLit,
        kw::TEMP => TokenKind::TempLit,

        kw::NORMAL => TokenKind::RarityLit(Rarity::Normal),
        kw::MAGIC => TokenKind::RarityLit(Rarity::Magic),
        kw::RARE => TokenKind::RarityLit(Rarity::Rare),
        kw::UNIQUE => TokenKind::RarityLit(Rarity::Unique),

        kw::CIRCLE => TokenKind::ShapeLit(Shape::Circle),
        kw::DIAMOND => TokenKind::ShapeLit(Shape::Diamond),
        kw::HEXAGON => TokenKind::ShapeLit(Shape::Hexagon),
        kw::SQUARE => TokenKind::ShapeLit(Shape::Square),
        kw::STAR => TokenKind::ShapeLit(Shape::Star),
        kw::TRIANGLE => TokenKind::ShapeLit(Shape::Triangle),
        kw::CROSS => TokenKind::ShapeLit(Shape::Cross),
        kw::MOON => TokenKind::ShapeLit(Shape::Moon),
        kw::RAINDROP => TokenKind::ShapeLit(Shape::Raindrop),
        kw::KITE => TokenKind::ShapeLit(Shape::Kite),
        kw::PENTAGON => TokenKind::ShapeLit(Shape::Pentagon),
        kw::UPSIDE_DOWN_HOUSE => TokenKind::ShapeLit(Shape::UpsideDownHouse),

        kw::RED => TokenKind::SuitLit(Suit::Red),
        kw::GREEN => TokenKind::SuitLit(Suit::Green),
        kw::BLUE => TokenKind::SuitLit(Suit::Blue),
        kw::WHITE => TokenKind::SuitLit(Suit::White),
        kw::BROWN => TokenKind::SuitLit(Suit::Brown),
        kw::YELLOW => TokenKind::SuitLit(Suit::Yellow),
        kw::CYAN => TokenKind::SuitLit(Suit::Cyan),
        kw::GREY => TokenKind::SuitLit(Suit::Grey),
        kw::ORANGE => TokenKind::SuitLit(Suit::Orange),
        kw::PINK => TokenKind::SuitLit(Suit::Pink),
        kw::PURPLE => TokenKind::SuitLit(Suit::Purple),

        kw::SHAPER => TokenKind::InfluenceLit(Influence::Shaper),
        kw::ELDER => TokenKind::InfluenceLit(Influence::Elder),
        kw::CRUSADER => TokenKind::InfluenceLit(Influence::Crusader),
        kw::REDEEMER => TokenKind::InfluenceLit(Influence::Redeemer),
        kw::HUNTER => TokenKind::InfluenceLit(Influence::Hunter),
        kw::WARLORD => TokenKind::InfluenceLit(Influence::Warlord),

        kw::SH_MIRROR => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Mirror),
        kw::SH_EXALTED => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Exalted),
        kw::SH_DIVINE => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Divine),
        kw::SH_GENERAL => TokenKind::ShaperVoiceLit(ShaperVoiceLine::General),
        kw::SH_REGAL => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Regal),
        kw::SH_CHAOS => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Chaos),
        kw::SH_FUSING => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Fusing),
        kw::SH_ALCHEMY => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Alchemy),
        kw::SH_VAAL => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Vaal),
        kw::SH_BLESSED => TokenKind::ShaperVoiceLit(ShaperVoiceLine::Blessed),

        kw::SUPERIOR => TokenKind::GemQualityLit(GemQualityType::Superior),
        kw::DIVERGENT => TokenKind::GemQualityLit(GemQualityType::Divergent),
        kw::ANOMALOUS => TokenKind::GemQualityLit(GemQualityType::Anomalous),
        kw::PHANTASMAL => TokenKind::GemQualityLit(GemQualityType::Phantasmal),

        kw::ITEM_LEVEL => TokenKind::Condition(ConditionProperty::ItemLevel),
        kw::DROP_LEVEL => TokenKind::Condition(ConditionProperty::DropLevel),
        kw::QUALITY => TokenKind::Condition(ConditionProperty::Quality),
        kw::RARITY => TokenKind::Condition(ConditionProperty::Rarity),
        kw::CLASS => TokenKind::Condition(ConditionProperty::Class),
        kw::BASE_TYPE => TokenKind::Condition(ConditionProperty::BaseType),
        kw::PROPHECY => TokenKind::Condition(ConditionProperty::Prophecy),
        kw::LINKED_SOCKETS => TokenKind::Condition(ConditionProperty::LinkedSockets),
        kw::SOCKETS => TokenKind::Condition(ConditionProperty::Sockets),
        kw::SOCKET_GROUP => TokenKind::Condition(ConditionProperty::SocketGroup),
        kw::HEIGHT => TokenKind::Condition(ConditionProperty::Height),
        kw::WIDTH => TokenKind::Condition(ConditionProperty::Width),
        kw::STACK_SIZE => TokenKind::Condition(ConditionProperty::StackSize),
        kw::GEM_LEVEL => TokenKind::Condition(ConditionProperty::GemLevel),
        kw::GEM_QUALITY_TYPE => TokenKind::Condition(ConditionProperty::GemQualityType),
        kw::MAP_TIER => TokenKind::Condition(ConditionProperty::MapTier),
        kw::AREA_LEVEL => TokenKind::Condition(ConditionProperty::AreaLevel),
        kw::CORRUPTED_MODS => TokenKind::Condition(ConditionProperty::CorruptedMods),
        kw::ENCHANTMENT_PASSIVE_NUM => {
            TokenKind::Condition(ConditionProperty::EnchantmentPassiveNum)
        }
        kw::HAS_EXPLICIT_MOD => TokenKind::Condition(ConditionProperty::HasExplicitMod),
        kw::HAS_ENCHANTMENT => TokenKind::Condition(ConditionProperty::HasEnchantment),
        kw::ENCHANTMENT_PASSIVE_NODE => {
            TokenKind::Condition(ConditionProperty::EnchantmentPassiveNode)
        }
        kw::ARCHNEMESIS_MOD => TokenKind::Condition(ConditionProperty::ArchnemesisMod),
        kw::IDENTIFIED => TokenKind::Condition(ConditionProperty::Identified),
        kw::CORRUPTED => TokenKind::Condition(ConditionProperty::Corrupted),
        kw::MIRRORED => TokenKind::Condition(ConditionProperty::Mirrored),
        kw::ELDER_ITEM => TokenKind::Condition(ConditionProperty::ElderItem),
        kw::SHAPER_ITEM => TokenKind::Condition(ConditionProperty::ShaperItem),
        kw::FRACTURED_ITEM => TokenKind::Condition(ConditionProperty::FracturedItem),
        kw::SYNTHESISED_ITEM => TokenKind::Condition(ConditionProperty::SynthesisedItem),
        kw::ANY_ENCHANTMENT => TokenKind::Condition(ConditionProperty::AnyEnchantment),
        kw::SHAPED_MAP => TokenKind::Condition(ConditionProperty::ShapedMap),
        kw::ELDER_MAP => TokenKind::Condition(ConditionProperty::ElderMap),
        kw::BLIGHTED_MAP => TokenKind::Condition(ConditionProperty::BlightedMap),
        kw::REPLICA => TokenKind::Condition(ConditionProperty::Replica),
        kw::ALTERNATE_QUALITY => TokenKind::Condition(ConditionProperty::AlternateQuality),
        kw::HAS_INFLUENCE => TokenKind::Condition(ConditionProperty::HasInfluence),

        kw::SET_TEXT_COLOR => TokenKind::Action(ActionProperty::SetTextColor),
        kw::SET_BORDER_COLOR => TokenKind::Action(ActionProperty::SetBorderColor),
        kw::SET_BACKGROUND_COLOR => TokenKind::Action(ActionProperty::SetBackgroundColor),
        kw::SET_FONT_SIZE => TokenKind::Action(ActionProperty::SetFontSize),
        kw::PLAY_EFFECT => TokenKind::Action(ActionProperty::PlayEffect),
        kw::MINIMAP_ICON => TokenKind::Action(ActionProperty::MinimapIcon),
        kw::PLAY_ALERT_SOUND => TokenKind::Action(ActionProperty::PlayAlertSound),
        kw::PLAY_ALERT_SOUND_POSITIONAL => {
            TokenKind::Action(ActionProperty::PlayAlertSoundPositional)
        }
        kw::SET_ALERT_SOUND => TokenKind::Action(ActionProperty::SetAlertSound),
        kw::SET_ALERT_SOUND_POSITIONAL => {
            TokenKind::Action(ActionProperty::SetAlertSoundPositional)
        }
        kw::CUSTOM_ALERT_SOUND => TokenKind::Action(ActionProperty::CustomAlertSound),
        kw::CUSTOM_ALERT_SOUND_OPTIONAL => {
            TokenKind::Action(ActionProperty::CustomAlertSoundOptional)
        }
        kw::ENABLE_DROP_SOUND => TokenKind::Action(ActionProperty::EnableDropSound),
        kw::DISABLE_DROP_SOUND => TokenKind::Action(ActionProperty::DisableDropSound),
        kw::ENABLE_DROP_SOUND_IF_ALERT_SOUND => {
            TokenKind::Action(ActionProperty::EnableDropSoundIfAlertSound)
        }
        kw::DISABLE_DROP_SOUND_IF_ALERT_SOUND => {
            TokenKind::Action(ActionProperty::DisableDropSoundIfAlertSound)
        }

        kw::SET | kw::EXPAND => TokenKind::Set,
        kw::AUTOGEN => TokenKind::Autogen,
        kw::PRICE => TokenKind::Price,
        kw::VERSION => TokenKind::VersionKw,
        kw::CONFIG => TokenKind::ConfigKw,
        kw::YES => TokenKind::Yes,
        kw::NO => TokenKind::No,

        _ => return None,
    })
}
