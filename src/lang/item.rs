use crate::lang::condition_set::InfluenceFlags;
use crate::lang::types::{GemQualityType, Rarity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketColor {
    R,
    G,
    B,
    W,
    /// Abyss socket.
    A,
    /// Resonator socket.
    D,
}

impl SocketColor {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'R' => SocketColor::R,
            'G' => SocketColor::G,
            'B' => SocketColor::B,
            'W' => SocketColor::W,
            'A' => SocketColor::A,
            'D' => SocketColor::D,
            _ => return None,
        })
    }

    pub fn to_char(self) -> char {
        match self {
            SocketColor::R => 'R',
            SocketColor::G => 'G',
            SocketColor::B => 'B',
            SocketColor::W => 'W',
            SocketColor::A => 'A',
            SocketColor::D => 'D',
        }
    }
}

/// A single group of linked sockets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkedSockets {
    pub sockets: Vec<SocketColor>,
}

impl LinkedSockets {
    pub fn new(colors: impl IntoIterator<Item = SocketColor>) -> Self {
        LinkedSockets {
            sockets: colors.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }

    pub fn count_of(&self, color: SocketColor) -> i32 {
        self.sockets.iter().filter(|&&c| c == color).count() as i32
    }

    /// Abyss and resonator sockets can never be linked with others.
    pub fn is_valid(&self) -> bool {
        let has_special = self
            .sockets
            .iter()
            .any(|&c| c == SocketColor::A || c == SocketColor::D);
        !(has_special && self.sockets.len() > 1)
    }
}

/// Socket state of an item: up to six sockets in up to six link groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SocketInfo {
    pub groups: Vec<LinkedSockets>,
}

impl SocketInfo {
    /// Size of the largest link group.
    pub fn links(&self) -> i32 {
        self.groups.iter().map(|g| g.len() as i32).max().unwrap_or(0)
    }

    /// Total number of sockets across all groups.
    pub fn sockets(&self) -> i32 {
        self.groups.iter().map(|g| g.len() as i32).sum()
    }

    pub fn count_of(&self, color: SocketColor) -> i32 {
        self.groups.iter().map(|g| g.count_of(color)).sum()
    }

    pub fn is_valid(&self) -> bool {
        self.sockets() <= 6 && self.groups.iter().all(LinkedSockets::is_valid)
    }

    /// Parse a socket description such as `"R-R-G B W"`: `-` links
    /// sockets, whitespace separates groups.
    pub fn parse(text: &str) -> Option<SocketInfo> {
        let mut info = SocketInfo::default();
        for group_text in text.split_whitespace() {
            let mut group = LinkedSockets::default();
            for part in group_text.split('-') {
                let mut chars = part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                group.sockets.push(SocketColor::from_char(c)?);
            }
            info.groups.push(group);
        }
        if info.is_valid() {
            Some(info)
        } else {
            None
        }
    }
}

/// Properties of a dropped item, as the game client exposes them to
/// filters. Fields default to the sentinel values the client assumes for
/// items without the property.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub class: String,
    /// Only identified items of non-normal rarity carry a name.
    pub name: Option<String>,
    pub base_type: String,
    pub height: i32,
    pub width: i32,
    /// If set, the base type additionally answers Prophecy conditions.
    pub is_prophecy: bool,

    pub item_level: i32,
    pub drop_level: i32,
    pub quality: i32,
    pub rarity: Rarity,
    pub sockets: SocketInfo,
    pub explicit_mods: Vec<String>,
    pub enchantments_labyrinth: Vec<String>,
    pub enchantments_passive_nodes: Vec<String>,
    pub archnemesis_mods: Vec<String>,
    pub corrupted_mods: i32,
    pub stack_size: i32,
    pub gem_level: i32,
    pub gem_quality_type: GemQualityType,
    pub map_tier: i32,
    pub area_level: i32,
    pub is_identified: bool,
    pub is_corrupted: bool,
    pub is_mirrored: bool,
    pub is_fractured_item: bool,
    pub is_synthesised_item: bool,
    pub is_shaped_map: bool,
    pub is_elder_map: bool,
    pub is_blighted_map: bool,
    pub is_replica: bool,
    pub is_alternate_quality: bool,
    pub influence: InfluenceFlags,
}

impl Default for Item {
    fn default() -> Self {
        Item {
            class: String::new(),
            name: None,
            base_type: String::new(),
            height: 1,
            width: 1,
            is_prophecy: false,
            item_level: 0,
            drop_level: 1,
            quality: 0,
            rarity: Rarity::Normal,
            sockets: SocketInfo::default(),
            explicit_mods: Vec::new(),
            enchantments_labyrinth: Vec::new(),
            enchantments_passive_nodes: Vec::new(),
            archnemesis_mods: Vec::new(),
            corrupted_mods: 0,
            stack_size: 1,
            gem_level: 0,
            gem_quality_type: GemQualityType::Superior,
            map_tier: 0,
            area_level: 0,
            is_identified: false,
            is_corrupted: false,
            is_mirrored: false,
            is_fractured_item: false,
            is_synthesised_item: false,
            is_shaped_map: false,
            is_elder_map: false,
            is_blighted_map: false,
            is_replica: false,
            is_alternate_quality: false,
            influence: InfluenceFlags::default(),
        }
    }
}

impl Item {
    /// Whether the item has an enchantment of any source.
    pub fn is_enchanted(&self) -> bool {
        !self.enchantments_labyrinth.is_empty() || !self.enchantments_passive_nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_groups_and_links() {
        let info = SocketInfo::parse("R-R-G B").unwrap();
        assert_eq!(info.groups.len(), 2);
        assert_eq!(info.sockets(), 4);
        assert_eq!(info.links(), 3);
        assert_eq!(info.count_of(SocketColor::R), 2);
        assert_eq!(info.count_of(SocketColor::B), 1);
    }

    #[test]
    fn parse_rejects_unknown_letters() {
        assert!(SocketInfo::parse("R-X").is_none());
    }

    #[test]
    fn parse_rejects_seven_sockets() {
        assert!(SocketInfo::parse("R R R R R R R").is_none());
    }

    #[test]
    fn linked_abyss_socket_is_invalid() {
        let group = LinkedSockets::new([SocketColor::A, SocketColor::R]);
        assert!(!group.is_valid());
        let alone = LinkedSockets::new([SocketColor::A]);
        assert!(alone.is_valid());
    }

    #[test]
    fn empty_item_has_no_links() {
        let info = SocketInfo::default();
        assert_eq!(info.links(), 0);
        assert_eq!(info.sockets(), 0);
    }

    #[test]
    fn default_item_uses_sentinel_values() {
        let item = Item::default();
        assert_eq!(item.drop_level, 1);
        assert_eq!(item.stack_size, 1);
        assert_eq!(item.rarity, Rarity::Normal);
        assert!(!item.is_enchanted());
    }
}
