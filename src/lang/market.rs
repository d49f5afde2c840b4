//! Market data snapshots consumed by the autogeneration expander.
//!
//! Downloading and vendor-specific JSON decoding live outside the
//! compiler; this module defines the materialized snapshot, its on-disk
//! format and the snapshot cache keyed by data source and league.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lang::condition_set::InfluenceFlags;

pub const METADATA_FILENAME: &str = "metadata.json";
pub const DATA_FILENAME: &str = "data.json";
pub const CACHE_INDEX_FILENAME: &str = "index.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    None,
    Ninja,
    Watch,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::None => "none",
            DataSource::Ninja => "ninja",
            DataSource::Watch => "watch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "none" => DataSource::None,
            "ninja" => DataSource::Ninja,
            "watch" => DataSource::Watch,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub chaos_value: f64,
    pub is_low_confidence: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementaryItem {
    pub price: Price,
    pub name: String,
}

impl ElementaryItem {
    pub fn new(name: impl Into<String>, chaos_value: f64) -> Self {
        ElementaryItem {
            price: Price {
                chaos_value,
                is_low_confidence: false,
            },
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivinationCard {
    pub item: ElementaryItem,
    pub stack_size: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    pub item: ElementaryItem,
    pub level: i32,
    pub quality: i32,
    pub is_corrupted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseItem {
    pub item: ElementaryItem,
    pub item_level: i32,
    pub influence: InfluenceFlags,
}

/// Unique item prices grouped by base type.
///
/// A base with exactly one unique stays in `unambiguous`; the moment a
/// second unique shares the base, the whole base moves to `ambiguous`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UniqueItemPriceData {
    pub unambiguous: BTreeMap<String, ElementaryItem>,
    pub ambiguous: BTreeMap<String, Vec<ElementaryItem>>,
}

impl UniqueItemPriceData {
    pub fn add_item(&mut self, base_type: impl Into<String>, item: ElementaryItem) {
        let base_type = base_type.into();

        if let Some(existing) = self.ambiguous.get_mut(&base_type) {
            existing.push(item);
            return;
        }

        match self.unambiguous.remove(&base_type) {
            Some(first) => {
                self.ambiguous.insert(base_type, vec![first, item]);
            }
            None => {
                self.unambiguous.insert(base_type, item);
            }
        }
    }
}

/// Immutable snapshot of item prices at a point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemPriceData {
    pub divination_cards: Vec<DivinationCard>,

    pub currency: Vec<ElementaryItem>,
    pub fragments: Vec<ElementaryItem>,
    pub delirium_orbs: Vec<ElementaryItem>,
    pub vials: Vec<ElementaryItem>,
    pub oils: Vec<ElementaryItem>,
    pub incubators: Vec<ElementaryItem>,
    pub essences: Vec<ElementaryItem>,
    pub fossils: Vec<ElementaryItem>,
    pub prophecies: Vec<ElementaryItem>,
    pub resonators: Vec<ElementaryItem>,
    pub scarabs: Vec<ElementaryItem>,

    pub gems: Vec<Gem>,
    pub bases: Vec<BaseItem>,

    pub unique_eq: UniqueItemPriceData,
    pub unique_flasks: UniqueItemPriceData,
    pub unique_jewels: UniqueItemPriceData,
    pub unique_maps: UniqueItemPriceData,
}

impl ItemPriceData {
    /// Sort all non-unique categories by name. Makes snapshot diffs and
    /// generated name lists reproducible across download orders.
    pub fn sort(&mut self) {
        self.divination_cards.sort_by(|a, b| a.item.name.cmp(&b.item.name));
        for collection in [
            &mut self.currency,
            &mut self.fragments,
            &mut self.delirium_orbs,
            &mut self.vials,
            &mut self.oils,
            &mut self.incubators,
            &mut self.essences,
            &mut self.fossils,
            &mut self.prophecies,
            &mut self.resonators,
            &mut self.scarabs,
        ] {
            collection.sort_by(|a, b| a.name.cmp(&b.name));
        }
        self.gems.sort_by(|a, b| a.item.name.cmp(&b.item.name));
        self.bases.sort_by(|a, b| a.item.name.cmp(&b.item.name));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPriceMetadata {
    pub league_name: String,
    pub data_source: DataSource,
    pub download_date: DateTime<Utc>,
}

impl Default for ItemPriceMetadata {
    fn default() -> Self {
        ItemPriceMetadata {
            league_name: "(none)".to_string(),
            data_source: DataSource::None,
            download_date: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl ItemPriceMetadata {
    pub fn age_hours(&self, now: DateTime<Utc>) -> i64 {
        (now - self.download_date).num_hours()
    }

    pub fn save(&self, directory: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(directory.join(METADATA_FILENAME), json)?;
        Ok(())
    }

    pub fn load(directory: &Path) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(directory.join(METADATA_FILENAME))?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Snapshot data plus the metadata describing where it came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemPriceReport {
    pub data: ItemPriceData,
    pub metadata: ItemPriceMetadata,
}

impl ItemPriceReport {
    pub fn save_to_directory(&self, directory: &Path) -> Result<(), SnapshotError> {
        fs::create_dir_all(directory)?;
        self.metadata.save(directory)?;
        let json = serde_json::to_string(&self.data)?;
        fs::write(directory.join(DATA_FILENAME), json)?;
        Ok(())
    }

    pub fn load_from_directory(directory: &Path) -> Result<Self, SnapshotError> {
        let metadata = ItemPriceMetadata::load(directory)?;
        let json = fs::read_to_string(directory.join(DATA_FILENAME))?;
        let data = serde_json::from_str(&json)?;
        Ok(ItemPriceReport { data, metadata })
    }
}

// ============================================================================
// Snapshot cache
// ============================================================================

/// League names as cache directory components: lowercase, spaces
/// replaced so they stay path-safe.
pub fn normalized_league_name(league_name: &str) -> String {
    league_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheIndexEntry {
    pub data_source: DataSource,
    pub league_name: String,
    pub download_date: DateTime<Utc>,
    /// Version of the program that wrote the snapshot.
    pub program_version: String,
    pub directory: String,
}

/// Top-level record of every cached snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CacheIndex {
    pub snapshots: Vec<CacheIndexEntry>,
}

impl CacheIndex {
    pub fn load(cache_root: &Path) -> Result<Self, SnapshotError> {
        let path = cache_root.join(CACHE_INDEX_FILENAME);
        if !path.exists() {
            return Ok(CacheIndex::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, cache_root: &Path) -> Result<(), SnapshotError> {
        fs::create_dir_all(cache_root)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(cache_root.join(CACHE_INDEX_FILENAME), json)?;
        Ok(())
    }
}

fn cache_directory_name(data_source: DataSource, league_name: &str) -> String {
    format!("{}_{}", data_source.as_str(), normalized_league_name(league_name))
}

/// Write a snapshot into the cache and record it in the index. Returns
/// the snapshot directory.
pub fn save_to_cache(report: &ItemPriceReport, cache_root: &Path) -> Result<PathBuf, SnapshotError> {
    let dir_name = cache_directory_name(report.metadata.data_source, &report.metadata.league_name);
    let directory = cache_root.join(&dir_name);
    report.save_to_directory(&directory)?;

    let mut index = CacheIndex::load(cache_root)?;
    index.snapshots.retain(|entry| entry.directory != dir_name);
    index.snapshots.push(CacheIndexEntry {
        data_source: report.metadata.data_source,
        league_name: report.metadata.league_name.clone(),
        download_date: report.metadata.download_date,
        program_version: crate::VERSION.to_string(),
        directory: dir_name,
    });
    index.save(cache_root)?;

    Ok(directory)
}

pub fn load_from_cache(
    cache_root: &Path,
    data_source: DataSource,
    league_name: &str,
) -> Result<ItemPriceReport, SnapshotError> {
    let directory = cache_root.join(cache_directory_name(data_source, league_name));
    ItemPriceReport::load_from_directory(&directory)
}

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "snapshot I/O error: {}", e),
            SnapshotError::Json(e) => write!(f, "snapshot format error: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e)
    }
}
